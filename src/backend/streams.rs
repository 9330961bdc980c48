//! Declaration/definition emitter.
//!
//! Generated units have two streams: forward declarations and implementations. Every generated C function is written
//! once into each, from one [`CSignature`], so the prototype and the definition can never drift apart.

use super::c_emitter::CEmitter;

/// Return type, name and parameter list of one generated C function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSignature {
    pub ret: String,
    pub name: String,
    pub params: String,
}

impl CSignature {
    pub fn new(ret: impl Into<String>, name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            ret: ret.into(),
            name: name.into(),
            params: params.into(),
        }
    }

    /// `name(params)`, the part shared by prototype and definition.
    fn head(&self) -> String {
        format!("{}({})", self.name, self.params)
    }
}

/// The two output streams of a generation pass.
///
/// Owned by the generator and lent to each component as `&mut Streams`; both streams are append-only.
#[derive(Debug, Clone, Default)]
pub struct Streams {
    decl: CEmitter,
    imp: CEmitter,
}

impl Streams {
    pub fn new(indent_width: usize) -> Self {
        Self {
            decl: CEmitter::with_indent_width(indent_width),
            imp: CEmitter::with_indent_width(indent_width),
        }
    }

    /// The declarations stream.
    pub fn decl(&mut self) -> &mut CEmitter {
        &mut self.decl
    }

    /// The implementation stream.
    pub fn imp(&mut self) -> &mut CEmitter {
        &mut self.imp
    }

    /// Write the prototype of `sig` to the declarations stream and its definition, with the body produced by `body`,
    /// to the implementation stream. `comment` precedes both.
    pub fn define<F>(&mut self, comment: Option<&str>, sig: &CSignature, body: F)
    where
        F: FnOnce(&mut CEmitter),
    {
        if let Some(text) = comment {
            self.decl.comment(text);
        }
        self.decl.line(&sig.ret);
        self.decl.line(&format!("{};", sig.head()));
        self.decl.blank_line();

        if let Some(text) = comment {
            self.imp.comment(text);
        }
        self.imp.line(&sig.ret);
        self.imp.reset_locals();
        self.imp.block(&sig.head(), body);
        self.imp.blank_line();
    }

    /// Consume the streams, returning `(declarations, implementation)`.
    pub fn finish(self) -> (String, String) {
        (self.decl.finish(), self.imp.finish())
    }
}
