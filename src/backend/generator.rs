//! Generation driver: runs every component over one package and assembles the output unit.
//!
//! ## Emission order
//! 1. preamble (generated-file banner, includes, the cgo header)
//! 2. per struct, in declaration order: declarations and the full type descriptor
//! 3. free-function trampolines
//! 4. module method table and initializer
//!
//! Declarations and implementations are collected in separate streams, so the rendered unit lists every prototype
//! before the first definition.

use cpybind_core::lang::capi;
use cpybind_meta::{Package, validate};

use crate::config::GenConfig;

use super::errors::{BindError, BindErrors};
use super::module;
use super::streams::Streams;
use super::trampoline;
use super::type_record;

/// The generated C unit for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOutput {
    /// Package the unit was generated for.
    pub package: String,
    pub preamble: String,
    /// Forward declarations of every generated symbol.
    pub declarations: String,
    pub implementation: String,
}

impl BindingOutput {
    /// The full unit: preamble, declarations, then implementation.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.preamble.len() + self.declarations.len() + self.implementation.len());
        out.push_str(&self.preamble);
        out.push_str(&self.declarations);
        out.push_str(&self.implementation);
        out
    }

    /// File name the CLI writes the unit to.
    pub fn file_name(&self) -> String {
        format!("{}.c", self.package)
    }
}

/// Result of a generation pass: the output (always produced, best effort) and every diagnostic recorded.
#[derive(Debug, Clone)]
pub struct Generation {
    pub output: BindingOutput,
    pub errors: BindErrors,
}

impl Generation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The output if no diagnostic was recorded.
    pub fn into_result(self) -> Result<BindingOutput, BindErrors> {
        if self.errors.is_empty() { Ok(self.output) } else { Err(self.errors) }
    }
}

/// Binding generator for CPython 2 C extension modules.
///
/// ## Examples
///
/// ```rust
/// use cpybind::backend::BindingGenerator;
/// use cpybind_meta::{Func, Package, ValueType};
///
/// let pkg = Package::new("calc").with_func(
///     Func::new("Add").param("a", ValueType::int()).param("b", ValueType::int()).result(ValueType::int()),
/// );
/// let output = BindingGenerator::new().try_generate(&pkg).unwrap();
/// assert!(output.render().contains("PyMODINIT_FUNC\ninitcalc(void) {"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BindingGenerator {
    config: GenConfig,
}

impl BindingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generate the binding unit of `pkg`, collecting every diagnostic.
    ///
    /// Generation always runs to completion; constructs that cannot be expressed faithfully are emitted best effort
    /// and reported in [`Generation::errors`].
    #[tracing::instrument(skip_all, fields(package = %pkg.name, structs = pkg.structs.len(), funcs = pkg.funcs.len()))]
    pub fn generate(&self, pkg: &Package) -> Generation {
        let mut errors = BindErrors::new();
        for err in validate(pkg) {
            errors.push(BindError::Metadata(err));
        }

        let mut out = Streams::new(self.config.indent_width);
        for s in &pkg.structs {
            type_record::emit_struct(&mut out, pkg, s, &mut errors);
        }
        if !pkg.funcs.is_empty() {
            out.decl().comment(&format!("functions for {}", pkg.name));
            out.decl().blank_line();
        }
        for f in &pkg.funcs {
            trampoline::emit_trampoline(&mut out, pkg, None, f, &mut errors);
        }
        module::emit_module(&mut out, pkg);

        let (declarations, implementation) = out.finish();
        let preamble = if self.config.emit_preamble {
            preamble(pkg, &self.config.header_for(pkg))
        } else {
            String::new()
        };

        tracing::debug!(errors = errors.len(), "generated binding unit");
        Generation {
            output: BindingOutput {
                package: pkg.name.clone(),
                preamble,
                declarations,
                implementation,
            },
            errors,
        }
    }

    /// Generate the binding unit of `pkg`, failing if any diagnostic was recorded.
    ///
    /// ## Errors
    ///
    /// Returns every recorded [`BindError`] when the package cannot be bound faithfully.
    pub fn try_generate(&self, pkg: &Package) -> Result<BindingOutput, BindErrors> {
        self.generate(pkg).into_result()
    }
}

/// Banner, includes and the cgo header include.
fn preamble(pkg: &Package, header: &str) -> String {
    // The package path lands inside a block comment.
    let path = pkg.path.replace("*/", "* /");
    let includes: String = capi::INCLUDES.iter().map(|h| format!("#include \"{}\"\n", h)).collect();
    format!(
        "/*\n  C stubs for package {path}.\n  cpybind gen {path}\n\n  File is generated by cpybind. Do not edit.\n*/\n\
         \n\
         #ifdef _POSIX_C_SOURCE\n#undef _POSIX_C_SOURCE\n#endif\n\
         \n\
         {includes}\
         \n\
         // header exported from 'go tool cgo'\n#include \"{header}.h\"\n\
         \n"
    )
}
