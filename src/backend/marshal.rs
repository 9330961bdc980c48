//! Type-mapping engine: how one value crosses the boxed-value boundary.
//!
//! Every value type maps to exactly one [`Marshal`] strategy. The mapping is a pure function of the type (plus the
//! package, to name struct handles): no state, no caching. All text fragments the emitters need for a value
//! (declarations, parse addresses, call arguments, conversions, cleanup) come from here, so the strategy for a
//! category is written once instead of being re-derived at each call site.
//!
//! | category      | token | native storage | boxed-side storage |
//! |---------------|-------|----------------|--------------------|
//! | primitive     | per kind (`L`, `d`, `B`, ...) | cgo scalar (`GoInt`, ...) | same local |
//! | textual       | `s`   | `GoString`     | `const char*` (duplicated, freed after packing) |
//! | opaque handle | `K`   | `GoPy_<id>` or `void*` | pointer-sized integer |
//!
//! Multiple results form a fourth category, the composite carrier, described by [`ResultPlan`].

use cpybind_core::lang::capi;
use cpybind_core::lang::conventions as names;
use cpybind_core::lang::format_units::{self, FormatUnitId};
use cpybind_core::lang::scalars::{self, ScalarClass};
use cpybind_core::strings::c_quote;
use cpybind_meta::{Package, ValueType, Var};

use super::c_emitter::CEmitter;

/// Storage used for handles that have no named wrapper type.
const OPAQUE_CTYPE: &str = "void*";

/// Derived classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    Primitive,
    Textual,
    OpaqueHandle,
    CompositeResult,
}

/// Resolve the C handle type of a named struct.
pub trait HandleResolver {
    /// Handle typedef for the struct called `name`, if it is one of ours.
    fn handle_ctype(&self, name: &str) -> Option<String>;
}

impl HandleResolver for Package {
    fn handle_ctype(&self, name: &str) -> Option<String> {
        self.struct_named(name).map(|s| names::handle_type(&s.id))
    }
}

/// Marshal strategy for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marshal {
    /// One scalar format unit, stored directly in the cgo scalar type.
    Primitive { token: &'static str, ctype: &'static str },
    /// A string: `GoString` natively, a duplicated `const char*` on the boxed side.
    Textual,
    /// An unsafe capability pointer; the value is never decomposed.
    Handle { ctype: String },
}

impl Marshal {
    /// Map a value type to its strategy. Total: every type maps to exactly one strategy.
    pub fn of(ty: &ValueType, resolver: &dyn HandleResolver) -> Marshal {
        match ty {
            ValueType::Basic(kind) => {
                let info = scalars::info_for(*kind);
                match (info.class, info.format) {
                    (ScalarClass::Primitive, Some(unit)) => Marshal::Primitive {
                        token: format_units::as_token(unit),
                        ctype: info.cgo_type,
                    },
                    (ScalarClass::Textual, _) => Marshal::Textual,
                    _ => Marshal::opaque(),
                }
            }
            ValueType::Named { name, underlying } => match underlying.as_ref() {
                ValueType::Struct => Marshal::handle_for(name, resolver),
                other => Marshal::of(other, resolver),
            },
            ValueType::Pointer(elem) => match elem.as_ref() {
                ValueType::Named { name, underlying } if matches!(underlying.as_ref(), ValueType::Struct) => {
                    Marshal::handle_for(name, resolver)
                }
                _ => Marshal::opaque(),
            },
            ValueType::Struct
            | ValueType::Slice(_)
            | ValueType::Array { .. }
            | ValueType::Map { .. }
            | ValueType::Chan(_)
            | ValueType::Signature
            | ValueType::Interface => Marshal::opaque(),
        }
    }

    /// Check whether a type can cross the boundary faithfully.
    ///
    /// Types that fail still get a strategy from [`Marshal::of`] (an untyped handle); the caller records the reason
    /// as a diagnostic.
    pub fn support(ty: &ValueType) -> Result<(), String> {
        match ty {
            ValueType::Basic(kind) => match scalars::info_for(*kind).class {
                ScalarClass::Complex => Err("complex numbers have no CPython format unit".to_string()),
                _ => Ok(()),
            },
            ValueType::Named { underlying, .. } => match underlying.as_ref() {
                ValueType::Struct => Ok(()),
                other => Marshal::support(other),
            },
            ValueType::Pointer(elem) => match elem.underlying() {
                ValueType::Struct if matches!(elem.as_ref(), ValueType::Named { .. }) => Ok(()),
                _ => Err("only pointers to named structs can be wrapped".to_string()),
            },
            ValueType::Struct => Err("anonymous structs have no wrapper type".to_string()),
            ValueType::Slice(_) | ValueType::Array { .. } => Err("sequences are not marshaled".to_string()),
            ValueType::Map { .. } => Err("maps are not marshaled".to_string()),
            ValueType::Chan(_) => Err("channels cannot cross the boundary".to_string()),
            ValueType::Signature => Err("function values cannot cross the boundary".to_string()),
            ValueType::Interface => Err("interface values cannot cross the boundary".to_string()),
        }
    }

    fn handle_for(name: &str, resolver: &dyn HandleResolver) -> Marshal {
        Marshal::Handle {
            ctype: resolver.handle_ctype(name).unwrap_or_else(|| OPAQUE_CTYPE.to_string()),
        }
    }

    fn opaque() -> Marshal {
        Marshal::Handle {
            ctype: OPAQUE_CTYPE.to_string(),
        }
    }

    pub fn category(&self) -> ValueCategory {
        match self {
            Marshal::Primitive { .. } => ValueCategory::Primitive,
            Marshal::Textual => ValueCategory::Textual,
            Marshal::Handle { .. } => ValueCategory::OpaqueHandle,
        }
    }

    /// The format unit used both to parse and to build this value.
    pub fn token(&self) -> &'static str {
        match self {
            Marshal::Primitive { token, .. } => *token,
            Marshal::Textual => format_units::as_token(FormatUnitId::CString),
            Marshal::Handle { .. } => format_units::as_token(FormatUnitId::UnsignedLongLong),
        }
    }

    /// Native (wrapped-side) C type.
    pub fn ctype(&self) -> &str {
        match self {
            Marshal::Primitive { ctype, .. } => *ctype,
            Marshal::Textual => scalars::info_for(scalars::BasicKind::String).cgo_type,
            Marshal::Handle { ctype } => ctype.as_str(),
        }
    }

    /// Whether conversion allocates a buffer that must be released after the marshal call.
    pub fn needs_cleanup(&self) -> bool {
        matches!(self, Marshal::Textual)
    }

    /// Declare the locals holding a value named `local` (`c_<local>`, plus `cgopy_<local>` for text).
    pub fn declare(&self, out: &mut CEmitter, local: &str) {
        out.linef(format_args!("{} {};", self.ctype(), names::native_local(local)));
        if let Marshal::Textual = self {
            out.linef(format_args!("const char* {};", names::buffer_local(local)));
        }
    }

    /// Address handed to `PyArg_ParseTuple` for this value.
    pub fn parse_addr(&self, local: &str) -> String {
        match self {
            Marshal::Primitive { .. } => format!("&{}", names::native_local(local)),
            Marshal::Textual => format!("&{}", names::buffer_local(local)),
            Marshal::Handle { .. } => format!("(unsigned long long*)&{}", names::native_local(local)),
        }
    }

    /// Statement converting the parsed boxed-side value into native storage, if any.
    pub fn after_parse(&self, local: &str) -> Option<String> {
        match self {
            Marshal::Textual => Some(format!(
                "{} = {}((char*){});",
                names::native_local(local),
                names::FROM_C_STRING,
                names::buffer_local(local)
            )),
            _ => None,
        }
    }

    /// Expression passing the value to a wrapped entry point.
    pub fn call_arg(&self, local: &str) -> String {
        names::native_local(local)
    }

    /// Statement converting the native expression into boxed-side storage before packing, if any.
    pub fn before_build(&self, native: &str, buffer: &str) -> Option<String> {
        match self {
            Marshal::Textual => Some(format!("{} = {}({});", buffer, names::TO_C_STRING, native)),
            _ => None,
        }
    }

    /// Argument handed to `Py_BuildValue` for this value.
    pub fn build_arg(&self, native: &str, buffer: &str) -> String {
        match self {
            Marshal::Primitive { .. } => native.to_string(),
            Marshal::Textual => buffer.to_string(),
            Marshal::Handle { .. } => format!("(unsigned long long){}", native),
        }
    }

    /// Statement releasing the boxed-side buffer after packing, if any.
    pub fn release(&self, buffer: &str) -> Option<String> {
        match self {
            Marshal::Textual => Some(format!("free((void*){});", buffer)),
            _ => None,
        }
    }
}

/// Concatenate the tokens of `values` into one format string.
pub fn format_string<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a Marshal>,
{
    values.into_iter().map(Marshal::token).collect()
}

/// One value packed into a boxed result.
#[derive(Debug, Clone)]
pub struct Packed<'a> {
    pub marshal: &'a Marshal,
    /// Native expression holding the value (`c_gopy_ret`, `c_gopy_ret.r1`, ...).
    pub native: String,
    /// Buffer local used when the value needs conversion before packing.
    pub buffer: String,
}

/// Pack `values` with a single `Py_BuildValue` call and return the boxed result.
///
/// Buffers duplicated for packing are released after the call, before returning.
pub fn emit_build_return(out: &mut CEmitter, values: &[Packed<'_>]) {
    let format = format_string(values.iter().map(|v| v.marshal));
    let args: Vec<String> = values.iter().map(|v| v.marshal.build_arg(&v.native, &v.buffer)).collect();
    let call = format!("{}({}, {})", capi::BUILD_VALUE, c_quote(&format), args.join(", "));

    if !values.iter().any(|v| v.marshal.needs_cleanup()) {
        out.linef(format_args!("return {};", call));
        return;
    }

    for v in values {
        if let Some(stmt) = v.marshal.before_build(&v.native, &v.buffer) {
            out.line(&stmt);
        }
    }
    let boxed = out.declare_local("o");
    out.linef(format_args!("{} *{} = {};", capi::PY_OBJECT, boxed, call));
    for v in values {
        if let Some(stmt) = v.marshal.release(&v.buffer) {
            out.line(&stmt);
        }
    }
    out.linef(format_args!("return {};", boxed));
}

/// How a function's results are captured and packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPlan {
    /// No results: the trampoline returns `Py_None`.
    None,
    /// One result held in a scalar local.
    Single(Marshal),
    /// Several results held in the cgo carrier struct, fields `r0..rN` in result order.
    Composite(Vec<Marshal>),
}

impl ResultPlan {
    pub fn of(results: &[Var], resolver: &dyn HandleResolver) -> ResultPlan {
        match results {
            [] => ResultPlan::None,
            [single] => ResultPlan::Single(Marshal::of(&single.ty, resolver)),
            many => ResultPlan::Composite(many.iter().map(|r| Marshal::of(&r.ty, resolver)).collect()),
        }
    }

    pub fn category(&self) -> Option<ValueCategory> {
        match self {
            ResultPlan::None => None,
            ResultPlan::Single(m) => Some(m.category()),
            ResultPlan::Composite(_) => Some(ValueCategory::CompositeResult),
        }
    }

    /// Marshal strategies in packing order.
    pub fn values(&self) -> &[Marshal] {
        match self {
            ResultPlan::None => &[],
            ResultPlan::Single(m) => std::slice::from_ref(m),
            ResultPlan::Composite(ms) => ms,
        }
    }

    /// Format string packing every result in order.
    pub fn format(&self) -> String {
        format_string(self.values())
    }

    pub fn needs_cleanup(&self) -> bool {
        self.values().iter().any(Marshal::needs_cleanup)
    }
}
