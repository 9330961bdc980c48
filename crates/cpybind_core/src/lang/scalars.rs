//! Basic-kind vocabulary of the wrapped language.
//!
//! This registry covers the predeclared scalar types (`bool`, sized integers, floats, complex numbers, `string`,
//! `unsafe.Pointer`), their aliases, the C type cgo exports them as, and the CPython format unit used to marshal them.
//!
//! ## Notes
//! - Lookup via [`from_str`] is exact (the wrapped language is case-sensitive).
//! - `int`/`uint` are assumed 64-bit, matching cgo's `GoInt`/`GoUint` on 64-bit targets.
//!
//! ## Examples
//! ```rust
//! use cpybind_core::lang::scalars::{self, BasicKind};
//!
//! assert_eq!(scalars::from_str("byte"), Some(BasicKind::Uint8));
//! assert_eq!(scalars::info_for(BasicKind::Int).cgo_type, "GoInt");
//! ```

use crate::lang::format_units::FormatUnitId;

/// Stable identifier for a basic kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

/// How a basic kind crosses the boxed-value boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarClass {
    /// A single format unit, stored directly in its cgo scalar type.
    Primitive,
    /// Needs a duplicated C buffer in each direction.
    Textual,
    /// Pointer-sized capability, never dereferenced by generated code.
    Pointer,
    /// No CPython format unit matches the cgo representation.
    Complex,
}

/// Metadata for a basic kind.
#[derive(Debug, Clone, Copy)]
pub struct ScalarInfo {
    pub id: BasicKind,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Type name in the cgo-exported header.
    pub cgo_type: &'static str,
    pub class: ScalarClass,
    /// Format unit for `Primitive` and `Textual` kinds.
    pub format: Option<FormatUnitId>,
    /// Width of `cgo_type` in bytes (LP64).
    pub size: usize,
}

/// Registry of basic kinds.
pub const SCALARS: &[ScalarInfo] = &[
    prim(BasicKind::Bool, "bool", &[], "GoUint8", FormatUnitId::UnsignedChar, 1),
    prim(BasicKind::Int, "int", &[], "GoInt", FormatUnitId::LongLong, 8),
    prim(BasicKind::Int8, "int8", &[], "GoInt8", FormatUnitId::SignedChar, 1),
    prim(BasicKind::Int16, "int16", &[], "GoInt16", FormatUnitId::Short, 2),
    prim(BasicKind::Int32, "int32", &["rune"], "GoInt32", FormatUnitId::Int, 4),
    prim(BasicKind::Int64, "int64", &[], "GoInt64", FormatUnitId::LongLong, 8),
    prim(BasicKind::Uint, "uint", &[], "GoUint", FormatUnitId::UnsignedLongLong, 8),
    prim(BasicKind::Uint8, "uint8", &["byte"], "GoUint8", FormatUnitId::UnsignedChar, 1),
    prim(BasicKind::Uint16, "uint16", &[], "GoUint16", FormatUnitId::UnsignedShort, 2),
    prim(BasicKind::Uint32, "uint32", &[], "GoUint32", FormatUnitId::UnsignedInt, 4),
    prim(BasicKind::Uint64, "uint64", &[], "GoUint64", FormatUnitId::UnsignedLongLong, 8),
    prim(BasicKind::Uintptr, "uintptr", &[], "GoUintptr", FormatUnitId::UnsignedLongLong, 8),
    prim(BasicKind::Float32, "float32", &[], "GoFloat32", FormatUnitId::Float, 4),
    prim(BasicKind::Float64, "float64", &[], "GoFloat64", FormatUnitId::Double, 8),
    ScalarInfo {
        id: BasicKind::Complex64,
        canonical: "complex64",
        aliases: &[],
        cgo_type: "GoComplex64",
        class: ScalarClass::Complex,
        format: None,
        size: 8,
    },
    ScalarInfo {
        id: BasicKind::Complex128,
        canonical: "complex128",
        aliases: &[],
        cgo_type: "GoComplex128",
        class: ScalarClass::Complex,
        format: None,
        size: 16,
    },
    ScalarInfo {
        id: BasicKind::String,
        canonical: "string",
        aliases: &[],
        cgo_type: "GoString",
        class: ScalarClass::Textual,
        format: Some(FormatUnitId::CString),
        size: 16,
    },
    ScalarInfo {
        id: BasicKind::UnsafePointer,
        canonical: "unsafe.Pointer",
        aliases: &["Pointer"],
        cgo_type: "void*",
        class: ScalarClass::Pointer,
        format: None,
        size: 8,
    },
];

/// Resolve a type spelling to a [`BasicKind`].
///
/// ## Returns
/// - `Some(BasicKind)` if the spelling is a canonical name or alias in this registry.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<BasicKind> {
    if let Some(s) = SCALARS.iter().find(|s| s.canonical == name) {
        return Some(s.id);
    }
    SCALARS.iter().find(|s| s.aliases.contains(&name)).map(|s| s.id)
}

/// Return the canonical spelling for a basic kind.
pub fn as_str(id: BasicKind) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a basic kind.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: BasicKind) -> &'static ScalarInfo {
    SCALARS.iter().find(|s| s.id == id).expect("scalar info missing")
}

const fn prim(
    id: BasicKind,
    canonical: &'static str,
    aliases: &'static [&'static str],
    cgo_type: &'static str,
    format: FormatUnitId,
    size: usize,
) -> ScalarInfo {
    ScalarInfo {
        id,
        canonical,
        aliases,
        cgo_type,
        class: ScalarClass::Primitive,
        format: Some(format),
        size,
    }
}
