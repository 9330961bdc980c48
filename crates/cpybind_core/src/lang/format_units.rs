//! CPython format-unit vocabulary.
//!
//! `PyArg_ParseTuple` and `Py_BuildValue` share one convention: one format unit per value, concatenated into a format
//! string. The same unit is used in both directions, which is what makes a getter's packing and a setter's parsing
//! inverses of each other.
//!
//! ## Notes
//! - `c_type` is the C type the unit reads from (building) or writes to (parsing).
//! - `size` is the storage width in bytes on an LP64 target; generated storage must have the same width.
//!
//! ## Examples
//! ```rust
//! use cpybind_core::lang::format_units::{self, FormatUnitId};
//!
//! assert_eq!(format_units::from_token("L"), Some(FormatUnitId::LongLong));
//! assert_eq!(format_units::info_for(FormatUnitId::Double).c_type, "double");
//! ```

/// Stable identifier for a supported format unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatUnitId {
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    CString,
}

/// Metadata for one format unit.
#[derive(Debug, Clone, Copy)]
pub struct FormatUnitInfo {
    pub id: FormatUnitId,
    /// The single-character unit as written in a format string.
    pub token: &'static str,
    /// The C type the unit converts to/from.
    pub c_type: &'static str,
    /// Width of `c_type` in bytes (LP64).
    pub size: usize,
    /// Whether the unit carries a floating-point value.
    pub floating: bool,
}

/// Registry of the format units the generator emits.
pub const FORMAT_UNITS: &[FormatUnitInfo] = &[
    unit(FormatUnitId::SignedChar, "b", "char", 1, false),
    unit(FormatUnitId::UnsignedChar, "B", "unsigned char", 1, false),
    unit(FormatUnitId::Short, "h", "short", 2, false),
    unit(FormatUnitId::UnsignedShort, "H", "unsigned short", 2, false),
    unit(FormatUnitId::Int, "i", "int", 4, false),
    unit(FormatUnitId::UnsignedInt, "I", "unsigned int", 4, false),
    unit(FormatUnitId::LongLong, "L", "long long", 8, false),
    unit(FormatUnitId::UnsignedLongLong, "K", "unsigned long long", 8, false),
    unit(FormatUnitId::Float, "f", "float", 4, true),
    unit(FormatUnitId::Double, "d", "double", 8, true),
    unit(FormatUnitId::CString, "s", "const char*", 8, false),
];

/// Resolve a format token (e.g. `"L"`) to its [`FormatUnitId`].
pub fn from_token(token: &str) -> Option<FormatUnitId> {
    FORMAT_UNITS.iter().find(|u| u.token == token).map(|u| u.id)
}

/// Return the token spelling for a format unit.
pub fn as_token(id: FormatUnitId) -> &'static str {
    info_for(id).token
}

/// Return the full metadata entry for a format unit.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: FormatUnitId) -> &'static FormatUnitInfo {
    FORMAT_UNITS
        .iter()
        .find(|u| u.id == id)
        .expect("format unit info missing")
}

const fn unit(id: FormatUnitId, token: &'static str, c_type: &'static str, size: usize, floating: bool) -> FormatUnitInfo {
    FormatUnitInfo {
        id,
        token,
        c_type,
        size,
        floating,
    }
}
