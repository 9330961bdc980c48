//! Registry-backed vocabulary shared by the metadata layer and the generator.
//!
//! ## See also
//! - [`scalars`]: basic kinds of the wrapped language (`int`, `string`, ...) and their cgo types
//! - [`format_units`]: CPython argument parsing/building format units
//! - [`capi`]: CPython C-API spellings used by generated code
//! - [`conventions`]: deterministic symbol naming
//! - [`c_idents`]: C identifier validity

pub mod c_idents;
pub mod capi;
pub mod conventions;
pub mod format_units;
pub mod scalars;
