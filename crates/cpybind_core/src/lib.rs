//! Provide the shared, dependency-free vocabulary of the cpybind binding emitter.
//!
//! This crate holds the registry-first tables that both the metadata layer and the code generator agree on:
//! - the basic (scalar) kinds of the wrapped language and their cgo spellings,
//! - the CPython format units used by `PyArg_ParseTuple` / `Py_BuildValue`,
//! - the naming conventions that tie generated C symbols to the cgo-exported entry points,
//! - C string literal quoting.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no generator-specific types.
//! - Naming conventions are load-bearing: the cgo side exports `GoPy_*` symbols and CPython locates the module
//!   initializer by exact name.

pub mod lang;
pub mod strings;
