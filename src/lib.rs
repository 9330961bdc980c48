#![forbid(unsafe_code)]
//! cpybind: CPython 2 C extension bindings for cgo-exported packages.
//!
//! Given metadata describing a package's exported structs (fields, methods) and free functions, cpybind emits the C
//! glue that exposes them as a CPython extension module: type objects, attribute accessors, method tables, call
//! trampolines and the module initializer. The wrapped side is the `GoPy_*` entry points exported by cgo.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `backend` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Diagnostics, not panics**: Metadata the generator cannot bind faithfully is reported as a `BindError` and
//!   emitted best effort; generation itself never fails.

pub mod backend;
pub mod cli;
pub mod config;

pub use backend::{BindError, BindErrors, BindingGenerator, BindingOutput, Generation};
pub use config::GenConfig;
