//! cpybind backend: metadata to CPython 2 C extension source.
//!
//! The pipeline is:
//! 1. Metadata (`cpybind_meta::Package`) → [`marshal`] picks a strategy for every value
//! 2. [`accessors`] and [`trampoline`] emit per-field and per-function glue
//! 3. [`type_record`] assembles each struct's type object, [`module`] the module table and initializer
//! 4. [`generator`] drives the pass and prepends the preamble
//!
//! ## Module Organization
//!
//! - `c_emitter.rs` - Low-level C code string builder
//! - `streams.rs` - Paired declaration/implementation output
//! - `marshal.rs` - Type-mapping engine
//! - `accessors.rs` - Field getters, setters and getset tables
//! - `trampoline.rs` - Function and method call trampolines
//! - `type_record.rs` - Per-struct type descriptors
//! - `module.rs` - Module method table and initializer
//! - `errors.rs` - Generation diagnostics
//! - `generator.rs` - Entry point

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod accessors;
pub mod c_emitter;
pub mod errors;
pub mod generator;
pub mod marshal;
pub mod module;
pub mod streams;
pub mod trampoline;
pub mod type_record;

pub use errors::{BindError, BindErrors};
pub use generator::{BindingGenerator, BindingOutput, Generation};
pub use marshal::{Marshal, ResultPlan, ValueCategory};
