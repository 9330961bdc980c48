//! Read-only metadata model for the cpybind binding emitter.
//!
//! This crate stands in for the introspection layer: it describes packages, their exported structs (fields, bound
//! methods, capabilities) and free functions (parameters, results, receivers), plus the value types attached to all of
//! them. It can load that description from JSON and check it structurally.
//!
//! ## Notes
//! - This crate does no name resolution and no semantic checking of wrapped functions; it only carries what the
//!   introspection layer already resolved.
//! - Identifiers missing from the input are derived with the naming rules in `cpybind_core::lang::conventions`.
//!
//! ## Examples
//! ```rust
//! use cpybind_meta::{Func, Package, ValueType};
//!
//! let pkg = Package::new("calc").with_func(
//!     Func::new("Add").param("a", ValueType::int()).param("b", ValueType::int()).result(ValueType::int()),
//! );
//! assert_eq!(pkg.funcs[0].id, "calc_Add");
//! assert!(cpybind_meta::validate(&pkg).is_empty());
//! ```

pub mod errors;
pub mod load;
pub mod model;
pub mod validate;

pub use errors::{LoadError, MetaError};
pub use model::{Capability, Field, Func, Package, StructType, ValueType, Var};
pub use validate::validate;
