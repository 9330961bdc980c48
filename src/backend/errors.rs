//! Error types for binding generation.
//!
//! Generation never stops at the first problem: every component runs to completion and records what it could not
//! express faithfully. A single problem is a [`BindError`]; a generation pass reports a [`BindErrors`] collection.

use cpybind_meta::MetaError;
use miette::Diagnostic;
use thiserror::Error;

/// A single generation-time problem.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum BindError {
    /// A structural problem in the metadata itself.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Metadata(#[from] MetaError),

    /// A value whose type cannot cross the boundary faithfully; it was emitted as an untyped handle.
    #[error("{context}: unsupported type `{ty}` ({reason})")]
    #[diagnostic(
        code(cpybind::unsupported_type),
        help("the value is passed as an untyped pointer-sized handle; wrap it in an exported struct to expose it")
    )]
    UnsupportedType { context: String, ty: String, reason: String },

    /// A struct declares a textual representation but has no usable `String() string` method.
    #[error("struct `{name}` is marked as a stringer but has no `String() string` method")]
    #[diagnostic(
        code(cpybind::missing_string_method),
        help("the type falls back to the default object representation")
    )]
    MissingStringMethod { name: String },

    /// A free function carries a receiver; there is no owning type to unwrap it from.
    #[error("free function `{name}` has a receiver")]
    #[diagnostic(
        code(cpybind::receiver_on_free_function),
        help("declare it as a method of its struct; the receiver was ignored")
    )]
    ReceiverOnFreeFunction { name: String },
}

/// Collection of generation errors for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Diagnostic)]
pub struct BindErrors {
    #[related]
    errors: Vec<BindError>,
}

impl BindErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some` if `errors` is non-empty, `None` otherwise.
    pub fn from_vec(errors: Vec<BindError>) -> Option<Self> {
        if errors.is_empty() { None } else { Some(Self { errors }) }
    }

    /// Record one error.
    pub fn push(&mut self, error: impl Into<BindError>) {
        let error = error.into();
        tracing::warn!(%error, "binding diagnostic");
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindError> {
        self.errors.iter()
    }
}

impl std::fmt::Display for BindErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.len() == 1 {
            write!(f, "{}", self.errors[0])
        } else {
            writeln!(f, "{} binding errors:", self.errors.len())?;
            for (i, err) in self.errors.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, err)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for BindErrors {}

impl From<BindError> for BindErrors {
    fn from(error: BindError) -> Self {
        Self { errors: vec![error] }
    }
}

impl IntoIterator for BindErrors {
    type Item = BindError;
    type IntoIter = std::vec::IntoIter<BindError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
