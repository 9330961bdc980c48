//! Error types for metadata loading and validation.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failure to obtain metadata at all.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read metadata from {}", path.display())]
    #[diagnostic(code(cpybind::meta::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata: {0}")]
    #[diagnostic(
        code(cpybind::meta::json),
        help("metadata is a package object or an array of package objects")
    )]
    Json(#[from] serde_json::Error),

    #[error("metadata contains no packages")]
    #[diagnostic(code(cpybind::meta::empty))]
    Empty,
}

/// A structural problem in otherwise well-formed metadata.
///
/// Validation collects every problem in a package rather than stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MetaError {
    #[error("{what} `{name}` has identifier `{ident}`, which is not a valid C identifier")]
    #[diagnostic(
        code(cpybind::meta::invalid_identifier),
        help("identifiers must match [A-Za-z_][A-Za-z0-9_]*")
    )]
    InvalidIdentifier { what: &'static str, name: String, ident: String },

    #[error("identifier `{id}` is used by both `{first}` and `{second}`")]
    #[diagnostic(
        code(cpybind::meta::duplicate_identifier),
        help("give one of them an explicit, distinct `id`")
    )]
    DuplicateIdentifier { id: String, first: String, second: String },

    #[error("method `{owner}.{method}` has no receiver")]
    #[diagnostic(code(cpybind::meta::missing_receiver))]
    MissingReceiver { owner: String, method: String },
}
