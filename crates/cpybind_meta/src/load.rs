//! Load metadata from its JSON interchange form.
//!
//! The introspection layer hands over either one package object or an array of them. Loaded packages are
//! [normalized](crate::Package::normalize) so that every identifier and receiver is present.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::LoadError;
use crate::model::Package;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Package>),
    One(Box<Package>),
}

/// Parse packages from a JSON string.
///
/// ## Errors
/// - [`LoadError::Json`] if the text is not a package object or array of package objects.
/// - [`LoadError::Empty`] for an empty array.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn from_json_str(source: &str) -> Result<Vec<Package>, LoadError> {
    let mut packages = match serde_json::from_str::<OneOrMany>(source) {
        Ok(OneOrMany::Many(pkgs)) => pkgs,
        Ok(OneOrMany::One(pkg)) => vec![*pkg],
        // Untagged enums swallow the underlying message; re-parse as a single package to surface it.
        Err(_) => vec![serde_json::from_str::<Package>(source)?],
    };
    if packages.is_empty() {
        return Err(LoadError::Empty);
    }
    for pkg in &mut packages {
        pkg.normalize();
    }
    tracing::debug!(count = packages.len(), "loaded metadata");
    Ok(packages)
}

/// Read and parse packages from a JSON file.
pub fn from_path(path: &Path) -> Result<Vec<Package>, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, ValueType};

    const POINT: &str = r#"{
        "name": "geom",
        "path": "example.com/geom",
        "doc": "Package geom.",
        "structs": [{
            "name": "Point",
            "capabilities": ["stringer"],
            "fields": [
                {"name": "X", "type": {"basic": "int"}},
                {"name": "label", "type": {"basic": "string"}}
            ],
            "methods": [{"name": "String", "results": [{"type": {"basic": "string"}}]}]
        }],
        "funcs": [{
            "name": "Origin",
            "results": [{"type": {"pointer": {"named": {"name": "Point"}}}}]
        }]
    }"#;

    #[test]
    fn test_single_package() {
        let pkgs = from_json_str(POINT).unwrap();
        assert_eq!(pkgs.len(), 1);
        let pkg = &pkgs[0];
        assert_eq!(pkg.path, "example.com/geom");
        let point = &pkg.structs[0];
        assert_eq!(point.id, "geom_Point");
        assert!(point.has_capability(Capability::Stringer));
        assert_eq!(point.exported_fields().count(), 1);
        assert!(point.methods[0].is_method());
        assert_eq!(pkg.funcs[0].id, "geom_Origin");
        assert_eq!(
            pkg.funcs[0].results[0].ty,
            ValueType::pointer(ValueType::named_struct("Point"))
        );
    }

    #[test]
    fn test_array_of_packages() {
        let pkgs = from_json_str(r#"[{"name": "a"}, {"name": "b", "funcs": [{"name": "F"}]}]"#).unwrap();
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[1].funcs[0].id, "b_F");
    }

    #[test]
    fn test_unknown_basic_kind_is_an_error() {
        let err = from_json_str(r#"{"name": "a", "funcs": [{"name": "F", "params": [{"type": {"basic": "int128"}}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_empty_array() {
        assert!(matches!(from_json_str("[]"), Err(LoadError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let err = from_path(Path::new("definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
