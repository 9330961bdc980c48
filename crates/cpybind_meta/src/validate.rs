//! Structural validation of a package.
//!
//! The generator assumes names are already resolved; what it cannot assume is that every identifier is usable as a C
//! symbol fragment and unique within the package. Those checks live here.

use std::collections::HashMap;

use cpybind_core::lang::c_idents;

use crate::errors::MetaError;
use crate::model::Package;

/// Validate a package, returning every problem found (empty when valid).
#[tracing::instrument(skip_all, fields(package = %pkg.name))]
pub fn validate(pkg: &Package) -> Vec<MetaError> {
    let mut errors = Vec::new();

    check_ident(&mut errors, "package", &pkg.name, &pkg.name);

    let mut struct_ids: HashMap<&str, &str> = HashMap::new();
    for s in &pkg.structs {
        check_ident(&mut errors, "struct", &s.name, &s.id);
        if let Some(first) = struct_ids.insert(&s.id, &s.name) {
            errors.push(MetaError::DuplicateIdentifier {
                id: s.id.clone(),
                first: first.to_string(),
                second: s.name.clone(),
            });
        }
    }

    // Trampolines for free functions and methods share the `gopy_<id>` namespace.
    let mut func_ids: HashMap<&str, String> = HashMap::new();
    let funcs = pkg
        .funcs
        .iter()
        .map(|f| (f, f.name.clone()))
        .chain(pkg.structs.iter().flat_map(|s| s.methods.iter().map(move |m| (m, format!("{}.{}", s.name, m.name)))));
    for (f, display) in funcs {
        check_ident(&mut errors, "function", &display, &f.id);
        if let Some(first) = func_ids.insert(&f.id, display.clone()) {
            errors.push(MetaError::DuplicateIdentifier {
                id: f.id.clone(),
                first,
                second: display,
            });
        }
    }

    for s in &pkg.structs {
        for m in s.methods.iter().filter(|m| m.receiver.is_none()) {
            errors.push(MetaError::MissingReceiver {
                owner: s.name.clone(),
                method: m.name.clone(),
            });
        }
    }

    errors
}

fn check_ident(errors: &mut Vec<MetaError>, what: &'static str, name: &str, ident: &str) {
    if !c_idents::is_identifier(ident) {
        errors.push(MetaError::InvalidIdentifier {
            what,
            name: name.to_string(),
            ident: ident.to_string(),
        });
    }
}
