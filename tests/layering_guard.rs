//! Layering guardrails for the workspace crates.
//!
//! `cpybind_core` is the vocabulary leaf: it must not depend on anything. `cpybind_meta` describes metadata and must
//! not depend on the generator. These tests scan the member manifests and fail if a forbidden edge appears.

/// Lines of the `[dependencies]` table of a manifest, with comments stripped.
fn dependency_lines(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut lines = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if !line_no_comment.is_empty() {
            lines.push(line_no_comment.to_string());
        }
    }
    lines
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let manifest = include_str!("../crates/cpybind_core/Cargo.toml");
    let deps = dependency_lines(manifest);
    assert!(deps.is_empty(), "`cpybind_core` must stay dependency-free, found: {deps:?}");
}

#[test]
fn metadata_does_not_depend_on_generator() {
    let manifest = include_str!("../crates/cpybind_meta/Cargo.toml");
    for line in dependency_lines(manifest) {
        if line.starts_with("cpybind ") || line.starts_with("cpybind=") {
            panic!("`cpybind_meta` must not depend on the `cpybind` generator crate");
        }
    }
}
