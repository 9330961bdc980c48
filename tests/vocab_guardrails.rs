use std::fs;
use std::path::{Path, PathBuf};

use cpybind_core::lang::capi;

/// Guardrail against hand-typed C-API spellings and symbol prefixes in generator code.
///
/// This is intentionally a **coarse** safety net. It looks for string literals that start with a C-API name or a
/// generated-symbol prefix in production Rust sources, where we expect callers to go through
/// `cpybind_core::lang::capi` and `cpybind_core::lang::conventions` instead.
///
/// Notes:
/// - We allow occurrences in `crates/cpybind_core/src/lang/**` (registries themselves) and in tests/fixtures.
/// - Scanning of a file stops at its `#[cfg(test)]` module.
/// - This is not meant to be perfect; it’s meant to catch “oops I typed the symbol by hand”.
#[test]
fn no_hand_typed_c_vocabulary_in_rust_sources() {
    let root = repo_root();
    let spellings = guarded_spellings();
    let mut offenders: Vec<(PathBuf, usize, String)> = Vec::new();

    let targets = [root.join("src"), root.join("crates")];
    for dir in targets {
        if dir.exists() {
            scan_dir(&root, &dir, &spellings, &mut offenders);
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::new();
        msg.push_str("Found hand-typed C vocabulary. Prefer cpybind_core::lang registries.\n\n");
        for (path, line_no, line) in offenders.into_iter().take(80) {
            msg.push_str(&format!(
                "- {}:{}: {}\n",
                path.strip_prefix(&root).unwrap_or(&path).display(),
                line_no,
                line.trim()
            ));
        }
        panic!("{msg}");
    }
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn guarded_spellings() -> Vec<&'static str> {
    vec![
        capi::PARSE_TUPLE,
        capi::BUILD_VALUE,
        capi::METH_VARARGS,
        capi::METH_NOARGS,
        capi::TYPE_READY,
        capi::INIT_MODULE,
        capi::MODULE_ADD_OBJECT,
        capi::MODINIT_FUNC,
        capi::OBJECT_REPR,
        capi::TPFLAGS_DEFAULT,
        // Generated-symbol prefixes
        "GoPy_",
        "_gopy_",
        "gopy_",
        "cgopy",
        "CGoPy_",
        "cpy_",
    ]
}

fn is_allowed_file(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path).to_string_lossy();
    if !rel.ends_with(".rs") {
        return true;
    }
    // Registries define the spellings; allow them.
    if rel.starts_with("crates/cpybind_core/src/lang/") {
        return true;
    }
    // Tests can mention spellings directly.
    if rel.starts_with("tests/") {
        return true;
    }
    false
}

fn scan_dir(root: &Path, dir: &Path, spellings: &[&'static str], offenders: &mut Vec<(PathBuf, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(root, &path, spellings, offenders);
            continue;
        }
        if is_allowed_file(root, &path) {
            continue;
        }
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }
            if is_suspicious_line(line, spellings) {
                offenders.push((path.clone(), idx + 1, line.to_string()));
            }
        }
    }
}

fn is_suspicious_line(line: &str, spellings: &[&'static str]) -> bool {
    // Avoid false positives in comments/docstrings.
    let trimmed = line.trim_start();
    if trimmed.starts_with("//") || trimmed.starts_with("///") || trimmed.starts_with("//!") {
        return false;
    }

    // Only flag string literals that open with a guarded spelling: `"PyArg_ParseTuple(...`, `"GoPy_{}"`.
    spellings.iter().any(|s| line.contains(&format!("\"{s}")))
}
