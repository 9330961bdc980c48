//! C identifier vocabulary (for validating stable identifiers).

/// Check whether `name` is a valid C identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Generated symbols always prefix stable identifiers (`gopy_`, `_gopy_`, `GoPy_`), so C keywords are acceptable as
/// identifier fragments and are not rejected here.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
