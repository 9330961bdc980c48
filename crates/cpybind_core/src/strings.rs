//! C string-literal helpers.
//!
//! Documentation strings and names end up inside C string literals in generated code, so they must be escaped the
//! same way everywhere.

/// Quote `s` as a C string literal, including the surrounding double quotes.
///
/// ## Notes
/// - Printable ASCII passes through; `"` and `\` are backslash-escaped.
/// - `\n`, `\t`, `\r` use their short escapes.
/// - Everything else (control characters and each byte of non-ASCII UTF-8) becomes a 3-digit octal escape. Octal
///   escapes stop after three digits, so a following digit can never be absorbed (unlike `\x`).
///
/// ## Examples
/// ```rust
/// use cpybind_core::strings::c_quote;
///
/// assert_eq!(c_quote("a \"b\"\n"), r#""a \"b\"\n""#);
/// assert_eq!(c_quote("é"), r#""\303\251""#);
/// ```
pub fn c_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for &b in s.as_bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out.push('"');
    out
}
