//! Generation configuration.
//!
//! Everything here affects only the layout of emitted text or the name of the included cgo header; the emitted
//! binding shape (symbol names, tables, conventions) is fixed.

use cpybind_meta::Package;

/// Configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Number of spaces per indentation level in emitted C
    pub indent_width: usize,
    /// Base name of the cgo-exported header (without `.h`); defaults to the package name
    pub header: Option<String>,
    /// Whether to emit the leading comment and `#include` block
    pub emit_preamble: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            header: None,
            emit_preamble: true,
        }
    }
}

impl GenConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the cgo header base name
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Disable the preamble
    pub fn without_preamble(mut self) -> Self {
        self.emit_preamble = false;
        self
    }

    /// Header base name for `pkg`: the configured one, else the last segment of the package name
    pub fn header_for(&self, pkg: &Package) -> String {
        match &self.header {
            Some(h) => h.clone(),
            None => pkg.name.rsplit('/').next().unwrap_or(&pkg.name).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.indent_width, 4);
        assert!(config.emit_preamble);
        assert_eq!(config.header, None);
    }

    #[test]
    fn test_header_defaults_to_package_name() {
        let pkg = Package::new("geom").with_path("example.com/x/geom");
        assert_eq!(GenConfig::new().header_for(&pkg), "geom");
        assert_eq!(GenConfig::new().with_header("_cgo_export").header_for(&pkg), "_cgo_export");
    }

    #[test]
    fn test_builder() {
        let config = GenConfig::new().with_indent_width(2).without_preamble();
        assert_eq!(config.indent_width, 2);
        assert!(!config.emit_preamble);
    }
}
