//! C code emitter - builds C source text with indentation.
//!
//! This is the low-level text primitive every generator writes through. It knows nothing about bindings.

use std::collections::HashSet;
use std::fmt::Write;

/// A buffer for building C source code with proper indentation
#[derive(Debug, Clone)]
pub struct CEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: String,
    /// Local names declared in the function currently being emitted
    locals: HashSet<String>,
}

impl Default for CEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl CEmitter {
    pub fn new() -> Self {
        Self::with_indent_width(4)
    }

    pub fn with_indent_width(width: usize) -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: " ".repeat(width),
            locals: HashSet::new(),
        }
    }

    /// Start a fresh local-name scope (one per emitted C function)
    pub fn reset_locals(&mut self) {
        self.locals.clear();
    }

    /// Reserve a local name, returning `base` or the first free `base<n>` (n = 1, 2, ...)
    pub fn declare_local(&mut self, base: &str) -> String {
        if self.locals.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}{}", base, n);
            if self.locals.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Check if a local name is already taken in the current function
    pub fn is_local_declared(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write a formatted line with current indentation
    pub fn linef(&mut self, args: std::fmt::Arguments<'_>) {
        self.write_indent();
        let _ = self.buffer.write_fmt(args);
        self.buffer.push('\n');
    }

    /// Write a blank line
    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(&self.indent_str);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write `header {`, the indented body, then `}`
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a brace-initialized table: `header = {`, one line per entry, then `};`
    pub fn table<I, S>(&mut self, header: &str, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.line(&format!("{} = {{", header));
        self.indent();
        for entry in entries {
            self.line(entry.as_ref());
        }
        self.dedent();
        self.line("};");
    }

    /// Write a `/* ... */` comment line
    pub fn comment(&mut self, text: &str) {
        self.line(&format!("/* {} */", text));
    }
}
