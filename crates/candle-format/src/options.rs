//! Formatting options for Candle serialization.

/// Line separator of the current platform.
#[cfg(windows)]
pub const PLATFORM_NEWLINE: &str = "\r\n";

/// Line separator of the current platform.
#[cfg(not(windows))]
pub const PLATFORM_NEWLINE: &str = "\n";

/// Options for Candle serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerOptions {
    /// Indentation per nesting level (default: one tab). `None` disables indentation.
    pub indentation: Option<String>,

    /// Line separator (default: the platform's).
    pub newline: String,

    /// Emit the optional whitespace around `=`, `{` and array items (default: true).
    ///
    /// When disabled, the only newlines written are the ones that end a
    /// single-line comment and the ones that separate top-level nodes.
    pub pretty_print: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            indentation: Some("\t".to_string()),
            newline: PLATFORM_NEWLINE.to_string(),
            pretty_print: true,
        }
    }
}

impl SerializerOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation string. An empty string disables indentation.
    pub fn indentation(mut self, indentation: impl Into<String>) -> Self {
        let indentation = indentation.into();
        self.indentation = (!indentation.is_empty()).then_some(indentation);
        self
    }

    /// Disable indentation.
    pub fn no_indentation(mut self) -> Self {
        self.indentation = None;
        self
    }

    /// Set the line separator.
    pub fn newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Enable or disable pretty printing.
    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    /// No indentation and no pretty printing.
    pub fn compact(self) -> Self {
        self.no_indentation().pretty_print(false)
    }
}
