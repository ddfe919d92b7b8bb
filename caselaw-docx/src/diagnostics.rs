//! Conversion diagnostics
//!
//! The converter never drops content silently. Constructs it cannot convert
//! are recorded here next to the visible error markers in the output, and
//! recoverable anomalies (unsupported border styles, picture bullets, ...)
//! are recorded as warnings after falling back to a default.

use std::fmt;

/// Classification of an unhandled construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnhandledKind {
    /// Top-level body content
    Body,
    /// Paragraph child such as an unknown inline element
    Paragraph,
    /// Run content
    Run,
    /// Legacy VML picture content
    Picture,
    /// Table style region or other table construct
    Table,
}

impl fmt::Display for UnhandledKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnhandledKind::Body => "body",
            UnhandledKind::Paragraph => "paragraph",
            UnhandledKind::Run => "run",
            UnhandledKind::Picture => "picture",
            UnhandledKind::Table => "table",
        };
        write!(f, "{}", name)
    }
}

/// A source construct the converter could not handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhandledElement {
    /// Where the construct was found, e.g. `paragraph 12`
    pub context: String,
    /// Source type name, e.g. `sym`
    pub type_name: String,
    pub kind: UnhandledKind,
}

impl fmt::Display for UnhandledElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.context, self.type_name)
    }
}

/// Diagnostics collected while converting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub unhandled: Vec<UnhandledElement>,
    pub warnings: Vec<String>,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unhandled construct
    pub fn unhandled(
        &mut self,
        context: impl Into<String>,
        type_name: impl Into<String>,
        kind: UnhandledKind,
    ) {
        let element = UnhandledElement {
            context: context.into(),
            type_name: type_name.into(),
            kind,
        };
        log::warn!("Unhandled element {}", element);
        self.unhandled.push(element);
    }

    /// Record a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Whether anything was recorded
    pub fn is_empty(&self) -> bool {
        self.unhandled.is_empty() && self.warnings.is_empty()
    }

    /// Append the entries of another sink
    pub fn extend(&mut self, other: Diagnostics) {
        self.unhandled.extend(other.unhandled);
        self.warnings.extend(other.warnings);
    }
}
