//! Runs and their content items

use super::drawing::{Drawing, Picture};

/// A span of content sharing one set of run properties
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Run properties (`w:rPr`)
    pub properties: Option<RunProperties>,

    /// Content items in source order
    pub content: Vec<RunContent>,
}

impl Run {
    /// Create an unformatted run holding a single text item
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            properties: None,
            content: vec![RunContent::Text(text.into())],
        }
    }
}

/// One content item inside a run
#[derive(Debug, Clone)]
pub enum RunContent {
    /// `w:t`
    Text(String),
    /// `w:tab`
    Tab,
    /// `w:br`
    Break,
    /// `w:cr`
    CarriageReturn,
    /// `w:noBreakHyphen`
    NoBreakHyphen,
    /// `w:softHyphen`
    SoftHyphen,
    /// `w:drawing`
    Drawing(Drawing),
    /// `w:pict` (VML)
    Picture(Picture),
    /// `w:fldChar`
    FieldChar,
    /// `w:instrText`
    InstrText(String),
    /// `w:lastRenderedPageBreak`
    LastRenderedPageBreak,
    /// Anything else, carrying its element name
    Other(String),
}

impl RunContent {
    /// Source element name, used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            RunContent::Text(_) => "t",
            RunContent::Tab => "tab",
            RunContent::Break => "br",
            RunContent::CarriageReturn => "cr",
            RunContent::NoBreakHyphen => "noBreakHyphen",
            RunContent::SoftHyphen => "softHyphen",
            RunContent::Drawing(_) => "drawing",
            RunContent::Picture(_) => "pict",
            RunContent::FieldChar => "fldChar",
            RunContent::InstrText(_) => "instrText",
            RunContent::LastRenderedPageBreak => "lastRenderedPageBreak",
            RunContent::Other(name) => name,
        }
    }
}

/// Run properties (`w:rPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Character style id (`w:rStyle`)
    pub style: Option<String>,
    /// `w:b`
    pub bold: Option<bool>,
    /// `w:i`
    pub italic: Option<bool>,
    /// `w:strike`
    pub strike: Option<bool>,
    /// Underline kind (`w:u/@w:val`), e.g. `single`
    pub underline: Option<String>,
    /// `superscript` or `subscript` (`w:vertAlign`)
    pub vertical_align: Option<String>,
    /// Font size in half points (`w:sz`)
    pub size: Option<u32>,
    /// Hex color or `auto` (`w:color`)
    pub color: Option<String>,
    /// ASCII font family (`w:rFonts/@w:ascii`)
    pub font: Option<String>,
}

impl RunProperties {
    /// Fill every unset property from `fallback`
    pub fn fill_from(&mut self, fallback: &RunProperties) {
        fill(&mut self.style, &fallback.style);
        fill(&mut self.bold, &fallback.bold);
        fill(&mut self.italic, &fallback.italic);
        fill(&mut self.strike, &fallback.strike);
        fill(&mut self.underline, &fallback.underline);
        fill(&mut self.vertical_align, &fallback.vertical_align);
        fill(&mut self.size, &fallback.size);
        fill(&mut self.color, &fallback.color);
        fill(&mut self.font, &fallback.font);
    }
}

fn fill<T: Clone>(target: &mut Option<T>, fallback: &Option<T>) {
    if target.is_none() {
        target.clone_from(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_from_keeps_explicit_values() {
        let mut own = RunProperties {
            bold: Some(false),
            ..RunProperties::default()
        };
        let fallback = RunProperties {
            bold: Some(true),
            italic: Some(true),
            size: Some(24),
            ..RunProperties::default()
        };
        own.fill_from(&fallback);
        assert_eq!(own.bold, Some(false));
        assert_eq!(own.italic, Some(true));
        assert_eq!(own.size, Some(24));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(RunContent::Tab.type_name(), "tab");
        assert_eq!(RunContent::Other("sym".into()).type_name(), "sym");
    }
}
