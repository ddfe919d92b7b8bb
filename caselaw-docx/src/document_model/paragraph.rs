//! Paragraph and run elements

use super::image::ImageElement;
use super::{escape_html, ErrorElement};
use crate::style::StyleMap;

/// Glyph rendered for a tab (em space)
pub const TAB_GLYPH: &str = "\u{2003}";

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Center,
    Justify,
}

impl Alignment {
    /// Map a `w:jc` value; `None` for values without an HTML counterpart
    pub fn from_justification(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "right" | "end" => Some(Alignment::Right),
            "center" => Some(Alignment::Center),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }

    /// CSS `text-align` value
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Justify => "justify",
        }
    }
}

/// Vertical text position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Superscript,
    Subscript,
}

/// A run of text with uniform formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextElement {
    /// Unescaped text
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    /// Underline kind as written in the source (`single`, `double`, ...)
    pub underline: Option<String>,
    pub vertical_align: Option<VerticalAlign>,
    /// Font size in points
    pub size: Option<f32>,
    /// CSS color, e.g. `#1F3864`
    pub color: Option<String>,
    pub font_family: Option<String>,
}

impl TextElement {
    /// Create an unformatted text element
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Computed inline style of the span
    pub fn style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        if self.bold {
            style.set("font-weight", "bold");
        }
        if self.italic {
            style.set("font-style", "italic");
        }
        let underline = self.underline.as_deref().filter(|u| *u != "none");
        match (underline.is_some(), self.strike) {
            (true, true) => style.set("text-decoration", "underline line-through"),
            (true, false) => style.set("text-decoration", "underline"),
            (false, true) => style.set("text-decoration", "line-through"),
            (false, false) => {}
        }
        if let Some(decoration_style) = underline.and_then(underline_style) {
            style.set("text-decoration-style", decoration_style);
        }
        match self.vertical_align {
            Some(VerticalAlign::Superscript) => style.set("vertical-align", "super"),
            Some(VerticalAlign::Subscript) => style.set("vertical-align", "sub"),
            None => {}
        }
        if let Some(size) = self.size {
            style.set("font-size", format!("{}pt", size));
        }
        if let Some(color) = &self.color {
            style.set("color", color.clone());
        }
        if let Some(font) = &self.font_family {
            style.set("font-family", format!("'{}'", font));
        }
        style
    }

    /// Render as escaped text, wrapped in a span when styled
    pub fn to_html(&self) -> String {
        let style = self.style();
        if style.is_empty() {
            escape_html(&self.text)
        } else {
            format!(
                "<span{}>{}</span>",
                style.to_attribute(),
                escape_html(&self.text)
            )
        }
    }
}

fn underline_style(kind: &str) -> Option<&'static str> {
    match kind {
        "double" => Some("double"),
        "dotted" => Some("dotted"),
        "dash" | "dashLong" => Some("dashed"),
        "wave" => Some("wavy"),
        _ => None,
    }
}

/// Inline content of a paragraph
#[derive(Debug, Clone, PartialEq)]
pub enum RunElement {
    /// Styled text
    Text(TextElement),
    /// Tab placeholder
    Tab,
    /// Line break
    LineBreak,
    /// Inline or floating image
    Image(ImageElement),
    /// Visible error marker
    Error(ErrorElement),
}

impl RunElement {
    /// Whether this is a floating image
    pub fn is_anchored_image(&self) -> bool {
        matches!(self, RunElement::Image(image) if image.anchored)
    }

    /// Render as HTML
    pub fn to_html(&self) -> String {
        match self {
            RunElement::Text(text) => text.to_html(),
            RunElement::Tab => TAB_GLYPH.to_string(),
            RunElement::LineBreak => "<br/>".to_string(),
            RunElement::Image(image) => image.to_html(),
            RunElement::Error(error) => error.to_html(),
        }
    }
}

/// A converted paragraph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphElement {
    /// Inline content in rendering order
    pub runs: Vec<RunElement>,
    /// Resolved alignment
    pub alignment: Option<Alignment>,
    /// Named paragraph style id
    pub style_reference: Option<String>,
    /// Computed inline style
    pub style: StyleMap,
}

impl ParagraphElement {
    /// Set the alignment and its `text-align` declaration
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = Some(alignment);
        self.style.set("text-align", alignment.as_css());
    }

    /// Whether the inline style centers the text
    pub fn is_centered(&self) -> bool {
        self.style.get("text-align") == Some("center")
    }

    /// Concatenated text of all text runs
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|run| match run {
                RunElement::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Render the runs without the enclosing `<p>`
    pub fn inner_html(&self) -> String {
        self.runs.iter().map(RunElement::to_html).collect()
    }

    /// Render as a `<p>` element
    pub fn to_html(&self) -> String {
        self.to_html_with_prefix("")
    }

    /// Render as a `<p>` element with raw markup placed before the runs
    pub fn to_html_with_prefix(&self, prefix: &str) -> String {
        let class = self
            .style_reference
            .as_ref()
            .map(|s| format!(" class=\"{}\"", escape_html(s)))
            .unwrap_or_default();
        format!(
            "<p{}{}>{}{}</p>",
            class,
            self.style.to_attribute(),
            prefix,
            self.inner_html()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_span() {
        assert_eq!(TextElement::new("a < b").to_html(), "a &lt; b");
    }

    #[test]
    fn test_styled_text() {
        let text = TextElement {
            text: "x".into(),
            bold: true,
            underline: Some("single".into()),
            strike: true,
            size: Some(10.5),
            ..TextElement::default()
        };
        assert_eq!(
            text.to_html(),
            "<span style=\"font-weight: bold; text-decoration: underline line-through; font-size: 10.5pt;\">x</span>"
        );
    }

    #[test]
    fn test_underline_none_is_ignored() {
        let text = TextElement {
            text: "x".into(),
            underline: Some("none".into()),
            ..TextElement::default()
        };
        assert_eq!(text.to_html(), "x");
    }

    #[test]
    fn test_paragraph_rendering() {
        let mut paragraph = ParagraphElement {
            runs: vec![
                RunElement::Text(TextElement::new("a")),
                RunElement::Tab,
                RunElement::LineBreak,
            ],
            style_reference: Some("Standard".into()),
            ..ParagraphElement::default()
        };
        paragraph.set_alignment(Alignment::Center);
        assert!(paragraph.is_centered());
        assert_eq!(
            paragraph.to_html(),
            "<p class=\"Standard\" style=\"text-align: center;\">a\u{2003}<br/></p>"
        );
    }

    #[test]
    fn test_alignment_mapping() {
        assert_eq!(Alignment::from_justification("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_justification("start"), Some(Alignment::Left));
        assert_eq!(Alignment::from_justification("numTab"), None);
    }
}
