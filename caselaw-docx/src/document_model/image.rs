//! Image elements

use super::escape_html;
use crate::style::StyleMap;

/// Side an anchored image floats to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSide {
    Left,
    Right,
}

impl FloatSide {
    /// CSS `float` value
    pub fn as_css(self) -> &'static str {
        match self {
            FloatSide::Left => "left",
            FloatSide::Right => "right",
        }
    }
}

/// An embedded image, ready for rendering as a data URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageElement {
    /// MIME type of `data`
    pub content_type: String,
    /// Base64 encoded image bytes
    pub data: String,
    /// Display width in pixels
    pub width: Option<i64>,
    /// Display height in pixels
    pub height: Option<i64>,
    /// Whether the image comes from an anchored drawing
    pub anchored: bool,
    /// Float side of anchored images
    pub float: Option<FloatSide>,
    /// Alternative text
    pub alt: Option<String>,
    /// Additional inline style
    pub style: StyleMap,
}

impl ImageElement {
    /// Render as an `<img>` element
    ///
    /// Zero or missing sizes are left out.
    pub fn to_html(&self) -> String {
        let mut html = format!("<img src=\"data:{};base64,{}\"", self.content_type, self.data);
        if let Some(alt) = &self.alt {
            html.push_str(&format!(" alt=\"{}\"", escape_html(alt)));
        }
        if let Some(width) = self.width.filter(|w| *w > 0) {
            html.push_str(&format!(" width=\"{}\"", width));
        }
        if let Some(height) = self.height.filter(|h| *h > 0) {
            html.push_str(&format!(" height=\"{}\"", height));
        }
        let mut style = self.style.clone();
        if let Some(float) = self.float {
            style.set("float", float.as_css());
        }
        html.push_str(&style.to_attribute());
        html.push_str("/>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_omitted() {
        let image = ImageElement {
            content_type: "image/png".into(),
            data: "AAAA".into(),
            width: Some(0),
            height: Some(20),
            ..ImageElement::default()
        };
        assert_eq!(
            image.to_html(),
            "<img src=\"data:image/png;base64,AAAA\" height=\"20\"/>"
        );
    }

    #[test]
    fn test_float_style() {
        let image = ImageElement {
            content_type: "image/png".into(),
            data: String::new(),
            anchored: true,
            float: Some(FloatSide::Right),
            ..ImageElement::default()
        };
        assert!(image.to_html().ends_with(" style=\"float: right;\"/>"));
    }
}
