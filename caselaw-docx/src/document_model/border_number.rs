//! Border numbers (Randnummern)

use super::{escape_html, DocumentElement};

/// A marginal paragraph number and the content nested under it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderNumber {
    /// Number text collected from the source paragraph's runs
    ///
    /// Usually empty; the post-processor fills in a running number.
    pub number: String,
    /// Numbering id of the source paragraph, if it had one
    pub numbering_id: Option<String>,
    /// Elements re-parented under this number
    pub children: Vec<DocumentElement>,
}

impl BorderNumber {
    /// Create a border number without children
    pub fn new(number: impl Into<String>, numbering_id: Option<String>) -> Self {
        Self {
            number: number.into(),
            numbering_id,
            children: Vec::new(),
        }
    }

    /// Render as `<border-number>` with `<number>` and optional `<content>`
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<border-number><number>{}</number>",
            escape_html(&self.number)
        );
        if !self.children.is_empty() {
            html.push_str("<content>");
            for child in &self.children {
                html.push_str(&child.to_html());
            }
            html.push_str("</content>");
        }
        html.push_str("</border-number>");
        html
    }
}
