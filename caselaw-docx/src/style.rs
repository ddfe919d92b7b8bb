//! Inline CSS style handling
//!
//! Parses `property: value; property: value` declarations (VML shape styles
//! use this syntax too) and holds the computed inline style of output
//! elements.

use itertools::Itertools;

/// A single `property: value` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDeclaration {
    /// CSS property name, trimmed
    pub property: String,
    /// CSS value, trimmed
    pub value: String,
}

/// Parse a semicolon delimited style string
///
/// Entries that do not contain exactly one colon are dropped.
///
/// # Parameters
/// * `style` - Style string, e.g. `"width: 10pt; height: 20pt"`
///
/// # Returns
/// * `Vec<StyleDeclaration>` - Declarations in source order
pub fn parse_style_string(style: &str) -> Vec<StyleDeclaration> {
    style
        .split(';')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            if parts.len() != 2 {
                return None;
            }
            Some(StyleDeclaration {
                property: parts[0].trim().to_string(),
                value: parts[1].trim().to_string(),
            })
        })
        .collect()
}

/// Inline style of an output element
///
/// Setting a property that already exists replaces its value in place, so
/// later style applications win over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// Create an empty style map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any earlier value
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Set a property only if it has no value yet
    pub fn set_if_absent(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        if !self.contains(&property) {
            self.entries.push((property, value.into()));
        }
    }

    /// Look up a property value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the property is set
    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Whether no property is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Render as the value of an HTML `style` attribute
    pub fn to_css(&self) -> String {
        self.entries
            .iter()
            .map(|(p, v)| format!("{}: {};", p, v))
            .join(" ")
    }

    /// Render as ` style="..."`, or nothing when empty
    pub fn to_attribute(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", self.to_css())
        }
    }
}

impl From<Vec<StyleDeclaration>> for StyleMap {
    fn from(declarations: Vec<StyleDeclaration>) -> Self {
        let mut map = StyleMap::new();
        for declaration in declarations {
            map.set(declaration.property, declaration.value);
        }
        map
    }
}
