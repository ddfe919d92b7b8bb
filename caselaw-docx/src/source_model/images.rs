//! Embedded image parts

use std::collections::HashMap;

/// Raw bytes of an embedded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    /// MIME type, e.g. `image/png` or `image/x-emf`
    pub content_type: String,
    /// Undecoded part bytes
    pub bytes: Vec<u8>,
}

impl ImagePart {
    /// Whether the part is an Enhanced Metafile
    pub fn is_emf(&self) -> bool {
        matches!(
            self.content_type.as_str(),
            "image/x-emf" | "image/emf" | "application/x-msmetafile"
        )
    }
}

/// Image parts keyed by relationship id
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    parts: HashMap<String, ImagePart>,
}

impl ImageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under its relationship id
    pub fn insert(&mut self, id: impl Into<String>, part: ImagePart) {
        self.parts.insert(id.into(), part);
    }

    /// Look up an image by relationship id
    pub fn get(&self, id: &str) -> Option<&ImagePart> {
        self.parts.get(id)
    }

    /// Number of registered images
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
