//! Numbering definition registry (`word/numbering.xml`)
//!
//! A paragraph references a numbering instance (`w:num`) and a level. The
//! instance points at an abstract definition (`w:abstractNum`) that holds
//! the per-level marker format, and may override the start value of
//! individual levels.

use super::run::RunProperties;
use std::collections::HashMap;

/// One level of an abstract numbering definition (`w:lvl`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelDefinition {
    /// Level index (`w:ilvl`), 0-based
    pub level: u32,
    /// Number format (`w:numFmt`), e.g. `decimal` or `bullet`
    pub format: Option<String>,
    /// Level text template (`w:lvlText`), e.g. `%1.%2.`
    pub text: Option<String>,
    /// Start value (`w:start`)
    pub start: Option<u32>,
    /// Restart rule (`w:lvlRestart`), 0 means never restart
    pub restart: Option<u32>,
    /// Marker justification (`w:lvlJc`)
    pub justification: Option<String>,
    /// Separator after the marker (`w:suff`): `tab`, `space` or `nothing`
    pub suffix: Option<String>,
    /// Legal numbering style (`w:isLgl`)
    pub legal: bool,
    /// Picture bullet id (`w:lvlPicBulletId`)
    pub picture_bullet_id: Option<String>,
    /// Marker run properties (`w:rPr`)
    pub run_properties: Option<RunProperties>,
}

/// An abstract numbering definition (`w:abstractNum`)
#[derive(Debug, Clone, Default)]
pub struct AbstractNumbering {
    /// `w:abstractNumId`
    pub id: String,
    /// Levels keyed by level index
    pub levels: HashMap<u32, LevelDefinition>,
}

/// A numbering instance (`w:num`)
#[derive(Debug, Clone, Default)]
pub struct NumberingInstance {
    /// Referenced abstract numbering id
    pub abstract_id: String,
    /// `w:lvlOverride/w:startOverride` values keyed by level
    pub start_overrides: HashMap<u32, u32>,
}

/// All numbering definitions of a document
#[derive(Debug, Clone, Default)]
pub struct NumberingRegistry {
    instances: HashMap<String, NumberingInstance>,
    abstracts: HashMap<String, AbstractNumbering>,
}

impl NumberingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a numbering instance under its `w:numId`
    pub fn insert_instance(&mut self, num_id: impl Into<String>, instance: NumberingInstance) {
        self.instances.insert(num_id.into(), instance);
    }

    /// Register an abstract definition
    pub fn insert_abstract(&mut self, abstract_numbering: AbstractNumbering) {
        self.abstracts
            .insert(abstract_numbering.id.clone(), abstract_numbering);
    }

    /// Whether no definitions are registered
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Resolve the level definition for a numbering id and level
    ///
    /// # Parameters
    /// * `num_id` - The paragraph's `w:numId`
    /// * `level` - The paragraph's `w:ilvl`
    ///
    /// # Returns
    /// * `Some(LevelDefinition)` - The level with instance start overrides applied
    /// * `None` - Unknown numbering id, abstract definition or level
    pub fn level(&self, num_id: &str, level: u32) -> Option<LevelDefinition> {
        let instance = self.instances.get(num_id)?;
        let abstract_numbering = self.abstracts.get(&instance.abstract_id)?;
        let mut definition = abstract_numbering.levels.get(&level)?.clone();
        if let Some(start) = instance.start_overrides.get(&level) {
            definition.start = Some(*start);
        }
        Some(definition)
    }
}
