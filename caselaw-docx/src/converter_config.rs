//! Converter configuration from caselaw-docx.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "caselaw-docx.toml";

/// Conversion policy used by the two ingestion contexts
///
/// The contexts disagree on which style names mark a border number and on
/// how paragraphs with an unresolvable list level are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// `RandNummer`/`ListParagraph`, list entries are always wrapped
    #[default]
    Standard,
    /// `RandNummer`/`Randziffern`, list entries need a level definition
    Alternative,
}

impl Profile {
    /// Border number style names recognised by this profile
    pub fn border_number_styles(self) -> BTreeSet<String> {
        let names: &[&str] = match self {
            Profile::Standard => &["RandNummer", "ListParagraph"],
            Profile::Alternative => &["RandNummer", "Randziffern"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Numbering fallback of this profile
    pub fn numbering_fallback(self) -> NumberingFallback {
        match self {
            Profile::Standard => NumberingFallback::AlwaysWrap,
            Profile::Alternative => NumberingFallback::RequireLevelDefinition,
        }
    }
}

/// Treatment of numbered paragraphs whose level cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingFallback {
    /// Wrap the paragraph in a list entry with a default bullet level
    AlwaysWrap,
    /// Render the paragraph as a plain paragraph
    RequireLevelDefinition,
}

/// Converter configuration from caselaw-docx.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Conversion policy
    pub profile: Profile,

    /// Explicit border number style names, replacing the profile's set
    pub border_number_styles: Option<BTreeSet<String>>,

    /// Style name that marks a border number when the paragraph is framed
    pub framed_border_number_style: String,

    /// Explicit numbering fallback, replacing the profile's policy
    pub numbering_fallback: Option<NumberingFallback>,

    /// Scale factor for rasterising vector images
    pub emf_supersampling: u32,

    /// Left margin in pixels for indented paragraphs
    pub list_indent_px: u32,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Standard,
            border_number_styles: None,
            framed_border_number_style: "Listenabsatz".to_string(),
            numbering_fallback: None,
            emf_supersampling: 2,
            list_indent_px: 40,
        }
    }
}

impl ConverterConfig {
    /// Default configuration for a profile
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Style names that mark a border number
    pub fn border_number_styles(&self) -> BTreeSet<String> {
        self.border_number_styles
            .clone()
            .unwrap_or_else(|| self.profile.border_number_styles())
    }

    /// Effective numbering fallback
    pub fn numbering_fallback(&self) -> NumberingFallback {
        self.numbering_fallback
            .unwrap_or_else(|| self.profile.numbering_fallback())
    }

    /// Load configuration from a caselaw-docx.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ConverterConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(ConfigError::IoError)?;

        let config: ConverterConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        Ok(config)
    }

    /// Save configuration to a caselaw-docx.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the configuration file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(ConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving the configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_differ() {
        let standard = ConverterConfig::default();
        assert!(standard.border_number_styles().contains("ListParagraph"));
        assert_eq!(standard.numbering_fallback(), NumberingFallback::AlwaysWrap);

        let alternative = ConverterConfig::for_profile(Profile::Alternative);
        assert!(alternative.border_number_styles().contains("Randziffern"));
        assert!(!alternative.border_number_styles().contains("ListParagraph"));
        assert_eq!(
            alternative.numbering_fallback(),
            NumberingFallback::RequireLevelDefinition
        );
    }

    #[test]
    fn test_explicit_overrides_win() {
        let config = ConverterConfig {
            border_number_styles: Some(["Rn".to_string()].into_iter().collect()),
            numbering_fallback: Some(NumberingFallback::RequireLevelDefinition),
            ..ConverterConfig::default()
        };
        assert_eq!(config.border_number_styles().len(), 1);
        assert_eq!(
            config.numbering_fallback(),
            NumberingFallback::RequireLevelDefinition
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ConverterConfig = toml::from_str("profile = \"alternative\"").unwrap();
        assert_eq!(config.profile, Profile::Alternative);
        assert_eq!(config.emf_supersampling, 2);
        assert_eq!(config.framed_border_number_style, "Listenabsatz");
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = ConverterConfig {
            list_indent_px: 24,
            ..ConverterConfig::for_profile(Profile::Alternative)
        };
        config.save(&path).unwrap();
        assert_eq!(ConverterConfig::load(&path).unwrap(), config);
    }
}
