//! unicorn-core
//!
//! Infrastructure shared by the unicorn text algorithm crates (currently
//! `unicorn-segment`).
//!
//! Public API:
//! - `Text` - Borrowed UTF-8 / UTF-16 / UTF-32 / scalar buffer with
//!   bidirectional code-point iteration and validation
//! - `Error` / `Result` - Error type reported by every algorithm
//! - `Config` - Enabled encoding forms, loadable from TOML
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod text;
pub use text::{ByteOrder, CodeUnits, Decoded, EncodingForm, Length, Text};

/// Generic configuration shared by algorithm crates.
///
/// Algorithm-specific switches (which boundary kinds are available, etc.)
/// belong in the configuration types of their own crates, which flatten this
/// one into themselves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Encoding forms accepted as input. Defaults to all of them.
    pub encoding_forms: Vec<EncodingForm>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding_forms: EncodingForm::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check if an encoding form is enabled.
    pub fn is_enabled(&self, form: EncodingForm) -> bool {
        self.encoding_forms.contains(&form)
    }

    /// Reject text whose encoding form is switched off.
    pub fn check_text(&self, text: &Text<'_>) -> Result<()> {
        let form = text.form();
        if self.is_enabled(form) {
            Ok(())
        } else {
            tracing::warn!(%form, "rejecting text in a disabled encoding form");
            Err(Error::FeatureDisabled(format!("{form} encoding")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let config = Config::default();
        for form in EncodingForm::ALL {
            assert!(config.is_enabled(form));
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            encoding_forms: vec![EncodingForm::Utf8, EncodingForm::Scalar],
        };
        let toml = config.to_toml_string().unwrap();
        assert!(toml.contains("utf8"));
        assert_eq!(Config::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_check_text() {
        let config = Config {
            encoding_forms: vec![EncodingForm::Utf8],
        };
        assert!(config.check_text(&Text::utf8(b"abc")).is_ok());
        let units = [0x61u16];
        assert_eq!(
            config.check_text(&Text::utf16(&units)),
            Err(Error::FeatureDisabled("UTF-16 encoding".into()))
        );
    }
}
