//! Segmentation configuration.
//!
//! Extends the core configuration with the set of boundary kinds that may be
//! requested. Serialized as flat TOML:
//!
//! ```toml
//! encoding_forms = ["utf8", "utf16"]
//! segmentation = ["grapheme", "word"]
//! ```

use serde::{Deserialize, Serialize};
use unicorn_core::{Error, Result};

use crate::BoundaryKind;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Encoding forms accepted as input.
    #[serde(flatten)]
    pub base: unicorn_core::Config,

    /// Boundary kinds that may be requested.
    pub segmentation: Vec<BoundaryKind>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            base: unicorn_core::Config::default(),
            segmentation: BoundaryKind::ALL.to_vec(),
        }
    }
}

impl SegmenterConfig {
    /// Convert this config into the base config.
    pub fn into_base(self) -> unicorn_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &unicorn_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut unicorn_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: SegmenterConfig = toml::from_str(&content)?;
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

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn is_enabled(&self, kind: BoundaryKind) -> bool {
        self.segmentation.contains(&kind)
    }

    /// Reject a boundary kind that is switched off.
    pub fn check_kind(&self, kind: BoundaryKind) -> Result<()> {
        if self.is_enabled(kind) {
            Ok(())
        } else {
            tracing::warn!(%kind, "rejecting a disabled boundary kind");
            Err(Error::FeatureDisabled(format!("{kind} segmentation")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicorn_core::EncodingForm;

    #[test]
    fn test_flat_toml() {
        let config = SegmenterConfig::from_toml_str(
            "encoding_forms = [\"utf8\"]\nsegmentation = [\"word\"]\n",
        )
        .unwrap();
        assert_eq!(config.base.encoding_forms, vec![EncodingForm::Utf8]);
        assert_eq!(config.segmentation, vec![BoundaryKind::Word]);
        assert!(!config.is_enabled(BoundaryKind::Sentence));

        let round_trip = SegmenterConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(round_trip, config);
    }

    #[test]
    fn test_defaults() {
        let config = SegmenterConfig::from_toml_str("").unwrap();
        assert_eq!(config, SegmenterConfig::default());
        assert!(config.check_kind(BoundaryKind::Grapheme).is_ok());
        assert_eq!(config.clone().into_base(), unicorn_core::Config::default());
    }

    #[test]
    fn test_disabled_kind() {
        let mut config = SegmenterConfig::default();
        config.segmentation.retain(|&k| k != BoundaryKind::Sentence);
        config.base_mut().encoding_forms.clear();
        assert_eq!(
            config.check_kind(BoundaryKind::Sentence),
            Err(Error::FeatureDisabled("sentence segmentation".into()))
        );
        assert!(config.base().encoding_forms.is_empty());
    }
}
