//! Optional YAML configuration for the vendor naming guesses and the fill pools.
//! Every section and key is optional; anything absent takes the built-in default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::error::{CatalogError, Result};
use crate::fields::FieldDefaults;
use crate::gallery::CandidateConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub gallery: CandidateConfig,
    pub fields: FieldDefaults,
}

impl PatchConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        // An empty document deserializes as unit; treat it as "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)
            .map_err(|err| CatalogError::Config(format!("unable to parse yaml: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.gallery.validate().map_err(CatalogError::Config)?;
        self.fields.validate().map_err(CatalogError::Config)?;
        Ok(())
    }
}

/// Load from `path`, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<PatchConfig> {
    let Some(path) = path else {
        return Ok(PatchConfig::default());
    };
    let raw = fs::read_to_string(path).map_err(|err| {
        CatalogError::Config(format!("unable to read '{}': {err}", path.display()))
    })?;
    let config = PatchConfig::from_yaml_str(&raw)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(PatchConfig::from_yaml_str("").unwrap(), PatchConfig::default());
        assert_eq!(load_config(None).unwrap(), PatchConfig::default());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let yaml = r#"
gallery:
  cdn_base: "https://cdn.example.com/apps/cms/img/"
  max_candidates: 2
  suffixes:
    - { token: p }
    - { token: fc, base_sku: true }
fields:
  warranty_months: [6, 12]
"#;
        let config = PatchConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.gallery.cdn_base, "https://cdn.example.com/apps/cms/img/");
        assert_eq!(config.gallery.max_candidates, 2);
        assert_eq!(config.gallery.suffixes.len(), 2);
        assert!(config.gallery.suffixes[1].base_sku);
        assert_eq!(config.gallery.resolution_suffix, "_1500px.png");
        assert_eq!(config.gallery.strip_trailing, Some('z'));
        assert_eq!(config.fields.warranty_months, vec![6, 12]);
        assert_eq!(config.fields.shipping_days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn limit_above_three_is_rejected() {
        let err = PatchConfig::from_yaml_str("gallery:\n  max_candidates: 4\n").unwrap_err();
        assert!(matches!(err, CatalogError::Config(ref msg) if msg.contains("max_candidates")));
    }

    #[test]
    fn strip_trailing_can_be_disabled() {
        let config = PatchConfig::from_yaml_str("gallery:\n  strip_trailing: ~\n").unwrap();
        assert_eq!(config.gallery.strip_trailing, None);
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("missing.yaml"))).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }
}
