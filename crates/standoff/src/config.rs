use anyhow::{Context, Result};
use repair::RepairConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub repair: RepairConfig,
    /// Pretty-print standoff JSON instead of one document per line.
    pub pretty: bool,
}

impl ConvertConfig {
    pub fn strict() -> Self {
        Self {
            repair: RepairConfig::strict(),
            pretty: false,
        }
    }

    pub fn lenient() -> Self {
        Self {
            repair: RepairConfig::lenient(),
            pretty: false,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse config")?;
        config.repair.validate()?;
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .context(format!("Failed to read config: {:?}", path))?;
        Self::from_json(&content).context(format!("Invalid config: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = ConvertConfig::from_json(r#"{"repair": {"window": 60}}"#).unwrap();
        assert_eq!(config.repair.window, 60);
        assert_eq!(config.repair.min_similarity_ratio, 0.80);
        assert!(!config.pretty);

        assert_eq!(ConvertConfig::from_json("{}").unwrap(), ConvertConfig::default());
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let err = ConvertConfig::from_json(r#"{"repair": {"min_similarity_ratio": 1.5}}"#).unwrap_err();
        assert!(err.to_string().contains("min_similarity_ratio"), "{}", err);
    }

    #[test]
    fn test_presets() {
        assert_eq!(ConvertConfig::strict().repair, RepairConfig::strict());
        assert_eq!(ConvertConfig::lenient().repair, RepairConfig::lenient());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"pretty": true, "repair": {{"window": 240}}}}"#).unwrap();

        let config = ConvertConfig::load(file.path()).await.unwrap();
        assert!(config.pretty);
        assert_eq!(config.repair.window, 240);
    }
}
