use serde::{Deserialize, Serialize};

use crate::error::RepairError;

pub const DEFAULT_WINDOW: usize = 120;
pub const DEFAULT_MIN_SIMILARITY_RATIO: f64 = 0.80;

/// Span repair knobs.
///
/// `window` is the half-width, in chars, of the region searched around a
/// span's original start. `min_similarity_ratio` is the lowest score the
/// approximate matcher will accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub window: usize,
    pub min_similarity_ratio: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            min_similarity_ratio: DEFAULT_MIN_SIMILARITY_RATIO,
        }
    }
}

impl RepairConfig {
    /// Narrow window, high bar for approximate matches.
    pub fn strict() -> Self {
        Self {
            window: 60,
            min_similarity_ratio: 0.90,
        }
    }

    /// For text that drifted further from its spans (re-joined paragraphs, OCR).
    pub fn lenient() -> Self {
        Self {
            window: 240,
            min_similarity_ratio: 0.75,
        }
    }

    pub fn validate(&self) -> Result<(), RepairError> {
        if self.window == 0 {
            return Err(RepairError::InvalidConfig("window must be at least 1".into()));
        }
        let ratio = self.min_similarity_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(RepairError::InvalidConfig(format!(
                "min_similarity_ratio must be in (0, 1], got {}",
                ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepairConfig::default();
        assert_eq!(config.window, 120);
        assert_eq!(config.min_similarity_ratio, 0.80);
        assert!(config.validate().is_ok());
        assert!(RepairConfig::strict().validate().is_ok());
        assert!(RepairConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RepairConfig = serde_json::from_str(r#"{"window": 40}"#).unwrap();
        assert_eq!(config.window, 40);
        assert_eq!(config.min_similarity_ratio, DEFAULT_MIN_SIMILARITY_RATIO);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_window = RepairConfig {
            window: 0,
            ..Default::default()
        };
        assert!(matches!(zero_window.validate(), Err(RepairError::InvalidConfig(_))));

        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            let config = RepairConfig {
                min_similarity_ratio: ratio,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "ratio {} accepted", ratio);
        }
    }
}
