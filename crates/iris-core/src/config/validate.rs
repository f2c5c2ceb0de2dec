//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Uploads are buffered in memory, so the ceiling stays well below RAM sizes.
const MAX_UPLOAD_MB: u64 = 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_UPLOAD_MB).contains(&self.limits.max_upload_mb) {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_upload_mb must be between 1 and {MAX_UPLOAD_MB}"
            )));
        }
        if self.limits.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.request_timeout_ms must be > 0".into(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_tokens must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        let models = [
            ("providers.openai.model", &self.providers.openai.model),
            ("providers.anthropic.model", &self.providers.anthropic.model),
            ("providers.gemini.model", &self.providers.gemini.model),
        ];
        for (field, model) in models {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_upload_mb"));
    }

    #[test]
    fn test_validate_rejects_huge_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = u64::MAX;
        assert_eq!(config.limits.max_upload_bytes(), u64::MAX);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_upload_mb"));

        config.limits.max_upload_mb = 1024;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.limits.request_timeout_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.generation.temperature = 2.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.generation.temperature = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.providers.gemini.model = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("providers.gemini.model"));
    }
}
