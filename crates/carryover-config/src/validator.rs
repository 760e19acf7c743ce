//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_gateway(config, &mut result);
        Self::validate_extractor(config, &mut result);
        Self::validate_router(config, &mut result);
        Self::validate_storage(config, &mut result);

        result
    }

    fn validate_gateway(config: &Config, result: &mut ValidationResult) {
        match url::Url::parse(&config.gateway.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                "gateway.base_url",
                "base_url must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "gateway.base_url",
                format!("base_url is not a valid URL: {}", e),
            )),
        }

        if config.gateway.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "gateway.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_extractor(config: &Config, result: &mut ValidationResult) {
        let max_chars = config.extractor.max_chars;
        if max_chars > 0 && max_chars < 100 {
            result.add_warning(ValidationWarning::new(
                "extractor.max_chars",
                "max_chars is very small (<100), extracted conversations will be mostly cut off",
            ));
        }

        if config
            .extractor
            .speaker_prefixes
            .iter()
            .any(|p| p.trim().is_empty())
        {
            result.add_error(ValidationError::new(
                "extractor.speaker_prefixes",
                "speaker prefixes cannot be empty",
            ));
        }
    }

    fn validate_router(config: &Config, result: &mut ValidationResult) {
        if config.router.response_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "router.response_timeout_secs",
                "response_timeout_secs must be greater than 0",
            ));
        }

        if config.router.settle_delay_ms > 10_000 {
            result.add_warning(ValidationWarning::new(
                "router.settle_delay_ms",
                "settle_delay_ms is very high (>10s), injections will feel sluggish",
            ));
        }

        if config.router.default_word_limit == 0 {
            result.add_error(ValidationError::new(
                "router.default_word_limit",
                "default_word_limit must be greater than 0",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.path",
                "Storage path cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
