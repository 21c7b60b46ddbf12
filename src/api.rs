//! Public configuration types: which service a client talks to, where, and
//! with which call policy.

use crate::error::{Result, ServiceError};
use crate::options_validation::validate_service_options;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The remote service a client is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Short-text classification against a trained classifier.
    NaturalLanguageClassifier,
    /// Text translation and language identification.
    LanguageTranslation,
    /// Image classification, face detection, and text recognition.
    VisualRecognition,
    /// AlchemyAPI text analysis (taxonomy, keywords, entities, ...).
    AlchemyLanguage,
    /// AlchemyAPI image analysis (keywords, faces, links).
    AlchemyVision,
}

impl ServiceKind {
    /// Name under which the platform publishes this service's credentials
    /// (a `VCAP_SERVICES` key and the prefix of `<NAME>_APIKEY`-style env vars).
    pub fn credentials_name(&self) -> &'static str {
        match self {
            Self::NaturalLanguageClassifier => "natural_language_classifier",
            Self::LanguageTranslation => "language_translation",
            Self::VisualRecognition => "visual_recognition",
            Self::AlchemyLanguage | Self::AlchemyVision => "alchemy_api",
        }
    }

    /// Endpoint used when neither the config nor the credentials name one.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::NaturalLanguageClassifier => {
                "https://gateway.watsonplatform.net/natural-language-classifier/api"
            }
            Self::LanguageTranslation => "https://gateway.watsonplatform.net/language-translation/api",
            Self::VisualRecognition => "https://gateway-a.watsonplatform.net/visual-recognition/api",
            Self::AlchemyLanguage | Self::AlchemyVision => "https://gateway-a.watsonplatform.net/calls",
        }
    }

    /// Stable snake_case name, as used in config files and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaturalLanguageClassifier => "natural_language_classifier",
            Self::LanguageTranslation => "language_translation",
            Self::VisualRecognition => "visual_recognition",
            Self::AlchemyLanguage => "alchemy_language",
            Self::AlchemyVision => "alchemy_vision",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language hint sent with AlchemyLanguage calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LanguageSelection {
    /// Let the service detect the language. No parameter is sent.
    #[default]
    Detect,
    Arabic,
    English,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

impl LanguageSelection {
    /// Every selectable language, `Detect` included.
    pub const ALL: [LanguageSelection; 10] = [
        Self::Detect,
        Self::Arabic,
        Self::English,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
        Self::Russian,
        Self::Spanish,
        Self::Swedish,
    ];

    /// The lower-case name used as the `language` form parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Arabic => "arabic",
            Self::English => "english",
            Self::French => "french",
            Self::German => "german",
            Self::Italian => "italian",
            Self::Portuguese => "portuguese",
            Self::Russian => "russian",
            Self::Spanish => "spanish",
            Self::Swedish => "swedish",
        }
    }

    /// Parse a lower-case language name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }
}

/// Declarative description of one service client.
///
/// A configuration catalog is a `Vec<ServiceConfig>`, built in code or parsed
/// from JSON with [`catalog_from_str`] / [`catalog_from_file`].
///
/// # Example JSON
///
/// ```json
/// {
///   "service": "visual_recognition",
///   "timeout": 30,
///   "retry": { "max_attempts": 3, "initial_backoff_ms": 200 },
///   "options": { "api_key_env": "VR_KEY", "version": "2016-05-19" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Which service this client calls.
    pub service: ServiceKind,
    /// Base URL override. Defaults to the credentials URL, then
    /// [`ServiceKind::default_endpoint`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Per-call timeout in seconds. `None` means no timeout beyond the
    /// transport's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Retry policy for transient failures. `None` sends each request once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    /// Service-specific options (`api_key_env`, `version`, `language`, ...).
    #[serde(default)]
    pub options: serde_json::Value,
}

impl ServiceConfig {
    /// A config for `service` with every field at its default.
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            endpoint: None,
            timeout: None,
            retry: None,
            options: serde_json::Value::Null,
        }
    }

    /// Validate invariants: non-empty http(s) endpoint, non-zero timeout,
    /// sane retry policy, and known service options.
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            if endpoint.is_empty() {
                return Err(ServiceError::Config("Endpoint cannot be empty".to_string()));
            }
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ServiceError::Config(format!(
                    "Endpoint '{}' must be an http(s) URL",
                    endpoint
                )));
            }
        }
        if self.timeout == Some(0) {
            return Err(ServiceError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }
        if let Some(retry) = &self.retry
            && retry.max_attempts == 0
        {
            return Err(ServiceError::Config(
                "Retry max_attempts must be greater than 0".to_string(),
            ));
        }
        validate_service_options(self.service, &self.options)
    }

    /// Read a string option, if present.
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    /// Parse a single `ServiceConfig` from a JSON value.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| ServiceError::Config(format!("Invalid ServiceConfig JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a single `ServiceConfig` from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| ServiceError::Config(format!("Invalid ServiceConfig JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration for exponential-backoff retries on transient failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial call).
    pub max_attempts: u32,
    /// Base delay in milliseconds; doubled on each subsequent attempt.
    pub initial_backoff_ms: u64,
}

impl RetryConfig {
    /// Compute the backoff duration for the given 1-based `attempt` number.
    ///
    /// Uses `initial_backoff_ms * 2^(attempt - 1)` with saturating arithmetic.
    pub fn get_backoff(&self, attempt: u32) -> std::time::Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        std::time::Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
        }
    }
}

/// Parse a catalog (array) of `ServiceConfig` from a JSON string.
///
/// Each service may appear at most once.
pub fn catalog_from_str(s: &str) -> Result<Vec<ServiceConfig>> {
    let configs: Vec<ServiceConfig> = serde_json::from_str(s)
        .map_err(|e| ServiceError::Config(format!("Invalid catalog JSON: {}", e)))?;
    let mut seen = HashSet::new();
    for config in &configs {
        config.validate()?;
        if !seen.insert(config.service) {
            return Err(ServiceError::Config(format!(
                "Duplicate service '{}' in catalog",
                config.service
            )));
        }
    }
    Ok(configs)
}

/// Read and parse a catalog from a JSON file.
pub fn catalog_from_file(path: impl AsRef<Path>) -> Result<Vec<ServiceConfig>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ServiceError::Config(format!(
            "Failed to read catalog file '{}': {}",
            path.display(),
            e
        ))
    })?;
    catalog_from_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VALID_JSON: &str = r#"{
        "service": "natural_language_classifier",
        "endpoint": "http://localhost:9000/nlc/api"
    }"#;

    const VALID_CATALOG_JSON: &str = r#"[
        {
            "service": "language_translation",
            "timeout": 30
        },
        {
            "service": "visual_recognition",
            "retry": { "max_attempts": 4, "initial_backoff_ms": 50 },
            "options": { "api_key_env": "VR_KEY", "version": "2016-05-19" }
        }
    ]"#;

    #[test]
    fn from_json_str_parses_valid_config() {
        let config = ServiceConfig::from_json_str(VALID_JSON).unwrap();
        assert_eq!(config.service, ServiceKind::NaturalLanguageClassifier);
        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://localhost:9000/nlc/api")
        );
        assert!(config.retry.is_none());
        assert!(config.options.is_null());
    }

    #[test]
    fn from_json_value_parses_options() {
        let config = ServiceConfig::from_json(json!({
            "service": "alchemy_language",
            "options": { "language": "french" }
        }))
        .unwrap();
        assert_eq!(config.option_str("language"), Some("french"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let json = r#"{"service":"language_translation","timeout":0}"#;
        let err = ServiceConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("Timeout must be greater than 0"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let json = r#"{"service":"language_translation","endpoint":"ftp://host"}"#;
        assert!(ServiceConfig::from_json_str(json).is_err());
    }

    #[test]
    fn rejects_unknown_service() {
        let json = r#"{"service":"tone_analyzer"}"#;
        assert!(ServiceConfig::from_json_str(json).is_err());
    }

    #[test]
    fn catalog_from_str_parses_array() {
        let configs = catalog_from_str(VALID_CATALOG_JSON).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].timeout, Some(30));
        assert_eq!(configs[1].retry.as_ref().unwrap().max_attempts, 4);
        assert_eq!(configs[1].options["version"], "2016-05-19");
    }

    #[test]
    fn catalog_from_str_rejects_duplicate_service() {
        let json = r#"[{"service":"alchemy_vision"},{"service":"alchemy_vision"}]"#;
        let err = catalog_from_str(json).unwrap_err();
        assert!(err.to_string().contains("Duplicate service"));
    }

    #[test]
    fn catalog_from_file_reads_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");
        std::fs::write(&path, VALID_CATALOG_JSON).unwrap();
        let configs = catalog_from_file(&path).unwrap();
        assert_eq!(configs.len(), 2);
    }

    #[test]
    fn catalog_from_file_errors_on_missing_file() {
        assert!(catalog_from_file("/nonexistent/path/services.json").is_err());
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let retry = RetryConfig {
            max_attempts: 5,
            initial_backoff_ms: 100,
        };
        assert_eq!(retry.get_backoff(1).as_millis(), 100);
        assert_eq!(retry.get_backoff(2).as_millis(), 200);
        assert_eq!(retry.get_backoff(4).as_millis(), 800);
        assert_eq!(retry.get_backoff(200), std::time::Duration::from_millis(u64::MAX));
    }

    #[test]
    fn alchemy_services_share_credentials_name() {
        assert_eq!(
            ServiceKind::AlchemyLanguage.credentials_name(),
            ServiceKind::AlchemyVision.credentials_name()
        );
        assert_eq!(
            ServiceKind::AlchemyVision.default_endpoint(),
            "https://gateway-a.watsonplatform.net/calls"
        );
    }

    #[test]
    fn language_selection_round_trips_names() {
        for lang in LanguageSelection::ALL {
            assert_eq!(LanguageSelection::from_name(lang.as_str()), Some(lang));
        }
        assert_eq!(LanguageSelection::from_name("klingon"), None);
    }
}
