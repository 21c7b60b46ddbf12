//! Validation of service-specific options JSON.
//!
//! Called from [`ServiceConfig::validate`](crate::api::ServiceConfig::validate)
//! so that a misspelled key or a wrongly typed value is rejected before any
//! client is built.

use crate::api::{LanguageSelection, ServiceKind};
use crate::error::{Result, ServiceError};
use serde_json::Value;

/// Keys accepted by every service.
const COMMON_KEYS: &[&str] = &["api_key_env", "headers"];

/// Keys accepted by services that authenticate with username/password.
const BASIC_AUTH_KEYS: &[&str] = &["username_env", "password_env"];

/// Validate the `options` object for `service`.
pub fn validate_service_options(service: ServiceKind, options: &Value) -> Result<()> {
    let Some(map) = as_object(service, options)? else {
        return Ok(());
    };

    let extra: &[&str] = match service {
        ServiceKind::NaturalLanguageClassifier | ServiceKind::LanguageTranslation => {
            BASIC_AUTH_KEYS
        }
        ServiceKind::VisualRecognition => &["version"],
        ServiceKind::AlchemyLanguage => &["language"],
        ServiceKind::AlchemyVision => &[],
    };

    for key in map.keys() {
        if !COMMON_KEYS.contains(&key.as_str()) && !extra.contains(&key.as_str()) {
            return Err(ServiceError::Config(format!(
                "Unknown option '{}' for service '{}'",
                key, service
            )));
        }
    }

    require_string_keys(service, map, &["api_key_env", "username_env", "password_env"])?;
    require_string_map(service, map, "headers")?;

    if service == ServiceKind::VisualRecognition
        && let Some(value) = map.get("version")
    {
        let Some(version) = value.as_str() else {
            return Err(ServiceError::Config(format!(
                "Option 'version' for service '{}' must be a string",
                service
            )));
        };
        if !is_version_date(version) {
            return Err(ServiceError::Config(format!(
                "Option 'version' for service '{}' must be a YYYY-MM-DD date, got '{}'",
                service, version
            )));
        }
    }

    if service == ServiceKind::AlchemyLanguage
        && let Some(value) = map.get("language")
    {
        let known = value.as_str().and_then(LanguageSelection::from_name);
        if known.is_none() {
            return Err(ServiceError::Config(format!(
                "Option 'language' for service '{}' must be one of: {}",
                service,
                LanguageSelection::ALL
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }

    Ok(())
}

/// Parse `options` as a JSON object map, returning `None` for null and an
/// error for non-object types.
fn as_object(
    service: ServiceKind,
    options: &Value,
) -> Result<Option<&serde_json::Map<String, Value>>> {
    match options {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ServiceError::Config(format!(
            "Options for service '{}' must be a JSON object or null",
            service
        ))),
    }
}

/// Require that all specified keys, if present, are strings.
fn require_string_keys(
    service: ServiceKind,
    map: &serde_json::Map<String, Value>,
    keys: &[&str],
) -> Result<()> {
    for key in keys {
        if let Some(value) = map.get(*key)
            && !value.is_string()
        {
            return Err(ServiceError::Config(format!(
                "Option '{}' for service '{}' must be a string",
                key, service
            )));
        }
    }
    Ok(())
}

/// Require that the named key, if present, is an object of string values.
fn require_string_map(
    service: ServiceKind,
    map: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<()> {
    let Some(value) = map.get(key) else {
        return Ok(());
    };
    let valid = value
        .as_object()
        .is_some_and(|headers| headers.values().all(Value::is_string));
    if !valid {
        return Err(ServiceError::Config(format!(
            "Option '{}' for service '{}' must be an object of string values",
            key, service
        )));
    }
    Ok(())
}

/// `YYYY-MM-DD` shape check; the service itself decides which dates exist.
fn is_version_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_date_shape() {
        assert!(is_version_date("2016-05-19"));
        assert!(!is_version_date("2016-5-19"));
        assert!(!is_version_date("20160519"));
        assert!(!is_version_date("2016/05/19"));
    }

    #[test]
    fn null_options_accepted_for_every_service() {
        for service in [
            ServiceKind::NaturalLanguageClassifier,
            ServiceKind::LanguageTranslation,
            ServiceKind::VisualRecognition,
            ServiceKind::AlchemyLanguage,
            ServiceKind::AlchemyVision,
        ] {
            assert!(validate_service_options(service, &Value::Null).is_ok());
        }
    }

    #[test]
    fn basic_auth_keys_only_for_basic_auth_services() {
        let opts = json!({"username_env": "U", "password_env": "P"});
        assert!(validate_service_options(ServiceKind::LanguageTranslation, &opts).is_ok());
        assert!(validate_service_options(ServiceKind::AlchemyVision, &opts).is_err());
    }
}
