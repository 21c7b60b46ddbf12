//! Service credentials and their resolution from the environment.
//!
//! Lookup order for a service name such as `language_translation`:
//!
//! 1. The `VCAP_SERVICES` JSON document published by the hosting platform
//!    (first binding for that service name wins).
//! 2. `<NAME>_USERNAME` / `<NAME>_PASSWORD` / `<NAME>_APIKEY` / `<NAME>_URL`
//!    environment variables, with the service name upper-cased.

use crate::error::{Result, ServiceError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

/// The environment variable holding the platform's service bindings.
pub const VCAP_SERVICES: &str = "VCAP_SERVICES";

const BASIC: &str = "Basic ";

/// Credentials used to authenticate calls.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username and password, sent as an HTTP basic `Authorization` header.
    Basic { username: String, password: String },
    /// An API key. Header-authenticated services treat it as pre-encoded
    /// basic credentials; query-authenticated services send it verbatim.
    ApiKey(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"***").finish(),
        }
    }
}

impl Credentials {
    /// Username/password credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// API-key credentials.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                format!("{}{}", BASIC, STANDARD.encode(format!("{}:{}", username, password)))
            }
            Self::ApiKey(key) if key.starts_with(BASIC) => key.clone(),
            Self::ApiKey(key) => format!("{}{}", BASIC, key),
        }
    }

    /// Reject values that still carry JSON punctuation from a copy/paste.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Basic { username, password } => {
                check_value("username", username)?;
                check_value("password", password)
            }
            Self::ApiKey(key) => check_value("api key", key),
        }
    }
}

/// `true` when a credential starts or ends with `{` or `"`.
pub fn has_bad_start_or_end_char(value: &str) -> bool {
    value.starts_with('{') || value.starts_with('"') || value.ends_with('}') || value.ends_with('"')
}

fn check_value(what: &str, value: &str) -> Result<()> {
    if has_bad_start_or_end_char(value) {
        return Err(ServiceError::Config(format!(
            "The {} shouldn't start or end with curly brackets or quotes. \
             Please remove any surrounding {{, }}, or \" characters.",
            what
        )));
    }
    Ok(())
}

/// Credentials and endpoint discovered for one service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCredentials {
    pub credentials: Option<Credentials>,
    pub url: Option<String>,
}

impl ServiceCredentials {
    /// Resolve credentials for `service_name` from `VCAP_SERVICES`, falling
    /// back to per-service environment variables.
    ///
    /// A binding that only carries a `url` still supplies the endpoint when
    /// no `<NAME>_URL` variable is set.
    pub fn from_env(service_name: &str) -> Result<Self> {
        let mut vcap_url = None;
        if let Ok(services) = std::env::var(VCAP_SERVICES) {
            let found = Self::from_vcap_str(&services, service_name)?;
            if found.credentials.is_some() {
                tracing::debug!(service = service_name, "Using credentials from VCAP_SERVICES");
                return Ok(found);
            }
            vcap_url = found.url;
        }
        let mut found = Self::from_env_vars(service_name)?;
        if found.url.is_none() {
            found.url = vcap_url;
        }
        Ok(found)
    }

    /// Read the first binding for `service_name` out of a `VCAP_SERVICES`
    /// document.
    ///
    /// A document that is not valid JSON is logged and treated as empty.
    pub fn from_vcap_str(services: &str, service_name: &str) -> Result<Self> {
        let root: Value = match serde_json::from_str(services) {
            Ok(v) => v,
            Err(e) => {
                tracing::info!(error = %e, "Error parsing VCAP_SERVICES");
                return Ok(Self::default());
            }
        };

        let Some(creds) = root
            .get(service_name)
            .and_then(|v| v.as_array())
            .and_then(|bindings| bindings.first())
            .and_then(|binding| binding.get("credentials"))
        else {
            return Ok(Self::default());
        };

        let field = |key: &str| creds.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let credentials = match (field("username"), field("password")) {
            (Some(username), Some(password)) => Some(Credentials::Basic { username, password }),
            _ => field("api_key").or_else(|| field("apikey")).map(Credentials::ApiKey),
        };
        if let Some(c) = &credentials {
            c.validate()?;
        }
        Ok(Self {
            credentials,
            url: field("url"),
        })
    }

    /// Read `<NAME>_USERNAME`, `<NAME>_PASSWORD`, `<NAME>_APIKEY`, and
    /// `<NAME>_URL`.
    pub fn from_env_vars(service_name: &str) -> Result<Self> {
        let prefix = service_name.to_uppercase();
        let var = |suffix: &str| std::env::var(format!("{}_{}", prefix, suffix)).ok();

        let credentials = match (var("USERNAME"), var("PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials::Basic { username, password }),
            _ => var("APIKEY").map(Credentials::ApiKey),
        };
        if let Some(c) = &credentials {
            c.validate()?;
        }
        Ok(Self {
            credentials,
            url: var("URL"),
        })
    }
}

/// Read credentials through the env-var indirection options of a
/// [`ServiceConfig`](crate::api::ServiceConfig): `api_key_env`, or
/// `username_env` plus `password_env`.
///
/// Returns `Ok(None)` when the options name no variables.
pub(crate) fn resolve_from_options(options: &Value) -> Result<Option<Credentials>> {
    let read = |option_key: &str| -> Result<Option<String>> {
        let Some(env_var) = options.get(option_key).and_then(|v| v.as_str()) else {
            return Ok(None);
        };
        std::env::var(env_var)
            .map(Some)
            .map_err(|_| ServiceError::Config(format!("{} env var not set", env_var)))
    };

    let credentials = if let Some(key) = read("api_key_env")? {
        Some(Credentials::ApiKey(key))
    } else {
        match (read("username_env")?, read("password_env")?) {
            (Some(username), Some(password)) => Some(Credentials::Basic { username, password }),
            (None, None) => None,
            _ => {
                return Err(ServiceError::Config(
                    "username_env and password_env must be set together".to_string(),
                ));
            }
        }
    };
    if let Some(c) = &credentials {
        c.validate()?;
    }
    Ok(credentials)
}
