//! The trait every service client implements.

use crate::api::ServiceKind;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::service::common::ServiceBase;
use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Common surface of all service clients.
///
/// Implementors only expose their [`ServiceBase`]; endpoint, credential, and
/// header configuration plus token retrieval come from the provided methods.
#[async_trait]
pub trait Service: Send + Sync {
    /// Shared transport state.
    fn base(&self) -> &ServiceBase;

    /// Mutable access to the shared transport state.
    fn base_mut(&mut self) -> &mut ServiceBase;

    /// Which service this client calls.
    fn kind(&self) -> ServiceKind {
        self.base().kind()
    }

    /// Snake_case service name used in logs and metrics.
    fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// The base URL relative request paths are resolved against.
    fn endpoint(&self) -> &str {
        self.base().endpoint()
    }

    /// Point the client at a different base URL (a mock server, a regional
    /// gateway, ...).
    fn set_endpoint(&mut self, endpoint: &str) {
        self.base_mut().set_endpoint(endpoint);
    }

    /// Replace the client's credentials.
    fn set_credentials(&mut self, credentials: Credentials) {
        self.base_mut().set_credentials(Some(credentials));
    }

    /// Shorthand for `set_credentials(Credentials::ApiKey(..))`.
    fn set_api_key(&mut self, api_key: &str) {
        self.set_credentials(Credentials::api_key(api_key));
    }

    /// Shorthand for `set_credentials(Credentials::Basic { .. })`.
    fn set_username_and_password(&mut self, username: &str, password: &str) {
        self.set_credentials(Credentials::basic(username, password));
    }

    /// Headers added to every request (in addition to auth and user agent).
    fn set_default_headers(&mut self, headers: HeaderMap) {
        self.base_mut().set_default_headers(headers);
    }

    /// Builder-style [`set_endpoint`](Self::set_endpoint).
    fn with_endpoint(mut self, endpoint: &str) -> Self
    where
        Self: Sized,
    {
        self.set_endpoint(endpoint);
        self
    }

    /// Builder-style [`set_credentials`](Self::set_credentials).
    fn with_credentials(mut self, credentials: Credentials) -> Self
    where
        Self: Sized,
    {
        self.set_credentials(credentials);
        self
    }

    /// Request a short-lived authorization token for this service.
    async fn get_token(&self) -> Result<String> {
        self.base().get_token().await
    }
}
