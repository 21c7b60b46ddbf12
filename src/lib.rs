//! Async Rust clients for the Watson language and vision services.
//!
//! Each service client wraps a [`ServiceBase`](service::ServiceBase) that
//! owns the HTTP client, endpoint, credentials, and call policy. Requests are
//! built from typed option structs, and responses deserialize into plain
//! data models under [`model`].
//!
//! # Key concepts
//!
//! - **Service clients**: [`NaturalLanguageClassifier`](service::NaturalLanguageClassifier),
//!   [`LanguageTranslation`](service::LanguageTranslation),
//!   [`VisualRecognition`](service::VisualRecognition),
//!   [`AlchemyLanguage`](service::AlchemyLanguage), and
//!   [`AlchemyVision`](service::AlchemyVision). Each one sits behind a Cargo
//!   feature and all are enabled by default.
//! - **[`Service`](traits::Service)**: the shared surface for endpoint,
//!   credential, and header configuration, plus token retrieval.
//! - **[`ServiceConfig`](api::ServiceConfig)**: a declarative client description
//!   (endpoint, timeout, retry, service options) that can be loaded from JSON.
//! - **Credentials**: given in code, or discovered from `VCAP_SERVICES` and
//!   `<SERVICE>_USERNAME` / `_PASSWORD` / `_APIKEY` / `_URL` env vars.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[cfg(feature = "language-translation")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use watson_sdk::service::LanguageTranslation;
//!
//! let service = LanguageTranslation::with_username_and_password("user", "pass");
//! let result = service.translate_between("hello", "en", "es").await?;
//! println!("{:?}", result.first_translation());
//! # Ok(())
//! # }
//! ```
//!
//! Failed calls return a [`ServiceError`](error::ServiceError) that tells
//! HTTP statuses, transport failures, and local argument errors apart.

pub mod api;
pub mod credentials;
pub mod error;
pub mod model;
mod options_validation;
pub mod reliability;
pub mod service;
pub mod traits;
