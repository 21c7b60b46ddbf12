//! Service clients.
//!
//! Each sub-module is gated behind a Cargo feature flag. All of them are
//! enabled by default.
//!
//! | Module | Feature | Service | Auth |
//! |--------|---------|---------|------|
//! | `natural_language_classifier` | `natural-language-classifier` | Natural Language Classifier v1 | basic header |
//! | `language_translation` | `language-translation` | Language Translation v2 | basic header |
//! | `visual_recognition` | `visual-recognition` | Visual Recognition v3 | `api_key` query |
//! | `alchemy_language` | `alchemy-language` | AlchemyLanguage | `apikey` query |
//! | `alchemy_vision` | `alchemy-vision` | AlchemyVision | `apikey` query |

pub mod common;

#[cfg(any(feature = "alchemy-language", feature = "alchemy-vision"))]
pub(crate) mod alchemy;

#[cfg(feature = "natural-language-classifier")]
pub mod natural_language_classifier;

#[cfg(feature = "language-translation")]
pub mod language_translation;

#[cfg(feature = "visual-recognition")]
pub mod visual_recognition;

#[cfg(feature = "alchemy-language")]
pub mod alchemy_language;

#[cfg(feature = "alchemy-vision")]
pub mod alchemy_vision;

// Re-exports (same order as module declarations above).
pub use common::{AuthScheme, ImageInput, ServiceBase};

#[cfg(any(feature = "alchemy-language", feature = "alchemy-vision"))]
pub use alchemy::{AlchemyInput, AlchemyRequest};

#[cfg(feature = "natural-language-classifier")]
pub use natural_language_classifier::NaturalLanguageClassifier;

#[cfg(feature = "language-translation")]
pub use language_translation::LanguageTranslation;

#[cfg(feature = "visual-recognition")]
pub use visual_recognition::VisualRecognition;

#[cfg(feature = "alchemy-language")]
pub use alchemy_language::AlchemyLanguage;

#[cfg(feature = "alchemy-vision")]
pub use alchemy_vision::AlchemyVision;
