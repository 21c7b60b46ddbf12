//! Language Translation models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub word_count: Option<u64>,
    pub character_count: Option<u64>,
    /// One entry per input paragraph, in input order.
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl TranslationResult {
    /// The first translation, which is the whole result for single-paragraph
    /// requests.
    pub fn first_translation(&self) -> Option<&str> {
        self.translations.first().map(|t| t.translation.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub translation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedLanguage {
    pub language: Option<String>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiableLanguage {
    pub language: Option<String>,
    pub name: Option<String>,
}

/// A base or custom translation model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationModel {
    pub model_id: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub base_model_id: Option<String>,
    pub domain: Option<String>,
    pub customizable: Option<bool>,
    #[serde(rename = "default")]
    pub default_model: Option<bool>,
    pub owner: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdentifiedLanguages {
    #[serde(default)]
    pub(crate) languages: Vec<IdentifiedLanguage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdentifiableLanguages {
    #[serde(default)]
    pub(crate) languages: Vec<IdentifiableLanguage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TranslationModels {
    #[serde(default)]
    pub(crate) models: Vec<TranslationModel>,
}
