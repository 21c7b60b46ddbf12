use crate::api::{ServiceConfig, ServiceKind};
use crate::credentials::Credentials;
use crate::error::{Result, ServiceError};
use crate::model::translation::{
    IdentifiableLanguage, IdentifiableLanguages, IdentifiedLanguage, IdentifiedLanguages,
    TranslationModel, TranslationModels, TranslationResult,
};
use crate::service::common::{
    AuthScheme, ServiceBase, encode_segment, file_part, read_file, require_non_empty,
};
use crate::traits::Service;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use serde_json::json;
use std::path::PathBuf;

const KIND: ServiceKind = ServiceKind::LanguageTranslation;

/// Parameters of a translate call.
///
/// Either `model_id` or both `source` and `target` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Paragraphs to translate; each yields one translation.
    pub text: Vec<String>,
    pub model_id: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl TranslateOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: vec![text.into()],
            ..Self::default()
        }
    }

    pub fn paragraphs(text: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            text: text.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(ServiceError::InvalidArgument("text can not be empty".to_string()));
        }
        let has_model = non_empty(&self.model_id).is_some();
        let has_pair = non_empty(&self.source).is_some() && non_empty(&self.target).is_some();
        if !has_model && !has_pair {
            return Err(ServiceError::InvalidArgument(
                "model_id or source and target should be specified".to_string(),
            ));
        }
        Ok(())
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        [
            ("source", &self.source),
            ("target", &self.target),
            ("model_id", &self.model_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_empty(value).map(|v| (key, v.to_string())))
        .collect()
    }
}

/// Filter for [`LanguageTranslation::get_models`]. Unset fields are not
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    /// Only default (or only non-default) models.
    pub default: Option<bool>,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Parameters for training a custom model from a TMX glossary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateModelOptions {
    pub base_model_id: String,
    pub name: Option<String>,
    pub forced_glossary: PathBuf,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Client for the Language Translation v2 API (basic auth).
#[derive(Debug)]
pub struct LanguageTranslation {
    base: ServiceBase,
}

impl Default for LanguageTranslation {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageTranslation {
    pub fn new() -> Self {
        Self {
            base: ServiceBase::new(KIND, AuthScheme::BasicHeader),
        }
    }

    pub fn with_username_and_password(username: &str, password: &str) -> Self {
        Self::new().with_credentials(Credentials::basic(username, password))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_env(KIND, AuthScheme::BasicHeader)?,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_config(KIND, AuthScheme::BasicHeader, config)?,
        })
    }

    /// Translate one or more paragraphs.
    pub async fn translate(&self, options: &TranslateOptions) -> Result<TranslationResult> {
        options.validate()?;
        let body = json!({ "text": options.text });
        let query = options.query();
        self.base
            .execute_json("translate", || {
                Ok(self
                    .base
                    .request(Method::POST, "/v2/translate")?
                    .query(&query)
                    .json(&body))
            })
            .await
    }

    /// Translate `text` with a specific model, e.g. `en-es`.
    pub async fn translate_with_model(&self, text: &str, model_id: &str) -> Result<TranslationResult> {
        self.translate(&TranslateOptions::new(text).model_id(model_id)).await
    }

    /// Translate `text` from `source` to `target` with the default model for
    /// that pair.
    pub async fn translate_between(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult> {
        self.translate(&TranslateOptions::new(text).source(source).target(target))
            .await
    }

    /// Languages `text` may be written in, most likely first.
    pub async fn identify(&self, text: &str) -> Result<Vec<IdentifiedLanguage>> {
        require_non_empty("text", text)?;
        let languages: IdentifiedLanguages = self
            .base
            .execute_json("identify", || {
                Ok(self
                    .base
                    .request(Method::POST, "/v2/identify")?
                    .header(CONTENT_TYPE, "text/plain")
                    .header(ACCEPT, "application/json")
                    .body(text.to_string()))
            })
            .await?;
        Ok(languages.languages)
    }

    pub async fn get_identifiable_languages(&self) -> Result<Vec<IdentifiableLanguage>> {
        let languages: IdentifiableLanguages = self
            .base
            .execute_json("get_identifiable_languages", || {
                self.base.request(Method::GET, "/v2/identifiable_languages")
            })
            .await?;
        Ok(languages.languages)
    }

    /// Available models, optionally filtered.
    pub async fn get_models(&self, filter: &ModelFilter) -> Result<Vec<TranslationModel>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(source) = non_empty(&filter.source) {
            query.push(("source", source.to_string()));
        }
        if let Some(target) = non_empty(&filter.target) {
            query.push(("target", target.to_string()));
        }
        if let Some(default) = filter.default {
            query.push(("default", default.to_string()));
        }
        let models: TranslationModels = self
            .base
            .execute_json("get_models", || {
                Ok(self.base.request(Method::GET, "/v2/models")?.query(&query))
            })
            .await?;
        Ok(models.models)
    }

    pub async fn get_model(&self, model_id: &str) -> Result<TranslationModel> {
        require_non_empty("model_id", model_id)?;
        let path = format!("/v2/models/{}", encode_segment(model_id));
        self.base
            .execute_json("get_model", || self.base.request(Method::GET, &path))
            .await
    }

    pub async fn delete_model(&self, model_id: &str) -> Result<()> {
        require_non_empty("model_id", model_id)?;
        let path = format!("/v2/models/{}", encode_segment(model_id));
        self.base
            .execute_empty("delete_model", || self.base.request(Method::DELETE, &path))
            .await
    }

    /// Train a custom model on top of `base_model_id` with a forced glossary.
    pub async fn create_model(&self, options: &CreateModelOptions) -> Result<TranslationModel> {
        require_non_empty("base_model_id", &options.base_model_id)?;
        let (filename, glossary) = read_file(&options.forced_glossary).await?;
        self.base
            .execute_json("create_model", || {
                let mut form = Form::new()
                    .part("forced_glossary", file_part(&filename, &glossary)?)
                    .text("base_model_id", options.base_model_id.clone());
                if let Some(name) = non_empty(&options.name) {
                    form = form.text("name", name.to_string());
                }
                Ok(self.base.request(Method::POST, "/v2/models")?.multipart(form))
            })
            .await
    }
}

impl Service for LanguageTranslation {
    fn base(&self) -> &ServiceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ServiceBase {
        &mut self.base
    }
}
