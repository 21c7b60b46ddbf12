use crate::api::{LanguageSelection, ServiceConfig, ServiceKind};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::model::alchemy::{
    CombinedResults, Concepts, Dates, DocumentAuthors, DocumentEmotion, DocumentPublicationDate,
    DocumentSentiment, DocumentText, DocumentTitle, Entities, Feeds, Keywords, Language,
    Microformats, SaoRelations, Taxonomies, TypedRelations,
};
use crate::service::alchemy::{API_KEY_PARAM, AlchemyApi, AlchemyRequest, execute_alchemy, form_params};
use crate::service::common::{AuthScheme, ServiceBase};
use crate::traits::Service;
use reqwest::Method;
use serde::de::DeserializeOwned;

const KIND: ServiceKind = ServiceKind::AlchemyLanguage;
const AUTH: AuthScheme = AuthScheme::QueryParam(API_KEY_PARAM);

/// Client for AlchemyLanguage text analysis.
///
/// Every call takes an [`AlchemyRequest`] whose input (text, HTML, or URL)
/// selects the endpoint. Calls that only work on web pages (`get_text`,
/// `get_title`) reject text input before sending anything.
///
/// ```rust,no_run
/// use watson_sdk::service::{AlchemyLanguage, AlchemyRequest};
///
/// # async fn example() -> watson_sdk::error::Result<()> {
/// let service = AlchemyLanguage::with_api_key("my-key");
/// let taxonomy = service
///     .get_taxonomy(&AlchemyRequest::text("IBM Watson won Jeopardy! in 2011."))
///     .await?;
/// for t in &taxonomy.taxonomy {
///     println!("{:?} {:?}", t.label, t.score);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AlchemyLanguage {
    base: ServiceBase,
    language: LanguageSelection,
}

impl Default for AlchemyLanguage {
    fn default() -> Self {
        Self::new()
    }
}

impl AlchemyLanguage {
    pub fn new() -> Self {
        Self {
            base: ServiceBase::new(KIND, AUTH),
            language: LanguageSelection::Detect,
        }
    }

    pub fn with_api_key(api_key: &str) -> Self {
        Self::new().with_credentials(Credentials::api_key(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_env(KIND, AUTH)?,
            language: LanguageSelection::Detect,
        })
    }

    /// Build from config; the `language` option presets
    /// [`set_language`](Self::set_language).
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let base = ServiceBase::from_config(KIND, AUTH, config)?;
        let language = config
            .option_str("language")
            .and_then(LanguageSelection::from_name)
            .unwrap_or_default();
        Ok(Self { base, language })
    }

    pub fn language(&self) -> LanguageSelection {
        self.language
    }

    /// Language of the input text. [`LanguageSelection::Detect`] (the
    /// default) lets the service decide and sends no parameter. A request
    /// that sets its own `language` parameter keeps it.
    pub fn set_language(&mut self, language: LanguageSelection) {
        self.language = language;
    }

    async fn call<T: DeserializeOwned>(
        &self,
        api: AlchemyApi,
        request: &AlchemyRequest,
        skip: &[&str],
    ) -> Result<T> {
        let path = api.path(request.input.format())?;
        let mut form = form_params(request, skip)?;
        if self.language != LanguageSelection::Detect && !request.has_param("language") {
            form.push(("language".to_string(), self.language.as_str().to_string()));
        }
        let model_id = match api {
            AlchemyApi::TypedRelations => request.param_value("model_id"),
            _ => None,
        };
        execute_alchemy(&self.base, api.operation(), || {
            let mut builder = self.base.request(Method::POST, &path)?;
            if let Some(model_id) = model_id {
                builder = builder.query(&[("model_id", model_id)]);
            }
            Ok(builder.form(&form))
        })
        .await
    }

    pub async fn get_taxonomy(&self, request: &AlchemyRequest) -> Result<Taxonomies> {
        self.call(AlchemyApi::Taxonomy, request, &[]).await
    }

    pub async fn get_keywords(&self, request: &AlchemyRequest) -> Result<Keywords> {
        self.call(AlchemyApi::Keywords, request, &[]).await
    }

    pub async fn get_concepts(&self, request: &AlchemyRequest) -> Result<Concepts> {
        self.call(AlchemyApi::Concepts, request, &[]).await
    }

    pub async fn get_entities(&self, request: &AlchemyRequest) -> Result<Entities> {
        self.call(AlchemyApi::Entities, request, &[]).await
    }

    /// Document sentiment, or per-phrase sentiment when the request carries
    /// `target` or `targets`.
    pub async fn get_sentiment(&self, request: &AlchemyRequest) -> Result<DocumentSentiment> {
        let api = if request.has_param("target") || request.has_param("targets") {
            AlchemyApi::SentimentTargeted
        } else {
            AlchemyApi::Sentiment
        };
        self.call(api, request, &[]).await
    }

    pub async fn get_language(&self, request: &AlchemyRequest) -> Result<Language> {
        self.call(AlchemyApi::Language, request, &[]).await
    }

    /// Cleaned page text (HTML or URL input), or the raw text when the
    /// request has [`raw`](AlchemyRequest::raw) set.
    pub async fn get_text(&self, request: &AlchemyRequest) -> Result<DocumentText> {
        let api = if request.has_param("raw") {
            AlchemyApi::TextRaw
        } else {
            AlchemyApi::Text
        };
        self.call(api, request, &["raw"]).await
    }

    pub async fn get_title(&self, request: &AlchemyRequest) -> Result<DocumentTitle> {
        self.call(AlchemyApi::Title, request, &[]).await
    }

    pub async fn get_emotion(&self, request: &AlchemyRequest) -> Result<DocumentEmotion> {
        self.call(AlchemyApi::Emotion, request, &[]).await
    }

    /// Author names of a web page (HTML or URL input).
    pub async fn get_authors(&self, request: &AlchemyRequest) -> Result<DocumentAuthors> {
        self.call(AlchemyApi::Authors, request, &[]).await
    }

    /// Publication date of a web page (HTML or URL input).
    pub async fn get_publication_date(&self, request: &AlchemyRequest) -> Result<DocumentPublicationDate> {
        self.call(AlchemyApi::PublicationDate, request, &[]).await
    }

    /// Several analyses in one call, selected with
    /// [`extract`](AlchemyRequest::extract).
    pub async fn get_combined_results(&self, request: &AlchemyRequest) -> Result<CombinedResults> {
        self.call(AlchemyApi::Combined, request, &[]).await
    }

    /// RSS/ATOM feed links of a web page.
    pub async fn get_feeds(&self, request: &AlchemyRequest) -> Result<Feeds> {
        self.call(AlchemyApi::Feeds, request, &[]).await
    }

    pub async fn get_microformats(&self, request: &AlchemyRequest) -> Result<Microformats> {
        self.call(AlchemyApi::Microformats, request, &[]).await
    }

    /// Subject-action-object relations.
    pub async fn get_relations(&self, request: &AlchemyRequest) -> Result<SaoRelations> {
        self.call(AlchemyApi::Relations, request, &[]).await
    }

    /// Typed relations between entities, optionally with a custom
    /// [`model_id`](AlchemyRequest::model_id).
    pub async fn get_typed_relations(&self, request: &AlchemyRequest) -> Result<TypedRelations> {
        self.call(AlchemyApi::TypedRelations, request, &[]).await
    }

    /// Dates mentioned in the text, resolved against
    /// [`anchor_date`](AlchemyRequest::anchor_date) when given.
    pub async fn get_dates(&self, request: &AlchemyRequest) -> Result<Dates> {
        self.call(AlchemyApi::Dates, request, &[]).await
    }
}

impl Service for AlchemyLanguage {
    fn base(&self) -> &ServiceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ServiceBase {
        &mut self.base
    }
}
