//! Plumbing shared by the AlchemyLanguage and AlchemyVision clients: the
//! endpoint table, input formats, request parameters, and in-band error
//! detection.

use crate::error::{Result, ServiceError};
use crate::service::common::{ImageInput, ServiceBase, parse_body};
use reqwest::RequestBuilder;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

const STATUS_HEADER: &str = "x-alchemyapi-status";
const ERROR_MSG_HEADER: &str = "x-alchemyapi-error-msg";
const STATUS_ERROR: &str = "ERROR";
const DAILY_TRANSACTION_LIMIT_EXCEEDED: &str = "daily-transaction-limit-exceeded";
const INVALID_API_KEY: &str = "invalid-api-key";

/// Query parameter carrying the API key.
pub(crate) const API_KEY_PARAM: &str = "apikey";

/// How the document or image is supplied. Selects the endpoint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputFormat {
    Text,
    Html,
    Url,
    Image,
}

impl InputFormat {
    fn dir(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Url => "url",
            Self::Image => "image",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Html => "HTML",
            Self::Url => "URL",
            Self::Image => "Image",
        }
    }
}

/// Alchemy calls this crate exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlchemyApi {
    Taxonomy,
    Keywords,
    Concepts,
    Entities,
    Sentiment,
    SentimentTargeted,
    Language,
    Text,
    TextRaw,
    Title,
    Emotion,
    Authors,
    PublicationDate,
    Combined,
    Feeds,
    Microformats,
    Relations,
    TypedRelations,
    Dates,
    ImageKeywords,
    ImageFaces,
    ImageLink,
    ImageSceneText,
}

const TEXT_HTML_URL: &[InputFormat] = &[InputFormat::Text, InputFormat::Html, InputFormat::Url];
const HTML_URL: &[InputFormat] = &[InputFormat::Html, InputFormat::Url];
const URL_IMAGE: &[InputFormat] = &[InputFormat::Url, InputFormat::Image];

impl AlchemyApi {
    /// Operation name used in logs and metrics.
    pub(crate) fn operation(self) -> &'static str {
        match self {
            Self::Taxonomy => "get_taxonomy",
            Self::Keywords => "get_keywords",
            Self::Concepts => "get_concepts",
            Self::Entities => "get_entities",
            Self::Sentiment | Self::SentimentTargeted => "get_sentiment",
            Self::Language => "get_language",
            Self::Text | Self::TextRaw => "get_text",
            Self::Title => "get_title",
            Self::Emotion => "get_emotion",
            Self::Authors => "get_authors",
            Self::PublicationDate => "get_publication_date",
            Self::Combined => "get_combined_results",
            Self::Feeds => "get_feeds",
            Self::Microformats => "get_microformats",
            Self::Relations => "get_relations",
            Self::TypedRelations => "get_typed_relations",
            Self::Dates => "get_dates",
            Self::ImageKeywords => "get_image_keywords",
            Self::ImageFaces => "recognize_faces",
            Self::ImageLink => "get_image_link",
            Self::ImageSceneText => "get_image_scene_text",
        }
    }

    fn call(self) -> &'static str {
        match self {
            Self::Taxonomy => "GetRankedTaxonomy",
            Self::Keywords => "GetRankedKeywords",
            Self::Concepts => "GetRankedConcepts",
            Self::Entities => "GetRankedNamedEntities",
            Self::Sentiment => "GetTextSentiment",
            Self::SentimentTargeted => "GetTargetedSentiment",
            Self::Language => "GetLanguage",
            Self::Text => "GetText",
            Self::TextRaw => "GetRawText",
            Self::Title => "GetTitle",
            Self::Emotion => "GetEmotion",
            Self::Authors => "GetAuthors",
            Self::PublicationDate => "GetPubDate",
            Self::Combined => "GetCombinedData",
            Self::Feeds => "GetFeedLinks",
            Self::Microformats => "GetMicroformatData",
            Self::Relations => "GetRelations",
            Self::TypedRelations => "GetTypedRelations",
            Self::Dates => "ExtractDates",
            Self::ImageKeywords => "GetRankedImageKeywords",
            Self::ImageFaces => "GetRankedImageFaceTags",
            Self::ImageLink => "GetImage",
            Self::ImageSceneText => "GetRankedImageSceneText",
        }
    }

    fn accepted(self) -> &'static [InputFormat] {
        match self {
            Self::Text
            | Self::TextRaw
            | Self::Title
            | Self::Authors
            | Self::PublicationDate
            | Self::Feeds
            | Self::Microformats
            | Self::ImageLink => HTML_URL,
            Self::ImageKeywords | Self::ImageFaces | Self::ImageSceneText => URL_IMAGE,
            _ => TEXT_HTML_URL,
        }
    }

    /// `/<format>/<Prefix><Call>`, or an argument error when the call does
    /// not accept `format`.
    pub(crate) fn path(self, format: InputFormat) -> Result<String> {
        if !self.accepted().contains(&format) {
            let accepted: Vec<_> = self.accepted().iter().map(|f| f.dir()).collect();
            return Err(ServiceError::InvalidArgument(format!(
                "{} requires one of the following inputs: {}",
                self.operation(),
                accepted.join(", ")
            )));
        }
        Ok(format!("/{}/{}{}", format.dir(), format.prefix(), self.call()))
    }
}

/// The document or image an Alchemy call analyzes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlchemyInput {
    Text(String),
    Html(String),
    Url(String),
    Image(ImageInput),
}

impl AlchemyInput {
    pub(crate) fn format(&self) -> InputFormat {
        match self {
            Self::Text(_) => InputFormat::Text,
            Self::Html(_) => InputFormat::Html,
            Self::Url(_) => InputFormat::Url,
            Self::Image(_) => InputFormat::Image,
        }
    }

    /// The `(name, value)` form field for textual inputs.
    pub(crate) fn form_field(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::Text(text) => Some(("text", text.as_str())),
            Self::Html(html) => Some(("html", html.as_str())),
            Self::Url(url) => Some(("url", url.as_str())),
            Self::Image(_) => None,
        }
    }
}

/// An Alchemy call's input plus optional call parameters
/// (`maxRetrieve`, `sentiment`, `target`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlchemyRequest {
    pub input: AlchemyInput,
    pub params: Vec<(String, String)>,
}

impl AlchemyRequest {
    pub fn new(input: AlchemyInput) -> Self {
        Self {
            input,
            params: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(AlchemyInput::Text(text.into()))
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self::new(AlchemyInput::Html(html.into()))
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(AlchemyInput::Url(url.into()))
    }

    pub fn image(image: ImageInput) -> Self {
        Self::new(AlchemyInput::Image(image))
    }

    /// Add a raw call parameter. A later value for the same name replaces
    /// the earlier one.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    pub fn max_retrieve(self, max: u32) -> Self {
        self.param("maxRetrieve", max)
    }

    /// Include per-item sentiment (keywords, entities).
    pub fn sentiment(self, enabled: bool) -> Self {
        self.param("sentiment", u8::from(enabled))
    }

    /// Sentiment toward one phrase; switches `get_sentiment` to its targeted
    /// call.
    pub fn target(self, phrase: impl Into<String>) -> Self {
        self.param("target", phrase.into())
    }

    /// Sentiment toward several phrases (sent `|`-separated).
    pub fn targets(self, phrases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let joined = phrases.into_iter().map(Into::<String>::into).collect::<Vec<_>>().join("|");
        self.param("targets", joined)
    }

    /// Return the page text without cleanup; switches `get_text` to its raw
    /// call.
    pub fn raw(self) -> Self {
        self.param("raw", 1)
    }

    /// Reference date (`yyyy-MM-dd HH:mm:ss`) for resolving relative dates
    /// such as "next Tuesday".
    pub fn anchor_date(self, date: impl Into<String>) -> Self {
        self.param("anchorDate", date.into())
    }

    /// Custom model for typed relations; also sent as the `model_id` query
    /// parameter.
    pub fn model_id(self, model_id: impl Into<String>) -> Self {
        self.param("model_id", model_id.into())
    }

    /// Features for the combined call, e.g. `["entity", "keyword", "taxonomy"]`.
    pub fn extract(self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let joined = features.into_iter().map(Into::<String>::into).collect::<Vec<_>>().join(",");
        self.param("extract", joined)
    }

    pub(crate) fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|(n, _)| n == name)
    }

    /// Call parameters with `outputMode=json`. `skip` names parameters that
    /// only select the call variant.
    pub(crate) fn call_params(&self, skip: &[&str]) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .params
            .iter()
            .filter(|(name, _)| !skip.contains(&name.as_str()) && name != "outputMode")
            .cloned()
            .collect();
        params.push(("outputMode".to_string(), "json".to_string()));
        params
    }
}

/// Form fields for a textual input: the input field first, then the call
/// parameters.
pub(crate) fn form_params(request: &AlchemyRequest, skip: &[&str]) -> Result<Vec<(String, String)>> {
    let Some((field, value)) = request.input.form_field() else {
        return Err(ServiceError::InvalidArgument(
            "Image input cannot be sent as a form field".to_string(),
        ));
    };
    let mut params = vec![(field.to_string(), value.to_string())];
    params.extend(request.call_params(skip));
    Ok(params)
}

/// Turn an Alchemy error signalled in a 2xx response into a `ServiceError`.
///
/// The service reports failures with an `X-AlchemyAPI-Status: ERROR` header
/// (message in `X-AlchemyAPI-Error-Msg`) or a body `"status": "ERROR"` with
/// the reason in `statusInfo`.
pub(crate) fn check_alchemy_status(headers: &HeaderMap, body: &str) -> Result<()> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    if header(STATUS_HEADER) == Some(STATUS_ERROR) {
        return Err(alchemy_error(header(ERROR_MSG_HEADER)));
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body)
        && map.get("status").and_then(Value::as_str) == Some(STATUS_ERROR)
    {
        return Err(alchemy_error(map.get("statusInfo").and_then(Value::as_str)));
    }
    Ok(())
}

fn alchemy_error(message: Option<&str>) -> ServiceError {
    let message = message.unwrap_or("Unknown error");
    tracing::error!(message, "Alchemy call failed");
    match message {
        DAILY_TRANSACTION_LIMIT_EXCEEDED => ServiceError::RateLimited(message.to_string()),
        INVALID_API_KEY => ServiceError::from_status(401, Some(message.to_string())),
        _ => ServiceError::BadRequest(message.to_string()),
    }
}

/// Execute an Alchemy call and deserialize its body, mapping in-band errors.
pub(crate) async fn execute_alchemy<T, F>(base: &ServiceBase, operation: &str, build: F) -> Result<T>
where
    T: DeserializeOwned,
    F: Fn() -> Result<RequestBuilder>,
{
    let body = base
        .execute_text_with(operation, build, check_alchemy_status)
        .await?;
    parse_body(operation, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn paths_follow_format_prefix_convention() {
        assert_eq!(
            AlchemyApi::Taxonomy.path(InputFormat::Text).unwrap(),
            "/text/TextGetRankedTaxonomy"
        );
        assert_eq!(
            AlchemyApi::ImageKeywords.path(InputFormat::Url).unwrap(),
            "/url/URLGetRankedImageKeywords"
        );
        assert_eq!(
            AlchemyApi::ImageFaces.path(InputFormat::Image).unwrap(),
            "/image/ImageGetRankedImageFaceTags"
        );
        assert_eq!(
            AlchemyApi::ImageLink.path(InputFormat::Html).unwrap(),
            "/html/HTMLGetImage"
        );
        assert_eq!(
            AlchemyApi::Entities.path(InputFormat::Html).unwrap(),
            "/html/HTMLGetRankedNamedEntities"
        );
        assert_eq!(
            AlchemyApi::Dates.path(InputFormat::Text).unwrap(),
            "/text/TextExtractDates"
        );
        assert_eq!(
            AlchemyApi::PublicationDate.path(InputFormat::Url).unwrap(),
            "/url/URLGetPubDate"
        );
        assert_eq!(
            AlchemyApi::ImageSceneText.path(InputFormat::Image).unwrap(),
            "/image/ImageGetRankedImageSceneText"
        );
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let err = AlchemyApi::Title.path(InputFormat::Text).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert!(err.to_string().contains("html, url"));
        assert!(AlchemyApi::ImageKeywords.path(InputFormat::Text).is_err());
        assert!(AlchemyApi::Feeds.path(InputFormat::Text).is_err());
        assert!(AlchemyApi::Microformats.path(InputFormat::Text).is_err());
        assert!(AlchemyApi::ImageSceneText.path(InputFormat::Html).is_err());
    }

    #[test]
    fn header_status_error_is_mapped() {
        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static("ERROR"));
        headers.insert(
            ERROR_MSG_HEADER,
            HeaderValue::from_static("daily-transaction-limit-exceeded"),
        );
        assert!(matches!(
            check_alchemy_status(&headers, "{}"),
            Err(ServiceError::RateLimited(_))
        ));
    }

    #[test]
    fn body_status_error_is_mapped() {
        let headers = HeaderMap::new();
        let invalid_key = r#"{"status":"ERROR","statusInfo":"invalid-api-key"}"#;
        assert!(matches!(
            check_alchemy_status(&headers, invalid_key),
            Err(ServiceError::Unauthorized(_))
        ));
        let other = r#"{"status":"ERROR","statusInfo":"unsupported-text-language"}"#;
        let err = check_alchemy_status(&headers, other).unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(ref m) if m == "unsupported-text-language"));
        assert!(check_alchemy_status(&headers, r#"{"status":"OK"}"#).is_ok());
    }

    #[test]
    fn params_replace_and_always_request_json() {
        let request = AlchemyRequest::text("hello")
            .max_retrieve(5)
            .max_retrieve(10)
            .raw()
            .param("outputMode", "xml");
        let params = request.call_params(&["raw"]);
        assert_eq!(
            params,
            vec![
                ("maxRetrieve".to_string(), "10".to_string()),
                ("outputMode".to_string(), "json".to_string()),
            ]
        );
        assert!(request.has_param("raw"));
    }

    #[test]
    fn list_params_are_joined() {
        let request = AlchemyRequest::text("t")
            .extract(["entity", "keyword"])
            .targets(["engine", "brakes"]);
        assert_eq!(request.param_value("extract"), Some("entity,keyword"));
        assert_eq!(request.param_value("targets"), Some("engine|brakes"));
        assert_eq!(request.param_value("model_id"), None);
    }
}
