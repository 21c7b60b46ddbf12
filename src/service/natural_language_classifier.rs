use crate::api::{ServiceConfig, ServiceKind};
use crate::credentials::Credentials;
use crate::error::{Result, ServiceError};
use crate::model::classifier::{Classification, Classifier, ClassifierList, TrainingData};
use crate::service::common::{
    AuthScheme, ServiceBase, encode_segment, file_part, json_part, require_non_empty,
};
use crate::traits::Service;
use reqwest::Method;
use reqwest::multipart::Form;
use serde_json::{Value, json};

const KIND: ServiceKind = ServiceKind::NaturalLanguageClassifier;
const DEFAULT_LANGUAGE: &str = "en";

/// Client for the Natural Language Classifier v1 API.
///
/// Authenticates with username/password (basic auth). Credentials default to
/// `VCAP_SERVICES` or `NATURAL_LANGUAGE_CLASSIFIER_*` env vars when built
/// with [`from_env`](Self::from_env).
#[derive(Debug)]
pub struct NaturalLanguageClassifier {
    base: ServiceBase,
}

impl Default for NaturalLanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NaturalLanguageClassifier {
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

    /// Classify `text` with the classifier `classifier_id`.
    pub async fn classify(&self, classifier_id: &str, text: &str) -> Result<Classification> {
        require_non_empty("classifier_id", classifier_id)?;
        require_non_empty("text", text)?;
        let path = format!("/v1/classifiers/{}/classify", encode_segment(classifier_id));
        let body = json!({ "text": text });
        self.base
            .execute_json("classify", || {
                Ok(self.base.request(Method::POST, &path)?.json(&body))
            })
            .await
    }

    /// Train a new classifier. `language` defaults to `en`.
    pub async fn create_classifier(
        &self,
        language: Option<&str>,
        name: Option<&str>,
        training_data: &[TrainingData],
    ) -> Result<Classifier> {
        if training_data.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "training_data needs to have TrainingData items".to_string(),
            ));
        }
        let metadata = training_metadata(language, name);
        let csv = training_data_csv(training_data)?;
        tracing::info!(
            rows = training_data.len(),
            language = metadata["language"].as_str().unwrap_or(DEFAULT_LANGUAGE),
            "Creating classifier"
        );
        self.base
            .execute_json("create_classifier", || {
                let form = Form::new()
                    .part("training_metadata", json_part(&metadata)?)
                    .part("training_data", file_part("training_data.csv", &csv)?);
                Ok(self.base.request(Method::POST, "/v1/classifiers")?.multipart(form))
            })
            .await
    }

    /// All classifiers visible to these credentials.
    pub async fn get_classifiers(&self) -> Result<Vec<Classifier>> {
        let list: ClassifierList = self
            .base
            .execute_json("get_classifiers", || {
                self.base.request(Method::GET, "/v1/classifiers")
            })
            .await?;
        Ok(list.classifiers)
    }

    pub async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier> {
        require_non_empty("classifier_id", classifier_id)?;
        let path = format!("/v1/classifiers/{}", encode_segment(classifier_id));
        self.base
            .execute_json("get_classifier", || self.base.request(Method::GET, &path))
            .await
    }

    pub async fn delete_classifier(&self, classifier_id: &str) -> Result<()> {
        require_non_empty("classifier_id", classifier_id)?;
        let path = format!("/v1/classifiers/{}", encode_segment(classifier_id));
        self.base
            .execute_empty("delete_classifier", || self.base.request(Method::DELETE, &path))
            .await
    }
}

impl Service for NaturalLanguageClassifier {
    fn base(&self) -> &ServiceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ServiceBase {
        &mut self.base
    }
}

fn training_metadata(language: Option<&str>, name: Option<&str>) -> Value {
    let language = language.filter(|l| !l.is_empty()).unwrap_or(DEFAULT_LANGUAGE);
    let mut metadata = json!({ "language": language });
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        metadata["name"] = Value::String(name.to_string());
    }
    metadata
}

/// Rows of `text,class1,class2,...`; rows may differ in length.
fn training_data_csv(training_data: &[TrainingData]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_writer(Vec::new());
    for row in training_data {
        if row.text.is_empty() || row.classes.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "Each TrainingData item needs text and at least one class".to_string(),
            ));
        }
        let record = std::iter::once(row.text.as_str()).chain(row.classes.iter().map(String::as_str));
        writer
            .write_record(record)
            .map_err(|e| ServiceError::InvalidArgument(format!("Invalid training data: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| ServiceError::InvalidArgument(format!("Invalid training data: {}", e)))
}
