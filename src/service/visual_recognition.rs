use crate::api::{ServiceConfig, ServiceKind};
use crate::credentials::Credentials;
use crate::error::{Result, ServiceError};
use crate::model::visual_recognition::{
    DetectedFaces, RecognizedText, VisualClassifier, VisualClassifiers, VisualRecognitionImages,
};
use crate::service::common::{
    AuthScheme, ImageInput, ServiceBase, encode_segment, file_part, json_part, require_non_empty,
};
use crate::traits::Service;
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

const KIND: ServiceKind = ServiceKind::VisualRecognition;

/// API version date sent with every request unless overridden.
pub const DEFAULT_VERSION: &str = "2016-05-19";

/// Parameters of [`VisualRecognition::classify`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifyImagesOptions {
    /// Image or zip archive of images to upload.
    pub image: Option<ImageInput>,
    /// Image URL, used when no `image` is given.
    pub url: Option<String>,
    /// Classifiers to apply; empty means the service default.
    pub classifier_ids: Vec<String>,
    /// Minimum score for a class to be returned.
    pub threshold: Option<f64>,
}

impl ClassifyImagesOptions {
    pub fn image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn classifier_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.classifier_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    fn parameters(&self) -> Value {
        let mut params = Map::new();
        if self.image.is_none()
            && let Some(url) = &self.url
        {
            params.insert("url".to_string(), json!(url));
        }
        if !self.classifier_ids.is_empty() {
            params.insert("classifier_ids".to_string(), json!(self.classifier_ids));
        }
        if let Some(threshold) = self.threshold {
            params.insert("threshold".to_string(), json!(threshold));
        }
        Value::Object(params)
    }
}

/// Image source for face detection and text recognition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualRecognitionOptions {
    pub image: Option<ImageInput>,
    pub url: Option<String>,
}

impl VisualRecognitionOptions {
    pub fn image(image: ImageInput) -> Self {
        Self {
            image: Some(image),
            url: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            image: None,
            url: Some(url.into()),
        }
    }
}

/// Training data for a custom classifier: one zip of positive examples per
/// class and an optional zip of negative examples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateClassifierOptions {
    pub name: String,
    pub positive_examples: BTreeMap<String, ImageInput>,
    pub negative_examples: Option<ImageInput>,
}

impl CreateClassifierOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn positive_examples(mut self, class_name: impl Into<String>, examples: ImageInput) -> Self {
        self.positive_examples.insert(class_name.into(), examples);
        self
    }

    pub fn negative_examples(mut self, examples: ImageInput) -> Self {
        self.negative_examples = Some(examples);
        self
    }
}

/// New training data for an existing classifier. Classes that are not yet
/// part of the classifier are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateClassifierOptions {
    pub classifier_id: String,
    pub positive_examples: BTreeMap<String, ImageInput>,
    pub negative_examples: Option<ImageInput>,
}

impl UpdateClassifierOptions {
    pub fn new(classifier_id: impl Into<String>) -> Self {
        Self {
            classifier_id: classifier_id.into(),
            ..Self::default()
        }
    }

    pub fn positive_examples(mut self, class_name: impl Into<String>, examples: ImageInput) -> Self {
        self.positive_examples.insert(class_name.into(), examples);
        self
    }

    pub fn negative_examples(mut self, examples: ImageInput) -> Self {
        self.negative_examples = Some(examples);
        self
    }
}

/// Client for the Visual Recognition v3 API.
///
/// Authenticates with an API key sent as the `api_key` query parameter and
/// pins the API `version` date on every call.
#[derive(Debug)]
pub struct VisualRecognition {
    base: ServiceBase,
    version: String,
}

impl Default for VisualRecognition {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualRecognition {
    pub fn new() -> Self {
        Self {
            base: ServiceBase::new(KIND, AuthScheme::QueryParam("api_key")),
            version: DEFAULT_VERSION.to_string(),
        }
    }

    pub fn with_api_key(api_key: &str) -> Self {
        Self::new().with_credentials(Credentials::api_key(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_env(KIND, AuthScheme::QueryParam("api_key"))?,
            version: DEFAULT_VERSION.to_string(),
        })
    }

    /// Build from config; the `version` option overrides [`DEFAULT_VERSION`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let base = ServiceBase::from_config(KIND, AuthScheme::QueryParam("api_key"), config)?;
        let version = config.option_str("version").unwrap_or(DEFAULT_VERSION).to_string();
        Ok(Self { base, version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .base
            .request(method, path)?
            .query(&[("version", self.version.as_str())]))
    }

    /// Classify an uploaded image (or zip of images) or an image URL.
    pub async fn classify(&self, options: &ClassifyImagesOptions) -> Result<VisualRecognitionImages> {
        if options.image.is_none() && options.url.is_none() {
            return Err(ServiceError::InvalidArgument(
                "image or url must be specified".to_string(),
            ));
        }
        let upload = load_optional(options.image.as_ref()).await?;
        let parameters = options.parameters();
        self.base
            .execute_json("classify", || {
                let mut form = Form::new();
                if let Some((filename, data)) = &upload {
                    form = form.part("images_file", file_part(filename, data)?);
                }
                form = form.part("parameters", json_part(&parameters)?);
                Ok(self.request(Method::POST, "/v3/classify")?.multipart(form))
            })
            .await
    }

    pub async fn detect_faces(&self, options: &VisualRecognitionOptions) -> Result<DetectedFaces> {
        self.image_call("detect_faces", "/v3/detect_faces", options).await
    }

    pub async fn recognize_text(&self, options: &VisualRecognitionOptions) -> Result<RecognizedText> {
        self.image_call("recognize_text", "/v3/recognize_text", options)
            .await
    }

    async fn image_call<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        options: &VisualRecognitionOptions,
    ) -> Result<T> {
        if options.image.is_none() && options.url.is_none() {
            return Err(ServiceError::InvalidArgument(
                "image or url must be specified".to_string(),
            ));
        }
        let upload = load_optional(options.image.as_ref()).await?;
        let parameters = options.url.as_ref().map(|url| json!({ "url": url }));
        self.base
            .execute_json(operation, || {
                let mut form = Form::new();
                if let Some(parameters) = &parameters {
                    form = form.part("parameters", json_part(parameters)?);
                }
                if let Some((filename, data)) = &upload {
                    form = form.part("images_file", file_part(filename, data)?);
                }
                Ok(self.request(Method::POST, path)?.multipart(form))
            })
            .await
    }

    /// Train a custom classifier.
    pub async fn create_classifier(&self, options: &CreateClassifierOptions) -> Result<VisualClassifier> {
        require_non_empty("name", &options.name)?;
        if options.positive_examples.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "At least one positive example class is required".to_string(),
            ));
        }
        let examples =
            TrainingExamples::load(&options.positive_examples, options.negative_examples.as_ref()).await?;

        self.base
            .execute_json("create_classifier", || {
                let form = examples.form(Form::new().text("name", options.name.clone()))?;
                Ok(self.request(Method::POST, "/v3/classifiers")?.multipart(form))
            })
            .await
    }

    /// Add classes or examples to a custom classifier, which is retrained.
    pub async fn update_classifier(&self, options: &UpdateClassifierOptions) -> Result<VisualClassifier> {
        require_non_empty("classifier_id", &options.classifier_id)?;
        if options.positive_examples.is_empty() && options.negative_examples.is_none() {
            return Err(ServiceError::InvalidArgument(
                "At least one of positive examples or negative examples is required".to_string(),
            ));
        }
        let examples =
            TrainingExamples::load(&options.positive_examples, options.negative_examples.as_ref()).await?;
        let path = format!("/v3/classifiers/{}", encode_segment(&options.classifier_id));

        self.base
            .execute_json("update_classifier", || {
                let form = examples.form(Form::new())?;
                Ok(self.request(Method::POST, &path)?.multipart(form))
            })
            .await
    }

    /// All custom classifiers, with full details.
    pub async fn get_classifiers(&self) -> Result<Vec<VisualClassifier>> {
        let list: VisualClassifiers = self
            .base
            .execute_json("get_classifiers", || {
                Ok(self
                    .request(Method::GET, "/v3/classifiers")?
                    .query(&[("verbose", "true")]))
            })
            .await?;
        Ok(list.classifiers)
    }

    pub async fn get_classifier(&self, classifier_id: &str) -> Result<VisualClassifier> {
        require_non_empty("classifier_id", classifier_id)?;
        let path = format!("/v3/classifiers/{}", encode_segment(classifier_id));
        self.base
            .execute_json("get_classifier", || self.request(Method::GET, &path))
            .await
    }

    pub async fn delete_classifier(&self, classifier_id: &str) -> Result<()> {
        require_non_empty("classifier_id", classifier_id)?;
        let path = format!("/v3/classifiers/{}", encode_segment(classifier_id));
        self.base
            .execute_empty("delete_classifier", || self.request(Method::DELETE, &path))
            .await
    }
}

impl Service for VisualRecognition {
    fn base(&self) -> &ServiceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ServiceBase {
        &mut self.base
    }
}

/// Example archives read once, reused by every attempt.
struct TrainingExamples {
    positives: Vec<(String, (String, Vec<u8>))>,
    negatives: Option<(String, Vec<u8>)>,
}

impl TrainingExamples {
    async fn load(
        positive_examples: &BTreeMap<String, ImageInput>,
        negative_examples: Option<&ImageInput>,
    ) -> Result<Self> {
        let mut positives = Vec::with_capacity(positive_examples.len());
        for (class_name, examples) in positive_examples {
            require_non_empty("class name", class_name)?;
            positives.push((format!("{}_positive_examples", class_name), examples.load().await?));
        }
        let negatives = load_optional(negative_examples).await?;
        Ok(Self { positives, negatives })
    }

    fn form(&self, mut form: Form) -> Result<Form> {
        for (field, (filename, data)) in &self.positives {
            form = form.part(field.clone(), file_part(filename, data)?);
        }
        if let Some((filename, data)) = &self.negatives {
            form = form.part("negative_examples", file_part(filename, data)?);
        }
        Ok(form)
    }
}

async fn load_optional(image: Option<&ImageInput>) -> Result<Option<(String, Vec<u8>)>> {
    match image {
        Some(image) => image.load().await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_only_sent_without_an_upload() {
        let by_url = ClassifyImagesOptions::default()
            .url("http://example.com/car.png")
            .classifier_ids(["default", "cars_1"])
            .threshold(0.5);
        assert_eq!(
            by_url.parameters(),
            json!({
                "url": "http://example.com/car.png",
                "classifier_ids": ["default", "cars_1"],
                "threshold": 0.5
            })
        );

        let by_file = by_url.image(ImageInput::bytes("car.png", vec![1, 2, 3]));
        assert!(by_file.parameters().get("url").is_none());
    }

    #[test]
    fn version_defaults_and_can_be_overridden() {
        let mut service = VisualRecognition::with_api_key("k");
        assert_eq!(service.version(), DEFAULT_VERSION);
        service.set_version("2016-05-20");
        let request = service
            .request(Method::GET, "/v3/classifiers")
            .unwrap()
            .build()
            .unwrap();
        let query = request.url().query().unwrap_or_default().to_string();
        assert!(query.contains("api_key=k"));
        assert!(query.contains("version=2016-05-20"));
    }

    #[tokio::test]
    async fn classify_requires_an_image_or_url() {
        let service = VisualRecognition::with_api_key("k");
        let err = service
            .classify(&ClassifyImagesOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn create_classifier_requires_positive_examples() {
        let service = VisualRecognition::with_api_key("k");
        let err = service
            .create_classifier(&CreateClassifierOptions::new("dogs"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
