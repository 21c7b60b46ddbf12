use crate::api::{ServiceConfig, ServiceKind};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::model::alchemy::{ImageFaces, ImageKeywords, ImageLink, ImageSceneText};
use crate::service::alchemy::{
    API_KEY_PARAM, AlchemyApi, AlchemyInput, AlchemyRequest, execute_alchemy, form_params,
};
use crate::service::common::{AuthScheme, ServiceBase};
use crate::traits::Service;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

const KIND: ServiceKind = ServiceKind::AlchemyVision;
const AUTH: AuthScheme = AuthScheme::QueryParam(API_KEY_PARAM);

/// Client for AlchemyVision image analysis.
///
/// Image bytes are posted raw (`imagePostMode=raw`) with the call
/// parameters in the query string; URL and HTML inputs are form-encoded.
#[derive(Debug)]
pub struct AlchemyVision {
    base: ServiceBase,
}

impl Default for AlchemyVision {
    fn default() -> Self {
        Self::new()
    }
}

impl AlchemyVision {
    pub fn new() -> Self {
        Self {
            base: ServiceBase::new(KIND, AUTH),
        }
    }

    pub fn with_api_key(api_key: &str) -> Self {
        Self::new().with_credentials(Credentials::api_key(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_env(KIND, AUTH)?,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            base: ServiceBase::from_config(KIND, AUTH, config)?,
        })
    }

    async fn call<T: DeserializeOwned>(&self, api: AlchemyApi, request: &AlchemyRequest) -> Result<T> {
        let path = api.path(request.input.format())?;
        let operation = api.operation();

        if let AlchemyInput::Image(image) = &request.input {
            let (_, data) = image.load().await?;
            let mut query = request.call_params(&[]);
            query.push(("imagePostMode".to_string(), "raw".to_string()));
            return execute_alchemy(&self.base, operation, || {
                Ok(self
                    .base
                    .request(Method::POST, &path)?
                    .query(&query)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(data.clone()))
            })
            .await;
        }

        let form = form_params(request, &[])?;
        execute_alchemy(&self.base, operation, || {
            Ok(self.base.request(Method::POST, &path)?.form(&form))
        })
        .await
    }

    /// Ranked keywords describing an image (image bytes or image URL).
    pub async fn get_image_keywords(&self, request: &AlchemyRequest) -> Result<ImageKeywords> {
        self.call(AlchemyApi::ImageKeywords, request).await
    }

    /// Faces with age range, gender, and identity for known people.
    pub async fn recognize_faces(&self, request: &AlchemyRequest) -> Result<ImageFaces> {
        self.call(AlchemyApi::ImageFaces, request).await
    }

    /// Main image of a web page (HTML or URL input).
    pub async fn get_image_link(&self, request: &AlchemyRequest) -> Result<ImageLink> {
        self.call(AlchemyApi::ImageLink, request).await
    }

    /// Text found in an image (image bytes or image URL), line by line.
    pub async fn get_image_scene_text(&self, request: &AlchemyRequest) -> Result<ImageSceneText> {
        self.call(AlchemyApi::ImageSceneText, request).await
    }
}

impl Service for AlchemyVision {
    fn base(&self) -> &ServiceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ServiceBase {
        &mut self.base
    }
}
