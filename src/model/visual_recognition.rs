//! Visual Recognition (v3) models.

use serde::{Deserialize, Serialize};

/// Response of `classify`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualRecognitionImages {
    pub custom_classes: Option<u32>,
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub images: Vec<ClassifiedImage>,
    #[serde(default)]
    pub warnings: Vec<WarningInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedImage {
    pub source_url: Option<String>,
    pub resolved_url: Option<String>,
    pub image: Option<String>,
    pub error: Option<ErrorInfo>,
    #[serde(default)]
    pub classifiers: Vec<VisualClassification>,
}

/// Classes found by one classifier for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualClassification {
    pub classifier_id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub classes: Vec<VisualClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualClass {
    #[serde(rename = "class")]
    pub class_name: Option<String>,
    pub score: Option<f64>,
    pub type_hierarchy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningInfo {
    pub warning_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error_id: Option<String>,
    pub description: Option<String>,
}

/// Response of `detect_faces`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedFaces {
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub images: Vec<ImageWithFaces>,
    #[serde(default)]
    pub warnings: Vec<WarningInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageWithFaces {
    pub source_url: Option<String>,
    pub resolved_url: Option<String>,
    pub image: Option<String>,
    pub error: Option<ErrorInfo>,
    #[serde(default)]
    pub faces: Vec<Face>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub age: Option<FaceAge>,
    pub gender: Option<FaceGender>,
    pub face_location: Option<FaceLocation>,
    pub identity: Option<FaceIdentity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceAge {
    pub min: Option<u32>,
    pub max: Option<u32>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceGender {
    pub gender: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLocation {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub left: Option<f64>,
    pub top: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceIdentity {
    pub name: Option<String>,
    pub score: Option<f64>,
    pub type_hierarchy: Option<String>,
}

/// Response of `recognize_text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub images_processed: Option<u32>,
    #[serde(default)]
    pub images: Vec<ImageWithText>,
    #[serde(default)]
    pub warnings: Vec<WarningInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageWithText {
    pub source_url: Option<String>,
    pub resolved_url: Option<String>,
    pub image: Option<String>,
    pub error: Option<ErrorInfo>,
    pub text: Option<String>,
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: Option<String>,
    pub score: Option<f64>,
    pub line_number: Option<u32>,
    pub location: Option<FaceLocation>,
}

/// A custom classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualClassifier {
    pub classifier_id: Option<String>,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub status: Option<String>,
    pub created: Option<String>,
    pub explanation: Option<String>,
    #[serde(default)]
    pub classes: Vec<VisualClassifierClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualClassifierClass {
    #[serde(rename = "class")]
    pub class_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VisualClassifiers {
    #[serde(default)]
    pub(crate) classifiers: Vec<VisualClassifier>,
}
