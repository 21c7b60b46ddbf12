//! Natural Language Classifier models.

use serde::{Deserialize, Serialize};

/// Result of classifying one phrase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub classifier_id: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub top_class: Option<String>,
    /// Classes in descending order of confidence, as returned.
    #[serde(default)]
    pub classes: Vec<ClassifiedClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedClass {
    pub class_name: Option<String>,
    pub confidence: Option<f64>,
}

/// Training state of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassifierStatus {
    #[serde(rename = "Non Existent")]
    NonExistent,
    Training,
    Failed,
    Available,
    Unavailable,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A trained (or training) classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub classifier_id: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    pub created: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub status: ClassifierStatus,
    pub status_description: Option<String>,
}

/// One training row: a phrase and the classes it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingData {
    pub text: String,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl TrainingData {
    pub fn new(text: impl Into<String>, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            text: text.into(),
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClassifierList {
    #[serde(default)]
    pub(crate) classifiers: Vec<Classifier>,
}
