//! AlchemyLanguage and AlchemyVision models.
//!
//! Alchemy sends most numbers as strings, so scores and counts go through
//! [`lenient`](super::lenient).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomies {
    pub url: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub taxonomy: Vec<Taxonomy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Slash-separated category path, e.g. `/art and entertainment/music`.
    pub label: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
    /// `"no"` when the service is unsure of the category.
    pub confident: Option<String>,
}

impl Taxonomy {
    pub fn is_confident(&self) -> bool {
        self.confident.as_deref() != Some("no")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    #[serde(rename = "type")]
    pub sentiment_type: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
    pub mixed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keywords {
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub relevance: Option<f64>,
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concepts {
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub relevance: Option<f64>,
    pub website: Option<String>,
    pub dbpedia: Option<String>,
    pub freebase: Option<String>,
    pub opencyc: Option<String>,
    pub yago: Option<String>,
    pub crunchbase: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub relevance: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub count: Option<u32>,
    pub sentiment: Option<Sentiment>,
}

/// Document-level sentiment, or per-target results for targeted calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSentiment {
    pub url: Option<String>,
    pub language: Option<String>,
    pub doc_sentiment: Option<Sentiment>,
    #[serde(default)]
    pub results: Vec<TargetedSentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetedSentiment {
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "iso-639-1")]
    pub iso_639_1: Option<String>,
    #[serde(rename = "iso-639-2")]
    pub iso_639_2: Option<String>,
    #[serde(rename = "iso-639-3")]
    pub iso_639_3: Option<String>,
    pub ethnologue: Option<String>,
    #[serde(rename = "native-speakers")]
    pub native_speakers: Option<String>,
    pub wikipedia: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    pub url: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTitle {
    pub url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEmotion {
    pub url: Option<String>,
    pub language: Option<String>,
    pub doc_emotions: Option<Emotion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub anger: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub disgust: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub fear: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub joy: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub sadness: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAuthors {
    pub url: Option<String>,
    pub authors: Option<Authors>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authors {
    pub confident: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPublicationDate {
    pub url: Option<String>,
    pub publication_date: Option<PublicationDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub confident: Option<String>,
    /// Compact ISO form, e.g. `20111107T000000`.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feeds {
    pub url: Option<String>,
    #[serde(default)]
    pub feeds: Vec<Feed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub feed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Microformats {
    pub url: Option<String>,
    #[serde(default)]
    pub microformats: Vec<Microformat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Microformat {
    pub field: Option<String>,
    pub data: Option<String>,
}

/// Subject-action-object relations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaoRelations {
    pub url: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub relations: Vec<SaoRelation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaoRelation {
    pub sentence: Option<String>,
    pub subject: Option<RelationArgument>,
    pub action: Option<RelationAction>,
    pub object: Option<RelationArgument>,
    pub location: Option<RelationArgument>,
}

/// Subject, object, or location of a relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationArgument {
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
    /// Object only: sentiment of the subject toward the object.
    pub sentiment_from_subject: Option<Sentiment>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationAction {
    pub text: Option<String>,
    pub lemmatized: Option<String>,
    pub verb: Option<RelationVerb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationVerb {
    pub text: Option<String>,
    pub tense: Option<String>,
    pub negated: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedRelations {
    pub url: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub typed_relations: Vec<TypedRelation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypedRelation {
    #[serde(rename = "type")]
    pub relation_type: Option<String>,
    pub sentence: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
    #[serde(default)]
    pub arguments: Vec<TypedArgument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedArgument {
    pub part: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<TypedEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedEntity {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dates {
    pub url: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub dates: Vec<ExtractedDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDate {
    /// The phrase as written, e.g. `next Tuesday`.
    pub text: Option<String>,
    pub date: Option<String>,
}

/// Several analyses in one call; only the features requested with
/// `extract` are filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResults {
    pub url: Option<String>,
    pub language: Option<String>,
    pub text: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub publication_date: Option<PublicationDate>,
    pub doc_sentiment: Option<Sentiment>,
    #[serde(default)]
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub taxonomy: Vec<Taxonomy>,
    #[serde(default)]
    pub relations: Vec<SaoRelation>,
    #[serde(default)]
    pub feeds: Vec<Feed>,
    #[serde(default)]
    pub image_keywords: Vec<ImageKeyword>,
    #[serde(default)]
    pub dates: Vec<ExtractedDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageKeywords {
    pub url: Option<String>,
    #[serde(default)]
    pub image_keywords: Vec<ImageKeyword>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageKeyword {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFaces {
    pub url: Option<String>,
    #[serde(default)]
    pub image_faces: Vec<ImageFace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFace {
    pub age: Option<ImageFaceAge>,
    pub gender: Option<ImageFaceGender>,
    pub identity: Option<ImageFaceIdentity>,
    pub height: Option<String>,
    pub width: Option<String>,
    pub position_x: Option<String>,
    pub position_y: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFaceAge {
    pub age_range: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFaceGender {
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFaceIdentity {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLink {
    pub url: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSceneText {
    pub url: Option<String>,
    /// All recognized lines joined by newlines.
    pub scene_text: Option<String>,
    #[serde(default)]
    pub scene_text_lines: Vec<SceneTextLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTextLine {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub confidence: Option<f64>,
    pub region: Option<SceneTextRegion>,
    #[serde(default)]
    pub words: Vec<SceneTextWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneTextWord {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub confidence: Option<f64>,
    pub region: Option<SceneTextRegion>,
}

/// Pixel bounding box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTextRegion {
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub x: Option<u32>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub y: Option<u32>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "super::lenient::deserialize")]
    pub height: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_scores_arrive_as_strings() {
        let json = r#"{
            "status": "OK",
            "language": "english",
            "taxonomy": [
                {"label": "/technology and computing/software", "score": "0.766"},
                {"confident": "no", "label": "/business and industrial", "score": "0.21"}
            ]
        }"#;
        let t: Taxonomies = serde_json::from_str(json).unwrap();
        assert_eq!(t.taxonomy.len(), 2);
        assert_eq!(t.taxonomy[0].score, Some(0.766));
        assert!(t.taxonomy[0].is_confident());
        assert!(!t.taxonomy[1].is_confident());
    }

    #[test]
    fn image_fields_use_camel_case() {
        let json = r#"{
            "url": "http://x/face.jpg",
            "imageFaces": [{
                "age": {"ageRange": "35-44", "score": "0.44"},
                "gender": {"gender": "MALE", "score": "0.99"},
                "positionX": "118"
            }]
        }"#;
        let f: ImageFaces = serde_json::from_str(json).unwrap();
        let face = &f.image_faces[0];
        assert_eq!(face.age.as_ref().and_then(|a| a.age_range.as_deref()), Some("35-44"));
        assert_eq!(face.position_x.as_deref(), Some("118"));
    }

    #[test]
    fn document_sentiment_reads_doc_and_targeted_forms() {
        let doc: DocumentSentiment =
            serde_json::from_str(r#"{"docSentiment":{"type":"positive","score":"0.5"}}"#).unwrap();
        assert_eq!(
            doc.doc_sentiment.and_then(|s| s.sentiment_type).as_deref(),
            Some("positive")
        );
        let targeted: DocumentSentiment = serde_json::from_str(
            r#"{"results":[{"text":"engine","sentiment":{"type":"negative","score":"-0.3"}}]}"#,
        )
        .unwrap();
        assert_eq!(targeted.results[0].text.as_deref(), Some("engine"));
    }

    #[test]
    fn typed_relation_scores_and_arguments() {
        let json = r#"{
            "typedRelations": [{
                "type": "locatedAt",
                "sentence": "IBM is based in Armonk.",
                "score": "0.89",
                "arguments": [
                    {"part": "first", "text": "IBM", "entities": [{"id": "-E1", "text": "IBM", "type": "Organization"}]},
                    {"part": "second", "text": "Armonk"}
                ]
            }]
        }"#;
        let r: TypedRelations = serde_json::from_str(json).unwrap();
        let relation = &r.typed_relations[0];
        assert_eq!(relation.score, Some(0.89));
        assert_eq!(relation.arguments[0].entities[0].entity_type.as_deref(), Some("Organization"));
        assert!(relation.arguments[1].entities.is_empty());
    }
}
