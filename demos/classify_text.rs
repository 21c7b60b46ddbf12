//! Classify a phrase with a trained Natural Language Classifier.
//!
//! Run with:
//! ```sh
//! NATURAL_LANGUAGE_CLASSIFIER_USERNAME=... NATURAL_LANGUAGE_CLASSIFIER_PASSWORD=... \
//!     cargo run --example classify_text -- <classifier-id> "How hot will it be today?"
//! ```
//!
//! Without a classifier id the demo lists the classifiers visible to the
//! credentials instead.

use tracing_subscriber::EnvFilter;
use watson_sdk::service::NaturalLanguageClassifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let service = NaturalLanguageClassifier::from_env()?;
    let mut args = std::env::args().skip(1);

    let Some(classifier_id) = args.next() else {
        for classifier in service.get_classifiers().await? {
            println!(
                "{} {} ({:?})",
                classifier.classifier_id.unwrap_or_default(),
                classifier.name.unwrap_or_default(),
                classifier.status
            );
        }
        return Ok(());
    };
    let text = args
        .next()
        .unwrap_or_else(|| "How hot will it be today?".to_string());

    let classification = service.classify(&classifier_id, &text).await?;
    println!("Top class: {}", classification.top_class.unwrap_or_default());
    for class in classification.classes {
        println!(
            "  {:<24} {:.4}",
            class.class_name.unwrap_or_default(),
            class.confidence.unwrap_or_default()
        );
    }
    Ok(())
}
