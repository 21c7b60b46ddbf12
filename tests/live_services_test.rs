//! Integration tests against the live Watson services
//!
//! These tests need real service credentials and network access.
//! Run with: LIVE_TESTS=1 cargo test -p watson-sdk --test live_services_test -- --ignored
//!
//! Credentials are resolved the same way the clients resolve them at runtime:
//! `VCAP_SERVICES`, or per-service variables such as
//! - LANGUAGE_TRANSLATION_USERNAME / LANGUAGE_TRANSLATION_PASSWORD
//! - NATURAL_LANGUAGE_CLASSIFIER_USERNAME / NATURAL_LANGUAGE_CLASSIFIER_PASSWORD
//! - VISUAL_RECOGNITION_APIKEY
//! - ALCHEMY_API_APIKEY
//!
//! NLC_CLASSIFIER_ID names a trained classifier for the classify test.

use std::env;
use watson_sdk::credentials::ServiceCredentials;

fn should_run_live_tests() -> bool {
    env::var("LIVE_TESTS").is_ok()
}

macro_rules! require_live_tests {
    () => {
        if !should_run_live_tests() {
            eprintln!("Skipping test - set LIVE_TESTS=1 to run");
            return Ok(());
        }
    };
}

/// `true` when credentials for `service_name` can be discovered.
fn has_credentials(service_name: &str) -> bool {
    ServiceCredentials::from_env(service_name)
        .map(|c| c.credentials.is_some())
        .unwrap_or(false)
}

#[cfg(feature = "language-translation")]
#[tokio::test]
#[ignore]
async fn test_live_translation() -> anyhow::Result<()> {
    require_live_tests!();
    if !has_credentials("language_translation") {
        eprintln!("Skipping: no language_translation credentials");
        return Ok(());
    }

    let service = watson_sdk::service::LanguageTranslation::from_env()?;
    let result = service
        .translate_between("The weather is nice today", "en", "es")
        .await?;
    let translation = result
        .first_translation()
        .ok_or_else(|| anyhow::anyhow!("no translation returned"))?;
    assert!(!translation.is_empty());

    let languages = service.identify("Hola, ¿cómo estás?").await?;
    assert_eq!(languages[0].language.as_deref(), Some("es"));
    Ok(())
}

#[cfg(feature = "natural-language-classifier")]
#[tokio::test]
#[ignore]
async fn test_live_classifier() -> anyhow::Result<()> {
    require_live_tests!();
    if !has_credentials("natural_language_classifier") {
        eprintln!("Skipping: no natural_language_classifier credentials");
        return Ok(());
    }

    let service = watson_sdk::service::NaturalLanguageClassifier::from_env()?;
    let classifiers = service.get_classifiers().await?;
    println!("{} classifiers visible", classifiers.len());

    if let Ok(id) = env::var("NLC_CLASSIFIER_ID") {
        let classification = service.classify(&id, "Is it sunny?").await?;
        assert!(classification.top_class.is_some());
    }
    Ok(())
}

#[cfg(feature = "visual-recognition")]
#[tokio::test]
#[ignore]
async fn test_live_visual_recognition() -> anyhow::Result<()> {
    use watson_sdk::service::visual_recognition::ClassifyImagesOptions;

    require_live_tests!();
    if !has_credentials("visual_recognition") {
        eprintln!("Skipping: no visual_recognition credentials");
        return Ok(());
    }

    let service = watson_sdk::service::VisualRecognition::from_env()?;
    let options = ClassifyImagesOptions::default()
        .url("https://upload.wikimedia.org/wikipedia/commons/4/47/PNG_transparency_demonstration_1.png");
    let result = service.classify(&options).await?;
    assert_eq!(result.images.len(), 1);
    Ok(())
}

#[cfg(feature = "alchemy-language")]
#[tokio::test]
#[ignore]
async fn test_live_alchemy_language() -> anyhow::Result<()> {
    use watson_sdk::service::AlchemyRequest;

    require_live_tests!();
    if !has_credentials("alchemy_api") {
        eprintln!("Skipping: no alchemy_api credentials");
        return Ok(());
    }

    let service = watson_sdk::service::AlchemyLanguage::from_env()?;
    let taxonomy = service
        .get_taxonomy(&AlchemyRequest::text(
            "IBM Watson is a question answering computer system capable of answering \
             questions posed in natural language.",
        ))
        .await?;
    assert!(!taxonomy.taxonomy.is_empty());
    Ok(())
}
