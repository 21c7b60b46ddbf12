//! Identify the language of a sentence and translate it to Spanish.
//!
//! Run with:
//! ```sh
//! LANGUAGE_TRANSLATION_USERNAME=... LANGUAGE_TRANSLATION_PASSWORD=... \
//!     cargo run --example translate_text -- "The weather is nice today"
//! ```

use tracing_subscriber::EnvFilter;
use watson_sdk::service::LanguageTranslation;
use watson_sdk::service::language_translation::ModelFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "The weather is nice today".to_string());
    let service = LanguageTranslation::from_env()?;

    let languages = service.identify(&text).await?;
    let source = languages
        .first()
        .and_then(|l| l.language.clone())
        .unwrap_or_else(|| "en".to_string());
    println!("Detected language: {}", source);

    let filter = ModelFilter {
        default: Some(true),
        source: Some(source.clone()),
        target: Some("es".to_string()),
    };
    let models = service.get_models(&filter).await?;
    println!("Default {}-es models: {}", source, models.len());

    let result = service.translate_between(&text, &source, "es").await?;
    println!("{}", result.first_translation().unwrap_or("<no translation>"));
    Ok(())
}
