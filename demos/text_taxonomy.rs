//! Categorize text and pull out its keywords with AlchemyLanguage.
//!
//! Run with:
//! ```sh
//! ALCHEMY_API_APIKEY=... cargo run --example text_taxonomy -- "IBM Watson won Jeopardy! in 2011."
//! ```

use tracing_subscriber::EnvFilter;
use watson_sdk::service::{AlchemyLanguage, AlchemyRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text = std::env::args().nth(1).unwrap_or_else(|| {
        "IBM Watson is a question answering computer system capable of answering \
         questions posed in natural language."
            .to_string()
    });
    let service = AlchemyLanguage::from_env()?;

    let taxonomy = service.get_taxonomy(&AlchemyRequest::text(&text)).await?;
    for t in &taxonomy.taxonomy {
        println!(
            "{:<50} {:.3}{}",
            t.label.as_deref().unwrap_or_default(),
            t.score.unwrap_or_default(),
            if t.is_confident() { "" } else { " (not confident)" }
        );
    }

    let request = AlchemyRequest::text(&text).max_retrieve(5).sentiment(true);
    let keywords = service.get_keywords(&request).await?;
    for keyword in keywords.keywords {
        let sentiment = keyword
            .sentiment
            .and_then(|s| s.sentiment_type)
            .unwrap_or_else(|| "neutral".to_string());
        println!("  {} [{}]", keyword.text.unwrap_or_default(), sentiment);
    }
    Ok(())
}
