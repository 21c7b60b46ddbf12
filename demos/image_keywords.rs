//! Tag an image and find faces in it with AlchemyVision.
//!
//! Run with:
//! ```sh
//! ALCHEMY_API_APIKEY=... cargo run --example image_keywords -- ./dog.jpg
//! ```

use tracing_subscriber::EnvFilter;
use watson_sdk::service::{AlchemyRequest, AlchemyVision, ImageInput};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let target = std::env::args()
        .nth(1)
        .ok_or("usage: image_keywords <image path or url>")?;
    let service = AlchemyVision::from_env()?;

    let request = if target.starts_with("http://") || target.starts_with("https://") {
        AlchemyRequest::url(target)
    } else {
        AlchemyRequest::image(ImageInput::file(target))
    };

    let keywords = service.get_image_keywords(&request).await?;
    for keyword in &keywords.image_keywords {
        println!(
            "{:<20} {:.3}",
            keyword.text.as_deref().unwrap_or_default(),
            keyword.score.unwrap_or_default()
        );
    }

    let faces = service.recognize_faces(&request).await?;
    for face in faces.image_faces {
        let age = face.age.and_then(|a| a.age_range).unwrap_or_default();
        let gender = face.gender.and_then(|g| g.gender).unwrap_or_default();
        let name = face.identity.and_then(|i| i.name);
        println!("face: age {} {} {}", age, gender, name.unwrap_or_default());
    }
    Ok(())
}
