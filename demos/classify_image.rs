//! Classify an image file (or URL) with Visual Recognition.
//!
//! Run with:
//! ```sh
//! VISUAL_RECOGNITION_APIKEY=... cargo run --example classify_image -- ./car.png
//! ```

use tracing_subscriber::EnvFilter;
use watson_sdk::service::visual_recognition::{ClassifyImagesOptions, VisualRecognitionOptions};
use watson_sdk::service::{ImageInput, VisualRecognition};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let target = std::env::args()
        .nth(1)
        .ok_or("usage: classify_image <image path or url>")?;
    let service = VisualRecognition::from_env()?;

    let is_url = target.starts_with("http://") || target.starts_with("https://");
    let (classify, faces) = if is_url {
        (
            ClassifyImagesOptions::default().url(target.as_str()),
            VisualRecognitionOptions::url(target.as_str()),
        )
    } else {
        (
            ClassifyImagesOptions::default().image(ImageInput::file(&target)),
            VisualRecognitionOptions::image(ImageInput::file(&target)),
        )
    };

    let result = service.classify(&classify.threshold(0.5)).await?;
    for image in &result.images {
        for classifier in &image.classifiers {
            for class in &classifier.classes {
                println!(
                    "{:<30} {:.3}",
                    class.class_name.as_deref().unwrap_or_default(),
                    class.score.unwrap_or_default()
                );
            }
        }
    }

    let detected = service.detect_faces(&faces).await?;
    let count: usize = detected.images.iter().map(|i| i.faces.len()).sum();
    println!("Faces detected: {}", count);
    Ok(())
}
