//! Label-detection providers. Each adapter takes image bytes and returns an
//! ordered list of plain text labels; all failures degrade to an empty list
//! so the rename workflow keeps going without suggestions.

pub mod google;
pub mod openai;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::imageops::FilterType;
use image::ImageFormat;
use once_cell::sync::Lazy;
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::error::ProviderError;
use crate::settings::{Provider, Settings};

pub use google::GoogleVision;
pub use openai::OpenAiVision;

/// Fixed per-request timeout for provider calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

pub(crate) fn http_client() -> &'static reqwest::Client {
    &HTTP
}

/// A label-detection service: image file in, ranked plain-text labels out
/// (typically at most 10).
#[async_trait]
pub trait LabelProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn labels(&self, image: &Path) -> Result<Vec<String>, ProviderError>;
}

/// Build the configured provider.
pub fn provider_for(settings: &Settings) -> Box<dyn LabelProvider> {
    match settings.provider {
        Provider::Google => Box::new(GoogleVision::new(
            settings.google_api_key.clone(),
            settings.max_image_dimension,
        )),
        Provider::OpenAi => Box::new(OpenAiVision::new(
            settings.openai_api_key.clone(),
            settings.max_image_dimension,
        )),
    }
}

/// Fetch labels for one image, degrading every failure (missing key, network,
/// malformed response, unreadable file) to an empty list.
pub async fn fetch_labels(provider: &dyn LabelProvider, image: &Path) -> Vec<String> {
    match provider.labels(image).await {
        Ok(labels) => labels,
        Err(err) => {
            warn!(
                provider = provider.name(),
                error = %err,
                image = %image.display(),
                "label request failed; continuing without suggestions"
            );
            Vec::new()
        }
    }
}

/// Decode an image, downscale so the longest side is at most `max_dimension`
/// (0 disables), normalize to JPEG and base64-encode for a request payload.
pub(crate) fn encode_image_jpeg_base64(
    path: &Path,
    max_dimension: u32,
) -> Result<String, ProviderError> {
    let img = image::open(path)?;
    let (w, h) = (img.width(), img.height());

    let img = if max_dimension > 0 && w.max(h) > max_dimension {
        let scale = max_dimension as f32 / w.max(h) as f32;
        let new_w = ((w as f32 * scale).round() as u32).max(1);
        let new_h = ((h as f32 * scale).round() as u32).max(1);
        img.resize(new_w, new_h, FilterType::Triangle)
    } else {
        img
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;
    Ok(BASE64.encode(&buf))
}
