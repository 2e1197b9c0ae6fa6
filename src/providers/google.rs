//! Google Cloud Vision label detection.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use super::{encode_image_jpeg_base64, http_client, LabelProvider, REQUEST_TIMEOUT};
use crate::error::ProviderError;

const ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
const MAX_RESULTS: u32 = 10;

pub struct GoogleVision {
    api_key: String,
    max_image_dimension: u32,
}

impl GoogleVision {
    pub fn new(api_key: String, max_image_dimension: u32) -> Self {
        Self {
            api_key,
            max_image_dimension,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResult {
    #[serde(rename = "labelAnnotations", default)]
    label_annotations: Vec<LabelAnnotation>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
}

fn labels_of(response: AnnotateResponse) -> Vec<String> {
    response
        .responses
        .into_iter()
        .next()
        .map(|r| {
            r.label_annotations
                .into_iter()
                .map(|l| l.description)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl LabelProvider for GoogleVision {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn labels(&self, image: &Path) -> Result<Vec<String>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey("Google Vision"));
        }

        let content = encode_image_jpeg_base64(image, self.max_image_dimension)?;
        let body = serde_json::json!({
            "requests": [{
                "image": { "content": content },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": MAX_RESULTS }]
            }]
        });

        let url = format!("{}?key={}", ENDPOINT, self.api_key);
        let response = http_client()
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status, body));
        }

        let parsed: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(labels_of(parsed))
    }
}
