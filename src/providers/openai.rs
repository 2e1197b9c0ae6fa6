//! OpenAI vision labeling via the chat completions API.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use super::{encode_image_jpeg_base64, http_client, LabelProvider, REQUEST_TIMEOUT};
use crate::error::ProviderError;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const MAX_LABELS: usize = 10;

const LABEL_PROMPT: &str = "List up to 10 short descriptive labels for this image, \
one label per line, most relevant first. Plain words only, no numbering or punctuation.";

pub struct OpenAiVision {
    api_key: String,
    max_image_dimension: u32,
}

impl OpenAiVision {
    pub fn new(api_key: String, max_image_dimension: u32) -> Self {
        Self {
            api_key,
            max_image_dimension,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// One label per response line, cleaned of list formatting the model may add
/// despite the prompt.
fn labels_from_content(content: &str) -> Vec<String> {
    content
        .lines()
        .map(clean_label)
        .filter(|l| !l.is_empty())
        .take(MAX_LABELS)
        .collect()
}

fn clean_label(line: &str) -> String {
    let mut s = line.trim();
    s = s.trim_start_matches(['-', '*', '\u{2022}']).trim_start();

    // "1." / "2)" style numbering
    if let Some(idx) = s.find(['.', ')']) {
        let (head, tail) = s.split_at(idx);
        if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
            s = tail[1..].trim_start();
        }
    }

    s.trim_matches(['"', '`', '\'']).trim().to_string()
}

#[async_trait]
impl LabelProvider for OpenAiVision {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn labels(&self, image: &Path) -> Result<Vec<String>, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey("OpenAI"));
        }

        let encoded = encode_image_jpeg_base64(image, self.max_image_dimension)?;
        let data_url = format!("data:image/jpeg;base64,{}", encoded);

        let body = serde_json::json!({
            "model": MODEL,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "image_url", "image_url": { "url": data_url } },
                    { "type": "text", "text": LABEL_PROMPT }
                ]
            }]
        });

        let response = http_client()
            .post(ENDPOINT)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status(status, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Malformed("response has no choices".to_string()))?;

        Ok(labels_from_content(&content))
    }
}
