//! Image description via a vision-capable chat-completion backend.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TunesmithError};
use crate::http::{bearer_headers, shared_client};

pub mod prompts;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4-vision-preview";

/// Mood/summary text derived from an image, hard-capped at 200 characters.
///
/// Truncation happens unconditionally on construction, positionally by
/// character, never mid-codepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub const MAX_CHARS: usize = 200;

    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if let Some((idx, _)) = text.char_indices().nth(Self::MAX_CHARS) {
            text.truncate(idx);
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One-shot wrapper around a vision-capable chat model.
///
/// Issues a single request per call; failures are not retried here.
pub struct DescriptionProvider {
    api_key: String,
    base_url: String,
    model: String,
}

impl DescriptionProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the vision model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Describe the image at `image_url` according to `prompt`.
    ///
    /// Sends one two-part user message (text prompt + image reference) and
    /// consumes `choices[0].message.content` from the response, truncated to
    /// [`Description::MAX_CHARS`]. Any backend failure becomes
    /// [`TunesmithError::ImageProcessing`] with the cause attached.
    pub async fn describe(&self, image_url: &str, prompt: &str) -> Result<Description> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
        });
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %self.model, "requesting image description");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| TunesmithError::image_processing_with("vision request failed", e))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(TunesmithError::image_processing(format!(
                "vision backend returned status {status}: {body_text}"
            )));
        }

        let data: ChatResponse = resp
            .json()
            .await
            .map_err(|e| TunesmithError::image_processing_with("malformed vision response", e))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| TunesmithError::image_processing("no choices in vision response"))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| TunesmithError::image_processing("vision response had no content"))?;

        Ok(Description::new(content))
    }
}

// Vision API response types (internal)

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_shorter_than_cap_is_untouched() {
        let d = Description::new("A calm lake at sunset.");
        assert_eq!(d.as_str(), "A calm lake at sunset.");
    }

    #[test]
    fn description_is_truncated_to_first_200_chars() {
        let long = "x".repeat(450);
        let d = Description::new(long);
        assert_eq!(d.as_str().chars().count(), 200);
        assert_eq!(d.as_str(), "x".repeat(200));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; byte-indexed truncation would panic or split it
        let long = "é".repeat(300);
        let d = Description::new(long);
        assert_eq!(d.as_str().chars().count(), 200);
        assert!(d.as_str().chars().all(|c| c == 'é'));
    }

    #[test]
    fn exactly_200_chars_survives_intact() {
        let exact = "y".repeat(200);
        let d = Description::new(exact.clone());
        assert_eq!(d.as_str(), exact);
    }
}
