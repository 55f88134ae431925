/// Vision extraction — pull the name/platform/streak triple out of a streak
/// screenshot using a vision LLM.
///
/// One chat-completions request per image, no retries, client default
/// timeout. The model is told to answer with bare JSON; replies are still
/// defensively unfenced before parsing because models wrap output in
/// markdown anyway.
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::info;

use streakboard_core::{Extraction, Platform, StreakError};

const EXTRACTION_PROMPT: &str = "You are extracting data from a streak screenshot. Find: \
1) the full name of the person 2) the streak information (e.g., '43 days completed') \
3) which app produced the screenshot: Mimo or Elevate. \
Return ONLY valid JSON in this exact format: \
{\"name\": \"<full name>\", \"platform\": \"<Mimo or Elevate>\", \"streak\": \"<number> days completed\"}. \
Do not include markdown, backticks, explanation, or any extra text.";

pub struct VisionClient {
    endpoint: String,
    api_key: String,
    deployment: String,
    http: reqwest::Client,
}

impl VisionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Send the JPEG at `image_path` to the vision model and parse its reply.
    pub async fn extract(&self, image_path: &Path) -> Result<Extraction, StreakError> {
        info!("[Vision] Extracting streak data via {}", self.deployment);

        let bytes = tokio::fs::read(image_path).await?;
        let b64 = STANDARD.encode(&bytes);

        let body = serde_json::json!({
            "model": self.deployment,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": EXTRACTION_PROMPT },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:image/jpeg;base64,{}", b64) } }
                ]
            }]
        });

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StreakError::Vision(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            return Err(StreakError::Vision(format!("{status}: {detail}")));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| StreakError::Vision(e.to_string()))?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| StreakError::Vision("reply has no message content".to_string()))?;

        parse_model_reply(content)
    }
}

/// Parse a (possibly markdown-fenced) model reply into an `Extraction`.
///
/// Missing fields degrade: name/streak fall back to "Unknown", an
/// unrecognized platform falls back to Mimo. A reply that is not JSON at all
/// is an error.
pub fn parse_model_reply(raw: &str) -> Result<Extraction, StreakError> {
    #[derive(Deserialize)]
    struct RawExtraction {
        name: Option<String>,
        platform: Option<String>,
        streak: Option<String>,
    }

    let cleaned = strip_fences(raw);
    let parsed: RawExtraction = serde_json::from_str(cleaned)
        .map_err(|e| StreakError::Vision(format!("unparseable model reply: {e}")))?;

    Ok(Extraction {
        name: parsed.name.unwrap_or_else(|| "Unknown".to_string()),
        platform: Platform::parse(parsed.platform.as_deref().unwrap_or("")),
        streak: parsed.streak.unwrap_or_else(|| "Unknown".to_string()),
    })
}

/// Remove triple-backtick fences and a leading `json` language tag.
fn strip_fences(s: &str) -> &str {
    let mut t = s.trim();
    if let Some(rest) = t.strip_prefix("```") {
        t = rest.strip_prefix("json").unwrap_or(rest).trim_start();
        if let Some(end) = t.rfind("```") {
            t = &t[..end];
        }
        t = t.trim();
    }
    t
}
