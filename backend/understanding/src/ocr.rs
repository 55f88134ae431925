//! OCR fallback via the OCR.space REST API.
//!
//! Purely informational: the raw text rides along in responses for
//! debugging, it never drives control flow or persistence. That is why this
//! client reports problems as a tagged string instead of an error value.

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

const OCR_URL: &str = "https://api.ocr.space/parse/image";

pub struct OcrClient {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl OcrClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Extract plain text from the image, or return a tagged
    /// `"OCR processing error: ..."` string. Never fails the request.
    pub async fn extract_text(&self, image_path: &Path) -> String {
        match self.try_extract(image_path).await {
            Ok(text) => text,
            Err(e) => format!("OCR processing error: {e}"),
        }
    }

    async fn try_extract(&self, image_path: &Path) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            bail!("OCR_API_KEY is not configured");
        };

        info!("[OCR] Sending {} to OCR.space", image_path.display());

        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpeg")
            .to_string();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new()
            .text("apikey", api_key.clone())
            .text("language", "eng")
            .part("filename", part);

        let resp = self.http.post(OCR_URL).multipart(form).send().await?;
        if !resp.status().is_success() {
            bail!("OCR.space returned {}", resp.status());
        }

        let json: serde_json::Value = resp.json().await?;
        if let Some(text) = json["ParsedResults"][0]["ParsedText"].as_str() {
            return Ok(text.to_string());
        }

        // Surface the whole body for debugging, as there is no error schema
        // worth modelling.
        bail!("unexpected response format: {json}")
    }
}

// The tagged-string contract is load-bearing for callers that embed the OCR
// output verbatim; keep the prefix stable.
pub fn is_ocr_error(text: &str) -> bool {
    text.starts_with("OCR processing error:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_yields_tagged_string() {
        let client = OcrClient::new(None);
        let text = client.extract_text(Path::new("does-not-matter.jpeg")).await;
        assert!(is_ocr_error(&text));
        assert!(text.contains("OCR_API_KEY"));
    }

    #[tokio::test]
    async fn unreadable_file_yields_tagged_string() {
        let client = OcrClient::new(Some("key".to_string()));
        let text = client.extract_text(Path::new("/no/such/file.jpeg")).await;
        assert!(is_ocr_error(&text));
    }

    #[test]
    fn tag_detection() {
        assert!(is_ocr_error("OCR processing error: boom"));
        assert!(!is_ocr_error("43 days completed"));
    }
}
