// Thin HTTP client for the Gemini generateContent endpoint
//
// Builds the request body, pulls the first candidate's text back out, and
// strips the markdown fences Gemini likes to wrap JSON in.

use crate::error::{CartError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

// Everything on the reply side is optional. Gemini omits whole branches of
// this structure when a candidate is filtered or empty.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    fence: Regex,
}

impl GeminiClient {
    /// Create a client for one model behind one API key
    ///
    /// # Arguments
    /// * `api_key` - Google AI Studio API key
    /// * `model` - Model name, e.g. "gemini-1.5-pro"
    /// * `base_url` - API root, usually the v1beta endpoint
    /// * `timeout` - Applied to every request
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        // Compile the fence pattern once, not per reply
        let fence = Regex::new(r"(?i)```json\s*")
            .map_err(|e| CartError::Config(format!("bad fence pattern: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            fence,
        })
    }

    /// Send a prompt and return the model's reply text, fences stripped
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.http.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(CartError::UpstreamUnavailable(format!(
                "Gemini returned HTTP {}",
                response.status()
            )));
        }

        let decoded: GenerateResponse = response.json().await?;
        let raw = reply_text(decoded)?;

        Ok(self.clean_json_response(&raw))
    }

    /// Strip markdown code fences from a reply
    ///
    /// Gemini often wraps JSON in ```json ... ``` despite being told not to.
    fn clean_json_response(&self, text: &str) -> String {
        self.fence
            .replace(text, "")
            .replace("```", "")
            .trim()
            .to_string()
    }
}

// Walk the candidates structure down to the first part's text
fn reply_text(response: GenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(CartError::UpstreamUnavailable(
            "empty Gemini reply".to_string(),
        ));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> GeminiClient {
        GeminiClient::new(
            "test-key",
            "gemini-1.5-pro",
            "https://example.invalid/v1beta",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_clean_strips_json_fence() {
        let client = test_client();

        let cleaned = client.clean_json_response("```json\n{\"intent\": \"add_to_list\"}\n```");
        assert_eq!(cleaned, "{\"intent\": \"add_to_list\"}");
    }

    #[test]
    fn test_clean_fence_is_case_insensitive() {
        let client = test_client();

        let cleaned = client.clean_json_response("```JSON\n[1, 2]\n```");
        assert_eq!(cleaned, "[1, 2]");
    }

    #[test]
    fn test_clean_leaves_plain_text_alone() {
        let client = test_client();

        let cleaned = client.clean_json_response("Not a shopping command.");
        assert_eq!(cleaned, "Not a shopping command.");
    }

    #[test]
    fn test_clean_handles_bare_fences() {
        let client = test_client();

        let cleaned = client.clean_json_response("```\n{\"a\": 1}\n```");
        assert_eq!(cleaned, "{\"a\": 1}");
    }

    #[test]
    fn test_reply_text_extracts_first_part() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "hello" }]
                }
            }]
        }))
        .unwrap();

        assert_eq!(reply_text(response).unwrap(), "hello");
    }

    #[test]
    fn test_reply_text_rejects_empty_candidates() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();

        let result = reply_text(response);
        assert!(matches!(result, Err(CartError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_reply_text_rejects_missing_content() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{}]
        }))
        .unwrap();

        assert!(reply_text(response).is_err());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "add milk".to_string(),
                }],
            }],
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({ "contents": [{ "parts": [{ "text": "add milk" }] }] })
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiClient::new(
            "k",
            "m",
            "https://example.invalid/v1beta/",
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(client.base_url, "https://example.invalid/v1beta");
    }
}
