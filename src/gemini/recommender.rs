// Suggests items to buy again based on the change history

use crate::db::HistoryEntry;
use crate::error::{CartError, Result};
use crate::gemini::GeminiClient;
use crate::session::Recommender;
use async_trait::async_trait;

// How many suggestions to ask for
const SUGGESTION_COUNT: usize = 5;

pub struct GeminiRecommender {
    client: GeminiClient,
}

impl GeminiRecommender {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    fn prompt_for(history_json: &str) -> String {
        format!(
            r#"
You are a helpful assistant. Based on the user's shopping history below, recommend {SUGGESTION_COUNT} items they might want to buy again or are seasonally relevant or low in stock (e.g., one left or two).

Shopping history: {history_json}

Respond ONLY as a JSON array of item strings with good sentence. Example:
["hey wanna drink milk u might feel healthy", "eat bread fill your stomach", "fresh mangoes in the house grab them","grapes are into the season smash them","have a good time to buy a new pen"]
"#
        )
    }
}

#[async_trait]
impl Recommender for GeminiRecommender {
    async fn recommend(&self, history: &[HistoryEntry]) -> Result<Vec<String>> {
        // Nothing bought yet means nothing to recommend from. Skip the call.
        if history.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_string(history)?;
        let reply = self.client.generate(&Self::prompt_for(&payload)).await?;

        parse_reply(&reply)
    }
}

fn parse_reply(cleaned: &str) -> Result<Vec<String>> {
    serde_json::from_str(cleaned.trim()).map_err(|e| {
        CartError::UpstreamUnavailable(format!("unparseable recommendation reply: {}", e))
    })
}
