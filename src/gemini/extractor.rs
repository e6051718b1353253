/// Turns a spoken utterance into a raw intent payload
///
/// The prompt pins Gemini to one of three intent shapes or the literal
/// sentinel line, so everything downstream only has to handle JSON plus one
/// known string.

use crate::core::intent::{INTENT_ADD, INTENT_REMOVE, INTENT_SEARCH, NOT_A_COMMAND};
use crate::error::{CartError, Result};
use crate::gemini::GeminiClient;
use crate::session::IntentExtractor;
use async_trait::async_trait;
use serde_json::Value;

pub struct GeminiExtractor {
    client: GeminiClient,
}

impl GeminiExtractor {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    // The full extraction prompt. Field names and formats here are load
    // bearing: the validator expects exactly these keys.
    fn prompt_for(utterance: &str) -> String {
        format!(
            r#"
You are a smart voice shopping assistant.

Task:
1. Identify the intent:
   - "{INTENT_ADD}": add item to shopping list
   - "{INTENT_REMOVE}": remove item
   - "{INTENT_SEARCH}": search for a product or apply filters

2. Extract fields:
   - item: product name (singular, lowercase)
   - quantity: default 1 (only add/remove)
   - category: classify item (e.g., dairy, snacks, vegetables, beverages)
   - price: realistic unit price in dollar
   - brand: if mentioned, else "any"
   - size: if mentioned, else "any"
   - price_range: only for search; object with min/max, default 0
   - filters: only for search; keys like brand and size, default "any"
   - search_term: user query (singular form)

Rules:
- Respond only in raw JSON, no markdown/explanations
- No null/undefined values
- Quantity and price must be numbers
- Formats:

Add/remove:
{{
  "intent": "{INTENT_ADD}" | "{INTENT_REMOVE}",
  "item": "<item>",
  "quantity": <number>,
  "category": "<category>",
  "price": <number>,
  "brand": "<brand>",
  "size": "<size>"
}}

Search:
{{
  "intent": "{INTENT_SEARCH}",
  "search_term": "<term>",
  "filters": {{
    "brand": "<brand>",
    "size": "<size>"
  }},
  "price_range": {{
    "min": <number>,
    "max": <number>
  }}
}}

If not a shopping command, respond exactly:
"{NOT_A_COMMAND}"

User input: "{utterance}"
Languages: Hindi, Marathi, Tamil, etc. Translate to English if needed.
"#
        )
    }
}

#[async_trait]
impl IntentExtractor for GeminiExtractor {
    async fn extract(&self, utterance: &str) -> Result<Value> {
        let reply = self.client.generate(&Self::prompt_for(utterance)).await?;
        parse_reply(&reply)
    }
}

// The model sometimes answers with the bare sentinel line, which is not
// valid JSON. Catch that before parsing; everything else must parse.
fn parse_reply(cleaned: &str) -> Result<Value> {
    let trimmed = cleaned.trim();

    if trimmed == NOT_A_COMMAND {
        return Ok(Value::String(NOT_A_COMMAND.to_string()));
    }

    serde_json::from_str(trimmed)
        .map_err(|e| CartError::UpstreamUnavailable(format!("unparseable extraction reply: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_sentinel() {
        let value = parse_reply("Not a shopping command.").unwrap();
        assert_eq!(value, Value::String(NOT_A_COMMAND.to_string()));
    }

    #[test]
    fn test_parse_quoted_sentinel() {
        // Same sentinel, but sent as a JSON string literal
        let value = parse_reply("\"Not a shopping command.\"").unwrap();
        assert_eq!(value, Value::String(NOT_A_COMMAND.to_string()));
    }

    #[test]
    fn test_parse_intent_object() {
        let value = parse_reply(r#"{"intent": "add_to_list", "item": "milk"}"#).unwrap();
        assert_eq!(value, json!({"intent": "add_to_list", "item": "milk"}));
    }

    #[test]
    fn test_parse_garbage_is_upstream_error() {
        let result = parse_reply("Sure! Here is the JSON you asked for:");
        assert!(matches!(result, Err(CartError::UpstreamUnavailable(_))));
    }

    #[test]
    fn test_prompt_names_every_intent_tag() {
        let prompt = GeminiExtractor::prompt_for("add two eggs");

        assert!(prompt.contains(INTENT_ADD));
        assert!(prompt.contains(INTENT_REMOVE));
        assert!(prompt.contains(INTENT_SEARCH));
        assert!(prompt.contains(NOT_A_COMMAND));
        assert!(prompt.contains("User input: \"add two eggs\""));
    }
}
