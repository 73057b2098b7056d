//! Remote tool services attached to a generation call.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::AgentError;

/// A remote tool service reachable over the MCP streamable-HTTP protocol.
///
/// The set is closed: each variant carries its endpoint, the tool name it is
/// expected to expose, a human-readable description, and the two pointwise
/// adapters between free-text prompts and the service's wire shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Image,
    Search,
}

impl Service {
    /// Fixed iteration order for catalog loading. On a tool-name collision
    /// the later service overwrites the earlier one, so `Search` wins.
    pub const ALL: [Service; 2] = [Service::Image, Service::Search];

    /// MCP endpoint the service's tool session connects to.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Service::Image => "https://image.mcp.atxp.ai",
            Service::Search => "https://search.mcp.atxp.ai",
        }
    }

    /// Tool name the service is expected to expose.
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Service::Image => "image_create_image",
            Service::Search => "search_search",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Service::Image => "image generation",
            Service::Search => "search",
        }
    }

    /// Map a free-text prompt into the argument shape the service's tool
    /// expects.
    #[must_use]
    pub fn arguments(self, prompt: &str) -> Value {
        match self {
            Service::Image => json!({ "prompt": prompt }),
            Service::Search => json!({ "query": prompt }),
        }
    }

    /// Extract a normalized value from a raw tool result.
    ///
    /// Not part of the generation flow: tool results are fed back to the
    /// model unprocessed. Kept as a plain adapter for direct callers.
    ///
    /// For `Image`, `content[0].text` is parsed as JSON and the `url` field
    /// is returned; text that does not parse (or parses without a `url`)
    /// comes back unchanged. For `Search`, `content[0].text` is returned
    /// as-is. Results without text content yield `None`.
    #[must_use]
    pub fn extract_result(self, raw: &Value) -> Option<Value> {
        let text = raw.get("content")?.get(0)?.get("text")?.as_str()?;
        match self {
            Service::Image => Some(
                serde_json::from_str::<Value>(text)
                    .ok()
                    .and_then(|parsed| parsed.get("url").cloned())
                    .unwrap_or_else(|| Value::String(text.to_string())),
            ),
            Service::Search => Some(Value::String(text.to_string())),
        }
    }
}

impl FromStr for Service {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Service::Image),
            "search" => Ok(Service::Search),
            _ => Err(AgentError::UnknownService(s.to_string())),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Service::Image => "image",
            Service::Search => "search",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_arguments_use_prompt_key() {
        assert_eq!(
            Service::Image.arguments("a red fox"),
            json!({ "prompt": "a red fox" })
        );
    }

    #[test]
    fn search_arguments_use_query_key() {
        assert_eq!(
            Service::Search.arguments("latest AI news"),
            json!({ "query": "latest AI news" })
        );
    }

    #[test]
    fn image_result_extracts_url_from_json_text() {
        let raw = json!({ "content": [{ "text": "{\"url\":\"http://x\"}" }] });
        assert_eq!(
            Service::Image.extract_result(&raw),
            Some(Value::String("http://x".to_string()))
        );
    }

    #[test]
    fn image_result_falls_back_to_raw_text_on_parse_failure() {
        let raw = json!({ "content": [{ "text": "not json" }] });
        assert_eq!(
            Service::Image.extract_result(&raw),
            Some(Value::String("not json".to_string()))
        );
    }

    #[test]
    fn image_result_falls_back_when_url_is_absent() {
        let raw = json!({ "content": [{ "text": "{\"other\":1}" }] });
        assert_eq!(
            Service::Image.extract_result(&raw),
            Some(Value::String("{\"other\":1}".to_string()))
        );
    }

    #[test]
    fn search_result_returns_text_verbatim() {
        let raw = json!({ "content": [{ "text": "headline" }] });
        assert_eq!(
            Service::Search.extract_result(&raw),
            Some(Value::String("headline".to_string()))
        );
    }

    #[test]
    fn result_without_text_content_is_none() {
        assert_eq!(Service::Image.extract_result(&json!({})), None);
        assert_eq!(
            Service::Search.extract_result(&json!({ "content": [] })),
            None
        );
    }

    #[test]
    fn known_service_names_parse() {
        assert_eq!("image".parse::<Service>().unwrap(), Service::Image);
        assert_eq!("search".parse::<Service>().unwrap(), Service::Search);
    }

    #[test]
    fn unknown_service_name_is_rejected() {
        assert!(matches!(
            "video".parse::<Service>(),
            Err(AgentError::UnknownService(name)) if name == "video"
        ));
    }

    #[test]
    fn iteration_order_is_image_then_search() {
        assert_eq!(Service::ALL, [Service::Image, Service::Search]);
    }

    #[test]
    fn descriptors_name_their_expected_tools() {
        assert_eq!(Service::Image.tool_name(), "image_create_image");
        assert_eq!(Service::Search.tool_name(), "search_search");
        assert_eq!(Service::Image.description(), "image generation");
        assert_eq!(Service::Search.description(), "search");
        assert!(Service::Image.endpoint().starts_with("https://image.mcp."));
        assert!(Service::Search.endpoint().starts_with("https://search.mcp."));
    }
}
