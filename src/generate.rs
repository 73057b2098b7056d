//! Generation driver: one conversation, bounded model-tool rounds.

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::ToolCatalog;
use crate::error::{AgentError, Result};
use crate::gateway::{GatewayClient, Message, ToolCall, Usage};
use crate::mcp::{ToolCallResult, ToolSession};
use crate::service::Service;

/// Persona prepended to every conversation.
const SYSTEM_PROMPT: &str = "\
AI assistant is a brand new, powerful, human-like artificial intelligence.
The traits of AI include expert knowledge, helpfulness, cleverness, and articulateness.
AI is a well-behaved and well-mannered individual.
AI is always friendly, kind, and inspiring, and he is eager to provide vivid and thoughtful responses to the user.
AI has the sum of all knowledge in their brain, and is able to accurately answer nearly any question about any topic in conversation.
AI assistant prefers using the tools provided to it to answer questions.";

const MAX_TOOL_ROUNDS: usize = 8;

/// Printed response object: the final text plus everything observed along
/// the way.
#[derive(Debug, Serialize)]
pub struct Report {
    pub model: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub tool_calls: Vec<ToolTrace>,
    pub usage: Usage,
}

/// Record of a single tool invocation performed during generation.
#[derive(Debug, Serialize)]
pub struct ToolTrace {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    pub arguments: Value,
    pub result: Value,
    pub is_error: bool,
}

/// Drive the conversation until the model produces a final text answer.
///
/// Trust boundary: the user prompt is forwarded verbatim and the model
/// decides on its own which catalog tools to invoke; every invocation is
/// billed to the account. Nothing here constrains what a hostile prompt can
/// trigger beyond the round cap.
pub async fn run_generation(
    gateway: &GatewayClient,
    catalog: &ToolCatalog,
    sessions: &mut [(Service, ToolSession)],
    prompt: &str,
) -> Result<Report> {
    let tools = catalog.gateway_tools();
    let mut messages = vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)];
    let mut traces = Vec::new();
    let mut usage = Usage::default();

    for round in 0..MAX_TOOL_ROUNDS {
        let turn = gateway.chat(&messages, &tools).await?;
        usage.add(turn.usage);

        let Some(tool_calls) = turn
            .message
            .tool_calls
            .clone()
            .filter(|calls| !calls.is_empty())
        else {
            let text = turn.message.content.clone().unwrap_or_default();
            return Ok(Report {
                model: turn.model.unwrap_or_else(|| gateway.model().to_string()),
                text,
                finish_reason: turn.finish_reason,
                tool_calls: traces,
                usage,
            });
        };

        debug!("Round {round}: model requested {} tool calls", tool_calls.len());
        messages.push(turn.message);

        for call in tool_calls {
            let service = catalog.get(&call.function.name).map(|entry| entry.service);
            let arguments = serde_json::from_str::<Value>(&call.function.arguments)
                .unwrap_or_else(|_| Value::String(call.function.arguments.clone()));

            let (feedback, result, is_error) = match invoke(catalog, sessions, &call).await {
                Ok(outcome) => {
                    let text = outcome.text();
                    let is_error = outcome.is_error;
                    (text, serde_json::to_value(&outcome)?, is_error)
                }
                Err(e) => {
                    // Reported back to the model instead of aborting the run.
                    warn!("Tool execution failed: {e}");
                    (format!("Error: {e}"), Value::String(e.to_string()), true)
                }
            };

            traces.push(ToolTrace {
                tool: call.function.name.clone(),
                service,
                arguments,
                result,
                is_error,
            });
            messages.push(Message::tool(call.id.clone(), feedback));
        }
    }

    Err(AgentError::ToolLoopLimit)
}

/// Route a model tool call to the session of the service that owns it.
async fn invoke(
    catalog: &ToolCatalog,
    sessions: &mut [(Service, ToolSession)],
    call: &ToolCall,
) -> Result<ToolCallResult> {
    let entry = catalog
        .get(&call.function.name)
        .ok_or_else(|| AgentError::ToolExecution(format!("unknown tool: {}", call.function.name)))?;

    let arguments: Value = serde_json::from_str(&call.function.arguments)?;

    let session = sessions
        .iter_mut()
        .find(|(service, _)| *service == entry.service)
        .map(|(_, session)| session)
        .ok_or_else(|| {
            AgentError::ToolExecution(format!("no session for service {}", entry.service))
        })?;

    session.call_tool(&call.function.name, arguments).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_serializes_with_traces_and_usage() {
        let report = Report {
            model: "gpt-4.1".to_string(),
            text: "done".to_string(),
            finish_reason: Some("stop".to_string()),
            tool_calls: vec![ToolTrace {
                tool: "search_search".to_string(),
                service: Some(Service::Search),
                arguments: json!({ "query": "latest AI news" }),
                result: json!({ "content": [{ "type": "text", "text": "headline" }] }),
                is_error: false,
            }],
            usage: Usage {
                prompt_tokens: 12,
                completion_tokens: 34,
                total_tokens: 46,
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["model"], "gpt-4.1");
        assert_eq!(json["tool_calls"][0]["service"], "search");
        assert_eq!(json["tool_calls"][0]["arguments"]["query"], "latest AI news");
        assert_eq!(json["usage"]["total_tokens"], 46);
    }

    #[test]
    fn report_omits_absent_finish_reason() {
        let report = Report {
            model: "gpt-4.1".to_string(),
            text: String::new(),
            finish_reason: None,
            tool_calls: Vec::new(),
            usage: Usage::default(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("finish_reason").is_none());
        assert!(json["tool_calls"].as_array().unwrap().is_empty());
    }
}
