//! Streamable-HTTP tool session against a single MCP endpoint.

use log::{debug, info};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};

use crate::account::Account;
use crate::error::{AgentError, Result};

use super::protocol::{
    InitializeResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, ToolCallResult,
    ToolDescriptor, ToolsListResult,
};

const SESSION_HEADER: &str = "Mcp-Session-Id";
const VERSION_HEADER: &str = "MCP-Protocol-Version";

/// A remote tool session: one endpoint, one identity, sequential requests.
///
/// All traffic is JSON-RPC over POST to the service endpoint. The session id
/// and protocol version handed back by the server during `initialize` are
/// echoed on every subsequent request. Errors propagate; there is no retry
/// and no timeout beyond the transport default.
pub struct ToolSession {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    session_id: Option<String>,
    protocol_version: Option<String>,
    next_id: u64,
}

impl ToolSession {
    /// Open a session: `initialize`, capture the session id, then send the
    /// `notifications/initialized` notification.
    pub async fn connect(endpoint: &str, account: &Account) -> Result<Self> {
        let mut session = Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: account.bearer_token().to_string(),
            session_id: None,
            protocol_version: None,
            next_id: 1,
        };

        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });
        let result = session.request("initialize", Some(params)).await?;
        let init: InitializeResult = serde_json::from_value(result)?;
        session.protocol_version = Some(init.protocol_version);
        if let Some(server) = init.server_info {
            debug!("{} identifies as '{}'", session.endpoint, server.name);
        }

        session.notify("notifications/initialized").await?;
        info!("Tool session established with {}", session.endpoint);
        Ok(session)
    }

    /// Retrieve the set of tools this session exposes.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolDescriptor>> {
        let result = self.request("tools/list", None).await?;
        let listed: ToolsListResult = serde_json::from_value(result)?;
        debug!("{} exposes {} tools", self.endpoint, listed.tools.len());
        Ok(listed.tools)
    }

    /// Invoke a tool by name with already-shaped arguments.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<ToolCallResult> {
        debug!("Calling tool '{name}' on {}", self.endpoint);
        let params = json!({ "name": name, "arguments": arguments });
        let result = self.request("tools/call", Some(params)).await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        let mut request = JsonRpcRequest::new(method, id);
        if let Some(params) = params {
            request = request.with_params(params);
        }

        let response = self.post(&request).await?.ok_or_else(|| {
            AgentError::Session(format!("{}: empty response to '{method}'", self.endpoint))
        })?;

        if let Some(error) = response.error {
            return Err(AgentError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or_else(|| {
            AgentError::Session(format!("{}: no result for '{method}'", self.endpoint))
        })
    }

    async fn notify(&mut self, method: &str) -> Result<()> {
        let request = JsonRpcRequest::notification(method);
        self.post(&request).await?;
        Ok(())
    }

    async fn post(&mut self, request: &JsonRpcRequest) -> Result<Option<JsonRpcResponse>> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json, text/event-stream")
            .json(request);

        if let Some(ref version) = self.protocol_version {
            builder = builder.header(VERSION_HEADER, version);
        }
        if let Some(ref session_id) = self.session_id {
            builder = builder.header(SESSION_HEADER, session_id);
        }

        let response = builder.send().await?;

        if let Some(session_id) = header_value(&response, SESSION_HEADER) {
            self.session_id = Some(session_id);
        }
        if let Some(version) = header_value(&response, VERSION_HEADER) {
            self.protocol_version = Some(version);
        }

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("failed to read error response: {e}"));
            return Err(AgentError::Session(format!(
                "{} returned {status}: {message}",
                self.endpoint
            )));
        }

        let body = response.text().await?;
        // Notifications are acknowledged with 202; any body is ignored.
        if request.id.is_none() || body.trim().is_empty() {
            return Ok(None);
        }

        let payload = decode_payload(&body)
            .map_err(|e| AgentError::Session(format!("{}: {e}", self.endpoint)))?;
        Ok(Some(serde_json::from_value(payload)?))
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Decode a response body that is either plain JSON or an SSE event stream
/// whose `data:` lines carry the JSON-RPC payload.
fn decode_payload(body: &str) -> std::result::Result<Value, String> {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return Ok(json);
    }

    let mut collected = String::new();
    for raw_line in body.lines() {
        if let Some(rest) = raw_line.trim().strip_prefix("data:") {
            let chunk = rest.trim();
            if !chunk.is_empty() {
                if !collected.is_empty() {
                    collected.push('\n');
                }
                collected.push_str(chunk);
            }
        }
    }

    if collected.is_empty() {
        return Err("no JSON payload or SSE data lines found".to_string());
    }

    serde_json::from_str::<Value>(&collected).map_err(|e| format!("invalid SSE data JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_body_decodes() {
        let payload = decode_payload(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#).unwrap();
        assert_eq!(payload["id"], 1);
    }

    #[test]
    fn sse_body_decodes_data_lines() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"tools\":[]}}\n\n";
        let payload = decode_payload(body).unwrap();
        assert_eq!(payload["id"], 2);
        assert!(payload["result"]["tools"].as_array().unwrap().is_empty());
    }

    #[test]
    fn body_without_payload_is_an_error() {
        assert!(decode_payload("event: ping\n\n").is_err());
        assert!(decode_payload("not json at all").is_err());
    }
}
