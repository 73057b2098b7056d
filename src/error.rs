use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("no prompt supplied")]
    MissingPrompt,

    #[error("ATXP_CONNECTION environment variable is required")]
    MissingCredential,

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Gateway API error ({status}): {message}")]
    GatewayApi {
        status: StatusCode,
        message: String,
    },

    #[error("Gateway response error: {0}")]
    GatewayResponse(String),

    #[error("Tool session error: {0}")]
    Session(String),

    #[error("Tool server error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("Tool loop limit exceeded")]
    ToolLoopLimit,

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
