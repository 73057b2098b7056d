use std::env;

use log::{debug, error, info};

use crate::error::{AgentError, Result};

/// Environment variable carrying the ATXP connection string.
pub const CONNECTION_VAR: &str = "ATXP_CONNECTION";

#[derive(Debug, Clone)]
pub struct Config {
    pub connection: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        Self::from_lookup(env::var(CONNECTION_VAR).ok())
    }

    fn from_lookup(connection: Option<String>) -> Result<Self> {
        match connection {
            Some(connection) if !connection.is_empty() => {
                info!("Configuration loaded successfully");
                debug!("Connection string length: {} characters", connection.len());
                Ok(Self { connection })
            }
            _ => {
                error!("{CONNECTION_VAR} is not set");
                Err(AgentError::MissingCredential)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_credential_is_an_error() {
        assert!(matches!(
            Config::from_lookup(None),
            Err(AgentError::MissingCredential)
        ));
    }

    #[test]
    fn empty_credential_is_an_error() {
        assert!(matches!(
            Config::from_lookup(Some(String::new())),
            Err(AgentError::MissingCredential)
        ));
    }

    #[test]
    fn present_credential_is_kept_verbatim() {
        let config = Config::from_lookup(Some("https://accounts.atxp.ai?connection_token=t".into()))
            .expect("config expected");
        assert_eq!(config.connection, "https://accounts.atxp.ai?connection_token=t");
    }
}
