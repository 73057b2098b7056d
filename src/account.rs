//! Payment account identity derived from the ATXP connection string.

use log::debug;
use url::Url;

use crate::error::{AgentError, Result};

/// Identity and payment account for tool sessions.
///
/// Parsed once from `ATXP_CONNECTION`, which has the shape
/// `https://accounts.atxp.ai?connection_token=<token>&account_id=<id>`.
/// The token authenticates every tool-session request; tool invocations made
/// through those sessions are billed against this account.
#[derive(Debug, Clone)]
pub struct Account {
    token: String,
    account_id: Option<String>,
}

impl Account {
    pub fn parse(connection: &str) -> Result<Self> {
        let url = Url::parse(connection)
            .map_err(|e| AgentError::InvalidConnectionString(e.to_string()))?;

        let mut token = None;
        let mut account_id = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "connection_token" => token = Some(value.into_owned()),
                "account_id" => account_id = Some(value.into_owned()),
                _ => {}
            }
        }

        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
            AgentError::InvalidConnectionString("missing connection_token parameter".to_string())
        })?;

        debug!(
            "Parsed account '{}' from connection string",
            account_id.as_deref().unwrap_or("<unnamed>")
        );

        Ok(Self { token, account_id })
    }

    /// Bearer token presented to tool-session endpoints.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_and_account_id() {
        let account =
            Account::parse("https://accounts.atxp.ai?connection_token=tok123&account_id=acct9")
                .expect("account expected");
        assert_eq!(account.bearer_token(), "tok123");
        assert_eq!(account.account_id(), Some("acct9"));
    }

    #[test]
    fn account_id_is_optional() {
        let account = Account::parse("https://accounts.atxp.ai?connection_token=tok123")
            .expect("account expected");
        assert_eq!(account.bearer_token(), "tok123");
        assert_eq!(account.account_id(), None);
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(matches!(
            Account::parse("https://accounts.atxp.ai?account_id=acct9"),
            Err(AgentError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn empty_token_is_an_error() {
        assert!(matches!(
            Account::parse("https://accounts.atxp.ai?connection_token="),
            Err(AgentError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn non_url_connection_string_is_an_error() {
        assert!(matches!(
            Account::parse("not a url"),
            Err(AgentError::InvalidConnectionString(_))
        ));
    }
}
