use std::process::ExitCode;

use atxp_agent::error::AgentError;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("atxp_agent=info"))
        .init();

    match atxp_agent::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Render a failure on stderr; stdout stays reserved for the success payload.
fn report_failure(error: &AgentError) {
    match error {
        AgentError::MissingPrompt => eprintln!("{}", atxp_agent::cli::USAGE),
        AgentError::MissingCredential => {
            eprintln!("Error: ATXP_CONNECTION environment variable is required");
            eprintln!(
                "Example: ATXP_CONNECTION=https://accounts.atxp.ai?connection_token=<random_token>&account_id=<random_string>"
            );
        }
        _ => eprintln!("Error: {error}"),
    }
}
