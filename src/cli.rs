//! Command-line input validation.

use crate::error::{AgentError, Result};

/// Usage text printed when no prompt is supplied.
pub const USAGE: &str = "\
Usage: atxp-agent \"your prompt/query here\"
Services available:
  image - Generate images
  search - Search for information

Examples:
  atxp-agent \"create an image of a beautiful sunset over mountains\"
  atxp-agent \"provide me with the latest news about AI\"";

/// Extract the prompt from a raw argument list.
///
/// The first element is the program name; the first positional argument after
/// it is the full prompt, taken verbatim. There is no flag parsing, so a
/// prompt starting with `-` is accepted as-is.
pub fn parse_prompt<I>(args: I) -> Result<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().nth(1).ok_or(AgentError::MissingPrompt)
}
