mod scripted;
mod source;
mod terminal;

pub use scripted::ScriptedConsole;
pub use source::Console;
pub use terminal::Terminal;

use anyhow::{Result, anyhow};
use tracing::debug;

pub const RETRY_MESSAGE: &str = "Invalid input. Please try again.";

/// Prompts until the answer, trimmed and lowercased, is one of `allowed`.
///
/// # Errors
///
/// Returns an error if the console runs out of input before a valid answer.
pub fn prompt_for_choice<C: Console + ?Sized>(
    console: &mut C,
    prompt: &str,
    allowed: &[&str],
) -> Result<String> {
    let question = format!("{} [{}]: ", prompt, allowed.join(", "));

    loop {
        let line = console
            .read_line(&question)?
            .ok_or_else(|| anyhow!("input closed while waiting for: {prompt}"))?;
        let answer = line.trim().to_lowercase();

        if allowed.contains(&answer.as_str()) {
            return Ok(answer);
        }

        debug!(answer = %answer, "Rejected input");
        console.say(RETRY_MESSAGE)?;
    }
}
