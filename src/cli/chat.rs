//! Interactive text session

use crate::agents::RequestHandler;
use crate::cli::output::Output;
use crate::types::{AppError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const PROMPT: &str = "What would you like help with?";

/// The whole line is `exit` or `quit`, ignoring case
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Read requests line by line until `exit`/`quit` or end of input.
///
/// Every other line, blank ones included, is sent to `handler` exactly once.
/// Handler errors are printed and the session continues. Returns the number
/// of requests handled.
pub async fn run_interactive<R>(
    reader: R,
    handler: &dyn RequestHandler,
    output: &Output,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    loop {
        output.prompt(PROMPT);
        let next = lines
            .next_line()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read input: {}", e)))?;
        let line = match next {
            Some(line) => line,
            None => {
                output.newline();
                break;
            }
        };

        if is_exit_command(&line) {
            break;
        }

        output.info("\nProcessing your request...");
        handled += 1;
        match handler.handle(&line).await {
            Ok(response) => output.agent_response(&response),
            Err(e) => {
                tracing::warn!(error = %e, "Request failed");
                output.error(&format!("An error occurred: {}", e));
            }
        }
    }

    output.info("Thank you for using the Multi-Agent System. Goodbye!");
    Ok(handled)
}
