use std::io::{ErrorKind, Write};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::notifier::interface;

/// Line-oriented terminal front-end. The command loop and confirmation
/// prompts read from the same input buffer.
pub struct Terminal<R = Stdin> {
    lines: Mutex<Lines<BufReader<R>>>,
}

impl Terminal<Stdin> {
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl Default for Terminal<Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsyncRead + Unpin> Terminal<R> {
    pub fn from_reader(reader: R) -> Self {
        Terminal {
            lines: Mutex::new(BufReader::new(reader).lines()),
        }
    }

    /// Prints `prompt` and waits for one line. `None` on end of input.
    pub async fn read_line(
        &self,
        prompt: &str,
    ) -> std::io::Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut lines = self.lines.lock().await;
        lines.next_line().await
    }

    /// Like `read_line`, but lines that are not valid UTF-8 are logged and
    /// skipped. Any other read error ends the input.
    pub async fn next_line(&self, prompt: &str) -> Option<String> {
        loop {
            match self.read_line(prompt).await {
                Ok(line) => return line,
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    ::log::error!("skipping unreadable input line: {}", err);
                }
                Err(err) => {
                    ::log::error!("failed to read input: {}", err);
                    return None;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<R: AsyncRead + Unpin + Send> interface::Notifier for Terminal<R> {
    fn alert(&self, message: &str) {
        println!("! {}", message);
    }

    async fn confirm(&self, message: &str) -> bool {
        match self.read_line(&format!("{} [y/N] ", message)).await {
            Ok(Some(answer)) => {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
            Ok(None) => false,
            Err(err) => {
                ::log::error!("failed to read confirmation: {}", err);
                false
            }
        }
    }
}
