//! Plain-text live output for terminals and pipes

use super::{LiveRenderer, RenderError};
use crate::history::FinalizedMessage;
use crate::splitter::SplitEvent;
use async_trait::async_trait;
use std::io::Write;

const REASONING_PREFIX: &str = "> ";

/// Streams answer text as it arrives and quotes reasoning under a header.
///
/// Output is append-only, so on completion the normalized answer is printed
/// once more below a rule.
pub struct TerminalRenderer<W> {
    out: W,
    at_line_start: bool,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            at_line_start: true,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) -> Result<(), RenderError> {
        if let Some(last) = text.chars().last() {
            self.at_line_start = last == '\n';
        }
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn newline_if_needed(&mut self) -> Result<(), RenderError> {
        if !self.at_line_start {
            self.write("\n")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> LiveRenderer for TerminalRenderer<W> {
    async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError> {
        match event {
            SplitEvent::AnswerText(text) => self.write(text)?,
            SplitEvent::ReasoningOpen => {
                self.newline_if_needed()?;
                self.write("▼ Thinking...\n")?;
                self.write(REASONING_PREFIX)?;
            }
            SplitEvent::ReasoningChunk(text) => {
                let quoted = text.replace('\n', &format!("\n{REASONING_PREFIX}"));
                self.write(&quoted)?;
            }
            SplitEvent::ReasoningClose => {
                self.newline_if_needed()?;
                self.write("▲\n")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    async fn on_complete(&mut self, message: &FinalizedMessage) -> Result<(), RenderError> {
        self.newline_if_needed()?;
        self.write("───\n")?;
        if !message.answer_text.is_empty() {
            let answer = format!("{}\n", message.answer_text);
            self.write(&answer)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
