//! In-memory view model of a streaming response

use super::{LiveRenderer, RenderError};
use crate::history::FinalizedMessage;
use crate::splitter::SplitEvent;
use async_trait::async_trait;
use std::fmt;

/// Appended to text that is still streaming
pub const IN_PROGRESS_MARKER: char = '▌';

/// A collapsible reasoning region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasoningRegion {
    pub text: String,
    pub expanded: bool,
    pub complete: bool,
}

/// Visible state of one response: the answer region plus its reasoning regions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    answer: String,
    reasoning: Vec<ReasoningRegion>,
    in_progress: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed view of a message loaded from history, reasoning collapsed
    pub fn from_message(message: &FinalizedMessage) -> Self {
        Self {
            answer: message.answer_text.clone(),
            reasoning: message
                .reasoning_segments
                .iter()
                .map(|text| ReasoningRegion {
                    text: text.clone(),
                    expanded: false,
                    complete: true,
                })
                .collect(),
            in_progress: false,
        }
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn reasoning(&self) -> &[ReasoningRegion] {
        &self.reasoning
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Apply one event
    pub fn apply(&mut self, event: &SplitEvent) {
        match event {
            SplitEvent::AnswerText(text) => {
                self.in_progress = true;
                self.answer.push_str(text);
            }
            SplitEvent::ReasoningOpen => {
                self.in_progress = true;
                self.reasoning.push(ReasoningRegion {
                    text: String::new(),
                    expanded: true,
                    complete: false,
                });
            }
            SplitEvent::ReasoningChunk(text) => {
                self.in_progress = true;
                match self.reasoning.last_mut() {
                    Some(region) => region.text.push_str(text),
                    None => self.reasoning.push(ReasoningRegion {
                        text: text.clone(),
                        expanded: true,
                        complete: false,
                    }),
                }
            }
            SplitEvent::ReasoningClose => {
                if let Some(region) = self.reasoning.last_mut() {
                    region.expanded = false;
                    region.complete = true;
                }
            }
        }
    }

    /// Stream finished: drop the marker and show the finalized answer
    pub fn complete(&mut self, message: &FinalizedMessage) {
        self.in_progress = false;
        self.answer.clone_from(&message.answer_text);
        for region in &mut self.reasoning {
            region.complete = true;
        }
    }
}

#[async_trait]
impl LiveRenderer for Transcript {
    async fn on_event(&mut self, event: &SplitEvent) -> Result<(), RenderError> {
        self.apply(event);
        Ok(())
    }

    async fn on_complete(&mut self, message: &FinalizedMessage) -> Result<(), RenderError> {
        self.complete(message);
        Ok(())
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.reasoning {
            if region.expanded {
                writeln!(f, "▼ Thinking...")?;
                for line in region.text.lines() {
                    writeln!(f, "> {line}")?;
                }
                if !region.complete {
                    writeln!(f, "> {IN_PROGRESS_MARKER}")?;
                }
            } else {
                writeln!(f, "▶ Thinking ({} chars)", region.text.chars().count())?;
            }
        }
        write!(f, "{}", self.answer)?;
        if self.in_progress {
            write!(f, "{IN_PROGRESS_MARKER}")?;
        }
        Ok(())
    }
}
