//! Open/close marker pair

use super::state::Mode;
use thiserror::Error;

pub const DEFAULT_OPEN: &str = "<think>";
pub const DEFAULT_CLOSE: &str = "</think>";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DelimiterError {
    #[error("{0} marker must not be empty")]
    Empty(&'static str),
}

/// Literal markers around a reasoning block. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, DelimiterError> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() {
            return Err(DelimiterError::Empty("open"));
        }
        if close.is_empty() {
            return Err(DelimiterError::Empty("close"));
        }
        Ok(Self { open, close })
    }

    /// `<think>` / `</think>`
    pub fn think() -> Self {
        Self {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
        }
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// The marker that ends the given mode
    pub fn expected(&self, mode: Mode) -> &str {
        match mode {
            Mode::Answer => &self.open,
            Mode::Reasoning => &self.close,
        }
    }

    /// Upper bound (exclusive) on how many bytes the splitter ever holds back
    pub fn max_len(&self) -> usize {
        self.open.len().max(self.close.len())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::think()
    }
}

/// Length in bytes of the longest proper suffix of `text` that is a prefix of `marker`.
///
/// That suffix is the only part of `text` that could still grow into a marker
/// once more input arrives.
pub(crate) fn partial_suffix_len(text: &str, marker: &str) -> usize {
    let text_bytes = text.as_bytes();
    let marker_bytes = marker.as_bytes();
    let longest = marker_bytes.len().saturating_sub(1).min(text_bytes.len());

    (1..=longest)
        .rev()
        .find(|&k| {
            text_bytes.ends_with(&marker_bytes[..k]) && text.is_char_boundary(text.len() - k)
        })
        .unwrap_or(0)
}
