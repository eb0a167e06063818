//! Thinkstream - splits streamed model output into answer and reasoning
//!
//! Text arrives in arbitrary fragments with reasoning wrapped in open/close
//! markers. The splitter classifies it incrementally, renderers show both
//! parts live, and finalized turns are kept in a `{role, content}` history
//! that decodes back into the same answer and reasoning.

pub mod api;
pub mod config;
pub mod finalize;
pub mod fragment;
pub mod history;
pub mod render;
pub mod splitter;
pub mod turn;
