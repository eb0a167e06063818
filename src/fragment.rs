//! Byte chunks to text fragments
//!
//! Transports hand over bytes split at arbitrary points, including in the
//! middle of a UTF-8 sequence. The decoder holds back an incomplete trailing
//! sequence until the rest of it arrives.

use futures::stream::{self, Stream, StreamExt};

/// Incremental UTF-8 decoder
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much as possible. Invalid sequences become U+FFFD; an
    /// incomplete sequence at the end is kept for the next call.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return out;
                        }
                    }
                }
            }
        }
    }

    /// Bytes held back waiting for the rest of a sequence
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of input: whatever is left is decoded lossily
    pub fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

/// Adapt a stream of byte chunks into a stream of text fragments.
///
/// Chunks that decode to nothing (a lone partial sequence) are skipped.
/// Transport errors are passed through in order.
pub fn decode_utf8<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let chunks = Box::pin(chunks);
    stream::unfold(Some((chunks, Utf8Decoder::new())), |state| async move {
        let Some((mut chunks, mut decoder)) = state else {
            return None;
        };
        loop {
            match chunks.next().await {
                Some(Ok(bytes)) => {
                    let text = decoder.push(bytes.as_ref());
                    if !text.is_empty() {
                        return Some((Ok(text), Some((chunks, decoder))));
                    }
                }
                Some(Err(e)) => return Some((Err(e), Some((chunks, decoder)))),
                None => {
                    let rest = decoder.finish();
                    return if rest.is_empty() {
                        None
                    } else {
                        Some((Ok(rest), None))
                    };
                }
            }
        }
    })
}
