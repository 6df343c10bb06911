use futures_util::{Stream, StreamExt};

use crate::error::DecodeError;

/// Incremental UTF-8 decoder.
///
/// Bytes of a character split across chunks are held back until the rest
/// arrives, so each returned string only ever contains whole characters.
#[derive(Debug, Default)]
pub struct Utf8Accumulator {
    pending: Vec<u8>,
    /// Bytes already emitted, for error offsets
    consumed: usize,
}

impl Utf8Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + chunk` as forms complete characters
    pub fn push(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        self.pending.extend_from_slice(chunk);

        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => {
                return Err(DecodeError::InvalidUtf8 {
                    offset: self.consumed + e.valid_up_to(),
                });
            }
        };

        let tail = self.pending.split_off(valid);
        let head = std::mem::replace(&mut self.pending, tail);
        let start = self.consumed;
        self.consumed += head.len();

        String::from_utf8(head).map_err(|e| DecodeError::InvalidUtf8 {
            offset: start + e.utf8_error().valid_up_to(),
        })
    }

    /// Number of bytes waiting for the rest of their character
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Fails when the input stopped in the middle of a character
    pub fn finish(&self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Truncated {
                pending: self.pending.len(),
            })
        }
    }
}

/// Turns a body stream of byte chunks into text fragments.
///
/// Fragments are never empty. The sequence ends after the underlying stream
/// ends or after the first error.
pub struct StreamDecoder<S> {
    inner: S,
    utf8: Utf8Accumulator,
    done: bool,
}

impl<S, B, E> StreamDecoder<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<DecodeError>,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            utf8: Utf8Accumulator::new(),
            done: false,
        }
    }

    /// Wait for the next decoded fragment
    pub async fn next_fragment(&mut self) -> Option<Result<String, DecodeError>> {
        if self.done {
            return None;
        }

        loop {
            match self.inner.next().await {
                Some(Ok(chunk)) => match self.utf8.push(chunk.as_ref()) {
                    Ok(text) if text.is_empty() => continue,
                    Ok(text) => return Some(Ok(text)),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    return self.utf8.finish().err().map(Err);
                }
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<String, DecodeError>> {
        futures_util::stream::unfold(self, |mut decoder| async move {
            decoder
                .next_fragment()
                .await
                .map(|fragment| (fragment, decoder))
        })
    }
}
