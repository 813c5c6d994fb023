//! Streaming UTF-8 decoding.
//!
//! Transport chunks split the body at arbitrary byte offsets, including inside
//! a multi-byte character. [`Utf8Decoder`] holds back an incomplete trailing
//! sequence until the next chunk completes it. Invalid bytes become U+FFFD and
//! never fail the stream.

use bytes::{Buf, BytesMut};

/// Incremental UTF-8 decoder.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: BytesMut,
}

impl Utf8Decoder {
    /// Decoder with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut out = String::with_capacity(self.pending.len());
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    return out;
                },
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    match e.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.advance(valid + invalid);
                        },
                        None => {
                            // Incomplete sequence at the end; wait for more.
                            self.pending.advance(valid);
                            return out;
                        },
                    }
                },
            }
        }
    }

    /// Flush whatever is pending at end of stream, lossily.
    pub fn finish(&mut self) -> String {
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
