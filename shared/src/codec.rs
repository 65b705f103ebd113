//! Line codec for the bridge command protocol
//!
//! Frames are delimited by `\n`:
//! ```text
//! { ...JSON command... }\n
//! { ...JSON ack... }\n
//! ```
//!
//! The decoder accumulates raw bytes and yields complete, trimmed lines;
//! a trailing partial line is retained for the next read. Invalid UTF-8 is
//! replaced rather than rejected here, so a garbled line still flows through
//! command decoding and comes back as a normal "invalid syntax" rejection.

use bytes::{Buf, BytesMut};
use thiserror::Error;

use crate::Ack;

/// Maximum line length (64 KiB) to prevent memory exhaustion
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Errors that can occur during framing
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("line exceeds {MAX_LINE_BYTES} bytes without a terminator")]
    LineTooLong,

    #[error("ack serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encode an acknowledgment as one newline-terminated JSON line
pub fn encode_ack(ack: &Ack) -> Result<Vec<u8>, CodecError> {
    let mut out = serde_json::to_vec(ack)?;
    out.push(b'\n');
    Ok(out)
}

/// Streaming decoder that splits a byte stream into trimmed message lines
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Add raw bytes to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next complete line, if one is buffered
    ///
    /// Lines are trimmed of surrounding whitespace; blank lines are silently
    /// skipped. Returns `Ok(None)` when only a partial line remains.
    pub fn next_line(&mut self) -> Result<Option<String>, CodecError> {
        loop {
            match self.buffer.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let raw = self.buffer.split_to(pos + 1);
                    let line = String::from_utf8_lossy(&raw[..pos]);
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    return Ok(Some(trimmed.to_string()));
                }
                None => {
                    if self.buffer.len() > MAX_LINE_BYTES {
                        self.buffer.advance(self.buffer.len());
                        return Err(CodecError::LineTooLong);
                    }
                    return Ok(None);
                }
            }
        }
    }

    /// Discard any buffered partial line (connection replaced or dropped)
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
