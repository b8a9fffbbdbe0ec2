//! Line-based codec for tokio.
//!
//! Splits a byte stream on `\n`, strips a trailing `\r`, and decodes each
//! complete line as UTF-8. Bytes after the last newline stay in the buffer
//! until more data arrives; they are never emitted as a line, not even at
//! end of stream.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, extract_command_hint, ProtocolError};
use crate::format::normalize_line;

/// Default maximum line length in bytes, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Newline-delimited codec for the client connection.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping the remainder of an over-long line
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with the default length limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom length limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    fn decode_line(line: &[u8]) -> error::Result<String> {
        let mut end = line.len();
        if end > 0 && line[end - 1] == b'\n' {
            end -= 1;
        }
        if end > 0 && line[end - 1] == b'\r' {
            end -= 1;
        }
        let body = &line[..end];

        std::str::from_utf8(body)
            .map(str::to_owned)
            .map_err(|e| ProtocolError::InvalidUtf8 {
                raw_line: body.to_vec(),
                byte_pos: e.valid_up_to(),
                command_hint: extract_command_hint(body),
            })
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            match (self.discarding, newline) {
                (true, Some(offset)) => {
                    // Tail of an over-long line: drop it and resume normal framing.
                    let _ = src.split_to(self.next_index + offset + 1);
                    self.next_index = 0;
                    self.discarding = false;
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(offset)) => {
                    let line = src.split_to(self.next_index + offset + 1);
                    self.next_index = 0;

                    if line.len() > self.max_len {
                        return Err(ProtocolError::LineTooLong {
                            actual: line.len(),
                            limit: self.max_len,
                        });
                    }

                    return Self::decode_line(&line).map(Some);
                }
                (false, None) => {
                    if src.len() > self.max_len {
                        let actual = src.len();
                        src.clear();
                        self.next_index = 0;
                        self.discarding = true;
                        return Err(ProtocolError::LineTooLong {
                            actual,
                            limit: self.max_len,
                        });
                    }

                    self.next_index = src.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // Incomplete trailing fragment dies with the stream.
                src.clear();
                self.next_index = 0;
                self.discarding = false;
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let line = normalize_line(&msg)?;
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
