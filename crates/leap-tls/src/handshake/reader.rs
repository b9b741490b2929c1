//! Reassembly of handshake messages from record payloads.
//!
//! One handshake message may span several records and one record may carry
//! several messages; the reader only ever hands out complete messages.

use super::codec::{HANDSHAKE_HEADER_LEN, MAX_HANDSHAKE_MESSAGE_LEN};
use super::HandshakeType;
use crate::TlsError;

#[derive(Debug, Default)]
pub struct HandshakeReader {
    buf: Vec<u8>,
}

impl HandshakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the payload of one handshake record.
    pub fn push(&mut self, fragment: &[u8]) -> Result<(), TlsError> {
        if fragment.is_empty() {
            return Err(TlsError::UnexpectedMessage(
                "empty handshake record".into(),
            ));
        }
        self.buf.extend_from_slice(fragment);
        if let Some(len) = self.pending_length() {
            if len > MAX_HANDSHAKE_MESSAGE_LEN {
                return Err(TlsError::DecodeError(format!(
                    "handshake message length {len} too large"
                )));
            }
        }
        Ok(())
    }

    fn pending_length(&self) -> Option<usize> {
        if self.buf.len() < HANDSHAKE_HEADER_LEN {
            return None;
        }
        Some(((self.buf[1] as usize) << 16) | ((self.buf[2] as usize) << 8) | self.buf[3] as usize)
    }

    /// Type of the message at the front of the buffer, once its header is in.
    pub fn peek_type(&self) -> Option<u8> {
        self.buf.first().copied()
    }

    /// Take the next complete message, header included.
    pub fn next_message(&mut self) -> Result<Option<Vec<u8>>, TlsError> {
        let Some(len) = self.pending_length() else {
            return Ok(None);
        };
        let total = HANDSHAKE_HEADER_LEN + len;
        if self.buf.len() < total {
            return Ok(None);
        }
        if HandshakeType::from_u8(self.buf[0]).is_none() {
            return Err(TlsError::UnexpectedMessage(format!(
                "unknown handshake type {}",
                self.buf[0]
            )));
        }
        let rest = self.buf.split_off(total);
        Ok(Some(std::mem::replace(&mut self.buf, rest)))
    }

    /// Whether part of a message is buffered. A ChangeCipherSpec or
    /// application data arriving now would split a handshake message.
    pub fn has_partial(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Drop buffered bytes (connection teardown).
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
