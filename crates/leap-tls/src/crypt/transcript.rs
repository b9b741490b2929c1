//! Running transcript of handshake messages.
//!
//! The hash algorithm is only known after ServerHello (and SSL 3.0 /
//! TLS 1.0 need two digests at once), so the transcript keeps the raw
//! handshake bytes and hashes on demand.

use super::HashAlg;

/// Ordered handshake-layer bytes (4-byte header plus body) of every
/// handshake message sent or received so far.
#[derive(Debug, Default, Clone)]
pub struct TranscriptHash {
    message_buffer: Vec<u8>,
    message_count: usize,
}

impl TranscriptHash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one serialized handshake message.
    pub fn update(&mut self, message: &[u8]) {
        self.message_buffer.extend_from_slice(message);
        self.message_count += 1;
    }

    /// Digest of everything absorbed so far under `alg`.
    pub fn current_hash(&self, alg: HashAlg) -> Vec<u8> {
        alg.digest(&[&self.message_buffer])
    }

    /// `MD5(messages) || SHA1(messages)`, the TLS 1.0/1.1 handshake hash.
    pub fn md5_sha1(&self) -> Vec<u8> {
        let mut out = self.current_hash(HashAlg::Md5);
        out.extend_from_slice(&self.current_hash(HashAlg::Sha1));
        out
    }

    /// Raw transcript bytes, for constructions that hash with extra inputs.
    pub fn messages(&self) -> &[u8] {
        &self.message_buffer
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }
}
