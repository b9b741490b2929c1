//! AEAD record protection (RFC 5246 Section 6.2.3.3, RFC 7905).
//!
//! GCM and CCM: `nonce = fixed_iv(4) || explicit(8)`, the explicit part
//! being the sequence number carried in front of the ciphertext.
//! ChaCha20-Poly1305: `nonce = fixed_iv(12) XOR (0^4 || seq)`, nothing
//! explicit on the wire.
//! AAD is `seq(8) || type(1) || version(2) || plaintext_length(2)`.

use zeroize::Zeroize;

use super::ContentType;
use crate::crypt::aead::{create_aead, TlsAead};
use crate::suites::BulkCipher;
use crate::{CryptoError, TlsError};

const EXPLICIT_NONCE_LEN: usize = 8;
const NONCE_LEN: usize = 12;

pub(crate) struct AeadState {
    aead: Box<dyn TlsAead>,
    fixed_iv: Vec<u8>,
    xor_nonce: bool,
}

impl Drop for AeadState {
    fn drop(&mut self) {
        self.fixed_iv.zeroize();
    }
}

pub(crate) fn build_aad(seq: u64, content_type: ContentType, version: u16, len: usize) -> [u8; 13] {
    let mut aad = [0u8; 13];
    aad[..8].copy_from_slice(&seq.to_be_bytes());
    aad[8] = content_type as u8;
    aad[9..11].copy_from_slice(&version.to_be_bytes());
    aad[11..].copy_from_slice(&(len as u16).to_be_bytes());
    aad
}

impl AeadState {
    pub(crate) fn new(bulk: BulkCipher, key: &[u8], fixed_iv: &[u8]) -> Result<Self, TlsError> {
        let xor_nonce = bulk == BulkCipher::ChaCha20Poly1305;
        let expected_iv = if xor_nonce {
            NONCE_LEN
        } else {
            NONCE_LEN - EXPLICIT_NONCE_LEN
        };
        if fixed_iv.len() != expected_iv {
            return Err(TlsError::CryptoError(CryptoError::InvalidIvLength));
        }
        Ok(Self {
            aead: create_aead(bulk, key)?,
            fixed_iv: fixed_iv.to_vec(),
            xor_nonce,
        })
    }

    fn nonce(&self, explicit: &[u8; EXPLICIT_NONCE_LEN]) -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        if self.xor_nonce {
            nonce.copy_from_slice(&self.fixed_iv);
            for (n, e) in nonce[NONCE_LEN - EXPLICIT_NONCE_LEN..].iter_mut().zip(explicit) {
                *n ^= e;
            }
        } else {
            nonce[..4].copy_from_slice(&self.fixed_iv);
            nonce[4..].copy_from_slice(explicit);
        }
        nonce
    }

    pub(crate) fn seal(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let explicit = seq.to_be_bytes();
        let nonce = self.nonce(&explicit);
        let aad = build_aad(seq, content_type, version, plaintext.len());
        let sealed = self.aead.encrypt(&nonce, &aad, plaintext)?;
        if self.xor_nonce {
            return Ok(sealed);
        }
        let mut out = Vec::with_capacity(EXPLICIT_NONCE_LEN + sealed.len());
        out.extend_from_slice(&explicit);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    pub(crate) fn open(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        fragment: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let explicit_len = if self.xor_nonce { 0 } else { EXPLICIT_NONCE_LEN };
        if fragment.len() < explicit_len + self.aead.tag_size() {
            return Err(TlsError::BadRecordMac);
        }
        let (explicit, sealed) = fragment.split_at(explicit_len);
        let mut explicit_nonce = seq.to_be_bytes();
        if !self.xor_nonce {
            explicit_nonce.copy_from_slice(explicit);
        }
        let nonce = self.nonce(&explicit_nonce);
        let plaintext_len = sealed.len() - self.aead.tag_size();
        let aad = build_aad(seq, content_type, version, plaintext_len);
        self.aead
            .decrypt(&nonce, &aad, sealed)
            .map_err(|_| TlsError::BadRecordMac)
    }
}
