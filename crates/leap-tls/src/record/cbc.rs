//! CBC MAC-then-encrypt record protection (RFC 5246 Section 6.2.3.2).
//!
//! SSL 3.0 and TLS 1.0 chain the IV from the last ciphertext block of the
//! previous record; TLS 1.1+ send a random explicit IV in front of every
//! record. Padding and MAC are checked without branching on secret data,
//! and every failure surfaces as the same `BadRecordMac`.

use subtle::{ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};

use super::cipher::RecordMac;
use super::ContentType;
use crate::crypt::engine::BlockEngine;
use crate::suites::BulkCipher;
use crate::{CryptoError, TlsError, TlsVersion};

/// Upper bound on bytes inspected by the padding scan.
const MAX_PAD_SCAN: usize = 256;

pub(crate) struct CbcState {
    engine: BlockEngine,
    mac: RecordMac,
    /// Present for implicit-IV versions: the IV of the next record.
    chained_iv: Option<Vec<u8>>,
    ssl3: bool,
}

impl CbcState {
    pub(crate) fn new(
        bulk: BulkCipher,
        version: TlsVersion,
        key: &[u8],
        iv: &[u8],
        mac: RecordMac,
    ) -> Result<Self, TlsError> {
        let engine = BlockEngine::new(bulk, key)?;
        let explicit_iv = bulk.record_iv_len(version) > 0;
        let chained_iv = if explicit_iv {
            None
        } else {
            if iv.len() != engine.block_size() {
                return Err(TlsError::CryptoError(CryptoError::InvalidIvLength));
            }
            Some(iv.to_vec())
        };
        Ok(Self {
            engine,
            mac,
            chained_iv,
            ssl3: version == TlsVersion::Ssl30,
        })
    }

    pub(crate) fn seal(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let bs = self.engine.block_size();
        let mac = self.mac.compute(seq, content_type, version, plaintext)?;
        let data_len = plaintext.len() + mac.len();
        let pad_len = (bs - (data_len + 1) % bs) % bs;

        let mut body = Vec::with_capacity(data_len + pad_len + 1);
        body.extend_from_slice(plaintext);
        body.extend_from_slice(&mac);
        body.resize(data_len + pad_len + 1, pad_len as u8);

        match &mut self.chained_iv {
            Some(iv) => {
                *iv = self.engine.cbc_encrypt(iv, &mut body)?;
                Ok(body)
            }
            None => {
                let mut iv = vec![0u8; bs];
                getrandom::getrandom(&mut iv)
                    .map_err(|_| TlsError::CryptoError(CryptoError::RandomFail))?;
                self.engine.cbc_encrypt(&iv, &mut body)?;
                iv.extend_from_slice(&body);
                Ok(iv)
            }
        }
    }

    pub(crate) fn open(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        fragment: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let bs = self.engine.block_size();
        let mac_len = self.mac.len();
        let iv_len = if self.chained_iv.is_some() { 0 } else { bs };
        let min_body = (mac_len + 1).div_ceil(bs) * bs;
        if fragment.len() < iv_len + min_body || (fragment.len() - iv_len) % bs != 0 {
            return Err(TlsError::BadRecordMac);
        }

        let (explicit_iv, ciphertext) = fragment.split_at(iv_len);
        let mut body = ciphertext.to_vec();
        match &mut self.chained_iv {
            Some(iv) => *iv = self.engine.cbc_decrypt(iv, &mut body)?,
            None => {
                self.engine.cbc_decrypt(explicit_iv, &mut body)?;
            }
        }

        let len = body.len();
        let pad_len = body[len - 1] as usize;
        // pad_len + 1 + mac_len <= len
        let fits = !((pad_len + 1 + mac_len) as u64).ct_gt(&(len as u64));
        let mut good = fits;
        if self.ssl3 {
            // SSL 3.0 only bounds the padding length; its bytes are arbitrary.
            // The bound is RFC 6101's pad_len < block size, not pad_len <= block size.
            good &= !(pad_len as u64).ct_gt(&(bs as u64 - 1));
        } else {
            let scan = MAX_PAD_SCAN.min(len);
            for i in 0..scan {
                let in_padding = !(i as u64).ct_gt(&(pad_len as u64));
                let matches = body[len - 1 - i].ct_eq(&(pad_len as u8));
                good &= !in_padding | matches;
            }
        }

        // With bad padding, still MAC everything but the last mac_len bytes.
        let real = (len - mac_len).saturating_sub(pad_len + 1) as u64;
        let fallback = (len - mac_len) as u64;
        let content_len = u64::conditional_select(&fallback, &real, good) as usize;

        let expected = self
            .mac
            .compute(seq, content_type, version, &body[..content_len])?;
        let received = &body[content_len..content_len + mac_len];
        good &= received.ct_eq(&expected);

        if !bool::from(good) {
            return Err(TlsError::BadRecordMac);
        }
        body.truncate(content_len);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypt::HashAlg;

    fn state(version: TlsVersion) -> CbcState {
        let mac = RecordMac::new(HashAlg::Sha1, &[0x11; 20], version);
        CbcState::new(BulkCipher::Aes128Cbc, version, &[0x22; 16], &[0x33; 16], mac).unwrap()
    }

    /// Encrypt a hand-built body (payload || MAC || padding) under `seq`.
    fn seal_raw(version: TlsVersion, payload: &[u8], padding: &[u8]) -> Vec<u8> {
        let mac = RecordMac::new(HashAlg::Sha1, &[0x11; 20], version);
        let tag = mac
            .compute(0, ContentType::ApplicationData, version.wire(), payload)
            .unwrap();
        let engine = BlockEngine::new(BulkCipher::Aes128Cbc, &[0x22; 16]).unwrap();
        let mut body = [payload, tag.as_slice(), padding].concat();
        engine.cbc_encrypt(&[0x33; 16], &mut body).unwrap();
        body
    }

    #[test]
    fn test_implicit_iv_chains_across_records() {
        let mut tx = state(TlsVersion::Tls10);
        let mut rx = state(TlsVersion::Tls10);
        let a = tx.seal(0, ContentType::ApplicationData, 0x0301, b"first").unwrap();
        let b = tx.seal(1, ContentType::ApplicationData, 0x0301, b"first").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len() % 16, 0);
        assert_eq!(rx.open(0, ContentType::ApplicationData, 0x0301, &a).unwrap(), b"first");
        assert_eq!(rx.open(1, ContentType::ApplicationData, 0x0301, &b).unwrap(), b"first");
    }

    #[test]
    fn test_explicit_iv_prefix() {
        let mut tx = state(TlsVersion::Tls12);
        let body = tx.seal(0, ContentType::ApplicationData, 0x0303, b"").unwrap();
        // IV + one block holding MAC(20) + padding(12)
        assert_eq!(body.len(), 16 + 32);
    }

    #[test]
    fn test_tls_rejects_inconsistent_padding() {
        // 11 payload + 20 MAC + 17 padding = 48, first padding byte wrong.
        let mut padding = vec![16u8; 17];
        padding[0] = 15;
        let body = seal_raw(TlsVersion::Tls10, b"hello world", &padding);
        let mut rx = state(TlsVersion::Tls10);
        assert!(matches!(
            rx.open(0, ContentType::ApplicationData, 0x0301, &body),
            Err(TlsError::BadRecordMac)
        ));
    }

    #[test]
    fn test_ssl3_accepts_arbitrary_padding_bytes() {
        let body = seal_raw(TlsVersion::Ssl30, b"hello world", &[0xAA]);
        let mut rx = state(TlsVersion::Ssl30);
        // one padding byte whose value is 0xAA > block size: rejected
        assert!(rx.open(0, ContentType::ApplicationData, 0x0300, &body).is_err());

        let body = seal_raw(TlsVersion::Ssl30, b"hello", &[1, 2, 3, 4, 5, 6, 6]);
        let mut rx = state(TlsVersion::Ssl30);
        assert_eq!(
            rx.open(0, ContentType::ApplicationData, 0x0300, &body).unwrap(),
            b"hello"
        );
    }

    #[test]
    fn test_ssl3_rejects_padding_longer_than_block() {
        // 20 payload + 20 MAC + 24 padding = 64. A 23-byte pad is legal TLS
        // but exceeds the SSL 3.0 bound of block size - 1.
        let payload = b"twenty bytes payload";
        let padding = vec![23u8; 24];
        let tls_body = seal_raw(TlsVersion::Tls10, payload, &padding);
        assert!(state(TlsVersion::Tls10)
            .open(0, ContentType::ApplicationData, 0x0301, &tls_body)
            .is_ok());
        let mut ssl_pad = vec![0u8; 24];
        ssl_pad[23] = 23;
        let ssl_body = seal_raw(TlsVersion::Ssl30, payload, &ssl_pad);
        assert!(state(TlsVersion::Ssl30)
            .open(0, ContentType::ApplicationData, 0x0300, &ssl_body)
            .is_err());
    }

    #[test]
    fn test_ssl3_padding_bound_is_block_size_minus_one() {
        // 12 payload + 20 MAC + 16 padding: pad_len 15 is the largest allowed.
        let mut pad = vec![0u8; 16];
        pad[15] = 15;
        let body = seal_raw(TlsVersion::Ssl30, b"twelve bytes", &pad);
        assert_eq!(
            state(TlsVersion::Ssl30)
                .open(0, ContentType::ApplicationData, 0x0300, &body)
                .unwrap(),
            b"twelve bytes"
        );

        // 11 payload + 20 MAC + 17 padding: pad_len 16 equals the block size.
        let mut pad = vec![0u8; 17];
        pad[16] = 16;
        let body = seal_raw(TlsVersion::Ssl30, b"hello world", &pad);
        assert!(matches!(
            state(TlsVersion::Ssl30).open(0, ContentType::ApplicationData, 0x0300, &body),
            Err(TlsError::BadRecordMac)
        ));
    }

    #[test]
    fn test_short_or_misaligned_fragment() {
        let mut rx = state(TlsVersion::Tls12);
        assert!(matches!(
            rx.open(0, ContentType::ApplicationData, 0x0303, &[0u8; 31]),
            Err(TlsError::BadRecordMac)
        ));
        assert!(matches!(
            rx.open(0, ContentType::ApplicationData, 0x0303, &[0u8; 16 + 33]),
            Err(TlsError::BadRecordMac)
        ));
    }
}
