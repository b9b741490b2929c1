//! Per-direction record protection bound to a negotiated suite.

use zeroize::Zeroize;

use super::aead::AeadState;
use super::cbc::CbcState;
use super::stream::StreamState;
use super::ContentType;
use crate::crypt::key_schedule::DirectionKeys;
use crate::crypt::HashAlg;
use crate::suites::{CipherKind, CipherSuiteInfo};
use crate::{TlsError, TlsVersion};

/// 64-bit record sequence number. Never wraps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SequenceNumber(u64);

impl SequenceNumber {
    pub(crate) fn value(self) -> u64 {
        self.0
    }

    /// Take the current value for one record and step past it.
    pub(crate) fn next(&mut self) -> Result<u64, TlsError> {
        let current = self.0;
        self.0 = current.checked_add(1).ok_or(TlsError::SequenceOverflow)?;
        Ok(current)
    }
}

/// Record MAC: HMAC for TLS, the pad1/pad2 keyed hash for SSL 3.0.
pub(crate) struct RecordMac {
    alg: HashAlg,
    key: Vec<u8>,
    ssl3: bool,
}

impl Drop for RecordMac {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl RecordMac {
    pub(crate) fn new(alg: HashAlg, key: &[u8], version: TlsVersion) -> Self {
        Self {
            alg,
            key: key.to_vec(),
            ssl3: version == TlsVersion::Ssl30,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.alg.output_len()
    }

    /// TLS: `HMAC(key, seq || type || version || length || data)`.
    /// SSL 3.0: `H(key || pad2 || H(key || pad1 || seq || type || length || data))`.
    pub(crate) fn compute(
        &self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        data: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let seq = seq.to_be_bytes();
        let ty = [content_type as u8];
        let len = (data.len() as u16).to_be_bytes();
        if self.ssl3 {
            let pad1 = vec![0x36u8; self.alg.ssl3_pad_len()];
            let pad2 = vec![0x5cu8; self.alg.ssl3_pad_len()];
            let inner = self.alg.digest(&[&self.key, &pad1, &seq, &ty, &len, data]);
            return Ok(self.alg.digest(&[&self.key, &pad2, &inner]));
        }
        self.alg
            .hmac(&self.key, &[&seq, &ty, &version.to_be_bytes(), &len, data])
    }
}

enum CipherState {
    Stream(StreamState),
    Cbc(CbcState),
    Aead(AeadState),
}

/// Encrypts or decrypts the records of one direction.
///
/// Created once from the directional keys when ChangeCipherSpec is sent or
/// received; the sequence number starts at zero and advances by one per
/// record.
pub struct RecordCipher {
    state: CipherState,
    seq: SequenceNumber,
    version: TlsVersion,
    name: &'static str,
}

impl RecordCipher {
    pub fn new(
        suite: &CipherSuiteInfo,
        version: TlsVersion,
        keys: &DirectionKeys,
    ) -> Result<Self, TlsError> {
        let bulk = suite.bulk;
        let state = match bulk.kind() {
            CipherKind::Null | CipherKind::Stream => {
                let mac = RecordMac::new(suite.hash, &keys.mac_key, version);
                CipherState::Stream(StreamState::new(bulk, &keys.key, &keys.iv, mac)?)
            }
            CipherKind::Block => {
                let mac = RecordMac::new(suite.hash, &keys.mac_key, version);
                CipherState::Cbc(CbcState::new(bulk, version, &keys.key, &keys.iv, mac)?)
            }
            CipherKind::Aead => CipherState::Aead(AeadState::new(bulk, &keys.key, &keys.iv)?),
        };
        Ok(Self {
            state,
            seq: SequenceNumber::default(),
            version,
            name: suite.name,
        })
    }

    /// Suite name, for logging.
    pub fn description(&self) -> &'static str {
        self.name
    }

    /// Sequence number the next record will use.
    pub fn sequence_number(&self) -> u64 {
        self.seq.value()
    }

    #[cfg(test)]
    pub(crate) fn set_sequence_number(&mut self, seq: u64) {
        self.seq = SequenceNumber(seq);
    }

    /// Protect one plaintext fragment, returning the record body.
    pub fn seal(&mut self, content_type: ContentType, plaintext: &[u8]) -> Result<Vec<u8>, TlsError> {
        let seq = self.seq.next()?;
        let version = self.version.wire();
        match &mut self.state {
            CipherState::Stream(s) => s.seal(seq, content_type, version, plaintext),
            CipherState::Cbc(s) => s.seal(seq, content_type, version, plaintext),
            CipherState::Aead(s) => s.seal(seq, content_type, version, plaintext),
        }
    }

    /// Verify and decrypt one record body. Every integrity failure is
    /// reported as `BadRecordMac`.
    pub fn open(&mut self, content_type: ContentType, fragment: &[u8]) -> Result<Vec<u8>, TlsError> {
        let seq = self.seq.next()?;
        let version = self.version.wire();
        match &mut self.state {
            CipherState::Stream(s) => s.open(seq, content_type, version, fragment),
            CipherState::Cbc(s) => s.open(seq, content_type, version, fragment),
            CipherState::Aead(s) => s.open(seq, content_type, version, fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MAX_PLAINTEXT_LENGTH;
    use crate::suites::{lookup, AuthAlg, BulkCipher, KeyExchangeKind, VersionRange};
    use crate::CipherSuite;

    const SIZES: [usize; 6] = [0, 1, 15, 16, 4096, MAX_PLAINTEXT_LENGTH];

    fn keys_for(suite: &CipherSuiteInfo, version: TlsVersion) -> DirectionKeys {
        DirectionKeys {
            mac_key: vec![0x11; suite.mac_len()],
            key: vec![0x22; suite.bulk.key_len()],
            iv: vec![0x33; suite.bulk.fixed_iv_len(version)],
        }
    }

    fn pair(suite: &CipherSuiteInfo, version: TlsVersion) -> (RecordCipher, RecordCipher) {
        let keys = keys_for(suite, version);
        (
            RecordCipher::new(suite, version, &keys).unwrap(),
            RecordCipher::new(suite, version, &keys).unwrap(),
        )
    }

    fn assert_invertible(suite: &CipherSuiteInfo, version: TlsVersion) {
        let (mut tx, mut rx) = pair(suite, version);
        for size in SIZES {
            let plaintext: Vec<u8> = (0..size).map(|i| i as u8).collect();
            let body = tx.seal(ContentType::ApplicationData, &plaintext).unwrap();
            let opened = rx.open(ContentType::ApplicationData, &body).unwrap();
            assert_eq!(opened, plaintext, "{} {version} size {size}", suite.name);
        }
        assert_eq!(tx.sequence_number(), SIZES.len() as u64);
        assert_eq!(rx.sequence_number(), SIZES.len() as u64);
    }

    #[test]
    fn test_cbc_invertible_all_versions() {
        let suite = lookup(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA).unwrap();
        for version in [TlsVersion::Ssl30, TlsVersion::Tls10, TlsVersion::Tls11, TlsVersion::Tls12] {
            assert_invertible(suite, version);
        }
        assert_invertible(
            lookup(CipherSuite::TLS_RSA_WITH_3DES_EDE_CBC_SHA).unwrap(),
            TlsVersion::Tls10,
        );
        assert_invertible(
            lookup(CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA384).unwrap(),
            TlsVersion::Tls12,
        );
    }

    #[test]
    fn test_aead_invertible() {
        for suite in [
            CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256,
            CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
            CipherSuite::TLS_RSA_WITH_AES_128_CCM,
            CipherSuite::TLS_RSA_WITH_AES_256_CCM_8,
            CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
        ] {
            assert_invertible(lookup(suite).unwrap(), TlsVersion::Tls12);
        }
    }

    #[test]
    fn test_stream_invertible() {
        assert_invertible(lookup(CipherSuite::TLS_RSA_WITH_RC4_128_SHA).unwrap(), TlsVersion::Tls10);
        assert_invertible(lookup(CipherSuite::TLS_RSA_WITH_RC4_128_MD5).unwrap(), TlsVersion::Ssl30);
        assert_invertible(lookup(CipherSuite::TLS_RSA_WITH_NULL_SHA256).unwrap(), TlsVersion::Tls12);

        let raw_chacha = CipherSuiteInfo {
            suite: CipherSuite(0xFF01),
            name: "RAW_CHACHA20_SHA256",
            key_exchange: KeyExchangeKind::Rsa,
            auth: AuthAlg::Rsa,
            bulk: BulkCipher::ChaCha20,
            hash: HashAlg::Sha256,
            versions: VersionRange::TLS12,
        };
        assert_invertible(&raw_chacha, TlsVersion::Tls12);
    }

    #[test]
    fn test_gcm_record_layout() {
        let suite = lookup(CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256).unwrap();
        let (mut tx, _) = pair(suite, TlsVersion::Tls12);
        tx.seal(ContentType::ApplicationData, b"x").unwrap();
        let body = tx.seal(ContentType::ApplicationData, b"abc").unwrap();
        assert_eq!(&body[..8], &1u64.to_be_bytes());
        assert_eq!(body.len(), 8 + 3 + 16);
    }

    #[test]
    fn test_replayed_sequence_fails_for_every_family() {
        for suite in [
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256,
            CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256,
            CipherSuite::TLS_RSA_WITH_AES_128_CCM,
            CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
        ] {
            let suite = lookup(suite).unwrap();
            let (mut tx, mut rx) = pair(suite, TlsVersion::Tls12);
            let body = tx.seal(ContentType::ApplicationData, b"replay me").unwrap();
            rx.open(ContentType::ApplicationData, &body).unwrap();
            assert!(
                matches!(rx.open(ContentType::ApplicationData, &body), Err(TlsError::BadRecordMac)),
                "{}",
                suite.name
            );
        }
    }

    #[test]
    fn test_content_type_is_authenticated() {
        let suite = lookup(CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256).unwrap();
        let (mut tx, mut rx) = pair(suite, TlsVersion::Tls12);
        let body = tx.seal(ContentType::ApplicationData, b"typed").unwrap();
        assert!(matches!(rx.open(ContentType::Handshake, &body), Err(TlsError::BadRecordMac)));
    }

    #[test]
    fn test_sequence_overflow_is_fatal() {
        let suite = lookup(CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256).unwrap();
        let (mut tx, _) = pair(suite, TlsVersion::Tls12);
        tx.set_sequence_number(u64::MAX - 1);
        tx.seal(ContentType::ApplicationData, b"last").unwrap();
        assert!(matches!(
            tx.seal(ContentType::ApplicationData, b"one more"),
            Err(TlsError::SequenceOverflow)
        ));
    }

    #[test]
    fn test_ssl3_mac_differs_from_hmac() {
        let ssl3 = RecordMac::new(HashAlg::Sha1, &[7; 20], TlsVersion::Ssl30);
        let tls = RecordMac::new(HashAlg::Sha1, &[7; 20], TlsVersion::Tls10);
        let a = ssl3.compute(0, ContentType::ApplicationData, 0x0300, b"x").unwrap();
        let b = tls.compute(0, ContentType::ApplicationData, 0x0300, b"x").unwrap();
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
    }
}
