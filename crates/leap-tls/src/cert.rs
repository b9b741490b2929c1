//! Certificate callbacks.
//!
//! Chain parsing and path validation happen outside the engine. The engine
//! asks a [`CertificateProvider`] for its own chain when a peer requests one,
//! and hands the peer's chain to a [`CertificateValidator`], whose verdict may
//! carry the leaf public key used for key exchange and signature checks.

use std::fmt;
use std::sync::Arc;

use p256::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;

use crate::TlsError;

/// A peer public key, decoded from the leaf certificate.
#[derive(Clone, PartialEq, Eq)]
pub enum PeerPublicKey {
    Rsa(RsaPublicKey),
    EcdsaP256(p256::ecdsa::VerifyingKey),
    EcdsaP384(p384::ecdsa::VerifyingKey),
}

impl fmt::Debug for PeerPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerPublicKey::Rsa(k) => {
                use rsa::traits::PublicKeyParts;
                write!(f, "PeerPublicKey::Rsa({} bits)", k.size() * 8)
            }
            PeerPublicKey::EcdsaP256(_) => f.write_str("PeerPublicKey::EcdsaP256"),
            PeerPublicKey::EcdsaP384(_) => f.write_str("PeerPublicKey::EcdsaP384"),
        }
    }
}

impl PeerPublicKey {
    /// Decode a DER `SubjectPublicKeyInfo` holding an RSA, P-256 or P-384 key.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, TlsError> {
        if let Ok(k) = RsaPublicKey::from_public_key_der(der) {
            return Ok(PeerPublicKey::Rsa(k));
        }
        if let Ok(k) = p256::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(PeerPublicKey::EcdsaP256(k));
        }
        if let Ok(k) = p384::ecdsa::VerifyingKey::from_public_key_der(der) {
            return Ok(PeerPublicKey::EcdsaP384(k));
        }
        Err(TlsError::CertificateRejected(
            "unsupported SubjectPublicKeyInfo".into(),
        ))
    }

    pub fn is_rsa(&self) -> bool {
        matches!(self, PeerPublicKey::Rsa(_))
    }
}

/// Outcome of chain validation.
#[derive(Debug, Clone)]
pub enum CertificateVerdict {
    /// Chain accepted. The leaf key, when the validator decoded it.
    Accept(Option<PeerPublicKey>),
    Reject(String),
}

/// Supplies this endpoint's certificate chain (DER, leaf first).
pub trait CertificateProvider: Send + Sync {
    fn certificates(&self, peer: Option<&str>) -> Vec<Vec<u8>>;
}

/// Judges the peer's certificate chain (DER, leaf first).
pub trait CertificateValidator: Send + Sync {
    fn validate(&self, chain: &[Vec<u8>], peer: Option<&str>) -> CertificateVerdict;
}

impl<F> CertificateProvider for F
where
    F: Fn(Option<&str>) -> Vec<Vec<u8>> + Send + Sync,
{
    fn certificates(&self, peer: Option<&str>) -> Vec<Vec<u8>> {
        self(peer)
    }
}

impl<F> CertificateValidator for F
where
    F: Fn(&[Vec<u8>], Option<&str>) -> CertificateVerdict + Send + Sync,
{
    fn validate(&self, chain: &[Vec<u8>], peer: Option<&str>) -> CertificateVerdict {
        self(chain, peer)
    }
}

/// A fixed chain.
#[derive(Debug, Clone)]
pub struct StaticCertificates(pub Vec<Vec<u8>>);

impl CertificateProvider for StaticCertificates {
    fn certificates(&self, _peer: Option<&str>) -> Vec<Vec<u8>> {
        self.0.clone()
    }
}

/// Accepts a chain whose leaf is exactly `leaf` and reports `key` for it.
#[derive(Debug, Clone)]
pub struct PinnedCertificate {
    pub leaf: Vec<u8>,
    pub key: PeerPublicKey,
}

impl CertificateValidator for PinnedCertificate {
    fn validate(&self, chain: &[Vec<u8>], _peer: Option<&str>) -> CertificateVerdict {
        match chain.first() {
            Some(leaf) if *leaf == self.leaf => CertificateVerdict::Accept(Some(self.key.clone())),
            Some(_) => CertificateVerdict::Reject("leaf does not match pinned certificate".into()),
            None => CertificateVerdict::Reject("empty chain".into()),
        }
    }
}

/// Accepts any chain without extracting a key. When the leaf entry is a
/// bare SubjectPublicKeyInfo (raw public keys, RFC 7250) the engine can
/// still decode the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyCertificate;

impl CertificateValidator for AcceptAnyCertificate {
    fn validate(&self, _chain: &[Vec<u8>], _peer: Option<&str>) -> CertificateVerdict {
        CertificateVerdict::Accept(None)
    }
}

pub type SharedProvider = Arc<dyn CertificateProvider>;
pub type SharedValidator = Arc<dyn CertificateValidator>;

/// Run `validator` over `chain` and settle on the leaf key.
pub(crate) fn validate_chain(
    validator: &dyn CertificateValidator,
    chain: &[Vec<u8>],
    peer: Option<&str>,
) -> Result<Option<PeerPublicKey>, TlsError> {
    match validator.validate(chain, peer) {
        CertificateVerdict::Reject(reason) => Err(TlsError::CertificateRejected(reason)),
        CertificateVerdict::Accept(Some(key)) => Ok(Some(key)),
        CertificateVerdict::Accept(None) => Ok(chain
            .first()
            .and_then(|leaf| PeerPublicKey::from_spki_der(leaf).ok())),
    }
}
