//! Cryptographic building blocks used by the protocol layers.
//!
//! Bridges the engine to the RustCrypto primitives: hashing and HMAC by
//! algorithm identifier, block/stream engines, AEAD wrappers, the
//! version-specific PRFs and the key schedule.

pub mod aead;
pub mod engine;
pub mod hkdf;
pub mod key_schedule;
pub mod prf;
pub mod transcript;

use digest::core_api::BlockSizeUser;
use digest::Digest;
use hmac::{Mac, SimpleHmac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha384};

use crate::{CryptoError, TlsError};

/// Hash algorithms the record MACs and PRFs are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    Md5,
    Sha1,
    Sha256,
    Sha384,
}

impl HashAlg {
    pub fn output_len(self) -> usize {
        match self {
            HashAlg::Md5 => 16,
            HashAlg::Sha1 => 20,
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
        }
    }

    /// Length of the pad1/pad2 blocks in the SSL 3.0 keyed-hash constructions.
    pub fn ssl3_pad_len(self) -> usize {
        match self {
            HashAlg::Md5 => 48,
            _ => 40,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlg::Md5 => "MD5",
            HashAlg::Sha1 => "SHA1",
            HashAlg::Sha256 => "SHA256",
            HashAlg::Sha384 => "SHA384",
        }
    }

    /// Hash the concatenation of `parts`.
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlg::Md5 => digest_parts::<Md5>(parts),
            HashAlg::Sha1 => digest_parts::<Sha1>(parts),
            HashAlg::Sha256 => digest_parts::<Sha256>(parts),
            HashAlg::Sha384 => digest_parts::<Sha384>(parts),
        }
    }

    /// HMAC over the concatenation of `parts`.
    pub fn hmac(self, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, TlsError> {
        match self {
            HashAlg::Md5 => hmac_parts::<Md5>(key, parts),
            HashAlg::Sha1 => hmac_parts::<Sha1>(key, parts),
            HashAlg::Sha256 => hmac_parts::<Sha256>(key, parts),
            HashAlg::Sha384 => hmac_parts::<Sha384>(key, parts),
        }
    }
}

fn digest_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut h = D::new();
    for part in parts {
        h.update(part);
    }
    h.finalize().to_vec()
}

fn hmac_parts<D: Digest + BlockSizeUser>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, TlsError> {
    let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidKey)?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Named group identifiers for (EC)DHE and hybrid key exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamedGroup(pub u16);

impl NamedGroup {
    pub const SECP256R1: Self = Self(0x0017);
    pub const SECP384R1: Self = Self(0x0018);
    pub const SECP521R1: Self = Self(0x0019);
    pub const X25519: Self = Self(0x001D);
    pub const X448: Self = Self(0x001E);
    pub const FFDHE2048: Self = Self(0x0100);
    pub const FFDHE3072: Self = Self(0x0101);
    pub const FFDHE4096: Self = Self(0x0102);
    pub const SECP256R1_MLKEM768: Self = Self(0x11EB);
    pub const X25519_MLKEM768: Self = Self(0x11EC);
    pub const X25519_KYBER768_DRAFT00: Self = Self(0x6399);

    /// Groups this engine can generate shares for.
    pub const SUPPORTED: [NamedGroup; 7] = [
        NamedGroup::X25519,
        NamedGroup::SECP256R1,
        NamedGroup::SECP384R1,
        NamedGroup::X448,
        NamedGroup::X25519_MLKEM768,
        NamedGroup::SECP256R1_MLKEM768,
        NamedGroup::X25519_KYBER768_DRAFT00,
    ];

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }

    /// Whether the group completes by encapsulation rather than a symmetric
    /// Diffie-Hellman computation.
    pub fn is_kem(self) -> bool {
        matches!(
            self,
            NamedGroup::X25519_KYBER768_DRAFT00
                | NamedGroup::X25519_MLKEM768
                | NamedGroup::SECP256R1_MLKEM768
        )
    }

    pub fn is_ffdhe(self) -> bool {
        (0x0100..=0x01FF).contains(&self.0)
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedGroup::SECP256R1 => "secp256r1",
            NamedGroup::SECP384R1 => "secp384r1",
            NamedGroup::SECP521R1 => "secp521r1",
            NamedGroup::X25519 => "x25519",
            NamedGroup::X448 => "x448",
            NamedGroup::FFDHE2048 => "ffdhe2048",
            NamedGroup::FFDHE3072 => "ffdhe3072",
            NamedGroup::FFDHE4096 => "ffdhe4096",
            NamedGroup::SECP256R1_MLKEM768 => "SecP256r1MLKEM768",
            NamedGroup::X25519_MLKEM768 => "X25519MLKEM768",
            NamedGroup::X25519_KYBER768_DRAFT00 => "X25519Kyber768Draft00",
            _ => "unknown",
        }
    }
}

/// Signature scheme identifiers (TLS 1.2 `SignatureAndHashAlgorithm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureScheme(pub u16);

impl SignatureScheme {
    pub const RSA_PKCS1_SHA1: Self = Self(0x0201);
    pub const ECDSA_SHA1: Self = Self(0x0203);
    pub const RSA_PKCS1_SHA256: Self = Self(0x0401);
    pub const RSA_PKCS1_SHA384: Self = Self(0x0501);
    pub const ECDSA_SECP256R1_SHA256: Self = Self(0x0403);
    pub const ECDSA_SECP384R1_SHA384: Self = Self(0x0503);
    pub const RSA_PSS_RSAE_SHA256: Self = Self(0x0804);
    pub const RSA_PSS_RSAE_SHA384: Self = Self(0x0805);

    /// Default preference list advertised in signature_algorithms.
    pub const DEFAULTS: [SignatureScheme; 8] = [
        SignatureScheme::ECDSA_SECP256R1_SHA256,
        SignatureScheme::ECDSA_SECP384R1_SHA384,
        SignatureScheme::RSA_PSS_RSAE_SHA256,
        SignatureScheme::RSA_PSS_RSAE_SHA384,
        SignatureScheme::RSA_PKCS1_SHA256,
        SignatureScheme::RSA_PKCS1_SHA384,
        SignatureScheme::RSA_PKCS1_SHA1,
        SignatureScheme::ECDSA_SHA1,
    ];

    pub fn hash(self) -> Option<HashAlg> {
        match self {
            SignatureScheme::RSA_PKCS1_SHA1 | SignatureScheme::ECDSA_SHA1 => Some(HashAlg::Sha1),
            SignatureScheme::RSA_PKCS1_SHA256
            | SignatureScheme::ECDSA_SECP256R1_SHA256
            | SignatureScheme::RSA_PSS_RSAE_SHA256 => Some(HashAlg::Sha256),
            SignatureScheme::RSA_PKCS1_SHA384
            | SignatureScheme::ECDSA_SECP384R1_SHA384
            | SignatureScheme::RSA_PSS_RSAE_SHA384 => Some(HashAlg::Sha384),
            _ => None,
        }
    }

    pub fn is_rsa(self) -> bool {
        matches!(
            self,
            SignatureScheme::RSA_PKCS1_SHA1
                | SignatureScheme::RSA_PKCS1_SHA256
                | SignatureScheme::RSA_PKCS1_SHA384
                | SignatureScheme::RSA_PSS_RSAE_SHA256
                | SignatureScheme::RSA_PSS_RSAE_SHA384
        )
    }

    pub fn is_ecdsa(self) -> bool {
        matches!(
            self,
            SignatureScheme::ECDSA_SHA1
                | SignatureScheme::ECDSA_SECP256R1_SHA256
                | SignatureScheme::ECDSA_SECP384R1_SHA384
        )
    }
}
