//! ServerKeyExchange and CertificateVerify signatures (TLS 1.0-1.2).
//!
//! Before TLS 1.2 there is no algorithm prefix: RSA signs MD5 || SHA-1 with
//! unprefixed PKCS#1 v1.5 and ECDSA signs SHA-1. From TLS 1.2 the
//! [`SignatureScheme`] picks the hash and padding.

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use rsa::{Pkcs1v15Sign, Pss};
use sha1::Sha1;
use sha2::{Sha256, Sha384};

use crate::cert::PeerPublicKey;
use crate::config::PrivateKey;
use crate::crypt::key_schedule::KeySchedule;
use crate::crypt::transcript::TranscriptHash;
use crate::crypt::{HashAlg, SignatureScheme};
use crate::{CryptoError, TlsError, TlsVersion};

fn has_signature_scheme(version: TlsVersion) -> bool {
    version.rank() >= TlsVersion::Tls12.rank()
}

/// Pick the scheme to sign with: the first of our candidates for `key` that
/// the peer advertised. Below TLS 1.2 no scheme is sent. A peer that sent no
/// signature_algorithms gets the SHA-1 variant (RFC 5246 §7.4.1.4.1).
pub fn select_signature_scheme(
    key: &PrivateKey,
    peer_schemes: &[SignatureScheme],
    version: TlsVersion,
) -> Result<Option<SignatureScheme>, TlsError> {
    if !has_signature_scheme(version) {
        return Ok(None);
    }
    let candidates: &[SignatureScheme] = match key {
        PrivateKey::Rsa(_) => &[
            SignatureScheme::RSA_PSS_RSAE_SHA256,
            SignatureScheme::RSA_PSS_RSAE_SHA384,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA1,
        ],
        PrivateKey::EcdsaP256(_) => &[
            SignatureScheme::ECDSA_SECP256R1_SHA256,
            SignatureScheme::ECDSA_SECP384R1_SHA384,
            SignatureScheme::ECDSA_SHA1,
        ],
        PrivateKey::EcdsaP384(_) => &[
            SignatureScheme::ECDSA_SECP384R1_SHA384,
            SignatureScheme::ECDSA_SECP256R1_SHA256,
            SignatureScheme::ECDSA_SHA1,
        ],
    };
    if peer_schemes.is_empty() {
        return Ok(Some(match key {
            PrivateKey::Rsa(_) => SignatureScheme::RSA_PKCS1_SHA1,
            _ => SignatureScheme::ECDSA_SHA1,
        }));
    }
    candidates
        .iter()
        .find(|c| peer_schemes.contains(c))
        .copied()
        .map(Some)
        .ok_or_else(|| TlsError::HandshakeFailed("no common signature scheme".into()))
}

/// Digest that gets signed for `content`.
pub fn signature_digest(
    scheme: Option<SignatureScheme>,
    rsa: bool,
    content: &[u8],
) -> Result<Vec<u8>, TlsError> {
    match scheme {
        Some(scheme) => {
            let hash = scheme.hash().ok_or_else(|| {
                TlsError::IllegalParameter(format!("signature scheme {:#06x}", scheme.0))
            })?;
            Ok(hash.digest(&[content]))
        }
        None if rsa => {
            let mut out = HashAlg::Md5.digest(&[content]);
            out.extend_from_slice(&HashAlg::Sha1.digest(&[content]));
            Ok(out)
        }
        None => Ok(HashAlg::Sha1.digest(&[content])),
    }
}

/// CertificateVerify digest over the transcript so far. SSL 3.0 uses the
/// keyed handshake hash, which needs the master secret.
pub fn certificate_verify_digest(
    schedule: &KeySchedule,
    scheme: Option<SignatureScheme>,
    rsa: bool,
    transcript: &TranscriptHash,
) -> Result<Vec<u8>, TlsError> {
    if schedule.version() == TlsVersion::Ssl30 {
        let sha1 = schedule.ssl3_handshake_mac(HashAlg::Sha1, transcript, b"");
        if !rsa {
            return Ok(sha1);
        }
        let mut out = schedule.ssl3_handshake_mac(HashAlg::Md5, transcript, b"");
        out.extend_from_slice(&sha1);
        return Ok(out);
    }
    signature_digest(scheme, rsa, transcript.messages())
}

fn check_scheme_fits(scheme: Option<SignatureScheme>, rsa: bool) -> Result<(), TlsError> {
    match scheme {
        Some(s) if s.is_rsa() != rsa || (!rsa && !s.is_ecdsa()) => Err(
            TlsError::IllegalParameter(format!("scheme {:#06x} does not match the key", s.0)),
        ),
        _ => Ok(()),
    }
}

/// Left-pad a short prehash to half the field size, which leaves the
/// integer value unchanged and satisfies the ECDSA prehash length floor.
fn ecdsa_prehash(digest: &[u8], field_len: usize) -> Vec<u8> {
    let floor = field_len / 2;
    if digest.len() >= floor {
        return digest.to_vec();
    }
    let mut out = vec![0u8; floor - digest.len()];
    out.extend_from_slice(digest);
    out
}

fn rsa_err(e: rsa::Error) -> TlsError {
    TlsError::CryptoError(CryptoError::Rsa(e.to_string()))
}

/// Sign a precomputed digest.
pub fn sign_digest(
    key: &PrivateKey,
    scheme: Option<SignatureScheme>,
    digest: &[u8],
) -> Result<Vec<u8>, TlsError> {
    check_scheme_fits(scheme, matches!(key, PrivateKey::Rsa(_)))?;
    match key {
        PrivateKey::Rsa(sk) => match scheme {
            None => sk.sign(Pkcs1v15Sign::new_unprefixed(), digest).map_err(rsa_err),
            Some(SignatureScheme::RSA_PKCS1_SHA1) => {
                sk.sign(Pkcs1v15Sign::new::<Sha1>(), digest).map_err(rsa_err)
            }
            Some(SignatureScheme::RSA_PKCS1_SHA256) => {
                sk.sign(Pkcs1v15Sign::new::<Sha256>(), digest).map_err(rsa_err)
            }
            Some(SignatureScheme::RSA_PKCS1_SHA384) => {
                sk.sign(Pkcs1v15Sign::new::<Sha384>(), digest).map_err(rsa_err)
            }
            Some(SignatureScheme::RSA_PSS_RSAE_SHA256) => sk
                .sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), digest)
                .map_err(rsa_err),
            Some(SignatureScheme::RSA_PSS_RSAE_SHA384) => sk
                .sign_with_rng(&mut OsRng, Pss::new::<Sha384>(), digest)
                .map_err(rsa_err),
            Some(other) => Err(TlsError::IllegalParameter(format!(
                "unsupported RSA scheme {:#06x}",
                other.0
            ))),
        },
        PrivateKey::EcdsaP256(sk) => {
            let sig: p256::ecdsa::Signature = sk
                .sign_prehash(&ecdsa_prehash(digest, 32))
                .map_err(|_| CryptoError::InvalidArg)?;
            Ok(sig.to_der().as_bytes().to_vec())
        }
        PrivateKey::EcdsaP384(sk) => {
            let sig: p384::ecdsa::Signature = sk
                .sign_prehash(&ecdsa_prehash(digest, 48))
                .map_err(|_| CryptoError::InvalidArg)?;
            Ok(sig.to_der().as_bytes().to_vec())
        }
    }
}

/// Verify a signature over a precomputed digest. Any mismatch is a
/// `decrypt_error`.
pub fn verify_digest(
    key: &PeerPublicKey,
    scheme: Option<SignatureScheme>,
    digest: &[u8],
    signature: &[u8],
) -> Result<(), TlsError> {
    check_scheme_fits(scheme, key.is_rsa())?;
    let bad = || TlsError::DecryptError("signature verification failed".into());
    match key {
        PeerPublicKey::Rsa(pk) => {
            let ok = match scheme {
                None => pk.verify(Pkcs1v15Sign::new_unprefixed(), digest, signature),
                Some(SignatureScheme::RSA_PKCS1_SHA1) => {
                    pk.verify(Pkcs1v15Sign::new::<Sha1>(), digest, signature)
                }
                Some(SignatureScheme::RSA_PKCS1_SHA256) => {
                    pk.verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
                }
                Some(SignatureScheme::RSA_PKCS1_SHA384) => {
                    pk.verify(Pkcs1v15Sign::new::<Sha384>(), digest, signature)
                }
                Some(SignatureScheme::RSA_PSS_RSAE_SHA256) => {
                    pk.verify(Pss::new::<Sha256>(), digest, signature)
                }
                Some(SignatureScheme::RSA_PSS_RSAE_SHA384) => {
                    pk.verify(Pss::new::<Sha384>(), digest, signature)
                }
                Some(_) => return Err(bad()),
            };
            ok.map_err(|_| bad())
        }
        PeerPublicKey::EcdsaP256(vk) => {
            let sig = p256::ecdsa::Signature::from_der(signature).map_err(|_| bad())?;
            vk.verify_prehash(&ecdsa_prehash(digest, 32), &sig)
                .map_err(|_| bad())
        }
        PeerPublicKey::EcdsaP384(vk) => {
            let sig = p384::ecdsa::Signature::from_der(signature).map_err(|_| bad())?;
            vk.verify_prehash(&ecdsa_prehash(digest, 48), &sig)
                .map_err(|_| bad())
        }
    }
}

/// Hash `content` and sign it.
pub fn sign(
    key: &PrivateKey,
    scheme: Option<SignatureScheme>,
    content: &[u8],
) -> Result<Vec<u8>, TlsError> {
    let digest = signature_digest(scheme, matches!(key, PrivateKey::Rsa(_)), content)?;
    sign_digest(key, scheme, &digest)
}

/// Hash `content` and verify `signature` over it.
pub fn verify(
    key: &PeerPublicKey,
    scheme: Option<SignatureScheme>,
    content: &[u8],
    signature: &[u8],
) -> Result<(), TlsError> {
    let digest = signature_digest(scheme, key.is_rsa(), content)?;
    verify_digest(key, scheme, &digest, signature)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::OnceLock;

    /// One 1024-bit RSA key shared by every test in the crate; generation is slow.
    pub(crate) fn test_rsa_key() -> rsa::RsaPrivateKey {
        static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
            .clone()
    }

    fn p256_key() -> PrivateKey {
        PrivateKey::EcdsaP256(p256::ecdsa::SigningKey::random(&mut OsRng))
    }

    fn p384_key() -> PrivateKey {
        PrivateKey::EcdsaP384(p384::ecdsa::SigningKey::random(&mut OsRng))
    }

    #[test]
    fn test_select_scheme() {
        let rsa = PrivateKey::Rsa(test_rsa_key());
        assert_eq!(
            select_signature_scheme(&rsa, &SignatureScheme::DEFAULTS, TlsVersion::Tls11).unwrap(),
            None
        );
        assert_eq!(
            select_signature_scheme(&rsa, &SignatureScheme::DEFAULTS, TlsVersion::Tls12).unwrap(),
            Some(SignatureScheme::RSA_PSS_RSAE_SHA256)
        );
        assert_eq!(
            select_signature_scheme(&rsa, &[], TlsVersion::Tls12).unwrap(),
            Some(SignatureScheme::RSA_PKCS1_SHA1)
        );
        assert_eq!(
            select_signature_scheme(&p384_key(), &SignatureScheme::DEFAULTS, TlsVersion::Tls12)
                .unwrap(),
            Some(SignatureScheme::ECDSA_SECP384R1_SHA384)
        );
        assert!(select_signature_scheme(
            &p256_key(),
            &[SignatureScheme::RSA_PKCS1_SHA256],
            TlsVersion::Tls12
        )
        .is_err());
    }

    #[test]
    fn test_rsa_sign_verify_every_scheme() {
        let sk = PrivateKey::Rsa(test_rsa_key());
        let pk = sk.public_key();
        for scheme in [
            None,
            Some(SignatureScheme::RSA_PKCS1_SHA1),
            Some(SignatureScheme::RSA_PKCS1_SHA256),
            Some(SignatureScheme::RSA_PKCS1_SHA384),
            Some(SignatureScheme::RSA_PSS_RSAE_SHA256),
            Some(SignatureScheme::RSA_PSS_RSAE_SHA384),
        ] {
            let sig = sign(&sk, scheme, b"params").unwrap();
            verify(&pk, scheme, b"params", &sig).unwrap();
            assert!(matches!(
                verify(&pk, scheme, b"tampered", &sig),
                Err(TlsError::DecryptError(_))
            ));
        }
    }

    #[test]
    fn test_ecdsa_sign_verify() {
        for sk in [p256_key(), p384_key()] {
            let pk = sk.public_key();
            for scheme in [
                None,
                Some(SignatureScheme::ECDSA_SHA1),
                Some(SignatureScheme::ECDSA_SECP256R1_SHA256),
                Some(SignatureScheme::ECDSA_SECP384R1_SHA384),
            ] {
                let sig = sign(&sk, scheme, b"server params").unwrap();
                verify(&pk, scheme, b"server params", &sig).unwrap();
                assert!(verify(&pk, scheme, b"other params", &sig).is_err());
            }
        }
    }

    #[test]
    fn test_scheme_key_mismatch() {
        let sk = p256_key();
        assert!(matches!(
            sign(&sk, Some(SignatureScheme::RSA_PKCS1_SHA256), b"x"),
            Err(TlsError::IllegalParameter(_))
        ));
        let rsa_pk = PrivateKey::Rsa(test_rsa_key()).public_key();
        assert!(verify(&rsa_pk, Some(SignatureScheme::ECDSA_SHA1), b"x", &[0; 64]).is_err());
    }

    #[test]
    fn test_garbage_signature_is_decrypt_error() {
        let pk = p256_key().public_key();
        assert!(matches!(
            verify(&pk, None, b"x", &[0x30, 0x01, 0x00]),
            Err(TlsError::DecryptError(_))
        ));
    }

    #[test]
    fn test_legacy_digest_shapes() {
        assert_eq!(signature_digest(None, true, b"abc").unwrap().len(), 36);
        assert_eq!(signature_digest(None, false, b"abc").unwrap().len(), 20);
        assert_eq!(
            signature_digest(Some(SignatureScheme::RSA_PKCS1_SHA384), true, b"abc")
                .unwrap()
                .len(),
            48
        );
    }
}
