//! TLS 1.3 HKDF primitives (RFC 8446 Section 7.1).
//!
//! The TLS 1.3 key schedule is not wired into the handshake; these functions
//! are the extract/expand building blocks it would sit on.

use hkdf::Hkdf;
use sha2::{Sha256, Sha384};
use zeroize::Zeroize;

use super::HashAlg;
use crate::{CryptoError, TlsError};

/// HKDF-Extract(salt, IKM) -> PRK. An empty salt means `hash_len` zeros.
pub fn hkdf_extract(alg: HashAlg, salt: &[u8], ikm: &[u8]) -> Result<Vec<u8>, TlsError> {
    let salt = (!salt.is_empty()).then_some(salt);
    match alg {
        HashAlg::Sha256 => Ok(Hkdf::<Sha256>::extract(salt, ikm).0.to_vec()),
        HashAlg::Sha384 => Ok(Hkdf::<Sha384>::extract(salt, ikm).0.to_vec()),
        _ => Err(TlsError::CryptoError(CryptoError::NotSupported)),
    }
}

/// HKDF-Expand(PRK, info, length) -> OKM.
pub fn hkdf_expand(alg: HashAlg, prk: &[u8], info: &[u8], len: usize) -> Result<Vec<u8>, TlsError> {
    let mut okm = vec![0u8; len];
    let res = match alg {
        HashAlg::Sha256 => Hkdf::<Sha256>::from_prk(prk)
            .map_err(|_| CryptoError::InvalidKey)?
            .expand(info, &mut okm),
        HashAlg::Sha384 => Hkdf::<Sha384>::from_prk(prk)
            .map_err(|_| CryptoError::InvalidKey)?
            .expand(info, &mut okm),
        _ => return Err(TlsError::CryptoError(CryptoError::NotSupported)),
    };
    res.map_err(|_| TlsError::CryptoError(CryptoError::InvalidArg))?;
    Ok(okm)
}

/// HKDF-Expand-Label(Secret, Label, Context, Length), with the `"tls13 "`
/// prefix added to `label`.
pub fn hkdf_expand_label(
    alg: HashAlg,
    secret: &[u8],
    label: &[u8],
    context: &[u8],
    len: usize,
) -> Result<Vec<u8>, TlsError> {
    let full_label_len = 6 + label.len();
    if full_label_len > 255 || context.len() > 255 || len > u16::MAX as usize {
        return Err(TlsError::InternalError("HKDF label too long".into()));
    }
    let mut info = Vec::with_capacity(4 + full_label_len + context.len());
    info.extend_from_slice(&(len as u16).to_be_bytes());
    info.push(full_label_len as u8);
    info.extend_from_slice(b"tls13 ");
    info.extend_from_slice(label);
    info.push(context.len() as u8);
    info.extend_from_slice(context);
    hkdf_expand(alg, secret, &info, len)
}

/// Derive-Secret(Secret, Label, Messages), with `transcript_hash` already
/// computed over the messages.
pub fn derive_secret(
    alg: HashAlg,
    secret: &[u8],
    label: &[u8],
    transcript_hash: &[u8],
) -> Result<Vec<u8>, TlsError> {
    hkdf_expand_label(alg, secret, label, transcript_hash, alg.output_len())
}

/// Early, handshake and master secrets of the TLS 1.3 schedule
/// (RFC 8446 Section 7.1).
pub struct Tls13Secrets {
    pub early: Vec<u8>,
    pub handshake: Vec<u8>,
    pub master: Vec<u8>,
}

impl Drop for Tls13Secrets {
    fn drop(&mut self) {
        self.early.zeroize();
        self.handshake.zeroize();
        self.master.zeroize();
    }
}

/// Run the extract/derive chain `PSK -> early -> (EC)DHE -> handshake -> master`.
/// Absent inputs are replaced by `hash_len` zero bytes.
pub fn tls13_secret_chain(
    alg: HashAlg,
    psk: Option<&[u8]>,
    shared_secret: Option<&[u8]>,
) -> Result<Tls13Secrets, TlsError> {
    let zeros = vec![0u8; alg.output_len()];
    let empty_hash = alg.digest(&[]);

    let early = hkdf_extract(alg, &[], psk.unwrap_or(&zeros))?;
    let mut salt = derive_secret(alg, &early, b"derived", &empty_hash)?;
    let handshake = hkdf_extract(alg, &salt, shared_secret.unwrap_or(&zeros))?;
    salt.zeroize();
    let mut salt = derive_secret(alg, &handshake, b"derived", &empty_hash)?;
    let master = hkdf_extract(alg, &salt, &zeros)?;
    salt.zeroize();
    Ok(Tls13Secrets {
        early,
        handshake,
        master,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    // RFC 8448 Section 3: simple 1-RTT handshake.
    #[test]
    fn test_early_secret_and_derived() {
        let zeros = [0u8; 32];
        let early = hkdf_extract(HashAlg::Sha256, &[], &zeros).unwrap();
        assert_eq!(
            early,
            hex("33ad0a1c607ec03b09e6cd9893680ce210adf300aa1f2660e1b22e10f170f92a")
        );

        let empty_hash = HashAlg::Sha256.digest(&[]);
        let derived = derive_secret(HashAlg::Sha256, &early, b"derived", &empty_hash).unwrap();
        assert_eq!(
            derived,
            hex("6f2615a108c702c5678f54fc9dbab69716c076189c48250cebeac3576c3611ba")
        );
    }

    // RFC 5869 test case 1.
    #[test]
    fn test_rfc5869_case1() {
        let ikm = [0x0bu8; 22];
        let salt = hex("000102030405060708090a0b0c");
        let info = hex("f0f1f2f3f4f5f6f7f8f9");
        let prk = hkdf_extract(HashAlg::Sha256, &salt, &ikm).unwrap();
        assert_eq!(
            prk,
            hex("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5")
        );
        let okm = hkdf_expand(HashAlg::Sha256, &prk, &info, 42).unwrap();
        assert_eq!(
            okm,
            hex("3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865")
        );
    }

    // RFC 8448 Section 3: handshake secret from the X25519 shared secret.
    #[test]
    fn test_secret_chain_handshake_secret() {
        let ecdhe = hex("8bd4054fb55b9d63fdfbacf9f04b9f0d35e6d63f537563efd46272900f89492d");
        let secrets = tls13_secret_chain(HashAlg::Sha256, None, Some(&ecdhe)).unwrap();
        assert_eq!(
            secrets.early,
            hex("33ad0a1c607ec03b09e6cd9893680ce210adf300aa1f2660e1b22e10f170f92a")
        );
        assert_eq!(
            secrets.handshake,
            hex("1dc826e93606aa6fdc0aadc12f741b01046aa6b99f691ed221a9f0ca043fbeac")
        );
        assert_eq!(
            secrets.master,
            hex("18df06843d13a08bf2a449844c5f8a478001bc4d4c627984d5a41da8d0402919")
        );
    }

    #[test]
    fn test_expand_limits() {
        let prk = [1u8; 32];
        assert!(hkdf_expand(HashAlg::Sha256, &prk, b"", 255 * 32 + 1).is_err());
        assert!(hkdf_expand(HashAlg::Md5, &prk, b"", 16).is_err());
        let long_label = [b'a'; 250];
        assert!(hkdf_expand_label(HashAlg::Sha256, &prk, &long_label, b"", 16).is_err());
    }

    #[test]
    fn test_sha384_lengths() {
        let prk = hkdf_extract(HashAlg::Sha384, &[], &[0u8; 48]).unwrap();
        assert_eq!(prk.len(), 48);
        let secret = derive_secret(HashAlg::Sha384, &prk, b"derived", &[0u8; 48]).unwrap();
        assert_eq!(secret.len(), 48);
    }
}
