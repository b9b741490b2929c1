//! Version-specific pseudo-random functions.
//!
//! ```text
//! P_hash(secret, seed) = HMAC_hash(secret, A(1) + seed) ||
//!                        HMAC_hash(secret, A(2) + seed) || ...
//! A(0) = seed, A(i) = HMAC_hash(secret, A(i-1))
//!
//! TLS 1.2:      PRF = P_<suite hash>(secret, label + seed)
//! TLS 1.0/1.1:  PRF = P_MD5(S1, label + seed) XOR P_SHA1(S2, label + seed)
//! SSL 3.0:      block = MD5(secret + SHA1("A" + secret + seed)) ||
//!                       MD5(secret + SHA1("BB" + secret + seed)) || ...
//! ```

use super::HashAlg;
use crate::TlsError;

/// Maximum SSL 3.0 cascade length: one round per letter `A`..`Z`.
const SSL3_MAX_ROUNDS: usize = 26;

/// TLS 1.2 PRF over the given hash.
pub fn tls12_prf(
    alg: HashAlg,
    secret: &[u8],
    label: &str,
    seed: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, TlsError> {
    let label_seed = [label.as_bytes(), seed].concat();
    p_hash(alg, secret, &label_seed, output_len)
}

/// TLS 1.0/1.1 PRF. The secret is split into two halves which share the
/// middle byte when its length is odd.
pub fn tls10_prf(
    secret: &[u8],
    label: &str,
    seed: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, TlsError> {
    let half = secret.len().div_ceil(2);
    let s1 = &secret[..half];
    let s2 = &secret[secret.len() - half..];
    let label_seed = [label.as_bytes(), seed].concat();

    let mut out = p_hash(HashAlg::Md5, s1, &label_seed, output_len)?;
    let sha = p_hash(HashAlg::Sha1, s2, &label_seed, output_len)?;
    for (o, s) in out.iter_mut().zip(sha.iter()) {
        *o ^= s;
    }
    Ok(out)
}

/// P_hash expansion.
pub fn p_hash(
    alg: HashAlg,
    secret: &[u8],
    seed: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, TlsError> {
    let mut result = Vec::with_capacity(output_len + alg.output_len());
    let mut a = seed.to_vec();
    while result.len() < output_len {
        a = alg.hmac(secret, &[&a])?;
        let block = alg.hmac(secret, &[&a, seed])?;
        result.extend_from_slice(&block);
    }
    result.truncate(output_len);
    Ok(result)
}

/// SSL 3.0 MD5/SHA-1 cascade used for both the master secret and the key
/// block. Round `i` prefixes the inner SHA-1 with the letter `'A' + i`
/// repeated `i + 1` times.
pub fn ssl3_generate_block(
    secret: &[u8],
    seed: &[u8],
    output_len: usize,
) -> Result<Vec<u8>, TlsError> {
    let rounds = output_len.div_ceil(HashAlg::Md5.output_len());
    if rounds > SSL3_MAX_ROUNDS {
        return Err(TlsError::InternalError(format!(
            "SSL 3.0 key material limited to {} bytes, {output_len} requested",
            SSL3_MAX_ROUNDS * HashAlg::Md5.output_len()
        )));
    }
    let mut result = Vec::with_capacity(rounds * HashAlg::Md5.output_len());
    for i in 0..rounds {
        let prefix = vec![b'A' + i as u8; i + 1];
        let inner = HashAlg::Sha1.digest(&[&prefix, secret, seed]);
        result.extend_from_slice(&HashAlg::Md5.digest(&[secret, &inner]));
    }
    result.truncate(output_len);
    Ok(result)
}
