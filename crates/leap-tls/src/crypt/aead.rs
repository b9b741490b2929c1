//! TLS AEAD cipher abstraction.
//!
//! Wraps GCM over AES, Camellia and ARIA, AES-CCM (16- and 8-byte tags) and
//! ChaCha20-Poly1305 behind a common trait.

use aead::consts::{U12, U16, U8};
use aead::generic_array::typenum::Unsigned;
use aead::{Aead, AeadCore, KeyInit, KeySizeUser, Nonce, Payload};
use aes::{Aes128, Aes256};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use aria::{Aria128, Aria256};
use camellia::{Camellia128, Camellia256};
use ccm::Ccm;
use chacha20poly1305::ChaCha20Poly1305;

use crate::suites::BulkCipher;
use crate::{CryptoError, TlsError};

/// Trait for TLS record-layer AEAD operations.
pub trait TlsAead: Send + Sync {
    /// Encrypt plaintext with AEAD. Returns `ciphertext || tag`.
    fn encrypt(&self, nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, TlsError>;

    /// Decrypt `ciphertext || tag` with AEAD. Returns plaintext.
    fn decrypt(
        &self,
        nonce: &[u8],
        aad: &[u8],
        ciphertext_with_tag: &[u8],
    ) -> Result<Vec<u8>, TlsError>;

    /// Tag size in bytes.
    fn tag_size(&self) -> usize;
}

type Aes128Ccm = Ccm<Aes128, U16, U12>;
type Aes256Ccm = Ccm<Aes256, U16, U12>;
type Aes128Ccm8 = Ccm<Aes128, U8, U12>;
type Aes256Ccm8 = Ccm<Aes256, U8, U12>;
type Camellia128Gcm = AesGcm<Camellia128, U12>;
type Camellia256Gcm = AesGcm<Camellia256, U12>;
type Aria128Gcm = AesGcm<Aria128, U12>;
type Aria256Gcm = AesGcm<Aria256, U12>;

/// Any RustCrypto AEAD with a 96-bit nonce.
struct RustCryptoAead<A> {
    inner: A,
}

impl<A> RustCryptoAead<A>
where
    A: KeyInit + KeySizeUser,
{
    fn new(key: &[u8]) -> Result<Self, TlsError> {
        let inner = A::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: A::KeySize::USIZE,
            got: key.len(),
        })?;
        Ok(Self { inner })
    }
}

impl<A> RustCryptoAead<A>
where
    A: AeadCore,
{
    fn nonce<'a>(&self, nonce: &'a [u8]) -> Result<&'a Nonce<A>, TlsError> {
        if nonce.len() != A::NonceSize::USIZE {
            return Err(TlsError::CryptoError(CryptoError::InvalidIvLength));
        }
        Ok(Nonce::<A>::from_slice(nonce))
    }
}

impl<A> TlsAead for RustCryptoAead<A>
where
    A: Aead + Send + Sync,
{
    fn encrypt(&self, nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, TlsError> {
        self.inner
            .encrypt(self.nonce(nonce)?, Payload { msg: plaintext, aad })
            .map_err(|_| TlsError::CryptoError(CryptoError::InvalidArg))
    }

    fn decrypt(
        &self,
        nonce: &[u8],
        aad: &[u8],
        ciphertext_with_tag: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        self.inner
            .decrypt(
                self.nonce(nonce)?,
                Payload {
                    msg: ciphertext_with_tag,
                    aad,
                },
            )
            .map_err(|_| TlsError::CryptoError(CryptoError::AeadTagVerifyFail))
    }

    fn tag_size(&self) -> usize {
        A::TagSize::USIZE
    }
}

/// Create a TlsAead instance for the given bulk cipher and key.
pub fn create_aead(bulk: BulkCipher, key: &[u8]) -> Result<Box<dyn TlsAead>, TlsError> {
    Ok(match bulk {
        BulkCipher::Aes128Gcm => Box::new(RustCryptoAead::<Aes128Gcm>::new(key)?),
        BulkCipher::Aes256Gcm => Box::new(RustCryptoAead::<Aes256Gcm>::new(key)?),
        BulkCipher::Aes128Ccm => Box::new(RustCryptoAead::<Aes128Ccm>::new(key)?),
        BulkCipher::Aes256Ccm => Box::new(RustCryptoAead::<Aes256Ccm>::new(key)?),
        BulkCipher::Aes128Ccm8 => Box::new(RustCryptoAead::<Aes128Ccm8>::new(key)?),
        BulkCipher::Aes256Ccm8 => Box::new(RustCryptoAead::<Aes256Ccm8>::new(key)?),
        BulkCipher::Camellia128Gcm => Box::new(RustCryptoAead::<Camellia128Gcm>::new(key)?),
        BulkCipher::Camellia256Gcm => Box::new(RustCryptoAead::<Camellia256Gcm>::new(key)?),
        BulkCipher::Aria128Gcm => Box::new(RustCryptoAead::<Aria128Gcm>::new(key)?),
        BulkCipher::Aria256Gcm => Box::new(RustCryptoAead::<Aria256Gcm>::new(key)?),
        BulkCipher::ChaCha20Poly1305 => Box::new(RustCryptoAead::<ChaCha20Poly1305>::new(key)?),
        _ => return Err(TlsError::CryptoError(CryptoError::NotSupported)),
    })
}
