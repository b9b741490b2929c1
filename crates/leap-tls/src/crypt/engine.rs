//! Raw block and stream engines behind the record ciphers.
//!
//! CBC runs through the `cbc` mode wrappers without padding; the record layer
//! pads, and keeps the chained IV for SSL 3.0 and TLS 1.0 itself.

use aes::{Aes128, Aes256};
use aria::{Aria128, Aria256};
use camellia::{Camellia128, Camellia256};
use cipher::block_padding::NoPadding;
use cipher::consts::U16;
use cipher::{
    BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit, KeyIvInit, StreamCipher,
};
use des::{Des, TdesEde3};
use idea::Idea;
use rc4::Rc4;

use crate::suites::BulkCipher;
use crate::{CryptoError, TlsError};

fn key_len_error(expected: usize, got: usize) -> TlsError {
    TlsError::CryptoError(CryptoError::InvalidKeyLength { expected, got })
}

/// A keyed block cipher.
#[derive(Clone)]
pub enum BlockEngine {
    Aes128(Box<Aes128>),
    Aes256(Box<Aes256>),
    Camellia128(Box<Camellia128>),
    Camellia256(Box<Camellia256>),
    Aria128(Box<Aria128>),
    Aria256(Box<Aria256>),
    Des(Box<Des>),
    TdesEde3(Box<TdesEde3>),
    Idea(Box<Idea>),
}

macro_rules! with_cipher {
    ($engine:expr, $c:ident => $body:expr) => {
        match $engine {
            BlockEngine::Aes128($c) => $body,
            BlockEngine::Aes256($c) => $body,
            BlockEngine::Camellia128($c) => $body,
            BlockEngine::Camellia256($c) => $body,
            BlockEngine::Aria128($c) => $body,
            BlockEngine::Aria256($c) => $body,
            BlockEngine::Des($c) => $body,
            BlockEngine::TdesEde3($c) => $body,
            BlockEngine::Idea($c) => $body,
        }
    };
}

fn keyed<C: KeyInit>(key: &[u8], expected: usize) -> Result<Box<C>, TlsError> {
    C::new_from_slice(key)
        .map(Box::new)
        .map_err(|_| key_len_error(expected, key.len()))
}

fn encrypt_with<C>(cipher: &C, iv: &[u8], data: &mut [u8]) -> Result<(), TlsError>
where
    C: BlockCipher + BlockEncryptMut + Clone,
{
    let len = data.len();
    cbc::Encryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| TlsError::CryptoError(CryptoError::InvalidIvLength))?
        .encrypt_padded_mut::<NoPadding>(data, len)
        .map_err(|_| TlsError::CryptoError(CryptoError::NotBlockAligned))?;
    Ok(())
}

fn decrypt_with<C>(cipher: &C, iv: &[u8], data: &mut [u8]) -> Result<(), TlsError>
where
    C: BlockCipher + BlockDecryptMut + Clone,
{
    cbc::Decryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| TlsError::CryptoError(CryptoError::InvalidIvLength))?
        .decrypt_padded_mut::<NoPadding>(data)
        .map_err(|_| TlsError::CryptoError(CryptoError::NotBlockAligned))?;
    Ok(())
}

impl BlockEngine {
    pub fn new(bulk: BulkCipher, key: &[u8]) -> Result<Self, TlsError> {
        let expected = bulk.key_len();
        if key.len() != expected {
            return Err(key_len_error(expected, key.len()));
        }
        Ok(match bulk {
            BulkCipher::Aes128Cbc => BlockEngine::Aes128(keyed(key, expected)?),
            BulkCipher::Aes256Cbc => BlockEngine::Aes256(keyed(key, expected)?),
            BulkCipher::Camellia128Cbc => BlockEngine::Camellia128(keyed(key, expected)?),
            BulkCipher::Camellia256Cbc => BlockEngine::Camellia256(keyed(key, expected)?),
            BulkCipher::Aria128Cbc => BlockEngine::Aria128(keyed(key, expected)?),
            BulkCipher::Aria256Cbc => BlockEngine::Aria256(keyed(key, expected)?),
            BulkCipher::DesCbc | BulkCipher::Des40Cbc => BlockEngine::Des(keyed(key, expected)?),
            BulkCipher::TripleDesEdeCbc => BlockEngine::TdesEde3(keyed(key, expected)?),
            BulkCipher::IdeaCbc => BlockEngine::Idea(keyed(key, expected)?),
            _ => return Err(TlsError::CryptoError(CryptoError::NotSupported)),
        })
    }

    pub fn block_size(&self) -> usize {
        match self {
            BlockEngine::Des(_) | BlockEngine::TdesEde3(_) | BlockEngine::Idea(_) => 8,
            _ => 16,
        }
    }

    fn check(&self, iv: &[u8], data: &[u8]) -> Result<usize, TlsError> {
        let bs = self.block_size();
        if iv.len() != bs {
            return Err(TlsError::CryptoError(CryptoError::InvalidIvLength));
        }
        if data.len() % bs != 0 {
            return Err(TlsError::CryptoError(CryptoError::NotBlockAligned));
        }
        Ok(bs)
    }

    /// CBC-encrypt `data` in place. Returns the last ciphertext block, which
    /// chains into the next record for SSL 3.0 and TLS 1.0.
    pub fn cbc_encrypt(&self, iv: &[u8], data: &mut [u8]) -> Result<Vec<u8>, TlsError> {
        let bs = self.check(iv, data)?;
        if data.is_empty() {
            return Ok(iv.to_vec());
        }
        with_cipher!(self, c => encrypt_with(&**c, iv, data))?;
        Ok(data[data.len() - bs..].to_vec())
    }

    /// CBC-decrypt `data` in place. Returns the last ciphertext block.
    pub fn cbc_decrypt(&self, iv: &[u8], data: &mut [u8]) -> Result<Vec<u8>, TlsError> {
        let bs = self.check(iv, data)?;
        if data.is_empty() {
            return Ok(iv.to_vec());
        }
        let last = data[data.len() - bs..].to_vec();
        with_cipher!(self, c => decrypt_with(&**c, iv, data))?;
        Ok(last)
    }
}

/// A keyed stream cipher. Keystream position carries over between records.
pub enum StreamEngine {
    Rc4(Box<Rc4<U16>>),
    ChaCha20(Box<chacha20::ChaCha20>),
}

impl StreamEngine {
    /// `iv` is ignored for RC4 and must be 12 bytes for ChaCha20.
    pub fn new(bulk: BulkCipher, key: &[u8], iv: &[u8]) -> Result<Self, TlsError> {
        match bulk {
            BulkCipher::Rc4_40 | BulkCipher::Rc4_128 => {
                let rc4 = Rc4::<U16>::new_from_slice(key).map_err(|_| key_len_error(16, key.len()))?;
                Ok(StreamEngine::Rc4(Box::new(rc4)))
            }
            BulkCipher::ChaCha20 => {
                if iv.len() != 12 {
                    return Err(TlsError::CryptoError(CryptoError::InvalidIvLength));
                }
                let cipher = chacha20::ChaCha20::new_from_slices(key, iv)
                    .map_err(|_| key_len_error(32, key.len()))?;
                Ok(StreamEngine::ChaCha20(Box::new(cipher)))
            }
            _ => Err(TlsError::CryptoError(CryptoError::NotSupported)),
        }
    }

    pub fn apply(&mut self, buf: &mut [u8]) {
        match self {
            StreamEngine::Rc4(c) => c.apply_keystream(buf),
            StreamEngine::ChaCha20(c) => c.apply_keystream(buf),
        }
    }
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

    // NIST SP 800-38A F.2.1, first two blocks.
    #[test]
    fn test_aes128_cbc_known_answer() {
        let key = hex("2b7e151628aed2a6abf7158809cf4f3c");
        let iv = hex("000102030405060708090a0b0c0d0e0f");
        let mut data = hex("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51");
        let engine = BlockEngine::new(BulkCipher::Aes128Cbc, &key).unwrap();
        let last = engine.cbc_encrypt(&iv, &mut data).unwrap();
        assert_eq!(
            data,
            hex("7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2")
        );
        assert_eq!(last, data[16..].to_vec());

        engine.cbc_decrypt(&iv, &mut data).unwrap();
        assert_eq!(
            data,
            hex("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
        );
    }

    #[test]
    fn test_des_and_tdes_roundtrip() {
        for (bulk, key_len) in [(BulkCipher::DesCbc, 8), (BulkCipher::TripleDesEdeCbc, 24)] {
            let engine = BlockEngine::new(bulk, &vec![0x5au8; key_len]).unwrap();
            assert_eq!(engine.block_size(), 8);
            let iv = [7u8; 8];
            let mut data = b"sixteen byte msg".to_vec();
            engine.cbc_encrypt(&iv, &mut data).unwrap();
            assert_ne!(&data, b"sixteen byte msg");
            engine.cbc_decrypt(&iv, &mut data).unwrap();
            assert_eq!(&data, b"sixteen byte msg");
        }
    }

    // Single-block CBC under a zero IV is the raw block transform.
    #[test]
    fn test_camellia_aria_idea_known_answers() {
        let cases = [
            // RFC 3713 Appendix A
            (
                BulkCipher::Camellia128Cbc,
                "0123456789abcdeffedcba9876543210",
                "0123456789abcdeffedcba9876543210",
                "67673138549669730857065648eabe43",
            ),
            // RFC 5794 Appendix A.1
            (
                BulkCipher::Aria128Cbc,
                "000102030405060708090a0b0c0d0e0f",
                "00112233445566778899aabbccddeeff",
                "d718fbd6ab644c739da95f3be6451778",
            ),
            (
                BulkCipher::IdeaCbc,
                "00010002000300040005000600070008",
                "0000000100020003",
                "11fbed2b01986de5",
            ),
        ];
        for (bulk, key, pt, ct) in cases {
            let engine = BlockEngine::new(bulk, &hex(key)).unwrap();
            let iv = vec![0u8; engine.block_size()];
            let mut data = hex(pt);
            engine.cbc_encrypt(&iv, &mut data).unwrap();
            assert_eq!(data, hex(ct), "{bulk:?}");
            engine.cbc_decrypt(&iv, &mut data).unwrap();
            assert_eq!(data, hex(pt), "{bulk:?}");
        }
    }

    #[test]
    fn test_decrypt_returns_last_ciphertext_block() {
        let engine = BlockEngine::new(BulkCipher::Aria256Cbc, &[0x61; 32]).unwrap();
        let iv = [0x10u8; 16];
        let mut data = vec![0x42u8; 48];
        let chained = engine.cbc_encrypt(&iv, &mut data).unwrap();
        let ciphertext = data.clone();
        assert_eq!(engine.cbc_decrypt(&iv, &mut data).unwrap(), chained);
        assert_eq!(chained, ciphertext[32..].to_vec());
        assert_eq!(data, vec![0x42u8; 48]);
    }

    #[test]
    fn test_block_engine_rejects_bad_input() {
        assert!(BlockEngine::new(BulkCipher::Aes128Cbc, &[0u8; 15]).is_err());
        assert!(BlockEngine::new(BulkCipher::Aes128Gcm, &[0u8; 16]).is_err());
        let engine = BlockEngine::new(BulkCipher::Aes256Cbc, &[0u8; 32]).unwrap();
        assert!(engine.cbc_encrypt(&[0u8; 16], &mut [0u8; 17]).is_err());
        assert!(engine.cbc_encrypt(&[0u8; 8], &mut [0u8; 16]).is_err());
    }

    // RFC 6229, 128-bit key 0x0102...10, first 16 keystream bytes.
    #[test]
    fn test_rc4_keystream() {
        let key = hex("0102030405060708090a0b0c0d0e0f10");
        let mut engine = StreamEngine::new(BulkCipher::Rc4_128, &key, &[]).unwrap();
        let mut buf = [0u8; 16];
        engine.apply(&mut buf);
        assert_eq!(buf.to_vec(), hex("9ac7cc9a609d1ef7b2932899cde41b97"));
    }

    #[test]
    fn test_stream_state_continues() {
        let key = [3u8; 32];
        let iv = [9u8; 12];
        let mut whole = StreamEngine::new(BulkCipher::ChaCha20, &key, &iv).unwrap();
        let mut split = StreamEngine::new(BulkCipher::ChaCha20, &key, &iv).unwrap();
        let mut a = [0u8; 100];
        whole.apply(&mut a);
        let mut b = [0u8; 100];
        split.apply(&mut b[..37]);
        split.apply(&mut b[37..]);
        assert_eq!(a, b);
        assert!(StreamEngine::new(BulkCipher::ChaCha20, &key, &[0u8; 8]).is_err());
    }
}
