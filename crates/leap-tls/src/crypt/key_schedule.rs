//! Master-secret derivation, key-block expansion and Finished verify_data
//! for SSL 3.0 through TLS 1.2.
//!
//! The key block is always sliced in the order
//! `client MAC, server MAC, client key, server key, client IV, server IV`
//! and then assigned to the local/remote directions by role.

use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::prf::{ssl3_generate_block, tls10_prf, tls12_prf};
use super::transcript::TranscriptHash;
use super::HashAlg;
use crate::suites::CipherSuiteInfo;
use crate::{TlsError, TlsRole, TlsVersion};

const MASTER_SECRET_LEN: usize = 48;
const VERIFY_DATA_LEN: usize = 12;
const SSL3_PAD1: u8 = 0x36;
const SSL3_PAD2: u8 = 0x5c;

fn is_ssl3(version: TlsVersion) -> bool {
    version == TlsVersion::Ssl30
}

/// Client and server hello randoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Randoms {
    pub client: [u8; 32],
    pub server: [u8; 32],
}

impl Randoms {
    fn client_server(&self) -> Vec<u8> {
        [self.client.as_slice(), self.server.as_slice()].concat()
    }

    fn server_client(&self) -> Vec<u8> {
        [self.server.as_slice(), self.client.as_slice()].concat()
    }
}

/// Version-appropriate PRF. SSL 3.0 has no labelled PRF.
pub fn prf(
    version: TlsVersion,
    suite: &CipherSuiteInfo,
    secret: &[u8],
    label: &str,
    seed: &[u8],
    len: usize,
) -> Result<Vec<u8>, TlsError> {
    if is_ssl3(version) {
        return Err(TlsError::InternalError("SSL 3.0 has no labelled PRF".into()));
    }
    if version.rank() >= TlsVersion::Tls12.rank() {
        tls12_prf(suite.prf_hash(), secret, label, seed, len)
    } else {
        tls10_prf(secret, label, seed, len)
    }
}

/// Hash over the transcript so far, as used for the extended master secret
/// and for TLS 1.0-1.2 Finished.
pub fn session_hash(
    version: TlsVersion,
    suite: &CipherSuiteInfo,
    transcript: &TranscriptHash,
) -> Vec<u8> {
    if version.rank() >= TlsVersion::Tls12.rank() {
        transcript.current_hash(suite.prf_hash())
    } else {
        transcript.md5_sha1()
    }
}

/// Keys for one traffic direction.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct DirectionKeys {
    pub mac_key: Vec<u8>,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for DirectionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionKeys")
            .field("mac_key_len", &self.mac_key.len())
            .field("key_len", &self.key.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

/// Per-direction field lengths taken from the key block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBlockLayout {
    pub mac_len: usize,
    pub key_len: usize,
    pub iv_len: usize,
}

impl KeyBlockLayout {
    /// AEAD suites take no MAC key, CBC suites take no IV from TLS 1.1 on,
    /// and export suites take only their 5-byte secret key.
    pub fn for_suite(suite: &CipherSuiteInfo, version: TlsVersion) -> Self {
        let bulk = suite.bulk;
        match bulk.exported_key_len() {
            Some(exported) => Self {
                mac_len: suite.mac_len(),
                key_len: exported,
                iv_len: 0,
            },
            None => Self {
                mac_len: suite.mac_len(),
                key_len: bulk.key_len(),
                iv_len: bulk.fixed_iv_len(version),
            },
        }
    }

    pub fn total_len(&self) -> usize {
        2 * (self.mac_len + self.key_len + self.iv_len)
    }
}

/// The expanded key block split per sender.
#[derive(Debug)]
pub struct KeyBlock {
    pub client: DirectionKeys,
    pub server: DirectionKeys,
}

impl KeyBlock {
    /// `(write, read)` keys for an endpoint acting as `role`.
    pub fn split(self, role: TlsRole) -> (DirectionKeys, DirectionKeys) {
        let KeyBlock { client, server } = self;
        match role {
            TlsRole::Client => (client, server),
            TlsRole::Server => (server, client),
        }
    }
}

/// Master secret plus the parameters needed to derive everything else.
pub struct KeySchedule {
    version: TlsVersion,
    suite: &'static CipherSuiteInfo,
    master_secret: Vec<u8>,
}

impl Drop for KeySchedule {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

impl KeySchedule {
    /// Derive the 48-byte master secret from the pre-master secret. With
    /// `session_hash` set (TLS only) the extended master secret is used.
    pub fn derive_master_secret(
        version: TlsVersion,
        suite: &'static CipherSuiteInfo,
        pre_master_secret: &[u8],
        randoms: &Randoms,
        session_hash: Option<&[u8]>,
    ) -> Result<Self, TlsError> {
        if version.rank() > TlsVersion::Tls12.rank() {
            return Err(TlsError::InternalError(format!(
                "no key schedule for {version}"
            )));
        }
        let master_secret = if is_ssl3(version) {
            ssl3_generate_block(pre_master_secret, &randoms.client_server(), MASTER_SECRET_LEN)?
        } else if let Some(hash) = session_hash {
            prf(version, suite, pre_master_secret, "extended master secret", hash, MASTER_SECRET_LEN)?
        } else {
            prf(
                version,
                suite,
                pre_master_secret,
                "master secret",
                &randoms.client_server(),
                MASTER_SECRET_LEN,
            )?
        };
        trace!(%version, suite = suite.name, ems = session_hash.is_some(), "master secret derived");
        Ok(Self {
            version,
            suite,
            master_secret,
        })
    }

    pub fn master_secret(&self) -> &[u8] {
        &self.master_secret
    }

    pub fn version(&self) -> TlsVersion {
        self.version
    }

    pub fn suite(&self) -> &'static CipherSuiteInfo {
        self.suite
    }

    /// Expand the master secret into the per-direction key block.
    pub fn derive_key_block(&self, randoms: &Randoms) -> Result<KeyBlock, TlsError> {
        let layout = KeyBlockLayout::for_suite(self.suite, self.version);
        let KeyBlockLayout {
            mac_len,
            key_len,
            iv_len,
        } = layout;
        let total = layout.total_len();

        let mut block = if is_ssl3(self.version) {
            ssl3_generate_block(&self.master_secret, &randoms.server_client(), total)?
        } else {
            prf(
                self.version,
                self.suite,
                &self.master_secret,
                "key expansion",
                &randoms.server_client(),
                total,
            )?
        };

        let mut rest = block.as_slice();
        let mut take = |n: usize| {
            let (head, tail) = rest.split_at(n);
            rest = tail;
            head.to_vec()
        };
        let mut client = DirectionKeys::default();
        let mut server = DirectionKeys::default();
        client.mac_key = take(mac_len);
        server.mac_key = take(mac_len);
        client.key = take(key_len);
        server.key = take(key_len);
        client.iv = take(iv_len);
        server.iv = take(iv_len);
        block.zeroize();

        if self.suite.is_exportable() {
            self.expand_export_keys(randoms, &mut client, &mut server)?;
        }
        trace!(mac_len, key_len = client.key.len(), iv_len = client.iv.len(), "key block expanded");
        Ok(KeyBlock { client, server })
    }

    /// Turn the 5-byte export secrets into full-length keys and derive the
    /// IVs, which export suites never take from the key block.
    fn expand_export_keys(
        &self,
        randoms: &Randoms,
        client: &mut DirectionKeys,
        server: &mut DirectionKeys,
    ) -> Result<(), TlsError> {
        let bulk = self.suite.bulk;
        let key_len = bulk.key_len();
        let block_size = bulk.block_size();
        let cr_sr = randoms.client_server();
        let sr_cr = randoms.server_client();

        if is_ssl3(self.version) {
            let md5 = |parts: &[&[u8]], len: usize| {
                let mut out = HashAlg::Md5.digest(parts);
                out.truncate(len);
                out
            };
            let ck = md5(&[&client.key, &cr_sr], key_len);
            let sk = md5(&[&server.key, &sr_cr], key_len);
            client.key.zeroize();
            server.key.zeroize();
            client.key = ck;
            server.key = sk;
            if block_size > 0 {
                client.iv = md5(&[&cr_sr], block_size);
                server.iv = md5(&[&sr_cr], block_size);
            }
            return Ok(());
        }

        if self.version.rank() > TlsVersion::Tls10.rank() {
            return Err(TlsError::InternalError(
                "export suites stop at TLS 1.0".into(),
            ));
        }
        let ck = tls10_prf(&client.key, "client write key", &cr_sr, key_len)?;
        let sk = tls10_prf(&server.key, "server write key", &cr_sr, key_len)?;
        client.key.zeroize();
        server.key.zeroize();
        client.key = ck;
        server.key = sk;
        if block_size > 0 {
            let mut ivs = tls10_prf(&[], "IV block", &cr_sr, 2 * block_size)?;
            client.iv = ivs[..block_size].to_vec();
            server.iv = ivs[block_size..].to_vec();
            ivs.zeroize();
        }
        Ok(())
    }

    /// Finished verify_data sent by `sender` over `transcript`.
    pub fn compute_verify_data(
        &self,
        sender: TlsRole,
        transcript: &TranscriptHash,
    ) -> Result<Vec<u8>, TlsError> {
        if is_ssl3(self.version) {
            let tag: &[u8] = match sender {
                TlsRole::Client => b"CLNT",
                TlsRole::Server => b"SRVR",
            };
            let mut out = self.ssl3_handshake_mac(HashAlg::Md5, transcript, tag);
            out.extend_from_slice(&self.ssl3_handshake_mac(HashAlg::Sha1, transcript, tag));
            return Ok(out);
        }
        let label = match sender {
            TlsRole::Client => "client finished",
            TlsRole::Server => "server finished",
        };
        let hash = session_hash(self.version, self.suite, transcript);
        prf(self.version, self.suite, &self.master_secret, label, &hash, VERIFY_DATA_LEN)
    }

    /// SSL 3.0 keyed transcript hash:
    /// `H(master || pad2 || H(messages || sender || master || pad1))`.
    /// With an empty `sender` this is the CertificateVerify hash.
    pub fn ssl3_handshake_mac(
        &self,
        alg: HashAlg,
        transcript: &TranscriptHash,
        sender: &[u8],
    ) -> Vec<u8> {
        let pad1 = vec![SSL3_PAD1; alg.ssl3_pad_len()];
        let pad2 = vec![SSL3_PAD2; alg.ssl3_pad_len()];
        let inner = alg.digest(&[transcript.messages(), sender, &self.master_secret, &pad1]);
        alg.digest(&[&self.master_secret, &pad2, &inner])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suites::{lookup, BulkCipher};
    use crate::CipherSuite;

    fn randoms() -> Randoms {
        Randoms {
            client: [0x11; 32],
            server: [0x22; 32],
        }
    }

    fn schedule(version: TlsVersion, suite: CipherSuite) -> KeySchedule {
        KeySchedule::derive_master_secret(version, lookup(suite).unwrap(), &[0x03; 48], &randoms(), None).unwrap()
    }

    #[test]
    fn test_master_secret_matches_prf() {
        let ks = schedule(TlsVersion::Tls12, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256);
        let mut seed = vec![0x11; 32];
        seed.extend_from_slice(&[0x22; 32]);
        let expected = tls12_prf(HashAlg::Sha256, &[0x03; 48], "master secret", &seed, 48).unwrap();
        assert_eq!(ks.master_secret(), expected.as_slice());
    }

    #[test]
    fn test_extended_master_secret_differs() {
        let suite = lookup(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256).unwrap();
        let plain = KeySchedule::derive_master_secret(TlsVersion::Tls12, suite, &[3; 48], &randoms(), None).unwrap();
        let ems =
            KeySchedule::derive_master_secret(TlsVersion::Tls12, suite, &[3; 48], &randoms(), Some(&[9; 32])).unwrap();
        assert_ne!(plain.master_secret(), ems.master_secret());
        assert_eq!(ems.master_secret().len(), 48);
    }

    #[test]
    fn test_key_block_layout_cbc_tls12() {
        let ks = schedule(TlsVersion::Tls12, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256);
        let mut seed = vec![0x22; 32];
        seed.extend_from_slice(&[0x11; 32]);
        let raw = tls12_prf(HashAlg::Sha256, ks.master_secret(), "key expansion", &seed, 96).unwrap();

        let kb = ks.derive_key_block(&randoms()).unwrap();
        assert_eq!(kb.client.mac_key, raw[0..32]);
        assert_eq!(kb.server.mac_key, raw[32..64]);
        assert_eq!(kb.client.key, raw[64..80]);
        assert_eq!(kb.server.key, raw[80..96]);
        assert!(kb.client.iv.is_empty());
        assert!(kb.server.iv.is_empty());
    }

    #[test]
    fn test_key_block_role_flip() {
        let ks = schedule(TlsVersion::Tls12, CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256);
        let (c_write, c_read) = ks.derive_key_block(&randoms()).unwrap().split(TlsRole::Client);
        let (s_write, s_read) = ks.derive_key_block(&randoms()).unwrap().split(TlsRole::Server);
        assert_eq!(c_write.key, s_read.key);
        assert_eq!(c_read.key, s_write.key);
        assert_ne!(c_write.key, c_read.key);
        assert_eq!(c_write.iv.len(), 4);
        assert!(c_write.mac_key.is_empty());
    }

    #[test]
    fn test_layout_sizes() {
        let cbc = lookup(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256).unwrap();
        assert_eq!(KeyBlockLayout::for_suite(cbc, TlsVersion::Tls12).total_len(), 96);
        let gcm = lookup(CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384).unwrap();
        assert_eq!(
            KeyBlockLayout::for_suite(gcm, TlsVersion::Tls12),
            KeyBlockLayout {
                mac_len: 0,
                key_len: 32,
                iv_len: 4
            }
        );
        let export = lookup(CipherSuite::TLS_RSA_EXPORT_WITH_DES40_CBC_SHA).unwrap();
        assert_eq!(KeyBlockLayout::for_suite(export, TlsVersion::Tls10).total_len(), 50);
    }

    #[test]
    fn test_key_block_deterministic() {
        let a = schedule(TlsVersion::Tls11, CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA);
        let b = schedule(TlsVersion::Tls11, CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA);
        let ka = a.derive_key_block(&randoms()).unwrap();
        let kb = b.derive_key_block(&randoms()).unwrap();
        assert_eq!(ka.client.key, kb.client.key);
        assert_eq!(ka.server.mac_key, kb.server.mac_key);
    }

    #[test]
    fn test_tls10_cbc_has_implicit_iv() {
        let ks = schedule(TlsVersion::Tls10, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA);
        let kb = ks.derive_key_block(&randoms()).unwrap();
        assert_eq!(kb.client.mac_key.len(), 20);
        assert_eq!(kb.client.iv.len(), 16);
    }

    #[test]
    fn test_export_keys_tls10() {
        let ks = schedule(TlsVersion::Tls10, CipherSuite::TLS_RSA_EXPORT_WITH_DES40_CBC_SHA);
        assert_eq!(ks.suite().bulk, BulkCipher::Des40Cbc);
        let kb = ks.derive_key_block(&randoms()).unwrap();
        assert_eq!(kb.client.key.len(), 8);
        assert_eq!(kb.client.iv.len(), 8);
        let ivs = tls10_prf(&[], "IV block", &[[0x11u8; 32], [0x22u8; 32]].concat(), 16).unwrap();
        assert_eq!(kb.client.iv, ivs[..8]);
        assert_eq!(kb.server.iv, ivs[8..]);
    }

    #[test]
    fn test_export_keys_ssl3() {
        let ks = schedule(TlsVersion::Ssl30, CipherSuite::TLS_RSA_EXPORT_WITH_RC4_40_MD5);
        let kb = ks.derive_key_block(&randoms()).unwrap();
        assert_eq!(kb.client.key.len(), 16);
        assert!(kb.client.iv.is_empty());
        assert_ne!(kb.client.key, kb.server.key);
    }

    #[test]
    fn test_export_refused_after_tls10() {
        let suite = lookup(CipherSuite::TLS_RSA_EXPORT_WITH_RC4_40_MD5).unwrap();
        let ks = KeySchedule::derive_master_secret(TlsVersion::Tls11, suite, &[3; 48], &randoms(), None).unwrap();
        assert!(ks.derive_key_block(&randoms()).is_err());
    }

    #[test]
    fn test_verify_data_lengths_and_senders() {
        let mut transcript = TranscriptHash::new();
        transcript.update(b"client hello bytes");
        for (version, len) in [
            (TlsVersion::Ssl30, 36),
            (TlsVersion::Tls10, 12),
            (TlsVersion::Tls11, 12),
            (TlsVersion::Tls12, 12),
        ] {
            let ks = schedule(version, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA);
            let client = ks.compute_verify_data(TlsRole::Client, &transcript).unwrap();
            let server = ks.compute_verify_data(TlsRole::Server, &transcript).unwrap();
            assert_eq!(client.len(), len, "{version}");
            assert_ne!(client, server);
        }
    }

    #[test]
    fn test_tls13_has_no_schedule_here() {
        let suite = lookup(CipherSuite::TLS_AES_128_GCM_SHA256).unwrap();
        assert!(KeySchedule::derive_master_secret(TlsVersion::Tls13, suite, &[0; 32], &randoms(), None).is_err());
    }
}
