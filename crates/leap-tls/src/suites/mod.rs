//! Cipher suite registry and negotiation.
//!
//! Every suite is an immutable [`CipherSuiteInfo`] built into a static
//! catalog; a process-wide id -> suite map is built on first use and never
//! mutated afterwards.

mod catalog;

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::crypt::HashAlg;
use crate::{CipherSuite, TlsError, TlsVersion};

pub use catalog::CATALOG;

/// How the pre-master secret is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchangeKind {
    /// No key exchange (`TLS_NULL_WITH_NULL_NULL`).
    Null,
    Rsa,
    RsaExport,
    /// Finite-field DH with the server key fixed in its certificate.
    DhStatic,
    Dhe,
    DhAnon,
    /// ECDH with the server key fixed in its certificate.
    EcdhStatic,
    Ecdhe,
    EcdhAnon,
    Psk,
    DhePsk,
    EcdhePsk,
    RsaPsk,
    /// TLS 1.3 suites carry no key-exchange algorithm.
    Tls13,
}

/// Whether the server flight carries a ServerKeyExchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKeyExchangeRule {
    Required,
    Optional,
    Forbidden,
}

impl KeyExchangeKind {
    pub fn requires_server_certificate(self) -> bool {
        matches!(
            self,
            KeyExchangeKind::Rsa
                | KeyExchangeKind::RsaExport
                | KeyExchangeKind::DhStatic
                | KeyExchangeKind::Dhe
                | KeyExchangeKind::EcdhStatic
                | KeyExchangeKind::Ecdhe
                | KeyExchangeKind::RsaPsk
        )
    }

    pub fn server_key_exchange(self) -> ServerKeyExchangeRule {
        match self {
            KeyExchangeKind::Dhe
            | KeyExchangeKind::DhAnon
            | KeyExchangeKind::Ecdhe
            | KeyExchangeKind::EcdhAnon
            | KeyExchangeKind::DhePsk
            | KeyExchangeKind::EcdhePsk => ServerKeyExchangeRule::Required,
            KeyExchangeKind::Psk | KeyExchangeKind::RsaPsk => ServerKeyExchangeRule::Optional,
            _ => ServerKeyExchangeRule::Forbidden,
        }
    }

    pub fn is_psk(self) -> bool {
        matches!(
            self,
            KeyExchangeKind::Psk
                | KeyExchangeKind::DhePsk
                | KeyExchangeKind::EcdhePsk
                | KeyExchangeKind::RsaPsk
        )
    }

    /// Finite-field Diffie-Hellman variants.
    pub fn is_ffdh(self) -> bool {
        matches!(
            self,
            KeyExchangeKind::DhStatic
                | KeyExchangeKind::Dhe
                | KeyExchangeKind::DhAnon
                | KeyExchangeKind::DhePsk
        )
    }

    /// Elliptic-curve Diffie-Hellman variants.
    pub fn is_ecdh(self) -> bool {
        matches!(
            self,
            KeyExchangeKind::EcdhStatic
                | KeyExchangeKind::Ecdhe
                | KeyExchangeKind::EcdhAnon
                | KeyExchangeKind::EcdhePsk
        )
    }

    pub fn is_static(self) -> bool {
        matches!(self, KeyExchangeKind::DhStatic | KeyExchangeKind::EcdhStatic)
    }

    /// Static (EC)DH needs the server key out of its certificate, which this
    /// engine never parses; `Null` and TLS 1.3 suites are not negotiable here.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            KeyExchangeKind::Null
                | KeyExchangeKind::DhStatic
                | KeyExchangeKind::EcdhStatic
                | KeyExchangeKind::Tls13
        )
    }
}

/// Server authentication algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthAlg {
    Anonymous,
    Rsa,
    Dss,
    Ecdsa,
    Psk,
    Tls13,
}

impl AuthAlg {
    pub fn is_supported(self) -> bool {
        !matches!(self, AuthAlg::Dss | AuthAlg::Tls13)
    }
}

/// Record protection family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    Null,
    Stream,
    Block,
    Aead,
}

/// Bulk encryption algorithm: engine plus mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkCipher {
    Null,
    Rc4_40,
    Rc4_128,
    /// Raw ChaCha20 keystream, without Poly1305.
    ChaCha20,
    Des40Cbc,
    DesCbc,
    TripleDesEdeCbc,
    IdeaCbc,
    Aes128Cbc,
    Aes256Cbc,
    Camellia128Cbc,
    Camellia256Cbc,
    Aria128Cbc,
    Aria256Cbc,
    Aes128Gcm,
    Aes256Gcm,
    Aes128Ccm,
    Aes256Ccm,
    Aes128Ccm8,
    Aes256Ccm8,
    Camellia128Gcm,
    Camellia256Gcm,
    Aria128Gcm,
    Aria256Gcm,
    ChaCha20Poly1305,
}

impl BulkCipher {
    pub fn kind(self) -> CipherKind {
        match self {
            BulkCipher::Null => CipherKind::Null,
            BulkCipher::Rc4_40 | BulkCipher::Rc4_128 | BulkCipher::ChaCha20 => CipherKind::Stream,
            BulkCipher::Des40Cbc
            | BulkCipher::DesCbc
            | BulkCipher::TripleDesEdeCbc
            | BulkCipher::IdeaCbc
            | BulkCipher::Aes128Cbc
            | BulkCipher::Aes256Cbc
            | BulkCipher::Camellia128Cbc
            | BulkCipher::Camellia256Cbc
            | BulkCipher::Aria128Cbc
            | BulkCipher::Aria256Cbc => CipherKind::Block,
            _ => CipherKind::Aead,
        }
    }

    /// Length of the key handed to the engine.
    pub fn key_len(self) -> usize {
        match self {
            BulkCipher::Null => 0,
            BulkCipher::Des40Cbc | BulkCipher::DesCbc => 8,
            BulkCipher::Rc4_40 | BulkCipher::Rc4_128 | BulkCipher::IdeaCbc => 16,
            BulkCipher::Aes128Cbc
            | BulkCipher::Aes128Gcm
            | BulkCipher::Aes128Ccm
            | BulkCipher::Aes128Ccm8
            | BulkCipher::Camellia128Cbc
            | BulkCipher::Camellia128Gcm
            | BulkCipher::Aria128Cbc
            | BulkCipher::Aria128Gcm => 16,
            BulkCipher::TripleDesEdeCbc => 24,
            BulkCipher::ChaCha20
            | BulkCipher::Aes256Cbc
            | BulkCipher::Aes256Gcm
            | BulkCipher::Aes256Ccm
            | BulkCipher::Aes256Ccm8
            | BulkCipher::Camellia256Cbc
            | BulkCipher::Camellia256Gcm
            | BulkCipher::Aria256Cbc
            | BulkCipher::Aria256Gcm
            | BulkCipher::ChaCha20Poly1305 => 32,
        }
    }

    /// Secret key bytes taken from the key block of an export suite before
    /// expansion to [`key_len`](Self::key_len).
    pub fn exported_key_len(self) -> Option<usize> {
        match self {
            BulkCipher::Rc4_40 | BulkCipher::Des40Cbc => Some(5),
            _ => None,
        }
    }

    pub fn is_export(self) -> bool {
        self.exported_key_len().is_some()
    }

    pub fn block_size(self) -> usize {
        match self {
            BulkCipher::Des40Cbc
            | BulkCipher::DesCbc
            | BulkCipher::TripleDesEdeCbc
            | BulkCipher::IdeaCbc => 8,
            b if b.kind() == CipherKind::Block => 16,
            _ => 0,
        }
    }

    /// Implicit IV / nonce salt length: the IV derived from the key block.
    /// Block ciphers only derive one before TLS 1.1.
    pub fn fixed_iv_len(self, version: TlsVersion) -> usize {
        match self.kind() {
            CipherKind::Block if version.rank() < TlsVersion::Tls11.rank() => self.block_size(),
            CipherKind::Block => 0,
            CipherKind::Aead if self == BulkCipher::ChaCha20Poly1305 => 12,
            CipherKind::Aead => 4,
            CipherKind::Stream if self == BulkCipher::ChaCha20 => 12,
            _ => 0,
        }
    }

    /// Per-record explicit nonce/IV carried on the wire.
    pub fn record_iv_len(self, version: TlsVersion) -> usize {
        match self.kind() {
            CipherKind::Block if version.rank() >= TlsVersion::Tls11.rank() => self.block_size(),
            CipherKind::Aead if self != BulkCipher::ChaCha20Poly1305 => 8,
            _ => 0,
        }
    }

    pub fn tag_len(self) -> usize {
        match self {
            BulkCipher::Aes128Ccm8 | BulkCipher::Aes256Ccm8 => 8,
            b if b.kind() == CipherKind::Aead => 16,
            _ => 0,
        }
    }
}

/// Inclusive range of protocol versions a suite may be used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: TlsVersion,
    pub max: TlsVersion,
}

impl VersionRange {
    pub const ALL: Self = Self::new(TlsVersion::Ssl30, TlsVersion::Tls12);
    pub const EXPORT: Self = Self::new(TlsVersion::Ssl30, TlsVersion::Tls10);
    pub const PRE_TLS12: Self = Self::new(TlsVersion::Ssl30, TlsVersion::Tls11);
    pub const TLS10_UP: Self = Self::new(TlsVersion::Tls10, TlsVersion::Tls12);
    pub const TLS12: Self = Self::new(TlsVersion::Tls12, TlsVersion::Tls12);
    pub const TLS13: Self = Self::new(TlsVersion::Tls13, TlsVersion::Tls13);

    pub const fn new(min: TlsVersion, max: TlsVersion) -> Self {
        Self { min, max }
    }

    /// DTLS versions are matched against their stream equivalents.
    pub fn contains(&self, version: TlsVersion) -> bool {
        (self.min.rank()..=self.max.rank()).contains(&version.rank())
    }
}

/// Immutable description of one cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuiteInfo {
    pub suite: CipherSuite,
    pub name: &'static str,
    pub key_exchange: KeyExchangeKind,
    pub auth: AuthAlg,
    pub bulk: BulkCipher,
    /// MAC hash for stream/block suites; PRF hash for AEAD suites.
    pub hash: HashAlg,
    pub versions: VersionRange,
}

impl CipherSuiteInfo {
    pub fn is_exportable(&self) -> bool {
        self.bulk.is_export()
    }

    /// Record MAC hash, absent for AEAD suites.
    pub fn mac_hash(&self) -> Option<HashAlg> {
        match self.bulk.kind() {
            CipherKind::Aead => None,
            _ => Some(self.hash),
        }
    }

    pub fn mac_len(&self) -> usize {
        self.mac_hash().map_or(0, HashAlg::output_len)
    }

    /// Hash behind the TLS 1.2 PRF: SHA-384 suites use SHA-384, every other
    /// suite uses SHA-256.
    pub fn prf_hash(&self) -> HashAlg {
        match self.hash {
            HashAlg::Sha384 => HashAlg::Sha384,
            _ => HashAlg::Sha256,
        }
    }

    pub fn supports(&self, version: TlsVersion) -> bool {
        self.versions.contains(version)
    }

    /// Whether this engine can run the suite end to end.
    pub fn is_negotiable(&self) -> bool {
        self.key_exchange.is_supported() && self.auth.is_supported()
    }
}

/// Process-wide id -> suite index.
pub struct Registry {
    by_id: HashMap<u16, &'static CipherSuiteInfo>,
}

impl Registry {
    fn build() -> Self {
        let mut by_id = HashMap::with_capacity(CATALOG.len());
        for info in CATALOG {
            let previous = by_id.insert(info.suite.0, info);
            debug_assert!(previous.is_none(), "duplicate suite id {:#06x}", info.suite.0);
        }
        Registry { by_id }
    }

    pub fn get(&self, suite: CipherSuite) -> Option<&'static CipherSuiteInfo> {
        self.by_id.get(&suite.0).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CipherSuiteInfo> {
        CATALOG.iter()
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::build)
}

/// O(1) lookup by wire id.
pub fn lookup(suite: CipherSuite) -> Option<&'static CipherSuiteInfo> {
    if is_grease(suite.0) {
        return None;
    }
    registry().get(suite)
}

/// The sixteen reserved GREASE values (RFC 8701): `0x0A0A`, `0x1A1A`, ... `0xFAFA`.
pub const GREASE_VALUES: [u16; 16] = [
    0x0A0A, 0x1A1A, 0x2A2A, 0x3A3A, 0x4A4A, 0x5A5A, 0x6A6A, 0x7A7A, 0x8A8A, 0x9A9A, 0xAAAA,
    0xBABA, 0xCACA, 0xDADA, 0xEAEA, 0xFAFA,
];

/// Whether `value` has the GREASE shape `0x?A?A`. The high nibbles need not
/// match, so this is wider than [`GREASE_VALUES`].
pub fn is_grease(value: u16) -> bool {
    value & 0x0F0F == 0x0A0A
}

/// Pick one GREASE value from two random bytes.
pub fn grease_value(seed: u8) -> u16 {
    GREASE_VALUES[(seed & 0x0F) as usize]
}

/// Suites offered when the configuration does not list its own: forward-secret
/// AEAD first, then CBC, nothing anonymous, export-grade or NULL.
pub fn default_suites() -> Vec<CipherSuite> {
    vec![
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
        CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
        CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
        CipherSuite::TLS_DHE_RSA_WITH_AES_128_GCM_SHA256,
        CipherSuite::TLS_DHE_RSA_WITH_AES_256_GCM_SHA384,
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA,
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
        CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA,
        CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA,
        CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256,
        CipherSuite::TLS_RSA_WITH_AES_256_GCM_SHA384,
        CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256,
        CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
        CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA,
        CipherSuite::TLS_RSA_WITH_3DES_EDE_CBC_SHA,
    ]
}

/// Client side: validate the server's selection against what was offered.
pub fn negotiate_as_client(
    offered: &[CipherSuite],
    selected: CipherSuite,
    version: TlsVersion,
) -> Result<&'static CipherSuiteInfo, TlsError> {
    if is_grease(selected.0) || !offered.contains(&selected) {
        return Err(TlsError::NoSharedCipherSuite);
    }
    let info = lookup(selected).ok_or(TlsError::NoSharedCipherSuite)?;
    if !info.is_negotiable() || !info.supports(version) {
        return Err(TlsError::NoSharedCipherSuite);
    }
    debug!(suite = info.name, %version, "server selected cipher suite");
    Ok(info)
}

/// Server side: walk the local preference list and take the first suite
/// the peer also offered, that runs at `version`, and that `usable` accepts
/// (for instance only when a matching key or DH group is configured).
pub fn negotiate_as_server(
    local_preference: &[CipherSuite],
    remote_offered: &[CipherSuite],
    version: TlsVersion,
    usable: impl Fn(&CipherSuiteInfo) -> bool,
) -> Result<&'static CipherSuiteInfo, TlsError> {
    let selected = local_preference
        .iter()
        .filter(|s| !is_grease(s.0) && remote_offered.contains(s))
        .filter_map(|s| lookup(*s))
        .find(|info| info.is_negotiable() && info.supports(version) && usable(info))
        .ok_or(TlsError::NoSharedCipherSuite)?;
    debug!(suite = selected.name, %version, "selected cipher suite");
    Ok(selected)
}
