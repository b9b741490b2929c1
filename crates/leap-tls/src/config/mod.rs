//! TLS configuration with builder pattern.

use std::fmt;
use std::sync::Arc;

use rsa::RsaPrivateKey;
use zeroize::Zeroizing;

use crate::cert::{
    AcceptAnyCertificate, CertificateProvider, PeerPublicKey, SharedProvider, SharedValidator,
    StaticCertificates,
};
use crate::crypt::{NamedGroup, SignatureScheme};
use crate::handshake::key_exchange::DhParams;
use crate::record::MAX_PLAINTEXT_LENGTH;
use crate::suites::{default_suites, AuthAlg};
use crate::{CipherSuite, TlsVersion};

/// Private key for signing (ServerKeyExchange, CertificateVerify) and, for
/// RSA, decrypting the pre-master secret.
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    EcdsaP256(p256::ecdsa::SigningKey),
    EcdsaP384(p384::ecdsa::SigningKey),
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::Rsa(_) => f.write_str("PrivateKey::Rsa(<redacted>)"),
            PrivateKey::EcdsaP256(_) => f.write_str("PrivateKey::EcdsaP256(<redacted>)"),
            PrivateKey::EcdsaP384(_) => f.write_str("PrivateKey::EcdsaP384(<redacted>)"),
        }
    }
}

impl PrivateKey {
    /// The matching public key.
    pub fn public_key(&self) -> PeerPublicKey {
        match self {
            PrivateKey::Rsa(k) => PeerPublicKey::Rsa(k.to_public_key()),
            PrivateKey::EcdsaP256(k) => PeerPublicKey::EcdsaP256(k.verifying_key().clone()),
            PrivateKey::EcdsaP384(k) => PeerPublicKey::EcdsaP384(k.verifying_key().clone()),
        }
    }

    /// Whether this key can authenticate a suite using `auth`.
    pub fn fits(&self, auth: AuthAlg) -> bool {
        matches!(
            (self, auth),
            (PrivateKey::Rsa(_), AuthAlg::Rsa)
                | (PrivateKey::EcdsaP256(_) | PrivateKey::EcdsaP384(_), AuthAlg::Ecdsa)
        )
    }

    pub fn as_rsa(&self) -> Option<&RsaPrivateKey> {
        match self {
            PrivateKey::Rsa(k) => Some(k),
            _ => None,
        }
    }
}

/// Server callback for PSK lookup: given a PSK identity, return the PSK value or None.
pub type PskServerCallback = Arc<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

/// TLS configuration, shared by client and server connections.
#[derive(Clone)]
pub struct TlsConfig {
    /// Minimum supported version.
    pub min_version: TlsVersion,
    /// Maximum supported version (TLS 1.2 is the highest this engine runs).
    pub max_version: TlsVersion,
    /// Enabled cipher suites (in preference order).
    pub cipher_suites: Vec<CipherSuite>,
    /// Supported named groups for ephemeral ECDH (in preference order).
    pub supported_groups: Vec<NamedGroup>,
    /// Supported signature algorithms (in preference order).
    pub signature_algorithms: Vec<SignatureScheme>,
    /// Server name for the SNI extension.
    pub server_name: Option<String>,
    /// ALPN protocols (in preference order).
    pub alpn_protocols: Vec<Vec<u8>>,
    /// Whether to validate the peer's chain and verify its signatures.
    pub verify_peer: bool,
    /// Source of this endpoint's chain; falls back to `certificate_chain`.
    pub certificate_provider: Option<SharedProvider>,
    /// Judge of the peer's chain; without one, any chain is accepted.
    pub certificate_validator: Option<SharedValidator>,
    /// Own certificate chain (DER, leaf first).
    pub certificate_chain: Vec<Vec<u8>>,
    /// Own private key.
    pub private_key: Option<PrivateKey>,
    /// Server: finite-field group for DHE suites. DHE suites are not
    /// selected without it.
    pub dh_params: Option<DhParams>,
    /// Pre-shared key for PSK suites (RFC 4279).
    pub psk: Option<Zeroizing<Vec<u8>>>,
    /// Client: identity sent in ClientKeyExchange. Server: identity accepted
    /// for `psk` when no callback is set.
    pub psk_identity: Option<Vec<u8>>,
    /// Server: hint sent in ServerKeyExchange.
    pub psk_identity_hint: Option<Vec<u8>>,
    /// Server: look up a PSK by identity.
    pub psk_server_callback: Option<PskServerCallback>,
    /// Offer/accept the extended master secret (RFC 7627). Default: true.
    pub enable_extended_master_secret: bool,
    /// Client: sprinkle GREASE values into ClientHello (RFC 8701).
    pub grease: bool,
    /// Client: pad a ClientHello of 256..512 bytes up to 512 (RFC 7685).
    pub client_hello_padding: bool,
    /// Largest plaintext fragment sent. Below 16384 the client also asks the
    /// peer for a matching max_fragment_length.
    pub max_fragment_size: usize,
    /// Server: send CertificateRequest.
    pub request_client_cert: bool,
    /// Server: fail the handshake if the client sends no certificate.
    pub require_client_cert: bool,
    /// Peer address handed to certificate callbacks.
    pub peer_address: Option<String>,
}

impl fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConfig")
            .field("min_version", &self.min_version)
            .field("max_version", &self.max_version)
            .field("cipher_suites", &self.cipher_suites)
            .field("server_name", &self.server_name)
            .field("verify_peer", &self.verify_peer)
            .field("private_key", &self.private_key)
            .field("dh_params", &self.dh_params)
            .field(
                "psk",
                &self.psk.as_ref().map(|p| format!("[{} bytes]", p.len())),
            )
            .field("psk_identity", &self.psk_identity)
            .field(
                "psk_server_callback",
                &self.psk_server_callback.as_ref().map(|_| "<callback>"),
            )
            .finish_non_exhaustive()
    }
}

impl TlsConfig {
    /// Create a builder for TLS configuration.
    pub fn builder() -> TlsConfigBuilder {
        TlsConfigBuilder::default()
    }

    /// Name handed to certificate callbacks: the peer address when known,
    /// otherwise the SNI host.
    pub fn peer_label(&self) -> Option<&str> {
        self.peer_address
            .as_deref()
            .or(self.server_name.as_deref())
    }

    /// This endpoint's chain, from the provider when one is set.
    pub fn local_chain(&self) -> Vec<Vec<u8>> {
        match &self.certificate_provider {
            Some(provider) => provider.certificates(self.peer_label()),
            None => StaticCertificates(self.certificate_chain.clone()).certificates(None),
        }
    }

    /// The peer-chain validator, accepting anything when none is set.
    pub fn validator(&self) -> SharedValidator {
        self.certificate_validator
            .clone()
            .unwrap_or_else(|| Arc::new(AcceptAnyCertificate))
    }

    /// Whether `version` lies in the configured range.
    pub fn allows_version(&self, version: TlsVersion) -> bool {
        !version.is_dtls()
            && version.rank() >= self.min_version.rank()
            && version.rank() <= self.max_version.rank()
    }
}

/// Builder for `TlsConfig`.
pub struct TlsConfigBuilder {
    config: TlsConfig,
}

impl Default for TlsConfigBuilder {
    fn default() -> Self {
        Self {
            config: TlsConfig {
                min_version: TlsVersion::Tls10,
                max_version: TlsVersion::Tls12,
                cipher_suites: default_suites(),
                supported_groups: vec![
                    NamedGroup::X25519,
                    NamedGroup::SECP256R1,
                    NamedGroup::SECP384R1,
                ],
                signature_algorithms: SignatureScheme::DEFAULTS.to_vec(),
                server_name: None,
                alpn_protocols: Vec::new(),
                verify_peer: true,
                certificate_provider: None,
                certificate_validator: None,
                certificate_chain: Vec::new(),
                private_key: None,
                dh_params: None,
                psk: None,
                psk_identity: None,
                psk_identity_hint: None,
                psk_server_callback: None,
                enable_extended_master_secret: true,
                grease: false,
                client_hello_padding: false,
                max_fragment_size: MAX_PLAINTEXT_LENGTH,
                request_client_cert: false,
                require_client_cert: false,
                peer_address: None,
            },
        }
    }
}

impl fmt::Debug for TlsConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TlsConfigBuilder").field(&self.config).finish()
    }
}

impl TlsConfigBuilder {
    pub fn min_version(mut self, version: TlsVersion) -> Self {
        self.config.min_version = version;
        self
    }

    pub fn max_version(mut self, version: TlsVersion) -> Self {
        self.config.max_version = version;
        self
    }

    pub fn cipher_suites(mut self, suites: &[CipherSuite]) -> Self {
        self.config.cipher_suites = suites.to_vec();
        self
    }

    pub fn supported_groups(mut self, groups: &[NamedGroup]) -> Self {
        self.config.supported_groups = groups.to_vec();
        self
    }

    pub fn signature_algorithms(mut self, schemes: &[SignatureScheme]) -> Self {
        self.config.signature_algorithms = schemes.to_vec();
        self
    }

    pub fn server_name(mut self, name: &str) -> Self {
        self.config.server_name = Some(name.to_string());
        self
    }

    pub fn alpn(mut self, protocols: &[&[u8]]) -> Self {
        self.config.alpn_protocols = protocols.iter().map(|p| p.to_vec()).collect();
        self
    }

    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.config.verify_peer = verify;
        self
    }

    pub fn certificate_provider(mut self, provider: SharedProvider) -> Self {
        self.config.certificate_provider = Some(provider);
        self
    }

    pub fn certificate_validator(mut self, validator: SharedValidator) -> Self {
        self.config.certificate_validator = Some(validator);
        self
    }

    pub fn certificate_chain(mut self, chain: Vec<Vec<u8>>) -> Self {
        self.config.certificate_chain = chain;
        self
    }

    pub fn private_key(mut self, key: PrivateKey) -> Self {
        self.config.private_key = Some(key);
        self
    }

    pub fn dh_params(mut self, params: DhParams) -> Self {
        self.config.dh_params = Some(params);
        self
    }

    pub fn psk(mut self, psk: Vec<u8>) -> Self {
        self.config.psk = Some(Zeroizing::new(psk));
        self
    }

    pub fn psk_identity(mut self, identity: &[u8]) -> Self {
        self.config.psk_identity = Some(identity.to_vec());
        self
    }

    pub fn psk_identity_hint(mut self, hint: &[u8]) -> Self {
        self.config.psk_identity_hint = Some(hint.to_vec());
        self
    }

    pub fn psk_server_callback(mut self, callback: PskServerCallback) -> Self {
        self.config.psk_server_callback = Some(callback);
        self
    }

    pub fn enable_extended_master_secret(mut self, enable: bool) -> Self {
        self.config.enable_extended_master_secret = enable;
        self
    }

    pub fn grease(mut self, enable: bool) -> Self {
        self.config.grease = enable;
        self
    }

    pub fn client_hello_padding(mut self, enable: bool) -> Self {
        self.config.client_hello_padding = enable;
        self
    }

    /// Clamped to `[512, 16384]`.
    pub fn max_fragment_size(mut self, size: usize) -> Self {
        self.config.max_fragment_size = size.clamp(512, MAX_PLAINTEXT_LENGTH);
        self
    }

    pub fn request_client_cert(mut self, request: bool) -> Self {
        self.config.request_client_cert = request;
        self
    }

    pub fn require_client_cert(mut self, require: bool) -> Self {
        self.config.require_client_cert = require;
        if require {
            self.config.request_client_cert = true;
        }
        self
    }

    pub fn peer_address(mut self, address: &str) -> Self {
        self.config.peer_address = Some(address.to_string());
        self
    }

    pub fn build(self) -> TlsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::{CertificateVerdict, PinnedCertificate};

    #[test]
    fn test_config_builder_defaults() {
        let config = TlsConfig::builder().build();
        assert_eq!(config.min_version, TlsVersion::Tls10);
        assert_eq!(config.max_version, TlsVersion::Tls12);
        assert_eq!(config.cipher_suites, default_suites());
        assert!(config.verify_peer);
        assert!(config.enable_extended_master_secret);
        assert!(!config.grease);
        assert!(!config.client_hello_padding);
        assert_eq!(config.max_fragment_size, MAX_PLAINTEXT_LENGTH);
        assert_eq!(config.supported_groups[0], NamedGroup::X25519);
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_config_builder_fields() {
        let config = TlsConfig::builder()
            .min_version(TlsVersion::Ssl30)
            .cipher_suites(&[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256])
            .server_name("example.com")
            .alpn(&[b"h2", b"http/1.1"])
            .verify_peer(false)
            .grease(true)
            .client_hello_padding(true)
            .max_fragment_size(100)
            .require_client_cert(true)
            .build();
        assert_eq!(config.min_version, TlsVersion::Ssl30);
        assert_eq!(config.cipher_suites.len(), 1);
        assert_eq!(config.server_name.as_deref(), Some("example.com"));
        assert_eq!(config.alpn_protocols, vec![b"h2".to_vec(), b"http/1.1".to_vec()]);
        assert!(!config.verify_peer);
        assert!(config.grease);
        assert!(config.client_hello_padding);
        assert_eq!(config.max_fragment_size, 512);
        assert!(config.request_client_cert);
        assert!(config.require_client_cert);
    }

    #[test]
    fn test_version_range() {
        let config = TlsConfig::builder().build();
        assert!(!config.allows_version(TlsVersion::Ssl30));
        assert!(config.allows_version(TlsVersion::Tls10));
        assert!(config.allows_version(TlsVersion::Tls12));
        assert!(!config.allows_version(TlsVersion::Tls13));
        assert!(!config.allows_version(TlsVersion::Dtls12));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let key = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        let config = TlsConfig::builder()
            .psk(vec![0x42; 16])
            .psk_identity(b"client1")
            .private_key(PrivateKey::EcdsaP256(key))
            .build();
        let debug = format!("{config:?}");
        assert!(debug.contains("[16 bytes]"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("66, 66"));
    }

    #[test]
    fn test_local_chain_prefers_provider() {
        let config = TlsConfig::builder()
            .certificate_chain(vec![vec![1, 2, 3]])
            .build();
        assert_eq!(config.local_chain(), vec![vec![1, 2, 3]]);

        let provider: SharedProvider = Arc::new(|peer: Option<&str>| {
            vec![peer.unwrap_or("none").as_bytes().to_vec()]
        });
        let config = TlsConfig::builder()
            .certificate_chain(vec![vec![1, 2, 3]])
            .certificate_provider(provider)
            .peer_address("10.0.0.1:443")
            .server_name("example.com")
            .build();
        assert_eq!(config.local_chain(), vec![b"10.0.0.1:443".to_vec()]);
    }

    #[test]
    fn test_validator_default_accepts() {
        let config = TlsConfig::builder().build();
        assert!(matches!(
            config.validator().validate(&[vec![1]], None),
            CertificateVerdict::Accept(None)
        ));

        let key = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        let pinned = PinnedCertificate {
            leaf: vec![9],
            key: PrivateKey::EcdsaP256(key).public_key(),
        };
        let config = TlsConfig::builder()
            .certificate_validator(Arc::new(pinned))
            .build();
        assert!(matches!(
            config.validator().validate(&[vec![1]], None),
            CertificateVerdict::Reject(_)
        ));
    }

    #[test]
    fn test_private_key_fits_auth() {
        let key = PrivateKey::EcdsaP256(p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng));
        assert!(key.fits(AuthAlg::Ecdsa));
        assert!(!key.fits(AuthAlg::Rsa));
        assert!(key.as_rsa().is_none());
    }
}
