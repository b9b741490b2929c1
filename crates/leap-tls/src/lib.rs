#![forbid(unsafe_code)]
#![doc = "From-scratch TLS protocol engine: suite negotiation, handshake state machine, key schedule and record protection."]

#[macro_use]
mod macros;

pub mod alert;
pub mod cert;
pub mod config;
pub mod connection;
#[cfg(feature = "async")]
pub mod connection_async;
pub mod crypt;
pub mod extensions;
pub mod handshake;
pub mod message;
pub mod record;
pub mod suites;
pub mod transport;

use std::cmp::Ordering;

pub use leap_types::{CryptoError, TlsError};

/// Protocol version, as carried on the wire.
///
/// Stream versions and datagram versions share one enum; comparisons are only
/// defined inside the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlsVersion {
    Ssl30,
    Tls10,
    Tls11,
    Tls12,
    Tls13,
    Dtls10,
    Dtls12,
    Dtls13,
}

impl TlsVersion {
    pub const ALL: [TlsVersion; 8] = [
        TlsVersion::Ssl30,
        TlsVersion::Tls10,
        TlsVersion::Tls11,
        TlsVersion::Tls12,
        TlsVersion::Tls13,
        TlsVersion::Dtls10,
        TlsVersion::Dtls12,
        TlsVersion::Dtls13,
    ];

    /// Two-byte wire identifier.
    pub fn wire(self) -> u16 {
        match self {
            TlsVersion::Ssl30 => 0x0300,
            TlsVersion::Tls10 => 0x0301,
            TlsVersion::Tls11 => 0x0302,
            TlsVersion::Tls12 => 0x0303,
            TlsVersion::Tls13 => 0x0304,
            TlsVersion::Dtls10 => 0xFEFF,
            TlsVersion::Dtls12 => 0xFEFD,
            TlsVersion::Dtls13 => 0xFEFC,
        }
    }

    pub fn from_wire(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.wire() == value)
    }

    pub fn is_dtls(self) -> bool {
        matches!(
            self,
            TlsVersion::Dtls10 | TlsVersion::Dtls12 | TlsVersion::Dtls13
        )
    }

    /// Position on the common stream-TLS scale. DTLS 1.0 tracks TLS 1.1,
    /// DTLS 1.2 tracks TLS 1.2 and DTLS 1.3 tracks TLS 1.3.
    pub(crate) fn rank(self) -> u8 {
        match self {
            TlsVersion::Ssl30 => 0,
            TlsVersion::Tls10 => 1,
            TlsVersion::Tls11 | TlsVersion::Dtls10 => 2,
            TlsVersion::Tls12 | TlsVersion::Dtls12 => 3,
            TlsVersion::Tls13 | TlsVersion::Dtls13 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TlsVersion::Ssl30 => "SSLv3",
            TlsVersion::Tls10 => "TLSv1.0",
            TlsVersion::Tls11 => "TLSv1.1",
            TlsVersion::Tls12 => "TLSv1.2",
            TlsVersion::Tls13 => "TLSv1.3",
            TlsVersion::Dtls10 => "DTLSv1.0",
            TlsVersion::Dtls12 => "DTLSv1.2",
            TlsVersion::Dtls13 => "DTLSv1.3",
        }
    }
}

impl PartialOrd for TlsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_dtls() != other.is_dtls() {
            return None;
        }
        Some(self.rank().cmp(&other.rank()))
    }
}

impl std::fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Cipher suite wire identifier. Named constants are generated alongside the
/// registry in [`suites`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherSuite(pub u16);

impl CipherSuite {
    /// Signalling value for secure renegotiation (RFC 5746).
    pub const TLS_EMPTY_RENEGOTIATION_INFO_SCSV: Self = Self(0x00FF);
    /// Signalling value for version fallback (RFC 7507).
    pub const TLS_FALLBACK_SCSV: Self = Self(0x5600);

    pub fn name(self) -> Option<&'static str> {
        suites::lookup(self).map(|info| info.name)
    }
}

/// The role of a TLS endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsRole {
    Client,
    Server,
}

impl TlsRole {
    pub fn peer(self) -> Self {
        match self {
            TlsRole::Client => TlsRole::Server,
            TlsRole::Server => TlsRole::Client,
        }
    }
}

/// A synchronous TLS connection.
pub trait TlsConnection {
    /// Drive the handshake to completion.
    fn handshake(&mut self) -> Result<(), TlsError>;
    /// Read decrypted application data into `buf`. Returns 0 after the peer's
    /// close_notify once buffered plaintext is drained.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TlsError>;
    /// Encrypt and send `buf`, fragmenting to the record size limit.
    fn write(&mut self, buf: &[u8]) -> Result<usize, TlsError>;
    /// Whether application data may flow.
    fn is_handshake_complete(&self) -> bool;
    /// Send close_notify (once) and close the transport.
    fn close(&mut self) -> Result<(), TlsError>;
    /// Negotiated protocol version.
    fn version(&self) -> Option<TlsVersion>;
    /// Negotiated cipher suite.
    fn cipher_suite(&self) -> Option<CipherSuite>;
}

/// Async counterpart of [`TlsConnection`].
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncTlsConnection {
    async fn handshake(&mut self) -> Result<(), TlsError>;
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TlsError>;
    async fn write(&mut self, buf: &[u8]) -> Result<usize, TlsError>;
    fn is_handshake_complete(&self) -> bool;
    async fn close(&mut self) -> Result<(), TlsError>;
    fn version(&self) -> Option<TlsVersion>;
    fn cipher_suite(&self) -> Option<CipherSuite>;
}
