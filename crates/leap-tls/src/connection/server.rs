use super::{ConnectionCore, ConnectionState};
use crate::config::TlsConfig;
use crate::extensions::DecoderChain;
use crate::handshake::server::ServerHandshake;
use crate::handshake::NegotiatedParams;
use crate::record::{ContentType, RECORD_HEADER_LEN};
use crate::transport::Transport;
use crate::{CipherSuite, TlsConnection, TlsError, TlsVersion};

/// A blocking TLS server connection.
pub struct TlsServerConnection<S: Transport> {
    pub(super) stream: S,
    pub(super) core: ConnectionCore<ServerHandshake>,
}

impl<S: Transport> TlsServerConnection<S> {
    /// Create a server connection over `stream`. Nothing is read until the
    /// first `handshake`, `read` or `write`.
    pub fn new(stream: S, config: TlsConfig) -> Self {
        let limit = config.max_fragment_size;
        Self {
            stream,
            core: ConnectionCore::new(ServerHandshake::new(config), limit),
        }
    }

    /// Like [`new`](Self::new), with a custom extension decoder chain.
    pub fn with_decoders(stream: S, config: TlsConfig, decoders: DecoderChain) -> Self {
        let limit = config.max_fragment_size;
        Self {
            stream,
            core: ConnectionCore::new(ServerHandshake::new(config).with_decoders(decoders), limit),
        }
    }

    /// Negotiated parameters, once the handshake is complete.
    pub fn negotiated(&self) -> Option<&NegotiatedParams> {
        self.core.negotiated()
    }

    /// Client certificate chain, leaf first; empty without client authentication.
    pub fn peer_certificates(&self) -> &[Vec<u8>] {
        self.core
            .negotiated()
            .map_or(&[], |n| n.peer_certificates.as_slice())
    }

    pub fn alpn_protocol(&self) -> Option<&[u8]> {
        self.core.negotiated().and_then(|n| n.alpn.as_deref())
    }

    /// Host name the client sent through SNI.
    pub fn server_name(&self) -> Option<&str> {
        self.core.hs.server_name()
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    fn fill_buf(&mut self, min_bytes: usize) -> Result<(), TlsError> {
        fill_buf_body!(sync, self, min_bytes)
    }

    fn read_record(&mut self) -> Result<(ContentType, Vec<u8>), TlsError> {
        read_record_body!(sync, self)
    }

    fn flush(&mut self) -> Result<(), TlsError> {
        flush_body!(sync, self)
    }

    fn drive_handshake(&mut self) -> Result<(), TlsError> {
        drive_handshake_body!(sync, self)
    }

    fn abort(&mut self, err: &TlsError) {
        abort_body!(sync, self, err)
    }
}

impl<S: Transport> TlsConnection for TlsServerConnection<S> {
    fn handshake(&mut self) -> Result<(), TlsError> {
        handshake_trait_body!(sync, self)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TlsError> {
        read_trait_body!(sync, self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, TlsError> {
        write_trait_body!(sync, self, buf)
    }

    fn is_handshake_complete(&self) -> bool {
        self.core.state == ConnectionState::Connected
    }

    fn close(&mut self) -> Result<(), TlsError> {
        close_trait_body!(sync, self)
    }

    fn version(&self) -> Option<TlsVersion> {
        self.core.negotiated().map(|n| n.version)
    }

    fn cipher_suite(&self) -> Option<CipherSuite> {
        self.core.negotiated().map(|n| n.suite)
    }
}
