//! Asynchronous TLS connections wrapping an [`AsyncTransport`].
//!
//! Same protocol bodies as the blocking connections; only the transport
//! calls suspend.

use crate::config::TlsConfig;
use crate::connection::{ConnectionCore, ConnectionState};
use crate::handshake::client::ClientHandshake;
use crate::handshake::server::ServerHandshake;
use crate::handshake::NegotiatedParams;
use crate::record::{ContentType, RECORD_HEADER_LEN};
use crate::transport::AsyncTransport;
use crate::{AsyncTlsConnection, CipherSuite, TlsError, TlsVersion};

// ===========================================================================
// Async client connection
// ===========================================================================

/// An asynchronous TLS client connection.
pub struct AsyncTlsClientConnection<S: AsyncTransport> {
    stream: S,
    core: ConnectionCore<ClientHandshake>,
}

impl<S: AsyncTransport> AsyncTlsClientConnection<S> {
    pub fn new(stream: S, config: TlsConfig) -> Self {
        let limit = config.max_fragment_size;
        Self {
            stream,
            core: ConnectionCore::new(ClientHandshake::new(config), limit),
        }
    }

    pub fn negotiated(&self) -> Option<&NegotiatedParams> {
        self.core.negotiated()
    }

    pub fn alpn_protocol(&self) -> Option<&[u8]> {
        self.core.negotiated().and_then(|n| n.alpn.as_deref())
    }

    async fn fill_buf(&mut self, min_bytes: usize) -> Result<(), TlsError> {
        fill_buf_body!(is_async, self, min_bytes)
    }

    async fn read_record(&mut self) -> Result<(ContentType, Vec<u8>), TlsError> {
        read_record_body!(is_async, self)
    }

    async fn flush(&mut self) -> Result<(), TlsError> {
        flush_body!(is_async, self)
    }

    async fn drive_handshake(&mut self) -> Result<(), TlsError> {
        drive_handshake_body!(is_async, self)
    }

    async fn abort(&mut self, err: &TlsError) {
        abort_body!(is_async, self, err)
    }
}

impl<S: AsyncTransport> AsyncTlsConnection for AsyncTlsClientConnection<S> {
    async fn handshake(&mut self) -> Result<(), TlsError> {
        handshake_trait_body!(is_async, self)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TlsError> {
        read_trait_body!(is_async, self, buf)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, TlsError> {
        write_trait_body!(is_async, self, buf)
    }

    fn is_handshake_complete(&self) -> bool {
        self.core.state == ConnectionState::Connected
    }

    async fn close(&mut self) -> Result<(), TlsError> {
        close_trait_body!(is_async, self)
    }

    fn version(&self) -> Option<TlsVersion> {
        self.core.negotiated().map(|n| n.version)
    }

    fn cipher_suite(&self) -> Option<CipherSuite> {
        self.core.negotiated().map(|n| n.suite)
    }
}

// ===========================================================================
// Async server connection
// ===========================================================================

/// An asynchronous TLS server connection.
pub struct AsyncTlsServerConnection<S: AsyncTransport> {
    stream: S,
    core: ConnectionCore<ServerHandshake>,
}

impl<S: AsyncTransport> AsyncTlsServerConnection<S> {
    pub fn new(stream: S, config: TlsConfig) -> Self {
        let limit = config.max_fragment_size;
        Self {
            stream,
            core: ConnectionCore::new(ServerHandshake::new(config), limit),
        }
    }

    pub fn negotiated(&self) -> Option<&NegotiatedParams> {
        self.core.negotiated()
    }

    pub fn server_name(&self) -> Option<&str> {
        self.core.hs.server_name()
    }

    async fn fill_buf(&mut self, min_bytes: usize) -> Result<(), TlsError> {
        fill_buf_body!(is_async, self, min_bytes)
    }

    async fn read_record(&mut self) -> Result<(ContentType, Vec<u8>), TlsError> {
        read_record_body!(is_async, self)
    }

    async fn flush(&mut self) -> Result<(), TlsError> {
        flush_body!(is_async, self)
    }

    async fn drive_handshake(&mut self) -> Result<(), TlsError> {
        drive_handshake_body!(is_async, self)
    }

    async fn abort(&mut self, err: &TlsError) {
        abort_body!(is_async, self, err)
    }
}

impl<S: AsyncTransport> AsyncTlsConnection for AsyncTlsServerConnection<S> {
    async fn handshake(&mut self) -> Result<(), TlsError> {
        handshake_trait_body!(is_async, self)
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TlsError> {
        read_trait_body!(is_async, self, buf)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, TlsError> {
        write_trait_body!(is_async, self, buf)
    }

    fn is_handshake_complete(&self) -> bool {
        self.core.state == ConnectionState::Connected
    }

    async fn close(&mut self) -> Result<(), TlsError> {
        close_trait_body!(is_async, self)
    }

    fn version(&self) -> Option<TlsVersion> {
        self.core.negotiated().map(|n| n.version)
    }

    fn cipher_suite(&self) -> Option<CipherSuite> {
        self.core.negotiated().map(|n| n.suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrivateKey;
    use crate::handshake::signing::tests::test_rsa_key;
    use rsa::pkcs8::EncodePublicKey;

    fn configs() -> (TlsConfig, TlsConfig) {
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256];
        let key = test_rsa_key();
        let spki = key
            .to_public_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        let client = TlsConfig::builder().cipher_suites(&suites).build();
        let server = TlsConfig::builder()
            .cipher_suites(&suites)
            .certificate_chain(vec![spki])
            .private_key(PrivateKey::Rsa(key))
            .build();
        (client, server)
    }

    #[tokio::test]
    async fn test_async_handshake_and_echo() {
        let (client_config, server_config) = configs();
        let (c, s) = tokio::io::duplex(4096);
        let mut client = AsyncTlsClientConnection::new(c, client_config);
        let mut server = AsyncTlsServerConnection::new(s, server_config);

        let (cr, sr) = tokio::join!(client.handshake(), server.handshake());
        cr.unwrap();
        sr.unwrap();
        assert!(client.is_handshake_complete());
        assert_eq!(client.version(), Some(TlsVersion::Tls12));
        assert_eq!(
            server.cipher_suite(),
            Some(CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256)
        );

        client.write(b"ping").await.unwrap();
        let mut buf = [0u8; 16];
        let n = server.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"ping");

        server.close().await.unwrap();
        assert_eq!(client.read(&mut buf).await.unwrap(), 0);
        client.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_async_read_drives_handshake() {
        let (client_config, server_config) = configs();
        let (c, s) = tokio::io::duplex(4096);
        let mut client = AsyncTlsClientConnection::new(c, client_config);
        let mut server = AsyncTlsServerConnection::new(s, server_config);

        let client_side = async {
            client.write(b"hello").await.unwrap();
            client.close().await.unwrap();
        };
        let server_side = async {
            let mut buf = [0u8; 16];
            let n = server.read(&mut buf).await.unwrap();
            assert_eq!(&buf[..n], b"hello");
            assert_eq!(server.read(&mut buf).await.unwrap(), 0);
        };
        tokio::join!(client_side, server_side);
    }
}
