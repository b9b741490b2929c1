//! Integration tests for leap-tls.
//! End-to-end handshakes between the client and server connections over
//! real TCP sockets and tokio duplex pipes.

#[cfg(test)]
mod tests {
    use leap_tls::cert::{PeerPublicKey, PinnedCertificate};
    use leap_tls::config::{PrivateKey, TlsConfig};
    use leap_tls::connection::{TlsClientConnection, TlsServerConnection};
    use leap_tls::crypt::NamedGroup;
    use leap_tls::handshake::key_exchange::DhParams;
    use leap_tls::handshake::NegotiatedParams;
    use leap_tls::{CipherSuite, TlsConnection, TlsVersion};
    use leap_types::TlsError;
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, OnceLock};
    use std::thread;
    use std::time::Duration;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn rsa_key() -> rsa::RsaPrivateKey {
        static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, 1024).unwrap())
            .clone()
    }

    fn rsa_spki() -> Vec<u8> {
        use rsa::pkcs8::EncodePublicKey;
        rsa_key()
            .to_public_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec()
    }

    fn p256_identity() -> (Vec<u8>, PrivateKey) {
        use p256::pkcs8::EncodePublicKey;
        let sk = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
        let spki = sk
            .verifying_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        (spki, PrivateKey::EcdsaP256(sk))
    }

    /// 2^521 - 1 with generator 3; small enough to keep debug builds quick.
    fn dh_params() -> DhParams {
        let mut p = vec![0xFFu8; 66];
        p[0] = 0x01;
        DhParams::new(p, vec![3]).unwrap()
    }

    fn rsa_server(suites: &[CipherSuite]) -> leap_tls::config::TlsConfigBuilder {
        TlsConfig::builder()
            .min_version(TlsVersion::Ssl30)
            .cipher_suites(suites)
            .certificate_chain(vec![rsa_spki()])
            .private_key(PrivateKey::Rsa(rsa_key()))
    }

    fn timeouts(stream: &TcpStream) {
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .unwrap();
        stream
            .set_write_timeout(Some(Duration::from_secs(10)))
            .unwrap();
    }

    /// Handshake over loopback TCP, exchange one message each way, and return
    /// both sides' negotiated parameters.
    fn tcp_exchange(
        client_config: TlsConfig,
        server_config: TlsConfig,
    ) -> (NegotiatedParams, NegotiatedParams) {
        init_tracing();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server_handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            timeouts(&stream);
            let mut conn = TlsServerConnection::new(stream, server_config);
            conn.handshake().unwrap();

            let mut buf = [0u8; 256];
            let n = conn.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"Hello from client!");

            conn.write(b"Hello from server!").unwrap();
            let negotiated = conn.negotiated().cloned().unwrap();
            conn.close().unwrap();
            negotiated
        });

        let stream = TcpStream::connect_timeout(&addr, Duration::from_secs(5)).unwrap();
        timeouts(&stream);
        let mut conn = TlsClientConnection::new(stream, client_config);
        conn.handshake().unwrap();
        assert!(conn.is_handshake_complete());

        conn.write(b"Hello from client!").unwrap();
        let mut buf = [0u8; 256];
        let n = conn.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"Hello from server!");
        assert_eq!(conn.read(&mut buf).unwrap(), 0);

        let server_side = server_handle.join().unwrap();
        let client_side = conn.negotiated().cloned().unwrap();
        let _ = conn.close();

        assert_eq!(client_side.version, server_side.version);
        assert_eq!(client_side.suite, server_side.suite);
        assert_eq!(client_side.client_verify_data, server_side.client_verify_data);
        assert_eq!(client_side.server_verify_data, server_side.server_verify_data);
        (client_side, server_side)
    }

    // -------------------------------------------------------
    // 1. TLS 1.2 RSA key transport with AES-128-CBC-SHA256
    // -------------------------------------------------------
    #[test]
    fn test_tcp_tls12_rsa_aes128_cbc_sha256() {
        let suites = [CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256];
        let client = TlsConfig::builder()
            .cipher_suites(&suites)
            .verify_peer(false)
            .build();
        let (c, _) = tcp_exchange(client, rsa_server(&suites).build());
        assert_eq!(c.version, TlsVersion::Tls12);
        assert_eq!(c.suite, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256);
        assert_eq!(c.client_verify_data.len(), 12);
        assert!(c.extended_master_secret);
    }

    // -------------------------------------------------------
    // 2. Every pre-1.3 stream version with AES-128-CBC-SHA
    // -------------------------------------------------------
    #[test]
    fn test_tcp_each_version_rsa_aes128_cbc_sha() {
        let suites = [CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA];
        for (version, verify_len) in [
            (TlsVersion::Ssl30, 36),
            (TlsVersion::Tls10, 12),
            (TlsVersion::Tls11, 12),
            (TlsVersion::Tls12, 12),
        ] {
            let client = TlsConfig::builder()
                .min_version(version)
                .max_version(version)
                .cipher_suites(&suites)
                .verify_peer(false)
                .build();
            let (c, _) = tcp_exchange(client, rsa_server(&suites).build());
            assert_eq!(c.version, version);
            assert_eq!(c.client_verify_data.len(), verify_len, "{version}");
            // SSL 3.0 hellos carry no extensions.
            assert_eq!(c.extended_master_secret, version != TlsVersion::Ssl30);
        }
    }

    // -------------------------------------------------------
    // 3. Signed ECDHE key exchange on TLS 1.0 and 1.1 (MD5||SHA-1 digest)
    // -------------------------------------------------------
    #[test]
    fn test_tcp_legacy_ecdhe_rsa_signed() {
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA];
        for version in [TlsVersion::Tls10, TlsVersion::Tls11] {
            let client = TlsConfig::builder()
                .max_version(version)
                .cipher_suites(&suites)
                .build();
            let (c, _) = tcp_exchange(client, rsa_server(&suites).build());
            assert_eq!(c.version, version);
            assert_eq!(c.group, Some(NamedGroup::X25519));
        }
    }

    // -------------------------------------------------------
    // 4. ECDHE-ECDSA with a pinned raw public key
    // -------------------------------------------------------
    #[test]
    fn test_tcp_ecdhe_ecdsa_pinned_key() {
        let suites = [CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256];
        let (spki, key) = p256_identity();
        let pinned = PinnedCertificate {
            key: PeerPublicKey::from_spki_der(&spki).unwrap(),
            leaf: spki.clone(),
        };
        let client = TlsConfig::builder()
            .cipher_suites(&suites)
            .supported_groups(&[NamedGroup::SECP256R1])
            .certificate_validator(Arc::new(pinned))
            .build();
        let server = TlsConfig::builder()
            .cipher_suites(&suites)
            .supported_groups(&[NamedGroup::SECP256R1])
            .certificate_chain(vec![spki.clone()])
            .private_key(key)
            .build();
        let (c, _) = tcp_exchange(client, server);
        assert_eq!(c.group, Some(NamedGroup::SECP256R1));
        assert_eq!(c.peer_certificates, vec![spki]);
    }

    // -------------------------------------------------------
    // 5. Pinned key mismatch is bad_certificate
    // -------------------------------------------------------
    #[test]
    fn test_tcp_pinned_key_mismatch() {
        init_tracing();
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256];
        let (other_spki, _) = p256_identity();
        let pinned = PinnedCertificate {
            key: PeerPublicKey::from_spki_der(&other_spki).unwrap(),
            leaf: other_spki,
        };
        let client_config = TlsConfig::builder()
            .cipher_suites(&suites)
            .certificate_validator(Arc::new(pinned))
            .build();
        let server_config = rsa_server(&suites).build();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server_handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            timeouts(&stream);
            let mut conn = TlsServerConnection::new(stream, server_config);
            conn.handshake().unwrap_err()
        });

        let stream = TcpStream::connect(addr).unwrap();
        timeouts(&stream);
        let mut conn = TlsClientConnection::new(stream, client_config);
        let err = conn.handshake().unwrap_err();
        assert!(matches!(err, TlsError::CertificateRejected(_)));
        drop(conn);

        // bad_certificate (42)
        match server_handle.join().unwrap() {
            TlsError::AlertReceived { level, description } => {
                assert_eq!((level, description), (2, 42));
            }
            other => panic!("unexpected server error {other:?}"),
        }
    }

    // -------------------------------------------------------
    // 6. Finite-field DHE with ChaCha20-Poly1305
    // -------------------------------------------------------
    #[test]
    fn test_tcp_dhe_rsa_chacha20_poly1305() {
        let suites = [CipherSuite::TLS_DHE_RSA_WITH_CHACHA20_POLY1305_SHA256];
        let client = TlsConfig::builder().cipher_suites(&suites).build();
        let server = rsa_server(&suites).dh_params(dh_params()).build();
        let (c, _) = tcp_exchange(client, server);
        assert_eq!(c.suite, CipherSuite::TLS_DHE_RSA_WITH_CHACHA20_POLY1305_SHA256);
        assert_eq!(c.group, None);
    }

    // -------------------------------------------------------
    // 7. X448 and the hybrid KEM groups
    // -------------------------------------------------------
    #[test]
    fn test_tcp_ecdhe_groups() {
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256];
        for group in [
            NamedGroup::X448,
            NamedGroup::X25519_MLKEM768,
            NamedGroup::SECP256R1_MLKEM768,
            NamedGroup::X25519_KYBER768_DRAFT00,
        ] {
            let client = TlsConfig::builder()
                .cipher_suites(&suites)
                .supported_groups(&[group])
                .build();
            let server = rsa_server(&suites)
                .supported_groups(&[NamedGroup::X25519, group])
                .build();
            let (c, s) = tcp_exchange(client, server);
            assert_eq!(c.group, Some(group));
            assert_eq!(s.group, Some(group));
        }
    }

    // -------------------------------------------------------
    // 8. Plain PSK with an identity hint
    // -------------------------------------------------------
    #[test]
    fn test_tcp_psk_aes128_cbc_sha() {
        let suites = [CipherSuite::TLS_PSK_WITH_AES_128_CBC_SHA];
        let psk = b"0123456789abcdef".to_vec();
        let client = TlsConfig::builder()
            .cipher_suites(&suites)
            .psk(psk.clone())
            .psk_identity(b"device-7")
            .build();
        let server = TlsConfig::builder()
            .cipher_suites(&suites)
            .psk(psk)
            .psk_identity(b"device-7")
            .psk_identity_hint(b"leap")
            .build();
        let (c, _) = tcp_exchange(client, server);
        assert!(c.peer_certificates.is_empty());
    }

    // -------------------------------------------------------
    // 9. Mutual authentication with an ECDSA client key
    // -------------------------------------------------------
    #[test]
    fn test_tcp_mutual_auth() {
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256];
        let (client_spki, client_key) = p256_identity();
        let client = TlsConfig::builder()
            .cipher_suites(&suites)
            .certificate_chain(vec![client_spki.clone()])
            .private_key(client_key)
            .build();
        let server = rsa_server(&suites).require_client_cert(true).build();
        let (_, s) = tcp_exchange(client, server);
        assert_eq!(s.peer_certificates, vec![client_spki]);
    }

    // -------------------------------------------------------
    // 10. No version overlap is protocol_version
    // -------------------------------------------------------
    #[test]
    fn test_tcp_version_mismatch() {
        init_tracing();
        let suites = [CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA];
        let client_config = TlsConfig::builder()
            .max_version(TlsVersion::Tls10)
            .cipher_suites(&suites)
            .verify_peer(false)
            .build();
        let server_config = rsa_server(&suites).min_version(TlsVersion::Tls12).build();

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server_handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            timeouts(&stream);
            let mut conn = TlsServerConnection::new(stream, server_config);
            conn.handshake().unwrap_err()
        });

        let stream = TcpStream::connect(addr).unwrap();
        timeouts(&stream);
        let mut conn = TlsClientConnection::new(stream, client_config);
        let err = conn.handshake().unwrap_err();
        assert!(matches!(
            err,
            TlsError::AlertReceived { level: 2, description: 70 }
        ));
        assert!(matches!(
            server_handle.join().unwrap(),
            TlsError::UnsupportedVersion
        ));
    }

    // -------------------------------------------------------
    // 11. GREASE offered by the client is ignored by the server
    // -------------------------------------------------------
    #[test]
    fn test_tcp_grease_client() {
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256];
        let client = TlsConfig::builder()
            .cipher_suites(&suites)
            .grease(true)
            .build();
        let (c, _) = tcp_exchange(client, rsa_server(&suites).build());
        assert_eq!(c.suite, suites[0]);
    }

    // -------------------------------------------------------
    // 12. Async connections over a tokio duplex pipe
    // -------------------------------------------------------
    #[tokio::test]
    async fn test_async_duplex_large_transfer() {
        use leap_tls::connection_async::{AsyncTlsClientConnection, AsyncTlsServerConnection};
        use leap_tls::AsyncTlsConnection;

        init_tracing();
        let suites = [CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256];
        let client_config = TlsConfig::builder()
            .cipher_suites(&suites)
            .alpn(&[b"h2".as_slice()])
            .build();
        let mut server_config = rsa_server(&suites).build();
        server_config.alpn_protocols = vec![b"h2".to_vec()];

        let (c, s) = tokio::io::duplex(1024);
        let mut client = AsyncTlsClientConnection::new(c, client_config);
        let mut server = AsyncTlsServerConnection::new(s, server_config);

        let payload: Vec<u8> = (0..40_000u32).map(|i| (i % 251) as u8).collect();
        let client_side = async {
            client.write(&payload).await.unwrap();
            client.close().await.unwrap();
        };
        let server_side = async {
            let mut received = Vec::new();
            let mut buf = vec![0u8; 16384];
            loop {
                let n = server.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
            }
            received
        };
        let ((), received) = tokio::join!(client_side, server_side);
        assert_eq!(received, payload);
        assert_eq!(client.alpn_protocol(), Some(b"h2".as_slice()));
        assert_eq!(server.version(), Some(TlsVersion::Tls12));
    }
}
