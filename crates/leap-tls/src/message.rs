//! Every message the engine exchanges, as one closed enum.
//!
//! Serialization and decoding dispatch through a single `match` each. The
//! handshake kinds are encoded with their 4-byte header; the others are the
//! bare record body for their content type.

use crate::alert::Alert;
use crate::crypt::NamedGroup;
use crate::handshake::codec::{
    decode_certificate, decode_client_hello, decode_finished, decode_server_hello,
    encode_certificate, encode_client_hello, encode_finished, encode_server_hello,
    parse_handshake_header, wrap_handshake, CertificateMsg, ClientHello, Finished, ServerHello,
};
use crate::handshake::codec_kx::{
    decode_certificate_request, decode_certificate_verify, decode_client_key_exchange,
    decode_server_key_exchange, encode_certificate_request, encode_certificate_verify,
    encode_client_key_exchange, encode_server_key_exchange, CertificateRequest, CertificateVerify,
    ClientKeyExchange, ServerKeyExchange,
};
use crate::handshake::HandshakeType;
use crate::record::ContentType;
use crate::suites::KeyExchangeKind;
use crate::{TlsError, TlsVersion};

/// What the decoder needs to know about the negotiation so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecContext {
    pub version: TlsVersion,
    /// Unknown until ServerHello has been processed.
    pub key_exchange: Option<KeyExchangeKind>,
    /// Ephemeral ECDHE group once the server picked one. Hybrid KEM groups
    /// carry wider shares.
    pub group: Option<NamedGroup>,
}

impl CodecContext {
    pub fn new(version: TlsVersion) -> Self {
        Self {
            version,
            key_exchange: None,
            group: None,
        }
    }

    fn require_key_exchange(&self, what: &str) -> Result<KeyExchangeKind, TlsError> {
        self.key_exchange
            .ok_or_else(|| TlsError::UnexpectedMessage(format!("{what} before ServerHello")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeMessage {
    HelloRequest,
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    Certificate(CertificateMsg),
    ServerKeyExchange(ServerKeyExchange),
    CertificateRequest(CertificateRequest),
    ServerHelloDone,
    ClientKeyExchange(ClientKeyExchange),
    CertificateVerify(CertificateVerify),
    Finished(Finished),
    ChangeCipherSpec,
    Alert(Alert),
    ApplicationData(Vec<u8>),
}

impl HandshakeMessage {
    pub fn content_type(&self) -> ContentType {
        match self {
            HandshakeMessage::ChangeCipherSpec => ContentType::ChangeCipherSpec,
            HandshakeMessage::Alert(_) => ContentType::Alert,
            HandshakeMessage::ApplicationData(_) => ContentType::ApplicationData,
            _ => ContentType::Handshake,
        }
    }

    /// Wire id within the handshake protocol, if this is a handshake message.
    pub fn handshake_type(&self) -> Option<HandshakeType> {
        Some(match self {
            HandshakeMessage::HelloRequest => HandshakeType::HelloRequest,
            HandshakeMessage::ClientHello(_) => HandshakeType::ClientHello,
            HandshakeMessage::ServerHello(_) => HandshakeType::ServerHello,
            HandshakeMessage::Certificate(_) => HandshakeType::Certificate,
            HandshakeMessage::ServerKeyExchange(_) => HandshakeType::ServerKeyExchange,
            HandshakeMessage::CertificateRequest(_) => HandshakeType::CertificateRequest,
            HandshakeMessage::ServerHelloDone => HandshakeType::ServerHelloDone,
            HandshakeMessage::ClientKeyExchange(_) => HandshakeType::ClientKeyExchange,
            HandshakeMessage::CertificateVerify(_) => HandshakeType::CertificateVerify,
            HandshakeMessage::Finished(_) => HandshakeType::Finished,
            HandshakeMessage::ChangeCipherSpec
            | HandshakeMessage::Alert(_)
            | HandshakeMessage::ApplicationData(_) => return None,
        })
    }

    pub fn encode(&self, ctx: &CodecContext) -> Vec<u8> {
        match self {
            HandshakeMessage::HelloRequest => wrap_handshake(HandshakeType::HelloRequest, &[]),
            HandshakeMessage::ClientHello(ch) => encode_client_hello(ch),
            HandshakeMessage::ServerHello(sh) => encode_server_hello(sh),
            HandshakeMessage::Certificate(c) => encode_certificate(c),
            HandshakeMessage::ServerKeyExchange(ske) => encode_server_key_exchange(ske),
            HandshakeMessage::CertificateRequest(cr) => encode_certificate_request(cr, ctx.version),
            HandshakeMessage::ServerHelloDone => {
                wrap_handshake(HandshakeType::ServerHelloDone, &[])
            }
            HandshakeMessage::ClientKeyExchange(cke) => {
                encode_client_key_exchange(cke, ctx.version)
            }
            HandshakeMessage::CertificateVerify(cv) => encode_certificate_verify(cv),
            HandshakeMessage::Finished(f) => encode_finished(f),
            HandshakeMessage::ChangeCipherSpec => vec![1],
            HandshakeMessage::Alert(alert) => alert.encode().to_vec(),
            HandshakeMessage::ApplicationData(data) => data.clone(),
        }
    }

    /// Serialized length, header included for handshake kinds.
    pub fn encoded_len(&self, ctx: &CodecContext) -> usize {
        self.encode(ctx).len()
    }

    /// Decode one message of `content_type` that spans all of `data`.
    pub fn decode(
        content_type: ContentType,
        data: &[u8],
        ctx: &CodecContext,
    ) -> Result<Self, TlsError> {
        match content_type {
            ContentType::ChangeCipherSpec => {
                if data != [1u8] {
                    return Err(TlsError::DecodeError("malformed ChangeCipherSpec".into()));
                }
                Ok(HandshakeMessage::ChangeCipherSpec)
            }
            ContentType::Alert => Ok(HandshakeMessage::Alert(Alert::decode(data)?)),
            ContentType::ApplicationData => Ok(HandshakeMessage::ApplicationData(data.to_vec())),
            ContentType::Handshake => {
                let (msg_type, body, used) = parse_handshake_header(data)?;
                if used != data.len() {
                    return Err(TlsError::DecodeError(
                        "trailing data after handshake message".into(),
                    ));
                }
                Self::decode_handshake(msg_type, body, ctx)
            }
        }
    }

    /// Decode a handshake body whose header has already been parsed.
    pub fn decode_handshake(
        msg_type: HandshakeType,
        body: &[u8],
        ctx: &CodecContext,
    ) -> Result<Self, TlsError> {
        let empty = |msg: HandshakeMessage| {
            if body.is_empty() {
                Ok(msg)
            } else {
                Err(TlsError::DecodeError(format!("{msg_type:?} must be empty")))
            }
        };
        match msg_type {
            HandshakeType::HelloRequest => empty(HandshakeMessage::HelloRequest),
            HandshakeType::ClientHello => Ok(HandshakeMessage::ClientHello(decode_client_hello(
                body,
            )?)),
            HandshakeType::ServerHello => Ok(HandshakeMessage::ServerHello(decode_server_hello(
                body,
            )?)),
            HandshakeType::Certificate => Ok(HandshakeMessage::Certificate(decode_certificate(
                body,
            )?)),
            HandshakeType::ServerKeyExchange => {
                let kx = ctx.require_key_exchange("ServerKeyExchange")?;
                Ok(HandshakeMessage::ServerKeyExchange(
                    decode_server_key_exchange(body, kx, ctx.version)?,
                ))
            }
            HandshakeType::CertificateRequest => Ok(HandshakeMessage::CertificateRequest(
                decode_certificate_request(body, ctx.version)?,
            )),
            HandshakeType::ServerHelloDone => empty(HandshakeMessage::ServerHelloDone),
            HandshakeType::ClientKeyExchange => {
                let kx = ctx.require_key_exchange("ClientKeyExchange")?;
                Ok(HandshakeMessage::ClientKeyExchange(
                    decode_client_key_exchange(body, kx, ctx.version, ctx.group)?,
                ))
            }
            HandshakeType::CertificateVerify => Ok(HandshakeMessage::CertificateVerify(
                decode_certificate_verify(body, ctx.version)?,
            )),
            HandshakeType::Finished => Ok(HandshakeMessage::Finished(decode_finished(
                body,
                ctx.version,
            )?)),
            HandshakeType::HelloVerifyRequest | HandshakeType::NewSessionTicket => Err(
                TlsError::UnexpectedMessage(format!("{msg_type:?} is not supported")),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertDescription;
    use crate::crypt::{NamedGroup, SignatureScheme};
    use crate::extensions::{Extension, ExtensionType, ParsedExtension};
    use crate::handshake::codec_kx::{DigitallySigned, ServerKeyExchangeParams};
    use crate::CipherSuite;

    fn roundtrip(msg: HandshakeMessage, ctx: &CodecContext) {
        let bytes = msg.encode(ctx);
        assert_eq!(bytes.len(), msg.encoded_len(ctx));
        let decoded = HandshakeMessage::decode(msg.content_type(), &bytes, ctx).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_roundtrip_every_variant() {
        let ctx = CodecContext {
            version: TlsVersion::Tls12,
            key_exchange: Some(KeyExchangeKind::Ecdhe),
            group: None,
        };
        let alpn_max: Vec<Vec<u8>> = (0..200).map(|_| vec![b'x'; 255]).collect();
        let messages = vec![
            HandshakeMessage::HelloRequest,
            HandshakeMessage::ClientHello(ClientHello {
                legacy_version: 0x0303,
                random: [1; 32],
                session_id: vec![],
                cookie: None,
                cipher_suites: vec![CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256],
                compression_methods: vec![0],
                extensions: vec![
                    ParsedExtension::ServerName("host.example".into()).encode(),
                    ParsedExtension::Alpn(alpn_max).encode(),
                ],
            }),
            HandshakeMessage::ServerHello(ServerHello {
                legacy_version: 0x0303,
                random: [2; 32],
                session_id: vec![5; 32],
                cipher_suite: CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
                compression_method: 0,
                extensions: vec![Extension::new(ExtensionType::EXTENDED_MASTER_SECRET, vec![])],
            }),
            HandshakeMessage::Certificate(CertificateMsg::default()),
            HandshakeMessage::ServerKeyExchange(ServerKeyExchange {
                params: ServerKeyExchangeParams::Ecdh {
                    group: NamedGroup::SECP384R1,
                    public: vec![4; 97],
                },
                signature: Some(DigitallySigned {
                    scheme: Some(SignatureScheme::ECDSA_SECP384R1_SHA384),
                    signature: vec![0x30; 104],
                }),
            }),
            HandshakeMessage::CertificateRequest(CertificateRequest {
                certificate_types: vec![1],
                signature_algorithms: vec![],
                authorities: vec![],
            }),
            HandshakeMessage::ServerHelloDone,
            HandshakeMessage::ClientKeyExchange(ClientKeyExchange::Ecdh {
                public: vec![4; 65],
            }),
            HandshakeMessage::CertificateVerify(CertificateVerify {
                signature: DigitallySigned {
                    scheme: Some(SignatureScheme::RSA_PKCS1_SHA256),
                    signature: vec![0; 256],
                },
            }),
            HandshakeMessage::Finished(Finished {
                verify_data: vec![0xEE; 12],
            }),
            HandshakeMessage::ChangeCipherSpec,
            HandshakeMessage::Alert(Alert::fatal(AlertDescription::HandshakeFailure)),
            HandshakeMessage::ApplicationData(vec![]),
            HandshakeMessage::ApplicationData(b"GET / HTTP/1.1\r\n\r\n".to_vec()),
        ];
        for msg in messages {
            roundtrip(msg, &ctx);
        }
    }

    #[test]
    fn test_kx_messages_need_negotiated_suite() {
        let ctx = CodecContext::new(TlsVersion::Tls12);
        let cke = wrap_handshake(HandshakeType::ClientKeyExchange, &[0, 1, 2]);
        assert!(matches!(
            HandshakeMessage::decode(ContentType::Handshake, &cke, &ctx),
            Err(TlsError::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn test_server_hello_done_must_be_empty() {
        let ctx = CodecContext::new(TlsVersion::Tls12);
        let msg = wrap_handshake(HandshakeType::ServerHelloDone, &[0]);
        assert!(HandshakeMessage::decode(ContentType::Handshake, &msg, &ctx).is_err());
    }

    #[test]
    fn test_change_cipher_spec_body() {
        let ctx = CodecContext::new(TlsVersion::Tls10);
        assert!(HandshakeMessage::decode(ContentType::ChangeCipherSpec, &[2], &ctx).is_err());
        assert!(HandshakeMessage::decode(ContentType::ChangeCipherSpec, &[1, 1], &ctx).is_err());
    }

    #[test]
    fn test_trailing_bytes_after_handshake_message() {
        let ctx = CodecContext::new(TlsVersion::Tls12);
        let mut msg = wrap_handshake(HandshakeType::ServerHelloDone, &[]);
        msg.push(0);
        assert!(matches!(
            HandshakeMessage::decode(ContentType::Handshake, &msg, &ctx),
            Err(TlsError::DecodeError(_))
        ));
    }
}
