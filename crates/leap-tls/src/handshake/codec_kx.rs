//! Key-exchange and authentication messages: ServerKeyExchange,
//! CertificateRequest, ClientKeyExchange, CertificateVerify.
//!
//! Their layouts depend on the negotiated key exchange and version, which
//! callers pass in explicitly.

use super::codec::{put_vec16, put_vec8, wrap_handshake, Reader};
use super::HandshakeType;
use crate::crypt::{NamedGroup, SignatureScheme};
use crate::suites::KeyExchangeKind;
use crate::{TlsError, TlsVersion};

/// `ECCurveType.named_curve` (RFC 8422).
const CURVE_TYPE_NAMED: u8 = 3;

fn has_signature_scheme(version: TlsVersion) -> bool {
    version.rank() >= TlsVersion::Tls12.rank()
}

// ---------------------------------------------------------------------------
// DigitallySigned
// ---------------------------------------------------------------------------

/// A signature, with its algorithm prefix on TLS 1.2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitallySigned {
    pub scheme: Option<SignatureScheme>,
    pub signature: Vec<u8>,
}

impl DigitallySigned {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        if let Some(scheme) = self.scheme {
            buf.extend_from_slice(&scheme.0.to_be_bytes());
        }
        put_vec16(buf, &self.signature);
    }

    fn decode(r: &mut Reader<'_>, version: TlsVersion) -> Result<Self, TlsError> {
        let scheme = if has_signature_scheme(version) {
            Some(SignatureScheme(r.u16()?))
        } else {
            None
        };
        let signature = r.vec16()?.to_vec();
        Ok(Self { scheme, signature })
    }
}

// ---------------------------------------------------------------------------
// ServerKeyExchange
// ---------------------------------------------------------------------------

/// The parameter part of ServerKeyExchange (the bytes covered by the
/// signature, together with both randoms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerKeyExchangeParams {
    Dh {
        p: Vec<u8>,
        g: Vec<u8>,
        public: Vec<u8>,
    },
    Ecdh {
        group: NamedGroup,
        public: Vec<u8>,
    },
    PskHint {
        hint: Vec<u8>,
    },
    DhePsk {
        hint: Vec<u8>,
        p: Vec<u8>,
        g: Vec<u8>,
        public: Vec<u8>,
    },
    EcdhePsk {
        hint: Vec<u8>,
        group: NamedGroup,
        public: Vec<u8>,
    },
}

fn put_dh(buf: &mut Vec<u8>, p: &[u8], g: &[u8], public: &[u8]) {
    put_vec16(buf, p);
    put_vec16(buf, g);
    put_vec16(buf, public);
}

fn put_ecdh(buf: &mut Vec<u8>, group: NamedGroup, public: &[u8]) {
    buf.push(CURVE_TYPE_NAMED);
    buf.extend_from_slice(&group.0.to_be_bytes());
    put_point(buf, public);
}

/// EC points take an 8-bit length. Hybrid KEM shares never fit one and take a
/// 16-bit length instead.
fn put_point(buf: &mut Vec<u8>, public: &[u8]) {
    if public.len() > u8::MAX as usize {
        put_vec16(buf, public);
    } else {
        put_vec8(buf, public);
    }
}

fn read_point<'a>(r: &mut Reader<'a>, group: Option<NamedGroup>) -> Result<&'a [u8], TlsError> {
    if group.is_some_and(NamedGroup::is_kem) {
        r.vec16()
    } else {
        r.vec8()
    }
}

fn read_dh(r: &mut Reader<'_>) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), TlsError> {
    let p = r.vec16()?.to_vec();
    let g = r.vec16()?.to_vec();
    let public = r.vec16()?.to_vec();
    if p.is_empty() || g.is_empty() || public.is_empty() {
        return Err(TlsError::DecodeError("empty DH parameter".into()));
    }
    Ok((p, g, public))
}

fn read_ecdh(r: &mut Reader<'_>) -> Result<(NamedGroup, Vec<u8>), TlsError> {
    let curve_type = r.u8()?;
    if curve_type != CURVE_TYPE_NAMED {
        return Err(TlsError::IllegalParameter(format!(
            "curve type {curve_type}"
        )));
    }
    let group = NamedGroup(r.u16()?);
    let public = read_point(r, Some(group))?.to_vec();
    if public.is_empty() {
        return Err(TlsError::DecodeError("empty EC point".into()));
    }
    Ok((group, public))
}

impl ServerKeyExchangeParams {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            ServerKeyExchangeParams::Dh { p, g, public } => put_dh(&mut buf, p, g, public),
            ServerKeyExchangeParams::Ecdh { group, public } => put_ecdh(&mut buf, *group, public),
            ServerKeyExchangeParams::PskHint { hint } => put_vec16(&mut buf, hint),
            ServerKeyExchangeParams::DhePsk { hint, p, g, public } => {
                put_vec16(&mut buf, hint);
                put_dh(&mut buf, p, g, public);
            }
            ServerKeyExchangeParams::EcdhePsk {
                hint,
                group,
                public,
            } => {
                put_vec16(&mut buf, hint);
                put_ecdh(&mut buf, *group, public);
            }
        }
        buf
    }

    fn decode(r: &mut Reader<'_>, kx: KeyExchangeKind) -> Result<Self, TlsError> {
        Ok(match kx {
            KeyExchangeKind::Dhe | KeyExchangeKind::DhAnon => {
                let (p, g, public) = read_dh(r)?;
                ServerKeyExchangeParams::Dh { p, g, public }
            }
            KeyExchangeKind::Ecdhe | KeyExchangeKind::EcdhAnon => {
                let (group, public) = read_ecdh(r)?;
                ServerKeyExchangeParams::Ecdh { group, public }
            }
            KeyExchangeKind::Psk | KeyExchangeKind::RsaPsk => ServerKeyExchangeParams::PskHint {
                hint: r.vec16()?.to_vec(),
            },
            KeyExchangeKind::DhePsk => {
                let hint = r.vec16()?.to_vec();
                let (p, g, public) = read_dh(r)?;
                ServerKeyExchangeParams::DhePsk { hint, p, g, public }
            }
            KeyExchangeKind::EcdhePsk => {
                let hint = r.vec16()?.to_vec();
                let (group, public) = read_ecdh(r)?;
                ServerKeyExchangeParams::EcdhePsk {
                    hint,
                    group,
                    public,
                }
            }
            other => {
                return Err(TlsError::UnexpectedMessage(format!(
                    "ServerKeyExchange not used with {other:?}"
                )))
            }
        })
    }
}

/// Whether ServerKeyExchange carries a signature for this key exchange.
pub fn is_signed_key_exchange(kx: KeyExchangeKind) -> bool {
    matches!(kx, KeyExchangeKind::Dhe | KeyExchangeKind::Ecdhe)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerKeyExchange {
    pub params: ServerKeyExchangeParams,
    pub signature: Option<DigitallySigned>,
}

pub fn encode_server_key_exchange(ske: &ServerKeyExchange) -> Vec<u8> {
    let mut body = ske.params.encode();
    if let Some(sig) = &ske.signature {
        sig.encode_into(&mut body);
    }
    wrap_handshake(HandshakeType::ServerKeyExchange, &body)
}

pub fn decode_server_key_exchange(
    body: &[u8],
    kx: KeyExchangeKind,
    version: TlsVersion,
) -> Result<ServerKeyExchange, TlsError> {
    let mut r = Reader::new(body);
    let params = ServerKeyExchangeParams::decode(&mut r, kx)?;
    let signature = if is_signed_key_exchange(kx) {
        Some(DigitallySigned::decode(&mut r, version)?)
    } else {
        None
    };
    r.expect_end()?;
    Ok(ServerKeyExchange { params, signature })
}

/// `client_random || server_random || params`, the signed content.
pub fn build_ske_signed_data(
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    params: &[u8],
) -> Vec<u8> {
    [client_random.as_slice(), server_random.as_slice(), params].concat()
}

// ---------------------------------------------------------------------------
// CertificateRequest
// ---------------------------------------------------------------------------

/// ClientCertificateType codes.
pub const CERT_TYPE_RSA_SIGN: u8 = 1;
pub const CERT_TYPE_ECDSA_SIGN: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    pub certificate_types: Vec<u8>,
    /// Carried on TLS 1.2 only.
    pub signature_algorithms: Vec<SignatureScheme>,
    pub authorities: Vec<Vec<u8>>,
}

pub fn encode_certificate_request(cr: &CertificateRequest, version: TlsVersion) -> Vec<u8> {
    let mut body = Vec::new();
    put_vec8(&mut body, &cr.certificate_types);
    if has_signature_scheme(version) {
        let list: Vec<u8> = cr
            .signature_algorithms
            .iter()
            .flat_map(|s| s.0.to_be_bytes())
            .collect();
        put_vec16(&mut body, &list);
    }
    let mut names = Vec::new();
    for dn in &cr.authorities {
        put_vec16(&mut names, dn);
    }
    put_vec16(&mut body, &names);
    wrap_handshake(HandshakeType::CertificateRequest, &body)
}

pub fn decode_certificate_request(
    body: &[u8],
    version: TlsVersion,
) -> Result<CertificateRequest, TlsError> {
    let mut r = Reader::new(body);
    let certificate_types = r.vec8()?.to_vec();
    if certificate_types.is_empty() {
        return Err(TlsError::DecodeError("no certificate types".into()));
    }
    let mut signature_algorithms = Vec::new();
    if has_signature_scheme(version) {
        let mut list = Reader::new(r.vec16()?);
        while !list.is_empty() {
            signature_algorithms.push(SignatureScheme(list.u16()?));
        }
    }
    let mut names = Reader::new(r.vec16()?);
    r.expect_end()?;
    let mut authorities = Vec::new();
    while !names.is_empty() {
        authorities.push(names.vec16()?.to_vec());
    }
    Ok(CertificateRequest {
        certificate_types,
        signature_algorithms,
        authorities,
    })
}

// ---------------------------------------------------------------------------
// ClientKeyExchange
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientKeyExchange {
    /// RSA-encrypted pre-master secret. SSL 3.0 omits the length prefix.
    Rsa { encrypted_pms: Vec<u8> },
    Dh { public: Vec<u8> },
    Ecdh { public: Vec<u8> },
    Psk { identity: Vec<u8> },
    DhePsk { identity: Vec<u8>, public: Vec<u8> },
    EcdhePsk { identity: Vec<u8>, public: Vec<u8> },
    RsaPsk { identity: Vec<u8>, encrypted_pms: Vec<u8> },
    /// Suites without key exchange.
    Empty,
}

pub fn encode_client_key_exchange(cke: &ClientKeyExchange, version: TlsVersion) -> Vec<u8> {
    let mut body = Vec::new();
    match cke {
        ClientKeyExchange::Rsa { encrypted_pms } => {
            if version == TlsVersion::Ssl30 {
                body.extend_from_slice(encrypted_pms);
            } else {
                put_vec16(&mut body, encrypted_pms);
            }
        }
        ClientKeyExchange::Dh { public } => put_vec16(&mut body, public),
        ClientKeyExchange::Ecdh { public } => put_point(&mut body, public),
        ClientKeyExchange::Psk { identity } => put_vec16(&mut body, identity),
        ClientKeyExchange::DhePsk { identity, public } => {
            put_vec16(&mut body, identity);
            put_vec16(&mut body, public);
        }
        ClientKeyExchange::EcdhePsk { identity, public } => {
            put_vec16(&mut body, identity);
            put_point(&mut body, public);
        }
        ClientKeyExchange::RsaPsk {
            identity,
            encrypted_pms,
        } => {
            put_vec16(&mut body, identity);
            put_vec16(&mut body, encrypted_pms);
        }
        ClientKeyExchange::Empty => {}
    }
    wrap_handshake(HandshakeType::ClientKeyExchange, &body)
}

fn non_empty(data: &[u8], what: &str) -> Result<Vec<u8>, TlsError> {
    if data.is_empty() {
        return Err(TlsError::DecodeError(format!("empty {what}")));
    }
    Ok(data.to_vec())
}

/// `group` is the ephemeral group the server offered, which decides the
/// width of an (EC)DHE share's length prefix.
pub fn decode_client_key_exchange(
    body: &[u8],
    kx: KeyExchangeKind,
    version: TlsVersion,
    group: Option<NamedGroup>,
) -> Result<ClientKeyExchange, TlsError> {
    let mut r = Reader::new(body);
    let cke = match kx {
        KeyExchangeKind::Rsa | KeyExchangeKind::RsaExport => {
            let encrypted = if version == TlsVersion::Ssl30 {
                r.rest()
            } else {
                r.vec16()?
            };
            ClientKeyExchange::Rsa {
                encrypted_pms: non_empty(encrypted, "encrypted pre-master secret")?,
            }
        }
        KeyExchangeKind::Dhe | KeyExchangeKind::DhAnon | KeyExchangeKind::DhStatic => {
            ClientKeyExchange::Dh {
                public: non_empty(r.vec16()?, "DH public value")?,
            }
        }
        KeyExchangeKind::Ecdhe | KeyExchangeKind::EcdhAnon | KeyExchangeKind::EcdhStatic => {
            ClientKeyExchange::Ecdh {
                public: non_empty(read_point(&mut r, group)?, "EC point")?,
            }
        }
        KeyExchangeKind::Psk => ClientKeyExchange::Psk {
            identity: r.vec16()?.to_vec(),
        },
        KeyExchangeKind::DhePsk => ClientKeyExchange::DhePsk {
            identity: r.vec16()?.to_vec(),
            public: non_empty(r.vec16()?, "DH public value")?,
        },
        KeyExchangeKind::EcdhePsk => ClientKeyExchange::EcdhePsk {
            identity: r.vec16()?.to_vec(),
            public: non_empty(read_point(&mut r, group)?, "EC point")?,
        },
        KeyExchangeKind::RsaPsk => ClientKeyExchange::RsaPsk {
            identity: r.vec16()?.to_vec(),
            encrypted_pms: non_empty(r.vec16()?, "encrypted pre-master secret")?,
        },
        KeyExchangeKind::Null => ClientKeyExchange::Empty,
        KeyExchangeKind::Tls13 => {
            return Err(TlsError::UnexpectedMessage(
                "ClientKeyExchange under TLS 1.3 suite".into(),
            ))
        }
    };
    r.expect_end()?;
    Ok(cke)
}

// ---------------------------------------------------------------------------
// CertificateVerify
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateVerify {
    pub signature: DigitallySigned,
}

pub fn encode_certificate_verify(cv: &CertificateVerify) -> Vec<u8> {
    let mut body = Vec::new();
    cv.signature.encode_into(&mut body);
    wrap_handshake(HandshakeType::CertificateVerify, &body)
}

pub fn decode_certificate_verify(
    body: &[u8],
    version: TlsVersion,
) -> Result<CertificateVerify, TlsError> {
    let mut r = Reader::new(body);
    let signature = DigitallySigned::decode(&mut r, version)?;
    r.expect_end()?;
    Ok(CertificateVerify { signature })
}
