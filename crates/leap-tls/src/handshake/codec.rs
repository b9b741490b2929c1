//! Handshake message encoding and decoding.
//!
//! Every read goes through [`Reader`], which never looks past the length it
//! was handed: a length prefix that overruns its container is a
//! `decode_error`, never a panic.

use crate::extensions::{Extension, ExtensionType};
use crate::handshake::HandshakeType;
use crate::{CipherSuite, TlsError, TlsVersion};

/// Largest handshake body accepted (certificate chains are the big ones).
pub const MAX_HANDSHAKE_MESSAGE_LEN: usize = 0x2_0000;

/// Handshake header size: type (1) + length (3).
pub const HANDSHAKE_HEADER_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Bounds-checked reader and length-prefixed writers
// ---------------------------------------------------------------------------

/// Cursor over a byte slice whose every accessor is bounds-checked.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], TlsError> {
        if self.remaining() < n {
            return Err(TlsError::DecodeError(format!(
                "need {n} bytes, {} left",
                self.remaining()
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], TlsError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, TlsError> {
        Ok(self.bytes(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, TlsError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    pub fn u24(&mut self) -> Result<usize, TlsError> {
        let b = self.bytes(3)?;
        Ok(((b[0] as usize) << 16) | ((b[1] as usize) << 8) | b[2] as usize)
    }

    /// `opaque<0..2^8-1>`
    pub fn vec8(&mut self) -> Result<&'a [u8], TlsError> {
        let n = self.u8()? as usize;
        self.bytes(n)
    }

    /// `opaque<0..2^16-1>`
    pub fn vec16(&mut self) -> Result<&'a [u8], TlsError> {
        let n = self.u16()? as usize;
        self.bytes(n)
    }

    /// `opaque<0..2^24-1>`
    pub fn vec24(&mut self) -> Result<&'a [u8], TlsError> {
        let n = self.u24()?;
        self.bytes(n)
    }

    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.pos..];
        self.pos = self.buf.len();
        out
    }

    /// Fail if any bytes are left over.
    pub fn expect_end(&self) -> Result<(), TlsError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TlsError::DecodeError(format!(
                "{} trailing bytes",
                self.remaining()
            )))
        }
    }
}

pub(crate) fn put_u24(buf: &mut Vec<u8>, n: usize) {
    buf.extend_from_slice(&[(n >> 16) as u8, (n >> 8) as u8, n as u8]);
}

pub(crate) fn put_vec8(buf: &mut Vec<u8>, data: &[u8]) {
    buf.push(data.len() as u8);
    buf.extend_from_slice(data);
}

pub(crate) fn put_vec16(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(&(data.len() as u16).to_be_bytes());
    buf.extend_from_slice(data);
}

pub(crate) fn put_vec24(buf: &mut Vec<u8>, data: &[u8]) {
    put_u24(buf, data.len());
    buf.extend_from_slice(data);
}

// ---------------------------------------------------------------------------
// Handshake framing
// ---------------------------------------------------------------------------

/// Parse a handshake message header.
///
/// Returns `(msg_type, body, total_consumed)`.
pub fn parse_handshake_header(data: &[u8]) -> Result<(HandshakeType, &[u8], usize), TlsError> {
    let mut r = Reader::new(data);
    let type_byte = r.u8()?;
    let length = r.u24()?;
    if length > MAX_HANDSHAKE_MESSAGE_LEN {
        return Err(TlsError::DecodeError(format!(
            "handshake message length {length} too large"
        )));
    }
    let msg_type = HandshakeType::from_u8(type_byte).ok_or_else(|| {
        TlsError::UnexpectedMessage(format!("unknown handshake type {type_byte}"))
    })?;
    let body = r.bytes(length)?;
    Ok((msg_type, body, HANDSHAKE_HEADER_LEN + length))
}

/// Prefix `body` with its handshake header.
pub fn wrap_handshake(msg_type: HandshakeType, body: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(HANDSHAKE_HEADER_LEN + body.len());
    msg.push(msg_type as u8);
    put_vec24(&mut msg, body);
    msg
}

// ---------------------------------------------------------------------------
// Extensions block
// ---------------------------------------------------------------------------

/// Parse an extensions block, including its 2-byte length prefix.
pub fn parse_extensions(data: &[u8]) -> Result<Vec<Extension>, TlsError> {
    let mut outer = Reader::new(data);
    let mut r = Reader::new(outer.vec16()?);
    outer.expect_end()?;
    let mut extensions = Vec::new();
    while !r.is_empty() {
        let extension_type = ExtensionType(r.u16()?);
        let data = r.vec16()?.to_vec();
        extensions.push(Extension {
            extension_type,
            data,
        });
    }
    Ok(extensions)
}

/// Serialize an extensions block with its length prefix.
pub fn encode_extensions(extensions: &[Extension]) -> Vec<u8> {
    let mut inner = Vec::new();
    for ext in extensions {
        inner.extend_from_slice(&ext.extension_type.0.to_be_bytes());
        put_vec16(&mut inner, &ext.data);
    }
    let mut buf = Vec::with_capacity(2 + inner.len());
    put_vec16(&mut buf, &inner);
    buf
}

// ---------------------------------------------------------------------------
// Hello messages
// ---------------------------------------------------------------------------

/// ClientHello. An empty extension list is encoded without the block, so
/// SSL 3.0 hellos round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub legacy_version: u16,
    pub random: [u8; 32],
    pub session_id: Vec<u8>,
    /// Present only for datagram versions.
    pub cookie: Option<Vec<u8>>,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<u8>,
    pub extensions: Vec<Extension>,
}

fn is_datagram_version(version: u16) -> bool {
    TlsVersion::from_wire(version).is_some_and(TlsVersion::is_dtls)
}

pub fn encode_client_hello(ch: &ClientHello) -> Vec<u8> {
    let mut body = Vec::with_capacity(128);
    body.extend_from_slice(&ch.legacy_version.to_be_bytes());
    body.extend_from_slice(&ch.random);
    put_vec8(&mut body, &ch.session_id);
    if is_datagram_version(ch.legacy_version) {
        put_vec8(&mut body, ch.cookie.as_deref().unwrap_or_default());
    }
    let suites: Vec<u8> = ch.cipher_suites.iter().flat_map(|s| s.0.to_be_bytes()).collect();
    put_vec16(&mut body, &suites);
    put_vec8(&mut body, &ch.compression_methods);
    if !ch.extensions.is_empty() {
        body.extend_from_slice(&encode_extensions(&ch.extensions));
    }
    wrap_handshake(HandshakeType::ClientHello, &body)
}

pub fn decode_client_hello(body: &[u8]) -> Result<ClientHello, TlsError> {
    let mut r = Reader::new(body);
    let legacy_version = r.u16()?;
    let random = r.array()?;
    let session_id = decode_session_id(&mut r)?;
    let cookie = if is_datagram_version(legacy_version) {
        Some(r.vec8()?.to_vec())
    } else {
        None
    };
    let suite_bytes = r.vec16()?;
    if suite_bytes.is_empty() || suite_bytes.len() % 2 != 0 {
        return Err(TlsError::DecodeError("bad cipher_suites length".into()));
    }
    let cipher_suites = suite_bytes
        .chunks_exact(2)
        .map(|c| CipherSuite(u16::from_be_bytes([c[0], c[1]])))
        .collect();
    let compression_methods = r.vec8()?.to_vec();
    if compression_methods.is_empty() {
        return Err(TlsError::DecodeError("no compression methods".into()));
    }
    let extensions = if r.is_empty() {
        Vec::new()
    } else {
        parse_extensions(r.rest())?
    };
    Ok(ClientHello {
        legacy_version,
        random,
        session_id,
        cookie,
        cipher_suites,
        compression_methods,
        extensions,
    })
}

/// ServerHello.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub legacy_version: u16,
    pub random: [u8; 32],
    pub session_id: Vec<u8>,
    pub cipher_suite: CipherSuite,
    pub compression_method: u8,
    pub extensions: Vec<Extension>,
}

pub fn encode_server_hello(sh: &ServerHello) -> Vec<u8> {
    let mut body = Vec::with_capacity(96);
    body.extend_from_slice(&sh.legacy_version.to_be_bytes());
    body.extend_from_slice(&sh.random);
    put_vec8(&mut body, &sh.session_id);
    body.extend_from_slice(&sh.cipher_suite.0.to_be_bytes());
    body.push(sh.compression_method);
    if !sh.extensions.is_empty() {
        body.extend_from_slice(&encode_extensions(&sh.extensions));
    }
    wrap_handshake(HandshakeType::ServerHello, &body)
}

pub fn decode_server_hello(body: &[u8]) -> Result<ServerHello, TlsError> {
    let mut r = Reader::new(body);
    let legacy_version = r.u16()?;
    let random = r.array()?;
    let session_id = decode_session_id(&mut r)?;
    let cipher_suite = CipherSuite(r.u16()?);
    let compression_method = r.u8()?;
    let extensions = if r.is_empty() {
        Vec::new()
    } else {
        parse_extensions(r.rest())?
    };
    Ok(ServerHello {
        legacy_version,
        random,
        session_id,
        cipher_suite,
        compression_method,
        extensions,
    })
}

fn decode_session_id(r: &mut Reader<'_>) -> Result<Vec<u8>, TlsError> {
    let id = r.vec8()?;
    if id.len() > 32 {
        return Err(TlsError::IllegalParameter("session_id longer than 32".into()));
    }
    Ok(id.to_vec())
}

// ---------------------------------------------------------------------------
// Certificate / Finished
// ---------------------------------------------------------------------------

/// Certificate: DER certificates, leaf first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CertificateMsg {
    pub certificate_list: Vec<Vec<u8>>,
}

pub fn encode_certificate(cert: &CertificateMsg) -> Vec<u8> {
    let mut list = Vec::new();
    for der in &cert.certificate_list {
        put_vec24(&mut list, der);
    }
    let mut body = Vec::with_capacity(3 + list.len());
    put_vec24(&mut body, &list);
    wrap_handshake(HandshakeType::Certificate, &body)
}

pub fn decode_certificate(body: &[u8]) -> Result<CertificateMsg, TlsError> {
    let mut r = Reader::new(body);
    let mut list = Reader::new(r.vec24()?);
    r.expect_end()?;
    let mut certificate_list = Vec::new();
    while !list.is_empty() {
        let der = list.vec24()?;
        if der.is_empty() {
            return Err(TlsError::DecodeError("empty certificate entry".into()));
        }
        certificate_list.push(der.to_vec());
    }
    Ok(CertificateMsg { certificate_list })
}

/// Finished. The verify_data length depends on the version (36 bytes for
/// SSL 3.0, 12 otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub verify_data: Vec<u8>,
}

pub fn verify_data_len(version: TlsVersion) -> usize {
    if version == TlsVersion::Ssl30 {
        36
    } else {
        12
    }
}

pub fn encode_finished(fin: &Finished) -> Vec<u8> {
    wrap_handshake(HandshakeType::Finished, &fin.verify_data)
}

pub fn decode_finished(body: &[u8], version: TlsVersion) -> Result<Finished, TlsError> {
    if body.len() != verify_data_len(version) {
        return Err(TlsError::DecodeError(format!(
            "Finished body is {} bytes",
            body.len()
        )));
    }
    Ok(Finished {
        verify_data: body.to_vec(),
    })
}
