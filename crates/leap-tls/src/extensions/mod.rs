//! TLS extensions (SNI, ALPN, supported_groups, etc.).
//!
//! Hellos carry extensions as raw `(type, payload)` pairs. Typed views are
//! produced by a [`DecoderChain`]: each decoder claims the wire ids it
//! understands, the first claimant decodes, and anything unclaimed is kept
//! opaque.

use crate::crypt::{NamedGroup, SignatureScheme};
use crate::handshake::codec::{put_vec16, put_vec8, Reader};
use crate::TlsError;

/// TLS extension type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionType(pub u16);

impl ExtensionType {
    pub const SERVER_NAME: Self = Self(0);
    pub const MAX_FRAGMENT_LENGTH: Self = Self(1);
    pub const STATUS_REQUEST: Self = Self(5);
    pub const SUPPORTED_GROUPS: Self = Self(10);
    pub const EC_POINT_FORMATS: Self = Self(11);
    pub const SIGNATURE_ALGORITHMS: Self = Self(13);
    pub const APPLICATION_LAYER_PROTOCOL_NEGOTIATION: Self = Self(16);
    pub const PADDING: Self = Self(21);
    pub const ENCRYPT_THEN_MAC: Self = Self(22);
    pub const EXTENDED_MASTER_SECRET: Self = Self(23);
    pub const SESSION_TICKET: Self = Self(35);
    pub const SUPPORTED_VERSIONS: Self = Self(43);
    pub const KEY_SHARE: Self = Self(51);
    pub const RENEGOTIATION_INFO: Self = Self(0xFF01);

    pub fn is_grease(self) -> bool {
        crate::suites::is_grease(self.0)
    }
}

/// A raw TLS extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub extension_type: ExtensionType,
    pub data: Vec<u8>,
}

impl Extension {
    pub fn new(extension_type: ExtensionType, data: Vec<u8>) -> Self {
        Self {
            extension_type,
            data,
        }
    }
}

/// `max_fragment_length` codes (RFC 6066 Section 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxFragmentLength {
    Bytes512 = 1,
    Bytes1024 = 2,
    Bytes2048 = 3,
    Bytes4096 = 4,
}

impl MaxFragmentLength {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bytes512),
            2 => Some(Self::Bytes1024),
            3 => Some(Self::Bytes2048),
            4 => Some(Self::Bytes4096),
            _ => None,
        }
    }

    /// The largest code not above `limit`, if `limit` is below 2^14.
    pub fn for_limit(limit: usize) -> Option<Self> {
        match limit {
            4096..=16383 => Some(Self::Bytes4096),
            2048..=4095 => Some(Self::Bytes2048),
            1024..=2047 => Some(Self::Bytes1024),
            512..=1023 => Some(Self::Bytes512),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        512 << (self as usize - 1)
    }
}

/// Typed extension payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedExtension {
    /// First `host_name` entry.
    ServerName(String),
    MaxFragmentLength(MaxFragmentLength),
    SupportedGroups(Vec<NamedGroup>),
    EcPointFormats(Vec<u8>),
    SignatureAlgorithms(Vec<SignatureScheme>),
    Alpn(Vec<Vec<u8>>),
    RenegotiationInfo(Vec<u8>),
    /// RFC 7685 filler: this many zero bytes.
    Padding(usize),
    /// ClientHello list form.
    SupportedVersions(Vec<u16>),
    /// ServerHello single-version form.
    SelectedVersion(u16),
    /// Zero-length payload: extended_master_secret, GREASE, and other flags.
    Empty(ExtensionType),
    Unknown(Extension),
}

impl ParsedExtension {
    pub fn extension_type(&self) -> ExtensionType {
        match self {
            ParsedExtension::ServerName(_) => ExtensionType::SERVER_NAME,
            ParsedExtension::MaxFragmentLength(_) => ExtensionType::MAX_FRAGMENT_LENGTH,
            ParsedExtension::SupportedGroups(_) => ExtensionType::SUPPORTED_GROUPS,
            ParsedExtension::EcPointFormats(_) => ExtensionType::EC_POINT_FORMATS,
            ParsedExtension::SignatureAlgorithms(_) => ExtensionType::SIGNATURE_ALGORITHMS,
            ParsedExtension::Alpn(_) => ExtensionType::APPLICATION_LAYER_PROTOCOL_NEGOTIATION,
            ParsedExtension::RenegotiationInfo(_) => ExtensionType::RENEGOTIATION_INFO,
            ParsedExtension::Padding(_) => ExtensionType::PADDING,
            ParsedExtension::SupportedVersions(_) | ParsedExtension::SelectedVersion(_) => {
                ExtensionType::SUPPORTED_VERSIONS
            }
            ParsedExtension::Empty(ty) => *ty,
            ParsedExtension::Unknown(ext) => ext.extension_type,
        }
    }

    /// Serialize back to a raw extension.
    pub fn encode(&self) -> Extension {
        let mut data = Vec::new();
        match self {
            ParsedExtension::ServerName(host) => {
                let mut entry = vec![0u8];
                put_vec16(&mut entry, host.as_bytes());
                put_vec16(&mut data, &entry);
            }
            ParsedExtension::MaxFragmentLength(code) => data.push(*code as u8),
            ParsedExtension::SupportedGroups(groups) => {
                let list: Vec<u8> = groups.iter().flat_map(|g| g.0.to_be_bytes()).collect();
                put_vec16(&mut data, &list);
            }
            ParsedExtension::EcPointFormats(formats) => put_vec8(&mut data, formats),
            ParsedExtension::SignatureAlgorithms(schemes) => {
                let list: Vec<u8> = schemes.iter().flat_map(|s| s.0.to_be_bytes()).collect();
                put_vec16(&mut data, &list);
            }
            ParsedExtension::Alpn(protocols) => {
                let mut list = Vec::new();
                for p in protocols {
                    put_vec8(&mut list, p);
                }
                put_vec16(&mut data, &list);
            }
            ParsedExtension::RenegotiationInfo(info) => put_vec8(&mut data, info),
            ParsedExtension::Padding(len) => data.resize(*len, 0),
            ParsedExtension::SupportedVersions(versions) => {
                let list: Vec<u8> = versions.iter().flat_map(|v| v.to_be_bytes()).collect();
                put_vec8(&mut data, &list);
            }
            ParsedExtension::SelectedVersion(v) => data.extend_from_slice(&v.to_be_bytes()),
            ParsedExtension::Empty(_) => {}
            ParsedExtension::Unknown(ext) => return ext.clone(),
        }
        Extension::new(self.extension_type(), data)
    }
}

/// One link of the decoder chain.
pub trait ExtensionDecoder: Send + Sync {
    fn claims(&self, extension_type: ExtensionType) -> bool;
    fn decode(&self, data: &[u8]) -> Result<ParsedExtension, TlsError>;
}

/// A decoder for a single wire id backed by a plain function.
struct FnDecoder {
    extension_type: ExtensionType,
    decode: fn(&[u8]) -> Result<ParsedExtension, TlsError>,
}

impl ExtensionDecoder for FnDecoder {
    fn claims(&self, extension_type: ExtensionType) -> bool {
        self.extension_type == extension_type
    }

    fn decode(&self, data: &[u8]) -> Result<ParsedExtension, TlsError> {
        (self.decode)(data)
    }
}

fn decode_server_name(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    // ServerHello acknowledges SNI with an empty payload.
    if data.is_empty() {
        return Ok(ParsedExtension::Empty(ExtensionType::SERVER_NAME));
    }
    let mut r = Reader::new(data);
    let mut list = Reader::new(r.vec16()?);
    r.expect_end()?;
    while !list.is_empty() {
        let name_type = list.u8()?;
        let name = list.vec16()?;
        if name_type == 0 {
            let host = std::str::from_utf8(name)
                .map_err(|_| TlsError::DecodeError("server_name is not UTF-8".into()))?;
            return Ok(ParsedExtension::ServerName(host.to_string()));
        }
    }
    Err(TlsError::DecodeError("server_name without host_name".into()))
}

fn decode_max_fragment_length(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let mut r = Reader::new(data);
    let code = r.u8()?;
    r.expect_end()?;
    MaxFragmentLength::from_u8(code)
        .map(ParsedExtension::MaxFragmentLength)
        .ok_or_else(|| TlsError::IllegalParameter(format!("max_fragment_length code {code}")))
}

fn decode_u16_list(data: &[u8]) -> Result<Vec<u16>, TlsError> {
    let mut r = Reader::new(data);
    let mut list = Reader::new(r.vec16()?);
    r.expect_end()?;
    let mut out = Vec::new();
    while !list.is_empty() {
        out.push(list.u16()?);
    }
    Ok(out)
}

fn decode_supported_groups(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let groups = decode_u16_list(data)?.into_iter().map(NamedGroup).collect();
    Ok(ParsedExtension::SupportedGroups(groups))
}

fn decode_signature_algorithms(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let schemes = decode_u16_list(data)?
        .into_iter()
        .map(SignatureScheme)
        .collect();
    Ok(ParsedExtension::SignatureAlgorithms(schemes))
}

fn decode_ec_point_formats(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let mut r = Reader::new(data);
    let formats = r.vec8()?.to_vec();
    r.expect_end()?;
    Ok(ParsedExtension::EcPointFormats(formats))
}

fn decode_alpn(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let mut r = Reader::new(data);
    let mut list = Reader::new(r.vec16()?);
    r.expect_end()?;
    let mut protocols = Vec::new();
    while !list.is_empty() {
        let p = list.vec8()?;
        if p.is_empty() {
            return Err(TlsError::DecodeError("empty ALPN protocol name".into()));
        }
        protocols.push(p.to_vec());
    }
    Ok(ParsedExtension::Alpn(protocols))
}

fn decode_renegotiation_info(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let mut r = Reader::new(data);
    let info = r.vec8()?.to_vec();
    r.expect_end()?;
    Ok(ParsedExtension::RenegotiationInfo(info))
}

fn decode_padding(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    if data.iter().any(|&b| b != 0) {
        return Err(TlsError::IllegalParameter("non-zero padding extension".into()));
    }
    Ok(ParsedExtension::Padding(data.len()))
}

fn decode_supported_versions(data: &[u8]) -> Result<ParsedExtension, TlsError> {
    let mut r = Reader::new(data);
    if data.len() == 2 {
        return Ok(ParsedExtension::SelectedVersion(r.u16()?));
    }
    let mut list = Reader::new(r.vec8()?);
    r.expect_end()?;
    let mut versions = Vec::new();
    while !list.is_empty() {
        versions.push(list.u16()?);
    }
    Ok(ParsedExtension::SupportedVersions(versions))
}

/// Ordered list of extension decoders.
pub struct DecoderChain {
    decoders: Vec<Box<dyn ExtensionDecoder>>,
}

impl DecoderChain {
    /// The decoders for every extension this engine interprets.
    pub fn standard() -> Self {
        let table: [(ExtensionType, fn(&[u8]) -> Result<ParsedExtension, TlsError>); 9] = [
            (ExtensionType::SERVER_NAME, decode_server_name),
            (ExtensionType::MAX_FRAGMENT_LENGTH, decode_max_fragment_length),
            (ExtensionType::SUPPORTED_GROUPS, decode_supported_groups),
            (ExtensionType::EC_POINT_FORMATS, decode_ec_point_formats),
            (ExtensionType::SIGNATURE_ALGORITHMS, decode_signature_algorithms),
            (ExtensionType::APPLICATION_LAYER_PROTOCOL_NEGOTIATION, decode_alpn),
            (ExtensionType::RENEGOTIATION_INFO, decode_renegotiation_info),
            (ExtensionType::SUPPORTED_VERSIONS, decode_supported_versions),
            (ExtensionType::PADDING, decode_padding),
        ];
        let decoders = table
            .into_iter()
            .map(|(extension_type, decode)| {
                Box::new(FnDecoder {
                    extension_type,
                    decode,
                }) as Box<dyn ExtensionDecoder>
            })
            .collect();
        Self { decoders }
    }

    /// Append a decoder; earlier decoders win.
    pub fn with(mut self, decoder: Box<dyn ExtensionDecoder>) -> Self {
        self.decoders.push(decoder);
        self
    }

    pub fn decode(&self, ext: &Extension) -> Result<ParsedExtension, TlsError> {
        match self.decoders.iter().find(|d| d.claims(ext.extension_type)) {
            Some(decoder) => decoder.decode(&ext.data),
            None if ext.data.is_empty() => Ok(ParsedExtension::Empty(ext.extension_type)),
            None => Ok(ParsedExtension::Unknown(ext.clone())),
        }
    }

    /// Decode a full extension block, rejecting duplicate ids.
    pub fn decode_all(&self, exts: &[Extension]) -> Result<Vec<ParsedExtension>, TlsError> {
        let mut seen = std::collections::HashSet::new();
        exts.iter()
            .map(|ext| {
                if !seen.insert(ext.extension_type) {
                    return Err(TlsError::IllegalParameter(format!(
                        "duplicate extension {}",
                        ext.extension_type.0
                    )));
                }
                self.decode(ext)
            })
            .collect()
    }
}

impl Default for DecoderChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Find the first extension of `extension_type` in a decoded block.
pub fn find(exts: &[ParsedExtension], extension_type: ExtensionType) -> Option<&ParsedExtension> {
    exts.iter().find(|e| e.extension_type() == extension_type)
}
