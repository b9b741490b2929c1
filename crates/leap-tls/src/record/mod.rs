//! TLS record layer: parsing, serialization, fragmentation limits and
//! per-direction record protection.

pub mod aead;
pub mod cbc;
pub mod cipher;
pub mod stream;

pub use cipher::RecordCipher;

use tracing::{debug, trace};

use crate::{TlsError, TlsVersion};

/// Largest plaintext fragment (2^14).
pub const MAX_PLAINTEXT_LENGTH: usize = 16384;
/// Largest protected fragment (2^14 + 2048).
pub const MAX_CIPHERTEXT_LENGTH: usize = MAX_PLAINTEXT_LENGTH + 2048;
pub const RECORD_HEADER_LEN: usize = 5;

/// TLS record content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

impl ContentType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            _ => None,
        }
    }
}

/// A parsed TLS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub content_type: ContentType,
    pub version: u16,
    pub fragment: Vec<u8>,
}

/// Total length (header included) of the record starting at `buf`, once
/// the header is available.
pub fn record_length(buf: &[u8]) -> Option<usize> {
    if buf.len() < RECORD_HEADER_LEN {
        return None;
    }
    Some(RECORD_HEADER_LEN + u16::from_be_bytes([buf[3], buf[4]]) as usize)
}

/// Record layer state for reading and writing TLS records.
///
/// Starts in plaintext mode. Each direction is switched to its negotiated
/// [`RecordCipher`] exactly once, by the ChangeCipherSpec sent or received.
pub struct RecordLayer {
    /// Maximum plaintext fragment size (default: 16384).
    pub max_fragment_size: usize,
    record_version: u16,
    encryptor: Option<RecordCipher>,
    decryptor: Option<RecordCipher>,
}

impl RecordLayer {
    pub fn new() -> Self {
        Self {
            max_fragment_size: MAX_PLAINTEXT_LENGTH,
            record_version: TlsVersion::Tls10.wire(),
            encryptor: None,
            decryptor: None,
        }
    }

    /// Version stamped on outgoing record headers.
    pub fn set_record_version(&mut self, version: TlsVersion) {
        self.record_version = version.wire();
    }

    pub fn record_version(&self) -> u16 {
        self.record_version
    }

    pub fn is_encrypting(&self) -> bool {
        self.encryptor.is_some()
    }

    pub fn is_decrypting(&self) -> bool {
        self.decryptor.is_some()
    }

    pub fn write_sequence(&self) -> Option<u64> {
        self.encryptor.as_ref().map(RecordCipher::sequence_number)
    }

    pub fn read_sequence(&self) -> Option<u64> {
        self.decryptor.as_ref().map(RecordCipher::sequence_number)
    }

    /// Switch outgoing records to `cipher`. Fails if already active.
    pub fn activate_write(&mut self, cipher: RecordCipher) -> Result<(), TlsError> {
        if self.encryptor.is_some() {
            return Err(TlsError::InternalError("write cipher already active".into()));
        }
        debug!(cipher = cipher.description(), "write cipher activated");
        self.encryptor = Some(cipher);
        Ok(())
    }

    /// Switch incoming records to `cipher`. Fails if already active.
    pub fn activate_read(&mut self, cipher: RecordCipher) -> Result<(), TlsError> {
        if self.decryptor.is_some() {
            return Err(TlsError::InternalError("read cipher already active".into()));
        }
        debug!(cipher = cipher.description(), "read cipher activated");
        self.decryptor = Some(cipher);
        Ok(())
    }

    /// Protect (if active) and serialize one record.
    pub fn seal_record(
        &mut self,
        content_type: ContentType,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        if plaintext.len() > self.max_fragment_size {
            return Err(TlsError::RecordOverflow(
                "plaintext exceeds max fragment size".into(),
            ));
        }
        let fragment = match &mut self.encryptor {
            Some(enc) => enc.seal(content_type, plaintext)?,
            None => plaintext.to_vec(),
        };
        trace!(?content_type, len = fragment.len(), "record sealed");
        Ok(self.serialize_record(&Record {
            content_type,
            version: self.record_version,
            fragment,
        }))
    }

    /// Parse and, when read protection is active, unprotect one record.
    ///
    /// Returns `(content_type, plaintext, bytes_consumed)`.
    pub fn open_record(&mut self, data: &[u8]) -> Result<(ContentType, Vec<u8>, usize), TlsError> {
        let (record, consumed) = self.parse_record(data)?;
        let plaintext = match &mut self.decryptor {
            Some(dec) => dec.open(record.content_type, &record.fragment)?,
            None => record.fragment,
        };
        if plaintext.len() > MAX_PLAINTEXT_LENGTH {
            return Err(TlsError::RecordOverflow("plaintext too large".into()));
        }
        trace!(content_type = ?record.content_type, len = plaintext.len(), "record opened");
        Ok((record.content_type, plaintext, consumed))
    }

    /// Parse one record from the front of `data`.
    pub fn parse_record(&self, data: &[u8]) -> Result<(Record, usize), TlsError> {
        let total = record_length(data)
            .ok_or_else(|| TlsError::DecodeError("incomplete record header".into()))?;
        let content_type = ContentType::from_u8(data[0]).ok_or_else(|| {
            TlsError::UnexpectedMessage(format!("unknown content type {}", data[0]))
        })?;
        if data[1] != 3 {
            return Err(TlsError::DecodeError("bad record version".into()));
        }
        let version = u16::from_be_bytes([data[1], data[2]]);
        let length = total - RECORD_HEADER_LEN;
        let limit = if self.decryptor.is_some() {
            MAX_CIPHERTEXT_LENGTH
        } else {
            MAX_PLAINTEXT_LENGTH
        };
        if length > limit {
            return Err(TlsError::RecordOverflow(format!("record length {length}")));
        }
        if data.len() < total {
            return Err(TlsError::DecodeError("incomplete record body".into()));
        }
        Ok((
            Record {
                content_type,
                version,
                fragment: data[RECORD_HEADER_LEN..total].to_vec(),
            },
            total,
        ))
    }

    /// Serialize a record header and fragment.
    pub fn serialize_record(&self, record: &Record) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RECORD_HEADER_LEN + record.fragment.len());
        buf.push(record.content_type as u8);
        buf.extend_from_slice(&record.version.to_be_bytes());
        buf.extend_from_slice(&(record.fragment.len() as u16).to_be_bytes());
        buf.extend_from_slice(&record.fragment);
        buf
    }
}

impl Default for RecordLayer {
    fn default() -> Self {
        Self::new()
    }
}
