//! Stream (and NULL) record protection: `E(payload || MAC)`, no padding.

use subtle::ConstantTimeEq;

use super::cipher::RecordMac;
use super::ContentType;
use crate::crypt::engine::StreamEngine;
use crate::suites::BulkCipher;
use crate::TlsError;

pub(crate) struct StreamState {
    /// `None` for NULL-cipher suites, which only MAC.
    engine: Option<StreamEngine>,
    mac: RecordMac,
}

impl StreamState {
    pub(crate) fn new(
        bulk: BulkCipher,
        key: &[u8],
        iv: &[u8],
        mac: RecordMac,
    ) -> Result<Self, TlsError> {
        let engine = match bulk {
            BulkCipher::Null => None,
            _ => Some(StreamEngine::new(bulk, key, iv)?),
        };
        Ok(Self { engine, mac })
    }

    pub(crate) fn seal(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let mac = self.mac.compute(seq, content_type, version, plaintext)?;
        let mut out = Vec::with_capacity(plaintext.len() + mac.len());
        out.extend_from_slice(plaintext);
        out.extend_from_slice(&mac);
        if let Some(engine) = &mut self.engine {
            engine.apply(&mut out);
        }
        Ok(out)
    }

    pub(crate) fn open(
        &mut self,
        seq: u64,
        content_type: ContentType,
        version: u16,
        fragment: &[u8],
    ) -> Result<Vec<u8>, TlsError> {
        let mut data = fragment.to_vec();
        if let Some(engine) = &mut self.engine {
            engine.apply(&mut data);
        }
        let mac_len = self.mac.len();
        if data.len() < mac_len {
            return Err(TlsError::BadRecordMac);
        }
        let (payload, received) = data.split_at(data.len() - mac_len);
        let expected = self.mac.compute(seq, content_type, version, payload)?;
        if received.ct_eq(&expected).unwrap_u8() != 1 {
            return Err(TlsError::BadRecordMac);
        }
        data.truncate(data.len() - mac_len);
        Ok(data)
    }
}
