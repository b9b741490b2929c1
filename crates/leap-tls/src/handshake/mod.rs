//! TLS handshake protocol: message codecs, ordering rules, key exchange and
//! the client and server state machines.

pub mod client;
pub mod codec;
pub mod codec_kx;
pub mod key_exchange;
pub mod ordering;
pub mod reader;
pub mod server;
pub mod signing;

use crate::crypt::key_schedule::{KeySchedule, Randoms};
use crate::record::RecordCipher;
use crate::{CryptoError, TlsError, TlsRole};

/// Handshake message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    HelloVerifyRequest = 3,
    NewSessionTicket = 4,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
}

impl HandshakeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        use HandshakeType::*;
        Some(match value {
            0 => HelloRequest,
            1 => ClientHello,
            2 => ServerHello,
            3 => HelloVerifyRequest,
            4 => NewSessionTicket,
            11 => Certificate,
            12 => ServerKeyExchange,
            13 => CertificateRequest,
            14 => ServerHelloDone,
            15 => CertificateVerify,
            16 => ClientKeyExchange,
            20 => Finished,
            _ => return None,
        })
    }
}

/// Handshake progress, shared by both roles. Client states name what the
/// client waits for; server states name what the server waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Start,
    WaitServerHello,
    WaitServerFlight,
    WaitClientHello,
    WaitClientFlight,
    WaitChangeCipherSpec,
    WaitFinished,
    Established,
}

/// Input to a handshake state machine.
#[derive(Debug, Clone, Copy)]
pub enum Incoming<'a> {
    /// One complete handshake message, header included.
    Handshake(&'a [u8]),
    ChangeCipherSpec,
}

/// Work the connection must carry out, in order, after a state-machine step.
pub enum HandshakeOutput {
    /// Send a handshake message (header included).
    Send(Vec<u8>),
    SendChangeCipherSpec,
    /// Install the cipher for outgoing records.
    ActivateWrite(RecordCipher),
    /// Install the cipher for incoming records.
    ActivateRead(RecordCipher),
    /// Both Finished messages verified; application data may flow.
    Complete,
}

impl std::fmt::Debug for HandshakeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakeOutput::Send(msg) => f
                .debug_tuple("Send")
                .field(&msg.first().and_then(|t| HandshakeType::from_u8(*t)))
                .finish(),
            HandshakeOutput::SendChangeCipherSpec => f.write_str("SendChangeCipherSpec"),
            HandshakeOutput::ActivateWrite(c) => {
                f.debug_tuple("ActivateWrite").field(&c.description()).finish()
            }
            HandshakeOutput::ActivateRead(c) => {
                f.debug_tuple("ActivateRead").field(&c.description()).finish()
            }
            HandshakeOutput::Complete => f.write_str("Complete"),
        }
    }
}

/// Negotiated parameters reported once the handshake completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedParams {
    pub version: crate::TlsVersion,
    pub suite: crate::CipherSuite,
    pub extended_master_secret: bool,
    pub alpn: Option<Vec<u8>>,
    pub group: Option<crate::crypt::NamedGroup>,
    pub max_fragment_length: Option<usize>,
    pub peer_certificates: Vec<Vec<u8>>,
    pub client_verify_data: Vec<u8>,
    pub server_verify_data: Vec<u8>,
}

/// Fresh hello random.
pub(crate) fn random32() -> Result<[u8; 32], TlsError> {
    let mut out = [0u8; 32];
    getrandom::getrandom(&mut out).map_err(|_| CryptoError::RandomFail)?;
    Ok(out)
}

/// Expand the key block and build the `(write, read)` record ciphers for
/// an endpoint acting as `role`.
pub(crate) fn derive_record_ciphers(
    schedule: &KeySchedule,
    randoms: &Randoms,
    role: TlsRole,
) -> Result<(RecordCipher, RecordCipher), TlsError> {
    let (write, read) = schedule.derive_key_block(randoms)?.split(role);
    let suite = schedule.suite();
    let version = schedule.version();
    Ok((
        RecordCipher::new(suite, version, &write)?,
        RecordCipher::new(suite, version, &read)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_type_from_u8() {
        for t in [
            HandshakeType::HelloRequest,
            HandshakeType::ClientHello,
            HandshakeType::ServerHello,
            HandshakeType::Certificate,
            HandshakeType::ServerKeyExchange,
            HandshakeType::CertificateRequest,
            HandshakeType::ServerHelloDone,
            HandshakeType::CertificateVerify,
            HandshakeType::ClientKeyExchange,
            HandshakeType::Finished,
        ] {
            assert_eq!(HandshakeType::from_u8(t as u8), Some(t));
        }
        assert_eq!(HandshakeType::from_u8(8), None);
        assert_eq!(HandshakeType::from_u8(255), None);
    }
}
