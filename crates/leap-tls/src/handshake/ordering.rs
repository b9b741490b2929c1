//! Handshake message ordering for SSL 3.0 through TLS 1.2.
//!
//! Each `(sender, message)` pair lists the messages that may immediately
//! precede it in the full handshake. Anything else is `unexpected_message`.

use super::HandshakeType;
use crate::{TlsError, TlsRole};

/// Messages that take part in the ordering rules. ChangeCipherSpec is not a
/// handshake message but is ordered like one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowMessage {
    ClientHello,
    ServerHello,
    Certificate,
    ServerKeyExchange,
    CertificateRequest,
    ServerHelloDone,
    ClientKeyExchange,
    CertificateVerify,
    ChangeCipherSpec,
    Finished,
}

impl FlowMessage {
    /// `None` for handshake types outside the ordering rules.
    pub fn from_handshake_type(msg_type: HandshakeType) -> Option<Self> {
        Some(match msg_type {
            HandshakeType::ClientHello => FlowMessage::ClientHello,
            HandshakeType::ServerHello => FlowMessage::ServerHello,
            HandshakeType::Certificate => FlowMessage::Certificate,
            HandshakeType::ServerKeyExchange => FlowMessage::ServerKeyExchange,
            HandshakeType::CertificateRequest => FlowMessage::CertificateRequest,
            HandshakeType::ServerHelloDone => FlowMessage::ServerHelloDone,
            HandshakeType::ClientKeyExchange => FlowMessage::ClientKeyExchange,
            HandshakeType::CertificateVerify => FlowMessage::CertificateVerify,
            HandshakeType::Finished => FlowMessage::Finished,
            HandshakeType::HelloRequest
            | HandshakeType::HelloVerifyRequest
            | HandshakeType::NewSessionTicket => return None,
        })
    }
}

type Step = (TlsRole, FlowMessage);

const C: TlsRole = TlsRole::Client;
const S: TlsRole = TlsRole::Server;

/// Legal immediate predecessors; `None` stands for "nothing yet".
fn predecessors(step: Step) -> &'static [Option<Step>] {
    use FlowMessage::*;
    match step {
        (C, ClientHello) => &[None],
        (S, ServerHello) => &[Some((C, ClientHello))],
        (S, Certificate) => &[Some((S, ServerHello))],
        (S, ServerKeyExchange) => &[Some((S, ServerHello)), Some((S, Certificate))],
        (S, CertificateRequest) => &[Some((S, Certificate)), Some((S, ServerKeyExchange))],
        (S, ServerHelloDone) => &[
            Some((S, ServerHello)),
            Some((S, Certificate)),
            Some((S, ServerKeyExchange)),
            Some((S, CertificateRequest)),
        ],
        (C, Certificate) => &[Some((S, ServerHelloDone))],
        (C, ClientKeyExchange) => &[Some((S, ServerHelloDone)), Some((C, Certificate))],
        (C, CertificateVerify) => &[Some((C, ClientKeyExchange))],
        (C, ChangeCipherSpec) => &[Some((C, ClientKeyExchange)), Some((C, CertificateVerify))],
        (C, Finished) => &[Some((C, ChangeCipherSpec))],
        (S, ChangeCipherSpec) => &[Some((C, Finished))],
        (S, Finished) => &[Some((S, ChangeCipherSpec))],
        _ => &[],
    }
}

/// Tracks the last message of the handshake, whichever side sent it.
#[derive(Debug, Clone, Default)]
pub struct MessageFlow {
    last: Option<Step>,
}

impl MessageFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `msg` from `sender` if it may follow the last message, and
    /// record it.
    pub fn check(&mut self, sender: TlsRole, msg: FlowMessage) -> Result<(), TlsError> {
        if !predecessors((sender, msg)).contains(&self.last) {
            return Err(TlsError::UnexpectedMessage(format!(
                "{sender:?} {msg:?} after {}",
                match self.last {
                    Some((role, m)) => format!("{role:?} {m:?}"),
                    None => "start of handshake".into(),
                }
            )));
        }
        self.last = Some((sender, msg));
        Ok(())
    }

    /// Whether `msg` from `sender` would be accepted now.
    pub fn allows(&self, sender: TlsRole, msg: FlowMessage) -> bool {
        predecessors((sender, msg)).contains(&self.last)
    }

    pub fn last(&self) -> Option<(TlsRole, FlowMessage)> {
        self.last
    }

    /// The full handshake has run: the server's Finished was the last step.
    pub fn is_complete(&self) -> bool {
        self.last == Some((S, FlowMessage::Finished))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use FlowMessage::*;

    fn run(steps: &[Step]) -> Result<MessageFlow, TlsError> {
        let mut flow = MessageFlow::new();
        for (sender, msg) in steps {
            flow.check(*sender, *msg)?;
        }
        Ok(flow)
    }

    #[test]
    fn test_full_handshake_with_client_auth() {
        let flow = run(&[
            (C, ClientHello),
            (S, ServerHello),
            (S, Certificate),
            (S, ServerKeyExchange),
            (S, CertificateRequest),
            (S, ServerHelloDone),
            (C, Certificate),
            (C, ClientKeyExchange),
            (C, CertificateVerify),
            (C, ChangeCipherSpec),
            (C, Finished),
            (S, ChangeCipherSpec),
            (S, Finished),
        ])
        .unwrap();
        assert!(flow.is_complete());
    }

    #[test]
    fn test_minimal_anonymous_and_rsa_paths() {
        run(&[
            (C, ClientHello),
            (S, ServerHello),
            (S, ServerKeyExchange),
            (S, ServerHelloDone),
            (C, ClientKeyExchange),
            (C, ChangeCipherSpec),
            (C, Finished),
        ])
        .unwrap();
        run(&[
            (C, ClientHello),
            (S, ServerHello),
            (S, Certificate),
            (S, ServerHelloDone),
            (C, ClientKeyExchange),
        ])
        .unwrap();
    }

    #[test]
    fn test_client_key_exchange_before_server_hello() {
        let mut flow = run(&[(C, ClientHello)]).unwrap();
        assert!(matches!(
            flow.check(S, ClientKeyExchange),
            Err(TlsError::UnexpectedMessage(_))
        ));
        assert!(matches!(
            flow.check(C, ClientKeyExchange),
            Err(TlsError::UnexpectedMessage(_))
        ));
        // A rejected message leaves the flow where it was.
        assert_eq!(flow.last(), Some((C, ClientHello)));
        assert!(flow.allows(S, ServerHello));
    }

    #[test]
    fn test_finished_requires_change_cipher_spec() {
        let mut flow = run(&[
            (C, ClientHello),
            (S, ServerHello),
            (S, ServerHelloDone),
            (C, ClientKeyExchange),
        ])
        .unwrap();
        assert!(flow.check(C, Finished).is_err());
    }

    #[test]
    fn test_certificate_request_needs_certificate() {
        let mut flow = run(&[(C, ClientHello), (S, ServerHello)]).unwrap();
        assert!(flow.check(S, CertificateRequest).is_err());
    }

    #[test]
    fn test_second_client_hello_rejected() {
        let mut flow = run(&[(C, ClientHello)]).unwrap();
        assert!(flow.check(C, ClientHello).is_err());
    }

    #[test]
    fn test_handshake_type_mapping() {
        assert_eq!(
            FlowMessage::from_handshake_type(HandshakeType::Finished),
            Some(Finished)
        );
        assert_eq!(
            FlowMessage::from_handshake_type(HandshakeType::HelloRequest),
            None
        );
    }
}
