//! Client handshake state machine, SSL 3.0 through TLS 1.2.
//!
//! The machine is driven one message at a time through
//! [`ClientHandshake::handle`] and answers with the [`HandshakeOutput`]s the
//! connection has to carry out. It never touches the transport.

use subtle::ConstantTimeEq;
use tracing::debug;

use super::codec::{
    encode_certificate, encode_client_hello, encode_finished, parse_handshake_header,
    CertificateMsg, ClientHello, Finished, ServerHello,
};
use super::codec_kx::{
    build_ske_signed_data, encode_certificate_verify, encode_client_key_exchange,
    is_signed_key_exchange, CertificateRequest, CertificateVerify, ClientKeyExchange,
    DigitallySigned, ServerKeyExchange, ServerKeyExchangeParams,
};
use super::key_exchange::{DhParams, KeyExchange, KxGroup, KxInputs};
use super::ordering::{FlowMessage, MessageFlow};
use super::signing::{
    certificate_verify_digest, select_signature_scheme, sign_digest, verify,
};
use super::{
    derive_record_ciphers, random32, HandshakeOutput, HandshakeState, HandshakeType, Incoming,
    NegotiatedParams,
};
use crate::cert::{validate_chain, PeerPublicKey};
use crate::config::TlsConfig;
use crate::crypt::key_schedule::{session_hash, KeySchedule, Randoms};
use crate::crypt::transcript::TranscriptHash;
use crate::crypt::NamedGroup;
use crate::extensions::{DecoderChain, Extension, ExtensionType, MaxFragmentLength, ParsedExtension};
use crate::message::{CodecContext, HandshakeMessage};
use crate::record::RecordCipher;
use crate::suites::{
    grease_value, lookup, negotiate_as_client, AuthAlg, CipherSuiteInfo, KeyExchangeKind,
    ServerKeyExchangeRule,
};
use crate::{CipherSuite, TlsError, TlsRole, TlsVersion};

const STREAM_VERSIONS: [TlsVersion; 4] = [
    TlsVersion::Ssl30,
    TlsVersion::Tls10,
    TlsVersion::Tls11,
    TlsVersion::Tls12,
];

/// Client side of the handshake.
pub struct ClientHandshake {
    config: TlsConfig,
    state: HandshakeState,
    flow: MessageFlow,
    transcript: TranscriptHash,
    ctx: CodecContext,
    decoders: DecoderChain,
    offered_suites: Vec<CipherSuite>,
    offered_version: TlsVersion,
    randoms: Randoms,
    version: Option<TlsVersion>,
    suite: Option<&'static CipherSuiteInfo>,
    extended_master_secret: bool,
    alpn: Option<Vec<u8>>,
    max_fragment_length: Option<usize>,
    group: Option<NamedGroup>,
    server_certs: Vec<Vec<u8>>,
    server_key: Option<PeerPublicKey>,
    server_kx: Option<ServerKeyExchangeParams>,
    cert_request: Option<CertificateRequest>,
    schedule: Option<KeySchedule>,
    pending_read: Option<RecordCipher>,
    client_verify_data: Vec<u8>,
    server_verify_data: Vec<u8>,
}

impl ClientHandshake {
    pub fn new(config: TlsConfig) -> Self {
        let offered_version = highest_version(&config).unwrap_or(TlsVersion::Tls12);
        Self {
            config,
            state: HandshakeState::Start,
            flow: MessageFlow::new(),
            transcript: TranscriptHash::new(),
            ctx: CodecContext::new(offered_version),
            decoders: DecoderChain::standard(),
            offered_suites: Vec::new(),
            offered_version,
            randoms: Randoms {
                client: [0; 32],
                server: [0; 32],
            },
            version: None,
            suite: None,
            extended_master_secret: false,
            alpn: None,
            max_fragment_length: None,
            group: None,
            server_certs: Vec::new(),
            server_key: None,
            server_kx: None,
            cert_request: None,
            schedule: None,
            pending_read: None,
            client_verify_data: Vec::new(),
            server_verify_data: Vec::new(),
        }
    }

    /// Replace the extension decoder chain used for ServerHello.
    pub fn with_decoders(mut self, decoders: DecoderChain) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == HandshakeState::Established
    }

    /// Version chosen by the server, once ServerHello is processed.
    pub fn version(&self) -> Option<TlsVersion> {
        self.version
    }

    pub fn suite(&self) -> Option<&'static CipherSuiteInfo> {
        self.suite
    }

    /// Fragment limit agreed through max_fragment_length.
    pub fn max_fragment_length(&self) -> Option<usize> {
        self.max_fragment_length
    }

    pub fn transcript(&self) -> &TranscriptHash {
        &self.transcript
    }

    /// Parameters of the completed handshake.
    pub fn negotiated(&self) -> Option<NegotiatedParams> {
        if !self.is_complete() {
            return None;
        }
        Some(NegotiatedParams {
            version: self.version?,
            suite: self.suite?.suite,
            extended_master_secret: self.extended_master_secret,
            alpn: self.alpn.clone(),
            group: self.group,
            max_fragment_length: self.max_fragment_length,
            peer_certificates: self.server_certs.clone(),
            client_verify_data: self.client_verify_data.clone(),
            server_verify_data: self.server_verify_data.clone(),
        })
    }

    fn can_offer(&self, info: &CipherSuiteInfo) -> bool {
        info.is_negotiable()
            && STREAM_VERSIONS
                .iter()
                .any(|v| self.config.allows_version(*v) && info.supports(*v))
            && (!info.key_exchange.is_psk() || self.config.psk.is_some())
    }

    fn offers_extended_master_secret(&self) -> bool {
        self.config.enable_extended_master_secret && self.offered_version != TlsVersion::Ssl30
    }

    /// Build the ClientHello that opens the handshake.
    pub fn build_client_hello(&mut self) -> Result<Vec<u8>, TlsError> {
        if self.state != HandshakeState::Start {
            return Err(TlsError::InternalError("ClientHello already sent".into()));
        }
        highest_version(&self.config).ok_or(TlsError::UnsupportedVersion)?;

        let mut suites: Vec<CipherSuite> = self
            .config
            .cipher_suites
            .iter()
            .copied()
            .filter(|s| lookup(*s).is_some_and(|info| self.can_offer(info)))
            .collect();
        if suites.is_empty() {
            return Err(TlsError::NoSharedCipherSuite);
        }
        self.offered_suites = suites.clone();

        self.randoms.client = random32()?;
        let grease = if self.config.grease {
            Some(grease_value(self.randoms.client[0]))
        } else {
            None
        };
        if let Some(g) = grease {
            suites.insert(0, CipherSuite(g));
        }

        let extensions = if self.offered_version == TlsVersion::Ssl30 {
            Vec::new()
        } else {
            self.client_hello_extensions(grease)
        };

        let mut ch = ClientHello {
            legacy_version: self.offered_version.wire(),
            random: self.randoms.client,
            session_id: random32()?.to_vec(),
            cookie: None,
            cipher_suites: suites,
            compression_methods: vec![0],
            extensions,
        };
        let mut msg = encode_client_hello(&ch);
        if self.config.client_hello_padding && !ch.extensions.is_empty() {
            if let Some(len) = hello_padding_len(msg.len()) {
                ch.extensions.push(ParsedExtension::Padding(len).encode());
                msg = encode_client_hello(&ch);
            }
        }
        self.flow.check(TlsRole::Client, FlowMessage::ClientHello)?;
        self.transcript.update(&msg);
        self.state = HandshakeState::WaitServerHello;
        debug!(version = %self.offered_version, suites = ch.cipher_suites.len(), "ClientHello built");
        Ok(msg)
    }

    fn client_hello_extensions(&self, grease: Option<u16>) -> Vec<Extension> {
        let config = &self.config;
        let mut exts = Vec::new();
        if let Some(g) = grease {
            exts.push(ParsedExtension::Empty(ExtensionType(g)));
        }
        if let Some(name) = &config.server_name {
            exts.push(ParsedExtension::ServerName(name.clone()));
        }
        if let Some(code) = MaxFragmentLength::for_limit(config.max_fragment_size) {
            exts.push(ParsedExtension::MaxFragmentLength(code));
        }
        let mut groups: Vec<NamedGroup> = config
            .supported_groups
            .iter()
            .copied()
            .filter(|g| g.is_supported())
            .collect();
        if let Some(g) = grease {
            groups.insert(0, NamedGroup(g));
        }
        exts.push(ParsedExtension::SupportedGroups(groups));
        exts.push(ParsedExtension::EcPointFormats(vec![0]));
        if self.offered_version.rank() >= TlsVersion::Tls12.rank() {
            exts.push(ParsedExtension::SignatureAlgorithms(
                config.signature_algorithms.clone(),
            ));
        }
        if !config.alpn_protocols.is_empty() {
            exts.push(ParsedExtension::Alpn(config.alpn_protocols.clone()));
        }
        if self.offers_extended_master_secret() {
            exts.push(ParsedExtension::Empty(ExtensionType::EXTENDED_MASTER_SECRET));
        }
        exts.push(ParsedExtension::RenegotiationInfo(Vec::new()));
        exts.iter().map(ParsedExtension::encode).collect()
    }

    /// Feed one handshake message or ChangeCipherSpec from the server.
    pub fn handle(&mut self, input: Incoming<'_>) -> Result<Vec<HandshakeOutput>, TlsError> {
        let raw = match input {
            Incoming::ChangeCipherSpec => return self.process_change_cipher_spec(),
            Incoming::Handshake(raw) => raw,
        };
        let (msg_type, body, _) = parse_handshake_header(raw)?;
        if msg_type == HandshakeType::HelloRequest {
            // Renegotiation is not offered; RFC 5246 lets the client ignore it.
            debug!("HelloRequest ignored");
            return Ok(Vec::new());
        }
        let flow_msg = FlowMessage::from_handshake_type(msg_type).ok_or_else(|| {
            TlsError::UnexpectedMessage(format!("{msg_type:?} from server"))
        })?;
        self.flow.check(TlsRole::Server, flow_msg)?;
        match HandshakeMessage::decode_handshake(msg_type, body, &self.ctx)? {
            HandshakeMessage::ServerHello(sh) => self.process_server_hello(raw, &sh),
            HandshakeMessage::Certificate(cert) => self.process_certificate(raw, cert),
            HandshakeMessage::ServerKeyExchange(ske) => self.process_server_key_exchange(raw, ske),
            HandshakeMessage::CertificateRequest(cr) => self.process_certificate_request(raw, cr),
            HandshakeMessage::ServerHelloDone => self.process_server_hello_done(raw),
            HandshakeMessage::Finished(fin) => self.process_finished(raw, &fin),
            _ => Err(TlsError::UnexpectedMessage(format!("{msg_type:?} from server"))),
        }
    }

    fn process_server_hello(
        &mut self,
        raw: &[u8],
        sh: &ServerHello,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let exts = self.decoders.decode_all(&sh.extensions)?;
        if exts
            .iter()
            .any(|e| matches!(e, ParsedExtension::SelectedVersion(v) if *v >= TlsVersion::Tls13.wire()))
        {
            return Err(TlsError::UnsupportedVersion);
        }
        let version = TlsVersion::from_wire(sh.legacy_version)
            .filter(|v| self.config.allows_version(*v) && v.rank() <= self.offered_version.rank())
            .ok_or(TlsError::UnsupportedVersion)?;
        if sh.compression_method != 0 {
            return Err(TlsError::IllegalParameter(format!(
                "compression method {}",
                sh.compression_method
            )));
        }
        let suite = negotiate_as_client(&self.offered_suites, sh.cipher_suite, version)?;

        for ext in &exts {
            match ext {
                ParsedExtension::Empty(t) if *t == ExtensionType::EXTENDED_MASTER_SECRET => {
                    if !self.offers_extended_master_secret() {
                        return Err(TlsError::IllegalParameter(
                            "unsolicited extended_master_secret".into(),
                        ));
                    }
                    self.extended_master_secret = true;
                }
                ParsedExtension::Alpn(protocols) => match protocols.as_slice() {
                    [p] if self.config.alpn_protocols.contains(p) => self.alpn = Some(p.clone()),
                    _ => {
                        return Err(TlsError::IllegalParameter(
                            "server selected an ALPN protocol not offered".into(),
                        ))
                    }
                },
                ParsedExtension::MaxFragmentLength(code) => {
                    if MaxFragmentLength::for_limit(self.config.max_fragment_size) != Some(*code) {
                        return Err(TlsError::IllegalParameter(
                            "max_fragment_length does not match request".into(),
                        ));
                    }
                    self.max_fragment_length = Some(code.bytes());
                }
                ParsedExtension::RenegotiationInfo(info) if !info.is_empty() => {
                    return Err(TlsError::IllegalParameter(
                        "renegotiation_info must be empty".into(),
                    ))
                }
                _ => {}
            }
        }

        self.randoms.server = sh.random;
        self.version = Some(version);
        self.suite = Some(suite);
        self.ctx = CodecContext {
            version,
            key_exchange: Some(suite.key_exchange),
            group: None,
        };
        self.transcript.update(raw);
        self.state = HandshakeState::WaitServerFlight;
        debug!(%version, suite = suite.name, ems = self.extended_master_secret, "ServerHello accepted");
        Ok(Vec::new())
    }

    fn require_suite(&self) -> Result<&'static CipherSuiteInfo, TlsError> {
        self.suite
            .ok_or_else(|| TlsError::UnexpectedMessage("no ServerHello yet".into()))
    }

    fn process_certificate(
        &mut self,
        raw: &[u8],
        cert: CertificateMsg,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let suite = self.require_suite()?;
        if !suite.key_exchange.requires_server_certificate() {
            return Err(TlsError::UnexpectedMessage(format!(
                "Certificate with {:?} key exchange",
                suite.key_exchange
            )));
        }
        if cert.certificate_list.is_empty() {
            return Err(TlsError::CertificateRejected("empty server certificate".into()));
        }
        let key = if self.config.verify_peer {
            let validator = self.config.validator();
            validate_chain(&*validator, &cert.certificate_list, self.config.peer_label())?
        } else {
            PeerPublicKey::from_spki_der(&cert.certificate_list[0]).ok()
        };
        if let Some(key) = &key {
            let fits = match suite.auth {
                AuthAlg::Rsa => key.is_rsa(),
                AuthAlg::Ecdsa => !key.is_rsa(),
                _ => true,
            };
            if !fits {
                return Err(TlsError::CertificateRejected(format!(
                    "{key:?} cannot authenticate {}",
                    suite.name
                )));
            }
        }
        debug!(len = cert.certificate_list.len(), "server certificate accepted");
        self.server_key = key;
        self.server_certs = cert.certificate_list;
        self.transcript.update(raw);
        Ok(Vec::new())
    }

    fn process_server_key_exchange(
        &mut self,
        raw: &[u8],
        ske: ServerKeyExchange,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let suite = self.require_suite()?;
        if suite.key_exchange.requires_server_certificate() && self.server_certs.is_empty() {
            return Err(TlsError::UnexpectedMessage(
                "ServerKeyExchange without Certificate".into(),
            ));
        }
        if is_signed_key_exchange(suite.key_exchange) && self.config.verify_peer {
            let key = self.server_key.as_ref().ok_or_else(|| {
                TlsError::CertificateRejected("no usable server public key".into())
            })?;
            let DigitallySigned { scheme, signature } = ske
                .signature
                .as_ref()
                .ok_or_else(|| TlsError::DecodeError("unsigned ServerKeyExchange".into()))?;
            if let Some(s) = scheme {
                if !self.config.signature_algorithms.contains(s) {
                    return Err(TlsError::IllegalParameter(format!(
                        "server signed with unoffered scheme {:#06x}",
                        s.0
                    )));
                }
            }
            let signed = build_ske_signed_data(
                &self.randoms.client,
                &self.randoms.server,
                &ske.params.encode(),
            );
            verify(key, *scheme, &signed, signature)?;
            debug!("ServerKeyExchange signature verified");
        }
        self.server_kx = Some(ske.params);
        self.transcript.update(raw);
        Ok(Vec::new())
    }

    fn process_certificate_request(
        &mut self,
        raw: &[u8],
        cr: CertificateRequest,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let suite = self.require_suite()?;
        if matches!(suite.auth, AuthAlg::Anonymous | AuthAlg::Psk) {
            return Err(TlsError::UnexpectedMessage(format!(
                "CertificateRequest with {}",
                suite.name
            )));
        }
        self.cert_request = Some(cr);
        self.transcript.update(raw);
        Ok(Vec::new())
    }

    /// Everything the key exchange needs from the server flight.
    fn key_exchange_group(&self) -> Result<(Option<KxGroup>, Vec<u8>), TlsError> {
        let Some(params) = &self.server_kx else {
            return Ok((None, Vec::new()));
        };
        let named = |group: NamedGroup, public: &[u8]| {
            if !group.is_supported() || !self.config.supported_groups.contains(&group) {
                return Err(TlsError::HandshakeFailed(format!(
                    "server picked group {}",
                    group.name()
                )));
            }
            Ok((Some(KxGroup::Named(group)), public.to_vec()))
        };
        let ffdhe = |p: &[u8], g: &[u8], public: &[u8]| {
            let params = DhParams::new(p.to_vec(), g.to_vec())?;
            Ok((Some(KxGroup::Ffdhe(params)), public.to_vec()))
        };
        match params {
            ServerKeyExchangeParams::Dh { p, g, public }
            | ServerKeyExchangeParams::DhePsk { p, g, public, .. } => ffdhe(p, g, public),
            ServerKeyExchangeParams::Ecdh { group, public }
            | ServerKeyExchangeParams::EcdhePsk { group, public, .. } => named(*group, public),
            ServerKeyExchangeParams::PskHint { .. } => Ok((None, Vec::new())),
        }
    }

    fn process_server_hello_done(&mut self, raw: &[u8]) -> Result<Vec<HandshakeOutput>, TlsError> {
        let suite = self.require_suite()?;
        let version = self.version.ok_or(TlsError::UnsupportedVersion)?;
        let kind = suite.key_exchange;
        if kind.requires_server_certificate() && self.server_certs.is_empty() {
            return Err(TlsError::UnexpectedMessage(
                "ServerHelloDone without Certificate".into(),
            ));
        }
        if kind.server_key_exchange() == ServerKeyExchangeRule::Required && self.server_kx.is_none()
        {
            return Err(TlsError::UnexpectedMessage(
                "ServerHelloDone without ServerKeyExchange".into(),
            ));
        }
        self.transcript.update(raw);
        let mut out = Vec::new();

        // Client Certificate, possibly empty, when asked for one.
        let mut client_chain = Vec::new();
        if self.cert_request.is_some() {
            client_chain = self.config.local_chain();
            let msg = encode_certificate(&CertificateMsg {
                certificate_list: client_chain.clone(),
            });
            self.flow.check(TlsRole::Client, FlowMessage::Certificate)?;
            self.transcript.update(&msg);
            out.push(HandshakeOutput::Send(msg));
        }

        // ClientKeyExchange.
        let (group, server_public) = self.key_exchange_group()?;
        self.group = match &group {
            Some(KxGroup::Named(g)) => Some(*g),
            _ => None,
        };
        let rsa_public = match (&self.server_key, kind) {
            (Some(PeerPublicKey::Rsa(k)), _) => Some(k),
            (_, KeyExchangeKind::Rsa | KeyExchangeKind::RsaExport | KeyExchangeKind::RsaPsk) => {
                return Err(TlsError::CertificateRejected(
                    "RSA key exchange needs an RSA server key".into(),
                ))
            }
            _ => None,
        };
        let mut kx = KeyExchange::new_local(
            kind,
            TlsRole::Client,
            KxInputs {
                group,
                rsa_public,
                rsa_private: None,
                client_version: self.offered_version.wire(),
                psk: self.config.psk.as_deref().map(Vec::as_slice),
            },
        )?;
        if !server_public.is_empty() {
            kx.decode_remote(&server_public)?;
        }
        let pre_master = kx.shared_secret()?;
        let public = kx.local_material().to_vec();
        let identity = self.config.psk_identity.clone().unwrap_or_default();
        let cke = match kind {
            KeyExchangeKind::Rsa | KeyExchangeKind::RsaExport => ClientKeyExchange::Rsa {
                encrypted_pms: public,
            },
            KeyExchangeKind::Dhe | KeyExchangeKind::DhAnon => ClientKeyExchange::Dh { public },
            KeyExchangeKind::Ecdhe | KeyExchangeKind::EcdhAnon => {
                ClientKeyExchange::Ecdh { public }
            }
            KeyExchangeKind::Psk => ClientKeyExchange::Psk { identity },
            KeyExchangeKind::DhePsk => ClientKeyExchange::DhePsk { identity, public },
            KeyExchangeKind::EcdhePsk => ClientKeyExchange::EcdhePsk { identity, public },
            KeyExchangeKind::RsaPsk => ClientKeyExchange::RsaPsk {
                identity,
                encrypted_pms: public,
            },
            KeyExchangeKind::Null => ClientKeyExchange::Empty,
            other => {
                return Err(TlsError::HandshakeFailed(format!(
                    "{other:?} key exchange is not supported"
                )))
            }
        };
        let msg = encode_client_key_exchange(&cke, version);
        self.flow.check(TlsRole::Client, FlowMessage::ClientKeyExchange)?;
        self.transcript.update(&msg);
        out.push(HandshakeOutput::Send(msg));

        let hash = self
            .extended_master_secret
            .then(|| session_hash(version, suite, &self.transcript));
        let schedule = KeySchedule::derive_master_secret(
            version,
            suite,
            &pre_master,
            &self.randoms,
            hash.as_deref(),
        )?;

        // CertificateVerify proves possession of the client key.
        if let (Some(cr), Some(key), false) = (
            &self.cert_request,
            &self.config.private_key,
            client_chain.is_empty(),
        ) {
            let rsa = key.as_rsa().is_some();
            let scheme = select_signature_scheme(key, &cr.signature_algorithms, version)?;
            let digest = certificate_verify_digest(&schedule, scheme, rsa, &self.transcript)?;
            let signature = sign_digest(key, scheme, &digest)?;
            let msg = encode_certificate_verify(&CertificateVerify {
                signature: DigitallySigned { scheme, signature },
            });
            self.flow.check(TlsRole::Client, FlowMessage::CertificateVerify)?;
            self.transcript.update(&msg);
            out.push(HandshakeOutput::Send(msg));
        }

        let (write, read) = derive_record_ciphers(&schedule, &self.randoms, TlsRole::Client)?;
        self.pending_read = Some(read);
        self.flow.check(TlsRole::Client, FlowMessage::ChangeCipherSpec)?;
        out.push(HandshakeOutput::SendChangeCipherSpec);
        out.push(HandshakeOutput::ActivateWrite(write));

        let verify_data = schedule.compute_verify_data(TlsRole::Client, &self.transcript)?;
        let msg = encode_finished(&Finished {
            verify_data: verify_data.clone(),
        });
        self.flow.check(TlsRole::Client, FlowMessage::Finished)?;
        self.transcript.update(&msg);
        out.push(HandshakeOutput::Send(msg));

        self.client_verify_data = verify_data;
        self.schedule = Some(schedule);
        self.state = HandshakeState::WaitChangeCipherSpec;
        debug!(messages = out.len(), "client flight ready");
        Ok(out)
    }

    fn process_change_cipher_spec(&mut self) -> Result<Vec<HandshakeOutput>, TlsError> {
        self.flow.check(TlsRole::Server, FlowMessage::ChangeCipherSpec)?;
        let read = self.pending_read.take().ok_or_else(|| {
            TlsError::UnexpectedMessage("ChangeCipherSpec before key exchange".into())
        })?;
        self.state = HandshakeState::WaitFinished;
        Ok(vec![HandshakeOutput::ActivateRead(read)])
    }

    fn process_finished(
        &mut self,
        raw: &[u8],
        fin: &Finished,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let schedule = self
            .schedule
            .as_ref()
            .ok_or_else(|| TlsError::UnexpectedMessage("Finished before key exchange".into()))?;
        let expected = schedule.compute_verify_data(TlsRole::Server, &self.transcript)?;
        if !bool::from(expected.ct_eq(&fin.verify_data)) {
            return Err(TlsError::DecryptError("server Finished mismatch".into()));
        }
        self.transcript.update(raw);
        self.server_verify_data = expected;
        self.state = HandshakeState::Established;
        debug!("handshake complete");
        Ok(vec![HandshakeOutput::Complete])
    }
}

/// Highest stream version in the configured range this engine can run.
fn highest_version(config: &TlsConfig) -> Option<TlsVersion> {
    STREAM_VERSIONS
        .iter()
        .rev()
        .copied()
        .find(|v| config.allows_version(*v))
}

/// Padding extension body length that lifts a ClientHello of `len` bytes
/// (handshake header included) to 512.
fn hello_padding_len(len: usize) -> Option<usize> {
    if !(256..512).contains(&len) {
        return None;
    }
    let gap = 512 - len;
    // The extension's own 4-byte header counts toward the gap.
    Some(if gap >= 5 { gap - 4 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handshake::codec::{decode_client_hello, encode_server_hello};
    use crate::handshake::codec_kx::encode_client_key_exchange;

    fn config() -> TlsConfig {
        TlsConfig::builder()
            .cipher_suites(&[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256])
            .verify_peer(false)
            .build()
    }

    fn server_hello(suite: CipherSuite, version: u16, extensions: Vec<Extension>) -> Vec<u8> {
        encode_server_hello(&ServerHello {
            legacy_version: version,
            random: [0x22; 32],
            session_id: vec![],
            cipher_suite: suite,
            compression_method: 0,
            extensions,
        })
    }

    fn started(config: TlsConfig) -> (ClientHandshake, ClientHello) {
        let mut hs = ClientHandshake::new(config);
        let msg = hs.build_client_hello().unwrap();
        let (_, body, _) = parse_handshake_header(&msg).unwrap();
        (hs, decode_client_hello(body).unwrap())
    }

    #[test]
    fn test_client_hello_contents() {
        let config = TlsConfig::builder()
            .server_name("example.com")
            .alpn(&[b"h2".as_slice()])
            .grease(true)
            .max_fragment_size(2048)
            .build();
        let (hs, ch) = started(config);
        assert_eq!(hs.state(), HandshakeState::WaitServerHello);
        assert_eq!(ch.legacy_version, 0x0303);
        assert_eq!(ch.compression_methods, vec![0]);
        assert!(crate::suites::is_grease(ch.cipher_suites[0].0));
        assert_eq!(ch.session_id.len(), 32);
        let exts = DecoderChain::standard().decode_all(&ch.extensions).unwrap();
        assert!(exts.contains(&ParsedExtension::ServerName("example.com".into())));
        assert!(exts.contains(&ParsedExtension::Alpn(vec![b"h2".to_vec()])));
        assert!(exts.contains(&ParsedExtension::MaxFragmentLength(MaxFragmentLength::Bytes2048)));
        assert!(exts.contains(&ParsedExtension::Empty(ExtensionType::EXTENDED_MASTER_SECRET)));
        assert!(exts.iter().any(|e| e.extension_type().is_grease()));
        assert_eq!(hs.transcript().message_count(), 1);
    }

    #[test]
    fn test_hello_padding_len() {
        assert_eq!(hello_padding_len(255), None);
        assert_eq!(hello_padding_len(256), Some(252));
        assert_eq!(hello_padding_len(500), Some(8));
        assert_eq!(hello_padding_len(508), Some(1));
        assert_eq!(hello_padding_len(511), Some(1));
        assert_eq!(hello_padding_len(512), None);
    }

    #[test]
    fn test_client_hello_padded_to_512() {
        let host = "h".repeat(200);
        let build = |pad: bool| {
            let config = TlsConfig::builder()
                .cipher_suites(&[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256])
                .server_name(host.as_str())
                .client_hello_padding(pad)
                .build();
            ClientHandshake::new(config).build_client_hello().unwrap()
        };
        let plain = build(false);
        assert!((256..512).contains(&plain.len()), "{}", plain.len());
        let padded = build(true);
        assert_eq!(padded.len(), 512);
        let (_, body, _) = parse_handshake_header(&padded).unwrap();
        let ch = decode_client_hello(body).unwrap();
        let exts = DecoderChain::standard().decode_all(&ch.extensions).unwrap();
        assert!(matches!(exts.last(), Some(ParsedExtension::Padding(n)) if *n > 0));
    }

    #[test]
    fn test_small_client_hello_not_padded() {
        let config = TlsConfig::builder()
            .cipher_suites(&[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256])
            .client_hello_padding(true)
            .build();
        let (_, ch) = started(config);
        let exts = DecoderChain::standard().decode_all(&ch.extensions).unwrap();
        assert!(crate::extensions::find(&exts, ExtensionType::PADDING).is_none());
    }

    #[test]
    fn test_client_hello_skips_unusable_suites() {
        let config = TlsConfig::builder()
            .cipher_suites(&[
                CipherSuite::TLS_PSK_WITH_AES_128_CBC_SHA,
                CipherSuite::TLS_AES_128_GCM_SHA256,
                CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            ])
            .build();
        let (_, ch) = started(config);
        assert_eq!(ch.cipher_suites, vec![CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA]);

        let mut hs = ClientHandshake::new(
            TlsConfig::builder()
                .cipher_suites(&[CipherSuite::TLS_PSK_WITH_AES_128_CBC_SHA])
                .build(),
        );
        assert!(matches!(hs.build_client_hello(), Err(TlsError::NoSharedCipherSuite)));
    }

    #[test]
    fn test_ssl3_hello_has_no_extensions() {
        let config = TlsConfig::builder()
            .min_version(TlsVersion::Ssl30)
            .max_version(TlsVersion::Ssl30)
            .cipher_suites(&[CipherSuite::TLS_RSA_WITH_3DES_EDE_CBC_SHA])
            .build();
        let (_, ch) = started(config);
        assert_eq!(ch.legacy_version, 0x0300);
        assert!(ch.extensions.is_empty());
    }

    #[test]
    fn test_server_hello_negotiates() {
        let (mut hs, _) = started(config());
        let sh = server_hello(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256, 0x0303, vec![]);
        assert!(hs.handle(Incoming::Handshake(&sh)).unwrap().is_empty());
        assert_eq!(hs.version(), Some(TlsVersion::Tls12));
        assert_eq!(hs.suite().unwrap().suite, CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256);
        assert_eq!(hs.state(), HandshakeState::WaitServerFlight);
    }

    #[test]
    fn test_server_hello_with_unoffered_suite() {
        let (mut hs, _) = started(config());
        let sh = server_hello(CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA, 0x0303, vec![]);
        assert!(matches!(
            hs.handle(Incoming::Handshake(&sh)),
            Err(TlsError::NoSharedCipherSuite)
        ));
        let (mut hs, _) = started(config());
        let sh = server_hello(CipherSuite(0x2A2A), 0x0303, vec![]);
        assert!(hs.handle(Incoming::Handshake(&sh)).is_err());
    }

    #[test]
    fn test_tls13_server_hello_refused() {
        let (mut hs, _) = started(config());
        let sh = server_hello(
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256,
            0x0303,
            vec![ParsedExtension::SelectedVersion(0x0304).encode()],
        );
        assert!(matches!(
            hs.handle(Incoming::Handshake(&sh)),
            Err(TlsError::UnsupportedVersion)
        ));
        let (mut hs, _) = started(config());
        let sh = server_hello(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256, 0x0304, vec![]);
        assert!(matches!(
            hs.handle(Incoming::Handshake(&sh)),
            Err(TlsError::UnsupportedVersion)
        ));
    }

    #[test]
    fn test_unsolicited_extension_rejected() {
        let config = TlsConfig::builder()
            .cipher_suites(&[CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256])
            .enable_extended_master_secret(false)
            .build();
        let (mut hs, _) = started(config);
        let sh = server_hello(
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256,
            0x0303,
            vec![ParsedExtension::Empty(ExtensionType::EXTENDED_MASTER_SECRET).encode()],
        );
        assert!(matches!(
            hs.handle(Incoming::Handshake(&sh)),
            Err(TlsError::IllegalParameter(_))
        ));
    }

    #[test]
    fn test_out_of_order_server_messages() {
        let (mut hs, _) = started(config());
        let shd = crate::handshake::codec::wrap_handshake(HandshakeType::ServerHelloDone, &[]);
        assert!(matches!(
            hs.handle(Incoming::Handshake(&shd)),
            Err(TlsError::UnexpectedMessage(_))
        ));
        assert!(matches!(
            hs.handle(Incoming::ChangeCipherSpec),
            Err(TlsError::UnexpectedMessage(_))
        ));
        let cke = encode_client_key_exchange(&ClientKeyExchange::Empty, TlsVersion::Tls12);
        assert!(matches!(
            hs.handle(Incoming::Handshake(&cke)),
            Err(TlsError::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn test_server_hello_done_without_certificate() {
        let (mut hs, _) = started(config());
        let sh = server_hello(CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA256, 0x0303, vec![]);
        hs.handle(Incoming::Handshake(&sh)).unwrap();
        let shd = crate::handshake::codec::wrap_handshake(HandshakeType::ServerHelloDone, &[]);
        assert!(matches!(
            hs.handle(Incoming::Handshake(&shd)),
            Err(TlsError::UnexpectedMessage(_))
        ));
    }

    #[test]
    fn test_hello_request_ignored() {
        let (mut hs, _) = started(config());
        let hr = crate::handshake::codec::wrap_handshake(HandshakeType::HelloRequest, &[]);
        assert!(hs.handle(Incoming::Handshake(&hr)).unwrap().is_empty());
        assert_eq!(hs.transcript().message_count(), 1);
    }

    #[test]
    fn test_unsupported_server_group_is_handshake_failure() {
        use crate::alert::AlertDescription;
        use crate::handshake::codec_kx::encode_server_key_exchange;

        let suite = CipherSuite::TLS_ECDH_anon_WITH_3DES_EDE_CBC_SHA;
        let (mut hs, _) = started(
            TlsConfig::builder()
                .cipher_suites(&[suite])
                .verify_peer(false)
                .build(),
        );
        hs.handle(Incoming::Handshake(&server_hello(suite, 0x0303, vec![])))
            .unwrap();
        let ske = encode_server_key_exchange(&ServerKeyExchange {
            params: ServerKeyExchangeParams::Ecdh {
                group: NamedGroup::SECP521R1,
                public: vec![0x04; 133],
            },
            signature: None,
        });
        hs.handle(Incoming::Handshake(&ske)).unwrap();
        let shd = crate::handshake::codec::wrap_handshake(HandshakeType::ServerHelloDone, &[]);
        let err = hs.handle(Incoming::Handshake(&shd)).unwrap_err();
        assert!(matches!(err, TlsError::HandshakeFailed(_)));
        assert_eq!(
            AlertDescription::for_error(&err),
            Some(AlertDescription::HandshakeFailure)
        );
    }
}
