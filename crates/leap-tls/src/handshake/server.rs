//! Server handshake state machine, SSL 3.0 through TLS 1.2.
//!
//! The whole server flight (ServerHello through ServerHelloDone) is built in
//! one step when the ClientHello arrives. Cipher state for both directions is
//! derived as soon as ClientKeyExchange is absorbed; the write side is held
//! back until the client's Finished verifies.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::codec::{
    encode_certificate, encode_finished, encode_server_hello, parse_handshake_header,
    wrap_handshake, CertificateMsg, ClientHello, Finished, ServerHello,
};
use super::codec_kx::{
    build_ske_signed_data, encode_certificate_request, encode_server_key_exchange,
    is_signed_key_exchange, CertificateRequest, CertificateVerify, ClientKeyExchange,
    DigitallySigned, ServerKeyExchange, ServerKeyExchangeParams, CERT_TYPE_ECDSA_SIGN,
    CERT_TYPE_RSA_SIGN,
};
use super::key_exchange::{KeyExchange, KxGroup, KxInputs};
use super::ordering::{FlowMessage, MessageFlow};
use super::signing::{certificate_verify_digest, select_signature_scheme, sign, verify_digest};
use super::{
    derive_record_ciphers, random32, HandshakeOutput, HandshakeState, HandshakeType, Incoming,
    NegotiatedParams,
};
use crate::cert::{validate_chain, PeerPublicKey};
use crate::config::TlsConfig;
use crate::crypt::key_schedule::{session_hash, KeySchedule, Randoms};
use crate::crypt::transcript::TranscriptHash;
use crate::crypt::{NamedGroup, SignatureScheme};
use crate::extensions::{find, DecoderChain, ExtensionType, ParsedExtension};
use crate::message::{CodecContext, HandshakeMessage};
use crate::record::RecordCipher;
use crate::suites::{
    negotiate_as_server, AuthAlg, CipherSuiteInfo, KeyExchangeKind, ServerKeyExchangeRule,
};
use crate::{CipherSuite, TlsError, TlsRole, TlsVersion};
use zeroize::Zeroizing;

const STREAM_VERSIONS: [TlsVersion; 4] = [
    TlsVersion::Ssl30,
    TlsVersion::Tls10,
    TlsVersion::Tls11,
    TlsVersion::Tls12,
];

/// Server side of the handshake.
pub struct ServerHandshake {
    config: TlsConfig,
    state: HandshakeState,
    flow: MessageFlow,
    transcript: TranscriptHash,
    ctx: CodecContext,
    decoders: DecoderChain,
    randoms: Randoms,
    version: Option<TlsVersion>,
    suite: Option<&'static CipherSuiteInfo>,
    extended_master_secret: bool,
    alpn: Option<Vec<u8>>,
    max_fragment_length: Option<usize>,
    server_name: Option<String>,
    group: Option<NamedGroup>,
    kx: Option<KeyExchange>,
    cert_requested: bool,
    client_certs: Vec<Vec<u8>>,
    client_key: Option<PeerPublicKey>,
    client_verified: bool,
    schedule: Option<KeySchedule>,
    pending_read: Option<RecordCipher>,
    pending_write: Option<RecordCipher>,
    client_verify_data: Vec<u8>,
    server_verify_data: Vec<u8>,
}

impl ServerHandshake {
    pub fn new(config: TlsConfig) -> Self {
        Self {
            config,
            state: HandshakeState::WaitClientHello,
            flow: MessageFlow::new(),
            transcript: TranscriptHash::new(),
            ctx: CodecContext::new(TlsVersion::Tls12),
            decoders: DecoderChain::standard(),
            randoms: Randoms {
                client: [0; 32],
                server: [0; 32],
            },
            version: None,
            suite: None,
            extended_master_secret: false,
            alpn: None,
            max_fragment_length: None,
            server_name: None,
            group: None,
            kx: None,
            cert_requested: false,
            client_certs: Vec::new(),
            client_key: None,
            client_verified: false,
            schedule: None,
            pending_read: None,
            pending_write: None,
            client_verify_data: Vec::new(),
            server_verify_data: Vec::new(),
        }
    }

    /// Replace the extension decoder chain used for ClientHello.
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

    pub fn version(&self) -> Option<TlsVersion> {
        self.version
    }

    pub fn suite(&self) -> Option<&'static CipherSuiteInfo> {
        self.suite
    }

    pub fn max_fragment_length(&self) -> Option<usize> {
        self.max_fragment_length
    }

    /// Host name the client asked for through SNI.
    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    /// Whether a key schedule has been derived.
    pub fn has_key_schedule(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn transcript(&self) -> &TranscriptHash {
        &self.transcript
    }

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
            peer_certificates: self.client_certs.clone(),
            client_verify_data: self.client_verify_data.clone(),
            server_verify_data: self.server_verify_data.clone(),
        })
    }

    /// Feed one handshake message or ChangeCipherSpec from the client.
    pub fn handle(&mut self, input: Incoming<'_>) -> Result<Vec<HandshakeOutput>, TlsError> {
        let raw = match input {
            Incoming::ChangeCipherSpec => return self.process_change_cipher_spec(),
            Incoming::Handshake(raw) => raw,
        };
        let (msg_type, body, _) = parse_handshake_header(raw)?;
        let flow_msg = FlowMessage::from_handshake_type(msg_type).ok_or_else(|| {
            TlsError::UnexpectedMessage(format!("{msg_type:?} from client"))
        })?;
        self.flow.check(TlsRole::Client, flow_msg)?;
        match HandshakeMessage::decode_handshake(msg_type, body, &self.ctx)? {
            HandshakeMessage::ClientHello(ch) => self.process_client_hello(raw, &ch),
            HandshakeMessage::Certificate(cert) => self.process_certificate(raw, cert),
            HandshakeMessage::ClientKeyExchange(cke) => self.process_client_key_exchange(raw, cke),
            HandshakeMessage::CertificateVerify(cv) => self.process_certificate_verify(raw, &cv),
            HandshakeMessage::Finished(fin) => self.process_finished(raw, &fin),
            _ => Err(TlsError::UnexpectedMessage(format!("{msg_type:?} from client"))),
        }
    }

    /// Whether a suite can run with what this server has configured.
    fn usable(&self, info: &CipherSuiteInfo, group: Option<NamedGroup>) -> bool {
        let config = &self.config;
        let kind = info.key_exchange;
        if kind.requires_server_certificate() {
            let has_key = config
                .private_key
                .as_ref()
                .is_some_and(|k| k.fits(info.auth));
            if !has_key || config.local_chain().is_empty() {
                return false;
            }
        }
        if kind.is_ffdh() && config.dh_params.is_none() {
            return false;
        }
        if kind.is_ecdh() && group.is_none() {
            return false;
        }
        if kind.is_psk() && config.psk.is_none() && config.psk_server_callback.is_none() {
            return false;
        }
        kind.is_supported()
    }

    fn process_client_hello(
        &mut self,
        raw: &[u8],
        ch: &ClientHello,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let version = STREAM_VERSIONS
            .iter()
            .rev()
            .copied()
            .find(|v| self.config.allows_version(*v) && v.wire() <= ch.legacy_version)
            .ok_or(TlsError::UnsupportedVersion)?;
        if !ch.compression_methods.contains(&0) {
            return Err(TlsError::IllegalParameter(
                "null compression not offered".into(),
            ));
        }
        let exts = self.decoders.decode_all(&ch.extensions)?;

        // RFC 4492: no supported_groups means any curve will do.
        let client_groups = match find(&exts, ExtensionType::SUPPORTED_GROUPS) {
            Some(ParsedExtension::SupportedGroups(groups)) => Some(groups.clone()),
            _ => None,
        };
        let group = self.config.supported_groups.iter().copied().find(|g| {
            g.is_supported()
                && !g.is_ffdhe()
                && client_groups.as_ref().map_or(true, |c| c.contains(g))
        });
        let client_schemes = match find(&exts, ExtensionType::SIGNATURE_ALGORITHMS) {
            Some(ParsedExtension::SignatureAlgorithms(s)) => s.clone(),
            _ => Vec::new(),
        };

        let suite = negotiate_as_server(
            &self.config.cipher_suites,
            &ch.cipher_suites,
            version,
            |info| self.usable(info, group),
        )?;
        let kind = suite.key_exchange;

        self.randoms = Randoms {
            client: ch.random,
            server: random32()?,
        };
        self.transcript.update(raw);
        self.version = Some(version);
        self.suite = Some(suite);
        if kind.is_ecdh() {
            self.group = group;
        }
        self.ctx = CodecContext {
            version,
            key_exchange: Some(kind),
            group: self.group,
        };

        let extensions = if version == TlsVersion::Ssl30 {
            Vec::new()
        } else {
            self.server_hello_extensions(&exts, &ch.cipher_suites, kind)?
                .iter()
                .map(ParsedExtension::encode)
                .collect()
        };
        let mut out = Vec::new();
        let sh = encode_server_hello(&ServerHello {
            legacy_version: version.wire(),
            random: self.randoms.server,
            session_id: random32()?.to_vec(),
            cipher_suite: suite.suite,
            compression_method: 0,
            extensions,
        });
        self.push(&mut out, FlowMessage::ServerHello, sh)?;

        if kind.requires_server_certificate() {
            let msg = encode_certificate(&CertificateMsg {
                certificate_list: self.config.local_chain(),
            });
            self.push(&mut out, FlowMessage::Certificate, msg)?;
        }

        let (kx, params) = self.local_key_exchange(kind, ch.legacy_version)?;
        self.kx = Some(kx);
        if let Some(params) = params {
            let signature = if is_signed_key_exchange(kind) {
                Some(self.sign_params(&params, &client_schemes, version)?)
            } else {
                None
            };
            let msg = encode_server_key_exchange(&ServerKeyExchange { params, signature });
            self.push(&mut out, FlowMessage::ServerKeyExchange, msg)?;
        }

        if self.config.request_client_cert && !matches!(suite.auth, AuthAlg::Anonymous | AuthAlg::Psk)
        {
            let cr = CertificateRequest {
                certificate_types: vec![CERT_TYPE_RSA_SIGN, CERT_TYPE_ECDSA_SIGN],
                signature_algorithms: self.config.signature_algorithms.clone(),
                authorities: Vec::new(),
            };
            let msg = encode_certificate_request(&cr, version);
            self.push(&mut out, FlowMessage::CertificateRequest, msg)?;
            self.cert_requested = true;
        }

        let done = wrap_handshake(HandshakeType::ServerHelloDone, &[]);
        self.push(&mut out, FlowMessage::ServerHelloDone, done)?;
        self.state = HandshakeState::WaitClientFlight;
        debug!(
            %version,
            suite = suite.name,
            ems = self.extended_master_secret,
            messages = out.len(),
            "server flight ready"
        );
        Ok(out)
    }

    /// Record a server message in the flow and transcript and queue it.
    fn push(
        &mut self,
        out: &mut Vec<HandshakeOutput>,
        msg_kind: FlowMessage,
        msg: Vec<u8>,
    ) -> Result<(), TlsError> {
        self.flow.check(TlsRole::Server, msg_kind)?;
        self.transcript.update(&msg);
        out.push(HandshakeOutput::Send(msg));
        Ok(())
    }

    fn server_hello_extensions(
        &mut self,
        exts: &[ParsedExtension],
        offered: &[CipherSuite],
        kind: KeyExchangeKind,
    ) -> Result<Vec<ParsedExtension>, TlsError> {
        let mut reply = Vec::new();
        for ext in exts {
            match ext {
                ParsedExtension::ServerName(name) => {
                    self.server_name = Some(name.clone());
                    reply.push(ParsedExtension::Empty(ExtensionType::SERVER_NAME));
                }
                ParsedExtension::MaxFragmentLength(code) => {
                    self.max_fragment_length = Some(code.bytes());
                    reply.push(ParsedExtension::MaxFragmentLength(*code));
                }
                ParsedExtension::Alpn(protocols) if !self.config.alpn_protocols.is_empty() => {
                    let chosen = self
                        .config
                        .alpn_protocols
                        .iter()
                        .find(|p| protocols.contains(p))
                        .ok_or_else(|| {
                            TlsError::HandshakeFailed("no common application protocol".into())
                        })?;
                    self.alpn = Some(chosen.clone());
                    reply.push(ParsedExtension::Alpn(vec![chosen.clone()]));
                }
                ParsedExtension::EcPointFormats(_) if kind.is_ecdh() => {
                    reply.push(ParsedExtension::EcPointFormats(vec![0]));
                }
                ParsedExtension::Empty(t)
                    if *t == ExtensionType::EXTENDED_MASTER_SECRET
                        && self.config.enable_extended_master_secret =>
                {
                    self.extended_master_secret = true;
                    reply.push(ParsedExtension::Empty(ExtensionType::EXTENDED_MASTER_SECRET));
                }
                ParsedExtension::RenegotiationInfo(info) => {
                    if !info.is_empty() {
                        return Err(TlsError::HandshakeFailed(
                            "renegotiation is not supported".into(),
                        ));
                    }
                }
                _ => {}
            }
        }
        let secure_renegotiation = find(exts, ExtensionType::RENEGOTIATION_INFO).is_some()
            || offered.contains(&CipherSuite::TLS_EMPTY_RENEGOTIATION_INFO_SCSV);
        if secure_renegotiation {
            reply.push(ParsedExtension::RenegotiationInfo(Vec::new()));
        }
        Ok(reply)
    }

    /// Prepare the server's key-exchange share and the ServerKeyExchange
    /// parameters, if this key exchange sends any.
    fn local_key_exchange(
        &self,
        kind: KeyExchangeKind,
        client_version: u16,
    ) -> Result<(KeyExchange, Option<ServerKeyExchangeParams>), TlsError> {
        let config = &self.config;
        let group = if kind.is_ffdh() {
            config.dh_params.clone().map(KxGroup::Ffdhe)
        } else if kind.is_ecdh() {
            self.group.map(KxGroup::Named)
        } else {
            None
        };
        let rsa_private = config.private_key.as_ref().and_then(|k| k.as_rsa());
        let kx = KeyExchange::new_local(
            kind,
            TlsRole::Server,
            KxInputs {
                group: group.clone(),
                rsa_public: None,
                rsa_private,
                client_version,
                psk: None,
            },
        )?;
        let public = kx.local_material().to_vec();
        let hint = config.psk_identity_hint.clone();
        let params = match (kind, group) {
            (KeyExchangeKind::Dhe | KeyExchangeKind::DhAnon, Some(KxGroup::Ffdhe(dh))) => {
                Some(ServerKeyExchangeParams::Dh {
                    p: dh.p,
                    g: dh.g,
                    public,
                })
            }
            (KeyExchangeKind::Ecdhe | KeyExchangeKind::EcdhAnon, Some(KxGroup::Named(group))) => {
                Some(ServerKeyExchangeParams::Ecdh { group, public })
            }
            (KeyExchangeKind::DhePsk, Some(KxGroup::Ffdhe(dh))) => {
                Some(ServerKeyExchangeParams::DhePsk {
                    hint: hint.unwrap_or_default(),
                    p: dh.p,
                    g: dh.g,
                    public,
                })
            }
            (KeyExchangeKind::EcdhePsk, Some(KxGroup::Named(group))) => {
                Some(ServerKeyExchangeParams::EcdhePsk {
                    hint: hint.unwrap_or_default(),
                    group,
                    public,
                })
            }
            (KeyExchangeKind::Psk | KeyExchangeKind::RsaPsk, _) => {
                hint.map(|hint| ServerKeyExchangeParams::PskHint { hint })
            }
            _ => None,
        };
        if params.is_none() && kind.server_key_exchange() == ServerKeyExchangeRule::Required {
            return Err(TlsError::InternalError(format!(
                "no ServerKeyExchange parameters for {kind:?}"
            )));
        }
        Ok((kx, params))
    }

    fn sign_params(
        &self,
        params: &ServerKeyExchangeParams,
        client_schemes: &[SignatureScheme],
        version: TlsVersion,
    ) -> Result<DigitallySigned, TlsError> {
        let key = self
            .config
            .private_key
            .as_ref()
            .ok_or_else(|| TlsError::InternalError("no signing key".into()))?;
        let scheme = select_signature_scheme(key, client_schemes, version)?;
        let signed = build_ske_signed_data(
            &self.randoms.client,
            &self.randoms.server,
            &params.encode(),
        );
        let signature = sign(key, scheme, &signed)?;
        Ok(DigitallySigned { scheme, signature })
    }

    fn process_certificate(
        &mut self,
        raw: &[u8],
        cert: CertificateMsg,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        if !self.cert_requested {
            return Err(TlsError::UnexpectedMessage(
                "client Certificate was not requested".into(),
            ));
        }
        if cert.certificate_list.is_empty() {
            if self.config.require_client_cert {
                return Err(TlsError::CertificateRejected(
                    "client certificate required".into(),
                ));
            }
            debug!("client sent no certificate");
        } else {
            let key = if self.config.verify_peer {
                let validator = self.config.validator();
                validate_chain(&*validator, &cert.certificate_list, self.config.peer_label())?
            } else {
                PeerPublicKey::from_spki_der(&cert.certificate_list[0]).ok()
            };
            debug!(len = cert.certificate_list.len(), "client certificate accepted");
            self.client_key = key;
            self.client_certs = cert.certificate_list;
        }
        self.transcript.update(raw);
        Ok(Vec::new())
    }

    /// PSK for the identity the client named.
    fn lookup_psk(&self, identity: &[u8]) -> Result<Zeroizing<Vec<u8>>, TlsError> {
        if let Some(callback) = &self.config.psk_server_callback {
            if let Some(psk) = callback(identity) {
                return Ok(Zeroizing::new(psk));
            }
        }
        if let (Some(psk), Some(expected)) = (&self.config.psk, &self.config.psk_identity) {
            if bool::from(identity.ct_eq(expected.as_slice())) {
                return Ok(psk.clone());
            }
        }
        warn!(identity_len = identity.len(), "unknown PSK identity");
        Err(TlsError::DecryptError("unknown PSK identity".into()))
    }

    fn process_client_key_exchange(
        &mut self,
        raw: &[u8],
        cke: ClientKeyExchange,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let suite = self
            .suite
            .ok_or_else(|| TlsError::UnexpectedMessage("no ClientHello yet".into()))?;
        let version = self.version.ok_or(TlsError::UnsupportedVersion)?;
        if self.config.require_client_cert && self.cert_requested && self.client_certs.is_empty() {
            return Err(TlsError::CertificateRejected(
                "client certificate required".into(),
            ));
        }
        let mut kx = self
            .kx
            .take()
            .ok_or_else(|| TlsError::InternalError("key exchange not prepared".into()))?;

        let (identity, remote): (Option<&[u8]>, Option<&[u8]>) = match &cke {
            ClientKeyExchange::Rsa { encrypted_pms } => (None, Some(encrypted_pms)),
            ClientKeyExchange::Dh { public } | ClientKeyExchange::Ecdh { public } => {
                (None, Some(public))
            }
            ClientKeyExchange::Psk { identity } => (Some(identity), None),
            ClientKeyExchange::DhePsk { identity, public }
            | ClientKeyExchange::EcdhePsk { identity, public } => (Some(identity), Some(public)),
            ClientKeyExchange::RsaPsk {
                identity,
                encrypted_pms,
            } => (Some(identity), Some(encrypted_pms)),
            ClientKeyExchange::Empty => (None, None),
        };
        if let Some(identity) = identity {
            let psk = self.lookup_psk(identity)?;
            kx.set_psk(&psk)?;
        }
        if let Some(remote) = remote {
            kx.decode_remote(remote)?;
        }
        let pre_master = kx.shared_secret()?;
        self.transcript.update(raw);

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
        let (write, read) = derive_record_ciphers(&schedule, &self.randoms, TlsRole::Server)?;
        self.pending_write = Some(write);
        self.pending_read = Some(read);
        self.schedule = Some(schedule);
        self.state = HandshakeState::WaitChangeCipherSpec;
        debug!(kx = ?suite.key_exchange, "client key exchange absorbed");
        Ok(Vec::new())
    }

    fn process_certificate_verify(
        &mut self,
        raw: &[u8],
        cv: &CertificateVerify,
    ) -> Result<Vec<HandshakeOutput>, TlsError> {
        let key = self.client_key.as_ref().ok_or_else(|| {
            TlsError::UnexpectedMessage("CertificateVerify without a client key".into())
        })?;
        let schedule = self
            .schedule
            .as_ref()
            .ok_or_else(|| TlsError::UnexpectedMessage("CertificateVerify too early".into()))?;
        let DigitallySigned { scheme, signature } = &cv.signature;
        if let Some(s) = scheme {
            if !self.config.signature_algorithms.contains(s) {
                return Err(TlsError::IllegalParameter(format!(
                    "client signed with unrequested scheme {:#06x}",
                    s.0
                )));
            }
        }
        let digest = certificate_verify_digest(schedule, *scheme, key.is_rsa(), &self.transcript)?;
        verify_digest(key, *scheme, &digest, signature)?;
        self.transcript.update(raw);
        self.client_verified = true;
        debug!("client CertificateVerify verified");
        Ok(Vec::new())
    }

    fn process_change_cipher_spec(&mut self) -> Result<Vec<HandshakeOutput>, TlsError> {
        self.flow.check(TlsRole::Client, FlowMessage::ChangeCipherSpec)?;
        if self.client_key.is_some() && !self.client_verified {
            return Err(TlsError::UnexpectedMessage(
                "client certificate without CertificateVerify".into(),
            ));
        }
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
        let expected = schedule.compute_verify_data(TlsRole::Client, &self.transcript)?;
        if !bool::from(expected.ct_eq(&fin.verify_data)) {
            return Err(TlsError::DecryptError("client Finished mismatch".into()));
        }
        self.transcript.update(raw);

        let server_verify = schedule.compute_verify_data(TlsRole::Server, &self.transcript)?;
        let write = self
            .pending_write
            .take()
            .ok_or_else(|| TlsError::InternalError("write cipher missing".into()))?;
        let mut out = Vec::new();
        self.flow.check(TlsRole::Server, FlowMessage::ChangeCipherSpec)?;
        out.push(HandshakeOutput::SendChangeCipherSpec);
        out.push(HandshakeOutput::ActivateWrite(write));
        let msg = encode_finished(&Finished {
            verify_data: server_verify.clone(),
        });
        self.push(&mut out, FlowMessage::Finished, msg)?;
        out.push(HandshakeOutput::Complete);

        self.client_verify_data = expected;
        self.server_verify_data = server_verify;
        self.state = HandshakeState::Established;
        debug!("handshake complete");
        Ok(out)
    }
}
