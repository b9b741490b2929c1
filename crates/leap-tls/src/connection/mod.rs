//! Blocking TLS connections wrapping a [`Transport`](crate::transport::Transport).
//!
//! Provides `TlsClientConnection` and `TlsServerConnection` implementing the
//! [`TlsConnection`](crate::TlsConnection) trait. The protocol work lives in
//! [`ConnectionCore`], which never performs I/O; the connection types only
//! move bytes between it and the transport.

mod client;
mod server;

pub use client::TlsClientConnection;
pub use server::TlsServerConnection;

use tracing::{debug, trace, warn};

use crate::alert::{Alert, AlertDescription};
use crate::handshake::client::ClientHandshake;
use crate::handshake::reader::HandshakeReader;
use crate::handshake::server::ServerHandshake;
use crate::handshake::{HandshakeOutput, Incoming, NegotiatedParams};
use crate::record::{
    record_length, ContentType, RecordLayer, MAX_CIPHERTEXT_LENGTH, MAX_PLAINTEXT_LENGTH,
    RECORD_HEADER_LEN,
};
use crate::{TlsError, TlsVersion};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionState {
    Handshaking,
    Connected,
    Closed,
    Error,
}

/// The part of a handshake state machine a connection drives.
pub(crate) trait HandshakeDriver {
    /// Messages to send before anything is received.
    fn start(&mut self) -> Result<Vec<HandshakeOutput>, TlsError>;
    fn handle(&mut self, input: Incoming<'_>) -> Result<Vec<HandshakeOutput>, TlsError>;
    fn version(&self) -> Option<TlsVersion>;
    fn max_fragment_length(&self) -> Option<usize>;
    fn negotiated(&self) -> Option<NegotiatedParams>;
}

impl HandshakeDriver for ClientHandshake {
    fn start(&mut self) -> Result<Vec<HandshakeOutput>, TlsError> {
        Ok(vec![HandshakeOutput::Send(self.build_client_hello()?)])
    }

    fn handle(&mut self, input: Incoming<'_>) -> Result<Vec<HandshakeOutput>, TlsError> {
        ClientHandshake::handle(self, input)
    }

    fn version(&self) -> Option<TlsVersion> {
        ClientHandshake::version(self)
    }

    fn max_fragment_length(&self) -> Option<usize> {
        ClientHandshake::max_fragment_length(self)
    }

    fn negotiated(&self) -> Option<NegotiatedParams> {
        ClientHandshake::negotiated(self)
    }
}

impl HandshakeDriver for ServerHandshake {
    fn start(&mut self) -> Result<Vec<HandshakeOutput>, TlsError> {
        Ok(Vec::new())
    }

    fn handle(&mut self, input: Incoming<'_>) -> Result<Vec<HandshakeOutput>, TlsError> {
        ServerHandshake::handle(self, input)
    }

    fn version(&self) -> Option<TlsVersion> {
        ServerHandshake::version(self)
    }

    fn max_fragment_length(&self) -> Option<usize> {
        ServerHandshake::max_fragment_length(self)
    }

    fn negotiated(&self) -> Option<NegotiatedParams> {
        ServerHandshake::negotiated(self)
    }
}

/// Record-level protocol state shared by every connection flavour.
pub(crate) struct ConnectionCore<H> {
    pub(crate) hs: H,
    pub(crate) record_layer: RecordLayer,
    pub(crate) state: ConnectionState,
    /// Raw bytes read from the transport, not yet opened.
    pub(crate) read_buf: Vec<u8>,
    /// Sealed records waiting to be written.
    outbound: Vec<u8>,
    /// Decrypted application data not yet handed to the caller.
    app_data_buf: Vec<u8>,
    reader: HandshakeReader,
    /// Fragment limit from the local configuration.
    local_fragment_limit: usize,
    negotiated: Option<NegotiatedParams>,
    sent_close_notify: bool,
    received_close_notify: bool,
}

impl<H: HandshakeDriver> ConnectionCore<H> {
    pub(crate) fn new(hs: H, max_fragment_size: usize) -> Self {
        let mut record_layer = RecordLayer::new();
        record_layer.max_fragment_size = max_fragment_size;
        Self {
            hs,
            record_layer,
            state: ConnectionState::Handshaking,
            read_buf: Vec::with_capacity(16 * 1024),
            outbound: Vec::new(),
            app_data_buf: Vec::new(),
            reader: HandshakeReader::new(),
            local_fragment_limit: max_fragment_size,
            negotiated: None,
            sent_close_notify: false,
            received_close_notify: false,
        }
    }

    pub(crate) fn negotiated(&self) -> Option<&NegotiatedParams> {
        self.negotiated.as_ref()
    }

    pub(crate) fn peer_closed(&self) -> bool {
        self.received_close_notify
    }

    pub(crate) fn start(&mut self) -> Result<(), TlsError> {
        let out = self.hs.start()?;
        self.apply(out)
    }

    pub(crate) fn take_outbound(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outbound)
    }

    /// Total length of the record at the front of `read_buf`. Oversized
    /// lengths are refused before their body is read.
    pub(crate) fn next_record_len(&self) -> Result<usize, TlsError> {
        let total = record_length(&self.read_buf)
            .ok_or_else(|| TlsError::DecodeError("incomplete record header".into()))?;
        if total - RECORD_HEADER_LEN > MAX_CIPHERTEXT_LENGTH {
            return Err(TlsError::RecordOverflow(format!(
                "record length {}",
                total - RECORD_HEADER_LEN
            )));
        }
        Ok(total)
    }

    /// Open the complete record at the front of `read_buf`.
    pub(crate) fn open_buffered(&mut self) -> Result<(ContentType, Vec<u8>), TlsError> {
        let (ct, plaintext, consumed) = self.record_layer.open_record(&self.read_buf)?;
        self.read_buf.drain(..consumed);
        Ok((ct, plaintext))
    }

    fn seal_into_outbound(&mut self, ct: ContentType, data: &[u8]) -> Result<(), TlsError> {
        let limit = self.record_layer.max_fragment_size.max(1);
        for chunk in data.chunks(limit) {
            let record = self.record_layer.seal_record(ct, chunk)?;
            self.outbound.extend_from_slice(&record);
        }
        Ok(())
    }

    /// Track version and fragment limit once the hello exchange fixed them.
    fn sync_negotiated_limits(&mut self) {
        if let Some(version) = self.hs.version() {
            self.record_layer.set_record_version(version);
        }
        let negotiated = self
            .hs
            .max_fragment_length()
            .unwrap_or(MAX_PLAINTEXT_LENGTH);
        self.record_layer.max_fragment_size = self.local_fragment_limit.min(negotiated);
    }

    /// Carry out state-machine outputs in order.
    fn apply(&mut self, outputs: Vec<HandshakeOutput>) -> Result<(), TlsError> {
        self.sync_negotiated_limits();
        for output in outputs {
            match output {
                HandshakeOutput::Send(msg) => self.seal_into_outbound(ContentType::Handshake, &msg)?,
                HandshakeOutput::SendChangeCipherSpec => {
                    self.seal_into_outbound(ContentType::ChangeCipherSpec, &[1])?
                }
                HandshakeOutput::ActivateWrite(cipher) => {
                    debug!(cipher = %cipher.description(), "write protection on");
                    self.record_layer.activate_write(cipher)?;
                }
                HandshakeOutput::ActivateRead(cipher) => {
                    debug!(cipher = %cipher.description(), "read protection on");
                    self.record_layer.activate_read(cipher)?;
                }
                HandshakeOutput::Complete => {
                    self.negotiated = self.hs.negotiated();
                    self.state = ConnectionState::Connected;
                    if let Some(n) = &self.negotiated {
                        debug!(version = %n.version, suite = ?n.suite.name(), "connection established");
                    }
                }
            }
        }
        Ok(())
    }

    /// Route one opened record.
    pub(crate) fn absorb(&mut self, ct: ContentType, plaintext: &[u8]) -> Result<(), TlsError> {
        match ct {
            ContentType::Handshake => {
                self.reader.push(plaintext)?;
                while let Some(msg) = self.reader.next_message()? {
                    let out = self.hs.handle(Incoming::Handshake(&msg))?;
                    self.apply(out)?;
                }
                Ok(())
            }
            ContentType::ChangeCipherSpec => {
                if self.reader.has_partial() {
                    return Err(TlsError::UnexpectedMessage(
                        "ChangeCipherSpec inside a handshake message".into(),
                    ));
                }
                if plaintext != [1] {
                    return Err(TlsError::DecodeError("malformed ChangeCipherSpec".into()));
                }
                let out = self.hs.handle(Incoming::ChangeCipherSpec)?;
                self.apply(out)
            }
            ContentType::Alert => self.absorb_alert(plaintext),
            ContentType::ApplicationData => {
                if self.state != ConnectionState::Connected || self.reader.has_partial() {
                    return Err(TlsError::UnexpectedMessage(
                        "application data before handshake completion".into(),
                    ));
                }
                trace!(len = plaintext.len(), "application data");
                self.app_data_buf.extend_from_slice(plaintext);
                Ok(())
            }
        }
    }

    fn absorb_alert(&mut self, data: &[u8]) -> Result<(), TlsError> {
        let alert = Alert::decode(data)?;
        if alert.is_close_notify() {
            debug!("close_notify received");
            self.received_close_notify = true;
            if self.state == ConnectionState::Handshaking {
                return Err(TlsError::ConnectionClosed);
            }
            return Ok(());
        }
        if alert.is_fatal() {
            warn!(description = ?alert.description, "fatal alert received");
            return Err(alert.into_error());
        }
        if alert.description == AlertDescription::NoRenegotiation
            && self.state == ConnectionState::Handshaking
        {
            return Err(TlsError::HandshakeFailed("peer refused renegotiation".into()));
        }
        warn!(description = ?alert.description, "warning alert ignored");
        Ok(())
    }

    pub(crate) fn take_app_data(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.app_data_buf.len());
        buf[..n].copy_from_slice(&self.app_data_buf[..n]);
        self.app_data_buf.drain(..n);
        n
    }

    pub(crate) fn seal_application_data(&mut self, data: &[u8]) -> Result<(), TlsError> {
        self.seal_into_outbound(ContentType::ApplicationData, data)
    }

    /// Queue close_notify unless already sent. Returns whether anything
    /// was queued.
    pub(crate) fn queue_close_notify(&mut self) -> bool {
        if self.sent_close_notify || self.state == ConnectionState::Error {
            return false;
        }
        self.sent_close_notify = true;
        let alert = Alert::close_notify().encode();
        match self.seal_into_outbound(ContentType::Alert, &alert) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "close_notify not sent");
                false
            }
        }
    }

    /// Enter the error state and build the fatal alert record for `err`,
    /// if it maps to one.
    pub(crate) fn fail(&mut self, err: &TlsError) -> Option<Vec<u8>> {
        if matches!(self.state, ConnectionState::Error | ConnectionState::Closed) {
            return None;
        }
        self.state = ConnectionState::Error;
        self.reader.clear();
        self.read_buf.clear();
        self.outbound.clear();
        let description = AlertDescription::for_error(err)?;
        warn!(error = %err, ?description, "connection failed; sending fatal alert");
        let alert = Alert::fatal(description).encode();
        self.record_layer.seal_record(ContentType::Alert, &alert).ok()
    }
}
