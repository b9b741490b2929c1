//! Alert protocol: levels, descriptions, and the error-to-alert mapping used
//! when a connection tears down.

use crate::TlsError;

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertLevel {
    Warning = 1,
    Fatal = 2,
}

/// Alert description codes from the IANA TLS registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AlertDescription {
    CloseNotify = 0,
    UnexpectedMessage = 10,
    BadRecordMac = 20,
    DecryptionFailed = 21,
    RecordOverflow = 22,
    DecompressionFailure = 30,
    HandshakeFailure = 40,
    /// SSL 3.0 only.
    NoCertificate = 41,
    BadCertificate = 42,
    UnsupportedCertificate = 43,
    CertificateRevoked = 44,
    CertificateExpired = 45,
    CertificateUnknown = 46,
    IllegalParameter = 47,
    UnknownCa = 48,
    AccessDenied = 49,
    DecodeError = 50,
    DecryptError = 51,
    ExportRestriction = 60,
    ProtocolVersion = 70,
    InsufficientSecurity = 71,
    InternalError = 80,
    InappropriateFallback = 86,
    UserCanceled = 90,
    NoRenegotiation = 100,
    MissingExtension = 109,
    UnsupportedExtension = 110,
    UnrecognizedName = 112,
    UnknownPskIdentity = 115,
    CertificateRequired = 116,
    NoApplicationProtocol = 120,
}

/// A decoded alert record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl AlertLevel {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        match v {
            1 => Ok(AlertLevel::Warning),
            2 => Ok(AlertLevel::Fatal),
            _ => Err(v),
        }
    }
}

impl AlertDescription {
    pub fn from_u8(v: u8) -> Result<Self, u8> {
        use AlertDescription::*;
        let d = match v {
            0 => CloseNotify,
            10 => UnexpectedMessage,
            20 => BadRecordMac,
            21 => DecryptionFailed,
            22 => RecordOverflow,
            30 => DecompressionFailure,
            40 => HandshakeFailure,
            41 => NoCertificate,
            42 => BadCertificate,
            43 => UnsupportedCertificate,
            44 => CertificateRevoked,
            45 => CertificateExpired,
            46 => CertificateUnknown,
            47 => IllegalParameter,
            48 => UnknownCa,
            49 => AccessDenied,
            50 => DecodeError,
            51 => DecryptError,
            60 => ExportRestriction,
            70 => ProtocolVersion,
            71 => InsufficientSecurity,
            80 => InternalError,
            86 => InappropriateFallback,
            90 => UserCanceled,
            100 => NoRenegotiation,
            109 => MissingExtension,
            110 => UnsupportedExtension,
            112 => UnrecognizedName,
            115 => UnknownPskIdentity,
            116 => CertificateRequired,
            120 => NoApplicationProtocol,
            _ => return Err(v),
        };
        Ok(d)
    }

    /// The alert an endpoint sends when `err` ends the connection, or `None`
    /// when no alert should be emitted (transport failures, peer alerts,
    /// orderly closure).
    pub fn for_error(err: &TlsError) -> Option<Self> {
        let d = match err {
            TlsError::DecodeError(_) => AlertDescription::DecodeError,
            TlsError::UnexpectedMessage(_) => AlertDescription::UnexpectedMessage,
            TlsError::BadRecordMac => AlertDescription::BadRecordMac,
            TlsError::RecordOverflow(_) => AlertDescription::RecordOverflow,
            TlsError::HandshakeFailed(_) | TlsError::NoSharedCipherSuite => {
                AlertDescription::HandshakeFailure
            }
            TlsError::UnsupportedVersion => AlertDescription::ProtocolVersion,
            TlsError::IllegalParameter(_) => AlertDescription::IllegalParameter,
            TlsError::CertificateRejected(_) => AlertDescription::BadCertificate,
            TlsError::DecryptError(_) => AlertDescription::DecryptError,
            TlsError::SequenceOverflow
            | TlsError::InternalError(_)
            | TlsError::CryptoError(_) => AlertDescription::InternalError,
            TlsError::AlertReceived { .. } | TlsError::ConnectionClosed | TlsError::IoError(_) => {
                return None
            }
        };
        Some(d)
    }
}

impl Alert {
    pub fn fatal(description: AlertDescription) -> Self {
        Alert {
            level: AlertLevel::Fatal,
            description,
        }
    }

    pub fn close_notify() -> Self {
        Alert {
            level: AlertLevel::Warning,
            description: AlertDescription::CloseNotify,
        }
    }

    pub fn encode(&self) -> [u8; 2] {
        [self.level as u8, self.description as u8]
    }

    /// Decode an alert record body. Anything other than exactly two bytes is
    /// a decode error.
    pub fn decode(data: &[u8]) -> Result<Self, TlsError> {
        let [level, description] = data else {
            return Err(TlsError::DecodeError(format!(
                "alert must be 2 bytes, got {}",
                data.len()
            )));
        };
        let level = AlertLevel::from_u8(*level)
            .map_err(|v| TlsError::DecodeError(format!("unknown alert level {v}")))?;
        let description = AlertDescription::from_u8(*description)
            .map_err(|v| TlsError::DecodeError(format!("unknown alert description {v}")))?;
        Ok(Alert { level, description })
    }

    pub fn is_close_notify(&self) -> bool {
        self.description == AlertDescription::CloseNotify
    }

    /// Whether receipt of this alert terminates the connection. Fatal alerts
    /// always do; warning-level alerts other than close_notify do not.
    pub fn is_fatal(&self) -> bool {
        self.level == AlertLevel::Fatal
    }

    pub fn into_error(self) -> TlsError {
        TlsError::AlertReceived {
            level: self.level as u8,
            description: self.description as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_level_values() {
        assert_eq!(AlertLevel::Warning as u8, 1);
        assert_eq!(AlertLevel::Fatal as u8, 2);
        assert_eq!(AlertLevel::from_u8(3), Err(3));
    }

    #[test]
    fn test_alert_description_from_u8_roundtrip() {
        for code in 0u8..=255 {
            if let Ok(d) = AlertDescription::from_u8(code) {
                assert_eq!(d as u8, code);
            }
        }
        assert_eq!(AlertDescription::from_u8(255), Err(255));
    }

    #[test]
    fn test_alert_encode_decode() {
        let alert = Alert::fatal(AlertDescription::BadRecordMac);
        let bytes = alert.encode();
        assert_eq!(bytes, [2, 20]);
        assert_eq!(Alert::decode(&bytes).unwrap(), alert);
        assert!(Alert::decode(&[1]).is_err());
        assert!(Alert::decode(&[1, 0, 0]).is_err());
        assert!(Alert::decode(&[7, 0]).is_err());
    }

    #[test]
    fn test_close_notify() {
        let alert = Alert::close_notify();
        assert_eq!(alert.encode(), [1, 0]);
        assert!(alert.is_close_notify());
        assert!(!alert.is_fatal());
    }

    #[test]
    fn test_error_to_alert_mapping() {
        assert_eq!(
            AlertDescription::for_error(&TlsError::DecodeError("x".into())),
            Some(AlertDescription::DecodeError)
        );
        assert_eq!(
            AlertDescription::for_error(&TlsError::UnexpectedMessage("x".into())),
            Some(AlertDescription::UnexpectedMessage)
        );
        assert_eq!(
            AlertDescription::for_error(&TlsError::BadRecordMac),
            Some(AlertDescription::BadRecordMac)
        );
        assert_eq!(
            AlertDescription::for_error(&TlsError::NoSharedCipherSuite),
            Some(AlertDescription::HandshakeFailure)
        );
        assert_eq!(
            AlertDescription::for_error(&TlsError::CertificateRejected("x".into())),
            Some(AlertDescription::BadCertificate)
        );
        assert_eq!(AlertDescription::for_error(&TlsError::ConnectionClosed), None);
    }

    #[test]
    fn test_received_alert_error() {
        let err = Alert::fatal(AlertDescription::HandshakeFailure).into_error();
        assert!(matches!(
            err,
            TlsError::AlertReceived {
                level: 2,
                description: 40
            }
        ));
    }
}
