/// Failures raised by the cryptographic primitives wrapped by the engine.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid argument")]
    InvalidArg,
    #[error("operation not supported")]
    NotSupported,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid iv length")]
    InvalidIvLength,
    #[error("aead: tag verification failed")]
    AeadTagVerifyFail,
    #[error("invalid padding")]
    InvalidPadding,
    #[error("input length is not a multiple of the block size")]
    NotBlockAligned,
    #[error("rsa: {0}")]
    Rsa(String),
    #[error("ecc: invalid public key")]
    EccInvalidPublicKey,
    #[error("signature verification failed")]
    SignatureVerifyFail,
    #[error("finite-field dh: public value out of range")]
    DhInvalidPublicValue,
    #[error("kem: invalid encapsulation")]
    KemInvalidEncapsulation,
    #[error("entropy source failed")]
    RandomFail,
}

/// TLS protocol errors.
///
/// Each variant corresponds to one class of failure: malformed wire data,
/// ordering violations, cryptographic verification, negotiation, or an
/// internal invariant. The engine maps them onto outbound alerts.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("decode error: {0}")]
    DecodeError(String),
    #[error("unexpected message: {0}")]
    UnexpectedMessage(String),
    #[error("bad record MAC")]
    BadRecordMac,
    #[error("record overflow: {0}")]
    RecordOverflow(String),
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
    #[error("no shared cipher suite")]
    NoSharedCipherSuite,
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("illegal parameter: {0}")]
    IllegalParameter(String),
    #[error("certificate rejected: {0}")]
    CertificateRejected(String),
    #[error("decrypt error: {0}")]
    DecryptError(String),
    #[error("sequence number overflow")]
    SequenceOverflow,
    #[error("alert received: level {level}, description {description}")]
    AlertReceived { level: u8, description: u8 },
    #[error("internal error: {0}")]
    InternalError(String),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("crypto error: {0}")]
    CryptoError(#[from] CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = TlsError::DecodeError("short ClientHello".into());
        assert_eq!(e.to_string(), "decode error: short ClientHello");
        assert_eq!(TlsError::BadRecordMac.to_string(), "bad record MAC");
        let e = TlsError::AlertReceived {
            level: 2,
            description: 40,
        };
        assert_eq!(e.to_string(), "alert received: level 2, description 40");
    }

    #[test]
    fn test_crypto_error_converts() {
        let e: TlsError = CryptoError::InvalidKeyLength {
            expected: 16,
            got: 15,
        }
        .into();
        assert!(matches!(e, TlsError::CryptoError(_)));
        assert!(e.to_string().contains("expected 16, got 15"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let e: TlsError = io.into();
        assert!(matches!(e, TlsError::IoError(_)));
    }
}
