#![no_main]
use leap_tls::handshake::codec::parse_handshake_header;
use leap_tls::message::{CodecContext, HandshakeMessage};
use leap_tls::suites::KeyExchangeKind;
use leap_tls::TlsVersion;
use libfuzzer_sys::fuzz_target;

const KINDS: [KeyExchangeKind; 6] = [
    KeyExchangeKind::Rsa,
    KeyExchangeKind::Dhe,
    KeyExchangeKind::Ecdhe,
    KeyExchangeKind::Psk,
    KeyExchangeKind::DhePsk,
    KeyExchangeKind::EcdhePsk,
];

fuzz_target!(|data: &[u8]| {
    // First byte picks version and key exchange; the rest is the message.
    let Some((&selector, msg)) = data.split_first() else {
        return;
    };
    let version = match selector & 0x03 {
        0 => TlsVersion::Ssl30,
        1 => TlsVersion::Tls10,
        2 => TlsVersion::Tls11,
        _ => TlsVersion::Tls12,
    };
    let ctx = CodecContext {
        version,
        key_exchange: Some(KINDS[(selector >> 2) as usize % KINDS.len()]),
        group: None,
    };
    if let Ok((msg_type, body, _)) = parse_handshake_header(msg) {
        let _ = HandshakeMessage::decode_handshake(msg_type, body, &ctx);
    }
});
