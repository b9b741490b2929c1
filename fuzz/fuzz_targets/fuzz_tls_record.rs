#![no_main]
use leap_tls::record::RecordLayer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut layer = RecordLayer::new();
    let mut rest = data;
    // Walk back-to-back records until one fails to parse.
    while let Ok((_, _, used)) = layer.open_record(rest) {
        rest = &rest[used..];
    }
});
