#![no_main]
use leap_tls::handshake::reader::HandshakeReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed the input in fragments whose sizes come from the input itself.
    let mut reader = HandshakeReader::new();
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let take = (len as usize).min(tail.len());
        if reader.push(&tail[..take]).is_err() {
            return;
        }
        rest = &tail[take..];
        loop {
            match reader.next_message() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
