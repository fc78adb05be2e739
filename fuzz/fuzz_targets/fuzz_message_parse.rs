//! Fuzz target: `discord::parse_latest`
//!
//! Feeds arbitrary bytes to the `GET messages?limit=1` body decoder and
//! asserts it never panics and only yields messages whose fields were
//! present in the input.
//!
//! cargo fuzz run fuzz_message_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use powerswitch::adapters::discord::parse_latest;

fuzz_target!(|data: &[u8]| {
    if let Ok(Some(msg)) = parse_latest(data) {
        let text = core::str::from_utf8(data).expect("decoded from non-UTF-8 input");
        assert!(text.contains('['), "a message must come from a JSON array");
        assert!(msg.message_id.len() <= data.len());
        assert!(msg.content.len() <= data.len());
    }
});
