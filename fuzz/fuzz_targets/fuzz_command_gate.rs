//! Fuzz target: gate + interpreter
//!
//! Splits the input into (id, author, text) records, runs each through the
//! dedup/authorization gate and the interpreter, and checks that no id is
//! admitted twice and no stranger is ever admitted.
//!
//! cargo fuzz run fuzz_command_gate

#![no_main]

use std::collections::HashSet;

use libfuzzer_sys::fuzz_target;
use powerswitch::app::commands::interpret;
use powerswitch::app::gate::{DedupCursor, SEEN_HISTORY, admit};
use powerswitch::app::ports::InboundMessage;
use powerswitch::config::AuthorizationContext;

fuzz_target!(|data: &[u8]| {
    let ctx = AuthorizationContext {
        admin_id: "1".into(),
        channel_id: "2".into(),
        bot_credential: "t".into(),
    };
    let mut cursor = DedupCursor::new();
    let mut admitted = HashSet::new();

    for record in data.chunks(3) {
        let [id, author, text @ ..] = record else {
            continue;
        };
        // Keep ids within the remembered window so "seen" is exact.
        let id = (id % SEEN_HISTORY as u8).to_string();
        let author = if author & 1 == 0 { "1" } else { "9" };
        let content = String::from_utf8_lossy(text).into_owned();
        let _ = interpret(&content);

        let msg = InboundMessage {
            message_id: id.clone(),
            author_id: author.into(),
            channel_id: "2".into(),
            content,
        };
        if let Some(m) = admit(Some(msg), &mut cursor, &ctx) {
            assert_eq!(m.author_id, "1", "stranger admitted");
            assert!(admitted.insert(id), "id admitted twice");
        }
    }
});
