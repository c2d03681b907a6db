#![no_main]

use libfuzzer_sys::fuzz_target;
use seqrec::callback::LogCallback;
use seqrec::input::parse_signals;
use seqrec::phase::Phase;
use seqrec::recorder::{Recorder, RecorderOptions};
use seqrec::tick::TickContext;
use seqrec::trigger::{Token, TriggerKey};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut recorder = Recorder::with_options(RecorderOptions {
        record_modifier: Some(Token::new("Start")),
        recording_timeout_ticks: Some(8),
    });
    let keys = [
        TriggerKey::from_tokens(["A", "B"]),
        TriggerKey::from_tokens(["B"]),
        TriggerKey::parse_hotkey("<ctrl>+h"),
    ];
    for key in keys.into_iter().flatten() {
        recorder.register(key, LogCallback::new("fuzz"));
    }

    // One line per tick; unparseable lines become empty ticks.
    for line in text.lines() {
        let signals = parse_signals(line).unwrap_or_default();
        let ctx = TickContext::synthetic(recorder.ticks() + 1, std::time::Duration::from_millis(16));
        recorder.tick(&ctx, signals);

        // End is transient and never observable between ticks.
        for (_, entry) in recorder.registry().iter() {
            assert_ne!(entry.phase(), Phase::End);
        }
    }
});
