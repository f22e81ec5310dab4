//! Fuzz target for rendering arbitrary formats against fixed metadata.
//!
//! Run with: cargo +nightly fuzz run fuzz_render

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackfmt_core::{Context, Value, expand, metadata_context};

fuzz_target!(|data: &[u8]| {
    let Ok(format) = std::str::from_utf8(data) else {
        return;
    };
    let context = metadata_context(
        Context::new()
            .with("xesam:artist", Value::from(vec!["Artist"]))
            .with("xesam:title", "Title")
            .with("mpris:length", Value::Integer(i64::MAX))
            .with("position", Value::Integer(i64::MIN))
            .with("volume", Value::Float(f64::NAN)),
    );
    let _ = expand(format, &context);
});
