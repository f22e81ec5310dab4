//! Fuzz target for config parsing and preset compilation.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackfmt_core::Engine;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = trackfmt_config::AppConfig::parse(s) else {
        return;
    };
    // A config that validates must yield an engine that accepts or rejects
    // every preset without panicking.
    let engine = Engine::from_config(&config.format);
    for format in config.presets.values() {
        let _ = engine.compile(format);
    }
});
