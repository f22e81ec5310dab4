//! Fuzz target for the format string tokenizer.
//!
//! Run with: cargo +nightly fuzz run fuzz_tokenize

#![no_main]

use libfuzzer_sys::fuzz_target;
use trackfmt_core::{Token, tokenize};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    match tokenize(s) {
        Ok(tokens) => {
            for token in &tokens {
                if let Token::Passthrough(text) = token {
                    assert!(!text.contains("{{"), "opener leaked into passthrough");
                }
            }
        }
        Err(err) => {
            let position = err.position().expect("syntax errors carry a position");
            assert!(position < s.len(), "error position {position} out of bounds");
        }
    }
});
