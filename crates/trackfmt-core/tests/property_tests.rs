use proptest::prelude::*;
use trackfmt_core::helpers::format_duration;
use trackfmt_core::{Context, HelperRegistry, Token, Value, render, tokenize};

proptest! {
    /// Text without any delimiter characters is a single passthrough token.
    #[test]
    fn plain_text_is_single_passthrough(s in "[^{}()]{1,64}") {
        let tokens = tokenize(&s).unwrap();
        prop_assert_eq!(tokens, vec![Token::Passthrough(s.clone())]);
    }
}

proptest! {
    /// The tokenizer returns Ok or Err on arbitrary input but never panics.
    #[test]
    fn tokenizer_does_not_panic(s in "\\PC*") {
        let _ = tokenize(&s);
    }
}

proptest! {
    /// Passthrough tokens never carry an unescaped opener.
    #[test]
    fn passthrough_never_contains_opener(s in "[a-c{}() ]{0,32}") {
        if let Ok(tokens) = tokenize(&s) {
            for token in tokens {
                if let Token::Passthrough(text) = token {
                    prop_assert!(!text.contains("{{"));
                }
            }
        }
    }
}

proptest! {
    /// Syntax error positions always point inside the input.
    #[test]
    fn error_positions_are_in_bounds(s in "[a-c{}() ]{0,32}") {
        if let Err(err) = tokenize(&s) {
            let position = err.position().unwrap();
            prop_assert!(position < s.len());
        }
    }
}

proptest! {
    /// `{{name}}` renders exactly the text value stored under `name`.
    #[test]
    fn variable_renders_text_verbatim(
        name in "[a-z][a-z0-9:_]{0,15}",
        value in "\\PC*",
    ) {
        let tokens = tokenize(&format!("{{{{{name}}}}}")).unwrap();
        let ctx = Context::new().with(name.as_str(), value.as_str());
        prop_assert_eq!(render(&tokens, &ctx, HelperRegistry::builtin()).unwrap(), value);
    }
}

proptest! {
    /// Rendering has no hidden state: the same inputs give the same output.
    #[test]
    fn render_is_idempotent(
        title in "\\PC{0,32}",
        micros in 0i64..10_000_000_000,
    ) {
        let tokens = tokenize("{{uc(title)}} {{title}} {{duration(length)}}").unwrap();
        let ctx = Context::new()
            .with("title", title.as_str())
            .with("length", Value::Integer(micros));
        let first = render(&tokens, &ctx, HelperRegistry::builtin()).unwrap();
        let second = render(&tokens, &ctx, HelperRegistry::builtin()).unwrap();
        prop_assert_eq!(first, second);
    }
}

proptest! {
    /// Under an hour, `M:SS` reads back as the whole number of seconds.
    #[test]
    fn duration_reads_back_as_seconds(micros in 0i64..3_600_000_000) {
        let formatted = format_duration(micros);
        let (minutes, seconds) = formatted.split_once(':').unwrap();
        prop_assert_eq!(seconds.len(), 2);
        let total = minutes.parse::<i64>().unwrap() * 60 + seconds.parse::<i64>().unwrap();
        prop_assert_eq!(total, micros / 1_000_000);
    }
}
