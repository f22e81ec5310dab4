//! Tokenizer for format strings.
//!
//! A format string is literal text interleaved with `{{name}}` and
//! `{{fn(name)}}` directives. Scanning is a single left-to-right pass over
//! a four-state machine; the first violation aborts with a positioned
//! [`FormatError::Syntax`].

use std::fmt;

use crate::error::FormatError;

/// One segment of a tokenized format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, copied to the output verbatim. Never contains `{{`.
    Passthrough(String),
    /// `{{name}}`: the display form of a context value.
    Variable(String),
    /// `{{name(argument)}}`: a helper applied to one context value.
    ///
    /// The argument is always a bare variable name; calls do not nest.
    Function { name: String, argument: String },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Passthrough(text) => f.write_str(text),
            Token::Variable(name) => write!(f, "{{{{{name}}}}}"),
            Token::Function { name, argument } => write!(f, "{{{{{name}({argument})}}}}"),
        }
    }
}

/// Scanner state. Byte offsets of open delimiters are kept for
/// end-of-input diagnostics.
enum State {
    Passthrough,
    Inside { opener: usize },
    ParamsOpen { opener: usize, paren: usize, function: String },
    ParamsClosed { opener: usize },
}

/// Split `format` into tokens.
///
/// `}}`, `(` and `)` are ordinary characters in literal text; only `{{`
/// opens a directive there. Every error carries the byte offset of the
/// offending input, or of the unmatched opener when input ends early.
pub fn tokenize(format: &str) -> Result<Vec<Token>, FormatError> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut buf_start = 0;
    let mut state = State::Passthrough;
    let mut chars = format.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let doubled = matches!(chars.peek(), Some(&(_, next)) if next == c);

        match c {
            '{' if doubled => {
                if !matches!(state, State::Passthrough) {
                    return Err(FormatError::syntax(i, "unexpected token: \"{{\""));
                }
                chars.next();
                if !buf.is_empty() {
                    tokens.push(Token::Passthrough(std::mem::take(&mut buf)));
                }
                state = State::Inside { opener: i };
            }
            '}' if doubled && !matches!(state, State::Passthrough) => {
                chars.next();
                match state {
                    State::Inside { .. } => {
                        let name = buf.trim();
                        if name.is_empty() {
                            return Err(FormatError::syntax(i, "got empty template expression"));
                        }
                        tokens.push(Token::Variable(name.to_string()));
                    }
                    State::ParamsOpen { .. } => {
                        return Err(FormatError::syntax(
                            i,
                            "unexpected token: \"}}\" (unmatched opener \"(\", expected closing parens \")\")",
                        ));
                    }
                    State::ParamsClosed { .. } => {
                        if let Some((k, _)) = buf.char_indices().find(|(_, ch)| !ch.is_whitespace()) {
                            return Err(FormatError::syntax(
                                buf_start + k,
                                "got unexpected input after closing parens",
                            ));
                        }
                    }
                    State::Passthrough => {}
                }
                buf.clear();
                state = State::Passthrough;
            }
            '(' if !matches!(state, State::Passthrough) => {
                let State::Inside { opener } = state else {
                    return Err(FormatError::syntax(i, "unexpected token: \"(\""));
                };
                let function = buf.trim();
                if function.is_empty() {
                    return Err(FormatError::syntax(i, "expected a function name to call"));
                }
                state = State::ParamsOpen {
                    opener,
                    paren: i,
                    function: function.to_string(),
                };
                buf.clear();
            }
            ')' if !matches!(state, State::Passthrough) => {
                let State::ParamsOpen {
                    opener, function, ..
                } = std::mem::replace(&mut state, State::Passthrough)
                else {
                    return Err(FormatError::syntax(i, "unexpected token: \")\""));
                };
                let argument = buf.trim();
                if argument.is_empty() {
                    return Err(FormatError::syntax(i, "expected a function parameter"));
                }
                tokens.push(Token::Function {
                    name: function,
                    argument: argument.to_string(),
                });
                buf.clear();
                state = State::ParamsClosed { opener };
            }
            _ => {
                if buf.is_empty() {
                    buf_start = i;
                }
                buf.push(c);
            }
        }
    }

    match state {
        State::Inside { opener } | State::ParamsClosed { opener } => Err(FormatError::syntax(
            opener,
            "unmatched opener \"{{\" (expected a matching \"}}\")",
        )),
        State::ParamsOpen { paren, .. } => Err(FormatError::syntax(
            paren,
            "unmatched opener \"(\" (expected a matching \")\")",
        )),
        State::Passthrough => {
            if !buf.is_empty() {
                tokens.push(Token::Passthrough(buf));
            }
            Ok(tokens)
        }
    }
}
