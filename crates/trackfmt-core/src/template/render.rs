//! Evaluation of a token sequence against a [`Context`].

use tracing::trace;

use crate::context::Context;
use crate::error::FormatError;
use crate::helpers::HelperRegistry;
use crate::template::token::Token;

/// Render `tokens` against `context`, calling helpers from `registry`.
///
/// Missing context keys and helpers that reject a value's type contribute
/// nothing. An unknown helper name aborts the whole render; partial output
/// is discarded.
pub fn render(
    tokens: &[Token],
    context: &Context,
    registry: &HelperRegistry,
) -> Result<String, FormatError> {
    let mut out = String::new();

    for token in tokens {
        match token {
            Token::Passthrough(text) => out.push_str(text),
            Token::Variable(name) => match context.get(name) {
                Some(value) => out.push_str(&value.to_string()),
                None => trace!(name = %name, "variable not in context, skipping"),
            },
            Token::Function { name, argument } => {
                let helper = registry
                    .get(name)
                    .ok_or_else(|| FormatError::UnknownFunction(name.clone()))?;

                let Some(value) = context.get(argument) else {
                    trace!(helper = %name, argument = %argument, "argument not in context, skipping");
                    continue;
                };

                match helper.apply(value) {
                    Some(result) => out.push_str(&result),
                    None => trace!(
                        helper = %name,
                        value_type = value.type_name(),
                        "helper does not accept value type, skipping"
                    ),
                }
            }
        }
    }

    Ok(out)
}
