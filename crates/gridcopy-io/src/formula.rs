//! Formula text normalisation shared by backends.
//!
//! Callers may pass formulas with or without the leading `=`; backends store the
//! body and report formulas back with the `=` prefix.

use formualizer_parse::Tokenizer;

use crate::error::IoError;

/// Strip a single leading `=` (and surrounding whitespace).
pub fn formula_body(formula: &str) -> &str {
    let trimmed = formula.trim();
    trimmed.strip_prefix('=').unwrap_or(trimmed)
}

/// Render a stored body in the `=BODY` form returned to callers.
pub fn with_equals(body: &str) -> String {
    if body.starts_with('=') {
        body.to_string()
    } else {
        format!("={body}")
    }
}

/// Tokenize the formula and reject unbalanced or malformed input.
///
/// Returns the body (without `=`) ready to be stored.
pub fn validate(formula: &str) -> Result<&str, IoError> {
    let body = formula_body(formula);
    if body.is_empty() {
        return Err(IoError::InvalidFormula {
            formula: formula.to_string(),
            message: "empty formula".to_string(),
        });
    }
    Tokenizer::new(&with_equals(body)).map_err(|e| IoError::InvalidFormula {
        formula: formula.to_string(),
        message: e.message,
    })?;
    Ok(body)
}
