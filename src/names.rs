use crate::diagnostics::{NameRule, SyntaxError};

const PUNCTUATION: &str = ",.:;'\"!@#$%^&?|\\~`";
const OPERATOR_SYMBOLS: &str = "+-*/<=>!";

/// Checks a variable or label name and returns it trimmed.
///
/// Variables and labels share this single rule set.
pub fn validate_name(text: &str) -> Result<String, SyntaxError> {
    let name = text.trim();
    let rule = if name.is_empty() {
        Some(NameRule::Empty)
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        Some(NameRule::LeadingDigit)
    } else if name.contains(char::is_whitespace) {
        Some(NameRule::Whitespace)
    } else if name.contains(|c: char| PUNCTUATION.contains(c)) {
        Some(NameRule::Punctuation)
    } else if name.contains(|c: char| OPERATOR_SYMBOLS.contains(c)) {
        Some(NameRule::Operator)
    } else {
        None
    };
    match rule {
        Some(rule) => Err(SyntaxError::IllegalName {
            name: name.to_string(),
            rule,
        }),
        None => Ok(name.to_string()),
    }
}

pub fn is_valid_name(text: &str) -> bool {
    validate_name(text).is_ok()
}
