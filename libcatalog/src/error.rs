//! Error types for catalog parsing.

use thiserror::Error;

/// Result type for catalog parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying filename for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => String::new(),
        }
    }
}

/// Error type for catalog parsing.
///
/// The trailing `String` of each variant is a location suffix, empty until
/// [`ParseError::with_location`] fills it in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Character that cannot start any token.
    #[error("Unexpected character \"{0}\"{1}")]
    UnexpectedChar(char, String),

    /// String literal without a closing quote.
    #[error("Unterminated string{0}")]
    UnterminatedString(String),

    /// Unknown or malformed backslash escape.
    #[error("Bad escaped character{0}")]
    BadEscapedChar(String),

    /// Malformed numeric literal.
    #[error("Invalid number{0}")]
    InvalidNumber(String),

    /// Top-level record did not start with an opening brace.
    #[error("Expected record{0}")]
    ExpectedRecord(String),

    /// Top-level array did not start with an opening bracket.
    #[error("Expected array{0}")]
    ExpectedArray(String),

    /// Non-name token where a property name was expected.
    #[error("Expected property name{0}")]
    ExpectedKey(String),

    /// Property name not followed by a value.
    #[error("Expected value for property \"{0}\"{1}")]
    ExpectedValue(String, String),

    /// Array without a closing bracket.
    #[error("Unmatched bracket{0}")]
    UnclosedArray(String),

    /// Record without a closing brace.
    #[error("Unmatched brace{0}")]
    UnclosedRecord(String),

    /// Units section without a closing angle bracket.
    #[error("Unmatched angle bracket{0}")]
    UnclosedUnits(String),

    /// Unit name not recognized by any unit family.
    #[error("Unknown unit \"{0}\"{1}")]
    UnknownUnit(String, String),

    /// Tokens left over after the top-level value.
    #[error("Unexpected extra content{0}")]
    TrailingTokens(String),

    /// Nesting deeper than the configured limit.
    #[error("Nesting exceeds maximum depth of {0}{1}")]
    TooDeep(usize, String),
}

/// A value that catalog text cannot represent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Record key that would not read back as a single property name.
    #[error("Invalid property name \"{0}\"")]
    InvalidKey(String),

    /// NaN or infinite number.
    #[error("Non-finite number {0}")]
    NonFinite(f64),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::UnexpectedChar(c, _) => ParseError::UnexpectedChar(c, suffix),
            ParseError::UnterminatedString(_) => ParseError::UnterminatedString(suffix),
            ParseError::BadEscapedChar(_) => ParseError::BadEscapedChar(suffix),
            ParseError::InvalidNumber(_) => ParseError::InvalidNumber(suffix),
            ParseError::ExpectedRecord(_) => ParseError::ExpectedRecord(suffix),
            ParseError::ExpectedArray(_) => ParseError::ExpectedArray(suffix),
            ParseError::ExpectedKey(_) => ParseError::ExpectedKey(suffix),
            ParseError::ExpectedValue(key, _) => ParseError::ExpectedValue(key, suffix),
            ParseError::UnclosedArray(_) => ParseError::UnclosedArray(suffix),
            ParseError::UnclosedRecord(_) => ParseError::UnclosedRecord(suffix),
            ParseError::UnclosedUnits(_) => ParseError::UnclosedUnits(suffix),
            ParseError::UnknownUnit(unit, _) => ParseError::UnknownUnit(unit, suffix),
            ParseError::TrailingTokens(_) => ParseError::TrailingTokens(suffix),
            ParseError::TooDeep(depth, _) => ParseError::TooDeep(depth, suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_suffix_with_filename() {
        let ctx = ParseContext::new(Some("solarsys.ssc"));
        let err = ParseError::UnclosedRecord(String::new()).with_location(&ctx, 2, 4);
        assert_eq!(err.to_string(), "Unmatched brace at 3:5 of <solarsys.ssc>");
    }

    #[test]
    fn test_location_suffix_without_filename() {
        let ctx = ParseContext::new(None);
        let err = ParseError::UnknownUnit("bogus".into(), String::new()).with_location(&ctx, 0, 0);
        assert_eq!(err.to_string(), "Unknown unit \"bogus\"");
    }
}
