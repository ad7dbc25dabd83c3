//! Value Parser
//!
//! Recursive descent over a [`TokenSource`]. Four productions call each other:
//! - `read_value`: number, string, `true`/`false`, array or record
//! - `read_array`: `[ value* ]`
//! - `read_record`: `{ (name value units?)* }`
//! - `read_units`: `< unit* >`, written after the property's value
//!
//! Each production looks at one token. If that first token cannot start the
//! production, it is pushed back and the production returns `Ok(None)`; that
//! is how lists end and how optional parts are skipped. Any later mismatch is
//! an error, and the containers built so far are dropped with it.

use crate::error::{ParseContext, ParseError, Result};
use crate::record::Record;
use crate::tokenizer::{TokenKind, TokenSource};
use crate::units::{UnitSystem, STANDARD_UNITS};
use crate::value::{Value, ValueArray};
use tracing::{debug, trace};

/// Default limit on array/record nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for the parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum nesting of arrays and records.
    pub max_depth: usize,
    /// Accept tokens after the top-level value instead of failing.
    pub allow_trailing: bool,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_allow_trailing(mut self, allow: bool) -> Self {
        self.allow_trailing = allow;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing: false,
        }
    }
}

/// Builds value trees from a token stream.
pub struct Parser<'u, T> {
    tokens: T,
    units: &'u dyn UnitSystem,
    ctx: ParseContext,
    config: ParserConfig,
    depth: usize,
}

impl<T: TokenSource> Parser<'static, T> {
    /// Create a parser that classifies units with the standard tables.
    pub fn new(tokens: T) -> Self {
        Self::with_units(tokens, &STANDARD_UNITS)
    }
}

impl<'u, T: TokenSource> Parser<'u, T> {
    /// Create a parser that classifies units with a custom unit system.
    pub fn with_units(tokens: T, units: &'u dyn UnitSystem) -> Self {
        Self {
            tokens,
            units,
            ctx: ParseContext::default(),
            config: ParserConfig::default(),
            depth: 0,
        }
    }

    pub fn with_context(mut self, ctx: ParseContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Give back the token source, positioned after the last consumed token.
    pub fn into_tokens(self) -> T {
        self.tokens
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Parse a whole document consisting of one record.
    pub fn parse_top_level_record(&mut self) -> Result<Record> {
        let result = match self.read_record() {
            Ok(Some(record)) => self.expect_end().map(|()| record),
            Ok(None) => Err(self.error_here(ParseError::ExpectedRecord(String::new()))),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| debug!(error = %e, "record parse failed"))
    }

    /// Parse a whole document consisting of one array.
    pub fn parse_top_level_array(&mut self) -> Result<ValueArray> {
        let result = match self.read_array() {
            Ok(Some(array)) => self.expect_end().map(|()| array),
            Ok(None) => Err(self.error_here(ParseError::ExpectedArray(String::new()))),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| debug!(error = %e, "array parse failed"))
    }

    /// Verify no tokens remain after the top-level value.
    fn expect_end(&mut self) -> Result<()> {
        if self.config.allow_trailing {
            return Ok(());
        }
        match self.tokens.next_token()? {
            TokenKind::End => Ok(()),
            _ => Err(self.error_here(ParseError::TrailingTokens(String::new()))),
        }
    }

    // ------------------------------------------------------------------------
    // Productions
    // ------------------------------------------------------------------------

    /// Read one value, or `None` if the next token cannot start a value.
    pub fn read_value(&mut self) -> Result<Option<Value>> {
        match self.tokens.next_token()? {
            TokenKind::Number => Ok(Some(Value::Number(self.tokens.number_value()))),
            TokenKind::String => Ok(Some(Value::String(self.tokens.string_value().to_string()))),
            TokenKind::Name => {
                let boolean = match self.tokens.name_value() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                };
                if boolean.is_none() {
                    self.tokens.push_back();
                }
                Ok(boolean.map(Value::Boolean))
            }
            TokenKind::BeginArray => {
                self.tokens.push_back();
                Ok(self.read_array()?.map(Value::Array))
            }
            TokenKind::BeginRecord => {
                self.tokens.push_back();
                Ok(self.read_record()?.map(Value::Record))
            }
            _ => {
                self.tokens.push_back();
                Ok(None)
            }
        }
    }

    /// Read `[ value* ]`, or `None` if the next token is not `[`.
    pub fn read_array(&mut self) -> Result<Option<ValueArray>> {
        if self.tokens.next_token()? != TokenKind::BeginArray {
            self.tokens.push_back();
            return Ok(None);
        }
        self.nested(|p| {
            let mut array = ValueArray::new();
            while let Some(value) = p.read_value()? {
                array.push(value);
            }
            if p.tokens.next_token()? != TokenKind::EndArray {
                return Err(p.error_here(ParseError::UnclosedArray(String::new())));
            }
            trace!(len = array.len(), "read array");
            Ok(Some(array))
        })
    }

    /// Read `{ (name value units?)* }`, or `None` if the next token is not `{`.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        if self.tokens.next_token()? != TokenKind::BeginRecord {
            self.tokens.push_back();
            return Ok(None);
        }
        self.nested(|p| {
            let mut record = Record::new();
            loop {
                let key = match p.tokens.next_token()? {
                    TokenKind::EndRecord => break,
                    TokenKind::Name => p.tokens.name_value().to_string(),
                    TokenKind::End => {
                        return Err(p.error_here(ParseError::UnclosedRecord(String::new())))
                    }
                    _ => return Err(p.error_here(ParseError::ExpectedKey(String::new()))),
                };

                let Some(value) = p.read_value()? else {
                    return Err(p.error_here(ParseError::ExpectedValue(key, String::new())));
                };

                if record.set(key.as_str(), value).is_some() {
                    debug!(key = %key, "duplicate property, keeping the last value");
                    for family in crate::units::UnitFamily::ALL {
                        record.remove(&family.unit_key(&key));
                    }
                }

                p.read_units(&key, &mut record)?;
            }
            trace!(len = record.len(), "read record");
            Ok(Some(record))
        })
    }

    /// Read an optional `< unit* >` section declaring units for `property`.
    ///
    /// Each unit is stored in `record` under `property%Family`. Returns
    /// whether a section was present.
    pub fn read_units(&mut self, property: &str, record: &mut Record) -> Result<bool> {
        if self.tokens.next_token()? != TokenKind::BeginUnits {
            self.tokens.push_back();
            return Ok(false);
        }
        loop {
            match self.tokens.next_token()? {
                TokenKind::EndUnits => return Ok(true),
                TokenKind::Name => {
                    let unit = self.tokens.name_value().to_string();
                    let Some(family) = self.units.classify(&unit) else {
                        debug!(property, unit = %unit, "unknown unit");
                        return Err(self.error_here(ParseError::UnknownUnit(unit, String::new())));
                    };
                    trace!(property, unit = %unit, %family, "declared unit");
                    record.set(family.unit_key(property), unit);
                }
                _ => return Err(self.error_here(ParseError::UnclosedUnits(String::new()))),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Run `f` one nesting level deeper.
    fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.depth >= self.config.max_depth {
            return Err(self.error_here(ParseError::TooDeep(self.config.max_depth, String::new())));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Attach the current token's location to an error.
    fn error_here(&self, err: ParseError) -> ParseError {
        let (line, col) = self.tokens.location();
        err.with_location(&self.ctx, line, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;
    use crate::units::{UnitFamily, UnitRegistry, UnitTable};

    fn record(src: &str) -> Result<Record> {
        Parser::new(Tokenizer::new(src)).parse_top_level_record()
    }

    fn array(src: &str) -> Result<ValueArray> {
        Parser::new(Tokenizer::new(src)).parse_top_level_array()
    }

    #[test]
    fn test_array_in_order() {
        let arr = array("[ 1 2 3 ]").unwrap();
        assert_eq!(
            arr,
            vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]
        );
    }

    #[test]
    fn test_empty_containers() {
        assert!(array("[ ]").unwrap().is_empty());
        assert!(record("{ }").unwrap().is_empty());
    }

    #[test]
    fn test_record_pairs() {
        let rec = record("{ a 1 b 2 }").unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(rec.get("b"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_scalar_kinds() {
        let rec = record(r#"{ n -4.5 s "text" t true f false }"#).unwrap();
        assert_eq!(rec.get("n"), Some(&Value::Number(-4.5)));
        assert_eq!(rec.get("s"), Some(&Value::from("text")));
        assert_eq!(rec.get("t"), Some(&Value::Boolean(true)));
        assert_eq!(rec.get("f"), Some(&Value::Boolean(false)));
    }

    #[test]
    fn test_nested_containers() {
        let rec = record("{ Atmosphere { Height 60 Colors [ [ 1 0 0 ] { x 1 } ] } }").unwrap();
        let atmo = rec.get("Atmosphere").unwrap().as_record().unwrap();
        assert_eq!(atmo.get_number::<f64>("Height"), Some(60.0));
        let colors = atmo.get("Colors").unwrap().as_array().unwrap();
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].as_array().map(Vec::len), Some(3));
        assert!(colors[1].as_record().is_some());
    }

    #[test]
    fn test_unclosed_record_fails() {
        assert!(matches!(record("{ a 1"), Err(ParseError::UnclosedRecord(_))));
    }

    #[test]
    fn test_unclosed_array_fails() {
        assert!(matches!(array("[ 1 2"), Err(ParseError::UnclosedArray(_))));
        assert!(matches!(array("[ 1 name ]"), Err(ParseError::UnclosedArray(_))));
        assert!(matches!(
            record("{ a [ 1 2 }"),
            Err(ParseError::UnclosedArray(_))
        ));
    }

    #[test]
    fn test_bad_key_fails() {
        assert!(matches!(record("{ 5 1 }"), Err(ParseError::ExpectedKey(_))));
        assert!(matches!(record(r#"{ "a" 1 }"#), Err(ParseError::ExpectedKey(_))));
    }

    #[test]
    fn test_missing_value_fails() {
        match record("{ a }") {
            Err(ParseError::ExpectedValue(key, _)) => assert_eq!(key, "a"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            record("{ a b 2 }"),
            Err(ParseError::ExpectedValue(_, _))
        ));
    }

    #[test]
    fn test_units_after_value() {
        let rec = record("{ dist 5 <AU> period 2 <y> tilt 23.4 <deg> m 1 <mJ> }").unwrap();
        assert_eq!(rec.get_string("dist%Length"), Some("AU"));
        assert_eq!(rec.get_string("period%Time"), Some("y"));
        assert_eq!(rec.get_string("tilt%Angle"), Some("deg"));
        assert_eq!(rec.get_string("m%Mass"), Some("mJ"));
        assert_eq!(rec.len(), 8);
    }

    #[test]
    fn test_several_units_in_one_section() {
        let rec = record("{ Position [ 10 20 1 ] <deg km> }").unwrap();
        assert_eq!(rec.get_string("Position%Angle"), Some("deg"));
        assert_eq!(rec.get_string("Position%Length"), Some("km"));
    }

    #[test]
    fn test_unknown_unit_fails_whole_record() {
        match record("{ dist 5 <bogus> }") {
            Err(ParseError::UnknownUnit(unit, _)) => assert_eq!(unit, "bogus"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_unit_in_nested_record_fails_outer() {
        assert!(matches!(
            record("{ a 1 inner { dist 5 <bogus> } }"),
            Err(ParseError::UnknownUnit(_, _))
        ));
    }

    #[test]
    fn test_unclosed_units_fails() {
        assert!(matches!(record("{ a 1 <km"), Err(ParseError::UnclosedUnits(_))));
        assert!(matches!(record("{ a 1 <km 5> }"), Err(ParseError::UnclosedUnits(_))));
    }

    #[test]
    fn test_units_before_value_are_rejected() {
        assert!(matches!(
            record("{ dist <AU> 5 }"),
            Err(ParseError::ExpectedValue(_, _))
        ));
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let rec = record("{ a 1 b 2 a 3 }").unwrap();
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get_number::<f64>("a"), Some(3.0));
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_key_drops_stale_units() {
        let rec = record("{ d 1 <AU> d 2 }").unwrap();
        assert_eq!(rec.get_number::<f64>("d"), Some(2.0));
        assert!(!rec.contains_key("d%Length"));

        let rec = record("{ d 1 <AU> d 2 <km> }").unwrap();
        assert_eq!(rec.get_string("d%Length"), Some("km"));
    }

    #[test]
    fn test_top_level_requires_opening_token() {
        assert!(matches!(record("[ 1 ]"), Err(ParseError::ExpectedRecord(_))));
        assert!(matches!(array("{ }"), Err(ParseError::ExpectedArray(_))));
        assert!(matches!(record(""), Err(ParseError::ExpectedRecord(_))));
    }

    #[test]
    fn test_trailing_tokens() {
        assert!(matches!(record("{ } x"), Err(ParseError::TrailingTokens(_))));
        let mut parser = Parser::new(Tokenizer::new("{ a 1 } { b 2 }"))
            .with_config(ParserConfig::new().with_allow_trailing(true));
        let first = parser.parse_top_level_record().unwrap();
        let second = parser.parse_top_level_record().unwrap();
        assert!(first.contains_key("a"));
        assert!(second.contains_key("b"));
    }

    #[test]
    fn test_read_value_reports_absence() {
        let mut parser = Parser::new(Tokenizer::new("Name ]"));
        assert_eq!(parser.read_value().unwrap(), None);
        // The name was pushed back and is still next.
        let mut tokens = parser.into_tokens();
        assert_eq!(tokens.next_token().unwrap(), TokenKind::Name);
        assert_eq!(tokens.name_value(), "Name");
    }

    #[test]
    fn test_max_depth() {
        let config = ParserConfig::new().with_max_depth(2);
        let ok = Parser::new(Tokenizer::new("[ [ 1 ] ]"))
            .with_config(config.clone())
            .parse_top_level_array();
        assert!(ok.is_ok());
        let deep = Parser::new(Tokenizer::new("[ [ [ 1 ] ] ]"))
            .with_config(config)
            .parse_top_level_array();
        assert!(matches!(deep, Err(ParseError::TooDeep(2, _))));
    }

    #[test]
    fn test_custom_unit_system_priority() {
        struct Overlap;
        static LENGTHS: UnitTable = UnitTable::new(&[("u", 2.0)]);
        static TIMES: UnitTable = UnitTable::new(&[("u", 3.0), ("tick", 0.5)]);
        static NONE: UnitTable = UnitTable::new(&[]);
        impl UnitSystem for Overlap {
            fn registry(&self, family: UnitFamily) -> &dyn UnitRegistry {
                match family {
                    UnitFamily::Length => &LENGTHS,
                    UnitFamily::Time => &TIMES,
                    _ => &NONE,
                }
            }
        }
        let rec = Parser::with_units(Tokenizer::new("{ a 1 <u> b 2 <tick> }"), &Overlap)
            .parse_top_level_record()
            .unwrap();
        assert_eq!(rec.get_string("a%Length"), Some("u"));
        assert!(!rec.contains_key("a%Time"));
        assert_eq!(rec.get_string("b%Time"), Some("tick"));
    }

    #[test]
    fn test_error_locations() {
        let ctx = ParseContext::new(Some("test.ssc"));
        let err = Parser::new(Tokenizer::with_context("{\n  a 1\n  b <km>\n}", ctx.clone()))
            .with_context(ctx)
            .parse_top_level_record()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected value for property \"b\" at 3:5 of <test.ssc>"
        );
    }
}
