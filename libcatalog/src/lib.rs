//! Catalog file parser and typed value model.
//!
//! Catalog files describe objects as nested records of properties. A property
//! value is a number, a string, a boolean, an array or another record, and may
//! be followed by a units section naming the physical units it is written in:
//!
//! ```text
//! {
//!   Radius 6378.14 <km>
//!   SemiMajorAxis 1.0000 <AU>
//!   Color [ 0.85 0.85 1.0 ]
//! }
//! ```
//!
//! # Parsing Pipeline
//!
//! 1. **Tokenizer**: Converts source text into a stream of tokens with one
//!    token of push-back ([`TokenSource`]).
//!
//! 2. **Value Parser**: Recursively builds [`Value`] trees from the tokens,
//!    recording each declared unit under a synthetic `property%Family` key.
//!
//! 3. **Retrieval**: Typed getters on [`Record`] read numbers, vectors,
//!    colors and paths; [`Record::scaled`] converts quantities between units.

mod color;
mod encode;
mod error;
mod parser;
mod path;
mod record;
mod scaled;
mod tokenizer;
pub mod units;
mod value;

pub use color::Color;
pub use encode::{encode, try_encode, Format};
pub use error::{EncodeError, ParseContext, ParseError, Result};
pub use parser::{Parser, ParserConfig, DEFAULT_MAX_DEPTH};
pub use path::{HomeDirExpander, PathExpander};
pub use record::Record;
pub use scaled::Scaled;
pub use tokenizer::{TokenKind, TokenSource, Tokenizer};
pub use units::{StandardUnits, UnitFamily, UnitRegistry, UnitSystem};
pub use value::{Value, ValueArray, ValueKind};

/// Parse a catalog document consisting of one record.
///
/// # Example
///
/// ```
/// use libcatalog::parse_record;
///
/// let planet = parse_record("{ Radius 6378.14 <km> }").unwrap();
/// assert_eq!(planet.get_number::<f64>("Radius"), Some(6378.14));
/// ```
pub fn parse_record(input: &str) -> Result<Record> {
    parse_record_with_filename(input, None)
}

/// Parse a record document with a filename for error messages.
pub fn parse_record_with_filename(input: &str, filename: Option<&str>) -> Result<Record> {
    let ctx = ParseContext::new(filename);
    Parser::new(Tokenizer::with_context(input, ctx.clone()))
        .with_context(ctx)
        .parse_top_level_record()
}

/// Parse a catalog document consisting of one array.
///
/// # Example
///
/// ```
/// use libcatalog::{parse_array, Value};
///
/// let values = parse_array("[ 1 \"two\" true ]").unwrap();
/// assert_eq!(values[2], Value::Boolean(true));
/// ```
pub fn parse_array(input: &str) -> Result<ValueArray> {
    parse_array_with_filename(input, None)
}

/// Parse an array document with a filename for error messages.
pub fn parse_array_with_filename(input: &str, filename: Option<&str>) -> Result<ValueArray> {
    let ctx = ParseContext::new(filename);
    Parser::new(Tokenizer::with_context(input, ctx.clone()))
        .with_context(ctx)
        .parse_top_level_array()
}
