mod error;
mod grammar;

pub use error::ParseError;

use crate::Calculator;

/// Parse a `function_cal` string into a [`Calculator`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid calculator expression
/// or names a fact outside the supported set.
pub fn parse(input: &str) -> Result<Calculator, ParseError> {
    use winnow::Parser;
    grammar::calculator
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
