// Numeric Literal Parsing
//
// Query text can size-qualify numbers the way shell tools do: `2k` is 2048
// bytes. A trailing letter is a 1024-based multiplier; anything outside the
// supported set is rejected by name.

use crate::query::parser::parser::ParseError;

const MULTIPLIERS: [(char, f64); 4] = [
    ('k', 1024.0),
    ('m', 1024.0 * 1024.0),
    ('g', 1024.0 * 1024.0 * 1024.0),
    ('t', 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

/// Parse a numeric literal, honoring a trailing unit multiplier.
pub fn parse_number(text: &str) -> Result<f64, ParseError> {
    let invalid = || ParseError::InvalidNumber(text.to_string());

    let last = text.chars().last().ok_or_else(invalid)?;
    if last.is_alphabetic() {
        let multiplier = MULTIPLIERS
            .iter()
            .find(|(letter, _)| *letter == last.to_ascii_lowercase())
            .map(|(_, factor)| *factor)
            .ok_or(ParseError::UnsupportedMultiplier(last))?;

        let base: f64 = text[..text.len() - last.len_utf8()]
            .parse()
            .map_err(|_| invalid())?;
        return Ok(base * multiplier);
    }

    text.parse().map_err(|_| invalid())
}
