//! Placeholder parsing and substitution
//!
//! A placeholder is `${name}` where `name` is one or more ASCII letters,
//! digits or underscores. There is no escaping, nesting or whitespace inside
//! the braces; anything that does not match is literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::resolver::ResolvedValues;
use crate::schema::Schema;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("valid placeholder pattern"));

/// A piece of a macro body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied to the output as is
    Literal(&'a str),
    /// A `${name}` reference
    Placeholder(&'a str),
}

/// Split `body` into literal text and placeholders, left to right
pub fn parse(body: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(body) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&body[last..whole.start()]));
        }
        segments.push(Segment::Placeholder(name.as_str()));
        last = whole.end();
    }

    if last < body.len() {
        segments.push(Segment::Literal(&body[last..]));
    }

    segments
}

/// Names referenced by `body`, in order of appearance (duplicates kept)
pub fn placeholders(body: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Check if `body` contains any placeholder
pub fn contains_placeholder(body: &str) -> bool {
    PLACEHOLDER.is_match(body)
}

/// Replace every placeholder in `body` with its resolved value.
///
/// References are checked against `schema`; an undeclared name fails with an
/// unresolved reference error. Inserted values are not scanned again.
pub fn substitute(body: &str, schema: &Schema, resolved: &ResolvedValues) -> Result<String> {
    if !contains_placeholder(body) {
        return Ok(body.to_string());
    }

    let mut output = String::with_capacity(body.len());
    for segment in parse(body) {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(name) => {
                if !schema.contains(name) {
                    return Err(Error::unresolved_reference(name));
                }
                let value = resolved.get(name).ok_or_else(|| {
                    Error::internal(format!("No resolved value for declared option '{}'", name))
                        .with_path(name)
                        .with_help("Resolve values against the same schema used for substitution")
                })?;
                output.push_str(&value.to_string());
            }
        }
    }

    Ok(output)
}
