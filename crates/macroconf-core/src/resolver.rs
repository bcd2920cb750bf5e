//! Value resolution
//!
//! Turns user-supplied raw values into one validated [`Scalar`] per declared
//! option. Missing values fall back to the option's default; numbers are
//! coerced and range checked, dropdown values must match a declared choice.
//! The first invalid value aborts resolution.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::schema::{ConfigOption, DropdownOption, NumberOption, Schema};
use crate::value::Scalar;

/// Raw values keyed by option id, as supplied by a user
pub type RawValues = IndexMap<String, Scalar>;

/// Fully resolved values, one per declared option, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedValues(IndexMap<String, Scalar>);

impl ResolvedValues {
    pub fn get(&self, id: &str) -> Option<&Scalar> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    pub fn into_inner(self) -> IndexMap<String, Scalar> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ResolvedValues {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = indexmap::map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolve `raw` against every option of `schema`.
///
/// Keys of `raw` that the schema does not declare are ignored.
pub fn resolve(schema: &Schema, raw: &RawValues) -> Result<ResolvedValues> {
    let mut resolved = IndexMap::with_capacity(schema.len());

    for option in schema {
        let value = match raw.get(option.id()) {
            Some(value) => resolve_option(option, value)?,
            None => {
                log::trace!("No value for '{}', using default", option.id());
                resolve_option(option, &option.default_value())?
            }
        };
        // Duplicate ids keep the first declaration's value.
        resolved.entry(option.id().to_string()).or_insert(value);
    }

    Ok(ResolvedValues(resolved))
}

fn resolve_option(option: &ConfigOption, value: &Scalar) -> Result<Scalar> {
    match option {
        ConfigOption::Number(number) => resolve_number(number, value).map(Scalar::Number),
        ConfigOption::Dropdown(dropdown) => resolve_dropdown(dropdown, value).map(Scalar::Text),
    }
}

fn resolve_number(option: &NumberOption, value: &Scalar) -> Result<f64> {
    let number = match value {
        Scalar::Number(n) => *n,
        Scalar::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::not_a_number(&option.id, text))?,
    };

    if !number.is_finite() {
        return Err(Error::not_a_number(&option.id, value.to_string()));
    }

    if number < option.min || number > option.max {
        return Err(Error::out_of_range(
            &option.id, number, option.min, option.max,
        ));
    }

    Ok(number)
}

fn resolve_dropdown(option: &DropdownOption, value: &Scalar) -> Result<String> {
    let text = value.to_string();
    if option.choice(&text).is_some() {
        return Ok(text);
    }

    let allowed: Vec<&str> = option.options.iter().map(|c| c.value.as_str()).collect();
    Err(Error::invalid_option(&option.id, text, &allowed))
}
