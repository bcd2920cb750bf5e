//! Configuration schema declared in a macro header
//!
//! The header is a YAML document with a `config` sequence. Each entry is
//! tagged by `type`:
//!
//! ```yaml
//! config:
//!   - id: speed
//!     type: number
//!     label: Speed
//!     default: 5
//!     min: 1
//!     max: 10
//!   - id: mode
//!     type: dropdown
//!     label: Mode
//!     options:
//!       - { value: a, label: A }
//!       - { value: b, label: B }
//! ```
//!
//! A header without a `config` sequence declares nothing. A `config` entry
//! that fails validation rejects the whole schema.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{entry_path, Error, Result};
use crate::value::{Scalar, Value};

/// A numeric option constrained to an inclusive range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberOption {
    pub id: String,
    pub label: String,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

/// An option restricted to a fixed list of choices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub id: String,
    pub label: String,
    /// Declared choices, never empty; the first one is the default
    pub options: Vec<Choice>,
}

/// One entry of a dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// A declared configuration option
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigOption {
    Number(NumberOption),
    Dropdown(DropdownOption),
}

/// Discriminator of a [`ConfigOption`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Number,
    Dropdown,
}

impl OptionKind {
    /// The `type` tag used in headers
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Number => "number",
            OptionKind::Dropdown => "dropdown",
        }
    }
}

impl ConfigOption {
    pub fn id(&self) -> &str {
        match self {
            ConfigOption::Number(o) => &o.id,
            ConfigOption::Dropdown(o) => &o.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ConfigOption::Number(o) => &o.label,
            ConfigOption::Dropdown(o) => &o.label,
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            ConfigOption::Number(_) => OptionKind::Number,
            ConfigOption::Dropdown(_) => OptionKind::Dropdown,
        }
    }

    /// Value used when the user supplies none
    pub fn default_value(&self) -> Scalar {
        match self {
            ConfigOption::Number(o) => Scalar::Number(o.default),
            ConfigOption::Dropdown(o) => Scalar::Text(o.default_choice().value.clone()),
        }
    }
}

impl DropdownOption {
    /// The first declared choice
    pub fn default_choice(&self) -> &Choice {
        // Parsing rejects dropdowns without choices.
        &self.options[0]
    }

    /// Look up a choice by its exact value
    pub fn choice(&self, value: &str) -> Option<&Choice> {
        self.options.iter().find(|c| c.value == value)
    }
}

/// The ordered list of options a macro declares
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    config: Vec<ConfigOption>,
}

impl Schema {
    /// Create a schema from already validated options
    pub fn new(config: Vec<ConfigOption>) -> Self {
        Self { config }
    }

    /// Options in declaration order
    pub fn options(&self) -> &[ConfigOption] {
        &self.config
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigOption> {
        self.config.iter()
    }

    pub fn len(&self) -> usize {
        self.config.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    /// First option declared with `id`
    pub fn get(&self, id: &str) -> Option<&ConfigOption> {
        self.config.iter().find(|o| o.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Option ids in declaration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.config.iter().map(ConfigOption::id)
    }

    /// Emit the schema in header form (a `config` sequence)
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::internal(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a ConfigOption;
    type IntoIter = std::slice::Iter<'a, ConfigOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.config.iter()
    }
}

/// Parse and validate the `config` section of a header.
pub fn parse_schema(header: &str) -> Result<Schema> {
    if header.trim().is_empty() {
        log::debug!("Empty header, no options declared");
        return Ok(Schema::default());
    }

    let root = serde_yaml::from_str::<serde_yaml::Value>(header)
        .map(Value::from)
        .map_err(|e| Error::parse(e.to_string()))?;

    let Some(entries) = root.get("config").and_then(Value::as_sequence) else {
        log::debug!("Header has no 'config' sequence, no options declared");
        return Ok(Schema::default());
    };

    let config = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect::<Result<Vec<_>>>()?;

    log::debug!("Parsed schema with {} option(s)", config.len());
    Ok(Schema::new(config))
}

fn parse_entry(index: usize, entry: &Value) -> Result<ConfigOption> {
    let Some(fields) = entry.as_mapping() else {
        return Err(Error::malformed_entry(index));
    };

    match fields.get("type").and_then(Value::as_str) {
        Some("number") => parse_number(index, fields).map(ConfigOption::Number),
        Some("dropdown") => parse_dropdown(index, fields).map(ConfigOption::Dropdown),
        _ => Err(Error::unknown_option_type(
            index,
            fields
                .get("type")
                .filter(|t| !t.is_null())
                .map(ToString::to_string),
        )),
    }
}

fn parse_number(index: usize, fields: &IndexMap<String, Value>) -> Result<NumberOption> {
    let id = required_str(fields, "id", &entry_path(index))?;
    let label = required_str(fields, "label", &id)?;
    let default = required_number(fields, "default", &id)?;
    let min = required_number(fields, "min", &id)?;
    let max = required_number(fields, "max", &id)?;

    Ok(NumberOption {
        id,
        label,
        default,
        min,
        max,
    })
}

fn parse_dropdown(index: usize, fields: &IndexMap<String, Value>) -> Result<DropdownOption> {
    let id = required_str(fields, "id", &entry_path(index))?;
    let label = required_str(fields, "label", &id)?;

    let entries = match present(fields, "options") {
        None => return Err(Error::missing_field(&id, "options")),
        Some(Value::Sequence(entries)) if entries.is_empty() => {
            return Err(Error::wrong_type(
                &id,
                "options",
                "non-empty sequence",
                "empty sequence",
            ))
        }
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            return Err(Error::wrong_type(
                &id,
                "options",
                "non-empty sequence",
                other.type_name(),
            ))
        }
    };

    let options = entries
        .iter()
        .enumerate()
        .map(|(position, choice)| parse_choice(&id, position, choice))
        .collect::<Result<Vec<_>>>()?;

    Ok(DropdownOption { id, label, options })
}

fn parse_choice(id: &str, position: usize, choice: &Value) -> Result<Choice> {
    let Some(fields) = choice.as_mapping() else {
        return Err(Error::wrong_type(
            id,
            format!("options[{}]", position),
            "mapping",
            choice.type_name(),
        ));
    };

    let path = format!("{}.options[{}]", id, position);
    Ok(Choice {
        value: required_str(fields, "value", &path)?,
        label: required_str(fields, "label", &path)?,
    })
}

/// A field that is present and not null
fn present<'v>(fields: &'v IndexMap<String, Value>, field: &str) -> Option<&'v Value> {
    fields.get(field).filter(|v| !v.is_null())
}

fn required_str(fields: &IndexMap<String, Value>, field: &str, path: &str) -> Result<String> {
    match present(fields, field) {
        None => Err(Error::missing_field(path, field)),
        Some(Value::String(s)) if s.is_empty() => Err(Error::wrong_type(
            path,
            field,
            "non-empty string",
            "empty string",
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::wrong_type(
            path,
            field,
            "non-empty string",
            other.type_name(),
        )),
    }
}

fn required_number(fields: &IndexMap<String, Value>, field: &str, path: &str) -> Result<f64> {
    let value = present(fields, field).ok_or_else(|| Error::missing_field(path, field))?;
    value
        .as_f64()
        .ok_or_else(|| Error::wrong_type(path, field, "number", value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const SPEED: &str = "config:
  - id: speed
    type: number
    label: Speed
    default: 5
    min: 1
    max: 10
";

    #[test]
    fn test_parse_number_option() {
        let schema = parse_schema(SPEED).unwrap();

        assert_eq!(
            schema.options(),
            &[ConfigOption::Number(NumberOption {
                id: "speed".into(),
                label: "Speed".into(),
                default: 5.0,
                min: 1.0,
                max: 10.0,
            })]
        );
    }

    #[test]
    fn test_parse_dropdown_option() {
        let schema = parse_schema(
            r#"
config:
  - id: mode
    type: dropdown
    label: Mode
    options:
      - value: a
        label: A
      - { value: b, label: B }
"#,
        )
        .unwrap();

        let Some(ConfigOption::Dropdown(mode)) = schema.get("mode") else {
            panic!("Expected dropdown");
        };
        assert_eq!(mode.label, "Mode");
        assert_eq!(mode.options.len(), 2);
        assert_eq!(mode.default_choice().value, "a");
        assert_eq!(mode.choice("b").map(|c| c.label.as_str()), Some("B"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let schema = parse_schema(
            r#"
config:
  - { id: z, type: number, label: Z, default: 0, min: 0, max: 1 }
  - { id: a, type: dropdown, label: A, options: [{ value: x, label: X }] }
  - { id: m, type: number, label: M, default: 0.5, min: 0, max: 1 }
"#,
        )
        .unwrap();

        assert_eq!(schema.ids().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(schema.get("m").unwrap().default_value(), Scalar::Number(0.5));
    }

    #[test]
    fn test_empty_or_unrelated_header_declares_nothing() {
        assert!(parse_schema("").unwrap().is_empty());
        assert!(parse_schema("   \n").unwrap().is_empty());
        assert!(parse_schema("title: My macro").unwrap().is_empty());
        assert!(parse_schema("- just\n- a list").unwrap().is_empty());
        assert!(parse_schema("plain scalar").unwrap().is_empty());
        assert!(parse_schema("config: not-a-list").unwrap().is_empty());
        assert!(parse_schema("config: { id: x }").unwrap().is_empty());
        assert!(parse_schema("config:").unwrap().is_empty());
    }

    #[test]
    fn test_non_string_keys_are_accepted() {
        let schema = parse_schema(
            "version: 1\n2024: launch\nconfig:\n  - { id: speed, type: number, label: Speed, default: 5, min: 1, max: 10, 1: x }\n",
        )
        .unwrap();
        assert_eq!(schema.ids().collect::<Vec<_>>(), vec!["speed"]);

        assert!(parse_schema("true: yes\n").unwrap().is_empty());
        assert!(parse_schema("notes: { 1: first, false: second }\n").unwrap().is_empty());
    }

    #[test]
    fn test_tagged_values_are_accepted() {
        assert!(parse_schema("note: !custom hello\nconfig: []\n").unwrap().is_empty());

        let schema = parse_schema(
            "config:\n  - id: mode\n    type: !kind dropdown\n    label: Mode\n    extra: !custom ignored\n    options:\n      - { value: a, label: A }\n",
        )
        .unwrap();
        assert!(matches!(schema.get("mode"), Some(ConfigOption::Dropdown(_))));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = parse_schema("config: [unclosed").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn test_entry_not_a_mapping() {
        let err = parse_schema("config:\n  - just a string\n").unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedEntry { index: 0 });
        assert_eq!(err.path.as_deref(), Some("config[0]"));
    }

    #[test]
    fn test_unknown_option_type() {
        let err = parse_schema("config:\n  - { id: s, type: slider, label: S }\n").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownOptionType {
                index: 0,
                found: Some("slider".into())
            }
        );

        let err = parse_schema(&format!("{}  - {{ id: t, label: T }}\n", SPEED)).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownOptionType {
                index: 1,
                found: None
            }
        );
    }

    #[test]
    fn test_type_tag_is_case_sensitive() {
        let err = parse_schema("config:\n  - { id: s, type: Number, label: S }\n").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownOptionType { .. }));
    }

    #[test]
    fn test_missing_id_is_located_by_index() {
        let err = parse_schema(
            "config:\n  - { type: number, label: S, default: 1, min: 0, max: 2 }\n",
        )
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::MissingField { field: "id".into() });
        assert_eq!(err.path.as_deref(), Some("config[0]"));
    }

    #[test]
    fn test_missing_field_after_id_is_located_by_id() {
        let err = parse_schema("config:\n  - { id: speed, type: number, label: S, min: 0, max: 2 }\n")
            .unwrap_err();

        assert_eq!(
            err.kind,
            ErrorKind::MissingField {
                field: "default".into()
            }
        );
        assert_eq!(err.path.as_deref(), Some("speed"));
    }

    #[test]
    fn test_null_field_counts_as_missing() {
        let err = parse_schema(
            "config:\n  - { id: speed, type: number, label: ~, default: 1, min: 0, max: 2 }\n",
        )
        .unwrap_err();

        assert_eq!(err.kind, ErrorKind::MissingField { field: "label".into() });
    }

    #[test]
    fn test_wrong_field_types() {
        let err = parse_schema(
            "config:\n  - { id: speed, type: number, label: S, default: '5', min: 0, max: 9 }\n",
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::WrongType {
                field: "default".into(),
                expected: "number".into(),
                found: "string".into(),
            }
        );

        let err = parse_schema("config:\n  - { id: 7, type: number, label: S, default: 1, min: 0, max: 9 }\n")
            .unwrap_err();
        assert_eq!(err.path.as_deref(), Some("config[0]"));
        assert!(matches!(err.kind, ErrorKind::WrongType { ref field, .. } if field == "id"));

        let err = parse_schema("config:\n  - { id: '', type: number, label: S, default: 1, min: 0, max: 9 }\n")
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongType { ref found, .. } if found == "empty string"));
    }

    #[test]
    fn test_dropdown_requires_non_empty_options() {
        let err = parse_schema("config:\n  - { id: mode, type: dropdown, label: M }\n").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MissingField {
                field: "options".into()
            }
        );

        let err = parse_schema("config:\n  - { id: mode, type: dropdown, label: M, options: [] }\n")
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongType { ref field, .. } if field == "options"));
        assert_eq!(err.path.as_deref(), Some("mode"));

        let err = parse_schema("config:\n  - { id: mode, type: dropdown, label: M, options: a }\n")
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongType { ref found, .. } if found == "string"));
    }

    #[test]
    fn test_dropdown_choice_errors_name_position() {
        let err = parse_schema(
            r#"
config:
  - id: mode
    type: dropdown
    label: Mode
    options:
      - { value: a, label: A }
      - { value: b }
"#,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField { field: "label".into() });
        assert_eq!(err.path.as_deref(), Some("mode.options[1]"));

        let err = parse_schema(
            "config:\n  - { id: mode, type: dropdown, label: M, options: [plain] }\n",
        )
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongType { ref field, .. } if field == "options[0]"));

        let err = parse_schema(
            "config:\n  - { id: mode, type: dropdown, label: M, options: [{ value: 1, label: One }] }\n",
        )
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::WrongType { ref found, .. } if found == "integer"));
    }

    #[test]
    fn test_one_broken_entry_rejects_whole_schema() {
        let header = format!("{}  - 42\n", SPEED);
        let err = parse_schema(&header).unwrap_err();

        assert_eq!(err.kind, ErrorKind::MalformedEntry { index: 1 });
    }

    #[test]
    fn test_duplicate_ids_are_accepted() {
        let header = format!(
            "{}  - {{ id: speed, type: number, label: Again, default: 2, min: 0, max: 3 }}\n",
            SPEED
        );
        let schema = parse_schema(&header).unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get("speed").unwrap().label(), "Speed");
    }

    #[test]
    fn test_inverted_range_is_accepted() {
        let schema =
            parse_schema("config:\n  - { id: n, type: number, label: N, default: 5, min: 10, max: 1 }\n")
                .unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let schema = parse_schema(
            "config:\n  - { id: n, type: number, label: N, default: 1, min: 0, max: 2, step: 1 }\n",
        )
        .unwrap();
        assert_eq!(schema.get("n").unwrap().kind(), OptionKind::Number);
    }

    #[test]
    fn test_to_yaml_emits_header_form() {
        let schema = parse_schema(SPEED).unwrap();
        let yaml = schema.to_yaml().unwrap();

        assert!(yaml.contains("type: number"));
        assert_eq!(parse_schema(&yaml).unwrap(), schema);
    }
}
