//! Main ParsedMacro type for macroconf
//!
//! A ParsedMacro is built once per document and rendered once per request
//! with that request's raw values.

use crate::error::Result;
use crate::frontmatter;
use crate::interpolation;
use crate::resolver::{self, RawValues, ResolvedValues};
use crate::schema::{self, Schema};

/// A macro document split into its declared schema and body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMacro {
    /// Options declared in the header, in declaration order
    config: Schema,
    /// Document text after the header block
    body: String,
}

impl ParsedMacro {
    /// Create a ParsedMacro from parts
    pub fn new(config: Schema, body: impl Into<String>) -> Self {
        Self {
            config,
            body: body.into(),
        }
    }

    /// Split a document and parse its header.
    ///
    /// A document without a header block declares no options and keeps its
    /// content verbatim as the body.
    pub fn parse(content: &str) -> Result<Self> {
        let split = frontmatter::split(content);
        let config = match split.header {
            Some(header) => schema::parse_schema(header)?,
            None => {
                log::debug!("No header block, document declares no options");
                Schema::default()
            }
        };

        Ok(Self::new(config, split.body))
    }

    pub fn schema(&self) -> &Schema {
        &self.config
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Resolve raw values against the declared options
    pub fn resolve(&self, raw: &RawValues) -> Result<ResolvedValues> {
        resolver::resolve(&self.config, raw)
    }

    /// Resolved values when the user supplies nothing
    pub fn defaults(&self) -> Result<ResolvedValues> {
        self.resolve(&RawValues::new())
    }

    /// Substitute already resolved values into the body
    pub fn substitute(&self, resolved: &ResolvedValues) -> Result<String> {
        interpolation::substitute(&self.body, &self.config, resolved)
    }

    /// Resolve `raw` and substitute the result into the body
    pub fn render(&self, raw: &RawValues) -> Result<String> {
        let resolved = self.resolve(raw)?;
        self.substitute(&resolved)
    }

    /// Placeholder names in the body that no option declares, in order of
    /// first appearance
    pub fn undeclared_references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in interpolation::placeholders(&self.body) {
            if !self.config.contains(name) && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Scalar;
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"---
title: Sprint
config:
  - id: speed
    type: number
    label: Speed
    default: 5
    min: 1
    max: 10
  - id: button
    type: dropdown
    label: Button
    options:
      - { value: A, label: A button }
      - { value: B, label: B button }
---
press ${button} for ${speed}s
"#;

    #[test]
    fn test_parse_document() {
        let parsed = ParsedMacro::parse(DOC).unwrap();

        assert_eq!(parsed.schema().ids().collect::<Vec<_>>(), vec!["speed", "button"]);
        assert_eq!(parsed.body(), "press ${button} for ${speed}s\n");
    }

    #[test]
    fn test_render_with_defaults() {
        let parsed = ParsedMacro::parse(DOC).unwrap();
        assert_eq!(parsed.render(&RawValues::new()).unwrap(), "press A for 5s\n");
    }

    #[test]
    fn test_render_with_values() {
        let parsed = ParsedMacro::parse(DOC).unwrap();
        let mut raw = RawValues::new();
        raw.insert("speed".into(), Scalar::from("8"));
        raw.insert("button".into(), Scalar::from("B"));

        assert_eq!(parsed.render(&raw).unwrap(), "press B for 8s\n");
    }

    #[test]
    fn test_render_reports_value_errors() {
        let parsed = ParsedMacro::parse(DOC).unwrap();
        let mut raw = RawValues::new();
        raw.insert("button".into(), Scalar::from("X"));

        let err = parsed.render(&raw).unwrap_err();
        assert!(err.is_value_error());
        assert!(matches!(err.kind, ErrorKind::InvalidOption { .. }));
    }

    #[test]
    fn test_parsed_macro_is_reusable_across_requests() {
        let parsed = ParsedMacro::parse(DOC).unwrap();

        for speed in 1..=10 {
            let mut raw = RawValues::new();
            raw.insert("speed".into(), Scalar::from(speed));
            let output = parsed.render(&raw).unwrap();
            assert_eq!(output, format!("press A for {}s\n", speed));
        }
    }

    #[test]
    fn test_document_without_header() {
        let doc = "  plain ${text}\n";
        let parsed = ParsedMacro::parse(doc).unwrap();

        assert!(parsed.schema().is_empty());
        assert_eq!(parsed.body(), doc);
        assert_eq!(parsed.undeclared_references(), vec!["text"]);
    }

    #[test]
    fn test_header_with_numeric_keys_renders() {
        let doc = "---\nnotes: { 1: first }\nconfig:\n  - { id: n, type: number, label: N, default: 2, min: 0, max: 3 }\n---\nn=${n}";
        let parsed = ParsedMacro::parse(doc).unwrap();

        assert_eq!(parsed.render(&RawValues::new()).unwrap(), "n=2");
    }

    #[test]
    fn test_broken_header_fails_parse() {
        let err = ParsedMacro::parse("---\nconfig:\n  - 1\n---\nbody\n").unwrap_err();
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_undeclared_references_are_deduplicated() {
        let parsed = ParsedMacro::parse("---\nconfig: []\n---\n${b} ${a} ${b}").unwrap();
        assert_eq!(parsed.undeclared_references(), vec!["b", "a"]);
    }

    #[test]
    fn test_defaults() {
        let parsed = ParsedMacro::parse(DOC).unwrap();
        let defaults = parsed.defaults().unwrap();

        assert_eq!(defaults.get("speed"), Some(&Scalar::Number(5.0)));
        assert_eq!(defaults.get("button"), Some(&Scalar::Text("A".into())));
    }
}
