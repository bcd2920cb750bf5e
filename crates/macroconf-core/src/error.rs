//! Error types for macroconf
//!
//! Every failure carries the kind of error, the location it refers to
//! (an entry path such as `config[2]`, an option id such as `speed`, or a
//! choice path such as `mode.options[1]`) and an actionable help message.

use std::fmt;

/// Result type alias for macroconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for macroconf operations
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Location in the schema the error refers to (e.g., "config[0]", "speed")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The header block is not valid YAML
    #[error("Parse error")]
    Parse,
    /// A schema entry lacks a required field
    #[error("Missing required field '{field}'")]
    MissingField { field: String },
    /// A schema entry field has the wrong type
    #[error("Field '{field}' must be a {expected}, got {found}")]
    WrongType {
        field: String,
        expected: String,
        found: String,
    },
    /// A `config` entry is not a mapping
    #[error("Config entry {index} is not a mapping")]
    MalformedEntry { index: usize },
    /// A `config` entry has a missing or unsupported `type`
    #[error("Config entry {index} has unknown option type {}", .found.as_deref().unwrap_or("(none)"))]
    UnknownOptionType { index: usize, found: Option<String> },
    /// A numeric option value is not a finite number
    #[error("Value '{value}' for '{id}' is not a number")]
    NotANumber { id: String, value: String },
    /// A numeric option value lies outside its declared range
    #[error("Value {value} for '{id}' is out of range [{min}, {max}]")]
    OutOfRange {
        id: String,
        value: f64,
        min: f64,
        max: f64,
    },
    /// A dropdown value is not one of the declared choices
    #[error("Value '{value}' for '{id}' is not a valid option")]
    InvalidOption { id: String, value: String },
    /// A placeholder references an id the schema does not declare
    #[error("Unresolved reference: ${{{name}}}")]
    UnresolvedReference { name: String },
    /// Internal error (bug in the caller or in macroconf)
    #[error("Internal error")]
    Internal,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: None,
            help: None,
            cause: None,
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            help: Some("Check the YAML syntax between the '---' delimiters".into()),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Parse)
        }
    }

    /// Create a missing field error
    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            path: Some(path.into()),
            help: Some(format!("Add the '{}' field to the entry", field)),
            ..Self::new(ErrorKind::MissingField { field })
        }
    }

    /// Create a wrong type error
    pub fn wrong_type(
        path: impl Into<String>,
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let expected = expected.into();
        Self {
            path: Some(path.into()),
            help: Some(format!("Change '{}' to a {}", field, expected)),
            ..Self::new(ErrorKind::WrongType {
                field,
                expected,
                found: found.into(),
            })
        }
    }

    /// Create a malformed entry error
    pub fn malformed_entry(index: usize) -> Self {
        Self {
            path: Some(entry_path(index)),
            help: Some("Each config entry must be a mapping with 'id', 'type' and 'label'".into()),
            ..Self::new(ErrorKind::MalformedEntry { index })
        }
    }

    /// Create an unknown option type error
    pub fn unknown_option_type(index: usize, found: Option<String>) -> Self {
        Self {
            path: Some(entry_path(index)),
            help: Some("Set 'type' to either 'number' or 'dropdown'".into()),
            ..Self::new(ErrorKind::UnknownOptionType { index, found })
        }
    }

    /// Create a not-a-number error
    pub fn not_a_number(id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: Some(id.clone()),
            help: Some("Provide a finite decimal number".into()),
            ..Self::new(ErrorKind::NotANumber {
                id,
                value: value.into(),
            })
        }
    }

    /// Create an out of range error
    pub fn out_of_range(id: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        let id = id.into();
        Self {
            path: Some(id.clone()),
            help: Some(format!("Choose a value between {} and {}", min, max)),
            ..Self::new(ErrorKind::OutOfRange {
                id,
                value,
                min,
                max,
            })
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(id: impl Into<String>, value: impl Into<String>, allowed: &[&str]) -> Self {
        let id = id.into();
        Self {
            path: Some(id.clone()),
            help: Some(format!("Valid options: {}", allowed.join(", "))),
            ..Self::new(ErrorKind::InvalidOption {
                id,
                value: value.into(),
            })
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved_reference(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            help: Some(format!(
                "Declare '{}' in the config section or remove the placeholder",
                name
            )),
            ..Self::new(ErrorKind::UnresolvedReference { name })
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Internal)
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True when the document author wrote a broken header or body.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Parse
                | ErrorKind::MissingField { .. }
                | ErrorKind::WrongType { .. }
                | ErrorKind::MalformedEntry { .. }
                | ErrorKind::UnknownOptionType { .. }
                | ErrorKind::UnresolvedReference { .. }
        )
    }

    /// True when a user-supplied value was rejected.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotANumber { .. }
                | ErrorKind::OutOfRange { .. }
                | ErrorKind::InvalidOption { .. }
        )
    }
}

/// Path of the `index`-th entry of the `config` sequence
pub(crate) fn entry_path(index: usize) -> String {
    format!("config[{}]", index)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
