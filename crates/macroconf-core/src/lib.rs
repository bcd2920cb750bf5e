//! macroconf-core: configurable macro documents
//!
//! A macro document may start with a YAML header that declares options.
//! Users supply values for those options, which are validated and
//! substituted into `${id}` placeholders in the document body.
//!
//! # Example
//!
//! ```rust
//! use macroconf_core::{ParsedMacro, RawValues, Scalar};
//!
//! let doc = "---
//! config:
//!   - id: speed
//!     type: number
//!     label: Speed
//!     default: 5
//!     min: 1
//!     max: 10
//! ---
//! go ${speed}";
//!
//! let parsed = ParsedMacro::parse(doc).unwrap();
//! assert_eq!(parsed.render(&RawValues::new()).unwrap(), "go 5");
//!
//! let mut raw = RawValues::new();
//! raw.insert("speed".into(), Scalar::from("7"));
//! assert_eq!(parsed.render(&raw).unwrap(), "go 7");
//! ```

pub mod error;
pub mod frontmatter;
pub mod interpolation;
pub mod resolver;
pub mod schema;
pub mod value;

mod document;

pub use document::ParsedMacro;
pub use error::{Error, ErrorKind, Result};
pub use frontmatter::{split, Frontmatter};
pub use interpolation::substitute;
pub use resolver::{resolve, RawValues, ResolvedValues};
pub use schema::{parse_schema, Choice, ConfigOption, DropdownOption, NumberOption, Schema};
pub use value::{Scalar, Value};
