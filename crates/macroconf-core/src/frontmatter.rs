//! Split a macro document into its optional header block and body.
//!
//! ```text
//! ---
//! config:
//!   - id: speed
//!     ...
//! ---
//! body with ${speed}
//! ```

/// Marker opening and closing the header block
pub const DELIMITER: &str = "---";

/// A document split into header text and body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Text between the delimiter lines, if a complete header block exists
    pub header: Option<&'a str>,
    /// Everything after the header block (or the whole document)
    pub body: &'a str,
}

impl<'a> Frontmatter<'a> {
    fn without_header(content: &'a str) -> Self {
        Self {
            header: None,
            body: content,
        }
    }
}

/// Split `content` into header and body.
///
/// The opener only has to start with `---`, so `----` or `---title` also open
/// a header; the closing line must be `---` plus optional whitespace.
/// Without an opening `---` (after leading whitespace) or without a closing
/// `---` line, the untrimmed content is returned as the body. When the closing
/// delimiter is the last line and has no line break, the body is that
/// delimiter line.
pub fn split(content: &str) -> Frontmatter<'_> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with(DELIMITER) {
        return Frontmatter::without_header(content);
    }

    let Some(opener_end) = trimmed.find('\n') else {
        return Frontmatter::without_header(content);
    };
    let header_start = opener_end + 1;

    let mut line_start = header_start;
    loop {
        let rest = &trimmed[line_start..];
        let (line, next_line) = match rest.find('\n') {
            Some(i) => (&rest[..i], Some(line_start + i + 1)),
            None => (rest, None),
        };

        if is_delimiter_line(line) {
            let header = if line_start > header_start {
                &trimmed[header_start..line_start - 1]
            } else {
                ""
            };
            let body = match next_line {
                Some(body_start) => &trimmed[body_start..],
                None => line,
            };
            return Frontmatter {
                header: Some(header),
                body,
            };
        }

        match next_line {
            Some(next) => line_start = next,
            None => return Frontmatter::without_header(content),
        }
    }
}

/// `---` optionally followed by whitespace
fn is_delimiter_line(line: &str) -> bool {
    line.strip_prefix(DELIMITER)
        .is_some_and(|rest| rest.chars().all(char::is_whitespace))
}
