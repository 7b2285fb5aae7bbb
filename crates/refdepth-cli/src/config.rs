//! Just enough tsconfig parsing to extract project references.
//!
//! tsconfig files are JSONC: JSON plus `//` and `/* */` comments and
//! trailing commas. Rather than pulling in a full JSONC parser for one
//! field, the file is lexically reduced to plain JSON (string-aware comment
//! and trailing-comma removal) and handed to `serde_json`. Unknown fields
//! are ignored; only `references[].path` matters here.

use anyhow::{Context, Result};
use serde::Deserialize;

/// The slice of a tsconfig file this tool cares about.
#[derive(Debug, Deserialize)]
pub struct Tsconfig {
    /// `references` entries; absent means the project references nothing.
    #[serde(default)]
    pub references: Vec<ProjectReference>,
}

/// One entry of a tsconfig `references` array.
#[derive(Debug, Deserialize)]
pub struct ProjectReference {
    /// Path to the referenced project, relative to the referencing config's
    /// directory. May point at a directory or a tsconfig file.
    pub path: String,
}

/// Parse tsconfig text, tolerating JSONC comments and trailing commas.
///
/// # Errors
///
/// Fails when the comment-stripped text is not valid JSON or does not match
/// the expected shape.
pub fn parse_tsconfig(text: &str) -> Result<Tsconfig> {
    let json = strip_trailing_commas(&strip_comments(text));
    serde_json::from_str(&json).context("invalid tsconfig JSON")
}

/// Remove `//` line comments and `/* */` block comments, leaving string
/// contents untouched. Newlines inside line comments are kept so JSON error
/// positions stay meaningful.
fn strip_comments(text: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Code,
        InString { escaped: bool },
        LineComment,
        BlockComment { star: bool },
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            State::Code => match ch {
                '"' => {
                    state = State::InString { escaped: false };
                    out.push(ch);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment { star: false };
                }
                _ => out.push(ch),
            },
            State::InString { escaped } => {
                out.push(ch);
                state = match ch {
                    _ if escaped => State::InString { escaped: false },
                    '\\' => State::InString { escaped: true },
                    '"' => State::Code,
                    _ => State::InString { escaped: false },
                };
            }
            State::LineComment => {
                if ch == '\n' {
                    out.push(ch);
                    state = State::Code;
                }
            }
            State::BlockComment { star } => {
                state = match ch {
                    '/' if star => State::Code,
                    '*' => State::BlockComment { star: true },
                    _ => State::BlockComment { star: false },
                };
            }
        }
    }
    out
}

/// Remove commas that directly precede a closing `}` or `]` (ignoring
/// whitespace), string-aware.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for (at, &ch) in chars.iter().enumerate() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            ',' => {
                let next_meaningful = chars[at + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next_meaningful, Some('}' | ']')) {
                    out.push(ch);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_references() {
        let config = parse_tsconfig(r#"{ "references": [{ "path": "../core" }] }"#)
            .expect("valid tsconfig");
        assert_eq!(config.references.len(), 1);
        assert_eq!(config.references[0].path, "../core");
    }

    #[test]
    fn missing_references_defaults_to_empty() {
        let config = parse_tsconfig(r#"{ "compilerOptions": { "strict": true } }"#)
            .expect("valid tsconfig");
        assert!(config.references.is_empty());
    }

    #[test]
    fn tolerates_line_and_block_comments() {
        let text = r#"{
            // the projects we build first
            "references": [
                { "path": "../core" } /* primary */
            ]
        }"#;
        let config = parse_tsconfig(text).expect("comments are legal in tsconfig");
        assert_eq!(config.references[0].path, "../core");
    }

    #[test]
    fn tolerates_trailing_commas() {
        let text = r#"{
            "references": [
                { "path": "../core", },
                { "path": "../util", },
            ],
        }"#;
        let config = parse_tsconfig(text).expect("trailing commas are legal in tsconfig");
        assert_eq!(config.references.len(), 2);
    }

    #[test]
    fn slashes_inside_strings_survive() {
        let text = r#"{ "references": [{ "path": "..//weird" }] }"#;
        let config = parse_tsconfig(text).expect("string content is not a comment");
        assert_eq!(config.references[0].path, "..//weird");
    }

    #[test]
    fn quotes_inside_strings_survive_comma_stripping() {
        let text = r#"{ "references": [{ "path": "a,}" }] }"#;
        let config = parse_tsconfig(text).expect("comma inside string is data");
        assert_eq!(config.references[0].path, "a,}");
    }

    #[test]
    fn malformed_json_is_a_clear_error() {
        let err = parse_tsconfig("{ not json").expect_err("must fail");
        assert!(err.to_string().contains("invalid tsconfig JSON"));
    }
}
