// SPDX-License-Identifier: MIT OR Apache-2.0

//! Java-style `.properties` parser adapter.

use crate::domain::{ConfigError, Document, Result, Value};
use crate::ports::ConfigParser;

/// Parser for `key=value` property files.
///
/// Lines starting with `#` or `!` are comments. The key ends at the first
/// unescaped `=`, `:` or whitespace, and a line ending in an odd number of
/// backslashes continues on the next line. Escapes (`\\`, `\=`, `\:`, `\ `,
/// `\t`, `\n`, `\uXXXX`, ...) are resolved in keys and values. Keys are left
/// flat; the file reader expands dotted keys afterwards. Values stay strings.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::PropertiesParser;
/// use profilecfg::ports::ConfigParser;
///
/// let docs = PropertiesParser::new()
///     .parse("# bootstrap\nspring.cloud.config.enabled=true\n")
///     .unwrap();
/// assert_eq!(
///     docs[0].get("spring.cloud.config.enabled").and_then(|v| v.as_str()),
///     Some("true")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }

    /// Joins continued physical lines into logical lines, skipping comments.
    fn logical_lines(content: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut pending = String::new();
        let mut continuing = false;

        for raw in content.lines() {
            let line = raw.trim_start();
            if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            if trailing_backslashes(line) % 2 == 1 {
                pending.push_str(&line[..line.len() - 1]);
                continuing = true;
                continue;
            }

            pending.push_str(line);
            lines.push(std::mem::take(&mut pending));
            continuing = false;
        }

        if !pending.is_empty() {
            lines.push(pending);
        }
        lines
    }

    /// Splits a logical line at the first unescaped separator.
    fn split_entry(line: &str) -> (&str, &str) {
        let mut escaped = false;
        let mut key_end = line.len();
        for (idx, c) in line.char_indices() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '=' || c == ':' || c.is_whitespace() {
                key_end = idx;
                break;
            }
        }

        let rest = line[key_end..].trim_start();
        let rest = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
        (&line[..key_end], trim_value_end(rest.trim_start()))
    }

    fn unescape(raw: &str) -> Result<String> {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\u{000C}'),
                Some('u') => {
                    let unit = hex_unit(&mut chars, raw)?;
                    if (0xD800..0xDC00).contains(&unit) {
                        // High surrogate, expect the low half as the next escape
                        let mut ahead = chars.clone();
                        if ahead.next() == Some('\\') && ahead.next() == Some('u') {
                            let low = hex_unit(&mut ahead, raw)?;
                            if (0xDC00..0xE000).contains(&low) {
                                let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                                out.push(to_char(code, raw)?);
                                chars = ahead;
                                continue;
                            }
                        }
                    }
                    out.push(to_char(unit, raw)?);
                }
                Some(other) => out.push(other),
                None => {}
            }
        }

        Ok(out)
    }
}

fn trailing_backslashes(text: &str) -> usize {
    text.chars().rev().take_while(|c| *c == '\\').count()
}

/// Trims trailing whitespace unless the last whitespace character is escaped.
fn trim_value_end(value: &str) -> &str {
    let trimmed = value.trim_end();
    if trimmed.len() < value.len() && trailing_backslashes(trimmed) % 2 == 1 {
        let kept = value[trimmed.len()..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        return &value[..trimmed.len() + kept];
    }
    trimmed
}

fn hex_unit(chars: &mut std::str::Chars<'_>, raw: &str) -> Result<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return Err(malformed_escape(raw));
    }
    u32::from_str_radix(&hex, 16).map_err(|e| ConfigError::Parse {
        message: format!("Malformed \\uXXXX escape in '{}'", raw),
        source: Some(Box::new(e)),
    })
}

fn to_char(code: u32, raw: &str) -> Result<char> {
    char::from_u32(code).ok_or_else(|| malformed_escape(raw))
}

fn malformed_escape(raw: &str) -> ConfigError {
    ConfigError::Parse {
        message: format!("Malformed \\uXXXX escape in '{}'", raw),
        source: None,
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<Vec<Document>> {
        let mut doc = Document::new();

        for line in Self::logical_lines(content) {
            let (key, value) = Self::split_entry(&line);
            let key = Self::unescape(key)?;
            if !key.is_empty() {
                doc.insert(key, Value::from(Self::unescape(value)?));
            }
        }

        Ok(if doc.is_empty() { Vec::new() } else { vec![doc] })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(content: &str) -> Document {
        let mut docs = PropertiesParser::new().parse(content).unwrap();
        assert_eq!(docs.len(), 1);
        docs.remove(0)
    }

    fn str_of<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
        doc.get(key).and_then(Value::as_str)
    }

    #[test]
    fn test_separators() {
        let doc = parse_one("a=1\nb: two\nc three\nd =  spaced  \n");
        assert_eq!(str_of(&doc, "a"), Some("1"));
        assert_eq!(str_of(&doc, "b"), Some("two"));
        assert_eq!(str_of(&doc, "c"), Some("three"));
        assert_eq!(str_of(&doc, "d"), Some("spaced"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let doc = parse_one("# comment\n! also comment\n\n  key=value\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(str_of(&doc, "key"), Some("value"));
    }

    #[test]
    fn test_value_may_contain_separator() {
        let doc = parse_one("endpoint=http://config:8888/path?a=b\n");
        assert_eq!(str_of(&doc, "endpoint"), Some("http://config:8888/path?a=b"));
    }

    #[test]
    fn test_line_continuation() {
        let doc = parse_one("list=a,\\\n    b,\\\n    c\n");
        assert_eq!(str_of(&doc, "list"), Some("a,b,c"));
    }

    #[test]
    fn test_key_without_value() {
        let doc = parse_one("flag\n");
        assert_eq!(str_of(&doc, "flag"), Some(""));
    }

    #[test]
    fn test_empty_file() {
        assert!(PropertiesParser::new().parse("# nothing\n").unwrap().is_empty());
    }

    #[test]
    fn test_escaped_trailing_backslash_is_not_continuation() {
        let doc = parse_one("dir=C:\\\\\nnext=2\n");
        assert_eq!(str_of(&doc, "dir"), Some("C:\\"));
        assert_eq!(str_of(&doc, "next"), Some("2"));
    }

    #[test]
    fn test_odd_backslashes_continue() {
        let doc = parse_one("path=a\\\\\\\n  b\n");
        assert_eq!(str_of(&doc, "path"), Some("a\\b"));
    }

    #[test]
    fn test_escaped_separators_in_key() {
        let doc = parse_one("a\\=b\\:c\\ d = value\n");
        assert_eq!(doc.len(), 1);
        assert_eq!(str_of(&doc, "a=b:c d"), Some("value"));
    }

    #[test]
    fn test_value_escapes() {
        let doc = parse_one("tab=a\\tb\nline=a\\nb\nplain=\\q\nsep=x\\=y\\:z\n");
        assert_eq!(str_of(&doc, "tab"), Some("a\tb"));
        assert_eq!(str_of(&doc, "line"), Some("a\nb"));
        assert_eq!(str_of(&doc, "plain"), Some("q"));
        assert_eq!(str_of(&doc, "sep"), Some("x=y:z"));
    }

    #[test]
    fn test_unicode_escapes() {
        let doc = parse_one("greeting=caf\\u00e9\nemoji=\\uD83D\\uDE00\n");
        assert_eq!(str_of(&doc, "greeting"), Some("caf\u{e9}"));
        assert_eq!(str_of(&doc, "emoji"), Some("\u{1F600}"));
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let err = PropertiesParser::new().parse("bad=\\u12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(PropertiesParser::new().parse("bad=\\uZZZZ\n").is_err());
    }

    #[test]
    fn test_escaped_trailing_space_kept() {
        let doc = parse_one("pad=value\\ \nnext=1\n");
        assert_eq!(str_of(&doc, "pad"), Some("value "));
        assert_eq!(str_of(&doc, "next"), Some("1"));
    }

    #[test]
    fn test_comment_marker_inside_continuation() {
        let doc = parse_one("list=a,\\\n# not a comment\n");
        assert_eq!(str_of(&doc, "list"), Some("a,# not a comment"));
    }
}
