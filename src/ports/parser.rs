// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which turns the raw text of a
//! configuration file into one or more [`Document`]s. Formats that support
//! several documents per file (YAML `---` separators) return them in file
//! order so profile filtering can be applied to each one.

use crate::domain::{Document, Result};

/// A trait for parsing configuration files.
///
/// Parsers return documents exactly as written: dotted keys such as
/// `spring.cloud.config.name: orders` are left for the file reader to
/// normalize, and `profiles` directives are left in place.
///
/// # Examples
///
/// ```rust
/// use profilecfg::ports::ConfigParser;
/// use profilecfg::domain::{Document, Result};
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<Vec<Document>> {
///         let doc = content
///             .lines()
///             .filter_map(|line| line.split_once(' '))
///             .collect();
///         Ok(vec![doc])
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let docs = LineParser.parse("name orders").unwrap();
/// assert_eq!(docs[0].get_str("name"), Some("orders"));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into documents, in file order.
    ///
    /// An empty file yields no documents.
    fn parse(&self, content: &str) -> Result<Vec<Document>>;

    /// Returns the file extensions supported by this parser.
    ///
    /// Extensions are given without the leading dot, in the order they should
    /// be probed when looking for a file.
    fn supported_extensions(&self) -> &[&str];
}
