// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile sets and profile-based document selection.
//!
//! A document may carry a top-level `profiles` directive listing the profiles
//! it applies to, for example `profiles: dev,!cloud`. A `!` prefix excludes the
//! document whenever that profile is active, and an exclusion always wins over
//! any inclusion in the same directive.

use crate::domain::document::Document;
use crate::domain::value::Value;
use std::fmt;

/// Top-level key holding the profile directive of a document.
pub const PROFILES_KEY: &str = "profiles";

/// An ordered set of distinct, active profile names.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::ProfileSet;
///
/// let profiles = ProfileSet::parse("dev, east,dev");
/// assert_eq!(profiles.as_slice(), ["dev", "east"]);
/// assert!(profiles.contains("east"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileSet(Vec<String>);

impl ProfileSet {
    /// Creates an empty profile set.
    pub fn new() -> Self {
        ProfileSet(Vec::new())
    }

    /// Parses a comma-separated list, trimming names and skipping empty ones.
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    /// Adds a profile unless it is already present or blank.
    pub fn push(&mut self, profile: impl Into<String>) {
        let profile = profile.into();
        let profile = profile.trim();
        if !profile.is_empty() && !self.contains(profile) {
            self.0.push(profile.to_string());
        }
    }

    /// Returns true if `profile` is active.
    pub fn contains(&self, profile: &str) -> bool {
        self.0.iter().any(|p| p == profile)
    }

    /// Returns the profiles in caller order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Iterates over the profiles in caller order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Returns the number of profiles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no profile is active.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the set into a sequence value.
    pub fn to_value(&self) -> Value {
        Value::Sequence(self.0.iter().map(|p| Value::from(p.as_str())).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ProfileSet::new();
        for profile in iter {
            set.push(profile);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ProfileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// A single token of a profile directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileToken {
    /// Applies when the named profile is active
    Include(String),
    /// Vetoes the document when the named profile is active
    Exclude(String),
}

/// The parsed `profiles` directive of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileDirective(Vec<ProfileToken>);

impl ProfileDirective {
    /// Parses a comma-separated directive such as `dev,!prod`.
    pub fn parse(directive: &str) -> Self {
        ProfileDirective(
            directive
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(|token| match token.strip_prefix('!') {
                    Some(excluded) => ProfileToken::Exclude(excluded.trim().to_string()),
                    None => ProfileToken::Include(token.to_string()),
                })
                .collect(),
        )
    }

    /// Reads the directive of a document, if it has one.
    ///
    /// A sequence of names is treated like the comma-joined list of its items.
    /// A null directive counts as absent.
    pub fn of(document: &Document) -> Option<Self> {
        match document.get(PROFILES_KEY)? {
            Value::Null => None,
            Value::Sequence(items) => {
                let joined = items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                Some(Self::parse(&joined))
            }
            other => Some(Self::parse(&other.to_string())),
        }
    }

    /// Returns the parsed tokens in directive order.
    pub fn tokens(&self) -> &[ProfileToken] {
        &self.0
    }

    /// Evaluates the directive against the active profiles.
    ///
    /// Tokens are scanned in order. An active excluded profile returns `false`
    /// immediately; an active included profile marks the document as included
    /// but scanning continues so a later exclusion can still veto it. A
    /// directive made only of exclusions starts out included.
    pub fn matches(&self, active: &ProfileSet) -> bool {
        let mut include = self
            .0
            .iter()
            .all(|token| matches!(token, ProfileToken::Exclude(_)));

        for token in &self.0 {
            match token {
                ProfileToken::Exclude(profile) if active.contains(profile) => return false,
                ProfileToken::Include(profile) if active.contains(profile) => include = true,
                _ => {}
            }
        }

        include
    }
}

/// Decides whether a document takes part in a merge for the active profiles.
///
/// Documents without a `profiles` directive always apply.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{should_include, Document, ProfileSet};
///
/// let dev_only: Document = [("profiles", "dev")].into_iter().collect();
/// assert!(should_include(&dev_only, &ProfileSet::parse("dev")));
/// assert!(!should_include(&dev_only, &ProfileSet::parse("prod")));
///
/// let not_dev: Document = [("profiles", "!dev")].into_iter().collect();
/// assert!(!should_include(&not_dev, &ProfileSet::parse("dev")));
/// assert!(should_include(&not_dev, &ProfileSet::new()));
/// ```
pub fn should_include(document: &Document, active: &ProfileSet) -> bool {
    match ProfileDirective::of(document) {
        Some(directive) => directive.matches(active),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_directive(directive: &str) -> Document {
        [(PROFILES_KEY, directive)].into_iter().collect()
    }

    #[test]
    fn test_profile_set_dedupes_and_trims() {
        let set: ProfileSet = vec![" dev", "prod ", "dev", ""].into_iter().collect();
        assert_eq!(set.as_slice(), ["dev", "prod"]);
        assert_eq!(set.to_string(), "dev,prod");
    }

    #[test]
    fn test_profile_set_parse_empty() {
        assert!(ProfileSet::parse("").is_empty());
        assert!(ProfileSet::parse(" , ").is_empty());
    }

    #[test]
    fn test_no_directive_always_included() {
        let doc: Document = [("testUrl", "http://default")].into_iter().collect();
        assert!(should_include(&doc, &ProfileSet::new()));
        assert!(should_include(&doc, &ProfileSet::parse("dev")));
    }

    #[test]
    fn test_include_directive() {
        let doc = with_directive("dev");
        assert!(should_include(&doc, &ProfileSet::parse("dev")));
        assert!(!should_include(&doc, &ProfileSet::parse("prod")));
        assert!(!should_include(&doc, &ProfileSet::new()));
    }

    #[test]
    fn test_exclude_directive() {
        let doc = with_directive("!dev");
        assert!(!should_include(&doc, &ProfileSet::parse("dev")));
        assert!(should_include(&doc, &ProfileSet::new()));
        assert!(should_include(&doc, &ProfileSet::parse("prod")));
    }

    #[test]
    fn test_exclusion_wins_over_earlier_inclusion() {
        let doc = with_directive("dev,!east");
        assert!(should_include(&doc, &ProfileSet::parse("dev")));
        assert!(!should_include(&doc, &ProfileSet::parse("dev,east")));
    }

    #[test]
    fn test_exclusion_wins_over_later_inclusion() {
        let doc = with_directive("!east,dev");
        assert!(!should_include(&doc, &ProfileSet::parse("dev,east")));
    }

    #[test]
    fn test_any_inclusion_matches() {
        let doc = with_directive("dev1, dev2");
        assert!(should_include(&doc, &ProfileSet::parse("dev2")));
    }

    #[test]
    fn test_mixed_directive_needs_an_inclusion() {
        let doc = with_directive("dev,!prod");
        assert!(!should_include(&doc, &ProfileSet::parse("qa")));
    }

    #[test]
    fn test_sequence_directive() {
        let doc: Document = [(
            PROFILES_KEY,
            Value::Sequence(vec![Value::from("dev"), Value::from("!east")]),
        )]
        .into_iter()
        .collect();
        assert!(should_include(&doc, &ProfileSet::parse("dev")));
        assert!(!should_include(&doc, &ProfileSet::parse("dev,east")));
    }

    #[test]
    fn test_null_directive_is_absent() {
        let doc: Document = [(PROFILES_KEY, Value::Null)].into_iter().collect();
        assert!(should_include(&doc, &ProfileSet::parse("dev")));
    }

    #[test]
    fn test_directive_tokens() {
        let directive = ProfileDirective::parse("dev, !prod,,");
        assert_eq!(
            directive.tokens(),
            [
                ProfileToken::Include("dev".to_string()),
                ProfileToken::Exclude("prod".to_string())
            ]
        );
    }
}
