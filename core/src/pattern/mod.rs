//! Pattern compilation and matching
//!
//! A [`Pattern`] is raw text plus a [`MatchMode`]. Patterns compile into
//! immutable [`Matcher`] predicates, and a [`MatcherCache`] keeps compiled
//! matchers keyed by (text, mode, case sensitivity).

pub mod cache;
pub mod matcher;

pub use cache::{CacheStats, MatcherCache};
pub use matcher::Matcher;

use crate::error::PatternError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wildcard marker used to derive a match mode from raw pattern text
pub const WILDCARD: char = '*';

/// Default characters that delimit words for whole-word matching
pub const DEFAULT_WORD_SEPARATORS: &str = " _-.";

/// How a pattern is tested against a candidate name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Candidate contains the pattern anywhere
    Exact,
    /// Candidate starts with the pattern
    Prefix,
    /// Candidate ends with the pattern
    Suffix,
    /// Candidate starts with the first anchor and ends with the second
    Both,
    /// Pattern matches a whole separator-delimited token
    #[serde(alias = "whole-word", alias = "ww")]
    Word,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Prefix => "prefix",
            MatchMode::Suffix => "suffix",
            MatchMode::Both => "both",
            MatchMode::Word => "word",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" | "substring" => Ok(MatchMode::Exact),
            // glob_right appends the wildcard, so the name is anchored at its start
            "prefix" | "glob_right" => Ok(MatchMode::Prefix),
            "suffix" | "glob_left" => Ok(MatchMode::Suffix),
            "both" => Ok(MatchMode::Both),
            // glob_both wraps the text in wildcards: a plain substring search
            "glob_both" => Ok(MatchMode::Exact),
            "word" | "whole-word" | "ww" => Ok(MatchMode::Word),
            _ => Err(PatternError::UnknownMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Pattern text together with its match mode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub text: String,
    pub mode: MatchMode,
}

impl Pattern {
    /// Create a pattern with an explicit mode. The text is used verbatim.
    pub fn new(text: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    /// Derive the mode from wildcard placement in `raw` and strip the markers.
    ///
    /// - `*tail` matches names ending with `tail`
    /// - `head*` matches names starting with `head`
    /// - `head*tail` matches names starting with `head` and ending with `tail`
    /// - `*text*` matches names containing `text`
    /// - `text` is a substring match, or a whole-word match when `whole_word` is set
    ///
    /// A pattern made only of markers parses to an empty substring pattern;
    /// callers that accept it treat it as matching every name
    /// (see [`Pattern::is_wildcard_only`]).
    pub fn parse(raw: &str, whole_word: bool) -> Self {
        if Self::is_wildcard_only(raw) {
            return Self::new("", MatchMode::Exact);
        }

        let leading = raw.starts_with(WILDCARD);
        let trailing = raw.len() > 1 && raw.ends_with(WILDCARD);

        match (leading, trailing) {
            (true, true) => Self::new(&raw[1..raw.len() - 1], MatchMode::Exact),
            (true, false) => Self::new(&raw[1..], MatchMode::Suffix),
            (false, true) => Self::new(&raw[..raw.len() - 1], MatchMode::Prefix),
            (false, false) if raw.contains(WILDCARD) => Self::new(raw, MatchMode::Both),
            (false, false) if whole_word => Self::new(raw, MatchMode::Word),
            (false, false) => Self::new(raw, MatchMode::Exact),
        }
    }

    /// `raw` is non-empty and consists of `*` markers only
    pub fn is_wildcard_only(raw: &str) -> bool {
        !raw.is_empty() && raw.chars().all(|c| c == WILDCARD)
    }

    /// Split a both-anchored pattern into its two anchors
    pub fn anchors(&self) -> Result<(&str, &str), PatternError> {
        match self.text.split_once(WILDCARD) {
            Some((head, tail)) if !head.is_empty() && !tail.is_empty() => Ok((head, tail)),
            _ => Err(PatternError::InvalidAnchors {
                pattern: self.text.clone(),
            }),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.mode)
    }
}
