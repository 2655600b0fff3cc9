//! Compiled, immutable name predicates

use super::{MatchMode, Pattern};
use crate::error::PatternError;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// A compiled predicate over candidate names
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Pattern,
    case_sensitive: bool,
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    Anchored { head: String, tail: String },
    Word(Regex),
}

impl Matcher {
    /// Compile `pattern` for the given case sensitivity.
    ///
    /// `separators` lists the characters that delimit words in whole-word mode
    /// and is ignored by every other mode.
    pub fn compile(
        pattern: &Pattern,
        case_sensitive: bool,
        separators: &str,
    ) -> Result<Self, PatternError> {
        if pattern.text.is_empty() {
            return Err(PatternError::Empty);
        }

        let fold = |text: &str| {
            if case_sensitive {
                text.to_string()
            } else {
                text.to_lowercase()
            }
        };

        let kind = match pattern.mode {
            MatchMode::Exact => MatcherKind::Contains(fold(&pattern.text)),
            MatchMode::Prefix => MatcherKind::StartsWith(fold(&pattern.text)),
            MatchMode::Suffix => MatcherKind::EndsWith(fold(&pattern.text)),
            MatchMode::Both => {
                let (head, tail) = pattern.anchors()?;
                MatcherKind::Anchored {
                    head: fold(head),
                    tail: fold(tail),
                }
            }
            MatchMode::Word => {
                MatcherKind::Word(word_regex(&pattern.text, case_sensitive, separators)?)
            }
        };

        Ok(Self {
            pattern: pattern.clone(),
            case_sensitive,
            kind,
        })
    }

    /// Test a candidate name. Pure, no side effects.
    pub fn test(&self, candidate: &str) -> bool {
        // Word regexes carry their own case folding
        let candidate: Cow<'_, str> =
            if self.case_sensitive || matches!(self.kind, MatcherKind::Word(_)) {
                Cow::Borrowed(candidate)
            } else {
                Cow::Owned(candidate.to_lowercase())
            };

        match &self.kind {
            MatcherKind::Contains(needle) => candidate.contains(needle.as_str()),
            MatcherKind::StartsWith(head) => candidate.starts_with(head.as_str()),
            MatcherKind::EndsWith(tail) => candidate.ends_with(tail.as_str()),
            MatcherKind::Anchored { head, tail } => {
                candidate.starts_with(head.as_str()) && candidate.ends_with(tail.as_str())
            }
            MatcherKind::Word(regex) => regex.is_match(&candidate),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.pattern.mode
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// Build `(^|[seps])text($|[seps])`, or a whole-string match without separators
fn word_regex(text: &str, case_sensitive: bool, separators: &str) -> Result<Regex, PatternError> {
    let escaped = regex::escape(text);
    let source = if separators.is_empty() {
        format!("^{}$", escaped)
    } else {
        let class: String = separators
            .chars()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        format!("(?:^|[{class}]){escaped}(?:$|[{class}])")
    };

    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| PatternError::InvalidWord {
            pattern: text.to_string(),
            message: e.to_string(),
        })
}
