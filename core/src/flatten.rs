//! Normalisation of list-like parameters
//!
//! Patterns, directory exclusions and extension lists may be given as a single
//! string or as arbitrarily nested sequences of strings. Everything downstream
//! consumes the flat `Vec<String>` produced by [`flatten`].

use serde::{Deserialize, Serialize};

/// A string or an arbitrarily nested sequence of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested {
    /// A single leaf value, never split into characters
    One(String),

    /// A sequence of leaves or further sequences
    Many(Vec<Nested>),
}

impl Nested {
    /// An empty sequence
    pub fn empty() -> Self {
        Nested::Many(Vec::new())
    }

    /// Whether the value holds no leaves at all
    pub fn is_empty(&self) -> bool {
        match self {
            Nested::One(_) => false,
            Nested::Many(items) => items.iter().all(Nested::is_empty),
        }
    }

    fn collect_into(self, out: &mut Vec<String>) {
        match self {
            Nested::One(value) => out.push(value),
            Nested::Many(items) => {
                for item in items {
                    item.collect_into(out);
                }
            }
        }
    }
}

impl Default for Nested {
    fn default() -> Self {
        Nested::empty()
    }
}

impl From<String> for Nested {
    fn from(value: String) -> Self {
        Nested::One(value)
    }
}

impl From<&str> for Nested {
    fn from(value: &str) -> Self {
        Nested::One(value.to_string())
    }
}

impl From<&String> for Nested {
    fn from(value: &String) -> Self {
        Nested::One(value.clone())
    }
}

impl<T: Into<Nested>> From<Vec<T>> for Nested {
    fn from(items: Vec<T>) -> Self {
        Nested::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Nested>, const N: usize> From<[T; N]> for Nested {
    fn from(items: [T; N]) -> Self {
        Nested::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Nested>> From<Option<T>> for Nested {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Flatten a string or nested sequence into leaf strings, depth-first,
/// preserving first-seen order.
///
/// Flattening an already flat sequence returns it unchanged.
pub fn flatten(value: impl Into<Nested>) -> Vec<String> {
    let mut out = Vec::new();
    value.into().collect_into(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_string_is_single_element() {
        assert_eq!(flatten("abc"), vec!["abc".to_string()]);
    }

    #[test]
    fn test_nested_order_preserved() {
        let value = Nested::Many(vec![
            "a".into(),
            Nested::Many(vec!["b".into(), Nested::Many(vec!["c".into()])]),
            "d".into(),
        ]);
        assert_eq!(flatten(value), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(flatten(vec!["x", "y", "x"]), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(flatten(Nested::empty()).is_empty());
        assert!(flatten(None::<&str>).is_empty());
        assert!(flatten(vec![Vec::<String>::new(), Vec::new()]).is_empty());
        assert!(Nested::from(vec![Vec::<String>::new()]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let inputs = vec![
            Nested::from("single"),
            Nested::from(vec![vec!["a", "b"], vec!["c"]]),
            Nested::Many(vec![
                Nested::Many(vec![Nested::Many(vec!["deep".into()])]),
                "shallow".into(),
                Nested::empty(),
            ]),
        ];

        for input in inputs {
            let once = flatten(input);
            let twice = flatten(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_deserialize_mixed_json() {
        let value: Nested = serde_json::from_str(r#"["a", ["b", ["c"]], "d"]"#).unwrap();
        assert_eq!(flatten(value), vec!["a", "b", "c", "d"]);

        let value: Nested = serde_json::from_str(r#""only""#).unwrap();
        assert_eq!(flatten(value), vec!["only"]);
    }
}
