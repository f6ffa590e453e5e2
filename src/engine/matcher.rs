//! Predicate matching of one query pair against one record

use crate::core::field::loose_eq;
use crate::core::record::Record;
use serde_json::Value;
use std::collections::HashSet;

/// How a textual field value is compared with the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-insensitive "starts with"
    Prefix,
    /// Case-insensitive "contains"
    Substring,
}

impl TextMatch {
    /// Compare a stored string with an already-trimmed query
    pub fn is_match(self, stored: &str, query: &str) -> bool {
        let stored = stored.trim().to_lowercase();
        let query = query.to_lowercase();
        match self {
            TextMatch::Prefix => stored.starts_with(&query),
            TextMatch::Substring => stored.contains(&query),
        }
    }
}

/// Evaluates `field=value` query pairs against records
///
/// Fields listed as prefix fields (by default `title`) use prefix matching on
/// text; every other text field uses substring matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateMatcher {
    prefix_fields: HashSet<String>,
}

impl PredicateMatcher {
    pub fn new<I, S>(prefix_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefix_fields: prefix_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn text_mode(&self, field: &str) -> TextMatch {
        if self.prefix_fields.contains(field) {
            TextMatch::Prefix
        } else {
            TextMatch::Substring
        }
    }

    /// Does `record[field]` satisfy the raw query value?
    pub fn matches(&self, record: &Record, field: &str, raw: &str) -> bool {
        self.matches_with(record, field, raw, self.text_mode(field))
    }

    /// Same as [`matches`](Self::matches) with an explicit text mode
    pub fn matches_with(&self, record: &Record, field: &str, raw: &str, mode: TextMatch) -> bool {
        let query = raw.trim();
        if query.is_empty() {
            return true;
        }

        match record.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(stored)) => mode.is_match(stored, query),
            Some(other) => loose_eq(other, query),
        }
    }
}

impl Default for PredicateMatcher {
    fn default() -> Self {
        Self::new(["title"])
    }
}
