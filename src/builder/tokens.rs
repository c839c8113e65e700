//! Token substitution: `{{title}}`, `{{ site.year }}`

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").unwrap();
}

/// Values available to a page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSet {
    values: IndexMap<String, String>,
}

impl TokenSet {
    /// Start from site-wide defaults
    pub fn new(defaults: IndexMap<String, String>) -> Self {
        Self { values: defaults }
    }

    /// Overlay page metadata
    ///
    /// A key with a value replaces the default of the same name. `null` and
    /// the empty string keep the default.
    pub fn with_meta(mut self, meta: &Map<String, Value>) -> Self {
        for (key, value) in meta {
            let value = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if value.is_empty() && self.values.contains_key(key) {
                continue;
            }
            self.values.insert(key.clone(), value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace every token in `html`
    ///
    /// Returns the output and the names of tokens that had no value; those
    /// are replaced with an empty string.
    pub fn apply(&self, html: &str) -> (String, Vec<String>) {
        let mut unresolved = Vec::new();
        let output = TOKEN
            .replace_all(html, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => {
                    unresolved.push(caps[1].to_string());
                    String::new()
                }
            })
            .into_owned();
        (output, unresolved)
    }
}
