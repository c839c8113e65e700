//! Front-matter parsing

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// Custom deserializer that handles both a single string and a list of strings
pub(crate) fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Loosely-typed metadata block from the top of a document
///
/// Parsing never fails: a block that cannot be read yields empty fields and
/// records the reason in `malformed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub fields: Mapping,
    /// Parse error message when the block was present but unreadable
    pub malformed: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let trimmed = content.trim_start();

        // YAML front-matter between --- lines
        if let Some(rest) = strip_delimiter_line(trimmed, "---") {
            return Self::parse_yaml(content, rest);
        }

        // Object fragment between ;;; markers
        if let Some(rest) = strip_delimiter_line(trimmed, ";;;") {
            return Self::parse_json(content, rest);
        }

        (FrontMatter::default(), content)
    }

    fn parse_yaml<'a>(content: &'a str, rest: &'a str) -> (Self, &'a str) {
        let Some((yaml, body)) = split_at_closing(rest, "---") else {
            // No closing ---, treat as no front-matter
            return (FrontMatter::default(), content);
        };

        if yaml.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        match parse_mapping(yaml) {
            Ok(fields) => (
                Self {
                    fields,
                    malformed: None,
                },
                body,
            ),
            Err(e) => (Self::malformed(e), body),
        }
    }

    fn parse_json<'a>(content: &'a str, rest: &'a str) -> (Self, &'a str) {
        let Some((fragment, body)) = split_at_closing(rest, ";;;") else {
            return (FrontMatter::default(), content);
        };

        if fragment.trim().is_empty() {
            return (FrontMatter::default(), body);
        }

        // The block holds the inside of an object: `key: "value", ...`
        match parse_flow_mapping(fragment) {
            Ok(fields) => (
                Self {
                    fields,
                    malformed: None,
                },
                body,
            ),
            Err(e) => (Self::malformed(e), body),
        }
    }

    fn malformed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!("Failed to parse front-matter, using empty metadata: {}", reason);
        Self {
            fields: Mapping::new(),
            malformed: Some(reason),
        }
    }

    /// Look up a string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Convert the loose mapping into a typed metadata record
    pub fn into_matter<M: DeserializeOwned>(self) -> Result<M, serde_yaml::Error> {
        serde_yaml::from_value(Value::Mapping(self.fields))
    }

    /// Serialize a metadata record as a YAML front-matter block
    pub fn render<M: Serialize>(matter: &M) -> Result<String> {
        let yaml = serde_yaml::to_string(matter)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// Read a `---` block as a YAML mapping
///
/// A block that is not valid block-style YAML, such as `title: "T", date:
/// "2024-01-01"`, is retried as the inside of a flow mapping.
fn parse_mapping(block: &str) -> Result<Mapping, String> {
    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(fields)) => Ok(fields),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err("front matter is not a key/value mapping".to_string()),
        Err(e) => parse_flow_mapping(block).map_err(|_| e.to_string()),
    }
}

/// Read the inside of an object, `key: "value", ...`, with quoted or bare keys
fn parse_flow_mapping(fragment: &str) -> Result<Mapping, String> {
    let wrapped = format!("{{{}}}", fragment);
    match serde_yaml::from_str::<Value>(&wrapped) {
        Ok(Value::Mapping(fields)) => Ok(fields),
        Ok(_) => Err("front matter is not a key/value mapping".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// If `s` starts with a line consisting of `delim`, return the text after it
fn strip_delimiter_line<'a>(s: &'a str, delim: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(delim)?;
    let after_spaces = rest.trim_start_matches([' ', '\t']);
    after_spaces
        .strip_prefix("\r\n")
        .or_else(|| after_spaces.strip_prefix('\n'))
}

/// Split `rest` at the first line equal to `delim`
/// Returns (block, text after the delimiter line)
fn split_at_closing<'a>(rest: &'a str, delim: &str) -> Option<(&'a str, &'a str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delim {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset, compared in UTC
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        title: String,
        #[serde(deserialize_with = "string_or_vec", default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags:
  - rust
  - web
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.malformed.is_none());
        assert_eq!(fm.get_str("title"), Some("Hello World"));
        assert_eq!(fm.get_str("date"), Some("2024-01-15"));
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_json_fragment() {
        let content = ";;;\n\"title\": \"Test Post\", \"tags\": [\"a\", \"b\"]\n;;;\nThis is content.\n";

        let (fm, body) = FrontMatter::parse(content);
        let sample: Sample = fm.into_matter().unwrap();
        assert_eq!(sample.title, "Test Post");
        assert_eq!(sample.tags, vec!["a", "b"]);
        assert_eq!(body, "This is content.\n");
    }

    #[test]
    fn test_yaml_accepts_json_style_fragment() {
        let content = "---\n{title: \"Quoted\", featured: true}\n---\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.get_str("title"), Some("Quoted"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_bare_key_fragment() {
        let content = ";;;\ntitle: \"T\", date: \"2024-01-01\"\n;;;\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.malformed.is_none());
        assert_eq!(fm.get_str("title"), Some("T"));
        assert_eq!(fm.get_str("date"), Some("2024-01-01"));
        assert_eq!(body, "body");

        let content = "---\ntitle: \"T\", date: \"2024-01-01\"\n---\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.malformed.is_none());
        assert_eq!(fm.get_str("title"), Some("T"));
        assert_eq!(fm.get_str("date"), Some("2024-01-01"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_malformed_block_recovers_body() {
        let content = "---\ntitle: [unclosed\n---\nStill here.";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.malformed.is_some());
        assert!(fm.fields.is_empty());
        assert_eq!(body, "Still here.");

        let content = ";;;\n\"title\": [unclosed\n;;;\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.malformed.is_some());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata.";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.fields.is_empty());
        assert!(fm.malformed.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_content() {
        let content = "---\ntitle: never closed\n\nText";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.fields.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_markdown_rule_is_not_delimiter() {
        let content = "Intro paragraph\n\n---\n\nMore text";
        let (fm, body) = FrontMatter::parse(content);
        assert!(fm.fields.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_body_round_trip() {
        let bodies = [
            "",
            "plain",
            "\n\nleading blank lines\n",
            "# Heading\n\n---\n\nA rule above and trailing space  \n",
            "crlf\r\nline endings\r\n",
        ];
        for body in bodies {
            let matter = Sample {
                title: "Round trip".to_string(),
                tags: vec!["x".to_string()],
            };
            let doc = FrontMatter::render(&matter).unwrap() + body;
            let (fm, parsed) = FrontMatter::parse(&doc);
            assert_eq!(parsed, body);
            assert_eq!(fm.into_matter::<Sample>().unwrap(), matter);
        }
    }

    #[test]
    fn test_single_string_tags() {
        let (fm, _) = FrontMatter::parse("---\ntitle: One\ntags: Notes\n---\n");
        let sample: Sample = fm.into_matter().unwrap();
        assert_eq!(sample.tags, vec!["Notes"]);
    }

    #[test]
    fn test_parse_date_string() {
        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        let d = parse_date_string("2024/03/01").unwrap();
        assert_eq!(d.format("%Y-%m-%d").to_string(), "2024-03-01");

        let rfc = parse_date_string("2024-01-15T12:00:00+02:00").unwrap();
        assert_eq!(rfc.format("%H").to_string(), "10");

        assert!(parse_date_string("sometime last spring").is_none());
        assert!(parse_date_string("").is_none());
    }
}
