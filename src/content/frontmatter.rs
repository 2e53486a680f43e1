//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use thiserror::Error;

/// Errors raised while splitting or parsing a front-matter header
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("front-matter opened with `{0}` is never closed")]
    Unterminated(&'static str),

    #[error("front-matter must be a key/value mapping")]
    NotAMapping,

    #[error("front-matter key must be a scalar, found {0}")]
    InvalidKey(String),

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Header syntax, selected by the opening delimiter line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    fn from_delimiter(line: &str) -> Option<Self> {
        match line {
            "---" => Some(Format::Yaml),
            "+++" => Some(Format::Toml),
            ";;;" => Some(Format::Json),
            _ => None,
        }
    }

    fn delimiter(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
            Format::Json => ";;;",
        }
    }
}

/// Metadata fields from a content file header, in the order they were written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        let first = lines.next().unwrap_or_default();
        let format = match Format::from_delimiter(first.trim_end()) {
            Some(format) => format,
            // No front-matter found
            None => return Ok((FrontMatter::default(), content)),
        };

        let header_start = first.len();
        let mut offset = header_start;
        for line in lines {
            if line.trim_end() == format.delimiter() {
                let header = &content[header_start..offset];
                let remaining = &content[offset + line.len()..];
                let remaining = remaining.trim_start_matches(['\n', '\r']);
                return Ok((Self::parse_header(format, header)?, remaining));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unterminated(format.delimiter()))
    }

    fn parse_header(format: Format, header: &str) -> Result<Self, FrontMatterError> {
        if header.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        let value = match format {
            Format::Yaml => serde_yaml::from_str::<Value>(header)?,
            Format::Json => serde_json::from_str::<Value>(header)?,
            Format::Toml => toml_to_yaml(toml::Value::Table(toml::from_str::<toml::Table>(header)?)),
        };

        let mapping = match value {
            Value::Null => return Ok(FrontMatter::default()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(FrontMatterError::NotAMapping),
        };

        let mut fields = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = scalar_to_string(&key)
                .ok_or_else(|| FrontMatterError::InvalidKey(format!("{:?}", key)))?;
            fields.insert(key, value);
        }
        Ok(Self { fields })
    }

    /// Look up a raw field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A scalar field rendered as a string
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    pub fn title(&self) -> Option<String> {
        self.get_str("title")
    }

    pub fn date(&self) -> Option<String> {
        self.get_str("date")
    }

    /// Parse the date field into a timestamp
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date().as_deref().and_then(parse_date_string)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Render a scalar YAML value as a string; sequences and mappings have no scalar form
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 first so offsets are honoured
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - blog
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("Hello World".to_string()));
        assert_eq!(fm.date(), Some("2024-01-15 10:30:00".to_string()));
        assert!(matches!(fm.get("tags"), Some(Value::Sequence(tags)) if tags.len() == 2));
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_yaml_date_stays_a_string() {
        let (fm, body) = FrontMatter::parse("---\ntitle: Hello\ndate: 2021-01-01\n---\n# Hi").unwrap();
        assert_eq!(fm.get("date"), Some(&Value::String("2021-01-01".into())));
        assert_eq!(body, "# Hi");
    }

    #[test]
    fn test_keys_keep_their_order() {
        let (fm, _) = FrontMatter::parse("---\nzeta: 1\nalpha: 2\nmid: 3\n---\n").unwrap();
        let keys: Vec<_> = fm.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_no_frontmatter_keeps_whole_file() {
        let content = "# Just a heading\n\n---\n\ntext";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_header_must_start_the_file() {
        let content = "\n---\ntitle: x\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unterminated_header_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: Broken\n\nNo closing line").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated("---")));
    }

    #[test]
    fn test_empty_header() {
        let (fm, remaining) = FrontMatter::parse("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_crlf_line_endings() {
        let (fm, remaining) = FrontMatter::parse("---\r\ntitle: Win\r\n---\r\nBody\r\n").unwrap();
        assert_eq!(fm.title(), Some("Win".to_string()));
        assert_eq!(remaining, "Body\r\n");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let (fm, _) = FrontMatter::parse("\u{feff}---\ntitle: Bom\n---\n").unwrap();
        assert_eq!(fm.title(), Some("Bom".to_string()));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_scalar_header_is_not_a_mapping() {
        let err = FrontMatter::parse("---\njust some words\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping));
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = "+++\ntitle = \"From TOML\"\ndate = 2023-05-06\ndraft = false\n+++\n\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("From TOML".to_string()));
        assert_eq!(fm.date(), Some("2023-05-06".to_string()));
        assert_eq!(fm.get("draft"), Some(&Value::Bool(false)));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Test Post\", \"tags\": [\"a\", \"b\"]}\n;;;\n\nThis is content.\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title(), Some("Test Post".to_string()));
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_numeric_title_renders_as_string() {
        let (fm, _) = FrontMatter::parse("---\ntitle: 1984\n---\n").unwrap();
        assert_eq!(fm.title(), Some("1984".to_string()));
    }

    #[test]
    fn test_parse_date() {
        let mut fm = FrontMatter::default();
        fm.insert("date", "2024-01-15 10:30:00");
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        assert!(parse_date_string("2021-01-01").is_some());
        assert!(parse_date_string("2021-01-01T08:00:00+02:00").is_some());
        assert!(parse_date_string("next tuesday").is_none());
    }
}
