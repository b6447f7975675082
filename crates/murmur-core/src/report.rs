use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names the producer uses for the weighted keyword list.
const KEYWORD_FIELDS: &[&str] = &["keywords", "hotWords", "hot_words"];

/// A single `(word, weight)` pair as emitted by the report producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub word: String,
    pub weight: f64,
}

impl KeywordRecord {
    pub fn new(word: impl Into<String>, weight: f64) -> Self {
        Self {
            word: word.into(),
            weight,
        }
    }
}

/// Weight extent of a producer-ordered keyword sequence.
///
/// The producer sorts keywords by descending weight. The extent is read off the two ends of the
/// sequence as supplied: `max` is the first weight and `min` is the last. Nothing here sorts or
/// scans, so callers handing in unsorted data get the extent of their ends, not of the set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordExtent {
    pub max: f64,
    pub min: f64,
}

impl KeywordExtent {
    pub fn from_ordered(words: &[KeywordRecord]) -> Option<Self> {
        let first = words.first()?;
        let last = words.last()?;
        Some(Self {
            max: first.weight,
            min: last.weight,
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// The analytics report payload.
///
/// Only the title and the keyword list are typed. Every other top-level field (topics, Q&A,
/// resources, statistics, summary, ...) is kept as opaque JSON in payload order; those sections
/// belong to other renderers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub title: Option<String>,
    pub keywords: Vec<KeywordRecord>,
    pub sections: IndexMap<String, Value>,
}

impl Report {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidReport {
                message: format!("expected a JSON object, got {}", json_kind(&value)),
            });
        };

        let mut report = Report::default();
        for (key, value) in map {
            match key.as_str() {
                "title" => {
                    report.title = match value {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => {
                            return Err(Error::InvalidReport {
                                message: format!(
                                    "`title` must be a string, got {}",
                                    json_kind(&other)
                                ),
                            });
                        }
                    };
                }
                k if KEYWORD_FIELDS.contains(&k) => {
                    report.keywords = parse_keywords(k, value)?;
                }
                _ => {
                    report.sections.insert(key, value);
                }
            }
        }

        tracing::debug!(
            keywords = report.keywords.len(),
            sections = report.sections.len(),
            "parsed report payload"
        );
        Ok(report)
    }

    pub fn section(&self, id: &str) -> Option<&Value> {
        self.sections.get(id)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

fn parse_keywords(field: &str, value: Value) -> Result<Vec<KeywordRecord>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => serde_json::from_value(value).map_err(|err| Error::InvalidReport {
            message: format!("`{field}` must be a list of {{word, weight}} records: {err}"),
        }),
        other => Err(Error::InvalidReport {
            message: format!("`{field}` must be a list, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
