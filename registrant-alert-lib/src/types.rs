//! Core data types for Registrant Alert searches.
//!
//! Search terms supplied by callers, the calendar-day wire value, and the
//! response model returned by the service.

use chrono::NaiveDate;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of every date exchanged with the service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Include/exclude terms for a basic search.
///
/// All `include` terms must appear in the registrant details of a matching
/// domain, and none of the `exclude` terms may appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicSearchTerms {
    /// Required, 1 to 4 items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Optional, up to 4 items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl BasicSearchTerms {
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }
}

/// A field-qualified search term for an advanced search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearchTerm {
    /// Dotted WHOIS path, e.g. `RegistrantContact.Organization`.
    pub field: String,

    /// Search string. Case insensitive.
    pub term: String,

    /// When false the field only has to contain the term as a substring.
    #[serde(default, skip_serializing_if = "is_false")]
    pub exact_match: bool,
}

impl AdvancedSearchTerm {
    pub fn new<F: Into<String>, T: Into<String>>(field: F, term: T) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            exact_match: false,
        }
    }

    pub fn exact_match(mut self, exact_match: bool) -> Self {
        self.exact_match = exact_match;
        self
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

/// Search mode of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Only the domain count is returned. No credits deducted.
    #[default]
    Preview,
    /// The matching domain list is returned.
    Purchase,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Purchase => "purchase",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar day as the service encodes it.
///
/// The empty string is a valid wire value meaning "unset" and round-trips
/// through [`Date::UNSET`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(Option<NaiveDate>);

impl Date {
    pub const UNSET: Date = Date(None);

    pub fn new(day: NaiveDate) -> Self {
        Self(Some(day))
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(day: NaiveDate) -> Self {
        Self::new(day)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(day) => write!(f, "{}", day.format(DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Date::UNSET);
        }
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(Date::new)
            .map_err(|e| serde::de::Error::custom(format!("parsing time {raw:?}: {e}")))
    }
}

/// Event recorded for a domain in the result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Added,
    Updated,
    Dropped,
    Discovered,
    /// Any action this library does not know about yet.
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Added => "added",
            Action::Updated => "updated",
            Action::Dropped => "dropped",
            Action::Discovered => "discovered",
            Action::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One domain matching the search criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainItem {
    pub domain_name: String,

    #[serde(default)]
    pub action: Action,

    /// Event date. May be unset.
    #[serde(default)]
    pub date: Date,
}

/// Parsed Registrant Alert API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantAlertResponse {
    /// Matching domains. Empty in preview mode.
    #[serde(default)]
    pub domains_list: Vec<DomainItem>,

    /// Number of matching domains.
    #[serde(default)]
    pub domains_count: i64,
}

/// Error messages returned by the service.
///
/// The `messages` field arrives as a string array, a bare string or any
/// other JSON value. Everything is normalized to a sequence of strings; a
/// non-array value becomes a single element holding its canonical rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Messages(Vec<String>);

impl Messages {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Messages {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl<'de> Deserialize<'de> for Messages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

impl Messages {
    fn from_value(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::default(),
            Value::Array(items) if items.iter().all(Value::is_string) => Self(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self(vec![render_value(&other)]),
        }
    }
}

/// Render a JSON value the way the service's reference clients print it:
/// strings bare, arrays as `[a b]`, objects as `map[k:v ...]` with sorted keys.
fn render_value(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "<nil>".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", parts.join(" "))
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let parts: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}:{}", k, render_value(v)))
                .collect();
            format!("map[{}]", parts.join(" "))
        }
    }
}

impl fmt::Display for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}
