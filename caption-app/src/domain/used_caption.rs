use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

/// Persisted caption history keyed by [`caption_hash`](super::caption_hash), in first-use order.
pub type CaptionMap = IndexMap<String, UsedCaptionRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedCaptionRecord {
    pub text: String,
    #[serde(default)]
    pub business: String,
    /// ISO-8601 timestamp of the most recent use. Kept as text so a bad entry
    /// only drops out of date filters instead of poisoning the whole store.
    #[serde(default)]
    pub used_date: String,
    #[serde(default = "default_usage_count")]
    pub usage_count: u32,
}

fn default_usage_count() -> u32 {
    1
}

impl UsedCaptionRecord {
    pub fn new(text: String, business: String, used_at: DateTime<Utc>) -> Self {
        Self {
            text,
            business,
            used_date: format_timestamp(used_at),
            usage_count: 1,
        }
    }

    pub fn used_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.used_date)
    }
}

/// A stored record together with its key, as returned by searches and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionEntry {
    pub hash: String,
    pub text: String,
    pub business: String,
    pub used_date: String,
    pub usage_count: u32,
}

impl CaptionEntry {
    pub fn from_record(hash: &str, record: &UsedCaptionRecord) -> Self {
        Self {
            hash: hash.to_string(),
            text: record.text.clone(),
            business: record.business.clone(),
            used_date: record.used_date.clone(),
            usage_count: record.usage_count,
        }
    }
}

/// Input row for bulk imports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptionImport {
    pub text: String,
    #[serde(default)]
    pub business: String,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 and offset-less ISO timestamps (treated as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Calendar date of either a bare `YYYY-MM-DD` or a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|at| at.date_naive()))
}
