//! Story records as served by the backend.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::format::{break_into_sentences, format_date};

pub type StoryId = i64;

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    #[serde(default)]
    pub summary: Option<Sentences>,
    #[serde(default)]
    pub coverage: Option<Sentences>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub image_article: Option<ImageArticle>,
    #[serde(default)]
    pub images: Vec<StoryImage>,
    #[serde(default)]
    pub n_articles: Option<usize>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
}

impl Story {
    pub fn summary_sentences(&self) -> Vec<String> {
        self.summary
            .as_ref()
            .map(Sentences::to_sentences)
            .unwrap_or_default()
    }

    pub fn coverage_sentences(&self) -> Vec<String> {
        self.coverage
            .as_ref()
            .map(Sentences::to_sentences)
            .unwrap_or_default()
    }

    /// Number of sources, preferring the backend's own count.
    pub fn source_count(&self) -> usize {
        self.n_articles.unwrap_or(self.articles.len())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub url: String,
    #[serde(default)]
    pub provider: Option<Provider>,
    #[serde(default)]
    pub provider_url: Option<String>,
    /// Provider label used by older backends that predate `provider`
    #[serde(default)]
    pub feed: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub ts: Option<Timestamp>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Article {
    pub fn source_name(&self) -> Option<&str> {
        self.provider
            .as_ref()
            .map(|p| p.name.as_str())
            .or(self.feed.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Pre-formatted `date` if the backend sent one, otherwise `ts` formatted.
    pub fn display_date(&self) -> Option<String> {
        match &self.date {
            Some(date) if !date.is_empty() => Some(date.clone()),
            _ => self.ts.map(|ts| format_date(ts.0)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Provider {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageArticle {
    pub image_url: String,
    #[serde(default)]
    pub article_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoryImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub article_url: Option<String>,
    #[serde(default)]
    pub provider: Option<Provider>,
}

/// Text that arrives either as one paragraph or already split.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Sentences {
    List(Vec<String>),
    Text(String),
}

impl Sentences {
    pub fn to_sentences(&self) -> Vec<String> {
        match self {
            Sentences::List(list) => list.clone(),
            Sentences::Text(text) => break_into_sentences(text),
        }
    }
}

/// A UTC instant read from RFC 3339, naive ISO-8601 or epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub DateTime<Utc>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| Self(naive.and_utc()))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(Timestamp)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {ms}"))),
            RawTimestamp::Text(raw) => Timestamp::parse(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

/// Reads an optional timestamp, treating anything unparseable as absent.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(Timestamp::deserialize(raw).ok())
}
