//! Shared types used across modules
//!
//! The letter record, the submission payload, and the closed set of
//! categories offered by the site.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single letter in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Free text; the site only offers [`Category`] labels but nothing enforces it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// ISO-8601 timestamp (seed files may also use a bare `YYYY-MM-DD` date)
    pub created_at: String,
}

impl Letter {
    /// Parse `created_at` into a UTC instant.
    ///
    /// Bare dates are treated as midnight UTC. Returns `None` when the
    /// timestamp cannot be parsed.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// First `max_chars` characters of the content, for previews
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

/// A letter as submitted, before it gets an id and timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLetter {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewLetter {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Categories offered by the archive filter and the write form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    School,
    Career,
    Relationships,
    #[serde(rename = "Personal Growth")]
    PersonalGrowth,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::School,
        Category::Career,
        Category::Relationships,
        Category::PersonalGrowth,
        Category::Other,
    ];

    /// Label as stored on letters and shown in the UI
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::School => "School",
            Category::Career => "Career",
            Category::Relationships => "Relationships",
            Category::PersonalGrowth => "Personal Growth",
            Category::Other => "Other",
        }
    }

    /// Exact, case-sensitive label lookup
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| {
            let labels: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
            format!("Unknown category '{}'. Available: {}", s, labels.join(", "))
        })
    }
}

/// Format an instant the way new letters are stamped (`2024-06-01T12:00:00.000Z`)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
