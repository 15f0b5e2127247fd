use super::{normalize_opt, now, require_text};
use crate::codec::{encode_datetime, DecodeError, Dialect, FieldReader, LineCodec};
use crate::error::Result;
use crate::query::{FieldValue, Queryable};
use crate::store::Record;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Suggested categories. Any other value is accepted too.
pub const CATEGORIES: [&str; 10] = [
    "Daily Log",
    "Memories",
    "Events",
    "Work",
    "Study",
    "Health",
    "Travel",
    "Family",
    "Friends",
    "Hobbies",
];

/// Suggested moods. Any other value is accepted too.
pub const MOODS: [&str; 10] = [
    "Happy",
    "Sad",
    "Angry",
    "Tired",
    "Excited",
    "Anxious",
    "Calm",
    "Thoughtful",
    "Loved",
    "Confused",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeRecord {
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl LifeRecord {
    /// A new entry stamped with the current time.
    ///
    /// Edits build a fresh record with this as well: an edit replaces every
    /// field, and fields left out become absent.
    pub fn new(
        title: impl Into<String>,
        content: Option<String>,
        category: Option<String>,
        mood: Option<String>,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            content: normalize_opt(content),
            category: normalize_opt(category),
            mood: normalize_opt(mood),
            timestamp: now(),
        }
    }
}

impl LineCodec for LifeRecord {
    const DIALECT: Dialect = Dialect::new(" | ", 5);

    fn encode_fields(&self) -> Vec<String> {
        vec![
            encode_datetime(self.timestamp),
            self.category.clone().unwrap_or_default(),
            self.mood.clone().unwrap_or_default(),
            self.title.clone(),
            self.content.clone().unwrap_or_default(),
        ]
    }

    fn decode_fields(fields: &mut FieldReader) -> std::result::Result<Self, DecodeError> {
        let timestamp = fields.datetime("timestamp")?;
        let category = fields.opt_text();
        let mood = fields.opt_text();
        Ok(LifeRecord {
            title: fields.text(),
            content: fields.opt_text(),
            category,
            mood,
            timestamp,
        })
    }
}

impl Record for LifeRecord {
    fn validate(&self) -> Result<()> {
        require_text("Title", &self.title)
    }
}

impl Queryable for LifeRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "title" => Some(self.title.as_str().into()),
            "content" => self.content.as_deref().map(FieldValue::from),
            "category" => self.category.as_deref().map(FieldValue::from),
            "mood" => self.mood.as_deref().map(FieldValue::from),
            "timestamp" => Some(self.timestamp.into()),
            _ => None,
        }
    }
}
