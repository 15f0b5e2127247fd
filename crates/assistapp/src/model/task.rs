use super::{now, require_text};
use crate::codec::{encode_datetime, DecodeError, Dialect, FieldReader, LineCodec};
use crate::error::{AssistError, Result};
use crate::query::{FieldValue, Queryable};
use crate::store::{Patch, Record};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 3;
pub const DEFAULT_PRIORITY: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub content: String,
    pub priority: u8,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn new(content: impl Into<String>, priority: u8) -> Self {
        Self {
            content: content.into().trim().to_string(),
            priority,
            completed: false,
            created_at: now(),
        }
    }

    pub fn status(&self) -> &'static str {
        if self.completed {
            "done"
        } else {
            "pending"
        }
    }
}

impl LineCodec for Task {
    const DIALECT: Dialect = Dialect::new(",", 4);

    fn encode_fields(&self) -> Vec<String> {
        vec![
            self.content.clone(),
            self.priority.to_string(),
            self.completed.to_string(),
            encode_datetime(self.created_at),
        ]
    }

    fn decode_fields(fields: &mut FieldReader) -> std::result::Result<Self, DecodeError> {
        Ok(Task {
            content: fields.text(),
            priority: fields.parse("priority")?,
            completed: fields.parse("completed")?,
            created_at: fields.datetime("created_at")?,
        })
    }
}

impl Record for Task {
    const ORDERED: bool = true;

    fn validate(&self) -> Result<()> {
        require_text("Task content", &self.content)?;
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(AssistError::invalid(format!(
                "priority must be between {} and {}, got {}",
                MIN_PRIORITY, MAX_PRIORITY, self.priority
            )));
        }
        Ok(())
    }

    /// Higher priority first; equal priorities oldest first.
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.created_at.cmp(&other.created_at))
    }
}

impl Queryable for Task {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "content" => Some(self.content.as_str().into()),
            "priority" => Some(FieldValue::Number(f64::from(self.priority))),
            "status" => Some(self.status().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub content: Option<String>,
    pub priority: Option<u8>,
    pub completed: Option<bool>,
}

impl Patch<Task> for TaskPatch {
    fn apply(self, task: &mut Task) {
        if let Some(content) = self.content {
            task.content = content.trim().to_string();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }

    fn is_empty(&self) -> bool {
        self.content.is_none() && self.priority.is_none() && self.completed.is_none()
    }
}
