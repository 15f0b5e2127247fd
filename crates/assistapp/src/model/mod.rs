//! The four record types and the domains they belong to.
//!
//! Each record type implements [`LineCodec`](crate::codec::LineCodec) for its
//! file layout, [`Record`](crate::store::Record) for validation and ordering,
//! and [`Queryable`](crate::query::Queryable) for filtering. Edits go through a
//! per-type patch where every field is optional.

pub mod health;
pub mod life;
pub mod payment;
pub mod task;

pub use health::{HealthPatch, HealthRecord, HealthStats};
pub use life::{LifeRecord, CATEGORIES, MOODS};
pub use payment::{Payment, PaymentKind, PaymentPatch};
pub use task::{Task, TaskPatch};

use crate::error::{AssistError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Tasks,
    Health,
    Life,
    Payments,
}

impl Domain {
    pub const ALL: [Domain; 4] = [Domain::Tasks, Domain::Health, Domain::Life, Domain::Payments];

    /// Name of the backing file inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Domain::Tasks => "todo_list.txt",
            Domain::Health => "health_records.txt",
            Domain::Life => "life_records.txt",
            Domain::Payments => "payment_records.txt",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Tasks => "tasks",
            Domain::Health => "health",
            Domain::Life => "life",
            Domain::Payments => "payments",
        };
        write!(f, "{}", name)
    }
}

/// Local wall-clock time at second precision, the resolution of the files.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssistError::invalid(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Trims a free-text input; blank means absent.
pub(crate) fn normalize_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
