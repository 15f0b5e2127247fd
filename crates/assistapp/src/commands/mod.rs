//! # Command Layer
//!
//! The business logic of assist. Each domain has its own submodule of plain
//! functions that take a [`RecordStore`] and return structured results.
//!
//! Commands never print, never prompt and never exit. They return a
//! [`CmdResult`] carrying:
//!
//! - `affected`: records the command created or changed, with their position
//!   after the operation (for deletes, the position they had)
//! - `listed`: records to display, with canonical positions
//! - `messages`: leveled messages for the UI to render
//!
//! Analytics commands return their report types directly.
//!
//! ## Testing Strategy
//!
//! Command tests run against [`MemBackend`](crate::store::MemBackend) stores.
//! Storage behaviour itself is tested in the store module.
//!
//! ## Command Modules
//!
//! - [`tasks`]: to-do items
//! - [`health`]: daily vitals
//! - [`life`]: journal entries
//! - [`payments`]: ledger entries, addressed by id
//! - [`reports`]: payment analytics

use crate::error::{AssistError, Result};
use crate::index::{DisplayRecord, Position};
use crate::store::backend::LineBackend;
use crate::store::{Record, RecordStore};
use serde::Serialize;

pub mod health;
pub mod life;
pub mod payments;
pub mod reports;
pub mod tasks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CmdResult<T> {
    pub affected: Vec<DisplayRecord<T>>,
    pub listed: Vec<DisplayRecord<T>>,
    pub messages: Vec<CmdMessage>,
}

impl<T> Default for CmdResult<T> {
    fn default() -> Self {
        Self {
            affected: Vec::new(),
            listed: Vec::new(),
            messages: Vec::new(),
        }
    }
}

impl<T> CmdResult<T> {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, records: Vec<DisplayRecord<T>>) -> Self {
        self.listed = records;
        self
    }
}

pub(crate) fn nothing_to_change() -> AssistError {
    AssistError::Api("Nothing to change: no field was given".to_string())
}

/// Fails on the first position outside the snapshot.
pub(crate) fn require_positions<T: Record, B: LineBackend>(
    store: &RecordStore<T, B>,
    positions: &[Position],
) -> Result<()> {
    match positions.iter().find(|p| store.get(**p).is_none()) {
        Some(missing) => Err(AssistError::NotFound(format!(
            "no record at position {} ({} records)",
            missing,
            store.len()
        ))),
        None => Ok(()),
    }
}

/// Records at `positions`, in the order given.
pub(crate) fn show_positions<T: Record, B: LineBackend>(
    store: &RecordStore<T, B>,
    positions: &[Position],
) -> Result<CmdResult<T>> {
    let mut listed = Vec::with_capacity(positions.len());
    for &position in positions {
        let record = store
            .get(position)
            .ok_or_else(|| AssistError::NotFound(format!("no record at position {}", position)))?;
        listed.push(DisplayRecord::new(position, record.clone()));
    }
    Ok(CmdResult::default().with_listed(listed))
}

/// Deletes several positions of one snapshot.
///
/// Every position is checked first, so a bad one deletes nothing. Deletion
/// runs from the highest position down, which keeps the remaining positions
/// valid while the batch runs.
pub(crate) fn delete_positions<T: Record, B: LineBackend>(
    store: &mut RecordStore<T, B>,
    positions: &[Position],
    describe: impl Fn(&T) -> String,
) -> Result<CmdResult<T>> {
    require_positions(store, positions)?;

    let mut ordered = positions.to_vec();
    ordered.sort_unstable_by(|a, b| b.cmp(a));
    ordered.dedup();

    let mut result = CmdResult::default();
    for position in ordered {
        let removed = store.delete(position)?;
        result.add_message(CmdMessage::success(format!(
            "Deleted {}: {}",
            position,
            describe(&removed)
        )));
        result.affected.push(DisplayRecord::new(position, removed));
    }
    result.affected.reverse();
    result.messages.reverse();
    Ok(result)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::index::Position;
    use crate::store::{MemBackend, Record, RecordStore};

    pub fn pos(n: usize) -> Position {
        Position::new(n).unwrap()
    }

    pub fn mem_store<T: Record>() -> RecordStore<T, MemBackend> {
        RecordStore::open(MemBackend::new()).unwrap()
    }
}
