//! # Record Store
//!
//! A [`RecordStore`] is the in-memory working set of one domain, backed by one
//! line-oriented file. The store is generic over the record type and over the
//! [`LineBackend`] that holds the lines:
//!
//! - [`FsBackend`]: the production backend, one file in the data directory
//! - [`MemBackend`]: in-memory lines for tests
//!
//! ## Write Modes
//!
//! There are exactly two ways the file changes:
//!
//! - **append**: [`RecordStore::add`] writes the one new line
//! - **full rewrite**: every edit and delete re-encodes the whole snapshot in
//!   memory order and atomically replaces the file
//!
//! Memory is only updated after the write succeeded, so the snapshot and the
//! file never disagree after a failed operation.
//!
//! ## Loading
//!
//! Lines that fail to decode are skipped with a `warn!` and counted in the
//! [`LoadReport`]; one bad line never prevents the rest from loading. A missing
//! file is simply an empty store.
//!
//! ## Edits
//!
//! Edits come in two named forms:
//!
//! - [`RecordStore::update`] applies a [`Patch`]: fields the patch leaves unset
//!   keep their current value
//! - [`RecordStore::replace`] swaps in a whole record, explicit absences included
//!
//! Both validate the edited copy before anything is committed.
//!
//! ## Single Process
//!
//! A store owns its snapshot. Two stores open on the same file are not
//! coordinated: the last full rewrite wins.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

use crate::codec::LineCodec;
use crate::error::{AssistError, Result};
use crate::index::{index_records, DisplayRecord, Position};
use backend::LineBackend;
use std::cmp::Ordering;
use std::path::PathBuf;
use tracing::{debug, warn};

pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;

/// A value that can live in a [`RecordStore`].
pub trait Record: LineCodec + Clone {
    /// Whether [`Record::canonical_cmp`] defines an order the store maintains.
    /// Unordered records keep insertion order.
    const ORDERED: bool = false;

    /// Domain checks run before a record is added or an edit is committed.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn canonical_cmp(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }

    /// Stable identifier for keyed records.
    fn key(&self) -> Option<u64> {
        None
    }
}

/// A partial edit: only the fields it sets are changed.
pub trait Patch<T> {
    fn apply(self, record: &mut T);

    fn is_empty(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

pub struct RecordStore<T, B> {
    backend: B,
    records: Vec<T>,
    next_key: u64,
}

impl<T: Record, B: LineBackend> RecordStore<T, B> {
    /// Opens the store and loads the backing file.
    pub fn open(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            records: Vec::new(),
            next_key: 1,
        };
        store.load()?;
        Ok(store)
    }

    /// Replaces the snapshot with the current file contents.
    ///
    /// On an I/O error the previous snapshot is kept.
    pub fn load(&mut self) -> Result<LoadReport> {
        let lines = self
            .backend
            .read_lines()
            .inspect_err(|e| warn!(path = %self.location().display(), error = %e, "Failed to read records"))?
            .unwrap_or_default();

        let mut report = LoadReport::default();
        let mut records = Vec::with_capacity(lines.len());
        for (n, line) in lines.iter().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(
                        path = %self.location().display(),
                        line = n + 1,
                        error = %e,
                        "Skipping line that is not valid UTF-8"
                    );
                    report.skipped += 1;
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match T::decode(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        path = %self.location().display(),
                        line = n + 1,
                        error = %e,
                        "Skipping malformed record"
                    );
                    report.skipped += 1;
                }
            }
        }

        if T::ORDERED {
            records.sort_by(T::canonical_cmp);
        }
        self.next_key = records
            .iter()
            .filter_map(Record::key)
            .max()
            .map_or(1, |max| max + 1);
        report.loaded = records.len();
        self.records = records;

        debug!(
            path = %self.location().display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "Loaded records"
        );
        Ok(report)
    }

    /// Validates and appends a record. Returns its position after ordering.
    pub fn add(&mut self, record: T) -> Result<Position> {
        record.validate()?;

        self.backend
            .append_line(&record.encode())
            .inspect_err(|e| warn!(path = %self.location().display(), error = %e, "Failed to append record"))?;
        debug!(path = %self.location().display(), "Appended record");

        if let Some(key) = record.key() {
            self.next_key = self.next_key.max(key + 1);
        }
        self.records.push(record);
        let last = self.records.len() - 1;
        let slot = if T::ORDERED {
            settle(&mut self.records, last)
        } else {
            last
        };
        Ok(Position::from_slot(slot))
    }

    pub fn get(&self, position: Position) -> Option<&T> {
        position.slot(self.records.len()).map(|slot| &self.records[slot])
    }

    /// Partial update. Returns the record's position after reordering.
    pub fn update<P: Patch<T>>(&mut self, position: Position, patch: P) -> Result<Position> {
        let slot = self.slot(position)?;
        let mut edited = self.records[slot].clone();
        patch.apply(&mut edited);
        self.commit(slot, edited)
    }

    /// Full replace. Returns the record's position after reordering.
    pub fn replace(&mut self, position: Position, record: T) -> Result<Position> {
        let slot = self.slot(position)?;
        self.commit(slot, record)
    }

    /// Removes a record. Later positions shift down by one.
    pub fn delete(&mut self, position: Position) -> Result<T> {
        let slot = self.slot(position)?;
        let mut next = self.records.clone();
        let removed = next.remove(slot);
        self.write_all(&next)?;
        self.records = next;
        Ok(removed)
    }

    /// Rewrites the file from the current snapshot.
    pub fn rewrite(&self) -> Result<()> {
        self.write_all(&self.records)
    }

    pub fn find(&self, key: u64) -> Option<&T> {
        self.records.iter().find(|r| r.key() == Some(key))
    }

    pub fn position_of(&self, key: u64) -> Option<Position> {
        self.records
            .iter()
            .position(|r| r.key() == Some(key))
            .map(Position::from_slot)
    }

    /// The id the next keyed record should carry.
    pub fn next_id(&self) -> u64 {
        self.next_key
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The full snapshot with canonical positions.
    pub fn snapshot(&self) -> Vec<DisplayRecord<T>> {
        index_records(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn location(&self) -> PathBuf {
        self.backend.location()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn slot(&self, position: Position) -> Result<usize> {
        position.slot(self.records.len()).ok_or_else(|| {
            AssistError::NotFound(format!(
                "no record at position {} ({} records)",
                position,
                self.records.len()
            ))
        })
    }

    fn commit(&mut self, slot: usize, edited: T) -> Result<Position> {
        edited.validate()?;

        let mut next = self.records.clone();
        next[slot] = edited;
        let slot = if T::ORDERED {
            settle(&mut next, slot)
        } else {
            slot
        };
        self.write_all(&next)?;
        self.records = next;
        Ok(Position::from_slot(slot))
    }

    fn write_all(&self, records: &[T]) -> Result<()> {
        let lines: Vec<String> = records.iter().map(LineCodec::encode).collect();
        self.backend
            .rewrite(&lines)
            .inspect_err(|e| warn!(path = %self.location().display(), error = %e, "Failed to rewrite records"))?;
        debug!(path = %self.location().display(), count = lines.len(), "Rewrote records");
        Ok(())
    }
}

/// Moves the record at `slot` to its place in an otherwise sorted list,
/// after any records it compares equal to. Returns the new slot.
fn settle<T: Record>(records: &mut Vec<T>, slot: usize) -> usize {
    let record = records.remove(slot);
    let target = records.partition_point(|r| r.canonical_cmp(&record) != Ordering::Greater);
    records.insert(target, record);
    target
}
