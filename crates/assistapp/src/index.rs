//! # Record Positions
//!
//! Records are referenced from the command line by number. The number is the
//! record's **position**: its 1-based place in the store's current ordering.
//!
//! ## Snapshot-Relative
//!
//! A position is only meaningful for the snapshot it was read from. Deleting
//! position `k` shifts every later record down by one, so position `k + 1`
//! becomes `k`. Payments additionally carry a stable id that never shifts; use
//! that when a reference must survive other deletions.
//!
//! ## Canonical Positions in Filtered Views
//!
//! Filtering never renumbers. A task shown as `3` in `assist task list --pending`
//! is the same task as `3` in the unfiltered list, so the number a user reads
//! off any view can be fed straight back into `done`, `edit` or `delete`.
//!
//! - [`Position`]: 1-based position, converted to a 0-based slot only inside the store
//! - [`DisplayRecord`]: a record paired with its canonical position
//! - [`index_records`]: assigns positions to a full snapshot
//! - [`parse_positions`]: parses `"3"`, `"1-3"`, `"1,4,6-7"` against a snapshot size
//!
//! **Developer Note**: list/query commands must go through [`index_records`]
//! before filtering. Enumerating a filtered list yourself breaks the canonical
//! numbering.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// A 1-based position in a store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Position(NonZeroUsize);

impl Position {
    /// Returns `None` for zero, which is never a valid position.
    pub fn new(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Position)
    }

    /// Position of the record stored in 0-based `slot`.
    pub fn from_slot(slot: usize) -> Self {
        Position(NonZeroUsize::MIN.saturating_add(slot))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }

    /// The 0-based slot, if the position exists in a snapshot of `len` records.
    pub fn slot(self, len: usize) -> Option<usize> {
        let slot = self.0.get() - 1;
        (slot < len).then_some(slot)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid position: '{}'", s))?;
        Position::new(n).ok_or_else(|| "Positions start at 1".to_string())
    }
}

/// A record paired with its canonical position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord<T> {
    pub position: Position,
    pub record: T,
}

impl<T> DisplayRecord<T> {
    pub fn new(position: Position, record: T) -> Self {
        Self { position, record }
    }
}

/// Pairs every record of a full snapshot with its position.
pub fn index_records<T: Clone>(records: &[T]) -> Vec<DisplayRecord<T>> {
    records
        .iter()
        .enumerate()
        .map(|(slot, r)| DisplayRecord::new(Position::from_slot(slot), r.clone()))
        .collect()
}

/// Parses a comma-separated list of positions and inclusive ranges.
///
/// `last` is the highest position the selector may refer to. A range reaching
/// past it is rejected before it is expanded; single positions are left for
/// the caller to bounds-check. Duplicates are removed while keeping
/// first-seen order.
pub fn parse_positions(input: &str, last: usize) -> Result<Vec<Position>, String> {
    let mut seen = HashSet::new();
    let mut positions: Vec<Position> = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        for position in parse_position_or_range(part, last)? {
            if seen.insert(position) {
                positions.push(position);
            }
        }
    }
    if positions.is_empty() {
        return Err(format!("No position given in '{}'", input));
    }
    Ok(positions)
}

fn parse_position_or_range(s: &str, last: usize) -> Result<Vec<Position>, String> {
    if let Some(dash_pos) = s.find('-') {
        if dash_pos > 0 {
            let start: Position = s[..dash_pos].parse()?;
            let end: Position = s[dash_pos + 1..].parse()?;
            if start > end {
                return Err(format!("Invalid range: '{}' (start after end)", s));
            }
            if end.get() > last {
                return Err(format!("Range '{}' goes past the last record ({})", s, last));
            }
            return Ok((start.get()..=end.get()).filter_map(Position::new).collect());
        }
    }
    s.parse().map(|p| vec![p])
}
