use super::{delete_positions, nothing_to_change, require_positions, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{DisplayRecord, Position};
use crate::model::task::DEFAULT_PRIORITY;
use crate::model::{Task, TaskPatch};
use crate::query::Query;
use crate::store::backend::LineBackend;
use crate::store::{Patch, RecordStore};

pub fn add<B: LineBackend>(
    store: &mut RecordStore<Task, B>,
    content: &str,
    priority: Option<u8>,
) -> Result<CmdResult<Task>> {
    let task = Task::new(content, priority.unwrap_or(DEFAULT_PRIORITY));
    let position = store.add(task.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Task added at {}: {}",
        position, task.content
    )));
    result.affected.push(DisplayRecord::new(position, task));
    Ok(result)
}

/// All tasks, or only the open ones. Positions stay canonical either way.
pub fn list<B: LineBackend>(store: &RecordStore<Task, B>, pending_only: bool) -> CmdResult<Task> {
    let query = if pending_only {
        Query::filter().exact("status", Some("pending"))
    } else {
        Query::filter()
    };
    CmdResult::default().with_listed(query.apply(store.snapshot()))
}

pub fn done<B: LineBackend>(
    store: &mut RecordStore<Task, B>,
    positions: &[Position],
) -> Result<CmdResult<Task>> {
    require_positions(store, positions)?;

    let mut result = CmdResult::default();
    for &position in positions {
        let patch = TaskPatch {
            completed: Some(true),
            ..Default::default()
        };
        let position = store.update(position, patch)?;
        if let Some(task) = store.get(position) {
            result.add_message(CmdMessage::success(format!(
                "Completed {}: {}",
                position, task.content
            )));
            result.affected.push(DisplayRecord::new(position, task.clone()));
        }
    }
    Ok(result)
}

pub fn edit<B: LineBackend>(
    store: &mut RecordStore<Task, B>,
    position: Position,
    patch: TaskPatch,
) -> Result<CmdResult<Task>> {
    if patch.is_empty() {
        return Err(nothing_to_change());
    }
    let moved_to = store.update(position, patch)?;

    let mut result = CmdResult::default();
    if let Some(task) = store.get(moved_to) {
        let message = if moved_to == position {
            format!("Updated {}: {}", position, task.content)
        } else {
            format!("Updated {} (now {}): {}", position, moved_to, task.content)
        };
        result.add_message(CmdMessage::success(message));
        result.affected.push(DisplayRecord::new(moved_to, task.clone()));
    }
    Ok(result)
}

pub fn delete<B: LineBackend>(
    store: &mut RecordStore<Task, B>,
    positions: &[Position],
) -> Result<CmdResult<Task>> {
    delete_positions(store, positions, |t| t.content.clone())
}
