use super::{delete_positions, show_positions, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{DisplayRecord, Position};
use crate::model::LifeRecord;
use crate::query::Query;
use crate::store::backend::LineBackend;
use crate::store::RecordStore;

/// The editable fields of an entry.
#[derive(Debug, Clone, Default)]
pub struct LifeEntry {
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
}

impl LifeEntry {
    fn into_record(self) -> LifeRecord {
        LifeRecord::new(self.title, self.content, self.category, self.mood)
    }
}

/// Keywords for [`search`]. Blank keywords are ignored.
#[derive(Debug, Clone, Default)]
pub struct LifeSearch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
}

pub fn add<B: LineBackend>(
    store: &mut RecordStore<LifeRecord, B>,
    entry: LifeEntry,
) -> Result<CmdResult<LifeRecord>> {
    let record = entry.into_record();
    let position = store.add(record.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry added at {}: {}",
        position, record.title
    )));
    result.affected.push(DisplayRecord::new(position, record));
    Ok(result)
}

pub fn list<B: LineBackend>(store: &RecordStore<LifeRecord, B>) -> CmdResult<LifeRecord> {
    CmdResult::default().with_listed(store.snapshot())
}

pub fn show<B: LineBackend>(
    store: &RecordStore<LifeRecord, B>,
    positions: &[Position],
) -> Result<CmdResult<LifeRecord>> {
    show_positions(store, positions)
}

/// Replaces the entry at `position` and restamps it.
///
/// Every field is overwritten: an optional field left out of `entry` is
/// cleared, not kept.
pub fn edit<B: LineBackend>(
    store: &mut RecordStore<LifeRecord, B>,
    position: Position,
    entry: LifeEntry,
) -> Result<CmdResult<LifeRecord>> {
    let record = entry.into_record();
    let position = store.replace(position, record.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry {} replaced: {}",
        position, record.title
    )));
    result.affected.push(DisplayRecord::new(position, record));
    Ok(result)
}

pub fn delete<B: LineBackend>(
    store: &mut RecordStore<LifeRecord, B>,
    positions: &[Position],
) -> Result<CmdResult<LifeRecord>> {
    delete_positions(store, positions, |r| r.title.clone())
}

/// Case-insensitive substring search over title, content, category and mood,
/// combined with AND. All keywords blank returns nothing.
pub fn search<B: LineBackend>(
    store: &RecordStore<LifeRecord, B>,
    keywords: &LifeSearch,
) -> CmdResult<LifeRecord> {
    let query = Query::search()
        .contains("title", keywords.title.as_deref())
        .contains("content", keywords.content.as_deref())
        .contains("category", keywords.category.as_deref())
        .contains("mood", keywords.mood.as_deref());

    let mut result = CmdResult::default();
    if query.is_empty() {
        result.add_message(CmdMessage::info("Give at least one keyword to search for"));
    }
    result.with_listed(query.apply(store.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{mem_store, pos};

    fn entry(title: &str, category: Option<&str>, mood: Option<&str>) -> LifeEntry {
        LifeEntry {
            title: title.to_string(),
            content: Some(format!("About {}", title)),
            category: category.map(String::from),
            mood: mood.map(String::from),
        }
    }

    fn seeded() -> RecordStore<LifeRecord, crate::store::MemBackend> {
        let mut store = mem_store();
        add(&mut store, entry("Beach day", Some("Travel"), Some("Happy"))).unwrap();
        add(&mut store, entry("Exam prep", Some("Study"), Some("Anxious"))).unwrap();
        add(&mut store, entry("Beach cleanup", Some("Events"), Some("Happy"))).unwrap();
        store
    }

    #[test]
    fn blank_search_returns_nothing() {
        let store = seeded();
        let keywords = LifeSearch {
            title: Some(" ".into()),
            content: Some(String::new()),
            category: None,
            mood: Some("\t".into()),
        };
        let result = search(&store, &keywords);
        assert!(result.listed.is_empty());
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn search_is_and_and_case_insensitive() {
        let store = seeded();
        let result = search(
            &store,
            &LifeSearch {
                title: Some("BEACH".into()),
                mood: Some("happ".into()),
                category: Some("events".into()),
                ..Default::default()
            },
        );
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].position, pos(3));
    }

    #[test]
    fn search_skips_entries_missing_a_searched_field() {
        let mut store = mem_store();
        add(&mut store, entry("No mood", None, None)).unwrap();
        let result = search(
            &store,
            &LifeSearch {
                mood: Some("happy".into()),
                ..Default::default()
            },
        );
        assert!(result.listed.is_empty());
    }

    #[test]
    fn edit_replaces_every_field() {
        let mut store = seeded();
        edit(
            &mut store,
            pos(1),
            LifeEntry {
                title: "Beach day (rained)".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let record = store.get(pos(1)).unwrap();
        assert_eq!(record.title, "Beach day (rained)");
        assert_eq!(record.category, None);
        assert_eq!(record.mood, None);
        assert_eq!(record.content, None);
    }

    #[test]
    fn edit_requires_title() {
        let mut store = seeded();
        assert!(edit(&mut store, pos(2), LifeEntry::default()).is_err());
        assert_eq!(store.get(pos(2)).unwrap().title, "Exam prep");
    }

    #[test]
    fn delete_middle_renumbers() {
        let mut store = seeded();
        delete(&mut store, &[pos(2)]).unwrap();
        let titles: Vec<_> = list(&store)
            .listed
            .into_iter()
            .map(|d| (d.position, d.record.title))
            .collect();
        assert_eq!(
            titles,
            vec![
                (pos(1), "Beach day".to_string()),
                (pos(2), "Beach cleanup".to_string())
            ]
        );
    }
}
