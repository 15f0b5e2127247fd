use super::{delete_positions, nothing_to_change, show_positions, CmdMessage, CmdResult};
use crate::codec::encode_date;
use crate::error::Result;
use crate::index::{DisplayRecord, Position};
use crate::model::{HealthPatch, HealthRecord, HealthStats};
use crate::query::Query;
use crate::store::backend::LineBackend;
use crate::store::{Patch, RecordStore};
use chrono::NaiveDate;

/// Inclusive date and weight bounds; unset bounds are open.
#[derive(Debug, Clone, Default)]
pub struct HealthQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
}

fn bmi_check(result: &mut CmdResult<HealthRecord>, record: &HealthRecord) {
    if let Some(warning) = record.bmi_warning() {
        result.add_message(CmdMessage::warning(warning));
    }
}

/// Adds a record for `input.date` (today when unset).
pub fn add<B: LineBackend>(
    store: &mut RecordStore<HealthRecord, B>,
    input: HealthPatch,
) -> Result<CmdResult<HealthRecord>> {
    let record = input.into_record();
    let position = store.add(record.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Health record added at {} for {}",
        position,
        encode_date(record.date)
    )));
    bmi_check(&mut result, &record);
    result.affected.push(DisplayRecord::new(position, record));
    Ok(result)
}

pub fn list<B: LineBackend>(store: &RecordStore<HealthRecord, B>) -> CmdResult<HealthRecord> {
    CmdResult::default().with_listed(store.snapshot())
}

pub fn show<B: LineBackend>(
    store: &RecordStore<HealthRecord, B>,
    positions: &[Position],
) -> Result<CmdResult<HealthRecord>> {
    show_positions(store, positions)
}

pub fn edit<B: LineBackend>(
    store: &mut RecordStore<HealthRecord, B>,
    position: Position,
    patch: HealthPatch,
) -> Result<CmdResult<HealthRecord>> {
    if patch.is_empty() {
        return Err(nothing_to_change());
    }
    let position = store.update(position, patch)?;

    let mut result = CmdResult::default();
    if let Some(record) = store.get(position).cloned() {
        result.add_message(CmdMessage::success(format!(
            "Updated health record {} ({})",
            position,
            encode_date(record.date)
        )));
        bmi_check(&mut result, &record);
        result.affected.push(DisplayRecord::new(position, record));
    }
    Ok(result)
}

pub fn delete<B: LineBackend>(
    store: &mut RecordStore<HealthRecord, B>,
    positions: &[Position],
) -> Result<CmdResult<HealthRecord>> {
    delete_positions(store, positions, |r| encode_date(r.date))
}

/// Records within every given bound. With no bound set, all records.
pub fn query<B: LineBackend>(
    store: &RecordStore<HealthRecord, B>,
    bounds: &HealthQuery,
) -> CmdResult<HealthRecord> {
    let query = Query::filter()
        .range("date", bounds.from, bounds.to)
        .range("weight", bounds.min_weight, bounds.max_weight);
    CmdResult::default().with_listed(query.apply(store.snapshot()))
}

pub fn stats<B: LineBackend>(store: &RecordStore<HealthRecord, B>) -> HealthStats {
    HealthStats::compute(store.records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{mem_store, pos};
    use crate::commands::MessageLevel;
    use crate::error::AssistError;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn day(d: u32, weight: Option<f64>) -> HealthPatch {
        HealthPatch {
            date: Some(date(d)),
            weight,
            ..Default::default()
        }
    }

    #[test]
    fn add_defaults_to_today() {
        let mut store = mem_store();
        let result = add(&mut store, HealthPatch::default()).unwrap();
        assert_eq!(result.affected[0].record.date, crate::model::today());
    }

    #[test]
    fn inverted_blood_pressure_is_rejected() {
        let mut store = mem_store();
        let input = HealthPatch {
            bp_high: Some(80),
            bp_low: Some(120),
            ..Default::default()
        };
        assert!(matches!(add(&mut store, input), Err(AssistError::Validation(_))));
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn odd_bmi_is_stored_with_a_warning() {
        let mut store = mem_store();
        let input = HealthPatch {
            weight: Some(200.0),
            height: Some(100.0),
            ..day(1, None)
        };
        let result = add(&mut store, input).unwrap();
        assert_eq!(store.len(), 1);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning));
    }

    #[test]
    fn edit_keeps_fields_not_given() {
        let mut store = mem_store();
        add(&mut store, day(1, Some(70.0))).unwrap();
        edit(
            &mut store,
            pos(1),
            HealthPatch {
                steps: Some(5000),
                ..Default::default()
            },
        )
        .unwrap();
        let record = store.get(pos(1)).unwrap();
        assert_eq!(record.weight, Some(70.0));
        assert_eq!(record.steps, Some(5000));
    }

    #[test]
    fn query_combines_date_and_weight() {
        let mut store = mem_store();
        add(&mut store, day(1, Some(70.0))).unwrap();
        add(&mut store, day(5, Some(72.0))).unwrap();
        add(&mut store, day(9, None)).unwrap();
        add(&mut store, day(12, Some(71.0))).unwrap();

        let all = query(&store, &HealthQuery::default());
        assert_eq!(all.listed.len(), 4);

        let bounded = query(
            &store,
            &HealthQuery {
                from: Some(date(2)),
                to: Some(date(12)),
                min_weight: Some(71.0),
                ..Default::default()
            },
        );
        let positions: Vec<_> = bounded.listed.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![pos(2), pos(4)]);
    }

    #[test]
    fn stats_over_store() {
        let mut store = mem_store();
        add(&mut store, day(1, Some(70.0))).unwrap();
        add(&mut store, day(2, Some(71.0))).unwrap();
        assert_eq!(stats(&store).weight, Some(70.5));
    }

    #[test]
    fn delete_reports_date() {
        let mut store = mem_store();
        add(&mut store, day(1, None)).unwrap();
        let result = delete(&mut store, &[pos(1)]).unwrap();
        assert!(result.messages[0].content.contains("2024-02-01"));
        assert!(store.is_empty());
    }
}
