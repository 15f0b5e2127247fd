//! Ledger commands. Payments are addressed by their stable id.

use super::{nothing_to_change, CmdMessage, CmdResult};
use crate::analytics::Categorizer;
use crate::codec::encode_amount;
use crate::error::{AssistError, Result};
use crate::index::DisplayRecord;
use crate::model::{now, Payment, PaymentKind, PaymentPatch};
use crate::query::Query;
use crate::store::backend::LineBackend;
use crate::store::{Patch, RecordStore};
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: f64,
    pub kind: PaymentKind,
    /// Defaults to now.
    pub at: Option<NaiveDateTime>,
    /// Derived from the note when unset or blank.
    pub category: Option<String>,
    pub note: Option<String>,
    pub tags: Vec<String>,
}

/// Criteria shared by [`query`] and [`search`]. Unset fields add no condition.
#[derive(Debug, Clone, Default)]
pub struct PaymentCriteria {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<PaymentKind>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl PaymentCriteria {
    fn onto(&self, query: Query) -> Query {
        query
            .range("at", self.from, self.to)
            .exact("kind", self.kind.map(PaymentKind::as_str))
            .exact("category", self.category.as_deref())
            .contains("note", self.note.as_deref())
            .any_of("tags", &self.tags)
            .range("amount", self.min_amount, self.max_amount)
    }
}

fn describe(payment: &Payment) -> String {
    format!(
        "#{} {} {} ({})",
        payment.id,
        payment.kind,
        encode_amount(payment.amount),
        payment.category
    )
}

fn not_found(id: u64) -> AssistError {
    AssistError::NotFound(format!("no payment with id {}", id))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

pub fn add<B: LineBackend>(
    store: &mut RecordStore<Payment, B>,
    categorizer: &Categorizer,
    input: NewPayment,
) -> Result<CmdResult<Payment>> {
    let category = if is_blank(&input.category) {
        categorizer.categorize(input.kind, input.note.as_deref())
    } else {
        input.category.unwrap_or_default()
    };
    let payment = Payment::new(
        store.next_id(),
        input.amount,
        input.kind,
        input.at.unwrap_or_else(now),
        category,
        input.note,
        input.tags,
    );
    let position = store.add(payment.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Recorded {}", describe(&payment))));
    result.affected.push(DisplayRecord::new(position, payment));
    Ok(result)
}

pub fn list<B: LineBackend>(store: &RecordStore<Payment, B>) -> CmdResult<Payment> {
    CmdResult::default().with_listed(store.snapshot())
}

pub fn show<B: LineBackend>(store: &RecordStore<Payment, B>, ids: &[u64]) -> Result<CmdResult<Payment>> {
    let mut listed = Vec::with_capacity(ids.len());
    for &id in ids {
        let position = store.position_of(id).ok_or_else(|| not_found(id))?;
        let payment = store.find(id).ok_or_else(|| not_found(id))?;
        listed.push(DisplayRecord::new(position, payment.clone()));
    }
    Ok(CmdResult::default().with_listed(listed))
}

/// Partial edit by id. A blank category re-derives it from the (new) note.
pub fn edit<B: LineBackend>(
    store: &mut RecordStore<Payment, B>,
    categorizer: &Categorizer,
    id: u64,
    mut patch: PaymentPatch,
) -> Result<CmdResult<Payment>> {
    if patch.is_empty() {
        return Err(nothing_to_change());
    }
    let position = store.position_of(id).ok_or_else(|| not_found(id))?;
    let current = store.find(id).ok_or_else(|| not_found(id))?;

    if patch.category.is_some() && is_blank(&patch.category) {
        let kind = patch.kind.unwrap_or(current.kind);
        let note = patch.note.clone().or_else(|| current.note.clone());
        patch.category = Some(categorizer.categorize(kind, note.as_deref()));
    }

    let position = store.update(position, patch)?;
    let mut result = CmdResult::default();
    if let Some(payment) = store.get(position) {
        result.add_message(CmdMessage::success(format!("Updated {}", describe(payment))));
        result.affected.push(DisplayRecord::new(position, payment.clone()));
    }
    Ok(result)
}

/// Deletes by id. Every id is checked before anything is removed.
pub fn delete<B: LineBackend>(
    store: &mut RecordStore<Payment, B>,
    ids: &[u64],
) -> Result<CmdResult<Payment>> {
    if let Some(&missing) = ids.iter().find(|id| store.position_of(**id).is_none()) {
        return Err(not_found(missing));
    }

    let mut result = CmdResult::default();
    for &id in ids {
        // Positions shift after each delete, so resolve them one at a time.
        let Some(position) = store.position_of(id) else {
            continue;
        };
        let removed = store.delete(position)?;
        result.add_message(CmdMessage::success(format!("Deleted {}", describe(&removed))));
        result.affected.push(DisplayRecord::new(position, removed));
    }
    Ok(result)
}

/// Filter query: with no criteria set, every payment.
pub fn query<B: LineBackend>(
    store: &RecordStore<Payment, B>,
    criteria: &PaymentCriteria,
) -> CmdResult<Payment> {
    let query = criteria.onto(Query::filter());
    CmdResult::default().with_listed(query.apply(store.snapshot()))
}

/// Search: with no criteria set, nothing.
pub fn search<B: LineBackend>(
    store: &RecordStore<Payment, B>,
    criteria: &PaymentCriteria,
) -> CmdResult<Payment> {
    let query = criteria.onto(Query::search());
    let mut result = CmdResult::default();
    if query.is_empty() {
        result.add_message(CmdMessage::info("Give at least one criterion to search for"));
    }
    result.with_listed(query.apply(store.snapshot()))
}
