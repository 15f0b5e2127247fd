//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! UI. It owns the four stores and the payment categorizer.
//!
//! The facade:
//! - **Dispatches** to the command functions
//! - **Normalizes inputs**: position and id selectors arrive as strings
//!   (`"3"`, `"1-3"`, `"1,4"`) and are parsed here
//! - **Returns structured types**, never strings for display
//!
//! Business logic belongs in `commands/*.rs`; presentation belongs to the UI.
//!
//! ## Generic Over the Backend
//!
//! `AssistApi<B: LineBackend>` runs on files in production
//! (`AssistApi<FsBackend>`) and in memory in tests (`AssistApi<MemBackend>`).

use crate::analytics::{CategoryTotal, Categorizer, DateRange, Insights, Month, MonthlyBar, PeriodComparison, PieSlice};
use crate::commands::health::HealthQuery;
use crate::commands::life::{LifeEntry, LifeSearch};
use crate::commands::payments::{NewPayment, PaymentCriteria};
use crate::commands::{self, CmdResult};
use crate::error::{AssistError, Result};
use crate::index::{parse_positions, Position};
use crate::model::{
    Domain, HealthPatch, HealthRecord, HealthStats, LifeRecord, Payment, PaymentKind,
    PaymentPatch, Task, TaskPatch,
};
use crate::store::backend::LineBackend;
use crate::store::RecordStore;
use std::path::PathBuf;

pub struct AssistApi<B: LineBackend> {
    tasks: RecordStore<Task, B>,
    health: RecordStore<HealthRecord, B>,
    life: RecordStore<LifeRecord, B>,
    payments: RecordStore<Payment, B>,
    categorizer: Categorizer,
}

/// `last` bounds ranges: the snapshot length for positions, the highest id
/// handed out for payments.
fn positions(selector: &str, last: usize) -> Result<Vec<Position>> {
    parse_positions(selector, last).map_err(AssistError::Api)
}

fn position(selector: &str) -> Result<Position> {
    selector.parse().map_err(AssistError::Api)
}

/// Ids share the selector grammar of positions.
fn ids(selector: &str, last: u64) -> Result<Vec<u64>> {
    let last = usize::try_from(last).unwrap_or(usize::MAX);
    Ok(positions(selector, last)?
        .into_iter()
        .map(|p| p.get() as u64)
        .collect())
}

fn id(selector: &str) -> Result<u64> {
    selector
        .trim()
        .parse()
        .map_err(|_| AssistError::Api(format!("Invalid payment id: '{}'", selector)))
}

impl<B: LineBackend> AssistApi<B> {
    /// Opens one store per domain on the backend `backend_for` returns.
    pub fn open(mut backend_for: impl FnMut(Domain) -> B, categorizer: Categorizer) -> Result<Self> {
        Ok(Self {
            tasks: RecordStore::open(backend_for(Domain::Tasks))?,
            health: RecordStore::open(backend_for(Domain::Health))?,
            life: RecordStore::open(backend_for(Domain::Life))?,
            payments: RecordStore::open(backend_for(Domain::Payments))?,
            categorizer,
        })
    }

    pub fn location(&self, domain: Domain) -> PathBuf {
        match domain {
            Domain::Tasks => self.tasks.location(),
            Domain::Health => self.health.location(),
            Domain::Life => self.life.location(),
            Domain::Payments => self.payments.location(),
        }
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    // --- tasks ---

    pub fn add_task(&mut self, content: &str, priority: Option<u8>) -> Result<CmdResult<Task>> {
        commands::tasks::add(&mut self.tasks, content, priority)
    }

    pub fn list_tasks(&self, pending_only: bool) -> CmdResult<Task> {
        commands::tasks::list(&self.tasks, pending_only)
    }

    pub fn complete_tasks(&mut self, selector: &str) -> Result<CmdResult<Task>> {
        let selected = positions(selector, self.tasks.len())?;
        commands::tasks::done(&mut self.tasks, &selected)
    }

    pub fn edit_task(&mut self, selector: &str, patch: TaskPatch) -> Result<CmdResult<Task>> {
        commands::tasks::edit(&mut self.tasks, position(selector)?, patch)
    }

    pub fn delete_tasks(&mut self, selector: &str) -> Result<CmdResult<Task>> {
        let selected = positions(selector, self.tasks.len())?;
        commands::tasks::delete(&mut self.tasks, &selected)
    }

    // --- health ---

    pub fn add_health(&mut self, input: HealthPatch) -> Result<CmdResult<HealthRecord>> {
        commands::health::add(&mut self.health, input)
    }

    pub fn list_health(&self) -> CmdResult<HealthRecord> {
        commands::health::list(&self.health)
    }

    pub fn show_health(&self, selector: &str) -> Result<CmdResult<HealthRecord>> {
        commands::health::show(&self.health, &positions(selector, self.health.len())?)
    }

    pub fn edit_health(&mut self, selector: &str, patch: HealthPatch) -> Result<CmdResult<HealthRecord>> {
        commands::health::edit(&mut self.health, position(selector)?, patch)
    }

    pub fn delete_health(&mut self, selector: &str) -> Result<CmdResult<HealthRecord>> {
        let selected = positions(selector, self.health.len())?;
        commands::health::delete(&mut self.health, &selected)
    }

    pub fn query_health(&self, bounds: &HealthQuery) -> CmdResult<HealthRecord> {
        commands::health::query(&self.health, bounds)
    }

    pub fn health_stats(&self) -> HealthStats {
        commands::health::stats(&self.health)
    }

    // --- life log ---

    pub fn add_life(&mut self, entry: LifeEntry) -> Result<CmdResult<LifeRecord>> {
        commands::life::add(&mut self.life, entry)
    }

    pub fn list_life(&self) -> CmdResult<LifeRecord> {
        commands::life::list(&self.life)
    }

    pub fn show_life(&self, selector: &str) -> Result<CmdResult<LifeRecord>> {
        commands::life::show(&self.life, &positions(selector, self.life.len())?)
    }

    pub fn edit_life(&mut self, selector: &str, entry: LifeEntry) -> Result<CmdResult<LifeRecord>> {
        commands::life::edit(&mut self.life, position(selector)?, entry)
    }

    pub fn delete_life(&mut self, selector: &str) -> Result<CmdResult<LifeRecord>> {
        let selected = positions(selector, self.life.len())?;
        commands::life::delete(&mut self.life, &selected)
    }

    pub fn search_life(&self, keywords: &LifeSearch) -> CmdResult<LifeRecord> {
        commands::life::search(&self.life, keywords)
    }

    // --- payments ---

    pub fn add_payment(&mut self, input: NewPayment) -> Result<CmdResult<Payment>> {
        commands::payments::add(&mut self.payments, &self.categorizer, input)
    }

    pub fn list_payments(&self) -> CmdResult<Payment> {
        commands::payments::list(&self.payments)
    }

    pub fn show_payments(&self, selector: &str) -> Result<CmdResult<Payment>> {
        commands::payments::show(&self.payments, &ids(selector, self.payments.next_id().saturating_sub(1))?)
    }

    pub fn edit_payment(&mut self, selector: &str, patch: PaymentPatch) -> Result<CmdResult<Payment>> {
        commands::payments::edit(&mut self.payments, &self.categorizer, id(selector)?, patch)
    }

    pub fn delete_payments(&mut self, selector: &str) -> Result<CmdResult<Payment>> {
        let selected = ids(selector, self.payments.next_id().saturating_sub(1))?;
        commands::payments::delete(&mut self.payments, &selected)
    }

    pub fn query_payments(&self, criteria: &PaymentCriteria) -> CmdResult<Payment> {
        commands::payments::query(&self.payments, criteria)
    }

    pub fn search_payments(&self, criteria: &PaymentCriteria) -> CmdResult<Payment> {
        commands::payments::search(&self.payments, criteria)
    }

    // --- payment analytics ---

    pub fn compare_months(&self, month: Month) -> PeriodComparison<Month> {
        commands::reports::compare_months(&self.payments, month)
    }

    pub fn compare_ranges(&self, baseline: DateRange, current: DateRange) -> PeriodComparison<DateRange> {
        commands::reports::compare_ranges(&self.payments, baseline, current)
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        commands::reports::category_totals(&self.payments)
    }

    pub fn monthly_chart(&self) -> Vec<MonthlyBar> {
        commands::reports::monthly_chart(&self.payments)
    }

    pub fn category_chart(&self, kind: PaymentKind) -> Vec<PieSlice> {
        commands::reports::category_chart(&self.payments, kind)
    }

    pub fn insights(&self, month: Month) -> Insights {
        commands::reports::insights(&self.payments, month)
    }
}
