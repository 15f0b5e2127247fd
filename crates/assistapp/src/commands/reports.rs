//! Payment analytics over the current ledger.
//!
//! Every report is computed from the store's snapshot at call time.

use crate::analytics::{self, CategoryTotal, DateRange, Insights, Month, MonthlyBar, PeriodComparison, PieSlice};
use crate::model::{Payment, PaymentKind};
use crate::store::backend::LineBackend;
use crate::store::RecordStore;

pub fn compare_months<B: LineBackend>(
    store: &RecordStore<Payment, B>,
    month: Month,
) -> PeriodComparison<Month> {
    analytics::compare_months(store.records(), month)
}

pub fn compare_ranges<B: LineBackend>(
    store: &RecordStore<Payment, B>,
    baseline: DateRange,
    current: DateRange,
) -> PeriodComparison<DateRange> {
    analytics::compare_ranges(store.records(), baseline, current)
}

pub fn category_totals<B: LineBackend>(store: &RecordStore<Payment, B>) -> Vec<CategoryTotal> {
    analytics::category_totals(store.records())
}

pub fn monthly_chart<B: LineBackend>(store: &RecordStore<Payment, B>) -> Vec<MonthlyBar> {
    analytics::monthly_bars(store.records())
}

pub fn category_chart<B: LineBackend>(
    store: &RecordStore<Payment, B>,
    kind: PaymentKind,
) -> Vec<PieSlice> {
    analytics::category_shares(store.records(), kind)
}

pub fn insights<B: LineBackend>(store: &RecordStore<Payment, B>, month: Month) -> Insights {
    analytics::insights(store.records(), month)
}
