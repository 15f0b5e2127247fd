use super::periods::{category_totals, monthly_totals, Month};
use crate::model::{Payment, PaymentKind};
use serde::Serialize;

/// Full-scale length of a monthly bar, in blocks.
pub const BAR_WIDTH: usize = 50;
/// Full-scale length of a category share, in blocks.
pub const PIE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBar {
    pub month: Month,
    pub income: f64,
    pub expense: f64,
    pub income_len: usize,
    pub expense_len: usize,
}

fn blocks(fraction: f64, width: usize) -> usize {
    (fraction * width as f64).round().max(0.0) as usize
}

/// One income and one expense bar per month, scaled against the largest
/// monthly value in `payments`.
///
/// The scale is the largest monthly total, not the largest single payment,
/// so the busiest month fills exactly [`BAR_WIDTH`] and no bar is longer.
/// It is recomputed from the records on every call.
pub fn monthly_bars(payments: &[Payment]) -> Vec<MonthlyBar> {
    let months = monthly_totals(payments);
    let max = months
        .values()
        .flat_map(|t| [t.income, t.expense])
        .fold(1.0_f64, f64::max);

    months
        .into_iter()
        .map(|(month, totals)| MonthlyBar {
            month,
            income: totals.income,
            expense: totals.expense,
            income_len: blocks(totals.income / max, BAR_WIDTH),
            expense_len: blocks(totals.expense / max, BAR_WIDTH),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub category: String,
    pub total: f64,
    /// Percent of all payments of the same kind.
    pub share: f64,
    pub blocks: usize,
}

/// Each category's share of the `kind` total, sorted by category name.
pub fn category_shares(payments: &[Payment], kind: PaymentKind) -> Vec<PieSlice> {
    let totals: Vec<_> = category_totals(payments)
        .into_iter()
        .filter(|t| t.kind == kind)
        .collect();
    let kind_total: f64 = totals.iter().map(|t| t.total).sum();
    if kind_total <= 0.0 {
        return Vec::new();
    }

    totals
        .into_iter()
        .map(|t| {
            let share = t.total / kind_total * 100.0;
            PieSlice {
                category: t.category,
                total: t.total,
                share,
                blocks: blocks(share / 100.0, PIE_WIDTH),
            }
        })
        .collect()
}
