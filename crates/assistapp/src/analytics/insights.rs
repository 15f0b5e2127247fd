use super::periods::{category_totals, Change, Month};
use crate::model::{Payment, PaymentKind};
use serde::Serialize;

/// Share of the month's expenses above which a category earns a suggestion.
pub const DOMINANT_SHARE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategory {
    pub category: String,
    pub total: f64,
    /// Percent of the month's expenses.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub month: Month,
    pub expense: f64,
    pub previous_expense: f64,
    pub top_category: Option<TopCategory>,
    /// Expense change against the previous month.
    pub trend: Option<Change>,
    /// Set when the top category exceeds half of the month's expenses.
    pub suggestion: Option<TopCategory>,
}

pub fn insights(payments: &[Payment], month: Month) -> Insights {
    let previous_month = month.prev();
    let expenses_in = |m: Month| {
        payments
            .iter()
            .filter(move |p| p.kind == PaymentKind::Expense && m.contains(p.at.date()))
    };

    let expense: f64 = expenses_in(month).map(|p| p.amount).sum();
    let previous_expense: f64 = expenses_in(previous_month).map(|p| p.amount).sum();

    // Strictly greater, so the alphabetically first category wins a tie.
    let top_category = category_totals(expenses_in(month))
        .into_iter()
        .fold(None::<TopCategory>, |best, t| match best {
            Some(b) if b.total >= t.total => Some(b),
            _ => Some(TopCategory {
                share: if expense > 0.0 { t.total / expense * 100.0 } else { 0.0 },
                category: t.category,
                total: t.total,
            }),
        });

    let suggestion = top_category
        .as_ref()
        .filter(|top| top.share > DOMINANT_SHARE)
        .cloned();

    Insights {
        month,
        expense,
        previous_expense,
        trend: Change::between(previous_expense, expense),
        top_category,
        suggestion,
    }
}
