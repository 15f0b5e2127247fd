//! # Payment Analytics
//!
//! Pure functions over a slice of payments. Nothing here touches storage, so
//! every result reflects exactly the records passed in.
//!
//! - [`categorize`]: keyword table assigning a category from a payment's note
//! - [`periods`]: calendar months, date ranges, totals and period comparison
//! - [`charts`]: bar and share geometry for the terminal charts
//! - [`insights`]: top category, expense trend and saving suggestion

pub mod categorize;
pub mod charts;
pub mod insights;
pub mod periods;

pub use categorize::{Categorizer, CategoryRule, DEFAULT_RULES};
pub use charts::{category_shares, monthly_bars, MonthlyBar, PieSlice, BAR_WIDTH, PIE_WIDTH};
pub use insights::{insights, Insights, TopCategory};
pub use periods::{
    category_totals, compare_months, compare_ranges, monthly_totals, percent_change,
    CategoryTotal, Change, DateRange, Month, PeriodComparison, Totals, Trend,
};
