use crate::error::AssistError;
use crate::model::{Payment, PaymentKind};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Percentage beyond which a change is flagged.
pub const TREND_THRESHOLD: f64 = 30.0;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Month::of(date) == self
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = AssistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AssistError::Api(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for Month {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An inclusive span of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AssistError> {
        if start > end {
            return Err(AssistError::Api(format!(
                "Range starts after it ends ({} > {})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Income and expense sums with their difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

impl Totals {
    pub fn add(&mut self, payment: &Payment) {
        match payment.kind {
            PaymentKind::Income => self.income += payment.amount,
            PaymentKind::Expense => self.expense += payment.amount,
        }
        self.net = self.income - self.expense;
    }

    pub fn get(&self, kind: PaymentKind) -> f64 {
        match kind {
            PaymentKind::Income => self.income,
            PaymentKind::Expense => self.expense,
        }
    }

    /// Sums every payment accepted by `include`.
    pub fn collect<'a>(
        payments: impl IntoIterator<Item = &'a Payment>,
        include: impl Fn(&Payment) -> bool,
    ) -> Self {
        let mut totals = Totals::default();
        for payment in payments.into_iter().filter(|p| include(*p)) {
            totals.add(payment);
        }
        totals
    }

    /// `self - previous`, field by field.
    pub fn delta(&self, previous: &Totals) -> Totals {
        Totals {
            income: self.income - previous.income,
            expense: self.expense - previous.expense,
            net: self.net - previous.net,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
    Steady,
}

impl Trend {
    pub fn classify(percent: f64) -> Self {
        if percent > TREND_THRESHOLD {
            Trend::Increase
        } else if percent < -TREND_THRESHOLD {
            Trend::Decrease
        } else {
            Trend::Steady
        }
    }
}

/// `None` when there is nothing to compare against.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    (previous != 0.0).then(|| (current - previous) / previous * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Change {
    pub percent: f64,
    pub trend: Trend,
}

impl Change {
    pub fn between(previous: f64, current: f64) -> Option<Self> {
        percent_change(previous, current).map(|percent| Change {
            percent,
            trend: Trend::classify(percent),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison<P> {
    pub previous_period: P,
    pub current_period: P,
    pub previous: Totals,
    pub current: Totals,
    /// current − previous
    pub delta: Totals,
    pub income_change: Option<Change>,
    pub expense_change: Option<Change>,
}

impl<P> PeriodComparison<P> {
    fn new(previous_period: P, current_period: P, previous: Totals, current: Totals) -> Self {
        Self {
            previous_period,
            current_period,
            delta: current.delta(&previous),
            income_change: Change::between(previous.income, current.income),
            expense_change: Change::between(previous.expense, current.expense),
            previous,
            current,
        }
    }
}

/// Compares `month` with the month before it.
pub fn compare_months(payments: &[Payment], month: Month) -> PeriodComparison<Month> {
    let previous_month = month.prev();
    let previous = Totals::collect(payments, |p| previous_month.contains(p.at.date()));
    let current = Totals::collect(payments, |p| month.contains(p.at.date()));
    PeriodComparison::new(previous_month, month, previous, current)
}

/// Compares two inclusive ranges.
///
/// Overlapping ranges are allowed. A payment inside both ranges counts in
/// both totals; it is not claimed by the baseline alone.
pub fn compare_ranges(
    payments: &[Payment],
    baseline: DateRange,
    current: DateRange,
) -> PeriodComparison<DateRange> {
    let previous_totals = Totals::collect(payments, |p| baseline.contains(p.at.date()));
    let current_totals = Totals::collect(payments, |p| current.contains(p.at.date()));
    PeriodComparison::new(baseline, current, previous_totals, current_totals)
}

/// Income and expense per month, oldest first. Months without payments are
/// left out.
pub fn monthly_totals(payments: &[Payment]) -> BTreeMap<Month, Totals> {
    let mut months: BTreeMap<Month, Totals> = BTreeMap::new();
    for payment in payments {
        months
            .entry(Month::of(payment.at.date()))
            .or_default()
            .add(payment);
    }
    months
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub kind: PaymentKind,
    pub total: f64,
}

/// Sums per (category, kind), sorted by category then kind. An income and an
/// expense category of the same name stay separate.
pub fn category_totals<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<(String, PaymentKind), f64> = BTreeMap::new();
    for payment in payments {
        *groups
            .entry((payment.category.clone(), payment.kind))
            .or_insert(0.0) += payment.amount;
    }
    groups
        .into_iter()
        .map(|((category, kind), total)| CategoryTotal {
            category,
            kind,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::pay;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_parsing_and_prev() {
        let m: Month = "2024-01".parse().unwrap();
        assert_eq!(m, month(2024, 1));
        assert_eq!(m.prev(), month(2023, 12));
        assert_eq!(month(2024, 7).prev().to_string(), "2024-06");
        assert!("2024-13".parse::<Month>().is_err());
        assert!("May".parse::<Month>().is_err());
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        assert!(DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        let r = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert!(r.contains(date(2024, 1, 31)));
        assert!(!r.contains(date(2024, 2, 1)));
    }

    #[test]
    fn expense_dropping_to_zero_is_a_full_decrease() {
        let payments = vec![pay(1, 100.0, PaymentKind::Expense, "Dining", (2024, 4, 10))];
        let cmp = compare_months(&payments, month(2024, 5));

        assert_eq!(cmp.previous.expense, 100.0);
        assert_eq!(cmp.current.expense, 0.0);
        assert_eq!(cmp.delta.expense, -100.0);
        let change = cmp.expense_change.unwrap();
        assert_eq!(change.percent, -100.0);
        assert_eq!(change.trend, Trend::Decrease);
    }

    #[test]
    fn no_previous_means_no_change() {
        let payments = vec![pay(1, 50.0, PaymentKind::Income, "Salary", (2024, 5, 1))];
        let cmp = compare_months(&payments, month(2024, 5));
        assert_eq!(cmp.income_change, None);
        assert_eq!(cmp.delta.income, 50.0);
        assert_eq!(cmp.delta.net, 50.0);
    }

    #[test]
    fn months_compare_across_year_boundary() {
        let payments = vec![
            pay(1, 100.0, PaymentKind::Expense, "Rent", (2023, 12, 31)),
            pay(2, 140.0, PaymentKind::Expense, "Rent", (2024, 1, 1)),
        ];
        let cmp = compare_months(&payments, month(2024, 1));
        assert_eq!(cmp.previous_period, month(2023, 12));
        let change = cmp.expense_change.unwrap();
        assert!((change.percent - 40.0).abs() < 1e-9);
        assert_eq!(change.trend, Trend::Increase);
    }

    #[test]
    fn overlapping_ranges_count_a_payment_in_both() {
        let payments = vec![pay(1, 10.0, PaymentKind::Income, "Salary", (2024, 3, 15))];
        let first = DateRange::new(date(2024, 3, 1), date(2024, 3, 20)).unwrap();
        let second = DateRange::new(date(2024, 3, 10), date(2024, 3, 31)).unwrap();
        let cmp = compare_ranges(&payments, first, second);
        assert_eq!(cmp.previous.income, 10.0);
        assert_eq!(cmp.current.income, 10.0);
        assert_eq!(cmp.delta.income, 0.0);
    }

    #[test]
    fn trend_thresholds_are_exclusive() {
        assert_eq!(Trend::classify(30.0), Trend::Steady);
        assert_eq!(Trend::classify(30.1), Trend::Increase);
        assert_eq!(Trend::classify(-30.0), Trend::Steady);
        assert_eq!(Trend::classify(-30.1), Trend::Decrease);
        assert_eq!(percent_change(0.0, 10.0), None);
    }

    #[test]
    fn category_totals_keep_kinds_apart() {
        let payments = vec![
            pay(1, 10.0, PaymentKind::Expense, "Gift", (2024, 1, 1)),
            pay(2, 30.0, PaymentKind::Income, "Gift", (2024, 1, 2)),
            pay(3, 5.0, PaymentKind::Expense, "Gift", (2024, 1, 3)),
            pay(4, 1.0, PaymentKind::Expense, "Bus", (2024, 1, 3)),
        ];
        let totals = category_totals(&payments);
        let flat: Vec<_> = totals
            .iter()
            .map(|t| (t.category.as_str(), t.kind, t.total))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("Bus", PaymentKind::Expense, 1.0),
                ("Gift", PaymentKind::Income, 30.0),
                ("Gift", PaymentKind::Expense, 15.0),
            ]
        );
    }

    #[test]
    fn monthly_totals_are_chronological() {
        let payments = vec![
            pay(1, 10.0, PaymentKind::Expense, "x", (2024, 3, 1)),
            pay(2, 20.0, PaymentKind::Income, "y", (2024, 1, 1)),
        ];
        let months: Vec<_> = monthly_totals(&payments).into_keys().collect();
        assert_eq!(months, vec![month(2024, 1), month(2024, 3)]);
    }
}
