//! # Rendering
//!
//! Plain functions from library results to display strings. Nothing here
//! prints; [`super::commands`] decides where the text goes.
//!
//! Every list row starts with the record's canonical position (or payment id),
//! the number the user feeds back into `show`, `edit` and `delete`.
//!
//! Column alignment uses display width (`unicode-width`), so CJK text and
//! emoji in categories or titles keep the columns straight.

use super::styles;
use assistapp::analytics::{
    CategoryTotal, Change, Insights, MonthlyBar, PeriodComparison, PieSlice, Totals, Trend,
};
use assistapp::codec::{encode_amount, DATETIME_FORMAT, DATE_FORMAT};
use assistapp::commands::CmdMessage;
use assistapp::index::DisplayRecord;
use assistapp::model::{now, HealthRecord, HealthStats, LifeRecord, Payment, PaymentKind, Task};
use chrono::NaiveDateTime;
use std::fmt::Write;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 48;
const CATEGORY_WIDTH: usize = 14;

/// Pads `s` with spaces up to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > limit {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}

/// First line only, so multi-line text keeps a list to one row per record.
fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

fn index(n: impl std::fmt::Display) -> String {
    styles::INDEX.apply_to(format!("{:>3}.", n)).to_string()
}

pub fn time_ago(at: NaiveDateTime) -> String {
    let elapsed = now().signed_duration_since(at);
    timeago::Formatter::new().convert(elapsed.to_std().unwrap_or_default())
}

fn money(amount: f64) -> String {
    encode_amount(amount)
}

fn signed(kind: PaymentKind, amount: f64) -> String {
    let sign = match kind {
        PaymentKind::Income => '+',
        PaymentKind::Expense => '-',
    };
    format!("{}{}", sign, money(amount))
}

pub fn messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let _ = writeln!(
            out,
            "{}",
            styles::message(message.level).apply_to(&message.content)
        );
    }
    out
}

// --- tasks ---

pub fn tasks(rows: &[DisplayRecord<Task>]) -> String {
    let mut out = String::new();
    for row in rows {
        let task = &row.record;
        let check = if task.completed { "[x]" } else { "[ ]" };
        let content = truncate_to_width(first_line(&task.content), TITLE_WIDTH);
        let content = if task.completed {
            styles::DONE.apply_to(pad(&content, TITLE_WIDTH)).to_string()
        } else {
            pad(&content, TITLE_WIDTH)
        };
        let _ = writeln!(
            out,
            "{} {} {:<3} {} {}",
            index(row.position),
            check,
            "!".repeat(task.priority as usize),
            content,
            styles::TIME.apply_to(time_ago(task.created_at))
        );
    }
    out
}

// --- health ---

fn vitals(record: &HealthRecord) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(w) = record.weight {
        parts.push(format!("{} kg", w));
    }
    if let Some(h) = record.height {
        parts.push(format!("{} cm", h));
    }
    if let Some(bmi) = record.bmi() {
        parts.push(format!("BMI {:.1}", bmi));
    }
    if let Some(hr) = record.heart_rate {
        parts.push(format!("{} bpm", hr));
    }
    match (record.bp_high, record.bp_low) {
        (Some(high), Some(low)) => parts.push(format!("{}/{} mmHg", high, low)),
        (Some(high), None) => parts.push(format!("{}/- mmHg", high)),
        (None, Some(low)) => parts.push(format!("-/{} mmHg", low)),
        (None, None) => {}
    }
    if let Some(s) = record.sleep_hours {
        parts.push(format!("{} h sleep", s));
    }
    if let Some(s) = record.steps {
        parts.push(format!("{} steps", s));
    }
    parts
}

pub fn health(rows: &[DisplayRecord<HealthRecord>]) -> String {
    let mut out = String::new();
    for row in rows {
        let record = &row.record;
        let _ = writeln!(
            out,
            "{} {}  {}",
            index(row.position),
            record.date.format(DATE_FORMAT),
            vitals(record).join(", ")
        );
    }
    out
}

pub fn health_full(rows: &[DisplayRecord<HealthRecord>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let record = &row.record;
        let _ = writeln!(
            out,
            "{} {}",
            index(row.position),
            styles::TITLE.apply_to(record.date.format(DATE_FORMAT))
        );
        for part in vitals(record) {
            let _ = writeln!(out, "     {}", part);
        }
        if let Some(notes) = &record.notes {
            let _ = writeln!(out, "     {}", styles::MUTED.apply_to(notes));
        }
    }
    out
}

pub fn health_stats(stats: &HealthStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", styles::HEADER.apply_to("Health averages"));
    let _ = writeln!(out, "  records      {}", stats.records);
    let rows = [
        ("weight", stats.weight, "kg"),
        ("heart rate", stats.heart_rate, "bpm"),
        ("bp high", stats.bp_high, "mmHg"),
        ("bp low", stats.bp_low, "mmHg"),
        ("sleep", stats.sleep_hours, "h"),
        ("steps", stats.steps, ""),
    ];
    for (label, value, unit) in rows {
        let value = match value {
            Some(v) => format!("{:.1} {}", v, unit).trim_end().to_string(),
            None => "-".to_string(),
        };
        let _ = writeln!(out, "  {} {}", pad(label, 12), value);
    }
    out
}

// --- life log ---

fn life_tags(record: &LifeRecord) -> String {
    let mut tags = String::new();
    if let Some(category) = &record.category {
        let _ = write!(tags, "[{}] ", category);
    }
    if let Some(mood) = &record.mood {
        let _ = write!(tags, "({}) ", mood);
    }
    tags
}

pub fn life(rows: &[DisplayRecord<LifeRecord>]) -> String {
    let mut out = String::new();
    for row in rows {
        let record = &row.record;
        let _ = writeln!(
            out,
            "{} {} {}{}",
            index(row.position),
            styles::TIME.apply_to(record.timestamp.format("%Y-%m-%d %H:%M")),
            styles::MUTED.apply_to(life_tags(record)),
            truncate_to_width(first_line(&record.title), TITLE_WIDTH)
        );
    }
    out
}

pub fn life_full(rows: &[DisplayRecord<LifeRecord>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push_str("\n================================\n\n");
        }
        let record = &row.record;
        let _ = writeln!(
            out,
            "{} {}",
            index(row.position),
            styles::TITLE.apply_to(&record.title)
        );
        let _ = writeln!(
            out,
            "     {} {}",
            styles::TIME.apply_to(record.timestamp.format(DATETIME_FORMAT)),
            styles::MUTED.apply_to(life_tags(record).trim_end())
        );
        if let Some(content) = &record.content {
            out.push_str("--------------------------------\n");
            let _ = writeln!(out, "{}", content);
        }
    }
    out
}

pub fn vocabulary(words: &[&str]) -> String {
    words.iter().map(|w| format!("{}\n", w)).collect()
}

// --- payments ---

pub fn payments(rows: &[DisplayRecord<Payment>]) -> String {
    let mut out = String::new();
    for row in rows {
        let payment = &row.record;
        let amount = format!("{:>10}", signed(payment.kind, payment.amount));
        let mut line = format!(
            "{} {}  {}  {}",
            index(payment.id),
            styles::TIME.apply_to(payment.at.format("%Y-%m-%d %H:%M")),
            styles::kind(payment.kind).apply_to(amount),
            pad(&truncate_to_width(&payment.category, CATEGORY_WIDTH), CATEGORY_WIDTH)
        );
        if let Some(note) = &payment.note {
            let _ = write!(line, " {}", truncate_to_width(first_line(note), TITLE_WIDTH));
        }
        if !payment.tags.is_empty() {
            let _ = write!(
                line,
                " {}",
                styles::MUTED.apply_to(format!("#{}", payment.tags.join(" #")))
            );
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn change(change: Option<Change>) -> String {
    match change {
        None => "n/a".to_string(),
        Some(c) => {
            let label = match c.trend {
                Trend::Increase => styles::WARNING.apply_to("increase").to_string(),
                Trend::Decrease => styles::SUCCESS.apply_to("decrease").to_string(),
                Trend::Steady => "steady".to_string(),
            };
            format!("{:+.1}% {}", c.percent, label)
        }
    }
}

fn totals_row(label: &str, totals: &Totals) -> String {
    format!(
        "  {} {:>12} {:>12} {:>12}\n",
        pad(label, 24),
        money(totals.income),
        money(totals.expense),
        money(totals.net)
    )
}

pub fn comparison<P>(
    result: &PeriodComparison<P>,
    label: impl Fn(&P) -> String,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {:>12} {:>12} {:>12}",
        pad("", 24),
        "income",
        "expense",
        "net"
    );
    out.push_str(&totals_row(&label(&result.previous_period), &result.previous));
    out.push_str(&totals_row(&label(&result.current_period), &result.current));
    out.push_str(&totals_row("change", &result.delta));
    let _ = writeln!(out);
    let _ = writeln!(out, "  income  {}", change(result.income_change));
    let _ = writeln!(out, "  expense {}", change(result.expense_change));
    out
}

pub fn category_totals(totals: &[CategoryTotal]) -> String {
    let mut out = String::new();
    for total in totals {
        let _ = writeln!(
            out,
            "  {} {} {:>12}",
            pad(&total.category, CATEGORY_WIDTH),
            pad(total.kind.as_str(), 8),
            styles::kind(total.kind).apply_to(money(total.total))
        );
    }
    out
}

pub fn monthly_chart(bars: &[MonthlyBar]) -> String {
    let mut out = String::new();
    for bar in bars {
        let _ = writeln!(
            out,
            "{} income  {} {}",
            bar.month,
            styles::INCOME.apply_to("█".repeat(bar.income_len)),
            money(bar.income)
        );
        let _ = writeln!(
            out,
            "        expense {} {}",
            styles::EXPENSE.apply_to("█".repeat(bar.expense_len)),
            money(bar.expense)
        );
    }
    out
}

pub fn category_chart(slices: &[PieSlice]) -> String {
    let width = slices
        .iter()
        .map(|s| s.category.width())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for slice in slices {
        let _ = writeln!(
            out,
            "{} {} {:5.1}% ({})",
            pad(&slice.category, width),
            "█".repeat(slice.blocks),
            slice.share,
            money(slice.total)
        );
    }
    out
}

pub fn insights(insights: &Insights) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        styles::HEADER.apply_to(format!("Spending in {}", insights.month))
    );
    let _ = writeln!(
        out,
        "  expenses {} (previous month {})",
        money(insights.expense),
        money(insights.previous_expense)
    );
    match &insights.top_category {
        Some(top) => {
            let _ = writeln!(
                out,
                "  top category: {} ({}, {:.1}%)",
                top.category,
                money(top.total),
                top.share
            );
        }
        None => {
            let _ = writeln!(out, "  no expenses this month");
        }
    }
    if let Some(trend) = insights.trend {
        let line = match trend.trend {
            Trend::Increase => styles::WARNING
                .apply_to(format!(
                    "  Spending is up {:.1}% on last month. Keep an eye on it.",
                    trend.percent
                ))
                .to_string(),
            Trend::Decrease => styles::SUCCESS
                .apply_to(format!(
                    "  Spending is down {:.1}% on last month. Keep it up.",
                    -trend.percent
                ))
                .to_string(),
            Trend::Steady => format!("  Spending changed {:+.1}% on last month.", trend.percent),
        };
        let _ = writeln!(out, "{}", line);
    }
    if let Some(suggestion) = &insights.suggestion {
        let _ = writeln!(
            out,
            "  {} makes up {:.1}% of this month's spending; consider cutting back.",
            suggestion.category, suggestion.share
        );
    }
    out
}
