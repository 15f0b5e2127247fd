//! Terminal styles.
//!
//! Renderers refer to styles by what the text *is* (an index, a timestamp,
//! an expense) and never pick colors themselves. `console` drops the escape
//! codes when stdout is not a terminal or `NO_COLOR` is set, so piped output
//! and tests see plain text.

use assistapp::commands::MessageLevel;
use assistapp::model::PaymentKind;
use console::Style;
use once_cell::sync::Lazy;

pub static INDEX: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().color256(246));
pub static TIME: Lazy<Style> = Lazy::new(|| Style::new().color256(246).italic());
pub static DONE: Lazy<Style> = Lazy::new(|| Style::new().color256(246).strikethrough());
pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());

pub static INCOME: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static EXPENSE: Lazy<Style> = Lazy::new(|| Style::new().red());

pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red().bold());

pub fn message(level: MessageLevel) -> &'static Style {
    match level {
        MessageLevel::Info => &MUTED,
        MessageLevel::Success => &SUCCESS,
        MessageLevel::Warning => &WARNING,
        MessageLevel::Error => &ERROR,
    }
}

pub fn kind(kind: PaymentKind) -> &'static Style {
    match kind {
        PaymentKind::Income => &INCOME,
        PaymentKind::Expense => &EXPENSE,
    }
}
