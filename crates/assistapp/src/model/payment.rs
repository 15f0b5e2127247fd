//! Ledger entries.
//!
//! Payments are the one keyed domain: each carries a stable `id` that never
//! changes and is never reused, so commands address payments by id rather than
//! by position.

use super::{normalize_opt, require_text};
use crate::codec::{encode_amount, encode_datetime, DecodeError, Dialect, FieldReader, LineCodec};
use crate::error::{AssistError, Result};
use crate::query::{FieldValue, Queryable};
use crate::store::{Patch, Record};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Income,
    Expense,
}

impl PaymentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentKind::Income => "income",
            PaymentKind::Expense => "expense",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(PaymentKind::Income),
            "expense" | "out" => Ok(PaymentKind::Expense),
            other => Err(format!(
                "unknown payment kind '{}' (expected income or expense)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: u64,
    pub amount: f64,
    pub kind: PaymentKind,
    pub at: NaiveDateTime,
    pub category: String,
    pub note: Option<String>,
    pub tags: Vec<String>,
}

/// Amounts are kept at cent precision, the precision of the file.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Trims tags and drops blank ones, keeping order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Payment {
    pub fn new(
        id: u64,
        amount: f64,
        kind: PaymentKind,
        at: NaiveDateTime,
        category: impl Into<String>,
        note: Option<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            amount: round_cents(amount),
            kind,
            at,
            category: category.into().trim().to_string(),
            note: normalize_opt(note),
            tags: normalize_tags(tags),
        }
    }

    /// Income counts positive, expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            PaymentKind::Income => self.amount,
            PaymentKind::Expense => -self.amount,
        }
    }
}

impl LineCodec for Payment {
    const DIALECT: Dialect = Dialect::new("\t", 7).with_min_fields(6);

    fn encode_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            encode_amount(self.amount),
            self.kind.to_string(),
            encode_datetime(self.at),
            self.category.clone(),
            self.note.clone().unwrap_or_default(),
            self.tags.join(","),
        ]
    }

    fn decode_fields(fields: &mut FieldReader) -> std::result::Result<Self, DecodeError> {
        Ok(Payment {
            id: fields.parse("id")?,
            amount: fields.parse("amount")?,
            kind: fields.parse("kind")?,
            at: fields.datetime("at")?,
            category: fields.text(),
            note: fields.opt_text(),
            tags: normalize_tags(fields.text().split(',')),
        })
    }
}

impl Record for Payment {
    fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AssistError::invalid(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        require_text("Category", &self.category)?;
        if let Some(tag) = self.tags.iter().find(|t| t.contains(',')) {
            return Err(AssistError::invalid(format!(
                "tag '{}' cannot contain a comma",
                tag
            )));
        }
        Ok(())
    }

    fn key(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl Queryable for Payment {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "amount" => Some(self.amount.into()),
            "kind" => Some(self.kind.as_str().into()),
            "at" => Some(self.at.into()),
            "category" => Some(self.category.as_str().into()),
            "note" => self.note.as_deref().map(FieldValue::from),
            "tags" => Some(FieldValue::List(self.tags.clone())),
            _ => None,
        }
    }
}

/// Partial edit. `id` is immutable and not part of the patch.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub amount: Option<f64>,
    pub kind: Option<PaymentKind>,
    pub at: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Patch<Payment> for PaymentPatch {
    fn apply(self, payment: &mut Payment) {
        if let Some(amount) = self.amount {
            payment.amount = round_cents(amount);
        }
        if let Some(kind) = self.kind {
            payment.kind = kind;
        }
        if let Some(at) = self.at {
            payment.at = at;
        }
        if let Some(category) = self.category {
            payment.category = category.trim().to_string();
        }
        if let Some(note) = self.note {
            payment.note = normalize_opt(Some(note));
        }
        if let Some(tags) = self.tags {
            payment.tags = normalize_tags(tags);
        }
    }

    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.kind.is_none()
            && self.at.is_none()
            && self.category.is_none()
            && self.note.is_none()
            && self.tags.is_none()
    }
}
