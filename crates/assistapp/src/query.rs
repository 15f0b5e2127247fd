//! Record filtering.
//!
//! Records expose named fields through [`Queryable`]; a [`Query`] is a list of
//! [`Predicate`]s over those fields, combined with AND. The builder methods
//! take optional inputs and silently skip the unset ones, so a command can
//! hand every CLI flag straight through.
//!
//! What an empty query returns is decided by its [`EmptyPolicy`]: range/filter
//! queries ([`Query::filter`]) return everything, keyword searches
//! ([`Query::search`]) return nothing.

use crate::index::DisplayRecord;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

/// A field value as seen by the query engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<String>),
}

impl FieldValue {
    fn compare(&self, bound: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, bound) {
            (Number(a), Number(b)) => a.partial_cmp(b),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            // A date bound on a timestamp covers the whole day.
            (DateTime(a), Date(b)) => Some(a.date().cmp(b)),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A record whose fields can be filtered on by name.
pub trait Queryable {
    /// The value of a named field. `None` when the field is absent on this
    /// record or unknown to the type.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Inclusive on both ends; a missing end is open.
    Range {
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    },
    /// Text equality.
    Exact(String),
    /// Case-insensitive substring. The needle is stored lowercased.
    Contains(String),
    /// A list field sharing at least one value.
    AnyOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: &'static str,
    pub op: FilterOp,
}

impl Predicate {
    /// A record missing the field never matches.
    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        let Some(value) = record.field(self.field) else {
            return false;
        };

        match &self.op {
            FilterOp::Range { min, max } => {
                let above = min.as_ref().map_or(true, |min| {
                    matches!(
                        value.compare(min),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                });
                let below = max.as_ref().map_or(true, |max| {
                    matches!(value.compare(max), Some(Ordering::Less | Ordering::Equal))
                });
                above && below
            }
            FilterOp::Exact(expected) => match value {
                FieldValue::Text(text) => text == *expected,
                _ => false,
            },
            FilterOp::Contains(needle) => match value {
                FieldValue::Text(text) => text.to_lowercase().contains(needle.as_str()),
                _ => false,
            },
            FilterOp::AnyOf(wanted) => match value {
                FieldValue::List(items) => wanted.iter().any(|w| items.contains(w)),
                _ => false,
            },
        }
    }
}

/// What a query with no predicates returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    MatchAll,
    MatchNone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    predicates: Vec<Predicate>,
    policy: EmptyPolicy,
}

fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Query {
    /// A range/filter query: with nothing set, everything matches.
    pub fn filter() -> Self {
        Self {
            predicates: Vec::new(),
            policy: EmptyPolicy::MatchAll,
        }
    }

    /// A keyword search: with nothing set, nothing matches.
    pub fn search() -> Self {
        Self {
            predicates: Vec::new(),
            policy: EmptyPolicy::MatchNone,
        }
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn range<V: Into<FieldValue>>(self, field: &'static str, min: Option<V>, max: Option<V>) -> Self {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.with(Predicate {
            field,
            op: FilterOp::Range {
                min: min.map(Into::into),
                max: max.map(Into::into),
            },
        })
    }

    pub fn exact(self, field: &'static str, value: Option<&str>) -> Self {
        match clean(value) {
            Some(value) => self.with(Predicate {
                field,
                op: FilterOp::Exact(value.to_string()),
            }),
            None => self,
        }
    }

    pub fn contains(self, field: &'static str, needle: Option<&str>) -> Self {
        match clean(needle) {
            Some(needle) => self.with(Predicate {
                field,
                op: FilterOp::Contains(needle.to_lowercase()),
            }),
            None => self,
        }
    }

    pub fn any_of(self, field: &'static str, values: &[String]) -> Self {
        let values: Vec<String> = values
            .iter()
            .filter_map(|v| clean(Some(v.as_str())))
            .map(str::to_string)
            .collect();
        if values.is_empty() {
            return self;
        }
        self.with(Predicate {
            field,
            op: FilterOp::AnyOf(values),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn policy(&self) -> EmptyPolicy {
        self.policy
    }

    /// True iff every predicate matches. Empty queries follow the policy.
    pub fn matches<T: Queryable>(&self, record: &T) -> bool {
        if self.predicates.is_empty() {
            return self.policy == EmptyPolicy::MatchAll;
        }
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Filters an indexed snapshot, keeping order and canonical positions.
    pub fn apply<T: Queryable>(&self, snapshot: Vec<DisplayRecord<T>>) -> Vec<DisplayRecord<T>> {
        snapshot
            .into_iter()
            .filter(|dr| self.matches(&dr.record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::index_records;

    #[derive(Debug, Clone)]
    struct Row {
        name: &'static str,
        score: Option<f64>,
        day: NaiveDate,
        tags: Vec<String>,
    }

    impl Queryable for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(self.name.into()),
                "score" => self.score.map(FieldValue::from),
                "day" => Some(self.day.into()),
                "tags" => Some(FieldValue::List(self.tags.clone())),
                _ => None,
            }
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "Alpha",
                score: Some(10.0),
                day: day(1),
                tags: vec!["work".into()],
            },
            Row {
                name: "beta",
                score: None,
                day: day(10),
                tags: vec![],
            },
            Row {
                name: "Gamma ray",
                score: Some(30.0),
                day: day(20),
                tags: vec!["home".into(), "work".into()],
            },
        ]
    }

    fn names(query: &Query) -> Vec<&'static str> {
        rows()
            .into_iter()
            .filter(|r| query.matches(r))
            .map(|r| r.name)
            .collect()
    }

    #[test]
    fn empty_filter_matches_all_and_empty_search_matches_none() {
        assert_eq!(names(&Query::filter()).len(), 3);
        assert!(names(&Query::search()).is_empty());
    }

    #[test]
    fn blank_inputs_add_no_predicate() {
        let query = Query::search()
            .contains("name", Some("   "))
            .contains("name", None)
            .exact("name", Some(""))
            .any_of("tags", &[" ".to_string()])
            .range::<f64>("score", None, None);
        assert!(query.is_empty());
        assert!(names(&query).is_empty());
    }

    #[test]
    fn range_is_inclusive() {
        let query = Query::filter().range("day", Some(day(1)), Some(day(10)));
        assert_eq!(names(&query), vec!["Alpha", "beta"]);

        let open_max = Query::filter().range("score", Some(10.0), None);
        assert_eq!(names(&open_max), vec!["Alpha", "Gamma ray"]);
    }

    #[test]
    fn range_excludes_records_missing_the_field() {
        let query = Query::filter().range("score", Some(0.0), Some(100.0));
        assert_eq!(names(&query), vec!["Alpha", "Gamma ray"]);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let query = Query::search().contains("name", Some("RAY"));
        assert_eq!(names(&query), vec!["Gamma ray"]);
    }

    #[test]
    fn exact_is_exact() {
        assert_eq!(names(&Query::filter().exact("name", Some("beta"))), vec!["beta"]);
        assert!(names(&Query::filter().exact("name", Some("Beta"))).is_empty());
    }

    #[test]
    fn any_of_matches_one_shared_tag() {
        let query = Query::filter().any_of("tags", &["home".to_string(), "gym".to_string()]);
        assert_eq!(names(&query), vec!["Gamma ray"]);
    }

    #[test]
    fn predicates_compose_with_and() {
        let query = Query::filter()
            .any_of("tags", &["work".to_string()])
            .range("score", Some(20.0), None);
        assert_eq!(names(&query), vec!["Gamma ray"]);
    }

    #[test]
    fn unknown_field_never_matches() {
        let query = Query::filter().exact("missing", Some("x"));
        assert!(names(&query).is_empty());
    }

    #[test]
    fn date_bound_on_timestamp_covers_whole_day() {
        let at = day(10).and_hms_opt(23, 59, 59).unwrap();
        let predicate = Predicate {
            field: "at",
            op: FilterOp::Range {
                min: None,
                max: Some(day(10).into()),
            },
        };
        struct Stamp(NaiveDateTime);
        impl Queryable for Stamp {
            fn field(&self, _: &str) -> Option<FieldValue> {
                Some(self.0.into())
            }
        }
        assert!(predicate.matches(&Stamp(at)));
        assert!(!predicate.matches(&Stamp(day(11).and_hms_opt(0, 0, 0).unwrap())));
    }

    #[test]
    fn apply_keeps_canonical_positions() {
        let query = Query::filter().contains("name", Some("gamma"));
        let result = query.apply(index_records(&rows()));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].position.get(), 3);
    }
}
