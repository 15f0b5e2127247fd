//! Daily health measurements.
//!
//! Every vital is optional; a record only needs a date. Ranges are checked on
//! add and on edit. An implausible height/weight combination (BMI outside
//! 10–60) is reported as a warning and still stored.

use super::{normalize_opt, today};
use crate::codec::{encode_date, encode_opt, DecodeError, Dialect, FieldReader, LineCodec};
use crate::error::{AssistError, Result};
use crate::query::{FieldValue, Queryable};
use crate::store::{Patch, Record};
use chrono::NaiveDate;
use serde::Serialize;

pub const BMI_RANGE: (f64, f64) = (10.0, 60.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthRecord {
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub heart_rate: Option<u32>,
    pub bp_high: Option<u32>,
    pub bp_low: Option<u32>,
    pub sleep_hours: Option<u32>,
    pub steps: Option<u32>,
    pub notes: Option<String>,
}

impl HealthRecord {
    /// An empty record for `date`, today when not given.
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date: date.unwrap_or_else(today),
            weight: None,
            height: None,
            heart_rate: None,
            bp_high: None,
            bp_low: None,
            sleep_hours: None,
            steps: None,
            notes: None,
        }
    }

    pub fn bmi(&self) -> Option<f64> {
        match (self.weight, self.height) {
            (Some(w), Some(h)) if h > 0.0 => {
                let m = h / 100.0;
                Some(w / (m * m))
            }
            _ => None,
        }
    }

    /// A warning when weight and height together look implausible.
    pub fn bmi_warning(&self) -> Option<String> {
        let bmi = self.bmi()?;
        let (low, high) = BMI_RANGE;
        (bmi < low || bmi > high).then(|| {
            format!(
                "Height and weight look inconsistent (BMI {:.1}, expected {}-{})",
                bmi, low, high
            )
        })
    }
}

fn check_range<T>(label: &str, value: Option<T>, ok: impl Fn(T) -> bool, expected: &str) -> Result<()>
where
    T: Copy + std::fmt::Display,
{
    match value {
        Some(v) if !ok(v) => Err(AssistError::invalid(format!(
            "{} {} is out of range ({})",
            label, v, expected
        ))),
        _ => Ok(()),
    }
}

impl LineCodec for HealthRecord {
    const DIALECT: Dialect = Dialect::new(" | ", 9).with_min_fields(8);

    fn encode_fields(&self) -> Vec<String> {
        vec![
            encode_date(self.date),
            encode_opt(self.weight),
            encode_opt(self.height),
            encode_opt(self.heart_rate),
            encode_opt(self.bp_high),
            encode_opt(self.bp_low),
            encode_opt(self.sleep_hours),
            encode_opt(self.steps),
            self.notes.clone().unwrap_or_default(),
        ]
    }

    fn decode_fields(fields: &mut FieldReader) -> std::result::Result<Self, DecodeError> {
        Ok(HealthRecord {
            date: fields.date("date")?,
            weight: fields.parse_opt("weight")?,
            height: fields.parse_opt("height")?,
            heart_rate: fields.parse_opt("heart_rate")?,
            bp_high: fields.parse_opt("bp_high")?,
            bp_low: fields.parse_opt("bp_low")?,
            sleep_hours: fields.parse_opt("sleep_hours")?,
            steps: fields.parse_opt("steps")?,
            notes: fields.opt_text(),
        })
    }
}

impl Record for HealthRecord {
    fn validate(&self) -> Result<()> {
        if self.date > today() {
            return Err(AssistError::invalid(format!(
                "date {} is in the future",
                encode_date(self.date)
            )));
        }
        check_range("Weight", self.weight, |w| w > 0.0 && w <= 300.0, "0-300 kg")?;
        check_range("Height", self.height, |h| h > 0.0 && h <= 300.0, "0-300 cm")?;
        check_range("Heart rate", self.heart_rate, |hr| hr > 0 && hr <= 250, "1-250 bpm")?;
        check_range("Systolic pressure", self.bp_high, |bp| (30..=300).contains(&bp), "30-300 mmHg")?;
        check_range("Diastolic pressure", self.bp_low, |bp| (20..=200).contains(&bp), "20-200 mmHg")?;
        if let (Some(high), Some(low)) = (self.bp_high, self.bp_low) {
            if high <= low {
                return Err(AssistError::invalid(format!(
                    "systolic pressure ({}) must be higher than diastolic ({})",
                    high, low
                )));
            }
        }
        check_range("Sleep", self.sleep_hours, |s| s <= 24, "0-24 h")?;
        check_range("Steps", self.steps, |s| s <= 100_000, "0-100000")?;
        Ok(())
    }
}

impl Queryable for HealthRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "date" => Some(self.date.into()),
            "weight" => self.weight.map(FieldValue::from),
            "height" => self.height.map(FieldValue::from),
            "heart_rate" => self.heart_rate.map(FieldValue::from),
            "bp_high" => self.bp_high.map(FieldValue::from),
            "bp_low" => self.bp_low.map(FieldValue::from),
            "sleep_hours" => self.sleep_hours.map(FieldValue::from),
            "steps" => self.steps.map(FieldValue::from),
            "notes" => self.notes.as_deref().map(FieldValue::from),
            _ => None,
        }
    }
}

/// Partial edit. Unset fields keep their value; a vital cannot be cleared.
#[derive(Debug, Clone, Default)]
pub struct HealthPatch {
    pub date: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub heart_rate: Option<u32>,
    pub bp_high: Option<u32>,
    pub bp_low: Option<u32>,
    pub sleep_hours: Option<u32>,
    pub steps: Option<u32>,
    pub notes: Option<String>,
}

impl HealthPatch {
    /// Fills a new record; used by `add` so both paths share one input shape.
    pub fn into_record(self) -> HealthRecord {
        let mut record = HealthRecord::new(self.date);
        self.apply(&mut record);
        record
    }
}

impl Patch<HealthRecord> for HealthPatch {
    fn apply(self, record: &mut HealthRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        record.weight = self.weight.or(record.weight);
        record.height = self.height.or(record.height);
        record.heart_rate = self.heart_rate.or(record.heart_rate);
        record.bp_high = self.bp_high.or(record.bp_high);
        record.bp_low = self.bp_low.or(record.bp_low);
        record.sleep_hours = self.sleep_hours.or(record.sleep_hours);
        record.steps = self.steps.or(record.steps);
        if let Some(notes) = self.notes {
            record.notes = normalize_opt(Some(notes));
        }
    }

    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.weight.is_none()
            && self.height.is_none()
            && self.heart_rate.is_none()
            && self.bp_high.is_none()
            && self.bp_low.is_none()
            && self.sleep_hours.is_none()
            && self.steps.is_none()
            && self.notes.is_none()
    }
}

/// Averages over the records that carry each value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HealthStats {
    pub records: usize,
    pub weight: Option<f64>,
    pub heart_rate: Option<f64>,
    pub bp_high: Option<f64>,
    pub bp_low: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub steps: Option<f64>,
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

impl HealthStats {
    pub fn compute(records: &[HealthRecord]) -> Self {
        let avg_u32 = |get: fn(&HealthRecord) -> Option<u32>| {
            average(records.iter().filter_map(get).map(f64::from))
        };
        HealthStats {
            records: records.len(),
            weight: average(records.iter().filter_map(|r| r.weight)),
            heart_rate: avg_u32(|r| r.heart_rate),
            bp_high: avg_u32(|r| r.bp_high),
            bp_low: avg_u32(|r| r.bp_low),
            sleep_hours: avg_u32(|r| r.sleep_hours),
            steps: avg_u32(|r| r.steps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record() -> HealthRecord {
        HealthRecord::new(Some(date(2024, 3, 5)))
    }

    #[test]
    fn encodes_absent_values_as_empty_fields() {
        let mut r = record();
        r.weight = Some(70.5);
        r.steps = Some(8000);
        assert_eq!(r.encode(), "2024-03-05 | 70.5 |  |  |  |  |  | 8000 | ");
    }

    #[test]
    fn round_trips_notes_with_delimiters() {
        let mut r = record();
        r.heart_rate = Some(64);
        r.notes = Some("felt ok | ran 5k\nslept late".to_string());
        assert_eq!(HealthRecord::decode(&r.encode()).unwrap(), r);
    }

    #[test]
    fn accepts_lines_without_notes_field() {
        let r = HealthRecord::decode("2024-03-05 | 70 | 175 | 60 | 120 | 80 | 7 | 9000").unwrap();
        assert_eq!(r.weight, Some(70.0));
        assert_eq!(r.steps, Some(9000));
        assert_eq!(r.notes, None);
    }

    #[test]
    fn empty_field_is_absent_not_zero() {
        let r = HealthRecord::decode("2024-03-05 |  |  |  |  |  |  |  | ").unwrap();
        assert_eq!(r.weight, None);
        assert_eq!(r.heart_rate, None);
    }

    #[test]
    fn rejects_out_of_range_vitals() {
        let cases: Vec<fn(&mut HealthRecord)> = vec![
            |r| r.weight = Some(0.0),
            |r| r.weight = Some(300.5),
            |r| r.height = Some(-1.0),
            |r| r.heart_rate = Some(0),
            |r| r.heart_rate = Some(251),
            |r| r.bp_high = Some(29),
            |r| r.bp_low = Some(201),
            |r| r.sleep_hours = Some(25),
            |r| r.steps = Some(100_001),
        ];
        for set in cases {
            let mut r = record();
            set(&mut r);
            assert!(r.validate().is_err(), "{:?} should be rejected", r);
        }
    }

    #[test]
    fn systolic_must_exceed_diastolic() {
        let mut r = record();
        r.bp_high = Some(80);
        r.bp_low = Some(120);
        assert!(r.validate().is_err());

        r.bp_high = Some(120);
        r.bp_low = Some(80);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn future_dates_are_rejected() {
        let r = HealthRecord::new(Some(today() + chrono::Duration::days(1)));
        assert!(r.validate().is_err());
        assert!(HealthRecord::new(None).validate().is_ok());
    }

    #[test]
    fn implausible_bmi_warns_but_validates() {
        let mut r = record();
        r.weight = Some(250.0);
        r.height = Some(120.0);
        assert!(r.validate().is_ok());
        assert!(r.bmi_warning().is_some());

        r.height = Some(180.0);
        r.weight = Some(75.0);
        assert!(r.bmi_warning().is_none());
    }

    #[test]
    fn patch_keeps_unset_fields() {
        let mut r = record();
        r.weight = Some(70.0);
        r.heart_rate = Some(60);
        HealthPatch {
            heart_rate: Some(72),
            ..Default::default()
        }
        .apply(&mut r);
        assert_eq!(r.weight, Some(70.0));
        assert_eq!(r.heart_rate, Some(72));
    }

    #[test]
    fn stats_average_only_present_values() {
        let mut a = record();
        a.weight = Some(70.0);
        a.steps = Some(1000);
        let mut b = record();
        b.weight = Some(80.0);
        let stats = HealthStats::compute(&[a, b]);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.weight, Some(75.0));
        assert_eq!(stats.steps, Some(1000.0));
        assert_eq!(stats.heart_rate, None);
    }
}
