//! Field-level validation for client-supplied values.
//!
//! Dates are naive (no time zone). Medication start dates use `YYYY-MM-DD`,
//! intake timestamps and intake query bounds use `YYYY-MM-DDTHH:MM`.
//! Input must already have the exact zero-padded shape (four-digit year, no
//! sign, no surrounding whitespace), so stored text compares chronologically.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Format of a medication start date.
pub const START_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of an intake timestamp.
pub const INTAKE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Character layout of each format; `9` stands for an ASCII digit.
const START_DATE_SHAPE: &str = "9999-99-99";
const INTAKE_DATE_SHAPE: &str = "9999-99-99T99:99";

/// Rejected field values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid start date '{0}', expected YYYY-MM-DD")]
    StartDate(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DDTHH:MM")]
    IntakeDate(String),

    #[error("Hour {0} out of range 0-23")]
    Hour(i64),

    #[error("Minute {0} out of range 0-59")]
    Minute(i64),

    #[error("Dosage {0} must be a positive number")]
    Dosage(f64),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'9' => c.is_ascii_digit(),
            _ => c == s,
        })
}

/// Parse a medication start date.
pub fn parse_start_date(value: &str) -> ValidationResult<NaiveDate> {
    if !has_shape(value, START_DATE_SHAPE) {
        return Err(ValidationError::StartDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, START_DATE_FORMAT)
        .map_err(|_| ValidationError::StartDate(value.to_string()))
}

/// Parse an intake timestamp or query bound.
pub fn parse_intake_date(value: &str) -> ValidationResult<NaiveDateTime> {
    if !has_shape(value, INTAKE_DATE_SHAPE) {
        return Err(ValidationError::IntakeDate(value.to_string()));
    }
    NaiveDateTime::parse_from_str(value, INTAKE_DATE_FORMAT)
        .map_err(|_| ValidationError::IntakeDate(value.to_string()))
}

/// Validate a start date and return its canonical text.
pub fn canonical_start_date(value: &str) -> ValidationResult<String> {
    parse_start_date(value).map(|date| date.format(START_DATE_FORMAT).to_string())
}

/// Validate an intake timestamp and return its canonical text.
pub fn canonical_intake_date(value: &str) -> ValidationResult<String> {
    parse_intake_date(value).map(|date| date.format(INTAKE_DATE_FORMAT).to_string())
}

/// Check a posology time of day. Out-of-range values are rejected, never clamped.
pub fn validate_time_of_day(hour: i64, minute: i64) -> ValidationResult<(u8, u8)> {
    if !(0..=23).contains(&hour) {
        return Err(ValidationError::Hour(hour));
    }
    if !(0..=59).contains(&minute) {
        return Err(ValidationError::Minute(minute));
    }
    Ok((hour as u8, minute as u8))
}

/// Check a prescribed dose.
pub fn validate_dosage(dosage: f64) -> ValidationResult<f64> {
    if dosage.is_finite() && dosage > 0.0 {
        Ok(dosage)
    } else {
        Err(ValidationError::Dosage(dosage))
    }
}

/// Inclusive intake date filter. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// No filtering.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse optional query bounds.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> ValidationResult<Self> {
        Ok(Self {
            start: start.map(parse_intake_date).transpose()?,
            end: end.map(parse_intake_date).transpose()?,
        })
    }

    /// Bounds rendered for comparison against stored intake dates.
    pub fn bounds(&self) -> (Option<String>, Option<String>) {
        let render = |d: &NaiveDateTime| d.format(INTAKE_DATE_FORMAT).to_string();
        (self.start.as_ref().map(render), self.end.as_ref().map(render))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_start_date_formats() {
        assert!(parse_start_date("2024-09-05").is_ok());
        assert_eq!(
            parse_start_date("09/05/2024"),
            Err(ValidationError::StartDate("09/05/2024".into()))
        );
        assert!(parse_start_date("2024-02-30").is_err());
        assert!(parse_start_date("").is_err());
    }

    #[test]
    fn test_intake_date_formats() {
        assert!(parse_intake_date("2024-09-06T10:30").is_ok());
        assert!(parse_intake_date("no date").is_err());
        assert!(parse_intake_date("2000-10-20").is_err());
        assert!(parse_intake_date("1000").is_err());
        assert!(parse_intake_date("2024-09-06T25:00").is_err());
    }

    #[test]
    fn test_canonical_forms() {
        assert_eq!(canonical_start_date("2024-09-05").unwrap(), "2024-09-05");
        assert_eq!(
            canonical_intake_date("2024-09-06T08:05").unwrap(),
            "2024-09-06T08:05"
        );
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert_eq!(validate_time_of_day(0, 0), Ok((0, 0)));
        assert_eq!(validate_time_of_day(23, 59), Ok((23, 59)));
        assert_eq!(validate_time_of_day(24, 0), Err(ValidationError::Hour(24)));
        assert_eq!(validate_time_of_day(8, 60), Err(ValidationError::Minute(60)));
        assert_eq!(validate_time_of_day(-1, 0), Err(ValidationError::Hour(-1)));
        assert_eq!(validate_time_of_day(60, 100), Err(ValidationError::Hour(60)));
    }

    #[test]
    fn test_range_parse() {
        let range = DateRange::parse(Some("2024-09-06T09:30"), None).unwrap();
        assert!(range.start.is_some());
        assert!(range.end.is_none());
        assert_eq!(range.bounds(), (Some("2024-09-06T09:30".to_string()), None));

        assert!(DateRange::parse(Some("no-date"), Some("1000")).is_err());
        assert!(DateRange::parse(None, Some("1000")).is_err());
        assert_eq!(DateRange::parse(None, None).unwrap(), DateRange::unbounded());
    }

    #[test]
    fn test_dates_must_be_zero_padded() {
        assert!(parse_start_date("2024-9-5").is_err());
        assert!(parse_start_date(" 2024-09-05 ").is_err());
        assert!(parse_start_date("+2024-09-05").is_err());
        assert!(parse_intake_date("2024-09-06T8:30").is_err());
        assert!(parse_intake_date("2024-09-06T10:30 ").is_err());
        assert!(parse_intake_date("2024-09-06 10:30").is_err());
    }

    #[test]
    fn test_years_outside_four_digits_rejected() {
        assert_eq!(
            canonical_intake_date("+10000-01-01T00:00"),
            Err(ValidationError::IntakeDate("+10000-01-01T00:00".into()))
        );
        assert!(canonical_start_date("-0001-01-01").is_err());
        assert!(DateRange::parse(None, Some("+10000-01-01T00:00")).is_err());
        assert_eq!(canonical_start_date("0001-01-01").unwrap(), "0001-01-01");
    }

    #[test]
    fn test_dosage_must_be_positive() {
        assert_eq!(validate_dosage(0.25), Ok(0.25));
        assert_eq!(validate_dosage(0.0), Err(ValidationError::Dosage(0.0)));
        assert_eq!(validate_dosage(-3.0), Err(ValidationError::Dosage(-3.0)));
        assert!(validate_dosage(f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_times_accepted(hour in 0i64..=23, minute in 0i64..=59) {
            prop_assert_eq!(validate_time_of_day(hour, minute), Ok((hour as u8, minute as u8)));
        }

        #[test]
        fn prop_out_of_range_hour_rejected(hour in prop_oneof![i64::MIN..0i64, 24i64..i64::MAX], minute in 0i64..=59) {
            prop_assert_eq!(validate_time_of_day(hour, minute), Err(ValidationError::Hour(hour)));
        }

        #[test]
        fn prop_out_of_range_minute_rejected(hour in 0i64..=23, minute in prop_oneof![i64::MIN..0i64, 60i64..i64::MAX]) {
            prop_assert_eq!(validate_time_of_day(hour, minute), Err(ValidationError::Minute(minute)));
        }

        #[test]
        fn prop_canonical_date_stable(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28, h in 0u32..24, min in 0u32..60) {
            let text = format!("{y:04}-{m:02}-{d:02}T{h:02}:{min:02}");
            prop_assert_eq!(canonical_intake_date(&text).unwrap(), text);
        }

        #[test]
        fn prop_accepted_dates_sort_chronologically(a in 0i64..400_000_000, b in 0i64..400_000_000) {
            let base = NaiveDate::from_ymd_opt(1, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            let render = |minutes: i64| {
                (base + chrono::Duration::minutes(minutes)).format(INTAKE_DATE_FORMAT).to_string()
            };
            let (x, y) = (render(a), render(b));
            prop_assert_eq!(canonical_intake_date(&x).unwrap(), x.clone());
            prop_assert_eq!(x.cmp(&y), a.cmp(&b));
        }
    }
}
