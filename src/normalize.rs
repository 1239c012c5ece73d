//! Unit normalization: flight hours, flight cycles and calendar time → EFH.
//!
//! Every basis a task may recur on is converted into Equivalent Flight
//! Hours so intervals can be compared directly. The governing interval is
//! the smallest strictly positive basis, i.e. whichever would trigger the
//! task first.
//!
//! Malformed numbers never raise errors here. They become `None` and the
//! task simply has fewer bases to choose from.

use crate::config::ConversionConfig;
use crate::model::{CalendarUnit, NormalizedTask, TaskRecord};

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

/// Best-effort numeric parse for spreadsheet cells.
///
/// Keeps ASCII digits and `.` only, then parses what is left. `"1,200 FH"`
/// reads as 1200.0; `""`, `"N/A"` and `"1.2.3"` read as `None`. Signs are
/// stripped along with everything else.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Calendar units
// ---------------------------------------------------------------------------

impl CalendarUnit {
    /// Reads a CODE cell. Missing or unrecognised codes count as months.
    pub fn from_code(code: Option<&str>) -> CalendarUnit {
        let Some(code) = code else {
            return CalendarUnit::Month;
        };
        match code.trim().to_ascii_uppercase().as_str() {
            "Y" | "YR" | "YEAR" | "YEARS" => CalendarUnit::Year,
            "D" | "DAY" | "DAYS" => CalendarUnit::Day,
            "W" | "WK" | "WEEK" | "WEEKS" => CalendarUnit::Week,
            _ => CalendarUnit::Month,
        }
    }

    /// Converts a count of this unit into months (30-day months, 4-week months).
    pub fn to_months(self, value: f64) -> f64 {
        match self {
            CalendarUnit::Month => value,
            CalendarUnit::Year => value * 12.0,
            CalendarUnit::Day => value / 30.0,
            CalendarUnit::Week => value / 4.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Basis conversions
// ---------------------------------------------------------------------------

/// Flight hours are already EFH.
pub fn efh_from_hours(fh: Option<f64>) -> Option<f64> {
    fh
}

pub fn efh_from_cycles(cy: Option<f64>, conversion: &ConversionConfig) -> Option<f64> {
    cy.map(|cycles| cycles * conversion.fc_to_fh)
}

pub fn efh_from_calendar(
    cal: Option<f64>,
    code: Option<&str>,
    conversion: &ConversionConfig,
) -> Option<f64> {
    cal.map(|value| CalendarUnit::from_code(code).to_months(value) * conversion.mo_to_fh)
}

/// Smallest strictly positive value among the bases, if any.
///
/// Zero and negative values are treated as absent, never as a zero-length
/// interval.
pub fn governing_interval(bases: &[Option<f64>]) -> Option<f64> {
    bases
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .min_by(f64::total_cmp)
}

/// Converts every basis of a task and picks its governing interval.
pub fn normalize_task(record: &TaskRecord, conversion: &ConversionConfig) -> NormalizedTask {
    let efh_fh = efh_from_hours(record.fh);
    let efh_fc = efh_from_cycles(record.cy, conversion);
    let efh_cal = efh_from_calendar(record.cal, record.cal_code.as_deref(), conversion);
    let interval_efh = governing_interval(&[efh_fh, efh_fc, efh_cal]);

    NormalizedTask {
        record: record.clone(),
        efh_fh,
        efh_fc,
        efh_cal,
        interval_efh,
    }
}

/// Normalizes a whole batch, preserving input order.
pub fn normalize_all(records: &[TaskRecord], conversion: &ConversionConfig) -> Vec<NormalizedTask> {
    records
        .iter()
        .map(|record| normalize_task(record, conversion))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn conversion() -> ConversionConfig {
        ConversionConfig {
            fc_to_fh: 4.83,
            mo_to_fh: 435.0,
        }
    }

    fn record(fh: Option<f64>, cy: Option<f64>, cal: Option<f64>, code: Option<&str>) -> TaskRecord {
        TaskRecord {
            task_id: "212100-01".to_string(),
            title: "Air conditioning pack inspection".to_string(),
            fh,
            cy,
            cal,
            cal_code: code.map(String::from),
            ..TaskRecord::default()
        }
    }

    // --- Numeric parsing ----------------------------------------------------

    #[test]
    fn test_parse_numeric_strips_units_and_separators() {
        assert_eq!(parse_numeric("1,200 FH"), Some(1200.0));
        assert_eq!(parse_numeric("  750.5 "), Some(750.5));
        assert_eq!(parse_numeric("24MO"), Some(24.0));
    }

    #[test]
    fn test_parse_numeric_returns_none_for_garbage() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("N/A"), None);
        assert_eq!(parse_numeric("1.2.3"), None);
    }

    // --- Calendar units -----------------------------------------------------

    #[test]
    fn test_calendar_codes_are_case_insensitive() {
        assert_eq!(CalendarUnit::from_code(Some("yr")), CalendarUnit::Year);
        assert_eq!(CalendarUnit::from_code(Some(" Days ")), CalendarUnit::Day);
        assert_eq!(CalendarUnit::from_code(Some("WK")), CalendarUnit::Week);
        assert_eq!(CalendarUnit::from_code(Some("mon")), CalendarUnit::Month);
    }

    #[test]
    fn test_unknown_or_missing_code_defaults_to_month() {
        assert_eq!(CalendarUnit::from_code(Some("QTR")), CalendarUnit::Month);
        assert_eq!(CalendarUnit::from_code(None), CalendarUnit::Month);
    }

    #[test]
    fn test_six_months_is_2610_efh() {
        let efh = efh_from_calendar(Some(6.0), Some("M"), &conversion());
        assert_eq!(efh, Some(2610.0));
    }

    #[test]
    fn test_one_year_is_5220_efh() {
        let efh = efh_from_calendar(Some(1.0), Some("Y"), &conversion());
        assert_eq!(efh, Some(5220.0));
    }

    #[test]
    fn test_days_and_weeks_convert_through_months() {
        let c = conversion();
        assert_eq!(efh_from_calendar(Some(60.0), Some("D"), &c), Some(870.0));
        assert_eq!(efh_from_calendar(Some(8.0), Some("W"), &c), Some(870.0));
    }

    #[test]
    fn test_cycles_scale_by_fc_constant() {
        let efh = efh_from_cycles(Some(1000.0), &conversion()).unwrap();
        assert!((efh - 4830.0).abs() < 1e-9, "got {}", efh);
    }

    // --- Governing interval -------------------------------------------------

    #[test]
    fn test_hours_only_record_governs_at_its_own_value() {
        let task = normalize_task(&record(Some(500.0), None, None, None), &conversion());
        assert_eq!(task.interval_efh, Some(500.0));
        assert!(task.is_groupable());
    }

    #[test]
    fn test_smallest_positive_basis_governs() {
        // 600 FH vs 100 FC (483 EFH) vs 2 MO (870 EFH) → cycles govern.
        let task = normalize_task(
            &record(Some(600.0), Some(100.0), Some(2.0), Some("MO")),
            &conversion(),
        );
        let interval = task.interval_efh.expect("should have an interval");
        assert!((interval - 483.0).abs() < 1e-9, "got {}", interval);
    }

    #[test]
    fn test_zero_and_negative_bases_are_absent() {
        assert_eq!(governing_interval(&[Some(0.0), Some(-10.0), None]), None);
        assert_eq!(governing_interval(&[Some(0.0), Some(300.0)]), Some(300.0));
    }

    #[test]
    fn test_record_without_bases_is_not_groupable() {
        let task = normalize_task(&record(None, None, None, Some("M")), &conversion());
        assert_eq!(task.interval_efh, None);
        assert!(!task.is_groupable());
        assert_eq!(task.efh_cal, None);
    }

    #[test]
    fn test_normalize_all_keeps_order_and_excluded_rows() {
        let records = vec![
            record(Some(500.0), None, None, None),
            record(None, None, None, None),
            record(None, Some(10.0), None, None),
        ];
        let tasks = normalize_all(&records, &conversion());
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].interval_efh, Some(500.0));
        assert_eq!(tasks[1].interval_efh, None);
        assert!(tasks[2].interval_efh.is_some());
    }
}
