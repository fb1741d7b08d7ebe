//! Attendance reporting math.
//!
//! Rates are percentages in `0.0..=100.0`, computed from counts the services
//! obtain via SQL aggregates. Two distinct metrics exist and must never be
//! conflated: the *absence* rate (share of Absent records, drives the student
//! warning flag) and the *presence* rate (share of Present records, shown in
//! per-class summaries).

use std::collections::HashSet;

use chrono::{Days, NaiveDate};

/// Absence rate threshold above which a student is flagged. The comparison is
/// strict: a rate of exactly 25% does not trigger the warning.
pub const ABSENCE_WARNING_THRESHOLD: f64 = 25.0;

/// Share of records marked Absent, as a percentage. Zero when there are no
/// records at all.
pub fn absence_rate(absent: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    absent as f64 / total as f64 * 100.0
}

pub fn absence_warning(rate: f64) -> bool {
    rate > ABSENCE_WARNING_THRESHOLD
}

/// Share of records marked Present, as a percentage. Zero when there are no
/// records at all. Distinct from [`absence_rate`]: with Late and Excused
/// statuses in play the two do not sum to 100.
pub fn presence_rate(present: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    present as f64 / total as f64 * 100.0
}

/// Inclusive ascending day sequence from `start` through `end`. Empty when
/// `start > end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// Days in the class calendar that have no attendance record yet for one
/// student, ascending.
///
/// The calendar runs from the class start date through the class end date
/// capped at `as_of`; an open-ended class runs through `as_of` itself.
pub fn unmarked_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
    as_of: NaiveDate,
    marked: &HashSet<NaiveDate>,
) -> Vec<NaiveDate> {
    let effective_end = match end {
        Some(end) => end.min(as_of),
        None => as_of,
    };

    date_range(start, effective_end)
        .into_iter()
        .filter(|d| !marked.contains(d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn absence_rate_is_zero_without_records() {
        assert_eq!(absence_rate(0, 0), 0.0);
    }

    #[test]
    fn absence_rate_half_absent() {
        // Records A, A, P, P
        assert_eq!(absence_rate(2, 4), 50.0);
    }

    #[test]
    fn warning_triggers_only_strictly_above_threshold() {
        // 3 Present + 1 Absent: exactly 25%, no warning
        let rate = absence_rate(1, 4);
        assert_eq!(rate, 25.0);
        assert!(!absence_warning(rate));

        assert!(absence_warning(absence_rate(2, 4)));
    }

    #[test]
    fn presence_rate_is_zero_without_records() {
        assert_eq!(presence_rate(0, 0), 0.0);
    }

    #[test]
    fn presence_and_absence_rates_are_independent() {
        // 1 Present, 1 Absent, 2 Late
        assert_eq!(presence_rate(1, 4), 25.0);
        assert_eq!(absence_rate(1, 4), 25.0);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = date_range(d("2024-01-01"), d("2024-01-05"));
        assert_eq!(range.len(), 5);
        assert_eq!(range.first(), Some(&d("2024-01-01")));
        assert_eq!(range.last(), Some(&d("2024-01-05")));
    }

    #[test]
    fn date_range_empty_when_start_after_end() {
        assert!(date_range(d("2024-01-05"), d("2024-01-01")).is_empty());
    }

    #[test]
    fn unmarked_dates_subtracts_recorded_days() {
        let marked: HashSet<NaiveDate> = [d("2024-01-03")].into_iter().collect();
        let unmarked = unmarked_dates(
            d("2024-01-01"),
            Some(d("2024-01-05")),
            d("2024-01-05"),
            &marked,
        );
        assert_eq!(
            unmarked,
            vec![
                d("2024-01-01"),
                d("2024-01-02"),
                d("2024-01-04"),
                d("2024-01-05"),
            ]
        );
    }

    #[test]
    fn unmarked_dates_caps_end_at_as_of() {
        let unmarked = unmarked_dates(
            d("2024-01-01"),
            Some(d("2024-03-01")),
            d("2024-01-03"),
            &HashSet::new(),
        );
        assert_eq!(
            unmarked,
            vec![d("2024-01-01"), d("2024-01-02"), d("2024-01-03")]
        );
    }

    #[test]
    fn unmarked_dates_open_ended_class_runs_through_as_of() {
        let unmarked = unmarked_dates(d("2024-01-01"), None, d("2024-01-02"), &HashSet::new());
        assert_eq!(unmarked, vec![d("2024-01-01"), d("2024-01-02")]);
    }
}
