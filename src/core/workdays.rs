//! Working-day arithmetic for task deadlines and reminder schedules.
//!
//! A working day is Monday through Friday. All arithmetic excludes the
//! start day from the count and skips Saturdays and Sundays.

use chrono::{DateTime, Datelike, Days, Utc, Weekday};

/// Returns true for Monday through Friday.
pub fn is_working_day(date: DateTime<Utc>) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Computes the date exactly `working_days` weekdays after `start`.
///
/// The start day itself is never counted, so a deadline computed from a
/// Saturday or Sunday begins counting on the following Monday.
pub fn deadline_after(start: DateTime<Utc>, working_days: u32) -> DateTime<Utc> {
    let mut deadline = start;
    let mut counted = 0;

    while counted < working_days {
        deadline = deadline + Days::new(1);
        if is_working_day(deadline) {
            counted += 1;
        }
    }

    deadline
}

/// Counts the working days elapsed between `start` and `end`.
///
/// Counts weekdays strictly after `start`'s date up to and including
/// `end`'s date; returns 0 when `end` is not after `start`.
pub fn working_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let mut cursor = start.date_naive();
    let last = end.date_naive();
    let mut counted = 0;

    while cursor < last {
        cursor = cursor + Days::new(1);
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            counted += 1;
        }
    }

    counted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn deadline_from_monday_spans_two_weekends() {
        // Mon 2024-06-03 + 9 working days -> Fri 2024-06-14
        assert_eq!(deadline_after(utc(2024, 6, 3), 9), utc(2024, 6, 14));
    }

    #[test]
    fn deadline_from_friday_skips_both_weekends() {
        // Fri 2024-06-07: Mon..Fri is 5, Mon..Thu is 4 more -> Thu 2024-06-20
        assert_eq!(deadline_after(utc(2024, 6, 7), 9), utc(2024, 6, 20));
    }

    #[test]
    fn deadline_from_saturday_starts_counting_on_monday() {
        // Sat 2024-06-08: first counted day is Mon 2024-06-10
        assert_eq!(deadline_after(utc(2024, 6, 8), 1), utc(2024, 6, 10));
        assert_eq!(deadline_after(utc(2024, 6, 8), 9), utc(2024, 6, 20));
    }

    #[test]
    fn deadline_from_sunday_matches_saturday_start() {
        assert_eq!(deadline_after(utc(2024, 6, 9), 9), deadline_after(utc(2024, 6, 8), 9));
    }

    #[test]
    fn elapsed_excludes_start_day() {
        // Mon -> Mon same day
        assert_eq!(working_days_between(utc(2024, 6, 3), utc(2024, 6, 3)), 0);
        // Mon -> Tue
        assert_eq!(working_days_between(utc(2024, 6, 3), utc(2024, 6, 4)), 1);
        // Mon -> Thu
        assert_eq!(working_days_between(utc(2024, 6, 3), utc(2024, 6, 6)), 3);
    }

    #[test]
    fn elapsed_skips_weekends() {
        // Fri 2024-06-07 -> Mon 2024-06-10 is one working day
        assert_eq!(working_days_between(utc(2024, 6, 7), utc(2024, 6, 10)), 1);
        // Fri -> next Fri
        assert_eq!(working_days_between(utc(2024, 6, 7), utc(2024, 6, 14)), 5);
    }

    #[test]
    fn elapsed_from_weekend_start() {
        // Sat -> Mon counts only Monday
        assert_eq!(working_days_between(utc(2024, 6, 8), utc(2024, 6, 10)), 1);
    }

    #[test]
    fn elapsed_is_zero_when_end_precedes_start() {
        assert_eq!(working_days_between(utc(2024, 6, 10), utc(2024, 6, 3)), 0);
    }

    #[test]
    fn deadline_and_elapsed_agree() {
        // The deadline lands exactly N working days out by the elapsed counter.
        for day in 3..=9 {
            let start = utc(2024, 6, day);
            let deadline = deadline_after(start, 9);
            assert_eq!(working_days_between(start, deadline), 9);
        }
    }
}
