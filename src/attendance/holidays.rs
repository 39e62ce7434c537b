use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;

/// National holidays for Ecuador, 2025–2026. Static configuration; HR
/// confirms the list once per year.
static HOLIDAYS: Lazy<HashSet<NaiveDate>> = Lazy::new(|| {
    const DATES: &[(i32, u32, u32)] = &[
        (2025, 1, 1),
        (2025, 3, 3),
        (2025, 3, 4),
        (2025, 4, 18),
        (2025, 5, 1),
        (2025, 5, 23),
        (2025, 8, 11),
        (2025, 10, 10),
        (2025, 11, 2),
        (2025, 11, 3),
        (2025, 12, 25),
        (2026, 1, 1),
        (2026, 2, 16),
        (2026, 2, 17),
        (2026, 4, 3),
        (2026, 5, 1),
        (2026, 5, 25),
        (2026, 8, 10),
        (2026, 10, 9),
        (2026, 11, 2),
        (2026, 11, 3),
        (2026, 12, 25),
    ];
    DATES
        .iter()
        .filter_map(|&(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
        .collect()
});

pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS.contains(&date)
}

/// Weekends and holidays carry no attendance expectation.
pub fn is_non_working(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || is_holiday(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_year_and_carnival_are_holidays() {
        assert!(is_holiday(d(2026, 1, 1)));
        assert!(is_holiday(d(2026, 2, 16)));
        assert!(!is_holiday(d(2026, 2, 10)));
    }

    #[test]
    fn weekends_are_non_working_even_outside_the_table() {
        assert!(is_non_working(d(2026, 2, 14))); // Saturday
        assert!(is_non_working(d(2026, 2, 15))); // Sunday
        assert!(!is_non_working(d(2026, 2, 10))); // Tuesday
    }
}
