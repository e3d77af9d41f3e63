//! Which calendar dates can be booked for a visit.
//!
//! A date is bookable when it is not before today and it falls on a Saturday,
//! a Sunday, or a federal holiday. Holidays widen the set of allowed days;
//! they never remove a weekend. All comparisons use plain calendar dates, so
//! no timezone conversion can shift a date by one day.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRejection {
    InPast,
    NotWeekendOrHoliday,
}

impl std::fmt::Display for DateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRejection::InPast => write!(f, "Visit date cannot be in the past"),
            DateRejection::NotWeekendOrHoliday => write!(
                f,
                "We only provide transportation on weekends (Saturday and Sunday) and federal holidays"
            ),
        }
    }
}

impl std::error::Error for DateRejection {}

pub fn check_visit_date(date: NaiveDate, today: NaiveDate) -> Result<(), DateRejection> {
    if date < today {
        return Err(DateRejection::InPast);
    }
    if !is_weekend(date) && !is_federal_holiday(date) {
        return Err(DateRejection::NotWeekendOrHoliday);
    }
    Ok(())
}

pub fn is_eligible_visit_date(date: NaiveDate, today: NaiveDate) -> bool {
    check_visit_date(date, today).is_ok()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_federal_holiday(date: NaiveDate) -> bool {
    holiday_name(date).is_some()
}

/// Name of the federal holiday observed on `date`, if any.
///
/// Observed-on-Friday/Monday shifts for fixed holidays are not applied.
pub fn holiday_name(date: NaiveDate) -> Option<&'static str> {
    let (year, month, day) = (date.year(), date.month(), date.day());

    match (month, day) {
        (1, 1) => return Some("New Year's Day"),
        (7, 4) => return Some("Independence Day"),
        (11, 11) => return Some("Veterans Day"),
        (12, 25) => return Some("Christmas Day"),
        _ => {}
    }

    let nth = |weekday, n| nth_weekday_of_month(year, month, weekday, n) == Some(date);

    match month {
        1 if nth(Weekday::Mon, 3) => Some("Martin Luther King Jr. Day"),
        2 if nth(Weekday::Mon, 3) => Some("Presidents Day"),
        5 if last_weekday_of_month(year, month, Weekday::Mon) == Some(date) => {
            Some("Memorial Day")
        }
        9 if nth(Weekday::Mon, 1) => Some("Labor Day"),
        10 if nth(Weekday::Mon, 2) => Some("Columbus Day"),
        11 if nth(Weekday::Thu, 4) => Some("Thanksgiving Day"),
        _ => None,
    }
}

/// The `nth` (1-based) occurrence of `weekday` in the month, or `None` when
/// the month has fewer occurrences.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: u32) -> Option<NaiveDate> {
    if nth == 0 {
        return None;
    }
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    let offset = (7 + weekday.num_days_from_monday() - first_of_month.weekday().num_days_from_monday()) % 7;
    let first = first_of_month + Duration::days(offset as i64);
    let candidate = first + Duration::days(((nth - 1) * 7) as i64);
    (candidate.month() == month).then_some(candidate)
}

pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let mut day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    while day.weekday() != weekday {
        day = day.pred_opt()?;
    }
    Some(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_saturday_is_eligible() {
        // 2025-09-27 is a Saturday
        assert!(is_eligible_visit_date(d("2025-09-27"), d("2025-09-20")));
    }

    #[test]
    fn test_plain_weekday_rejected() {
        // 2025-09-24 is a Wednesday with no holiday
        assert_eq!(
            check_visit_date(d("2025-09-24"), d("2025-09-20")),
            Err(DateRejection::NotWeekendOrHoliday)
        );
    }

    #[test]
    fn test_past_date_rejected_even_on_weekend() {
        assert_eq!(
            check_visit_date(d("2025-09-27"), d("2025-09-28")),
            Err(DateRejection::InPast)
        );
    }

    #[test]
    fn test_today_is_not_past() {
        assert!(is_eligible_visit_date(d("2025-09-27"), d("2025-09-27")));
    }

    #[test]
    fn test_never_eligible_before_today() {
        let today = d("2026-03-15");
        let mut date = d("2025-01-01");
        while date < today {
            assert!(!is_eligible_visit_date(date, today), "{date} should be rejected");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_weekday_holiday_extends_eligibility() {
        // 2025-07-04 is a Friday
        assert_eq!(holiday_name(d("2025-07-04")), Some("Independence Day"));
        assert!(is_eligible_visit_date(d("2025-07-04"), d("2025-07-01")));
    }

    #[test]
    fn test_floating_holidays_2025() {
        assert_eq!(holiday_name(d("2025-01-20")), Some("Martin Luther King Jr. Day"));
        assert_eq!(holiday_name(d("2025-02-17")), Some("Presidents Day"));
        assert_eq!(holiday_name(d("2025-05-26")), Some("Memorial Day"));
        assert_eq!(holiday_name(d("2025-09-01")), Some("Labor Day"));
        assert_eq!(holiday_name(d("2025-10-13")), Some("Columbus Day"));
        assert_eq!(holiday_name(d("2025-11-27")), Some("Thanksgiving Day"));
    }

    #[test]
    fn test_fixed_holidays() {
        assert!(is_federal_holiday(d("2026-01-01")));
        assert!(is_federal_holiday(d("2026-11-11")));
        assert!(is_federal_holiday(d("2026-12-25")));
        assert!(!is_federal_holiday(d("2026-12-24")));
    }

    #[test]
    fn test_holiday_ranges_across_years() {
        for year in 1990..=2100 {
            let mlk = nth_weekday_of_month(year, 1, Weekday::Mon, 3).unwrap();
            assert_eq!(mlk.weekday(), Weekday::Mon);
            assert!((15..=21).contains(&mlk.day()), "MLK {mlk}");
            assert!(is_federal_holiday(mlk));

            let thanksgiving = nth_weekday_of_month(year, 11, Weekday::Thu, 4).unwrap();
            assert_eq!(thanksgiving.weekday(), Weekday::Thu);
            assert!((22..=28).contains(&thanksgiving.day()), "Thanksgiving {thanksgiving}");
            assert!(is_federal_holiday(thanksgiving));

            let memorial = last_weekday_of_month(year, 5, Weekday::Mon).unwrap();
            assert_eq!(memorial.weekday(), Weekday::Mon);
            assert!((25..=31).contains(&memorial.day()), "Memorial Day {memorial}");
            assert!(is_federal_holiday(memorial));
        }
    }

    #[test]
    fn test_second_monday_in_may_is_not_memorial_day() {
        assert!(!is_federal_holiday(d("2025-05-12")));
        assert!(!is_federal_holiday(d("2025-05-19")));
    }

    #[test]
    fn test_nth_weekday_out_of_range() {
        // February 2026 has only four Mondays
        assert_eq!(nth_weekday_of_month(2026, 2, Weekday::Mon, 5), None);
        assert_eq!(nth_weekday_of_month(2026, 2, Weekday::Mon, 0), None);
    }

    #[test]
    fn test_last_weekday_december() {
        assert_eq!(last_weekday_of_month(2025, 12, Weekday::Wed), Some(d("2025-12-31")));
    }

    #[test]
    fn test_rejection_messages_are_distinct() {
        assert_ne!(
            DateRejection::InPast.to_string(),
            DateRejection::NotWeekendOrHoliday.to_string()
        );
    }
}
