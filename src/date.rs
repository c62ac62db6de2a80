use std::fmt;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use tracing::warn;

/// A calendar day. Always holds a valid (leap-year aware) date: a rejected
/// construction falls back to the sentinel 01/01/1900 instead of producing
/// an error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(NaiveDate);

const MONTH_NAMES: [&str; 13] = [
    "",
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

impl Date {
    /// Fallback for rejected constructions: 01/01/1900.
    pub fn sentinel() -> Self {
        Self(NaiveDate::from_ymd_opt(1900, 1, 1).expect("sentinel date is valid"))
    }

    pub fn new(day: u32, month: u32, year: i32) -> Self {
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(inner) => Self(inner),
            None => {
                warn!("invalid calendar date {day:02}/{month:02}/{year}, using the sentinel");
                Self::sentinel()
            }
        }
    }

    /// Parse `dd/mm/aaaa`. Non-numeric parts fail the parse; a numeric but
    /// calendar-invalid combination goes through `new` and becomes the
    /// sentinel.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().splitn(3, '/');
        let day: u32 = parts.next()?.parse().ok()?;
        let month: u32 = parts.next()?.parse().ok()?;
        let year: i32 = parts.next()?.parse().ok()?;
        Some(Self::new(day, month, year))
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The date `nights` days later, rolling months and years.
    pub fn add_nights(self, nights: u32) -> Self {
        match self.0.checked_add_days(Days::new(u64::from(nights))) {
            Some(inner) => Self(inner),
            None => {
                warn!("date arithmetic overflow adding {nights} nights to {}", self);
                self
            }
        }
    }

    /// Inclusive range test: `start <= self <= end`.
    pub fn in_range(self, start: Date, end: Date) -> bool {
        self >= start && self <= end
    }

    pub fn weekday_name(&self) -> &'static str {
        match self.0.weekday() {
            Weekday::Mon => "Lunes",
            Weekday::Tue => "Martes",
            Weekday::Wed => "Miércoles",
            Weekday::Thu => "Jueves",
            Weekday::Fri => "Viernes",
            Weekday::Sat => "Sábado",
            Weekday::Sun => "Domingo",
        }
    }

    /// Long receipt form: `"Domingo, 1 de Junio del 2025"`.
    pub fn long_format(&self) -> String {
        format!(
            "{}, {} de {} del {}",
            self.weekday_name(),
            self.0.day(),
            MONTH_NAMES[self.0.month() as usize],
            self.0.year()
        )
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.0.day(), self.0.month(), self.0.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_construction() {
        let d = Date::new(15, 6, 2025);
        assert_eq!(d.day(), 15);
        assert_eq!(d.month(), 6);
        assert_eq!(d.year(), 2025);
    }

    #[test]
    fn invalid_construction_falls_back_to_sentinel() {
        assert_eq!(Date::new(31, 2, 2025), Date::sentinel());
        assert_eq!(Date::new(0, 1, 2025), Date::sentinel());
        assert_eq!(Date::new(1, 13, 2025), Date::sentinel());
    }

    #[test]
    fn leap_year_rules() {
        assert_ne!(Date::new(29, 2, 2024), Date::sentinel());
        assert_ne!(Date::new(29, 2, 2000), Date::sentinel());
        assert_eq!(Date::new(29, 2, 2025), Date::sentinel());
        // Century years are only leap when divisible by 400.
        assert_eq!(Date::new(29, 2, 1900), Date::sentinel());
    }

    #[test]
    fn ordering_by_year_month_day() {
        assert!(Date::new(31, 12, 2024) < Date::new(1, 1, 2025));
        assert!(Date::new(1, 6, 2025) < Date::new(1, 7, 2025));
        assert!(Date::new(1, 6, 2025) < Date::new(2, 6, 2025));
        assert_eq!(Date::new(1, 6, 2025), Date::new(1, 6, 2025));
    }

    #[test]
    fn add_nights_rolls_months_and_years() {
        assert_eq!(Date::new(30, 12, 2025).add_nights(3), Date::new(2, 1, 2026));
        assert_eq!(Date::new(28, 2, 2024).add_nights(1), Date::new(29, 2, 2024));
        assert_eq!(Date::new(28, 2, 2025).add_nights(1), Date::new(1, 3, 2025));
        assert_eq!(Date::new(1, 6, 2025).add_nights(0), Date::new(1, 6, 2025));
    }

    #[test]
    fn parse_and_display_round_trip() {
        let d = Date::parse("01/06/2025").unwrap();
        assert_eq!(d, Date::new(1, 6, 2025));
        assert_eq!(d.to_string(), "01/06/2025");
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(Date::parse("aa/bb/cccc").is_none());
        assert!(Date::parse("2025-06-01").is_none());
        assert!(Date::parse("").is_none());
        assert!(Date::parse("1/6").is_none());
    }

    #[test]
    fn parse_calendar_invalid_becomes_sentinel() {
        assert_eq!(Date::parse("31/02/2025").unwrap(), Date::sentinel());
    }

    #[test]
    fn weekday_and_long_format() {
        let d = Date::new(1, 6, 2025);
        assert_eq!(d.weekday_name(), "Domingo");
        assert_eq!(d.long_format(), "Domingo, 1 de Junio del 2025");
    }

    #[test]
    fn in_range_is_inclusive() {
        let start = Date::new(1, 6, 2025);
        let end = Date::new(30, 6, 2025);
        assert!(start.in_range(start, end));
        assert!(end.in_range(start, end));
        assert!(Date::new(15, 6, 2025).in_range(start, end));
        assert!(!Date::new(1, 7, 2025).in_range(start, end));
        assert!(!Date::new(31, 5, 2025).in_range(start, end));
    }
}
