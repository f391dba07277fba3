//! 营业时间判定
//!
//! A restaurant is open when today is in its weekday allow-list and at least
//! one of its (up to two) shifts covers the current minute. Both shift
//! boundaries are inclusive. A shift whose close is earlier than its open
//! crosses midnight.
//!
//! Everything here is pure: callers pass the local wall-clock time in the
//! business timezone (see [`crate::utils::time::local_now`]).

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;
use shared::models::Restaurant;

use crate::utils::time;

/// One daily opening window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    open: u32,
    close: u32,
}

impl Shift {
    /// Build a shift from "HH:MM" bounds; any missing or malformed bound
    /// makes the shift undefined
    pub fn parse(open: Option<&str>, close: Option<&str>) -> Option<Self> {
        let open = time::parse_hhmm(open?)?;
        let close = time::parse_hhmm(close?)?;
        Some(Self {
            open: minutes_of(open),
            close: minutes_of(close),
        })
    }

    pub fn crosses_midnight(&self) -> bool {
        self.close < self.open
    }

    /// Whether the shift covers the given minute of the day
    pub fn contains(&self, minute: u32) -> bool {
        if self.crosses_midnight() {
            minute >= self.open || minute <= self.close
        } else {
            self.open <= minute && minute <= self.close
        }
    }
}

/// Weekday allow-list plus shifts of one restaurant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    days: Vec<u8>,
    shifts: Vec<Shift>,
}

impl Schedule {
    pub fn of(restaurant: &Restaurant) -> Self {
        let first = Shift::parse(
            Some(restaurant.opening_time.as_str()),
            Some(restaurant.closing_time.as_str()),
        );
        let second = Shift::parse(
            restaurant.opening_time2.as_deref(),
            restaurant.closing_time2.as_deref(),
        );
        Self {
            days: restaurant.operating_days_or_all(),
            shifts: first.into_iter().chain(second).collect(),
        }
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn operates_on(&self, weekday: u8) -> bool {
        self.days.contains(&weekday)
    }

    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        let weekday = now.weekday().num_days_from_sunday() as u8;
        if !self.operates_on(weekday) {
            return false;
        }
        let minute = minutes_of(now.time());
        self.shifts.iter().any(|s| s.contains(minute))
    }
}

/// Is the restaurant open at the given local wall-clock time
pub fn is_open_at(restaurant: &Restaurant, now: NaiveDateTime) -> bool {
    Schedule::of(restaurant).is_open_at(now)
}

/// Is the restaurant open right now in the business timezone
pub fn is_open_now(restaurant: &Restaurant, tz: Tz) -> bool {
    is_open_at(restaurant, time::local_now(tz))
}

fn minutes_of(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn restaurant(open: &str, close: &str) -> Restaurant {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Volpony Burguer",
            "rating": 4.9,
            "deliveryTime": "20-40 min",
            "deliveryFee": 5.0,
            "openingTime": open,
            "closingTime": close,
            "category": "snacks",
        }))
        .unwrap()
    }

    /// 2024-01-03 is a Wednesday, 2024-01-07 a Sunday
    fn at(day: u32, hhmm: &str) -> NaiveDateTime {
        let t = NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap();
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_time(t)
    }

    #[test]
    fn test_same_day_shift_boundaries_inclusive() {
        let r = restaurant("08:00", "22:00");
        assert!(is_open_at(&r, at(3, "08:00")));
        assert!(is_open_at(&r, at(3, "22:00")));
        assert!(!is_open_at(&r, at(3, "22:01")));
        assert!(!is_open_at(&r, at(3, "07:59")));
    }

    #[test]
    fn test_seconds_are_ignored() {
        let r = restaurant("08:00", "22:00");
        let late = at(3, "22:00") + chrono::Duration::seconds(59);
        assert!(is_open_at(&r, late));
    }

    #[test]
    fn test_midnight_crossing_shift() {
        let r = restaurant("18:00", "02:00");
        assert!(is_open_at(&r, at(3, "01:00")));
        assert!(is_open_at(&r, at(3, "18:00")));
        assert!(is_open_at(&r, at(3, "02:00")));
        assert!(!is_open_at(&r, at(3, "03:00")));
        assert!(!is_open_at(&r, at(3, "17:59")));
    }

    #[test]
    fn test_weekday_gate_dominates_shifts() {
        let mut r = restaurant("00:00", "23:59");
        r.operating_days = Some(vec![1, 2, 3, 4, 5]);
        assert!(is_open_at(&r, at(3, "12:00")));
        assert!(!is_open_at(&r, at(7, "12:00")));
    }

    #[test]
    fn test_second_shift() {
        let mut r = restaurant("11:00", "14:00");
        r.opening_time2 = Some("18:00".into());
        r.closing_time2 = Some("23:00".into());
        assert!(is_open_at(&r, at(3, "12:30")));
        assert!(!is_open_at(&r, at(3, "16:00")));
        assert!(is_open_at(&r, at(3, "19:00")));
        assert_eq!(Schedule::of(&r).shifts().len(), 2);
    }

    #[test]
    fn test_undefined_boundaries_never_mean_always_open() {
        let r = restaurant("", "");
        assert!(Schedule::of(&r).shifts().is_empty());
        assert!(!is_open_at(&r, at(3, "12:00")));

        // half-defined second shift is ignored, first shift still applies
        let mut r = restaurant("08:00", "10:00");
        r.opening_time2 = Some("18:00".into());
        assert_eq!(Schedule::of(&r).shifts().len(), 1);
        assert!(!is_open_at(&r, at(3, "19:00")));

        let r = restaurant("8 horas", "22:00");
        assert!(!is_open_at(&r, at(3, "12:00")));
    }

    #[test]
    fn test_empty_operating_days_is_always_closed() {
        let mut r = restaurant("00:00", "23:59");
        r.operating_days = Some(vec![]);
        assert!(!is_open_at(&r, at(3, "12:00")));
    }
}
