//! # Home Clock
//!
//! Local and UTC time/date strings shown on the home page.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockView {
    /// `2:30:05 PM`
    pub local_time: String,
    /// `1/15/2024`
    pub local_date: String,
    /// `14:30:05`
    pub utc_time: String,
    /// `Mon, 15 Jan`
    pub utc_date: String,
}

/// Formats `now` for the home page, with `local` as the viewer's time zone.
pub fn clock<Tz>(now: DateTime<Utc>, local: &Tz) -> ClockView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let here = now.with_timezone(local);
    ClockView {
        local_time: here.format("%-I:%M:%S %p").to_string(),
        local_date: here.format("%-m/%-d/%Y").to_string(),
        utc_time: now.format("%H:%M:%S").to_string(),
        utc_date: now.format("%a, %d %b").to_string(),
    }
}

impl ClockView {
    /// The clock at this instant in the machine's time zone. The page re-reads it every second.
    pub fn now() -> Self {
        clock(Utc::now(), &Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_clock_strings() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 5).unwrap();
        let view = clock(now, &Utc);
        assert_eq!(view.local_time, "2:30:05 PM");
        assert_eq!(view.local_date, "1/15/2024");
        assert_eq!(view.utc_time, "14:30:05");
        assert_eq!(view.utc_date, "Mon, 15 Jan");
    }

    #[test]
    fn test_local_zone_can_cross_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 23, 15, 0).unwrap();
        let helsinki = FixedOffset::east_opt(2 * 3600).unwrap();
        let view = clock(now, &helsinki);
        assert_eq!(view.local_time, "1:15:00 AM");
        assert_eq!(view.local_date, "3/5/2024");
        assert_eq!(view.utc_date, "Mon, 04 Mar");
    }
}
