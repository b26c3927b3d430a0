/// Civil calendar in a fixed UTC offset
///
/// Every date in the tracker is a civil date in India Standard Time
/// (UTC+05:30), independent of the host's local timezone or DST rules.
/// Dates are `chrono::NaiveDate` values whose text form is always
/// `YYYY-MM-DD`; `parse_date` and `format_date` are the only codec.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::domain::DomainError;

/// Offset of India Standard Time from UTC, in seconds (+05:30)
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Text format of every date string in the system
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "now" and "today" for the whole tracker
///
/// A calendar normally follows the system clock. It can be pinned to a fixed
/// instant so that statistics can be replayed deterministically.
#[derive(Debug, Clone)]
pub struct CivilCalendar {
    offset: FixedOffset,
    pinned: Option<DateTime<Utc>>,
}

impl CivilCalendar {
    /// Calendar following the system clock in IST
    pub fn ist() -> Self {
        Self {
            offset: ist_offset(),
            pinned: None,
        }
    }

    /// Calendar frozen at the given instant
    pub fn pinned_at(instant: DateTime<Utc>) -> Self {
        Self {
            offset: ist_offset(),
            pinned: Some(instant),
        }
    }

    /// Calendar frozen at civil noon of the given date
    pub fn pinned_on(date: NaiveDate) -> Self {
        let offset = ist_offset();
        let local_noon = date.and_time(NaiveTime::default()) + Duration::hours(12);
        let utc_noon = local_noon - Duration::seconds(i64::from(offset.local_minus_utc()));
        Self {
            offset,
            pinned: Some(Utc.from_utc_datetime(&utc_noon)),
        }
    }

    /// The raw instant used for `updated_at` and `created_at` stamps
    pub fn instant(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }

    /// Current instant shifted to the civil offset
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.instant().with_timezone(&self.offset)
    }

    /// Today's civil date
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// The civil date `n` calendar days before today
    pub fn days_ago(&self, n: u32) -> NaiveDate {
        days_before(self.today(), n)
    }

    /// Human label for a date: "Today", "Yesterday" or e.g. "Monday, 5 Jan"
    pub fn format_display(&self, date: NaiveDate) -> String {
        let today = self.today();
        if date == today {
            "Today".to_string()
        } else if date == days_before(today, 1) {
            "Yesterday".to_string()
        } else {
            date.format("%A, %-d %b").to_string()
        }
    }
}

impl Default for CivilCalendar {
    fn default() -> Self {
        Self::ist()
    }
}

fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Calendar arithmetic: `date` minus `n` days, rolling across months and years
pub fn days_before(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN)
}

/// Every date of a month, in order
///
/// `month0` is 0-indexed (0 = January). Values of 12 and above roll into the
/// following years.
pub fn dates_in_month(year: i32, month0: u32) -> Vec<NaiveDate> {
    let year = year + (month0 / 12) as i32;
    let month = month0 % 12 + 1;

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    first.iter_days().take_while(|d| d.month() == month).collect()
}

/// Day of week, 0 = Sunday through 6 = Saturday
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_today_uses_ist_not_utc() {
        // 20:00 UTC on Jan 31 is already Feb 1 in IST
        let instant = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();
        let calendar = CivilCalendar::pinned_at(instant);
        assert_eq!(calendar.today(), date("2024-02-01"));

        // 18:29 UTC is still the same civil day
        let instant = Utc.with_ymd_and_hms(2024, 1, 31, 18, 29, 0).unwrap();
        assert_eq!(CivilCalendar::pinned_at(instant).today(), date("2024-01-31"));
    }

    #[test]
    fn test_days_ago_rolls_across_year_boundary() {
        let calendar = CivilCalendar::pinned_on(date("2024-01-02"));
        assert_eq!(calendar.days_ago(0), date("2024-01-02"));
        assert_eq!(calendar.days_ago(2), date("2023-12-31"));
        assert_eq!(calendar.days_ago(366), date("2023-01-01"));
    }

    #[test]
    fn test_dates_in_month_handles_leap_years() {
        assert_eq!(dates_in_month(2024, 1).len(), 29);
        assert_eq!(dates_in_month(2023, 1).len(), 28);
        assert_eq!(dates_in_month(2024, 0).len(), 31);

        let april = dates_in_month(2024, 3);
        assert_eq!(april.len(), 30);
        assert_eq!(format_date(april[0]), "2024-04-01");
        assert_eq!(format_date(april[29]), "2024-04-30");

        // month 12 is January of the following year
        assert_eq!(format_date(dates_in_month(2024, 12)[0]), "2025-01-01");
    }

    #[test]
    fn test_day_of_week_starts_on_sunday() {
        assert_eq!(day_of_week(date("2024-03-10")), 0); // Sunday
        assert_eq!(day_of_week(date("2024-03-16")), 6); // Saturday
    }

    #[test]
    fn test_format_display() {
        let calendar = CivilCalendar::pinned_on(date("2024-01-08"));
        assert_eq!(calendar.format_display(date("2024-01-08")), "Today");
        assert_eq!(calendar.format_display(date("2024-01-07")), "Yesterday");
        assert_eq!(calendar.format_display(date("2024-01-01")), "Monday, 1 Jan");
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("05/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert_eq!(format_date(date(" 2024-02-29 ")), "2024-02-29");
    }
}
