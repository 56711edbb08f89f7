use chrono::NaiveDate;

/// Converts a UTC calendar date into nanoseconds since the UNIX epoch.
///
/// `month` and `day` are 1-based. Returns `None` if the date or time is
/// invalid, or if the instant falls before 1970 or beyond the `u64` range.
///
/// # Example
/// ```
/// use shortid::{DEFAULT_EPOCH, utc_date_nanos};
///
/// assert_eq!(utc_date_nanos(2016, 1, 1, 0, 0, 0, 0), Some(DEFAULT_EPOCH));
/// ```
pub fn utc_date_nanos(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
) -> Option<u64> {
    let nanos = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_milli_opt(hour, minute, second, millis)?
        .and_utc()
        .timestamp_nanos_opt()?;
    u64::try_from(nanos).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_EPOCH, UNIX_EPOCH};

    #[test]
    fn default_epoch_is_2016_new_year() {
        assert_eq!(utc_date_nanos(2016, 1, 1, 0, 0, 0, 0), Some(DEFAULT_EPOCH));
        assert_eq!(utc_date_nanos(1970, 1, 1, 0, 0, 0, 0), Some(UNIX_EPOCH));
    }

    #[test]
    fn carries_time_of_day_and_millis() {
        let base = utc_date_nanos(2016, 1, 1, 0, 0, 0, 0).unwrap();
        let later = utc_date_nanos(2016, 1, 1, 1, 2, 3, 4).unwrap();
        assert_eq!(later - base, ((3600 + 2 * 60 + 3) * 1000 + 4) * 1_000_000);
    }

    #[test]
    fn rejects_invalid_or_pre_unix_dates() {
        assert_eq!(utc_date_nanos(2016, 2, 30, 0, 0, 0, 0), None);
        assert_eq!(utc_date_nanos(2016, 13, 1, 0, 0, 0, 0), None);
        assert_eq!(utc_date_nanos(2016, 1, 1, 24, 0, 0, 0), None);
        assert_eq!(utc_date_nanos(1969, 12, 31, 23, 59, 59, 999), None);
    }
}
