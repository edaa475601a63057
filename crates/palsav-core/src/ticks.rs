use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};

/// Number of 100ns ticks in one microsecond.
const TICKS_PER_MICRO: i64 = 10;

/// Converts a 100ns tick count since `0001-01-01T00:00:00` into an ISO-8601
/// string carrying the local UTC offset. Sub-microsecond precision is dropped.
///
/// `None` maps to `None`, and so does a tick count whose date falls outside
/// the representable calendar range.
pub fn ticks_to_local_iso(ticks: Option<i64>) -> Option<String> {
    let dt = ticks_to_local(ticks?)?;
    let fmt = if dt.timestamp_subsec_micros() == 0 {
        "%Y-%m-%dT%H:%M:%S%:z"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f%:z"
    };
    Some(dt.format(fmt).to_string())
}

/// The tick count is read as local wall-clock time.
pub fn ticks_to_local(ticks: i64) -> Option<DateTime<Local>> {
    let naive = ticks_to_naive(ticks)?;
    match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => Some(dt),
        // inside a DST gap: no such local time, fall back to reading it as UTC
        None => Some(Local.from_utc_datetime(&naive)),
    }
}

pub fn ticks_to_naive(ticks: i64) -> Option<NaiveDateTime> {
    let epoch = NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    epoch.checked_add_signed(TimeDelta::microseconds(ticks / TICKS_PER_MICRO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_year_one() {
        let s = ticks_to_local_iso(Some(0)).unwrap();
        assert!(s.starts_with("0001-01-01T00:00:00"), "{s}");
        assert!(!s.contains('.'));
    }

    #[test]
    fn none_stays_none() {
        assert_eq!(ticks_to_local_iso(None), None);
    }

    #[test]
    fn sub_micro_ticks_are_truncated() {
        // 1 second + 1.5 microseconds
        let s = ticks_to_local_iso(Some(10_000_015)).unwrap();
        assert!(s.starts_with("0001-01-01T00:00:01.000001"), "{s}");
    }

    #[test]
    fn extremes_do_not_panic() {
        let _ = ticks_to_local_iso(Some(i64::MAX));
        let _ = ticks_to_local_iso(Some(i64::MIN));
        let _ = ticks_to_local_iso(Some(-1));
    }

    #[test]
    fn unix_epoch_tick_count() {
        let naive = ticks_to_naive(621_355_968_000_000_000).unwrap();
        assert_eq!(naive.to_string(), "1970-01-01 00:00:00");
    }
}
