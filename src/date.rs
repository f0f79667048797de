//! AMZ-format date production and the numeric day key used by the
//! signing-key cache.

use chrono::{DateTime, Datelike, Utc};

/// A frozen point in time used both to format the `x-amz-date` header and
/// to key the signing-key cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmzDate {
    instant: DateTime<Utc>,
}

impl AmzDate {
    pub fn now() -> Self {
        Self { instant: Utc::now() }
    }

    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// `YYYYMMDDTHHMMSSZ`, zero-padded, UTC.
    pub fn amz_date(&self) -> String {
        self.instant.format("%Y%m%dT%H%M%SZ").to_string()
    }

    /// `YYYYMMDD`, the date-stamp portion of the credential scope.
    pub fn date_stamp(&self) -> String {
        self.instant.format("%Y%m%d").to_string()
    }

    /// UTC day boundary as a numeric key (days since the UNIX epoch).
    /// Two `AmzDate`s sharing this value derive the same `kSigning`.
    pub fn numeric_day(&self) -> i64 {
        self.instant.num_days_from_ce() as i64 - Self::ce_epoch_offset()
    }

    const fn ce_epoch_offset() -> i64 {
        // chrono's CE day count for 1970-01-01; kept as a constant so
        // numeric_day() returns a small, cache-friendly integer rather than
        // the raw (and much larger) CE ordinal.
        719_163
    }
}

impl Default for AmzDate {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_reference_example_date() {
        let instant = Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap();
        let date = AmzDate::from_utc(instant);
        assert_eq!(date.amz_date(), "20130524T000000Z");
        assert_eq!(date.date_stamp(), "20130524");
    }

    #[test]
    fn numeric_day_is_stable_within_a_day_and_advances_across_days() {
        let morning = AmzDate::from_utc(Utc.with_ymd_and_hms(2026, 7, 26, 1, 0, 0).unwrap());
        let evening = AmzDate::from_utc(Utc.with_ymd_and_hms(2026, 7, 26, 23, 59, 0).unwrap());
        let next_day = AmzDate::from_utc(Utc.with_ymd_and_hms(2026, 7, 27, 0, 0, 1).unwrap());

        assert_eq!(morning.numeric_day(), evening.numeric_day());
        assert_eq!(morning.numeric_day() + 1, next_day.numeric_day());
    }
}
