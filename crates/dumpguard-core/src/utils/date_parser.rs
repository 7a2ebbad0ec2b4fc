use arrow_array::{Array, StringArray, TimestampMicrosecondArray};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::LoadError;

/// Timezone attached to every parsed timestamp column
pub const UTC_TZ: &str = "UTC";

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.fZ",
    "%Y-%m-%d %H:%M",
];

/// Parse a single timestamp into UTC.
///
/// Values carrying an offset are converted; naive values and bare dates are
/// taken to already be in UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Convert a text column into a UTC microsecond timestamp column.
///
/// Nulls and blank cells stay null. Any other cell that cannot be parsed
/// fails the whole column.
pub fn parse_timestamp_column(
    column: &str,
    array: &StringArray,
) -> Result<TimestampMicrosecondArray, LoadError> {
    let mut values = Vec::with_capacity(array.len());
    for (row, cell) in array.iter().enumerate() {
        match cell {
            None => values.push(None),
            Some(text) if text.trim().is_empty() => values.push(None),
            Some(text) => match parse_timestamp(text) {
                Some(dt) => values.push(Some(dt.timestamp_micros())),
                None => {
                    return Err(LoadError::DateParse {
                        column: column.to_string(),
                        row,
                        value: text.to_string(),
                    });
                }
            },
        }
    }
    Ok(TimestampMicrosecondArray::from(values).with_timezone(UTC_TZ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_timestamp("2024-12-02T19:00:00Z"),
            Some(utc(2024, 12, 2, 19, 0, 0))
        );
    }

    #[test]
    fn test_parse_pandas_style_offset() {
        assert_eq!(
            parse_timestamp("2024-12-02 19:00:00.000000+00:00"),
            Some(utc(2024, 12, 2, 19, 0, 0))
        );
    }

    #[test]
    fn test_parse_converts_offset_to_utc() {
        assert_eq!(
            parse_timestamp("2024-12-03 04:00:00+09:00"),
            Some(utc(2024, 12, 2, 19, 0, 0))
        );
    }

    #[test]
    fn test_parse_naive_is_utc() {
        assert_eq!(
            parse_timestamp("2024-12-02 19:30:15"),
            Some(utc(2024, 12, 2, 19, 30, 15))
        );
        assert_eq!(
            parse_timestamp("2024-12-02T19:30:15.250"),
            Some(utc(2024, 12, 2, 19, 30, 15) + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_parse_date_only() {
        assert_eq!(parse_timestamp("2024-12-03"), Some(utc(2024, 12, 3, 0, 0, 0)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
    }

    #[test]
    fn test_parse_column_keeps_nulls() {
        let array = StringArray::from(vec![Some("2024-12-02 19:00:00"), None, Some(" ")]);
        let parsed = parse_timestamp_column("DateCreated", &array).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.null_count(), 2);
        assert_eq!(parsed.value(0), utc(2024, 12, 2, 19, 0, 0).timestamp_micros());
    }

    #[test]
    fn test_parse_column_reports_bad_cell() {
        let array = StringArray::from(vec![Some("2024-12-02"), Some("not a date")]);
        match parse_timestamp_column("DateModified", &array) {
            Err(LoadError::DateParse { column, row, value }) => {
                assert_eq!(column, "DateModified");
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("Expected DateParse error, got {:?}", other),
        }
    }
}
