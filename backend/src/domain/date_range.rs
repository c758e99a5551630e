//! Reporting windows.
//!
//! Query strings accept either a calendar date (`2025-01-31`) or a full
//! RFC 3339 timestamp. Both ends are inclusive; a date-only end covers the
//! whole day. Internally the window is half-open at millisecond precision,
//! which matches how timestamps are stored.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SubsecRound, TimeZone, Utc};

use super::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<DateTime<Utc>>,
    end_exclusive: Option<DateTime<Utc>>,
}

impl DateRange {
    /// The unbounded window
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(start: Option<&str>, end: Option<&str>) -> DomainResult<Self> {
        let start_raw = start.map(str::trim).filter(|s| !s.is_empty());
        let end_raw = end.map(str::trim).filter(|s| !s.is_empty());

        let range = Self {
            start: start_raw.map(parse_start).transpose()?,
            end_exclusive: end_raw.map(parse_end).transpose()?,
        };

        if let (Some(start), Some(end)) = (range.start, range.end_exclusive) {
            if start >= end {
                return Err(DomainError::InvalidDateRange {
                    start: start_raw.unwrap_or_default().to_string(),
                    end: end_raw.unwrap_or_default().to_string(),
                });
            }
        }

        Ok(range)
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end_exclusive(&self) -> Option<DateTime<Utc>> {
        self.end_exclusive
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *timestamp >= start)
            && self.end_exclusive.map_or(true, |end| *timestamp < end)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn parse_timestamp(raw: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidDate(raw.to_string()))
}

fn parse_start(raw: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(midnight(date));
    }

    let timestamp = parse_timestamp(raw)?;
    let truncated = timestamp.trunc_subsecs(3);
    // Round up so a stored millisecond before the bound is not included
    if truncated < timestamp {
        Ok(truncated + Duration::milliseconds(1))
    } else {
        Ok(truncated)
    }
}

fn parse_end(raw: &str) -> DomainResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let next_day = date
            .succ_opt()
            .ok_or_else(|| DomainError::InvalidDate(raw.to_string()))?;
        return Ok(midnight(next_day));
    }

    Ok(parse_timestamp(raw)?.trunc_subsecs(3) + Duration::milliseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_date_only_bounds_cover_whole_days() {
        let range = DateRange::parse(Some("2025-01-10"), Some("2025-01-10")).unwrap();

        assert!(range.contains(&at("2025-01-10T00:00:00Z")));
        assert!(range.contains(&at("2025-01-10T23:59:59.999Z")));
        assert!(!range.contains(&at("2025-01-09T23:59:59.999Z")));
        assert!(!range.contains(&at("2025-01-11T00:00:00Z")));
    }

    #[test]
    fn test_timestamp_bounds_are_inclusive() {
        let range =
            DateRange::parse(Some("2025-01-10T08:00:00Z"), Some("2025-01-10T18:00:00Z")).unwrap();

        assert!(range.contains(&at("2025-01-10T08:00:00Z")));
        assert!(range.contains(&at("2025-01-10T18:00:00Z")));
        assert!(!range.contains(&at("2025-01-10T18:00:00.001Z")));
        assert!(!range.contains(&at("2025-01-10T07:59:59.999Z")));
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let range = DateRange::parse(Some("2025-01-10T05:30:00+05:30"), None).unwrap();
        assert_eq!(range.start(), Some(at("2025-01-10T00:00:00Z")));
        assert_eq!(range.end_exclusive(), None);
    }

    #[test]
    fn test_missing_and_blank_bounds_are_open() {
        let range = DateRange::parse(Some(""), None).unwrap();
        assert_eq!(range, DateRange::all());
        assert!(range.contains(&at("1999-12-31T23:59:59Z")));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            DateRange::parse(Some("10/01/2025"), None),
            Err(DomainError::InvalidDate(_))
        ));
        assert!(matches!(
            DateRange::parse(Some("2025-02-01"), Some("2025-01-31")),
            Err(DomainError::InvalidDateRange { .. })
        ));
    }
}
