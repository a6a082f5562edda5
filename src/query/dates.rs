//! CLI date inputs resolved into RFC 3339 strings for the search filter.
//!
//! The filter validator is the only judge of what counts as a timestamp. This
//! module just widens what a human can type on the command line (`2024-01-15`,
//! `3d`, `this-week`) and hands anything it does not recognise through
//! untouched, so the validator reports it.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, SecondsFormat, TimeZone, Utc,
};

use super::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolved `fromDateTime` / `toDateTime` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedDates {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Resolve `--from`, `--to` and `--date` into filter timestamps.
///
/// `--date` takes precedence over the other two.
pub fn resolve_date_args(
    from: Option<&str>,
    to: Option<&str>,
    relative: Option<&str>,
    now: DateTime<Utc>,
    tz: &FixedOffset,
) -> Result<ResolvedDates, ValidationError> {
    if let Some(term) = relative {
        let range = parse_relative(term, now, tz)
            .ok_or_else(|| ValidationError::UnknownRelativeDate(term.to_string()))?;
        return Ok(ResolvedDates {
            from: Some(to_rfc3339(range.start)),
            to: Some(to_rfc3339(range.end)),
        });
    }

    Ok(ResolvedDates {
        from: from.map(|s| resolve_point(s, now, tz)),
        to: to.map(|s| resolve_point(s, now, tz)),
    })
}

fn resolve_point(s: &str, now: DateTime<Utc>, tz: &FixedOffset) -> String {
    // RFC 3339 input is kept byte-for-byte so the caller's offset survives.
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return s.to_string();
    }
    parse_date_only(s, tz)
        .or_else(|| parse_duration(s, now, tz))
        .map(to_rfc3339)
        .unwrap_or_else(|| s.to_string())
}

pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a relative term into a range. "Today" is judged in `tz`.
pub fn parse_relative(term: &str, now: DateTime<Utc>, tz: &FixedOffset) -> Option<DateRange> {
    let today = now.with_timezone(tz).date_naive();
    let (start, end) = match term {
        "today" => (today, today.succ_opt()?),
        "yesterday" => (today.pred_opt()?, today),
        "this-week" => {
            let monday = week_start(today);
            (monday, monday + Duration::days(7))
        }
        "last-week" => {
            let monday = week_start(today);
            (monday - Duration::days(7), monday)
        }
        "this-month" => {
            let first = today.with_day(1)?;
            (first, first.checked_add_months(Months::new(1))?)
        }
        "last-month" => {
            let first = today.with_day(1)?;
            (first.checked_sub_months(Months::new(1))?, first)
        }
        _ => return None,
    };

    Some(DateRange {
        start: local_midnight(start, tz)?,
        end: local_midnight(end, tz)?,
    })
}

/// `YYYY-MM-DD`, read as local midnight.
pub fn parse_date_only(s: &str, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    local_midnight(date, tz)
}

/// Duration shorthand (`3d`, `2w`, `1m`) counted back from `now`, snapped to
/// the start of that local day. Months clamp to the end of shorter months.
pub fn parse_duration(s: &str, now: DateTime<Utc>, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    if s.len() < 2 || !s.is_char_boundary(s.len() - 1) {
        return None;
    }

    let (digits, unit) = s.split_at(s.len() - 1);
    let n: u32 = digits.parse().ok()?;
    if n == 0 {
        return None;
    }

    let today = now.with_timezone(tz).date_naive();
    let day = match unit {
        "d" => today.checked_sub_signed(Duration::try_days(n as i64)?)?,
        "w" => today.checked_sub_signed(Duration::try_weeks(n as i64)?)?,
        "m" => today.checked_sub_months(Months::new(n))?,
        _ => return None,
    };

    local_midnight(day, tz)
}

fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

fn local_midnight(day: NaiveDate, tz: &FixedOffset) -> Option<DateTime<Utc>> {
    let naive = day.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
