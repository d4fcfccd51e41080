use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reads a start date as a date picker reports it.
///
/// Accepts a bare `YYYY-MM-DD` or an ISO date-time (a picker seeded with "now"
/// reports one); only the calendar date is kept. Anything else is treated as
/// no date at all.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub fn parse_start_date_opt(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(parse_start_date)
}

/// The date picker's default: today in the given zone.
pub fn today_in<Tz: TimeZone>(now: DateTime<Tz>) -> NaiveDate {
    now.date_naive()
}

pub fn today_local() -> NaiveDate {
    today_in(Local::now())
}

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}
