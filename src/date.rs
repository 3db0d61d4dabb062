//! PDF date strings
//!
//! CreationDate and ModDate hold dates in the form
//! `D:YYYYMMDDHHmmSSOHH'mm'`, where everything after the year is optional
//! and `O` is `+`, `-` or `Z`.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, TimeZone};
use crate::error::{Error, Result};

fn invalid(value: &str) -> Error {
    Error::InvalidDate(value.to_string())
}

/// Parse a PDF date string
///
/// Supported formats:
/// - `"D:2024"` → 2024-01-01 00:00:00 UTC
/// - `"D:20241120"` → 2024-11-20 00:00:00 UTC
/// - `"D:20241120153000Z"` → UTC
/// - `"D:20241120153000-03'00'"` → UTC-3
/// - `"20241120153000+0530"` → the `D:` prefix and apostrophes are optional
pub fn parse_pdf_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let raw = value.trim();
    let body = raw.strip_prefix("D:").unwrap_or(raw);

    let digit_count = body.bytes().take_while(u8::is_ascii_digit).count();
    if !(4..=14).contains(&digit_count) || digit_count % 2 != 0 {
        return Err(invalid(raw));
    }
    let (digits, zone) = body.split_at(digit_count);

    let year: i32 = digits[..4].parse().map_err(|_| invalid(raw))?;
    let field = |start: usize, default: u32| -> u32 {
        digits
            .get(start..start + 2)
            .and_then(|d| d.parse().ok())
            .unwrap_or(default)
    };

    let local = NaiveDate::from_ymd_opt(year, field(4, 1), field(6, 1))
        .and_then(|date| date.and_hms_opt(field(8, 0), field(10, 0), field(12, 0)))
        .ok_or_else(|| invalid(raw))?;

    let offset = parse_offset(zone).ok_or_else(|| invalid(raw))?;

    offset
        .from_local_datetime(&local)
        .single()
        .ok_or_else(|| invalid(raw))
}

/// Parse the zone suffix: empty, `Z...`, or `(+|-)HH['mm[']]`
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let mut chars = zone.chars();
    let sign = match chars.next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };

    let rest = chars.as_str().replace('\'', "");
    if !(rest.len() == 2 || rest.len() == 4) || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = rest[..2].parse().ok()?;
    let minutes: i32 = match rest.get(2..4) {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Format a date as a PDF date string: `D:YYYYMMDDHHmmSS+HH'mm'`
pub fn format_pdf_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let offset_seconds = date.offset().fix().local_minus_utc();
    let sign = if offset_seconds >= 0 { '+' } else { '-' };
    let offset_seconds = offset_seconds.abs();

    format!(
        "D:{}{}{:02}'{:02}'",
        date.naive_local().format("%Y%m%d%H%M%S"),
        sign,
        offset_seconds / 3600,
        (offset_seconds % 3600) / 60
    )
}

/// Current local time as a PDF date string
pub fn now_pdf_date() -> String {
    format_pdf_date(&Local::now())
}

/// Human-readable rendering of a PDF date, e.g. `2024-11-20 15:30:00 -03:00`
///
/// Values that don't parse are returned unchanged.
pub fn display_pdf_date(value: &str) -> String {
    match parse_pdf_date(value) {
        Ok(date) => date.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        Err(_) => value.to_string(),
    }
}
