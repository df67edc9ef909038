//! Day-of-year date strings.
//!
//! Time masks and model spans use the `YYYY:DOY[:HH:MM[:SS[.sss]]]` notation
//! common in spacecraft operations. Dates are naive UTC instants.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a `YYYY:DOY` style date.
///
/// Accepted forms: `YYYY:DOY`, `YYYY:DOY:HH:MM`, `YYYY:DOY:HH:MM:SS`,
/// `YYYY:DOY:HH:MM:SS.sss`.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, String> {
    let s = raw.trim();
    let parts: Vec<&str> = s.split(':').collect();
    if !(parts.len() == 2 || parts.len() == 4 || parts.len() == 5) {
        return Err(format!("'{s}' is not a YYYY:DOY[:HH:MM[:SS]] date"));
    }

    let year: i32 = parse_field(parts[0], "year", 4)?;
    let doy: u32 = parse_field(parts[1], "day of year", 3)?;
    let date = NaiveDate::from_yo_opt(year, doy)
        .ok_or_else(|| format!("'{s}': day {doy} does not exist in {year}"))?;

    let (hour, minute) = if parts.len() >= 4 {
        (
            parse_field::<u32>(parts[2], "hour", 2)?,
            parse_field::<u32>(parts[3], "minute", 2)?,
        )
    } else {
        (0, 0)
    };

    let (second, nanos) = match parts.get(4) {
        Some(sec) => parse_seconds(sec).ok_or_else(|| format!("'{s}': bad seconds '{sec}'"))?,
        None => (0, 0),
    };

    let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
        .ok_or_else(|| format!("'{s}': time of day out of range"))?;
    Ok(NaiveDateTime::new(date, time))
}

/// Canonical `YYYY:DOY:HH:MM:SS.sss` representation.
pub fn format_date(t: NaiveDateTime) -> String {
    t.format("%Y:%j:%H:%M:%S%.3f").to_string()
}

fn parse_field<T: std::str::FromStr>(raw: &str, what: &str, max_len: usize) -> Result<T, String> {
    if raw.is_empty() || raw.len() > max_len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("bad {what} '{raw}'"));
    }
    raw.parse::<T>().map_err(|_| format!("bad {what} '{raw}'"))
}

fn parse_seconds(raw: &str) -> Option<(u32, u32)> {
    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };
    if whole.is_empty() || whole.len() > 2 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds = whole.parse().ok()?;
    let nanos = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}").parse().ok()?
    };
    Some((seconds, nanos))
}
