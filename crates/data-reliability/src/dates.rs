use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A timestamp layout and how to reduce a successful parse to a calendar date.
#[derive(Debug, Clone, Copy)]
enum Layout {
    Date(&'static str),
    Naive(&'static str),
    /// Carries an offset; the date is taken in that offset, not converted to UTC.
    Offset(&'static str),
    /// `YYYYMMDD` with no separators.
    BasicDate,
}

impl Layout {
    fn parse(self, value: &str) -> Option<NaiveDate> {
        match self {
            Layout::Date(fmt) => NaiveDate::parse_from_str(value, fmt).ok(),
            Layout::Naive(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.date()),
            Layout::Offset(fmt) => DateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.date_naive()),
            Layout::BasicDate => {
                if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let year = value[..4].parse().ok()?;
                let month = value[4..6].parse().ok()?;
                let day = value[6..].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
    }
}

/// Layouts the agents are known to emit, tried first and in this order.
const KNOWN_LAYOUTS: &[Layout] = &[
    Layout::Date("%Y-%m-%d"),
    Layout::Naive("%Y-%m-%dT%H:%M:%SZ"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
];

/// General ISO-8601 shapes, tried after `Z` has been rewritten to `+00:00`.
/// `%.f` also matches when there are no fractional seconds.
const ISO_LAYOUTS: &[Layout] = &[
    Layout::Offset("%Y-%m-%dT%H:%M:%S%.f%:z"),
    Layout::Offset("%Y-%m-%d %H:%M:%S%.f%:z"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%.f%z"),
    Layout::Offset("%Y-%m-%dT%H:%M%:z"),
    Layout::Offset("%Y-%m-%d %H:%M%:z"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%d %H:%M:%S%.f"),
    Layout::Naive("%Y-%m-%dT%H:%M"),
    Layout::Naive("%Y-%m-%d %H:%M"),
    Layout::BasicDate,
];

/// Pad an hour-only time (`2024-05-01T14`, optionally followed by an offset)
/// out to minutes. chrono will not build a time from the hour alone.
fn with_minutes(iso: &str) -> Option<String> {
    let bytes = iso.as_bytes();
    if bytes.len() < 13 || !matches!(bytes[10], b'T' | b' ') || !iso.is_char_boundary(13) {
        return None;
    }
    let (head, tail) = iso.split_at(13);
    if !head[11..].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if tail.is_empty() || tail.starts_with(['+', '-']) {
        Some(format!("{head}:00{tail}"))
    } else {
        None
    }
}

/// Parse the date part of an agent-supplied timestamp.
///
/// Returns `None` for empty or unrecognized input; callers treat that as an
/// undated record.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = KNOWN_LAYOUTS.iter().find_map(|layout| layout.parse(value)) {
        return Some(date);
    }

    let iso = value.replace('Z', "+00:00");
    let iso = with_minutes(&iso).unwrap_or(iso);
    ISO_LAYOUTS.iter().find_map(|layout| layout.parse(&iso))
}
