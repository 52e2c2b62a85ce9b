use chrono::offset::LocalResult;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use db_explorer_database::models::cell_value::{CellValue, TimestampValue};

pub const MAX_TEXT_LENGTH: usize = 100;

/// Timezones used to render timestamps.
///
/// `naive_source` is the zone `timestamp without time zone` values were written in,
/// `display` is the zone they are shown in. Zoned timestamps only use `display`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayZone {
    pub display: Tz,
    pub naive_source: Tz,
}

impl Default for DisplayZone {
    fn default() -> Self {
        DisplayZone { display: chrono_tz::UTC, naive_source: chrono_tz::UTC }
    }
}

pub fn format_cell(value: &CellValue, zone: &DisplayZone) -> String {
    match value {
        CellValue::Null => "null".to_string(),
        CellValue::Text(text) => truncate(text),
        CellValue::Integer(integer) => integer.to_string(),
        CellValue::Float(float) => float.to_string(),
        CellValue::Decimal(decimal) => decimal.to_string(),
        CellValue::Boolean(boolean) => boolean.to_string(),
        CellValue::Timestamp(timestamp) => format_timestamp(timestamp, zone),
        CellValue::Json(json) => truncate(&json.to_string()),
    }
}

pub fn format_timestamp(timestamp: &TimestampValue, zone: &DisplayZone) -> String {
    let utc: DateTime<Utc> = match timestamp {
        TimestampValue::Zoned(zoned) => *zoned,
        TimestampValue::Naive(naive) => match zone.naive_source.from_local_datetime(naive) {
            LocalResult::Single(local) => local.with_timezone(&Utc),
            // Falls in a DST overlap, the earlier instant wins
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            // Falls in a DST gap, no such local time exists
            LocalResult::None => return naive.format("%b %-d, %Y, %-I:%M %p").to_string(),
        },
    };
    utc.with_timezone(&zone.display).format("%b %-d, %Y, %-I:%M %p %Z").to_string()
}

pub fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_TEXT_LENGTH {
        format!("{}...", text.chars().take(MAX_TEXT_LENGTH).collect::<String>())
    } else {
        text.to_string()
    }
}

/// `$1,234.56`
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

/// `1,234,567`
pub fn format_count(count: u64) -> String {
    group_thousands(&count.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
