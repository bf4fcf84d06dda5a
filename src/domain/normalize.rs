//! Display-ready values derived from decoded records.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::FormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use super::record::Record;

pub const ELLIPSIS: &str = "...";

const MONTH_YEAR_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [year]");
const DATE_ONLY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const LOCAL_DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// URL slug for a record, taken from `name_field` or else `fallback_field`.
///
/// The output only holds `[a-z0-9]` runs joined by single hyphens, so
/// applying it to its own output is a no-op.
pub fn record_slug(record: &Record, name_field: &str, fallback_field: &str) -> String {
    let source = record
        .text(name_field)
        .or_else(|| record.text(fallback_field))
        .unwrap_or_default();
    slugify(&source)
}

/// Lower-case `text` and join its `[a-z0-9]` runs with single hyphens.
/// Every other character, accented letters included, acts as a separator.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separated = false;
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if separated && !slug.is_empty() {
                slug.push('-');
            }
            separated = false;
            slug.push(ch);
        } else {
            separated = true;
        }
    }
    slug
}

/// First `max_len` characters of `text`, with [`ELLIPSIS`] appended when
/// anything was cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones.
/// Order and duplicates are kept.
pub fn tag_list(comma_separated: &str) -> Vec<String> {
    comma_separated
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an ISO-8601 timestamp. RFC 3339 values keep their offset, while
/// bare dates and offset-less date-times are read as UTC.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(value);
    }
    if let Ok(value) = PrimitiveDateTime::parse(text, LOCAL_DATETIME_FORMAT) {
        return Some(value.assume_utc());
    }
    Date::parse(text, DATE_ONLY_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Render a timestamp as `5th Jun 2024`. Returns `None` for unparsable input.
pub fn pretty_date(iso: &str) -> Option<String> {
    parse_timestamp(iso).and_then(|value| format_day(value.date()))
}

pub fn format_day(date: Date) -> Option<String> {
    let day = date.day();
    let month_year = date.format(MONTH_YEAR_FORMAT).ok()?;
    Some(format!("{day}{} {month_year}", ordinal_suffix(day)))
}

/// Suffix picked from the last digit alone, so the 11th renders as `11st`.
/// Published dates have always rendered this way.
pub fn ordinal_suffix(day: u8) -> &'static str {
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}
