//! Date rendering with moment-style patterns on top of `chrono`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use flowmap_core::{DataValue, DisplayTimezone};

/// Tokens in match priority order: longer tokens shadow their prefixes.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("SSS", "%3f"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Translate a moment-style pattern into a `chrono` format string.
///
/// Text inside `[...]` is literal.
pub fn translate_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('[') {
            let (literal, tail) = match stripped.find(']') {
                Some(end) => (&stripped[..end], &stripped[end + 1..]),
                None => (stripped, ""),
            };
            push_literal(&mut out, literal);
            rest = tail;
            continue;
        }
        for (token, spec) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            push_literal(&mut out, c.encode_utf8(&mut [0; 4]));
        }
        rest = chars.as_str();
    }
    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Interpret a sample as an instant: numbers are epoch milliseconds,
/// text is RFC 3339 or an epoch-milliseconds number.
pub fn parse_instant(value: &DataValue) -> Option<DateTime<Utc>> {
    match value {
        DataValue::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        DataValue::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            s.parse::<f64>()
                .ok()
                .filter(|ms| ms.is_finite())
                .and_then(|ms| DateTime::from_timestamp_millis(ms as i64))
        }
        _ => None,
    }
}

/// Render `value` with a moment-style `pattern`, `None` when the value is
/// not a date or the pattern does not translate.
pub fn format_date(value: &DataValue, pattern: &str, timezone: DisplayTimezone) -> Option<String> {
    let instant = parse_instant(value)?;
    let spec = translate_pattern(pattern);
    let items: Vec<Item<'_>> = StrftimeItems::new(&spec).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return None;
    }
    let rendered = match timezone {
        DisplayTimezone::Utc => instant.format_with_items(items.into_iter()).to_string(),
        DisplayTimezone::Local => instant
            .with_timezone(&Local)
            .format_with_items(items.into_iter())
            .to_string(),
    };
    Some(rendered)
}
