//! Built-in unit catalog.
//!
//! Covers the units panels use most; the host can inject a complete
//! catalog through [`super::ValueFormatter`].

const SHORT: &[&str] = &["", " K", " Mil", " Bil", " Tri", " Quadr", " Quint", " Sext", " Sept"];
const BINARY_BYTES: &[&str] = &[" B", " KiB", " MiB", " GiB", " TiB", " PiB", " EiB", " ZiB", " YiB"];
const DECIMAL_BYTES: &[&str] = &[" B", " kB", " MB", " GB", " TB", " PB", " EB", " ZB", " YB"];
const HERTZ: &[&str] = &[" Hz", " kHz", " MHz", " GHz", " THz", " PHz", " EHz", " ZHz", " YHz"];

pub const KNOWN_UNITS: &[&str] = &[
    "none", "short", "percent", "percentunit", "bytes", "decbytes", "ms", "s", "dB", "hertz",
];

pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_UNITS.contains(&unit)
}

/// Most decimal places a fixed-point rendering carries, as with `toFixed`.
pub const MAX_DECIMALS: u32 = 20;

/// Round half up, like the host's `Math.round`.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Fixed-point rendering: round to `decimals`, then pad with zeros up to
/// exactly `decimals` places. Zero is never padded. `decimals` is capped
/// at [`MAX_DECIMALS`].
pub fn to_fixed(value: f64, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    // Past f64 range the value has no fractional digits left to round.
    let rounded = if scaled.is_finite() {
        round_half_up(scaled) / factor
    } else {
        value
    };
    let formatted = rounded.to_string();
    if value == 0.0 || decimals == 0 {
        return formatted;
    }

    let precision = formatted
        .find('.')
        .map(|pos| formatted.len() - pos - 1)
        .unwrap_or(0);
    if precision >= decimals as usize {
        return formatted;
    }
    let mut padded = formatted;
    if precision == 0 {
        padded.push('.');
    }
    padded.extend(std::iter::repeat('0').take(decimals as usize - precision));
    padded
}

/// Divide by `factor` until below it, picking the matching suffix.
fn scaled(value: f64, decimals: u32, factor: f64, suffixes: &[&str]) -> String {
    let mut size = value;
    let mut steps = 0;
    while size.abs() >= factor {
        steps += 1;
        size /= factor;
        if steps >= suffixes.len() {
            return "NA".to_string();
        }
    }
    format!("{}{}", to_fixed(size, decimals), suffixes[steps])
}

fn milliseconds(size: f64, decimals: u32) -> String {
    let abs = size.abs();
    if abs < 1000.0 {
        format!("{} ms", to_fixed(size, decimals))
    } else if abs < 60_000.0 {
        format!("{} s", to_fixed(size / 1000.0, decimals))
    } else if abs < 3_600_000.0 {
        format!("{} min", to_fixed(size / 60_000.0, decimals))
    } else if abs < 86_400_000.0 {
        format!("{} hour", to_fixed(size / 3_600_000.0, decimals))
    } else if abs < 31_536_000_000.0 {
        format!("{} day", to_fixed(size / 86_400_000.0, decimals))
    } else {
        format!("{} year", to_fixed(size / 31_536_000_000.0, decimals))
    }
}

fn seconds(size: f64, decimals: u32) -> String {
    let abs = size.abs();
    if abs < 0.000_001 && abs > 0.0 {
        format!("{} ns", to_fixed(size * 1e9, decimals))
    } else if abs < 0.001 && abs > 0.0 {
        format!("{} µs", to_fixed(size * 1e6, decimals))
    } else if abs < 1.0 && abs > 0.0 {
        format!("{} ms", to_fixed(size * 1e3, decimals))
    } else if abs < 60.0 {
        format!("{} s", to_fixed(size, decimals))
    } else if abs < 3600.0 {
        format!("{} min", to_fixed(size / 60.0, decimals))
    } else if abs < 86_400.0 {
        format!("{} hour", to_fixed(size / 3600.0, decimals))
    } else if abs < 604_800.0 {
        format!("{} day", to_fixed(size / 86_400.0, decimals))
    } else if abs < 31_536_000.0 {
        format!("{} week", to_fixed(size / 604_800.0, decimals))
    } else {
        format!("{} year", to_fixed(size / 3.15569e7, decimals))
    }
}

/// Format `value` in `unit`. Unknown units render as plain fixed-point.
pub fn format_unit(value: f64, unit: &str, decimals: u32) -> String {
    match unit {
        "short" => scaled(value, decimals, 1000.0, SHORT),
        "percent" => format!("{}%", to_fixed(value, decimals)),
        "percentunit" => format!("{}%", to_fixed(value * 100.0, decimals)),
        "bytes" => scaled(value, decimals, 1024.0, BINARY_BYTES),
        "decbytes" => scaled(value, decimals, 1000.0, DECIMAL_BYTES),
        "ms" => milliseconds(value, decimals),
        "s" => seconds(value, decimals),
        "dB" => format!("{} dB", to_fixed(value, decimals)),
        "hertz" => scaled(value, decimals, 1000.0, HERTZ),
        _ => to_fixed(value, decimals),
    }
}
