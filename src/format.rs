//! Pure formatting helpers for the terminal and JSON output.
//!
//! Raw chain integers are scaled with exact U256 math; floats only appear
//! once a value is already display-bound.

use alloy_primitives::{Address, U256};
use chrono::{Local, TimeZone};

/// Truncate an address to `0xB4e1...C9Dc` form.
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Scale a raw integer down by `10^decimals` into an exact decimal string.
///
/// Always keeps at least one fraction digit and trims trailing zeros:
/// 1500000000 at 6 decimals is "1500.0", 2500000000000000000 at 18 is "2.5".
pub fn format_units(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{raw}.0");
    }
    let base = U256::from(10u8).pow(U256::from(decimals));
    let integer = raw / base;
    let fraction = raw % base;

    let mut frac = format!("{:0>width$}", fraction, width = decimals as usize);
    while frac.len() > 1 && frac.ends_with('0') {
        frac.pop();
    }
    format!("{integer}.{frac}")
}

/// Thousands-separated display of an already-scaled value, capped at
/// `max_fraction_digits` fraction digits with trailing zeros dropped.
/// Sub-micro magnitudes fall back to exponential notation.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value > 0.0 && value < 1e-6 {
        return format!("{value:.2e}");
    }

    let fixed = format!("{value:.max_fraction_digits$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };
    let frac = frac_part.trim_end_matches('0');
    let grouped = group_thousands(int_part);
    if frac.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac}")
    }
}

/// Price display with magnitude-aware precision.
pub fn format_price(price: f64) -> String {
    if price > 1000.0 {
        format_number(price, 2)
    } else if price > 1.0 {
        format_number(price, 4)
    } else if price > 0.01 {
        format_number(price, 5)
    } else if price > 0.0001 {
        format_number(price, 6)
    } else {
        format_number(price, 8)
    }
}

/// Unix timestamp to local wall-clock time. Zero (pair never synced) renders
/// as an empty string.
pub fn format_timestamp(timestamp: u32) -> String {
    if timestamp == 0 {
        return String::new();
    }
    match Local.timestamp_opt(i64::from(timestamp), 0) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = digits
        .strip_prefix('-')
        .map_or(("", digits), |rest| ("-", rest));
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}
