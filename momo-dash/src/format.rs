//! Display formatting for table cells and chart labels

use momo_core::parse_timestamp;

/// Format a whole-RWF amount with thousands separators
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let units = value.abs().round() as i64;

    let digits = units.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let formatted: String = grouped.chars().rev().collect();

    if negative {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Absent numeric fields render as a placeholder dash
pub fn format_opt_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format_amount(v),
        None => "-".to_string(),
    }
}

/// Render a record timestamp like "Jan 15, 2024"; dash when unparsable
pub fn format_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.format("%b %d, %Y").to_string(),
        None => "-".to_string(),
    }
}

/// Compact axis label (e.g. 2.1M, 450K, 50)
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 1_000_000.0 {
        format!("{}{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{:.0}K", sign, abs / 1_000.0)
    } else {
        format!("{}{:.0}", sign, abs)
    }
}
