//! Number formatting in the dashboard locale
//!
//! Thousands are grouped by three and separated with a space, the decimal
//! mark is a point: `12 345.6`.

const THOUSANDS: char = ' ';

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS);
        }
        out.push(ch);
    }
    out
}

fn group_number(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let mut out = String::from(sign);
    out.push_str(&group_digits(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Whole device count: `1 234`
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Shortest representation with grouping: `1 234.5`, `0.25`, `100`
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // Avoid "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    group_number(&value.to_string())
}

/// Fixed decimals with grouping: `format_fixed(1234.56, 1)` = `1 234.6`
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.*}", decimals, value);
    let text = match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    };
    group_number(&text)
}
