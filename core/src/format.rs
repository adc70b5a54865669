//! Display formatting
//!
//! Pure functions turning raw model values into display strings. Output
//! matches en-US conventions: `,` thousands separator, `.` decimal point.

/// Whole-dollar USD, e.g. `1234567.4` → `"$1,234,567"`, `-50` → `"-$50"`.
///
/// Rounds half away from zero. Non-finite input renders as `"$0"`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Grouped decimal with at most three fraction digits, e.g. `1234.5` → `"1,234.5"`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = group_thousands(int_part);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    if n < 0.0 && out != "0" {
        out.insert(0, '-');
    }
    out
}

/// Ratio as a percentage with one decimal place, e.g. `0.452` → `"45.2%"`.
pub fn format_percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return "0.0%".to_string();
    }
    format!("{:.1}%", ratio * 100.0)
}

/// Snake-case key to title text, e.g. `"large_customer_revenue"` → `"Large Customer Revenue"`.
///
/// Underscores become spaces and the first character of every word is
/// upper-cased; all other characters are kept as they are.
pub fn format_label(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Insert `,` between every group of three digits.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}
