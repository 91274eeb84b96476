use num_format::{Locale, ToFormattedString};

/// Locale-aware integer formatting for metric cards and table cells,
/// e.g. `1234567 -> "1,234,567"`.
pub fn format_int(n: i64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Fixed-decimal formatting with thousands separators in the integer part.
/// Grouping works on the formatted digit string, so magnitudes beyond the
/// i64 range keep their value; non-finite inputs render as `inf`/`NaN`.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac) = match s.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (s.as_str(), None),
    };
    let mut out = String::with_capacity(s.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    if neg {
        format!("-{}", out)
    } else {
        out
    }
}

/// Minimal HTML escaping for values interpolated into markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
