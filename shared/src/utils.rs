// Display formatting shared by the export serializer and the CLI table.

/// Two decimals with `,` thousands grouping, e.g. `1,234.50`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// A fraction rendered on the percent scale: `0.1234` -> `12.34%`.
pub fn format_percentage(fraction: f64) -> String {
    format!("{}%", format_amount(fraction * 100.0))
}

/// A value already in percentage points: `12.346` -> `12.35%`.
pub fn format_percentage_points(points: f64) -> String {
    format!("{}%", format_amount(points))
}
