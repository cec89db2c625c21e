fn group_digits(whole: i64, separator: char) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn split_cents(value: f64) -> (i64, i64) {
    let cents_total = (value.abs() * 100.0).round() as i64;
    (cents_total / 100, cents_total % 100)
}

/// Format a BRL amount as `R$ 1.234,56`
pub fn format_brl(value: f64) -> String {
    let (whole, cents) = split_cents(value);
    let sign = if value < 0.0 && (whole, cents) != (0, 0) { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, group_digits(whole, '.'), cents)
}

/// Format a USD amount as `$1,234.56`
pub fn format_usd(value: f64) -> String {
    let (whole, cents) = split_cents(value);
    let sign = if value < 0.0 && (whole, cents) != (0, 0) { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_digits(whole, ','), cents)
}

/// BRL without cents, for tight table columns
pub fn format_brl_short(value: f64) -> String {
    let whole = value.abs().round() as i64;
    let sign = if value < 0.0 && whole != 0 { "-" } else { "" };
    format!("{}R$ {}", sign, group_digits(whole, '.'))
}

/// Format a fraction as a percentage (0.045 -> 4.50%)
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Compact BRL amount (e.g., R$ 2.1M, R$ 450K, R$ 50)
pub fn format_compact_brl(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{}R$ {:.1}M", sign, abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{}R$ {:.0}K", sign, abs_value / 1_000.0)
    } else {
        format!("{}R$ {:.0}", sign, abs_value)
    }
}
