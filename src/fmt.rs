/// `1234.5` → `$1,234.50`
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let digits: Vec<char> = whole.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",");
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Purchase cadence for display: `every 5.6 days`.
pub fn cadence(days: Option<f64>) -> String {
    match days {
        Some(d) => format!("every {d:.1} days"),
        None => "no orders in range".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(23.45), "$23.45");
        assert_eq!(money(1234.5), "$1,234.50");
        assert_eq!(money(1000000.0), "$1,000,000.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(-42.1), "-$42.10");
    }

    #[test]
    fn test_cadence() {
        assert_eq!(cadence(Some(5.6)), "every 5.6 days");
        assert_eq!(cadence(Some(0.0)), "every 0.0 days");
        assert_eq!(cadence(None), "no orders in range");
    }
}
