// Numeric helpers shared by the engine and any rendering front end.

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats a currency-like amount with two decimals, e.g. for summaries.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(2.675_000_1), 2.68);
        assert_eq!(round2(100.0 / 3.0), 33.33);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(1234.5), "1234.50");
    }
}
