use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Prefix-symbol currency formatting with thousands separators, e.g. `$1,250.00`.
#[derive(Debug, Clone)]
pub struct SymbolCurrencyFormatter {
    symbol: String,
    precision: usize,
}

impl SymbolCurrencyFormatter {
    pub fn new(symbol: impl Into<String>, precision: usize) -> Self {
        Self {
            symbol: symbol.into(),
            precision,
        }
    }
}

impl Default for SymbolCurrencyFormatter {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

impl CurrencyFormatter for SymbolCurrencyFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.precision, amount.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, ch) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
            "-"
        } else {
            ""
        };
        match fraction {
            Some(fraction) => format!("{sign}{}{grouped}.{fraction}", self.symbol),
            None => format!("{sign}{}{grouped}", self.symbol),
        }
    }
}

/// `MM/DD/YYYY`, the date format expenses are entered with.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsDateFormatter;

impl DateFormatter for UsDateFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%m/%d/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_and_keeps_precision() {
        let fmt = SymbolCurrencyFormatter::default();
        assert_eq!(fmt.format_amount(100.0), "$100.00");
        assert_eq!(fmt.format_amount(1234567.891), "$1,234,567.89");
        assert_eq!(fmt.format_amount(-50.5), "-$50.50");
        assert_eq!(fmt.format_amount(0.0), "$0.00");
    }

    #[test]
    fn zero_precision_omits_fraction() {
        let fmt = SymbolCurrencyFormatter::new("€", 0);
        assert_eq!(fmt.format_amount(1500.4), "€1,500");
    }

    #[test]
    fn dates_use_month_day_year() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert_eq!(UsDateFormatter.format_date(date), "02/03/2026");
    }
}
