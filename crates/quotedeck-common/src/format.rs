use crate::error::{QuoteError, Result};
use crate::schema::{FormattedQuote, RawQuote, Symbol};
use crate::timestamp::trading_day;
use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UP: char = '▲';
pub const DOWN: char = '▼';

/// Render a raw provider value for display.
///
/// - absent or `null` → `"N/A"`
/// - integral → `"1,234,567"`
/// - anything else numeric → `"1,234.57"`
/// - not a number at all → the value's plain text
pub fn format_number(value: Option<&Value>) -> String {
    let value = match value {
        None | Some(Value::Null) => return NOT_AVAILABLE.to_string(),
        Some(value) => value,
    };

    match to_f64(value) {
        Some(float) => format_float(float),
        None => plain(value),
    }
}

/// [`format_number`] for a value that is already a float.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // `+ 0.0` folds -0.0 into 0.0
    let value = value + 0.0;
    if value.fract() == 0.0 {
        group_thousands(&format!("{value:.0}"))
    } else {
        let fixed = format!("{value:.2}");
        match fixed.split_once('.') {
            Some((whole, cents)) => format!("{}.{cents}", group_thousands(whole)),
            None => fixed,
        }
    }
}

/// Insert `,` between every group of three digits of a (possibly signed) integer string.
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

/// Round to two decimals, half-to-even on the exact binary value.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// `"5.00 ▲"`, `"-5.00 ▼"` or `"0.00"`.
pub fn format_change(change: f64) -> String {
    with_arrow(format!("{:.2}", change + 0.0), change)
}

/// `"5.00% ▲"`, `"-5.00% ▼"` or `"0.00%"`; the arrow follows `change`, not the percent.
pub fn format_change_percent(percent: f64, change: f64) -> String {
    with_arrow(format!("{:.2}%", percent + 0.0), change)
}

fn with_arrow(text: String, value: f64) -> String {
    if value > 0.0 {
        format!("{text} {UP}")
    } else if value < 0.0 {
        format!("{text} {DOWN}")
    } else {
        text
    }
}

/// Coerce a price the calculation depends on; missing prices count as zero.
pub fn coerce_price(value: Option<&Value>, field: &str) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => to_f64(value)
            .ok_or_else(|| QuoteError::Upstream(format!("invalid {field} value: {}", plain(value)))),
    }
}

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl FormattedQuote {
    /// Reshape the provider's latest quote record for display.
    pub fn from_raw(symbol: &Symbol, raw: &RawQuote) -> Result<FormattedQuote> {
        let prev_close = coerce_price(raw.prev_close.as_ref(), "prevClose")?;
        let last = coerce_price(raw.last.as_ref(), "last")?;

        let change = round2(last - prev_close);
        let change_percent = if prev_close != 0.0 {
            round2(change / prev_close * 100.0)
        } else {
            0.0
        };

        let trading_day = trading_day(raw.timestamp.as_deref().unwrap_or_default())?;

        Ok(FormattedQuote {
            symbol: symbol.as_str().to_uppercase(),
            trading_day,
            prev_close: format_float(prev_close),
            open: format_number(raw.open.as_ref()),
            high: format_number(raw.high.as_ref()),
            low: format_number(raw.low.as_ref()),
            last: format_float(last),
            change: format_change(change),
            change_percent: format_change_percent(change_percent, change),
            volume: format_number(raw.volume.as_ref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote(prev_close: Value, last: Value) -> RawQuote {
        RawQuote {
            ticker: Some("aapl".into()),
            timestamp: Some("2024-01-05T16:00:00.1234+00:00".into()),
            prev_close: Some(prev_close),
            last: Some(last),
            open: Some(json!(181.99)),
            high: Some(json!(182.76)),
            low: Some(json!(180.17)),
            volume: Some(json!(62303300)),
        }
    }

    fn symbol() -> Symbol {
        Symbol::parse("aapl").unwrap()
    }

    #[test]
    fn absent_values_are_not_available() {
        assert_eq!(format_number(None), "N/A");
        assert_eq!(format_number(Some(&Value::Null)), "N/A");
    }

    #[test]
    fn integral_values_are_grouped_integers() {
        assert_eq!(format_number(Some(&json!(62303300))), "62,303,300");
        assert_eq!(format_number(Some(&json!(1000.0))), "1,000");
        assert_eq!(format_number(Some(&json!(-1234567))), "-1,234,567");
        assert_eq!(format_number(Some(&json!(999))), "999");
        assert_eq!(format_number(Some(&json!(0))), "0");
        assert_eq!(format_number(Some(&json!("2500"))), "2,500");
    }

    #[test]
    fn fractional_values_get_two_decimals() {
        assert_eq!(format_number(Some(&json!(1234.5))), "1,234.50");
        assert_eq!(format_number(Some(&json!(181.18))), "181.18");
        assert_eq!(format_number(Some(&json!(-98765.4321))), "-98,765.43");
        assert_eq!(format_number(Some(&json!("12.3"))), "12.30");
    }

    #[test]
    fn uncoercible_values_fall_back_to_text() {
        assert_eq!(format_number(Some(&json!("halted"))), "halted");
        assert_eq!(format_number(Some(&json!([1, 2]))), "[1,2]");
    }

    #[test]
    fn grouping() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("-1234567"), "-1,234,567");
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(5.0), 5.0);
        assert_eq!(round2(181.91 - 181.18), 0.73);
        assert_eq!(round2(-0.004), -0.0);
    }

    #[test]
    fn change_arrows() {
        assert_eq!(format_change(5.0), "5.00 ▲");
        assert_eq!(format_change(-5.0), "-5.00 ▼");
        assert_eq!(format_change(0.0), "0.00");
        assert_eq!(format_change(-0.0), "0.00");
        assert_eq!(format_change_percent(5.0, 5.0), "5.00% ▲");
        assert_eq!(format_change_percent(-5.0, -5.0), "-5.00% ▼");
        assert_eq!(format_change_percent(0.0, 0.0), "0.00%");
        assert_eq!(format_change_percent(0.0, 0.01), "0.00% ▲");
        assert_eq!(format_change_percent(-0.0, -0.01), "0.00% ▼");
    }

    #[test]
    fn rising_quote() {
        let formatted = FormattedQuote::from_raw(&symbol(), &quote(json!(100), json!(105))).unwrap();

        assert_eq!(formatted.symbol, "AAPL");
        assert_eq!(formatted.trading_day, "2024-01-05");
        assert_eq!(formatted.prev_close, "100");
        assert_eq!(formatted.last, "105");
        assert_eq!(formatted.change, "5.00 ▲");
        assert_eq!(formatted.change_percent, "5.00% ▲");
        assert_eq!(formatted.open, "181.99");
        assert_eq!(formatted.volume, "62,303,300");
    }

    #[test]
    fn falling_quote() {
        let formatted = FormattedQuote::from_raw(&symbol(), &quote(json!(100), json!(95))).unwrap();

        assert_eq!(formatted.change, "-5.00 ▼");
        assert_eq!(formatted.change_percent, "-5.00% ▼");
    }

    #[test]
    fn zero_previous_close_has_zero_percent() {
        let formatted = FormattedQuote::from_raw(&symbol(), &quote(json!(0), json!(42.5))).unwrap();

        assert_eq!(formatted.change, "42.50 ▲");
        assert_eq!(formatted.change_percent, "0.00% ▲");
    }

    #[test]
    fn tiny_percent_keeps_the_change_arrow() {
        let up = FormattedQuote::from_raw(&symbol(), &quote(json!(600000), json!(600000.01))).unwrap();
        assert_eq!(up.change, "0.01 ▲");
        assert_eq!(up.change_percent, "0.00% ▲");

        let down = FormattedQuote::from_raw(&symbol(), &quote(json!(600000), json!(599999.99))).unwrap();
        assert_eq!(down.change, "-0.01 ▼");
        assert_eq!(down.change_percent, "0.00% ▼");
    }

    #[test]
    fn null_prices_count_as_zero() {
        let mut raw = quote(Value::Null, Value::Null);
        raw.open = None;

        let formatted = FormattedQuote::from_raw(&symbol(), &raw).unwrap();
        assert_eq!(formatted.prev_close, "0");
        assert_eq!(formatted.last, "0");
        assert_eq!(formatted.open, "N/A");
        assert_eq!(formatted.change, "0.00");
        assert_eq!(formatted.change_percent, "0.00%");
    }

    #[test]
    fn non_numeric_price_is_an_upstream_error() {
        let err = FormattedQuote::from_raw(&symbol(), &quote(json!("n/a"), json!(1))).unwrap_err();
        assert_eq!(err, QuoteError::Upstream("invalid prevClose value: n/a".into()));
    }

    #[test]
    fn bad_timestamp_propagates() {
        let mut raw = quote(json!(100), json!(101));
        raw.timestamp = None;
        assert!(matches!(
            FormattedQuote::from_raw(&symbol(), &raw),
            Err(QuoteError::Parse(_))
        ));
    }
}
