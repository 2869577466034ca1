//! Monetary values in fixed-point units of a millionth.
//!
//! Prices reach the page as display strings (`"RM10.00"`). They are parsed into
//! `Money` once, at the edge. Sub-cent digits are kept so that line totals
//! round to cents only once, when the amount is shown.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::DEFAULT_CURRENCY;

const FRACTION_DIGITS: usize = 6;
const UNITS_PER_MAJOR: i64 = 1_000_000;
const UNITS_PER_MINOR: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Money {
    units: i64,
    currency: String,
}

impl Money {
    pub fn from_minor(minor: i64, currency: impl Into<String>) -> Self {
        Self {
            units: minor.saturating_mul(UNITS_PER_MINOR),
            currency: currency.into(),
        }
    }

    pub fn zero(currency: impl Into<String>) -> Self {
        Self::from_minor(0, currency)
    }

    /// Whole cents, rounded half away from zero.
    pub fn minor(&self) -> i64 {
        let half = UNITS_PER_MINOR / 2;
        let nudged = if self.units < 0 {
            self.units.saturating_sub(half)
        } else {
            self.units.saturating_add(half)
        };
        nudged / UNITS_PER_MINOR
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Parse a display price leniently.
    ///
    /// Every character other than an ASCII digit or `.` is dropped, then the
    /// longest leading decimal number is read (`"1.2.3"` reads as `1.2`).
    /// Anything unreadable is zero. The currency is the symbol or code written
    /// directly before the number (`"Price: RM10"` gives `RM`, `"$4"` gives
    /// `$`), or `default_currency` when there is none.
    pub fn parse_display(raw: &str, default_currency: &str) -> Self {
        let currency = currency_prefix(raw);
        let currency = if currency.is_empty() {
            default_currency
        } else {
            currency
        };

        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        Self {
            units: parse_leading_decimal_units(&cleaned),
            currency: currency.to_string(),
        }
    }

    /// Price times quantity. Saturates instead of wrapping.
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            units: self.units.saturating_mul(i64::from(quantity)),
            currency: self.currency.clone(),
        }
    }

    pub fn saturating_add(&self, other: &Money) -> Self {
        Self {
            units: self.units.saturating_add(other.units),
            currency: self.currency.clone(),
        }
    }

    /// The bare amount rounded to cents, e.g. `"25.50"`.
    pub fn amount(&self) -> String {
        let minor = self.minor();
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }

    /// The bare amount with every stored digit and at least two decimals,
    /// e.g. `"10.00"` or `"0.005"`.
    fn exact_amount(&self) -> String {
        let sign = if self.units < 0 { "-" } else { "" };
        let abs = self.units.unsigned_abs();
        let major = abs / UNITS_PER_MAJOR as u64;
        let frac = format!("{:0width$}", abs % UNITS_PER_MAJOR as u64, width = FRACTION_DIGITS);
        let frac = frac.trim_end_matches('0');
        format!("{sign}{major}.{frac:0<2}")
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(DEFAULT_CURRENCY)
    }
}

/// Shows the price as written, sub-cent digits included: `RM10.00`, `$0.005`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency, self.exact_amount())
    }
}

fn is_currency_char(c: char) -> bool {
    c.is_alphabetic()
        || c == '$'
        || (!c.is_ascii() && !c.is_alphanumeric() && !c.is_whitespace())
}

/// The run of currency characters ending right before the number in `raw`,
/// ignoring whitespace in between.
fn currency_prefix(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    let number_start = (0..bytes.len())
        .find(|&i| {
            bytes[i].is_ascii_digit()
                || (bytes[i] == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        })
        .unwrap_or(bytes.len());
    let before = raw[..number_start].trim_end();
    let start = before
        .char_indices()
        .rev()
        .take_while(|&(_, c)| is_currency_char(c))
        .last()
        .map_or(before.len(), |(i, _)| i);
    &before[start..]
}

/// Read `digits[.digits]` from the front of `s` in millionths. Digits past
/// the sixth decimal round half up.
fn parse_leading_decimal_units(s: &str) -> i64 {
    let bytes = s.as_bytes();
    let mut i = 0;

    let mut major: i64 = 0;
    let mut saw_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        major = major
            .saturating_mul(10)
            .saturating_add(i64::from(bytes[i] - b'0'));
        saw_digit = true;
        i += 1;
    }

    let mut frac: i64 = 0;
    let mut round_up = false;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let mut n = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            let d = bytes[i] - b'0';
            if n < FRACTION_DIGITS {
                frac = frac * 10 + i64::from(d);
            } else if n == FRACTION_DIGITS {
                round_up = d >= 5;
            }
            n += 1;
            saw_digit = true;
            i += 1;
        }
        for _ in n..FRACTION_DIGITS {
            frac *= 10;
        }
    }

    if !saw_digit {
        return 0;
    }

    major
        .saturating_mul(UNITS_PER_MAJOR)
        .saturating_add(frac)
        .saturating_add(i64::from(round_up))
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Stored prices keep whatever currency they were written with. Bare numbers
/// carry none.
struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a price string such as \"RM10.00\" or a number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Ok(Money::parse_display(v, ""))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let major = i64::try_from(v).unwrap_or(i64::MAX);
        Ok(Money {
            units: major.saturating_mul(UNITS_PER_MAJOR),
            currency: String::new(),
        })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Ok(Money {
            units: v.saturating_mul(UNITS_PER_MAJOR),
            currency: String::new(),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let units = if v.is_finite() {
            (v * UNITS_PER_MAJOR as f64).round() as i64
        } else {
            0
        };
        Ok(Money {
            units,
            currency: String::new(),
        })
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero(""))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rm(s: &str) -> Money {
        Money::parse_display(s, "RM")
    }

    #[test]
    fn parses_prefixed_prices() {
        assert_eq!(rm("RM10.00").minor(), 1000);
        assert_eq!(rm("RM5.50").minor(), 550);
        assert_eq!(rm("RM5.50").currency(), "RM");
        assert_eq!(rm(" USD 1,299.9").minor(), 129_990);
        assert_eq!(rm(" USD 1,299.9").currency(), "USD");
    }

    #[test]
    fn unreadable_prices_are_zero() {
        assert_eq!(rm("").minor(), 0);
        assert_eq!(rm("RM").minor(), 0);
        assert_eq!(rm("free!").minor(), 0);
        assert_eq!(rm(".").minor(), 0);
    }

    #[test]
    fn reads_only_the_leading_number() {
        assert_eq!(rm("1.2.3").minor(), 120);
        assert_eq!(rm(".5").minor(), 50);
        assert_eq!(rm("7.").minor(), 700);
    }

    #[test]
    fn sub_cent_digits_survive_until_display() {
        assert_eq!(rm("RM0.005").to_string(), "RM0.005");
        assert_eq!(rm("RM0.005").amount(), "0.01");
        assert_eq!(rm("RM0.005").times(100).amount(), "0.50");
        assert_eq!(rm("RM9.999").minor(), 1000);
        assert_eq!(rm("RM0.124").minor(), 12);
        assert_eq!(rm("RM1.0000005").to_string(), "RM1.000001");
    }

    #[test]
    fn currency_is_the_text_right_before_the_number() {
        assert_eq!(rm("Price: RM10").currency(), "RM");
        assert_eq!(rm("Price: RM10").minor(), 1000);
        assert_eq!(rm("$10.00").currency(), "$");
        assert_eq!(rm("€ 4.50").currency(), "€");
        assert_eq!(rm("US$3").currency(), "US$");
        assert_eq!(rm("Sale! 7.00").currency(), "RM");
    }

    #[test]
    fn missing_prefix_uses_default_currency() {
        let m = Money::parse_display("12.00", "EUR");
        assert_eq!(m.currency(), "EUR");
        assert_eq!(m.to_string(), "EUR12.00");
    }

    #[test]
    fn amount_always_has_two_decimals() {
        assert_eq!(Money::from_minor(2550, "RM").amount(), "25.50");
        assert_eq!(Money::from_minor(5, "RM").amount(), "0.05");
        assert_eq!(Money::from_minor(0, "RM").amount(), "0.00");
        assert_eq!(Money::from_minor(-199, "RM").amount(), "-1.99");
    }

    #[test]
    fn arithmetic_saturates() {
        let big = Money::from_minor(i64::MAX - 1, "RM");
        assert_eq!(big.times(3).minor(), i64::MAX);
        assert_eq!(big.saturating_add(&big).minor(), i64::MAX);
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&rm("RM10.00")).unwrap();
        assert_eq!(json, "\"RM10.00\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rm("RM10.00"));
    }

    #[test]
    fn stored_currency_is_kept_on_reload() {
        for raw in ["$10.00", "€0.005", "USD1299.90"] {
            let price = Money::parse_display(raw, "$");
            let json = serde_json::to_string(&price).unwrap();
            let back: Money = serde_json::from_str(&json).unwrap();
            assert_eq!(back, price, "{raw}");
        }
        let bare: Money = serde_json::from_str("\"12.00\"").unwrap();
        assert_eq!(bare.currency(), "");
    }

    #[test]
    fn deserializes_bare_numbers() {
        let m: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(m.minor(), 1250);
        let m: Money = serde_json::from_str("3").unwrap();
        assert_eq!(m.minor(), 300);
    }
}
