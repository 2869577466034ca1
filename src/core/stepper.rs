/// Bounded quantity control attached to one `.qty-input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    min: u32,
    max: u32,
}

impl QuantityStepper {
    /// `min_attr` is the raw `min` attribute of the input. Absent, unreadable
    /// or zero falls back to 1. A `min` above `max` is pulled down to `max`.
    pub fn new(min_attr: Option<&str>, max: u32) -> Self {
        let max = max.max(1);
        let min = min_attr
            .and_then(parse_int_prefix)
            .filter(|&v| v != 0)
            .map_or(1, |v| v.clamp(1, i64::from(max)) as u32);
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Current field value as the controls see it: unreadable text (or 0)
    /// counts as `min`. Not clamped.
    fn current(&self, raw: &str) -> i64 {
        parse_int_prefix(raw)
            .filter(|&v| v != 0)
            .unwrap_or(i64::from(self.min))
    }

    /// New field value after pressing minus, or `None` when already at `min`.
    pub fn decrement(&self, raw: &str) -> Option<u32> {
        let v = self.current(raw);
        (v > i64::from(self.min)).then(|| self.clamp(v - 1))
    }

    /// New field value after pressing plus, or `None` when already at `max`.
    pub fn increment(&self, raw: &str) -> Option<u32> {
        let v = self.current(raw);
        (v < i64::from(self.max)).then(|| self.clamp(v + 1))
    }

    /// Value written back on `change`.
    pub fn commit(&self, raw: &str) -> u32 {
        self.clamp(self.current(raw))
    }

    fn clamp(&self, v: i64) -> u32 {
        v.clamp(i64::from(self.min), i64::from(self.max)) as u32
    }
}

/// Quantity read by the add-to-cart control: unreadable or non-positive is 1.
pub fn quantity_from_field(raw: &str) -> u32 {
    parse_int_prefix(raw)
        .filter(|&v| v > 0)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX))
}

/// Only `Enter` is swallowed in a quantity field, so typing it never submits
/// the surrounding form.
pub fn suppresses_key(key: &str) -> bool {
    key == "Enter"
}

/// Leading integer of `s`, the way form values are read: optional whitespace,
/// optional sign, then digits; anything after is ignored (`"12abc"` is 12).
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        seen = true;
    }

    seen.then_some(if negative { -value } else { value })
}
