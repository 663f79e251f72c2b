use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Sum of many amounts. Wide enough that no ledger that fits in memory can
/// overflow it.
pub type TotalCents = i128;

/// Largest accepted magnitude of a single amount: one trillion units.
/// Also keeps every amount exactly representable as a JSON number.
pub const MAX_AMOUNT_CENTS: Cents = 100_000_000_000_000;

/// Format cents as a two-decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: impl Into<TotalCents>) -> String {
    let cents: TotalCents = cents.into();
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format cents in the shortest decimal form, without trailing zeros.
/// Example: 5000 -> "50", 1250 -> "12.5", 1234 -> "12.34"
pub fn format_amount_plain(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    if remainder == 0 {
        format!("{}{}", sign, units)
    } else if remainder % 10 == 0 {
        format!("{}{}.{}", sign, units, remainder / 10)
    } else {
        format!("{}{}.{:02}", sign, units, remainder)
    }
}

/// Parse a decimal string into cents, rounding half away from zero to the
/// nearest cent. Exponent notation is accepted.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "12.345" -> 1235, "1e3" -> 100000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let (negative, unsigned) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, parse_exponent(exponent)?),
        None => (unsigned, 0),
    };

    let (units_str, decimal_str) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !decimal_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat);
    }

    // The value is `digits * 10^(shift - 2)` units, i.e. `digits * 10^shift` cents
    let digits = format!("{units_str}{decimal_str}");
    let digits = digits.trim_start_matches('0');
    let shift = exponent
        .checked_add(2)
        .and_then(|s| s.checked_sub(decimal_str.len() as i64))
        .ok_or(ParseCentsError::Overflow)?;

    let cents = scale_to_cents(digits, shift)?;
    if cents > MAX_AMOUNT_CENTS {
        return Err(ParseCentsError::Overflow);
    }
    Ok(if negative { -cents } else { cents })
}

fn parse_exponent(input: &str) -> Result<i64, ParseCentsError> {
    let digits = input
        .strip_prefix(['+', '-'])
        .unwrap_or(input);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    input.parse().map_err(|_| ParseCentsError::Overflow)
}

/// `digits` has no leading zeros. Anything longer than 17 digits is far past
/// `MAX_AMOUNT_CENTS`, which keeps the arithmetic inside `i64`.
fn scale_to_cents(digits: &str, shift: i64) -> Result<Cents, ParseCentsError> {
    if digits.is_empty() {
        return Ok(0);
    }

    if shift >= 0 {
        if digits.len() as i64 + shift > 17 {
            return Err(ParseCentsError::Overflow);
        }
        let value: Cents = digits.parse().map_err(|_| ParseCentsError::Overflow)?;
        return value
            .checked_mul(10_i64.pow(shift as u32))
            .ok_or(ParseCentsError::Overflow);
    }

    let dropped_len = usize::try_from(shift.unsigned_abs()).unwrap_or(usize::MAX);
    let keep = digits.len().saturating_sub(dropped_len);
    let (kept, dropped) = digits.split_at(keep);
    if kept.len() > 17 {
        return Err(ParseCentsError::Overflow);
    }

    let value: Cents = if kept.is_empty() {
        0
    } else {
        kept.parse().map_err(|_| ParseCentsError::Overflow)?
    };
    // Round half up on the first dropped digit, unless implied zeros precede it
    let round_up = dropped.len() == dropped_len && dropped.bytes().next().is_some_and(|d| d >= b'5');
    Ok(if round_up { value + 1 } else { value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    Empty,
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::Empty => write!(f, "empty amount"),
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

fn write_units<S>(cents: TotalCents, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match i64::try_from(cents / 100) {
        Ok(units) if cents % 100 == 0 => serializer.serialize_i64(units),
        _ => serializer.serialize_f64(cents as f64 / 100.0),
    }
}

/// Serde codec writing cents as a JSON number of units (`50`, `12.5`).
/// Reading goes through the shortest decimal rendering of the number and
/// `parse_cents`, so a stored `12.345` loads exactly like typing `12.345`.
pub mod amount_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Cents, parse_cents, write_units};

    pub fn serialize<S>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        write_units((*cents).into(), serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Cents, D::Error>
    where
        D: Deserializer<'de>,
    {
        let units = f64::deserialize(deserializer)?;
        if !units.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        parse_cents(&units.to_string())
            .map_err(|err| serde::de::Error::custom(format!("amount {}: {}", units, err)))
    }
}

/// Same JSON shape as `amount_serde`, for sums that may exceed a single
/// amount's range.
pub mod total_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TotalCents, write_units};

    pub fn serialize<S>(cents: &TotalCents, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        write_units(*cents, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TotalCents, D::Error>
    where
        D: Deserializer<'de>,
    {
        let units = f64::deserialize(deserializer)?;
        if !units.is_finite() {
            return Err(serde::de::Error::custom("total must be a finite number"));
        }
        Ok((units * 100.0).round() as TotalCents)
    }
}
