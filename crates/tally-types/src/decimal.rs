//! Exact decimal amounts

use crate::error::{Result, TypesError};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest number of fractional digits a decimal may carry
pub const MAX_SCALE: u8 = 28;

/// Base-10 number stored as `mantissa * 10^-scale`.
///
/// Amounts enter the key-value mirror in this form, never as binary floats.
/// Equality ignores trailing fractional zeros, so `1.50 == 1.5`.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

impl Decimal {
    pub fn new(mantissa: i128, scale: u8) -> Result<Self> {
        if scale > MAX_SCALE {
            return Err(TypesError::DecimalOverflow(format!(
                "scale {} exceeds {}",
                scale, MAX_SCALE
            )));
        }
        Ok(Self { mantissa, scale })
    }

    /// Two-place amount from a whole number of cents
    pub fn from_cents(cents: i64) -> Self {
        Self {
            mantissa: cents as i128,
            scale: 2,
        }
    }

    /// Converts through the shortest text that reads back as the same `f64`,
    /// so `1500000.5_f64` becomes exactly `1500000.5` rather than its binary
    /// expansion.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(TypesError::NonFinite(value.to_string()));
        }
        value.to_string().parse()
    }

    /// Nearest `f64`. Exact inverse of [`Decimal::from_f64`].
    pub fn to_f64(&self) -> f64 {
        // Display output is always valid float syntax
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Integer value, if there is no fractional part
    pub fn to_i64(&self) -> Option<i64> {
        let normalized = self.normalize();
        if normalized.scale != 0 {
            return None;
        }
        i64::try_from(normalized.mantissa).ok()
    }

    /// Whole number of cents, if the value has at most two fractional digits
    pub fn to_cents(&self) -> Option<i64> {
        let normalized = self.normalize();
        if normalized.scale > 2 {
            return None;
        }
        let factor = 10_i128.pow(2 - normalized.scale as u32);
        normalized
            .mantissa
            .checked_mul(factor)
            .and_then(|cents| i64::try_from(cents).ok())
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// Same value with trailing fractional zeros dropped
    pub fn normalize(&self) -> Self {
        let mut mantissa = self.mantissa;
        let mut scale = self.scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self { mantissa, scale }
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalize();
        let b = other.normalize();
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Decimal {}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self {
            mantissa: value as i128,
            scale: 0,
        }
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Self::from(value as i64)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        if self.scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let overflow = || TypesError::DecimalOverflow(s.to_string());

        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if frac_part.len() > MAX_SCALE as usize {
            return Err(overflow());
        }

        let mut mantissa: i128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            let digit = c.to_digit(10).ok_or_else(invalid)?;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(digit as i128))
                .ok_or_else(overflow)?;
        }
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self {
            mantissa,
            scale: frac_part.len() as u8,
        })
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a string holding one")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Decimal, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Decimal, E> {
        Ok(Decimal {
            mantissa: v as i128,
            scale: 0,
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Decimal, E> {
        Decimal::from_f64(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

/// Serializes a decimal as a plain JSON number, for API responses.
pub fn serialize_as_f64<S: Serializer>(
    value: &Decimal,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_keep_scale() {
        let d: Decimal = "1500000.50".parse().unwrap();
        assert_eq!(d.mantissa(), 150000050);
        assert_eq!(d.scale(), 2);
        assert_eq!(d.to_string(), "1500000.50");

        assert_eq!("-0.05".parse::<Decimal>().unwrap().to_string(), "-0.05");
        assert_eq!("+7".parse::<Decimal>().unwrap().to_string(), "7");
        assert_eq!(".5".parse::<Decimal>().unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        let a: Decimal = "1500000.50".parse().unwrap();
        let b: Decimal = "1500000.5".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(Decimal::from_cents(100), Decimal::from(1));
        assert_ne!(a, Decimal::from_cents(150000051));
    }

    #[test]
    fn test_invalid_input() {
        for bad in ["", ".", "-", "abc", "1.2.3", "1e5", "12,50"] {
            assert!(
                matches!(bad.parse::<Decimal>(), Err(TypesError::InvalidDecimal(_))),
                "{:?} should be rejected",
                bad
            );
        }
        let too_long = format!("0.{}", "1".repeat(MAX_SCALE as usize + 1));
        assert!(matches!(
            too_long.parse::<Decimal>(),
            Err(TypesError::DecimalOverflow(_))
        ));
        assert!(Decimal::new(1, MAX_SCALE + 1).is_err());
    }

    #[test]
    fn test_from_f64_uses_shortest_representation() {
        assert_eq!(Decimal::from_f64(1500000.5).unwrap().to_string(), "1500000.5");
        assert_eq!(Decimal::from_f64(0.1).unwrap().to_string(), "0.1");
        assert_eq!(Decimal::from_f64(42.0).unwrap().to_string(), "42");
        assert!(matches!(
            Decimal::from_f64(f64::NAN),
            Err(TypesError::NonFinite(_))
        ));
        assert!(Decimal::from_f64(f64::INFINITY).is_err());
    }

    #[test]
    fn test_f64_round_trip() {
        for value in [1500000.5, 0.1, 12345678.91, 5000000.01, 24999999.99, 0.0] {
            let decimal = Decimal::from_f64(value).unwrap();
            assert_eq!(decimal.to_f64(), value);
        }
    }

    #[test]
    fn test_to_i64() {
        assert_eq!(Decimal::from(17).to_i64(), Some(17));
        assert_eq!("17.00".parse::<Decimal>().unwrap().to_i64(), Some(17));
        assert_eq!("17.5".parse::<Decimal>().unwrap().to_i64(), None);
    }

    #[test]
    fn test_to_cents() {
        assert_eq!("500000".parse::<Decimal>().unwrap().to_cents(), Some(50000000));
        assert_eq!("12.5".parse::<Decimal>().unwrap().to_cents(), Some(1250));
        assert_eq!("12.500".parse::<Decimal>().unwrap().to_cents(), Some(1250));
        assert_eq!("12.505".parse::<Decimal>().unwrap().to_cents(), None);
    }

    #[test]
    fn test_serde_is_exact_text() {
        let d: Decimal = "24999999.99".parse().unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"24999999.99\"");

        let back: Decimal = serde_json::from_str("\"24999999.99\"").unwrap();
        assert_eq!(back, d);
        let from_number: Decimal = serde_json::from_str("12").unwrap();
        assert_eq!(from_number, Decimal::from(12));
    }
}
