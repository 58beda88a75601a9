//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Fixed-scale decimal used for every price and quantity in the matching engine. Backed by an
// i128 mantissa at a compile-time scale so arithmetic is exact and comparisons are total -
// prices and quantities never touch binary floating point while a book is being mutated.
//--------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by every `Decimal`.
pub const SCALE: u32 = 8;

fn scale_factor() -> i128 {
    10i128.pow(SCALE)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecimalError {
    #[error("empty decimal string")]
    Empty,
    #[error("invalid decimal string: {0}")]
    InvalidFormat(String),
    #[error("decimal value overflows the i128 mantissa")]
    Overflow,
}

/// An exact fixed-point number: `mantissa / 10^SCALE`.
///
/// Parsed from strings on every external boundary; converts to `f64` only for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: i128,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal { mantissa: 0 };

    pub fn from_mantissa(mantissa: i128) -> Self {
        Decimal { mantissa }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_positive(&self) -> bool {
        self.mantissa > 0
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn checked_add(&self, other: &Decimal) -> Option<Decimal> {
        self.mantissa
            .checked_add(other.mantissa)
            .map(Decimal::from_mantissa)
    }

    pub fn checked_sub(&self, other: &Decimal) -> Option<Decimal> {
        self.mantissa
            .checked_sub(other.mantissa)
            .map(Decimal::from_mantissa)
    }

    /// Exact multiplication: (a * b) / 10^SCALE, rounding toward zero.
    pub fn checked_mul(&self, other: &Decimal) -> Option<Decimal> {
        let product = self.mantissa.checked_mul(other.mantissa)?;
        Some(Decimal::from_mantissa(product / scale_factor()))
    }

    pub fn min(self, other: Decimal) -> Decimal {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Converts to `f64`. Reserved for the reporting boundary; never used during matching.
    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / scale_factor() as f64
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Decimal::ZERO
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        self.checked_add(&rhs).expect("decimal addition overflow")
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Decimal) -> Decimal {
        self.checked_sub(&rhs).expect("decimal subtraction overflow")
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        self.checked_mul(&rhs).expect("decimal multiplication overflow")
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DecimalError::Empty);
        }

        let (sign, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1i128, rest),
            None => (1i128, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let mut parts = body.splitn(2, '.');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next().unwrap_or("");

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(DecimalError::InvalidFormat(input.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(DecimalError::InvalidFormat(input.to_string()));
        }
        if frac_part.len() > SCALE as usize {
            return Err(DecimalError::InvalidFormat(input.to_string()));
        }

        let int_value: i128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| DecimalError::InvalidFormat(input.to_string()))?
        };

        let mut frac_value: i128 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|_| DecimalError::InvalidFormat(input.to_string()))?
        };
        let padding = SCALE as usize - frac_part.len();
        frac_value = frac_value
            .checked_mul(10i128.pow(padding as u32))
            .ok_or(DecimalError::Overflow)?;

        let magnitude = int_value
            .checked_mul(scale_factor())
            .and_then(|v| v.checked_add(frac_value))
            .ok_or(DecimalError::Overflow)?;

        Ok(Decimal::from_mantissa(sign * magnitude))
    }
}

impl TryFrom<String> for Decimal {
    type Error = DecimalError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Decimal::from_str(&value)
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factor = scale_factor();
        let negative = self.mantissa < 0;
        let magnitude = self.mantissa.unsigned_abs();
        let int_part = magnitude / factor as u128;
        let frac_part = magnitude % factor as u128;
        if negative && (int_part != 0 || frac_part != 0) {
            write!(f, "-")?;
        }
        write!(f, "{int_part}.{frac_part:0width$}", width = SCALE as usize)
    }
}
