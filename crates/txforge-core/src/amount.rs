//! Signed integer amounts in chain base units.
//!
//! [`Amount`] is a sign plus a 256-bit magnitude. Fees and values arrive as
//! strings (`"100"`, `"0x64"`) or native integers; keeping the sign around
//! lets validators reject negative input with a typed error instead of
//! failing at parse time.
//!
//! ```rust
//! use txforge_core::Amount;
//!
//! let fee: Amount = "100".parse().unwrap();
//! assert_eq!(fee.to_hex_string(), "0x64");
//!
//! let hex: Amount = "0x64".parse().unwrap();
//! assert_eq!(hex, fee);
//!
//! let negative: Amount = "-5".parse().unwrap();
//! assert!(negative.is_negative());
//! ```

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;

/// Errors produced when parsing an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The input was empty (or only a sign / `0x` prefix).
    #[error("empty numeric value")]
    Empty,

    /// The input contained a character outside the radix.
    #[error("invalid numeric value: {value}")]
    InvalidDigit {
        /// The rejected input.
        value: String,
    },

    /// The input had a fractional part; amounts are integers in base units.
    #[error("fractional values are not supported: {value}")]
    Fractional {
        /// The rejected input.
        value: String,
    },

    /// The magnitude does not fit in 256 bits.
    #[error("numeric value overflows 256 bits: {value}")]
    Overflow {
        /// The rejected input.
        value: String,
    },
}

/// A signed amount in chain base units (wei, motes, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Amount {
    negative: bool,
    magnitude: U256,
}

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self {
        negative: false,
        magnitude: U256::ZERO,
    };

    /// Create an amount from a sign and magnitude. Negative zero is
    /// normalized to zero.
    #[must_use]
    pub fn new(negative: bool, magnitude: U256) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    /// Returns `true` if this amount is strictly below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns `true` if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// The absolute value.
    #[must_use]
    pub const fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// The value as an unsigned integer, or `None` if negative.
    #[must_use]
    pub const fn to_u256(&self) -> Option<U256> {
        if self.negative {
            None
        } else {
            Some(self.magnitude)
        }
    }

    /// The value as a `u64`, or `None` if negative or too large.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u256().and_then(|v| u64::try_from(v).ok())
    }

    /// The value as a `u128`, or `None` if negative or too large.
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        self.to_u256().and_then(|v| u128::try_from(v).ok())
    }

    /// Decimal rendering, with a leading `-` when negative.
    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        self.to_string()
    }

    /// `0x`-prefixed lowercase hex rendering of the magnitude, with a
    /// leading `-` when negative. Zero renders as `0x0`.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{sign}0x{:x}", self.magnitude)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (digits, radix) = match unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            Some(hex) => (hex, 16),
            None => (unsigned, 10),
        };

        if digits.is_empty() {
            return Err(AmountError::Empty);
        }

        if radix == 10 {
            if let Some((whole, fraction)) = digits.split_once('.') {
                // "100.000" is still an integer
                if fraction.chars().all(|c| c == '0') && !whole.is_empty() {
                    return parse_magnitude(whole, 10, s).map(|m| Self::new(negative, m));
                }
                return Err(AmountError::Fractional {
                    value: s.to_string(),
                });
            }
        }

        parse_magnitude(digits, radix, s).map(|m| Self::new(negative, m))
    }
}

fn parse_magnitude(digits: &str, radix: u32, original: &str) -> Result<U256, AmountError> {
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(AmountError::InvalidDigit {
            value: original.to_string(),
        });
    }
    U256::from_str_radix(digits, u64::from(radix)).map_err(|_| AmountError::Overflow {
        value: original.to_string(),
    })
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self::new(false, value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self::new(false, U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self::new(false, U256::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::new(value < 0, U256::from(value.unsigned_abs()))
    }
}

impl TryFrom<&str> for Amount {
    type Error = AmountError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
