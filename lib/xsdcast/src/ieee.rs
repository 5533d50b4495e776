//! Exact IEEE-754 representability checks for `float` and `double`.
//!
//! The decimal is decomposed into its significant digits and decimal exponent.
//! No native floating point number is involved so no precision is lost on the way.

use bigdecimal::BigDecimal;
use num_bigint::BigUint;
use num_traits::Zero;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct FloatFormat {
    pub min_exponent: i64,
    pub max_exponent: i64,
    pub mantissa_bits: u32,
}

pub(crate) const FLOAT: FloatFormat = FloatFormat {
    min_exponent: -149,
    max_exponent: 104,
    mantissa_bits: 24,
};

pub(crate) const DOUBLE: FloatFormat = FloatFormat {
    min_exponent: -1075,
    max_exponent: 970,
    mantissa_bits: 53,
};

/// `(digits, decimal_exponent)` with `value == ±digits × 10^decimal_exponent` and no trailing zero in `digits`.
pub(crate) fn decompose(value: &BigDecimal) -> (BigUint, i64) {
    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    (digits.magnitude().clone(), -scale)
}

impl FloatFormat {
    /// Checks the exponent and mantissa bounds of the format.
    pub(crate) fn accepts(&self, value: &BigDecimal) -> bool {
        if value.is_zero() {
            return true;
        }
        let (mantissa, decimal_exponent) = decompose(value);
        let Ok(digit_count) = i64::try_from(mantissa.to_string().len()) else {
            return false;
        };
        let exponent = digit_count + decimal_exponent - 1;
        (self.min_exponent..=self.max_exponent).contains(&exponent)
            && mantissa <= BigUint::from(1_u8) << self.mantissa_bits
    }
}
