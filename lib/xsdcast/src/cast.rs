use crate::datatype::{Datatype, Domain, IntegerBounds};
use crate::ieee::{DOUBLE, FLOAT};
use crate::value::{SpecialFloat, Temporal, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use std::str::FromStr;

/// How [`cast_or_validate`] treats its input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum CastMode {
    /// Coerce the value into the datatype representation first, then validate it.
    #[default]
    Cast,
    /// Validate the value as is.
    Check,
}

/// Error returned by [`cast_or_validate`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CastError {
    /// The value has no representation in the datatype domain.
    #[error("cannot cast '{value}' to xsd:{datatype}")]
    CastFailure { value: String, datatype: Datatype },
    /// The value was coerced but is outside of the datatype bounds.
    #[error("'{value}' is out of the range of xsd:{datatype}")]
    RangeViolation { value: String, datatype: Datatype },
    /// In check mode, the value does not belong to the datatype domain.
    #[error("{found} value '{value}' is not a valid xsd:{datatype}")]
    TypeMismatch {
        value: String,
        datatype: Datatype,
        found: &'static str,
    },
}

impl CastError {
    /// The datatype the cast or validation targeted.
    pub fn datatype(&self) -> Datatype {
        match self {
            Self::CastFailure { datatype, .. }
            | Self::RangeViolation { datatype, .. }
            | Self::TypeMismatch { datatype, .. } => *datatype,
        }
    }
}

/// Casts `value` to `datatype` or checks it already belongs to it.
///
/// In [`CastMode::Check`] the value is returned unchanged if it conforms, else [`CastError::TypeMismatch`]
/// or [`CastError::RangeViolation`] is returned.
/// In [`CastMode::Cast`] it is first coerced to the datatype representation
/// ([`CastError::CastFailure`] if impossible) and then goes through the same validation.
///
/// ```
/// use xsdcast::{cast_or_validate, CastError, CastMode, Datatype, Value};
///
/// assert_eq!(
///     cast_or_validate(Value::from(" -128"), Datatype::Byte, CastMode::Cast)?,
///     Value::from(-128_i64)
/// );
/// assert!(matches!(
///     cast_or_validate(Value::from("-129"), Datatype::Byte, CastMode::Cast),
///     Err(CastError::RangeViolation { .. })
/// ));
/// assert!(matches!(
///     cast_or_validate(Value::from("12"), Datatype::Byte, CastMode::Check),
///     Err(CastError::TypeMismatch { .. })
/// ));
/// # Result::<_, CastError>::Ok(())
/// ```
pub fn cast_or_validate(
    value: Value,
    datatype: Datatype,
    mode: CastMode,
) -> Result<Value, CastError> {
    let value = match mode {
        CastMode::Cast => coerce(value, datatype)?,
        CastMode::Check => value,
    };
    validate(value, datatype)
}

fn coerce(value: Value, datatype: Datatype) -> Result<Value, CastError> {
    let coerced = match datatype.domain() {
        Domain::String => Some(Value::String(value.to_string())),
        Domain::Integer(_) => to_integer(&value).map(Value::Integer),
        Domain::Decimal => to_decimal(&value).map(Value::Decimal),
        Domain::Float | Domain::Double => to_float(&value),
        Domain::Boolean => to_boolean(&value).map(Value::Boolean),
        Domain::Temporal => to_temporal(&value).map(Value::Temporal),
    };
    coerced.ok_or_else(|| CastError::CastFailure {
        value: value.to_string(),
        datatype,
    })
}

fn validate(value: Value, datatype: Datatype) -> Result<Value, CastError> {
    let valid = match (datatype.domain(), &value) {
        (Domain::String, Value::String(_))
        | (Domain::Decimal, Value::Decimal(_))
        | (Domain::Boolean, Value::Boolean(_))
        | (Domain::Temporal, Value::Temporal(_))
        | (Domain::Float | Domain::Double, Value::SpecialFloat(_)) => true,
        (Domain::Integer(bounds), Value::Integer(i)) => within(i, bounds),
        (Domain::Float, Value::Decimal(d)) => FLOAT.accepts(d),
        (Domain::Double, Value::Decimal(d)) => DOUBLE.accepts(d),
        _ => {
            return Err(CastError::TypeMismatch {
                found: value.kind(),
                value: value.to_string(),
                datatype,
            });
        }
    };
    if valid {
        Ok(value)
    } else {
        Err(CastError::RangeViolation {
            value: value.to_string(),
            datatype,
        })
    }
}

fn within(value: &BigInt, bounds: IntegerBounds) -> bool {
    bounds.min.is_none_or(|min| *value >= BigInt::from(min))
        && bounds.max.is_none_or(|max| *value <= BigInt::from(max))
}

fn to_integer(value: &Value) -> Option<BigInt> {
    match value {
        Value::Integer(i) => Some(i.clone()),
        Value::String(s) => BigInt::from_str(s.trim()).ok(),
        Value::Decimal(d) => integral(d),
        Value::Boolean(b) => Some(BigInt::from(u8::from(*b))),
        Value::SpecialFloat(_) | Value::Temporal(_) => None,
    }
}

/// Only decimals without fractional part convert to integers.
fn integral(value: &BigDecimal) -> Option<BigInt> {
    let (digits, scale) = value.normalized().as_bigint_and_exponent();
    if scale > 0 {
        return None;
    }
    let shift = u32::try_from(-scale).ok()?;
    Some(digits * BigInt::from(10_u8).pow(shift))
}

fn to_decimal(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Decimal(d) => Some(d.clone()),
        Value::Integer(i) => Some(BigDecimal::from(i.clone())),
        Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        Value::Boolean(b) => Some(BigDecimal::from(u8::from(*b))),
        Value::SpecialFloat(_) | Value::Temporal(_) => None,
    }
}

fn to_float(value: &Value) -> Option<Value> {
    match value {
        Value::SpecialFloat(s) => Some(Value::SpecialFloat(*s)),
        Value::String(s) => {
            if let Some(special) = SpecialFloat::from_lexical(s.trim()) {
                return Some(Value::SpecialFloat(special));
            }
            to_decimal(value).map(Value::Decimal)
        }
        _ => to_decimal(value).map(Value::Decimal),
    }
}

fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Integer(i) => Some(!i.is_zero()),
        Value::Decimal(d) => Some(!d.is_zero()),
        Value::SpecialFloat(_) | Value::Temporal(_) => None,
    }
}

fn to_temporal(value: &Value) -> Option<Temporal> {
    match value {
        Value::Temporal(t) => Some(*t),
        Value::String(s) => Temporal::parse(s),
        _ => None,
    }
}
