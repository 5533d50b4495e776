#![cfg(test)]
#![expect(clippy::panic_in_result_fn)]

use num_bigint::BigInt;
use xsdcast::{CastError, CastMode, Datatype, Value, cast_or_validate};

#[test]
fn integer_subtypes_accept_exactly_their_range() -> Result<(), CastError> {
    for datatype in Datatype::ALL {
        let Some(bounds) = datatype.integer_bounds() else {
            continue;
        };
        if let Some(min) = bounds.min {
            let min = BigInt::from(min);
            for mode in [CastMode::Cast, CastMode::Check] {
                cast_or_validate(Value::from(min.clone()), datatype, mode)?;
                assert!(
                    cast_or_validate(Value::from(min.clone() - 1_i32), datatype, mode).is_err(),
                    "{datatype} accepts {min} - 1"
                );
            }
            cast_or_validate(Value::from(min.to_string()), datatype, CastMode::Cast)?;
        }
        if let Some(max) = bounds.max {
            let max = BigInt::from(max);
            for mode in [CastMode::Cast, CastMode::Check] {
                cast_or_validate(Value::from(max.clone()), datatype, mode)?;
                assert!(
                    cast_or_validate(Value::from(max.clone() + 1_i32), datatype, mode).is_err(),
                    "{datatype} accepts {max} + 1"
                );
            }
            cast_or_validate(Value::from(max.to_string()), datatype, CastMode::Cast)?;
        }
    }
    Ok(())
}

#[test]
fn float_needs_more_precision_than_double() -> Result<(), CastError> {
    // 2^24 + 1 needs 25 significant bits
    let value = "16777217";
    assert!(cast_or_validate(Value::from(value), Datatype::Float, CastMode::Cast).is_err());
    cast_or_validate(Value::from(value), Datatype::Double, CastMode::Cast)?;
    Ok(())
}
