#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod cast;
mod datatype;
mod ieee;
mod value;

pub use self::cast::{CastError, CastMode, cast_or_validate};
pub use self::datatype::{Datatype, Domain, IntegerBounds, UnknownDatatypeError};
pub use self::value::{SpecialFloat, Temporal, Value};
