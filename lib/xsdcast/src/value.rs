use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use oxsdatatypes::{Date, DateTime, Time};
use std::fmt;

/// A value in one of the domains of [`Datatype`](crate::Datatype).
///
/// `float` and `double` values share the [`Value::Decimal`] representation:
/// they are kept as exact decimals and never converted to native floats.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(BigInt),
    Decimal(BigDecimal),
    SpecialFloat(SpecialFloat),
    Boolean(bool),
    Temporal(Temporal),
}

/// The non-finite `float`/`double` values.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SpecialFloat {
    PositiveInfinity,
    NegativeInfinity,
    NaN,
}

impl SpecialFloat {
    pub(crate) fn from_lexical(input: &str) -> Option<Self> {
        match input {
            "INF" | "+INF" => Some(Self::PositiveInfinity),
            "-INF" => Some(Self::NegativeInfinity),
            "NaN" => Some(Self::NaN),
            _ => None,
        }
    }
}

impl fmt::Display for SpecialFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PositiveInfinity => "INF",
            Self::NegativeInfinity => "-INF",
            Self::NaN => "NaN",
        })
    }
}

/// A point in time as accepted by the `dateTime` cast: full timestamps, dates or times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temporal {
    DateTime(DateTime),
    Date(Date),
    Time(Time),
}

impl Temporal {
    /// Parses the XSD `dateTime`, `date` and `time` lexical forms.
    ///
    /// A single space is accepted in place of the `T` date/time separator.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(value) = input.parse() {
            return Some(Self::DateTime(value));
        }
        if let Some((date, time)) = input.split_once(' ') {
            if let Ok(value) = format!("{date}T{time}").parse() {
                return Some(Self::DateTime(value));
            }
        }
        if let Ok(value) = input.parse() {
            return Some(Self::Date(value));
        }
        input.parse().ok().map(Self::Time)
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(v) => fmt::Display::fmt(v, f),
            Self::Date(v) => fmt::Display::fmt(v, f),
            Self::Time(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl Value {
    /// A short name of the value domain, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::SpecialFloat(_) => "special float",
            Self::Boolean(_) => "boolean",
            Self::Temporal(_) => "temporal",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Integer(v) => fmt::Display::fmt(v, f),
            Self::Decimal(v) => fmt::Display::fmt(v, f),
            Self::SpecialFloat(v) => fmt::Display::fmt(v, f),
            Self::Boolean(v) => fmt::Display::fmt(v, f),
            Self::Temporal(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for Value {
    #[inline]
    fn from(value: u64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<BigInt> for Value {
    #[inline]
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<BigDecimal> for Value {
    #[inline]
    fn from(value: BigDecimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Temporal> for Value {
    #[inline]
    fn from(value: Temporal) -> Self {
        Self::Temporal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_forms() {
        assert!(matches!(
            Temporal::parse("2020-01-01T10:00:00Z"),
            Some(Temporal::DateTime(_))
        ));
        assert!(matches!(
            Temporal::parse("2020-01-01 10:00:00+02:00"),
            Some(Temporal::DateTime(_))
        ));
        assert!(matches!(
            Temporal::parse("2020-01-01"),
            Some(Temporal::Date(_))
        ));
        assert!(matches!(
            Temporal::parse("10:00:00"),
            Some(Temporal::Time(_))
        ));
        assert_eq!(Temporal::parse("yesterday"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::from(42_i64).to_string(), "42");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::SpecialFloat(SpecialFloat::NegativeInfinity).to_string(), "-INF");
    }
}
