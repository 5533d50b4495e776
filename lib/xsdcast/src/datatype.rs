use std::fmt;
use std::str::FromStr;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// The closed set of datatypes a literal can be cast to or validated against.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Float,
    Double,
    Boolean,
    DateTime,
    NonPositiveInteger,
    PositiveInteger,
    NegativeInteger,
    NonNegativeInteger,
    Long,
    Int,
    Short,
    Byte,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
}

/// Inclusive bounds of an integer datatype. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IntegerBounds {
    pub min: Option<i128>,
    pub max: Option<i128>,
}

impl IntegerBounds {
    const fn new(min: Option<i128>, max: Option<i128>) -> Self {
        Self { min, max }
    }
}

/// The value domain a datatype accepts.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Domain {
    String,
    Integer(IntegerBounds),
    Decimal,
    Float,
    Double,
    Boolean,
    Temporal,
}

impl Datatype {
    pub const ALL: [Self; 19] = [
        Self::String,
        Self::Integer,
        Self::Decimal,
        Self::Float,
        Self::Double,
        Self::Boolean,
        Self::DateTime,
        Self::NonPositiveInteger,
        Self::PositiveInteger,
        Self::NegativeInteger,
        Self::NonNegativeInteger,
        Self::Long,
        Self::Int,
        Self::Short,
        Self::Byte,
        Self::UnsignedLong,
        Self::UnsignedInt,
        Self::UnsignedShort,
        Self::UnsignedByte,
    ];

    /// The XSD local name, e.g. `unsignedShort`.
    #[inline]
    pub const fn local_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::DateTime => "dateTime",
            Self::NonPositiveInteger => "nonPositiveInteger",
            Self::PositiveInteger => "positiveInteger",
            Self::NegativeInteger => "negativeInteger",
            Self::NonNegativeInteger => "nonNegativeInteger",
            Self::Long => "long",
            Self::Int => "int",
            Self::Short => "short",
            Self::Byte => "byte",
            Self::UnsignedLong => "unsignedLong",
            Self::UnsignedInt => "unsignedInt",
            Self::UnsignedShort => "unsignedShort",
            Self::UnsignedByte => "unsignedByte",
        }
    }

    /// The full datatype IRI.
    pub fn iri(self) -> String {
        format!("{XSD_NAMESPACE}{}", self.local_name())
    }

    /// Resolves a datatype from its local name only.
    ///
    /// Unlike [`FromStr`], prefixed names and IRIs are not accepted.
    pub fn from_local_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.local_name() == name)
    }

    pub const fn domain(self) -> Domain {
        match self {
            Self::String => Domain::String,
            Self::Decimal => Domain::Decimal,
            Self::Float => Domain::Float,
            Self::Double => Domain::Double,
            Self::Boolean => Domain::Boolean,
            Self::DateTime => Domain::Temporal,
            Self::Integer => Domain::Integer(IntegerBounds::new(None, None)),
            Self::NonPositiveInteger => Domain::Integer(IntegerBounds::new(None, Some(0))),
            Self::PositiveInteger => Domain::Integer(IntegerBounds::new(Some(1), None)),
            Self::NegativeInteger => Domain::Integer(IntegerBounds::new(None, Some(-1))),
            Self::NonNegativeInteger => Domain::Integer(IntegerBounds::new(Some(0), None)),
            Self::Long => Domain::Integer(IntegerBounds::new(
                Some(i64::MIN as i128),
                Some(i64::MAX as i128),
            )),
            Self::Int => Domain::Integer(IntegerBounds::new(
                Some(i32::MIN as i128),
                Some(i32::MAX as i128),
            )),
            Self::Short => Domain::Integer(IntegerBounds::new(
                Some(i16::MIN as i128),
                Some(i16::MAX as i128),
            )),
            Self::Byte => Domain::Integer(IntegerBounds::new(
                Some(i8::MIN as i128),
                Some(i8::MAX as i128),
            )),
            Self::UnsignedLong => {
                Domain::Integer(IntegerBounds::new(Some(0), Some(u64::MAX as i128)))
            }
            Self::UnsignedInt => {
                Domain::Integer(IntegerBounds::new(Some(0), Some(u32::MAX as i128)))
            }
            Self::UnsignedShort => {
                Domain::Integer(IntegerBounds::new(Some(0), Some(u16::MAX as i128)))
            }
            Self::UnsignedByte => {
                Domain::Integer(IntegerBounds::new(Some(0), Some(u8::MAX as i128)))
            }
        }
    }

    /// Bounds of the integer family, `None` for every other datatype.
    pub const fn integer_bounds(self) -> Option<IntegerBounds> {
        match self.domain() {
            Domain::Integer(bounds) => Some(bounds),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self.domain(), Domain::Integer(_))
    }
}

impl fmt::Display for Datatype {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

impl FromStr for Datatype {
    type Err = UnknownDatatypeError;

    /// Accepts `int`, `xsd:int` and `http://www.w3.org/2001/XMLSchema#int`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input
            .strip_prefix(XSD_NAMESPACE)
            .or_else(|| input.strip_prefix("xsd:"))
            .unwrap_or(input);
        Self::from_local_name(name).ok_or_else(|| UnknownDatatypeError {
            name: input.to_owned(),
        })
    }
}

/// The name does not denote one of the supported [`Datatype`]s.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unexpected data type '{name}'")]
pub struct UnknownDatatypeError {
    name: String,
}

impl UnknownDatatypeError {
    /// The rejected name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
