use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum DataType {
    // Could be considered a wildcard, ie nulls can be cast to anything
    Null,
    Boolean,
    Integer,
    BigInt,
    // Precision and scale
    Decimal(u8, u8),
    Text,
    Date,
    // Row valued expressions, the element types live on the tuple's children
    Tuple,
}

pub const DECIMAL_MAX_PRECISION: u8 = 28;
pub const DECIMAL_MAX_SCALE: u8 = 14;

impl DataType {
    /// Returns true if values of the two types can be ordered against each other
    /// with numeric semantics.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::BigInt | DataType::Decimal(..)
        )
    }

    /// Loose type equality as used for overload matching, decimals match regardless
    /// of their precision and scale.
    pub fn matches(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::Decimal(..), DataType::Decimal(..)) => true,
            _ => self == other,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Null => f.write_str("NULL"),
            DataType::Boolean => f.write_str("BOOLEAN"),
            DataType::Integer => f.write_str("INTEGER"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::Decimal(p, s) => f.write_fmt(format_args!("DECIMAL({},{})", p, s)),
            DataType::Text => f.write_str("TEXT"),
            DataType::Date => f.write_str("DATE"),
            DataType::Tuple => f.write_str("TUPLE"),
        }
    }
}

lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(r"^DECIMAL\(([0-9]+),([0-9]+)\)$").unwrap();
}

/// Takes strings serialized from Display and turns them back
/// into a datatype
impl TryFrom<&str> for DataType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "NULL" => Ok(DataType::Null),
            "BOOLEAN" => Ok(DataType::Boolean),
            "INTEGER" => Ok(DataType::Integer),
            "BIGINT" => Ok(DataType::BigInt),
            "TEXT" => Ok(DataType::Text),
            "DATE" => Ok(DataType::Date),
            "TUPLE" => Ok(DataType::Tuple),
            _ => DECIMAL_RE
                .captures(value)
                .and_then(|d_match| {
                    let p = d_match.get(1)?.as_str().parse::<u8>().ok()?;
                    let s = d_match.get(2)?.as_str().parse::<u8>().ok()?;
                    Some(DataType::Decimal(p, s))
                })
                .ok_or(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_display() {
        assert_eq!(DataType::Null.to_string(), "NULL");
        assert_eq!(DataType::Decimal(1, 2).to_string(), "DECIMAL(1,2)");
    }

    #[test]
    fn test_datatype_from_str() {
        assert_eq!(DataType::try_from("NULL"), Ok(DataType::Null));
        assert_eq!(DataType::try_from("DATE"), Ok(DataType::Date));
        assert_eq!(
            DataType::try_from("DECIMAL(1,2)"),
            Ok(DataType::Decimal(1, 2))
        );
        assert_eq!(DataType::try_from("DECIMAL(1000,2)"), Err(()));
        assert_eq!(DataType::try_from("VARCHAR"), Err(()));
    }

    #[test]
    fn test_datatype_matches() {
        assert!(DataType::Decimal(28, 2).matches(&DataType::Decimal(10, 0)));
        assert!(DataType::Integer.matches(&DataType::Integer));
        assert!(!DataType::Integer.matches(&DataType::BigInt));
    }
}
