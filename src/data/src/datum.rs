use crate::DataType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Datum - in memory representation of sql value.
/// Datums are owned so they can be interned and shared by the planner for the
/// length of a planning session.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Datum {
    Null,
    Boolean(bool),
    Integer(i32),
    BigInt(i64),
    Decimal(Decimal),
    Text(Box<str>),
    Date(NaiveDate),
}

// From builders to build datums from the native rust types
impl Default for Datum {
    fn default() -> Self {
        Datum::Null
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Boolean(b)
    }
}

impl From<i32> for Datum {
    fn from(i: i32) -> Self {
        Datum::Integer(i)
    }
}

impl From<i64> for Datum {
    fn from(i: i64) -> Self {
        Datum::BigInt(i)
    }
}

impl From<Decimal> for Datum {
    fn from(d: Decimal) -> Self {
        Datum::Decimal(d)
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::Text(s.into_boxed_str())
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::Text(Box::from(s))
    }
}

impl From<NaiveDate> for Datum {
    fn from(d: NaiveDate) -> Self {
        Datum::Date(d)
    }
}

impl Display for Datum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Null => f.write_str("NULL"),
            Datum::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Datum::Integer(i) => i.fmt(f),
            Datum::BigInt(i) => i.fmt(f),
            Datum::Decimal(d) => d.fmt(f),
            Datum::Text(s) => f.write_fmt(format_args!("'{}'", s)),
            Datum::Date(d) => f.write_fmt(format_args!("DATE '{}'", d)),
        }
    }
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// The natural type of the datum, decimals are given the max precision as the
    /// value alone doesn't tell us what column it may have come from.
    pub fn datatype(&self) -> DataType {
        match self {
            Datum::Null => DataType::Null,
            Datum::Boolean(_) => DataType::Boolean,
            Datum::Integer(_) => DataType::Integer,
            Datum::BigInt(_) => DataType::BigInt,
            Datum::Decimal(d) => DataType::Decimal(28, d.scale() as u8),
            Datum::Text(_) => DataType::Text,
            Datum::Date(_) => DataType::Date,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Datum::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        if let Datum::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_bigint(&self) -> Option<i64> {
        if let Datum::BigInt(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        if let Datum::Decimal(d) = self {
            Some(*d)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let Datum::Text(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Widens any numeric datum to a decimal, used to compare across numeric types.
    fn as_numeric(&self) -> Option<Decimal> {
        match self {
            Datum::Integer(i) => Some(Decimal::from(*i)),
            Datum::BigInt(i) => Some(Decimal::from(*i)),
            Datum::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_numeric().map_or(false, |d| d.is_zero())
    }

    pub fn is_one(&self) -> bool {
        self.as_numeric().map_or(false, |d| d == Decimal::ONE)
    }

    /// Position of this datum's type family in the cross type sort order.
    fn type_rank(&self) -> u8 {
        match self {
            Datum::Null => 0,
            Datum::Boolean(_) => 1,
            Datum::Integer(_) | Datum::BigInt(_) | Datum::Decimal(_) => 2,
            Datum::Text(_) => 3,
            Datum::Date(_) => 4,
        }
    }

    /// Total ordering following sql literal comparison rules.
    /// Nulls sort first, numerics compare by value regardless of their concrete type
    /// and values from unrelated type families are ordered by family.
    pub fn sql_cmp(&self, other: &Datum) -> Ordering {
        match (self, other) {
            (Datum::Null, Datum::Null) => Ordering::Equal,
            (Datum::Boolean(a), Datum::Boolean(b)) => a.cmp(b),
            (Datum::Text(a), Datum::Text(b)) => a.cmp(b),
            (Datum::Date(a), Datum::Date(b)) => a.cmp(b),
            _ => match (self.as_numeric(), other.as_numeric()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.type_rank().cmp(&other.type_rank()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_datum_from_native() {
        assert_eq!(Datum::from(true), Datum::Boolean(true));
        assert_eq!(Datum::from(1234), Datum::Integer(1234));
        assert_eq!(Datum::from(1234_i64), Datum::BigInt(1234));
        assert_eq!(
            Datum::from(Decimal::new(12345, 2)),
            Datum::Decimal(Decimal::new(12345, 2))
        );
        assert_eq!(
            Datum::from(String::from("Hello world")),
            Datum::Text(Box::from("Hello world"))
        );
    }

    #[test]
    fn test_datum_datatype() {
        assert_eq!(Datum::Null.datatype(), DataType::Null);
        assert_eq!(Datum::from("Hello world").datatype(), DataType::Text);
        assert_eq!(Datum::from(1).datatype(), DataType::Integer);
        assert_eq!(Datum::from(false).datatype(), DataType::Boolean);
        assert_eq!(
            Datum::from(Decimal::from_str("-123.12").unwrap()).datatype(),
            DataType::Decimal(28, 2)
        );
    }

    #[test]
    fn test_datum_display() {
        assert_eq!(format!("{}", Datum::Null), "NULL");
        assert_eq!(format!("{}", Datum::Boolean(true)), "TRUE");
        assert_eq!(format!("{}", Datum::Integer(123)), "123");
        assert_eq!(
            format!("{}", Datum::Decimal(Decimal::from_str("12.34").unwrap())),
            "12.34"
        );
        assert_eq!(format!("{}", Datum::from("hello")), "'hello'");
        assert_eq!(
            format!("{}", Datum::from(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap())),
            "DATE '2020-01-02'"
        );
    }

    #[test]
    fn test_sql_cmp_nulls_first() {
        assert_eq!(Datum::Null.sql_cmp(&Datum::from(1)), Ordering::Less);
        assert_eq!(Datum::from(false).sql_cmp(&Datum::Null), Ordering::Greater);
        assert_eq!(Datum::Null.sql_cmp(&Datum::Null), Ordering::Equal);
    }

    #[test]
    fn test_sql_cmp_numeric_across_types() {
        assert_eq!(Datum::from(2).sql_cmp(&Datum::from(10_i64)), Ordering::Less);
        assert_eq!(
            Datum::from(Decimal::new(15, 1)).sql_cmp(&Datum::from(1)),
            Ordering::Greater
        );
        assert_eq!(
            Datum::from(Decimal::new(10, 1)).sql_cmp(&Datum::from(1_i64)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sql_cmp_families() {
        assert_eq!(Datum::from("a").sql_cmp(&Datum::from("b")), Ordering::Less);
        assert_eq!(Datum::from(true).sql_cmp(&Datum::from(1)), Ordering::Less);
        assert_eq!(Datum::from("1").sql_cmp(&Datum::from(1)), Ordering::Greater);
    }

    #[test]
    fn test_zero_one() {
        assert!(Datum::from(0).is_zero());
        assert!(Datum::from(Decimal::new(0, 2)).is_zero());
        assert!(Datum::from(1_i64).is_one());
        assert!(Datum::from(Decimal::new(100, 2)).is_one());
        assert!(!Datum::Null.is_zero());
        assert!(!Datum::from("1").is_one());
    }
}
