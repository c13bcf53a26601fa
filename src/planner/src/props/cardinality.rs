use std::fmt::{Display, Formatter};

/// The statically known bounds on the number of rows an expression can return.
/// A max of `u32::MAX` means unbounded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cardinality {
    pub min: u32,
    pub max: u32,
}

impl Default for Cardinality {
    fn default() -> Self {
        Cardinality::ANY
    }
}

impl Cardinality {
    pub const ANY: Cardinality = Cardinality {
        min: 0,
        max: u32::MAX,
    };
    pub const ZERO: Cardinality = Cardinality { min: 0, max: 0 };
    pub const ONE: Cardinality = Cardinality { min: 1, max: 1 };
    pub const ZERO_OR_ONE: Cardinality = Cardinality { min: 0, max: 1 };

    pub fn exactly(rows: u32) -> Self {
        Cardinality {
            min: rows,
            max: rows,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max == 0
    }

    pub fn is_one(&self) -> bool {
        self.min == 1 && self.max == 1
    }

    pub fn is_zero_or_one(&self) -> bool {
        self.max <= 1
    }

    pub fn can_be_zero(&self) -> bool {
        self.min == 0
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == u32::MAX
    }

    /// Drops the lower bound, ie after applying a filter.
    pub fn as_lower_zero(self) -> Self {
        Cardinality {
            min: 0,
            max: self.max,
        }
    }

    /// Bounds the result to at most `rows` rows.
    pub fn limit(self, rows: u32) -> Self {
        Cardinality {
            min: self.min.min(rows),
            max: self.max.min(rows),
        }
    }

    /// Skips the first `rows` rows.
    pub fn skip(self, rows: u32) -> Self {
        Cardinality {
            min: self.min.saturating_sub(rows),
            max: if self.is_unbounded() {
                self.max
            } else {
                self.max.saturating_sub(rows)
            },
        }
    }

    /// The bounds of every pairing of rows from both sides.
    pub fn product(self, other: Cardinality) -> Self {
        Cardinality {
            min: self.min.saturating_mul(other.min),
            max: self.max.saturating_mul(other.max),
        }
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_unbounded() {
            f.write_fmt(format_args!("[{} - ]", self.min))
        } else {
            f.write_fmt(format_args!("[{} - {}]", self.min, self.max))
        }
    }
}
