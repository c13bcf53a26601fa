use crate::registry::Registry;
use data::DataType;

mod comparison;
mod is;
mod not;

/// The types that can be compared against values of the same type.
const COMPARABLE_TYPES: [DataType; 6] = [
    DataType::Boolean,
    DataType::Integer,
    DataType::BigInt,
    DataType::Decimal(0, 0),
    DataType::Text,
    DataType::Date,
];

pub fn register_builtins(registry: &mut Registry) {
    comparison::register_builtins(registry);
    is::register_builtins(registry);
    not::register_builtins(registry);
}
