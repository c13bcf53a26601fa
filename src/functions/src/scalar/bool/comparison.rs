use super::COMPARABLE_TYPES;
use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::{DataType, Datum};
use std::cmp::Ordering;

/// =, <>, <, <=, >, >= all share the same implementation, they only differ in which
/// orderings they accept.
#[derive(Debug)]
struct Comparison {
    accepts: fn(Ordering) -> bool,
}

impl Function for Comparison {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        if args[0].is_null() || args[1].is_null() {
            Some(Datum::Null)
        } else {
            Some(Datum::from((self.accepts)(args[0].sql_cmp(&args[1]))))
        }
    }
}

const EQ: Comparison = Comparison {
    accepts: |o| o == Ordering::Equal,
};
const NE: Comparison = Comparison {
    accepts: |o| o != Ordering::Equal,
};
const LT: Comparison = Comparison {
    accepts: |o| o == Ordering::Less,
};
const LE: Comparison = Comparison {
    accepts: |o| o != Ordering::Greater,
};
const GT: Comparison = Comparison {
    accepts: |o| o == Ordering::Greater,
};
const GE: Comparison = Comparison {
    accepts: |o| o != Ordering::Less,
};

pub fn register_builtins(registry: &mut Registry) {
    for (name, function) in &[
        ("=", &EQ),
        ("<>", &NE),
        ("<", &LT),
        ("<=", &LE),
        (">", &GT),
        (">=", &GE),
    ] {
        for datatype in &COMPARABLE_TYPES {
            registry.register_function(FunctionDefinition::new(
                *name,
                vec![*datatype, *datatype],
                DataType::Boolean,
                *function,
            ));
        }
    }
}
