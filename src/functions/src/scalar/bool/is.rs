use super::COMPARABLE_TYPES;
use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::{DataType, Datum};
use std::cmp::Ordering;

/// Null safe equality, ie `NULL IS NULL` is true.
#[derive(Debug)]
struct Is {
    negated: bool,
}

impl Function for Is {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        let same = args[0].sql_cmp(&args[1]) == Ordering::Equal;
        Some(Datum::from(same != self.negated))
    }
}

pub fn register_builtins(registry: &mut Registry) {
    for (name, function) in &[("is", &Is { negated: false }), ("is not", &Is { negated: true })] {
        for datatype in &COMPARABLE_TYPES {
            registry.register_function(
                FunctionDefinition::new(
                    *name,
                    vec![*datatype, *datatype],
                    DataType::Boolean,
                    *function,
                )
                .with_null_args(),
            );
        }
    }
}
