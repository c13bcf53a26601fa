use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::{DataType, Datum};

#[derive(Debug)]
struct Not {}

impl Function for Not {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        Some(args[0].as_boolean().map_or(Datum::Null, |b| Datum::from(!b)))
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "not",
        vec![DataType::Boolean],
        DataType::Boolean,
        &Not {},
    ));
}
