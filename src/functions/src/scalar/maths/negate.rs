use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::{DataType, Datum};

/// Unary minus
#[derive(Debug)]
struct Negate {}

impl Function for Negate {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        match &args[0] {
            Datum::Integer(i) => i.checked_neg().map(Datum::from),
            Datum::BigInt(i) => i.checked_neg().map(Datum::from),
            Datum::Decimal(d) => Some(Datum::from(-*d)),
            _ => Some(Datum::Null),
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    for datatype in &[DataType::Integer, DataType::BigInt] {
        registry.register_function(FunctionDefinition::new(
            "neg",
            vec![*datatype],
            *datatype,
            &Negate {},
        ));
    }
    registry.register_function(FunctionDefinition::new_with_type_resolver(
        "neg",
        vec![DataType::Decimal(0, 0)],
        |args| args[0],
        &Negate {},
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::rust_decimal::Decimal;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "neg",
        args: vec![],
        ret: DataType::Integer,
    };

    #[test]
    fn test_negate() {
        assert_eq!(
            Negate {}.execute(&DUMMY_SIG, &[Datum::from(3)]),
            Some(Datum::from(-3))
        );
        assert_eq!(
            Negate {}.execute(&DUMMY_SIG, &[Datum::from(Decimal::new(15, 1))]),
            Some(Datum::from(Decimal::new(-15, 1)))
        );
        assert_eq!(Negate {}.execute(&DUMMY_SIG, &[Datum::from(i32::MIN)]), None);
        assert_eq!(
            Negate {}.execute(&DUMMY_SIG, &[Datum::Null]),
            Some(Datum::Null)
        );
    }
}
