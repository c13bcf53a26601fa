use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::{DataType, Datum};

#[derive(Debug)]
struct Concat {}

impl Function for Concat {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        if let (Some(a), Some(b)) = (args[0].as_text(), args[1].as_text()) {
            Some(Datum::from([a, b].concat()))
        } else {
            Some(Datum::Null)
        }
    }
}

pub fn register_builtins(registry: &mut Registry) {
    registry.register_function(FunctionDefinition::new(
        "||",
        vec![DataType::Text, DataType::Text],
        DataType::Text,
        &Concat {},
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "||",
        args: vec![],
        ret: DataType::Text,
    };

    #[test]
    fn test_concat() {
        assert_eq!(
            Concat {}.execute(&DUMMY_SIG, &[Datum::from("foo"), Datum::from("bar")]),
            Some(Datum::from("foobar"))
        );
        assert_eq!(
            Concat {}.execute(&DUMMY_SIG, &[Datum::from("foo"), Datum::Null]),
            Some(Datum::Null)
        );
    }
}
