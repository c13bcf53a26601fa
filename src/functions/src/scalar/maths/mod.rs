use crate::registry::Registry;
use crate::{Function, FunctionDefinition, FunctionSignature};
use data::rust_decimal::Decimal;
use data::{DataType, Datum, DECIMAL_MAX_PRECISION, DECIMAL_MAX_SCALE};
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub};
use std::cmp::{max, min};

mod negate;

#[derive(Debug, Copy, Clone)]
enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    fn apply<T: CheckedAdd + CheckedSub + CheckedMul + CheckedDiv>(self, a: &T, b: &T) -> Option<T> {
        match self {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Subtract => a.checked_sub(b),
            ArithmeticOp::Multiply => a.checked_mul(b),
            ArithmeticOp::Divide => a.checked_div(b),
        }
    }
}

/// The four basic binary operators over our numeric types, overflow and division by
/// zero can't be folded and report None.
#[derive(Debug)]
struct Arithmetic {
    op: ArithmeticOp,
}

impl Function for Arithmetic {
    fn execute(&self, _signature: &FunctionSignature, args: &[Datum]) -> Option<Datum> {
        match (&args[0], &args[1]) {
            (Datum::Integer(a), Datum::Integer(b)) => self.op.apply(a, b).map(Datum::from),
            (Datum::BigInt(a), Datum::BigInt(b)) => self.op.apply(a, b).map(Datum::from),
            (Datum::Decimal(a), Datum::Decimal(b)) => self.op.apply(a, b).map(|mut d: Decimal| {
                if d.scale() > DECIMAL_MAX_SCALE as u32 {
                    d.rescale(DECIMAL_MAX_SCALE as u32);
                }
                Datum::from(d)
            }),
            _ => Some(Datum::Null),
        }
    }
}

fn decimal_params(args: &[DataType]) -> ((u8, u8), (u8, u8)) {
    match (args[0], args[1]) {
        (DataType::Decimal(p1, s1), DataType::Decimal(p2, s2)) => ((p1, s1), (p2, s2)),
        _ => panic!("Decimal type resolver called with {:?}", args),
    }
}

fn additive_decimal_type(args: &[DataType]) -> DataType {
    let ((p1, s1), (p2, s2)) = decimal_params(args);
    DataType::Decimal(min(max(p1, p2) + 1, DECIMAL_MAX_PRECISION), max(s1, s2))
}

fn multiply_decimal_type(args: &[DataType]) -> DataType {
    let ((p1, s1), (p2, s2)) = decimal_params(args);
    DataType::Decimal(
        min(p1 + p2, DECIMAL_MAX_PRECISION),
        min(s1 + s2, DECIMAL_MAX_SCALE),
    )
}

fn divide_decimal_type(_args: &[DataType]) -> DataType {
    DataType::Decimal(DECIMAL_MAX_PRECISION, DECIMAL_MAX_SCALE)
}

pub fn register_builtins(registry: &mut Registry) {
    let operators: [(&'static str, &'static Arithmetic, fn(&[DataType]) -> DataType); 4] = [
        ("+", &Arithmetic { op: ArithmeticOp::Add }, additive_decimal_type),
        ("-", &Arithmetic { op: ArithmeticOp::Subtract }, additive_decimal_type),
        ("*", &Arithmetic { op: ArithmeticOp::Multiply }, multiply_decimal_type),
        ("/", &Arithmetic { op: ArithmeticOp::Divide }, divide_decimal_type),
    ];

    for (name, function, decimal_type) in operators.iter() {
        for datatype in &[DataType::Integer, DataType::BigInt] {
            registry.register_function(FunctionDefinition::new(
                *name,
                vec![*datatype, *datatype],
                *datatype,
                *function,
            ));
        }
        registry.register_function(FunctionDefinition::new_with_type_resolver(
            *name,
            vec![DataType::Decimal(0, 0), DataType::Decimal(0, 0)],
            *decimal_type,
            *function,
        ));
    }

    negate::register_builtins(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const DUMMY_SIG: FunctionSignature = FunctionSignature {
        name: "+",
        args: vec![],
        ret: DataType::Integer,
    };

    const ADD: Arithmetic = Arithmetic {
        op: ArithmeticOp::Add,
    };

    const DIVIDE: Arithmetic = Arithmetic {
        op: ArithmeticOp::Divide,
    };

    #[test]
    fn test_null() {
        assert_eq!(
            ADD.execute(&DUMMY_SIG, &[Datum::Null, Datum::from(1)]),
            Some(Datum::Null)
        )
    }

    #[test]
    fn test_add_int() {
        assert_eq!(
            ADD.execute(&DUMMY_SIG, &[Datum::from(1), Datum::from(2)]),
            Some(Datum::from(3))
        )
    }

    #[test]
    fn test_add_overflow() {
        assert_eq!(
            ADD.execute(&DUMMY_SIG, &[Datum::from(i32::MAX), Datum::from(1)]),
            None
        )
    }

    #[test]
    fn test_add_decimal() {
        assert_eq!(
            ADD.execute(
                &DUMMY_SIG,
                &[
                    Datum::from(Decimal::new(123, 1)),
                    Datum::from(Decimal::new(1234, 2))
                ]
            ),
            Some(Datum::from(Decimal::new(2464, 2)))
        )
    }

    #[test]
    fn test_divide() {
        assert_eq!(
            DIVIDE.execute(&DUMMY_SIG, &[Datum::from(5_i64), Datum::from(2_i64)]),
            Some(Datum::from(2_i64))
        );
        assert_eq!(
            DIVIDE.execute(&DUMMY_SIG, &[Datum::from(5), Datum::from(0)]),
            None
        );
        assert_eq!(
            DIVIDE.execute(
                &DUMMY_SIG,
                &[
                    Datum::from(Decimal::from(1)),
                    Datum::from(Decimal::from(3))
                ]
            ),
            Some(Datum::from(
                Decimal::from_str("0.33333333333333").unwrap()
            ))
        );
    }

    #[test]
    fn test_decimal_types() {
        assert_eq!(
            additive_decimal_type(&[DataType::Decimal(10, 2), DataType::Decimal(5, 4)]),
            DataType::Decimal(11, 4)
        );
        assert_eq!(
            multiply_decimal_type(&[DataType::Decimal(20, 10), DataType::Decimal(20, 10)]),
            DataType::Decimal(28, 14)
        );
    }
}
