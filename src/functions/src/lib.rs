pub mod registry;
mod scalar;
use crate::registry::Registry;
use data::{DataType, Datum};
use std::fmt::{Debug, Formatter};

/// The signature for a function. Signatures are scanned to find a match during planning.
/// For decimal types etc the matching process will ignore the type parameters.
/// When using this to lookup a function the ret type is populated
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FunctionSignature<'a> {
    pub name: &'a str,
    pub args: Vec<DataType>,
    pub ret: DataType,
}

/// The definition of a function, enough info for resolving types etc
pub struct FunctionDefinition {
    pub signature: FunctionSignature<'static>,
    pub custom_return_type_resolver: Option<fn(&[DataType]) -> DataType>,
    // Most functions return null when any of their inputs are null, the ones that
    // don't (ie IS) need to set this so the planner won't fold them away.
    pub allows_null_args: bool,
    pub function: &'static dyn Function,
}

impl Debug for FunctionDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("FunctionDefinition[")?;
        self.signature.fmt(f)?;
        f.write_str("]")
    }
}

impl FunctionDefinition {
    pub fn new(
        name: &'static str,
        args: Vec<DataType>,
        ret: DataType,
        function: &'static dyn Function,
    ) -> Self {
        FunctionDefinition {
            signature: FunctionSignature { name, args, ret },
            custom_return_type_resolver: None,
            allows_null_args: false,
            function,
        }
    }

    pub fn new_with_type_resolver(
        name: &'static str,
        args: Vec<DataType>,
        return_type_resolver: fn(&[DataType]) -> DataType,
        function: &'static dyn Function,
    ) -> Self {
        let ret = return_type_resolver(&args);
        FunctionDefinition {
            signature: FunctionSignature { name, args, ret },
            custom_return_type_resolver: Some(return_type_resolver),
            allows_null_args: false,
            function,
        }
    }

    /// Marks the function as producing meaningful results for null inputs.
    pub fn with_null_args(mut self) -> Self {
        self.allows_null_args = true;
        self
    }
}

/// A function implementation
pub trait Function: Debug + Sync + 'static {
    /// Evaluates the function over constant inputs at planning time.
    /// Returns None if the result can't be computed without raising an
    /// evaluation error (ie overflow or division by zero), such calls are left for
    /// the executor to report.
    fn execute(&self, signature: &FunctionSignature, args: &[Datum]) -> Option<Datum>;
}

/// The outcome of resolving a function against concrete argument types.
#[derive(Debug, Clone)]
pub struct ResolvedFunction {
    pub signature: FunctionSignature<'static>,
    pub allows_null_args: bool,
    pub function: &'static dyn Function,
}

impl ResolvedFunction {
    pub fn execute(&self, args: &[Datum]) -> Option<Datum> {
        self.function.execute(&self.signature, args)
    }
}

fn register_builtins(registry: &mut Registry) {
    scalar::register_builtins(registry)
}
