use crate::{register_builtins, FunctionDefinition, FunctionSignature, ResolvedFunction};
use data::DataType;
use std::collections::HashMap;
use thiserror::Error;

/// A repository for functions. Used by the planner to infer result types and to fold
/// constant expressions.
#[derive(Debug)]
pub struct Registry {
    functions: HashMap<&'static str, Vec<FunctionDefinition>>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new(true)
    }
}

#[derive(Debug, Eq, PartialEq, Error)]
pub enum FunctionResolutionError {
    #[error("Function {0} not found")]
    FunctionNotFound(String),
    #[error("No overload of {0} matches the argument types ({1})")]
    MatchingSignatureNotFound(String, String),
}

impl Registry {
    pub fn new(with_builtins: bool) -> Self {
        let mut registry = Registry {
            functions: HashMap::new(),
        };

        if with_builtins {
            register_builtins(&mut registry)
        }

        registry
    }

    pub(crate) fn register_function(&mut self, function_definition: FunctionDefinition) {
        self.functions
            .entry(function_definition.signature.name)
            .or_insert_with(Vec::new)
            .push(function_definition);
    }

    /// Finds the overload of the named function matching the argument types.
    /// Null arguments act as wildcards, so the result type of an expression with null
    /// inputs can still be inferred. Candidates are tried in registration order.
    pub fn resolve(
        &self,
        name: &str,
        args: &[DataType],
    ) -> Result<ResolvedFunction, FunctionResolutionError> {
        let candidates = self
            .functions
            .get(name)
            .ok_or_else(|| FunctionResolutionError::FunctionNotFound(name.to_string()))?;

        let candidate = candidates
            .iter()
            .find(|candidate| {
                candidate.signature.args.len() == args.len()
                    && candidate
                        .signature
                        .args
                        .iter()
                        .zip(args.iter())
                        .all(|(expected, actual)| {
                            *actual == DataType::Null || expected.matches(actual)
                        })
            })
            .ok_or_else(|| {
                FunctionResolutionError::MatchingSignatureNotFound(
                    name.to_string(),
                    args.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })?;

        // Nulls take on the type the overload declares for them
        let concrete_args: Vec<_> = candidate
            .signature
            .args
            .iter()
            .zip(args.iter())
            .map(|(expected, actual)| {
                if *actual == DataType::Null {
                    *expected
                } else {
                    *actual
                }
            })
            .collect();

        let ret = if let Some(type_resolver) = candidate.custom_return_type_resolver {
            type_resolver(&concrete_args)
        } else {
            candidate.signature.ret
        };

        Ok(ResolvedFunction {
            signature: FunctionSignature {
                name: candidate.signature.name,
                args: concrete_args,
                ret,
            },
            allows_null_args: candidate.allows_null_args,
            function: candidate.function,
        })
    }
}
