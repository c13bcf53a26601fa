//! A normalizing expression builder for a cost based SQL optimizer.
//!
//! The workspace is split the same way the planner is layered: `data` holds the
//! value and type system, `functions` the overloads used for type inference and
//! constant folding, `catalog` the table definitions, `ast` the operator
//! vocabulary and `planner` the memo, property derivation and rewrite rules.
pub use ast;
pub use catalog;
pub use data;
pub use functions;
pub use planner;

pub use planner::{Factory, GroupId, NormConfig, NormError};
