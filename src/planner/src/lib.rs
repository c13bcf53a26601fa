//! The normalizing expression builder of the query planner.
//!
//! A `Factory` is created per planning session. The binder constructs the query
//! tree bottom up through it, and each operator is normalized by the rewrite rules
//! before it's deduplicated into the memo and has its logical properties derived.
mod check;
mod config;
mod construct;
mod error;
mod explain;
mod factory;
mod interner;
pub mod memo;
mod metadata;
pub mod props;
pub mod rules;

pub use config::NormConfig;
pub use error::NormError;
pub use factory::{AppliedRuleFn, Factory, MatchedRuleFn};
pub use interner::Interner;
pub use memo::{Expr, GroupId, ListId, Memo, Operand, PrivateId, EMPTY_LIST};
pub use metadata::{ColumnMeta, Metadata, TableMeta};
pub use props::{Cardinality, LogicalProps, RelationalProps, ScalarProps};
pub use rules::{Rewrite, Rule, RuleName};
