//! The vocabulary of the normalizer: operator tags, the shape of each operator's
//! operands and the private (non group) payloads operators carry.
pub mod columns;
pub mod operator;
pub mod private;

pub use columns::*;
pub use operator::*;
pub use private::*;
