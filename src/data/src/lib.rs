#[macro_use]
extern crate lazy_static;

mod datatype;
mod datum;
pub use chrono;
pub use datatype::*;
pub use datum::*;
pub use rust_decimal;
