pub mod range;

pub use range::*;
