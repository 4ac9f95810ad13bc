//! Concrete and symbolic transformers (C3, C4).

pub mod concrete;
pub mod symbolic;

pub use concrete::eval as eval_concrete;
pub use symbolic::{lift, symbolic_vars, ReverseMap, Symbolic};
