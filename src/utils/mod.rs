//! Small cross-cutting helpers that don't belong to one layer.

pub mod validation;

pub use validation::PayloadValidator;
