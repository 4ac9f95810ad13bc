//! Centralized error handling for the decision flow engine
//!
//! This module provides a comprehensive error handling system that unifies
//! error types across all application layers and provides consistent error
//! reporting and debugging capabilities.
//!
//! # Error Categories
//!
//! - **Database errors**: SeaORM connection/query/migration issues
//! - **Repository errors**: data access layer failures
//! - **Expression errors**: grammar parsing, concrete/symbolic transform failures
//! - **Web errors**: HTTP request/response handling issues
//!
//! # Usage
//!
//! ```rust
//! use decision_flow_engine::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Repository Results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for expression-layer Results
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Convenience type alias for Web Results
pub type WebResult<T> = Result<T, WebError>;
