//! Error type definitions for the decision flow engine
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that makes debugging and error
//! handling more straightforward.

use thiserror::Error;

/// Top-level application error type.
///
/// Mirrors the error taxonomy of the evaluation pipeline: each variant here
/// corresponds to one row of the error-handling table (`InvalidObjectId`,
/// `NotFound`, `InvalidPayload`, `InvalidFlow`, `RuntimeError`,
/// `SymbolicTimeout`, storage failures).
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors (SeaORM)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Repository layer errors
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Expression grammar/parser errors
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// An identifier fails shape validation
    #[error("Invalid identifier: {id}")]
    InvalidObjectId { id: String },

    /// Requested flow/user missing
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Concrete payload fails the flow's dynamic input schema
    #[error("Invalid payload")]
    InvalidPayload { details: std::collections::HashMap<String, String> },

    /// Structural invariants of the flow graph are violated
    #[error("Invalid flow: {message}")]
    InvalidFlow { message: String },

    /// Parser/transformer/executor internal failure, wrapped with the
    /// original cause's type name so callers can distinguish failure modes.
    #[error("Runtime error ({original_error_type}): {message}")]
    RuntimeError {
        message: String,
        original_error_type: String,
    },

    /// The SMT solver returned `unknown` with a timeout reason.
    #[error("Symbolic evaluation timed out")]
    SymbolicTimeout,

    /// Storage update affected zero rows where one was expected.
    #[error("Update failed: {message}")]
    UpdateFailed { message: String },

    /// Unique constraint violation.
    #[error("Duplicate key: {message}")]
    DuplicateKey { message: String },

    /// Storage backend unreachable.
    #[error("Database unavailable: {message}")]
    DatabaseUnavailable { message: String },

    /// Authentication failure (bad credentials / invalid token).
    #[error("Authentication error: {message}")]
    Unauthorized { message: String },

    /// Generic internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Repository layer specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Record not found: {table} with {field} = {value}")]
    RecordNotFound {
        table: String,
        field: String,
        value: String,
    },

    #[error("Constraint violation: {constraint} - {message}")]
    ConstraintViolation { constraint: String, message: String },

    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Expression grammar / transformer specific errors (C1, C3, C4)
#[derive(Error, Debug, Clone)]
pub enum ExpressionError {
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },

    #[error("Unexpected token {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        pos: usize,
    },

    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Name error: {0}")]
    NameError(String),

    #[error("Key error: {0}")]
    KeyError(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Builtin '{0}' is not supported symbolically")]
    UnsupportedSymbolicBuiltin(String),
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    #[error("Missing header: {header}")]
    MissingHeader { header: String },

    #[error("Invalid authentication: {message}")]
    InvalidAuth { message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AppError {
    pub fn invalid_object_id<S: Into<String>>(id: S) -> Self {
        Self::InvalidObjectId { id: id.into() }
    }

    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn invalid_flow<S: Into<String>>(message: S) -> Self {
        Self::InvalidFlow {
            message: message.into(),
        }
    }

    /// Wrap an expression-layer error as a `RuntimeError`, attaching the
    /// original error's variant name as its cause type.
    pub fn runtime_error(original: &ExpressionError) -> Self {
        Self::RuntimeError {
            message: original.to_string(),
            original_error_type: expression_error_variant_name(original).to_string(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

fn expression_error_variant_name(e: &ExpressionError) -> &'static str {
    match e {
        ExpressionError::UnexpectedChar { .. } => "UnexpectedChar",
        ExpressionError::UnterminatedString { .. } => "UnterminatedString",
        ExpressionError::UnexpectedToken { .. } => "UnexpectedToken",
        ExpressionError::UnexpectedEof { .. } => "UnexpectedEof",
        ExpressionError::NameError(_) => "NameError",
        ExpressionError::KeyError(_) => "KeyError",
        ExpressionError::TypeError(_) => "TypeError",
        ExpressionError::IndexError(_) => "IndexError",
        ExpressionError::DivisionByZero => "DivisionByZero",
        ExpressionError::UnsupportedSymbolicBuiltin(_) => "UnsupportedSymbolicBuiltin",
    }
}

/// Translate a SeaORM database error into the canonical `AppError` taxonomy.
///
/// The storage collaborator is free to return raw `DbErr`s; this is the one
/// place they get mapped to the error kinds the rest of the system expects,
/// mirroring the original service's single `translate_mongo_error` chokepoint.
pub fn translate_db_error(err: sea_orm::DbErr) -> AppError {
    use sea_orm::DbErr;

    match &err {
        DbErr::RecordNotFound(msg) => AppError::NotFound {
            resource: "record".to_string(),
            id: msg.clone(),
        },
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => AppError::DatabaseUnavailable {
            message: err.to_string(),
        },
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            let msg = runtime_err.to_string();
            if msg.to_lowercase().contains("unique") || msg.to_lowercase().contains("duplicate") {
                AppError::DuplicateKey { message: msg }
            } else {
                AppError::Database(err)
            }
        }
        _ => AppError::Database(err),
    }
}
