//! The runtime value domain shared by the concrete transformer and the
//! payload/input-schema layer (C2, C3).

use std::collections::BTreeMap;

use crate::errors::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Null,
    List(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "text",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    pub fn as_bool(&self) -> Result<bool, ExpressionError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(ExpressionError::TypeError(format!(
                "expected bool, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ExpressionError> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            other => Err(ExpressionError::TypeError(format!(
                "expected number, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn as_str(&self) -> Result<&str, ExpressionError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(ExpressionError::TypeError(format!(
                "expected text, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn as_list(&self) -> Result<&[Value], ExpressionError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(ExpressionError::TypeError(format!(
                "expected list, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn from_json(value: &serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::json!(i),
            Value::Float(f) => serde_json::json!(f),
            Value::Str(s) => serde_json::json!(s),
            Value::Bool(b) => serde_json::json!(b),
            Value::Null => serde_json::Value::Null,
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}
