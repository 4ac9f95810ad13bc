//! Concrete transformer (C3): folds an AST bottom-up over a payload
//! environment into a boolean or value.

use std::collections::BTreeMap;

use crate::errors::ExpressionError;
use crate::expression::ast::{BinOp, Expr, ExprKind};
use crate::expression::Value;

/// Evaluate `expr` against `env`, the payload environment keyed by the
/// flow's declared input names.
pub fn eval(expr: &Expr, env: &BTreeMap<String, Value>) -> Result<Value, ExpressionError> {
    match &expr.kind {
        ExprKind::Number(n) => Ok(numeric_literal(*n)),
        ExprKind::Str(s) => Ok(Value::Str(s.clone())),
        ExprKind::Bool(b) => Ok(Value::Bool(*b)),
        ExprKind::Null => Ok(Value::Null),
        ExprKind::List(items) => {
            let values = items
                .iter()
                .map(|e| eval(e, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        ExprKind::Object(entries) => {
            let mut map = BTreeMap::new();
            for (key, value_expr) in entries {
                map.insert(key.clone(), eval(value_expr, env)?);
            }
            Ok(Value::Object(map))
        }
        ExprKind::Name(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| ExpressionError::NameError(format!("Variable '{name}' not found in environment."))),
        ExprKind::Member(base, key) => {
            let val = eval(base, env)?;
            member_access(&val, key)
        }
        ExprKind::Index(base, index_expr) => {
            let container = eval(base, env)?;
            let index = eval(index_expr, env)?;
            do_index(&container, &index)
        }
        ExprKind::Neg(inner) => {
            let v = eval(inner, env)?;
            match v {
                Value::Null => Ok(Value::Null),
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(ExpressionError::TypeError(format!(
                    "Operand for neg must be numeric. Got {}.",
                    other.type_name()
                ))),
            }
        }
        ExprKind::Not(inner) => {
            let v = eval(inner, env)?.as_bool().map_err(|_| {
                ExpressionError::TypeError("Operand of not_op must be bool.".to_string())
            })?;
            Ok(Value::Bool(!v))
        }
        ExprKind::BinOp(op, lhs, rhs) => eval_binop(*op, lhs, rhs, env),
        ExprKind::If(cond, then_e, else_e) => {
            let c = eval(cond, env)?;
            let b = c
                .as_bool()
                .map_err(|_| ExpressionError::TypeError("Condition in if_expr must be bool.".to_string()))?;
            if b {
                eval(then_e, env)
            } else {
                eval(else_e, env)
            }
        }
        ExprKind::Call(name, args) => {
            let values = args
                .iter()
                .map(|a| eval(a, env))
                .collect::<Result<Vec<_>, _>>()?;
            call_builtin(name, values)
        }
    }
}

fn numeric_literal(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Int(n as i64)
    } else {
        Value::Float(n)
    }
}

fn member_access(val: &Value, key: &str) -> Result<Value, ExpressionError> {
    match val {
        Value::Object(map) => map
            .get(key)
            .cloned()
            .ok_or_else(|| ExpressionError::KeyError(format!("Key '{key}' not found in nested environment."))),
        other => Err(ExpressionError::TypeError(format!(
            "Expected a dict for key access, got {}.",
            other.type_name()
        ))),
    }
}

fn do_index(container: &Value, index: &Value) -> Result<Value, ExpressionError> {
    if index.is_null() {
        return Err(ExpressionError::TypeError("Index value is None.".to_string()));
    }
    let idx_f = index.as_f64().map_err(|_| {
        ExpressionError::TypeError(format!("Index must be int or float, got {}.", index.type_name()))
    })?;
    let py_idx = idx_f as i64 - 1;

    let len = match container {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        Value::Null => {
            return Err(ExpressionError::TypeError("Container is None for indexing.".to_string()))
        }
        other => {
            return Err(ExpressionError::TypeError(format!(
                "Container must be list or str, got {}.",
                other.type_name()
            )))
        }
    };

    if py_idx < 0 || py_idx as usize >= len {
        return Err(ExpressionError::IndexError(format!(
            "Index {} out of range for container of length {}.",
            py_idx + 1,
            len
        )));
    }

    match container {
        Value::List(items) => Ok(items[py_idx as usize].clone()),
        Value::Str(s) => Ok(Value::Str(s.chars().nth(py_idx as usize).unwrap().to_string())),
        _ => unreachable!(),
    }
}

fn eval_binop(op: BinOp, lhs: &Expr, rhs: &Expr, env: &BTreeMap<String, Value>) -> Result<Value, ExpressionError> {
    match op {
        BinOp::And => {
            let a = eval(lhs, env)?
                .as_bool()
                .map_err(|_| ExpressionError::TypeError("First operand of and_op must be bool.".to_string()))?;
            if !a {
                return Ok(Value::Bool(false));
            }
            let b = eval(rhs, env)?
                .as_bool()
                .map_err(|_| ExpressionError::TypeError("Second operand of and_op must be bool.".to_string()))?;
            Ok(Value::Bool(b))
        }
        BinOp::Or => {
            let a = eval(lhs, env)?
                .as_bool()
                .map_err(|_| ExpressionError::TypeError("First operand of or_op must be bool.".to_string()))?;
            if a {
                return Ok(Value::Bool(true));
            }
            let b = eval(rhs, env)?
                .as_bool()
                .map_err(|_| ExpressionError::TypeError("Second operand of or_op must be bool.".to_string()))?;
            Ok(Value::Bool(b))
        }
        BinOp::Eq => {
            let a = eval(lhs, env)?;
            let b = eval(rhs, env)?;
            Ok(Value::Bool(values_equal(&a, &b)))
        }
        BinOp::Ne => {
            let a = eval(lhs, env)?;
            let b = eval(rhs, env)?;
            Ok(Value::Bool(!values_equal(&a, &b)))
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let a = eval(lhs, env)?;
            let b = eval(rhs, env)?;
            if a.is_null() || b.is_null() {
                return Err(ExpressionError::TypeError("Cannot compare None values.".to_string()));
            }
            let af = a.as_f64()?;
            let bf = b.as_f64()?;
            let result = match op {
                BinOp::Lt => af < bf,
                BinOp::Le => af <= bf,
                BinOp::Gt => af > bf,
                BinOp::Ge => af >= bf,
                _ => unreachable!(),
            };
            Ok(Value::Bool(result))
        }
        BinOp::In => {
            let a = eval(lhs, env)?;
            let b = eval(rhs, env)?;
            do_in(&a, &b)
        }
        BinOp::Add => arith(eval(lhs, env)?, eval(rhs, env)?, ArithOp::Add),
        BinOp::Sub => arith(eval(lhs, env)?, eval(rhs, env)?, ArithOp::Sub),
        BinOp::Mul => arith(eval(lhs, env)?, eval(rhs, env)?, ArithOp::Mul),
        BinOp::Div => arith(eval(lhs, env)?, eval(rhs, env)?, ArithOp::Div),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        (Value::Float(x), Value::Float(y)) => x == y,
        _ => a == b,
    }
}

enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

fn arith(a: Value, b: Value, op: ArithOp) -> Result<Value, ExpressionError> {
    if a.is_null() || b.is_null() {
        return Ok(Value::Null);
    }

    if let ArithOp::Add = op {
        if let (Value::Str(x), Value::Str(y)) = (&a, &b) {
            return Ok(Value::Str(format!("{x}{y}")));
        }
        if let (Value::List(x), Value::List(y)) = (&a, &b) {
            let mut out = x.clone();
            out.extend(y.clone());
            return Ok(Value::List(out));
        }
    }

    let (an, bn) = match (&a, &b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => (&a, &b),
        _ => {
            return Err(ExpressionError::TypeError(format!(
                "Operands for arithmetic must be both numbers, both strings, or both lists, got {} and {}.",
                a.type_name(),
                b.type_name()
            )))
        }
    };

    if let (Value::Int(x), Value::Int(y)) = (an, bn) {
        return match op {
            ArithOp::Add => Ok(Value::Int(x + y)),
            ArithOp::Sub => Ok(Value::Int(x - y)),
            ArithOp::Mul => Ok(Value::Int(x * y)),
            ArithOp::Div => {
                if *y == 0 {
                    Err(ExpressionError::DivisionByZero)
                } else {
                    Ok(Value::Float(*x as f64 / *y as f64))
                }
            }
        };
    }

    let xf = an.as_f64()?;
    let yf = bn.as_f64()?;
    match op {
        ArithOp::Add => Ok(Value::Float(xf + yf)),
        ArithOp::Sub => Ok(Value::Float(xf - yf)),
        ArithOp::Mul => Ok(Value::Float(xf * yf)),
        ArithOp::Div => {
            if yf == 0.0 {
                Err(ExpressionError::DivisionByZero)
            } else {
                Ok(Value::Float(xf / yf))
            }
        }
    }
}

fn do_in(left: &Value, right: &Value) -> Result<Value, ExpressionError> {
    match right {
        Value::Str(s) => {
            let needle = left
                .as_str()
                .map_err(|_| ExpressionError::TypeError("Left operand for 'in' with string must be text.".to_string()))?;
            Ok(Value::Bool(s.contains(needle)))
        }
        Value::List(items) => Ok(Value::Bool(items.iter().any(|v| values_equal(v, left)))),
        Value::Null => Err(ExpressionError::TypeError("Right operand for 'in' operator is None.".to_string())),
        other => Err(ExpressionError::TypeError(format!(
            "Right operand for 'in' must be text or list, got {}.",
            other.type_name()
        ))),
    }
}

fn call_builtin(name: &str, mut args: Vec<Value>) -> Result<Value, ExpressionError> {
    match name {
        "length" => {
            let x = arg(&mut args, 0)?;
            if x.is_null() {
                return Ok(Value::Null);
            }
            let len = match &x {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                other => {
                    return Err(ExpressionError::TypeError(format!(
                        "length expects text or list, got {}.",
                        other.type_name()
                    )))
                }
            };
            Ok(Value::Int(len as i64))
        }
        "substring" => {
            let text = arg(&mut args, 0)?;
            let start = arg(&mut args, 1)?;
            if text.is_null() || start.is_null() {
                return Ok(Value::Null);
            }
            let s = text.as_str()?;
            let chars: Vec<char> = s.chars().collect();
            let start_idx = (start.as_f64()? as i64 - 1).max(0) as usize;
            let slice = if let Some(len_val) = args.get(2) {
                if len_val.is_null() {
                    return Ok(Value::Null);
                }
                let len = len_val.as_f64()? as i64;
                let end = (start_idx as i64 + len).clamp(0, chars.len() as i64) as usize;
                chars.get(start_idx.min(chars.len())..end).unwrap_or(&[])
            } else {
                chars.get(start_idx.min(chars.len())..).unwrap_or(&[])
            };
            Ok(Value::Str(slice.iter().collect()))
        }
        "upper" => {
            let x = arg(&mut args, 0)?;
            if x.is_null() {
                return Ok(Value::Null);
            }
            Ok(Value::Str(x.as_str()?.to_uppercase()))
        }
        "lower" => {
            let x = arg(&mut args, 0)?;
            if x.is_null() {
                return Ok(Value::Null);
            }
            Ok(Value::Str(x.as_str()?.to_lowercase()))
        }
        "contains" => {
            let container = arg(&mut args, 0)?;
            let item = arg(&mut args, 1)?;
            if container.is_null() {
                return Ok(Value::Null);
            }
            match &container {
                Value::Str(s) => Ok(Value::Bool(s.contains(item.as_str()?))),
                Value::List(items) => Ok(Value::Bool(items.iter().any(|v| values_equal(v, &item)))),
                other => Err(ExpressionError::TypeError(format!(
                    "contains expects text or list container, got {}.",
                    other.type_name()
                ))),
            }
        }
        "startsWith" => {
            let s = arg(&mut args, 0)?;
            let prefix = arg(&mut args, 1)?;
            if s.is_null() || prefix.is_null() {
                return Ok(Value::Null);
            }
            Ok(Value::Bool(s.as_str()?.starts_with(prefix.as_str()?)))
        }
        "endsWith" => {
            let s = arg(&mut args, 0)?;
            let suffix = arg(&mut args, 1)?;
            if s.is_null() || suffix.is_null() {
                return Ok(Value::Null);
            }
            Ok(Value::Bool(s.as_str()?.ends_with(suffix.as_str()?)))
        }
        "append" => {
            let list = arg(&mut args, 0)?;
            let value = arg(&mut args, 1)?;
            if list.is_null() {
                return Ok(Value::Null);
            }
            let mut items = list.as_list()?.to_vec();
            items.push(value);
            Ok(Value::List(items))
        }
        "remove" => {
            let list = arg(&mut args, 0)?;
            let value = arg(&mut args, 1)?;
            if list.is_null() {
                return Ok(Value::Null);
            }
            let items = list.as_list()?;
            let mut out = Vec::with_capacity(items.len());
            let mut removed = false;
            for item in items {
                if !removed && values_equal(item, &value) {
                    removed = true;
                    continue;
                }
                out.push(item.clone());
            }
            Ok(Value::List(out))
        }
        "count" => {
            let x = arg(&mut args, 0)?;
            if x.is_null() {
                return Ok(Value::Null);
            }
            match &x {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::List(items) => Ok(Value::Int(items.len() as i64)),
                _ => Ok(Value::Int(1)),
            }
        }
        "is_null" => {
            let x = arg(&mut args, 0)?;
            Ok(Value::Bool(x.is_null()))
        }
        "coalesce" => {
            for a in &args {
                if !a.is_null() {
                    return Ok(a.clone());
                }
            }
            Ok(Value::Null)
        }
        other => Err(ExpressionError::NameError(format!(
            "Function '{other}' is not a built-in."
        ))),
    }
}

fn arg(args: &mut [Value], idx: usize) -> Result<Value, ExpressionError> {
    args.get(idx)
        .cloned()
        .ok_or_else(|| ExpressionError::TypeError(format!("Missing argument at position {idx}.")))
}
