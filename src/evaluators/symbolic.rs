//! Symbolic transformer (C4): lifts the AST into SMT expressions over
//! typed sort variables, maintaining a `reverse_map` from lifted expression
//! back to readable surface syntax.

use std::collections::HashMap;

use z3::ast::{Ast, Bool, Dynamic, Real, String as Z3Str};
use z3::Context;

use crate::errors::ExpressionError;
use crate::expression::ast::{BinOp, Expr, ExprKind};
use crate::models::metadata::{InputType, StartMetadata};

/// A lifted value: every leaf of the concrete domain maps onto exactly one
/// of these three SMT sorts (object/list inputs are opaque string
/// surrogates, usable only for equality and the string builtins).
#[derive(Clone)]
pub enum Symbolic<'ctx> {
    Bool(Bool<'ctx>),
    Real(Real<'ctx>),
    Str(Z3Str<'ctx>),
}

impl<'ctx> Symbolic<'ctx> {
    pub fn as_dynamic(&self) -> Dynamic<'ctx> {
        match self {
            Symbolic::Bool(b) => Dynamic::from_ast(b),
            Symbolic::Real(r) => Dynamic::from_ast(r),
            Symbolic::Str(s) => Dynamic::from_ast(s),
        }
    }

    pub fn as_bool(&self) -> Result<Bool<'ctx>, ExpressionError> {
        match self {
            Symbolic::Bool(b) => Ok(b.clone()),
            _ => Err(ExpressionError::TypeError("expected a bool-sorted expression".to_string())),
        }
    }

    pub fn as_real(&self) -> Result<Real<'ctx>, ExpressionError> {
        match self {
            Symbolic::Real(r) => Ok(r.clone()),
            _ => Err(ExpressionError::TypeError("expected a real-sorted expression".to_string())),
        }
    }

    pub fn as_zstr(&self) -> Result<Z3Str<'ctx>, ExpressionError> {
        match self {
            Symbolic::Str(s) => Ok(s.clone()),
            _ => Err(ExpressionError::TypeError("expected a string-sorted expression".to_string())),
        }
    }
}

/// Builds one symbolic variable per declared START input (§4.3).
pub fn symbolic_vars<'ctx>(
    ctx: &'ctx Context,
    spec: &StartMetadata,
) -> HashMap<String, Symbolic<'ctx>> {
    spec.inputs
        .iter()
        .map(|input| {
            let var = match input.input_type {
                InputType::Bool => Symbolic::Bool(Bool::new_const(ctx, input.display_name.as_str())),
                InputType::Number => Symbolic::Real(Real::new_const(ctx, input.display_name.as_str())),
                InputType::Text | InputType::Object | InputType::List => {
                    Symbolic::Str(Z3Str::new_const(ctx, input.display_name.as_str()))
                }
            };
            (input.display_name.clone(), var)
        })
        .collect()
}

/// Tracks the readable surface text for every expression synthesized by
/// the transformer, keyed by expression identity. Expressions produced
/// later by solver-internal simplification are not present here and must
/// be rendered by the structural fallback printer.
pub struct ReverseMap<'ctx> {
    texts: HashMap<Dynamic<'ctx>, String>,
}

impl<'ctx> Default for ReverseMap<'ctx> {
    fn default() -> Self {
        Self { texts: HashMap::new() }
    }
}

impl<'ctx> ReverseMap<'ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, value: Symbolic<'ctx>, text: String) -> Symbolic<'ctx> {
        self.texts.insert(value.as_dynamic(), text);
        value
    }

    pub fn lookup_dynamic(&self, expr: &Dynamic<'ctx>) -> Option<String> {
        self.texts.get(expr).cloned()
    }

    /// Render a boolean expression as readable text, preferring the
    /// recorded surface form and falling back to a structural
    /// pretty-printer for expressions born out of simplification.
    pub fn render_bool(&self, expr: &Bool<'ctx>) -> String {
        let dynamic = Dynamic::from_ast(expr);
        if let Some(text) = self.texts.get(&dynamic) {
            return text.clone();
        }
        structural_render_bool(self, expr)
    }
}

fn structural_render_bool(map: &ReverseMap, expr: &Bool) -> String {
    if expr.as_bool().is_some() {
        return if expr.as_bool().unwrap() { "true".to_string() } else { "false".to_string() };
    }

    let children = expr.children();
    let decl_name = expr.decl().name();

    match decl_name.as_str() {
        "not" if children.len() == 1 => {
            let inner = children[0].as_bool().expect("not operand must be bool");
            rewrite_negation(map, &inner)
        }
        "and" => format!(
            "({})",
            children
                .iter()
                .map(|c| map.render_bool(&c.as_bool().expect("and operand must be bool")))
                .collect::<Vec<_>>()
                .join(" and ")
        ),
        "or" => format!(
            "({})",
            children
                .iter()
                .map(|c| map.render_bool(&c.as_bool().expect("or operand must be bool")))
                .collect::<Vec<_>>()
                .join(" or ")
        ),
        "<=" | "<" | ">=" | ">" | "=" if children.len() == 2 => {
            format!(
                "{} {} {}",
                render_dynamic(map, &children[0]),
                decl_name,
                render_dynamic(map, &children[1])
            )
        }
        _ => expr.to_string(),
    }
}

fn render_dynamic(map: &ReverseMap, value: &Dynamic) -> String {
    if let Some(text) = map.lookup_dynamic(value) {
        return text;
    }
    if let Some(b) = value.as_bool() {
        return structural_render_bool(map, &b);
    }
    value.to_string()
}

/// Rewrites `not (a op b)` as the complementary comparator, per §4.5's
/// back-mapping rule, so negated conditions read naturally.
fn rewrite_negation(map: &ReverseMap, inner: &Bool) -> String {
    let children = inner.children();
    let decl_name = inner.decl().name();
    if children.len() == 2 {
        let flipped = match decl_name.as_str() {
            "<=" => Some(">"),
            "<" => Some(">="),
            ">=" => Some("<"),
            ">" => Some("<="),
            "=" => Some("!="),
            _ => None,
        };
        if let Some(op) = flipped {
            return format!(
                "{} {} {}",
                render_dynamic(map, &children[0]),
                op,
                render_dynamic(map, &children[1])
            );
        }
    }
    format!("not ({})", map.render_bool(inner))
}

/// Lifts `expr` into an SMT value, recording readable text for every
/// synthesized node in `reverse_map`.
pub fn lift<'ctx>(
    ctx: &'ctx Context,
    expr: &Expr,
    vars: &HashMap<String, Symbolic<'ctx>>,
    reverse_map: &mut ReverseMap<'ctx>,
) -> Result<Symbolic<'ctx>, ExpressionError> {
    match &expr.kind {
        ExprKind::Number(n) => {
            let (num, den) = decimal_to_ratio(*n);
            let value = Symbolic::Real(Real::from_real(ctx, num, den));
            Ok(reverse_map.record(value, format_number(*n)))
        }
        ExprKind::Str(s) => {
            let value = Symbolic::Str(Z3Str::from_str(ctx, s).map_err(|_| {
                ExpressionError::TypeError(format!("string literal '{s}' is not representable"))
            })?);
            Ok(reverse_map.record(value, format!("\"{s}\"")))
        }
        ExprKind::Bool(b) => {
            let value = Symbolic::Bool(Bool::from_bool(ctx, *b));
            Ok(reverse_map.record(value, b.to_string()))
        }
        ExprKind::Null => {
            let value = Symbolic::Str(Z3Str::from_str(ctx, "").unwrap_or_else(|_| Z3Str::new_const(ctx, "__null__")));
            Ok(reverse_map.record(value, "null".to_string()))
        }
        ExprKind::Name(name) => {
            let var = vars
                .get(name)
                .ok_or_else(|| ExpressionError::NameError(format!("Symbol {name} not found in symbolic vars")))?
                .clone();
            Ok(reverse_map.record(var, name.clone()))
        }
        ExprKind::Member(_, _) | ExprKind::Index(_, _) => Err(ExpressionError::TypeError(
            "nested member/index access is not supported symbolically".to_string(),
        )),
        ExprKind::Neg(inner) => {
            let v = lift(ctx, inner, vars, reverse_map)?.as_real()?;
            let expr_val = Symbolic::Real(Real::unary_minus(&v));
            let text = format!("-({})", reverse_map.lookup_dynamic(&Dynamic::from_ast(&v)).unwrap_or_default());
            Ok(reverse_map.record(expr_val, text))
        }
        ExprKind::Not(inner) => {
            let v = lift(ctx, inner, vars, reverse_map)?.as_bool()?;
            let expr_val = Symbolic::Bool(v.not());
            let text = format!("not ({})", reverse_map.render_bool(&v));
            Ok(reverse_map.record(expr_val, text))
        }
        ExprKind::BinOp(op, lhs, rhs) => lift_binop(ctx, *op, lhs, rhs, vars, reverse_map),
        ExprKind::If(cond, then_e, else_e) => {
            let c = lift(ctx, cond, vars, reverse_map)?.as_bool()?;
            let then_v = lift(ctx, then_e, vars, reverse_map)?;
            let else_v = lift(ctx, else_e, vars, reverse_map)?;
            let value = match (&then_v, &else_v) {
                (Symbolic::Real(t), Symbolic::Real(e)) => Symbolic::Real(c.ite(t, e)),
                (Symbolic::Str(t), Symbolic::Str(e)) => Symbolic::Str(c.ite(t, e)),
                (Symbolic::Bool(t), Symbolic::Bool(e)) => Symbolic::Bool(c.ite(t, e)),
                _ => {
                    return Err(ExpressionError::TypeError(
                        "if/then/else branches must agree in sort".to_string(),
                    ))
                }
            };
            Ok(value)
        }
        ExprKind::Call(name, args) => lift_call(ctx, name, args, vars, reverse_map),
        ExprKind::List(_) | ExprKind::Object(_) => Err(ExpressionError::TypeError(
            "list/object literals are not supported symbolically".to_string(),
        )),
    }
}

fn lift_binop<'ctx>(
    ctx: &'ctx Context,
    op: BinOp,
    lhs: &Expr,
    rhs: &Expr,
    vars: &HashMap<String, Symbolic<'ctx>>,
    reverse_map: &mut ReverseMap<'ctx>,
) -> Result<Symbolic<'ctx>, ExpressionError> {
    match op {
        BinOp::And | BinOp::Or => {
            let a = lift(ctx, lhs, vars, reverse_map)?.as_bool()?;
            let b = lift(ctx, rhs, vars, reverse_map)?.as_bool()?;
            let kind = if matches!(op, BinOp::And) { "and" } else { "or" };
            let mut conjuncts = Vec::new();
            flatten(&a, kind, &mut conjuncts);
            flatten(&b, kind, &mut conjuncts);
            let combined = if conjuncts.len() > 1 {
                let refs: Vec<&Bool> = conjuncts.iter().collect();
                if matches!(op, BinOp::And) {
                    Bool::and(ctx, &refs)
                } else {
                    Bool::or(ctx, &refs)
                }
            } else {
                conjuncts[0].clone()
            };
            let parts: Vec<String> = conjuncts.iter().map(|c| reverse_map.render_bool(c)).collect();
            let joiner = if matches!(op, BinOp::And) { " and " } else { " or " };
            let text = if parts.len() > 1 {
                format!("({})", parts.join(joiner))
            } else {
                parts[0].clone()
            };
            Ok(reverse_map.record(Symbolic::Bool(combined), text))
        }
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let l = lift(ctx, lhs, vars, reverse_map)?;
            let r = lift(ctx, rhs, vars, reverse_map)?;
            let op_text = match op {
                BinOp::Eq => "=",
                BinOp::Ne => "!=",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                _ => unreachable!(),
            };
            let text = format!(
                "{} {} {}",
                reverse_map.lookup_dynamic(&l.as_dynamic()).unwrap_or_default(),
                op_text,
                reverse_map.lookup_dynamic(&r.as_dynamic()).unwrap_or_default()
            );
            let expr_val = compare(op, &l, &r)?;
            Ok(reverse_map.record(Symbolic::Bool(expr_val), text))
        }
        BinOp::In => {
            let l = lift(ctx, lhs, vars, reverse_map)?.as_zstr()?;
            let r = lift(ctx, rhs, vars, reverse_map)?.as_zstr()?;
            let expr_val = r.contains(&l);
            let text = format!(
                "{} in {}",
                reverse_map.lookup_dynamic(&Dynamic::from_ast(&l)).unwrap_or_default(),
                reverse_map.lookup_dynamic(&Dynamic::from_ast(&r)).unwrap_or_default()
            );
            Ok(reverse_map.record(Symbolic::Bool(expr_val), text))
        }
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
            let l = lift(ctx, lhs, vars, reverse_map)?.as_real()?;
            let r = lift(ctx, rhs, vars, reverse_map)?.as_real()?;
            let (expr_val, op_text) = match op {
                BinOp::Add => (Real::add(ctx, &[&l, &r]), "+"),
                BinOp::Sub => (Real::sub(ctx, &[&l, &r]), "-"),
                BinOp::Mul => (Real::mul(ctx, &[&l, &r]), "*"),
                BinOp::Div => (l.div(&r), "/"),
                _ => unreachable!(),
            };
            let text = format!(
                "{} {} {}",
                reverse_map.lookup_dynamic(&Dynamic::from_ast(&l)).unwrap_or_default(),
                op_text,
                reverse_map.lookup_dynamic(&Dynamic::from_ast(&r)).unwrap_or_default()
            );
            Ok(reverse_map.record(Symbolic::Real(expr_val), text))
        }
    }
}

fn compare<'ctx>(op: BinOp, l: &Symbolic<'ctx>, r: &Symbolic<'ctx>) -> Result<Bool<'ctx>, ExpressionError> {
    match (l, r) {
        (Symbolic::Real(a), Symbolic::Real(b)) => Ok(match op {
            BinOp::Eq => a._eq(b),
            BinOp::Ne => a._eq(b).not(),
            BinOp::Lt => a.lt(b),
            BinOp::Le => a.le(b),
            BinOp::Gt => a.gt(b),
            BinOp::Ge => a.ge(b),
            _ => unreachable!(),
        }),
        (Symbolic::Str(a), Symbolic::Str(b)) => match op {
            BinOp::Eq => Ok(a._eq(b)),
            BinOp::Ne => Ok(a._eq(b).not()),
            _ => Err(ExpressionError::TypeError("only equality is supported on text symbolically".to_string())),
        },
        (Symbolic::Bool(a), Symbolic::Bool(b)) => match op {
            BinOp::Eq => Ok(a._eq(b)),
            BinOp::Ne => Ok(a._eq(b).not()),
            _ => Err(ExpressionError::TypeError("relational comparison requires numeric operands".to_string())),
        },
        _ => Err(ExpressionError::TypeError("comparison operands must agree in sort".to_string())),
    }
}

fn flatten<'ctx>(expr: &Bool<'ctx>, kind: &str, out: &mut Vec<Bool<'ctx>>) {
    if expr.decl().name() == kind {
        for child in expr.children() {
            if let Some(b) = child.as_bool() {
                flatten(&b, kind, out);
                continue;
            }
        }
    } else {
        out.push(expr.clone());
    }
}

fn lift_call<'ctx>(
    ctx: &'ctx Context,
    name: &str,
    args: &[Expr],
    vars: &HashMap<String, Symbolic<'ctx>>,
    reverse_map: &mut ReverseMap<'ctx>,
) -> Result<Symbolic<'ctx>, ExpressionError> {
    let lowered = name.to_lowercase();
    let lifted: Vec<Symbolic<'ctx>> = args
        .iter()
        .map(|a| lift(ctx, a, vars, reverse_map))
        .collect::<Result<_, _>>()?;
    let texts: Vec<String> = lifted
        .iter()
        .map(|v| reverse_map.lookup_dynamic(&v.as_dynamic()).unwrap_or_default())
        .collect();

    match lowered.as_str() {
        "length" => {
            let s = lifted[0].as_zstr()?;
            let value = Symbolic::Real(Real::from_int(&s.length()));
            Ok(reverse_map.record(value, format!("length({})", texts[0])))
        }
        "contains" => {
            let container = lifted[0].as_zstr()?;
            let item = lifted[1].as_zstr()?;
            let value = Symbolic::Bool(container.contains(&item));
            Ok(reverse_map.record(value, format!("contains({}, {})", texts[0], texts[1])))
        }
        "startswith" => {
            let s = lifted[0].as_zstr()?;
            let prefix = lifted[1].as_zstr()?;
            let value = Symbolic::Bool(s.prefix(&prefix));
            Ok(reverse_map.record(value, format!("startswith({}, {})", texts[0], texts[1])))
        }
        "endswith" => {
            let s = lifted[0].as_zstr()?;
            let suffix = lifted[1].as_zstr()?;
            let value = Symbolic::Bool(s.suffix(&suffix));
            Ok(reverse_map.record(value, format!("endswith({}, {})", texts[0], texts[1])))
        }
        "upper" | "lower" => Err(ExpressionError::UnsupportedSymbolicBuiltin(lowered)),
        "append" | "remove" => Err(ExpressionError::UnsupportedSymbolicBuiltin(lowered)),
        "coalesce" if lifted.len() == 2 => {
            let a = lifted[0].as_zstr()?;
            let b = lifted[1].clone();
            let empty = Z3Str::from_str(ctx, "").map_err(|_| {
                ExpressionError::TypeError("could not construct empty string literal".to_string())
            })?;
            let cond = a._eq(&empty);
            let value = match b {
                Symbolic::Str(bs) => Symbolic::Str(cond.ite(&bs, &a)),
                _ => return Err(ExpressionError::TypeError("coalesce operands must both be text symbolically".to_string())),
            };
            Ok(reverse_map.record(value, format!("coalesce({}, {})", texts[0], texts[1])))
        }
        other => Err(ExpressionError::NameError(format!(
            "Unsupported built-in '{other}' in symbolic transformer."
        ))),
    }
}

fn decimal_to_ratio(n: f64) -> (i64, i64) {
    let mut den: i64 = 1;
    let mut num = n;
    while (num.fract()).abs() > 1e-9 && den < 1_000_000_000 {
        num *= 10.0;
        den *= 10;
    }
    (num.round() as i64, den)
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
