//! Symbolic executor (C6): explicit LIFO depth-first exploration of a flow
//! with context-aware simplification and SMT-backed pruning (§4.5).

use std::collections::HashSet;

use z3::ast::{Ast, Bool, Dynamic};
use z3::{Context, Params, SatResult, Solver};

use crate::errors::AppError;
use crate::evaluators::symbolic::{lift, symbolic_vars, ReverseMap, Symbolic};
use crate::expression::parse;
use crate::models::{
    CaseResult, Coverage, Flow, Node, PruneReason, PrunedBranch, ReductionInfo, SymbolicReport,
    UncoveredPath,
};

/// Runs the symbolic executor to completion against `flow`.
pub fn execute(ctx: &Context, flow: &Flow, timeout_ms: u32) -> Result<SymbolicReport, AppError> {
    let mut executor = SymbolicExecutor::new(ctx, flow, timeout_ms)?;
    executor.run()
}

struct SymbolicExecutor<'ctx, 'a> {
    ctx: &'ctx Context,
    flow: &'a Flow,
    solver: Solver<'ctx>,
    simplifier_solver: Solver<'ctx>,
    vars: std::collections::HashMap<String, Symbolic<'ctx>>,
    reverse_map: ReverseMap<'ctx>,
    timeout_ms: u32,
    cases: Vec<CaseResult>,
    pruned: Vec<PrunedBranch>,
    uncovered: Vec<UncoveredPath>,
    reductions: Vec<ReductionInfo>,
}

type Stack<'ctx, 'a> = Vec<(&'a Node, Vec<Bool<'ctx>>, Option<bool>)>;

impl<'ctx, 'a> SymbolicExecutor<'ctx, 'a> {
    fn new(ctx: &'ctx Context, flow: &'a Flow, timeout_ms: u32) -> Result<Self, AppError> {
        let start = flow
            .start_node()
            .ok_or_else(|| AppError::invalid_flow("flow is broken, has no start node"))?;
        let start_metadata = &start
            .as_start()
            .expect("flow.start_node() returns the START variant")
            .metadata;

        let vars = symbolic_vars(ctx, start_metadata);
        let mut reverse_map = ReverseMap::new();
        let true_expr = Bool::from_bool(ctx, true);
        reverse_map.insert(&Dynamic::from_ast(&true_expr), "true".to_string());

        let mut executor = Self {
            ctx,
            flow,
            solver: Solver::new(ctx),
            simplifier_solver: Solver::new(ctx),
            vars,
            reverse_map,
            timeout_ms,
            cases: Vec::new(),
            pruned: Vec::new(),
            uncovered: Vec::new(),
            reductions: Vec::new(),
        };
        executor.apply_timeout();
        Ok(executor)
    }

    fn apply_timeout(&mut self) {
        let mut params = Params::new(self.ctx);
        params.set_u32("timeout", self.timeout_ms);
        self.solver.set_params(&params);
        self.simplifier_solver.set_params(&params);
    }

    fn reset_simplifier(&mut self) {
        self.simplifier_solver.reset();
        let mut params = Params::new(self.ctx);
        params.set_u32("timeout", self.timeout_ms);
        self.simplifier_solver.set_params(&params);
    }

    fn zf_text(&self, expr: &Bool<'ctx>) -> String {
        let simplified = expr.simplify();
        if let Some(text) = self.reverse_map.lookup_dynamic(&Dynamic::from_ast(&simplified)) {
            return text;
        }
        self.reverse_map.render_bool(expr)
    }

    fn run(&mut self) -> Result<SymbolicReport, AppError> {
        let start = self.flow.start_node().expect("checked in new()");
        let mut stack: Stack<'ctx, 'a> = Vec::new();
        for child in self.flow.children_of(start.node_id(), None) {
            stack.push((child, Vec::new(), None));
        }

        while let Some((node, constraints, _is_false_case)) = stack.pop() {
            match node {
                Node::Conditional(cond_node) => {
                    let expr_text = cond_node.metadata.expression.replace('\'', "\"");
                    let expr_text = expr_text.trim();
                    let ast = parse(expr_text).map_err(|e| AppError::RuntimeError {
                        message: format!(
                            "expression - {expr_text} - from node {} could not be translated: {e}",
                            cond_node.header.node_id
                        ),
                        original_error_type: "ExpressionError".to_string(),
                    })?;
                    let cond = lift(self.ctx, &ast, &self.vars, &mut self.reverse_map)
                        .map_err(|e| AppError::runtime_error(&e))?
                        .as_bool()
                        .map_err(|e| AppError::runtime_error(&e))?;

                    let (simplified, removed_parts) = self.simplify_with_context(&cond, &constraints)?;

                    if !removed_parts.is_empty() {
                        let removed_texts: Vec<String> = removed_parts.iter().map(|r| self.zf_text(r)).collect();
                        let orig_text = self.zf_text(&cond);
                        let simp_text = self.zf_text(&simplified);
                        self.reductions.push(ReductionInfo {
                            node_id: cond_node.header.node_id.clone(),
                            original: orig_text,
                            simplified: simp_text,
                            removed_parts: removed_texts,
                        });
                    }

                    let negated = simplified.not();
                    self.process_branch(node, simplified, &constraints, &mut stack, false)?;
                    self.process_branch(node, negated, &constraints, &mut stack, true)?;
                }
                Node::End(_) => {
                    self.finalize_case(node, &constraints)?;
                }
                Node::Start(_) => {
                    return Err(AppError::invalid_flow("unexpected START node mid-traversal"));
                }
            }
        }

        let coverage = self.calculate_coverage();
        Ok(SymbolicReport {
            cases: std::mem::take(&mut self.cases),
            pruned: std::mem::take(&mut self.pruned),
            reductions: std::mem::take(&mut self.reductions),
            uncovered: std::mem::take(&mut self.uncovered),
            coverage,
        })
    }

    fn process_branch(
        &mut self,
        node: &'a Node,
        cond: Bool<'ctx>,
        constraints: &[Bool<'ctx>],
        stack: &mut Stack<'ctx, 'a>,
        is_false_case: bool,
    ) -> Result<(), AppError> {
        self.reset_simplifier();
        self.simplifier_solver.assert(&cond);
        let scratch_chk = check_with_timeout(&self.simplifier_solver)?;
        self.reset_simplifier();

        if scratch_chk == SatResult::Unsat {
            let unsat_constraints = vec![self.zf_text(&cond)];
            for child in self.flow.children_of(node.node_id(), Some(is_false_case)) {
                self.pruned.push(PrunedBranch {
                    node_id: child.node_id().to_string(),
                    is_false_case: Some(is_false_case),
                    reason: PruneReason::Unsatisfiable,
                    unsat_constraints: unsat_constraints.clone(),
                });
            }
            return Ok(());
        }

        self.solver.push();
        let outcome = self.check_branch_in_context(node, &cond, constraints, is_false_case);
        self.solver.pop(1);
        let (sat_constraints, sat_children) = outcome?;

        if let Some(new_constraints) = sat_constraints {
            for child in sat_children {
                stack.push((child, new_constraints.clone(), Some(is_false_case)));
            }
        }
        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn check_branch_in_context(
        &mut self,
        node: &'a Node,
        cond: &Bool<'ctx>,
        constraints: &[Bool<'ctx>],
        is_false_case: bool,
    ) -> Result<(Option<Vec<Bool<'ctx>>>, Vec<&'a Node>), AppError> {
        for c in constraints {
            self.solver.assert(c);
        }
        self.solver.assert(cond);

        match check_with_timeout(&self.solver)? {
            SatResult::Sat => {
                let mut new_constraints = constraints.to_vec();
                new_constraints.push(cond.clone());
                let children = self.flow.children_of(node.node_id(), Some(is_false_case));

                if children.is_empty() {
                    if !node.is_end() {
                        self.uncovered.push(UncoveredPath {
                            node_id: node.node_id().to_string(),
                            constraints: new_constraints.iter().map(|c| self.zf_text(c)).collect(),
                        });
                    }
                    return Ok((None, Vec::new()));
                }

                Ok((Some(new_constraints), children))
            }
            SatResult::Unsat => {
                let mut unsat_constraints = Vec::new();
                let mut seen = HashSet::new();
                for c in constraints {
                    let text = self.zf_text(c);
                    if seen.insert(text.clone()) {
                        unsat_constraints.push(text);
                    }
                }
                let cond_text = self.zf_text(cond);
                if seen.insert(cond_text.clone()) {
                    unsat_constraints.push(cond_text);
                }

                for child in self.flow.children_of(node.node_id(), Some(is_false_case)) {
                    self.pruned.push(PrunedBranch {
                        node_id: child.node_id().to_string(),
                        is_false_case: Some(is_false_case),
                        reason: PruneReason::Unreachable,
                        unsat_constraints: unsat_constraints.clone(),
                    });
                }
                Ok((None, Vec::new()))
            }
            SatResult::Unknown => Err(AppError::SymbolicTimeout),
        }
    }

    /// Context-aware simplification (§4.5).
    fn simplify_with_context(
        &mut self,
        expr: &Bool<'ctx>,
        base: &[Bool<'ctx>],
    ) -> Result<(Bool<'ctx>, Vec<Bool<'ctx>>), AppError> {
        if base.is_empty() {
            return self.simplify_without_base(expr);
        }

        if self.base_contradicts(base, expr)? {
            return Ok((expr.clone(), Vec::new()));
        }

        if is_and(expr) {
            let children = and_children(expr);
            let mut remaining = Vec::new();
            let mut removed = Vec::new();
            for child in &children {
                if self.base_implies(base, child)? {
                    removed.push(child.clone());
                } else {
                    remaining.push(child.clone());
                }
            }
            if !removed.is_empty() {
                if remaining.is_empty() {
                    return Ok((self.true_literal(), removed));
                }
                let new_expr = and_of(self.ctx, &remaining);
                if new_expr.to_string() != expr.to_string() {
                    let new_text = self.zf_text(&new_expr);
                    let orig_text = self.zf_text(expr);
                    if new_text != orig_text {
                        self.reverse_map.insert(&Dynamic::from_ast(&new_expr.simplify()), new_text);
                    }
                    return Ok((new_expr, removed));
                }
                return Ok((expr.clone(), Vec::new()));
            }
        }

        if self.base_implies(base, expr)? {
            return Ok((self.true_literal(), vec![expr.clone()]));
        }

        let simplified = expr.simplify();
        if simplified.to_string() != expr.to_string()
            && (simplified.as_bool().is_some() || simplified.to_string().len() < expr.to_string().len())
        {
            let text = self.zf_text(&simplified);
            self.reverse_map.insert(&Dynamic::from_ast(&simplified), text);
            return Ok((simplified, vec![expr.clone()]));
        }

        self.solver.push();
        for c in base {
            self.solver.assert(c);
        }
        self.solver.assert(&expr.not());
        let fallback_chk = check_with_timeout(&self.solver);
        self.solver.pop(1);
        if fallback_chk? == SatResult::Unsat {
            return Ok((self.true_literal(), vec![expr.clone()]));
        }

        Ok((expr.clone(), Vec::new()))
    }

    fn simplify_without_base(&mut self, expr: &Bool<'ctx>) -> Result<(Bool<'ctx>, Vec<Bool<'ctx>>), AppError> {
        if is_and(expr) {
            let children = and_children(expr);
            let mut remaining = Vec::new();
            let mut removed = Vec::new();
            for (i, child) in children.iter().enumerate() {
                let mut redundant = false;
                for (j, other) in children.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    if self.implies_without_base(other, child)? {
                        redundant = true;
                        break;
                    }
                }
                if redundant {
                    removed.push(child.clone());
                } else {
                    remaining.push(child.clone());
                }
            }
            if !removed.is_empty() {
                if remaining.is_empty() {
                    return Ok((self.true_literal(), removed));
                }
                let new_expr = and_of(self.ctx, &remaining);
                let text = self.zf_text(&new_expr);
                self.reverse_map.insert(&Dynamic::from_ast(&new_expr.simplify()), text);
                return Ok((new_expr, removed));
            }
        }

        let simplified = expr.simplify();
        if simplified.to_string() == expr.to_string() {
            return Ok((expr.clone(), Vec::new()));
        }
        if simplified.as_bool().is_some() || simplified.to_string().len() < expr.to_string().len() {
            let text = self.zf_text(&simplified);
            self.reverse_map.insert(&Dynamic::from_ast(&simplified), text);
            return Ok((simplified, vec![expr.clone()]));
        }
        Ok((expr.clone(), Vec::new()))
    }

    fn true_literal(&mut self) -> Bool<'ctx> {
        let true_expr = Bool::from_bool(self.ctx, true);
        self.reverse_map.insert(&Dynamic::from_ast(&true_expr.simplify()), "true".to_string());
        true_expr
    }

    fn base_contradicts(&mut self, base: &[Bool<'ctx>], candidate: &Bool<'ctx>) -> Result<bool, AppError> {
        self.reset_simplifier();
        for c in base {
            self.simplifier_solver.assert(c);
        }
        self.simplifier_solver.assert(candidate);
        let chk = check_with_timeout(&self.simplifier_solver)?;
        self.reset_simplifier();
        Ok(chk == SatResult::Unsat)
    }

    fn base_implies(&mut self, base: &[Bool<'ctx>], candidate: &Bool<'ctx>) -> Result<bool, AppError> {
        self.reset_simplifier();
        for c in base {
            self.simplifier_solver.assert(c);
        }
        self.simplifier_solver.assert(&candidate.not());
        let chk = check_with_timeout(&self.simplifier_solver)?;
        self.reset_simplifier();
        Ok(chk == SatResult::Unsat)
    }

    fn implies_without_base(&mut self, a: &Bool<'ctx>, b: &Bool<'ctx>) -> Result<bool, AppError> {
        self.reset_simplifier();
        self.simplifier_solver.assert(a);
        self.simplifier_solver.assert(&b.not());
        let chk = check_with_timeout(&self.simplifier_solver)?;
        self.reset_simplifier();
        Ok(chk == SatResult::Unsat)
    }

    fn finalize_case(&mut self, node: &'a Node, constraints: &[Bool<'ctx>]) -> Result<(), AppError> {
        self.solver.push();
        let outcome = (|| -> Result<CaseResult, AppError> {
            for c in constraints {
                self.solver.assert(c);
            }
            let chk = check_with_timeout(&self.solver)?;
            let concrete = if chk == SatResult::Sat {
                let model = self
                    .solver
                    .get_model()
                    .ok_or_else(|| AppError::internal("solver reported sat without producing a model"))?;
                Some(concretize_model(&model, &self.vars))
            } else {
                None
            };

            let mut seen = HashSet::new();
            let mut constraint_texts = Vec::new();
            for c in constraints {
                let text = self.zf_text(c);
                if seen.insert(text.clone()) {
                    constraint_texts.push(text);
                }
            }

            let end_node = node.as_end().expect("finalize_case only called on END nodes");
            Ok(CaseResult {
                end_node_id: end_node.header.node_id.clone(),
                end_metadata: serde_json::to_value(&end_node.metadata).unwrap_or(serde_json::Value::Null),
                constraints: constraint_texts,
                concrete,
            })
        })();
        self.solver.pop(1);
        self.cases.push(outcome?);
        Ok(())
    }

    fn calculate_coverage(&self) -> Coverage {
        let total_end_nodes = self.flow.end_count();
        let reached: HashSet<&str> = self
            .cases
            .iter()
            .filter(|c| c.concrete.is_some())
            .map(|c| c.end_node_id.as_str())
            .collect();
        Coverage {
            end_count: reached.len(),
            total_end_nodes,
        }
    }
}

fn check_with_timeout(solver: &Solver) -> Result<SatResult, AppError> {
    match solver.check() {
        SatResult::Unknown => {
            let reason = solver.get_reason_unknown().unwrap_or_default();
            if reason.to_lowercase().contains("timeout") {
                Err(AppError::SymbolicTimeout)
            } else {
                Ok(SatResult::Unknown)
            }
        }
        other => Ok(other),
    }
}

fn is_and(expr: &Bool) -> bool {
    expr.decl().name() == "and"
}

fn and_children<'ctx>(expr: &Bool<'ctx>) -> Vec<Bool<'ctx>> {
    expr.children().iter().filter_map(|c| c.as_bool()).collect()
}

fn and_of<'ctx>(ctx: &'ctx Context, items: &[Bool<'ctx>]) -> Bool<'ctx> {
    if items.len() == 1 {
        return items[0].clone();
    }
    let refs: Vec<&Bool<'ctx>> = items.iter().collect();
    Bool::and(ctx, &refs)
}

fn concretize_model<'ctx>(
    model: &z3::Model<'ctx>,
    vars: &std::collections::HashMap<String, Symbolic<'ctx>>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut out = serde_json::Map::new();
    for (name, var) in vars {
        let dynamic = var.as_dynamic();
        let value = model
            .eval(&dynamic, true)
            .map(|v| dynamic_to_json(&v))
            .unwrap_or(serde_json::Value::Null);
        out.insert(name.clone(), value);
    }
    out
}

fn dynamic_to_json(value: &Dynamic) -> serde_json::Value {
    if let Some(b) = value.as_bool() {
        if let Some(v) = b.as_bool() {
            return serde_json::Value::Bool(v);
        }
    }
    if let Some(r) = value.as_real() {
        if let Some((num, den)) = r.as_real() {
            return if den == 1 {
                serde_json::json!(num)
            } else {
                serde_json::json!(num as f64 / den as f64)
            };
        }
    }
    if let Some(s) = value.as_string() {
        if let Some(v) = s.as_string() {
            return serde_json::Value::String(v);
        }
    }
    serde_json::Value::Null
}
