//! Indented audit trace of an expression with its current values.
use super::formula::leaf_label;
use crate::compute::{AutodiffError, Engine};
use crate::graph::{Expr, Var};
use crate::store::{NodeId, NodeKind, Operation, Registry};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders `target` as a tree. With `wrt`, every line also carries the
/// node's derivative with respect to that Variable.
pub fn format_trace(target: &Expr, wrt: Option<&Var>) -> String {
    let registry = target.graph().registry();
    let wrt = wrt.filter(|v| v.graph().same_graph(target.graph())).map(|v| v.id());
    let mut tracer = Tracer {
        registry: &registry,
        engine: Engine::new(&registry),
        wrt,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    let _ = writeln!(tracer.output, "AUDIT TRACE for node '{}':", tracer.label(target.id()));
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_node(target.id(), 1, "");
    tracer.output
}

struct Tracer<'a> {
    registry: &'a Registry,
    engine: Engine<'a>,
    wrt: Option<NodeId>,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn label(&self, id: NodeId) -> String {
        match &self.registry.kinds[id.index()] {
            NodeKind::Variable(_) => leaf_label(self.registry, id),
            NodeKind::Constant(v) => format!("{}", v),
            NodeKind::Formula(op) => format!("{}{}", op.name(), id),
        }
    }

    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let line_header = format!("[L{}] {}{}", level, self.label(node_id), self.format_value(node_id));

        match &self.registry.kinds[node_id.index()] {
            NodeKind::Variable(_) => {
                let _ = writeln!(self.output, "{}{} -> Var", prefix, line_header);
            }
            NodeKind::Constant(_) => {
                let _ = writeln!(self.output, "{}{} -> Const", prefix, line_header);
            }
            NodeKind::Formula(op) => {
                let operands = self.registry.get_operands(node_id);
                let formula_str = self.format_formula(*op, operands);
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, formula_str);
                self.recurse_children(prefix, operands, level);
            }
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[NodeId], level: usize) {
        let stem = build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }

    fn format_formula(&self, op: Operation, operands: &[NodeId]) -> String {
        let refs: Vec<String> = operands.iter().map(|&id| self.label(id)).collect();
        match op.symbol() {
            Some(sym) if refs.len() == 2 => format!("{} {} {}", refs[0], sym, refs[1]),
            _ => format!("{}({})", op.name(), refs.join(", ")),
        }
    }

    fn format_value(&self, id: NodeId) -> String {
        let value = match self.engine.value(id) {
            Ok(v) => format!("[{:.4}]", v),
            Err(AutodiffError::UnsetValue { .. }) => return "[<unset>]".to_string(),
            Err(_) => return "[?]".to_string(),
        };
        match self.wrt.map(|t| self.engine.derivative(id, t)) {
            Some(Ok(d)) => format!("{} d={:.4}", value, d),
            Some(Err(_)) => format!("{} d=?", value),
            None => value,
        }
    }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}
