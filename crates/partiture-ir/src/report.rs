// Markdown/LaTeX report for a partiture
// One table row per term and one intercalation equation per schedule edge

use partiture_error::{Error, Result, Validate};
use partiture_types::ScheduleKind;

use crate::graph::{Operand, ScheduleEdge};
use crate::partiture::Partiture;
use crate::term::Term;
use crate::validation::resolve_operands;

/// Render a human-readable report of the terms and their schedule
pub fn render_report(partiture: &Partiture) -> Result<String> {
    partiture.validate()?;
    let operands = resolve_operands(partiture).map_err(Error::CompileIntegrity)?;

    let mut report = format!("### Cognitive Schedule: `{}`\n", partiture.source.trim());
    report.push_str(&format!(
        "*{} terms, {} schedule edges* (version {})\n\n",
        partiture.terms.len(),
        partiture.schedule_graph.len(),
        partiture.version
    ));

    report.push_str("| Function | Objective Class | Description | Math Form | Mass ($m$) |\n");
    report.push_str("| :--- | :--- | :--- | :--- | :---: |\n");
    for term in &partiture.terms {
        // pipes would split the markdown cell
        let formula = term.family.formula().replace('|', "\\|");
        report.push_str(&format!(
            "| `{}` | {} | {} | ${}$ | {} |\n",
            term.symbol,
            term.family.objective_class(),
            term.family.description(),
            formula,
            term.weight
        ));
    }

    report.push_str("\n**Intercalation Dynamics:**\n\n");
    if partiture.schedule_graph.is_empty() {
        let only = partiture.terms.first().map(term_expression).unwrap_or_default();
        report.push_str(&format!("$$ J(\\theta) = {} $$\n", only));
        return Ok(report);
    }

    for (index, edge) in partiture.schedule_graph.iter().enumerate().rev() {
        let [left, right] = operands[index];
        let left = operand_expression(partiture, left);
        let right = operand_expression(partiture, right);
        report.push_str(&format!(
            "$$ E_{{{}}}(t) = {} $$\n",
            index,
            edge_expression(edge, &left, &right)
        ));
    }
    report.push_str("$$ J(\\theta) = \\sum_{t} E_{0}(t) $$\n");

    Ok(report)
}

fn term_expression(term: &Term) -> String {
    format!("{} \\cdot [{}]", term.weight, term.family.formula())
}

fn operand_expression(partiture: &Partiture, operand: Operand) -> String {
    match operand {
        Operand::Term(index) => partiture
            .terms
            .get(index)
            .map(term_expression)
            .unwrap_or_default(),
        Operand::Edge(index) => format!("E_{{{}}}(t)", index),
    }
}

fn combine_expression(kind: ScheduleKind, edge: &ScheduleEdge, left: &str, right: &str) -> String {
    let param = edge.kind_params.get(kind).unwrap_or_default();
    match kind {
        ScheduleKind::Orbital => format!(
            "\\cos^2(\\pi t / {param}) \\cdot ({left}) + \\sin^2(\\pi t / {param}) \\cdot ({right})"
        ),
        ScheduleKind::Drag => format!(
            "({left}) + \\frac{{{right}}}{{1 + {param} \\cdot |{left}|}}"
        ),
        ScheduleKind::Switching => format!(
            "\\begin{{cases}} {left} & \\lfloor t / {param} \\rfloor \\text{{ even}} \\\\ {right} & \\text{{otherwise}} \\end{{cases}}"
        ),
    }
}

fn edge_expression(edge: &ScheduleEdge, left: &str, right: &str) -> String {
    let mut expression = left.to_string();
    for (position, kind) in edge.kind.components().into_iter().enumerate() {
        // every later component combines the previous result with the right operand
        let inner = if position == 0 { left.to_string() } else { expression.clone() };
        expression = combine_expression(kind, edge, &inner, right);
    }

    if edge.weight == 1.0 {
        expression
    } else {
        format!("{} \\cdot \\left[{}\\right]", edge.weight, expression)
    }
}
