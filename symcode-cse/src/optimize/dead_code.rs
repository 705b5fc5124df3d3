use crate::code::Code;
use std::collections::HashSet;

/// Removes the assignments that do not contribute to any output.
pub fn dead_code_elim(code: &Code) -> Code {
    let mut live = code.outputs
        .iter()
        .flat_map(|output| output.free_symbols())
        .collect::<HashSet<_>>();

    // an assignment only uses earlier ones, so one backwards pass finds everything live
    let mut kept = Vec::new();
    for assignment in code.assignments.iter().rev() {
        if live.contains(&assignment.name) {
            live.extend(assignment.expr.free_symbols());
            kept.push(assignment.clone());
        }
    }
    kept.reverse();

    Code {
        assignments: kept,
        outputs: code.outputs.clone(),
        shape: code.shape,
    }
}
