use crate::code::{Assignment, Code};
use std::collections::HashMap;

/// Removes every assignment whose value is a bare symbol or number, substituting the value
/// wherever the variable is used.
pub fn copy_propagate(code: &Code) -> Code {
    let mut copies = HashMap::new();
    let mut assignments = Vec::new();

    for assignment in &code.assignments {
        let value = assignment.expr.replace_symbols(&copies);
        if value.is_atom() {
            copies.insert(assignment.name.clone(), value);
        } else {
            assignments.push(Assignment::new(assignment.name.clone(), value));
        }
    }

    Code {
        assignments,
        outputs: code.outputs.iter().map(|output| output.replace_symbols(&copies)).collect(),
        shape: code.shape,
    }
}
