use crate::{
    code::Code,
    error::{InvalidIvarsName, SymbolClash},
    symbols::is_identifier,
};
use std::collections::HashMap;
use symcode_compute::SymExpr;
use symcode_error::Error;

/// Renames the assigned variables to `prefix0`, `prefix1`, and so on, in assignment order.
///
/// Only the code itself is renamed: anything outside of it that refers to the old names will not
/// see the new ones. Returns an error if a new name is already used by an input of the code.
pub fn rename(code: &Code, prefix: &str) -> Result<Code, Error> {
    if !is_identifier(prefix) {
        return Err(Error::without_spans(InvalidIvarsName { name: prefix.to_owned() }));
    }

    let inputs = code.inputs();
    let mut map = HashMap::new();
    for (i, assignment) in code.assignments.iter().enumerate() {
        let name = format!("{}{}", prefix, i);
        if inputs.contains(&name) {
            return Err(Error::without_spans(SymbolClash { name }));
        }
        map.insert(assignment.name.clone(), SymExpr::symbol(name));
    }

    Ok(code.replace_symbols(&map))
}
