use crate::code::{Assignment, Code};
use std::collections::{HashMap, HashSet};
use symcode_compute::SymExpr;

/// Where a variable is used.
#[derive(Debug, Clone, Copy)]
enum Site {
    Assignment(usize),
    Output(usize),
}

/// The number of uses of each assigned variable, and the site of the last one recorded.
#[derive(Debug, Default)]
struct Uses<'a> {
    assigned: HashSet<&'a str>,
    uses: HashMap<String, (usize, Site)>,
}

impl<'a> Uses<'a> {
    /// Records every use of an assigned variable in `expr`, located at `site`.
    fn record(&mut self, expr: &SymExpr, site: Site) {
        for node in expr.post_order_iter() {
            if let Some(name) = node.as_symbol().filter(|name| self.assigned.contains(name)) {
                let entry = self.uses.entry(name.to_owned()).or_insert((0, site));
                entry.0 += 1;
                entry.1 = site;
            }
        }
    }
}

/// Inlines every assignment that is used exactly once into the expression that uses it, and
/// removes every assignment that is not used at all.
///
/// The assignments are scanned from last to first. By the time an assignment is reached, every
/// use of its variable is known, including uses moved in by earlier inlining.
pub fn inline(code: &Code) -> Code {
    let mut uses = Uses {
        assigned: code.assigned(),
        uses: HashMap::new(),
    };
    let mut values = code.assignments
        .iter()
        .map(|assignment| Some(assignment.expr.clone()))
        .collect::<Vec<_>>();
    let mut outputs = code.outputs.clone();

    for (i, output) in outputs.iter().enumerate() {
        uses.record(output, Site::Output(i));
    }

    for i in (0..values.len()).rev() {
        let name = &code.assignments[i].name;
        match uses.uses.get(name).copied() {
            None => values[i] = None,
            Some((1, site)) => {
                let Some(value) = values[i].take() else {
                    continue;
                };
                uses.record(&value, site);

                let map = HashMap::from([(name.clone(), value)]);
                match site {
                    Site::Assignment(j) => {
                        values[j] = values[j].as_ref().map(|expr| expr.replace_symbols(&map));
                    },
                    Site::Output(j) => outputs[j] = outputs[j].replace_symbols(&map),
                }
            },
            Some(_) => {
                if let Some(value) = &values[i] {
                    uses.record(value, Site::Assignment(i));
                }
            },
        }
    }

    Code {
        assignments: code.assignments
            .iter()
            .zip(values)
            .filter_map(|(assignment, value)| Some(Assignment::new(assignment.name.clone(), value?)))
            .collect(),
        outputs,
        shape: code.shape,
    }
}
