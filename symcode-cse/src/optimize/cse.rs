use crate::{
    code::{Assignment, Code},
    collect::Collector,
    error::CyclicDefinitions,
    options::CseOptions,
    transform::{postprocess, preprocess},
};
use std::collections::HashMap;
use symcode_error::Error;

/// Orders the assignments so that each comes after the ones it uses, keeping the given order
/// where possible.
fn toposort(assignments: Vec<Assignment>) -> Result<Vec<Assignment>, Error> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        New,
        Active,
        Done,
    }

    let index_of = assignments
        .iter()
        .enumerate()
        .map(|(i, assignment)| (assignment.name.as_str(), i))
        .collect::<HashMap<_, _>>();
    let deps = assignments
        .iter()
        .map(|assignment| {
            assignment.expr
                .free_symbols()
                .iter()
                .filter_map(|name| index_of.get(name.as_str()).copied())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let mut state = vec![State::New; assignments.len()];
    let mut order = Vec::with_capacity(assignments.len());
    for start in 0..assignments.len() {
        let mut stack = vec![(start, false)];
        while let Some((i, expanded)) = stack.pop() {
            if expanded {
                state[i] = State::Done;
                order.push(i);
                continue;
            }

            match state[i] {
                State::Done => (),
                // reached again from one of its own dependencies
                State::Active => {
                    return Err(Error::without_spans(CyclicDefinitions { name: assignments[i].name.clone() }));
                },
                State::New => {
                    state[i] = State::Active;
                    stack.push((i, true));
                    stack.extend(deps[i].iter().rev().map(|&dep| (dep, false)));
                },
            }
        }
    }

    let mut slots = assignments.into_iter().map(Some).collect::<Vec<_>>();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Finds the subexpressions shared between the assignments and outputs of the code, and gives
/// each of them its own assignment.
///
/// The new assignments are named by `options` and merged with the existing ones, which keep their
/// names.
pub fn common_subexpr_elim(code: &Code, options: &CseOptions) -> Result<Code, Error> {
    let names = options.emitted_names().exclude(code.assigned());
    let mut collector = Collector::new(options.clone().symbols(names))?;

    let roots = code.assignments
        .iter()
        .map(|assignment| &assignment.expr)
        .chain(&code.outputs)
        .map(|expr| preprocess(expr, &options.optimizations))
        .collect::<Vec<_>>();
    let collected = collector.collect(&roots)?;
    let extracted = collector.get(&collected);

    let (values, outputs) = extracted.outputs.split_at(code.assignments.len());
    let rewritten = code.assignments
        .iter()
        .zip(values)
        .map(|(assignment, value)| Assignment::new(assignment.name.clone(), value.clone()));
    let assignments = toposort(rewritten.chain(extracted.assignments).collect())?;

    let code = Code {
        assignments,
        outputs: outputs.to_vec(),
        shape: code.shape,
    };
    Ok(code.map(|expr| postprocess(expr, &options.optimizations)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use symcode_compute::SymExpr;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    #[test]
    fn shares_between_assignments_and_outputs() {
        let code = Code::new(
            vec![Assignment::new("t0", parse("sin(a*b) + c"))],
            vec![parse("t0 * cos(a*b)"), parse("a*b + c")],
        );
        let cse = common_subexpr_elim(&code, &CseOptions::default().ivars_name("cse")).unwrap();
        assert!(cse.validate().is_ok());
        assert_eq!(cse.assignments[0], Assignment::new("cse0", parse("a*b")));
        assert_eq!(cse.reconstruct(), code.reconstruct());
    }

    #[test]
    fn new_names_avoid_assigned() {
        let code = Code::new(
            vec![Assignment::new("cse0", parse("x + 1"))],
            vec![parse("sin(x*y) + cos(x*y)")],
        );
        let cse = common_subexpr_elim(&code, &CseOptions::default().ivars_name("cse")).unwrap();
        assert!(cse.validate().is_ok());
        assert!(cse.assignments.iter().any(|a| a.name == "cse1"));
    }

    #[test]
    fn order_follows_dependencies() {
        let assignments = vec![
            Assignment::new("b", parse("a + 1")),
            Assignment::new("c", parse("b * 2")),
            Assignment::new("a", parse("x^2")),
        ];
        let sorted = toposort(assignments).unwrap();
        let names = sorted.iter().map(|a| a.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn cycle() {
        let assignments = vec![
            Assignment::new("a", parse("b + 1")),
            Assignment::new("b", parse("a * 2")),
        ];
        let err = toposort(assignments).unwrap_err();
        assert!(err.is::<CyclicDefinitions>());
    }
}
