use crate::{
    code::{Assignment, Code},
    error::InvalidIvarsName,
    symbols::{is_identifier, Symbols},
};
use symcode_compute::SymExpr;
use symcode_error::Error;

/// Returns the names that continue the numbering of `last`: `tmp7` continues as `tmp8`, `tmp9`,
/// and so on. A name without a number continues as `name_1`, `name_2`, ...
fn continue_numbering(last: &str) -> Symbols {
    let stem = last.trim_end_matches(|c: char| c.is_ascii_digit());
    match last[stem.len()..].parse::<usize>() {
        Ok(number) if !stem.is_empty() => Symbols::new(stem).start(number + 1),
        _ => Symbols::new(format!("{}_", last)).start(1),
    }
}

/// Moves every output that is not a bare symbol or number into a new assignment, so that each
/// output is a single variable.
///
/// The new variables are named with `prefix` if given. Otherwise, they continue the numbering of
/// the last assignment, or are named `outputiv_0`, `outputiv_1`, ... if there is none. Names
/// already used by the code are skipped.
pub fn materialize_outputs(code: &Code, prefix: Option<&str>) -> Result<Code, Error> {
    let names = match (prefix, code.assignments.last()) {
        (Some(prefix), _) if !is_identifier(prefix) => {
            return Err(Error::without_spans(InvalidIvarsName { name: prefix.to_owned() }));
        },
        (Some(prefix), _) => Symbols::new(prefix),
        (None, Some(last)) => continue_numbering(&last.name),
        (None, None) => Symbols::new("outputiv_"),
    };
    let mut names = names
        .exclude(code.assigned())
        .exclude(code.inputs());

    let mut code = code.clone();
    for output in &mut code.outputs {
        if !output.is_atom() {
            let name = names.next_name();
            let value = std::mem::replace(output, SymExpr::symbol(name.clone()));
            code.assignments.push(Assignment::new(name, value));
        }
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    #[test]
    fn continues_numbering() {
        let code = Code::new(
            vec![Assignment::new("tmp7", parse("a + b"))],
            vec![parse("tmp7 * c"), parse("tmp7"), parse("2"), parse("sin(tmp7)")],
        );
        let single = materialize_outputs(&code, None).unwrap();
        assert_eq!(single.assignments, vec![
            Assignment::new("tmp7", parse("a + b")),
            Assignment::new("tmp8", parse("tmp7 * c")),
            Assignment::new("tmp9", parse("sin(tmp7)")),
        ]);
        assert_eq!(single.outputs, vec![parse("tmp8"), parse("tmp7"), parse("2"), parse("tmp9")]);
    }

    #[test]
    fn naming_rules() {
        assert_eq!(continue_numbering("x").take(2).collect::<Vec<_>>(), vec!["x_1", "x_2"]);
        assert_eq!(continue_numbering("cse12").next_name(), "cse13");

        let code = Code::new(vec![], vec![parse("a * b")]);
        let single = materialize_outputs(&code, None).unwrap();
        assert_eq!(single.assignments, vec![Assignment::new("outputiv_0", parse("a * b"))]);
    }

    #[test]
    fn explicit_prefix_skips_used_names() {
        let code = Code::new(vec![], vec![parse("out0 * b")]);
        let single = materialize_outputs(&code, Some("out")).unwrap();
        assert_eq!(single.outputs, vec![parse("out1")]);
        assert!(materialize_outputs(&code, Some("3")).is_err());
    }
}
