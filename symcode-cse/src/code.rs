use crate::{
    error::{DuplicateAssignment, InvalidAssignmentName, UseBeforeDefinition},
    symbols::is_identifier,
};
use std::{collections::{HashMap, HashSet}, fmt, str::FromStr};
use symcode_compute::{symbolic::Matrix, SymExpr};
use symcode_error::Error;

/// A single statement `name = expr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// The variable being assigned.
    pub name: String,

    /// The value of the variable.
    pub expr: SymExpr,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(name: impl Into<String>, expr: SymExpr) -> Self {
        Self { name: name.into(), expr }
    }
}

/// The layout of the outputs of some [`Code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// A flat list of outputs.
    #[default]
    List,

    /// A matrix with the given number of rows and columns, with outputs in row-major order.
    Matrix { rows: usize, cols: usize },
}

/// A sequence of assignments that compute some output expressions.
///
/// Well-formed code satisfies the following, which [`Code::validate`] checks:
///
/// - Every variable is assigned at most once.
/// - An assignment only uses variables assigned before it. Any other symbol is an input.
///
/// Outputs may use any assigned variable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    /// The assignments, in execution order.
    pub assignments: Vec<Assignment>,

    /// The output expressions.
    pub outputs: Vec<SymExpr>,

    /// The layout of the outputs.
    pub shape: Shape,
}

impl Code {
    /// Creates code with a list of outputs.
    pub fn new(assignments: Vec<Assignment>, outputs: Vec<SymExpr>) -> Self {
        Self { assignments, outputs, shape: Shape::List }
    }

    /// Set the layout of the outputs. Returns the updated [`Code`] for chaining.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    /// Returns the set of assigned variable names.
    pub fn assigned(&self) -> HashSet<&str> {
        self.assignments.iter().map(|assignment| assignment.name.as_str()).collect()
    }

    /// Returns every symbol used by the code that is not assigned by it.
    pub fn inputs(&self) -> HashSet<String> {
        let assigned = self.assigned();
        self.assignments
            .iter()
            .map(|assignment| &assignment.expr)
            .chain(&self.outputs)
            .flat_map(SymExpr::free_symbols)
            .filter(|name| !assigned.contains(name.as_str()))
            .collect()
    }

    /// Applies `f` to every assignment value and every output.
    pub fn map<F>(&self, mut f: F) -> Code
    where
        F: FnMut(&SymExpr) -> SymExpr,
    {
        Code {
            assignments: self.assignments
                .iter()
                .map(|assignment| Assignment::new(assignment.name.clone(), f(&assignment.expr)))
                .collect(),
            outputs: self.outputs.iter().map(f).collect(),
            shape: self.shape,
        }
    }

    /// Substitutes symbols everywhere in the code. Assigned variables that are mapped to a symbol
    /// are renamed.
    pub fn replace_symbols(&self, map: &HashMap<String, SymExpr>) -> Code {
        let mut code = self.map(|expr| expr.replace_symbols(map));
        for assignment in &mut code.assignments {
            if let Some(name) = map.get(&assignment.name).and_then(SymExpr::as_symbol) {
                assignment.name = name.to_owned();
            }
        }
        code
    }

    /// Returns the outputs with every assigned variable substituted by its value, computing the
    /// same thing as the whole code.
    pub fn reconstruct(&self) -> Vec<SymExpr> {
        let mut values = HashMap::new();
        for assignment in &self.assignments {
            let value = assignment.expr.replace_symbols(&values);
            values.insert(assignment.name.clone(), value);
        }
        self.outputs.iter().map(|output| output.replace_symbols(&values)).collect()
    }

    /// The number of arithmetic operations needed to run the code.
    pub fn op_count(&self) -> usize {
        self.assignments
            .iter()
            .map(|assignment| &assignment.expr)
            .chain(&self.outputs)
            .map(SymExpr::op_count)
            .sum()
    }

    /// Checks that no variable is assigned twice, and that no assignment uses a variable before
    /// it is assigned.
    pub fn validate(&self) -> Result<(), Error> {
        let assigned = self.assigned();
        let mut defined = HashSet::new();
        for (position, assignment) in self.assignments.iter().enumerate() {
            // also catches an assignment that uses its own variable
            let early_use = assignment.expr
                .free_symbols()
                .into_iter()
                .find(|name| assigned.contains(name.as_str()) && !defined.contains(name.as_str()));
            if let Some(name) = early_use {
                return Err(Error::without_spans(UseBeforeDefinition { name, position }));
            }

            if !defined.insert(assignment.name.as_str()) {
                return Err(Error::without_spans(DuplicateAssignment { name: assignment.name.clone() }));
            }
        }
        Ok(())
    }

    /// Returns the outputs as a matrix, if the code computes a matrix.
    pub fn output_matrix(&self) -> Option<Matrix> {
        match self.shape {
            Shape::Matrix { rows, cols } => Matrix::from_entries(rows, cols, self.outputs.clone()),
            Shape::List => None,
        }
    }
}

/// Prints one `name = expr` line per assignment, followed by one line per output.
impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for assignment in &self.assignments {
            writeln!(f, "{} = {}", assignment.name, assignment.expr)?;
        }
        for (i, output) in self.outputs.iter().enumerate() {
            match self.shape {
                Shape::Matrix { cols, .. } if cols > 0 => writeln!(f, "out[{}, {}] = {}", i / cols, i % cols, output)?,
                _ => writeln!(f, "out[{}] = {}", i, output)?,
            }
        }
        Ok(())
    }
}

/// Parses one statement per line: `name = expr` is an assignment, and a bare `expr` is an output.
/// Blank lines and lines starting with `#` are skipped.
///
/// The spans of a returned error are relative to the whole input.
impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut code = Code::default();
        let mut line_start = 0;

        for line in s.split_inclusive('\n') {
            let start = line_start;
            line_start += line.len();

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (name, src, offset) = match line.split_once('=') {
                Some((lhs, src)) => {
                    let name = lhs.trim();
                    if !is_identifier(name) {
                        let name_start = start + lhs.len() - lhs.trim_start().len();
                        return Err(Error::new(
                            vec![name_start..name_start + name.len()],
                            InvalidAssignmentName { name: name.to_owned() },
                        ));
                    }
                    (Some(name), src, start + lhs.len() + 1)
                },
                None => (None, line, start),
            };
            let expr = src.parse::<SymExpr>().map_err(|mut err| {
                for span in &mut err.spans {
                    *span = span.start + offset..span.end + offset;
                }
                err
            })?;

            match name {
                Some(name) => code.assignments.push(Assignment::new(name, expr)),
                None => code.outputs.push(expr),
            }
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    fn sample() -> Code {
        Code::new(
            vec![
                Assignment::new("t0", parse("a + b")),
                Assignment::new("t1", parse("t0 * c")),
            ],
            vec![parse("t1 + t0"), parse("t1^2")],
        )
    }

    #[test]
    fn reconstruct_outputs() {
        assert_eq!(sample().reconstruct(), vec![
            parse("(a + b)*c + a + b"),
            parse("((a + b)*c)^2"),
        ]);
    }

    #[test]
    fn valid_code() {
        assert!(sample().validate().is_ok());
        assert_eq!(sample().op_count(), 4);
    }

    #[test]
    fn use_before_definition() {
        let mut code = sample();
        code.assignments.swap(0, 1);
        let err = code.validate().unwrap_err();
        assert_eq!(err.kind_as::<UseBeforeDefinition>(), Some(&UseBeforeDefinition {
            name: "t0".to_string(),
            position: 0,
        }));
    }

    #[test]
    fn duplicate_assignment() {
        let mut code = sample();
        code.assignments.push(Assignment::new("t0", parse("d")));
        assert!(code.validate().unwrap_err().is::<DuplicateAssignment>());
    }

    #[test]
    fn self_reference() {
        let code = Code::new(vec![Assignment::new("t0", parse("t0 + 1"))], vec![]);
        assert!(code.validate().unwrap_err().is::<UseBeforeDefinition>());
    }

    #[test]
    fn rename_assigned() {
        let map = HashMap::from([("t0".to_string(), parse("u"))]);
        let code = sample().replace_symbols(&map);
        assert_eq!(code.assignments[0].name, "u");
        assert_eq!(code.assignments[1].expr, parse("u * c"));
        assert_eq!(code.inputs(), HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()]));
    }

    #[test]
    fn display() {
        let code = sample().with_shape(Shape::Matrix { rows: 1, cols: 2 });
        assert_eq!(code.to_string(), "t0 = a + b\nt1 = c * t0\nout[0, 0] = t0 + t1\nout[0, 1] = t1^2\n");
        assert_eq!(code.output_matrix().map(|m| m.rows()), Some(1));
    }

    #[test]
    fn parse_statements() {
        let code = "# comment\nt0 = a + b\n\nt1 = t0 * c\nt1 + t0\nt1^2\n".parse::<Code>().unwrap();
        assert_eq!(code, sample());
    }

    #[test]
    fn parse_error_spans_whole_input() {
        let err = "t0 = a + b\nt1 = t0 * ) c\n".parse::<Code>().unwrap_err();
        assert!(err.spans.iter().all(|span| span.start >= 11));
    }

    #[test]
    fn parse_rejects_bad_names() {
        let err = "t0 = a\n  2x = b\n".parse::<Code>().unwrap_err();
        assert_eq!(err.kind_as::<InvalidAssignmentName>(), Some(&InvalidAssignmentName { name: "2x".to_owned() }));
        assert_eq!(err.spans, vec![9..11]);

        let err = " = a".parse::<Code>().unwrap_err();
        assert_eq!(err.kind_as::<InvalidAssignmentName>(), Some(&InvalidAssignmentName { name: String::new() }));
        assert_eq!(err.spans, vec![1..1]);
    }
}
