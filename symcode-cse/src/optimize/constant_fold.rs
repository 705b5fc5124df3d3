use crate::code::Code;
use rug::{ops::Pow, Integer};
use symcode_compute::{numerical::{eval, Ctxt}, NodeKind, Primary, SymExpr};

/// The largest exponent for which integer powers are computed exactly.
const MAX_EXACT_EXPONENT: u32 = 256;

/// Computes a sum, product, or power of integers exactly.
fn fold_integers(node: &SymExpr, ints: &[&Integer]) -> Option<Integer> {
    match (node, ints) {
        (SymExpr::Add(_), _) => Some(ints.iter().fold(Integer::new(), |acc, &int| acc + int)),
        (SymExpr::Mul(_), _) => Some(ints.iter().fold(Integer::from(1), |acc, &int| acc * int)),
        (SymExpr::Exp(..), [base, exp]) => {
            let exp = exp.to_u32().filter(|&exp| exp <= MAX_EXACT_EXPONENT)?;
            Some(Integer::from((*base).pow(exp)))
        },
        _ => None,
    }
}

/// Evaluates a node whose operands are all numbers. Returns [`None`] if it cannot be evaluated
/// to a number that prints as itself: float results must be finite as an `f64`, and only an
/// exact zero may print as zero.
fn evaluate(node: &SymExpr) -> Option<SymExpr> {
    let exact = node.children()
        .into_iter()
        .map(SymExpr::as_integer)
        .collect::<Option<Vec<_>>>()
        .and_then(|ints| fold_integers(node, &ints));
    if let Some(int) = exact {
        return Some(SymExpr::Primary(Primary::Integer(int)));
    }

    let value = eval(node, &Ctxt::empty()).ok()?;
    let printed = value.to_f64();
    let representable = printed.is_finite() && (printed != 0.0 || value.is_zero());
    representable.then(|| SymExpr::float(value))
}

/// Combines the numeric operands of a sum or product into one, dropping it if it is the
/// identity.
fn fold_operands(kind: NodeKind, operands: Vec<SymExpr>) -> SymExpr {
    let rebuild = |operands: Vec<SymExpr>| match kind {
        NodeKind::Add => SymExpr::sum(operands),
        _ => SymExpr::product(operands),
    };

    let (numbers, mut rest): (Vec<_>, Vec<_>) = operands.into_iter().partition(SymExpr::is_number);
    if numbers.len() < 2 {
        rest.extend(numbers);
        return rebuild(rest);
    }

    let partial = rebuild(numbers);
    let folded = evaluate(&partial).unwrap_or(partial);
    let identity = if kind == NodeKind::Add { 0 } else { 1 };
    if folded.as_integer().map_or(true, |int| *int != identity) {
        rest.push(folded);
    }
    rebuild(rest)
}

/// Folds one node whose children are already folded.
fn fold_node(node: SymExpr) -> SymExpr {
    if node.is_atom() {
        return node;
    }
    if node.children().into_iter().all(SymExpr::is_number) {
        return evaluate(&node).unwrap_or(node);
    }

    match node {
        SymExpr::Add(operands) => fold_operands(NodeKind::Add, operands),
        SymExpr::Mul(operands) => fold_operands(NodeKind::Mul, operands),
        node => node,
    }
}

/// Evaluates every part of the assignments and outputs that does not depend on a symbol.
///
/// Integer sums, products, and powers are computed exactly; anything else is evaluated as a
/// float. Parts that fail to evaluate, such as `1/0` or calls to unknown functions, are kept.
pub fn constant_fold(code: &Code) -> Code {
    code.map(|expr| expr.map_post_order(fold_node))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_relative_error_msg, afe_is_relative_eq, assert_float_relative_eq};
    use crate::code::Assignment;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> SymExpr {
        input.parse().unwrap()
    }

    fn fold(input: &str) -> SymExpr {
        parse(input).map_post_order(fold_node)
    }

    fn as_f64(expr: &SymExpr) -> f64 {
        match expr {
            SymExpr::Primary(Primary::Float(value)) => value.to_f64(),
            other => panic!("expected a float, got {}", other),
        }
    }

    #[test]
    fn exact_integers() {
        assert_eq!(fold("2*3 + 4^2"), SymExpr::integer(22));
        assert_eq!(fold("x * 2 * 3"), parse("6 * x"));
        assert_eq!(fold("x + 2 - 2"), parse("x"));
    }

    #[test]
    fn floats() {
        assert_float_relative_eq!(as_f64(&fold("1/4")), 0.25);
        assert_float_relative_eq!(as_f64(&fold("sqrt(2)^2")), 2.0);
    }

    #[test]
    fn keeps_what_cannot_be_evaluated() {
        assert_eq!(fold("1/0"), parse("1/0"));
        assert_eq!(fold("f(2) + x"), parse("f(2) + x"));
        assert_eq!(fold("sin(x)"), parse("sin(x)"));
    }

    #[test]
    fn keeps_values_beyond_f64() {
        assert_eq!(fold("exp(1000)"), parse("exp(1000)"));
        assert_eq!(fold("exp(-1000)"), parse("exp(-1000)"));
        assert_eq!(fold("10.0^400 * x"), parse("10.0^400 * x"));
        assert_eq!(as_f64(&fold("exp(0.0) - 1")), 0.0);
    }

    #[test]
    fn folds_code() {
        let code = Code::new(vec![Assignment::new("t0", parse("x*(1 + 1)"))], vec![parse("t0 + 3*3")]);
        let folded = constant_fold(&code);
        assert_eq!(folded.assignments[0].expr, parse("2*x"));
        assert_eq!(folded.outputs, vec![parse("t0 + 9")]);
    }
}
