//! Conversion from the parser's syntax tree into [`SymExpr`].

use crate::{primitive::{float_from_str, int_from_str}, symbolic::error::InvalidLiteral};
use super::{Primary, SymExpr};
use symcode_error::Error;
use symcode_parser::parser::{
    binary::Binary,
    expr::Expr as AstExpr,
    literal::Literal,
    token::op::{BinOpKind, UnaryOpKind},
    Parser,
};
use std::str::FromStr;

/// Converts a literal into a primary expression.
fn convert_literal(literal: &Literal) -> Result<SymExpr, Error> {
    let invalid = |value: &str| Error::new(vec![literal.span()], InvalidLiteral { literal: value.to_owned() });
    match literal {
        Literal::Integer(num) => int_from_str(&num.value)
            .map(|int| SymExpr::Primary(Primary::Integer(int)))
            .ok_or_else(|| invalid(&num.value)),
        Literal::Float(num) => float_from_str(&num.value)
            .map(SymExpr::float)
            .ok_or_else(|| invalid(&num.value)),
        Literal::Symbol(sym) => Ok(SymExpr::symbol(sym.name.clone())),
    }
}

/// The kind of chain of left-associative binary operators that is collapsed into one n-ary node.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Chain {
    /// `a + b - c + ...`, collapsed into a sum.
    Sum,

    /// `a * b / c * ...`, collapsed into a product.
    Product,
}

impl Chain {
    /// Returns the chain that the given operator belongs to, if any.
    fn of(op: BinOpKind) -> Option<Self> {
        match op {
            BinOpKind::Add | BinOpKind::Sub => Some(Chain::Sum),
            BinOpKind::Mul | BinOpKind::Div => Some(Chain::Product),
            BinOpKind::Exp => None,
        }
    }

    /// Returns true if the right-hand side of the operator is inverted (negated or reciprocated).
    fn inverts(op: BinOpKind) -> bool {
        matches!(op, BinOpKind::Sub | BinOpKind::Div)
    }
}

/// Collects the operands of the maximal chain of `chain` operators rooted at `bin`, in source
/// order, along with whether each operand is inverted.
fn gather_chain(bin: &Binary, chain: Chain) -> Vec<(&AstExpr, bool)> {
    let mut operands = Vec::new();
    let mut pending = vec![
        (&*bin.rhs, Chain::inverts(bin.op.kind)),
        (&*bin.lhs, false),
    ];

    while let Some((expr, inverted)) = pending.pop() {
        match expr {
            AstExpr::Binary(inner) if Chain::of(inner.op.kind) == Some(chain) => {
                pending.push((&*inner.rhs, inverted ^ Chain::inverts(inner.op.kind)));
                pending.push((&*inner.lhs, inverted));
            },
            expr => operands.push((expr, inverted)),
        }
    }

    operands
}

/// Converts the syntax tree into an expression without recursion, so that very long chains such
/// as `x1 + x2 + ... + x10000` convert in a single pass.
impl TryFrom<&AstExpr> for SymExpr {
    type Error = Error;

    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        enum Frame<'a> {
            Enter(&'a AstExpr),
            Call(&'a str, usize),
            Neg,
            Exp,
            Chain(Chain, Vec<bool>),
        }

        let mut stack = vec![Frame::Enter(expr)];
        let mut output: Vec<SymExpr> = Vec::new();

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(expr) => match expr {
                    AstExpr::Literal(literal) => output.push(convert_literal(literal)?),
                    AstExpr::Paren(paren) => stack.push(Frame::Enter(paren.innermost())),
                    AstExpr::Call(call) => {
                        stack.push(Frame::Call(&call.name.name, call.args.len()));
                        stack.extend(call.args.iter().rev().map(Frame::Enter));
                    },
                    AstExpr::Unary(unary) => match unary.op.kind {
                        UnaryOpKind::Neg => {
                            stack.push(Frame::Neg);
                            stack.push(Frame::Enter(&unary.operand));
                        },
                    },
                    AstExpr::Binary(bin) => match Chain::of(bin.op.kind) {
                        Some(chain) => {
                            let operands = gather_chain(bin, chain);
                            stack.push(Frame::Chain(chain, operands.iter().map(|(_, inv)| *inv).collect()));
                            stack.extend(operands.iter().rev().map(|(expr, _)| Frame::Enter(*expr)));
                        },
                        None => {
                            stack.push(Frame::Exp);
                            stack.push(Frame::Enter(&bin.rhs));
                            stack.push(Frame::Enter(&bin.lhs));
                        },
                    },
                },
                Frame::Call(name, count) => {
                    let args = output.split_off(output.len() - count);
                    output.push(SymExpr::call(name, args));
                },
                Frame::Neg => {
                    if let Some(operand) = output.pop() {
                        output.push(-operand);
                    }
                },
                Frame::Exp => {
                    if let (Some(exp), Some(base)) = (output.pop(), output.pop()) {
                        output.push(SymExpr::power(base, exp));
                    }
                },
                Frame::Chain(chain, inverted) => {
                    let operands = output.split_off(output.len() - inverted.len())
                        .into_iter()
                        .zip(inverted)
                        .map(|(operand, inverted)| match (chain, inverted) {
                            (_, false) => operand,
                            (Chain::Sum, true) => -operand,
                            (Chain::Product, true) => operand.recip(),
                        });
                    output.push(match chain {
                        Chain::Sum => SymExpr::sum(operands),
                        Chain::Product => SymExpr::product(operands),
                    });
                },
            }
        }

        // every frame pushes exactly one result for each expression it consumes
        Ok(output.pop().unwrap_or_else(|| unreachable!("the root always produces a result")))
    }
}

impl TryFrom<AstExpr> for SymExpr {
    type Error = Error;

    fn try_from(expr: AstExpr) -> Result<Self, Self::Error> {
        Self::try_from(&expr)
    }
}

/// Parses an expression from its textual form, such as `x*y + sin(z)^2`.
impl FromStr for SymExpr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ast = Parser::new(s).try_parse_full::<AstExpr>()?;
        Self::try_from(&ast)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> SymExpr {
        SymExpr::symbol(name)
    }

    #[test]
    fn sub_becomes_negated_term() {
        let expr: SymExpr = "a - b*c".parse().unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            sym("a"),
            SymExpr::Mul(vec![SymExpr::integer(-1), sym("b"), sym("c")]),
        ]));
    }

    #[test]
    fn div_becomes_reciprocal() {
        let expr: SymExpr = "x / y / 2".parse().unwrap();
        assert_eq!(expr, SymExpr::Mul(vec![
            sym("x"),
            SymExpr::power(SymExpr::integer(2), SymExpr::integer(-1)),
            SymExpr::power(sym("y"), SymExpr::integer(-1)),
        ]));
    }

    #[test]
    fn mixed_chain_signs() {
        let expr: SymExpr = "a - b + c - 4".parse().unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            SymExpr::integer(-4),
            sym("a"),
            sym("c"),
            SymExpr::Mul(vec![SymExpr::integer(-1), sym("b")]),
        ]));
    }

    #[test]
    fn parenthesized_rhs_is_not_flattened() {
        let expr: SymExpr = "a - (b + c)".parse().unwrap();
        assert_eq!(expr, SymExpr::Add(vec![
            sym("a"),
            SymExpr::Mul(vec![SymExpr::integer(-1), sym("b") + sym("c")]),
        ]));
    }

    #[test]
    fn negative_literal() {
        let expr: SymExpr = "-3 * x^-2".parse().unwrap();
        assert_eq!(expr, SymExpr::Mul(vec![
            SymExpr::integer(-3),
            SymExpr::power(sym("x"), SymExpr::integer(-2)),
        ]));
    }

    #[test]
    fn long_chain() {
        let source = (0..5000).map(|i| format!("x{}", i)).collect::<Vec<_>>().join(" + ");
        let expr: SymExpr = source.parse().unwrap();
        assert_eq!(expr.operands().map(<[_]>::len), Some(5000));
    }

    #[test]
    fn parse_error() {
        assert!("a + * b".parse::<SymExpr>().is_err());
    }
}
