use crate::parser::{
    error::Error,
    expr::Expr,
    token::op::{BinOp, BinOpKind},
    unary::Unary,
    Associativity,
    Parser,
    Precedence,
};
use std::{fmt, ops::Range};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(input: &mut Parser, lhs: Expr, op: BinOp, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        // before creating the `lhs op rhs` node, check the precedence of the following operator,
        // if any: `3 + 4 * 5` must not become `(3 + 4) * 5`
        while let Some(next_op) = input.peek::<BinOp>() {
            let binds_tighter = next_op.precedence() > precedence
                || next_op.precedence() == precedence && next_op.associativity() == Associativity::Right;
            if binds_tighter {
                rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
            } else {
                // lower precedence, or equal precedence and left-associativity, such as
                // `1 * 2 + 3` or `1 * 2 * 3`; let `lhs` become `1 * 2` and parse the operator on
                // the next iteration of the outer loop
                break;
            }
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// Parses every binary operator with at least the given precedence that follows `lhs`,
    /// folding them into a single expression.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        while input.peek::<BinOp>().is_some_and(|op| op.precedence() >= precedence) {
            let op = input.try_parse::<BinOp>()?;
            let rhs = Unary::parse_or_lower(input)?;
            lhs = Self::complete_rhs(input, lhs, op, rhs)?;
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self.op.kind {
            BinOpKind::Exp => "^",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
        };
        write!(f, "{} {} {}", self.lhs, op, self.rhs)
    }
}
