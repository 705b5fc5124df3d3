use crate::{
    consts::{ONE, ZERO},
    primitive::{float, PRECISION},
    symbolic::{Primary, SymExpr},
};
use rug::{ops::Pow, Float};
use symcode_error::Error;
use super::{builtin, ctxt::Ctxt, error::UndefinedVariable};

/// Evaluates a single node, given the values of its children (in the order of
/// [`SymExpr::children`]).
pub fn eval_node(expr: &SymExpr, args: Vec<Float>, ctxt: &Ctxt) -> Result<Float, Error> {
    match expr {
        SymExpr::Primary(Primary::Integer(int)) => Ok(float(int)),
        SymExpr::Primary(Primary::Float(value)) => Ok(value.clone()),
        SymExpr::Primary(Primary::Symbol(name)) => ctxt.get_var(name)
            .cloned()
            .ok_or_else(|| Error::without_spans(UndefinedVariable { name: name.clone() })),
        SymExpr::Primary(Primary::Call(name, _)) => {
            builtin::call(name, &args, |name| ctxt.get_similar_funcs(name))
        },
        SymExpr::Add(_) => Ok(args.into_iter().fold(ZERO.clone(), |acc, term| acc + term)),
        SymExpr::Mul(_) => Ok(args.into_iter().fold(ONE.clone(), |acc, factor| acc * factor)),
        SymExpr::Exp(..) => match args.as_slice() {
            [base, exp] => Ok(Float::with_val(PRECISION, base.pow(exp))),
            _ => Ok(Float::with_val(PRECISION, rug::float::Special::Nan)),
        },
    }
}

/// Evaluates the expression in the given context.
pub fn eval(expr: &SymExpr, ctxt: &Ctxt) -> Result<Float, Error> {
    expr.try_fold_post_order(|node, args| eval_node(node, args, ctxt))
}

/// Evaluates the expression in the given context, rounding the result to an [`f64`].
pub fn eval_f64(expr: &SymExpr, ctxt: &Ctxt) -> Result<f64, Error> {
    eval(expr, ctxt).map(|value| value.to_f64())
}
