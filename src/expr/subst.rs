use std::collections::HashMap;

use super::{Expr, Symbol};
use crate::error::ExprError;

/// Names starting with this prefix belong to shape/stride symbols, which
/// are allocated before code generation starts and must never be created
/// from a raw name here.
pub const RESERVED_SYMBOL_PREFIX: char = 's';

/// One side of a substitution pair: an expression, or a raw name that is
/// promoted with [`index_symbol`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Name(String),
    Expr(Expr),
}

impl Term {
    fn promote(self) -> Result<Expr, ExprError> {
        match self {
            Term::Name(name) => index_symbol(&name),
            Term::Expr(expr) => Ok(expr),
        }
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::Name(name.to_string())
    }
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        Term::Name(name)
    }
}

impl From<Expr> for Term {
    fn from(expr: Expr) -> Self {
        Term::Expr(expr)
    }
}

impl From<&Expr> for Term {
    fn from(expr: &Expr) -> Self {
        Term::Expr(expr.clone())
    }
}

impl From<Symbol> for Term {
    fn from(symbol: Symbol) -> Self {
        Term::Expr(Expr::Symbol(symbol))
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Expr(Expr::Integer(value))
    }
}

/// Create an index-variable symbol from a raw name.
///
/// Rejects empty names and names in the shape/stride namespace
/// ([`RESERVED_SYMBOL_PREFIX`]).
pub fn index_symbol(name: &str) -> Result<Expr, ExprError> {
    match name.chars().next() {
        None => Err(ExprError::EmptySymbolName),
        Some(RESERVED_SYMBOL_PREFIX) => Err(ExprError::ReservedSymbolName {
            name: name.to_string(),
        }),
        Some(_) => Ok(Expr::symbol(name)),
    }
}

/// Replace subtrees of `expr` that are structurally equal to a key.
///
/// Matching is exact and top-down: a matched subtree is replaced whole and
/// its replacement is not searched again. No algebra is applied, so `x + 1`
/// only matches a node that is literally `Add([x, 1])`. Raw-name keys and
/// values are promoted first; if any promotion fails nothing is built.
/// When a key appears twice the later pair wins.
pub fn substitute<K, V>(
    expr: &Expr,
    replacements: impl IntoIterator<Item = (K, V)>,
) -> Result<Expr, ExprError>
where
    K: Into<Term>,
    V: Into<Term>,
{
    let mut table: HashMap<Expr, Expr> = HashMap::new();
    for (key, value) in replacements {
        let key = key.into().promote()?;
        let value = value.into().promote()?;
        table.insert(key, value);
    }
    tracing::trace!(pairs = table.len(), "structural substitution");
    if table.is_empty() {
        return Ok(expr.clone());
    }
    Ok(replace(expr, &table))
}

fn replace(expr: &Expr, table: &HashMap<Expr, Expr>) -> Expr {
    if let Some(replacement) = table.get(expr) {
        return replacement.clone();
    }
    let replace_all = |items: &[Expr]| -> Vec<Expr> {
        items.iter().map(|item| replace(item, table)).collect()
    };
    match expr {
        Expr::Symbol(_) | Expr::Integer(_) => expr.clone(),
        Expr::Add(terms) => Expr::Add(replace_all(terms)),
        Expr::Mul(factors) => Expr::Mul(replace_all(factors)),
        Expr::Pow(base, exp) => Expr::pow(replace(base, table), replace(exp, table)),
        Expr::Call { func, args } => Expr::Call {
            func: func.clone(),
            args: replace_all(args),
        },
    }
}
