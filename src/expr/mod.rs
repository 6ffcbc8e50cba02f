//! Symbolic index expressions.
//!
//! Expressions are small owned trees built from symbols, integers, sums,
//! products, powers and named calls (`FloorDiv`, `ModularIndexing`, ...).
//! Trees are values: equality and hashing are structural, and every
//! transformation returns a new tree.
//!
//! - [`render`] prints a tree quickly, without simplification or
//!   parenthesization, for diagnostics and intermediate display.
//! - `Display` prints the generic, precedence-aware form.
//! - [`substitute`] replaces subtrees by exact structural match.
//! - [`product`], [`sum`] and [`dot`] build shape arithmetic.

mod ops;
mod render;
mod subst;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use ops::{dot, product, sum};
pub use render::render;
pub use subst::{index_symbol, substitute, Term, RESERVED_SYMBOL_PREFIX};

// ─── Symbols ───────────────────────────────────────────────────────

/// A named symbolic variable. Two symbols are the same iff their names are.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Function names ────────────────────────────────────────────────

/// Head of a [`Expr::Call`] node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuncName {
    /// `FloorDiv(base, divisor)`.
    FloorDiv,
    /// `ModularIndexing(base, divisor, modulus)`: `(base // divisor) % modulus`.
    ModularIndexing,
    /// `CleanDiv(base, divisor)`: a floor division known to be exact.
    CleanDiv,
    /// Any other N-ary function.
    Named(String),
}

impl FuncName {
    pub fn as_str(&self) -> &str {
        match self {
            FuncName::FloorDiv => "FloorDiv",
            FuncName::ModularIndexing => "ModularIndexing",
            FuncName::CleanDiv => "CleanDiv",
            FuncName::Named(name) => name,
        }
    }
}

impl fmt::Display for FuncName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Expressions ───────────────────────────────────────────────────

/// An algebraic expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Symbol(Symbol),
    /// An integer constant.
    Integer(i64),
    /// Sum of the terms, in order.
    Add(Vec<Expr>),
    /// Product of the factors, in order.
    Mul(Vec<Expr>),
    /// `base ** exp`. Has no fast form; rendered through `Display`.
    Pow(Box<Expr>, Box<Expr>),
    /// A named function applied to ordered arguments.
    Call { func: FuncName, args: Vec<Expr> },
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Symbol(Symbol::new(name))
    }

    pub fn integer(value: i64) -> Expr {
        Expr::Integer(value)
    }

    /// Sum node over `terms`. An empty sum is `0` and a single term is
    /// returned as-is; nothing else is simplified.
    pub fn add(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut terms: Vec<Expr> = terms.into_iter().collect();
        match terms.len() {
            0 => Expr::Integer(0),
            1 => terms.remove(0),
            _ => Expr::Add(terms),
        }
    }

    /// Product node over `factors`. An empty product is `1` and a single
    /// factor is returned as-is; nothing else is simplified.
    pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Expr {
        let mut factors: Vec<Expr> = factors.into_iter().collect();
        match factors.len() {
            0 => Expr::Integer(1),
            1 => factors.remove(0),
            _ => Expr::Mul(factors),
        }
    }

    pub fn pow(base: Expr, exp: Expr) -> Expr {
        Expr::Pow(Box::new(base), Box::new(exp))
    }

    pub fn call(func: FuncName, args: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Call {
            func,
            args: args.into_iter().collect(),
        }
    }

    pub fn floor_div(base: Expr, divisor: Expr) -> Expr {
        Expr::call(FuncName::FloorDiv, [base, divisor])
    }

    pub fn modular_indexing(base: Expr, divisor: Expr, modulus: Expr) -> Expr {
        Expr::call(FuncName::ModularIndexing, [base, divisor, modulus])
    }

    pub fn clean_div(base: Expr, divisor: Expr) -> Expr {
        Expr::call(FuncName::CleanDiv, [base, divisor])
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Expr::Symbol(_) | Expr::Integer(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expr::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Direct children, in order.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Expr::Symbol(_) | Expr::Integer(_) => Vec::new(),
            Expr::Add(args) | Expr::Mul(args) | Expr::Call { args, .. } => args.iter().collect(),
            Expr::Pow(base, exp) => vec![base.as_ref(), exp.as_ref()],
        }
    }

    /// Every symbol reachable from the root. Expressions have no binders,
    /// so every symbol is free.
    pub fn free_symbols(&self) -> BTreeSet<&Symbol> {
        let mut found = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Expr::Symbol(s) => {
                    found.insert(s);
                }
                Expr::Integer(_) => {}
                _ => stack.extend(node.args()),
            }
        }
        found
    }

    /// True iff some free symbol's name starts with `prefix`.
    pub fn has_symbol_with_prefix(&self, prefix: &str) -> bool {
        self.free_symbols()
            .iter()
            .any(|s| s.name().starts_with(prefix))
    }

    /// True iff some free symbol's name contains `pattern`.
    pub fn has_symbol_containing(&self, pattern: &str) -> bool {
        self.free_symbols().iter().any(|s| s.name().contains(pattern))
    }

    /// Structural substitution; see [`substitute`].
    pub fn substitute<K, V>(
        &self,
        replacements: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Expr, crate::error::ExprError>
    where
        K: Into<Term>,
        V: Into<Term>,
    {
        substitute(self, replacements)
    }

    /// Fast rendering; see [`render`].
    pub fn render(&self) -> String {
        render(self)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Integer(value)
    }
}

impl From<Symbol> for Expr {
    fn from(symbol: Symbol) -> Self {
        Expr::Symbol(symbol)
    }
}
