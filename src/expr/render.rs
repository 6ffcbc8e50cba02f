use std::fmt;

use super::Expr;

/// Render an expression quickly.
///
/// Sums are joined with `" + "`, products with `" * "`, and named calls
/// print as `Name(arg, ...)`. Nothing is simplified and no parentheses are
/// inserted, so `(a + b) * c` and `a + b * c` render alike. Use this for
/// logs and intermediate display, never for final kernel source; the
/// `Display` form is the precedence-correct one.
pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    render_into(expr, &mut out);
    out
}

fn render_into(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Symbol(s) => out.push_str(s.name()),
        Expr::Integer(v) => out.push_str(&v.to_string()),
        Expr::Add(terms) => render_joined(terms, " + ", out),
        Expr::Mul(factors) => render_joined(factors, " * ", out),
        Expr::Call { func, args } => {
            out.push_str(func.as_str());
            out.push('(');
            render_joined(args, ", ", out);
            out.push(')');
        }
        Expr::Pow(..) => out.push_str(&expr.to_string()),
    }
}

fn render_joined(items: &[Expr], sep: &str, out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        render_into(item, out);
    }
}

// ─── Generic form ──────────────────────────────────────────────────

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Integer(v) if *v < 0 => PREC_ADD,
        Expr::Symbol(_) | Expr::Integer(_) | Expr::Call { .. } => PREC_ATOM,
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) => PREC_MUL,
        Expr::Pow(..) => PREC_POW,
    }
}

/// Write `expr`, parenthesized when it binds looser than `min_prec`.
fn fmt_operand(expr: &Expr, min_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if precedence(expr) < min_prec {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn fmt_joined(
    items: &[Expr],
    sep: &str,
    min_prec: u8,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        fmt_operand(item, min_prec, f)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => f.write_str(s.name()),
            Expr::Integer(v) => write!(f, "{}", v),
            Expr::Add(terms) => fmt_joined(terms, " + ", PREC_ADD, f),
            Expr::Mul(factors) => fmt_joined(factors, "*", PREC_MUL + 1, f),
            Expr::Pow(base, exp) => {
                // `**` is right-associative; parenthesize both sides anyway.
                fmt_operand(base, PREC_ATOM, f)?;
                f.write_str("**")?;
                fmt_operand(exp, PREC_ATOM, f)
            }
            Expr::Call { func, args } => {
                write!(f, "{}(", func)?;
                fmt_joined(args, ", ", PREC_ADD, f)?;
                f.write_str(")")
            }
        }
    }
}
