use std::collections::HashMap;

use super::*;
use crate::error::ExprError;

fn x() -> Expr {
    Expr::symbol("x")
}

fn y() -> Expr {
    Expr::symbol("y")
}

// --- Fast rendering ---

#[test]
fn test_render_sum_of_product() {
    let e = Expr::Add(vec![
        Expr::symbol("a"),
        Expr::Mul(vec![Expr::symbol("b"), Expr::integer(2)]),
    ]);
    assert_eq!(render(&e), "a + b * 2");
}

#[test]
fn test_render_atoms() {
    assert_eq!(render(&x()), "x");
    assert_eq!(render(&Expr::integer(-7)), "-7");
}

#[test]
fn test_render_named_calls() {
    let i = Expr::symbol("xindex");
    let e = Expr::modular_indexing(i.clone(), Expr::integer(16), Expr::integer(4));
    assert_eq!(render(&e), "ModularIndexing(xindex, 16, 4)");

    let e = Expr::floor_div(Expr::Add(vec![i.clone(), Expr::integer(1)]), Expr::integer(2));
    assert_eq!(render(&e), "FloorDiv(xindex + 1, 2)");

    let e = Expr::clean_div(i.clone(), Expr::integer(8));
    assert_eq!(render(&e), "CleanDiv(xindex, 8)");

    let e = Expr::call(FuncName::Named("Max".to_string()), [i, Expr::integer(0)]);
    assert_eq!(render(&e), "Max(xindex, 0)");
}

#[test]
fn test_render_skips_parentheses() {
    // The fast form drops grouping; Display keeps it.
    let e = Expr::Mul(vec![Expr::Add(vec![x(), y()]), Expr::symbol("z")]);
    assert_eq!(render(&e), "x + y * z");
    assert_eq!(e.to_string(), "(x + y)*z");
}

#[test]
fn test_render_falls_back_to_display_for_pow() {
    let e = Expr::Add(vec![Expr::pow(x(), Expr::integer(2)), Expr::integer(1)]);
    assert_eq!(render(&e), "x**2 + 1");
}

#[test]
fn test_render_method_matches_function() {
    let e = Expr::Mul(vec![x(), Expr::floor_div(y(), Expr::integer(3))]);
    assert_eq!(e.render(), render(&e));
}

// --- Display ---

#[test]
fn test_display_generic_form() {
    let e = Expr::Add(vec![
        Expr::symbol("a"),
        Expr::Mul(vec![Expr::symbol("b"), Expr::integer(2)]),
    ]);
    assert_eq!(e.to_string(), "a + b*2");
}

#[test]
fn test_display_parenthesizes_negative_factor_and_pow_base() {
    let e = Expr::Mul(vec![Expr::integer(-2), x()]);
    assert_eq!(e.to_string(), "(-2)*x");

    let e = Expr::pow(Expr::Add(vec![x(), Expr::integer(1)]), Expr::integer(2));
    assert_eq!(e.to_string(), "(x + 1)**2");

    let e = Expr::pow(x(), Expr::pow(y(), Expr::integer(2)));
    assert_eq!(e.to_string(), "x**(y**2)");
}

#[test]
fn test_display_call_arguments() {
    let e = Expr::floor_div(Expr::Mul(vec![x(), Expr::integer(4)]), Expr::integer(-2));
    assert_eq!(e.to_string(), "FloorDiv(x*4, -2)");
}

// --- Substitution ---

#[test]
fn test_substitute_symbol_with_constant() {
    let e = Expr::Add(vec![x(), y()]);
    let saved = e.clone();
    let out = substitute(&e, [(x(), Expr::integer(5))]).unwrap();
    assert_eq!(render(&out), "5 + y");
    assert_eq!(e, saved);
}

#[test]
fn test_substitute_promotes_raw_names() {
    let e = Expr::Mul(vec![x(), y()]);
    let out = substitute(&e, [("x", "z")]).unwrap();
    assert_eq!(out, Expr::Mul(vec![Expr::symbol("z"), y()]));
}

#[test]
fn test_substitute_rejects_reserved_key() {
    let e = Expr::Add(vec![Expr::symbol("s0"), x()]);
    let err = substitute(&e, [("s0", Term::from(4i64))]).unwrap_err();
    assert_eq!(
        err,
        ExprError::ReservedSymbolName {
            name: "s0".to_string()
        }
    );
}

#[test]
fn test_substitute_rejects_reserved_value() {
    let err = substitute(&x(), [("x", "stride")]).unwrap_err();
    assert!(matches!(err, ExprError::ReservedSymbolName { .. }));
}

#[test]
fn test_substitute_accepts_reserved_symbol_as_expression() {
    // Typed shape symbols are fine; only raw-name promotion is guarded.
    let s0 = Expr::symbol("s0");
    let e = Expr::Mul(vec![s0.clone(), x()]);
    let out = substitute(&e, [(s0, Expr::integer(128))]).unwrap();
    assert_eq!(render(&out), "128 * x");
}

#[test]
fn test_substitute_empty_name_rejected() {
    let err = substitute(&x(), [("", "y")]).unwrap_err();
    assert_eq!(err, ExprError::EmptySymbolName);
}

#[test]
fn test_substitute_failure_builds_nothing() {
    // The first pair is valid, the second is not: no partial result.
    let e = Expr::Add(vec![x(), y()]);
    let pairs = vec![
        (Term::from("x"), Term::from(1i64)),
        (Term::from("s1"), Term::from(2i64)),
    ];
    assert!(substitute(&e, pairs).is_err());
    assert_eq!(render(&e), "x + y");
}

#[test]
fn test_substitute_matches_whole_subtrees() {
    let sum = Expr::Add(vec![x(), Expr::integer(1)]);
    let e = Expr::floor_div(sum.clone(), Expr::integer(2));
    let out = substitute(&e, [(sum, Expr::symbol("t"))]).unwrap();
    assert_eq!(render(&out), "FloorDiv(t, 2)");
}

#[test]
fn test_substitute_is_structural_not_algebraic() {
    // y + x is a different tree than x + y.
    let e = Expr::Add(vec![y(), x()]);
    let key = Expr::Add(vec![x(), y()]);
    let out = substitute(&e, [(key, Expr::integer(0))]).unwrap();
    assert_eq!(out, e);
}

#[test]
fn test_substitute_does_not_rescan_replacement() {
    // x -> x + 1 must not loop or apply twice.
    let replacement = Expr::Add(vec![x(), Expr::integer(1)]);
    let out = substitute(&x(), [(x(), replacement.clone())]).unwrap();
    assert_eq!(out, replacement);
}

#[test]
fn test_substitute_simultaneous() {
    // Swap x and y in one pass.
    let e = Expr::Add(vec![x(), Expr::Mul(vec![y(), Expr::integer(3)])]);
    let out = substitute(&e, [(x(), y()), (y(), x())]).unwrap();
    assert_eq!(render(&out), "y + x * 3");
}

#[test]
fn test_substitute_with_map_reference() {
    let mut table = HashMap::new();
    table.insert(x(), Expr::integer(2));
    let e = Expr::pow(x(), y());
    let out = e.substitute(&table).unwrap();
    assert_eq!(out.to_string(), "2**y");
}

#[test]
fn test_substitute_empty_table_returns_copy() {
    let e = Expr::Add(vec![x(), y()]);
    let out = substitute(&e, Vec::<(Term, Term)>::new()).unwrap();
    assert_eq!(out, e);
}

#[test]
fn test_index_symbol() {
    assert_eq!(index_symbol("x0"), Ok(Expr::symbol("x0")));
    assert!(index_symbol("s0").is_err());
    assert!(index_symbol("").is_err());
}

// --- Free symbols ---

#[test]
fn test_free_symbols_deduplicated_and_sorted() {
    let e = Expr::Add(vec![
        Expr::symbol("y"),
        Expr::Mul(vec![x(), Expr::symbol("y")]),
        Expr::modular_indexing(Expr::symbol("a"), Expr::integer(2), Expr::integer(3)),
    ]);
    let names: Vec<&str> = e.free_symbols().into_iter().map(Symbol::name).collect();
    assert_eq!(names, vec!["a", "x", "y"]);
}

#[test]
fn test_free_symbols_of_constant_is_empty() {
    assert!(Expr::integer(3).free_symbols().is_empty());
}

#[test]
fn test_has_symbol_with_prefix() {
    let e = Expr::Add(vec![
        Expr::symbol("xindex"),
        Expr::Mul(vec![Expr::symbol("rindex"), Expr::integer(64)]),
    ]);
    assert!(e.has_symbol_with_prefix("r"));
    assert!(e.has_symbol_with_prefix("xind"));
    assert!(!e.has_symbol_with_prefix("y"));
    assert!(!e.has_symbol_with_prefix("index"));
}

#[test]
fn test_has_symbol_containing() {
    let e = Expr::floor_div(Expr::symbol("tmp_ps0"), Expr::integer(2));
    assert!(e.has_symbol_containing("ps"));
    assert!(e.has_symbol_containing("tmp_ps0"));
    assert!(!e.has_symbol_containing("xindex"));
    assert!(!Expr::integer(1).has_symbol_containing(""));
}

// --- Constructors and shape helpers ---

#[test]
fn test_add_mul_degenerate_arity() {
    assert_eq!(Expr::add(Vec::new()), Expr::integer(0));
    assert_eq!(Expr::mul(Vec::new()), Expr::integer(1));
    assert_eq!(Expr::add([x()]), x());
    assert_eq!(Expr::mul([x(), y()]), Expr::Mul(vec![x(), y()]));
}

#[test]
fn test_product_folds_constants() {
    assert_eq!(product(Vec::new()), Expr::integer(1));
    assert_eq!(product([Expr::integer(2), Expr::integer(3)]), Expr::integer(6));
    assert_eq!(product([x()]), x());
    let p = product([x(), Expr::integer(4), Expr::Mul(vec![y(), Expr::integer(2)])]);
    assert_eq!(render(&p), "8 * x * y");
    assert_eq!(product([x(), Expr::integer(0)]), Expr::integer(0));
}

#[test]
fn test_product_keeps_overflowing_constant() {
    let p = product([Expr::integer(i64::MAX), Expr::integer(2)]);
    assert_eq!(
        p,
        Expr::Mul(vec![Expr::integer(i64::MAX), Expr::integer(2)])
    );
}

#[test]
fn test_sum_folds_constants() {
    assert_eq!(sum(Vec::new()), Expr::integer(0));
    let s = sum([Expr::integer(1), x(), Expr::Add(vec![y(), Expr::integer(2)])]);
    assert_eq!(render(&s), "x + y + 3");
    assert_eq!(sum([x(), Expr::integer(0)]), x());
}

#[test]
fn test_dot_of_strides() {
    let index = [Expr::symbol("x0"), Expr::symbol("x1")];
    let strides = [Expr::symbol("s1"), Expr::integer(1)];
    let e = dot(&index, &strides).unwrap();
    assert_eq!(render(&e), "x0 * s1 + x1");
}

#[test]
fn test_dot_length_mismatch() {
    let err = dot(&[x()], &[]).unwrap_err();
    assert_eq!(err, ExprError::LengthMismatch { left: 1, right: 0 });
}

// --- Serialization ---

#[test]
fn test_serialize_symbol_json() {
    insta::assert_json_snapshot!(Expr::symbol("x0"), @r#"
    {
      "Symbol": "x0"
    }
    "#);
}
