//! Property-based tests for membership evaluation and rule connectives.

use fuzzy_mamdani::{
    AndOp, ControlSystem, Expr, Inputs, MamdaniInference, Membership, MembershipFunction, OrOp, Rules, Terms,
    Variable, Variables,
};
use proptest::prelude::*;

// ===== Strategies for generating test data =====

/// Three ordered feet/peak parameters
fn arb_triangle() -> impl Strategy<Value = (f64, f64, f64)> {
    prop::array::uniform3(-1000.0..1000.0f64).prop_map(|mut p| {
        p.sort_by(f64::total_cmp);
        (p[0], p[1], p[2])
    })
}

fn arb_degree() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.), Just(1.), 0.0..=1.0f64]
}

struct Pair {
    system: ControlSystem,
    x: Variable,
    y: Variable,
    out: Variable,
}

/// Two inputs, each with a single triangular term, feeding one rule.
fn pair(premise: fn(Expr, Expr) -> Expr) -> Pair {
    let terms = || Terms::new().with("mid", MembershipFunction::triangular(0., 50., 100.));
    let mut vars = Variables::new();
    let x = vars.add_antecedent("x", 0. ..=100., terms(), None).unwrap();
    let y = vars.add_antecedent("y", 0. ..=100., terms(), None).unwrap();
    let out = vars.add_consequent("out", 0. ..=100., terms(), None).unwrap();
    let mut rules = Rules::new();

    rules.add(premise(x.is("mid"), y.is("mid")), (out, "mid"));

    Pair {
        system: ControlSystem::new(vars, rules).unwrap(),
        x,
        y,
        out,
    }
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_triangle_degree_in_unit_interval((a, b, c) in arb_triangle(), x in -2000.0..2000.0f64) {
        let mf = MembershipFunction::triangular(a, b, c);
        let degree = mf.degree(x);

        prop_assert!((0.0..=1.0).contains(&degree), "degree {} out of range", degree);
        prop_assert_eq!(mf.degree(b), 1.);

        if x != b && (x <= a || x >= c) {
            prop_assert_eq!(degree, 0.);
        }
    }

    #[test]
    fn prop_and_is_min_of_terms(vx in -50.0..150.0f64, vy in -50.0..150.0f64) {
        let p = pair(Expr::and);
        let mid = MembershipFunction::triangular(0., 50., 100.);
        let outputs = MamdaniInference::default()
            .eval(&p.system, &Inputs::new().with(p.x, vx).with(p.y, vy))
            .unwrap();

        prop_assert_eq!(outputs.firing_strength(p.out), Some(mid.degree(vx).min(mid.degree(vy))));
    }

    #[test]
    fn prop_or_is_max_of_terms(vx in -50.0..150.0f64, vy in -50.0..150.0f64) {
        let p = pair(Expr::or);
        let mid = MembershipFunction::triangular(0., 50., 100.);
        let outputs = MamdaniInference::default()
            .eval(&p.system, &Inputs::new().with(p.x, vx).with(p.y, vy))
            .unwrap();

        prop_assert_eq!(outputs.firing_strength(p.out), Some(mid.degree(vx).max(mid.degree(vy))));
    }

    #[test]
    fn prop_min_max_commutative_associative(u in arb_degree(), v in arb_degree(), w in arb_degree()) {
        prop_assert_eq!(AndOp::Min.apply(u, v), AndOp::Min.apply(v, u));
        prop_assert_eq!(OrOp::Max.apply(u, v), OrOp::Max.apply(v, u));
        prop_assert_eq!(
            AndOp::Min.apply(AndOp::Min.apply(u, v), w),
            AndOp::Min.apply(u, AndOp::Min.apply(v, w))
        );
        prop_assert_eq!(
            OrOp::Max.apply(OrOp::Max.apply(u, v), w),
            OrOp::Max.apply(u, OrOp::Max.apply(v, w))
        );
    }

    #[test]
    fn prop_norms_stay_in_unit_interval(u in arb_degree(), v in arb_degree()) {
        for and_op in [AndOp::Min, AndOp::Prod, AndOp::BoundedProd, AndOp::DrasticProd] {
            let degree = and_op.apply(u, v);
            prop_assert!((0.0..=1.0).contains(&degree));
            prop_assert!(degree <= u.min(v) + 1e-12, "{:?}({}, {}) = {}", and_op, u, v, degree);
        }
        for or_op in [OrOp::Max, OrOp::ProbOr, OrOp::BoundedSum, OrOp::DrasticSum] {
            let degree = or_op.apply(u, v);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&degree));
            prop_assert!(degree >= u.max(v) - 1e-12, "{:?}({}, {}) = {}", or_op, u, v, degree);
        }
    }

    #[test]
    fn prop_output_is_undefined_or_within_universe(vx in -500.0..500.0f64, vy in -500.0..500.0f64) {
        let p = pair(Expr::and);
        let outputs = MamdaniInference::default()
            .eval(&p.system, &Inputs::new().with(p.x, vx).with(p.y, vy))
            .unwrap();
        let strength = outputs.firing_strength(p.out).unwrap();

        match outputs.get(p.out).unwrap().crisp() {
            Some(value) => {
                prop_assert!(strength > 0.);
                prop_assert!(value.is_finite());
                prop_assert!((0.0..=100.0).contains(&value));
            },
            None => prop_assert_eq!(strength, 0.),
        }
    }
}
