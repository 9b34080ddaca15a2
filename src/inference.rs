use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::control::ControlSystem;
use crate::dsl::Expr;
use crate::error::EvalError;
use crate::inputs::Inputs;
use crate::membership::Membership;
use crate::ops::*;
use crate::outputs::{Inferred, InferredOutput, Outputs};
use crate::variable::{Role, Variables};

/// Mamdani inference: fuzzify crisp inputs through the rule premises, shape
/// each consequent by its rule's firing strength, aggregate per output and
/// defuzzify.
///
/// The engine holds only operator choices. It keeps no state between calls,
/// so one instance can serve any number of threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MamdaniInference {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    prod_link: ProductionLink,
    defuzz_op: DefuzzificationOp,
}

impl MamdaniInference {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        prod_link: ProductionLink,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            prod_link,
            defuzz_op,
        }
    }

    pub fn with_defuzzification(mut self, defuzz_op: DefuzzificationOp) -> Self {
        self.defuzz_op = defuzz_op;
        self
    }

    /// Runs every rule against `inputs`. Any missing input or unknown term
    /// fails the whole call; no partial outputs are returned.
    #[tracing::instrument(level = "debug", skip_all, fields(inputs = inputs.len()))]
    pub fn eval(&self, system: &ControlSystem, inputs: &Inputs) -> Result<Outputs, EvalError> {
        let vars = system.variables();
        let rules = system.rules();

        if inputs.0.keys().any(|&var| !vars.contains(var)) {
            return Err(EvalError::ForeignVariable);
        }

        // Compute Rule Firing Strengths
        let mut strengths = Vec::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            let strength = self.firing_strength(&rule.premise, vars, inputs)?;
            let weighted = (strength * rule.weight).clamp(0., 1.);

            tracing::trace!(rule = i, strength, weighted, "rule fired");

            strengths.push(weighted);
        }

        // Implication, Aggregation and Defuzzification per consequent
        let mut outputs = IndexMap::new();

        for (var, output) in vars.iter().filter(|(_, v)| v.role() == Role::Consequent) {
            let universe = output.universe();
            let mut aggregated: Option<Vec<f64>> = None;
            let mut firing_strength = 0.;

            for (rule, &strength) in rules.iter().zip(&strengths) {
                if rule.consequence.0 != var {
                    continue;
                }

                let membership = output.membership_function(&rule.consequence.1)?;
                let implication = self
                    .imp_op
                    .call(strength, universe.iter().map(|&y| membership.degree(y)));

                aggregated = Some(match aggregated {
                    None => implication.collect(),
                    Some(agg) => self.prod_link.call(agg, implication).collect(),
                });
                firing_strength = f64::max(firing_strength, strength);
            }

            let aggregated = aggregated.unwrap_or_else(|| vec![0.; universe.len()]);
            let value = Inferred::from(self.defuzz_op.call(universe, &aggregated));

            match value {
                Inferred::Crisp(crisp) => {
                    tracing::debug!(variable = output.name(), value = crisp, firing_strength, "defuzzified")
                },
                Inferred::Undefined => {
                    tracing::debug!(variable = output.name(), "no rule contributed, output undefined")
                },
            }

            outputs.insert(
                var,
                InferredOutput {
                    name: output.name().to_owned(),
                    value,
                    aggregated,
                    firing_strength,
                },
            );
        }

        Ok(Outputs(outputs))
    }

    /// Like [`eval`](Self::eval), with inputs given by variable name.
    pub fn eval_named<'n>(
        &self,
        system: &ControlSystem,
        values: impl IntoIterator<Item = (&'n str, f64)>,
    ) -> Result<Outputs, EvalError> {
        let inputs = Inputs::from_named(system.variables(), values)?;

        self.eval(system, &inputs)
    }

    /// Evaluates independent rows in parallel. Results keep the order of `rows`.
    pub fn eval_batch(&self, system: &ControlSystem, rows: &[Inputs]) -> Vec<Result<Outputs, EvalError>> {
        tracing::debug!(rows = rows.len(), "evaluating batch");

        rows.par_iter().map(|inputs| self.eval(system, inputs)).collect()
    }

    // Both operands are always evaluated so configuration errors surface no
    // matter what the other side of a connective yields
    fn firing_strength(&self, expr: &Expr, vars: &Variables, inputs: &Inputs) -> Result<f64, EvalError> {
        match expr {
            Expr::Is(handle, term) => {
                let var = vars.get(*handle).ok_or(EvalError::ForeignVariable)?;
                let value = inputs.get(*handle).ok_or_else(|| EvalError::MissingInput {
                    variable: var.name().to_owned(),
                })?;

                if !value.is_finite() {
                    return Err(EvalError::NonFiniteInput {
                        variable: var.name().to_owned(),
                        value,
                    });
                }

                var.membership_degree(term, value)
            },
            Expr::And(lhs, rhs) => {
                let left = self.firing_strength(lhs, vars, inputs)?;
                let right = self.firing_strength(rhs, vars, inputs)?;

                Ok(self.and_op.apply(left, right))
            },
            Expr::Or(lhs, rhs) => {
                let left = self.firing_strength(lhs, vars, inputs)?;
                let right = self.firing_strength(rhs, vars, inputs)?;

                Ok(self.or_op.apply(left, right))
            },
            Expr::Not(expr) => Ok(1. - self.firing_strength(expr, vars, inputs)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::membership::MembershipFunction;
    use crate::rules::{Rule, Rules};
    use crate::terms::Terms;
    use crate::variable::Variable;

    struct Loan {
        system: ControlSystem,
        score: Variable,
        ratio: Variable,
        credit: Variable,
        decision: Variable,
    }

    fn bank_loan(extra_rule: impl Fn(&Loan) -> Option<Rule>) -> Loan {
        let mut vars = Variables::new();
        let score = vars
            .add_antecedent(
                "score",
                150. ..=200.,
                Terms::new()
                    .with("high", MembershipFunction::trapezoidal(175., 190., 200., 200.))
                    .with("low", MembershipFunction::trapezoidal(150., 150., 155., 175.)),
                None,
            )
            .unwrap();
        let ratio = vars
            .add_antecedent(
                "ratio",
                0.1..=1.,
                Terms::new()
                    .with("good", MembershipFunction::trapezoidal(0.1, 0.1, 0.3, 0.42))
                    .with("bad", MembershipFunction::trapezoidal(0.44, 0.7, 1., 1.)),
                Some(0.01),
            )
            .unwrap();
        let credit = vars
            .add_antecedent(
                "credit",
                0. ..=10.,
                Terms::new()
                    .with("good", MembershipFunction::trapezoidal(0., 0., 2., 5.))
                    .with("bad", MembershipFunction::trapezoidal(5., 8., 10., 10.)),
                Some(0.1),
            )
            .unwrap();
        let decision = vars
            .add_consequent(
                "decision",
                0. ..=10.,
                Terms::new()
                    .with("approve", MembershipFunction::triangular(5., 10., 10.))
                    .with("reject", MembershipFunction::triangular(0., 0., 5.)),
                None,
            )
            .unwrap();

        let mut rules = Rules::new();

        rules.add(
            score.is("high").and2(ratio.is("good"), credit.is("good")),
            (decision, "approve"),
        );
        rules.add(
            score.is("low").and(ratio.is("bad").or(credit.is("bad"))),
            (decision, "reject"),
        );

        let mut loan = Loan {
            system: ControlSystem::new(vars.clone(), rules.clone()).unwrap(),
            score,
            ratio,
            credit,
            decision,
        };

        if let Some(rule) = extra_rule(&loan) {
            rules.push(rule);
            loan.system = ControlSystem::new(vars, rules).unwrap();
        }

        loan
    }

    #[test]
    fn test_bank_loan() {
        let loan = bank_loan(|_| None);
        let inputs = Inputs::new()
            .with(loan.score, 190.)
            .with(loan.ratio, 0.36)
            .with(loan.credit, 1.5);

        let outputs = MamdaniInference::default().eval(&loan.system, &inputs).unwrap();

        // approve clipped at 0.5 over 0..=10: 6 -> 0.2, 7 -> 0.4, 8..=10 -> 0.5
        let decision = outputs.get(loan.decision).unwrap().crisp().unwrap();

        assert_relative_eq!(decision, 17.5 / 2.1, epsilon = 1e-9);
        assert_relative_eq!(outputs.firing_strength(loan.decision).unwrap(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(outputs.inferred_cf(), 0.5, epsilon = 1e-9);
        assert_eq!(outputs.get_by_name("decision"), outputs.get(loan.decision));
        assert_eq!(outputs.aggregated(loan.decision).unwrap().len(), 11);
    }

    #[test]
    fn test_or_uses_max() {
        let loan = bank_loan(|_| None);
        // score low = 1, ratio bad = 0, credit bad = 1 -> reject fires at 1
        let inputs = Inputs::new()
            .with(loan.score, 150.)
            .with(loan.ratio, 0.2)
            .with(loan.credit, 9.);

        let outputs = MamdaniInference::default().eval(&loan.system, &inputs).unwrap();

        // reject (0, 0, 5) unclipped: 0 -> 1, 1 -> 0.8, ... 4 -> 0.2
        assert_relative_eq!(outputs.get(loan.decision).unwrap().crisp().unwrap(), 4. / 3., epsilon = 1e-9);
        assert_eq!(outputs.firing_strength(loan.decision), Some(1.));
    }

    #[test]
    fn test_undefined_when_nothing_fires() {
        let loan = bank_loan(|_| None);
        // score is neither high nor low at 175
        let inputs = Inputs::new()
            .with(loan.score, 175.)
            .with(loan.ratio, 0.2)
            .with(loan.credit, 1.);

        let outputs = MamdaniInference::default().eval(&loan.system, &inputs).unwrap();

        assert_eq!(outputs.get(loan.decision), Some(Inferred::Undefined));
        assert!(outputs.aggregated(loan.decision).unwrap().iter().all(|&m| m == 0.));
        assert_eq!(outputs.inferred_cf(), 0.);
    }

    #[test]
    fn test_missing_input_aborts_call_only() {
        let loan = bank_loan(|_| None);
        let engine = MamdaniInference::default();
        let partial = Inputs::new().with(loan.score, 190.).with(loan.ratio, 0.36);

        assert_eq!(
            engine.eval(&loan.system, &partial).unwrap_err(),
            EvalError::MissingInput {
                variable: "credit".into()
            }
        );

        let complete = partial.with(loan.credit, 1.5);

        assert!(engine.eval(&loan.system, &complete).is_ok());
    }

    #[test]
    fn test_inputs_from_another_system() {
        let loan = bank_loan(|_| None);
        let other = bank_loan(|_| None);
        let engine = MamdaniInference::default();
        let foreign = Inputs::new()
            .with(other.score, 190.)
            .with(other.ratio, 0.36)
            .with(other.credit, 1.5);

        assert_eq!(engine.eval(&loan.system, &foreign).unwrap_err(), EvalError::ForeignVariable);

        let mixed = Inputs::new()
            .with(loan.score, 190.)
            .with(loan.ratio, 0.36)
            .with(loan.credit, 1.5)
            .with(other.credit, 1.5);

        assert_eq!(engine.eval(&loan.system, &mixed).unwrap_err(), EvalError::ForeignVariable);
        assert!(engine.eval(&other.system, &foreign).is_ok());
    }

    #[test]
    fn test_non_finite_input() {
        let loan = bank_loan(|_| None);
        let inputs = Inputs::new()
            .with(loan.score, f64::NAN)
            .with(loan.ratio, 0.36)
            .with(loan.credit, 1.5);

        assert!(matches!(
            MamdaniInference::default().eval(&loan.system, &inputs),
            Err(EvalError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn test_unknown_label() {
        let premise = bank_loan(|loan| Some(Rule::new(loan.score.is("stellar"), (loan.decision, "approve"))));
        let consequence = bank_loan(|loan| Some(Rule::new(loan.score.is("high"), (loan.decision, "maybe"))));
        let inputs = |loan: &Loan| {
            Inputs::new()
                .with(loan.score, 190.)
                .with(loan.ratio, 0.36)
                .with(loan.credit, 1.5)
        };
        let engine = MamdaniInference::default();

        assert_eq!(
            engine.eval(&premise.system, &inputs(&premise)).unwrap_err(),
            EvalError::UnknownLabel {
                variable: "score".into(),
                term: "stellar".into()
            }
        );
        assert_eq!(
            engine.eval(&consequence.system, &inputs(&consequence)).unwrap_err(),
            EvalError::UnknownLabel {
                variable: "decision".into(),
                term: "maybe".into()
            }
        );
    }

    #[test]
    fn test_rule_weight_scales_strength() {
        let loan = bank_loan(|loan| {
            Rule::new(loan.credit.is("good"), (loan.decision, "reject"))
                .with_weight(0.25)
                .ok()
        });
        let inputs = Inputs::new()
            .with(loan.score, 175.)
            .with(loan.ratio, 0.2)
            .with(loan.credit, 1.);

        let outputs = MamdaniInference::default().eval(&loan.system, &inputs).unwrap();

        assert_eq!(outputs.firing_strength(loan.decision), Some(0.25));
        assert!(outputs.aggregated(loan.decision).unwrap().iter().all(|&m| m <= 0.25));
    }

    #[test]
    fn test_output_without_rules_is_undefined() {
        let mut vars = Variables::new();
        let terms = || Terms::new().with("mid", MembershipFunction::triangular(0., 5., 10.));
        let input = vars.add_antecedent("input", 0. ..=10., terms(), None).unwrap();
        let used = vars.add_consequent("used", 0. ..=10., terms(), None).unwrap();
        let unused = vars.add_consequent("unused", 0. ..=10., terms(), None).unwrap();
        let mut rules = Rules::new();

        rules.add(input.is("mid"), (used, "mid"));

        let system = ControlSystem::new(vars, rules).unwrap();
        let outputs = MamdaniInference::default()
            .eval_named(&system, [("input", 5.)])
            .unwrap();

        assert_eq!(outputs.len(), 2);
        assert_relative_eq!(outputs.get(used).unwrap().crisp().unwrap(), 5., epsilon = 1e-9);
        assert_eq!(outputs.get(unused), Some(Inferred::Undefined));
        assert_eq!(
            outputs.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["used", "unused"]
        );
    }

    #[test]
    fn test_batch_matches_sequential() {
        let loan = bank_loan(|_| None);
        let engine = MamdaniInference::default();
        let rows: Vec<_> = (0..32)
            .map(|i| {
                Inputs::new()
                    .with(loan.score, 150. + i as f64 * 1.5)
                    .with(loan.ratio, 0.1 + i as f64 * 0.02)
                    .with(loan.credit, i as f64 * 0.3)
            })
            .collect();

        let batch = engine.eval_batch(&loan.system, &rows);

        assert_eq!(batch.len(), rows.len());

        for (row, result) in rows.iter().zip(batch) {
            let sequential = engine.eval(&loan.system, row).unwrap();

            assert_eq!(result.unwrap().get(loan.decision), sequential.get(loan.decision));
        }
    }

    #[test]
    fn test_alternative_operators() {
        let loan = bank_loan(|_| None);
        let inputs = Inputs::new()
            .with(loan.score, 190.)
            .with(loan.ratio, 0.36)
            .with(loan.credit, 1.5);
        let larsen = MamdaniInference::new(
            AndOp::Prod,
            OrOp::ProbOr,
            ImplicationOp::Prod,
            ProductionLink::Max,
            DefuzzificationOp::Lom,
        );

        let outputs = larsen.eval(&loan.system, &inputs).unwrap();

        // approve scaled, not clipped: the peak at 10 survives
        assert_eq!(outputs.get(loan.decision), Some(Inferred::Crisp(10.)));

        let som = MamdaniInference::default().with_defuzzification(DefuzzificationOp::Som);
        let outputs = som.eval(&loan.system, &inputs).unwrap();

        assert_eq!(outputs.get(loan.decision), Some(Inferred::Crisp(8.)));
    }
}
