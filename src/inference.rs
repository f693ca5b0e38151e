use rayon::prelude::*;
use slotmap::SecondaryMap;
use tracing::{debug, trace, warn};

use crate::config::EngineOptions;
use crate::dsl::{Antecedent, Clause};
use crate::error::{FuzzyError, OutOfDomain, Result};
use crate::inputs::Inputs;
use crate::ops;
use crate::outputs::{Crisp, Outputs, RuleActivation};
use crate::rules::Rules;
use crate::terms::TermId;
use crate::variable::{LinguisticVariable, Role, VariableKey, Variables};

/// An antecedent with every clause resolved to a variable key and term index.
#[derive(Debug)]
enum Premise {
    Is(VariableKey, TermId),
    And(Box<Premise>, Box<Premise>),
    Or(Box<Premise>, Box<Premise>),
}

impl Premise {
    fn resolve(expr: &Antecedent, vars: &Variables, rule: usize) -> Result<Self> {
        Ok(match expr {
            Antecedent::Is(clause) => {
                let (key, term) = resolve_clause(vars, clause, rule, Role::Antecedent)?;

                Premise::Is(key, term)
            },
            Antecedent::And(lhs, rhs) => Premise::And(
                Box::new(Self::resolve(lhs, vars, rule)?),
                Box::new(Self::resolve(rhs, vars, rule)?),
            ),
            Antecedent::Or(lhs, rhs) => Premise::Or(
                Box::new(Self::resolve(lhs, vars, rule)?),
                Box::new(Self::resolve(rhs, vars, rule)?),
            ),
        })
    }

    fn evaluate(&self, degrees: &SecondaryMap<VariableKey, Vec<f64>>) -> f64 {
        match self {
            Premise::Is(key, term) => degrees.get(*key).map_or(0., |d| d[term.index()]),
            Premise::And(lhs, rhs) => ops::and(lhs.evaluate(degrees), rhs.evaluate(degrees)),
            Premise::Or(lhs, rhs) => ops::or(lhs.evaluate(degrees), rhs.evaluate(degrees)),
        }
    }
}

fn resolve_clause(vars: &Variables, clause: &Clause, rule: usize, role: Role) -> Result<(VariableKey, TermId)> {
    let unknown = || FuzzyError::UnknownClause {
        rule,
        variable: clause.variable.clone(),
        term: clause.term.clone(),
    };
    let key = vars.key(&clause.variable).ok_or_else(unknown)?;
    let var = &vars.slots[key];

    if var.role() != role {
        return Err(FuzzyError::RoleMismatch {
            variable: clause.variable.clone(),
            expected: role.as_str(),
        });
    }

    let term = var.term_id(&clause.term).ok_or_else(unknown)?;

    Ok((key, term))
}

#[derive(Debug)]
struct CompiledRule {
    id: usize,
    premise: Premise,
    consequents: Vec<(VariableKey, TermId)>,
}

/// A validated, immutable rule base over a variable registry.
///
/// Evaluations never mutate the engine, so one engine can serve any number of
/// concurrent [`Session`]s.
#[derive(Debug)]
pub struct InferenceEngine {
    variables: Variables,
    rules: Rules,
    compiled: Vec<CompiledRule>,
    options: EngineOptions,
}

impl InferenceEngine {
    pub fn build(variables: Variables, rules: Rules) -> Result<Self> {
        Self::build_with_options(variables, rules, EngineOptions::default())
    }

    /// Resolves every clause of every rule, failing on the first one that doesn't
    /// name a registered `(variable, term)` of the right role.
    pub fn build_with_options(variables: Variables, rules: Rules, options: EngineOptions) -> Result<Self> {
        if rules.is_empty() {
            return Err(FuzzyError::EmptyRuleBase);
        }

        let mut compiled = Vec::with_capacity(rules.len());

        for rule in &rules {
            if rule.consequents().is_empty() {
                return Err(FuzzyError::EmptyConsequent { rule: rule.id() });
            }

            let premise = Premise::resolve(rule.antecedent(), &variables, rule.id())?;
            let consequents = rule
                .consequents()
                .iter()
                .map(|clause| resolve_clause(&variables, clause, rule.id(), Role::Consequent))
                .collect::<Result<Vec<_>>>()?;

            compiled.push(CompiledRule {
                id: rule.id(),
                premise,
                consequents,
            });
        }

        debug!(
            variables = variables.len(),
            rules = compiled.len(),
            clip_inputs = options.clip_inputs,
            "built inference engine"
        );

        Ok(Self {
            variables,
            rules,
            compiled,
            options,
        })
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.by_name(name)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    /// Binds `inputs` and computes every output in a fresh session.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs> {
        let mut session = self.session();

        session.bind_inputs(inputs)?;
        session.compute()?;
        session.into_outputs()
    }

    /// Evaluates independent cases in parallel, one session each.
    pub fn evaluate_batch(&self, cases: &[Inputs]) -> Vec<Result<Outputs>> {
        cases.par_iter().map(|inputs| self.evaluate(inputs)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing bound yet.
    Built,
    /// Inputs bound and fuzzified.
    Evaluating,
    /// Outputs available.
    Computed,
}

impl SessionState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Evaluating => "evaluating",
            Self::Computed => "computed",
        }
    }
}

/// The working state of a single evaluation. Not meant to be shared; create one per
/// evaluation with [`InferenceEngine::session`].
pub struct Session<'e> {
    engine: &'e InferenceEngine,
    state: SessionState,
    inputs: SecondaryMap<VariableKey, f64>,
    degrees: SecondaryMap<VariableKey, Vec<f64>>,
    warnings: Vec<OutOfDomain>,
    strengths: Vec<f64>,
    aggregated: SecondaryMap<VariableKey, Vec<f64>>,
    outputs: Option<Outputs>,
}

impl<'e> Session<'e> {
    fn new(engine: &'e InferenceEngine) -> Self {
        Self {
            engine,
            state: SessionState::Built,
            inputs: SecondaryMap::new(),
            degrees: SecondaryMap::new(),
            warnings: Vec::new(),
            strengths: Vec::new(),
            aggregated: SecondaryMap::new(),
            outputs: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn expect_state(&self, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FuzzyError::InvalidState {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            })
        }
    }

    /// Binds a crisp value to every antecedent variable and fuzzifies it. Every
    /// antecedent needs a value; out of domain values are kept and reported.
    pub fn bind_inputs(&mut self, inputs: &Inputs) -> Result<()> {
        self.expect_state(SessionState::Built)?;

        let vars = &self.engine.variables;

        for name in inputs.names() {
            match vars.by_name(name) {
                None => return Err(FuzzyError::UnknownVariable { name: name.to_owned() }),
                Some(var) if var.role() != Role::Antecedent => {
                    return Err(FuzzyError::RoleMismatch {
                        variable: name.to_owned(),
                        expected: Role::Antecedent.as_str(),
                    })
                },
                Some(_) => {},
            }
        }

        let mut bound = SecondaryMap::new();
        let mut degrees = SecondaryMap::new();
        let mut warnings = Vec::new();

        for (key, var) in vars.with_role(Role::Antecedent) {
            let value = inputs.get(var.name()).ok_or_else(|| FuzzyError::MissingInput {
                variable: var.name().to_owned(),
            })?;
            let (mut fuzzified, out_of_domain) = var.fuzzify(value).into_parts();

            if let Some(out_of_domain) = out_of_domain {
                warn!(
                    variable = var.name(),
                    value,
                    min = out_of_domain.min,
                    max = out_of_domain.max,
                    "input out of domain"
                );

                if self.engine.options.clip_inputs {
                    fuzzified = var.fuzzify(var.universe().clip(value)).into_parts().0;
                }

                warnings.push(out_of_domain);
            }

            bound.insert(key, value);
            degrees.insert(key, fuzzified);
        }

        self.inputs = bound;
        self.degrees = degrees;
        self.warnings = warnings;
        self.state = SessionState::Evaluating;

        Ok(())
    }

    /// Fires every rule, aggregates the implicated sets per output variable and
    /// defuzzifies them. An output no rule fired for is [`Crisp::Undefined`]; the
    /// other outputs are unaffected.
    pub fn compute(&mut self) -> Result<&Outputs> {
        self.expect_state(SessionState::Evaluating)?;

        let engine = self.engine;
        let vars = &engine.variables;

        self.strengths = engine
            .compiled
            .iter()
            .map(|rule| {
                let strength = rule.premise.evaluate(&self.degrees);

                trace!(rule = rule.id, strength, "rule fired");

                strength
            })
            .collect();

        let mut aggregated = SecondaryMap::new();

        for (key, var) in vars.with_role(Role::Consequent) {
            aggregated.insert(key, vec![0.; var.universe().len()]);
        }

        for (rule, &strength) in engine.compiled.iter().zip(&self.strengths) {
            // an unfired rule implicates an all-zero set, which max aggregation ignores
            if strength <= 0. {
                continue;
            }

            for &(key, term) in &rule.consequents {
                if let (Some(agg), Some(var)) = (aggregated.get_mut(key), vars.get(key)) {
                    ops::aggregate_into(agg, ops::implication(strength, var.sampled(term).iter().copied()));
                }
            }
        }

        let mut outputs = Outputs {
            warnings: self.warnings.clone(),
            ..Outputs::default()
        };

        for (key, var) in vars.with_role(Role::Consequent) {
            let agg = aggregated.get(key).map(Vec::as_slice).unwrap_or_default();
            let crisp = match ops::centroid(var.universe().samples(), agg) {
                Some(value) => Crisp::Defined(value),
                None => {
                    debug!(variable = var.name(), "no rule fired, defuzzification undefined");

                    Crisp::Undefined
                },
            };

            outputs.crisp.insert(var.name().to_owned(), crisp);
            outputs.aggregated.insert(var.name().to_owned(), agg.to_vec());
        }

        for (key, degrees) in &self.degrees {
            if let Some(var) = vars.get(key) {
                let terms = var
                    .terms()
                    .map(|(id, name, _)| (name.to_owned(), degrees[id.index()]))
                    .collect();

                outputs.fuzzified.insert(var.name().to_owned(), terms);
            }
        }

        outputs.trace = engine
            .compiled
            .iter()
            .zip(&self.strengths)
            .map(|(rule, &strength)| RuleActivation::new(rule.id, strength))
            .collect();

        self.aggregated = aggregated;
        self.state = SessionState::Computed;

        Ok(&*self.outputs.insert(outputs))
    }

    /// The crisp value bound to an antecedent variable.
    pub fn input(&self, variable: &str) -> Option<f64> {
        let key = self.engine.variables.key(variable)?;

        self.inputs.get(key).copied()
    }

    /// Firing strengths in rule order, empty until computed.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.strengths
    }

    /// The aggregated set of an output variable, once computed.
    pub fn aggregated(&self, variable: &str) -> Option<&[f64]> {
        let key = self.engine.variables.key(variable)?;

        self.aggregated.get(key).map(Vec::as_slice)
    }

    pub fn outputs(&self) -> Option<&Outputs> {
        self.outputs.as_ref()
    }

    pub fn into_outputs(self) -> Result<Outputs> {
        match self.outputs {
            Some(outputs) => Ok(outputs),
            None => Err(FuzzyError::InvalidState {
                expected: SessionState::Computed.as_str(),
                actual: self.state.as_str(),
            }),
        }
    }
}

#[cfg(test)]
fn bank_loan() -> InferenceEngine {
    use crate::dsl::is;
    use crate::membership::MembershipFunction::*;
    use crate::terms::Terms;
    use crate::universe::Universe;

    let mut vars = Variables::new();

    vars.add(
        LinguisticVariable::antecedent(
            "score",
            Universe::from_step(150., 200., 0.1).unwrap(),
            Terms::new()
                .with("high", Trapezoidal(175., 190., 200., 200.))
                .with("low", Trapezoidal(150., 150., 155., 175.)),
        )
        .unwrap(),
    )
    .unwrap();
    vars.add(
        LinguisticVariable::antecedent(
            "ratio",
            Universe::from_step(0.1, 1., 0.01).unwrap(),
            Terms::new()
                .with("good", Trapezoidal(0.1, 0.1, 0.3, 0.42))
                .with("bad", Trapezoidal(0.44, 0.7, 1., 1.)),
        )
        .unwrap(),
    )
    .unwrap();
    vars.add(
        LinguisticVariable::antecedent(
            "credit",
            Universe::from_step(0., 10., 0.1).unwrap(),
            Terms::new()
                .with("good", Trapezoidal(0., 0., 2., 5.))
                .with("bad", Trapezoidal(5., 8., 10., 10.)),
        )
        .unwrap(),
    )
    .unwrap();
    vars.add(
        LinguisticVariable::consequent(
            "decision",
            Universe::from_step(0., 10., 0.1).unwrap(),
            Terms::new()
                .with("approve", Trapezoidal(5., 8., 10., 10.))
                .with("reject", Trapezoidal(0., 0., 2., 5.)),
        )
        .unwrap(),
    )
    .unwrap();

    let mut rules = Rules::new();

    rules.add(
        is("score", "high").and(is("ratio", "good")).and(is("credit", "good")),
        [Clause::new("decision", "approve")],
    );
    rules.add(
        is("score", "low").and(is("ratio", "bad")).or(is("credit", "bad")),
        [Clause::new("decision", "reject")],
    );

    InferenceEngine::build(vars, rules).unwrap()
}

#[cfg(test)]
fn loan(score: f64, ratio: f64, credit: f64) -> Inputs {
    Inputs::new().with("score", score).with("ratio", ratio).with("credit", credit)
}

#[test]
fn test_bank_loan() {
    let engine = bank_loan();
    let outputs = engine.evaluate(&loan(190., 0.39, 1.5)).unwrap();
    let decision = outputs.value("decision").unwrap();

    assert!((outputs.firing_strength(1).unwrap() - 0.25).abs() < 1e-9);
    assert_eq!(outputs.firing_strength(2), Some(0.));
    assert_eq!(outputs.activated_rules(), vec![1]);
    assert!(decision > 7.5 && decision < 7.9, "decision = {decision}");
    assert_eq!(
        engine.variable("decision").unwrap().dominant_term(decision).map(|(t, _)| t),
        Some("approve")
    );
    assert!(outputs.warnings().is_empty());
}

#[test]
fn test_undefined_when_nothing_fires() {
    let engine = bank_loan();
    let outputs = engine.evaluate(&loan(160., 0.43, 3.)).unwrap();

    assert_eq!(outputs.crisp("decision"), Some(Crisp::Undefined));
    assert_eq!(outputs.value("decision"), None);
    assert!(outputs.activated_rules().is_empty());
    assert!(outputs.aggregated("decision").unwrap().iter().all(|m| *m == 0.));
}

#[test]
fn test_session_states() {
    let engine = bank_loan();
    let mut session = engine.session();

    assert_eq!(session.state(), SessionState::Built);
    assert!(matches!(
        session.compute(),
        Err(FuzzyError::InvalidState { expected: "evaluating", actual: "built" })
    ));

    session.bind_inputs(&loan(190., 0.39, 1.5)).unwrap();

    assert_eq!(session.state(), SessionState::Evaluating);
    assert_eq!(session.input("credit"), Some(1.5));
    assert!(session.firing_strengths().is_empty());

    session.compute().unwrap();

    assert_eq!(session.state(), SessionState::Computed);
    assert_eq!(session.firing_strengths().len(), 2);
    assert_eq!(session.aggregated("decision").map(<[f64]>::len), Some(101));
    assert!(session.bind_inputs(&loan(190., 0.39, 1.5)).is_err());
    assert!(session.into_outputs().is_ok());
    assert!(engine.session().into_outputs().is_err());
}

#[test]
fn test_missing_input() {
    let engine = bank_loan();
    let inputs = Inputs::new().with("score", 190.).with("credit", 1.5);

    assert!(matches!(
        engine.evaluate(&inputs),
        Err(FuzzyError::MissingInput { ref variable }) if variable == "ratio"
    ));
}

#[test]
fn test_unexpected_input() {
    let engine = bank_loan();

    assert!(matches!(
        engine.evaluate(&loan(190., 0.39, 1.5).with("income", 3.)),
        Err(FuzzyError::UnknownVariable { ref name }) if name == "income"
    ));
    assert!(matches!(
        engine.evaluate(&loan(190., 0.39, 1.5).with("decision", 3.)),
        Err(FuzzyError::RoleMismatch { ref variable, .. }) if variable == "decision"
    ));
}

#[test]
fn test_out_of_domain_input() {
    let engine = bank_loan();
    let outputs = engine.evaluate(&loan(210., 0.39, 1.5)).unwrap();

    // 210 is past the end of score's universe, and "high" stops at 200
    assert_eq!(outputs.warnings().len(), 1);
    assert_eq!(outputs.warnings()[0].variable, "score");
    assert_eq!(outputs.firing_strength(1), Some(0.));

    let engine = InferenceEngine::build_with_options(
        bank_loan().variables,
        bank_loan().rules,
        EngineOptions { clip_inputs: true },
    )
    .unwrap();
    let outputs = engine.evaluate(&loan(210., 0.39, 1.5)).unwrap();

    assert_eq!(outputs.warnings().len(), 1);
    assert!((outputs.firing_strength(1).unwrap() - 0.25).abs() < 1e-9);
}

#[test]
fn test_unknown_clause() {
    let mut rules = bank_loan().rules;

    rules.add(is_maybe(), [Clause::new("decision", "reject")]);

    let result = InferenceEngine::build(bank_loan().variables, rules);

    assert!(matches!(
        result,
        Err(FuzzyError::UnknownClause { rule: 3, ref variable, ref term })
            if variable == "credit" && term == "excellent"
    ));

    let mut rules = Rules::new();

    rules.add(crate::dsl::is("score", "high"), [Clause::new("decision", "maybe")]);

    assert!(matches!(
        InferenceEngine::build(bank_loan().variables, rules),
        Err(FuzzyError::UnknownClause { rule: 1, ref term, .. }) if term == "maybe"
    ));
}

#[cfg(test)]
fn is_maybe() -> Antecedent {
    crate::dsl::is("score", "high").and(crate::dsl::is("credit", "excellent"))
}

#[test]
fn test_invalid_rule_base() {
    use crate::dsl::is;

    assert!(matches!(
        InferenceEngine::build(bank_loan().variables, Rules::new()),
        Err(FuzzyError::EmptyRuleBase)
    ));

    let mut rules = Rules::new();

    rules.add(is("score", "high"), Vec::<Clause>::new());

    assert!(matches!(
        InferenceEngine::build(bank_loan().variables, rules),
        Err(FuzzyError::EmptyConsequent { rule: 1 })
    ));

    let mut rules = Rules::new();

    rules.add(is("decision", "approve"), [Clause::new("decision", "reject")]);

    assert!(matches!(
        InferenceEngine::build(bank_loan().variables, rules),
        Err(FuzzyError::RoleMismatch { expected: "antecedent", .. })
    ));
}

#[test]
fn test_untouched_output_is_undefined() {
    use crate::dsl::is;
    use crate::membership::MembershipFunction::Triangular;
    use crate::terms::Terms;
    use crate::universe::Universe;

    let mut vars = bank_loan().variables;

    vars.add(
        LinguisticVariable::consequent(
            "interest",
            Universe::from_step(0., 20., 0.5).unwrap(),
            Terms::new().with("low", Triangular(0., 0., 10.)),
        )
        .unwrap(),
    )
    .unwrap();

    let mut rules = Rules::new();

    rules.add(is("score", "high"), [Clause::new("decision", "approve")]);

    let engine = InferenceEngine::build(vars, rules).unwrap();
    let outputs = engine.evaluate(&loan(190., 0.39, 1.5)).unwrap();

    assert_eq!(outputs.crisp("interest"), Some(Crisp::Undefined));
    assert!(outputs.value("decision").is_some());
}

#[test]
fn test_evaluate_batch() {
    let engine = bank_loan();
    let cases = [loan(190., 0.39, 1.5), loan(160., 0.43, 3.), loan(160., 0.8, 9.)];
    let results = engine.evaluate_batch(&cases);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().unwrap().value("decision").unwrap() > 5.);
    assert_eq!(results[1].as_ref().unwrap().crisp("decision"), Some(Crisp::Undefined));
    assert!(results[2].as_ref().unwrap().value("decision").unwrap() < 5.);

    for (case, result) in cases.iter().zip(&results) {
        let sequential = engine.evaluate(case).unwrap();

        assert_eq!(sequential.crisp("decision"), result.as_ref().unwrap().crisp("decision"));
    }
}
