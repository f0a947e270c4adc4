//! The decision engine seam.
//!
//! Rule evaluation lives outside this crate. An engine receives the decoded
//! input variables and reports, per decision table it executed, the output
//! variables and the rule(s) that fired.

use feel_literal::Value;
use thiserror::Error;

/// Evaluates a ruleset against decoded input variables.
pub trait DecisionEngine {
    /// Run the whole ruleset, or only the decision table named by `scope`.
    fn decide(&self, input: &[(String, Value)], scope: Option<&str>)
        -> Result<Decision, EngineError>;
}

impl<E: DecisionEngine + ?Sized> DecisionEngine for &E {
    fn decide(
        &self,
        input: &[(String, Value)],
        scope: Option<&str>,
    ) -> Result<Decision, EngineError> {
        (**self).decide(input, scope)
    }
}

impl<E: DecisionEngine + ?Sized> DecisionEngine for Box<E> {
    fn decide(
        &self,
        input: &[(String, Value)],
        scope: Option<&str>,
    ) -> Result<Decision, EngineError> {
        (**self).decide(input, scope)
    }
}

/// One rule that fired.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutedRule {
    pub decision: String,
    pub table: String,
    pub rule_id: String,
}

impl ExecutedRule {
    pub fn new(
        decision: impl Into<String>,
        table: impl Into<String>,
        rule_id: impl Into<String>,
    ) -> Self {
        Self {
            decision: decision.into(),
            table: table.into(),
            rule_id: rule_id.into(),
        }
    }

    /// `[decision, table, rule]`, the wire form of a rule.
    pub fn triple(&self) -> [String; 3] {
        [
            self.decision.clone(),
            self.table.clone(),
            self.rule_id.clone(),
        ]
    }
}

/// The rule(s) one decision table fired.
///
/// Collecting hit policies (rule order, output order, collect) fire several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutedRules {
    One(ExecutedRule),
    Many(Vec<ExecutedRule>),
}

impl ExecutedRules {
    pub fn iter(&self) -> std::slice::Iter<'_, ExecutedRule> {
        match self {
            ExecutedRules::One(rule) => std::slice::from_ref(rule).iter(),
            ExecutedRules::Many(rules) => rules.iter(),
        }
    }
}

/// Output variables and fired rules of one decision table.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub result: Vec<(String, Value)>,
    pub executed: ExecutedRules,
}

impl DecisionOutcome {
    pub fn new(result: Vec<(String, Value)>, executed: ExecutedRules) -> Self {
        Self { result, executed }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// A single decision table was executed.
    Single(DecisionOutcome),
    /// One outcome per decision table, in execution order.
    Sequence(Vec<DecisionOutcome>),
}

impl Decision {
    pub fn outcomes(&self) -> &[DecisionOutcome] {
        match self {
            Decision::Single(outcome) => std::slice::from_ref(outcome),
            Decision::Sequence(outcomes) => outcomes,
        }
    }

    /// The outcome whose results are reported back to the caller.
    pub fn last(&self) -> Option<&DecisionOutcome> {
        self.outcomes().last()
    }
}

/// Failure status reported by the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("decision engine reported {} error(s)", .errors.len())]
pub struct EngineError {
    pub errors: Vec<String>,
}

impl EngineError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}
