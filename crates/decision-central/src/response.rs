//! The decision response envelope.
//!
//! ```json
//! {"Result": {"Risk": "High"}, "Executed Rule": ["Assess", "Risk", "R2"], "Status": {}}
//! ```

use feel_literal::LiteralEncoder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::engine::{Decision, EngineError, ExecutedRules};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// Encoded output variables of the last executed decision table.
    #[serde(rename = "Result")]
    pub result: Map<String, JsonValue>,
    #[serde(rename = "Executed Rule")]
    pub executed: ExecutedRuleField,
    #[serde(rename = "Status")]
    pub status: Status,
}

/// `Executed Rule` is a bare triple when exactly one table fired exactly one
/// rule, and a list of triples otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutedRuleField {
    Flat([String; 3]),
    List(Vec<[String; 3]>),
}

impl Default for ExecutedRuleField {
    fn default() -> Self {
        ExecutedRuleField::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Status {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl DecisionResponse {
    pub fn from_decision(decision: &Decision, encoder: &LiteralEncoder) -> Self {
        let executed = match decision {
            Decision::Single(outcome) => match &outcome.executed {
                ExecutedRules::One(rule) => ExecutedRuleField::Flat(rule.triple()),
                ExecutedRules::Many(rules) => {
                    ExecutedRuleField::List(rules.iter().map(|r| r.triple()).collect())
                }
            },
            Decision::Sequence(outcomes) => ExecutedRuleField::List(
                outcomes
                    .iter()
                    .flat_map(|outcome| outcome.executed.iter())
                    .map(|r| r.triple())
                    .collect(),
            ),
        };
        let result = decision
            .last()
            .map(|outcome| {
                outcome
                    .result
                    .iter()
                    .map(|(name, value)| (name.clone(), encoder.encode(value)))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            result,
            executed,
            status: Status::default(),
        }
    }

    pub fn from_error(error: EngineError) -> Self {
        Self {
            result: Map::new(),
            executed: ExecutedRuleField::default(),
            status: Status {
                errors: error.errors,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DecisionOutcome, ExecutedRule};
    use feel_literal::{Value, WrapMode, YearMonthDuration};
    use serde_json::json;

    fn outcome(result: Vec<(String, Value)>, executed: ExecutedRules) -> DecisionOutcome {
        DecisionOutcome::new(result, executed)
    }

    fn envelope(response: &DecisionResponse) -> JsonValue {
        serde_json::to_value(response).unwrap()
    }

    fn plain() -> LiteralEncoder {
        LiteralEncoder::with_options(feel_literal::EncoderOptions::new(WrapMode::Plain))
    }

    #[test]
    fn single_rule_is_a_flat_triple() {
        let decision = Decision::Single(outcome(
            vec![("Risk".into(), Value::from("High"))],
            ExecutedRules::One(ExecutedRule::new("Assess", "Risk", "R2")),
        ));
        let response = DecisionResponse::from_decision(&decision, &plain());
        assert_eq!(
            envelope(&response),
            json!({
                "Result": {"Risk": "High"},
                "Executed Rule": ["Assess", "Risk", "R2"],
                "Status": {}
            })
        );
        assert!(response.status.is_ok());
    }

    #[test]
    fn collected_rules_are_a_list() {
        let decision = Decision::Single(outcome(
            vec![("Fees".into(), Value::from(vec![10i64, 20]))],
            ExecutedRules::Many(vec![
                ExecutedRule::new("Fees", "Fees", "F1"),
                ExecutedRule::new("Fees", "Fees", "F4"),
            ]),
        ));
        let response = DecisionResponse::from_decision(&decision, &plain());
        assert_eq!(
            envelope(&response),
            json!({
                "Result": {"Fees": [10.0, 20.0]},
                "Executed Rule": [["Fees", "Fees", "F1"], ["Fees", "Fees", "F4"]],
                "Status": {}
            })
        );
    }

    #[test]
    fn sequence_reports_last_result_and_every_rule() {
        let decision = Decision::Sequence(vec![
            outcome(
                vec![("Band".into(), Value::from("B"))],
                ExecutedRules::One(ExecutedRule::new("Band", "Banding", "B2")),
            ),
            outcome(
                vec![("Term".into(), Value::from(YearMonthDuration::from_months(18)))],
                ExecutedRules::Many(vec![
                    ExecutedRule::new("Term", "Terms", "T1"),
                    ExecutedRule::new("Term", "Terms", "T2"),
                ]),
            ),
        ]);
        let encoder = LiteralEncoder::new();
        let response = DecisionResponse::from_decision(&decision, &encoder);
        assert_eq!(
            envelope(&response),
            json!({
                "Result": {"Term": "@\"P1Y6M\""},
                "Executed Rule": [
                    ["Band", "Banding", "B2"],
                    ["Term", "Terms", "T1"],
                    ["Term", "Terms", "T2"]
                ],
                "Status": {}
            })
        );
    }

    #[test]
    fn engine_errors_empty_the_envelope() {
        let response =
            DecisionResponse::from_error(EngineError::new(vec!["no such table".into()]));
        assert_eq!(
            envelope(&response),
            json!({
                "Result": {},
                "Executed Rule": [],
                "Status": {"errors": ["no such table"]}
            })
        );
    }

    #[test]
    fn envelope_deserializes_both_rule_shapes() {
        let flat: DecisionResponse = serde_json::from_value(json!({
            "Result": {}, "Executed Rule": ["D", "T", "R"], "Status": {}
        }))
        .unwrap();
        assert_eq!(
            flat.executed,
            ExecutedRuleField::Flat(["D".into(), "T".into(), "R".into()])
        );
        let empty: DecisionResponse = serde_json::from_value(json!({
            "Result": {}, "Executed Rule": [], "Status": {"errors": ["x"]}
        }))
        .unwrap();
        assert_eq!(empty.executed, ExecutedRuleField::List(vec![]));
        assert!(!empty.status.is_ok());
    }
}
