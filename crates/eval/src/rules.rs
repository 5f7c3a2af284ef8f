//! First-match rule evaluation.
//!
//! Rules are tried in declared order and the first whose condition holds
//! supplies the result. When none match, the rule set's default is returned
//! without an index.

use convenant_core::{EvaluationContext, Replacements, RuleSet};
use serde::Serialize;

use crate::placeholder::resolve_nested;
use crate::predicate::eval_condition;

/// Outcome of evaluating a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEvaluation {
    /// 1-based index of the matching rule, `None` when the default applied.
    pub matched_rule: Option<usize>,
    pub result: String,
}

impl RuleEvaluation {
    pub fn is_match(&self) -> bool {
        self.matched_rule.is_some()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "matched_rule": self.matched_rule,
            "result": self.result,
        })
    }
}

/// Evaluate `rule_set` against `ctx`.
pub fn evaluate_rules(rule_set: &RuleSet, ctx: &EvaluationContext) -> RuleEvaluation {
    for (i, rule) in rule_set.rules.iter().enumerate() {
        if eval_condition(&rule.condition, ctx) {
            tracing::debug!(rule = i + 1, "rule matched");
            return RuleEvaluation {
                matched_rule: Some(i + 1),
                result: rule.result.clone(),
            };
        }
    }
    tracing::debug!(rules = rule_set.rules.len(), "no rule matched; using default");
    RuleEvaluation {
        matched_rule: None,
        result: rule_set.default.clone(),
    }
}

/// Evaluate, then resolve placeholders nested in the selected result.
pub fn evaluate_resolved(
    rule_set: &RuleSet,
    ctx: &EvaluationContext,
    replacements: &Replacements,
    max_depth: usize,
) -> RuleEvaluation {
    let mut evaluation = evaluate_rules(rule_set, ctx);
    evaluation.result = resolve_nested(&evaluation.result, replacements, max_depth);
    evaluation
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use convenant_core::{Condition, Operator};

    fn rule_set() -> RuleSet {
        RuleSet::new("Partijen hebben geen kinderen.")
            .with_rule(
                Condition::leaf("AantalKinderen", Operator::GreaterThan, 1i64),
                "Partijen hebben [[AANTAL_KINDEREN]] kinderen.",
            )
            .with_rule(
                Condition::leaf("AantalKinderen", Operator::GreaterThan, 0i64),
                "Partijen hebben een kind.",
            )
    }

    #[test]
    fn first_matching_rule_wins() {
        let ctx = EvaluationContext::new().with("AantalKinderen", 3i64);
        let eval = evaluate_rules(&rule_set(), &ctx);
        assert_eq!(eval.matched_rule, Some(1));
        assert!(eval.is_match());

        let ctx = EvaluationContext::new().with("AantalKinderen", 1i64);
        assert_eq!(evaluate_rules(&rule_set(), &ctx).matched_rule, Some(2));
    }

    #[test]
    fn default_has_no_index() {
        let ctx = EvaluationContext::new().with("AantalKinderen", 0i64);
        let eval = evaluate_rules(&rule_set(), &ctx);
        assert_eq!(
            eval,
            RuleEvaluation {
                matched_rule: None,
                result: "Partijen hebben geen kinderen.".to_string()
            }
        );
        assert_eq!(
            eval.to_json(),
            serde_json::json!({ "matched_rule": null, "result": "Partijen hebben geen kinderen." })
        );
    }

    #[test]
    fn resolved_result_substitutes_placeholders() {
        let ctx = EvaluationContext::new().with("AantalKinderen", 3i64);
        let mut replacements = Replacements::new();
        replacements.insert("AANTAL_KINDEREN", "[[AANTAL_WOORD]]".to_string());
        replacements.insert("AANTAL_WOORD", "drie".to_string());
        let eval = evaluate_resolved(&rule_set(), &ctx, &replacements, 5);
        assert_eq!(eval.result, "Partijen hebben drie kinderen.");
        assert_eq!(eval.matched_rule, Some(1));
    }
}
