//! Condition tree evaluator.
//!
//! Evaluation is total: a missing context field reads as null, and every
//! operator has a defined result for null. Groups short-circuit left to
//! right. The context is never modified.

use std::cmp::Ordering;

use convenant_core::{
    Condition, EvaluationContext, LeafCondition, LogicalOperator, Operand, Operator, Value,
};

use crate::compare::{compare_ordered, is_empty, normalized_text, values_equal};

/// Evaluate a condition tree against a context.
pub fn eval_condition(condition: &Condition, ctx: &EvaluationContext) -> bool {
    match condition {
        Condition::Leaf(leaf) => eval_leaf(leaf, ctx),
        Condition::Group {
            operator: LogicalOperator::And,
            children,
        } => children.iter().all(|c| eval_condition(c, ctx)),
        Condition::Group {
            operator: LogicalOperator::Or,
            children,
        } => children.iter().any(|c| eval_condition(c, ctx)),
    }
}

fn eval_leaf(leaf: &LeafCondition, ctx: &EvaluationContext) -> bool {
    let actual = ctx.get(&leaf.field).unwrap_or(&Value::Null);
    let operand = &leaf.value;

    match leaf.operator {
        Operator::Equals => equals(actual, operand),
        Operator::NotEquals => !equals(actual, operand),
        Operator::GreaterThan => ordered(actual, operand, |o| o == Ordering::Greater),
        Operator::GreaterOrEqual => ordered(actual, operand, |o| o != Ordering::Less),
        Operator::LessThan => ordered(actual, operand, |o| o == Ordering::Less),
        Operator::LessOrEqual => ordered(actual, operand, |o| o != Ordering::Greater),
        Operator::IsEmpty => is_empty(actual),
        Operator::IsNotEmpty => !is_empty(actual),
        Operator::Contains => text_match(actual, operand, |a, b| a.contains(b)),
        Operator::StartsWith => text_match(actual, operand, |a, b| a.starts_with(b)),
        Operator::EndsWith => text_match(actual, operand, |a, b| a.ends_with(b)),
        Operator::In => member_of(actual, operand),
        Operator::NotIn => !member_of(actual, operand),
    }
}

/// A list operand on `=` means membership.
fn equals(actual: &Value, operand: &Operand) -> bool {
    match operand {
        Operand::Scalar(expected) => values_equal(actual, expected),
        Operand::List(_) => member_of(actual, operand),
    }
}

fn ordered(actual: &Value, operand: &Operand, accept: impl Fn(Ordering) -> bool) -> bool {
    match operand {
        Operand::Scalar(expected) => compare_ordered(actual, expected).is_some_and(accept),
        Operand::List(_) => false,
    }
}

/// String containment against the whole operand text; any element of a
/// list operand may match. A null on either side never matches.
fn text_match(actual: &Value, operand: &Operand, test: impl Fn(&str, &str) -> bool) -> bool {
    if actual.is_null() {
        return false;
    }
    let haystack = normalized_text(actual);
    let matches = |needle: &Value| !needle.is_null() && test(&haystack, &normalized_text(needle));
    match operand {
        Operand::Scalar(needle) => matches(needle),
        Operand::List(items) => items.iter().any(matches),
    }
}

/// Membership against a list, or a comma-separated text operand.
/// A null (missing) value is never a member.
fn member_of(actual: &Value, operand: &Operand) -> bool {
    if actual.is_null() {
        return false;
    }
    membership_values(operand)
        .iter()
        .any(|candidate| values_equal(actual, candidate))
}

fn membership_values(operand: &Operand) -> Vec<Value> {
    match operand {
        Operand::List(items) => items.clone(),
        Operand::Scalar(Value::Text(s)) if s.contains(',') => s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Value::from)
            .collect(),
        Operand::Scalar(v) => vec![v.clone()],
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> EvaluationContext {
        EvaluationContext::new()
            .with("AantalKinderen", 2i64)
            .with("Gehuwd", true)
            .with("Woonplaats", "Den Haag")
            .with("Leeg", "")
            .with("Bedrag", "1.250,00")
    }

    fn leaf(field: &str, op: Operator, value: impl Into<Value>) -> Condition {
        Condition::leaf(field, op, value)
    }

    #[test]
    fn equality_is_case_insensitive_on_field_and_value() {
        assert!(eval_condition(&leaf("woonplaats", Operator::Equals, "den haag"), &ctx()));
        assert!(eval_condition(&leaf("WOONPLAATS", Operator::NotEquals, "Delft"), &ctx()));
        assert!(eval_condition(&leaf("Gehuwd", Operator::Equals, "ja"), &ctx()));
    }

    #[test]
    fn ordered_comparisons_are_numeric() {
        assert!(eval_condition(&leaf("AantalKinderen", Operator::GreaterThan, 0i64), &ctx()));
        assert!(eval_condition(&leaf("AantalKinderen", Operator::LessOrEqual, 2i64), &ctx()));
        assert!(!eval_condition(&leaf("AantalKinderen", Operator::LessThan, 2i64), &ctx()));
        assert!(eval_condition(&leaf("Bedrag", Operator::GreaterOrEqual, 1000i64), &ctx()));
        assert!(!eval_condition(&leaf("Woonplaats", Operator::GreaterThan, 1i64), &ctx()));
    }

    #[test]
    fn missing_field_semantics() {
        let c = ctx();
        assert!(eval_condition(&leaf("Ontbreekt", Operator::Equals, Value::Null), &c));
        assert!(!eval_condition(&leaf("Ontbreekt", Operator::Equals, "x"), &c));
        assert!(eval_condition(&leaf("Ontbreekt", Operator::NotEquals, "x"), &c));
        assert!(!eval_condition(&leaf("Ontbreekt", Operator::GreaterThan, 0i64), &c));
        assert!(!eval_condition(&leaf("Ontbreekt", Operator::LessThan, 0i64), &c));
        assert!(!eval_condition(&leaf("Ontbreekt", Operator::Contains, ""), &c));
        assert!(eval_condition(&leaf("Ontbreekt", Operator::IsEmpty, Value::Null), &c));
        assert!(!eval_condition(&leaf("Ontbreekt", Operator::In, "a,b"), &c));
        assert!(eval_condition(&leaf("Ontbreekt", Operator::NotIn, "a,b"), &c));
    }

    #[test]
    fn emptiness() {
        assert!(eval_condition(&leaf("Leeg", Operator::IsEmpty, Value::Null), &ctx()));
        assert!(eval_condition(&leaf("Woonplaats", Operator::IsNotEmpty, Value::Null), &ctx()));
    }

    #[test]
    fn containment_operators() {
        assert!(eval_condition(&leaf("Woonplaats", Operator::Contains, "HAAG"), &ctx()));
        assert!(eval_condition(&leaf("Woonplaats", Operator::StartsWith, "den"), &ctx()));
        assert!(eval_condition(&leaf("Woonplaats", Operator::EndsWith, "haag"), &ctx()));
        assert!(!eval_condition(&leaf("Woonplaats", Operator::EndsWith, "den"), &ctx()));
        let any_of = Condition::leaf_list(
            "Woonplaats",
            Operator::Contains,
            vec![Value::from("Delft"), Value::from("haag")],
        );
        assert!(eval_condition(&any_of, &ctx()));
    }

    #[test]
    fn containment_uses_the_whole_operand_text() {
        let c = EvaluationContext::new().with("Woonplaats", "Utrecht");
        assert!(!eval_condition(
            &leaf("Woonplaats", Operator::Contains, "Kerkstraat 1, Utrecht"),
            &c
        ));
        assert!(!eval_condition(
            &leaf("Woonplaats", Operator::StartsWith, "Amsterdam, U"),
            &c
        ));
        assert!(!eval_condition(
            &leaf("Woonplaats", Operator::EndsWith, "Zeist, trecht"),
            &c
        ));
        let c = EvaluationContext::new().with("Adres", "Kerkstraat 1, Utrecht");
        assert!(eval_condition(&leaf("Adres", Operator::Contains, "1, utrecht"), &c));
    }

    #[test]
    fn containment_without_operand_never_matches() {
        let c = EvaluationContext::new().with("Woonplaats", "Utrecht");
        assert!(!eval_condition(&leaf("Woonplaats", Operator::Contains, Value::Null), &c));
        assert!(!eval_condition(&leaf("Woonplaats", Operator::StartsWith, Value::Null), &c));
        assert!(!eval_condition(&leaf("Woonplaats", Operator::EndsWith, Value::Null), &c));
    }

    #[test]
    fn dot_grouped_text_amounts_compare_as_thousands() {
        let c = EvaluationContext::new().with("Bedrag", "12.500");
        assert!(eval_condition(&leaf("Bedrag", Operator::GreaterThan, 1000i64), &c));
        assert!(eval_condition(&leaf("Bedrag", Operator::Equals, 12500i64), &c));
    }

    #[test]
    fn membership_accepts_list_or_comma_text() {
        let list = Condition::leaf_list(
            "Woonplaats",
            Operator::In,
            vec![Value::from("Delft"), Value::from("Den Haag")],
        );
        assert!(eval_condition(&list, &ctx()));
        assert!(eval_condition(&leaf("Woonplaats", Operator::In, "Delft, den haag"), &ctx()));
        assert!(eval_condition(&leaf("Woonplaats", Operator::NotIn, "Delft,Leiden"), &ctx()));
        let eq_list = Condition::leaf_list(
            "AantalKinderen",
            Operator::Equals,
            vec![Value::from(1i64), Value::from(2i64)],
        );
        assert!(eval_condition(&eq_list, &ctx()));
    }

    #[test]
    fn groups_short_circuit_and_nest() {
        let t = leaf("Gehuwd", Operator::Equals, true);
        let f = leaf("Gehuwd", Operator::Equals, false);
        assert!(!eval_condition(&Condition::and(vec![t.clone(), f.clone()]), &ctx()));
        assert!(eval_condition(&Condition::or(vec![f.clone(), t.clone()]), &ctx()));
        let nested = Condition::and(vec![
            t.clone(),
            Condition::or(vec![f.clone(), Condition::and(vec![t.clone(), t.clone()])]),
        ]);
        assert!(eval_condition(&nested, &ctx()));
        assert!(eval_condition(&Condition::and(vec![]), &ctx()));
        assert!(!eval_condition(&Condition::or(vec![]), &ctx()));
    }

    #[test]
    fn evaluation_is_repeatable() {
        let c = ctx();
        let cond = leaf("AantalKinderen", Operator::GreaterThan, 1i64);
        let first = eval_condition(&cond, &c);
        assert_eq!(first, eval_condition(&cond, &c));
        assert_eq!(c, ctx());
    }
}
