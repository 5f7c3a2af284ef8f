//! Condition trees and rule sets for conditional template text.
//!
//! A condition is either a leaf comparison (`field`, `operator`, `value`)
//! or an AND/OR group of child conditions. Groups nest to any depth. A rule
//! set is an ordered list of `(condition, result)` pairs plus a default;
//! order is significant because the first matching rule wins.
//!
//! JSON shapes:
//!
//! ```json
//! { "field": "AantalKinderen", "operator": ">", "value": 0 }
//! { "logicalOperator": "AND", "children": [ ... ] }
//! { "default": "...", "rules": [ { "condition": { ... }, "result": "..." } ] }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::value::Value;

// ──────────────────────────────────────────────
// Operators
// ──────────────────────────────────────────────

/// Leaf comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
    Contains,
    StartsWith,
    EndsWith,
    In,
    NotIn,
}

impl Operator {
    /// Canonical spelling, used for display and serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }
}

impl FromStr for Operator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" | "equals" => Operator::Equals,
            "!=" | "<>" | "ne" | "not_equals" => Operator::NotEquals,
            ">" | "gt" => Operator::GreaterThan,
            ">=" | "gte" => Operator::GreaterOrEqual,
            "<" | "lt" => Operator::LessThan,
            "<=" | "lte" => Operator::LessOrEqual,
            "is_empty" | "empty" => Operator::IsEmpty,
            "is_not_empty" | "not_empty" => Operator::IsNotEmpty,
            "contains" => Operator::Contains,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            _ => {
                return Err(ModelError::UnknownOperator { op: s.to_string() });
            }
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl FromStr for LogicalOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" | "EN" => Ok(LogicalOperator::And),
            "OR" | "OF" => Ok(LogicalOperator::Or),
            _ => Err(ModelError::UnknownLogicalOperator { op: s.to_string() }),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("AND"),
            LogicalOperator::Or => f.write_str("OR"),
        }
    }
}

// ──────────────────────────────────────────────
// Condition tree
// ──────────────────────────────────────────────

/// Right-hand side of a leaf comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
}

/// A single comparison against one context field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCondition {
    pub field: String,
    pub operator: Operator,
    pub value: Operand,
}

/// A boolean expression over an evaluation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Leaf(LeafCondition),
    Group {
        operator: LogicalOperator,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Convenience constructor for a leaf.
    pub fn leaf(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Condition::Leaf(LeafCondition {
            field: field.into(),
            operator,
            value: Operand::Scalar(value.into()),
        })
    }

    /// Convenience constructor for a membership leaf.
    pub fn leaf_list(field: impl Into<String>, operator: Operator, values: Vec<Value>) -> Self {
        Condition::Leaf(LeafCondition {
            field: field.into(),
            operator,
            value: Operand::List(values),
        })
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Condition::Group {
            operator: LogicalOperator::And,
            children,
        }
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Condition::Group {
            operator: LogicalOperator::Or,
            children,
        }
    }

    /// Parse a condition node. A node must be exactly one of leaf or group.
    pub fn from_json(v: &serde_json::Value) -> Result<Self, ModelError> {
        let obj = v.as_object().ok_or_else(|| ModelError::InvalidCondition {
            message: "condition must be a JSON object".to_string(),
        })?;

        let has_group = obj.contains_key("logicalOperator") || obj.contains_key("children");
        let has_leaf = obj.contains_key("field") || obj.contains_key("operator");

        match (has_group, has_leaf) {
            (true, true) => Err(ModelError::InvalidCondition {
                message: "node mixes leaf fields (field/operator) with group fields \
                          (logicalOperator/children)"
                    .to_string(),
            }),
            (true, false) => parse_group(obj),
            (false, true) => parse_leaf(obj),
            (false, false) => Err(ModelError::InvalidCondition {
                message: "node has neither field/operator nor logicalOperator/children"
                    .to_string(),
            }),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Condition::Leaf(leaf) => {
                let value = match &leaf.value {
                    Operand::Scalar(v) => v.to_json(),
                    Operand::List(items) => {
                        serde_json::Value::Array(items.iter().map(Value::to_json).collect())
                    }
                };
                serde_json::json!({
                    "field": leaf.field,
                    "operator": leaf.operator.as_str(),
                    "value": value,
                })
            }
            Condition::Group { operator, children } => serde_json::json!({
                "logicalOperator": operator.to_string(),
                "children": children.iter().map(Condition::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

fn parse_leaf(obj: &serde_json::Map<String, serde_json::Value>) -> Result<Condition, ModelError> {
    let field = obj
        .get("field")
        .and_then(|f| f.as_str())
        .ok_or_else(|| ModelError::InvalidCondition {
            message: "leaf missing string 'field'".to_string(),
        })?;
    let op_str = obj
        .get("operator")
        .and_then(|o| o.as_str())
        .ok_or_else(|| ModelError::InvalidCondition {
            message: format!("leaf '{}' missing string 'operator'", field),
        })?;
    let operator: Operator = op_str.parse()?;

    let value = match obj.get("value") {
        None => Operand::Scalar(Value::Null),
        Some(serde_json::Value::Array(items)) => Operand::List(
            items
                .iter()
                .map(|item| Value::from_json(field, item))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Some(scalar) => Operand::Scalar(Value::from_json(field, scalar)?),
    };

    Ok(Condition::Leaf(LeafCondition {
        field: field.to_string(),
        operator,
        value,
    }))
}

fn parse_group(obj: &serde_json::Map<String, serde_json::Value>) -> Result<Condition, ModelError> {
    let op_str = obj
        .get("logicalOperator")
        .and_then(|o| o.as_str())
        .ok_or_else(|| ModelError::InvalidCondition {
            message: "group missing string 'logicalOperator'".to_string(),
        })?;
    let operator: LogicalOperator = op_str.parse()?;
    let children = obj
        .get("children")
        .and_then(|c| c.as_array())
        .ok_or_else(|| ModelError::InvalidCondition {
            message: "group missing array 'children'".to_string(),
        })?
        .iter()
        .map(Condition::from_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::Group { operator, children })
}

// ──────────────────────────────────────────────
// Rules
// ──────────────────────────────────────────────

/// One `(condition, result)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub condition: Condition,
    pub result: String,
}

/// Ordered rules plus the text used when none match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub default: String,
}

impl RuleSet {
    pub fn new(default: impl Into<String>) -> Self {
        RuleSet {
            rules: Vec::new(),
            default: default.into(),
        }
    }

    /// Append a rule; evaluation order is insertion order.
    pub fn with_rule(mut self, condition: Condition, result: impl Into<String>) -> Self {
        self.rules.push(Rule {
            condition,
            result: result.into(),
        });
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let v: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(&v)
    }

    /// Parse `{ "default": "...", "rules": [ {condition, result}, ... ] }`.
    /// A missing default is treated as the empty string.
    pub fn from_json(v: &serde_json::Value) -> Result<Self, ModelError> {
        let default = match v.get("default") {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ModelError::InvalidRuleSet {
                    message: "'default' must be a string".to_string(),
                })
            }
        };
        let rules_json = v
            .get("rules")
            .and_then(|r| r.as_array())
            .ok_or_else(|| ModelError::InvalidRuleSet {
                message: "missing array 'rules'".to_string(),
            })?;

        let mut rules = Vec::with_capacity(rules_json.len());
        for (i, r) in rules_json.iter().enumerate() {
            let condition_json = r.get("condition").ok_or_else(|| ModelError::InvalidRuleSet {
                message: format!("rule {} missing 'condition'", i + 1),
            })?;
            let result = r
                .get("result")
                .and_then(|s| s.as_str())
                .ok_or_else(|| ModelError::InvalidRuleSet {
                    message: format!("rule {} missing string 'result'", i + 1),
                })?;
            rules.push(Rule {
                condition: Condition::from_json(condition_json)?,
                result: result.to_string(),
            });
        }
        Ok(RuleSet { rules, default })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
