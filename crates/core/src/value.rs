//! Scalar values for condition evaluation and the flat context they live in.

use rust_decimal::Decimal;

use crate::ci_map::{CaseInsensitiveMap, Replacements};
use crate::error::ModelError;
use crate::format;

/// A scalar in an evaluation context or a condition's comparison value.
/// Numbers are `Decimal`, never `f64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl Value {
    /// Convert a scalar JSON value. Arrays and objects are rejected.
    pub fn from_json(field: &str, json: &serde_json::Value) -> Result<Self, ModelError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(_) => format::decimal_from_json(json)
                .map(Value::Number)
                .ok_or_else(|| ModelError::NonScalarValue {
                    field: field.to_string(),
                }),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            _ => Err(ModelError::NonScalarValue {
                field: field.to_string(),
            }),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(d) => {
                let text = d.normalize().to_string();
                match text.parse::<serde_json::Number>() {
                    Ok(n) => serde_json::Value::Number(n),
                    Err(_) => serde_json::Value::String(text),
                }
            }
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Plain-text rendering used for string comparison.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(d) => d.normalize().to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Number(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Flat, case-insensitive key/value context supplied per evaluation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext(CaseInsensitiveMap<Value>);

impl EvaluationContext {
    pub fn new() -> Self {
        EvaluationContext(CaseInsensitiveMap::new())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field, value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter()
    }

    /// Build a context from a JSON object of scalar values.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ModelError> {
        let obj = json.as_object().ok_or_else(|| ModelError::NonScalarValue {
            field: "<root>".to_string(),
        })?;
        let mut ctx = EvaluationContext::new();
        for (k, v) in obj {
            ctx.insert(k.clone(), Value::from_json(k, v)?);
        }
        Ok(ctx)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Build a replacement map from a JSON object. Scalars are rendered as text;
/// `null` becomes an empty string.
pub fn replacements_from_json(json: &serde_json::Value) -> Result<Replacements, ModelError> {
    let obj = json.as_object().ok_or_else(|| ModelError::NonScalarValue {
        field: "<root>".to_string(),
    })?;
    let mut map = Replacements::new();
    for (k, v) in obj {
        map.insert(k.clone(), Value::from_json(k, v)?.as_text());
    }
    Ok(map)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_from_json_is_case_insensitive() {
        let ctx = EvaluationContext::from_json(&json!({
            "AantalKinderen": 2,
            "Gehuwd": true,
            "Naam": "Jansen",
            "Leeg": null
        }))
        .unwrap();
        assert_eq!(ctx.get("aantalkinderen"), Some(&Value::Number(Decimal::from(2))));
        assert_eq!(ctx.get("GEHUWD"), Some(&Value::Bool(true)));
        assert_eq!(ctx.get("naam"), Some(&Value::Text("Jansen".to_string())));
        assert_eq!(ctx.get("leeg"), Some(&Value::Null));
        assert_eq!(ctx.get("ontbreekt"), None);
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = EvaluationContext::from_json(&json!({ "x": [1, 2] })).unwrap_err();
        assert!(matches!(err, ModelError::NonScalarValue { field } if field == "x"));
        assert!(EvaluationContext::from_json(&json!([1])).is_err());
    }

    #[test]
    fn decimal_numbers_keep_precision() {
        let v = Value::from_json("bedrag", &json!(1234.56)).unwrap();
        assert_eq!(v, Value::Number(Decimal::new(123456, 2)));
        assert_eq!(v.as_text(), "1234.56");
    }

    #[test]
    fn replacements_render_scalars_as_text() {
        let map = replacements_from_json(&json!({
            "NAAM": "Jansen",
            "AANTAL": 3,
            "LEEG": null
        }))
        .unwrap();
        assert_eq!(map.get("naam").map(String::as_str), Some("Jansen"));
        assert_eq!(map.get("aantal").map(String::as_str), Some("3"));
        assert_eq!(map.get("leeg").map(String::as_str), Some(""));
    }
}
