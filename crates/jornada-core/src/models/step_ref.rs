//! Step refs embedded in a journey.
//!
//! Journeys store their structure as two loosely-typed JSON arrays, one of
//! course snapshots and one of nested journey snapshots. They are resolved
//! into typed refs once, when the journey is read, so nothing downstream has
//! to inspect raw JSON. Every field is optional here; the step expander
//! substitutes display defaults for whatever is missing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Snapshot of a course used as a journey step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CourseStepRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Snapshot of a nested journey used as a journey step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct JourneyStepRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_steps: Option<u32>,
}

/// A step ref that can be resolved from an arbitrary JSON value.
pub trait StepRef: Sized + Default {
    /// Resolve from one array element. Never fails: a value that is not an
    /// object yields a ref with every field absent.
    fn from_value(value: &Value) -> Self;
}

impl StepRef for CourseStepRef {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = as_step_object(value) else {
            return Self::default();
        };
        Self {
            id: id(obj),
            title: text(obj, &["title", "name", "nome"]),
            description: text(obj, &["description", "descricao"]),
            duration_minutes: count(obj, &["duration_minutes", "duration"]),
        }
    }
}

impl StepRef for JourneyStepRef {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = as_step_object(value) else {
            return Self::default();
        };
        Self {
            id: id(obj),
            title: text(obj, &["title", "name"]),
            description: text(obj, &["description", "descricao"]),
            duration_minutes: count(obj, &["duration_minutes", "duration"]),
            number_of_steps: count(obj, &["number_of_steps", "number_steps"]),
        }
    }
}

/// Deserialize a step list leniently.
///
/// Missing, null and non-array values all become an empty list.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: StepRef,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().map(T::from_value).collect(),
        None => Vec::new(),
        Some(other) => {
            tracing::warn!(kind = json_kind(&other), "step list is not an array, treating as empty");
            Vec::new()
        }
    })
}

fn as_step_object(value: &Value) -> Option<&Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        tracing::warn!(kind = json_kind(value), "malformed step ref, substituting defaults");
    }
    obj
}

fn id(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-blank string among `keys`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First non-negative integer among `keys`. Numeric strings are accepted.
fn count(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(|v| match v {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn legacy_keys_are_accepted() {
        let step = CourseStepRef::from_value(&json!({
            "id": "c9",
            "nome": "Phrasal Verbs",
            "descricao": "Common verbs",
            "duration": 45,
        }));
        assert_eq!(step.id.as_deref(), Some("c9"));
        assert_eq!(step.title.as_deref(), Some("Phrasal Verbs"));
        assert_eq!(step.description.as_deref(), Some("Common verbs"));
        assert_eq!(step.duration_minutes, Some(45));
    }

    #[test]
    fn title_wins_over_name() {
        let step = CourseStepRef::from_value(&json!({ "title": "A", "nome": "B" }));
        assert_eq!(step.title.as_deref(), Some("A"));
    }

    #[test]
    fn blank_title_falls_through() {
        let step = CourseStepRef::from_value(&json!({ "title": "  ", "name": "B" }));
        assert_eq!(step.title.as_deref(), Some("B"));
    }

    #[test]
    fn non_object_yields_defaults() {
        assert_eq!(JourneyStepRef::from_value(&json!("j1")), JourneyStepRef::default());
    }

    #[test]
    fn numeric_strings_and_ids() {
        let step = JourneyStepRef::from_value(&json!({ "id": 7, "number_steps": "3" }));
        assert_eq!(step.id.as_deref(), Some("7"));
        assert_eq!(step.number_of_steps, Some(3));
    }
}
