// src/grading/marks.rs

use std::collections::BTreeMap;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::SerializeMap,
};
use serde_json::Value;
use validator::ValidationError;

/// One gradable sub-item of a subject (e.g. "Theory", "Practical").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringComponent {
    pub key: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Derived components are left out of the overall maximum.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
}

impl ScoringComponent {
    pub fn new(key: &str, label: &str, max: Option<f64>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            max,
            computed: false,
        }
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }
}

/// Checks that every key is non-empty and unique and every `max` is finite and non-negative.
pub fn validate_scheme(scheme: &[ScoringComponent]) -> Result<(), ValidationError> {
    if scheme.is_empty() {
        return Err(ValidationError::new("scheme_cannot_be_empty"));
    }

    let mut seen = std::collections::HashSet::new();
    for component in scheme {
        if component.key.trim().is_empty() {
            return Err(ValidationError::new("component_key_empty"));
        }
        if !seen.insert(component.key.as_str()) {
            return Err(ValidationError::new("component_key_duplicate"));
        }
        if let Some(max) = component.max {
            if !max.is_finite() || max < 0.0 {
                return Err(ValidationError::new("component_max_invalid"));
            }
        }
    }
    Ok(())
}

/// A single stored score for one component.
///
/// On the wire a score is a number, the literal `"A"` for an absent component,
/// or anything else, which is kept as `Unrecorded` and counts as zero.
///
/// `Unrecorded` does not keep the raw value: it serializes as `null`, so a stored
/// `"12"` or `false` comes back as `null` after the next write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Numeric(f64),
    ComponentAbsent,
    Unrecorded,
}

impl Score {
    /// Value used in totals.
    pub fn value(&self) -> f64 {
        match self {
            Score::Numeric(v) => *v,
            Score::ComponentAbsent | Score::Unrecorded => 0.0,
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map(Score::Numeric).unwrap_or(Score::Unrecorded),
            Value::String(s) if s == "A" => Score::ComponentAbsent,
            _ => Score::Unrecorded,
        }
    }
}

impl From<f64> for Score {
    fn from(v: f64) -> Self {
        Score::Numeric(v)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Numeric(v) => serializer.serialize_f64(*v),
            Score::ComponentAbsent => serializer.serialize_str("A"),
            Score::Unrecorded => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Score::from_json(&value))
    }
}

/// One student's marks in one subject: either wholly absent or a map of component key to score.
///
/// Only `{"absent": true}` marks the whole subject absent. Other truthy values (`1`, `"yes"`)
/// do not; the object is then an ordinary mark map and its `absent` entry matches no component.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkSet {
    Absent,
    Present(BTreeMap<String, Score>),
}

impl MarkSet {
    pub fn present<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Score)>,
        K: Into<String>,
    {
        MarkSet::Present(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MarkSet::Absent)
    }

    /// Score stored for `key`. Missing keys and absent subjects read as `Unrecorded`.
    pub fn score(&self, key: &str) -> Score {
        match self {
            MarkSet::Absent => Score::Unrecorded,
            MarkSet::Present(map) => map.get(key).copied().unwrap_or(Score::Unrecorded),
        }
    }
}

impl Serialize for MarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MarkSet::Absent => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("absent", &true)?;
                map.end()
            }
            MarkSet::Present(scores) => {
                let mut map = serializer.serialize_map(Some(scores.len()))?;
                for (key, score) in scores {
                    map.serialize_entry(key, score)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for MarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Map::<String, Value>::deserialize(deserializer)?;

        if raw.get("absent") == Some(&Value::Bool(true)) {
            return Ok(MarkSet::Absent);
        }

        Ok(MarkSet::Present(
            raw.iter()
                .map(|(key, value)| (key.clone(), Score::from_json(value)))
                .collect(),
        ))
    }
}
