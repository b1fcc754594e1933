//! Boundary parser for model-host detections.
//!
//! The model host returns loosely shaped JSON. Everything past this module
//! works with a fully populated [`Detection`].

use serde_json::{Map, Value};
use thiserror::Error;

/// Name used when the model host could not attach an identity.
pub const UNKNOWN_PERSON: &str = "Unknown";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("detection must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("detection field `{field}` must be {expected}, got {actual}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A normalized face detection with its identity-match result.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Face box as `[x1, y1, x2, y2]` in image pixels.
    pub bbox: Option<[f32; 4]>,
    pub confidence: Option<f32>,
    pub person_name: String,
    pub is_same_person: bool,
    pub similarity: f64,
}

impl Detection {
    /// Parse and normalize a raw detection.
    ///
    /// Absent or `null` fields take their defaults: `is_same_person = false`,
    /// `similarity = 0`, `person_name = "Unknown"` (also used for an empty
    /// name). A field that is present with the wrong type is rejected.
    pub fn from_value(value: &Value) -> Result<Self, DetectionError> {
        let obj = value
            .as_object()
            .ok_or(DetectionError::NotAnObject(json_kind(value)))?;

        let is_same_person = match field(obj, "is_same_person") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => return Err(wrong_type("is_same_person", "a boolean", other)),
        };

        let similarity = match field(obj, "similarity") {
            None => 0.0,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| wrong_type("similarity", "a number", v))?,
        };

        let person_name = match field(obj, "person_name") {
            None => UNKNOWN_PERSON.to_string(),
            Some(Value::String(s)) if s.is_empty() => UNKNOWN_PERSON.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(wrong_type("person_name", "a string", other)),
        };

        let confidence = match field(obj, "confidence") {
            None => None,
            Some(v) => Some(
                v.as_f64()
                    .ok_or_else(|| wrong_type("confidence", "a number", v))? as f32,
            ),
        };

        let bbox = match field(obj, "bbox") {
            None => None,
            Some(v) => Some(parse_bbox(v)?),
        };

        Ok(Self {
            bbox,
            confidence,
            person_name,
            is_same_person,
            similarity,
        })
    }
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn parse_bbox(value: &Value) -> Result<[f32; 4], DetectionError> {
    let bad = || wrong_type("bbox", "an array of four numbers", value);
    let items = value.as_array().ok_or_else(bad)?;
    if items.len() != 4 {
        return Err(bad());
    }
    let mut bbox = [0.0f32; 4];
    for (slot, item) in bbox.iter_mut().zip(items) {
        *slot = item.as_f64().ok_or_else(bad)? as f32;
    }
    Ok(bbox)
}

fn wrong_type(field: &'static str, expected: &'static str, actual: &Value) -> DetectionError {
    DetectionError::WrongType {
        field,
        expected,
        actual: json_kind(actual),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_detection() {
        let d = Detection::from_value(&json!({
            "bbox": [10, 20, 110, 140],
            "confidence": 0.93,
            "person_name": "Alice",
            "is_same_person": true,
            "similarity": 0.81
        }))
        .unwrap();
        assert_eq!(d.person_name, "Alice");
        assert!(d.is_same_person);
        assert!((d.similarity - 0.81).abs() < 1e-9);
        assert_eq!(d.bbox, Some([10.0, 20.0, 110.0, 140.0]));
        assert!((d.confidence.unwrap() - 0.93).abs() < 1e-6);
    }

    #[test]
    fn test_empty_object_takes_defaults() {
        let d = Detection::from_value(&json!({})).unwrap();
        assert_eq!(d.person_name, UNKNOWN_PERSON);
        assert!(!d.is_same_person);
        assert_eq!(d.similarity, 0.0);
        assert!(d.bbox.is_none());
        assert!(d.confidence.is_none());
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let d = Detection::from_value(&json!({
            "person_name": null,
            "is_same_person": null,
            "similarity": null
        }))
        .unwrap();
        assert_eq!(d.person_name, UNKNOWN_PERSON);
        assert!(!d.is_same_person);
        assert_eq!(d.similarity, 0.0);
    }

    #[test]
    fn test_empty_name_is_unknown() {
        let d = Detection::from_value(&json!({"person_name": ""})).unwrap();
        assert_eq!(d.person_name, UNKNOWN_PERSON);
    }

    #[test]
    fn test_null_is_rejected() {
        assert_eq!(
            Detection::from_value(&Value::Null),
            Err(DetectionError::NotAnObject("null"))
        );
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Detection::from_value(&json!([1, 2, 3])).is_err());
        assert!(Detection::from_value(&json!("Alice")).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = Detection::from_value(&json!({"is_same_person": "yes"})).unwrap_err();
        assert_eq!(
            err,
            DetectionError::WrongType {
                field: "is_same_person",
                expected: "a boolean",
                actual: "a string",
            }
        );
    }

    #[test]
    fn test_short_bbox_is_rejected() {
        assert!(Detection::from_value(&json!({"bbox": [1, 2, 3]})).is_err());
    }
}
