use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Flat key/value data supplied by the caller.
pub type ModelData = BTreeMap<String, DataValue>;

/// A primitive value in the model data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl DataValue {
    /// The text to draw or fill, `None` when the value carries no data
    /// (null or an empty string).
    pub fn as_fill_text(&self) -> Option<String> {
        match self {
            DataValue::Null => None,
            DataValue::Text(s) if s.is_empty() => None,
            other => Some(other.to_string()),
        }
    }

    /// Checkbox semantics: `true`, `1` and `yes` (any case) mean checked.
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::Bool(b) => *b,
            DataValue::Number(n) => *n == 1.0,
            DataValue::Text(s) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
            }
            DataValue::Null => false,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Bool(b) => write!(f, "{}", b),
            // Integral numbers print without a trailing `.0`.
            DataValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            DataValue::Number(n) => write!(f, "{}", n),
            DataValue::Text(s) => f.write_str(s),
            DataValue::Null => Ok(()),
        }
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_untagged_primitives() {
        let data: ModelData =
            serde_json::from_str(r#"{"a":"x","b":2,"c":true,"d":null,"e":1.5}"#).unwrap();
        assert_eq!(data["a"], DataValue::Text("x".into()));
        assert_eq!(data["b"], DataValue::Number(2.0));
        assert_eq!(data["c"], DataValue::Bool(true));
        assert_eq!(data["d"], DataValue::Null);
        assert_eq!(data["e"].to_string(), "1.5");
    }

    #[test]
    fn fill_text_skips_empty_values() {
        assert_eq!(DataValue::Null.as_fill_text(), None);
        assert_eq!(DataValue::from("").as_fill_text(), None);
        assert_eq!(DataValue::Number(42.0).as_fill_text().as_deref(), Some("42"));
        assert_eq!(DataValue::Bool(false).as_fill_text().as_deref(), Some("false"));
    }

    #[test]
    fn truthiness_matches_checkbox_rules() {
        for v in ["true", "1", "yes", " YES ", "True"] {
            assert!(DataValue::from(v).is_truthy(), "{v}");
        }
        for v in ["false", "0", "no", "on", "checked", ""] {
            assert!(!DataValue::from(v).is_truthy(), "{v}");
        }
        assert!(DataValue::Bool(true).is_truthy());
        assert!(DataValue::Number(1.0).is_truthy());
        assert!(!DataValue::Number(2.0).is_truthy());
        assert!(!DataValue::Null.is_truthy());
    }
}
