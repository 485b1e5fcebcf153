use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SpecError};

/// A single scalar option passed through to an external constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KwargValue {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX` that still fit 64 bits.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl KwargValue {
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(i) => Some(i),
            Self::UInt(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Int(i) => u64::try_from(i).ok(),
            Self::UInt(u) => Some(u),
            _ => None,
        }
    }

    /// Integers widen to floats, everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(i) => Some(i as f64),
            Self::UInt(u) => Some(u as f64),
            Self::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(field: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::String(s) => Ok(Self::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else {
                    n.as_f64().map(Self::Float).ok_or_else(|| {
                        SpecError::schema(field, format!("number {n} is out of range"))
                    })
                }
            }
            other => Err(SpecError::schema(
                field,
                format!("expected a scalar value, got {}", super::kind(other)),
            )),
        }
    }
}

impl fmt::Display for KwargValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Named scalar options for a network or optimizer constructor.
///
/// The contents are opaque to this crate: only the scalar-value invariant is
/// enforced here, each constructor checks its own keys at the point of use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Kwargs(BTreeMap<String, KwargValue>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&KwargValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KwargValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds the mapping from a JSON value, naming offending entries as
    /// `<field>.<key>`.
    pub(crate) fn from_json(field: &str, value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(SpecError::schema(
                field,
                format!("expected an object, got {}", super::kind(value)),
            ));
        };

        map.iter()
            .map(|(key, value)| {
                let value = KwargValue::from_json(&format!("{field}.{key}"), value)?;
                Ok((key.clone(), value))
            })
            .collect::<Result<_>>()
            .map(Self)
    }
}

impl<K: Into<String>> FromIterator<(K, KwargValue)> for Kwargs {
    fn from_iter<I: IntoIterator<Item = (K, KwargValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_scalars() {
        let value =
            json!({"use_batchnorm": true, "n_downsample": 2, "dropout": 0.5, "act": "relu"});
        let kwargs = Kwargs::from_json("inference_net_kwargs", &value).unwrap();

        assert_eq!(kwargs.len(), 4);
        assert_eq!(kwargs.get("use_batchnorm"), Some(&KwargValue::Bool(true)));
        assert_eq!(kwargs.get("n_downsample"), Some(&KwargValue::Int(2)));
        assert_eq!(
            kwargs.get("dropout").and_then(KwargValue::as_f64),
            Some(0.5)
        );
        assert_eq!(kwargs.get("act").and_then(KwargValue::as_str), Some("relu"));
    }

    #[test]
    fn integers_above_i64_keep_their_value() {
        let value = json!({"seed": u64::MAX, "offset": -3});
        let kwargs = Kwargs::from_json("inference_net_kwargs", &value).unwrap();

        let seed = kwargs.get("seed").unwrap();
        assert_eq!(seed, &KwargValue::UInt(u64::MAX));
        assert_eq!(seed.as_u64(), Some(u64::MAX));
        assert_eq!(seed.as_i64(), None);
        assert_eq!(seed.to_string(), "18446744073709551615");
        assert_eq!(kwargs.get("offset").and_then(KwargValue::as_u64), None);
        assert_eq!(serde_json::to_value(&kwargs).unwrap(), value);
    }

    #[test]
    fn rejects_nested_values() {
        for bad in [
            json!({"k": [1, 2]}),
            json!({"k": {"x": 1}}),
            json!({"k": null}),
        ] {
            let err = Kwargs::from_json("opt_kwargs", &bad).unwrap_err();
            assert_eq!(err.field(), Some("opt_kwargs.k"));
        }
    }

    #[test]
    fn rejects_non_object() {
        let err = Kwargs::from_json("opt_kwargs", &json!([1])).unwrap_err();
        assert_eq!(err.field(), Some("opt_kwargs"));
    }

    #[test]
    fn serializes_back_to_plain_object() {
        let kwargs: Kwargs = [("learning_rate", KwargValue::Float(0.0001))]
            .into_iter()
            .collect();

        assert_eq!(
            serde_json::to_value(&kwargs).unwrap(),
            json!({"learning_rate": 0.0001})
        );
    }
}
