use std::num::NonZeroUsize;

use serde_json::{Map, Value};

use super::{Kwargs, kind};
use crate::error::{Result, SpecError};

/// Pulls typed fields out of a raw record, leaving unknown keys behind.
pub(crate) struct Fields {
    record: Map<String, Value>,
}

impl Fields {
    pub(crate) fn new(record: Map<String, Value>) -> Self {
        Self { record }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.record.contains_key(key)
    }

    fn require(&mut self, key: &str) -> Result<Value> {
        self.record
            .remove(key)
            .ok_or_else(|| SpecError::missing(key))
    }

    pub(crate) fn string(&mut self, key: &str) -> Result<String> {
        let value = self.require(key)?;
        string(key, value)
    }

    pub(crate) fn opt_string(&mut self, key: &str) -> Result<Option<String>> {
        self.record.remove(key).map(|v| string(key, v)).transpose()
    }

    pub(crate) fn positive(&mut self, key: &str) -> Result<NonZeroUsize> {
        let value = self.require(key)?;
        positive(key, &value)
    }

    pub(crate) fn opt_positive(&mut self, key: &str) -> Result<Option<NonZeroUsize>> {
        self.record
            .remove(key)
            .map(|v| positive(key, &v))
            .transpose()
    }

    /// A strictly positive real.
    pub(crate) fn positive_real(&mut self, key: &str) -> Result<f64> {
        let value = self.require(key)?;
        let x = real(key, &value)?;
        if x <= 0.0 {
            return Err(SpecError::schema(key, format!("must be positive, got {x}")));
        }
        Ok(x)
    }

    /// A non-negative real.
    pub(crate) fn non_negative(&mut self, key: &str) -> Result<f64> {
        let value = self.require(key)?;
        non_negative(key, &value)
    }

    pub(crate) fn opt_non_negative(&mut self, key: &str) -> Result<Option<f64>> {
        self.record
            .remove(key)
            .map(|v| non_negative(key, &v))
            .transpose()
    }

    pub(crate) fn opt_bool(&mut self, key: &str) -> Result<Option<bool>> {
        match self.record.remove(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(SpecError::schema(
                key,
                format!("expected a boolean, got {}", kind(&other)),
            )),
        }
    }

    pub(crate) fn kwargs(&mut self, key: &str) -> Result<Kwargs> {
        let value = self.require(key)?;
        Kwargs::from_json(key, &value)
    }

    pub(crate) fn opt_dims(&mut self, key: &str) -> Result<Option<Vec<NonZeroUsize>>> {
        let Some(value) = self.record.remove(key) else {
            return Ok(None);
        };

        let Value::Array(items) = value else {
            return Err(SpecError::schema(
                key,
                format!("expected an array, got {}", kind(&value)),
            ));
        };

        if items.is_empty() {
            return Err(SpecError::schema(key, "must not be empty"));
        }

        items
            .iter()
            .enumerate()
            .map(|(i, item)| positive(&format!("{key}[{i}]"), item))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// The keys nobody asked for.
    pub(crate) fn into_rest(self) -> Map<String, Value> {
        self.record
    }
}

fn string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) if s.is_empty() => Err(SpecError::schema(key, "must not be empty")),
        Value::String(s) => Ok(s),
        other => Err(SpecError::schema(
            key,
            format!("expected a string, got {}", kind(&other)),
        )),
    }
}

fn positive(key: &str, value: &Value) -> Result<NonZeroUsize> {
    let Value::Number(n) = value else {
        return Err(SpecError::schema(
            key,
            format!("expected a positive integer, got {}", kind(value)),
        ));
    };

    if let Some(u) = n.as_u64() {
        let u = usize::try_from(u)
            .map_err(|_| SpecError::schema(key, format!("{u} is out of range")))?;
        return NonZeroUsize::new(u)
            .ok_or_else(|| SpecError::schema(key, "must be strictly positive, got 0"));
    }

    if n.is_i64() {
        Err(SpecError::schema(
            key,
            format!("must be strictly positive, got {n}"),
        ))
    } else {
        Err(SpecError::schema(
            key,
            format!("expected an integer, got {n}"),
        ))
    }
}

fn real(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .filter(|x| x.is_finite())
        .ok_or_else(|| SpecError::schema(key, format!("expected a number, got {}", kind(value))))
}

fn non_negative(key: &str, value: &Value) -> Result<f64> {
    let x = real(key, value)?;
    if x < 0.0 {
        return Err(SpecError::schema(
            key,
            format!("must be non-negative, got {x}"),
        ));
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Fields {
        let Value::Object(record) = value else {
            panic!("test record must be an object");
        };
        Fields::new(record)
    }

    #[test]
    fn positive_rejects_zero_negative_and_float() {
        let mut f = fields(json!({"a": 0, "b": -3, "c": 2.5, "d": "2"}));

        for key in ["a", "b", "c", "d"] {
            let err = f.positive(key).unwrap_err();
            assert_eq!(err.field(), Some(key));
        }
    }

    #[test]
    fn missing_field_is_schema_error() {
        let err = fields(json!({})).positive("epochs").unwrap_err();
        assert!(err.is_schema());
        assert_eq!(err.field(), Some("epochs"));
    }

    #[test]
    fn non_negative_accepts_integers_and_zero() {
        let mut f = fields(json!({"a": 1, "b": 0.0, "c": -0.5}));

        assert_eq!(f.non_negative("a").unwrap(), 1.0);
        assert_eq!(f.non_negative("b").unwrap(), 0.0);
        assert!(f.non_negative("c").is_err());
    }

    #[test]
    fn empty_string_is_rejected() {
        let err = fields(json!({"name": ""})).string("name").unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn dims_name_offending_index() {
        let err = fields(json!({"image_dims": [28, 0, 1]}))
            .opt_dims("image_dims")
            .unwrap_err();
        assert_eq!(err.field(), Some("image_dims[1]"));
    }

    #[test]
    fn rest_keeps_unread_keys() {
        let mut f = fields(json!({"epochs": 3, "comment": "keep me"}));
        f.positive("epochs").unwrap();

        let rest = f.into_rest();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest["comment"], json!("keep me"));
    }
}
