//! Dynamic record type for cluster API objects.
//!
//! The cluster API returns schema-less JSON documents; this module
//! provides [`Record`], a validated wrapper that guarantees the value is
//! a JSON object, plus typed accessors that fail loudly on shape
//! mismatch instead of silently defaulting.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{DecodeError, Error, InvalidInputError};

/// One remote domain object (VM, disk, NIC, ISO, snapshot, ...) as a
/// dynamic key/value document.
///
/// The client assumes no fixed schema; keys and value types are
/// interpreted by callers through the typed accessors. Identity is the
/// opaque string under the `uuid` key.
///
/// # Example
///
/// ```
/// use hycore::Record;
/// use serde_json::json;
///
/// let record = Record::new(json!({
///     "uuid": "51e6d073-7566-4273-9196-58720117bd7f",
///     "name": "vm-1",
/// })).unwrap();
///
/// assert_eq!(record.uuid().unwrap(), "51e6d073-7566-4273-9196-58720117bd7f");
/// assert!(record.matches(Some(&json!({"name": "vm-1"}))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Record {
    /// Create a new `Record` from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn new(value: Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::InvalidInput(InvalidInputError::Record {
                reason: "record must be a JSON object".to_string(),
            }));
        }
        Ok(Self(value))
    }

    /// Returns the record's `uuid` field.
    ///
    /// # Errors
    ///
    /// Returns a decode error if the field is missing or not a string.
    pub fn uuid(&self) -> Result<&str, Error> {
        self.str_field("uuid")
    }

    /// Get a field from the record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string field, failing loudly if missing or mistyped.
    pub fn str_field(&self, key: &str) -> Result<&str, Error> {
        self.get(key)
            .ok_or_else(|| missing(key))?
            .as_str()
            .ok_or_else(|| mistyped(key, "a string"))
    }

    /// Returns a signed integer field, failing loudly if missing or mistyped.
    pub fn i64_field(&self, key: &str) -> Result<i64, Error> {
        self.get(key)
            .ok_or_else(|| missing(key))?
            .as_i64()
            .ok_or_else(|| mistyped(key, "an integer"))
    }

    /// Returns an unsigned integer field, failing loudly if missing or mistyped.
    pub fn u64_field(&self, key: &str) -> Result<u64, Error> {
        self.get(key)
            .ok_or_else(|| missing(key))?
            .as_u64()
            .ok_or_else(|| mistyped(key, "a non-negative integer"))
    }

    /// Returns a boolean field, failing loudly if missing or mistyped.
    pub fn bool_field(&self, key: &str) -> Result<bool, Error> {
        self.get(key)
            .ok_or_else(|| missing(key))?
            .as_bool()
            .ok_or_else(|| mistyped(key, "a boolean"))
    }

    /// Get a reference to the inner JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the inner JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether this record matches a query filter.
    ///
    /// `None` and empty filters match everything; see [`superset_match`]
    /// for the matching rule.
    pub fn matches(&self, filter: Option<&Value>) -> bool {
        match filter {
            None => true,
            Some(filter) => superset_match(&self.0, filter),
        }
    }
}

fn missing(key: &str) -> Error {
    Error::Decode(DecodeError::Field {
        field: key.to_string(),
        reason: "missing".to_string(),
    })
}

fn mistyped(key: &str, expected: &str) -> Error {
    Error::Decode(DecodeError::Field {
        field: key.to_string(),
        reason: format!("expected {expected}"),
    })
}

/// Superset-match rule for client-side record filtering.
///
/// A record matches a filter iff, for every key present in the filter,
/// the record has that key with an equal value; nested objects are
/// compared recursively with the same rule. A filter key absent from
/// the record is a non-match. A null or empty filter matches everything.
///
/// Filtering happens client-side because some filters apply to nested
/// structures the remote API cannot filter on.
pub fn superset_match(record: &Value, filter: &Value) -> bool {
    match filter {
        Value::Null => true,
        Value::Object(fields) => {
            let Some(obj) = record.as_object() else {
                return false;
            };
            fields.iter().all(|(key, want)| match obj.get(key) {
                Some(have) => {
                    if want.is_object() {
                        superset_match(have, want)
                    } else {
                        have == want
                    }
                }
                None => false,
            })
        }
        // Scalar filters degenerate to plain equality.
        _ => record == filter,
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::new(value).unwrap()
    }

    #[test]
    fn non_object_rejected() {
        assert!(Record::new(json!([1, 2, 3])).is_err());
        assert!(Record::new(json!(null)).is_err());
        assert!(Record::new(json!("string")).is_err());
    }

    #[test]
    fn typed_accessors_fail_loudly() {
        let r = record(json!({"name": "vm-1", "capacity": 3_000_000_000u64, "running": true}));

        assert_eq!(r.str_field("name").unwrap(), "vm-1");
        assert_eq!(r.u64_field("capacity").unwrap(), 3_000_000_000);
        assert!(r.bool_field("running").unwrap());

        assert!(r.str_field("capacity").is_err());
        assert!(r.i64_field("name").is_err());
        assert!(r.str_field("nope").is_err());
    }

    #[test]
    fn empty_and_nil_filters_match_everything() {
        let r = record(json!({"name": "a", "type": "X"}));
        assert!(r.matches(None));
        assert!(r.matches(Some(&json!({}))));
        assert!(r.matches(Some(&Value::Null)));
    }

    #[test]
    fn subset_of_fields_matches() {
        let r = record(json!({"name": "a", "type": "X"}));
        assert!(r.matches(Some(&json!({"name": "a"}))));
        assert!(r.matches(Some(&json!({"name": "a", "type": "X"}))));
    }

    #[test]
    fn differing_value_does_not_match() {
        let r = record(json!({"name": "a", "type": "X"}));
        assert!(!r.matches(Some(&json!({"name": "b"}))));
    }

    #[test]
    fn filter_key_absent_from_record_does_not_match() {
        let r = record(json!({"name": "a", "type": "X"}));
        assert!(!r.matches(Some(&json!({"name": "a", "missing": 1}))));
    }

    #[test]
    fn nested_objects_match_recursively() {
        let r = record(json!({
            "name": "a",
            "netDevice": {"vlan": 10, "connected": true}
        }));
        assert!(r.matches(Some(&json!({"netDevice": {"vlan": 10}}))));
        assert!(!r.matches(Some(&json!({"netDevice": {"vlan": 20}}))));
        assert!(!r.matches(Some(&json!({"netDevice": {"mac": "aa:bb"}}))));
    }

    #[test]
    fn nested_filter_against_scalar_field_does_not_match() {
        let r = record(json!({"name": "a"}));
        assert!(!r.matches(Some(&json!({"name": {"inner": 1}}))));
    }

    #[test]
    fn array_values_compare_by_equality() {
        let r = record(json!({"tags": ["a", "b"]}));
        assert!(r.matches(Some(&json!({"tags": ["a", "b"]}))));
        assert!(!r.matches(Some(&json!({"tags": ["a"]}))));
    }

    #[test]
    fn serialize_roundtrip() {
        let original = json!({"uuid": "u-1", "capacity": 42});
        let r = record(original.clone());
        let serialized = serde_json::to_value(&r).unwrap();
        assert_eq!(serialized, original);
    }
}
