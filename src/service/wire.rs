//! Wire types for the metadata service REST gateway
//!
//! The gateway encodes 64-bit integers (artifact ids, `int_value`) as JSON
//! strings, so both strings and numbers are accepted when decoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Property name to tagged value.
pub type PropertyMap = BTreeMap<String, MetadataValue>;

/// Tagged value stored under an artifact property.
///
/// Serializes as a single-key object, e.g. `{"string_value": "tf"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataValue {
    /// UTF-8 string value
    StringValue(String),
    /// 64-bit integer value
    #[serde(deserialize_with = "int64_repr")]
    IntValue(i64),
    /// Double precision value
    DoubleValue(f64),
}

impl MetadataValue {
    /// Create a string value.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    /// Get the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::StringValue(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::StringValue(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::IntValue(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::DoubleValue(value)
    }
}

/// Artifact body sent to and returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataArtifact {
    /// Service-assigned identifier (absent on create requests)
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_repr")]
    pub id: Option<String>,
    /// Service-assigned artifact type identifier
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_repr")]
    pub type_id: Option<String>,
    /// Location of the artifact's content
    #[serde(default)]
    pub uri: String,
    /// Properties declared by the artifact type
    #[serde(default)]
    pub properties: PropertyMap,
    /// Free-form properties outside the artifact type's schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<PropertyMap>,
}

impl MetadataArtifact {
    /// Create a body with the given uri and properties.
    #[must_use]
    pub fn new(uri: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            uri: uri.into(),
            properties,
            ..Self::default()
        }
    }

    /// Look up a string-valued property.
    #[must_use]
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(MetadataValue::as_str)
    }
}

/// Response of the create-artifact call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateArtifactResponse {
    /// The stored artifact, including its assigned id
    #[serde(default)]
    pub artifact: Option<MetadataArtifact>,
}

impl CreateArtifactResponse {
    /// Wrap a stored artifact.
    #[must_use]
    pub const fn new(artifact: MetadataArtifact) -> Self {
        Self {
            artifact: Some(artifact),
        }
    }

    /// Identifier the service assigned to the created artifact.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedResponse` if the response carries no artifact
    /// or the artifact has no id.
    pub fn artifact_id(&self) -> Result<&str> {
        self.artifact
            .as_ref()
            .and_then(|a| a.id.as_deref())
            .ok_or_else(|| Error::MalformedResponse("response has no artifact id".to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Number(i64),
    Text(String),
}

fn int64_repr<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    match Int64Repr::deserialize(deserializer)? {
        Int64Repr::Number(n) => Ok(n),
        Int64Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn opt_id_repr<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<Int64Repr>::deserialize(deserializer)?.map(|repr| match repr {
        Int64Repr::Number(n) => n.to_string(),
        Int64Repr::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_wire_shape() {
        let json = serde_json::to_value(MetadataValue::string("tf")).unwrap();
        assert_eq!(json, serde_json::json!({"string_value": "tf"}));

        let json = serde_json::to_value(MetadataValue::DoubleValue(0.5)).unwrap();
        assert_eq!(json, serde_json::json!({"double_value": 0.5}));
    }

    #[test]
    fn test_int_value_accepts_string_encoding() {
        let value: MetadataValue = serde_json::from_str(r#"{"int_value": "42"}"#).unwrap();
        assert_eq!(value, MetadataValue::IntValue(42));
        let value: MetadataValue = serde_json::from_str(r#"{"int_value": 7}"#).unwrap();
        assert_eq!(value, MetadataValue::IntValue(7));
    }

    #[test]
    fn test_create_request_omits_unset_fields() {
        let body = MetadataArtifact::new("gs://bucket/data", PropertyMap::new());
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("custom_properties").is_none());
        assert_eq!(json["uri"], "gs://bucket/data");
    }

    #[test]
    fn test_response_numeric_id() {
        let response: CreateArtifactResponse =
            serde_json::from_str(r#"{"artifact": {"id": 12, "uri": "u"}}"#).unwrap();
        assert_eq!(response.artifact_id().unwrap(), "12");
    }

    #[test]
    fn test_response_without_artifact() {
        let response: CreateArtifactResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            response.artifact_id(),
            Err(Error::MalformedResponse(_))
        ));
    }
}
