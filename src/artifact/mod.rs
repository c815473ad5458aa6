//! Artifacts logged by a run
//!
//! Each variant maps its typed fields onto string-valued wire properties and
//! adds `__ALL_META__`, a JSON snapshot of the whole instance:
//!
//! ```text
//! DataSet  -> name, create_time, description, query, version, owner
//! Model    -> name, create_time, description, model_type, version, owner
//! Metrics  -> name, create_time, description, metrics_type, data_set_id,
//!             model_id, owner
//! ```
//!
//! `uri` travels as the body's top-level uri. Model `training_framework` /
//! `hyperparameters` and Metrics `values` are only recoverable from
//! `__ALL_META__`.
//!
//! ## Usage
//!
//! ```rust
//! use kfmd::artifact::{Artifact, Model};
//!
//! let model = Model::builder("m1", "gs://bucket/model")
//!     .model_type("tf")
//!     .hyperparameter("learning_rate", 0.5)
//!     .build();
//!
//! let body = model.serialization().unwrap();
//! assert_eq!(body.uri, "gs://bucket/model");
//! assert_eq!(body.string_property("model_type"), Some("tf"));
//! assert!(body.string_property("hyperparameters").is_none());
//! ```

mod data_set;
mod metrics;
mod model;

pub use data_set::{DataSet, DataSetBuilder};
pub use metrics::{Metrics, MetricsBuilder, MetricsType};
pub use model::{Model, ModelBuilder};

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::service::{MetadataValue, PropertyMap};
use crate::Result;

/// Property holding the JSON snapshot of the whole artifact.
pub const ALL_META_PROPERTY: &str = "__ALL_META__";

/// Extension fields kept alongside an artifact's declared fields.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// An artifact that can be logged through `Run::log`.
pub trait Artifact: Serialize + DeserializeOwned {
    /// Artifact type path, `artifact_types/<namespace>/<name>`.
    const ARTIFACT_TYPE_NAME: &'static str;

    /// Build the wire body for the create-artifact call.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the `__ALL_META__` snapshot cannot be
    /// encoded.
    fn serialization(&self) -> Result<crate::service::MetadataArtifact>;

    /// Service-assigned id, `None` until logged.
    fn id(&self) -> Option<&str>;

    /// Record the service-assigned id.
    fn set_id(&mut self, id: String);

    /// JSON snapshot of every field, as stored under `__ALL_META__`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if a field cannot be encoded.
    fn all_meta(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild an artifact from an `__ALL_META__` snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Serialization` if the snapshot is not a valid encoding
    /// of this artifact type.
    fn from_all_meta(snapshot: &str) -> Result<Self> {
        Ok(serde_json::from_str(snapshot)?)
    }
}

/// Accumulates string-valued wire properties.
#[derive(Debug, Default)]
pub(crate) struct Properties(PropertyMap);

impl Properties {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), MetadataValue::string(value));
        self
    }

    /// Unset fields are left out of the property map.
    pub(crate) fn optional(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.string(key, value),
            None => self,
        }
    }

    pub(crate) fn finish<A: Artifact>(self, artifact: &A) -> Result<PropertyMap> {
        Ok(self.string(ALL_META_PROPERTY, artifact.all_meta()?).0)
    }
}

/// Custom properties are sent only when the caller set some.
pub(crate) fn custom_properties(custom: &PropertyMap) -> Option<PropertyMap> {
    (!custom.is_empty()).then(|| custom.clone())
}

/// Insert an extension field unless it shadows a declared field.
pub(crate) fn insert_extra(
    extra: &mut ExtraFields,
    declared: &[&str],
    key: String,
    value: serde_json::Value,
) {
    if declared.contains(&key.as_str()) {
        warn!(%key, "extension property collides with a declared field, dropping it");
        return;
    }
    extra.insert(key, value);
}
