//! Model - trained machine learning model

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{custom_properties, insert_extra, Artifact, ExtraFields, Properties};
use crate::service::{MetadataArtifact, MetadataValue, PropertyMap};
use crate::time::{format_rfc3339, now_micros};
use crate::Result;

const DECLARED_FIELDS: &[&str] = &[
    "workspace",
    "name",
    "description",
    "owner",
    "uri",
    "version",
    "model_type",
    "training_framework",
    "hyperparameters",
    "labels",
    "id",
    "create_time",
    "custom_properties",
];

/// A machine learning model.
///
/// `training_framework` and `hyperparameters` are not mapped to wire
/// properties; they are only carried by the `__ALL_META__` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    workspace: Option<String>,
    name: String,
    description: Option<String>,
    owner: Option<String>,
    uri: String,
    version: Option<String>,
    model_type: Option<String>,
    training_framework: Option<serde_json::Value>,
    hyperparameters: Option<BTreeMap<String, serde_json::Value>>,
    labels: Option<BTreeMap<String, String>>,
    id: Option<String>,
    #[serde(with = "crate::time::rfc3339_micros")]
    create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    custom_properties: PropertyMap,
    #[serde(flatten)]
    extra: ExtraFields,
}

impl Model {
    /// Create a model with its required fields, stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        ModelBuilder::new(name, uri).build()
    }

    /// Create a builder for a model with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, uri: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name, uri)
    }

    /// Get the workspace name.
    #[must_use]
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    /// Get the model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the owner.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Get the uri of the model.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the model type (e.g. "neural network").
    #[must_use]
    pub fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    /// Get the framework used to train the model.
    #[must_use]
    pub const fn training_framework(&self) -> Option<&serde_json::Value> {
        self.training_framework.as_ref()
    }

    /// Get the hyperparameters.
    #[must_use]
    pub const fn hyperparameters(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.hyperparameters.as_ref()
    }

    /// Get the labels.
    #[must_use]
    pub const fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.labels.as_ref()
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    /// Get the caller-supplied custom properties.
    #[must_use]
    pub const fn custom_properties(&self) -> &PropertyMap {
        &self.custom_properties
    }

    /// Get the extension fields.
    #[must_use]
    pub const fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

impl Artifact for Model {
    const ARTIFACT_TYPE_NAME: &'static str = "artifact_types/kubeflow.org/alpha/model";

    fn serialization(&self) -> Result<MetadataArtifact> {
        let properties = Properties::new()
            .string("name", &self.name)
            .string("create_time", format_rfc3339(&self.create_time))
            .optional("description", self.description.as_deref())
            .optional("model_type", self.model_type.as_deref())
            .optional("version", self.version.as_deref())
            .optional("owner", self.owner.as_deref())
            .finish(self)?;

        let mut body = MetadataArtifact::new(&self.uri, properties);
        body.custom_properties = custom_properties(&self.custom_properties);
        Ok(body)
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

/// Builder for `Model`.
#[derive(Debug)]
pub struct ModelBuilder {
    inner: Model,
}

impl ModelBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            inner: Model {
                workspace: None,
                name: name.into(),
                description: None,
                owner: None,
                uri: uri.into(),
                version: None,
                model_type: None,
                training_framework: None,
                hyperparameters: None,
                labels: None,
                id: None,
                create_time: now_micros(),
                custom_properties: PropertyMap::new(),
                extra: ExtraFields::new(),
            },
        }
    }

    /// Set the workspace name.
    #[must_use]
    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.inner.workspace = Some(workspace.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = Some(description.into());
        self
    }

    /// Set the owner.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.inner.owner = Some(owner.into());
        self
    }

    /// Set the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.inner.version = Some(version.into());
        self
    }

    /// Set the model type.
    #[must_use]
    pub fn model_type(mut self, model_type: impl Into<String>) -> Self {
        self.inner.model_type = Some(model_type.into());
        self
    }

    /// Set the training framework, e.g. `{"name": "tensorflow", "version": "v1.0"}`.
    #[must_use]
    pub fn training_framework(mut self, framework: serde_json::Value) -> Self {
        self.inner.training_framework = Some(framework);
        self
    }

    /// Replace all hyperparameters.
    #[must_use]
    pub fn hyperparameters(mut self, hyperparameters: BTreeMap<String, serde_json::Value>) -> Self {
        self.inner.hyperparameters = Some(hyperparameters);
        self
    }

    /// Add one hyperparameter.
    #[must_use]
    pub fn hyperparameter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.inner
            .hyperparameters
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace all labels.
    #[must_use]
    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.inner.labels = Some(labels);
        self
    }

    /// Add one label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add a custom property sent alongside the declared properties.
    #[must_use]
    pub fn custom_property(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.inner.custom_properties.insert(key.into(), value.into());
        self
    }

    /// Add an extension field; it is kept in `__ALL_META__` only.
    #[must_use]
    pub fn property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        insert_extra(&mut self.inner.extra, DECLARED_FIELDS, key.into(), value.into());
        self
    }

    /// Set a custom creation timestamp.
    #[must_use]
    pub fn create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.inner.create_time = create_time.trunc_subsecs(6);
        self
    }

    /// Build the `Model`.
    #[must_use]
    pub fn build(self) -> Model {
        self.inner
    }
}
