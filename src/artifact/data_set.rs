//! Data Set - input or output data of a workflow step

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
    "query",
    "labels",
    "id",
    "create_time",
    "custom_properties",
];

/// A data set in a machine learning workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    workspace: Option<String>,
    name: String,
    description: Option<String>,
    owner: Option<String>,
    uri: String,
    version: Option<String>,
    query: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    id: Option<String>,
    #[serde(with = "crate::time::rfc3339_micros")]
    create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    custom_properties: PropertyMap,
    #[serde(flatten)]
    extra: ExtraFields,
}

impl DataSet {
    /// Create a data set with its required fields, stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        DataSetBuilder::new(name, uri).build()
    }

    /// Create a builder for a data set with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, uri: impl Into<String>) -> DataSetBuilder {
        DataSetBuilder::new(name, uri)
    }

    /// Get the workspace name.
    #[must_use]
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    /// Get the data set name.
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

    /// Get the uri of the data.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the user-tagged version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Get the query used to fetch this data set from its source.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
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

impl Artifact for DataSet {
    const ARTIFACT_TYPE_NAME: &'static str = "artifact_types/kubeflow.org/alpha/data_set";

    fn serialization(&self) -> Result<MetadataArtifact> {
        let properties = Properties::new()
            .string("name", &self.name)
            .string("create_time", format_rfc3339(&self.create_time))
            .optional("description", self.description.as_deref())
            .optional("query", self.query.as_deref())
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

/// Builder for `DataSet`.
#[derive(Debug)]
pub struct DataSetBuilder {
    inner: DataSet,
}

impl DataSetBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            inner: DataSet {
                workspace: None,
                name: name.into(),
                description: None,
                owner: None,
                uri: uri.into(),
                version: None,
                query: None,
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

    /// Set the query used to fetch the data.
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.inner.query = Some(query.into());
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

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub fn create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.inner.create_time = create_time.trunc_subsecs(6);
        self
    }

    /// Build the `DataSet`.
    #[must_use]
    pub fn build(self) -> DataSet {
        self.inner
    }
}
