//! Metrics - evaluation of a model on a data set

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{custom_properties, insert_extra, Artifact, ExtraFields, Properties};
use crate::service::{MetadataArtifact, MetadataValue, PropertyMap};
use crate::time::{format_rfc3339, now_micros};
use crate::{Error, Result};

const DECLARED_FIELDS: &[&str] = &[
    "workspace",
    "name",
    "description",
    "owner",
    "uri",
    "data_set_id",
    "model_id",
    "metrics_type",
    "values",
    "labels",
    "id",
    "create_time",
    "custom_properties",
];

/// Stage at which an evaluation was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsType {
    /// Measured on the training data.
    Training,
    /// Measured on held-out validation data.
    Validation,
    /// Measured on the test set.
    Testing,
    /// Measured on live traffic.
    Production,
}

impl MetricsType {
    /// Wire name of the metrics type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Validation => "validation",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for MetricsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "training" => Ok(Self::Training),
            "validation" => Ok(Self::Validation),
            "testing" => Ok(Self::Testing),
            "production" => Ok(Self::Production),
            other => Err(Error::InvalidMetricsType(other.to_string())),
        }
    }
}

/// Evaluation metrics of a model on a data set.
///
/// `values` is not mapped to a wire property; it is only carried by the
/// `__ALL_META__` snapshot. A value may be any JSON value (a score, a
/// confusion matrix, a per-class map). JSON has no non-finite numbers, so
/// use `MetricsBuilder::score` for floats that may be NaN or infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    workspace: Option<String>,
    name: String,
    description: Option<String>,
    owner: Option<String>,
    uri: String,
    data_set_id: Option<String>,
    model_id: Option<String>,
    metrics_type: Option<MetricsType>,
    values: Option<BTreeMap<String, serde_json::Value>>,
    labels: Option<BTreeMap<String, String>>,
    id: Option<String>,
    #[serde(with = "crate::time::rfc3339_micros")]
    create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "PropertyMap::is_empty")]
    custom_properties: PropertyMap,
    #[serde(flatten)]
    extra: ExtraFields,
}

impl Metrics {
    /// Create metrics with their required fields, stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        MetricsBuilder::new(name, uri).build()
    }

    /// Create a builder for metrics with optional fields.
    #[must_use]
    pub fn builder(name: impl Into<String>, uri: impl Into<String>) -> MetricsBuilder {
        MetricsBuilder::new(name, uri)
    }

    /// Workspace name.
    #[must_use]
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    /// Metrics name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Owner.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Uri of the metrics file.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the id of the evaluated data set.
    #[must_use]
    pub fn data_set_id(&self) -> Option<&str> {
        self.data_set_id.as_deref()
    }

    /// Get the id of the evaluated model.
    #[must_use]
    pub fn model_id(&self) -> Option<&str> {
        self.model_id.as_deref()
    }

    /// Get the evaluation stage.
    #[must_use]
    pub const fn metrics_type(&self) -> Option<MetricsType> {
        self.metrics_type
    }

    /// Get the metric values by metric name.
    #[must_use]
    pub const fn values(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.values.as_ref()
    }

    /// Labels.
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

impl Artifact for Metrics {
    const ARTIFACT_TYPE_NAME: &'static str = "artifact_types/kubeflow.org/alpha/metrics";

    fn serialization(&self) -> Result<MetadataArtifact> {
        let properties = Properties::new()
            .string("name", &self.name)
            .string("create_time", format_rfc3339(&self.create_time))
            .optional("description", self.description.as_deref())
            .optional("metrics_type", self.metrics_type.map(MetricsType::as_str))
            .optional("data_set_id", self.data_set_id.as_deref())
            .optional("model_id", self.model_id.as_deref())
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

/// Builder for `Metrics`.
#[derive(Debug)]
pub struct MetricsBuilder {
    inner: Metrics,
}

impl MetricsBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            inner: Metrics {
                workspace: None,
                name: name.into(),
                description: None,
                owner: None,
                uri: uri.into(),
                data_set_id: None,
                model_id: None,
                metrics_type: None,
                values: None,
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

    /// Set the id of the evaluated data set.
    #[must_use]
    pub fn data_set_id(mut self, data_set_id: impl Into<String>) -> Self {
        self.inner.data_set_id = Some(data_set_id.into());
        self
    }

    /// Set the id of the evaluated model.
    #[must_use]
    pub fn model_id(mut self, model_id: impl Into<String>) -> Self {
        self.inner.model_id = Some(model_id.into());
        self
    }

    /// Set the evaluation stage.
    #[must_use]
    pub const fn metrics_type(mut self, metrics_type: MetricsType) -> Self {
        self.inner.metrics_type = Some(metrics_type);
        self
    }

    /// Replace all metric values.
    #[must_use]
    pub fn values(mut self, values: BTreeMap<String, serde_json::Value>) -> Self {
        self.inner.values = Some(values);
        self
    }

    /// Add one metric value.
    ///
    /// A non-finite `f64` converts to JSON `null`; use [`Self::score`] to
    /// keep it.
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.inner
            .values
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Add one scalar score. NaN and infinities are stored as the strings
    /// `"NaN"`, `"Infinity"` and `"-Infinity"`.
    #[must_use]
    pub fn score(self, key: impl Into<String>, score: f64) -> Self {
        self.value(key, score_value(score))
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

    /// Build the `Metrics`.
    #[must_use]
    pub fn build(self) -> Metrics {
        self.inner
    }
}

fn score_value(score: f64) -> serde_json::Value {
    if score.is_nan() {
        serde_json::Value::from("NaN")
    } else if score.is_infinite() {
        serde_json::Value::from(if score > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        serde_json::Value::from(score)
    }
}
