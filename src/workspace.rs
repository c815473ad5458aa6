//! Workspace - named grouping of runs bound to one metadata backend

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::service::{HttpMetadataService, MetadataService};
use crate::Result;

/// A workspace groups runs of pipelines or notebooks and the artifacts they
/// log, and owns the client of the metadata backend they log to.
///
/// Fields are not validated.
pub struct Workspace {
    backend_url_prefix: String,
    name: String,
    description: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    service: Arc<dyn MetadataService>,
}

impl Workspace {
    /// Create a workspace logging over HTTP to `backend_url_prefix`
    /// (e.g. `127.0.0.1:8080`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the HTTP client cannot be built.
    pub fn new(backend_url_prefix: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        WorkspaceBuilder::new(backend_url_prefix, name).build()
    }

    /// Create a builder for a workspace with optional fields.
    #[must_use]
    pub fn builder(
        backend_url_prefix: impl Into<String>,
        name: impl Into<String>,
    ) -> WorkspaceBuilder {
        WorkspaceBuilder::new(backend_url_prefix, name)
    }

    /// Get the backend URL prefix.
    #[must_use]
    pub fn backend_url_prefix(&self) -> &str {
        &self.backend_url_prefix
    }

    /// Get the workspace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the labels.
    #[must_use]
    pub const fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.labels.as_ref()
    }

    /// Get the metadata service client.
    #[must_use]
    pub fn service(&self) -> &dyn MetadataService {
        self.service.as_ref()
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("backend_url_prefix", &self.backend_url_prefix)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Builder for `Workspace`.
pub struct WorkspaceBuilder {
    backend_url_prefix: String,
    name: String,
    description: Option<String>,
    labels: Option<BTreeMap<String, String>>,
    service: Option<Arc<dyn MetadataService>>,
}

impl WorkspaceBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(backend_url_prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            backend_url_prefix: backend_url_prefix.into(),
            name: name.into(),
            description: None,
            labels: None,
            service: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace all labels.
    #[must_use]
    pub fn labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Add one label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Use an explicit service client instead of HTTP to the backend prefix.
    #[must_use]
    pub fn service(mut self, service: Arc<dyn MetadataService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Build the `Workspace`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if no service was given and the HTTP
    /// client cannot be built.
    pub fn build(self) -> Result<Workspace> {
        let service: Arc<dyn MetadataService> = match self.service {
            Some(service) => service,
            None => Arc::new(HttpMetadataService::new(&self.backend_url_prefix)?),
        };
        Ok(Workspace {
            backend_url_prefix: self.backend_url_prefix,
            name: self.name,
            description: self.description,
            labels: self.labels,
            service,
        })
    }
}
