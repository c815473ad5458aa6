//! Metadata service client
//!
//! `MetadataService` is the seam between artifact logging and the backend:
//! - [`HttpMetadataService`] talks to the REST gateway over blocking HTTP
//! - [`MemoryMetadataService`] keeps artifacts in process, for offline use
//!   and tests
//!
//! # Example
//!
//! ```rust
//! use kfmd::service::{MemoryMetadataService, MetadataArtifact, MetadataService, PropertyMap};
//!
//! let service = MemoryMetadataService::new();
//! let body = MetadataArtifact::new("gs://bucket/data", PropertyMap::new());
//! let response = service
//!     .create_artifact("artifact_types/kubeflow.org/alpha/data_set", &body)
//!     .unwrap();
//! assert_eq!(response.artifact_id().unwrap(), "1");
//! ```

mod http;
mod memory;
pub mod wire;

pub use http::HttpMetadataService;
pub use memory::MemoryMetadataService;
pub use wire::{CreateArtifactResponse, MetadataArtifact, MetadataValue, PropertyMap};

use crate::Result;

/// REST gateway path prefix for the v1alpha1 metadata API.
pub const API_PREFIX: &str = "/api/v1alpha1";

/// Remote metadata service operations used by artifact logging.
///
/// Implementations must be shareable across threads; a `Workspace` hands the
/// same service to every run bound to it.
pub trait MetadataService: Send + Sync {
    /// Create an artifact under the artifact type path `parent`
    /// (`artifact_types/<namespace>/<name>`).
    ///
    /// # Errors
    ///
    /// Returns transport or service errors from the backend.
    fn create_artifact(&self, parent: &str, body: &MetadataArtifact)
        -> Result<CreateArtifactResponse>;
}

/// Connection settings for [`HttpMetadataService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: String,
    user_agent: String,
}

impl ServiceConfig {
    /// Build settings from a backend URL prefix such as `127.0.0.1:8080` or
    /// `https://metadata.example.com/`.
    ///
    /// A prefix without a scheme is treated as plain `http`; trailing slashes
    /// are dropped.
    #[must_use]
    pub fn new(backend_url_prefix: &str) -> Self {
        let trimmed = backend_url_prefix.trim().trim_end_matches('/');
        let base_url = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
        Self {
            base_url,
            user_agent: concat!("kfmd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Override the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Normalized base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent_header(&self) -> &str {
        &self.user_agent
    }

    /// Endpoint of the create-artifact call for an artifact type path.
    #[must_use]
    pub fn create_artifact_url(&self, parent: &str) -> String {
        format!(
            "{}{API_PREFIX}/{}/artifacts",
            self.base_url,
            parent.trim_matches('/')
        )
    }
}
