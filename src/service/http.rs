//! Blocking HTTP client for the metadata service REST gateway

use tracing::debug;

use super::{CreateArtifactResponse, MetadataArtifact, MetadataService, ServiceConfig};
use crate::{Error, Result};

/// HTTP implementation of [`MetadataService`].
///
/// One request per call; timeouts are reqwest's defaults and nothing is
/// retried.
pub struct HttpMetadataService {
    config: ServiceConfig,
    client: reqwest::blocking::Client,
}

impl HttpMetadataService {
    /// Create a client bound to a backend URL prefix.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the HTTP client cannot be built.
    pub fn new(backend_url_prefix: &str) -> Result<Self> {
        Self::with_config(ServiceConfig::new(backend_url_prefix))
    }

    /// Create a client from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the HTTP client cannot be built.
    pub fn with_config(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent_header())
            .build()?;
        Ok(Self { config, client })
    }

    /// Settings this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl MetadataService for HttpMetadataService {
    fn create_artifact(
        &self,
        parent: &str,
        body: &MetadataArtifact,
    ) -> Result<CreateArtifactResponse> {
        let url = self.config.create_artifact_url(parent);
        debug!(%url, uri = %body.uri, "creating artifact");

        let response = self.client.post(&url).json(body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|e| {
                debug!(error = %e, "failed to read error response body");
                format!("<unreadable body: {e}>")
            });
            return Err(Error::Service {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        serde_json::from_str(&text)
            .map_err(|e| Error::MalformedResponse(format!("{e}: {text}")))
    }
}

impl std::fmt::Debug for HttpMetadataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetadataService")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}
