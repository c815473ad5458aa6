//! Run - execution of a pipeline or notebook within a workspace

use tracing::{debug, info};

use crate::artifact::Artifact;
use crate::service::{MetadataArtifact, MetadataValue};
use crate::workspace::Workspace;
use crate::{Error, Result};

/// A run of a pipeline or notebook in a workspace.
///
/// Artifacts logged through a run are tagged with the workspace and run
/// names as custom properties. They are not yet linked as inputs or outputs
/// of an execution.
#[derive(Debug, Clone)]
pub struct Run<'w> {
    workspace: &'w Workspace,
    name: String,
    description: Option<String>,
}

impl<'w> Run<'w> {
    /// Custom property holding the workspace name.
    pub const WORKSPACE_PROPERTY_NAME: &'static str = "__kf_workspace__";
    /// Custom property holding the run name.
    pub const RUN_PROPERTY_NAME: &'static str = "__kf_run__";

    /// Create a run in `workspace`.
    #[must_use]
    pub fn new(workspace: &'w Workspace, name: impl Into<String>) -> Self {
        Self {
            workspace,
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the workspace this run belongs to.
    #[must_use]
    pub const fn workspace(&self) -> &'w Workspace {
        self.workspace
    }

    /// Get the run name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Log an artifact to the workspace's metadata service and record the
    /// id the service assigned to it.
    ///
    /// # Errors
    ///
    /// - `Error::ReservedProperty` if the artifact's custom properties already
    ///   use [`Self::WORKSPACE_PROPERTY_NAME`] or [`Self::RUN_PROPERTY_NAME`];
    ///   nothing is sent in that case.
    /// - Transport or service errors from the create-artifact call. The
    ///   artifact's id stays unset.
    pub fn log<'a, A: Artifact>(&self, artifact: &'a mut A) -> Result<&'a mut A> {
        let mut body = artifact.serialization()?;
        self.tag(&mut body)?;

        debug!(
            parent = A::ARTIFACT_TYPE_NAME,
            uri = %body.uri,
            run = %self.name,
            "logging artifact"
        );
        let response = self
            .workspace
            .service()
            .create_artifact(A::ARTIFACT_TYPE_NAME, &body)?;

        let id = response.artifact_id()?.to_string();
        info!(parent = A::ARTIFACT_TYPE_NAME, %id, run = %self.name, "artifact logged");
        artifact.set_id(id);
        Ok(artifact)
    }

    fn tag(&self, body: &mut MetadataArtifact) -> Result<()> {
        let custom = body.custom_properties.get_or_insert_with(Default::default);
        for reserved in [Self::WORKSPACE_PROPERTY_NAME, Self::RUN_PROPERTY_NAME] {
            if custom.contains_key(reserved) {
                return Err(Error::ReservedProperty(reserved.to_string()));
            }
        }
        custom.insert(
            Self::WORKSPACE_PROPERTY_NAME.to_string(),
            MetadataValue::string(self.workspace.name()),
        );
        custom.insert(
            Self::RUN_PROPERTY_NAME.to_string(),
            MetadataValue::string(&self.name),
        );
        Ok(())
    }
}
