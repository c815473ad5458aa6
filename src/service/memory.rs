//! In-process metadata service

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CreateArtifactResponse, MetadataArtifact, MetadataService};
use crate::Result;

/// In-memory implementation of [`MetadataService`].
///
/// Artifacts are grouped by artifact type path and receive sequential ids
/// starting at 1, shared across all types.
#[derive(Debug, Default)]
pub struct MemoryMetadataService {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    artifacts: HashMap<String, Vec<MetadataArtifact>>,
}

impl MemoryMetadataService {
    /// Create an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored artifacts of one type path, in creation order.
    #[must_use]
    pub fn artifacts(&self, parent: &str) -> Vec<MetadataArtifact> {
        self.lock().artifacts.get(parent).cloned().unwrap_or_default()
    }

    /// Total number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().artifacts.values().map(Vec::len).sum()
    }

    /// Check if no artifact has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl MetadataService for MemoryMetadataService {
    fn create_artifact(
        &self,
        parent: &str,
        body: &MetadataArtifact,
    ) -> Result<CreateArtifactResponse> {
        let mut state = self.lock();
        state.next_id += 1;

        let mut stored = body.clone();
        stored.id = Some(state.next_id.to_string());
        state
            .artifacts
            .entry(parent.to_string())
            .or_default()
            .push(stored.clone());

        Ok(CreateArtifactResponse::new(stored))
    }
}
