//! Seeding a [`MemoryStore`] from a JSON fixtures file.
//!
//! The file is versioned so that a layout change is rejected instead of
//! silently misread:
//!
//! ```json
//! {
//!   "version": 1,
//!   "workspaces": [{ "id": "…", "name": "Team", "owner": "…", "members": [] }],
//!   "collections": [{ "id": "…", "workspace_id": "…", "name": "Smoke" }],
//!   "requests": [],
//!   "webhooks": []
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{MemoryStore, StoreError};
use crate::model::{CollectionId, RequestSpec, UserId, WebhookEndpoint, WorkspaceId};

/// Layout version this build reads and writes.
pub const FIXTURE_FILE_VERSION: u32 = 1;

/// Errors that can occur when loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Failed to read the fixtures file.
    #[error("Failed to read fixtures file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid fixtures JSON.
    #[error("Failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file was written for a different layout version.
    #[error("Unsupported fixtures version {found} (expected {FIXTURE_FILE_VERSION})")]
    UnsupportedVersion { found: u32 },

    /// A document was rejected by the store.
    #[error("Failed to seed store: {0}")]
    Store(#[from] StoreError),
}

/// A team space whose owner and members may use its collections and webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub owner: UserId,
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl Workspace {
    /// Returns `true` for the owner and for listed members.
    #[must_use]
    pub fn has_member(&self, user: UserId) -> bool {
        self.owner == user || self.members.contains(&user)
    }
}

/// A group of stored requests inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub name: String,
}

/// Root of a fixtures file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureFile {
    pub version: u32,
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
    #[serde(default)]
    pub webhooks: Vec<WebhookEndpoint>,
}

impl FixtureFile {
    /// Parses and version-checks fixtures JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the version is not
    /// [`FIXTURE_FILE_VERSION`].
    pub fn parse(content: &str) -> Result<Self, FixtureError> {
        let file: Self = serde_json::from_str(content)?;
        if file.version != FIXTURE_FILE_VERSION {
            return Err(FixtureError::UnsupportedVersion {
                found: file.version,
            });
        }
        Ok(file)
    }

    /// Inserts every document into `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint's token or id is already taken.
    pub fn apply(self, store: &MemoryStore) -> Result<(), FixtureError> {
        for workspace in self.workspaces {
            store.insert_workspace(workspace);
        }
        for collection in self.collections {
            store.insert_collection(collection);
        }
        for request in self.requests {
            store.insert_request(request);
        }
        for webhook in self.webhooks {
            store.insert_endpoint(webhook)?;
        }
        Ok(())
    }
}

/// Reads fixtures from `path` into `store`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or applied.
pub fn load_fixtures(path: &Path, store: &MemoryStore) -> Result<(), FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let file = FixtureFile::parse(&content)?;

    tracing::info!(
        path = %path.display(),
        workspaces = file.workspaces.len(),
        collections = file.collections.len(),
        requests = file.requests.len(),
        webhooks = file.webhooks.len(),
        "Loaded fixtures"
    );

    file.apply(store)
}
