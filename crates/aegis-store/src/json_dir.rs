//! JSON-directory backend
//!
//! Layout under the storage directory:
//!
//! ```text
//! <root>/roles/{role_id}.json             custom roles only
//! <root>/assignments/{assignment_id}.json all assignments, revoked included
//! ```
//!
//! Every save rewrites the one file for the mutated record. Loads walk the
//! directory and skip (with a warning) any file that fails to read or parse,
//! so a single corrupt record never blocks startup.

use crate::{GrantStore, StoreError};
use aegis_model::{Role, RoleAssignment};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Filesystem [`GrantStore`] writing one JSON file per record
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    roles_dir: PathBuf,
    assignments_dir: PathBuf,
}

impl JsonDirStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let roles_dir = root.join("roles");
        let assignments_dir = root.join("assignments");
        fs::create_dir_all(&roles_dir).map_err(|e| StoreError::io(&roles_dir, e))?;
        fs::create_dir_all(&assignments_dir).map_err(|e| StoreError::io(&assignments_dir, e))?;
        info!(root = %root.display(), "grant store opened");
        Ok(Self {
            roles_dir,
            assignments_dir,
        })
    }

    fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(path, bytes).map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), "record written");
        Ok(())
    }

    fn load_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, StoreError> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(error) => {
                    warn!(path = %path.display(), %error, "unreadable record skipped");
                    continue;
                }
            };
            match serde_json::from_slice(&bytes) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(path = %path.display(), %error, "corrupt record skipped");
                }
            }
        }
        Ok(records)
    }
}

impl GrantStore for JsonDirStore {
    fn save_role(&self, role: &Role) -> Result<(), StoreError> {
        let path = self.roles_dir.join(format!("{}.json", role.id));
        Self::write_json(&path, role)
    }

    fn delete_role(&self, role_id: &str) -> Result<bool, StoreError> {
        let path = self.roles_dir.join(format!("{role_id}.json"));
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    fn load_roles(&self) -> Result<Vec<Role>, StoreError> {
        Self::load_dir(&self.roles_dir)
    }

    fn save_assignment(&self, assignment: &RoleAssignment) -> Result<(), StoreError> {
        let path = self
            .assignments_dir
            .join(format!("{}.json", assignment.id));
        Self::write_json(&path, assignment)
    }

    fn load_assignments(&self) -> Result<Vec<RoleAssignment>, StoreError> {
        Self::load_dir(&self.assignments_dir)
    }
}
