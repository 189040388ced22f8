//! Durable storage for the archive snapshot and the signed-in identity.
//!
//! Two keyed JSON files under one base directory, each read once at process
//! start and overwritten wholesale on every relevant mutation. No partial or
//! delta writes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DossierError, Result};
use crate::identity::Identity;
use crate::persona::PersonaRecord;

const ARCHIVE_FILE: &str = "archive.json";
const IDENTITY_FILE: &str = "identity.json";

/// Manages persistence of the persona archive and identity session.
///
/// ```text
/// base_dir/
/// ├── archive.json    (ordered sequence of full PersonaRecord)
/// └── identity.json   ({username, joinedAt})
/// ```
pub struct ProfileStorage {
    base_dir: PathBuf,
}

impl ProfileStorage {
    /// Creates storage rooted at the given directory, creating it if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)
            .map_err(|e| DossierError::io(format!("failed to create {:?}: {}", base_dir, e)))?;
        Ok(Self { base_dir })
    }

    /// Creates storage at the default location (`~/.dossier`).
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| DossierError::io("failed to get home directory"))?;
        Self::new(home_dir.join(".dossier"))
    }

    /// Loads the archive snapshot.
    ///
    /// A missing file yields an empty archive. An unparseable file is logged
    /// and also yields an empty archive; a corrupt snapshot must never be
    /// fatal to the process.
    pub fn load_archive(&self) -> Vec<PersonaRecord> {
        let path = self.base_dir.join(ARCHIVE_FILE);
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("archive snapshot at {:?} is unparseable, starting empty: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read archive snapshot at {:?}, starting empty: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Overwrites the archive snapshot with the full record sequence.
    pub fn save_archive(&self, records: &[PersonaRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let path = self.base_dir.join(ARCHIVE_FILE);
        fs::write(&path, json)
            .map_err(|e| DossierError::io(format!("failed to write {:?}: {}", path, e)))?;
        Ok(())
    }

    /// Loads the persisted identity session, if one exists and parses.
    pub fn load_identity(&self) -> Option<Identity> {
        let path = self.base_dir.join(IDENTITY_FILE);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    tracing::warn!("identity at {:?} is unparseable, treating as signed out: {}", path, e);
                    None
                }
            },
            Err(e) => {
                tracing::warn!("failed to read identity at {:?}, treating as signed out: {}", path, e);
                None
            }
        }
    }

    /// Persists the identity session.
    pub fn save_identity(&self, identity: &Identity) -> Result<()> {
        let json = serde_json::to_string_pretty(identity)?;
        let path = self.base_dir.join(IDENTITY_FILE);
        fs::write(&path, json)
            .map_err(|e| DossierError::io(format!("failed to write {:?}: {}", path, e)))?;
        Ok(())
    }

    /// Removes the persisted identity session on sign-out.
    pub fn clear_identity(&self) -> Result<()> {
        let path = self.base_dir.join(IDENTITY_FILE);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
