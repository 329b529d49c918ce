//! Error types for the editing rig
//!
//! Selection and gizmo operations never fail; only preferences I/O and scene
//! lookups surface errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for rig operations
pub type Result<T> = std::result::Result<T, RigError>;

/// Errors that can occur while setting up the rig
#[derive(Debug, Error)]
pub enum RigError {
    /// Failed to read or write a preferences file
    #[error("Failed to access preferences '{path}': {source}")]
    PreferencesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Preferences file is not valid TOML for this schema
    #[error("Failed to parse preferences '{path}': {source}")]
    PreferencesParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Preferences could not be serialized
    #[error("Failed to serialize preferences: {0}")]
    PreferencesSerialize(#[from] toml::ser::Error),

    /// No platform configuration directory is available
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    /// Scene graph error
    #[error(transparent)]
    Scene(#[from] rig_scene::SceneError),
}
