//! Error types for scene construction

use thiserror::Error;

use crate::scene::MemberId;

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors raised while building or editing a scene graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced member is not part of the scene
    #[error("Member {0} not found in scene")]
    MemberNotFound(MemberId),

    /// Reparenting would make a member its own ancestor
    #[error("Member {child} cannot be parented under its descendant {parent}")]
    CyclicParent { child: MemberId, parent: MemberId },
}
