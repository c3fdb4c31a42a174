//! Folder records

use serde::{Deserialize, Serialize};

use crate::domain::PlaceId;

/// Identity of a folder, assigned in document order during one parse pass.
/// Independent of the place identity space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FolderId(pub u32);

/// A node in the place hierarchy.
///
/// The folder graph is a tree: each folder has at most one parent and exactly
/// one folder is parentless (the root) after a successful ingestion. Child id
/// sequences preserve source-document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    /// `None` marks the root folder.
    pub parent: Option<FolderId>,
    pub subfolders: Vec<FolderId>,
    pub places: Vec<PlaceId>,
}

impl Folder {
    pub fn new(id: FolderId, name: impl Into<String>, parent: Option<FolderId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            subfolders: Vec::new(),
            places: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
