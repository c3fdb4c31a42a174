//! Place records

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, FolderId, Rgb};

/// Identity of a place, assigned in document order during one parse pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PlaceId(pub u32);

/// A placemark from the ingested document.
///
/// Created only during ingestion. The color is the one field mutated
/// afterwards, through the store, by the color-editing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub details: String,
    pub coordinate: Coordinate,
    /// The owning folder; every place has exactly one.
    pub folder: FolderId,
    pub color: Option<Rgb>,
}

impl Place {
    pub fn new(
        id: PlaceId,
        name: impl Into<String>,
        details: impl Into<String>,
        coordinate: Coordinate,
        folder: FolderId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            details: details.into(),
            coordinate,
            folder,
            color: None,
        }
    }
}
