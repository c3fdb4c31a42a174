//! Collaborator boundaries
//!
//! The core never reads files, renders, or tracks the device location
//! itself. Collaborators hand it document bytes through a `DocumentParser`
//! implementation and publish location fixes into a `SharedLocation`.

use parking_lot::RwLock;

use crate::domain::{Coordinate, PlaceTree};
use crate::error::Result;

/// Wire-format parser boundary.
///
/// Implementations turn raw document bytes into a `PlaceTree` with no side
/// effects, so a failed parse never disturbs an installed tree.
pub trait DocumentParser {
    fn parse(&self, bytes: &[u8]) -> Result<PlaceTree>;
}

/// Source of the device's current coordinate.
///
/// Permission prompts and start/stop of tracking belong to the collaborator
/// behind this trait; the core only ever reads the latest value.
pub trait LocationProvider {
    fn current_location(&self) -> Option<Coordinate>;
}

/// Latest-value cell for asynchronously published location updates.
///
/// The tracking collaborator calls [`SharedLocation::publish`] whenever a fix
/// arrives; queries read whatever was published last.
#[derive(Debug, Default)]
pub struct SharedLocation {
    current: RwLock<Option<Coordinate>>,
}

impl SharedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, coordinate: Coordinate) {
        *self.current.write() = Some(coordinate);
    }
}

impl LocationProvider for SharedLocation {
    fn current_location(&self) -> Option<Coordinate> {
        *self.current.read()
    }
}
