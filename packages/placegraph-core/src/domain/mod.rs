//! Domain model for the place hierarchy
//!
//! - `Coordinate`: latitude/longitude pair with great-circle distance
//! - `Rgb`: packed display color
//! - `Place` / `Folder`: records produced by document ingestion
//! - `PlaceTree`: one fully parsed document, ready to install into a store

mod color;
mod folder;
mod geo;
mod place;
mod tree;

pub use color::Rgb;
pub use folder::{Folder, FolderId};
pub use geo::Coordinate;
pub use place::{Place, PlaceId};
pub use tree::PlaceTree;
