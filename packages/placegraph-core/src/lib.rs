//! placegraph-core - in-memory place hierarchy and its read APIs
//!
//! Holds the folder/place tree produced by document ingestion (see the
//! placegraph-kml package for the wire format) and serves the queries the
//! surrounding UI renders: by-folder listing, recursive flattening,
//! proximity search, text search, and the sorted display-list projection.
//!
//! # Design
//!
//! - `domain`: value types and the `PlaceTree` a parser builds
//! - `store`: the repository; build-then-swap installation, read queries,
//!   color assignment
//! - `api`: query mode to display rows
//! - `ports`: collaborator boundaries (document parser, location provider)
//!
//! No global state: store, location cell and parser are explicit instances.
//!
//! # Usage
//!
//! ```rust,ignore
//! use placegraph_core::{ListProjection, PlaceStore, SearchMode, SharedLocation};
//!
//! let store = PlaceStore::new();
//! store.ingest(&parser, &bytes)?; // parser: any DocumentParser impl
//!
//! let location = SharedLocation::new();
//! let mut list = ListProjection::new();
//! let mode = SearchMode::Folder(store.root_folder().map(|f| f.id));
//! list.refresh(&store, &mode, &location);
//! ```

pub mod api;
pub mod domain;
pub mod error;
pub mod ports;
pub mod store;

pub use api::{format_distance, project, ListItem, ListItemKind, ListProjection, SearchMode};
pub use domain::{Coordinate, Folder, FolderId, Place, PlaceId, PlaceTree, Rgb};
pub use error::{Error, ErrorKind, Result};
pub use ports::{DocumentParser, LocationProvider, SharedLocation};
pub use store::PlaceStore;
