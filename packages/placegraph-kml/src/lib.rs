//! placegraph-kml - KML ingestion for placegraph
//!
//! quick-xml based parsing of Google Earth place documents into the
//! placegraph-core tree: a generic element-tree pass (`xml`) followed by the
//! KML semantic walk (`parser`) with its folder-collapsing heuristics and
//! identity assignment.
//!
//! ```rust,ignore
//! use placegraph_core::PlaceStore;
//! use placegraph_kml::KmlParser;
//!
//! let store = PlaceStore::new();
//! store.ingest(&KmlParser::new(), &bytes)?;
//! ```

pub mod parser;
pub mod xml;

pub use parser::KmlParser;
pub use xml::XmlElement;
