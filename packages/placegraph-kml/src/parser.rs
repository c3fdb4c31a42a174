//! KML document parsing
//!
//! Walks the generic element tree and builds the `PlaceTree` the store
//! serves. The interesting part is the root-folder heuristic: Google Earth
//! exports sometimes wrap everything in a single folder and sometimes drop
//! folders and placemarks directly under `Document`, and the two shapes must
//! collapse into one rooted hierarchy.

use std::path::Path;

use placegraph_core::domain::{Coordinate, Folder, FolderId, Place, PlaceId, PlaceTree};
use placegraph_core::error::{Error, Result};
use placegraph_core::ports::DocumentParser;
use tracing::debug;

use crate::xml::{parse_xml_tree, XmlElement};

const UNTITLED_FOLDER: &str = "Untitled Folder";
const UNTITLED_PLACE: &str = "Untitled Place";
const NO_DESCRIPTION: &str = "No Description";
const DEFAULT_DOCUMENT_NAME: &str = "My Places";
const KML_SUFFIX: &str = ".kml";

/// Parser for Google Earth KML place documents.
///
/// Stateless; one instance can serve any number of `parse` calls. Implements
/// the core's `DocumentParser` port so `PlaceStore::ingest` can drive it.
#[derive(Debug, Default)]
pub struct KmlParser;

impl KmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a document file.
    ///
    /// Convenience for collaborators that hold a picked file path; those that
    /// already hold bytes call `parse` directly.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PlaceTree> {
        let bytes = std::fs::read(path)?;
        self.parse(&bytes)
    }
}

impl DocumentParser for KmlParser {
    fn parse(&self, bytes: &[u8]) -> Result<PlaceTree> {
        let root = parse_xml_tree(bytes)?;
        if root.name != "kml" {
            return Err(Error::unrecognized_format("missing <kml> root element"));
        }
        let document = root
            .first_child("Document")
            .ok_or_else(|| Error::unrecognized_format("missing <Document> element"))?;

        let tree = build_tree(document);
        debug!(
            folders = tree.folder_count(),
            places = tree.place_count(),
            "parsed KML document"
        );
        Ok(tree)
    }
}

/// Decide the root-folder strategy and build the tree.
///
/// Loose placemarks or more than one top-level folder force a synthesized
/// root named after the document; a document wrapping exactly one folder
/// uses that folder as the root directly, with no synthetic wrapper.
fn build_tree(document: &XmlElement) -> PlaceTree {
    let folder_count = document.count_children("Folder");
    let placemark_count = document.count_children("Placemark");

    if placemark_count > 0 || folder_count > 1 {
        let mut builder = TreeBuilder::with_root(document_name(document));
        let root = builder.root_id();
        builder.parse_children(document, root);
        builder.finish()
    } else if let Some(folder) = document.first_child("Folder") {
        let name = folder.child_text("name").unwrap_or(UNTITLED_FOLDER);
        let mut builder = TreeBuilder::with_root(name.to_string());
        let root = builder.root_id();
        builder.parse_children(folder, root);
        builder.finish()
    } else {
        // Neither folders nor placemarks: an empty untitled root
        TreeBuilder::with_root(UNTITLED_FOLDER.to_string()).finish()
    }
}

/// Document title for a synthesized root, with any ".kml" suffix stripped.
fn document_name(document: &XmlElement) -> String {
    let mut name = document
        .child_text("name")
        .unwrap_or(DEFAULT_DOCUMENT_NAME)
        .to_string();
    if name.ends_with(KML_SUFFIX) {
        name.truncate(name.len() - KML_SUFFIX.len());
    }
    name
}

/// Allocates monotonically increasing identities in document order.
#[derive(Debug, Default)]
struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Accumulates the tree during the depth-first walk. Folder and place
/// identity spaces are independent.
struct TreeBuilder {
    tree: PlaceTree,
    folder_ids: IdAllocator,
    place_ids: IdAllocator,
}

impl TreeBuilder {
    fn with_root(name: String) -> Self {
        let mut folder_ids = IdAllocator::default();
        let root = Folder::new(FolderId(folder_ids.next_id()), name, None);
        Self {
            tree: PlaceTree::new(root),
            folder_ids,
            place_ids: IdAllocator::default(),
        }
    }

    fn root_id(&self) -> FolderId {
        self.tree.root_id()
    }

    /// Dispatch the children of a folder-like element into `parent`,
    /// preserving source order. Element kinds other than `Folder` and
    /// `Placemark` are ignored.
    fn parse_children(&mut self, element: &XmlElement, parent: FolderId) {
        for child in &element.children {
            match child.name.as_str() {
                "Folder" => self.parse_folder(child, parent),
                "Placemark" => self.parse_place(child, parent),
                _ => {}
            }
        }
    }

    fn parse_folder(&mut self, element: &XmlElement, parent: FolderId) {
        let name = element.child_text("name").unwrap_or(UNTITLED_FOLDER);
        let id = FolderId(self.folder_ids.next_id());
        self.tree.add_folder(Folder::new(id, name, Some(parent)));
        self.parse_children(element, id);
    }

    fn parse_place(&mut self, element: &XmlElement, folder: FolderId) {
        let name = element.child_text("name").unwrap_or(UNTITLED_PLACE);
        let details = element.child_text("description").unwrap_or(NO_DESCRIPTION);
        let coordinate = element
            .first_child("Point")
            .map(parse_point)
            .unwrap_or_default();
        let id = PlaceId(self.place_ids.next_id());
        self.tree
            .add_place(Place::new(id, name, details, coordinate, folder));
    }

    fn finish(self) -> PlaceTree {
        self.tree
    }
}

/// Parse a `<Point>` element into a coordinate.
///
/// The wire format is `"<longitude>,<latitude>[,<altitude>]"`, longitude
/// first. Anything that does not yield two parseable tokens falls back to
/// (0, 0); a bad coordinate never fails the ingestion.
fn parse_point(point: &XmlElement) -> Coordinate {
    let Some(text) = point.child_text("coordinates") else {
        return Coordinate::default();
    };
    let mut tokens = text.split(',');
    let longitude = tokens.next().and_then(|token| token.trim().parse::<f64>().ok());
    let latitude = tokens.next().and_then(|token| token.trim().parse::<f64>().ok());
    match (longitude, latitude) {
        (Some(longitude), Some(latitude)) => Coordinate::new(latitude, longitude),
        _ => Coordinate::default(),
    }
}
