//! In-memory repository of the ingested place hierarchy
//!
//! One `PlaceStore` owns the current `PlaceTree` and serves every read
//! query. Ingestion is build-then-swap: a parser builds the new tree off to
//! the side and `install` publishes it with a single swap under the lock, so
//! readers observe either the fully-prior or the fully-new tree.

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::domain::{Coordinate, Folder, FolderId, Place, PlaceId, PlaceTree, Rgb};
use crate::error::{Error, Result};
use crate::ports::DocumentParser;

/// Repository of folders and places.
///
/// Query results are owned snapshots of the records; mutation goes through
/// the store operations only (re-ingestion, color assignment).
#[derive(Debug)]
pub struct PlaceStore {
    tree: RwLock<Option<PlaceTree>>,
}

impl PlaceStore {
    /// Create an empty store. `root_folder` returns `None` until a document
    /// has been ingested.
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(None),
        }
    }

    /// Parse `bytes` with `parser` and install the result.
    ///
    /// All-or-nothing: when parsing fails the previously installed tree
    /// stays published untouched.
    pub fn ingest(&self, parser: &dyn DocumentParser, bytes: &[u8]) -> Result<()> {
        debug!(bytes = bytes.len(), "ingesting place document");
        let tree = parser.parse(bytes)?;
        self.install(tree);
        Ok(())
    }

    /// Replace the published tree in a single swap, discarding prior state.
    pub fn install(&self, tree: PlaceTree) {
        info!(
            folders = tree.folder_count(),
            places = tree.place_count(),
            "installing place document"
        );
        *self.tree.write() = Some(tree);
    }

    /// Whether a document has been ingested.
    pub fn is_loaded(&self) -> bool {
        self.tree.read().is_some()
    }

    /// The unique parentless folder, or `None` before any ingestion.
    pub fn root_folder(&self) -> Option<Folder> {
        self.tree.read().as_ref().and_then(|t| t.root().cloned())
    }

    pub fn folder(&self, id: FolderId) -> Result<Folder> {
        self.tree
            .read()
            .as_ref()
            .and_then(|t| t.folder(id).cloned())
            .ok_or_else(|| Error::folder_not_found(id))
    }

    pub fn place(&self, id: PlaceId) -> Result<Place> {
        self.tree
            .read()
            .as_ref()
            .and_then(|t| t.place(id).cloned())
            .ok_or_else(|| Error::place_not_found(id))
    }

    /// Parent of the given folder; `Ok(None)` for the root.
    pub fn parent_folder_id(&self, id: FolderId) -> Result<Option<FolderId>> {
        self.folder(id).map(|folder| folder.parent)
    }

    /// Direct child folders in stored (source-document) order.
    pub fn subfolders(&self, id: FolderId) -> Result<Vec<Folder>> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or_else(|| Error::folder_not_found(id))?;
        let folder = tree.folder(id).ok_or_else(|| Error::folder_not_found(id))?;
        Ok(folder
            .subfolders
            .iter()
            .filter_map(|sub| tree.folder(*sub).cloned())
            .collect())
    }

    /// Places of a folder: direct children in stored order, or the full
    /// depth-first flattening when `recursive` is set.
    pub fn places_in_folder(&self, id: FolderId, recursive: bool) -> Result<Vec<Place>> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or_else(|| Error::folder_not_found(id))?;
        let folder = tree.folder(id).ok_or_else(|| Error::folder_not_found(id))?;
        let place_ids = if recursive {
            tree.flattened_place_ids(id)
        } else {
            folder.places.clone()
        };
        Ok(place_ids
            .iter()
            .filter_map(|place| tree.place(*place).cloned())
            .collect())
    }

    /// Every place in the repository, in document order.
    pub fn all_places(&self) -> Vec<Place> {
        self.tree
            .read()
            .as_ref()
            .map(|t| t.places_in_order().cloned().collect())
            .unwrap_or_default()
    }

    /// Places sorted by ascending great-circle distance to `coordinate`.
    /// Ties keep identity order (stable sort over document-order iteration).
    pub fn places_near(&self, coordinate: Coordinate) -> Vec<Place> {
        let guard = self.tree.read();
        let Some(tree) = guard.as_ref() else {
            return Vec::new();
        };
        let mut ranked: Vec<(f64, &Place)> = tree
            .places_in_order()
            .map(|place| (coordinate.distance_to(place.coordinate), place))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, place)| place.clone()).collect()
    }

    /// Case-insensitive substring match on place names, in document order.
    /// The list projection re-sorts alphabetically.
    pub fn places_matching(&self, text: &str) -> Vec<Place> {
        let needle = text.to_lowercase();
        self.tree
            .read()
            .as_ref()
            .map(|t| {
                t.places_in_order()
                    .filter(|place| place.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Assign a display color to one place. The only per-record mutation
    /// allowed after ingestion.
    pub fn set_place_color(&self, id: PlaceId, color: Rgb) -> Result<()> {
        let mut guard = self.tree.write();
        let tree = guard.as_mut().ok_or_else(|| Error::place_not_found(id))?;
        let place = tree.place_mut(id).ok_or_else(|| Error::place_not_found(id))?;
        place.color = Some(color);
        Ok(())
    }

    /// Assign `color` to every flattened place of the folder.
    pub fn set_folder_color(&self, id: FolderId, color: Rgb) -> Result<()> {
        let mut guard = self.tree.write();
        let tree = guard.as_mut().ok_or_else(|| Error::folder_not_found(id))?;
        if tree.folder(id).is_none() {
            return Err(Error::folder_not_found(id));
        }
        for place_id in tree.flattened_place_ids(id) {
            if let Some(place) = tree.place_mut(place_id) {
                place.color = Some(color);
            }
        }
        Ok(())
    }

    /// The color shared by every flattened place of the folder, or `None`
    /// when the folder is empty or its places disagree.
    pub fn folder_color(&self, id: FolderId) -> Result<Option<Rgb>> {
        let guard = self.tree.read();
        let tree = guard.as_ref().ok_or_else(|| Error::folder_not_found(id))?;
        if tree.folder(id).is_none() {
            return Err(Error::folder_not_found(id));
        }
        let mut colors = tree
            .flattened_place_ids(id)
            .into_iter()
            .filter_map(|place_id| tree.place(place_id))
            .map(|place| place.color);
        let Some(first) = colors.next() else {
            return Ok(None);
        };
        if colors.all(|color| color == first) {
            Ok(first)
        } else {
            Ok(None)
        }
    }
}

impl Default for PlaceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn place_at(id: u32, folder: FolderId, name: &str, latitude: f64) -> Place {
        Place::new(
            PlaceId(id),
            name,
            "No Description",
            Coordinate::new(latitude, 0.0),
            folder,
        )
    }

    /// root(0) -> a(1) -> b(2), p0 in root, p1 in a, p2 in b
    fn sample_tree() -> PlaceTree {
        let mut tree = PlaceTree::new(Folder::new(FolderId(0), "My Places", None));
        tree.add_folder(Folder::new(FolderId(1), "A", Some(FolderId(0))));
        tree.add_folder(Folder::new(FolderId(2), "B", Some(FolderId(1))));
        tree.add_place(place_at(0, FolderId(0), "Root Place", 0.0));
        tree.add_place(place_at(1, FolderId(1), "Place In A", 1.0));
        tree.add_place(place_at(2, FolderId(2), "Place In B", 2.0));
        tree
    }

    fn loaded_store() -> PlaceStore {
        let store = PlaceStore::new();
        store.install(sample_tree());
        store
    }

    #[test]
    fn test_empty_store() {
        let store = PlaceStore::new();
        assert!(!store.is_loaded());
        assert_eq!(store.root_folder(), None);
        assert!(store.all_places().is_empty());
        assert!(store.places_near(Coordinate::default()).is_empty());
        let err = store.folder(FolderId(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::FolderNotFound);
    }

    #[test]
    fn test_root_folder_and_lookups() {
        let store = loaded_store();
        assert!(store.is_loaded());
        assert_eq!(store.root_folder().unwrap().name, "My Places");
        assert_eq!(store.folder(FolderId(1)).unwrap().name, "A");
        assert_eq!(store.place(PlaceId(2)).unwrap().name, "Place In B");
    }

    #[test]
    fn test_lookup_of_unknown_id_is_recoverable() {
        let store = loaded_store();
        assert_eq!(
            store.folder(FolderId(9)).unwrap_err().kind,
            ErrorKind::FolderNotFound
        );
        assert_eq!(
            store.place(PlaceId(9)).unwrap_err().kind,
            ErrorKind::PlaceNotFound
        );
    }

    #[test]
    fn test_parent_folder_id() {
        let store = loaded_store();
        assert_eq!(store.parent_folder_id(FolderId(0)).unwrap(), None);
        assert_eq!(
            store.parent_folder_id(FolderId(2)).unwrap(),
            Some(FolderId(1))
        );
    }

    #[test]
    fn test_subfolders_in_stored_order() {
        let store = loaded_store();
        let subfolders = store.subfolders(FolderId(0)).unwrap();
        assert_eq!(subfolders.len(), 1);
        assert_eq!(subfolders[0].name, "A");
        assert!(store.subfolders(FolderId(2)).unwrap().is_empty());
    }

    #[test]
    fn test_direct_versus_recursive_places() {
        let store = loaded_store();
        let direct: Vec<String> = store
            .places_in_folder(FolderId(1), false)
            .unwrap()
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(direct, vec!["Place In A"]);

        let recursive: Vec<String> = store
            .places_in_folder(FolderId(1), true)
            .unwrap()
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(recursive, vec!["Place In A", "Place In B"]);
    }

    #[test]
    fn test_places_near_orders_by_distance() {
        // Distances from the probe at (0, 0): one degree of latitude is
        // ~111 195 m, so these offsets sit at ~10 m, ~5000 m and ~200 m.
        let mut tree = PlaceTree::new(Folder::new(FolderId(0), "Root", None));
        tree.add_place(place_at(0, FolderId(0), "Ten Meters", 10.0 / 111_195.0));
        tree.add_place(place_at(1, FolderId(0), "Five Kilometers", 5_000.0 / 111_195.0));
        tree.add_place(place_at(2, FolderId(0), "Two Hundred Meters", 200.0 / 111_195.0));
        let store = PlaceStore::new();
        store.install(tree);

        let names: Vec<String> = store
            .places_near(Coordinate::default())
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(
            names,
            vec!["Ten Meters", "Two Hundred Meters", "Five Kilometers"]
        );
    }

    #[test]
    fn test_places_near_ties_break_by_identity_order() {
        let mut tree = PlaceTree::new(Folder::new(FolderId(0), "Root", None));
        tree.add_place(place_at(0, FolderId(0), "First", 1.0));
        tree.add_place(place_at(1, FolderId(0), "Second", 1.0));
        let store = PlaceStore::new();
        store.install(tree);

        let ids: Vec<PlaceId> = store
            .places_near(Coordinate::default())
            .into_iter()
            .map(|place| place.id)
            .collect();
        assert_eq!(ids, vec![PlaceId(0), PlaceId(1)]);
    }

    #[test]
    fn test_places_matching_is_case_insensitive() {
        let store = loaded_store();
        let names: Vec<String> = store
            .places_matching("pLaCe iN")
            .into_iter()
            .map(|place| place.name)
            .collect();
        assert_eq!(names, vec!["Place In A", "Place In B"]);
        assert!(store.places_matching("nothing here").is_empty());
    }

    #[test]
    fn test_set_place_color() {
        let store = loaded_store();
        store.set_place_color(PlaceId(1), Rgb(0xFF0000)).unwrap();
        assert_eq!(store.place(PlaceId(1)).unwrap().color, Some(Rgb(0xFF0000)));
        assert_eq!(store.place(PlaceId(0)).unwrap().color, None);
    }

    #[test]
    fn test_set_folder_color_reaches_flattened_places() {
        let store = loaded_store();
        store.set_folder_color(FolderId(1), Rgb(0x123456)).unwrap();
        // p1 and p2 are under folder A (directly or through B), p0 is not
        assert_eq!(store.place(PlaceId(1)).unwrap().color, Some(Rgb(0x123456)));
        assert_eq!(store.place(PlaceId(2)).unwrap().color, Some(Rgb(0x123456)));
        assert_eq!(store.place(PlaceId(0)).unwrap().color, None);
    }

    #[test]
    fn test_folder_color_uniform_or_none() {
        let store = loaded_store();
        assert_eq!(store.folder_color(FolderId(1)).unwrap(), None);

        store.set_folder_color(FolderId(1), Rgb(0x00FF00)).unwrap();
        assert_eq!(store.folder_color(FolderId(1)).unwrap(), Some(Rgb(0x00FF00)));

        store.set_place_color(PlaceId(2), Rgb(0x0000FF)).unwrap();
        assert_eq!(store.folder_color(FolderId(1)).unwrap(), None);
    }

    #[test]
    fn test_install_replaces_previous_tree() {
        let store = loaded_store();
        let replacement = PlaceTree::new(Folder::new(FolderId(0), "Fresh", None));
        store.install(replacement);

        assert_eq!(store.root_folder().unwrap().name, "Fresh");
        assert!(store.all_places().is_empty());
        // Identities from the discarded tree are stale now
        assert_eq!(
            store.place(PlaceId(2)).unwrap_err().kind,
            ErrorKind::PlaceNotFound
        );
    }

    struct FailingParser;

    impl DocumentParser for FailingParser {
        fn parse(&self, _bytes: &[u8]) -> crate::error::Result<PlaceTree> {
            Err(Error::malformed_document("not XML"))
        }
    }

    struct FixedParser;

    impl DocumentParser for FixedParser {
        fn parse(&self, _bytes: &[u8]) -> crate::error::Result<PlaceTree> {
            Ok(PlaceTree::new(Folder::new(FolderId(0), "Parsed", None)))
        }
    }

    #[test]
    fn test_ingest_installs_parsed_tree() {
        let store = PlaceStore::new();
        store.ingest(&FixedParser, b"irrelevant").unwrap();
        assert_eq!(store.root_folder().unwrap().name, "Parsed");
    }

    #[test]
    fn test_failed_ingest_leaves_prior_tree() {
        let store = loaded_store();
        let err = store.ingest(&FailingParser, b"garbage").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedDocument);
        assert_eq!(store.root_folder().unwrap().name, "My Places");
        assert_eq!(store.all_places().len(), 3);
    }
}
