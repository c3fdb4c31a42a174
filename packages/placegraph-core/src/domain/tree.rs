//! A fully parsed document

use rustc_hash::FxHashMap;

use crate::domain::{Folder, FolderId, Place, PlaceId};

/// One ingested document: a root folder plus identity-keyed records.
///
/// Built off to the side by a document parser and handed to the store for
/// atomic installation. The `folder_order`/`place_order` sequences hold the
/// depth-first document order of identity assignment and are what make
/// iteration deterministic.
#[derive(Debug, Clone)]
pub struct PlaceTree {
    root: FolderId,
    folders: FxHashMap<FolderId, Folder>,
    places: FxHashMap<PlaceId, Place>,
    folder_order: Vec<FolderId>,
    place_order: Vec<PlaceId>,
}

impl PlaceTree {
    /// Create a tree from its root folder. The root must be parentless.
    pub fn new(root: Folder) -> Self {
        let root_id = root.id;
        let mut folders = FxHashMap::default();
        folders.insert(root_id, root);
        Self {
            root: root_id,
            folders,
            places: FxHashMap::default(),
            folder_order: vec![root_id],
            place_order: Vec::new(),
        }
    }

    pub fn root_id(&self) -> FolderId {
        self.root
    }

    pub fn root(&self) -> Option<&Folder> {
        self.folders.get(&self.root)
    }

    /// Insert a folder and wire it into its parent's child sequence.
    pub fn add_folder(&mut self, folder: Folder) {
        if let Some(parent) = folder.parent {
            if let Some(parent_folder) = self.folders.get_mut(&parent) {
                parent_folder.subfolders.push(folder.id);
            }
        }
        self.folder_order.push(folder.id);
        self.folders.insert(folder.id, folder);
    }

    /// Insert a place and wire it into its owning folder's child sequence.
    pub fn add_place(&mut self, place: Place) {
        if let Some(folder) = self.folders.get_mut(&place.folder) {
            folder.places.push(place.id);
        }
        self.place_order.push(place.id);
        self.places.insert(place.id, place);
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(&id)
    }

    pub(crate) fn place_mut(&mut self, id: PlaceId) -> Option<&mut Place> {
        self.places.get_mut(&id)
    }

    /// All folders in document order.
    pub fn folders_in_order(&self) -> impl Iterator<Item = &Folder> {
        self.folder_order.iter().filter_map(|id| self.folders.get(id))
    }

    /// All places in document order.
    pub fn places_in_order(&self) -> impl Iterator<Item = &Place> {
        self.place_order.iter().filter_map(|id| self.places.get(id))
    }

    /// Depth-first pre-order flattening: the folder's own places first, then
    /// each subfolder's flattened places in child order.
    pub fn flattened_place_ids(&self, id: FolderId) -> Vec<PlaceId> {
        let mut out = Vec::new();
        self.collect_places(id, &mut out);
        out
    }

    fn collect_places(&self, id: FolderId, out: &mut Vec<PlaceId>) {
        if let Some(folder) = self.folders.get(&id) {
            out.extend(folder.places.iter().copied());
            for subfolder in &folder.subfolders {
                self.collect_places(*subfolder, out);
            }
        }
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;

    fn place(id: u32, folder: FolderId, name: &str) -> Place {
        Place::new(PlaceId(id), name, "No Description", Coordinate::default(), folder)
    }

    /// root -> a -> b, with p0 in root, p1 in a, p2 in b
    fn sample_tree() -> PlaceTree {
        let mut tree = PlaceTree::new(Folder::new(FolderId(0), "My Places", None));
        tree.add_folder(Folder::new(FolderId(1), "A", Some(FolderId(0))));
        tree.add_folder(Folder::new(FolderId(2), "B", Some(FolderId(1))));
        tree.add_place(place(0, FolderId(0), "Root Place"));
        tree.add_place(place(1, FolderId(1), "Place In A"));
        tree.add_place(place(2, FolderId(2), "Place In B"));
        tree
    }

    #[test]
    fn test_parent_wiring() {
        let tree = sample_tree();
        assert_eq!(tree.folder(FolderId(0)).unwrap().subfolders, vec![FolderId(1)]);
        assert_eq!(tree.folder(FolderId(1)).unwrap().subfolders, vec![FolderId(2)]);
        assert_eq!(tree.folder(FolderId(1)).unwrap().places, vec![PlaceId(1)]);
    }

    #[test]
    fn test_root_lookup() {
        let tree = sample_tree();
        assert_eq!(tree.root_id(), FolderId(0));
        assert_eq!(tree.root().unwrap().name, "My Places");
    }

    #[test]
    fn test_flattening_is_preorder() {
        let tree = sample_tree();
        assert_eq!(
            tree.flattened_place_ids(FolderId(0)),
            vec![PlaceId(0), PlaceId(1), PlaceId(2)]
        );
        assert_eq!(
            tree.flattened_place_ids(FolderId(1)),
            vec![PlaceId(1), PlaceId(2)]
        );
        assert_eq!(tree.flattened_place_ids(FolderId(2)), vec![PlaceId(2)]);
    }

    #[test]
    fn test_flattening_of_unknown_folder_is_empty() {
        let tree = sample_tree();
        assert!(tree.flattened_place_ids(FolderId(99)).is_empty());
    }

    #[test]
    fn test_iteration_follows_document_order() {
        let tree = sample_tree();
        let names: Vec<&str> = tree.places_in_order().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Root Place", "Place In A", "Place In B"]);
        let folder_names: Vec<&str> =
            tree.folders_in_order().map(|f| f.name.as_str()).collect();
        assert_eq!(folder_names, vec!["My Places", "A", "B"]);
    }

    #[test]
    fn test_counts() {
        let tree = sample_tree();
        assert_eq!(tree.folder_count(), 3);
        assert_eq!(tree.place_count(), 3);
    }
}
