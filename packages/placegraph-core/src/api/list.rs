//! Display-list projection
//!
//! Turns a query mode into the flat, sorted row list the list screen renders.
//! The store stays the single source of truth; rows carry identities back to
//! it for navigation and detail lookups.

use serde::{Deserialize, Serialize};

use crate::domain::{Folder, FolderId, Place, PlaceId};
use crate::ports::LocationProvider;
use crate::store::PlaceStore;

/// Number of rows produced in nearby mode
const NEARBY_LIMIT: usize = 10;

/// Name of the synthetic shortcut row shown at the top of the root folder
const ALL_PLACES_NAME: &str = "All Places";

const FEET_PER_METER: f64 = 3.28084;
const MILES_PER_METER: f64 = 0.000621371;

/// Query modes for the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchMode {
    /// All place data shown with no folder hierarchy
    AllPlaces,
    /// Subfolders and places within the given folder
    Folder(Option<FolderId>),
    /// Nearest places shown first, with no folder hierarchy
    Nearby,
    /// Places matching the given text, with no folder hierarchy
    Text(String),
}

/// What a list row stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListItemKind {
    Folder(FolderId),
    Place(PlaceId),
    /// The "All Places" shortcut row, not backed by a single record
    AllPlaces,
}

/// One display row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub kind: ListItemKind,
    pub name: String,
    /// Distance annotation in nearby mode, otherwise empty
    pub detail: String,
}

impl ListItem {
    fn for_folder(folder: &Folder) -> Self {
        Self {
            kind: ListItemKind::Folder(folder.id),
            name: folder.name.clone(),
            detail: String::new(),
        }
    }

    fn for_place(place: &Place, detail: String) -> Self {
        Self {
            kind: ListItemKind::Place(place.id),
            name: place.name.clone(),
            detail,
        }
    }
}

/// Build the row list for `mode`.
///
/// Returns `None` only for nearby mode without a current location; every
/// other mode yields a list, possibly empty.
pub fn project(
    store: &PlaceStore,
    mode: &SearchMode,
    location: &dyn LocationProvider,
) -> Option<Vec<ListItem>> {
    match mode {
        SearchMode::AllPlaces => Some(all_places_items(store)),
        SearchMode::Folder(folder_id) => Some(folder_items(store, *folder_id)),
        SearchMode::Nearby => nearby_items(store, location),
        SearchMode::Text(text) => Some(text_items(store, text)),
    }
}

fn all_places_items(store: &PlaceStore) -> Vec<ListItem> {
    let places = match store.root_folder() {
        Some(root) => store.places_in_folder(root.id, true).unwrap_or_default(),
        None => Vec::new(),
    };
    let mut items: Vec<ListItem> = places
        .iter()
        .map(|place| ListItem::for_place(place, String::new()))
        .collect();
    sort_by_name(&mut items);
    items
}

fn folder_items(store: &PlaceStore, folder_id: Option<FolderId>) -> Vec<ListItem> {
    let Some(folder_id) = folder_id else {
        return Vec::new();
    };

    let mut items: Vec<ListItem> = store
        .subfolders(folder_id)
        .unwrap_or_default()
        .iter()
        .map(ListItem::for_folder)
        .collect();
    sort_by_name(&mut items);

    let mut places: Vec<ListItem> = store
        .places_in_folder(folder_id, false)
        .unwrap_or_default()
        .iter()
        .map(|place| ListItem::for_place(place, String::new()))
        .collect();
    sort_by_name(&mut places);
    items.extend(places);

    let is_root = store
        .folder(folder_id)
        .map(|folder| folder.is_root())
        .unwrap_or(false);
    if is_root {
        items.insert(
            0,
            ListItem {
                kind: ListItemKind::AllPlaces,
                name: ALL_PLACES_NAME.to_string(),
                detail: String::new(),
            },
        );
    }
    items
}

fn nearby_items(store: &PlaceStore, location: &dyn LocationProvider) -> Option<Vec<ListItem>> {
    let current = location.current_location()?;
    let items = store
        .places_near(current)
        .into_iter()
        .take(NEARBY_LIMIT)
        .map(|place| {
            let detail = format_distance(current.distance_to(place.coordinate));
            ListItem::for_place(&place, detail)
        })
        .collect();
    Some(items)
}

fn text_items(store: &PlaceStore, text: &str) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = store
        .places_matching(text)
        .iter()
        .map(|place| ListItem::for_place(place, String::new()))
        .collect();
    sort_by_name(&mut items);
    items
}

fn sort_by_name(items: &mut [ListItem]) {
    items.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Format a distance in meters the way the list shows it: feet rounded to
/// the nearest 50 while under 1000 feet, miles to one decimal above that.
pub fn format_distance(meters: f64) -> String {
    let feet = ((meters * FEET_PER_METER) / 50.0).round() * 50.0;
    if feet < 1000.0 {
        format!("{} feet", feet as i64)
    } else {
        let miles = (meters * MILES_PER_METER * 10.0).round() / 10.0;
        format!("{:.1} miles", miles)
    }
}

/// Stateful projection holding the rows last produced.
///
/// `refresh` rebuilds the rows for a mode, except that nearby mode without a
/// current location keeps the previous rows in place instead of clearing the
/// screen.
#[derive(Debug, Default)]
pub struct ListProjection {
    items: Vec<ListItem>,
}

impl ListProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn refresh(
        &mut self,
        store: &PlaceStore,
        mode: &SearchMode,
        location: &dyn LocationProvider,
    ) {
        if let Some(items) = project(store, mode, location) {
            self.items = items;
        }
    }
}
