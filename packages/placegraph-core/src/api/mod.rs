//! Read-side APIs consumed by the presentation layer

mod list;

pub use list::{
    format_distance, project, ListItem, ListItemKind, ListProjection, SearchMode,
};
