//! Window geometry domain: public API.
//!
//! Persists the main window's bounds and restores them on the next launch,
//! but only when they still land on a display that is attached right now.
//!
//! - **types**: GeometryRecord, WorkArea, InitialPlacement
//! - **store**: GeometryStore trait + the JSON file implementation
//! - **validate**: does a record intersect any current work area?
//! - **controller**: restore-on-create, debounced save, close flush

pub mod controller;
pub mod store;
pub mod types;
pub mod validate;

pub use controller::{restore_placement, GeometryController, WindowState};
pub use store::{FileGeometryStore, GeometryStore, StoreError};
pub use types::{GeometryRecord, InitialPlacement, WorkArea};
pub use validate::is_usable;

/// Source of the work areas of every currently attached display.
///
/// Queried fresh on each validation; displays can change while the app runs
/// or between sessions.
pub trait DisplayTopology {
    fn work_areas(&self) -> Vec<WorkArea>;
}

impl DisplayTopology for Vec<WorkArea> {
    fn work_areas(&self) -> Vec<WorkArea> {
        self.clone()
    }
}
