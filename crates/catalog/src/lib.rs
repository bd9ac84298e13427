//! Landsat catalog store and search service.
//!
//! A two-table SQLite schema holds the scene catalog and the WRS-2
//! grid-cell footprints. Searches combine a parameterized SQL filter
//! (date range, cloud cover, sensors, tiers, plus either a path/row
//! join or a bounding-box prefilter) with in-process geometry
//! refinement and post-query business rules.

pub mod builder;
pub mod queries;
pub mod search;
pub mod store;

pub use search::{filter_slc_off, Catalog, GridCell, SceneRecord, SearchQuery};
pub use store::CatalogDb;
