//! SQL templates for the catalog schema.
//!
//! Footprint geometries are stored as WKT alongside their bounding
//! box; the box columns plus their index stand in for a spatial
//! index, with exact intersection refined in process.

/// Database schema SQL.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS catalog (
    product_id TEXT PRIMARY KEY NOT NULL,
    scene_id TEXT,
    path INTEGER,
    row INTEGER,
    sensing_time INTEGER,
    cloud_cover REAL
);

CREATE INDEX IF NOT EXISTS idx_catalog_pathrow ON catalog (path, row);

CREATE TABLE IF NOT EXISTS grid_cell (
    path INTEGER NOT NULL,
    row INTEGER NOT NULL,
    geom TEXT NOT NULL,
    min_x REAL NOT NULL,
    min_y REAL NOT NULL,
    max_x REAL NOT NULL,
    max_y REAL NOT NULL,
    PRIMARY KEY (path, row)
);

CREATE INDEX IF NOT EXISTS idx_grid_cell_bbox ON grid_cell (min_x, max_x, min_y, max_y);
"#;

/// Insert a scene record during catalog synchronization.
pub const CATALOG_INSERT: &str = "INSERT OR IGNORE INTO catalog \
     (product_id, scene_id, path, row, sensing_time, cloud_cover) \
     VALUES (?, ?, ?, ?, ?, ?)";

/// Insert a grid-cell footprint during reference-data synchronization.
pub const GRID_CELL_INSERT: &str = "INSERT OR IGNORE INTO grid_cell \
     (path, row, geom, min_x, min_y, max_x, max_y) \
     VALUES (?, ?, ?, ?, ?, ?, ?)";

/// Wholesale refresh drops existing grid cells first.
pub const GRID_CELL_CLEAR: &str = "DELETE FROM grid_cell";

/// Search the catalog with path/row lists as the spatial filter.
///
/// Parameters: paths, rows, begin, end, max cloud, sensors, tiers.
pub const SEARCH_PATHROW: &str = "\
SELECT catalog.product_id, catalog.scene_id, catalog.path, catalog.row, \
  catalog.sensing_time, catalog.cloud_cover, grid_cell.geom \
FROM catalog \
INNER JOIN grid_cell ON grid_cell.path = catalog.path AND grid_cell.row = catalog.row \
WHERE catalog.path IN ? AND catalog.row IN ? \
  AND catalog.sensing_time BETWEEN ? AND ? \
  AND catalog.cloud_cover <= ? \
  AND SUBSTR(catalog.product_id, 1, 4) IN ? \
  AND SUBSTR(catalog.product_id, -2, 2) IN ?";

/// Search the catalog with a bounding-box prefilter as the spatial
/// filter; candidates are refined against the exact geometry after
/// the query.
///
/// Parameters: begin, end, max cloud, sensors, tiers,
/// min_x, max_x, min_y, max_y of the query geometry.
pub const SEARCH_BBOX: &str = "\
SELECT catalog.product_id, catalog.scene_id, catalog.path, catalog.row, \
  catalog.sensing_time, catalog.cloud_cover, grid_cell.geom \
FROM catalog \
INNER JOIN grid_cell ON grid_cell.path = catalog.path AND grid_cell.row = catalog.row \
WHERE catalog.sensing_time BETWEEN ? AND ? \
  AND catalog.cloud_cover <= ? \
  AND SUBSTR(catalog.product_id, 1, 4) IN ? \
  AND SUBSTR(catalog.product_id, -2, 2) IN ? \
  AND grid_cell.max_x >= ? AND grid_cell.min_x <= ? \
  AND grid_cell.max_y >= ? AND grid_cell.min_y <= ?";

/// Grid cells whose bounding box overlaps the query box.
pub const GRID_SEARCH: &str = "\
SELECT path, row, geom FROM grid_cell \
WHERE max_x >= ? AND min_x <= ? AND max_y >= ? AND min_y <= ?";

/// Exact product identifier lookup.
pub const PRODUCT_LOOKUP: &str = "\
SELECT catalog.product_id, catalog.scene_id, catalog.path, catalog.row, \
  catalog.sensing_time, catalog.cloud_cover, grid_cell.geom \
FROM catalog \
INNER JOIN grid_cell ON grid_cell.path = catalog.path AND grid_cell.row = catalog.row \
WHERE catalog.product_id = ?";
