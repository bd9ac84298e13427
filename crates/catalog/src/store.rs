//! Catalog persistence using SQLite with sqlx.
//!
//! Holds the scene catalog (bulk-imported from the public index CSV)
//! and the WRS-2 grid-cell footprints (wholesale-refreshed reference
//! data). Records are immutable once synchronized; searches are
//! read-only.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};
use geo::Geometry;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};

use landsat_common::{geom, LandsatError, LandsatResult};

use crate::builder::{self, BindValue, QueryParam};
use crate::queries;

/// Database connection pool and low-level catalog operations.
pub struct CatalogDb {
    pool: SqlitePool,
}

impl CatalogDb {
    /// Open or create the catalog database at the given path.
    pub async fn open(path: &Path) -> LandsatResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Connection failed: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;

        info!(path = %path.display(), "Opened catalog database");
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_memory() -> LandsatResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Connection failed: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Apply the schema, statement by statement.
    async fn migrate(&self) -> LandsatResult<()> {
        for statement in queries::SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| {
                        LandsatError::DatabaseError(format!("Migration failed: {}", e))
                    })?;
            }
        }
        Ok(())
    }

    /// Insert one scene record.
    pub async fn insert_scene(
        &self,
        product_id: &str,
        scene_id: &str,
        path: i64,
        row: i64,
        sensing_time: i64,
        cloud_cover: f64,
    ) -> LandsatResult<()> {
        sqlx::query(queries::CATALOG_INSERT)
            .bind(product_id)
            .bind(scene_id)
            .bind(path)
            .bind(row)
            .bind(sensing_time)
            .bind(cloud_cover)
            .execute(&self.pool)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    /// Insert one grid-cell footprint, deriving its bounding box.
    pub async fn insert_grid_cell(
        &self,
        path: i64,
        row: i64,
        footprint: &Geometry<f64>,
    ) -> LandsatResult<()> {
        let text = geom::to_wkt(footprint)?;
        let rect = geom::bounding_rect(footprint)?;

        sqlx::query(queries::GRID_CELL_INSERT)
            .bind(path)
            .bind(row)
            .bind(&text)
            .bind(rect.min().x)
            .bind(rect.min().y)
            .bind(rect.max().x)
            .bind(rect.max().y)
            .execute(&self.pool)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Insert failed: {}", e)))?;
        Ok(())
    }

    /// Bulk-import the scene catalog from the public index CSV.
    ///
    /// Rows without a product identifier are skipped, matching the
    /// upstream index file which lists pre-collection scenes that
    /// way. Returns the number of rows imported.
    pub async fn sync_catalog<R: Read>(&self, src: R) -> LandsatResult<u64> {
        let mut reader = csv::Reader::from_reader(src);
        let columns = CsvColumns::from_headers(
            reader
                .headers()
                .map_err(|e| LandsatError::DataReadError(format!("CSV header: {}", e)))?,
        )?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Transaction failed: {}", e)))?;

        let mut imported = 0u64;
        for record in reader.records() {
            let record =
                record.map_err(|e| LandsatError::DataReadError(format!("CSV row: {}", e)))?;
            let Some(row) = columns.parse(&record)? else {
                continue;
            };

            sqlx::query(queries::CATALOG_INSERT)
                .bind(&row.product_id)
                .bind(&row.scene_id)
                .bind(row.path)
                .bind(row.row)
                .bind(row.sensing_time)
                .bind(row.cloud_cover)
                .execute(&mut *tx)
                .await
                .map_err(|e| LandsatError::DatabaseError(format!("Insert failed: {}", e)))?;
            imported += 1;

            if imported % 100_000 == 0 {
                debug!(rows = imported, "Catalog sync in progress");
            }
        }

        tx.commit()
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Commit failed: {}", e)))?;

        info!(rows = imported, "Synchronized scene catalog");
        Ok(imported)
    }

    /// Wholesale refresh of the grid-cell reference data.
    pub async fn sync_grid_cells<I>(&self, cells: I) -> LandsatResult<u64>
    where
        I: IntoIterator<Item = (i64, i64, Geometry<f64>)>,
    {
        sqlx::query(queries::GRID_CELL_CLEAR)
            .execute(&self.pool)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Clear failed: {}", e)))?;

        let mut imported = 0u64;
        for (path, row, footprint) in cells {
            self.insert_grid_cell(path, row, &footprint).await?;
            imported += 1;
        }

        info!(rows = imported, "Synchronized grid cells");
        Ok(imported)
    }

    /// Expand a search template and run it.
    pub(crate) async fn fetch_scenes(
        &self,
        template: &str,
        params: Vec<QueryParam>,
    ) -> LandsatResult<Vec<SceneRow>> {
        let (sql, values) = builder::expand(template, params)?;

        let mut query = sqlx::query_as::<_, SceneRow>(&sql);
        for value in values {
            query = match value {
                BindValue::Int(v) => query.bind(v),
                BindValue::Real(v) => query.bind(v),
                BindValue::Text(v) => query.bind(v),
            };
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Query failed: {}", e)))
    }

    /// Grid cells whose stored bounding box overlaps the given box.
    pub(crate) async fn fetch_grid_candidates(
        &self,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    ) -> LandsatResult<Vec<GridRow>> {
        sqlx::query_as::<_, GridRow>(queries::GRID_SEARCH)
            .bind(min_x)
            .bind(max_x)
            .bind(min_y)
            .bind(max_y)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| LandsatError::DatabaseError(format!("Query failed: {}", e)))
    }
}

/// Internal row type for scene queries.
#[derive(Debug, FromRow)]
pub(crate) struct SceneRow {
    pub product_id: String,
    pub scene_id: String,
    pub path: i64,
    pub row: i64,
    pub sensing_time: i64,
    pub cloud_cover: f64,
    pub geom: String,
}

/// Internal row type for grid-cell queries.
#[derive(Debug, FromRow)]
pub(crate) struct GridRow {
    pub path: i64,
    pub row: i64,
    pub geom: String,
}

/// Resolved column positions in the index CSV.
struct CsvColumns {
    product_id: usize,
    scene_id: usize,
    path: usize,
    row: usize,
    sensing_time: usize,
    cloud_cover: usize,
}

struct ParsedCsvRow {
    product_id: String,
    scene_id: String,
    path: i64,
    row: i64,
    sensing_time: i64,
    cloud_cover: f64,
}

impl CsvColumns {
    fn from_headers(headers: &csv::StringRecord) -> LandsatResult<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LandsatError::DataReadError(format!("missing CSV column {}", name)))
        };
        Ok(Self {
            product_id: position("PRODUCT_ID")?,
            scene_id: position("SCENE_ID")?,
            path: position("WRS_PATH")?,
            row: position("WRS_ROW")?,
            sensing_time: position("SENSING_TIME")?,
            cloud_cover: position("CLOUD_COVER")?,
        })
    }

    /// Parse one CSV record; `None` for rows without a product id.
    fn parse(&self, record: &csv::StringRecord) -> LandsatResult<Option<ParsedCsvRow>> {
        let field = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| LandsatError::DataReadError("short CSV row".to_string()))
        };

        let product_id = field(self.product_id)?;
        if product_id.is_empty() {
            return Ok(None);
        }

        let bad = |name: &str, v: &str| {
            LandsatError::DataReadError(format!("unparsable {} '{}' for {}", name, v, product_id))
        };

        let path_str = field(self.path)?;
        let row_str = field(self.row)?;
        let cloud_str = field(self.cloud_cover)?;
        Ok(Some(ParsedCsvRow {
            product_id: product_id.to_string(),
            scene_id: field(self.scene_id)?.to_string(),
            path: path_str.parse().map_err(|_| bad("path", path_str))?,
            row: row_str.parse().map_err(|_| bad("row", row_str))?,
            sensing_time: parse_sensing_time(field(self.sensing_time)?)?,
            cloud_cover: cloud_str.parse().map_err(|_| bad("cloud cover", cloud_str))?,
        }))
    }
}

/// Parse an ISO-8601 sensing timestamp into POSIX epoch seconds.
///
/// The index file carries RFC 3339 timestamps with a 7-digit
/// fractional second; a date-time without offset is taken as UTC.
fn parse_sensing_time(s: &str) -> LandsatResult<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp());
    }
    if let Some(prefix) = s.get(..19) {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
            return Ok(ndt.and_utc().timestamp());
        }
    }
    Err(LandsatError::DataReadError(format!(
        "unparsable sensing time: {}",
        s
    )))
}
