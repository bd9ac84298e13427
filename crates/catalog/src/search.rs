//! High-level catalog search service.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use geo::{Area, BooleanOps, Geometry, Intersects, MultiPolygon};
use serde::{Deserialize, Serialize};
use tracing::warn;

use landsat_common::{geom, LandsatError, LandsatResult, SENSORS, TIERS};

use crate::builder::QueryParam;
use crate::queries;
use crate::store::{CatalogDb, SceneRow};

/// First acquisition day affected by the Landsat 7 scan-line
/// corrector failure, as POSIX epoch seconds (2003-05-31T00:00:00Z).
const SLC_FAILURE_TS: i64 = 1_054_339_200;

/// A catalog search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRecord {
    pub product_id: String,
    pub scene_id: String,
    pub path: i64,
    pub row: i64,
    pub sensing_time: DateTime<Utc>,
    pub cloud_cover: f64,
    /// Grid-cell footprint as WKT.
    pub footprint: String,
}

/// A grid cell intersecting a query geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCell {
    pub path: i64,
    pub row: i64,
    /// Footprint as WKT.
    pub footprint: String,
    /// Fraction of the query geometry covered by this footprint.
    /// `None` when the query geometry has no area.
    pub coverage: Option<f64>,
}

/// Search criteria. Exactly one spatial constraint must be set:
/// either both `paths` and `rows`, or `geom`.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// First sensing date, inclusive.
    pub begin: NaiveDate,
    /// Last sensing date, inclusive of the whole day.
    pub end: NaiveDate,
    pub paths: Option<Vec<i64>>,
    pub rows: Option<Vec<i64>>,
    pub geom: Option<Geometry<f64>>,
    /// Maximum cloud cover percentage, inclusive. Defaults to 100.
    pub max_cloud: Option<f64>,
    /// Sensor identifiers. Defaults to the full supported set.
    pub sensors: Option<Vec<String>>,
    /// Collection tiers. Defaults to T1, T2 and RT.
    pub tiers: Option<Vec<String>>,
    /// Drop Landsat 7 scenes acquired after the SLC failure.
    pub exclude_slc_off: bool,
}

impl SearchQuery {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self {
            begin,
            end,
            paths: None,
            rows: None,
            geom: None,
            max_cloud: None,
            sensors: None,
            tiers: None,
            exclude_slc_off: true,
        }
    }
}

/// Catalog search operations over a [`CatalogDb`].
pub struct Catalog {
    db: CatalogDb,
}

impl Catalog {
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }

    /// Search for scenes matching the given criteria.
    ///
    /// Chooses the path/row join when both lists are present,
    /// otherwise the geometry strategy; with neither, the query is
    /// rejected. Bounding-box candidates from the geometry strategy
    /// are refined against the exact footprint before post-filtering.
    pub async fn search(&self, query: &SearchQuery) -> LandsatResult<Vec<SceneRecord>> {
        let begin_ts = query.begin.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = query
            .end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| LandsatError::InvalidDate(query.end.to_string()))?
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;

        let max_cloud = query.max_cloud.unwrap_or(100.0);
        let sensors = query
            .sensors
            .clone()
            .unwrap_or_else(|| SENSORS.iter().map(|s| s.to_string()).collect());
        let tiers = query
            .tiers
            .clone()
            .unwrap_or_else(|| TIERS.iter().map(|t| t.to_string()).collect());

        let rows = match (&query.paths, &query.rows, &query.geom) {
            (Some(paths), Some(wrs_rows), _) => {
                let params = vec![
                    QueryParam::IntList(paths.clone()),
                    QueryParam::IntList(wrs_rows.clone()),
                    QueryParam::Int(begin_ts),
                    QueryParam::Int(end_ts),
                    QueryParam::Real(max_cloud),
                    QueryParam::TextList(sensors),
                    QueryParam::TextList(tiers),
                ];
                self.db.fetch_scenes(queries::SEARCH_PATHROW, params).await?
            }
            (_, _, Some(aoi)) => {
                let rect = geom::bounding_rect(aoi)?;
                let params = vec![
                    QueryParam::Int(begin_ts),
                    QueryParam::Int(end_ts),
                    QueryParam::Real(max_cloud),
                    QueryParam::TextList(sensors),
                    QueryParam::TextList(tiers),
                    QueryParam::Real(rect.min().x),
                    QueryParam::Real(rect.max().x),
                    QueryParam::Real(rect.min().y),
                    QueryParam::Real(rect.max().y),
                ];
                let candidates = self.db.fetch_scenes(queries::SEARCH_BBOX, params).await?;

                let mut hits = Vec::new();
                for row in candidates {
                    let footprint = geom::from_wkt(&row.geom)?;
                    if footprint.intersects(aoi) {
                        hits.push(row);
                    }
                }
                hits
            }
            _ => return Err(LandsatError::MissingSpatialConstraint),
        };

        let mut scenes = rows
            .into_iter()
            .map(scene_record)
            .collect::<LandsatResult<Vec<_>>>()?;

        if query.exclude_slc_off {
            scenes = filter_slc_off(scenes);
        }
        Ok(scenes)
    }

    /// All grid cells whose footprint intersects the given geometry.
    ///
    /// Coverage is reported whenever the input geometry has nonzero
    /// area; for points and lines the ratio is undefined and left
    /// out.
    pub async fn grid_cells(&self, aoi: &Geometry<f64>) -> LandsatResult<Vec<GridCell>> {
        let rect = geom::bounding_rect(aoi)?;
        let candidates = self
            .db
            .fetch_grid_candidates(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
            .await?;

        let mut cells = Vec::new();
        for row in candidates {
            let footprint = geom::from_wkt(&row.geom)?;
            if !footprint.intersects(aoi) {
                continue;
            }
            cells.push(GridCell {
                path: row.path,
                row: row.row,
                coverage: coverage(aoi, &footprint),
                footprint: row.geom,
            });
        }
        Ok(cells)
    }

    /// Fetch the single record matching an exact product identifier.
    pub async fn product(&self, product_id: &str) -> LandsatResult<SceneRecord> {
        let rows = self
            .db
            .fetch_scenes(
                queries::PRODUCT_LOOKUP,
                vec![QueryParam::Text(product_id.to_string())],
            )
            .await?;

        if rows.len() > 1 {
            // product_id is the primary key; duplicates mean a
            // corrupt store.
            warn!(
                product_id = %product_id,
                matches = rows.len(),
                "Multiple catalog rows for one product identifier"
            );
        }
        rows.into_iter()
            .next()
            .ok_or_else(|| LandsatError::ProductNotFound(product_id.to_string()))
            .and_then(scene_record)
    }
}

/// Drop Landsat 7 scenes sensed on or after the SLC failure date.
///
/// Pure and idempotent; composed after query execution rather than
/// pushed into SQL.
pub fn filter_slc_off(scenes: Vec<SceneRecord>) -> Vec<SceneRecord> {
    scenes
        .into_iter()
        .filter(|scene| {
            let spacecraft_7 = scene.product_id.as_bytes().get(3) == Some(&b'7');
            !(spacecraft_7 && scene.sensing_time.timestamp() >= SLC_FAILURE_TS)
        })
        .collect()
}

fn scene_record(row: SceneRow) -> LandsatResult<SceneRecord> {
    let sensing_time = DateTime::from_timestamp(row.sensing_time, 0).ok_or_else(|| {
        LandsatError::DataReadError(format!(
            "sensing time {} out of range for {}",
            row.sensing_time, row.product_id
        ))
    })?;
    Ok(SceneRecord {
        product_id: row.product_id,
        scene_id: row.scene_id,
        path: row.path,
        row: row.row,
        sensing_time,
        cloud_cover: row.cloud_cover,
        footprint: row.geom,
    })
}

/// Fraction of `aoi` covered by `footprint`, when `aoi` has area.
fn coverage(aoi: &Geometry<f64>, footprint: &Geometry<f64>) -> Option<f64> {
    let aoi_area = aoi.unsigned_area();
    if aoi_area == 0.0 {
        return None;
    }
    let aoi_polys = as_multi_polygon(aoi)?;
    let footprint_polys = as_multi_polygon(footprint)?;
    Some(footprint_polys.intersection(&aoi_polys).unsigned_area() / aoi_area)
}

fn as_multi_polygon(g: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match g {
        Geometry::Polygon(p) => Some(MultiPolygon(vec![p.clone()])),
        Geometry::MultiPolygon(mp) => Some(mp.clone()),
        _ => None,
    }
}
