//! Geometry interchange helpers.
//!
//! Geometries cross the datastore boundary as well-known text with a
//! fixed coordinate precision of 8 decimal digits, so identical
//! footprints always serialize byte-for-byte identically.

use geo::{BoundingRect, Coord, Geometry, LineString, Polygon, Rect};
use wkt::TryFromWkt;

use crate::error::{LandsatError, LandsatResult};

/// Parse a WKT string into a geometry.
pub fn from_wkt(s: &str) -> LandsatResult<Geometry<f64>> {
    Geometry::try_from_wkt_str(s)
        .map_err(|e| LandsatError::GeometryError(format!("WKT parse failed: {}", e)))
}

/// Serialize a geometry to WKT with 8 decimal digits per coordinate.
///
/// Covers the geometry types that occur in the catalog: points and
/// lines of interest, and (multi)polygon footprints.
pub fn to_wkt(geom: &Geometry<f64>) -> LandsatResult<String> {
    match geom {
        Geometry::Point(p) => Ok(format!("POINT ({})", coord(&p.0))),
        Geometry::LineString(ls) => Ok(format!("LINESTRING {}", ring(ls))),
        Geometry::Polygon(p) => Ok(format!("POLYGON {}", polygon(p))),
        Geometry::MultiPolygon(mp) => {
            let polys: Vec<String> = mp.0.iter().map(polygon).collect();
            Ok(format!("MULTIPOLYGON ({})", polys.join(", ")))
        }
        other => Err(LandsatError::GeometryError(format!(
            "unsupported geometry type: {:?}",
            geometry_kind(other)
        ))),
    }
}

/// Axis-aligned bounding rectangle of a geometry.
///
/// Fails for empty geometries, which have no extent.
pub fn bounding_rect(geom: &Geometry<f64>) -> LandsatResult<Rect<f64>> {
    geom.bounding_rect()
        .ok_or_else(|| LandsatError::GeometryError("geometry has no extent".to_string()))
}

fn coord(c: &Coord<f64>) -> String {
    format!("{:.8} {:.8}", c.x, c.y)
}

fn ring(ls: &LineString<f64>) -> String {
    let coords: Vec<String> = ls.coords().map(coord).collect();
    format!("({})", coords.join(", "))
}

fn polygon(p: &Polygon<f64>) -> String {
    let mut rings = vec![ring(p.exterior())];
    rings.extend(p.interiors().iter().map(ring));
    format!("({})", rings.join(", "))
}

fn geometry_kind(geom: &Geometry<f64>) -> &'static str {
    match geom {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Point};

    #[test]
    fn test_wkt_fixed_precision() {
        let p = Geometry::Point(Point::new(12.5, -3.0));
        assert_eq!(to_wkt(&p).unwrap(), "POINT (12.50000000 -3.00000000)");
    }

    #[test]
    fn test_wkt_round_trip_polygon() {
        let poly: Polygon<f64> = polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 4.0, y: 4.0),
            (x: 0.0, y: 4.0),
            (x: 0.0, y: 0.0),
        ];
        let text = to_wkt(&Geometry::Polygon(poly.clone())).unwrap();
        assert!(text.starts_with("POLYGON (("));
        let parsed = from_wkt(&text).unwrap();
        assert_eq!(parsed, Geometry::Polygon(poly));
    }

    #[test]
    fn test_from_wkt_rejects_garbage() {
        assert!(from_wkt("POLYGON ((not numbers))").is_err());
    }

    #[test]
    fn test_bounding_rect() {
        let g = from_wkt("POLYGON ((0 0, 4 0, 4 2, 0 2, 0 0))").unwrap();
        let rect = bounding_rect(&g).unwrap();
        assert_eq!(rect.min().x, 0.0);
        assert_eq!(rect.max().x, 4.0);
        assert_eq!(rect.max().y, 2.0);
    }
}
