use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{
    Area, BooleanOps, BoundingRect, Centroid, Coord, Geometry, MultiPolygon, Point, Polygon, Rect,
};
use rstar::AABB;

use crate::model::GeometryError;

/// area below which a polygon is considered empty, in squared coordinate units.
pub const AREA_TOLERANCE: f64 = 1e-12;

/// creates an rtree envelope from the bounding box of a multipolygon.
///
/// since an empty multipolygon has no bounds, the result may be None
///
/// # Arguments
///
/// * `geometry` - value to create an envelope from
///
/// # Returns
///
/// * an envelope if possible, otherwise None
pub fn get_bbox_as_envelope(geometry: &MultiPolygon<f64>) -> Option<AABB<(f64, f64)>> {
    geometry.bounding_rect().map(|r| {
        let (min, max) = (r.min(), r.max());
        AABB::from_corners((min.x, min.y), (max.x, max.y))
    })
}

/// centroid of a multipolygon, None when it has no area.
pub fn centroid(geometry: &MultiPolygon<f64>) -> Option<Point<f64>> {
    if geometry.0.is_empty() {
        return None;
    }
    geometry.centroid()
}

pub fn is_empty_area(geometry: &MultiPolygon<f64>) -> bool {
    geometry.unsigned_area() <= AREA_TOLERANCE
}

/// coerces a provider geometry into a multipolygon. collections are flattened, and
/// non-areal members are rejected.
pub fn to_multipolygon(
    geometry: Geometry<f64>,
    context: &str,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let mp = match geometry {
        Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        Geometry::MultiPolygon(mp) => mp,
        Geometry::Rect(r) => MultiPolygon::new(vec![r.to_polygon()]),
        Geometry::Triangle(t) => MultiPolygon::new(vec![t.to_polygon()]),
        Geometry::GeometryCollection(gc) => {
            let mut polygons: Vec<Polygon<f64>> = vec![];
            for g in gc.0.into_iter() {
                polygons.extend(to_multipolygon(g, context)?.0);
            }
            MultiPolygon::new(polygons)
        }
        other => {
            return Err(GeometryError::InvalidGeometry {
                context: context.to_string(),
                message: format!("expected a polygonal geometry, found {}", type_name(&other)),
            })
        }
    };
    validate_multipolygon(&mp, context)?;
    Ok(mp)
}

/// rejects geometries the boolean operations cannot work with: non-finite
/// coordinates and rings with fewer than 3 distinct positions.
pub fn validate_multipolygon(
    geometry: &MultiPolygon<f64>,
    context: &str,
) -> Result<(), GeometryError> {
    for (idx, polygon) in geometry.0.iter().enumerate() {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors().iter());
        for ring in rings {
            if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(GeometryError::InvalidGeometry {
                    context: context.to_string(),
                    message: format!("polygon {idx} has non-finite coordinates"),
                });
            }
            // closed rings repeat their first coordinate
            if ring.0.len() < 4 {
                return Err(GeometryError::InvalidGeometry {
                    context: context.to_string(),
                    message: format!(
                        "polygon {idx} has a ring with only {} coordinates",
                        ring.0.len()
                    ),
                });
            }
        }
    }
    Ok(())
}

/// union of all geometries. an empty input produces an empty multipolygon.
pub fn dissolve<'a>(
    geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>,
    context: &str,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let mut result = MultiPolygon::new(vec![]);
    for g in geometries {
        result = guarded("union", context, || result.union(g))?;
    }
    Ok(result)
}

pub fn difference(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    context: &str,
) -> Result<MultiPolygon<f64>, GeometryError> {
    if a.0.is_empty() || b.0.is_empty() {
        return Ok(a.clone());
    }
    guarded("difference", context, || a.difference(b))
}

pub fn intersection(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
    context: &str,
) -> Result<MultiPolygon<f64>, GeometryError> {
    if a.0.is_empty() || b.0.is_empty() {
        return Ok(MultiPolygon::new(vec![]));
    }
    guarded("intersection", context, || a.intersection(b))
}

/// expands a rectangle on every side by `ratio` of its larger dimension, using
/// `min_margin` when the rectangle is degenerate.
pub fn expand_rect(rect: &Rect<f64>, ratio: f64, min_margin: f64) -> Rect<f64> {
    let margin = (rect.width().max(rect.height()) * ratio).max(min_margin);
    let (min, max) = (rect.min(), rect.max());
    Rect::new(
        Coord {
            x: min.x - margin,
            y: min.y - margin,
        },
        Coord {
            x: max.x + margin,
            y: max.y + margin,
        },
    )
}

/// smallest rectangle containing both inputs.
pub fn merge_rect(a: Option<Rect<f64>>, b: Rect<f64>) -> Rect<f64> {
    match a {
        None => b,
        Some(a) => Rect::new(
            Coord {
                x: a.min().x.min(b.min().x),
                y: a.min().y.min(b.min().y),
            },
            Coord {
                x: a.max().x.max(b.max().x),
                y: a.max().y.max(b.max().y),
            },
        ),
    }
}

/// runs a boolean operation, turning a panic from the overlay backend into an error
/// that names the operation and the data it was working on.
fn guarded<F>(
    operation: &'static str,
    context: &str,
    op: F,
) -> Result<MultiPolygon<f64>, GeometryError>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| String::from("unknown panic in overlay operation"));
        GeometryError::BooleanOperation {
            operation,
            context: context.to_string(),
            message,
        }
    })
}

/// the overlay backend snaps vertices to a fixed-precision grid scaled to its inputs, so
/// an area computed through a boolean op only matches the exact value to a relative
/// tolerance.
#[cfg(test)]
pub const OVERLAY_RELATIVE_TOLERANCE: f64 = 1e-6;

#[cfg(test)]
pub fn area_matches(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= OVERLAY_RELATIVE_TOLERANCE * expected.abs().max(1.0)
}

fn type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
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
