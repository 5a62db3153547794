use geo::{BoundingRect, MultiPoint, Point, Rect};

use crate::util::geo_utils;

/// fraction of the larger extent added around the diagram
pub const ENVELOPE_MARGIN_RATIO: f64 = 0.1;
/// margin used when every input shares a coordinate
pub const ENVELOPE_MIN_MARGIN: f64 = 0.01;

/// the finite rectangle that stands in for the plane when building cells. it covers the
/// points and any additional extents (record geometries, clip boundary), expanded on
/// every side so that no input touches the edge.
pub fn diagram_envelope(points: &[Point<f64>], extents: &[Rect<f64>]) -> Option<Rect<f64>> {
    let mut rect = MultiPoint::new(points.to_vec()).bounding_rect();
    for extent in extents.iter() {
        rect = Some(geo_utils::merge_rect(rect, *extent));
    }
    rect.map(|r| geo_utils::expand_rect(&r, ENVELOPE_MARGIN_RATIO, ENVELOPE_MIN_MARGIN))
}
