use std::fmt::Display;
use std::str::FromStr;

use geo::{Area, BoundingRect, ConvexHull, MultiPoint, MultiPolygon, Point};
use serde::{Deserialize, Serialize};

use crate::model::GeometryError;
use crate::util::geo_utils;

/// how a clip geometry is applied to the voronoi cells.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClipMode {
    /// clip to the geometry itself
    #[default]
    Polygon,
    BoundingBox,
    ConvexHull,
}

impl Display for ClipMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClipMode::Polygon => "polygon",
            ClipMode::BoundingBox => "bounding_box",
            ClipMode::ConvexHull => "convex_hull",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ClipMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polygon" => Ok(ClipMode::Polygon),
            "bounding_box" | "bbox" => Ok(ClipMode::BoundingBox),
            "convex_hull" => Ok(ClipMode::ConvexHull),
            other => Err(format!(
                "unknown clip mode '{other}', expected one of polygon, bounding_box, convex_hull"
            )),
        }
    }
}

/// a boundary applied to every voronoi cell before fragments are computed.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipBoundary {
    pub geometry: MultiPolygon<f64>,
    pub mode: ClipMode,
}

impl ClipBoundary {
    pub fn new(geometry: MultiPolygon<f64>, mode: ClipMode) -> ClipBoundary {
        ClipBoundary { geometry, mode }
    }

    /// builds a boundary around the input points. only the bounding box and convex hull
    /// modes are meaningful here.
    pub fn from_points(
        points: &[Point<f64>],
        mode: ClipMode,
    ) -> Result<ClipBoundary, GeometryError> {
        let mp = MultiPoint::new(points.to_vec());
        let geometry = match mode {
            ClipMode::Polygon => {
                return Err(GeometryError::InvalidClipBoundary(String::from(
                    "a clip boundary derived from points must use bounding_box or convex_hull",
                )))
            }
            ClipMode::BoundingBox => {
                let rect = mp.bounding_rect().ok_or_else(|| {
                    GeometryError::InvalidClipBoundary(String::from(
                        "cannot compute a bounding box without points",
                    ))
                })?;
                MultiPolygon::new(vec![rect.to_polygon()])
            }
            ClipMode::ConvexHull => MultiPolygon::new(vec![mp.convex_hull()]),
        };
        let boundary = ClipBoundary { geometry, mode };
        boundary.resolve()?;
        Ok(boundary)
    }

    /// the polygon cells are intersected with, after applying the clip mode.
    pub fn resolve(&self) -> Result<MultiPolygon<f64>, GeometryError> {
        geo_utils::validate_multipolygon(&self.geometry, "clip boundary")?;
        let resolved = match self.mode {
            ClipMode::Polygon => self.geometry.clone(),
            ClipMode::BoundingBox => match self.geometry.bounding_rect() {
                Some(rect) => MultiPolygon::new(vec![rect.to_polygon()]),
                None => MultiPolygon::new(vec![]),
            },
            ClipMode::ConvexHull => MultiPolygon::new(vec![self.geometry.convex_hull()]),
        };
        let area = resolved.unsigned_area();
        if area <= geo_utils::AREA_TOLERANCE {
            return Err(GeometryError::InvalidClipBoundary(format!(
                "{} clip boundary has no area ({area})",
                self.mode
            )));
        }
        Ok(resolved)
    }
}
