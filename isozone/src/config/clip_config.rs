use isozone_core::algorithm::voronoi::{ClipBoundary, ClipMode};
use isozone_core::model::Origin;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::IsochroneError;
use crate::input::clip_reader;

/// where a voronoi clip geometry comes from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ClipSource {
    /// a GeoJSON or WKT polygon file
    File { path: String },
    /// the input points themselves, only with bounding_box or convex_hull
    Points,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClipConfig {
    pub source: ClipSource,
    #[serde(default)]
    pub mode: ClipMode,
}

impl ClipConfig {
    pub fn build(&self, origins: &[Origin]) -> Result<ClipBoundary, IsochroneError> {
        let boundary = match &self.source {
            ClipSource::File { path } => {
                let geometry = clip_reader::read_clip_geometry(path)?;
                ClipBoundary::new(geometry, self.mode)
            }
            ClipSource::Points => {
                let points = origins.iter().map(|o| o.point).collect_vec();
                ClipBoundary::from_points(&points, self.mode)?
            }
        };
        boundary.resolve()?;
        Ok(boundary)
    }
}
