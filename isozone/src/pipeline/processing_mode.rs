use std::fmt::Display;

use isozone_core::algorithm::voronoi::ClipBoundary;

/// post-processing applied to collected isochrones.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ProcessingMode {
    /// one ring per cost value across all points
    #[default]
    Dissolved,
    /// provider isochrones as returned, one feature per (point, cost value)
    Raw,
    /// rings per voronoi cell of the input points
    VoronoiPartitioned { clip: Option<ClipBoundary> },
}

impl Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingMode::Dissolved => write!(f, "dissolved"),
            ProcessingMode::Raw => write!(f, "raw"),
            ProcessingMode::VoronoiPartitioned { clip: None } => write!(f, "voronoi_partitioned"),
            ProcessingMode::VoronoiPartitioned { clip: Some(c) } => {
                write!(f, "voronoi_partitioned (clip mode {})", c.mode)
            }
        }
    }
}
