mod clip_boundary;
mod envelope;
mod half_plane;
mod voronoi_cell;
mod voronoi_diagram;
pub mod voronoi_partition;

pub use clip_boundary::{ClipBoundary, ClipMode};
pub use envelope::diagram_envelope;
pub use voronoi_cell::VoronoiCell;
pub use voronoi_diagram::VoronoiDiagram;
