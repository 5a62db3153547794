pub mod ring;
pub mod voronoi;
