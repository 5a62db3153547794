use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("invalid cost values: {0}")]
    InvalidCostValues(String),
    #[error("invalid geometry for {context}: {message}")]
    InvalidGeometry { context: String, message: String },
    #[error("{operation} failed for {context}: {message}")]
    BooleanOperation {
        operation: &'static str,
        context: String,
        message: String,
    },
    #[error("unable to build voronoi diagram: {0}")]
    VoronoiConstruction(String),
    #[error("invalid clip boundary: {0}")]
    InvalidClipBoundary(String),
    #[error("failure decoding feature: {0}")]
    FeatureDecoding(String),
}
