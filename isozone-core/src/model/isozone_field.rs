//! Property names written to the GeoJSON features produced by isozone runs.
//!
//! # Examples
//!
//! ### Ring (dissolved or voronoi partitioned)
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "MultiPolygon", "coordinates": [] },
//!   "properties": {
//!     "cost_value": 10,
//!     "x_centroid": 2.35,
//!     "y_centroid": 48.85,
//!     "group_key": "site-a",
//!     "cell_id": 0
//!   }
//! }
//! ```
//!
//! ### Raw isochrone
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "Polygon", "coordinates": [] },
//!   "properties": {
//!     "cost_value": 10,
//!     "x_centroid": 2.35,
//!     "y_centroid": 48.85,
//!     "group_key": null,
//!     "point_id": 3,
//!     "x_origin": 2.34,
//!     "y_origin": 48.86,
//!     "area": 1532.0
//!   }
//! }
//! ```
//!
//! `cell_id` is only written in voronoi mode. the origin fields are only written for
//! raw isochrones. any other property is provider metadata passed through as-is.

pub const COST_VALUE: &str = "cost_value";
pub const X_CENTROID: &str = "x_centroid";
pub const Y_CENTROID: &str = "y_centroid";
pub const GROUP_KEY: &str = "group_key";
pub const CELL_ID: &str = "cell_id";
pub const POINT_ID: &str = "point_id";
pub const POINT_IDS: &str = "point_ids";
pub const X_ORIGIN: &str = "x_origin";
pub const Y_ORIGIN: &str = "y_origin";

/// names that provider metadata may not overwrite.
pub const RESERVED: [&str; 8] = [
    COST_VALUE, X_CENTROID, Y_CENTROID, GROUP_KEY, CELL_ID, POINT_ID, X_ORIGIN, Y_ORIGIN,
];

pub fn is_reserved(key: &str) -> bool {
    RESERVED.contains(&key)
}

pub mod get {
    use serde_json::{Map, Value};

    use crate::model::GeometryError;

    pub fn required_i64(props: &Map<String, Value>, key: &str) -> Result<i64, GeometryError> {
        props
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                GeometryError::FeatureDecoding(format!("missing integer property '{key}'"))
            })
    }

    pub fn optional_f64(
        props: &Map<String, Value>,
        key: &str,
    ) -> Result<Option<f64>, GeometryError> {
        match props.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                GeometryError::FeatureDecoding(format!("property '{key}' is not a number: {v}"))
            }),
        }
    }

    pub fn optional_usize(
        props: &Map<String, Value>,
        key: &str,
    ) -> Result<Option<usize>, GeometryError> {
        match props.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(|| {
                    GeometryError::FeatureDecoding(format!(
                        "property '{key}' is not a non-negative integer: {v}"
                    ))
                }),
        }
    }

    /// group keys are arbitrary JSON values, null reads as no key.
    pub fn group_key(props: &Map<String, Value>) -> Option<Value> {
        match props.get(super::GROUP_KEY) {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.clone()),
        }
    }
}
