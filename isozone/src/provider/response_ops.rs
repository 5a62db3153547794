use geo::MultiPolygon;
use isozone_core::util::geo_utils;
use serde_json::Value;

use crate::error::IsochroneError;

pub fn parse_json(body: &str, label: &str) -> Result<Value, IsochroneError> {
    serde_json::from_str(body)
        .map_err(|e| IsochroneError::malformed(label, format!("response is not valid JSON: {e}")))
}

/// decodes a GeoJSON geometry object into a multipolygon.
pub fn geometry_from_json(value: &Value, label: &str) -> Result<MultiPolygon<f64>, IsochroneError> {
    let geometry: geojson::Geometry = serde_json::from_value(value.clone()).map_err(|e| {
        IsochroneError::malformed(label, format!("response geometry is not GeoJSON: {e}"))
    })?;
    let geometry = geo::Geometry::<f64>::try_from(geometry).map_err(|e| {
        IsochroneError::malformed(label, format!("unsupported response geometry: {e}"))
    })?;
    let multipolygon = geo_utils::to_multipolygon(geometry, label)?;
    Ok(multipolygon)
}
