use geo::MultiPolygon;
use geojson::GeoJson;
use isozone_core::util::geo_utils;
use wkt::TryFromWkt;

use crate::error::IsochroneError;

/// reads a clip polygon from a GeoJSON (.geojson, .json) or WKT (.wkt) file. every
/// polygon in a feature collection is unioned into one boundary.
pub fn read_clip_geometry(path: &str) -> Result<MultiPolygon<f64>, IsochroneError> {
    log::info!("reading clip boundary from {path}");
    let text = std::fs::read_to_string(path).map_err(|e| IsochroneError::io(path, e))?;
    let context = format!("clip boundary {path}");
    if path.ends_with(".wkt") {
        parse_wkt(&text, &context)
    } else if path.ends_with(".geojson") || path.ends_with(".json") {
        parse_geojson(&text, &context)
    } else {
        Err(IsochroneError::InvalidInput(format!(
            "unsupported clip boundary file type: {path}, expected .geojson, .json or .wkt"
        )))
    }
}

pub fn parse_wkt(text: &str, context: &str) -> Result<MultiPolygon<f64>, IsochroneError> {
    let geometry = geo::Geometry::<f64>::try_from_wkt_str(text.trim()).map_err(|e| {
        IsochroneError::InvalidInput(format!("failure parsing WKT for {context}: {e}"))
    })?;
    Ok(geo_utils::to_multipolygon(geometry, context)?)
}

pub fn parse_geojson(text: &str, context: &str) -> Result<MultiPolygon<f64>, IsochroneError> {
    let geojson = text.parse::<GeoJson>().map_err(|e| {
        IsochroneError::InvalidInput(format!("failure parsing GeoJSON for {context}: {e}"))
    })?;
    let geometries = match geojson {
        GeoJson::Geometry(g) => vec![g],
        GeoJson::Feature(f) => f.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(fc) => {
            fc.features.into_iter().filter_map(|f| f.geometry).collect()
        }
    };
    if geometries.is_empty() {
        return Err(IsochroneError::InvalidInput(format!(
            "{context} contains no geometry"
        )));
    }
    let mut parts = Vec::with_capacity(geometries.len());
    for g in geometries.into_iter() {
        let geometry = geo::Geometry::<f64>::try_from(g).map_err(|e| {
            IsochroneError::InvalidInput(format!("unsupported geometry in {context}: {e}"))
        })?;
        parts.push(geo_utils::to_multipolygon(geometry, context)?);
    }
    if parts.len() == 1 {
        return Ok(parts.remove(0));
    }
    Ok(geo_utils::dissolve(parts.iter(), context)?)
}
