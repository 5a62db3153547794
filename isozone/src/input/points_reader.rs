use geojson::GeoJson;
use isozone_core::model::Origin;
use serde_json::Value;

use crate::error::IsochroneError;

/// reads a GeoJSON file of point features in WGS84.
///
/// # Arguments
///
/// * `path` - file to read
/// * `group_key_field` - optional property copied onto every output feature derived
///   from each point
///
/// # Returns
///
/// * one origin per feature, point ids numbered in file order
pub fn read_points(path: &str, group_key_field: Option<&str>) -> Result<Vec<Origin>, IsochroneError> {
    log::info!("reading points from {path}");
    let text = std::fs::read_to_string(path).map_err(|e| IsochroneError::io(path, e))?;
    parse_points(&text, group_key_field)
        .map_err(|e| IsochroneError::InvalidInput(format!("{path}: {e}")))
}

pub fn parse_points(text: &str, group_key_field: Option<&str>) -> Result<Vec<Origin>, String> {
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|e| format!("failure parsing GeoJSON: {e}"))?;
    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            return Err(String::from(
                "expected a Feature or FeatureCollection of points, found a bare geometry",
            ))
        }
    };
    if features.is_empty() {
        return Err(String::from("no point features found"));
    }

    let mut origins = Vec::with_capacity(features.len());
    let mut missing_keys = 0;
    for (point_id, feature) in features.iter().enumerate() {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| format!("feature {point_id} has no geometry"))?;
        let (x, y) = match &geometry.value {
            geojson::Value::Point(position) if position.len() >= 2 => (position[0], position[1]),
            other => {
                return Err(format!(
                    "feature {point_id} must be a Point, found {}",
                    geometry_type(other)
                ))
            }
        };
        if !x.is_finite() || !y.is_finite() {
            return Err(format!("feature {point_id} has non-finite coordinates"));
        }
        let group_key = match group_key_field {
            None => None,
            Some(field) => match feature.property(field) {
                Some(Value::Null) | None => {
                    missing_keys += 1;
                    None
                }
                Some(v) => Some(v.clone()),
            },
        };
        origins.push(Origin::new(point_id, x, y, group_key));
    }
    if let Some(field) = group_key_field {
        if missing_keys > 0 {
            log::warn!("{missing_keys} point(s) have no '{field}' property, their group key is null");
        }
    }
    log::debug!("read {} points", origins.len());
    Ok(origins)
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::parse_points;
    use serde_json::json;

    const POINTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "a"}, "geometry": {"type": "Point", "coordinates": [2.35, 48.85]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [2.29, 48.86]}}
        ]
    }"#;

    #[test]
    fn test_parse_points_with_group_key() {
        let origins = parse_points(POINTS, Some("name")).expect("valid points");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].point_id, 0);
        assert_eq!(origins[0].group_key, Some(json!("a")));
        assert_eq!(origins[1].group_key, None);
        assert_eq!(origins[1].x(), 2.29);
    }

    #[test]
    fn test_rejects_non_points() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
        ]}"#;
        assert!(parse_points(text, None).is_err());
    }

    #[test]
    fn test_rejects_empty_collection() {
        let text = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(parse_points(text, None).is_err());
    }
}
