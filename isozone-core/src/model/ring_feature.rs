use geo::{MultiPolygon, Point};
use serde_json::{Map, Value};

use super::isozone_field::{self as field, get};
use super::{CostValue, GeometryError, IsochroneRecord};
use crate::util::geo_utils;

/// a single output feature. in dissolved and voronoi modes this is a ring, the band of
/// reachability exclusive to one cost value. in raw mode this is a provider isochrone
/// with its origin attached.
#[derive(Clone, Debug, PartialEq)]
pub struct RingFeature {
    pub geometry: MultiPolygon<f64>,
    pub cost_value: CostValue,
    /// none when the geometry is empty
    pub centroid: Option<Point<f64>>,
    pub group_key: Option<Value>,
    pub cell_id: Option<usize>,
    pub point_id: Option<usize>,
    pub origin: Option<Point<f64>>,
    pub metadata: Map<String, Value>,
}

impl RingFeature {
    /// creates a ring for a cost value, computing its centroid.
    pub fn ring(
        cost_value: CostValue,
        geometry: MultiPolygon<f64>,
        group_key: Option<Value>,
    ) -> RingFeature {
        let centroid = geo_utils::centroid(&geometry);
        RingFeature {
            geometry,
            cost_value,
            centroid,
            group_key,
            cell_id: None,
            point_id: None,
            origin: None,
            metadata: Map::new(),
        }
    }

    pub fn with_cell_id(mut self, cell_id: usize) -> RingFeature {
        self.cell_id = Some(cell_id);
        self
    }

    pub fn to_feature(&self) -> geojson::Feature {
        let mut props = Map::new();
        props.insert(field::COST_VALUE.to_string(), Value::from(self.cost_value.0));
        let (x, y) = match self.centroid {
            Some(c) => (Value::from(c.x()), Value::from(c.y())),
            None => (Value::Null, Value::Null),
        };
        props.insert(field::X_CENTROID.to_string(), x);
        props.insert(field::Y_CENTROID.to_string(), y);
        props.insert(
            field::GROUP_KEY.to_string(),
            self.group_key.clone().unwrap_or(Value::Null),
        );
        if let Some(cell_id) = self.cell_id {
            props.insert(field::CELL_ID.to_string(), Value::from(cell_id));
        }
        if let Some(point_id) = self.point_id {
            props.insert(field::POINT_ID.to_string(), Value::from(point_id));
        }
        if let Some(origin) = self.origin {
            props.insert(field::X_ORIGIN.to_string(), Value::from(origin.x()));
            props.insert(field::Y_ORIGIN.to_string(), Value::from(origin.y()));
        }
        for (k, v) in self.metadata.iter() {
            if field::is_reserved(k) {
                log::debug!("dropping provider metadata '{k}' which collides with an output field");
            } else {
                props.insert(k.clone(), v.clone());
            }
        }
        let geometry = geojson::Geometry::new(geojson::Value::from(&self.geometry));
        geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

impl From<&IsochroneRecord> for RingFeature {
    fn from(record: &IsochroneRecord) -> Self {
        RingFeature {
            geometry: record.geometry.clone(),
            cost_value: record.cost_value,
            centroid: geo_utils::centroid(&record.geometry),
            group_key: record.group_key.clone(),
            cell_id: None,
            point_id: Some(record.point_id),
            origin: Some(record.origin),
            metadata: record.metadata.clone(),
        }
    }
}

impl TryFrom<&geojson::Feature> for RingFeature {
    type Error = GeometryError;

    fn try_from(feature: &geojson::Feature) -> Result<Self, Self::Error> {
        let props = feature.properties.clone().unwrap_or_default();
        let cost_value = CostValue(get::required_i64(&props, field::COST_VALUE)?);
        let context = format!("feature with cost value {cost_value}");
        let geometry = match &feature.geometry {
            Some(g) => {
                let geo_geometry = geo::Geometry::<f64>::try_from(g.clone()).map_err(|e| {
                    GeometryError::FeatureDecoding(format!(
                        "failure converting GeoJSON geometry of {context}: {e}"
                    ))
                })?;
                geo_utils::to_multipolygon(geo_geometry, &context)?
            }
            None => MultiPolygon::new(vec![]),
        };
        let centroid = match (
            get::optional_f64(&props, field::X_CENTROID)?,
            get::optional_f64(&props, field::Y_CENTROID)?,
        ) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };
        let origin = match (
            get::optional_f64(&props, field::X_ORIGIN)?,
            get::optional_f64(&props, field::Y_ORIGIN)?,
        ) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        };
        let metadata = props
            .iter()
            .filter(|(k, _)| !field::is_reserved(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect::<Map<_, _>>();
        Ok(RingFeature {
            geometry,
            cost_value,
            centroid,
            group_key: get::group_key(&props),
            cell_id: get::optional_usize(&props, field::CELL_ID)?,
            point_id: get::optional_usize(&props, field::POINT_ID)?,
            origin,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RingFeature;
    use crate::model::{CostValue, IsochroneRecord, Origin};
    use geo::{polygon, MultiPolygon};
    use serde_json::{json, Map};

    fn square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 0.0),
        ]])
    }

    #[test]
    fn test_ring_has_centroid() {
        let ring = RingFeature::ring(CostValue(5), square(), None);
        let c = ring.centroid.expect("square has a centroid");
        assert!((c.x() - 1.0).abs() < 1e-9);
        assert!((c.y() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_ring_has_no_centroid() {
        let ring = RingFeature::ring(CostValue(5), MultiPolygon::new(vec![]), None);
        assert!(ring.centroid.is_none());
        let feature = ring.to_feature();
        let props = feature.properties.expect("properties written");
        assert_eq!(props.get("x_centroid"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_group_key_present_when_missing() {
        let ring = RingFeature::ring(CostValue(5), square(), None);
        let props = ring.to_feature().properties.expect("properties written");
        assert_eq!(props.get("group_key"), Some(&serde_json::Value::Null));
        assert!(props.get("cell_id").is_none());
    }

    #[test]
    fn test_raw_feature_reads_back_as_record() {
        let origin = Origin::new(4, 1.0, 1.0, Some(json!("abc")));
        let mut metadata = Map::new();
        metadata.insert(String::from("area"), json!(12.5));
        metadata.insert(String::from("cost_value"), json!(999));
        let record = IsochroneRecord::new(&origin, CostValue(10), square(), metadata);
        let feature = RingFeature::from(&record).to_feature();
        let props = feature.properties.clone().expect("properties written");
        // provider metadata never overwrites output fields
        assert_eq!(props.get("cost_value"), Some(&json!(10)));
        assert_eq!(props.get("area"), Some(&json!(12.5)));

        let decoded = RingFeature::try_from(&feature).expect("decodes");
        let back = IsochroneRecord::try_from(&decoded).expect("raw feature has origin");
        assert_eq!(back.point_id, 4);
        assert_eq!(back.cost_value, CostValue(10));
        assert_eq!(back.group_key, Some(json!("abc")));
        assert_eq!(back.origin, origin.point);
        assert_eq!(back.metadata.get("area"), Some(&json!(12.5)));
    }

    #[test]
    fn test_ring_without_origin_is_not_a_record() {
        let ring = RingFeature::ring(CostValue(5), square(), None);
        assert!(IsochroneRecord::try_from(&ring).is_err());
    }
}
