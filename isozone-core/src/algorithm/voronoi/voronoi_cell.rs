use geo::{MultiPolygon, Point};
use serde_json::{Map, Value};

use crate::model::isozone_field as field;

/// one polygon of the tessellation, owned by every input point at its generator.
#[derive(Clone, Debug, PartialEq)]
pub struct VoronoiCell {
    /// the smallest point id among the points at the generator
    pub cell_id: usize,
    pub generator: Point<f64>,
    pub point_ids: Vec<usize>,
    pub group_key: Option<Value>,
    pub geometry: MultiPolygon<f64>,
}

impl VoronoiCell {
    pub fn to_feature(&self) -> geojson::Feature {
        let mut props = Map::new();
        props.insert(field::CELL_ID.to_string(), Value::from(self.cell_id));
        props.insert(
            field::POINT_IDS.to_string(),
            Value::from(self.point_ids.clone()),
        );
        props.insert(field::X_ORIGIN.to_string(), Value::from(self.generator.x()));
        props.insert(field::Y_ORIGIN.to_string(), Value::from(self.generator.y()));
        props.insert(
            field::GROUP_KEY.to_string(),
            self.group_key.clone().unwrap_or(Value::Null),
        );
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geometry))),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}
