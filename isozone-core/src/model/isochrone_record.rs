use geo::{MultiPolygon, Point};
use serde_json::{Map, Value};

use super::{CostValue, GeometryError, Origin, RingFeature};

/// one isochrone polygon returned by a provider for one (origin, cost value) pair.
#[derive(Clone, Debug)]
pub struct IsochroneRecord {
    pub point_id: usize,
    pub origin: Point<f64>,
    pub cost_value: CostValue,
    pub group_key: Option<Value>,
    pub geometry: MultiPolygon<f64>,
    /// provider fields (area, reachfactor, ..) passed through unmodified
    pub metadata: Map<String, Value>,
}

impl IsochroneRecord {
    pub fn new(
        origin: &Origin,
        cost_value: CostValue,
        geometry: MultiPolygon<f64>,
        metadata: Map<String, Value>,
    ) -> IsochroneRecord {
        IsochroneRecord {
            point_id: origin.point_id,
            origin: origin.point,
            cost_value,
            group_key: origin.group_key.clone(),
            geometry,
            metadata,
        }
    }

    /// rebuilds the origin this record was requested for.
    pub fn to_origin(&self) -> Origin {
        Origin {
            point_id: self.point_id,
            point: self.origin,
            group_key: self.group_key.clone(),
        }
    }

    /// label used in logs and error messages.
    pub fn describe(&self) -> String {
        format!(
            "point {} ({},{}) at cost {}",
            self.point_id,
            self.origin.x(),
            self.origin.y(),
            self.cost_value
        )
    }
}

/// a raw feature (as written in raw processing mode) can be read back as a record
/// so that a previous run can be post-processed again.
impl TryFrom<&RingFeature> for IsochroneRecord {
    type Error = GeometryError;

    fn try_from(feature: &RingFeature) -> Result<Self, Self::Error> {
        let point_id = feature.point_id.ok_or_else(|| {
            GeometryError::FeatureDecoding(String::from(
                "raw isochrone feature is missing its point id",
            ))
        })?;
        let origin = feature.origin.ok_or_else(|| {
            GeometryError::FeatureDecoding(format!(
                "raw isochrone feature for point {point_id} is missing its origin coordinates"
            ))
        })?;
        Ok(IsochroneRecord {
            point_id,
            origin,
            cost_value: feature.cost_value,
            group_key: feature.group_key.clone(),
            geometry: feature.geometry.clone(),
            metadata: feature.metadata.clone(),
        })
    }
}
