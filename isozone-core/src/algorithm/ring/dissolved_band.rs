use geo::MultiPolygon;
use serde_json::Value;

use crate::model::{CostValue, GeometryError, RingFeature};
use crate::util::geo_utils;

/// union of every isochrone that shares a cost value, either across the whole run or
/// within a single voronoi cell.
#[derive(Clone, Debug)]
pub struct DissolvedBand {
    pub cost_value: CostValue,
    pub geometry: MultiPolygon<f64>,
    pub group_key: Option<Value>,
}

impl DissolvedBand {
    pub fn empty(cost_value: CostValue) -> DissolvedBand {
        DissolvedBand {
            cost_value,
            geometry: MultiPolygon::new(vec![]),
            group_key: None,
        }
    }

    /// the part of this band not covered by a smaller band.
    pub fn minus(
        &self,
        smaller: &DissolvedBand,
        context: &str,
    ) -> Result<DissolvedBand, GeometryError> {
        let geometry = geo_utils::difference(&self.geometry, &smaller.geometry, context)?;
        Ok(DissolvedBand {
            cost_value: self.cost_value,
            geometry,
            group_key: self.group_key.clone(),
        })
    }

    pub fn into_ring(self) -> RingFeature {
        RingFeature::ring(self.cost_value, self.geometry, self.group_key)
    }
}
