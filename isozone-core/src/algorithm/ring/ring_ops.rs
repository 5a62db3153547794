use std::collections::BTreeMap;

use itertools::Itertools;
use serde_json::Value;

use super::DissolvedBand;
use crate::model::{CostValue, CostValues, GeometryError, IsochroneRecord, RingFeature};
use crate::util::geo_utils;

/// unions the records of each cost value into one band, ascending by cost value.
///
/// a cost value without records produces an empty band. records with a cost value
/// outside of the run's cost values are ignored.
///
/// # Arguments
///
/// * `records` - isochrones collected for the run
/// * `cost_values` - the run's cost values
///
/// # Returns
///
/// * one band per cost value, in ascending order
pub fn dissolve_bands(
    records: &[IsochroneRecord],
    cost_values: &CostValues,
) -> Result<Vec<DissolvedBand>, GeometryError> {
    let mut by_cost: BTreeMap<CostValue, Vec<&IsochroneRecord>> = BTreeMap::new();
    for record in records.iter() {
        if cost_values.contains(&record.cost_value) {
            by_cost.entry(record.cost_value).or_default().push(record);
        } else {
            log::warn!(
                "ignoring isochrone for {} which is not one of the run's cost values {}",
                record.describe(),
                cost_values
            );
        }
    }

    cost_values
        .ascending()
        .iter()
        .map(|cost_value| match by_cost.get(cost_value) {
            None => {
                log::warn!("no isochrones found for cost value {cost_value}, band is empty");
                Ok(DissolvedBand::empty(*cost_value))
            }
            Some(group) => {
                let context = format!("dissolved band for cost value {cost_value}");
                let geometry = geo_utils::dissolve(group.iter().map(|r| &r.geometry), &context)?;
                let group_key = shared_group_key(group.iter().map(|r| &r.group_key));
                Ok(DissolvedBand {
                    cost_value: *cost_value,
                    geometry,
                    group_key,
                })
            }
        })
        .collect()
}

/// computes the rings of a run: the smallest band is kept whole and every other band
/// loses the band just below it.
///
/// # Arguments
///
/// * `records` - isochrones collected for the run
/// * `cost_values` - the run's cost values
///
/// # Returns
///
/// * exactly one ring per cost value, ascending
pub fn difference_rings(
    records: &[IsochroneRecord],
    cost_values: &CostValues,
) -> Result<Vec<RingFeature>, GeometryError> {
    let bands = dissolve_bands(records, cost_values)?;
    let mut rings = Vec::with_capacity(bands.len());
    if let Some(first) = bands.first() {
        rings.push(first.clone().into_ring());
    }
    for (smaller, larger) in bands.iter().tuple_windows() {
        let context = format!(
            "ring for cost value {} minus cost value {}",
            larger.cost_value, smaller.cost_value
        );
        let ring = larger.minus(smaller, &context)?;
        log::debug!(
            "ring for cost value {} has {} polygon(s)",
            ring.cost_value,
            ring.geometry.0.len()
        );
        rings.push(ring.into_ring());
    }
    Ok(rings)
}

/// the group key shared by every contributor, or None if they disagree.
pub fn shared_group_key<'a>(keys: impl IntoIterator<Item = &'a Option<Value>>) -> Option<Value> {
    let mut keys = keys.into_iter();
    let first = keys.next()?;
    if keys.all(|k| k == first) {
        first.clone()
    } else {
        None
    }
}
