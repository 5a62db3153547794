use std::collections::BTreeMap;

use geo::{BoundingRect, Intersects, MultiPolygon, Rect};
use itertools::Itertools;
use serde_json::Value;

use super::{ClipBoundary, VoronoiDiagram};
use crate::algorithm::ring::{ring_ops, DissolvedBand};
use crate::model::{CostValue, CostValues, GeometryError, IsochroneRecord, Origin, RingFeature};
use crate::util::geo_utils;

/// the part of one record that falls within one voronoi cell.
#[derive(Clone, Debug)]
pub struct Fragment {
    pub cell_id: usize,
    pub cost_value: CostValue,
    pub group_key: Option<Value>,
    pub geometry: MultiPolygon<f64>,
}

/// assigns every isochrone to the voronoi cell of the point it was computed for, then
/// computes rings within each cell.
///
/// # Arguments
///
/// * `records` - isochrones collected for the run
/// * `cost_values` - the run's cost values
/// * `origins` - the run's input points, used as voronoi generators
/// * `clip` - optional boundary applied to every cell
///
/// # Returns
///
/// * rings tagged with their cell id. cells without fragments produce nothing.
pub fn partition(
    records: &[IsochroneRecord],
    cost_values: &CostValues,
    origins: &[Origin],
    clip: Option<&ClipBoundary>,
) -> Result<Vec<RingFeature>, GeometryError> {
    let clip_geometry = clip.map(|c| c.resolve()).transpose()?;
    let extents = records
        .iter()
        .filter_map(|r| r.geometry.bounding_rect())
        .collect::<Vec<Rect<f64>>>();
    let diagram = VoronoiDiagram::build(origins, clip_geometry.as_ref(), &extents)?;
    let fragments = fragments(records, cost_values, &diagram)?;
    log::info!(
        "voronoi partition kept {} fragments from {} isochrones across {} cells",
        fragments.len(),
        records.len(),
        diagram.len()
    );
    cell_rings(fragments, cost_values)
}

/// intersects each record with the cells it overlaps. a fragment is kept only when it
/// contains, or touches, the point that generated its record.
pub fn fragments(
    records: &[IsochroneRecord],
    cost_values: &CostValues,
    diagram: &VoronoiDiagram,
) -> Result<Vec<Fragment>, GeometryError> {
    let mut result = vec![];
    for record in records.iter() {
        if !cost_values.contains(&record.cost_value) {
            log::warn!(
                "ignoring isochrone for {} which is not one of the run's cost values {}",
                record.describe(),
                cost_values
            );
            continue;
        }
        let envelope = match geo_utils::get_bbox_as_envelope(&record.geometry) {
            Some(env) => env,
            None => continue,
        };
        for cell in diagram.candidates(&envelope) {
            let context = format!("{} within voronoi cell {}", record.describe(), cell.cell_id);
            let geometry = geo_utils::intersection(&record.geometry, &cell.geometry, &context)?;
            if geo_utils::is_empty_area(&geometry) || !geometry.intersects(&record.origin) {
                continue;
            }
            result.push(Fragment {
                cell_id: cell.cell_id,
                cost_value: record.cost_value,
                group_key: record.group_key.clone(),
                geometry,
            });
        }
    }
    Ok(result)
}

/// builds rings within each cell. bands are dissolved per (cell, cost value) and,
/// from the largest cost value down, each band loses the next smaller band of the
/// same cell. the smallest band is kept whole.
pub fn cell_rings(
    fragments: Vec<Fragment>,
    cost_values: &CostValues,
) -> Result<Vec<RingFeature>, GeometryError> {
    let mut by_cell: BTreeMap<usize, BTreeMap<CostValue, Vec<Fragment>>> = BTreeMap::new();
    for fragment in fragments.into_iter() {
        by_cell
            .entry(fragment.cell_id)
            .or_default()
            .entry(fragment.cost_value)
            .or_default()
            .push(fragment);
    }

    let mut rings = vec![];
    for (cell_id, by_cost) in by_cell.into_iter() {
        let bands = by_cost
            .iter()
            .map(|(cost_value, group)| {
                let context = format!("voronoi cell {cell_id} band for cost value {cost_value}");
                let geometry = geo_utils::dissolve(group.iter().map(|f| &f.geometry), &context)?;
                Ok(DissolvedBand {
                    cost_value: *cost_value,
                    geometry,
                    group_key: ring_ops::shared_group_key(group.iter().map(|f| &f.group_key)),
                })
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        if cost_values.len() == 1 || bands.len() == 1 {
            rings.extend(bands.into_iter().map(|b| b.into_ring().with_cell_id(cell_id)));
            continue;
        }

        // descending: each band paired with the next smaller band present in this cell
        let descending = bands.iter().rev().collect_vec();
        for (idx, band) in descending.iter().enumerate() {
            let ring = match descending.get(idx + 1) {
                Some(smaller) => {
                    let context = format!(
                        "voronoi cell {cell_id} ring for cost value {} minus cost value {}",
                        band.cost_value, smaller.cost_value
                    );
                    band.minus(smaller, &context)?
                }
                None => (*band).clone(),
            };
            rings.push(ring.into_ring().with_cell_id(cell_id));
        }
    }
    Ok(rings)
}
