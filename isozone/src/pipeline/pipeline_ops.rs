use isozone_core::algorithm::{ring::ring_ops, voronoi::voronoi_partition};
use isozone_core::model::{CostValues, IsochroneRecord, Origin, RingFeature, RingFeatureCollection};
use itertools::Itertools;

use super::ProcessingMode;
use crate::collector::IsochroneCollector;
use crate::error::IsochroneError;

/// collects isochrones for every point and cost value, then post-processes them.
pub fn run(
    origins: &[Origin],
    cost_values: &CostValues,
    mode: &ProcessingMode,
    collector: &mut IsochroneCollector,
) -> Result<RingFeatureCollection, IsochroneError> {
    if origins.is_empty() {
        return Err(IsochroneError::InvalidInput(String::from(
            "at least one point is required",
        )));
    }
    let records = collector.collect(origins, cost_values)?;
    process(&records, origins, cost_values, mode)
}

/// post-processes records that were already collected, such as the raw output of a
/// previous run.
pub fn process(
    records: &[IsochroneRecord],
    origins: &[Origin],
    cost_values: &CostValues,
    mode: &ProcessingMode,
) -> Result<RingFeatureCollection, IsochroneError> {
    log::info!(
        "post-processing {} isochrones in {mode} mode",
        records.len()
    );
    let features = match mode {
        ProcessingMode::Dissolved => ring_ops::difference_rings(records, cost_values)?,
        ProcessingMode::Raw => records.iter().map(RingFeature::from).collect_vec(),
        ProcessingMode::VoronoiPartitioned { clip } => {
            voronoi_partition::partition(records, cost_values, origins, clip.as_ref())?
        }
    };
    log::info!("produced {} features", features.len());
    Ok(RingFeatureCollection::new(features))
}
