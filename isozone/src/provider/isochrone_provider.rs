use isozone_core::model::IsochroneRecord;

use super::IsochroneRequest;
use crate::error::IsochroneError;

/// how a provider wants the (point, cost value) grid split into requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Batching {
    /// one request per point and cost value
    PerPointPerCost,
    /// up to `max_locations` points per request, each with every cost value
    Batched { max_locations: usize },
}

/// a routing service that computes isochrones.
pub trait IsochroneProvider {
    fn name(&self) -> &str;

    fn batching(&self) -> Batching;

    /// issues the request and normalizes the response into records. an empty result
    /// is an empty vector.
    fn fetch(&self, request: &IsochroneRequest) -> Result<Vec<IsochroneRecord>, IsochroneError>;
}
