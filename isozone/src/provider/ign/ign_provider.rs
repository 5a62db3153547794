use isozone_core::model::{CostValue, IsochroneRecord, Origin};
use serde_json::Map;

use super::IgnConfig;
use crate::error::IsochroneError;
use crate::http::{ProviderResponse, RetryingHttpClient};
use crate::provider::response_ops;
use crate::provider::{Batching, IsochroneProvider, IsochroneRequest};

/// the IGN Géoplateforme isochrone service, one GET per point and cost value.
pub struct IgnProvider {
    config: IgnConfig,
    client: RetryingHttpClient,
}

impl IgnProvider {
    pub fn new(config: IgnConfig, client: RetryingHttpClient) -> IgnProvider {
        IgnProvider { config, client }
    }
}

impl IsochroneProvider for IgnProvider {
    fn name(&self) -> &str {
        "ign"
    }

    fn batching(&self) -> Batching {
        Batching::PerPointPerCost
    }

    fn fetch(&self, request: &IsochroneRequest) -> Result<Vec<IsochroneRecord>, IsochroneError> {
        let label = request.label();
        let (origin, cost_value) = match (request.origins.as_slice(), request.cost_values.as_slice())
        {
            ([origin], [cost_value]) => (origin, *cost_value),
            _ => {
                return Err(IsochroneError::InvalidInput(format!(
                    "ign requests take exactly one point and one cost value, found {label}"
                )))
            }
        };
        let spec = self.config.request_spec(origin, cost_value, label.clone());
        let response = self
            .client
            .execute(&spec)
            .map_err(|source| IsochroneError::Request {
                request: label.clone(),
                source,
            })?;
        match response {
            ProviderResponse::Empty { .. } => Ok(vec![]),
            ProviderResponse::Body(body) => {
                let record = parse_response(&body, origin, cost_value, &label)?;
                Ok(vec![record])
            }
        }
    }
}

/// reads the `geometry` field of an IGN response. every other field is kept as metadata.
pub fn parse_response(
    body: &str,
    origin: &Origin,
    cost_value: CostValue,
    label: &str,
) -> Result<IsochroneRecord, IsochroneError> {
    let json = response_ops::parse_json(body, label)?;
    let object = json
        .as_object()
        .ok_or_else(|| IsochroneError::malformed(label, "response is not a JSON object"))?;
    let geometry = object
        .get("geometry")
        .filter(|g| !g.is_null())
        .ok_or_else(|| IsochroneError::malformed(label, "response has no geometry"))?;
    let geometry = response_ops::geometry_from_json(geometry, label)?;
    let metadata = object
        .iter()
        .filter(|(k, _)| k.as_str() != "geometry")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect::<Map<_, _>>();
    Ok(IsochroneRecord::new(origin, cost_value, geometry, metadata))
}
