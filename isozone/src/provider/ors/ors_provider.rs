use std::collections::HashMap;

use isozone_core::model::{CostValue, IsochroneRecord};
use serde_json::{Map, Value};

use super::{OrsConfig, ORS_MAX_LOCATIONS};
use crate::error::IsochroneError;
use crate::http::{ProviderResponse, RetryingHttpClient};
use crate::provider::response_ops;
use crate::provider::{Batching, IsochroneProvider, IsochroneRequest};

const GROUP_INDEX: &str = "group_index";
const VALUE: &str = "value";

/// the OpenRouteService isochrone endpoint, one POST per batch of up to 5 points.
pub struct OrsProvider {
    config: OrsConfig,
    client: RetryingHttpClient,
}

impl OrsProvider {
    pub fn new(config: OrsConfig, client: RetryingHttpClient) -> OrsProvider {
        OrsProvider { config, client }
    }

    /// maps each feature of the response FeatureCollection back to its origin (by
    /// `group_index`) and cost value (by `value`, converted back to request units).
    pub fn parse_response(
        &self,
        body: &str,
        request: &IsochroneRequest,
        label: &str,
    ) -> Result<Vec<IsochroneRecord>, IsochroneError> {
        let json = response_ops::parse_json(body, label)?;
        let features = json
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                IsochroneError::malformed(label, "response is not a FeatureCollection")
            })?;
        let cost_by_range = request
            .cost_values
            .iter()
            .map(|c| (self.config.range_value(*c), *c))
            .collect::<HashMap<i64, CostValue>>();

        let mut records = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let props = feature
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    IsochroneError::malformed(label, format!("feature {idx} has no properties"))
                })?;
            let group_index = props
                .get(GROUP_INDEX)
                .and_then(Value::as_u64)
                .ok_or_else(|| {
                    IsochroneError::malformed(label, format!("feature {idx} has no group_index"))
                })?;
            let origin = request.origins.get(group_index as usize).ok_or_else(|| {
                IsochroneError::malformed(
                    label,
                    format!("feature {idx} has group_index {group_index} outside of the request"),
                )
            })?;
            let value = props.get(VALUE).and_then(Value::as_f64).ok_or_else(|| {
                IsochroneError::malformed(label, format!("feature {idx} has no value"))
            })?;
            let cost_value = cost_by_range
                .get(&(value.round() as i64))
                .copied()
                .ok_or_else(|| {
                    IsochroneError::malformed(
                        label,
                        format!("feature {idx} has value {value} which was not requested"),
                    )
                })?;
            let geometry = feature
                .get("geometry")
                .filter(|g| !g.is_null())
                .ok_or_else(|| {
                    IsochroneError::malformed(label, format!("feature {idx} has no geometry"))
                })?;
            let geometry = response_ops::geometry_from_json(geometry, label)?;
            let metadata = props
                .iter()
                .filter(|(k, _)| k.as_str() != GROUP_INDEX && k.as_str() != VALUE)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>();
            records.push(IsochroneRecord::new(origin, cost_value, geometry, metadata));
        }
        Ok(records)
    }
}

impl IsochroneProvider for OrsProvider {
    fn name(&self) -> &str {
        "ors"
    }

    fn batching(&self) -> Batching {
        Batching::Batched {
            max_locations: ORS_MAX_LOCATIONS,
        }
    }

    fn fetch(&self, request: &IsochroneRequest) -> Result<Vec<IsochroneRecord>, IsochroneError> {
        let label = request.label();
        if request.origins.is_empty() || request.origins.len() > ORS_MAX_LOCATIONS {
            return Err(IsochroneError::InvalidInput(format!(
                "ors requests take 1 to {ORS_MAX_LOCATIONS} points, found {}",
                request.origins.len()
            )));
        }
        let spec = self
            .config
            .request_spec(&request.origins, &request.cost_values, label.clone());
        let response = self.client.execute(&spec).map_err(|source| match source.status() {
            Some(403) => IsochroneError::InvalidApiKey {
                provider: String::from("openrouteservice"),
                request: label.clone(),
            },
            _ => IsochroneError::Request {
                request: label.clone(),
                source,
            },
        })?;
        match response {
            ProviderResponse::Empty { .. } => Ok(vec![]),
            ProviderResponse::Body(body) => self.parse_response(&body, request, &label),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http::{HttpError, HttpResponse, RecordingSleeper, RetryPolicy, StubTransport};
    use crate::provider::ors::OrsProfile;
    use isozone_core::model::Origin;
    use serde_json::json;

    fn feature(group_index: usize, value: i64, x: f64) -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "group_index": group_index,
                "value": value,
                "center": [x, 0.0],
                "area": 1234.5,
                "reachfactor": 0.4
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x - 0.1, -0.1], [x + 0.1, -0.1], [x + 0.1, 0.1], [x - 0.1, 0.1], [x - 0.1, -0.1]]]
            }
        })
    }

    fn provider(
        responses: Vec<Result<HttpResponse, HttpError>>,
        config: OrsConfig,
    ) -> (OrsProvider, Arc<std::sync::Mutex<Vec<crate::http::RequestSpec>>>) {
        let transport = StubTransport::new(responses);
        let requests = transport.requests.clone();
        let client = RetryingHttpClient::new(
            Box::new(transport),
            Arc::new(RecordingSleeper::default()),
            RetryPolicy::default(),
            vec![404],
        );
        (OrsProvider::new(config, client), requests)
    }

    fn request() -> IsochroneRequest {
        IsochroneRequest::new(
            vec![
                Origin::new(0, 1.0, 0.0, Some(json!("a"))),
                Origin::new(1, 2.0, 0.0, None),
            ],
            vec![CostValue(5), CostValue(10)],
        )
    }

    #[test]
    fn test_fetch_maps_features_to_origins_and_cost_values() {
        let body = json!({
            "type": "FeatureCollection",
            "features": [
                feature(0, 300, 1.0),
                feature(0, 600, 1.0),
                feature(1, 300, 2.0),
                feature(1, 600, 2.0)
            ]
        })
        .to_string();
        let mut config = OrsConfig::new("secret");
        config.profile = OrsProfile::FootWalking;
        config.smoothing = 25;
        let (provider, requests) = provider(vec![Ok(HttpResponse::new(200, &body))], config);
        let records = provider.fetch(&request()).expect("valid response");
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].point_id, 0);
        assert_eq!(records[1].cost_value, CostValue(10));
        assert_eq!(records[1].group_key, Some(json!("a")));
        assert_eq!(records[2].point_id, 1);
        assert_eq!(records[2].cost_value, CostValue(5));
        assert_eq!(records[2].metadata.get("reachfactor"), Some(&json!(0.4)));
        assert!(records[2].metadata.get("group_index").is_none());

        let sent = StubTransport::sent(&requests);
        assert_eq!(sent[0].method, reqwest::Method::POST);
        assert_eq!(
            sent[0].url,
            "https://api.openrouteservice.org/v2/isochrones/foot-walking"
        );
        assert!(sent[0]
            .headers
            .contains(&(String::from("Authorization"), String::from("secret"))));
        let body = sent[0].body.clone().expect("json body");
        assert_eq!(body["range"], json!([300, 600]));
        assert_eq!(body["locations"], json!([[1.0, 0.0], [2.0, 0.0]]));
        assert_eq!(body["location_type"], json!("destination"));
        assert_eq!(body["smoothing"], json!(25));
        assert!(body.get("units").is_none());
    }

    #[test]
    fn test_forbidden_reports_invalid_api_key() {
        let (provider, _) = provider(
            vec![Ok(HttpResponse::new(403, "Access to this API has been disallowed"))],
            OrsConfig::new("bad"),
        );
        let result = provider.fetch(&request());
        assert!(matches!(result, Err(IsochroneError::InvalidApiKey { .. })));
    }

    #[test]
    fn test_unrequested_value_is_malformed() {
        let body = json!({"type": "FeatureCollection", "features": [feature(0, 900, 1.0)]})
            .to_string();
        let (provider, _) = provider(
            vec![Ok(HttpResponse::new(200, &body))],
            OrsConfig::new("secret"),
        );
        let result = provider.fetch(&request());
        assert!(matches!(result, Err(IsochroneError::MalformedResponse { .. })));
    }

    #[test]
    fn test_too_many_locations() {
        let (provider, _) = provider(vec![], OrsConfig::new("secret"));
        let origins = (0..6).map(|i| Origin::new(i, i as f64, 0.0, None)).collect();
        let request = IsochroneRequest::new(origins, vec![CostValue(5)]);
        assert!(matches!(
            provider.fetch(&request),
            Err(IsochroneError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(OrsConfig::new("  ").validate().is_err());
        let mut config = OrsConfig::new("key");
        config.smoothing = 101;
        assert!(config.validate().is_err());
        config.smoothing = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_distance_range_is_sent_unconverted() {
        let mut config = OrsConfig::new("key");
        config.range_type = crate::provider::CostType::Distance;
        assert_eq!(config.range_value(CostValue(500)), 500);
        let spec = config.request_spec(&request().origins, &[CostValue(500)], String::new());
        let body = spec.body.expect("json body");
        assert_eq!(body["units"], json!("m"));
        assert_eq!(body["range_type"], json!("distance"));
    }
}
