use isozone_core::model::{CostValues, IsochroneRecord, Origin};
use kdam::tqdm;

use super::request_plan;
use crate::error::IsochroneError;
use crate::http::RateLimiter;
use crate::provider::IsochroneProvider;

/// issues every request of a run, sequentially and under the rate limiter. the first
/// failure aborts the collection.
pub struct IsochroneCollector<'a> {
    provider: &'a dyn IsochroneProvider,
    rate_limiter: RateLimiter,
}

impl<'a> IsochroneCollector<'a> {
    pub fn new(provider: &'a dyn IsochroneProvider, rate_limiter: RateLimiter) -> Self {
        Self {
            provider,
            rate_limiter,
        }
    }

    pub fn collect(
        &mut self,
        origins: &[Origin],
        cost_values: &CostValues,
    ) -> Result<Vec<IsochroneRecord>, IsochroneError> {
        let requests = request_plan::plan_requests(origins, cost_values, self.provider.batching());
        log::info!(
            "collecting isochrones for {} points and cost values {} from {} in {} requests",
            origins.len(),
            cost_values,
            self.provider.name(),
            requests.len()
        );
        let iter = tqdm!(
            requests.iter(),
            total = requests.len(),
            desc = "isochrone requests"
        );
        let mut records = vec![];
        for request in iter {
            let provider = self.provider;
            let fetched = self.rate_limiter.run(|| provider.fetch(request))?;
            if fetched.is_empty() {
                log::warn!("no isochrone returned for {}", request.label());
            }
            records.extend(fetched);
        }
        eprintln!();
        log::info!(
            "collected {} isochrones, rate limiter paused {} time(s)",
            records.len(),
            self.rate_limiter.pauses()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::Arc;

    use super::*;
    use crate::http::{HttpError, RateLimitConfig, RecordingSleeper};
    use crate::provider::{Batching, IsochroneRequest};
    use geo::{polygon, MultiPolygon};
    use isozone_core::model::CostValue;
    use serde_json::Map;

    struct CountingProvider {
        batching: Batching,
        calls: RefCell<Vec<IsochroneRequest>>,
        fail_on: Option<usize>,
    }

    impl IsochroneProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn batching(&self) -> Batching {
            self.batching
        }

        fn fetch(
            &self,
            request: &IsochroneRequest,
        ) -> Result<Vec<IsochroneRecord>, IsochroneError> {
            self.calls.borrow_mut().push(request.clone());
            if Some(self.calls.borrow().len()) == self.fail_on {
                return Err(IsochroneError::Request {
                    request: request.label(),
                    source: HttpError::Connection(String::from("refused")),
                });
            }
            let mut records = vec![];
            for origin in request.origins.iter() {
                for cost in request.cost_values.iter() {
                    let geometry = MultiPolygon::new(vec![polygon![
                        (x: origin.x(), y: origin.y()),
                        (x: origin.x() + 1.0, y: origin.y()),
                        (x: origin.x(), y: origin.y() + 1.0),
                    ]]);
                    records.push(IsochroneRecord::new(origin, *cost, geometry, Map::new()));
                }
            }
            Ok(records)
        }
    }

    fn origins(n: usize) -> Vec<Origin> {
        (0..n).map(|i| Origin::new(i, i as f64, 0.0, None)).collect()
    }

    fn limiter(sleeper: Arc<RecordingSleeper>) -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default(), sleeper)
    }

    #[test]
    fn test_collects_every_pair_with_pauses() {
        let provider = CountingProvider {
            batching: Batching::PerPointPerCost,
            calls: RefCell::new(vec![]),
            fail_on: None,
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut collector = IsochroneCollector::new(&provider, limiter(sleeper.clone()));
        let costs = CostValues::try_new(vec![5, 10, 15]).expect("valid");
        let records = collector.collect(&origins(4), &costs).expect("collected");
        assert_eq!(records.len(), 12);
        assert_eq!(provider.calls.borrow().len(), 12);
        assert_eq!(sleeper.durations().len(), 2);
        assert!(records.iter().any(|r| r.point_id == 3 && r.cost_value == CostValue(15)));
    }

    #[test]
    fn test_batched_provider() {
        let provider = CountingProvider {
            batching: Batching::Batched { max_locations: 5 },
            calls: RefCell::new(vec![]),
            fail_on: None,
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut collector = IsochroneCollector::new(&provider, limiter(sleeper.clone()));
        let costs = CostValues::try_new(vec![5, 10]).expect("valid");
        let records = collector.collect(&origins(7), &costs).expect("collected");
        assert_eq!(records.len(), 14);
        assert_eq!(provider.calls.borrow().len(), 2);
        assert!(sleeper.durations().is_empty());
    }

    #[test]
    fn test_failure_aborts_collection() {
        let provider = CountingProvider {
            batching: Batching::PerPointPerCost,
            calls: RefCell::new(vec![]),
            fail_on: Some(2),
        };
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut collector = IsochroneCollector::new(&provider, limiter(sleeper));
        let costs = CostValues::try_new(vec![5]).expect("valid");
        let result = collector.collect(&origins(4), &costs);
        assert!(matches!(result, Err(IsochroneError::Request { .. })));
        assert_eq!(provider.calls.borrow().len(), 2);
    }
}
