use isozone_core::model::{CostValues, Origin};
use itertools::Itertools;

use crate::provider::{Batching, IsochroneRequest};

/// splits the (point × cost value) grid into the requests a provider expects, in input
/// order: points outermost, cost values ascending.
pub fn plan_requests(
    origins: &[Origin],
    cost_values: &CostValues,
    batching: Batching,
) -> Vec<IsochroneRequest> {
    match batching {
        Batching::PerPointPerCost => origins
            .iter()
            .cartesian_product(cost_values.ascending().iter())
            .map(|(origin, cost_value)| IsochroneRequest::new(vec![origin.clone()], vec![*cost_value]))
            .collect_vec(),
        Batching::Batched { max_locations } => origins
            .chunks(max_locations.max(1))
            .map(|chunk| IsochroneRequest::new(chunk.to_vec(), cost_values.ascending().to_vec()))
            .collect_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::plan_requests;
    use crate::provider::Batching;
    use isozone_core::model::{CostValue, CostValues, Origin};

    fn origins(n: usize) -> Vec<Origin> {
        (0..n).map(|i| Origin::new(i, i as f64, 0.0, None)).collect()
    }

    #[test]
    fn test_per_point_per_cost() {
        let costs = CostValues::try_new(vec![10, 5]).expect("valid");
        let plan = plan_requests(&origins(2), &costs, Batching::PerPointPerCost);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].origins[0].point_id, 0);
        assert_eq!(plan[0].cost_values, vec![CostValue(5)]);
        assert_eq!(plan[1].cost_values, vec![CostValue(10)]);
        assert_eq!(plan[3].origins[0].point_id, 1);
    }

    #[test]
    fn test_batches_of_five() {
        let costs = CostValues::try_new(vec![5, 10, 15]).expect("valid");
        let plan = plan_requests(&origins(12), &costs, Batching::Batched { max_locations: 5 });
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].origins.len(), 5);
        assert_eq!(plan[2].origins.len(), 2);
        assert_eq!(plan[2].origins[0].point_id, 10);
        assert!(plan.iter().all(|r| r.cost_values.len() == 3));
    }
}
