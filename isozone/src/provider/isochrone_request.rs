use isozone_core::model::{CostValue, Origin};
use itertools::Itertools;

/// one provider call: a single (point, cost value) pair, or a batch of points with
/// every cost value of the run.
#[derive(Clone, Debug, PartialEq)]
pub struct IsochroneRequest {
    pub origins: Vec<Origin>,
    pub cost_values: Vec<CostValue>,
}

impl IsochroneRequest {
    pub fn new(origins: Vec<Origin>, cost_values: Vec<CostValue>) -> IsochroneRequest {
        IsochroneRequest {
            origins,
            cost_values,
        }
    }

    /// names the point(s) and cost value(s) of this request for logs and errors.
    pub fn label(&self) -> String {
        let points = match self.origins.as_slice() {
            [o] => format!("point {} ({},{})", o.point_id, o.x(), o.y()),
            os => format!("points [{}]", os.iter().map(|o| o.point_id).join(",")),
        };
        let costs = match self.cost_values.as_slice() {
            [c] => format!("cost {c}"),
            cs => format!("costs [{}]", cs.iter().join(",")),
        };
        format!("{points} at {costs}")
    }
}

#[cfg(test)]
mod tests {
    use super::IsochroneRequest;
    use isozone_core::model::{CostValue, Origin};

    #[test]
    fn test_label() {
        let single = IsochroneRequest::new(
            vec![Origin::new(2, 1.5, 45.0, None)],
            vec![CostValue(10)],
        );
        assert_eq!(single.label(), "point 2 (1.5,45) at cost 10");
        let batch = IsochroneRequest::new(
            vec![
                Origin::new(0, 0.0, 0.0, None),
                Origin::new(1, 1.0, 1.0, None),
            ],
            vec![CostValue(5), CostValue(10)],
        );
        assert_eq!(batch.label(), "points [0,1] at costs [5,10]");
    }
}
