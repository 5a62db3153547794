use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::GeometryError;

/// a time or distance threshold in the units of the provider that produced
/// the isochrone (minutes, seconds, meters..).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct CostValue(pub i64);

impl Display for CostValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CostValue {
    fn from(value: i64) -> Self {
        CostValue(value)
    }
}

/// the ordered set of cost values for one run. guaranteed non-empty, unique,
/// strictly positive and sorted ascending.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct CostValues(Vec<CostValue>);

impl CostValues {
    pub fn try_new(values: Vec<i64>) -> Result<CostValues, GeometryError> {
        if values.is_empty() {
            return Err(GeometryError::InvalidCostValues(String::from(
                "at least one cost value is required",
            )));
        }
        if let Some(v) = values.iter().find(|v| **v <= 0) {
            return Err(GeometryError::InvalidCostValues(format!(
                "cost values must be strictly positive, found {v}"
            )));
        }
        let duplicates = values.iter().duplicates().collect_vec();
        if !duplicates.is_empty() {
            return Err(GeometryError::InvalidCostValues(format!(
                "cost values must be unique, found duplicates [{}]",
                duplicates.iter().join(", ")
            )));
        }
        let sorted = values.into_iter().sorted().map(CostValue).collect_vec();
        Ok(CostValues(sorted))
    }

    pub fn ascending(&self) -> &[CostValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &CostValue) -> bool {
        self.0.binary_search(value).is_ok()
    }
}

impl TryFrom<Vec<i64>> for CostValues {
    type Error = GeometryError;

    fn try_from(value: Vec<i64>) -> Result<Self, Self::Error> {
        CostValues::try_new(value)
    }
}

impl From<CostValues> for Vec<i64> {
    fn from(value: CostValues) -> Self {
        value.0.into_iter().map(|c| c.0).collect()
    }
}

impl Display for CostValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::{CostValue, CostValues};

    #[test]
    fn test_sorted_on_construction() {
        let costs = CostValues::try_new(vec![15, 5, 10]).expect("valid cost values");
        assert_eq!(
            costs.ascending(),
            &[CostValue(5), CostValue(10), CostValue(15)]
        );
        assert!(costs.contains(&CostValue(10)));
        assert!(!costs.contains(&CostValue(7)));
        assert_eq!(costs.to_string(), "[5, 10, 15]");
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(CostValues::try_new(vec![]).is_err());
        assert!(CostValues::try_new(vec![5, 0]).is_err());
        assert!(CostValues::try_new(vec![-5]).is_err());
        assert!(CostValues::try_new(vec![5, 10, 5]).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: CostValues = serde_json::from_str("[10, 5]").expect("should decode");
        assert_eq!(ok.ascending(), &[CostValue(5), CostValue(10)]);
        let bad: Result<CostValues, _> = serde_json::from_str("[10, 10]");
        assert!(bad.is_err());
    }
}
