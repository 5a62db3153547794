use serde::{Deserialize, Serialize};

/// what a cost value measures.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    #[default]
    Time,
    Distance,
}

impl CostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostType::Time => "time",
            CostType::Distance => "distance",
        }
    }
}
