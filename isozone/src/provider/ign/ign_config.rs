use isozone_core::model::{CostValue, Origin};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::RequestSpec;
use crate::provider::CostType;

pub const IGN_ISOCHRONE_URL: &str = "https://data.geopf.fr/navigation/isochrone";

/// routing graph used by the Géoplateforme service.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IgnResource {
    #[default]
    #[serde(rename = "bdtopo-valhalla")]
    BdtopoValhalla,
    #[serde(rename = "bdtopo-pgr")]
    BdtopoPgr,
    #[serde(rename = "pgr_sgl_r100_all")]
    PgrSglR100All,
    #[serde(rename = "graph_pgr_D013")]
    GraphPgrD013,
}

impl IgnResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnResource::BdtopoValhalla => "bdtopo-valhalla",
            IgnResource::BdtopoPgr => "bdtopo-pgr",
            IgnResource::PgrSglR100All => "pgr_sgl_r100_all",
            IgnResource::GraphPgrD013 => "graph_pgr_D013",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnProfile {
    #[default]
    Car,
    Pedestrian,
}

impl IgnProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnProfile::Car => "car",
            IgnProfile::Pedestrian => "pedestrian",
        }
    }
}

/// whether the point is where travel starts or ends.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnDirection {
    Departure,
    #[default]
    Arrival,
}

impl IgnDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnDirection::Departure => "departure",
            IgnDirection::Arrival => "arrival",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnDistanceUnit {
    #[default]
    Meter,
    Kilometer,
}

impl IgnDistanceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnDistanceUnit::Meter => "meter",
            IgnDistanceUnit::Kilometer => "kilometer",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IgnTimeUnit {
    Second,
    #[default]
    Minute,
    Hour,
    Standard,
}

impl IgnTimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnTimeUnit::Second => "second",
            IgnTimeUnit::Minute => "minute",
            IgnTimeUnit::Hour => "hour",
            IgnTimeUnit::Standard => "standard",
        }
    }
}

/// output coordinate system. rings and voronoi cells are computed in lon/lat, so
/// WGS84 is the only accepted value.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IgnCrs {
    #[default]
    #[serde(rename = "EPSG:4326")]
    Epsg4326,
}

impl IgnCrs {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnCrs::Epsg4326 => "EPSG:4326",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnConstraintType {
    Banned,
    Preferred,
    Unpreferred,
}

/// a routing constraint such as banning motorways, sent as a JSON object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IgnConstraint {
    pub constraint_type: IgnConstraintType,
    pub key: String,
    pub operator: String,
    pub value: serde_json::Value,
}

impl IgnConstraint {
    pub fn to_query_value(&self) -> String {
        json!({
            "constraintType": self.constraint_type,
            "key": self.key,
            "operator": self.operator,
            "value": self.value,
        })
        .to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct IgnConfig {
    #[serde(default = "IgnConfig::default_url")]
    pub url: String,
    #[serde(default)]
    pub resource: IgnResource,
    #[serde(default)]
    pub cost_type: CostType,
    #[serde(default)]
    pub profile: IgnProfile,
    #[serde(default)]
    pub direction: IgnDirection,
    #[serde(default)]
    pub constraints: Vec<IgnConstraint>,
    #[serde(default)]
    pub distance_unit: IgnDistanceUnit,
    #[serde(default)]
    pub time_unit: IgnTimeUnit,
    #[serde(default)]
    pub crs: IgnCrs,
}

impl Default for IgnConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            resource: IgnResource::default(),
            cost_type: CostType::default(),
            profile: IgnProfile::default(),
            direction: IgnDirection::default(),
            constraints: vec![],
            distance_unit: IgnDistanceUnit::default(),
            time_unit: IgnTimeUnit::default(),
            crs: IgnCrs::default(),
        }
    }
}

impl IgnConfig {
    fn default_url() -> String {
        String::from(IGN_ISOCHRONE_URL)
    }

    /// the GET request for one point and one cost value.
    pub fn request_spec(&self, origin: &Origin, cost_value: CostValue, label: String) -> RequestSpec {
        let mut spec = RequestSpec::get(&self.url, label)
            .with_query("point", format!("{},{}", origin.x(), origin.y()))
            .with_query("resource", self.resource.as_str())
            .with_query("costValue", cost_value)
            .with_query("costType", self.cost_type.as_str())
            .with_query("profile", self.profile.as_str())
            .with_query("direction", self.direction.as_str());
        for constraint in self.constraints.iter() {
            spec = spec.with_query("constraints", constraint.to_query_value());
        }
        spec.with_query("geometryFormat", "geojson")
            .with_query("distanceUnit", self.distance_unit.as_str())
            .with_query("timeUnit", self.time_unit.as_str())
            .with_query("crs", self.crs.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_defaults_to_wgs84() {
        let config: IgnConfig = serde_json::from_str("{}").expect("valid config");
        assert_eq!(config.crs, IgnCrs::Epsg4326);
        let config: IgnConfig =
            serde_json::from_str(r#"{"crs": "EPSG:4326"}"#).expect("valid config");
        assert_eq!(config.crs, IgnCrs::Epsg4326);
    }

    #[test]
    fn test_projected_crs_rejected() {
        let result: Result<IgnConfig, _> = serde_json::from_str(r#"{"crs": "EPSG:2154"}"#);
        assert!(result.is_err());
    }
}
