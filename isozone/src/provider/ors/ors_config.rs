use isozone_core::model::{CostValue, Origin};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::IsochroneError;
use crate::http::RequestSpec;
use crate::provider::CostType;

pub const ORS_ISOCHRONE_URL: &str = "https://api.openrouteservice.org/v2/isochrones";
/// locations accepted per isochrone request by the public API
pub const ORS_MAX_LOCATIONS: usize = 5;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrsProfile {
    #[default]
    DrivingCar,
    DrivingHgv,
    CyclingRegular,
    CyclingRoad,
    CyclingMountain,
    CyclingElectric,
    FootWalking,
    FootHiking,
    Wheelchair,
}

impl OrsProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrsProfile::DrivingCar => "driving-car",
            OrsProfile::DrivingHgv => "driving-hgv",
            OrsProfile::CyclingRegular => "cycling-regular",
            OrsProfile::CyclingRoad => "cycling-road",
            OrsProfile::CyclingMountain => "cycling-mountain",
            OrsProfile::CyclingElectric => "cycling-electric",
            OrsProfile::FootWalking => "foot-walking",
            OrsProfile::FootHiking => "foot-hiking",
            OrsProfile::Wheelchair => "wheelchair",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrsLocationType {
    Start,
    #[default]
    Destination,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrsDistanceUnit {
    #[default]
    M,
    Km,
    Mi,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrsConfig {
    #[serde(default = "OrsConfig::default_url")]
    pub url: String,
    pub api_key: String,
    #[serde(default)]
    pub profile: OrsProfile,
    #[serde(default)]
    pub location_type: OrsLocationType,
    /// time cost values are minutes, distance cost values are in `units`
    #[serde(default)]
    pub range_type: CostType,
    #[serde(default)]
    pub units: OrsDistanceUnit,
    /// 0 to 100, higher values generalize the isochrone shapes
    #[serde(default)]
    pub smoothing: u8,
    #[serde(default = "OrsConfig::default_attributes")]
    pub attributes: Vec<String>,
}

impl OrsConfig {
    pub fn new(api_key: &str) -> OrsConfig {
        OrsConfig {
            url: Self::default_url(),
            api_key: api_key.to_string(),
            profile: OrsProfile::default(),
            location_type: OrsLocationType::default(),
            range_type: CostType::default(),
            units: OrsDistanceUnit::default(),
            smoothing: 0,
            attributes: Self::default_attributes(),
        }
    }

    fn default_url() -> String {
        String::from(ORS_ISOCHRONE_URL)
    }

    fn default_attributes() -> Vec<String> {
        vec![String::from("area"), String::from("reachfactor")]
    }

    pub fn validate(&self) -> Result<(), IsochroneError> {
        if self.api_key.trim().is_empty() {
            return Err(IsochroneError::Configuration(String::from(
                "ors provider requires a non-empty api_key",
            )));
        }
        if self.smoothing > 100 {
            return Err(IsochroneError::Configuration(format!(
                "ors smoothing must be between 0 and 100, found {}",
                self.smoothing
            )));
        }
        Ok(())
    }

    /// the range sent to ORS for a cost value. minutes become seconds.
    pub fn range_value(&self, cost_value: CostValue) -> i64 {
        match self.range_type {
            CostType::Time => cost_value.0 * 60,
            CostType::Distance => cost_value.0,
        }
    }

    /// the POST request for a batch of points with every cost value.
    pub fn request_spec(
        &self,
        origins: &[Origin],
        cost_values: &[CostValue],
        label: String,
    ) -> RequestSpec {
        let mut body = json!({
            "locations": origins.iter().map(|o| vec![o.x(), o.y()]).collect_vec(),
            "range": cost_values.iter().map(|c| self.range_value(*c)).collect_vec(),
            "range_type": self.range_type.as_str(),
            "location_type": self.location_type,
            "attributes": self.attributes,
            "smoothing": self.smoothing,
        });
        if self.range_type == CostType::Distance {
            body["units"] = json!(self.units);
        }
        let url = format!("{}/{}", self.url.trim_end_matches('/'), self.profile.as_str());
        RequestSpec::post(&url, label, body)
            .with_header("Authorization", &self.api_key)
            .with_header(
                "Accept",
                "application/json, application/geo+json; charset=utf-8",
            )
    }
}
