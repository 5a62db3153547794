mod ors_config;
mod ors_provider;

pub use ors_config::{OrsConfig, OrsDistanceUnit, OrsLocationType, OrsProfile, ORS_MAX_LOCATIONS};
pub use ors_provider::OrsProvider;
