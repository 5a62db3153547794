mod cost_type;
pub mod ign;
mod isochrone_provider;
mod isochrone_request;
pub mod ors;
mod provider_config;
mod response_ops;

pub use cost_type::CostType;
pub use isochrone_provider::{Batching, IsochroneProvider};
pub use isochrone_request::IsochroneRequest;
pub use provider_config::ProviderConfig;
