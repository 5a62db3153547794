mod cost_value;
mod geometry_error;
mod isochrone_record;
pub mod isozone_field;
mod origin;
mod ring_feature;
mod ring_feature_collection;

pub use cost_value::{CostValue, CostValues};
pub use geometry_error::GeometryError;
pub use isochrone_record::IsochroneRecord;
pub use origin::Origin;
pub use ring_feature::RingFeature;
pub use ring_feature_collection::RingFeatureCollection;
