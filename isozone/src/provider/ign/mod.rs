mod ign_config;
mod ign_provider;

pub use ign_config::{
    IgnConfig, IgnConstraint, IgnConstraintType, IgnCrs, IgnDirection, IgnDistanceUnit, IgnProfile,
    IgnResource, IgnTimeUnit,
};
pub use ign_provider::IgnProvider;
