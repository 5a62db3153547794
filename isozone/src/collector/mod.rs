mod isochrone_collector;
pub mod request_plan;

pub use isochrone_collector::IsochroneCollector;
