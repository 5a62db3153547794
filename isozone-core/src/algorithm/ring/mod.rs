mod dissolved_band;
pub mod ring_ops;

pub use dissolved_band::DissolvedBand;
