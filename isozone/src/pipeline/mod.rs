mod pipeline_ops;
mod processing_mode;

pub use pipeline_ops::{process, run};
pub use processing_mode::ProcessingMode;
