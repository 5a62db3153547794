mod isozone_cli;
pub mod run_ops;

pub use isozone_cli::{IsozoneCliArguments, IsozoneOperation};
