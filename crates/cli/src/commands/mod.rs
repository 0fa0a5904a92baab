//! CLI subcommand implementations

pub mod dataset;
pub mod model;
pub mod predict;
pub mod train;
