pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::Settings;
pub use core::{etl::EtlEngine, pipeline::CourtPipeline};
pub use domain::model::{CourtRecord, LoadSummary, Region, RegionDirectory};
pub use domain::ports::{OutputFormat, ReconcileMode};
pub use utils::error::{CourtError, Result};

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;
