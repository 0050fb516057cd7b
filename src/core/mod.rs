pub mod addresses;
pub mod endpoints;
pub mod etl;
pub mod pipeline;
pub mod primary;
pub mod reconcile;
pub mod regions;
pub mod secondary;

pub use crate::domain::model::{CourtRecord, JoinSources, LoadSummary, RegionDirectory};
pub use crate::domain::ports::{ConfigProvider, Pipeline, RecordSink};
pub use crate::utils::error::Result;
