pub mod aggregate;
pub mod config;
pub mod dedup;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod plz;
pub mod report;
pub mod spatial;
pub mod table;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
