//! Pipeline entry points for the aggregator.
//!
//! - `Aggregator`: concurrent fetch and merge of both rating sources
//! - `run_teachers`: staff listing joined with merged ratings, as a table
//! - `run_departments`: department listing, as a table

pub mod aggregate;
pub mod report;

pub use aggregate::Aggregator;
pub use report::{ReportStage, run_departments, run_teachers};
