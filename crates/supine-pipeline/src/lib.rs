//! The viewer-side frame pipeline: deduplication, bounded concurrent
//! analysis dispatch, and the order-restoring display queue.

pub mod config;
pub mod dedup;
pub mod dispatch;
pub mod error;
pub mod reorder;

pub use config::PipelineConfig;
pub use dedup::Deduplicator;
pub use dispatch::AnalysisDispatcher;
pub use error::PipelineError;
pub use reorder::DisplayQueue;
