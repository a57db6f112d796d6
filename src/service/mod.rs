pub mod aggregator;
pub mod extractor;
pub mod pipeline;

pub use pipeline::{BillPipeline, UploadOutcome};
