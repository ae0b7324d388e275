pub mod download_pipeline;
pub mod merge_pipeline;
pub mod overview_pipeline;

pub use download_pipeline::DownloadPipeline;
pub use merge_pipeline::MergePipeline;
pub use overview_pipeline::{ExportPipeline, PagesPipeline};
