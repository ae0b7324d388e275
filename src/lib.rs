pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, Session};
pub use app::pipelines::{DownloadPipeline, ExportPipeline, MergePipeline, PagesPipeline};
pub use config::CrawlerConfig;
pub use core::engine::CrawlEngine;
pub use utils::error::{CrawlError, Result};
