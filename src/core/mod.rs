pub mod downloader;
pub mod engine;
pub mod exporter;
pub mod fetcher;
pub mod listing;
pub mod merger;
pub mod pagination;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{ManifestEntry, OverviewRow, PageSize, RunReport};
pub use crate::domain::ports::{HttpTransport, Pipeline, Storage};
pub use crate::utils::error::Result;
