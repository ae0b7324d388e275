use crate::adapters::http::Session;
use crate::adapters::storage::LocalStorage;
use crate::config::toml_config::CrawlerConfig;
use crate::core::downloader::DocumentDownloader;
use crate::core::{Pipeline, RunReport, Storage};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Downloads the documents of a merged overview CSV.
pub struct DownloadPipeline {
    config: CrawlerConfig,
    overview: PathBuf,
    output_dir: PathBuf,
    offset: usize,
    user_agent: Option<String>,
}

impl DownloadPipeline {
    pub fn new(
        config: CrawlerConfig,
        overview: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            overview: overview.into(),
            output_dir: output_dir.into(),
            offset: 0,
            user_agent: None,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

#[async_trait::async_trait]
impl Pipeline for DownloadPipeline {
    fn name(&self) -> &'static str {
        "download"
    }

    async fn run(&self) -> Result<RunReport> {
        let storage = LocalStorage::new(&self.output_dir);
        storage.create_dir("").await?;

        let session = Session::new(self.config.session_settings(self.user_agent.as_deref()))?;
        let downloader = DocumentDownloader::new(session, storage, self.config.retry_policy());
        let downloaded = downloader.download(&self.overview, self.offset).await?;

        Ok(RunReport {
            pipeline: self.name(),
            output_path: self.output_dir.display().to_string(),
            items: downloaded,
            pages: None,
        })
    }
}
