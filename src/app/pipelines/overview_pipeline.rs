use crate::adapters::http::Session;
use crate::config::toml_config::CrawlerConfig;
use crate::core::exporter::OverviewExporter;
use crate::core::fetcher::PageFetcher;
use crate::core::{PageSize, Pipeline, RunReport};
use crate::utils::error::Result;
use std::path::PathBuf;

fn exporter(config: &CrawlerConfig, user_agent: Option<&str>) -> Result<OverviewExporter<Session>> {
    let session = Session::new(config.session_settings(user_agent))?;
    Ok(OverviewExporter::new(PageFetcher::new(
        session,
        config.retry_policy(),
    )))
}

/// All result pages of one year into a single CSV file.
pub struct ExportPipeline {
    config: CrawlerConfig,
    year: u16,
    output: PathBuf,
    csv_header: bool,
    user_agent: Option<String>,
}

impl ExportPipeline {
    pub fn new(config: CrawlerConfig, year: u16, output: impl Into<PathBuf>) -> Self {
        Self {
            config,
            year,
            output: output.into(),
            csv_header: true,
            user_agent: None,
        }
    }

    pub fn with_header(mut self, csv_header: bool) -> Self {
        self.csv_header = csv_header;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

#[async_trait::async_trait]
impl Pipeline for ExportPipeline {
    fn name(&self) -> &'static str {
        "export"
    }

    async fn run(&self) -> Result<RunReport> {
        let start = self.config.start_url(self.year)?;
        tracing::info!("📅 Year {}: exporting overview to {}", self.year, self.output.display());

        let summary = exporter(&self.config, self.user_agent.as_deref())?
            .export_to_file(start, &self.output, self.csv_header)
            .await?;

        Ok(RunReport {
            pipeline: self.name(),
            output_path: self.output.display().to_string(),
            items: summary.rows,
            pages: Some(summary.pages),
        })
    }
}

/// One CSV per result page, resumable by start page.
pub struct PagesPipeline {
    config: CrawlerConfig,
    year: u16,
    start_page: u32,
    page_size: u32,
    output_dir: PathBuf,
    user_agent: Option<String>,
}

impl PagesPipeline {
    pub fn new(config: CrawlerConfig, year: u16, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            year,
            start_page: 1,
            page_size: PageSize::default().get(),
            output_dir: output_dir.into(),
            user_agent: None,
        }
    }

    pub fn with_start_page(mut self, start_page: u32) -> Self {
        self.start_page = start_page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

#[async_trait::async_trait]
impl Pipeline for PagesPipeline {
    fn name(&self) -> &'static str {
        "pages"
    }

    async fn run(&self) -> Result<RunReport> {
        PageSize::new(self.page_size)?;
        let start = self.config.start_url(self.year)?;
        tracing::info!("📅 Year {}: one CSV per page", self.year);

        let summary = exporter(&self.config, self.user_agent.as_deref())?
            .export_pages(start, self.start_page, self.page_size, &self.output_dir)
            .await?;

        Ok(RunReport {
            pipeline: self.name(),
            output_path: self.output_dir.display().to_string(),
            items: summary.rows,
            pages: Some(summary.pages),
        })
    }
}
