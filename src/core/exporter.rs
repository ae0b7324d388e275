use crate::core::fetcher::PageFetcher;
use crate::core::{listing, pagination};
use crate::domain::model::{OverviewRow, PageSize, OVERVIEW_HEADER};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{CrawlError, Result};
use crate::utils::validation::validate_positive_number;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub pages: usize,
    pub rows: usize,
}

/// CSV writer for overview rows. Headers are written explicitly, never derived
/// from the struct.
pub fn overview_writer(path: &Path) -> Result<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new().has_headers(false).from_path(path)?)
}

/// Walks the result pages of one search and writes the rows as CSV.
pub struct OverviewExporter<T: HttpTransport> {
    fetcher: PageFetcher<T>,
}

impl<T: HttpTransport> OverviewExporter<T> {
    pub fn new(fetcher: PageFetcher<T>) -> Self {
        Self { fetcher }
    }

    /// Fetches `start` and every page reachable through "Next" links, handing
    /// each page's rows to `on_page` together with the page number.
    async fn walk<F>(&self, start: Url, first_page: u32, mut on_page: F) -> Result<ExportSummary>
    where
        F: FnMut(u32, &[OverviewRow]) -> Result<()> + Send,
    {
        let mut summary = ExportSummary::default();
        let mut next_url = Some(start);
        let mut expected_page = first_page;
        let mut visited = HashSet::new();

        while let Some(url) = next_url {
            if !visited.insert(url.clone()) {
                return Err(CrawlError::parse(format!(
                    "\"Next\" link leads back to already crawled page {}",
                    url
                )));
            }
            let page = self.fetcher.fetch(&url).await?;
            let rows = listing::parse_rows(&page, &url)?;
            let number = pagination::page_number(&url).unwrap_or(expected_page);

            on_page(number, &rows)?;
            summary.pages += 1;
            summary.rows += rows.len();
            tracing::info!("📄 Page {}: {} rows", number, rows.len());

            next_url = pagination::next_page_url(&String::from_utf8_lossy(&page), &url)?;
            expected_page = number + 1;
        }

        tracing::info!(
            "✅ Reached last page after {} pages, {} rows",
            summary.pages,
            summary.rows
        );
        Ok(summary)
    }

    /// Single-file mode: every row of every page into `writer`.
    pub async fn export<W: Write + Send>(
        &self,
        start: Url,
        writer: &mut csv::Writer<W>,
        csv_header: bool,
    ) -> Result<ExportSummary> {
        if csv_header {
            writer.write_record(OVERVIEW_HEADER)?;
        }

        let summary = self
            .walk(start, 1, |_, rows| {
                for row in rows {
                    writer.serialize(row)?;
                }
                Ok(())
            })
            .await?;

        writer.flush()?;
        Ok(summary)
    }

    pub async fn export_to_file(
        &self,
        start: Url,
        output: &Path,
        csv_header: bool,
    ) -> Result<ExportSummary> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = overview_writer(output)?;
        self.export(start, &mut writer, csv_header).await
    }

    /// Multi-file mode: one header-less `<page>.csv` per result page in
    /// `output_dir`, starting at `start_page`. Restarting at a later page
    /// resumes an interrupted crawl.
    pub async fn export_pages(
        &self,
        start: Url,
        start_page: u32,
        page_size: u32,
        output_dir: &Path,
    ) -> Result<ExportSummary> {
        let page_size = PageSize::new(page_size)?;
        validate_positive_number("start_page", start_page as usize, 1)?;

        std::fs::create_dir_all(output_dir)?;
        let first_url = pagination::with_paging(&start, start_page, page_size);
        tracing::info!(
            "🚀 Crawling from page {} ({} results per page) into {}",
            start_page,
            page_size.get(),
            output_dir.display()
        );

        self.walk(first_url, start_page, |number, rows| {
            let path = output_dir.join(format!("{}.csv", number));
            let mut writer = overview_writer(&path)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            tracing::debug!("Wrote {}", path.display());
            Ok(())
        })
        .await
    }
}
