use crate::utils::error::{CrawlError, Result};
use crate::utils::validation::validate_one_of;
use serde::{Deserialize, Serialize};

/// Header of every overview CSV that carries one.
pub const OVERVIEW_HEADER: [&str; 8] = [
    "URL",
    "Draft Date",
    "Document Number",
    "Film Number",
    "From",
    "Subject",
    "TAGS",
    "To",
];

/// Header of the download manifest (`index.csv`).
pub const MANIFEST_HEADER: [&str; 4] = ["Document Number", "Path", "AAD filename", "URL"];

/// One row of the overview table. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub document_url: String,
    pub draft_date: String,
    pub document_number: String,
    pub film_number: String,
    pub from: String,
    pub subject: String,
    pub tags: String,
    pub to: String,
}

/// One downloaded document, as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub document_number: String,
    /// Relative to the download directory, e.g. `03/1977STATE012345.pdf`.
    pub local_path: String,
    pub source_filename: String,
    pub document_url: String,
}

/// Results per page accepted by the archive's search interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    pub const ALLOWED: [u32; 3] = [10, 20, 50];

    pub fn new(size: u32) -> Result<Self> {
        validate_one_of("page_size", size, &Self::ALLOWED)?;
        Ok(Self(size))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = CrawlError;

    fn try_from(size: u32) -> Result<Self> {
        Self::new(size)
    }
}

/// Transport-neutral view of an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 500 and 503 are retried; everything else is final.
    pub fn is_transient_server_error(&self) -> bool {
        matches!(self.status, 500 | 503)
    }
}

/// What a finished pipeline hands back to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub pipeline: &'static str,
    pub output_path: String,
    /// Rows written (export, pages, merge) or documents downloaded.
    pub items: usize,
    /// Pages fetched, where the pipeline walks result pages.
    pub pages: Option<usize>,
}
