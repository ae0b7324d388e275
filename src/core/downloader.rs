use crate::core::fetcher::RetryPolicy;
use crate::domain::model::{HttpResponse, ManifestEntry, OverviewRow, MANIFEST_HEADER};
use crate::domain::ports::{HttpTransport, Storage};
use crate::utils::error::{CrawlError, Result};
use regex::Regex;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

/// Manifest written next to the month directories.
pub const MANIFEST_FILE: &str = "index.csv";

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const MONTH_DIRS: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

static DAY_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}\s+([a-z]{3})\b").expect("valid date pattern")
});
static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename=\s*["']?([^"';]+)"#).expect("valid content-disposition pattern")
});

/// Month directory (`"01"`..`"12"`) for a draft date such as `15 MAR 1977`.
pub fn month_directory(draft_date: &str) -> Result<&'static str> {
    DAY_MONTH_PATTERN
        .captures_iter(draft_date)
        .find_map(|caps| {
            let abbreviation = caps[1].to_ascii_uppercase();
            MONTHS.iter().position(|month| *month == abbreviation)
        })
        .map(|index| MONTH_DIRS[index])
        .ok_or_else(|| CrawlError::parse(format!("no '<day> <month>' in draft date '{}'", draft_date)))
}

/// File name announced in a `Content-Disposition` header.
pub fn source_filename(content_disposition: &str) -> Option<String> {
    FILENAME_PATTERN
        .captures(content_disposition)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Replaces characters that cannot appear in a file name.
fn sanitize_file_stem(document_number: &str) -> String {
    let sanitized: String = document_number
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        sanitized
    }
}

/// Downloads every document listed in an overview CSV into
/// `<root>/<MM>/<document_number>[-<n>].pdf` and records it in `index.csv`.
pub struct DocumentDownloader<T: HttpTransport, S: Storage> {
    transport: T,
    storage: S,
    policy: RetryPolicy,
}

impl<T: HttpTransport, S: Storage> DocumentDownloader<T, S> {
    pub fn new(transport: T, storage: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            storage,
            policy,
        }
    }

    /// Downloads the rows of `overview` after skipping `offset` data rows.
    /// With `offset > 0` the manifest is appended to instead of recreated.
    /// The first failing document aborts the run; everything written before
    /// it stays on disk.
    pub async fn download(&self, overview: &Path, offset: usize) -> Result<usize> {
        for dir in MONTH_DIRS {
            self.storage.create_dir(dir).await?;
        }

        let manifest_file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(offset > 0)
            .truncate(offset == 0)
            .open(self.storage.locate(MANIFEST_FILE))?;
        let mut manifest = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(manifest_file);
        if offset == 0 {
            manifest.write_record(MANIFEST_HEADER)?;
            manifest.flush()?;
        } else {
            tracing::info!("⏩ Resuming after {} rows", offset);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(overview)?;

        let mut renewed: Option<T> = None;
        let mut downloaded = 0;

        for (index, record) in reader.records().enumerate().skip(offset) {
            let record = record?;
            let row: OverviewRow = record.deserialize(None)?;
            let month = month_directory(&row.draft_date)?;
            let url = Url::parse(&row.document_url)?;

            let response = self.fetch_document(&url, &mut renewed).await?;
            let source = response
                .content_disposition
                .as_deref()
                .and_then(source_filename)
                .ok_or_else(|| {
                    CrawlError::parse(format!("no filename in Content-Disposition for {}", url))
                })?;

            let local_path = self.unique_path(month, &row.document_number).await;
            self.storage.write_file(&local_path, &response.body).await?;

            manifest.serialize(ManifestEntry {
                document_number: row.document_number,
                local_path: local_path.clone(),
                source_filename: source,
                document_url: row.document_url,
            })?;
            manifest.flush()?;

            downloaded += 1;
            tracing::info!("📥 Row {}: {} ({} bytes)", index + 1, local_path, response.body.len());
        }

        tracing::info!("✅ Downloaded {} documents", downloaded);
        Ok(downloaded)
    }

    fn session<'a>(&'a self, renewed: &'a Option<T>) -> &'a T {
        renewed.as_ref().unwrap_or(&self.transport)
    }

    /// GET with one retry on 500/503. The retry runs on a renewed session,
    /// which is then kept for the remaining documents.
    async fn fetch_document(&self, url: &Url, renewed: &mut Option<T>) -> Result<HttpResponse> {
        let mut response = self.session(renewed).get(url).await?;

        if response.is_transient_server_error() {
            tracing::warn!(
                "⚠️ Server error {} for {}, new session in {:?}",
                response.status,
                url,
                self.policy.download_retry_delay
            );
            tokio::time::sleep(self.policy.download_retry_delay).await;
            let fresh = self.session(renewed).renew()?;
            *renewed = Some(fresh);
            response = self.session(renewed).get(url).await?;
        }

        if !response.is_success() {
            return Err(CrawlError::FatalFetchError {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }

    /// `MM/<number>.pdf`, or `MM/<number>-<n>.pdf` for the first free `n`.
    async fn unique_path(&self, month: &str, document_number: &str) -> String {
        let stem = sanitize_file_stem(document_number);
        let mut candidate = format!("{}/{}.pdf", month, stem);
        let mut suffix = 1;
        while self.storage.exists(&candidate).await {
            candidate = format!("{}/{}-{}.pdf", month, stem, suffix);
            suffix += 1;
        }
        candidate
    }
}
