use crate::core::exporter::overview_writer;
use crate::domain::model::OVERVIEW_HEADER;
use crate::utils::error::{CrawlError, Result};
use std::path::{Path, PathBuf};

/// Page number encoded in a per-page file name (`12.csv` -> 12).
fn page_number(path: &Path) -> Option<u64> {
    if path.extension()? != "csv" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

/// Per-page CSV files in `directory`, in ascending page order.
pub fn page_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u64, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match page_number(&path) {
            Some(number) => pages.push((number, path)),
            None => tracing::debug!("Skipping {}, not a page file", path.display()),
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Concatenates the per-page files of `directory` into `output` below a
/// single overview header. Returns the number of rows written.
pub fn merge(directory: &Path, output: &Path) -> Result<usize> {
    let files = page_files(directory)?;
    // output 會先被清空，不能是輸入頁之一
    if let Ok(target) = output.canonicalize() {
        if files
            .iter()
            .any(|file| file.canonicalize().is_ok_and(|file| file == target))
        {
            return Err(CrawlError::InputValidationError {
                field: "output".to_string(),
                value: output.display().to_string(),
                reason: format!("is one of the page files in {}", directory.display()),
            });
        }
    }
    tracing::info!(
        "🔗 Merging {} page files from {}",
        files.len(),
        directory.display()
    );

    let mut writer = overview_writer(output)?;
    writer.write_record(OVERVIEW_HEADER)?;

    let mut rows = 0;
    for file in &files {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(file)?;
        let mut file_rows = 0;
        for record in reader.records() {
            writer.write_record(&record?)?;
            file_rows += 1;
        }
        tracing::debug!("{}: {} rows", file.display(), file_rows);
        rows += file_rows;
    }

    writer.flush()?;
    tracing::info!("✅ Merged {} rows into {}", rows, output.display());
    Ok(rows)
}
