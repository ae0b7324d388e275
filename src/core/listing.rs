//! Parses one page of the archive's search results table.

use crate::domain::model::OverviewRow;
use crate::utils::error::{CrawlError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static RESULTS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#queryResults").expect("valid table selector"));
static RESULT_ROWS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table#queryResults > tbody > tr").expect("valid row selector")
});
static MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ ]{2,}").expect("valid whitespace pattern"));

/// Link cell plus date, document number, film number, from, subject, tags, to.
const DATA_COLUMNS: usize = 8;

/// Folds every run of two or more spaces into a single space.
pub fn fold_whitespace(text: &str) -> String {
    MULTIPLE_SPACES.replace_all(text, " ").into_owned()
}

pub struct ListingPage {
    document: Html,
}

impl ListingPage {
    pub fn parse(page: &[u8]) -> Self {
        Self {
            document: Html::parse_document(&String::from_utf8_lossy(page)),
        }
    }

    /// Rows of the result table in page order. Relative document links are
    /// resolved against `page_url`.
    pub fn rows<'a>(
        &'a self,
        page_url: &'a Url,
    ) -> Result<impl Iterator<Item = Result<OverviewRow>> + 'a> {
        if self.document.select(&RESULTS_TABLE).next().is_none() {
            return Err(CrawlError::parse(format!(
                "no result table (table#queryResults) on {}",
                page_url
            )));
        }

        Ok(self
            .document
            .select(&RESULT_ROWS)
            .map(move |row| parse_row(row, page_url)))
    }
}

/// Parses a whole page at once. The parsed document is dropped before
/// returning, so callers can hold the rows across `.await` points.
pub fn parse_rows(page: &[u8], page_url: &Url) -> Result<Vec<OverviewRow>> {
    ListingPage::parse(page).rows(page_url)?.collect()
}

fn child_elements<'a>(
    element: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Text before the first child element, `None` if there is none.
fn leading_text(cell: ElementRef<'_>) -> Option<String> {
    let text: String = cell
        .children()
        .map_while(|node| node.value().as_text().map(|text| (**text).to_owned()))
        .collect();
    (!text.is_empty()).then_some(text)
}

fn parse_row(row: ElementRef<'_>, page_url: &Url) -> Result<OverviewRow> {
    let mut cells: Vec<ElementRef<'_>> = child_elements(row, "td").collect();
    // 最後一欄是序號，不是資料
    cells.pop();

    if cells.len() != DATA_COLUMNS {
        return Err(CrawlError::parse(format!(
            "expected {} data columns in result row, found {}",
            DATA_COLUMNS,
            cells.len()
        )));
    }

    let href = child_elements(cells[0], "a")
        .find_map(|anchor| anchor.value().attr("href"))
        .ok_or_else(|| CrawlError::parse("result row without a document link"))?;

    let text = |index: usize| leading_text(cells[index]).unwrap_or_default();

    Ok(OverviewRow {
        document_url: page_url.join(href)?.to_string(),
        draft_date: text(1),
        document_number: text(2),
        film_number: text(3),
        from: text(4),
        subject: fold_whitespace(&text(5)),
        tags: text(6),
        to: text(7),
    })
}
