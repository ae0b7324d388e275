use crate::domain::model::PageSize;
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_OPEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+href=['"]([^'"]+)['"][^>]*>"#).expect("valid anchor pattern")
});

/// Query parameter holding the 1-based page number.
pub const PAGE_PARAM: &str = "pg";
/// Query parameter holding the results per page.
pub const PAGE_SIZE_PARAM: &str = "rpp";

/// Absolute URL of the "Next" link on `page`, or `None` on the last page.
///
/// An anchor's text runs up to its `</a>` or the next `<a href`, whichever
/// comes first, so an unclosed anchor never borrows a later anchor's text.
/// The text may contain other tags (`<b>Next</b>`).
pub fn next_page_url(page: &str, current_url: &Url) -> Result<Option<Url>> {
    let anchors: Vec<regex::Captures<'_>> = ANCHOR_OPEN_PATTERN.captures_iter(page).collect();

    for (index, caps) in anchors.iter().enumerate() {
        let text_start = caps.get(0).map_or(0, |m| m.end());
        let next_anchor = anchors
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(page.len(), |m| m.start());
        let Some(close) = page[text_start..next_anchor].find("</a>") else {
            continue;
        };

        if page[text_start..text_start + close].contains("Next") {
            let href = caps[1].replace("&amp;", "&");
            return Ok(Some(current_url.join(&href)?));
        }
    }
    Ok(None)
}

/// Page number carried by the URL's `pg` parameter.
pub fn page_number(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == PAGE_PARAM)
        .and_then(|(_, value)| value.parse().ok())
}

/// Copy of `url` asking for page `page` with `size` results per page.
/// Existing `pg` / `rpp` values are replaced.
pub fn with_paging(url: &Url, page: u32, size: PageSize) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM && key != PAGE_SIZE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut paged = url.clone();
    paged
        .query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(PAGE_PARAM, &page.to_string())
        .append_pair(PAGE_SIZE_PARAM, &size.get().to_string());
    paged
}
