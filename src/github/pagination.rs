//! Page-walking for list endpoints and `Link` header parsing.

use reqwest::Url;
use tracing::debug;

use super::types::Page;
use crate::error::{Error, Result};

/// Walk a paged listing from page 1 until no next page is reported.
///
/// `fetch` is called once per page. Any failure aborts the walk and is
/// returned as-is; items gathered so far are dropped. A next page that does
/// not move past the current one is rejected instead of looping.
pub fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let Page {
            items: batch,
            next_page,
        } = fetch(page)?;
        debug!(page, count = batch.len(), ?next_page, "fetched page");
        items.extend(batch);

        match next_page {
            Some(next) if next != 0 => {
                if next <= page {
                    return Err(Error::Pagination { page, next });
                }
                page = next;
            }
            _ => return Ok(items),
        }
    }
}

/// Extract the `page` number of the `rel="next"` entry of a `Link` header.
///
/// Returns `None` when there is no next link, or when it carries no usable
/// page number (a zero page counts as no next page).
pub fn next_page_from_link(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }

        let url = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(url).ok()?;
        url.query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse::<u32>().ok())
            .filter(|&page| page != 0)
    })
}
