use std::collections::BTreeMap;
use std::sync::LazyLock;
use regex::Regex;
use reqwest::header::HeaderMap;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

static LINK_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(.*)>").expect("static regex"));
static LINK_REL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"rel="?([^"]*)"?"#).expect("static regex"));
static PAGE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").expect("static regex"));

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub links: PageLinks,
}

impl<T> Page<T> {
    /// Builds a page, falling back to the item count when the service sent
    /// no usable total.
    pub fn new(items: Vec<T>, total_items: Option<u64>, links: PageLinks) -> Self {
        let total_items = total_items.unwrap_or(items.len() as u64);
        Self { items, total_items, links }
    }
}

/// Page numbers named by the `Link` header, keyed by relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks(BTreeMap<String, u32>);

impl PageLinks {
    /// Parse an RFC 5988 `Link` header as emitted by the service's pagination.
    /// Sections that do not parse are skipped.
    pub fn parse(header: &str) -> Self {
        let mut links = BTreeMap::new();
        for section in header.split(',') {
            let mut parts = section.split(';');
            let (Some(url_part), Some(rel_part)) = (parts.next(), parts.next()) else {
                continue;
            };
            let Some(url) = LINK_URL.captures(url_part.trim()).and_then(|c| c.get(1)) else {
                continue;
            };
            let Some(rel) = LINK_REL.captures(rel_part.trim()).and_then(|c| c.get(1)) else {
                continue;
            };
            let page = PAGE_PARAM
                .captures(url.as_str())
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok());
            if let Some(page) = page {
                links.insert(rel.as_str().to_string(), page);
            }
        }
        Self(links)
    }

    pub fn get(&self, rel: &str) -> Option<u32> {
        self.0.get(rel).copied()
    }

    pub fn next(&self) -> Option<u32> {
        self.get("next")
    }

    pub fn last(&self) -> Option<u32> {
        self.get("last")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

pub fn page_links(headers: &HeaderMap) -> PageLinks {
    headers
        .get(reqwest::header::LINK)
        .and_then(|v| v.to_str().ok())
        .map(PageLinks::parse)
        .unwrap_or_default()
}

/// 1-based bounds for "Showing a - b of n items".
pub fn item_range(page: u32, size: u32, total: u64) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let first = page as u64 * size as u64 + 1;
    let last = ((page as u64 + 1) * size as u64).min(total);
    (first.min(total), last)
}
