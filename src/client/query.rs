/// Page size used when a list request names a sort but no size.
pub const ITEMS_PER_PAGE: u32 = 20;

/// Paging and sorting for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field,direction`, e.g. `id,asc`.
    pub sort: Option<String>,
}

impl QueryParams {
    pub fn page(page: u32, size: u32, sort: impl Into<String>) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            sort: Some(sort.into()),
        }
    }

    /// Query string for a list request. Paging is only sent together with a
    /// sort; every request carries a cache buster.
    pub fn to_query(&self, cache_buster: i64) -> String {
        match &self.sort {
            Some(sort) => format!(
                "page={}&size={}&sort={}&cacheBuster={}",
                self.page.unwrap_or(0),
                self.size.unwrap_or(ITEMS_PER_PAGE),
                sort,
                cache_buster
            ),
            None => format!("cacheBuster={}", cache_buster),
        }
    }
}
