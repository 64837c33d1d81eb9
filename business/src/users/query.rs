//! Query Parameters for the user list.

use std::str::FromStr;

/// Allowed rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    Ten,
    #[default]
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::Twenty, PageSize::Fifty];

    pub fn value(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    /// The rejected value.
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|size| size.value() == value)
            .ok_or(value)
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a number"))?;
        Self::try_from(value).map_err(|v| format!("page size must be 10, 20 or 50 (got {v})"))
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// 1-based.
    pub page: u32,
    pub page_size: PageSize,
    /// Stabilized search term, possibly empty.
    pub search_term: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PageSize::default(),
            search_term: String::new(),
        }
    }
}

impl QueryParams {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// URL query pairs. `search` is sent trimmed, and only when non-empty.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("pageSize", self.page_size.value().to_string()),
        ];
        let search = self.search_term.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_owned()));
        }
        pairs
    }
}

/// `max(1, ceil(total / page_size))`
pub fn pages_count(total: u64, page_size: PageSize) -> u32 {
    let pages = total.div_ceil(u64::from(page_size.value())).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
