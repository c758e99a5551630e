/// Page size limits for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// A resolved 1-based page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub limit: u32,
}

impl Page {
    pub fn offset(&self) -> u32 {
        (self.number - 1).saturating_mul(self.limit)
    }

    /// Rows to fetch: one past the page, to tell whether another page exists
    pub fn fetch_limit(&self) -> u32 {
        self.limit.saturating_add(1)
    }
}

impl PageSettings {
    /// Missing or zero page means the first page. A limit outside
    /// `1..=max_limit` falls back to the default.
    pub fn resolve(&self, page: Option<u32>, limit: Option<u32>) -> Page {
        let number = page.filter(|p| *p > 0).unwrap_or(1);
        let limit = limit
            .filter(|l| (1..=self.max_limit).contains(l))
            .unwrap_or(self.default_limit);
        Page { number, limit }
    }
}
