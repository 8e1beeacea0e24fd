//! Helpers shared across route groups.

use serde::Deserialize;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Standard pagination query parameters.
#[derive(Debug, Deserialize, Default)]
pub struct PageReq {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageReq {
    /// Clamped `(page, per_page)` pair: page ≥ 1, 1 ≤ per_page ≤ 100.
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}
