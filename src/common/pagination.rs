// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Query string ?page=&limit= dos listados paginados.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Normaliza os parâmetros: page >= 1, 1 <= limit <= 100.
    pub fn normalize(&self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, 100);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

// Envelope de página: totalPages = ceil(total / limit).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = total_pages(total, limit);
        Self {
            items,
            total,
            current_page: page,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 20), 5);
    }

    #[test]
    fn normalize_applies_defaults_and_bounds() {
        let params = PaginationParams {
            page: None,
            limit: None,
        };
        assert_eq!(params.normalize(20), (1, 20, 0));

        let params = PaginationParams {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(params.normalize(20), (3, 10, 20));

        // Valores absurdos são corrigidos em vez de quebrar a query.
        let params = PaginationParams {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!(params.normalize(20), (1, 100, 0));
    }

    #[test]
    fn page_envelope_flags_neighbours() {
        let page = Page::new(vec![1, 2], 25, 2, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert!(page.has_previous_page);

        let last = Page::new(vec![5], 25, 3, 10);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }
}
