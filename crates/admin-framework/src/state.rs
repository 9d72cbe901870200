//! View-model state shared by the hooks.
//!
//! All of these are transient: created when a hook is built, mutated on
//! every request lifecycle event, dropped with the hook.

/// Lifecycle of a single request: `loading` while in flight, then either
/// `data` or `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Page/limit request parameters. `page` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Pagination bookkeeping.
///
/// `total_pages == ceil(total / limit)` unless the server reported its own
/// value. The upper bound on `page` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationState {
    pub fn new(query: PageQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
            total: 0,
            total_pages: 0,
        }
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::new(self.page, self.limit)
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(total / limit)`; a zero limit yields zero pages.
pub fn total_pages_for(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages_for(45, 20), 3);
        assert_eq!(total_pages_for(40, 20), 2);
        assert_eq!(total_pages_for(0, 20), 0);
        assert_eq!(total_pages_for(1, 20), 1);
        assert_eq!(total_pages_for(10, 0), 0);
    }

    #[test]
    fn test_navigation_flags() {
        let mut state = PaginationState::new(PageQuery::new(1, 20));
        state.total = 45;
        state.total_pages = 3;
        assert!(state.has_next());
        assert!(!state.has_previous());

        state.page = 3;
        assert!(!state.has_next());
        assert!(state.has_previous());
    }
}
