//! Pagination reconciliation
//!
//! Server-driven pages take their metadata from the backend; client-driven
//! pages are sliced from a fully loaded list. Both feed the same
//! page-control contract and page-number strip.

use shared::{BackendPagination, PaginationMeta};

use crate::types::{PageChange, PageItem, PaginationMode};

/// Pages shown without ellipses
const MAX_INLINE_PAGES: u32 = 7;

/// Metadata for a server-driven page
///
/// Missing backend fields fall back to counts computed from the items that
/// were actually returned.
pub fn server_pagination(
    backend: Option<&BackendPagination>,
    requested_page: u32,
    page_size: u32,
    item_count: usize,
) -> PaginationMeta {
    let backend = backend.copied().unwrap_or_default();
    let page_size = backend.page_size.filter(|&size| size > 0).unwrap_or(page_size).max(1);
    let total_items = backend.total_items.unwrap_or(item_count as u64);
    let total_pages = backend
        .total_pages
        .filter(|&pages| pages > 0)
        .unwrap_or_else(|| total_items.div_ceil(u64::from(page_size)).max(1) as u32);
    let current_page = backend
        .current_page
        .unwrap_or(requested_page)
        .clamp(1, total_pages);

    PaginationMeta {
        current_page,
        page_size,
        total_pages,
        total_items,
    }
}

/// Slice one client-driven page out of a full list
pub fn client_slice<T: Clone>(items: &[T], page: u32, page_size: u32) -> (Vec<T>, PaginationMeta) {
    let meta = PaginationMeta::computed(page, page_size, items.len() as u64);
    let total = items.len();
    let start = ((meta.current_page - 1) as usize).saturating_mul(meta.page_size as usize).min(total);
    let end = (start + meta.page_size as usize).min(total);
    (items[start..end].to_vec(), meta)
}

/// 1-based inclusive item range shown on a page, `(0, 0)` when empty
pub fn visible_range(meta: &PaginationMeta, items_on_page: usize) -> (u64, u64) {
    if items_on_page == 0 {
        return (0, 0);
    }
    let start = u64::from(meta.current_page - 1) * u64::from(meta.page_size) + 1;
    (start, start + items_on_page as u64 - 1)
}

/// "Showing X-Y of Z" summary line
pub fn range_summary(meta: &PaginationMeta, items_on_page: usize) -> String {
    let (start, end) = visible_range(meta, items_on_page);
    if end == 0 {
        return "No results".to_string();
    }
    format!("Showing {start}-{end} of {}", meta.total_items)
}

/// Page-number strip for the pager
///
/// Up to seven pages are listed in full. Longer ranges always show pages 1,
/// 2 and the last page, plus a window around the current page, with an
/// ellipsis wherever pages are skipped.
pub fn page_numbers(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);

    if total <= MAX_INLINE_PAGES {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1), PageItem::Page(2)];

    let window_start = current.saturating_sub(1).max(3);
    let window_end = (current + 1).min(total - 1);

    if window_start > 3 {
        items.push(PageItem::Ellipsis);
    }
    for page in window_start..=window_end {
        items.push(PageItem::Page(page));
    }
    if window_end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));

    items
}

/// Page-control state for one listing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControl {
    current_page: u32,
    total_pages: u32,
    mode: PaginationMode,
}

impl PageControl {
    pub fn new(mode: PaginationMode) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            mode,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// Adopt the metadata of a freshly rendered page
    pub fn sync(&mut self, meta: &PaginationMeta) {
        self.total_pages = meta.total_pages.max(1);
        self.current_page = meta.current_page.clamp(1, self.total_pages);
    }

    /// Go back to page 1 after a filter change
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Apply a page request
    ///
    /// The request is clamped to `[1, total_pages]`. Landing on the current
    /// page changes nothing; any other page becomes current, asks for a
    /// scroll to the top and, when server-driven, a new fetch.
    pub fn request_page(&mut self, requested: i64) -> PageChange {
        let clamped = requested.clamp(1, i64::from(self.total_pages)) as u32;
        if clamped == self.current_page {
            return PageChange::Unchanged;
        }

        self.current_page = clamped;
        PageChange::Changed {
            page: clamped,
            refetch: self.mode == PaginationMode::ServerDriven,
            scroll_to_top: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_page_numbers_short_ranges_listed_in_full() {
        assert_eq!(page_numbers(1, 1), vec![Page(1)]);
        assert_eq!(page_numbers(3, 7), (1..=7).map(Page).collect::<Vec<_>>());
        assert_eq!(page_numbers(1, 0), vec![Page(1)]);
    }

    #[test]
    fn test_page_numbers_middle_of_long_range() {
        assert_eq!(
            page_numbers(5, 10),
            vec![Page(1), Page(2), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn test_page_numbers_edges_of_long_range() {
        assert_eq!(page_numbers(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(page_numbers(2, 10), vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]);
        assert_eq!(
            page_numbers(4, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(7, 10),
            vec![Page(1), Page(2), Ellipsis, Page(6), Page(7), Page(8), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(8, 10),
            vec![Page(1), Page(2), Ellipsis, Page(7), Page(8), Page(9), Page(10)]
        );
        assert_eq!(page_numbers(10, 10), vec![Page(1), Page(2), Ellipsis, Page(9), Page(10)]);
    }

    #[test]
    fn test_page_numbers_never_repeat_or_skip_silently() {
        for total in 8..=20 {
            for current in 1..=total {
                let items = page_numbers(current, total);
                let mut previous = 0;
                let mut after_ellipsis = false;
                for item in items {
                    match item {
                        Page(n) => {
                            assert!(n > previous, "order {current}/{total}");
                            if !after_ellipsis {
                                assert_eq!(n, previous + 1, "silent gap {current}/{total}");
                            }
                            previous = n;
                            after_ellipsis = false;
                        }
                        Ellipsis => after_ellipsis = true,
                    }
                }
                assert_eq!(previous, total);
            }
        }
    }

    #[test]
    fn test_server_pagination_prefers_backend_metadata() {
        let backend = BackendPagination {
            current_page: Some(3),
            page_size: Some(20),
            total_pages: Some(9),
            total_items: Some(175),
        };
        let meta = server_pagination(Some(&backend), 1, 12, 20);
        assert_eq!(
            meta,
            PaginationMeta {
                current_page: 3,
                page_size: 20,
                total_pages: 9,
                total_items: 175
            }
        );
    }

    #[test]
    fn test_server_pagination_falls_back_to_item_counts() {
        let meta = server_pagination(None, 1, 12, 5);
        assert_eq!(meta.total_items, 5);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.page_size, 12);

        let partial = BackendPagination {
            total_items: Some(50),
            ..Default::default()
        };
        let meta = server_pagination(Some(&partial), 2, 12, 12);
        assert_eq!(meta.total_pages, 5);
        assert_eq!(meta.current_page, 2);
    }

    #[test]
    fn test_client_slice_bounds() {
        let items: Vec<u32> = (1..=25).collect();

        let (page, meta) = client_slice(&items, 1, 10);
        assert_eq!(page, (1..=10).collect::<Vec<_>>());
        assert_eq!(meta.total_pages, 3);

        let (page, _) = client_slice(&items, 3, 10);
        assert_eq!(page, vec![21, 22, 23, 24, 25]);

        let (page, meta) = client_slice(&items, 99, 10);
        assert_eq!(meta.current_page, 3);
        assert_eq!(page.len(), 5);

        let (page, meta) = client_slice::<u32>(&[], 1, 10);
        assert!(page.is_empty());
        assert_eq!(meta.total_pages, 1);
    }

    #[test]
    fn test_range_summary() {
        let meta = PaginationMeta::computed(2, 10, 25);
        assert_eq!(visible_range(&meta, 10), (11, 20));
        assert_eq!(range_summary(&meta, 10), "Showing 11-20 of 25");
        assert_eq!(range_summary(&meta, 0), "No results");
    }

    #[test]
    fn test_request_page_clamps_and_detects_no_op() {
        let mut control = PageControl::new(PaginationMode::ServerDriven);
        control.sync(&PaginationMeta::computed(1, 10, 50));

        assert_eq!(control.request_page(1), PageChange::Unchanged);
        assert_eq!(control.request_page(-4), PageChange::Unchanged);

        assert_eq!(
            control.request_page(99),
            PageChange::Changed {
                page: 5,
                refetch: true,
                scroll_to_top: true
            }
        );
        assert_eq!(control.current_page(), 5);
        assert_eq!(control.request_page(5), PageChange::Unchanged);
    }

    #[test]
    fn test_client_driven_page_change_needs_no_fetch() {
        let mut control = PageControl::new(PaginationMode::ClientDriven);
        control.sync(&PaginationMeta::computed(1, 10, 30));

        assert_eq!(
            control.request_page(2),
            PageChange::Changed {
                page: 2,
                refetch: false,
                scroll_to_top: true
            }
        );
    }
}
