use chronopay_core::{AppError, AppResult};

/// Number of page buttons shown before the control switches to a window.
pub const FULL_PAGE_LIST_LIMIT: usize = 7;

/// One entry of the page-number control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    /// A selectable page number, 1-based.
    Page(usize),
    /// Collapsed run of page numbers.
    Ellipsis,
}

/// Page cursor over a filtered list of fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current_page: usize,
    total_items: usize,
}

impl Pagination {
    /// Creates a cursor on page 1.
    pub fn new(page_size: usize) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Validation(
                "page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            page_size,
            current_page: 1,
            total_items: 0,
        })
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the current 1-based page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the number of pages; an empty list has zero pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Updates the item count, clamping the current page into range.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = self.current_page.clamp(1, self.total_pages().max(1));
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Returns whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Returns whether a previous page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Advances one page; returns false at the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Goes back one page; returns false at the first page.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    /// Jumps to a page; pages outside `1..=total_pages` are refused.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page == 0 || page > self.total_pages() {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Returns the index range of the current page within the filtered list.
    #[must_use]
    pub fn current_range(&self) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    /// Returns the slice of `items` on the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.current_range();
        items
            .get(range.start.min(items.len())..range.end.min(items.len()))
            .unwrap_or(&[])
    }

    /// Returns the page-number control entries.
    ///
    /// Small counts list every page. Larger counts keep the first and last
    /// page plus the neighbours of the current page, collapsing gaps.
    #[must_use]
    pub fn markers(&self) -> Vec<PageMarker> {
        let total = self.total_pages();
        if total <= FULL_PAGE_LIST_LIMIT {
            return (1..=total).map(PageMarker::Page).collect();
        }

        let current = self.current_page;
        let window_start = current.saturating_sub(1).max(2);
        let window_end = (current + 1).min(total - 1);

        let mut markers = vec![PageMarker::Page(1)];
        if window_start > 2 {
            markers.push(PageMarker::Ellipsis);
        }
        markers.extend((window_start..=window_end).map(PageMarker::Page));
        if window_end < total - 1 {
            markers.push(PageMarker::Ellipsis);
        }
        markers.push(PageMarker::Page(total));
        markers
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{PageMarker, Pagination};

    fn pagination(page_size: usize, total_items: usize) -> Pagination {
        let mut pagination = Pagination::new(page_size).unwrap_or(Pagination {
            page_size: 10,
            current_page: 1,
            total_items: 0,
        });
        pagination.set_total_items(total_items);
        pagination
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Pagination::new(0).is_err());
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut cursor = pagination(10, 25);
        assert_eq!(cursor.total_pages(), 3);
        assert!(!cursor.previous());
        assert!(cursor.next());
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.current_page(), 3);
        assert!(!cursor.go_to(4));
    }

    #[test]
    fn small_counts_list_every_page() {
        let cursor = pagination(10, 70);
        assert_eq!(cursor.markers(), (1..=7).map(PageMarker::Page).collect::<Vec<_>>());
    }

    #[test]
    fn large_counts_window_around_current_page() {
        let mut cursor = pagination(10, 200);
        assert!(cursor.go_to(10));
        assert_eq!(
            cursor.markers(),
            vec![
                PageMarker::Page(1),
                PageMarker::Ellipsis,
                PageMarker::Page(9),
                PageMarker::Page(10),
                PageMarker::Page(11),
                PageMarker::Ellipsis,
                PageMarker::Page(20),
            ]
        );
    }

    #[test]
    fn window_at_first_page_has_single_ellipsis() {
        let cursor = pagination(10, 200);
        assert_eq!(
            cursor.markers(),
            vec![
                PageMarker::Page(1),
                PageMarker::Page(2),
                PageMarker::Ellipsis,
                PageMarker::Page(20),
            ]
        );
    }

    #[test]
    fn shrinking_list_clamps_current_page() {
        let mut cursor = pagination(10, 50);
        assert!(cursor.go_to(5));
        cursor.set_total_items(12);
        assert_eq!(cursor.current_page(), 2);
    }

    proptest! {
        #[test]
        fn pages_cover_every_item_exactly_once(page_size in 1usize..50, total in 0usize..500) {
            let items: Vec<usize> = (0..total).collect();
            let mut cursor = pagination(page_size, total);
            let mut seen = cursor.slice(&items).len();
            while cursor.next() {
                seen += cursor.slice(&items).len();
            }
            prop_assert_eq!(seen, total);
            prop_assert!(!cursor.has_next());
        }

        #[test]
        fn markers_always_include_current_and_bounds(page_size in 1usize..5, total in 1usize..200, target in 1usize..200) {
            let mut cursor = pagination(page_size, total);
            let _ = cursor.go_to(target);
            let markers = cursor.markers();
            prop_assert!(markers.contains(&PageMarker::Page(cursor.current_page())));
            prop_assert_eq!(markers.first(), Some(&PageMarker::Page(1)));
            prop_assert_eq!(markers.last(), Some(&PageMarker::Page(cursor.total_pages())));
        }
    }
}
