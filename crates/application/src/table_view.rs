use chronopay_core::AppResult;
use chronopay_domain::{PageMarker, Pagination};

/// Row predicate deciding whether a row matches a search term.
pub type SearchMatcher<T> = fn(&T, &str) -> bool;

/// Searchable, paginated projection of an in-memory list.
///
/// The filtered subset is recomputed whenever the items or the search term
/// change; a new search term returns to page 1.
#[derive(Debug, Clone)]
pub struct TableView<T> {
    items: Vec<T>,
    search_term: String,
    filtered: Vec<usize>,
    pagination: Pagination,
    matcher: SearchMatcher<T>,
}

impl<T> TableView<T> {
    /// Creates an empty view with a fixed page size.
    pub fn new(page_size: usize, matcher: SearchMatcher<T>) -> AppResult<Self> {
        Ok(Self {
            items: Vec::new(),
            search_term: String::new(),
            filtered: Vec::new(),
            pagination: Pagination::new(page_size)?,
            matcher,
        })
    }

    /// Replaces the rows, keeping the search term and page where possible.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refilter();
    }

    /// Changes the search term and returns to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.pagination.reset();
        self.refilter();
    }

    /// Returns the current search term.
    #[must_use]
    pub fn search_term(&self) -> &str {
        self.search_term.as_str()
    }

    /// Returns every row.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Returns the rows matching the search term.
    #[must_use]
    pub fn filtered(&self) -> Vec<&T> {
        self.filtered
            .iter()
            .filter_map(|index| self.items.get(*index))
            .collect()
    }

    /// Returns the number of rows matching the search term.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Returns whether the table shows its "no data" row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    /// Returns the rows on the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<&T> {
        self.pagination
            .slice(self.filtered.as_slice())
            .iter()
            .filter_map(|index| self.items.get(*index))
            .collect()
    }

    /// Returns a row on the current page by its position on that page.
    #[must_use]
    pub fn page_row(&self, position: usize) -> Option<&T> {
        self.pagination
            .slice(self.filtered.as_slice())
            .get(position)
            .and_then(|index| self.items.get(*index))
    }

    /// Returns the pagination cursor.
    #[must_use]
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Returns the page-number control entries.
    #[must_use]
    pub fn markers(&self) -> Vec<PageMarker> {
        self.pagination.markers()
    }

    /// Moves to the next page; false at the last page.
    pub fn next_page(&mut self) -> bool {
        self.pagination.next()
    }

    /// Moves to the previous page; false at the first page.
    pub fn previous_page(&mut self) -> bool {
        self.pagination.previous()
    }

    /// Jumps to a page; false when out of range.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pagination.go_to(page)
    }

    fn refilter(&mut self) {
        let term = self.search_term.as_str();
        let matcher = self.matcher;
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| matcher(item, term).then_some(index))
            .collect();
        self.pagination.set_total_items(self.filtered.len());
    }
}
