use crate::config::ListConfig;
use crate::listing::{aggregate, clamp_page, slice, total_pages, FilterField, FilterSet, Sorter};
use crate::models::ListRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// A rendered row. `key` is the row's 1-based position in the current
/// filtered and sorted order, zero-padded. It changes whenever filters or
/// sorting change and must not be used as an identity; use the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow<'a, R> {
    pub key: String,
    pub record: &'a R,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<'a, R> {
    pub rows: Vec<DisplayRow<'a, R>>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub source_count: usize,
}

/// Mutable state of one list view: filter values, sort, page and page size.
///
/// The view never owns records. Each [`ListView::render`] reruns
/// filter, sort and slice over the source it is given.
#[derive(Debug, Clone)]
pub struct ListView {
    filters: FilterSet,
    sorter: Sorter,
    page: usize,
    page_size: usize,
    max_page_size: usize,
    key_width: usize,
    // Page count seen by the last render; `None` once filters change.
    known_total_pages: Option<usize>,
}

impl Default for ListView {
    fn default() -> Self {
        Self::with_config(&ListConfig::default())
    }
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ListConfig) -> Self {
        let max_page_size = config.max_page_size.max(1);
        Self {
            filters: FilterSet::default(),
            sorter: config.default_sort,
            page: 1,
            page_size: config.default_page_size.clamp(1, max_page_size),
            max_page_size,
            key_width: config.key_width.max(1),
            known_total_pages: None,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sorter(&self) -> Sorter {
        self.sorter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_filter(&mut self, field: FilterField, raw: &str) {
        self.filters.set(field, raw);
        tracing::debug!(field = %field, value = raw, "list filter changed");
        self.reset_page();
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterSet::default();
        self.reset_page();
    }

    pub fn set_sort(&mut self, sorter: Sorter) {
        self.sorter = sorter;
        self.reset_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.clamp(1, self.max_page_size);
        self.reset_page();
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = match self.known_total_pages {
            Some(total) => clamp_page(page, total),
            None => page.max(1),
        };
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.page = 1;
    }

    /// Jumps to the last page seen by the previous render.
    pub fn last_page(&mut self) {
        if let Some(total) = self.known_total_pages {
            self.page = total;
        }
    }

    /// Filters, sorts and slices `source` into the current page. A page that
    /// fell out of range (for example after rows were removed) is clamped.
    pub fn render<'a, R: ListRecord>(&mut self, source: &'a [R]) -> ListPage<'a, R> {
        let mut filtered = self.filters.apply(source);
        self.sorter.apply(&mut filtered);

        let total = total_pages(filtered.len(), self.page_size);
        self.known_total_pages = Some(total);
        self.page = clamp_page(self.page, total);

        let width = self.key_width.max(digits(filtered.len()));
        let offset = (self.page - 1) * self.page_size;
        let rows = slice(&filtered, self.page, self.page_size)
            .iter()
            .enumerate()
            .map(|(index, record)| DisplayRow {
                key: format!("{:0width$}", offset + index + 1, width = width),
                record: *record,
            })
            .collect();

        ListPage {
            rows,
            page: self.page,
            page_size: self.page_size,
            total_pages: total,
            filtered_count: filtered.len(),
            source_count: source.len(),
        }
    }

    /// Badge counts over the whole source. Filter and page state do not
    /// take part.
    pub fn badge_counts<R, K, F>(source: &[R], categorizer: F) -> BTreeMap<K, usize>
    where
        K: Ord,
        F: FnMut(&R) -> Option<K>,
    {
        aggregate::counts(source, categorizer)
    }

    fn reset_page(&mut self) {
        self.page = 1;
        self.known_total_pages = None;
    }
}

fn digits(value: usize) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}
