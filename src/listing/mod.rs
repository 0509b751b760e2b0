pub mod aggregate;
pub mod filter;
pub mod paginate;
pub mod sort;

pub use aggregate::{counts, counts_by_category, counts_by_status, counts_with};
pub use filter::{AssigneeFilter, DateFilter, FilterField, FilterSet};
pub use paginate::{clamp_page, paginate, slice, total_pages, Page};
pub use sort::{SortDirection, SortKey, Sorter};
