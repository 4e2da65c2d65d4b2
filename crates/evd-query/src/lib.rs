//! # evd-query: List Logic
//!
//! Synchronous transformations over evidence already resident in memory:
//!
//! - [`filter`]: conjunctive search/province/status/link-type criteria.
//! - [`page`]: 1-based pagination and the list state that resets to page 1
//!   whenever a criterion changes.
//! - [`sort`]: single-column sort with click-to-toggle direction.
//! - [`queue`]: the review queue (records awaiting a decision).
//! - [`visibility`]: scope-based visibility as a pure function of the
//!   caller's session and the record.
//! - [`select`]: positioning, search and load-more gating for an
//!   externally-paged dropdown.
//!
//! Nothing here performs I/O or holds shared state.

pub mod error;
pub mod filter;
pub mod page;
pub mod queue;
pub mod select;
pub mod sort;
pub mod visibility;

pub use error::QueryError;
pub use filter::EvidenceFilter;
pub use page::{paginate, total_pages, ListState, Page, DEFAULT_PAGE_SIZE};
pub use queue::{review_queue, QueueSummary};
pub use select::{
    compute_position, filter_options, page_options, DropdownPosition, LoadMoreGate, OptionPage,
    Placement, Rect, ScrollMetrics, SelectEvent, SelectModel, SelectOption, Viewport,
};
pub use sort::{sort_items, SortDirection, SortKey, SortState};
pub use visibility::{is_visible, partition, TeamDistrict, TeamDistrictMap, VisibilityPolicy};
