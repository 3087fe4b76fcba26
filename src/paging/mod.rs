//! Paged, cancellable feeds.
//!
//! - [`source`] - the [`FeedSource`] contract over one remote paginated list
//! - [`pager`] - per-direction load state machines and item accumulation
//! - [`snapshot`] - the read-only view published to the presentation layer
//! - [`types`] - cursors, pages, load states and paging configuration
//!
//! Data flows one way: source → pager → snapshot subscribers. Commands
//! (`load_more`, `retry`, `refresh`) flow back into the pager.

mod pager;
mod snapshot;
mod source;
mod types;

pub use pager::{Applied, Pager};
pub use snapshot::{FeedSnapshot, SnapshotIter};
pub use source::{FeedSource, FetchError};
pub use types::{LoadDirection, LoadState, LoadStates, Page, PageCursor, PagingConfig};
