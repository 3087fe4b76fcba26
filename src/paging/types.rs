use std::fmt;
use std::sync::Arc;

use super::source::FetchError;

// ============================================================================
// Cursors and Pages
// ============================================================================

/// Opaque continuation token for a paginated endpoint.
///
/// Produced by a previous fetch and handed back to the next one. Only
/// equality and absence carry meaning outside the source that minted it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(Arc<str>);

impl PageCursor {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(Arc::from(token.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of results, in server order.
///
/// `prev` points toward newer items, `next` toward older ones. Either is
/// `None` exactly when there is nothing more in that direction.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub prev: Option<PageCursor>,
    pub next: Option<PageCursor>,
    /// Count of items the server knows about before this page, if reported.
    pub items_before: Option<usize>,
    /// Count of items the server knows about after this page, if reported.
    pub items_after: Option<usize>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, prev: Option<PageCursor>, next: Option<PageCursor>) -> Self {
        Self {
            items,
            prev,
            next,
            items_before: None,
            items_after: None,
        }
    }

    /// A page with no items and no cursors in either direction.
    pub fn empty() -> Self {
        Self::new(Vec::new(), None, None)
    }

    pub fn with_counts(mut self, items_before: Option<usize>, items_after: Option<usize>) -> Self {
        self.items_before = items_before;
        self.items_after = items_after;
        self
    }
}

// ============================================================================
// Load Directions and States
// ============================================================================

/// Which end of the feed a fetch is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    /// Initial load or a user-requested reload; replaces accumulated items.
    Refresh,
    /// Toward newer items, inserted before the current head.
    Prepend,
    /// Toward older items, appended after the current tail.
    Append,
}

impl LoadDirection {
    pub const ALL: [LoadDirection; 3] = [Self::Refresh, Self::Prepend, Self::Append];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Refresh => 0,
            Self::Prepend => 1,
            Self::Append => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Prepend => "prepend",
            Self::Append => "append",
        }
    }
}

/// Status of one load direction.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Idle. `end_reached` is set once a fetch in this direction returned no
    /// cursor; it stays set until a refresh.
    NotLoading { end_reached: bool },
    Loading,
    Error(Arc<FetchError>),
}

impl LoadState {
    pub const IDLE: LoadState = LoadState::NotLoading { end_reached: false };

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn end_reached(&self) -> bool {
        matches!(self, Self::NotLoading { end_reached: true })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// The three per-direction load states of a feed.
#[derive(Debug, Clone, Default)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl LoadStates {
    pub fn get(&self, direction: LoadDirection) -> &LoadState {
        match direction {
            LoadDirection::Refresh => &self.refresh,
            LoadDirection::Prepend => &self.prepend,
            LoadDirection::Append => &self.append,
        }
    }

    pub(crate) fn set(&mut self, direction: LoadDirection, state: LoadState) {
        match direction {
            LoadDirection::Refresh => self.refresh = state,
            LoadDirection::Prepend => self.prepend = state,
            LoadDirection::Append => self.append = state,
        }
    }

    /// True if any direction has a fetch in flight.
    pub fn any_loading(&self) -> bool {
        LoadDirection::ALL
            .iter()
            .any(|d| self.get(*d).is_loading())
    }
}

// ============================================================================
// Paging Configuration
// ============================================================================

/// Tuning knobs shared by every pager in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Items requested per fetch.
    pub page_size: u32,
    /// How close to the tail the selection may get before the next page is
    /// requested.
    pub prefetch_distance: usize,
    /// Whether snapshots expose placeholder slots for items the server
    /// reported but that are not loaded yet.
    pub enable_placeholders: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            prefetch_distance: 5,
            enable_placeholders: false,
        }
    }
}
