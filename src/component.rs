//! Feed component: binds a [`Pager`] to the lifetime of one screen.
//!
//! The component owns the pager and the list scroll position. Both live
//! exactly as long as the screen: created on activation, kept while the
//! screen is backgrounded, and dropped (cancelling in-flight fetches) when
//! the screen is destroyed.

use std::sync::Arc;

use tokio::sync::watch;

use crate::paging::{
    Applied, FeedSnapshot, FeedSource, LoadDirection, LoadStates, Pager, PagingConfig,
};

/// Where a component is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Started,
    Stopped,
    Destroyed,
}

/// Selection and viewport of the rendered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Selected slot, placeholders included.
    pub selected: usize,
    /// First visible slot; maintained by the renderer.
    pub offset: usize,
}

impl ScrollState {
    pub fn is_at_top(&self) -> bool {
        self.selected == 0 && self.offset == 0
    }
}

pub struct FeedComponent<T: Send + 'static> {
    pager: Option<Pager<T>>,
    lifecycle: Lifecycle,
    // TODO: persist across restarts once sessions are saved
    scroll: ScrollState,
    prefetch_distance: usize,
}

impl<T> FeedComponent<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn FeedSource<Item = T>>, config: PagingConfig) -> Self {
        Self {
            pager: Some(Pager::new(source, config)),
            lifecycle: Lifecycle::Created,
            scroll: ScrollState::default(),
            prefetch_distance: config.prefetch_distance,
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Activate the component. The first activation starts the pager;
    /// later ones resume from the cached snapshot.
    pub fn on_start(&mut self) {
        match self.lifecycle {
            Lifecycle::Created => {
                self.lifecycle = Lifecycle::Started;
                if let Some(pager) = self.pager.as_mut() {
                    pager.start();
                }
            }
            Lifecycle::Stopped => {
                tracing::debug!("Resuming feed from cached snapshot");
                self.lifecycle = Lifecycle::Started;
            }
            Lifecycle::Started | Lifecycle::Destroyed => {}
        }
    }

    pub fn on_stop(&mut self) {
        if self.lifecycle == Lifecycle::Started {
            self.lifecycle = Lifecycle::Stopped;
        }
    }

    /// Cancel in-flight fetches and release the pager. Idempotent.
    ///
    /// Dropping the component without calling this still aborts every fetch,
    /// since the pager aborts its tasks when dropped.
    pub fn on_destroy(&mut self) {
        if let Some(mut pager) = self.pager.take() {
            pager.cancel_all();
            tracing::debug!("Feed component destroyed");
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Current snapshot; empty once destroyed.
    pub fn snapshot(&self) -> Arc<FeedSnapshot<T>> {
        self.pager
            .as_ref()
            .map(Pager::snapshot)
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> Option<watch::Receiver<Arc<FeedSnapshot<T>>>> {
        self.pager.as_ref().map(Pager::subscribe)
    }

    pub fn load_states(&self) -> LoadStates {
        self.pager
            .as_ref()
            .map(|p| p.load_states().clone())
            .unwrap_or_default()
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    /// Renderer hook to record the viewport it settled on.
    pub fn set_offset(&mut self, offset: usize) {
        self.scroll.offset = offset;
    }

    /// Item under the selection, if it is loaded.
    pub fn selected_item(&self) -> Option<T> {
        self.snapshot()
            .get(self.scroll.selected)
            .flatten()
            .cloned()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Wait for the next fetch result and apply it. Never resolves once the
    /// component has been destroyed.
    pub async fn next_change(&mut self) -> Option<Applied> {
        let Some(pager) = self.pager.as_mut() else {
            return std::future::pending().await;
        };
        let slots_before = pager.snapshot().len();
        let applied = pager.next_completion().await;

        if let Some(applied) = applied {
            // Keep the selected item in place when newer slots land above it.
            // Placeholders above may shrink as items replace them, so the
            // shift is the change in slot count, not the items inserted.
            if applied.direction == LoadDirection::Prepend && self.scroll.selected > 0 {
                let shift = self.snapshot().len() as isize - slots_before as isize;
                self.scroll.selected = self.scroll.selected.saturating_add_signed(shift);
                self.scroll.offset = self.scroll.offset.saturating_add_signed(shift);
            }
            if applied.direction == LoadDirection::Refresh {
                self.scroll = ScrollState::default();
            }
        }
        self.clamp_selection();
        applied
    }

    /// Reset the list to its first slot. Returns `false` when already
    /// there or when there is nothing to scroll.
    pub fn scroll_to_top(&mut self) -> bool {
        if self.snapshot().is_empty() || self.scroll.is_at_top() {
            return false;
        }
        self.scroll = ScrollState::default();
        true
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.move_selection(rows.max(1) as isize);
    }

    pub fn page_up(&mut self, rows: usize) {
        self.move_selection(-(rows.max(1) as isize));
    }

    pub fn load_more(&mut self, direction: LoadDirection) -> bool {
        self.pager
            .as_mut()
            .is_some_and(|p| p.load_more(direction))
    }

    pub fn retry(&mut self, direction: LoadDirection) -> bool {
        self.pager.as_mut().is_some_and(|p| p.retry(direction))
    }

    pub fn retry_failed(&mut self) -> bool {
        self.pager.as_mut().is_some_and(Pager::retry_failed)
    }

    pub fn refresh(&mut self) {
        if let Some(pager) = self.pager.as_mut() {
            pager.refresh();
        }
    }

    /// Apply a local edit to loaded items (e.g. a status action result).
    pub fn update_items<F>(&mut self, edit: F) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        self.pager.as_mut().is_some_and(|p| p.update_items(edit))
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.snapshot().len();
        if len == 0 {
            return;
        }
        let at_head = self.scroll.selected == 0;
        let target = self.scroll.selected.saturating_add_signed(delta);
        self.scroll.selected = target.min(len - 1);

        if delta < 0 && at_head {
            self.prefetch(LoadDirection::Prepend);
        }
        if delta > 0 && self.scroll.selected + self.prefetch_distance >= len - 1 {
            self.prefetch(LoadDirection::Append);
        }
    }

    /// Scroll-driven load. Unlike an explicit `load_more`, a direction in
    /// error waits for the user to retry instead of refetching on every key.
    fn prefetch(&mut self, direction: LoadDirection) {
        let Some(pager) = self.pager.as_mut() else {
            return;
        };
        if pager.load_states().get(direction).is_error() {
            return;
        }
        if pager.load_more(direction) {
            tracing::trace!(direction = direction.name(), "Prefetching page");
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot().len();
        if len == 0 {
            self.scroll = ScrollState::default();
        } else if self.scroll.selected >= len {
            self.scroll.selected = len - 1;
        }
    }
}
