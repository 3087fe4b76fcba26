//! Pager: turns a [`FeedSource`] into a stream of feed snapshots.
//!
//! Each load direction is a small state machine:
//!
//! ```text
//! NotLoading --load_more--> Loading --ok--> NotLoading
//!                              |
//!                              +--err--> Error --retry--> Loading
//! ```
//!
//! Fetches run as spawned tasks. Their results come back over a channel and
//! are applied by [`Pager::next_completion`] on the task that owns the pager,
//! so the accumulated state is only ever touched from one place. Every fetch
//! carries a generation number; a completion whose generation no longer
//! matches the in-flight fetch for its direction was cancelled and is
//! dropped without touching the snapshot.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::snapshot::FeedSnapshot;
use super::source::{FeedSource, FetchError};
use super::types::{LoadDirection, LoadState, LoadStates, Page, PageCursor, PagingConfig};

/// A fetch that has been spawned and not yet applied.
struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Bookkeeping for one load direction.
#[derive(Default)]
struct DirectionState {
    /// Cursor the next fetch in this direction will use.
    cursor: Option<PageCursor>,
    in_flight: Option<InFlight>,
    /// Cursor of the last failed attempt, kept for `retry`.
    failed_cursor: Option<Option<PageCursor>>,
}

/// Result of a spawned fetch, sent back to the owning task.
struct Completion<T> {
    direction: LoadDirection,
    generation: u64,
    cursor: Option<PageCursor>,
    result: Result<Page<T>, FetchError>,
}

/// What a successfully applied completion did to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub direction: LoadDirection,
    /// Items added by this completion (for a refresh, the new total).
    pub inserted: usize,
}

pub struct Pager<T: Send + 'static> {
    source: Arc<dyn FeedSource<Item = T>>,
    config: PagingConfig,
    items: Arc<Vec<T>>,
    placeholders_before: usize,
    placeholders_after: usize,
    load_states: LoadStates,
    directions: [DirectionState; 3],
    started: bool,
    /// Set once a refresh has succeeded; prepend/append need its cursors.
    refreshed: bool,
    next_generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion<T>>,
    completion_rx: mpsc::UnboundedReceiver<Completion<T>>,
    snapshot_tx: watch::Sender<Arc<FeedSnapshot<T>>>,
}

impl<T> Pager<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<dyn FeedSource<Item = T>>, config: PagingConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(Arc::new(FeedSnapshot::empty()));
        Self {
            source,
            config,
            items: Arc::new(Vec::new()),
            placeholders_before: 0,
            placeholders_after: 0,
            load_states: LoadStates::default(),
            directions: Default::default(),
            started: false,
            refreshed: false,
            next_generation: 0,
            completion_tx,
            completion_rx,
            snapshot_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------------

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<FeedSnapshot<T>> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// Subscribe to snapshots; the receiver sees every later publication.
    pub fn subscribe(&self) -> watch::Receiver<Arc<FeedSnapshot<T>>> {
        self.snapshot_tx.subscribe()
    }

    pub fn load_states(&self) -> &LoadStates {
        &self.load_states
    }

    /// Cursor the next fetch in `direction` would use.
    pub fn cursor(&self, direction: LoadDirection) -> Option<&PageCursor> {
        self.directions[direction.index()].cursor.as_ref()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Issue the initial fetch. Only the first call does anything.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        tracing::debug!("Starting pager");
        self.issue(LoadDirection::Refresh, None);
        true
    }

    /// Reload from the top, superseding any in-flight fetch.
    pub fn refresh(&mut self) {
        self.started = true;
        self.issue(LoadDirection::Refresh, None);
    }

    /// Fetch the next page in `direction`.
    ///
    /// Returns `false` without fetching when that direction is already
    /// loading or has no cursor left. A `Refresh` request is only honoured
    /// when no refresh is in flight, and prepend/append wait for an in-flight
    /// refresh since its cursors replace theirs.
    pub fn load_more(&mut self, direction: LoadDirection) -> bool {
        if self.load_states.get(direction).is_loading() {
            tracing::trace!(direction = direction.name(), "Load already in flight");
            return false;
        }

        if direction == LoadDirection::Refresh {
            self.refresh();
            return true;
        }

        if !self.refreshed || self.refresh_in_flight() {
            return false;
        }

        let Some(cursor) = self.directions[direction.index()].cursor.clone() else {
            tracing::trace!(direction = direction.name(), "End of feed reached");
            return false;
        };

        self.issue(direction, Some(cursor));
        true
    }

    /// Re-issue the last failed fetch in `direction` with the same cursor.
    pub fn retry(&mut self, direction: LoadDirection) -> bool {
        if !self.load_states.get(direction).is_error() {
            return false;
        }
        if direction != LoadDirection::Refresh && self.refresh_in_flight() {
            tracing::trace!(direction = direction.name(), "Refresh in flight, not retrying");
            return false;
        }
        let cursor = self.directions[direction.index()]
            .failed_cursor
            .take()
            .unwrap_or(None);
        tracing::debug!(direction = direction.name(), "Retrying failed load");
        self.issue(direction, cursor);
        true
    }

    /// Retry every direction currently in error. A failed refresh takes
    /// precedence since it supersedes the others.
    pub fn retry_failed(&mut self) -> bool {
        if self.retry(LoadDirection::Refresh) {
            return true;
        }
        let prepend = self.retry(LoadDirection::Prepend);
        let append = self.retry(LoadDirection::Append);
        prepend || append
    }

    /// Apply a local edit to every loaded item and publish if anything
    /// changed. `edit` returns whether it modified the item.
    pub fn update_items<F>(&mut self, mut edit: F) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut changed = false;
        for item in Arc::make_mut(&mut self.items).iter_mut() {
            changed |= edit(item);
        }
        if changed {
            self.publish();
        }
        changed
    }

    /// Abort every in-flight fetch. Late results are discarded.
    pub fn cancel_all(&mut self) {
        for direction in LoadDirection::ALL {
            if self.cancel(direction) {
                tracing::debug!(direction = direction.name(), "Cancelled in-flight load");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Completion handling
    // ------------------------------------------------------------------------

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when the completion belonged to a cancelled fetch or
    /// was itself a cancellation. Cancel-safe: a completion is either fully
    /// applied or still queued.
    pub async fn next_completion(&mut self) -> Option<Applied> {
        // The pager holds a sender, so the channel never closes.
        let completion = self.completion_rx.recv().await?;
        self.apply(completion)
    }

    fn apply(&mut self, completion: Completion<T>) -> Option<Applied> {
        let Completion {
            direction,
            generation,
            cursor,
            result,
        } = completion;

        let state = &mut self.directions[direction.index()];
        match &state.in_flight {
            Some(in_flight) if in_flight.generation == generation => {
                state.in_flight = None;
            }
            _ => {
                tracing::debug!(
                    direction = direction.name(),
                    generation,
                    "Discarding result of cancelled load"
                );
                return None;
            }
        }

        let applied = match result {
            Ok(page) => Some(self.merge(direction, page)),
            Err(FetchError::Cancelled) => {
                tracing::debug!(direction = direction.name(), "Load abandoned by source");
                self.load_states.set(direction, LoadState::IDLE);
                None
            }
            Err(e) => {
                tracing::warn!(direction = direction.name(), error = %e, "Load failed");
                self.directions[direction.index()].failed_cursor = Some(cursor);
                self.load_states.set(direction, LoadState::Error(Arc::new(e)));
                None
            }
        };

        self.publish();
        applied
    }

    fn merge(&mut self, direction: LoadDirection, page: Page<T>) -> Applied {
        let Page {
            items,
            prev,
            next,
            items_before,
            items_after,
        } = page;
        let inserted = items.len();
        let placeholders = self.config.enable_placeholders;

        match direction {
            LoadDirection::Refresh => {
                self.items = Arc::new(items);
                self.refreshed = true;
                self.placeholders_before = if placeholders { items_before.unwrap_or(0) } else { 0 };
                self.placeholders_after = if placeholders { items_after.unwrap_or(0) } else { 0 };
                self.load_states.refresh = LoadState::IDLE;
                self.load_states.prepend = LoadState::NotLoading {
                    end_reached: prev.is_none(),
                };
                self.load_states.append = LoadState::NotLoading {
                    end_reached: next.is_none(),
                };
                for state in &mut self.directions {
                    state.failed_cursor = None;
                }
                self.directions[LoadDirection::Prepend.index()].cursor = prev;
                self.directions[LoadDirection::Append.index()].cursor = next;
            }
            LoadDirection::Prepend => {
                Arc::make_mut(&mut self.items).splice(0..0, items);
                if placeholders {
                    self.placeholders_before = items_before.unwrap_or(0);
                }
                self.load_states.prepend = LoadState::NotLoading {
                    end_reached: prev.is_none(),
                };
                self.directions[LoadDirection::Prepend.index()].cursor = prev;
            }
            LoadDirection::Append => {
                Arc::make_mut(&mut self.items).extend(items);
                if placeholders {
                    self.placeholders_after = items_after.unwrap_or(0);
                }
                self.load_states.append = LoadState::NotLoading {
                    end_reached: next.is_none(),
                };
                self.directions[LoadDirection::Append.index()].cursor = next;
            }
        }

        tracing::debug!(
            direction = direction.name(),
            inserted,
            total = self.items.len(),
            "Merged page"
        );

        Applied {
            direction,
            inserted,
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn refresh_in_flight(&self) -> bool {
        self.load_states.refresh.is_loading()
    }

    fn issue(&mut self, direction: LoadDirection, cursor: Option<PageCursor>) {
        if direction == LoadDirection::Refresh {
            // A refresh replaces everything, so older loads are moot.
            for other in [LoadDirection::Prepend, LoadDirection::Append] {
                if self.cancel(other) {
                    self.load_states.set(other, LoadState::IDLE);
                }
            }
        }
        self.cancel(direction);

        self.next_generation = self.next_generation.wrapping_add(1);
        let generation = self.next_generation;
        let source = Arc::clone(&self.source);
        let tx = self.completion_tx.clone();
        let task_cursor = cursor.clone();

        tracing::debug!(
            direction = direction.name(),
            generation,
            cursor = ?cursor.as_ref().map(PageCursor::as_str),
            "Issuing load"
        );

        let handle = tokio::spawn(async move {
            let result = source.fetch(task_cursor.clone(), direction).await;
            // Receiver gone means the pager was dropped; nothing to report.
            let _ = tx.send(Completion {
                direction,
                generation,
                cursor: task_cursor,
                result,
            });
        });

        self.directions[direction.index()].in_flight = Some(InFlight { generation, handle });
        self.load_states.set(direction, LoadState::Loading);
        self.publish();
    }

    fn cancel(&mut self, direction: LoadDirection) -> bool {
        match self.directions[direction.index()].in_flight.take() {
            Some(in_flight) => {
                in_flight.handle.abort();
                true
            }
            None => false,
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(Arc::new(FeedSnapshot::new(
            Arc::clone(&self.items),
            self.placeholders_before,
            self.placeholders_after,
            self.load_states.clone(),
        )));
    }
}

impl<T: Send + 'static> Drop for Pager<T> {
    fn drop(&mut self) {
        for state in &mut self.directions {
            if let Some(in_flight) = state.in_flight.take() {
                in_flight.handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    type Call = (Option<PageCursor>, LoadDirection);

    /// Source whose responses are fed by the test one at a time.
    struct ScriptedSource {
        calls: Mutex<Vec<Call>>,
        responses: tokio::sync::Mutex<mpsc::UnboundedReceiver<Result<Page<u32>, FetchError>>>,
    }

    #[async_trait]
    impl FeedSource for ScriptedSource {
        type Item = u32;

        async fn fetch(
            &self,
            cursor: Option<PageCursor>,
            direction: LoadDirection,
        ) -> Result<Page<u32>, FetchError> {
            self.calls.lock().unwrap().push((cursor, direction));
            let mut rx = self.responses.lock().await;
            rx.recv().await.unwrap_or(Err(FetchError::Cancelled))
        }
    }

    struct Harness {
        source: Arc<ScriptedSource>,
        respond: mpsc::UnboundedSender<Result<Page<u32>, FetchError>>,
        pager: Pager<u32>,
    }

    impl Harness {
        fn new() -> Self {
            let (respond, rx) = mpsc::unbounded_channel();
            let source = Arc::new(ScriptedSource {
                calls: Mutex::new(Vec::new()),
                responses: tokio::sync::Mutex::new(rx),
            });
            let pager = Pager::new(source.clone(), PagingConfig::default());
            Self {
                source,
                respond,
                pager,
            }
        }

        fn reply(&self, result: Result<Page<u32>, FetchError>) {
            self.respond.send(result).unwrap();
        }

        fn calls(&self) -> Vec<Call> {
            self.source.calls.lock().unwrap().clone()
        }

        async fn settle(&mut self) -> Option<Applied> {
            self.pager.next_completion().await
        }

        fn items(&self) -> Vec<u32> {
            self.pager.snapshot().items().to_vec()
        }
    }

    fn page(range: std::ops::Range<u32>, prev: Option<&str>, next: Option<&str>) -> Page<u32> {
        Page::new(
            range.collect(),
            prev.map(PageCursor::new),
            next.map(PageCursor::new),
        )
    }

    #[tokio::test]
    async fn start_issues_single_refresh() {
        let mut h = Harness::new();
        assert!(h.pager.start());
        assert!(!h.pager.start());
        assert!(h.pager.load_states().refresh.is_loading());

        h.reply(Ok(page(0..3, Some("min_id=0"), Some("max_id=2"))));
        let applied = h.settle().await;

        assert_eq!(
            applied,
            Some(Applied {
                direction: LoadDirection::Refresh,
                inserted: 3
            })
        );
        assert_eq!(h.items(), vec![0, 1, 2]);
        assert_eq!(h.calls(), vec![(None, LoadDirection::Refresh)]);
        assert_eq!(
            h.pager.cursor(LoadDirection::Append),
            Some(&PageCursor::new("max_id=2"))
        );
    }

    #[tokio::test]
    async fn load_more_before_refresh_is_noop() {
        let mut h = Harness::new();
        assert!(!h.pager.load_more(LoadDirection::Append));
        assert!(!h.pager.load_more(LoadDirection::Prepend));
        assert!(h.calls().is_empty());
    }

    #[tokio::test]
    async fn prepend_and_append_preserve_order() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(10..20, Some("min_id=10"), Some("max_id=19"))));
        h.settle().await;

        assert!(h.pager.load_more(LoadDirection::Append));
        h.reply(Ok(page(20..25, Some("min_id=20"), Some("max_id=24"))));
        h.settle().await;

        assert!(h.pager.load_more(LoadDirection::Prepend));
        h.reply(Ok(page(5..10, Some("min_id=5"), Some("max_id=9"))));
        h.settle().await;

        assert_eq!(h.items(), (5..25).collect::<Vec<_>>());
        assert_eq!(
            h.calls(),
            vec![
                (None, LoadDirection::Refresh),
                (Some(PageCursor::new("max_id=19")), LoadDirection::Append),
                (Some(PageCursor::new("min_id=10")), LoadDirection::Prepend),
            ]
        );
    }

    #[tokio::test]
    async fn load_more_while_loading_is_noop() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..2, None, Some("max_id=1"))));
        h.settle().await;

        assert!(h.pager.load_more(LoadDirection::Append));
        assert!(!h.pager.load_more(LoadDirection::Append));
        assert!(!h.pager.load_more(LoadDirection::Append));

        h.reply(Ok(page(2..4, None, None)));
        h.settle().await;

        let appends = h
            .calls()
            .into_iter()
            .filter(|(_, d)| *d == LoadDirection::Append)
            .count();
        assert_eq!(appends, 1);
    }

    #[tokio::test]
    async fn absent_cursor_ends_direction() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..2, None, Some("max_id=1"))));
        h.settle().await;
        assert!(h.pager.load_states().prepend.end_reached());
        assert!(!h.pager.load_more(LoadDirection::Prepend));

        h.pager.load_more(LoadDirection::Append);
        h.reply(Ok(page(2..4, None, None)));
        h.settle().await;

        assert!(h.pager.load_states().append.end_reached());
        assert!(!h.pager.load_more(LoadDirection::Append));
        assert_eq!(h.calls().len(), 2);
    }

    #[tokio::test]
    async fn failure_keeps_items_and_retry_reuses_cursor() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..3, None, Some("max_id=2"))));
        h.settle().await;

        h.pager.load_more(LoadDirection::Append);
        h.reply(Err(FetchError::Server(500)));
        assert_eq!(h.settle().await, None);

        assert_eq!(h.items(), vec![0, 1, 2]);
        let snapshot = h.pager.snapshot();
        assert!(matches!(
            snapshot.load_states().append.error(),
            Some(FetchError::Server(500))
        ));
        assert!(!snapshot.load_states().refresh.is_error());

        assert!(h.pager.retry(LoadDirection::Append));
        h.reply(Ok(page(3..5, None, None)));
        h.settle().await;

        assert_eq!(h.items(), vec![0, 1, 2, 3, 4]);
        let appends: Vec<_> = h
            .calls()
            .into_iter()
            .filter(|(_, d)| *d == LoadDirection::Append)
            .collect();
        assert_eq!(appends.len(), 2);
        assert_eq!(appends[0].0, appends[1].0);
    }

    #[tokio::test]
    async fn retry_without_error_is_noop() {
        let mut h = Harness::new();
        assert!(!h.pager.retry(LoadDirection::Append));
        assert!(!h.pager.retry_failed());
    }

    #[tokio::test]
    async fn failed_refresh_is_retryable() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Err(FetchError::Timeout));
        h.settle().await;
        assert!(h.pager.load_states().refresh.is_error());

        assert!(h.pager.retry_failed());
        h.reply(Ok(page(0..1, None, None)));
        h.settle().await;
        assert_eq!(h.items(), vec![0]);
        assert!(!h.pager.load_states().refresh.is_error());
    }

    #[tokio::test]
    async fn source_cancellation_is_silent() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..1, None, Some("max_id=0"))));
        h.settle().await;

        h.pager.load_more(LoadDirection::Append);
        h.reply(Err(FetchError::Cancelled));
        h.settle().await;

        let states = h.pager.snapshot().load_states().clone();
        assert!(!states.append.is_error());
        assert!(!states.append.is_loading());
        assert!(!states.append.end_reached());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_supersedes_in_flight_append() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..2, None, Some("max_id=1"))));
        h.settle().await;

        h.pager.load_more(LoadDirection::Append);
        tokio::task::yield_now().await;
        h.pager.refresh();
        assert!(!h.pager.load_states().append.is_loading());

        // The aborted append never reports back; only the refresh does.
        h.reply(Ok(page(100..101, None, None)));
        let applied = h.settle().await;
        assert_eq!(applied.map(|a| a.direction), Some(LoadDirection::Refresh));
        assert_eq!(h.items(), vec![100]);

        let late = tokio::time::timeout(Duration::from_secs(1), h.settle()).await;
        assert!(late.is_err());
    }

    #[tokio::test]
    async fn no_prepend_or_append_during_refresh() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(10..20, Some("min_id=10"), Some("max_id=19"))));
        h.settle().await;

        h.pager.refresh();
        assert!(!h.pager.load_more(LoadDirection::Append));
        assert!(!h.pager.load_more(LoadDirection::Prepend));
        assert!(!h.pager.load_states().append.is_loading());

        h.reply(Ok(page(30..40, None, Some("max_id=39"))));
        h.settle().await;
        assert_eq!(h.items(), (30..40).collect::<Vec<_>>());
        assert_eq!(
            h.pager.cursor(LoadDirection::Append),
            Some(&PageCursor::new("max_id=39"))
        );
        assert_eq!(
            h.calls(),
            vec![(None, LoadDirection::Refresh), (None, LoadDirection::Refresh)]
        );

        // Once the refresh has landed, paging uses its cursor.
        assert!(h.pager.load_more(LoadDirection::Append));
        tokio::task::yield_now().await;
        assert_eq!(
            h.calls().last(),
            Some(&(Some(PageCursor::new("max_id=39")), LoadDirection::Append))
        );
    }

    #[tokio::test]
    async fn failed_append_not_retried_during_refresh() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..2, None, Some("max_id=1"))));
        h.settle().await;
        h.pager.load_more(LoadDirection::Append);
        h.reply(Err(FetchError::Server(502)));
        h.settle().await;
        assert!(h.pager.load_states().append.is_error());

        h.pager.refresh();
        assert!(!h.pager.retry(LoadDirection::Append));
        assert!(!h.pager.retry_failed());
        assert!(h.pager.load_states().append.is_error());
        tokio::task::yield_now().await;
        assert_eq!(h.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_fetch_never_mutates_snapshot() {
        let mut h = Harness::new();
        let mut rx = h.pager.subscribe();
        h.pager.start();
        rx.borrow_and_update();

        h.pager.cancel_all();
        h.reply(Ok(page(0..5, None, None)));

        let late = tokio::time::timeout(Duration::from_secs(1), h.settle()).await;
        assert!(late.is_err());
        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow().items().is_empty());
    }

    #[tokio::test]
    async fn update_items_publishes_changes() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..3, None, None)));
        h.settle().await;

        let mut rx = h.pager.subscribe();
        rx.borrow_and_update();
        let changed = h.pager.update_items(|n| {
            if *n == 1 {
                *n = 42;
                true
            } else {
                false
            }
        });
        assert!(changed);
        assert!(rx.has_changed().unwrap());
        assert_eq!(h.items(), vec![0, 42, 2]);

        assert!(!h.pager.update_items(|_| false));
    }

    #[tokio::test]
    async fn old_snapshots_are_not_mutated() {
        let mut h = Harness::new();
        h.pager.start();
        h.reply(Ok(page(0..2, None, Some("max_id=1"))));
        h.settle().await;

        let before = h.pager.snapshot();
        h.pager.load_more(LoadDirection::Append);
        h.reply(Ok(page(2..4, None, None)));
        h.settle().await;

        assert_eq!(before.items(), &[0, 1]);
        assert_eq!(h.items(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn placeholders_follow_reported_counts() {
        let (respond, rx) = mpsc::unbounded_channel();
        let source = Arc::new(ScriptedSource {
            calls: Mutex::new(Vec::new()),
            responses: tokio::sync::Mutex::new(rx),
        });
        let config = PagingConfig {
            enable_placeholders: true,
            ..PagingConfig::default()
        };
        let mut pager = Pager::new(source, config);
        pager.start();
        respond
            .send(Ok(page(0..2, None, Some("offset=2")).with_counts(Some(0), Some(3))))
            .unwrap();
        pager.next_completion().await;

        let snapshot = pager.snapshot();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.placeholders_after(), 3);
        assert_eq!(snapshot.get(2), Some(None));
    }
}
