use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tokio::time::Instant;

use crate::api::{
    HomeTimelineSource, MastodonClient, Notification, NotificationsSource, PublicTimelineSource,
    Status, StatusAction, Tag, TrendingTagsSource,
};
use crate::component::{FeedComponent, ScrollState};
use crate::config::Config;
use crate::paging::{Applied, FeedSource, LoadStates, PagingConfig};
use crate::theme::{ColorPalette, ThemeVariant};

/// Status messages disappear after this many seconds.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Screens
// ============================================================================

/// Top-level screens, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Home,
    Local,
    Global,
    Notifications,
    Trending,
}

impl Screen {
    pub const ALL: [Screen; 5] = [
        Screen::Home,
        Screen::Local,
        Screen::Global,
        Screen::Notifications,
        Screen::Trending,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Local => "Local",
            Self::Global => "Global",
            Self::Notifications => "Notifications",
            Self::Trending => "Trending",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Local => 1,
            Self::Global => 2,
            Self::Notifications => 3,
            Self::Trending => 4,
        }
    }

    /// Screens the server only serves to signed-in users.
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Home | Self::Notifications)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ============================================================================
// Screen Feed
// ============================================================================

/// The feed component behind the active screen.
pub enum ScreenFeed {
    Statuses(FeedComponent<Status>),
    Notifications(FeedComponent<Notification>),
    Tags(FeedComponent<Tag>),
}

/// Run the same expression against whichever component is active.
macro_rules! with_component {
    ($feed:expr, $c:ident => $body:expr) => {
        match $feed {
            ScreenFeed::Statuses($c) => $body,
            ScreenFeed::Notifications($c) => $body,
            ScreenFeed::Tags($c) => $body,
        }
    };
}

impl ScreenFeed {
    pub fn for_screen(client: &MastodonClient, paging: PagingConfig, screen: Screen) -> Self {
        let client = client.clone();
        let page_size = paging.page_size;
        match screen {
            Screen::Home => {
                let source: Arc<dyn FeedSource<Item = Status>> =
                    Arc::new(HomeTimelineSource::new(client, page_size));
                Self::Statuses(FeedComponent::new(source, paging))
            }
            Screen::Local | Screen::Global => {
                let source: Arc<dyn FeedSource<Item = Status>> = Arc::new(
                    PublicTimelineSource::new(client, page_size, screen == Screen::Local),
                );
                Self::Statuses(FeedComponent::new(source, paging))
            }
            Screen::Notifications => {
                let source: Arc<dyn FeedSource<Item = Notification>> =
                    Arc::new(NotificationsSource::new(client, page_size));
                Self::Notifications(FeedComponent::new(source, paging))
            }
            Screen::Trending => {
                let source: Arc<dyn FeedSource<Item = Tag>> =
                    Arc::new(TrendingTagsSource::new(client, page_size));
                Self::Tags(FeedComponent::new(source, paging))
            }
        }
    }

    pub fn on_start(&mut self) {
        with_component!(self, c => c.on_start())
    }

    pub fn on_destroy(&mut self) {
        with_component!(self, c => c.on_destroy())
    }

    pub async fn next_change(&mut self) -> Option<Applied> {
        with_component!(self, c => c.next_change().await)
    }

    pub fn load_states(&self) -> LoadStates {
        with_component!(self, c => c.load_states())
    }

    pub fn scroll(&self) -> ScrollState {
        with_component!(self, c => c.scroll())
    }

    pub fn set_offset(&mut self, offset: usize) {
        with_component!(self, c => c.set_offset(offset))
    }

    /// Slot count, placeholders included.
    pub fn len(&self) -> usize {
        with_component!(self, c => c.snapshot().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scroll_to_top(&mut self) -> bool {
        with_component!(self, c => c.scroll_to_top())
    }

    pub fn select_next(&mut self) {
        with_component!(self, c => c.select_next())
    }

    pub fn select_previous(&mut self) {
        with_component!(self, c => c.select_previous())
    }

    pub fn page_down(&mut self, rows: usize) {
        with_component!(self, c => c.page_down(rows))
    }

    pub fn page_up(&mut self, rows: usize) {
        with_component!(self, c => c.page_up(rows))
    }

    pub fn refresh(&mut self) {
        with_component!(self, c => c.refresh())
    }

    pub fn retry_failed(&mut self) -> bool {
        with_component!(self, c => c.retry_failed())
    }

    /// Status under the selection: the status itself on timelines, the
    /// attached status on notifications.
    pub fn selected_status(&self) -> Option<Status> {
        match self {
            Self::Statuses(c) => c.selected_item(),
            Self::Notifications(c) => c.selected_item().and_then(|n| n.status),
            Self::Tags(_) => None,
        }
    }

    /// Web link for the selected entry.
    pub fn selected_link(&self) -> Option<String> {
        match self {
            Self::Statuses(c) => c.selected_item().map(|s| s.original().link().to_string()),
            Self::Notifications(c) => c.selected_item().map(|n| n.link().to_string()),
            Self::Tags(c) => c.selected_item().map(|t| t.url),
        }
    }

    /// Replace every copy of `updated` in the loaded items.
    pub fn apply_status_update(&mut self, updated: &Status) -> bool {
        match self {
            Self::Statuses(c) => c.update_items(|s| s.merge_updated(updated)),
            Self::Notifications(c) => c.update_items(|n| {
                n.status
                    .as_mut()
                    .is_some_and(|s| s.merge_updated(updated))
            }),
            Self::Tags(_) => false,
        }
    }
}

// ============================================================================
// Background Events
// ============================================================================

/// Results of background tasks, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    ActionCompleted {
        action: StatusAction,
        status: Box<Status>,
    },
    ActionFailed {
        status_id: String,
        action: StatusAction,
        error: String,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub client: MastodonClient,
    pub paging: PagingConfig,
    pub screen: Screen,
    pub feed: ScreenFeed,

    pub theme_variant: ThemeVariant,
    pub theme: ColorPalette,

    /// Render only when state changed.
    pub needs_redraw: bool,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub spinner_frame: usize,
    /// Rows the list occupied on the last frame; used for paging keys.
    pub list_height: usize,

    /// Statuses whose content warning the user expanded.
    pub expanded_warnings: HashSet<String>,
    /// Statuses with an action request in flight.
    pub pending_actions: HashSet<String>,
}

impl App {
    pub fn new(client: MastodonClient, config: &Config, screen: Screen) -> Self {
        let screen = if screen.requires_auth() && !client.is_authenticated() {
            tracing::warn!(
                screen = screen.title(),
                "No access token, starting on the local timeline"
            );
            Screen::Local
        } else {
            screen
        };

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });
        let paging = config.paging();

        Self {
            feed: ScreenFeed::for_screen(&client, paging, screen),
            client,
            paging,
            screen,
            theme_variant,
            theme: theme_variant.palette(),
            needs_redraw: true,
            status_message: None,
            show_help: false,
            spinner_frame: 0,
            list_height: 10,
            expanded_warnings: HashSet::new(),
            pending_actions: HashSet::new(),
        }
    }

    /// Activate the initial screen.
    pub fn start(&mut self) {
        self.feed.on_start();
    }

    /// Show `screen`. Selecting the current screen again scrolls it to the
    /// top; selecting another destroys the current feed and starts a new one.
    pub fn navigate(&mut self, screen: Screen) {
        if screen == self.screen {
            if self.feed.scroll_to_top() {
                tracing::debug!(screen = screen.title(), "Scrolled to top");
            }
            return;
        }

        tracing::info!(from = self.screen.title(), to = screen.title(), "Switching screen");
        self.feed.on_destroy();
        self.feed = ScreenFeed::for_screen(&self.client, self.paging, screen);
        self.feed.on_start();
        self.screen = screen;
        self.expanded_warnings.clear();

        if screen.requires_auth() && !self.client.is_authenticated() {
            self.set_status(format!("{} requires an access token", screen.title()));
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.theme = self.theme_variant.palette();
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    /// Expand or collapse the content warning of the selected status.
    pub fn toggle_content_warning(&mut self) -> bool {
        let Some(status) = self.feed.selected_status() else {
            return false;
        };
        let original = status.original();
        if !original.has_content_warning() {
            return false;
        }
        if !self.expanded_warnings.remove(&original.id) {
            self.expanded_warnings.insert(original.id.clone());
        }
        true
    }

    pub fn is_warning_expanded(&self, status_id: &str) -> bool {
        self.expanded_warnings.contains(status_id)
    }

    pub fn is_loading(&self) -> bool {
        self.feed.load_states().any_loading()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message once expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.feed.on_destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app(token: bool) -> App {
        let token = token.then(|| secrecy::SecretString::from("tok".to_string()));
        let client =
            MastodonClient::new("https://example.social", token, Duration::from_secs(5)).unwrap();
        App::new(client, &Config::default(), Screen::Home)
    }

    #[test]
    fn screen_cycle_wraps() {
        assert_eq!(Screen::Trending.next(), Screen::Home);
        assert_eq!(Screen::Home.previous(), Screen::Trending);
        for (i, screen) in Screen::ALL.iter().enumerate() {
            assert_eq!(screen.index(), i);
        }
    }

    #[tokio::test]
    async fn anonymous_start_falls_back_to_local() {
        let app = app(false);
        assert_eq!(app.screen, Screen::Local);
        assert!(matches!(app.feed, ScreenFeed::Statuses(_)));
    }

    #[tokio::test]
    async fn navigate_replaces_component() {
        let mut app = app(true);
        assert_eq!(app.screen, Screen::Home);

        app.navigate(Screen::Trending);
        assert_eq!(app.screen, Screen::Trending);
        assert!(matches!(app.feed, ScreenFeed::Tags(_)));

        app.navigate(Screen::Notifications);
        assert!(matches!(app.feed, ScreenFeed::Notifications(_)));
    }

    #[tokio::test]
    async fn reselecting_screen_keeps_component() {
        let mut app = app(true);
        app.start();
        app.navigate(Screen::Home);
        assert_eq!(app.screen, Screen::Home);
        assert!(app.is_loading());
    }

    #[tokio::test]
    async fn status_message_expires() {
        let mut app = app(true);
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        app.status_message = Some(("old".into(), Instant::now() - Duration::from_secs(5)));
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
