//! [`FeedSource`] implementations for the Mastodon list endpoints.

use async_trait::async_trait;

use super::client::MastodonClient;
use super::entities::{Notification, Status, Tag};
use crate::paging::{FeedSource, FetchError, LoadDirection, Page, PageCursor};

/// Mastodon caps trending tag pages lower than timelines.
const MAX_TRENDS_LIMIT: u32 = 20;

/// Home timeline of the authenticated user.
pub struct HomeTimelineSource {
    client: MastodonClient,
    page_size: u32,
}

impl HomeTimelineSource {
    pub fn new(client: MastodonClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl FeedSource for HomeTimelineSource {
    type Item = Status;

    async fn fetch(
        &self,
        cursor: Option<PageCursor>,
        direction: LoadDirection,
    ) -> Result<Page<Status>, FetchError> {
        tracing::debug!(direction = direction.name(), "Fetching home timeline");
        self.client
            .get_page(
                "api/v1/timelines/home",
                &[("limit", self.page_size.to_string())],
                cursor.as_ref(),
            )
            .await
    }
}

/// Public timeline, either this instance only or the whole federation.
pub struct PublicTimelineSource {
    client: MastodonClient,
    page_size: u32,
    local: bool,
}

impl PublicTimelineSource {
    pub fn new(client: MastodonClient, page_size: u32, local: bool) -> Self {
        Self {
            client,
            page_size,
            local,
        }
    }
}

#[async_trait]
impl FeedSource for PublicTimelineSource {
    type Item = Status;

    async fn fetch(
        &self,
        cursor: Option<PageCursor>,
        direction: LoadDirection,
    ) -> Result<Page<Status>, FetchError> {
        tracing::debug!(
            direction = direction.name(),
            local = self.local,
            "Fetching public timeline"
        );
        self.client
            .get_page(
                "api/v1/timelines/public",
                &[
                    ("limit", self.page_size.to_string()),
                    ("local", self.local.to_string()),
                ],
                cursor.as_ref(),
            )
            .await
    }
}

pub struct NotificationsSource {
    client: MastodonClient,
    page_size: u32,
}

impl NotificationsSource {
    pub fn new(client: MastodonClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl FeedSource for NotificationsSource {
    type Item = Notification;

    async fn fetch(
        &self,
        cursor: Option<PageCursor>,
        direction: LoadDirection,
    ) -> Result<Page<Notification>, FetchError> {
        tracing::debug!(direction = direction.name(), "Fetching notifications");
        self.client
            .get_page(
                "api/v1/notifications",
                &[("limit", self.page_size.to_string())],
                cursor.as_ref(),
            )
            .await
    }
}

/// Trending hashtags. Paged by offset; there is nothing newer to prepend,
/// so the server never sends a `prev` link.
pub struct TrendingTagsSource {
    client: MastodonClient,
    page_size: u32,
}

impl TrendingTagsSource {
    pub fn new(client: MastodonClient, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl FeedSource for TrendingTagsSource {
    type Item = Tag;

    async fn fetch(
        &self,
        cursor: Option<PageCursor>,
        direction: LoadDirection,
    ) -> Result<Page<Tag>, FetchError> {
        tracing::debug!(direction = direction.name(), "Fetching trending tags");
        let mut page: Page<Tag> = self
            .client
            .get_page(
                "api/v1/trends/tags",
                &[("limit", self.page_size.min(MAX_TRENDS_LIMIT).to_string())],
                cursor.as_ref(),
            )
            .await?;
        page.prev = None;
        Ok(page)
    }
}
