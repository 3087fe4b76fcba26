//! Mastodon REST API: client, entities and feed sources.

mod actions;
mod client;
pub mod entities;
mod link;
mod sources;

pub use actions::{ActionError, StatusAction};
pub use client::{parse_instance_url, MastodonClient};
pub use entities::{Account, CustomEmoji, Notification, NotificationKind, Status, Tag, Visibility};
pub use link::{parse_link_header, PageLinks};
pub use sources::{HomeTimelineSource, NotificationsSource, PublicTimelineSource, TrendingTagsSource};
