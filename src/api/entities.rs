//! Mastodon API entities, trimmed to the fields the client renders.
//!
//! Unknown fields are ignored by serde, and optional or newer fields carry
//! `#[serde(default)]` so older servers still decode.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::borrow::Cow;

/// Server-defined emoji referenced as `:shortcode:` in names and content.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomEmoji {
    pub shortcode: String,
    pub url: String,
    #[serde(default)]
    pub static_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
    pub url: String,
    #[serde(default)]
    pub bot: Option<bool>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub statuses_count: u64,
    #[serde(default)]
    pub emojis: Vec<CustomEmoji>,
}

impl Account {
    /// Display name with custom emoji shortcodes removed, or the account
    /// handle when nothing else is left.
    pub fn display_name_or_acct(&self) -> Cow<'_, str> {
        let mut name = Cow::Borrowed(self.display_name.as_str());
        for emoji in &self.emojis {
            let code = format!(":{}:", emoji.shortcode);
            if name.contains(&code) {
                name = Cow::Owned(name.replace(&code, ""));
            }
        }
        let trimmed = name.trim();
        if trimmed.is_empty() {
            Cow::Borrowed(&self.acct)
        } else if trimmed.len() == name.len() {
            name
        } else {
            Cow::Owned(trimmed.to_string())
        }
    }

    pub fn is_bot(&self) -> bool {
        self.bot == Some(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Gifv,
    Video,
    Audio,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PollOption {
    pub title: String,
    #[serde(default)]
    pub votes_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Poll {
    pub id: String,
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub votes_count: u64,
    #[serde(default)]
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Status {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub account: Account,
    /// HTML body.
    #[serde(default)]
    pub content: String,
    /// Content warning; empty when the status has none.
    #[serde(default)]
    pub spoiler_text: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub url: Option<String>,
    pub uri: String,
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    #[serde(default)]
    pub media_attachments: Vec<Attachment>,
    #[serde(default)]
    pub poll: Option<Poll>,
    #[serde(default)]
    pub replies_count: u64,
    #[serde(default)]
    pub reblogs_count: u64,
    #[serde(default)]
    pub favourites_count: u64,
    #[serde(default)]
    pub reblogged: Option<bool>,
    #[serde(default)]
    pub favourited: Option<bool>,
}

impl Status {
    /// The status to display: the boosted one for a boost, else itself.
    pub fn original(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }

    /// Account that boosted the displayed status, if this is a boost.
    pub fn boosted_by(&self) -> Option<&Account> {
        self.reblog.as_ref().map(|_| &self.account)
    }

    pub fn has_content_warning(&self) -> bool {
        !self.spoiler_text.trim().is_empty()
    }

    pub fn is_reblogged(&self) -> bool {
        self.reblogged == Some(true)
    }

    pub fn is_favourited(&self) -> bool {
        self.favourited == Some(true)
    }

    /// Link to open for this status: its web page, falling back to the URI.
    pub fn link(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.uri)
    }

    /// Replace this status, or the status it boosts, with `updated` when
    /// the ids match. Returns whether anything changed.
    pub fn merge_updated(&mut self, updated: &Status) -> bool {
        if self.id == updated.id {
            *self = updated.clone();
            return true;
        }
        match self.reblog.as_deref_mut() {
            Some(inner) if inner.id == updated.id => {
                *inner = updated.clone();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    FollowRequest,
    Mention,
    Reblog,
    Favourite,
    Poll,
    Status,
    Update,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub account: Account,
    #[serde(default)]
    pub status: Option<Status>,
}

impl Notification {
    /// One-line summary of what happened.
    pub fn headline(&self) -> String {
        let who = self.account.display_name_or_acct();
        match self.kind {
            NotificationKind::Follow => format!("{} follows you", who),
            NotificationKind::FollowRequest => format!("{} sent you a follow request", who),
            NotificationKind::Mention => format!("{} mentioned you", who),
            NotificationKind::Reblog => format!("{} boosted your post", who),
            NotificationKind::Favourite => format!("{} favourited your post", who),
            NotificationKind::Poll => "A poll has ended".to_string(),
            NotificationKind::Status => format!("{} posted something", who),
            NotificationKind::Update => format!("{} edited a post", who),
            NotificationKind::Unknown => format!("{} interacted with you", who),
        }
    }

    /// Link to open: the status if any, else the account.
    pub fn link(&self) -> &str {
        match &self.status {
            Some(status) => status.link(),
            None => &self.account.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagHistory {
    /// UNIX day, as a string.
    pub day: String,
    /// Uses that day, as a string.
    pub uses: String,
    /// Distinct accounts that day, as a string.
    pub accounts: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub history: Vec<TagHistory>,
}

impl Tag {
    /// Total uses over the reported history window.
    pub fn recent_uses(&self) -> u64 {
        self.history
            .iter()
            .filter_map(|h| h.uses.parse::<u64>().ok())
            .sum()
    }

    /// Distinct accounts over the reported history window.
    pub fn recent_accounts(&self) -> u64 {
        self.history
            .iter()
            .filter_map(|h| h.accounts.parse::<u64>().ok())
            .sum()
    }
}
