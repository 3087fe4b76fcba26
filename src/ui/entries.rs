//! Line layout for individual feed entries: statuses, notifications, tags.

use chrono::{DateTime, Utc};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::api::entities::AttachmentKind;
use crate::api::{Account, Notification, Status, Tag, Visibility};
use crate::theme::ColorPalette;
use crate::util::{
    display_width, html_to_text, relative_time, strip_control_chars, truncate_to_width,
};

/// Longest body rendered for one status before it is cut.
const MAX_BODY_LINES: usize = 16;

/// What an entry needs to know about its surroundings.
pub(super) struct EntryContext<'a> {
    pub theme: &'a ColorPalette,
    pub now: DateTime<Utc>,
    pub width: usize,
}

fn visibility_icon(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "◉",
        Visibility::Unlisted => "◎",
        Visibility::Private => "⚿",
        Visibility::Direct => "✉",
    }
}

fn clean(s: &str) -> String {
    strip_control_chars(s).into_owned()
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub(super) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = display_width(word);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            // Hard-split words that cannot fit on a line of their own
            for c in word.chars() {
                let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
                if current_width + w > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(c);
                current_width += w;
            }
        }
        lines.push(current);
    }
    lines
}

fn author_line(
    account: &Account,
    visibility: Option<Visibility>,
    at: DateTime<Utc>,
    ctx: &EntryContext<'_>,
) -> Line<'static> {
    let name = clean(&account.display_name_or_acct());
    let mut spans = vec![
        Span::styled(
            truncate_to_width(&name, ctx.width / 2).into_owned(),
            ctx.theme.author,
        ),
        Span::styled(format!(" @{}", clean(&account.acct)), ctx.theme.handle),
    ];
    if account.is_bot() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(" Automated ", ctx.theme.bot_label));
    }
    let mut trailer = String::from(" · ");
    if let Some(visibility) = visibility {
        trailer.push_str(visibility_icon(visibility));
        trailer.push(' ');
    }
    trailer.push_str(&relative_time(at, ctx.now));
    spans.push(Span::styled(trailer, ctx.theme.timestamp));
    Line::from(spans)
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, style: Style, ctx: &EntryContext<'_>) {
    let wrapped = wrap_text(text, ctx.width.saturating_sub(2));
    let total = wrapped.len();
    for (i, row) in wrapped.into_iter().enumerate() {
        if i == MAX_BODY_LINES {
            lines.push(Line::from(Span::styled(
                format!("  … {} more lines", total - MAX_BODY_LINES),
                ctx.theme.counter,
            )));
            break;
        }
        lines.push(Line::from(Span::styled(format!("  {}", row), style)));
    }
}

/// Body, attachments, poll hint and counters of a status.
fn status_body(
    status: &Status,
    expanded: bool,
    ctx: &EntryContext<'_>,
    lines: &mut Vec<Line<'static>>,
) {
    if status.has_content_warning() {
        let hint = if expanded { "c to hide" } else { "c to show" };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  CW: {}", clean(&status.spoiler_text)),
                ctx.theme.content_warning,
            ),
            Span::styled(format!("  [{}]", hint), ctx.theme.counter),
        ]));
        if !expanded {
            return;
        }
    }

    let text = html_to_text(&status.content);
    if !text.is_empty() {
        push_wrapped(lines, &text, ctx.theme.body, ctx);
    }

    for media in &status.media_attachments {
        let kind = match media.kind {
            AttachmentKind::Image => "image",
            AttachmentKind::Gifv => "gif",
            AttachmentKind::Video => "video",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Unknown => "attachment",
        };
        let label = match media.description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => format!("  ▣ {}: {}", kind, clean(desc)),
            _ => format!("  ▣ {}", kind),
        };
        lines.push(Line::from(Span::styled(label, ctx.theme.media)));
    }

    if let Some(poll) = &status.poll {
        let state = if poll.expired { "closed" } else { "open" };
        lines.push(Line::from(Span::styled(
            format!(
                "  ☰ View poll ({} options, {} votes, {})",
                poll.options.len(),
                poll.votes_count,
                state
            ),
            ctx.theme.media,
        )));
    }
}

fn counters_line(status: &Status, ctx: &EntryContext<'_>) -> Line<'static> {
    let boost_style = if status.is_reblogged() {
        ctx.theme.boosted
    } else {
        ctx.theme.counter
    };
    let fav_style = if status.is_favourited() {
        ctx.theme.favourited
    } else {
        ctx.theme.counter
    };
    Line::from(vec![
        Span::styled(format!("  ↩ {}", status.replies_count), ctx.theme.counter),
        Span::styled(format!("   ⟳ {}", status.reblogs_count), boost_style),
        Span::styled(format!("   ★ {}", status.favourites_count), fav_style),
    ])
}

/// Lines for a timeline status, including the boost header.
pub(super) fn status_lines(
    status: &Status,
    expanded: bool,
    ctx: &EntryContext<'_>,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(6);
    let original = status.original();

    if let Some(booster) = status.boosted_by() {
        lines.push(Line::from(Span::styled(
            format!("⟳ {} boosted", clean(&booster.display_name_or_acct())),
            ctx.theme.boosted_by,
        )));
    }
    lines.push(author_line(
        &original.account,
        Some(original.visibility),
        original.created_at,
        ctx,
    ));
    status_body(original, expanded, ctx, &mut lines);
    lines.push(counters_line(original, ctx));
    lines.push(Line::default());
    lines
}

pub(super) fn notification_lines(
    notification: &Notification,
    expanded: bool,
    ctx: &EntryContext<'_>,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(clean(&notification.headline()), ctx.theme.notification_header),
        Span::styled(
            format!(" · {}", relative_time(notification.created_at, ctx.now)),
            ctx.theme.timestamp,
        ),
    ])];

    match &notification.status {
        Some(status) => {
            lines.push(author_line(
                &status.account,
                Some(status.visibility),
                status.created_at,
                ctx,
            ));
            status_body(status, expanded, ctx, &mut lines);
        }
        None => {
            lines.push(author_line(
                &notification.account,
                None,
                notification.created_at,
                ctx,
            ));
            let bio = html_to_text(&notification.account.note);
            if !bio.is_empty() {
                push_wrapped(&mut lines, &bio, ctx.theme.handle, ctx);
            }
        }
    }
    lines.push(Line::default());
    lines
}

pub(super) fn tag_lines(tag: &Tag, ctx: &EntryContext<'_>) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(format!("#{}", clean(&tag.name)), ctx.theme.tag_name)),
        Line::from(Span::styled(
            format!(
                "  {} posts by {} people recently",
                tag.recent_uses(),
                tag.recent_accounts()
            ),
            ctx.theme.counter,
        )),
        Line::default(),
    ]
}
