//! The scrollable feed list with its load-state rows.
//!
//! Refresh state fills the whole panel while nothing is loaded. Otherwise
//! prepend state sits above the items and append state below them, so an
//! error in one direction never hides what is already loaded.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ScreenFeed};
use crate::component::ScrollState;
use crate::paging::{FeedSnapshot, LoadState, LoadStates};
use crate::theme::ColorPalette;

use super::entries::{notification_lines, status_lines, tag_lines, EntryContext};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub(super) fn spinner(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.panel_border)
        .title(format!(" {} ", app.screen.title()));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }
    app.list_height = inner.height as usize;

    let ctx = EntryContext {
        theme: &app.theme,
        now: Utc::now(),
        width: inner.width as usize,
    };
    let placeholder = app.theme.placeholder;
    let rows = match &app.feed {
        ScreenFeed::Statuses(c) => build_rows(&c.snapshot(), placeholder, |s| {
            status_lines(s, app.is_warning_expanded(&s.original().id), &ctx)
        }),
        ScreenFeed::Notifications(c) => build_rows(&c.snapshot(), placeholder, |n| {
            let expanded = n
                .status
                .as_ref()
                .is_some_and(|s| app.is_warning_expanded(&s.id));
            notification_lines(n, expanded, &ctx)
        }),
        ScreenFeed::Tags(c) => build_rows(&c.snapshot(), placeholder, |t| tag_lines(t, &ctx)),
    };

    let states = app.feed.load_states();
    if rows.is_empty() {
        let message = empty_message(&states, &app.theme, app.spinner_frame);
        f.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let mut items: Vec<ListItem> = Vec::with_capacity(rows.len() + 2);
    let mut leading = 0;
    if let Some(line) = head_row(&states, &app.theme, app.spinner_frame) {
        items.push(ListItem::new(line));
        leading = 1;
    }
    items.extend(rows.into_iter().map(ListItem::new));
    if let Some(line) = tail_row(&states.append, &app.theme, app.spinner_frame) {
        items.push(ListItem::new(line));
    }

    let list = List::new(items).highlight_style(app.theme.selected);
    let offset = draw_list(f, list, inner, app.feed.scroll(), leading);
    app.feed.set_offset(offset);
}

/// Draw `list` with `leading` head rows above slot 0 and return the slot
/// offset the viewport settled on.
fn draw_list(
    f: &mut Frame,
    list: List<'_>,
    area: Rect,
    scroll: ScrollState,
    leading: usize,
) -> usize {
    let mut state = ListState::default()
        .with_offset(list_offset(scroll.offset, leading))
        .with_selected(Some(scroll.selected + leading));
    f.render_stateful_widget(list, area, &mut state);
    state.offset().saturating_sub(leading)
}

/// List index to start drawing from for a stored slot offset. At the top
/// the head row stays in view.
fn list_offset(slot_offset: usize, leading: usize) -> usize {
    if slot_offset == 0 {
        0
    } else {
        slot_offset + leading
    }
}

/// One row of lines per slot; placeholders render as a dim marker.
fn build_rows<T>(
    snapshot: &FeedSnapshot<T>,
    placeholder: Style,
    mut lines_for: impl FnMut(&T) -> Vec<Line<'static>>,
) -> Vec<Vec<Line<'static>>> {
    snapshot
        .iter()
        .map(|slot| match slot {
            Some(item) => lines_for(item),
            None => vec![Line::from(Span::styled("  · · ·", placeholder)), Line::default()],
        })
        .collect()
}

/// Full-panel message when there are no slots at all.
fn empty_message(states: &LoadStates, theme: &ColorPalette, frame: usize) -> Vec<Line<'static>> {
    match &states.refresh {
        LoadState::Loading => vec![Line::from(Span::styled(
            format!("{} Loading…", spinner(frame)),
            theme.loading,
        ))],
        LoadState::Error(e) => vec![
            Line::from(Span::styled(e.summary(), theme.error)),
            Line::from(Span::styled(e.to_string(), theme.end_of_feed)),
            Line::default(),
            Line::from("Press r to retry"),
        ],
        LoadState::NotLoading { .. } => vec![Line::from(Span::styled(
            "Nothing to see here yet",
            theme.end_of_feed,
        ))],
    }
}

/// Row above the items: a refresh in progress over stale items, or the
/// prepend direction's state.
fn head_row(states: &LoadStates, theme: &ColorPalette, frame: usize) -> Option<Line<'static>> {
    match (&states.refresh, &states.prepend) {
        (LoadState::Loading, _) => Some(Line::from(Span::styled(
            format!("{} Refreshing…", spinner(frame)),
            theme.loading,
        ))),
        (LoadState::Error(e), _) | (_, LoadState::Error(e)) => Some(Line::from(Span::styled(
            format!("⚠ {}. Press r to retry", e.summary()),
            theme.error,
        ))),
        (_, LoadState::Loading) => Some(Line::from(Span::styled(
            format!("{} Loading newer posts…", spinner(frame)),
            theme.loading,
        ))),
        _ => None,
    }
}

fn tail_row(append: &LoadState, theme: &ColorPalette, frame: usize) -> Option<Line<'static>> {
    match append {
        LoadState::Loading => Some(Line::from(Span::styled(
            format!("{} Loading more…", spinner(frame)),
            theme.loading,
        ))),
        LoadState::Error(e) => Some(Line::from(Span::styled(
            format!("⚠ {}. Press r to retry", e.summary()),
            theme.error,
        ))),
        LoadState::NotLoading { end_reached: true } => Some(Line::from(Span::styled(
            "· end of feed ·",
            theme.end_of_feed,
        ))),
        LoadState::NotLoading { end_reached: false } => None,
    }
}
