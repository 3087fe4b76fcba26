//! Render functions for the TUI.
//!
//! Layout: screen tabs on top, the active feed in the middle, the status
//! bar at the bottom, and the help overlay over everything when shown.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen};
use crate::theme::ColorPalette;

use super::{feed_list, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(Paragraph::new(tab_line(app.screen, &app.theme)), chunks[0]);
    feed_list::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }
}

/// One tab per screen, numbered by its shortcut key.
fn tab_line(active: Screen, theme: &ColorPalette) -> Line<'static> {
    let spans = Screen::ALL
        .iter()
        .enumerate()
        .map(|(i, screen)| {
            let style = if *screen == active {
                theme.tab_active
            } else {
                theme.tab_inactive
            };
            Span::styled(format!(" {} {} ", i + 1, screen.title()), style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

/// Rectangle of the given percentage of `area`, centered in it.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;

    #[test]
    fn tabs_number_every_screen() {
        let theme = ThemeVariant::Dark.palette();
        let line = tab_line(Screen::Notifications, &theme);
        assert_eq!(line.spans.len(), Screen::ALL.len());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with(" 1 Home "));
        assert_eq!(line.spans[3].style, theme.tab_active);
        assert_eq!(line.spans[0].style, theme.tab_inactive);
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(80, 50, area);
        assert_eq!(r, Rect::new(10, 10, 80, 20));
    }
}
