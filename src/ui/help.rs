//! Help overlay: a key table grouped by what the keys act on.

use crate::app::App;
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::centered_rect;

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "General",
        &[
            ("q / Ctrl+c", "Quit"),
            ("?", "Toggle this help"),
            ("t", "Switch dark/light theme"),
        ],
    ),
    (
        "Screens",
        &[
            ("1-5", "Home, Local, Global, Notifications, Trending"),
            ("Tab / S-Tab", "Next / previous screen"),
            ("g / Home", "Scroll to top"),
        ],
    ),
    (
        "Feed",
        &[
            ("j / k", "Select next / previous"),
            ("Ctrl+d / u", "Half page down / up"),
            ("PgDn / PgUp", "Page down / up"),
            ("r", "Retry failed loads"),
            ("R", "Refresh from the newest post"),
        ],
    ),
    (
        "Post",
        &[
            ("b", "Boost / unboost"),
            ("f", "Favourite / unfavourite"),
            ("c", "Show / hide content warning"),
            ("o / Enter", "Open in browser"),
        ],
    ),
];

/// Render the help overlay on top of the current screen.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, keys) in SECTIONS {
        if !rows.is_empty() {
            rows.push(Row::new(vec![String::new(), String::new()]));
        }
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", label),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in keys {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
    }

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border)
                .title(" Help (? or Esc to close) "),
        )
        .style(app.theme.body);
    f.render_widget(table, overlay);
}
