use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

use super::feed_list::spinner;

const KEY_HINTS: &str = "[1-5]screens [j/k]move [b]oost [f]av [o]pen [r]etry [R]efresh [?]help [q]uit";

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text = status_text(app);
    f.render_widget(Paragraph::new(text).style(app.theme.status_bar), area);
}

fn status_text(app: &App) -> Cow<'_, str> {
    let message: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(msg.as_ref()),
        None => Cow::Borrowed(KEY_HINTS),
    };
    if app.is_loading() {
        Cow::Owned(format!("{} {}", spinner(app.spinner_frame), message))
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MastodonClient;
    use crate::app::Screen;
    use crate::config::Config;
    use std::time::Duration;

    #[tokio::test]
    async fn message_replaces_hints() {
        let client =
            MastodonClient::new("https://example.social", None, Duration::from_secs(5)).unwrap();
        let mut app = App::new(client, &Config::default(), Screen::Local);
        assert_eq!(status_text(&app), KEY_HINTS);
        app.set_status("Boosted");
        assert_eq!(status_text(&app), "Boosted");
    }
}
