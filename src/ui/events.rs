//! Background task and feed change handling.

use crate::app::{App, AppEvent};
use crate::paging::{Applied, LoadDirection};

/// Apply the result of a background task to the app state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ActionCompleted { action, status } => {
            app.pending_actions.remove(&status.id);
            app.feed.apply_status_update(&status);
            app.set_status(action.past_tense());
        }
        AppEvent::ActionFailed {
            status_id,
            action,
            error,
        } => {
            app.pending_actions.remove(&status_id);
            tracing::debug!(status_id = %status_id, action = ?action, "Action failed");
            app.set_status(error);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task = task, error = %error, "Background task panicked");
            // The id of the status it was acting on is lost with the panic
            app.pending_actions.clear();
            app.set_status(format!("Internal error in {}", task));
        }
    }
}

/// React to a page the pager just merged. Failed loads never get here;
/// they only show up in the load states the list renders.
pub(super) fn handle_feed_change(app: &mut App, applied: Applied) {
    if applied.direction == LoadDirection::Prepend && applied.inserted > 0 {
        let noun = if applied.inserted == 1 { "post" } else { "posts" };
        app.set_status(format!("{} new {}", applied.inserted, noun));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MastodonClient, StatusAction};
    use crate::app::Screen;
    use crate::config::Config;
    use std::time::Duration;

    fn app() -> App {
        let client =
            MastodonClient::new("https://example.social", None, Duration::from_secs(5)).unwrap();
        App::new(client, &Config::default(), Screen::Local)
    }

    #[tokio::test]
    async fn failed_action_clears_pending() {
        let mut app = app();
        app.pending_actions.insert("7".to_string());
        handle_app_event(
            &mut app,
            AppEvent::ActionFailed {
                status_id: "7".to_string(),
                action: StatusAction::Boost,
                error: "Server error: status 500".to_string(),
            },
        );
        assert!(app.pending_actions.is_empty());
        assert_eq!(app.status_message.as_ref().unwrap().0, "Server error: status 500");
    }

    #[tokio::test]
    async fn panic_reports_task() {
        let mut app = app();
        app.pending_actions.insert("7".to_string());
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "status_action",
                error: "boom".to_string(),
            },
        );
        assert!(app.pending_actions.is_empty());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn newer_posts_announced() {
        let mut app = app();
        handle_feed_change(
            &mut app,
            Applied {
                direction: LoadDirection::Prepend,
                inserted: 3,
            },
        );
        assert_eq!(app.status_message.as_ref().unwrap().0, "3 new posts");

        handle_feed_change(
            &mut app,
            Applied {
                direction: LoadDirection::Prepend,
                inserted: 1,
            },
        );
        assert_eq!(app.status_message.as_ref().unwrap().0, "1 new post");

        app.status_message = None;
        handle_feed_change(
            &mut app,
            Applied {
                direction: LoadDirection::Append,
                inserted: 20,
            },
        );
        assert!(app.status_message.is_none());
    }
}
