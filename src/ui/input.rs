//! Keyboard input handling.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::{Status, StatusAction};
use crate::app::{App, AppEvent, Screen};

use super::helpers::{open_in_browser, spawn_status_action};
use super::Action;

/// Route a key press. The help overlay captures every key while shown.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        if matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return Ok(Action::Continue);
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match code {
        KeyCode::Char('c') if ctrl => return Ok(Action::Quit),
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('?') => app.show_help = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.feed.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.feed.select_previous(),
        KeyCode::Char('d') if ctrl => app.feed.page_down(app.list_height / 2),
        KeyCode::Char('u') if ctrl => app.feed.page_up(app.list_height / 2),
        KeyCode::PageDown => app.feed.page_down(app.list_height),
        KeyCode::PageUp => app.feed.page_up(app.list_height),
        KeyCode::Char('g') | KeyCode::Home => {
            app.feed.scroll_to_top();
        }

        // Screens
        KeyCode::Char(c @ '1'..='5') => {
            let index = (c as usize) - ('1' as usize);
            app.navigate(Screen::ALL[index]);
        }
        KeyCode::Tab => app.navigate(app.screen.next()),
        KeyCode::BackTab => app.navigate(app.screen.previous()),

        // Loading
        KeyCode::Char('r') => {
            if app.feed.retry_failed() {
                app.set_status("Retrying...");
            } else {
                app.set_status("Nothing to retry");
            }
        }
        KeyCode::Char('R') => {
            app.feed.refresh();
            app.set_status("Refreshing...");
        }

        // Entry actions
        KeyCode::Char('b') => request_action(app, event_tx, StatusAction::toggle_boost),
        KeyCode::Char('f') => request_action(app, event_tx, StatusAction::toggle_favourite),
        KeyCode::Char('c') => {
            if !app.toggle_content_warning() {
                app.set_status("No content warning on this post");
            }
        }
        KeyCode::Char('o') | KeyCode::Enter => match app.feed.selected_link() {
            Some(link) => {
                if let Err(e) = open_in_browser(&link) {
                    tracing::warn!(error = %e, "Refusing to open link");
                    app.set_status(e);
                }
            }
            None => app.set_status("Nothing to open"),
        },
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
    Ok(Action::Continue)
}

/// Send a boost or favourite toggle for the selected status.
fn request_action(
    app: &mut App,
    event_tx: &mpsc::Sender<AppEvent>,
    choose: fn(&Status) -> StatusAction,
) {
    let Some(status) = app.feed.selected_status() else {
        app.set_status("Select a post first");
        return;
    };
    if !app.client.is_authenticated() {
        app.set_status("Sign in to interact with posts");
        return;
    }

    let target = status.original();
    let action = choose(&status);
    if !app.pending_actions.insert(target.id.clone()) {
        app.set_status("Already sending a request for this post");
        return;
    }

    tracing::debug!(status_id = %target.id, action = ?action, "Requesting status action");
    spawn_status_action(
        app.client.clone(),
        target.id.clone(),
        action,
        event_tx.clone(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::api::MastodonClient;
    use std::time::Duration;

    fn app() -> App {
        let client = MastodonClient::new(
            "https://example.social",
            Some(secrecy::SecretString::from("tok".to_string())),
            Duration::from_secs(5),
        )
        .unwrap();
        App::new(client, &Config::default(), Screen::Home)
    }

    #[tokio::test]
    async fn number_keys_switch_screens() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel(4);
        handle_input(&mut app, KeyCode::Char('5'), KeyModifiers::NONE, &tx).unwrap();
        assert_eq!(app.screen, Screen::Trending);
        handle_input(&mut app, KeyCode::Tab, KeyModifiers::NONE, &tx).unwrap();
        assert_eq!(app.screen, Screen::Home);
        handle_input(&mut app, KeyCode::BackTab, KeyModifiers::NONE, &tx).unwrap();
        assert_eq!(app.screen, Screen::Trending);
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel(4);
        handle_input(&mut app, KeyCode::Char('?'), KeyModifiers::NONE, &tx).unwrap();
        assert!(app.show_help);
        let action = handle_input(&mut app, KeyCode::Char('3'), KeyModifiers::NONE, &tx).unwrap();
        assert!(matches!(action, Action::Continue));
        assert_eq!(app.screen, Screen::Home);
        handle_input(&mut app, KeyCode::Esc, KeyModifiers::NONE, &tx).unwrap();
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn quit_keys() {
        let mut app = app();
        let (tx, _rx) = mpsc::channel(4);
        let action = handle_input(&mut app, KeyCode::Char('q'), KeyModifiers::NONE, &tx).unwrap();
        assert!(matches!(action, Action::Quit));
        let action =
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx).unwrap();
        assert!(matches!(action, Action::Quit));
    }

    #[tokio::test]
    async fn actions_need_a_selection() {
        let mut app = app();
        let (tx, mut rx) = mpsc::channel(4);
        handle_input(&mut app, KeyCode::Char('f'), KeyModifiers::NONE, &tx).unwrap();
        assert!(app.pending_actions.is_empty());
        assert!(rx.try_recv().is_err());
        let (msg, _) = app.status_message.clone().unwrap();
        assert_eq!(msg, "Select a post first");
    }
}
