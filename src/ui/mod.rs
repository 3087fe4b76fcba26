//! Terminal user interface.
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard input handling
//! - `events` - background task results and feed load results
//! - `render` - layout and screen tabs
//! - `feed_list` - the feed list with its load-state rows
//! - `entries` - line layout for statuses, notifications and tags
//! - `status` - status bar
//! - `help` - key table overlay
//! - `helpers` - background task spawning and link opening

mod entries;
mod events;
mod feed_list;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
