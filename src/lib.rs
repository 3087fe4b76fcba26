//! Terminal Mastodon client built on paged, cancellable feeds.
//!
//! - `paging` - pager, load states and snapshots, independent of any API
//! - `component` - lifecycle-scoped feed with scroll state
//! - `api` - Mastodon client, entities and feed sources
//! - `app` / `ui` - screens and the terminal interface

pub mod api;
pub mod app;
pub mod component;
pub mod config;
pub mod paging;
pub mod theme;
pub mod ui;
pub mod util;
