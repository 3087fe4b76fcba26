//! Pagination cursors from Mastodon `Link` headers.
//!
//! Mastodon paginates with a header like
//! `<https://host/api/v1/timelines/home?max_id=9>; rel="next", <...?min_id=12>; rel="prev"`.
//! Only the paging parameters of each URL are kept, form-encoded, as the
//! [`PageCursor`] token. The source re-applies them to its own endpoint.

use url::{form_urlencoded, Url};

use crate::paging::PageCursor;

/// Query parameters that carry pagination state.
const CURSOR_PARAMS: &[&str] = &["max_id", "min_id", "since_id", "offset"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Toward newer items.
    pub prev: Option<PageCursor>,
    /// Toward older items.
    pub next: Option<PageCursor>,
}

/// Parse a `Link` header value. Malformed entries are skipped.
pub fn parse_link_header(value: &str) -> PageLinks {
    let mut links = PageLinks::default();

    for entry in value.split(',') {
        let mut parts = entry.split(';');
        let Some(target) = parts.next() else {
            continue;
        };
        let target = target.trim();
        let Some(target) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
            tracing::debug!(entry = %entry.trim(), "Skipping malformed Link entry");
            continue;
        };

        let rels: Vec<&str> = parts
            .filter_map(|param| {
                let (key, val) = param.split_once('=')?;
                (key.trim().eq_ignore_ascii_case("rel")).then(|| val.trim().trim_matches('"'))
            })
            .flat_map(str::split_whitespace)
            .collect();

        if rels.contains(&"next") {
            links.next = cursor_from_url(target);
        }
        if rels.contains(&"prev") {
            links.prev = cursor_from_url(target);
        }
    }

    links
}

/// Reduce a pagination URL to its paging parameters.
fn cursor_from_url(target: &str) -> Option<PageCursor> {
    let url = Url::parse(target).ok()?;
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in url.query_pairs() {
        if CURSOR_PARAMS.contains(&key.as_ref()) {
            serializer.append_pair(&key, &value);
            any = true;
        }
    }
    any.then(|| PageCursor::new(serializer.finish()))
}

/// Expand a cursor back into query pairs.
pub fn cursor_query_pairs(cursor: &PageCursor) -> Vec<(String, String)> {
    form_urlencoded::parse(cursor.as_str().as_bytes())
        .into_owned()
        .filter(|(key, _)| CURSOR_PARAMS.contains(&key.as_str()))
        .collect()
}
