use std::borrow::Cow;

use chrono::{DateTime, Datelike, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns (CJK and emoji count 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: char = '…';

/// Truncate `s` to at most `max_width` columns, ending in an ellipsis when
/// anything was cut. Borrows when the string already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // One column is reserved for the ellipsis
    let budget = max_width - 1;
    let mut width = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        end = idx + c.len_utf8();
    }

    let mut out = String::with_capacity(end + ELLIPSIS.len_utf8());
    out.push_str(s[..end].trim_end());
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Remove terminal control characters and ANSI escape sequences from
/// server-supplied text before it reaches the terminal.
///
/// Tab, newline and carriage return are kept. CSI (`ESC [`) sequences are
/// skipped through their final byte, OSC (`ESC ]`) through BEL or ST.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| b == 0x1b || is_stripped_control(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x1b if bytes.get(i + 1) == Some(&b'[') => {
                i += 2;
                while i < bytes.len() {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            }
            0x1b if bytes.get(i + 1) == Some(&b']') => {
                i += 2;
                while i < bytes.len() {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            b if b == 0x1b || is_stripped_control(b) => i += 1,
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != 0x1b && !is_stripped_control(bytes[i]) {
                    i += 1;
                }
                // Only ASCII bytes end a run, so the slice is on char boundaries
                out.push_str(&s[start..i]);
            }
        }
    }
    Cow::Owned(out)
}

// ============================================================================
// Status HTML
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    Plain,
    Invisible,
    Ellipsis,
}

/// Flatten Mastodon status HTML into plain text.
///
/// Paragraphs become blank-line separated, `<br>` a newline. Link spans the
/// server marks `invisible` (URL scheme, long tails) are dropped and
/// `ellipsis` spans get a trailing `…`, mirroring how the web UI shortens
/// links. Entities are decoded and control characters stripped.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut spans: Vec<SpanKind> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('<') {
            let Some(close) = after.find('>') else {
                // Unterminated tag; treat the remainder as text
                push_text(&mut out, rest, &spans);
                break;
            };
            handle_tag(&after[..close], &mut out, &mut spans);
            rest = &after[close + 1..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            push_text(&mut out, &rest[..end], &spans);
            rest = &rest[end..];
        }
    }

    let cleaned = strip_control_chars(out.trim()).into_owned();
    collapse_blank_lines(&cleaned)
}

fn handle_tag(tag: &str, out: &mut String, spans: &mut Vec<SpanKind>) {
    let tag = tag.trim();
    let (closing, body) = match tag.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, tag),
    };
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();

    match (name.as_str(), closing) {
        ("br", _) => out.push('\n'),
        ("p", true) => out.push_str("\n\n"),
        ("li", false) => out.push_str("\n• "),
        ("span", false) => spans.push(span_kind(&body[name_end..])),
        ("span", true) => {
            if spans.pop() == Some(SpanKind::Ellipsis) && !hidden(spans) {
                out.push(ELLIPSIS);
            }
        }
        _ => {}
    }
}

fn span_kind(attrs: &str) -> SpanKind {
    let Some(start) = attrs.find("class=") else {
        return SpanKind::Plain;
    };
    let value = attrs[start + "class=".len()..].trim_start_matches(['"', '\'']);
    let value = value.split(['"', '\'']).next().unwrap_or("");
    let mut classes = value.split_whitespace();
    if classes.clone().any(|c| c == "invisible") {
        SpanKind::Invisible
    } else if classes.any(|c| c == "ellipsis") {
        SpanKind::Ellipsis
    } else {
        SpanKind::Plain
    }
}

fn hidden(spans: &[SpanKind]) -> bool {
    spans.contains(&SpanKind::Invisible)
}

fn push_text(out: &mut String, text: &str, spans: &[SpanKind]) {
    if hidden(spans) {
        return;
    }
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').filter(|&semi| semi <= 10) {
            Some(semi) => match decode_entity(&candidate[1..semi]) {
                Some(c) => {
                    out.push(c);
                    rest = &candidate[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

fn collapse_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut blank_run = 0;
    for line in s.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
    }
    out
}

// ============================================================================
// Timestamps
// ============================================================================

/// Compact age of a timestamp: `now`, `42s`, `5m`, `3h`, `6d`, then a date.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(at);
    let secs = age.num_seconds();
    if secs < 5 {
        "now".to_string()
    } else if secs < 60 {
        format!("{}s", secs)
    } else if age.num_minutes() < 60 {
        format!("{}m", age.num_minutes())
    } else if age.num_hours() < 24 {
        format!("{}h", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d", age.num_days())
    } else if at.year() == now.year() {
        at.format("%b %-d").to_string()
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}
