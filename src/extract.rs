//! Pulls topic and reply records out of V2EX page markup.
//!
//! The site's markup is regular enough that a handful of anchored patterns
//! plus balanced `<div>` scanning recover every field we display.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

use crate::error::ParseError;
use crate::v2ex::{Comment, Topic, TopicDetail};

static DIV_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<div\b|</div\s*>").expect("valid div tag regex"));
static ITEM_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bclass="cell item"[^>]*>"#).expect("valid topic item regex")
});
static REPLY_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bid="r_\d+"[^>]*>"#).expect("valid reply cell regex")
});
static TOPIC_CONTENT_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bclass="topic_content"[^>]*>"#)
        .expect("valid topic content regex")
});
static REPLY_CONTENT_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bclass="reply_content"[^>]*>"#)
        .expect("valid reply content regex")
});
static TOPIC_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b([^>]*\bclass="topic-link"[^>]*)>(.*?)</a>"#)
        .expect("valid topic link regex")
});
static REPLY_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bclass="count_(?:livid|orange)"[^>]*>(.*?)</a>"#)
        .expect("valid reply count regex")
});
static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<strong>\s*<a\b[^>]*\bhref="/member/([^"/?#]+)"[^>]*>(.*?)</a>"#)
        .expect("valid author regex")
});
static SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<span\b([^>]*)>([^<]*)</span>").expect("valid span regex"));
static SEQUENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*\bclass="no"[^>]*>(.*?)</span>"#)
        .expect("valid sequence regex")
});
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").expect("valid heading regex"));
static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bhref="([^"]*)""#).expect("valid href regex"));
static TITLE_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\btitle="([^"]*)""#).expect("valid title regex"));
static BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6]|pre|blockquote|tr)\s*>")
        .expect("valid line break regex")
});
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc="([^"]*)"[^>]*>"#).expect("valid image regex")
});
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").expect("valid anchor regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

pub fn extract_topics(markup: &str, base: &Url) -> Vec<Topic> {
    div_blocks(markup, &ITEM_OPEN_RE)
        .into_iter()
        .filter_map(|block| topic_from_block(block, base))
        .collect()
}

fn topic_from_block(block: &str, base: &Url) -> Option<Topic> {
    let link = TOPIC_LINK_RE.captures(block)?;
    let title = inline_text(&link[2]);
    let href = HREF_RE.captures(&link[1])?.get(1)?.as_str();
    let href = html_escape::decode_html_entities(href);
    let url = match base.join(&href) {
        Ok(mut joined) => {
            joined.set_fragment(None);
            joined.to_string()
        }
        Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), href),
    };

    let replies = REPLY_COUNT_RE
        .captures(block)
        .map(|caps| inline_text(&caps[1]))
        .filter(|count| !count.is_empty())
        .unwrap_or_else(|| "0".to_string());

    Some(Topic {
        title,
        url,
        reply_count_label: format!("[{replies} replies]"),
        author: author_in(block),
        created_time: time_in(block),
    })
}

pub fn extract_topic_detail(markup: &str) -> Result<TopicDetail, ParseError> {
    if !HEADING_RE.is_match(markup) {
        return Err(ParseError::MissingElement("topic title <h1>"));
    }

    let content = div_blocks(markup, &TOPIC_CONTENT_OPEN_RE)
        .into_iter()
        .map(body_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let comments = div_blocks(markup, &REPLY_OPEN_RE)
        .into_iter()
        .map(comment_from_block)
        .collect();

    Ok(TopicDetail { content, comments })
}

fn comment_from_block(block: &str) -> Comment {
    let sequence_no = SEQUENCE_RE
        .captures(block)
        .map(|caps| inline_text(&caps[1]))
        .unwrap_or_default();
    let content = div_blocks(block, &REPLY_CONTENT_OPEN_RE)
        .first()
        .map(|inner| body_text(inner))
        .unwrap_or_default();
    Comment::new(sequence_no, author_in(block), time_in(block), content)
}

fn author_in(block: &str) -> String {
    AUTHOR_RE
        .captures(block)
        .map(|caps| {
            let text = inline_text(&caps[2]);
            if text.is_empty() {
                caps[1].to_string()
            } else {
                text
            }
        })
        .unwrap_or_default()
}

/// The first leaf `<span>` carrying a `title` attribute holds the absolute
/// time; its text is the relative form ("3 minutes ago").
fn time_in(block: &str) -> String {
    for caps in SPAN_RE.captures_iter(block) {
        if let Some(title) = TITLE_ATTR_RE.captures(&caps[1]) {
            let absolute = html_escape::decode_html_entities(&title[1]).trim().to_string();
            if !absolute.is_empty() {
                return absolute;
            }
            return inline_text(&caps[2]);
        }
    }
    String::new()
}

/// Inner markup of every `<div>` whose opening tag matches `open`.
fn div_blocks<'a>(markup: &'a str, open: &Regex) -> Vec<&'a str> {
    open.find_iter(markup)
        .map(|found| div_inner(markup, found.end()))
        .collect()
}

fn div_inner(markup: &str, start: usize) -> &str {
    let rest = &markup[start..];
    let mut depth = 1usize;
    for tag in DIV_TAG_RE.find_iter(rest) {
        if tag.as_str().starts_with("</") {
            depth -= 1;
            if depth == 0 {
                return &rest[..tag.start()];
            }
        } else {
            depth += 1;
        }
    }
    rest
}

/// Post and reply bodies: like `html_to_text`, but images become
/// `[image: src]` and links to other pages keep their target after the
/// link text. Member links (`@<a href="/member/x">x</a>`) stay bare names.
pub fn body_text(fragment: &str) -> String {
    let imaged = IMAGE_RE.replace_all(fragment, |caps: &Captures| {
        let src = html_escape::decode_html_entities(&caps[1]);
        format!("[image: {}]", src.trim())
    });
    let linked = ANCHOR_RE.replace_all(&imaged, |caps: &Captures| {
        let inner = caps[2].to_string();
        let href = match HREF_RE.captures(&caps[1]) {
            Some(href) => html_escape::decode_html_entities(&href[1]).trim().to_string(),
            None => return inner,
        };
        if href.is_empty() || href.starts_with('#') || href.starts_with("/member/") {
            return inner;
        }
        if inline_text(&inner) == href {
            inner
        } else {
            format!("{inner} ({href})")
        }
    });
    html_to_text(&linked)
}

pub fn html_to_text(fragment: &str) -> String {
    let broken = BREAK_RE.replace_all(fragment, "\n");
    let stripped = TAG_RE.replace_all(&broken, "");
    let decoded = html_escape::decode_html_entities(&stripped).replace('\u{a0}', " ");

    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = false;
    for line in decoded.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            if !blank_run && !lines.is_empty() {
                lines.push("");
            }
            blank_run = true;
        } else {
            lines.push(line);
            blank_run = false;
        }
    }
    lines.join("\n").trim().to_string()
}

fn inline_text(fragment: &str) -> String {
    html_to_text(fragment)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
