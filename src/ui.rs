//! Screen composition. Every screen is a list of plain lines the display
//! layer draws after clearing the terminal.

use textwrap::{wrap, Options as WrapOptions};

use crate::pager::Pager;
use crate::v2ex::{Comment, Topic};

pub const DEFAULT_WIDTH: usize = 80;
pub const START_HINT: &str = "Tip: < and > turn pages without Enter; type h and Enter for help.";

const HELP_TEXT: &str = "\
Commands:
  <number>  view that topic and its replies   (Enter)
  h         show this help                    (Enter)
  b         back to the topic list            (Enter)
  r         refresh the topic list            (Enter)
  q         quit                              (Enter)
  >         next page                         (no Enter)
  <         previous page                     (no Enter)
  Ctrl-C    quit immediately

Type b and Enter to return to the topic list.";

const REPLY_MARK: &str = "↳ ";
const INDENT: &str = "    ";

fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width.clamp(1, DEFAULT_WIDTH))
}

fn meta_line(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn push_wrapped(lines: &mut Vec<String>, text: &str, indent: &str, width: usize) {
    let options = WrapOptions::new(width.max(indent.len() + 10))
        .initial_indent(indent)
        .subsequent_indent(indent);
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap(paragraph, &options).into_iter().map(|line| line.into_owned()));
    }
}

pub fn loading(message: &str) -> Vec<String> {
    vec![String::new(), message.to_string()]
}

pub fn help() -> Vec<String> {
    let mut lines = vec![String::new()];
    lines.extend(HELP_TEXT.lines().map(str::to_string));
    lines
}

pub fn topic_list(topics: &[Topic], pager: &Pager, width: usize) -> Vec<String> {
    let mut lines = vec![String::new(), "V2EX topics".to_string(), String::new()];

    if topics.is_empty() {
        lines.push("No topics loaded. Type r and Enter to refresh.".to_string());
    }

    let range = pager.window(topics.len());
    let first_number = range.start + 1;
    for (number, topic) in (first_number..).zip(&topics[range]) {
        lines.push(format!("[{number}] {} {}", topic.title, topic.reply_count_label));
        let meta = meta_line(&[&topic.author, &topic.created_time]);
        if !meta.is_empty() {
            lines.push(format!("{INDENT}{meta}"));
        }
        lines.push(format!("{INDENT}{}", topic.url));
        lines.push(rule('-', width));
    }

    lines.push(String::new());
    lines.push(format!("Page {}", pager.label(topics.len())));
    lines
}

pub fn topic_detail(
    topic: &Topic,
    content: &str,
    tree: &[Comment],
    pager: &Pager,
    width: usize,
) -> Vec<String> {
    let mut lines = vec![String::new(), rule('=', width)];
    lines.push(format!("Title: {}", topic.title));
    let meta = meta_line(&[&topic.author, &topic.created_time, &topic.reply_count_label]);
    if !meta.is_empty() {
        lines.push(meta);
    }
    lines.push(topic.url.clone());
    lines.push(rule('-', width));
    if content.trim().is_empty() {
        lines.push("(no body text)".to_string());
    } else {
        push_wrapped(&mut lines, content, "", width);
    }
    lines.push(rule('=', width));
    lines.push(String::new());

    if tree.is_empty() {
        lines.push("No replies yet.".to_string());
    }

    for comment in &tree[pager.window(tree.len())] {
        push_comment(&mut lines, comment, "", width);
        for reply in &comment.replies {
            push_comment(&mut lines, reply, INDENT, width);
        }
        lines.push(String::new());
    }

    lines.push(rule('-', width));
    lines.push(format!(
        "Comments page {} · < > turn pages · b back to topics · h help",
        pager.label(tree.len())
    ));
    lines
}

fn push_comment(lines: &mut Vec<String>, comment: &Comment, indent: &str, width: usize) {
    let marker = if indent.is_empty() { "" } else { REPLY_MARK };
    let header = meta_line(&[&comment.author, &comment.timestamp]);
    lines.push(format!("{indent}{marker}#{} {header}", comment.sequence_no));
    let body_indent = format!("{indent}{INDENT}");
    push_wrapped(lines, &comment.content, &body_indent, width);
}
