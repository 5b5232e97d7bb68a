//! Terminal rendering of the transcript and quick replies.

use nyang_core::link::{self, Segment};
use nyang_model::{Message, QuickReply, Sender};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";

/// A message ready to be printed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedMessage {
    /// The colored text, with every link followed by its number.
    pub line: String,
    /// Link targets, in order. Link `[n]` is at index `n - 1`.
    pub links: Vec<String>,
}

/// Renders a message of the transcript.
///
/// Link markup in bot messages is replaced by its display title and a
/// number the user can pick it by. User messages are shown verbatim.
pub fn render_message(msg: &Message) -> RenderedMessage {
    if msg.sender == Sender::User {
        return RenderedMessage {
            line: format!("{}🙋 {}", BAR_CHAR.bright_green(), msg.text),
            links: Vec::new(),
        };
    }

    let mut line = format!("{}🐱 ", BAR_CHAR.bright_cyan());
    let mut links = Vec::new();
    for segment in link::render(&msg.text) {
        match segment {
            Segment::Text(text) => {
                line.push_str(&text.bright_white().to_string());
            }
            Segment::Link(link) => {
                links.push(link.target_url.to_owned());
                let title = link.display_title.underline();
                let title = title.bright_blue();
                line.push_str(&format!("{title}[{}]", links.len()));
            }
        }
    }
    RenderedMessage { line, links }
}

/// Renders the quick replies as a numbered list, one per line.
///
/// Replies answered without asking the server are marked with `⚡`.
pub fn render_quick_replies(replies: &[QuickReply]) -> String {
    replies
        .iter()
        .enumerate()
        .map(|(i, reply)| {
            let marker = if reply.cached_answer.is_some() { "⚡" } else { "" };
            format!("  [{}] {}{marker}", i + 1, reply.label.bright_yellow())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_links() {
        let msg = Message::bot(
            "[환불 안내](/refund)와 [약관](https://other.example/terms)을 \
             확인하라냥",
        );
        let rendered = render_message(&msg);
        assert_eq!(
            rendered.links,
            vec!["/refund", "https://other.example/terms"]
        );
        assert!(rendered.line.contains("환불 안내"));
        assert!(rendered.line.contains("[2]"));
        assert!(!rendered.line.contains("](/refund)"));
    }

    #[test]
    fn test_user_message_is_verbatim() {
        let rendered = render_message(&Message::user("[a](/b)"));
        assert!(rendered.line.ends_with("[a](/b)"));
        assert!(rendered.links.is_empty());
    }

    #[test]
    fn test_quick_replies() {
        let rendered = render_quick_replies(&[
            QuickReply::new("배송 조회"),
            QuickReply::new("영업 시간").with_cached_answer("10시부터냥"),
        ]);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  [1] "));
        assert!(!lines[0].contains('⚡'));
        assert!(lines[1].ends_with('⚡'));
        assert!(render_quick_replies(&[]).is_empty());
    }
}
