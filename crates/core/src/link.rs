//! Links embedded in bot replies.
//!
//! Replies may contain links written as `[title](url)`. Rendering splits a
//! reply into plain text and link segments, and resolving a link decides
//! whether following it stays inside the application.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::navigation::NavigationState;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid")
});

/// A link found in a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParsedLink<'a> {
    /// The text to show in place of the markup.
    pub display_title: &'a str,
    /// The raw target, relative or absolute.
    pub target_url: &'a str,
}

/// A piece of a rendered reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    /// Text shown verbatim.
    Text(&'a str),
    /// A clickable link.
    Link(ParsedLink<'a>),
}

/// Splits `text` into plain text and link segments, in order.
///
/// Text without any link comes back as a single text segment. Empty text
/// yields no segment at all.
pub fn render(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last_end = 0;
    for caps in LINK_PATTERN.captures_iter(text) {
        let (Some(whole), Some(title), Some(target)) =
            (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if whole.start() > last_end {
            segments.push(Segment::Text(&text[last_end..whole.start()]));
        }
        segments.push(Segment::Link(ParsedLink {
            display_title: title.as_str(),
            target_url: target.as_str(),
        }));
        last_end = whole.end();
    }
    if last_end < text.len() {
        segments.push(Segment::Text(&text[last_end..]));
    }
    segments
}

/// Returns the links of `text` in order.
pub fn links(text: &str) -> impl Iterator<Item = ParsedLink<'_>> {
    render(text).into_iter().filter_map(|segment| match segment {
        Segment::Link(link) => Some(link),
        Segment::Text(_) => None,
    })
}

/// What following a link should do.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkAction {
    /// Navigate inside the application.
    Navigate {
        /// Path and query to navigate to.
        path: String,
        /// State to attach, always marking the widget as the origin.
        state: NavigationState,
    },
    /// Open the URL in a new external context.
    OpenExternal(String),
}

impl LinkAction {
    #[inline]
    fn in_app(path: impl Into<String>) -> Self {
        LinkAction::Navigate {
            path: path.into(),
            state: NavigationState::FROM_CHATBOT,
        }
    }
}

/// Classifies link targets against the origin of the hosting page.
#[derive(Clone, Debug)]
pub struct LinkResolver {
    origin: Url,
}

impl LinkResolver {
    /// Creates a resolver for a page served from `origin`.
    #[inline]
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Decides how to follow `target_url`.
    ///
    /// Absolute URLs on the page's origin and relative paths navigate in-app.
    /// Absolute URLs on other origins open externally. A malformed absolute
    /// URL is handed to the router as-is.
    pub fn resolve(&self, target_url: &str) -> LinkAction {
        if !target_url.starts_with("http") {
            return LinkAction::in_app(target_url);
        }

        let url = match Url::parse(target_url) {
            Ok(url) => url,
            Err(err) => {
                warn!("malformed link {target_url:?}: {err}");
                return LinkAction::in_app(target_url);
            }
        };
        if url.origin() != self.origin.origin() {
            return LinkAction::OpenExternal(target_url.to_owned());
        }

        let mut path = url.path().to_owned();
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            path.push('?');
            path.push_str(query);
        }
        LinkAction::in_app(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LinkResolver {
        LinkResolver::new(Url::parse("https://shop.example").unwrap())
    }

    #[test]
    fn test_render_plain_text() {
        assert_eq!(render("그냥 텍스트"), vec![Segment::Text("그냥 텍스트")]);
        assert!(render("").is_empty());
    }

    #[test]
    fn test_render_links() {
        let segments =
            render("[환불안내](/help/refund) 또는 [배송](/help/ship)을 보라냥");
        assert_eq!(
            segments,
            vec![
                Segment::Link(ParsedLink {
                    display_title: "환불안내",
                    target_url: "/help/refund",
                }),
                Segment::Text(" 또는 "),
                Segment::Link(ParsedLink {
                    display_title: "배송",
                    target_url: "/help/ship",
                }),
                Segment::Text("을 보라냥"),
            ]
        );
    }

    #[test]
    fn test_render_incomplete_markup() {
        let text = "[] and [title]() and [open(/x)";
        assert_eq!(render(text), vec![Segment::Text(text)]);
        assert_eq!(links("see [a](/a)").count(), 1);
    }

    #[test]
    fn test_resolve_same_origin() {
        assert_eq!(
            resolver().resolve("https://shop.example/x?y=1"),
            LinkAction::Navigate {
                path: "/x?y=1".to_owned(),
                state: NavigationState::FROM_CHATBOT,
            }
        );
    }

    #[test]
    fn test_resolve_other_origin() {
        for target in [
            "https://other.example/",
            "http://shop.example/x",
            "https://shop.example:8443/x",
        ] {
            assert_eq!(
                resolver().resolve(target),
                LinkAction::OpenExternal(target.to_owned())
            );
        }
    }

    #[test]
    fn test_resolve_relative_and_malformed() {
        assert_eq!(
            resolver().resolve("/about"),
            LinkAction::Navigate {
                path: "/about".to_owned(),
                state: NavigationState::FROM_CHATBOT,
            }
        );
        assert_eq!(
            resolver().resolve("http://"),
            LinkAction::Navigate {
                path: "http://".to_owned(),
                state: NavigationState::FROM_CHATBOT,
            }
        );
    }
}
