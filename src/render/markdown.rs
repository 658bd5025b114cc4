// src/render/markdown.rs
// =============================================================================
// This module turns Markdown text into HTML.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Ships an HTML writer (`html::push_html`) for everything we don't customize
//
// The twist: links and images are NOT written by pulldown-cmark. Instead we
// hand them to a `LinkHandler`, which decides what the final HTML looks like.
// Everything else (headings, lists, code blocks, ...) goes through untouched.
//
// Rust concepts:
// - Traits: `LinkHandler` is the plug-in point for link/image rendering
// - Lifetimes: events borrow from the markdown text ('a)
// - Enums with data: `Frame` remembers which construct we're inside
// =============================================================================

use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag};

/// Decides how links and images are written out.
///
/// The engine calls these once per construct, in document order.
pub trait LinkHandler {
    /// Renders an anchor. `text_html` is the already-rendered link text.
    fn render_link(&mut self, target: &str, title: &str, text_html: &str) -> String;

    /// Renders an image. `alt` is the plain text of the image description.
    fn render_image(&mut self, target: &str, title: &str, alt: &str) -> String;
}

// A link or image we've entered but not yet closed.
// `inner` buffers the events between Start and End so we can render
// them before handing the result to the LinkHandler.
enum Frame<'a> {
    Link {
        target: CowStr<'a>,
        title: CowStr<'a>,
        inner: Vec<Event<'a>>,
    },
    Image {
        target: CowStr<'a>,
        title: CowStr<'a>,
        inner: Vec<Event<'a>>,
    },
}

impl<'a> Frame<'a> {
    fn inner_mut(&mut self) -> &mut Vec<Event<'a>> {
        match self {
            Frame::Link { inner, .. } | Frame::Image { inner, .. } => inner,
        }
    }
}

// Renders Markdown to HTML, delegating links and images to `handler`
//
// Parameters:
//   markdown: the markdown text to render
//   handler: decides the HTML for every link and image
//
// Returns: the rendered HTML document fragment
//
// Links may contain images (think `[![badge](img.png)](https://ci)`),
// so we keep a stack of open frames instead of a single "current" one.
pub fn render_with<H: LinkHandler>(markdown: &str, handler: &mut H) -> String {
    let parser = Parser::new_ext(markdown, markdown_options());

    let mut output: Vec<Event> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for event in parser {
        let rendered = match event {
            Event::Start(Tag::Link(link_type, target, title)) => {
                // Email autolinks (<me@example.com>) carry the bare address
                let target = match link_type {
                    LinkType::Email => CowStr::from(format!("mailto:{}", target)),
                    _ => target,
                };
                stack.push(Frame::Link { target, title, inner: Vec::new() });
                continue;
            }
            Event::Start(Tag::Image(_link_type, target, title)) => {
                stack.push(Frame::Image { target, title, inner: Vec::new() });
                continue;
            }
            Event::End(Tag::Link(..)) | Event::End(Tag::Image(..)) => match stack.pop() {
                Some(Frame::Link { target, title, inner }) => {
                    let mut text_html = String::new();
                    html::push_html(&mut text_html, inner.into_iter());
                    Event::Html(CowStr::from(handler.render_link(&target, &title, &text_html)))
                }
                Some(Frame::Image { target, title, inner }) => {
                    let alt = plain_text(&inner);
                    Event::Html(CowStr::from(handler.render_image(&target, &title, &alt)))
                }
                // Unbalanced End without a Start: pulldown-cmark never emits this
                None => continue,
            },
            other => other,
        };

        match stack.last_mut() {
            Some(frame) => frame.inner_mut().push(rendered),
            None => output.push(rendered),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, output.into_iter());
    html_output
}

// The Markdown extensions we turn on for READMEs
fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

// Flattens buffered events into plain text (used for image alt text)
fn plain_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Escapes a URL for an `href`/`src` attribute, the way pulldown-cmark does.
pub fn href_attr(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len());
    // Writing into a String never fails
    let _ = escape_href(&mut escaped, url);
    escaped
}

/// Escapes text for a `title`/`alt` attribute.
pub fn text_attr(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let _ = escape_html(&mut escaped, text);
    escaped
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of subclassing a renderer?
//    - Rust has no inheritance
//    - The engine owns the walk over events, the handler owns the decisions
//    - Any type that implements LinkHandler can be plugged in
//
// 2. What is CowStr?
//    - pulldown-cmark's "maybe borrowed, maybe owned" string
//    - Text borrowed from the markdown stays borrowed (no copy)
//    - CowStr::from(String) wraps HTML we built ourselves
//
// 3. What does `continue` do inside a match arm?
//    - It skips the rest of the loop body for this event
//    - We use it when an event was consumed (pushed onto the stack)
// -----------------------------------------------------------------------------
