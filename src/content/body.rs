//! Body inspection - blocks, links and the summary divider
//!
//! The body is never rendered here; pulldown-cmark is only used to walk it.

use lazy_static::lazy_static;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref MORE_DIVIDER: Regex = Regex::new(r"(?i)<!--\s*more\s*-->").unwrap();
}

/// A top-level block of the body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    CodeBlock { lang: Option<String>, code: String },
    BlockQuote,
    List { ordered: bool, items: usize },
    Rule,
    Table,
    Html,
    Other,
}

/// A link or image destination found in the body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub text: String,
    pub url: String,
    pub image: bool,
}

impl Link {
    /// Whether the destination points inside the site rather than at another host
    pub fn is_local(&self) -> bool {
        !(self.url.contains("://")
            || self.url.starts_with("//")
            || self.url.starts_with('#')
            || self.url.starts_with("mailto:")
            || self.url.starts_with("data:"))
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// List the top-level blocks of a body in document order
pub fn outline(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut text = String::new();
    let mut depth = 0usize;

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    text.clear();
                    current = Some(match tag {
                        Tag::Heading { level, .. } => Block::Heading {
                            level: level as u8,
                            text: String::new(),
                        },
                        Tag::Paragraph => Block::Paragraph {
                            text: String::new(),
                        },
                        Tag::CodeBlock(kind) => Block::CodeBlock {
                            lang: match kind {
                                CodeBlockKind::Fenced(info) => info
                                    .split_whitespace()
                                    .next()
                                    .map(str::to_string),
                                CodeBlockKind::Indented => None,
                            },
                            code: String::new(),
                        },
                        Tag::BlockQuote(_) => Block::BlockQuote,
                        Tag::List(start) => Block::List {
                            ordered: start.is_some(),
                            items: 0,
                        },
                        Tag::Table(_) => Block::Table,
                        Tag::HtmlBlock => Block::Html,
                        _ => Block::Other,
                    });
                } else if depth == 1 && matches!(tag, Tag::Item) {
                    if let Some(Block::List { items, .. }) = current.as_mut() {
                        *items += 1;
                    }
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = current.take() {
                        blocks.push(finish_block(block, &text));
                    }
                }
            }
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::Rule if depth == 0 => blocks.push(Block::Rule),
            _ => {}
        }
    }

    blocks
}

fn finish_block(block: Block, text: &str) -> Block {
    match block {
        Block::Heading { level, .. } => Block::Heading {
            level,
            text: text.trim().to_string(),
        },
        Block::Paragraph { .. } => Block::Paragraph {
            text: text.trim().to_string(),
        },
        Block::CodeBlock { lang, .. } => Block::CodeBlock {
            lang,
            code: text.to_string(),
        },
        other => other,
    }
}

/// Collect link and image destinations in document order of their closing
pub fn links(markdown: &str) -> Vec<Link> {
    let mut found = Vec::new();
    let mut open: Vec<Link> = Vec::new();

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => open.push(Link {
                text: String::new(),
                url: dest_url.to_string(),
                image: false,
            }),
            Event::Start(Tag::Image { dest_url, .. }) => open.push(Link {
                text: String::new(),
                url: dest_url.to_string(),
                image: true,
            }),
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                if let Some(link) = open.pop() {
                    found.push(link);
                }
            }
            Event::Text(t) | Event::Code(t) => {
                for link in open.iter_mut() {
                    link.text.push_str(&t);
                }
            }
            _ => {}
        }
    }

    found
}

/// Text before the `<!--more-->` divider, if the body has one
pub fn summary(markdown: &str) -> Option<&str> {
    MORE_DIVIDER
        .find(markdown)
        .map(|m| markdown[..m.start()].trim())
}
