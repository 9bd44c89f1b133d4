//! Documentation comment parser.
//!
//! Comments are Markdown with a small set of commands:
//! - `\ref Name` / `\ref Name "text"` cross-references an entity
//! - `\c word` / `\p word` (code), `\b word` (bold), `\e word` / `\a word` (emphasis)
//! - `\note`, `\warning`, `\return`, `\see`, `\since`, `\deprecated`,
//!   `\param name` start a simple section that runs to the next blank line
//!
//! Commands may also be written with `@` instead of `\`.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use regex::{Captures, Regex};

use crate::ast::{DocNode, DocRoot, SectionKind};

/// URL scheme marking links produced from `\ref` commands.
const REF_SCHEME: &str = "dg-ref:";

static REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\@]ref\s+([A-Za-z_~][\w:~]*(?:\.[\w~]+)*(?:\(\))?)(?:\s+"([^"]*)")?"#).unwrap()
});

static WORD_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\\@]([cpbea])\s+([^\s,.;:!?)]+)").unwrap());

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[\\@](note|remarks?|warning|attention|returns?|result|see|sa|since|deprecated|param)\b(?:\[[^\]]*\])?\s*(.*)$")
        .unwrap()
});

/// Parser turning raw comment text into a [`DocRoot`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DocParser;

struct Segment {
    kind: Option<SectionKind>,
    text: String,
}

impl DocParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a comment.
    ///
    /// Brief descriptions are parsed inline: a single leading paragraph is
    /// unwrapped so the fragment can be embedded in running text.
    #[must_use]
    pub fn parse(&self, text: &str, is_brief: bool) -> DocRoot {
        let text = rewrite_commands(text);
        let mut children = Vec::new();
        for segment in split_sections(&text) {
            let nodes = parse_markdown(&segment.text);
            match segment.kind {
                Some(kind) => children.push(DocNode::Section {
                    kind,
                    children: nodes,
                }),
                None => children.extend(nodes),
            }
        }

        if is_brief
            && children.len() == 1
            && matches!(children.first(), Some(DocNode::Paragraph(_)))
            && let Some(DocNode::Paragraph(inline)) = children.pop()
        {
            children = inline;
        }

        DocRoot { children, is_brief }
    }
}

/// Rewrite inline commands into Markdown.
fn rewrite_commands(text: &str) -> String {
    let text = REF_RE.replace_all(text, |caps: &Captures<'_>| {
        let target = &caps[1];
        let label = caps.get(2).map_or(target, |m| m.as_str());
        format!("[{label}]({REF_SCHEME}{target})")
    });
    WORD_COMMAND_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            let word = &caps[2];
            match &caps[1] {
                "c" | "p" => format!("`{word}`"),
                "b" => format!("**{word}**"),
                _ => format!("*{word}*"),
            }
        })
        .into_owned()
}

/// Split text into plain segments and simple sections.
fn split_sections(text: &str) -> Vec<Segment> {
    let mut segments = vec![Segment {
        kind: None,
        text: String::new(),
    }];
    for line in text.lines() {
        if let Some(caps) = SECTION_RE.captures(line) {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            let (argument, body) = if &caps[1] == "param" {
                rest.split_once(char::is_whitespace).unwrap_or((rest, ""))
            } else {
                ("", rest)
            };
            segments.push(Segment {
                kind: SectionKind::from_command(&caps[1], argument),
                text: format!("{body}\n"),
            });
            continue;
        }
        let in_section = segments.last().is_some_and(|s| s.kind.is_some());
        if in_section && line.trim().is_empty() {
            segments.push(Segment {
                kind: None,
                text: String::new(),
            });
            continue;
        }
        if let Some(current) = segments.last_mut() {
            current.text.push_str(line);
            current.text.push('\n');
        }
    }
    segments.retain(|s| s.kind.is_some() || !s.text.trim().is_empty());
    segments
}

#[derive(Debug)]
enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    Emphasis,
    Strong,
    Link(String),
    Ref(String),
    List(bool),
    Item,
    /// Container whose markup is dropped but whose content is kept.
    Transparent,
}

struct Frame {
    kind: FrameKind,
    children: Vec<DocNode>,
    items: Vec<Vec<DocNode>>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            items: Vec::new(),
        }
    }
}

/// Builds [`DocNode`] trees from pulldown-cmark events.
struct TreeBuilder {
    stack: Vec<Frame>,
    code: Option<(Option<String>, String)>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Root)],
            code: None,
        }
    }

    fn push_node(&mut self, node: DocNode) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if let Some((_, code)) = &mut self.code {
                    code.push_str(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(code) => self.push_node(DocNode::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => self.push_text(&html),
            Event::SoftBreak => self.push_text(" "),
            Event::HardBreak => self.push_node(DocNode::LineBreak),
            Event::Rule => self.push_node(DocNode::Rule),
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    /// Append text, merging with a preceding text node.
    fn push_text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            if let Some(DocNode::Text(last)) = frame.children.last_mut() {
                last.push_str(text);
            } else {
                frame.children.push(DocNode::Text(text.to_owned()));
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => FrameKind::Paragraph,
            Tag::Heading { level, .. } => FrameKind::Heading(heading_level_to_num(level)),
            Tag::Emphasis => FrameKind::Emphasis,
            Tag::Strong => FrameKind::Strong,
            Tag::Link { dest_url, .. } => match dest_url.strip_prefix(REF_SCHEME) {
                Some(target) => FrameKind::Ref(target.to_owned()),
                None => FrameKind::Link(dest_url.into_string()),
            },
            Tag::List(start) => FrameKind::List(start.is_some()),
            Tag::Item => FrameKind::Item,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) if !info.is_empty() => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code = Some((language, String::new()));
                return;
            }
            _ => FrameKind::Transparent,
        };
        self.stack.push(Frame::new(kind));
    }

    fn end_tag(&mut self, tag: TagEnd) {
        if tag == TagEnd::CodeBlock {
            if let Some((language, code)) = self.code.take() {
                self.push_node(DocNode::CodeBlock { language, code });
            }
            return;
        }
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let node = match frame.kind {
            FrameKind::Paragraph => DocNode::Paragraph(frame.children),
            FrameKind::Heading(level) => DocNode::Heading {
                level,
                children: frame.children,
            },
            FrameKind::Emphasis => DocNode::Emphasis(frame.children),
            FrameKind::Strong => DocNode::Strong(frame.children),
            FrameKind::Link(url) => DocNode::Link {
                url,
                children: frame.children,
            },
            FrameKind::Ref(target) => DocNode::Ref {
                target,
                children: frame.children,
            },
            FrameKind::List(ordered) => DocNode::List {
                ordered,
                items: frame.items,
            },
            FrameKind::Item => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.items.push(frame.children);
                }
                return;
            }
            FrameKind::Root | FrameKind::Transparent => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.children.extend(frame.children);
                }
                return;
            }
        };
        self.push_node(node);
    }

    fn finish(mut self) -> Vec<DocNode> {
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.stack[0].children.extend(frame.children);
            }
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn parse_markdown(text: &str) -> Vec<DocNode> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new(text) {
        builder.process_event(event);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(s: &str) -> DocNode {
        DocNode::Text(s.to_owned())
    }

    #[test]
    fn test_empty_input_has_no_nodes() {
        assert!(DocParser::new().parse("", false).is_empty());
        assert!(DocParser::new().parse("   \n", true).is_empty());
    }

    #[test]
    fn test_brief_is_unwrapped() {
        let root = DocParser::new().parse("A *small* widget.", true);
        assert_eq!(
            root.children,
            vec![
                text("A "),
                DocNode::Emphasis(vec![text("small")]),
                text(" widget."),
            ]
        );
    }

    #[test]
    fn test_details_keep_paragraphs() {
        let root = DocParser::new().parse("First.\n\nSecond.", false);
        assert_eq!(
            root.children,
            vec![
                DocNode::Paragraph(vec![text("First.")]),
                DocNode::Paragraph(vec![text("Second.")]),
            ]
        );
    }

    #[test]
    fn test_ref_command_becomes_ref_node() {
        let root = DocParser::new().parse(r#"See \ref geo::Shape "the shape"."#, true);
        assert_eq!(
            root.children,
            vec![
                text("See "),
                DocNode::Ref {
                    target: "geo::Shape".to_owned(),
                    children: vec![text("the shape")],
                },
                text("."),
            ]
        );
    }

    #[test]
    fn test_word_commands() {
        let root = DocParser::new().parse(r"Pass \p count or \b never.", true);
        assert_eq!(
            root.children,
            vec![
                text("Pass "),
                DocNode::Code("count".to_owned()),
                text(" or "),
                DocNode::Strong(vec![text("never")]),
                text("."),
            ]
        );
    }

    #[test]
    fn test_sections_run_to_blank_line() {
        let root = DocParser::new().parse(
            "Computes things.\n\\param x the input\n\\return the result\n\nTrailing text.",
            false,
        );
        assert_eq!(
            root.children,
            vec![
                DocNode::Paragraph(vec![text("Computes things.")]),
                DocNode::Section {
                    kind: SectionKind::Param("x".to_owned()),
                    children: vec![DocNode::Paragraph(vec![text("the input")])],
                },
                DocNode::Section {
                    kind: SectionKind::Return,
                    children: vec![DocNode::Paragraph(vec![text("the result")])],
                },
                DocNode::Paragraph(vec![text("Trailing text.")]),
            ]
        );
    }

    #[test]
    fn test_code_block_and_list() {
        let root = DocParser::new().parse("- one\n- two\n\n```cpp\nint x;\n```\n", false);
        assert_eq!(
            root.children,
            vec![
                DocNode::List {
                    ordered: false,
                    items: vec![vec![text("one")], vec![text("two")]],
                },
                DocNode::CodeBlock {
                    language: Some("cpp".to_owned()),
                    code: "int x;\n".to_owned(),
                },
            ]
        );
    }
}
