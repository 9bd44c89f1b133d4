//! Generic rendering of documentation trees and highlighted code.

use std::marker::PhantomData;

use crate::ast::{DocNode, DocRoot};
use crate::backend::DocBackend;
use crate::code::{CodeLine, TokenKind};
use crate::link::LinkResolver;

/// Walks a [`DocRoot`] and emits output through backend `B`.
pub struct DocVisitor<'a, B: DocBackend> {
    resolver: &'a dyn LinkResolver,
    rel_path: &'a str,
    output: String,
    _backend: PhantomData<B>,
}

impl<'a, B: DocBackend> DocVisitor<'a, B> {
    #[must_use]
    pub fn new(resolver: &'a dyn LinkResolver, rel_path: &'a str) -> Self {
        Self {
            resolver,
            rel_path,
            output: String::new(),
            _backend: PhantomData,
        }
    }

    /// Render the whole tree.
    #[must_use]
    pub fn render(mut self, root: &DocRoot) -> String {
        self.nodes(&root.children);
        self.output
    }

    fn nodes(&mut self, nodes: &[DocNode]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &DocNode) {
        let out = &mut self.output;
        match node {
            DocNode::Text(text) => B::escape(text, out),
            DocNode::Code(code) => B::inline_code(code, out),
            DocNode::Emphasis(children) => {
                B::emphasis_start(out);
                self.nodes(children);
                B::emphasis_end(&mut self.output);
            }
            DocNode::Strong(children) => {
                B::strong_start(out);
                self.nodes(children);
                B::strong_end(&mut self.output);
            }
            DocNode::Link { url, children } => {
                B::external_link_start(url, out);
                self.nodes(children);
                B::external_link_end(url, &mut self.output);
            }
            DocNode::Ref { target, children } => self.reference(target, children),
            DocNode::Paragraph(children) => {
                B::paragraph_start(out);
                self.nodes(children);
                B::paragraph_end(&mut self.output);
            }
            DocNode::Heading { level, children } => {
                B::heading_start(*level, out);
                self.nodes(children);
                B::heading_end(*level, &mut self.output);
            }
            DocNode::CodeBlock { language, code } => {
                B::code_block(language.as_deref(), code, out);
            }
            DocNode::List { ordered, items } => {
                B::list_start(*ordered, out);
                for item in items {
                    B::item_start(&mut self.output);
                    self.nodes(item);
                    B::item_end(&mut self.output);
                }
                B::list_end(*ordered, &mut self.output);
            }
            DocNode::Section { kind, children } => {
                B::section_start(kind, out);
                self.nodes(children);
                B::section_end(kind, &mut self.output);
            }
            DocNode::LineBreak => B::line_break(out),
            DocNode::Rule => B::rule(out),
        }
    }

    fn reference(&mut self, target: &str, children: &[DocNode]) {
        match self.resolver.resolve(target) {
            Some(link) => {
                B::internal_link_start(&link, self.rel_path, &mut self.output);
                self.nodes(children);
                B::internal_link_end(&link, &mut self.output);
            }
            None => {
                tracing::debug!(target_name = target, "Unresolved reference");
                self.nodes(children);
            }
        }
    }
}

/// Write highlighted lines as a code fragment.
#[must_use]
pub fn write_code<B: DocBackend>(lines: &[CodeLine], show_line_numbers: bool, rel_path: &str) -> String {
    let mut out = String::new();
    B::fragment_start(&mut out);
    for line in lines {
        B::code_line_start(show_line_numbers.then_some(line.number), &mut out);
        for token in &line.tokens {
            if let Some(link) = &token.link {
                B::internal_link_start(link, rel_path, &mut out);
            }
            if token.kind == TokenKind::Plain {
                B::escape(&token.text, &mut out);
            } else {
                B::token_start(token.kind, &mut out);
                B::escape(&token.text, &mut out);
                B::token_end(token.kind, &mut out);
            }
            if let Some(link) = &token.link {
                B::internal_link_end(link, &mut out);
            }
        }
        B::code_line_end(&mut out);
    }
    B::fragment_end(&mut out);
    out
}
