//! Documentation and source code rendering for docgen output formats.
//!
//! Documentation comments are parsed by [`DocParser`] into a [`DocRoot`] tree
//! and written through a [`DocBackend`], one per [`OutputFormat`]:
//! - [`HtmlBackend`]: HTML fragments with `class="el"` entity links
//! - [`LatexBackend`]: `LaTeX` using the `Doxy*` environments
//! - [`RtfBackend`]: RTF with field hyperlinks
//! - [`ManBackend`]: troff for man pages
//! - [`DocbookBackend`]: `DocBook` XML
//!
//! Source code is highlighted by a [`CodeParser`] and written with the same
//! backends. [`render_doc`] and [`render_code`] pick the backend for a format.
//!
//! # Example
//!
//! ```
//! use dg_model::OutputFormat;
//! use dg_renderer::{DocParser, NoLinks, render_doc};
//!
//! let html = render_doc(&DocParser::new(), OutputFormat::Html, "A *tiny* widget.", true, "", &NoLinks);
//! assert_eq!(html, "A <em>tiny</em> widget.");
//! ```
//!
//! [`OutputFormat`]: dg_model::OutputFormat

mod ast;
mod backend;
mod code;
mod docbook;
mod escape;
mod html;
mod latex;
mod link;
mod man;
mod parser;
mod render;
mod rtf;
mod visitor;

pub use ast::{DocNode, DocRoot, SectionKind};
pub use backend::DocBackend;
pub use code::{CodeLine, CodeOptions, CodeParser, CodeToken, KeywordCodeParser, TokenKind};
pub use docbook::DocbookBackend;
pub use escape::{escape, escape_html};
pub use html::HtmlBackend;
pub use latex::LatexBackend;
pub use link::{LinkResolver, LinkTarget, NoLinks};
pub use man::ManBackend;
pub use parser::DocParser;
pub use render::{render_code, render_doc};
pub use rtf::RtfBackend;
pub use visitor::{DocVisitor, write_code};
