//! Backend trait for format-specific output.
//!
//! The documentation visitor and the code writer are generic over this
//! trait, so each output format only has to say how a construct looks.

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::code::TokenKind;
use crate::link::LinkTarget;

/// Format-specific rendering operations.
pub trait DocBackend {
    /// Output format produced by this backend.
    const FORMAT: OutputFormat;

    /// Append `text` escaped for this format.
    fn escape(text: &str, out: &mut String);

    fn paragraph_start(out: &mut String);
    fn paragraph_end(out: &mut String);
    fn emphasis_start(out: &mut String);
    fn emphasis_end(out: &mut String);
    fn strong_start(out: &mut String);
    fn strong_end(out: &mut String);
    fn inline_code(code: &str, out: &mut String);

    /// Render a fenced code block from a comment.
    fn code_block(language: Option<&str>, code: &str, out: &mut String);

    fn heading_start(level: u8, out: &mut String);
    fn heading_end(level: u8, out: &mut String);
    fn list_start(ordered: bool, out: &mut String);
    fn list_end(ordered: bool, out: &mut String);
    fn item_start(out: &mut String);
    fn item_end(out: &mut String);
    fn line_break(out: &mut String);
    fn rule(out: &mut String);
    fn section_start(kind: &SectionKind, out: &mut String);
    fn section_end(kind: &SectionKind, out: &mut String);

    /// Start a link to a documented entity.
    ///
    /// `rel_path` leads from the current page to the output root.
    fn internal_link_start(target: &LinkTarget, rel_path: &str, out: &mut String);
    fn internal_link_end(target: &LinkTarget, out: &mut String);
    fn external_link_start(url: &str, out: &mut String);
    fn external_link_end(url: &str, out: &mut String);

    /// Open a highlighted source fragment.
    fn fragment_start(out: &mut String);
    fn fragment_end(out: &mut String);

    /// Start a source line; `number` is set when line numbers are shown.
    fn code_line_start(number: Option<u32>, out: &mut String);
    fn code_line_end(out: &mut String);

    /// Start a highlighted token. Plain tokens are never wrapped.
    fn token_start(kind: TokenKind, out: &mut String);
    fn token_end(kind: TokenKind, out: &mut String);
}
