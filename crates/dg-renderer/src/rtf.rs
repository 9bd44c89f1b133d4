//! RTF backend.

use std::fmt::Write;

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::backend::DocBackend;
use crate::code::TokenKind;
use crate::escape::push_rtf;
use crate::link::LinkTarget;

/// RTF render backend.
pub struct RtfBackend;

/// Character style for a highlighted token.
fn token_style(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Plain => "",
        TokenKind::Keyword | TokenKind::KeywordType => "\\cf17 ",
        TokenKind::KeywordFlow => "\\cf18 ",
        TokenKind::Comment => "\\cf19 ",
        TokenKind::String => "\\cf20 ",
        TokenKind::Preprocessor => "\\cf21 ",
        TokenKind::Number => "\\cf22 ",
    }
}

impl DocBackend for RtfBackend {
    const FORMAT: OutputFormat = OutputFormat::Rtf;

    fn escape(text: &str, out: &mut String) {
        push_rtf(text, out);
    }

    fn paragraph_start(_out: &mut String) {}

    fn paragraph_end(out: &mut String) {
        out.push_str("\\par\n");
    }

    fn emphasis_start(out: &mut String) {
        out.push_str("{\\i ");
    }

    fn emphasis_end(out: &mut String) {
        out.push('}');
    }

    fn strong_start(out: &mut String) {
        out.push_str("{\\b ");
    }

    fn strong_end(out: &mut String) {
        out.push('}');
    }

    fn inline_code(code: &str, out: &mut String) {
        out.push_str("{\\f2 ");
        push_rtf(code, out);
        out.push('}');
    }

    fn code_block(_language: Option<&str>, code: &str, out: &mut String) {
        out.push_str("{\\f2 ");
        for line in code.lines() {
            push_rtf(line, out);
            out.push_str("\\par\n");
        }
        out.push('}');
    }

    fn heading_start(level: u8, out: &mut String) {
        let size = 32_u8.saturating_sub(level.saturating_mul(4)).max(20);
        write!(out, "{{\\b\\fs{size} ").unwrap();
    }

    fn heading_end(_level: u8, out: &mut String) {
        out.push_str("\\par}\n");
    }

    fn list_start(_ordered: bool, out: &mut String) {
        out.push_str("{\\li360 ");
    }

    fn list_end(_ordered: bool, out: &mut String) {
        out.push_str("}\n");
    }

    fn item_start(out: &mut String) {
        out.push_str("\\bullet\\tab ");
    }

    fn item_end(out: &mut String) {
        out.push_str("\\par\n");
    }

    fn line_break(out: &mut String) {
        out.push_str("\\line\n");
    }

    fn rule(out: &mut String) {
        out.push_str("{\\pard\\brdrb\\brdrs\\brdrw10\\brsp20 \\par}\n");
    }

    fn section_start(kind: &SectionKind, out: &mut String) {
        write!(out, "{{\\b {}", kind.title()).unwrap();
        if let SectionKind::Param(name) = kind {
            out.push_str(" {\\i ");
            push_rtf(name, out);
            out.push('}');
        }
        out.push_str(":}\\par\n{\\li360 ");
    }

    fn section_end(_kind: &SectionKind, out: &mut String) {
        out.push_str("}\n");
    }

    fn internal_link_start(target: &LinkTarget, _rel_path: &str, out: &mut String) {
        write!(
            out,
            "{{\\field{{\\*\\fldinst {{ HYPERLINK \\\\l \"AAAAAAA_{}\" }}}}{{\\fldrslt {{\\cs37\\ul\\cf2 ",
            target.label()
        )
        .unwrap();
    }

    fn internal_link_end(_target: &LinkTarget, out: &mut String) {
        out.push_str("}}}");
    }

    fn external_link_start(url: &str, out: &mut String) {
        write!(
            out,
            "{{\\field{{\\*\\fldinst {{ HYPERLINK \"{url}\" }}}}{{\\fldrslt {{\\cs37\\ul\\cf2 "
        )
        .unwrap();
    }

    fn external_link_end(_url: &str, out: &mut String) {
        out.push_str("}}}");
    }

    fn fragment_start(out: &mut String) {
        out.push_str("{\\par\\pard\\f2\\fs16 ");
    }

    fn fragment_end(out: &mut String) {
        out.push_str("\\par}\n");
    }

    fn code_line_start(number: Option<u32>, out: &mut String) {
        if let Some(number) = number {
            write!(out, "{number:5} ").unwrap();
        }
    }

    fn code_line_end(out: &mut String) {
        out.push_str("\\line\n");
    }

    fn token_start(kind: TokenKind, out: &mut String) {
        write!(out, "{{{}", token_style(kind)).unwrap();
    }

    fn token_end(_kind: TokenKind, out: &mut String) {
        out.push('}');
    }
}
