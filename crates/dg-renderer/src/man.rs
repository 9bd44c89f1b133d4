//! Man page (troff) backend.
//!
//! Man pages have no hyperlinks; references render as bold text.

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::backend::DocBackend;
use crate::code::TokenKind;
use crate::escape::push_man;
use crate::link::LinkTarget;

/// Man page render backend.
pub struct ManBackend;

/// Start a new line unless already at the start of one.
fn ensure_line_start(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

impl DocBackend for ManBackend {
    const FORMAT: OutputFormat = OutputFormat::Man;

    fn escape(text: &str, out: &mut String) {
        push_man(text, out);
    }

    fn paragraph_start(out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n");
    }

    fn paragraph_end(out: &mut String) {
        out.push('\n');
    }

    fn emphasis_start(out: &mut String) {
        out.push_str("\\fI");
    }

    fn emphasis_end(out: &mut String) {
        out.push_str("\\fP");
    }

    fn strong_start(out: &mut String) {
        out.push_str("\\fB");
    }

    fn strong_end(out: &mut String) {
        out.push_str("\\fP");
    }

    fn inline_code(code: &str, out: &mut String) {
        out.push_str("\\fC");
        push_man(code, out);
        out.push_str("\\fP");
    }

    fn code_block(_language: Option<&str>, code: &str, out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n.nf\n");
        for line in code.lines() {
            push_man(line, out);
            out.push('\n');
        }
        out.push_str(".fi\n");
    }

    fn heading_start(_level: u8, out: &mut String) {
        ensure_line_start(out);
        out.push_str(".SS \"");
    }

    fn heading_end(_level: u8, out: &mut String) {
        out.push_str("\"\n");
    }

    fn list_start(_ordered: bool, out: &mut String) {
        ensure_line_start(out);
    }

    fn list_end(_ordered: bool, out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n");
    }

    fn item_start(out: &mut String) {
        ensure_line_start(out);
        out.push_str(".IP \"\\(bu\" 2\n");
    }

    fn item_end(out: &mut String) {
        out.push('\n');
    }

    fn line_break(out: &mut String) {
        out.push_str("\n.br\n");
    }

    fn rule(out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n.br\n");
    }

    fn section_start(kind: &SectionKind, out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n\\fB");
        out.push_str(kind.title());
        out.push_str("\\fP");
        if let SectionKind::Param(name) = kind {
            out.push_str(" \\fI");
            push_man(name, out);
            out.push_str("\\fP");
        }
        out.push_str("\n.RS 4\n");
    }

    fn section_end(_kind: &SectionKind, out: &mut String) {
        ensure_line_start(out);
        out.push_str(".RE\n");
    }

    fn internal_link_start(_target: &LinkTarget, _rel_path: &str, out: &mut String) {
        out.push_str("\\fB");
    }

    fn internal_link_end(_target: &LinkTarget, out: &mut String) {
        out.push_str("\\fP");
    }

    fn external_link_start(_url: &str, _out: &mut String) {}

    fn external_link_end(url: &str, out: &mut String) {
        out.push_str(" (");
        push_man(url, out);
        out.push(')');
    }

    fn fragment_start(out: &mut String) {
        ensure_line_start(out);
        out.push_str(".PP\n.nf\n");
    }

    fn fragment_end(out: &mut String) {
        out.push_str(".fi\n");
    }

    fn code_line_start(_number: Option<u32>, _out: &mut String) {}

    fn code_line_end(out: &mut String) {
        out.push('\n');
    }

    fn token_start(kind: TokenKind, out: &mut String) {
        match kind {
            TokenKind::Keyword | TokenKind::KeywordType | TokenKind::KeywordFlow => {
                out.push_str("\\fB");
            }
            TokenKind::Comment => out.push_str("\\fI"),
            TokenKind::Plain | TokenKind::String | TokenKind::Preprocessor | TokenKind::Number => {}
        }
    }

    fn token_end(kind: TokenKind, out: &mut String) {
        match kind {
            TokenKind::Keyword
            | TokenKind::KeywordType
            | TokenKind::KeywordFlow
            | TokenKind::Comment => out.push_str("\\fP"),
            TokenKind::Plain | TokenKind::String | TokenKind::Preprocessor | TokenKind::Number => {}
        }
    }
}
