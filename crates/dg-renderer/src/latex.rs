//! `LaTeX` backend.

use std::fmt::Write;

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::backend::DocBackend;
use crate::code::TokenKind;
use crate::escape::push_latex;
use crate::link::LinkTarget;

/// `LaTeX` render backend.
pub struct LatexBackend;

fn heading_command(level: u8) -> &'static str {
    match level {
        1 => "section",
        2 => "subsection",
        3 => "subsubsection",
        4 => "paragraph",
        _ => "subparagraph",
    }
}

impl DocBackend for LatexBackend {
    const FORMAT: OutputFormat = OutputFormat::Latex;

    fn escape(text: &str, out: &mut String) {
        push_latex(text, out);
    }

    fn paragraph_start(_out: &mut String) {}

    fn paragraph_end(out: &mut String) {
        out.push_str("\n\n");
    }

    fn emphasis_start(out: &mut String) {
        out.push_str("{\\em ");
    }

    fn emphasis_end(out: &mut String) {
        out.push('}');
    }

    fn strong_start(out: &mut String) {
        out.push_str("{\\bfseries ");
    }

    fn strong_end(out: &mut String) {
        out.push('}');
    }

    fn inline_code(code: &str, out: &mut String) {
        out.push_str("{\\ttfamily ");
        push_latex(code, out);
        out.push('}');
    }

    fn code_block(_language: Option<&str>, code: &str, out: &mut String) {
        out.push_str("\\begin{DoxyVerb}");
        out.push_str(code);
        if !code.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("\\end{DoxyVerb}\n");
    }

    fn heading_start(level: u8, out: &mut String) {
        write!(out, "\\{}*{{", heading_command(level)).unwrap();
    }

    fn heading_end(_level: u8, out: &mut String) {
        out.push_str("}\n");
    }

    fn list_start(ordered: bool, out: &mut String) {
        out.push_str(if ordered {
            "\\begin{DoxyEnumerate}\n"
        } else {
            "\\begin{DoxyItemize}\n"
        });
    }

    fn list_end(ordered: bool, out: &mut String) {
        out.push_str(if ordered {
            "\\end{DoxyEnumerate}\n"
        } else {
            "\\end{DoxyItemize}\n"
        });
    }

    fn item_start(out: &mut String) {
        out.push_str("\\item ");
    }

    fn item_end(out: &mut String) {
        out.push('\n');
    }

    fn line_break(out: &mut String) {
        out.push_str("\\newline\n");
    }

    fn rule(out: &mut String) {
        out.push_str("\\DoxyHorRuler{0}\n");
    }

    fn section_start(kind: &SectionKind, out: &mut String) {
        write!(out, "\\begin{{DoxyParagraph}}{{{}", kind.title()).unwrap();
        if let SectionKind::Param(name) = kind {
            out.push_str(" {\\em ");
            push_latex(name, out);
            out.push('}');
        }
        out.push_str("}\n");
    }

    fn section_end(_kind: &SectionKind, out: &mut String) {
        out.push_str("\\end{DoxyParagraph}\n");
    }

    fn internal_link_start(target: &LinkTarget, _rel_path: &str, out: &mut String) {
        if target.external.is_none() {
            write!(out, "\\hyperlink{{{}}}{{", target.label()).unwrap();
        }
    }

    fn internal_link_end(target: &LinkTarget, out: &mut String) {
        if target.external.is_none() {
            out.push('}');
        }
    }

    fn external_link_start(url: &str, out: &mut String) {
        write!(out, "\\href{{{url}}}{{").unwrap();
    }

    fn external_link_end(_url: &str, out: &mut String) {
        out.push('}');
    }

    fn fragment_start(out: &mut String) {
        out.push_str("\\begin{DoxyCode}{0}\n");
    }

    fn fragment_end(out: &mut String) {
        out.push_str("\\end{DoxyCode}\n");
    }

    fn code_line_start(number: Option<u32>, out: &mut String) {
        if let Some(number) = number {
            write!(out, "\\DoxyCodeLine{{{number}}}{{").unwrap();
        } else {
            out.push_str("\\DoxyCodeLine{}{");
        }
    }

    fn code_line_end(out: &mut String) {
        out.push_str("}\n");
    }

    fn token_start(kind: TokenKind, out: &mut String) {
        write!(out, "\\textcolor{{{}}}{{", kind.css_class()).unwrap();
    }

    fn token_end(_kind: TokenKind, out: &mut String) {
        out.push('}');
    }
}
