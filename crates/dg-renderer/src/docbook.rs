//! `DocBook` XML backend.

use std::fmt::Write;

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::backend::DocBackend;
use crate::code::TokenKind;
use crate::escape::{escape_html, push_html};
use crate::link::LinkTarget;

/// `DocBook` render backend.
pub struct DocbookBackend;

impl DocBackend for DocbookBackend {
    const FORMAT: OutputFormat = OutputFormat::Docbook;

    fn escape(text: &str, out: &mut String) {
        push_html(text, out);
    }

    fn paragraph_start(out: &mut String) {
        out.push_str("<para>");
    }

    fn paragraph_end(out: &mut String) {
        out.push_str("</para>\n");
    }

    fn emphasis_start(out: &mut String) {
        out.push_str("<emphasis>");
    }

    fn emphasis_end(out: &mut String) {
        out.push_str("</emphasis>");
    }

    fn strong_start(out: &mut String) {
        out.push_str(r#"<emphasis role="bold">"#);
    }

    fn strong_end(out: &mut String) {
        out.push_str("</emphasis>");
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "<computeroutput>{}</computeroutput>", escape_html(code)).unwrap();
    }

    fn code_block(language: Option<&str>, code: &str, out: &mut String) {
        match language {
            Some(language) => write!(
                out,
                r#"<programlisting language="{}">{}</programlisting>"#,
                escape_html(language),
                escape_html(code)
            )
            .unwrap(),
            None => write!(out, "<programlisting>{}</programlisting>", escape_html(code)).unwrap(),
        }
        out.push('\n');
    }

    fn heading_start(_level: u8, out: &mut String) {
        out.push_str("<bridgehead>");
    }

    fn heading_end(_level: u8, out: &mut String) {
        out.push_str("</bridgehead>\n");
    }

    fn list_start(ordered: bool, out: &mut String) {
        out.push_str(if ordered {
            "<orderedlist>\n"
        } else {
            "<itemizedlist>\n"
        });
    }

    fn list_end(ordered: bool, out: &mut String) {
        out.push_str(if ordered {
            "</orderedlist>\n"
        } else {
            "</itemizedlist>\n"
        });
    }

    fn item_start(out: &mut String) {
        out.push_str("<listitem><para>");
    }

    fn item_end(out: &mut String) {
        out.push_str("</para></listitem>\n");
    }

    fn line_break(out: &mut String) {
        out.push_str("<literallayout>&#160;&#xa;</literallayout>\n");
    }

    fn rule(out: &mut String) {
        out.push_str("<para role=\"hr\"/>\n");
    }

    fn section_start(kind: &SectionKind, out: &mut String) {
        write!(out, r#"<formalpara role="{}"><title>{}"#, kind.tag(), kind.title()).unwrap();
        if let SectionKind::Param(name) = kind {
            write!(out, " <parameter>{}</parameter>", escape_html(name)).unwrap();
        }
        out.push_str("</title>");
    }

    fn section_end(_kind: &SectionKind, out: &mut String) {
        out.push_str("</formalpara>\n");
    }

    fn internal_link_start(target: &LinkTarget, rel_path: &str, out: &mut String) {
        if target.external.is_some() {
            write!(
                out,
                r#"<link xlink:href="{}">"#,
                escape_html(&target.href(".html", rel_path))
            )
            .unwrap();
        } else {
            write!(out, r#"<link linkend="{}">"#, escape_html(&target.label())).unwrap();
        }
    }

    fn internal_link_end(_target: &LinkTarget, out: &mut String) {
        out.push_str("</link>");
    }

    fn external_link_start(url: &str, out: &mut String) {
        write!(out, r#"<link xlink:href="{}">"#, escape_html(url)).unwrap();
    }

    fn external_link_end(_url: &str, out: &mut String) {
        out.push_str("</link>");
    }

    fn fragment_start(out: &mut String) {
        out.push_str("<programlisting>");
    }

    fn fragment_end(out: &mut String) {
        out.push_str("</programlisting>\n");
    }

    fn code_line_start(number: Option<u32>, out: &mut String) {
        if let Some(number) = number {
            write!(out, "{number:5} ").unwrap();
        }
    }

    fn code_line_end(out: &mut String) {
        out.push('\n');
    }

    fn token_start(kind: TokenKind, out: &mut String) {
        let role = match kind {
            TokenKind::Comment => "comment",
            TokenKind::String => "stringliteral",
            TokenKind::Preprocessor => "preprocessor",
            TokenKind::Plain
            | TokenKind::Keyword
            | TokenKind::KeywordType
            | TokenKind::KeywordFlow
            | TokenKind::Number => "keyword",
        };
        write!(out, r#"<emphasis role="{role}">"#).unwrap();
    }

    fn token_end(_kind: TokenKind, out: &mut String) {
        out.push_str("</emphasis>");
    }
}
