//! HTML backend.

use std::fmt::Write;

use dg_model::OutputFormat;

use crate::ast::SectionKind;
use crate::backend::DocBackend;
use crate::code::TokenKind;
use crate::escape::{escape_html, push_html};
use crate::link::LinkTarget;

/// HTML render backend.
pub struct HtmlBackend;

impl DocBackend for HtmlBackend {
    const FORMAT: OutputFormat = OutputFormat::Html;

    fn escape(text: &str, out: &mut String) {
        push_html(text, out);
    }

    fn paragraph_start(out: &mut String) {
        out.push_str("<p>");
    }

    fn paragraph_end(out: &mut String) {
        out.push_str("</p>\n");
    }

    fn emphasis_start(out: &mut String) {
        out.push_str("<em>");
    }

    fn emphasis_end(out: &mut String) {
        out.push_str("</em>");
    }

    fn strong_start(out: &mut String) {
        out.push_str("<b>");
    }

    fn strong_end(out: &mut String) {
        out.push_str("</b>");
    }

    fn inline_code(code: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_html(code)).unwrap();
    }

    fn code_block(language: Option<&str>, code: &str, out: &mut String) {
        if let Some(language) = language {
            write!(
                out,
                r#"<pre class="fragment"><code class="language-{}">{}</code></pre>"#,
                escape_html(language),
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(out, r#"<pre class="fragment">{}</pre>"#, escape_html(code)).unwrap();
        }
    }

    fn heading_start(level: u8, out: &mut String) {
        write!(out, "<h{level}>").unwrap();
    }

    fn heading_end(level: u8, out: &mut String) {
        writeln!(out, "</h{level}>").unwrap();
    }

    fn list_start(ordered: bool, out: &mut String) {
        out.push_str(if ordered { "<ol>\n" } else { "<ul>\n" });
    }

    fn list_end(ordered: bool, out: &mut String) {
        out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
    }

    fn item_start(out: &mut String) {
        out.push_str("<li>");
    }

    fn item_end(out: &mut String) {
        out.push_str("</li>\n");
    }

    fn line_break(out: &mut String) {
        out.push_str("<br />\n");
    }

    fn rule(out: &mut String) {
        out.push_str("<hr />\n");
    }

    fn section_start(kind: &SectionKind, out: &mut String) {
        write!(out, r#"<dl class="section {}"><dt>{}"#, kind.tag(), kind.title()).unwrap();
        if let SectionKind::Param(name) = kind {
            write!(out, r#" <code class="paramname">{}</code>"#, escape_html(name)).unwrap();
        }
        out.push_str("</dt><dd>");
    }

    fn section_end(_kind: &SectionKind, out: &mut String) {
        out.push_str("</dd></dl>\n");
    }

    fn internal_link_start(target: &LinkTarget, rel_path: &str, out: &mut String) {
        let class = if target.external.is_some() { "elRef" } else { "el" };
        write!(
            out,
            r#"<a class="{class}" href="{}">"#,
            escape_html(&target.href(OutputFormat::Html.file_extension(), rel_path))
        )
        .unwrap();
    }

    fn internal_link_end(_target: &LinkTarget, out: &mut String) {
        out.push_str("</a>");
    }

    fn external_link_start(url: &str, out: &mut String) {
        write!(out, r#"<a href="{}">"#, escape_html(url)).unwrap();
    }

    fn external_link_end(_url: &str, out: &mut String) {
        out.push_str("</a>");
    }

    fn fragment_start(out: &mut String) {
        out.push_str("<div class=\"fragment\">");
    }

    fn fragment_end(out: &mut String) {
        out.push_str("</div>\n");
    }

    fn code_line_start(number: Option<u32>, out: &mut String) {
        out.push_str(r#"<div class="line">"#);
        if let Some(number) = number {
            write!(
                out,
                r#"<a id="l{number:05}" name="l{number:05}"></a><span class="lineno">{number:5}</span> "#
            )
            .unwrap();
        }
    }

    fn code_line_end(out: &mut String) {
        out.push_str("</div>\n");
    }

    fn token_start(kind: TokenKind, out: &mut String) {
        write!(out, r#"<span class="{}">"#, kind.css_class()).unwrap();
    }

    fn token_end(_kind: TokenKind, out: &mut String) {
        out.push_str("</span>");
    }
}
