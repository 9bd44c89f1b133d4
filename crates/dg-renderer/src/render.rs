//! Format dispatch.

use dg_model::OutputFormat;

use crate::code::{CodeOptions, CodeParser};
use crate::docbook::DocbookBackend;
use crate::html::HtmlBackend;
use crate::latex::LatexBackend;
use crate::link::LinkResolver;
use crate::man::ManBackend;
use crate::parser::DocParser;
use crate::rtf::RtfBackend;
use crate::visitor::{DocVisitor, write_code};

/// Parse a documentation comment and render it for `format`.
///
/// Blank input renders to an empty string.
#[must_use]
pub fn render_doc(
    parser: &DocParser,
    format: OutputFormat,
    text: &str,
    is_brief: bool,
    rel_path: &str,
    resolver: &dyn LinkResolver,
) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let root = parser.parse(text, is_brief);
    match format {
        OutputFormat::Html => DocVisitor::<HtmlBackend>::new(resolver, rel_path).render(&root),
        OutputFormat::Latex => DocVisitor::<LatexBackend>::new(resolver, rel_path).render(&root),
        OutputFormat::Rtf => DocVisitor::<RtfBackend>::new(resolver, rel_path).render(&root),
        OutputFormat::Man => DocVisitor::<ManBackend>::new(resolver, rel_path).render(&root),
        OutputFormat::Docbook => {
            DocVisitor::<DocbookBackend>::new(resolver, rel_path).render(&root)
        }
    }
}

/// Highlight a source fragment and render it for `format`.
///
/// The parser is reset first so no state leaks in from an earlier fragment.
pub fn render_code(
    parser: &mut dyn CodeParser,
    format: OutputFormat,
    code: &str,
    options: &CodeOptions,
    resolver: &dyn LinkResolver,
) -> String {
    parser.reset();
    let lines = parser.highlight(code, options, resolver);
    let numbers = options.show_line_numbers;
    let rel_path = options.rel_path.as_str();
    match format {
        OutputFormat::Html => write_code::<HtmlBackend>(&lines, numbers, rel_path),
        OutputFormat::Latex => write_code::<LatexBackend>(&lines, numbers, rel_path),
        OutputFormat::Rtf => write_code::<RtfBackend>(&lines, numbers, rel_path),
        OutputFormat::Man => write_code::<ManBackend>(&lines, numbers, rel_path),
        OutputFormat::Docbook => write_code::<DocbookBackend>(&lines, numbers, rel_path),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::code::KeywordCodeParser;
    use crate::link::NoLinks;
    use dg_model::Language;

    #[test]
    fn test_render_doc_blank_is_empty() {
        for format in OutputFormat::ALL {
            assert_eq!(render_doc(&DocParser::new(), format, "  ", false, "", &NoLinks), "");
        }
    }

    #[test]
    fn test_render_doc_formats_differ() {
        let parser = DocParser::new();
        let html = render_doc(&parser, OutputFormat::Html, "**x**", true, "", &NoLinks);
        let latex = render_doc(&parser, OutputFormat::Latex, "**x**", true, "", &NoLinks);
        let docbook = render_doc(&parser, OutputFormat::Docbook, "**x**", true, "", &NoLinks);
        assert_eq!(html, "<b>x</b>");
        assert_eq!(latex, "{\\bfseries x}");
        assert_eq!(docbook, r#"<emphasis role="bold">x</emphasis>"#);
    }

    #[test]
    fn test_render_code_resets_parser() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        let options = CodeOptions::default();
        render_code(&mut parser, OutputFormat::Man, "/* open", &options, &NoLinks);
        let man = render_code(&mut parser, OutputFormat::Man, "int x;", &options, &NoLinks);
        assert_eq!(man, ".PP\n.nf\n\\fBint\\fP x;\n.fi\n");
    }
}
