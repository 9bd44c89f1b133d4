//! Text escaping for each output format.

use std::fmt::Write;

use dg_model::OutputFormat;

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    push_html(s, &mut result);
    result
}

pub(crate) fn push_html(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn push_latex(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '%' => out.push_str("\\%"),
            '_' => out.push_str("\\_"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '<' => out.push_str("\\texorpdfstring{$<$}{<}"),
            '>' => out.push_str("\\texorpdfstring{$>$}{>}"),
            _ => out.push(c),
        }
    }
}

pub(crate) fn push_rtf(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut buf = [0_u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    // RTF \u takes a signed 16-bit value
                    let value = i16::from_ne_bytes(unit.to_ne_bytes());
                    write!(out, "\\u{value}?").unwrap();
                }
            }
        }
    }
}

pub(crate) fn push_man(s: &str, out: &mut String) {
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '-' => out.push_str("\\-"),
            '.' | '\'' if i == 0 => {
                out.push_str("\\&");
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Escape text for the given output format.
#[must_use]
pub fn escape(format: OutputFormat, s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    match format {
        OutputFormat::Html | OutputFormat::Docbook => push_html(s, &mut out),
        OutputFormat::Latex => push_latex(s, &mut out),
        OutputFormat::Rtf => push_rtf(s, &mut out),
        OutputFormat::Man => push_man(s, &mut out),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b> & \"c\""), "a&lt;b&gt; &amp; &quot;c&quot;");
    }

    #[test]
    fn test_escape_latex_specials() {
        assert_eq!(escape(OutputFormat::Latex, "a_b#c"), "a\\_b\\#c");
    }

    #[test]
    fn test_escape_rtf_non_ascii() {
        assert_eq!(escape(OutputFormat::Rtf, "{é}"), "\\{\\u233?\\}");
    }

    #[test]
    fn test_escape_man_leading_dot() {
        assert_eq!(escape(OutputFormat::Man, ".TH a-b"), "\\&.TH a\\-b");
    }
}
