//! Source code highlighting.
//!
//! A [`CodeParser`] turns source text into lines of classified tokens.
//! Parsers keep scanner state between calls (an unterminated block comment
//! continues into the next fragment) until [`CodeParser::reset`] is called.

use dg_model::Language;

use crate::link::{LinkResolver, LinkTarget};

/// Classification of a highlighted token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plain,
    Keyword,
    KeywordType,
    KeywordFlow,
    Comment,
    String,
    Preprocessor,
    Number,
}

impl TokenKind {
    /// CSS class name for HTML output.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Keyword => "keyword",
            Self::KeywordType => "keywordtype",
            Self::KeywordFlow => "keywordflow",
            Self::Comment => "comment",
            Self::String => "stringliteral",
            Self::Preprocessor => "preprocessor",
            Self::Number => "number",
        }
    }
}

/// A highlighted token, optionally linked to a documented entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeToken {
    pub kind: TokenKind,
    pub text: String,
    pub link: Option<LinkTarget>,
}

impl CodeToken {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            link: None,
        }
    }
}

/// One source line with its 1-based number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLine {
    pub number: u32,
    pub tokens: Vec<CodeToken>,
}

/// Options for a single highlighting call.
#[derive(Clone, Debug, Default)]
pub struct CodeOptions {
    pub show_line_numbers: bool,
    /// Path from the current page to the output root.
    pub rel_path: String,
    /// First line to emit (1-based, inclusive).
    pub start_line: Option<u32>,
    /// Last line to emit (1-based, inclusive).
    pub end_line: Option<u32>,
    /// Scope used to qualify identifiers before resolving them.
    pub scope_name: Option<String>,
}

impl CodeOptions {
    fn includes(&self, line: u32) -> bool {
        self.start_line.is_none_or(|start| line >= start)
            && self.end_line.is_none_or(|end| line <= end)
    }
}

/// Parser producing highlighted source lines.
pub trait CodeParser: Send {
    /// Forget state carried over from previous fragments.
    fn reset(&mut self);

    /// Highlight `code`, linking identifiers through `resolver`.
    fn highlight(
        &mut self,
        code: &str,
        options: &CodeOptions,
        resolver: &dyn LinkResolver,
    ) -> Vec<CodeLine>;
}

struct Keywords {
    keywords: &'static [&'static str],
    types: &'static [&'static str],
    flow: &'static [&'static str],
    line_comment: &'static str,
    block_comments: bool,
    preprocessor: bool,
}

static C_FAMILY: Keywords = Keywords {
    keywords: &[
        "class", "struct", "union", "enum", "namespace", "template", "typename",
        "public", "protected", "private", "virtual", "static", "const", "constexpr",
        "inline", "extern", "friend", "operator", "typedef", "using", "new", "delete",
        "this", "true", "false", "nullptr", "explicit", "override", "final", "mutable",
        "volatile", "sizeof", "concept", "requires", "interface", "package", "import",
        "extends", "implements", "abstract", "synchronized", "null",
    ],
    types: &[
        "void", "bool", "char", "short", "int", "long", "float", "double", "signed",
        "unsigned", "auto", "wchar_t", "size_t", "boolean", "byte", "string", "var",
    ],
    flow: &[
        "if", "else", "for", "while", "do", "switch", "case", "default", "break",
        "continue", "return", "goto", "try", "catch", "throw", "throws", "finally",
    ],
    line_comment: "//",
    block_comments: true,
    preprocessor: true,
};

static PYTHON: Keywords = Keywords {
    keywords: &[
        "def", "class", "lambda", "import", "from", "as", "global", "nonlocal", "pass",
        "None", "True", "False", "and", "or", "not", "in", "is", "with", "async",
        "await", "self",
    ],
    types: &["int", "float", "str", "bool", "list", "dict", "tuple", "set", "bytes"],
    flow: &[
        "if", "elif", "else", "for", "while", "break", "continue", "return", "try",
        "except", "finally", "raise", "yield",
    ],
    line_comment: "#",
    block_comments: false,
    preprocessor: false,
};

static FORTRAN: Keywords = Keywords {
    keywords: &[
        "program", "module", "subroutine", "function", "end", "use", "implicit", "none",
        "contains", "interface", "intent", "in", "out", "inout", "parameter", "call",
        "type", "public", "private",
    ],
    types: &["integer", "real", "complex", "logical", "character", "double", "precision"],
    flow: &["if", "then", "else", "do", "while", "select", "case", "return", "exit", "cycle", "stop"],
    line_comment: "!",
    block_comments: false,
    preprocessor: false,
};

static VHDL: Keywords = Keywords {
    keywords: &[
        "entity", "architecture", "is", "of", "begin", "end", "port", "generic", "map",
        "signal", "variable", "constant", "component", "library", "use", "all",
        "process", "in", "out", "inout", "package", "body", "function", "procedure",
    ],
    types: &["std_logic", "std_logic_vector", "integer", "boolean", "natural", "bit"],
    flow: &["if", "then", "elsif", "else", "case", "when", "for", "loop", "while", "return", "wait"],
    line_comment: "--",
    block_comments: false,
    preprocessor: false,
};

static SQL: Keywords = Keywords {
    keywords: &[
        "select", "from", "where", "insert", "into", "update", "delete", "create",
        "table", "view", "index", "join", "on", "and", "or", "not", "null", "as",
    ],
    types: &["integer", "varchar", "text", "boolean", "date", "timestamp"],
    flow: &["case", "when", "then", "else", "end", "return"],
    line_comment: "--",
    block_comments: true,
    preprocessor: false,
};

fn keywords_for(language: Language) -> &'static Keywords {
    match language {
        Language::Python => &PYTHON,
        Language::Fortran => &FORTRAN,
        Language::Vhdl => &VHDL,
        Language::Sql => &SQL,
        Language::Unknown
        | Language::Idl
        | Language::Java
        | Language::CSharp
        | Language::D
        | Language::Php
        | Language::ObjC
        | Language::Cpp
        | Language::Js
        | Language::Xml
        | Language::Markdown
        | Language::Slice
        | Language::Lex => &C_FAMILY,
    }
}

/// Keyword-table driven scanner shared by all languages.
#[derive(Debug)]
pub struct KeywordCodeParser {
    language: Language,
    in_block_comment: bool,
}

impl KeywordCodeParser {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            in_block_comment: false,
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether the scanner is inside a block comment left open by earlier input.
    #[must_use]
    pub fn in_block_comment(&self) -> bool {
        self.in_block_comment
    }

    fn scan_line(
        &mut self,
        line: &str,
        options: &CodeOptions,
        resolver: &dyn LinkResolver,
    ) -> Vec<CodeToken> {
        let keywords = keywords_for(self.language);
        let case_insensitive = matches!(self.language, Language::Fortran | Language::Vhdl | Language::Sql);
        let mut tokens = LineTokens::default();
        let mut rest = line;

        if keywords.preprocessor && !self.in_block_comment && line.trim_start().starts_with('#') {
            tokens.push(CodeToken::new(TokenKind::Preprocessor, line));
            return tokens.finish();
        }

        while !rest.is_empty() {
            if self.in_block_comment {
                if let Some(end) = rest.find("*/") {
                    tokens.push(CodeToken::new(TokenKind::Comment, &rest[..end + 2]));
                    rest = &rest[end + 2..];
                    self.in_block_comment = false;
                } else {
                    tokens.push(CodeToken::new(TokenKind::Comment, rest));
                    rest = "";
                }
                continue;
            }
            if rest.starts_with(keywords.line_comment) {
                tokens.push(CodeToken::new(TokenKind::Comment, rest));
                break;
            }
            if keywords.block_comments && rest.starts_with("/*") {
                self.in_block_comment = true;
                tokens.push(CodeToken::new(TokenKind::Comment, "/*"));
                rest = &rest[2..];
                continue;
            }

            let Some(first) = rest.chars().next() else {
                break;
            };
            if first == '"' || first == '\'' {
                let len = string_literal_len(rest, first);
                tokens.push(CodeToken::new(TokenKind::String, &rest[..len]));
                rest = &rest[len..];
            } else if first.is_ascii_digit() {
                let len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
                    .unwrap_or(rest.len());
                tokens.push(CodeToken::new(TokenKind::Number, &rest[..len]));
                rest = &rest[len..];
            } else if first.is_alphabetic() || first == '_' {
                let len = rest
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                let word = &rest[..len];
                tokens.push(classify_word(word, keywords, case_insensitive, options, resolver));
                rest = &rest[len..];
            } else {
                let len = first.len_utf8();
                tokens.push_plain(&rest[..len]);
                rest = &rest[len..];
            }
        }
        tokens.finish()
    }
}

impl CodeParser for KeywordCodeParser {
    fn reset(&mut self) {
        self.in_block_comment = false;
    }

    fn highlight(
        &mut self,
        code: &str,
        options: &CodeOptions,
        resolver: &dyn LinkResolver,
    ) -> Vec<CodeLine> {
        let mut lines = Vec::new();
        for (number, line) in (1_u32..).zip(code.lines()) {
            // Lines outside the range still advance the scanner state.
            let tokens = self.scan_line(line, options, resolver);
            if options.includes(number) {
                lines.push(CodeLine { number, tokens });
            }
        }
        lines
    }
}

/// Collects tokens, merging adjacent plain text.
#[derive(Default)]
struct LineTokens(Vec<CodeToken>);

impl LineTokens {
    fn push(&mut self, token: CodeToken) {
        if token.kind == TokenKind::Plain && token.link.is_none() {
            self.push_plain(&token.text);
        } else {
            self.0.push(token);
        }
    }

    fn push_plain(&mut self, text: &str) {
        match self.0.last_mut() {
            Some(last) if last.kind == TokenKind::Plain && last.link.is_none() => {
                last.text.push_str(text);
            }
            _ => self.0.push(CodeToken::new(TokenKind::Plain, text)),
        }
    }

    fn finish(self) -> Vec<CodeToken> {
        self.0
    }
}

/// Byte length of the string literal at the start of `s`, including quotes.
fn string_literal_len(s: &str, quote: char) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    s.len()
}

fn classify_word(
    word: &str,
    keywords: &Keywords,
    case_insensitive: bool,
    options: &CodeOptions,
    resolver: &dyn LinkResolver,
) -> CodeToken {
    let lookup = if case_insensitive {
        word.to_ascii_lowercase()
    } else {
        word.to_owned()
    };
    let lookup = lookup.as_str();
    if keywords.flow.contains(&lookup) {
        return CodeToken::new(TokenKind::KeywordFlow, word);
    }
    if keywords.types.contains(&lookup) {
        return CodeToken::new(TokenKind::KeywordType, word);
    }
    if keywords.keywords.contains(&lookup) {
        return CodeToken::new(TokenKind::Keyword, word);
    }

    let scoped = options
        .scope_name
        .as_deref()
        .and_then(|scope| resolver.resolve(&format!("{scope}::{word}")));
    CodeToken {
        kind: TokenKind::Plain,
        text: word.to_owned(),
        link: scoped.or_else(|| resolver.resolve(word)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::NoLinks;

    struct OneLink;

    impl LinkResolver for OneLink {
        fn resolve(&self, name: &str) -> Option<LinkTarget> {
            (name == "Widget").then(|| LinkTarget::new("classWidget", ""))
        }
    }

    fn kinds(line: &CodeLine) -> Vec<(TokenKind, &str)> {
        line.tokens.iter().map(|t| (t.kind, t.text.as_str())).collect()
    }

    #[test]
    fn test_keywords_and_strings() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        let lines = parser.highlight(
            r#"return "a\"b"; // done"#,
            &CodeOptions::default(),
            &NoLinks,
        );
        assert_eq!(
            kinds(&lines[0]),
            vec![
                (TokenKind::KeywordFlow, "return"),
                (TokenKind::Plain, " "),
                (TokenKind::String, r#""a\"b""#),
                (TokenKind::Plain, "; "),
                (TokenKind::Comment, "// done"),
            ]
        );
    }

    #[test]
    fn test_preprocessor_line() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        let lines = parser.highlight("#include <x.h>\nint y;", &CodeOptions::default(), &NoLinks);
        assert_eq!(kinds(&lines[0]), vec![(TokenKind::Preprocessor, "#include <x.h>")]);
        assert_eq!(lines[1].number, 2);
        assert_eq!(lines[1].tokens[0].kind, TokenKind::KeywordType);
    }

    #[test]
    fn test_block_comment_state_survives_until_reset() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        parser.highlight("/* open", &CodeOptions::default(), &NoLinks);
        assert!(parser.in_block_comment());

        let lines = parser.highlight("still */ int", &CodeOptions::default(), &NoLinks);
        assert_eq!(lines[0].tokens[0].kind, TokenKind::Comment);
        assert_eq!(lines[0].tokens[0].text, "still */");

        parser.highlight("/* again", &CodeOptions::default(), &NoLinks);
        parser.reset();
        assert!(!parser.in_block_comment());
        let lines = parser.highlight("int x;", &CodeOptions::default(), &NoLinks);
        assert_eq!(lines[0].tokens[0].kind, TokenKind::KeywordType);
    }

    #[test]
    fn test_line_range() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        let options = CodeOptions {
            start_line: Some(2),
            end_line: Some(3),
            ..CodeOptions::default()
        };
        let lines = parser.highlight("a\nb\nc\nd", &options, &NoLinks);
        let numbers: Vec<u32> = lines.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn test_identifiers_are_linked() {
        let mut parser = KeywordCodeParser::new(Language::Cpp);
        let lines = parser.highlight("Widget w;", &CodeOptions::default(), &OneLink);
        assert_eq!(lines[0].tokens[0].link, Some(LinkTarget::new("classWidget", "")));
        assert_eq!(lines[0].tokens[1].link, None);
    }

    #[test]
    fn test_python_comments() {
        let mut parser = KeywordCodeParser::new(Language::Python);
        let lines = parser.highlight("def f(): # note", &CodeOptions::default(), &NoLinks);
        assert_eq!(lines[0].tokens[0].kind, TokenKind::Keyword);
        assert_eq!(lines[0].tokens.last().map(|t| t.kind), Some(TokenKind::Comment));
    }
}
