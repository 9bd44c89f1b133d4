//! Source languages of documented entities.

use serde::Deserialize;

/// Source language an entity was parsed from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Unknown,
    Idl,
    Java,
    #[serde(alias = "c#")]
    CSharp,
    D,
    Php,
    #[serde(alias = "objective-c")]
    ObjC,
    #[serde(alias = "c++", alias = "c")]
    Cpp,
    #[serde(alias = "javascript")]
    Js,
    Python,
    Fortran,
    Vhdl,
    Xml,
    Sql,
    Markdown,
    Slice,
    Lex,
}

impl Language {
    /// Language tag exposed to templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Idl => "idl",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::D => "d",
            Self::Php => "php",
            Self::ObjC => "objc",
            Self::Cpp => "cpp",
            Self::Js => "js",
            Self::Python => "python",
            Self::Fortran => "fortran",
            Self::Vhdl => "vhdl",
            Self::Xml => "xml",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
            Self::Slice => "slice",
            Self::Lex => "lex",
        }
    }

    /// Separator between scope components in qualified names.
    #[must_use]
    pub const fn scope_separator(self) -> &'static str {
        match self {
            Self::Java | Self::CSharp | Self::D | Self::Python | Self::Js | Self::Vhdl => ".",
            Self::Php => "\\",
            Self::Unknown
            | Self::Idl
            | Self::ObjC
            | Self::Cpp
            | Self::Fortran
            | Self::Xml
            | Self::Sql
            | Self::Markdown
            | Self::Slice
            | Self::Lex => "::",
        }
    }

    /// Whether members are titled the Objective-C way (instance/class methods).
    #[must_use]
    pub const fn uses_objc_titles(self) -> bool {
        matches!(self, Self::ObjC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags_are_distinct() {
        let all = [
            Language::Unknown,
            Language::Idl,
            Language::Java,
            Language::CSharp,
            Language::D,
            Language::Php,
            Language::ObjC,
            Language::Cpp,
            Language::Js,
            Language::Python,
            Language::Fortran,
            Language::Vhdl,
            Language::Xml,
            Language::Sql,
            Language::Markdown,
            Language::Slice,
            Language::Lex,
        ];
        let mut tags: Vec<_> = all.iter().map(|l| l.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), all.len());
    }

    #[test]
    fn test_deserialize_aliases() {
        let lang: Language = serde_json::from_str("\"c++\"").unwrap();
        assert_eq!(lang, Language::Cpp);
        let lang: Language = serde_json::from_str("\"objective-c\"").unwrap();
        assert_eq!(lang, Language::ObjC);
    }
}
