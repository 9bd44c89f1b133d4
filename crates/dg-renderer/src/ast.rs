//! Documentation comment AST.

/// Kind of a simple section introduced by a command such as `\note`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Note,
    Warning,
    Return,
    See,
    Since,
    Deprecated,
    Param(String),
}

impl SectionKind {
    /// Parse a section command name (without the leading `\` or `@`).
    ///
    /// `param` takes its parameter name from `argument`.
    #[must_use]
    pub fn from_command(command: &str, argument: &str) -> Option<Self> {
        let kind = match command {
            "note" | "remark" | "remarks" => Self::Note,
            "warning" | "attention" => Self::Warning,
            "return" | "returns" | "result" => Self::Return,
            "see" | "sa" => Self::See,
            "since" => Self::Since,
            "deprecated" => Self::Deprecated,
            "param" => Self::Param(argument.to_owned()),
            _ => return None,
        };
        Some(kind)
    }

    /// Heading shown above the section.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Warning => "Warning",
            Self::Return => "Returns",
            Self::See => "See also",
            Self::Since => "Since",
            Self::Deprecated => "Deprecated",
            Self::Param(_) => "Parameters",
        }
    }

    /// Short tag used in class names and roles.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Return => "return",
            Self::See => "see",
            Self::Since => "since",
            Self::Deprecated => "deprecated",
            Self::Param(_) => "params",
        }
    }
}

/// A node of a parsed documentation comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocNode {
    Text(String),
    Code(String),
    Emphasis(Vec<DocNode>),
    Strong(Vec<DocNode>),
    /// Link to an external URL.
    Link {
        url: String,
        children: Vec<DocNode>,
    },
    /// Reference to a documented entity by name.
    Ref {
        target: String,
        children: Vec<DocNode>,
    },
    Paragraph(Vec<DocNode>),
    Heading {
        level: u8,
        children: Vec<DocNode>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    List {
        ordered: bool,
        items: Vec<Vec<DocNode>>,
    },
    Section {
        kind: SectionKind,
        children: Vec<DocNode>,
    },
    LineBreak,
    Rule,
}

/// Root of a parsed documentation comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocRoot {
    pub children: Vec<DocNode>,
    /// Parsed as a brief description (inline, no paragraph wrapper).
    pub is_brief: bool,
}

impl DocRoot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
