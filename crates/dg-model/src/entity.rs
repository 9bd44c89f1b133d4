//! Entity identity and common definition data.

use serde::{Deserialize, Serialize};

use crate::cache::RenderCache;
use crate::data::{
    ClassData, ConceptData, DirData, FileData, MemberData, ModuleData, NamespaceData, PageData,
};
use crate::language::Language;

/// Stable index of an entity inside an [`EntityModel`](crate::EntityModel).
///
/// Ids are assigned in insertion order by [`ModelBuilder`](crate::ModelBuilder)
/// and stay valid for the lifetime of the model.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an id from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Arena index of this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of documented entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Class,
    Namespace,
    File,
    Dir,
    Page,
    Member,
    Concept,
    Module,
}

impl EntityKind {
    /// All entity kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Class,
        Self::Namespace,
        Self::File,
        Self::Dir,
        Self::Page,
        Self::Member,
        Self::Concept,
        Self::Module,
    ];

    /// Lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Namespace => "namespace",
            Self::File => "file",
            Self::Dir => "dir",
            Self::Page => "page",
            Self::Member => "member",
            Self::Concept => "concept",
            Self::Module => "module",
        }
    }
}

/// Raw documentation text together with the location it was found at.
///
/// Deserializes from either a plain string or `{ "text", "file", "line" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawDocText")]
pub struct DocText {
    /// Raw markup as written in the source comment.
    pub text: String,
    /// File the comment was read from.
    pub file: String,
    /// Line of the comment in `file`.
    pub line: u32,
}

impl DocText {
    /// Documentation without location information.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Whether the text contains anything besides whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocText {
    Text(String),
    Located {
        text: String,
        #[serde(default)]
        file: String,
        #[serde(default)]
        line: u32,
    },
}

impl From<RawDocText> for DocText {
    fn from(raw: RawDocText) -> Self {
        match raw {
            RawDocText::Text(text) => Self::new(text),
            RawDocText::Located { text, file, line } => Self { text, file, line },
        }
    }
}

/// Location of the body of a definition in a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct BodyLocation {
    /// File entity containing the body.
    pub file: EntityId,
    /// First line of the body (1-based).
    pub start_line: u32,
    /// Last line of the body (inclusive).
    pub end_line: u32,
}

/// Linkability and visibility flags computed by the upstream model.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntityFlags {
    /// Entity has enough documentation to get its own output.
    pub documented: bool,
    /// Entity is hidden from output (e.g. excluded by configuration).
    pub hidden: bool,
    /// Entity has no name of its own (anonymous struct, namespace, ...).
    pub anonymous: bool,
    /// Entity was synthesized by the parser rather than written by the user.
    pub artificial: bool,
}

impl Default for EntityFlags {
    fn default() -> Self {
        Self {
            documented: true,
            hidden: false,
            anonymous: false,
            artificial: false,
        }
    }
}

/// Kind-specific payload of an entity.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityData {
    Class(ClassData),
    Namespace(NamespaceData),
    File(FileData),
    Dir(DirData),
    Page(PageData),
    Member(MemberData),
    Concept(ConceptData),
    Module(ModuleData),
}

impl EntityData {
    /// Kind of entity this payload belongs to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Class(_) => EntityKind::Class,
            Self::Namespace(_) => EntityKind::Namespace,
            Self::File(_) => EntityKind::File,
            Self::Dir(_) => EntityKind::Dir,
            Self::Page(_) => EntityKind::Page,
            Self::Member(_) => EntityKind::Member,
            Self::Concept(_) => EntityKind::Concept,
            Self::Module(_) => EntityKind::Module,
        }
    }
}

/// A documented source construct.
///
/// Entities are read-only once the model is built, apart from the
/// [`RenderCache`] slot, which the bindings populate lazily and clear at the
/// end of a run.
#[derive(Debug, Deserialize)]
pub struct Entity {
    #[serde(skip)]
    pub(crate) id: EntityId,
    /// Fully qualified name, scopes separated by `::`.
    pub name: String,
    /// Unqualified name. Derived from `name` when left empty.
    #[serde(default)]
    pub local_name: String,
    /// Enclosing scope (class, namespace, parent directory, ...).
    #[serde(default)]
    pub outer: Option<EntityId>,
    /// Brief description.
    #[serde(default)]
    pub brief: DocText,
    /// Detailed description.
    #[serde(default)]
    pub details: DocText,
    /// Documentation found inside the body of the definition.
    #[serde(default)]
    pub inbody: DocText,
    /// Location of the definition's body, if known.
    #[serde(default)]
    pub body: Option<BodyLocation>,
    /// Source language.
    #[serde(default)]
    pub language: Language,
    /// Output file base name (without extension).
    #[serde(default)]
    pub output_file: String,
    /// Anchor within the output file (members only, usually).
    #[serde(default)]
    pub anchor: String,
    /// Linkability flags.
    #[serde(default)]
    pub flags: EntityFlags,
    /// Modules (groups) this entity is part of.
    #[serde(default)]
    pub groups: Vec<EntityId>,
    /// URL of the external project this entity was imported from.
    #[serde(default)]
    pub external: Option<String>,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub data: EntityData,
    #[serde(skip)]
    pub(crate) cache: RenderCache,
}

impl Entity {
    /// Create an entity with default common data.
    #[must_use]
    pub fn new(name: impl Into<String>, data: EntityData) -> Self {
        Self {
            id: EntityId::default(),
            name: name.into(),
            local_name: String::new(),
            outer: None,
            brief: DocText::default(),
            details: DocText::default(),
            inbody: DocText::default(),
            body: None,
            language: Language::default(),
            output_file: String::new(),
            anchor: String::new(),
            flags: EntityFlags::default(),
            groups: Vec::new(),
            external: None,
            data,
            cache: RenderCache::default(),
        }
    }

    /// Set the enclosing scope.
    #[must_use]
    pub fn with_outer(mut self, outer: EntityId) -> Self {
        self.outer = Some(outer);
        self
    }

    /// Set the brief description.
    #[must_use]
    pub fn with_brief(mut self, text: impl Into<String>) -> Self {
        self.brief = DocText::new(text);
        self
    }

    /// Set the detailed description.
    #[must_use]
    pub fn with_details(mut self, text: impl Into<String>) -> Self {
        self.details = DocText::new(text);
        self
    }

    /// Set the output file base name.
    #[must_use]
    pub fn with_output_file(mut self, file: impl Into<String>) -> Self {
        self.output_file = file.into();
        self
    }

    /// Set the in-page anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Set the source language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Set the body location.
    #[must_use]
    pub fn with_body(mut self, file: EntityId, start_line: u32, end_line: u32) -> Self {
        self.body = Some(BodyLocation {
            file,
            start_line,
            end_line,
        });
        self
    }

    /// Mark the entity as imported from an external project.
    #[must_use]
    pub fn with_external(mut self, url: impl Into<String>) -> Self {
        self.external = Some(url.into());
        self
    }

    /// Replace the linkability flags.
    #[must_use]
    pub fn with_flags(mut self, flags: EntityFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Id of this entity inside its model.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of this entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    /// Render-cache slot owned by this entity.
    #[must_use]
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    /// Name for display, qualified or bare.
    ///
    /// Qualified names use the language-specific scope separator. Anonymous
    /// scope components (starting with `@`) are shown as `(anonymous)`.
    #[must_use]
    pub fn display_name(&self, include_scope: bool) -> String {
        let raw = if include_scope {
            &self.name
        } else {
            &self.local_name
        };
        let separator = self.language.scope_separator();
        raw.split("::")
            .map(|part| if part.starts_with('@') { "(anonymous)" } else { part })
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Whether the entity was imported from an external project.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.external.is_some()
    }

    /// Whether the entity gets its own output in this project.
    #[must_use]
    pub fn is_linkable_in_project(&self) -> bool {
        self.flags.documented
            && !self.flags.hidden
            && !self.flags.anonymous
            && !self.flags.artificial
            && !self.is_reference()
    }

    /// Whether the entity can be linked to, in this or an external project.
    #[must_use]
    pub fn is_linkable(&self) -> bool {
        self.is_linkable_in_project() || (self.is_reference() && !self.flags.hidden)
    }

    /// Whether any of the brief or detailed documentation is present.
    #[must_use]
    pub fn has_documentation(&self) -> bool {
        !self.brief.is_empty() || !self.details.is_empty()
    }

    /// Class payload, if this is a class.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            EntityData::Class(data) => Some(data),
            _ => None,
        }
    }

    /// Namespace payload, if this is a namespace.
    #[must_use]
    pub fn as_namespace(&self) -> Option<&NamespaceData> {
        match &self.data {
            EntityData::Namespace(data) => Some(data),
            _ => None,
        }
    }

    /// File payload, if this is a file.
    #[must_use]
    pub fn as_file(&self) -> Option<&FileData> {
        match &self.data {
            EntityData::File(data) => Some(data),
            _ => None,
        }
    }

    /// Next entity up the breadcrumb chain: the outer scope, or for a file
    /// without one, its directory.
    #[must_use]
    pub fn parent_scope(&self) -> Option<EntityId> {
        self.outer.or_else(|| self.as_file().and_then(|file| file.dir))
    }

    /// Directory payload, if this is a directory.
    #[must_use]
    pub fn as_dir(&self) -> Option<&DirData> {
        match &self.data {
            EntityData::Dir(data) => Some(data),
            _ => None,
        }
    }

    /// Page payload, if this is a page.
    #[must_use]
    pub fn as_page(&self) -> Option<&PageData> {
        match &self.data {
            EntityData::Page(data) => Some(data),
            _ => None,
        }
    }

    /// Member payload, if this is a member.
    #[must_use]
    pub fn as_member(&self) -> Option<&MemberData> {
        match &self.data {
            EntityData::Member(data) => Some(data),
            _ => None,
        }
    }

    /// Concept payload, if this is a concept.
    #[must_use]
    pub fn as_concept(&self) -> Option<&ConceptData> {
        match &self.data {
            EntityData::Concept(data) => Some(data),
            _ => None,
        }
    }

    /// Module payload, if this is a module.
    #[must_use]
    pub fn as_module(&self) -> Option<&ModuleData> {
        match &self.data {
            EntityData::Module(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ClassData;

    fn class(name: &str) -> Entity {
        let mut entity = Entity::new(name, EntityData::Class(ClassData::default()));
        entity.local_name = name.rsplit("::").next().unwrap_or(name).to_owned();
        entity
    }

    #[test]
    fn test_display_name_uses_language_separator() {
        let entity = class("org::example::Widget").with_language(Language::Java);
        assert_eq!(entity.display_name(true), "org.example.Widget");
        assert_eq!(entity.display_name(false), "Widget");
    }

    #[test]
    fn test_display_name_hides_anonymous_scopes() {
        let entity = class("outer::@3::Inner");
        assert_eq!(entity.display_name(true), "outer::(anonymous)::Inner");
    }

    #[test]
    fn test_reference_is_linkable_but_not_in_project() {
        let entity = class("Remote").with_external("https://example.org/docs");
        assert!(entity.is_reference());
        assert!(entity.is_linkable());
        assert!(!entity.is_linkable_in_project());
    }

    #[test]
    fn test_undocumented_entity_is_not_linkable() {
        let entity = class("Plain").with_flags(EntityFlags {
            documented: false,
            ..EntityFlags::default()
        });
        assert!(!entity.is_linkable());
    }

    #[test]
    fn test_kind_matches_payload() {
        for kind in EntityKind::ALL {
            assert!(!kind.as_str().is_empty());
        }
        assert_eq!(class("A").kind(), EntityKind::Class);
    }
}
