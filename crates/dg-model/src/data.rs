//! Kind-specific entity payloads.
//!
//! Fields marked "derived" are filled by [`ModelBuilder`](crate::ModelBuilder)
//! from the forward relations and are never read from input.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::entity::EntityId;
use crate::member_list::MemberListKind;

/// Access level of a member or base class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protection {
    #[default]
    Public,
    Protected,
    Private,
    Package,
}

impl Protection {
    /// Lowercase name of the protection level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Package => "package",
        }
    }
}

/// Virtualness of a member function or base class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Virtualness {
    #[default]
    Normal,
    Virtual,
    Pure,
}

impl Virtualness {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Virtual => "virtual",
            Self::Pure => "pure",
        }
    }
}

/// Compound flavor of a class-like entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundType {
    #[default]
    Class,
    Struct,
    Union,
    Interface,
    Protocol,
    Category,
    Exception,
    Service,
    Singleton,
}

impl CompoundType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Interface => "interface",
            Self::Protocol => "protocol",
            Self::Category => "category",
            Self::Exception => "exception",
            Self::Service => "service",
            Self::Singleton => "singleton",
        }
    }
}

/// Kind of member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    Define,
    #[default]
    Function,
    Variable,
    Typedef,
    Enumeration,
    #[serde(rename = "enumvalue")]
    EnumValue,
    Signal,
    Slot,
    Friend,
    Dcop,
    Property,
    Event,
    Interface,
    Service,
    Sequence,
    Dictionary,
}

impl MemberType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Define => "define",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::Typedef => "typedef",
            Self::Enumeration => "enum",
            Self::EnumValue => "enumvalue",
            Self::Signal => "signal",
            Self::Slot => "slot",
            Self::Friend => "friend",
            Self::Dcop => "dcop",
            Self::Property => "property",
            Self::Event => "event",
            Self::Interface => "interface",
            Self::Service => "service",
            Self::Sequence => "sequence",
            Self::Dictionary => "dictionary",
        }
    }
}

/// One argument of a function or template.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Argument {
    /// Type, as written.
    #[serde(rename = "type")]
    pub type_: String,
    pub name: String,
    pub default_value: String,
    /// Array suffix (`[4]`), if any.
    pub array: String,
    /// Parameter documentation.
    pub docs: String,
    /// IDL/Fortran attribute (`[in]`, `intent(out)`).
    pub attrib: String,
}

impl Argument {
    /// Create an argument from type and name.
    #[must_use]
    pub fn new(type_: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Argument name with any array suffix stripped.
    #[must_use]
    pub fn name_part(&self) -> &str {
        self.name
            .split_once('[')
            .map_or(self.name.as_str(), |(name, _)| name)
            .trim()
    }
}

/// A base class (or, in the derived direction, a derived class).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BaseClass {
    pub class: EntityId,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub virtualness: Virtualness,
    /// Template specifiers used in the inheritance relation (`<int>`).
    #[serde(default)]
    pub template_specifiers: String,
}

impl BaseClass {
    /// Public, non-virtual relation to `class`.
    #[must_use]
    pub fn public(class: EntityId) -> Self {
        Self {
            class,
            protection: Protection::Public,
            virtualness: Virtualness::Normal,
            template_specifiers: String::new(),
        }
    }
}

/// Header that must be included to use a class, concept or file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IncludeInfo {
    /// File entity, when the header is part of the model.
    pub file: Option<EntityId>,
    /// Include name as written.
    pub name: String,
    /// `#include "x"` rather than `#include <x>`.
    pub local: bool,
    /// Objective-C `#import`.
    pub imported: bool,
}

/// A class used by another class (member types), for collaboration graphs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UsageRelation {
    pub class: EntityId,
    /// Names of members through which the class is used.
    #[serde(default)]
    pub via: Vec<String>,
}

/// Entry of a class's all-members list, inherited members included.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MemberInfo {
    pub member: EntityId,
    #[serde(default)]
    pub protection: Protection,
    #[serde(default)]
    pub virtualness: Virtualness,
    /// Scope qualifier to disambiguate members reachable through several bases.
    #[serde(default)]
    pub ambiguity_scope: String,
}

/// User-defined group of members inside a container.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemberGroup {
    pub header: String,
    pub doc: String,
    pub members: Vec<EntityId>,
}

/// Members of one list kind inherited from a base class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InheritedMembers {
    pub kind: MemberListKind,
    pub from: EntityId,
    pub members: Vec<EntityId>,
}

/// Categorized member lists of a container.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MemberLists(BTreeMap<MemberListKind, Vec<EntityId>>);

impl MemberLists {
    /// Members in the list of the given kind (empty when absent).
    #[must_use]
    pub fn get(&self, kind: MemberListKind) -> &[EntityId] {
        self.0.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Append a member to a list.
    pub fn push(&mut self, kind: MemberListKind, member: EntityId) {
        self.0.entry(kind).or_default().push(member);
    }

    /// Non-empty lists, in list-kind order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberListKind, &[EntityId])> {
        self.0
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .map(|(kind, members)| (*kind, members.as_slice()))
    }

    /// Every member id in any list.
    pub fn all_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.0.values().flatten().copied()
    }
}

/// Class, struct, union, interface and friends.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClassData {
    pub compound_type: CompoundType,
    pub bases: Vec<BaseClass>,
    /// Derived.
    #[serde(skip)]
    pub derived: Vec<BaseClass>,
    pub inner_classes: Vec<EntityId>,
    pub member_lists: MemberLists,
    pub member_groups: Vec<MemberGroup>,
    pub all_members: Vec<MemberInfo>,
    pub template_args: Vec<Argument>,
    /// Template argument lists of enclosing templates, outermost first.
    pub outer_template_args: Vec<Vec<Argument>>,
    pub type_constraints: Vec<Argument>,
    pub include: Option<IncludeInfo>,
    pub usages: Vec<UsageRelation>,
    pub examples: Vec<EntityId>,
    /// Files the documentation was generated from.
    pub files: Vec<EntityId>,
    /// Class extended by this Objective-C category.
    pub category_of: Option<EntityId>,
    /// Template this class is an instance of.
    pub template_master: Option<EntityId>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_sealed: bool,
    /// Simple struct without methods (C-like).
    pub is_simple: bool,
    /// Class defined inside a function.
    pub is_local: bool,
    /// Shown as part of the enclosing scope's page.
    pub embedded_in_outer_scope: bool,
    pub visible_in_hierarchy: bool,
}

impl Default for ClassData {
    fn default() -> Self {
        Self {
            compound_type: CompoundType::default(),
            bases: Vec::new(),
            derived: Vec::new(),
            inner_classes: Vec::new(),
            member_lists: MemberLists::default(),
            member_groups: Vec::new(),
            all_members: Vec::new(),
            template_args: Vec::new(),
            outer_template_args: Vec::new(),
            type_constraints: Vec::new(),
            include: None,
            usages: Vec::new(),
            examples: Vec::new(),
            files: Vec::new(),
            category_of: None,
            template_master: None,
            is_abstract: false,
            is_final: false,
            is_sealed: false,
            is_simple: false,
            is_local: false,
            embedded_in_outer_scope: false,
            visible_in_hierarchy: true,
        }
    }
}

impl ClassData {
    /// Class payload with public, non-virtual bases.
    #[must_use]
    pub fn with_bases(bases: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            bases: bases.into_iter().map(BaseClass::public).collect(),
            ..Self::default()
        }
    }

    /// Whether the class is a template (has template arguments).
    #[must_use]
    pub fn is_template(&self) -> bool {
        !self.template_args.is_empty()
    }
}

/// Namespace or package.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NamespaceData {
    pub namespaces: Vec<EntityId>,
    pub classes: Vec<EntityId>,
    pub concepts: Vec<EntityId>,
    pub member_lists: MemberLists,
    pub member_groups: Vec<MemberGroup>,
    pub is_inline: bool,
    /// IDL constant group.
    pub is_constant_group: bool,
    /// Java package.
    pub is_package: bool,
}

/// Source or header file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileData {
    /// Path relative to the input root.
    pub path: String,
    pub dir: Option<EntityId>,
    pub includes: Vec<IncludeInfo>,
    /// Derived: files including this one.
    #[serde(skip)]
    pub included_by: Vec<IncludeInfo>,
    pub classes: Vec<EntityId>,
    pub namespaces: Vec<EntityId>,
    pub concepts: Vec<EntityId>,
    pub member_lists: MemberLists,
    pub member_groups: Vec<MemberGroup>,
    /// Full source text, when source browsing is enabled.
    pub source: Option<String>,
    pub version: String,
}

impl FileData {
    /// File name without directories.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Dependency of one directory on another, through the listed files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DirDependency {
    pub dir: EntityId,
    #[serde(default)]
    pub files: Vec<EntityId>,
}

/// Source directory. The parent directory is the entity's `outer`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DirData {
    pub path: String,
    pub subdirs: Vec<EntityId>,
    pub files: Vec<EntityId>,
    pub uses: Vec<DirDependency>,
}

/// Related page, example or main page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageData {
    pub title: String,
    pub subpages: Vec<EntityId>,
    /// Derived.
    #[serde(skip)]
    pub parent_page: Option<EntityId>,
    pub is_example: bool,
    pub is_main_page: bool,
    /// Example source text.
    pub example: Option<String>,
}

/// Qualifier and specifier flags of a member.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MemberFlags {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_inline: bool,
    pub is_explicit: bool,
    pub is_mutable: bool,
    pub is_readable: bool,
    pub is_writable: bool,
    pub is_deleted: bool,
    pub is_defaulted: bool,
    pub is_noexcept: bool,
    pub is_final: bool,
    pub is_override: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_constexpr: bool,
    pub is_optional: bool,
    pub is_required: bool,
    pub is_transient: bool,
    pub is_initonly: bool,
    pub is_attribute: bool,
    pub is_unretained: bool,
    pub is_retain: bool,
    pub is_copy: bool,
    pub is_weak: bool,
    pub is_strong: bool,
    pub is_nonatomic: bool,
    pub is_gettable: bool,
    pub is_settable: bool,
    pub is_addable: bool,
    pub is_removable: bool,
    pub is_raisable: bool,
    pub is_maybe_void: bool,
    pub is_maybe_default: bool,
    pub is_maybe_ambiguous: bool,
    pub is_bound: bool,
    pub is_constrained: bool,
    pub is_no_discard: bool,
    pub is_slot: bool,
    pub is_signal: bool,
    pub is_objc_method: bool,
    pub is_objc_property: bool,
}

/// Function, variable, typedef, enum, define and the like.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct MemberData {
    pub member_type: MemberType,
    pub protection: Protection,
    pub virtualness: Virtualness,
    pub is_static: bool,
    /// Return or variable type.
    #[serde(rename = "type")]
    pub type_: String,
    /// Argument string as written (`(int x) const`).
    pub args: String,
    /// Full definition line.
    pub definition: String,
    pub arguments: Vec<Argument>,
    pub template_args: Vec<Argument>,
    pub initializer: String,
    pub exception: String,
    pub bitfield: String,
    /// Values of an enumeration.
    pub enum_values: Vec<EntityId>,
    pub flags: MemberFlags,
    /// Member this one overrides.
    pub reimplements: Option<EntityId>,
    /// Derived.
    #[serde(skip)]
    pub reimplemented_by: Vec<EntityId>,
    /// Members referenced from this member's body.
    pub references: Vec<EntityId>,
    /// Derived.
    #[serde(skip)]
    pub referenced_by: Vec<EntityId>,
    /// File the member is declared in.
    pub file: Option<EntityId>,
    /// Anonymous struct/union this member has as its type.
    pub anonymous_type: Option<EntityId>,
    /// Objective-C category the member belongs to.
    pub category: Option<EntityId>,
    /// Member in the category class mirroring this one.
    pub category_relation: Option<EntityId>,
    /// Owning class when the member is a related function.
    pub related_class: Option<EntityId>,
    pub brief_visible: bool,
    pub details_visible: bool,
    pub visible_in_index: bool,
    pub call_graph: bool,
    pub caller_graph: bool,
    /// Property getter name.
    pub read_accessor: String,
    /// Property setter name.
    pub write_accessor: String,
    pub trailing_return_type: String,
}

impl Default for MemberData {
    fn default() -> Self {
        Self {
            member_type: MemberType::default(),
            protection: Protection::default(),
            virtualness: Virtualness::default(),
            is_static: false,
            type_: String::new(),
            args: String::new(),
            definition: String::new(),
            arguments: Vec::new(),
            template_args: Vec::new(),
            initializer: String::new(),
            exception: String::new(),
            bitfield: String::new(),
            enum_values: Vec::new(),
            flags: MemberFlags::default(),
            reimplements: None,
            reimplemented_by: Vec::new(),
            references: Vec::new(),
            referenced_by: Vec::new(),
            file: None,
            anonymous_type: None,
            category: None,
            category_relation: None,
            related_class: None,
            brief_visible: true,
            details_visible: true,
            visible_in_index: true,
            call_graph: false,
            caller_graph: false,
            read_accessor: String::new(),
            write_accessor: String::new(),
            trailing_return_type: String::new(),
        }
    }
}

impl MemberData {
    /// Member payload of the given type with default attributes.
    #[must_use]
    pub fn of_type(member_type: MemberType) -> Self {
        Self {
            member_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        matches!(
            self.member_type,
            MemberType::Function | MemberType::Signal | MemberType::Slot | MemberType::Dcop
        )
    }

    /// Whether the member shows up in summary (declaration) listings.
    #[must_use]
    pub fn is_brief_section_visible(&self) -> bool {
        self.brief_visible
    }

    #[must_use]
    pub fn is_detailed_section_visible(&self) -> bool {
        self.details_visible
    }
}

/// C++20 concept.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConceptData {
    pub template_args: Vec<Argument>,
    pub initializer: String,
    pub include: Option<IncludeInfo>,
}

/// User-defined group (module).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ModuleData {
    pub title: String,
    pub subgroups: Vec<EntityId>,
    pub classes: Vec<EntityId>,
    pub namespaces: Vec<EntityId>,
    pub concepts: Vec<EntityId>,
    pub files: Vec<EntityId>,
    pub dirs: Vec<EntityId>,
    pub pages: Vec<EntityId>,
    pub examples: Vec<EntityId>,
    pub member_lists: MemberLists,
    pub member_groups: Vec<MemberGroup>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_argument_name_part_strips_array_suffix() {
        let arg = Argument::new("int", "values[4]");
        assert_eq!(arg.name_part(), "values");
        assert_eq!(Argument::new("int", "x").name_part(), "x");
    }

    #[test]
    fn test_member_lists_get_missing_kind_is_empty() {
        let mut lists = MemberLists::default();
        lists.push(MemberListKind::PubMethods, EntityId::new(3));
        assert_eq!(lists.get(MemberListKind::PubMethods), &[EntityId::new(3)]);
        assert!(lists.get(MemberListKind::PriAttribs).is_empty());
    }

    #[test]
    fn test_member_data_defaults_visible() {
        let data: MemberData = serde_json::from_str(r#"{"member_type": "variable"}"#).unwrap();
        assert_eq!(data.member_type, MemberType::Variable);
        assert!(data.is_brief_section_visible());
        assert!(!data.is_function());
    }

    #[test]
    fn test_class_data_deserializes_member_lists() {
        let data: ClassData = serde_json::from_str(
            r#"{"compound_type": "struct", "member_lists": {"pubAttribs": [1, 2]}}"#,
        )
        .unwrap();
        assert_eq!(data.compound_type, CompoundType::Struct);
        assert_eq!(
            data.member_lists.get(MemberListKind::PubAttribs),
            &[EntityId::new(1), EntityId::new(2)]
        );
        assert!(data.visible_in_hierarchy);
    }

    #[test]
    fn test_file_name_strips_directories() {
        let file = FileData {
            path: "src/core/widget.h".to_owned(),
            ..FileData::default()
        };
        assert_eq!(file.file_name(), "widget.h");
    }
}
