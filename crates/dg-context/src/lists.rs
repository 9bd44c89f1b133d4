//! Index adapters over the whole model.
//!
//! Flat lists filter entities the way listings need them: anonymous and
//! hidden entities are dropped, while tree indices keep whatever their
//! hierarchy reaches.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use dg_model::{Entity, EntityId, EntityKind, MemberData, MemberType};

use crate::adapters::entity_list;
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::tree::{NestingContext, NestingNode, TreeBuilder, max_depth, preferred_depth};
use crate::value::{StructContext, Value};

/// Ids of entities of `kind` passing `filter`, in model order.
fn ids_of(session: &RenderSession, kind: EntityKind, filter: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
    session
        .model()
        .of_kind(kind)
        .filter(|entity| filter(entity))
        .map(Entity::id)
        .collect()
}

/// Ids sorted by display name, case-insensitively.
fn sorted_by_name(session: &RenderSession, mut ids: Vec<EntityId>) -> Vec<EntityId> {
    ids.sort_by_cached_key(|&id| session.entity(id).display_name(true).to_lowercase());
    ids
}

pub(crate) fn class_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Class, |e| {
        e.is_linkable() && e.as_class().is_some_and(|c| c.visible_in_hierarchy)
    })
}

pub(crate) fn namespace_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Namespace, |e| {
        e.is_linkable() && e.as_namespace().is_some_and(|n| !n.is_constant_group)
    })
}

pub(crate) fn file_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::File, Entity::is_linkable)
}

pub(crate) fn page_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Page, |e| {
        e.as_page().is_some_and(|p| !p.is_example && !p.is_main_page) && !e.flags.hidden
    })
}

pub(crate) fn example_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Page, |e| e.as_page().is_some_and(|p| p.is_example))
}

pub(crate) fn module_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Module, |e| !e.flags.hidden)
}

pub(crate) fn concept_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Concept, Entity::is_linkable)
}

pub(crate) fn dir_ids(session: &RenderSession) -> Vec<EntityId> {
    ids_of(session, EntityKind::Dir, |e| !e.flags.hidden)
}

/// Flat, name-sorted list of entity adapters.
#[must_use]
pub fn entity_index(session: &Arc<RenderSession>, ids: Vec<EntityId>) -> Value {
    entity_list(session, &sorted_by_name(session, ids))
}

/// Static description of one tree index page.
struct TreeSpec {
    file_name: &'static str,
    title: &'static str,
    highlight: &'static str,
    subhighlight: &'static str,
}

const CLASS_TREE: TreeSpec = TreeSpec {
    file_name: "annotated",
    title: "Class List",
    highlight: "classes",
    subhighlight: "classlist",
};
const CLASS_HIERARCHY: TreeSpec = TreeSpec {
    file_name: "hierarchy",
    title: "Class Hierarchy",
    highlight: "classes",
    subhighlight: "classhierarchy",
};
const NAMESPACE_TREE: TreeSpec = TreeSpec {
    file_name: "namespaces",
    title: "Namespace List",
    highlight: "namespaces",
    subhighlight: "namespacelist",
};
const FILE_TREE: TreeSpec = TreeSpec {
    file_name: "files",
    title: "File List",
    highlight: "files",
    subhighlight: "filelist",
};
const PAGE_TREE: TreeSpec = TreeSpec {
    file_name: "pages",
    title: "Related Pages",
    highlight: "pages",
    subhighlight: "",
};
const EXAMPLE_TREE: TreeSpec = TreeSpec {
    file_name: "examples",
    title: "Examples",
    highlight: "examples",
    subhighlight: "",
};
const MODULE_TREE: TreeSpec = TreeSpec {
    file_name: "modules",
    title: "Modules",
    highlight: "modules",
    subhighlight: "",
};
const CONCEPT_TREE: TreeSpec = TreeSpec {
    file_name: "concepts",
    title: "Concepts",
    highlight: "concepts",
    subhighlight: "",
};

/// Tree index page: class list, hierarchy, namespace list and the like.
pub struct TreeIndexContext {
    session: Arc<RenderSession>,
    spec: &'static TreeSpec,
    nodes: Arc<[Arc<NestingNode>]>,
}

impl TreeIndexContext {
    fn new(session: &Arc<RenderSession>, spec: &'static TreeSpec, nodes: Vec<Arc<NestingNode>>) -> Self {
        tracing::debug!(index = spec.file_name, roots = nodes.len(), "Built tree index");
        Self {
            session: Arc::clone(session),
            spec,
            nodes: nodes.into(),
        }
    }

    /// Classes nested by containment, inside their namespaces.
    #[must_use]
    pub fn class_tree(session: &Arc<RenderSession>) -> Self {
        let mut builder = TreeBuilder::new(session);
        let mut nodes = builder.namespaces(&namespace_ids(session), true, true, false);
        let outside: Vec<EntityId> = class_ids(session)
            .into_iter()
            .filter(|&id| {
                session
                    .model()
                    .outer(id)
                    .is_none_or(|outer| outer.kind() != EntityKind::Namespace)
            })
            .collect();
        nodes.extend(builder.classes(&outside, true));
        Self::new(session, &CLASS_TREE, nodes)
    }

    #[must_use]
    pub fn class_hierarchy(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).hierarchy(&class_ids(session));
        Self::new(session, &CLASS_HIERARCHY, nodes)
    }

    #[must_use]
    pub fn namespace_tree(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).namespaces(&namespace_ids(session), true, false, false);
        Self::new(session, &NAMESPACE_TREE, nodes)
    }

    /// Directory tree followed by files outside any directory.
    #[must_use]
    pub fn file_tree(session: &Arc<RenderSession>) -> Self {
        let mut builder = TreeBuilder::new(session);
        let mut nodes = builder.dirs(&dir_ids(session), true);
        let loose: Vec<EntityId> = file_ids(session)
            .into_iter()
            .filter(|&id| session.entity(id).as_file().is_some_and(|f| f.dir.is_none()))
            .collect();
        nodes.extend(builder.dirs(&loose, true));
        Self::new(session, &FILE_TREE, nodes)
    }

    #[must_use]
    pub fn page_tree(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).pages(&page_ids(session), true);
        Self::new(session, &PAGE_TREE, nodes)
    }

    #[must_use]
    pub fn example_tree(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).pages(&example_ids(session), true);
        Self::new(session, &EXAMPLE_TREE, nodes)
    }

    #[must_use]
    pub fn module_tree(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).modules(&module_ids(session), true);
        Self::new(session, &MODULE_TREE, nodes)
    }

    #[must_use]
    pub fn concept_tree(session: &Arc<RenderSession>) -> Self {
        let nodes = TreeBuilder::new(session).concepts(&concept_ids(session));
        Self::new(session, &CONCEPT_TREE, nodes)
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        max_depth(&self.nodes)
    }

    #[must_use]
    pub fn preferred_depth(&self) -> usize {
        preferred_depth(
            &self.nodes,
            self.max_depth(),
            self.session.config().index.num_entries,
        )
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        TREE_PROPERTIES.fields()
    }
}

static TREE_PROPERTIES: LazyLock<PropertyMap<TreeIndexContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("TreeIndexContext");
    map.add("tree", |c: &TreeIndexContext| {
        Value::List(Arc::new(NestingContext::new(
            Arc::clone(&c.session),
            Arc::clone(&c.nodes),
        )))
    });
    map.add("fileName", |c| Value::from(c.spec.file_name));
    map.add("relPath", |c| Value::from(c.session.rel_path()));
    map.add("title", |c| Value::from(c.spec.title));
    map.add("highlight", |c| Value::from(c.spec.highlight));
    map.add("subhighlight", |c| Value::from(c.spec.subhighlight));
    map.add("maxDepth", |c| Value::from(c.max_depth()));
    map.add("preferredDepth", |c| Value::from(c.preferred_depth()));
    map
});

impl StructContext for TreeIndexContext {
    fn get(&self, name: &str) -> Value {
        TREE_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        TREE_PROPERTIES.fields()
    }
}

/// Alphabetical class index with per-letter groups.
pub struct ClassIndexContext {
    session: Arc<RenderSession>,
    classes: Vec<EntityId>,
}

impl ClassIndexContext {
    #[must_use]
    pub fn new(session: &Arc<RenderSession>) -> Self {
        let classes = sorted_by_name(session, class_ids(session));
        Self {
            session: Arc::clone(session),
            classes,
        }
    }

    /// Classes grouped by the upper-cased first letter of their bare name.
    fn letters(&self) -> Value {
        let mut groups: BTreeMap<String, Vec<EntityId>> = BTreeMap::new();
        for &id in &self.classes {
            let name = self.session.entity(id).display_name(false);
            let letter = name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect::<String>())
                .unwrap_or_default();
            groups.entry(letter).or_default().push(id);
        }
        Value::list(
            groups
                .into_iter()
                .map(|(letter, ids)| {
                    Value::from_struct(LetterGroupContext {
                        letter,
                        classes: entity_list(&self.session, &ids),
                    })
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        CLASS_INDEX_PROPERTIES.fields()
    }
}

static CLASS_INDEX_PROPERTIES: LazyLock<PropertyMap<ClassIndexContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("ClassIndexContext");
    map.add("list", |c: &ClassIndexContext| entity_list(&c.session, &c.classes));
    map.add("letters", ClassIndexContext::letters);
    map.add("fileName", |_| Value::from("classes"));
    map.add("relPath", |c| Value::from(c.session.rel_path()));
    map.add("title", |_| Value::from("Class Index"));
    map.add("highlight", |_| Value::from("classes"));
    map.add("subhighlight", |_| Value::from("classindex"));
    map
});

impl StructContext for ClassIndexContext {
    fn get(&self, name: &str) -> Value {
        CLASS_INDEX_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        CLASS_INDEX_PROPERTIES.fields()
    }
}

/// Classes starting with one letter.
struct LetterGroupContext {
    letter: String,
    classes: Value,
}

impl StructContext for LetterGroupContext {
    fn get(&self, name: &str) -> Value {
        match name {
            "letter" => Value::from(self.letter.as_str()),
            "classes" => self.classes.clone(),
            _ => Value::None,
        }
    }

    fn fields(&self) -> Vec<&'static str> {
        vec!["classes", "letter"]
    }
}

/// Which members a [`MembersIndexContext`] covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberScope {
    /// Members declared at file level.
    Global,
    Class,
    Namespace,
}

impl MemberScope {
    const fn file_name(self) -> &'static str {
        match self {
            Self::Global => "globals",
            Self::Class => "functions",
            Self::Namespace => "namespacemembers",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Global => "Globals",
            Self::Class => "Class Members",
            Self::Namespace => "Namespace Members",
        }
    }

    const fn highlight(self) -> &'static str {
        match self {
            Self::Global => "files",
            Self::Class => "classes",
            Self::Namespace => "namespaces",
        }
    }

    const fn subhighlight(self) -> &'static str {
        match self {
            Self::Global => "filemembers",
            Self::Class => "classmembers",
            Self::Namespace => "namespacemembers",
        }
    }

    fn contains(self, outer: Option<EntityKind>) -> bool {
        match self {
            Self::Global => matches!(outer, None | Some(EntityKind::File)),
            Self::Class => outer == Some(EntityKind::Class),
            Self::Namespace => outer == Some(EntityKind::Namespace),
        }
    }
}

/// Member category of a members index, with its filter.
type Category = (&'static str, fn(&MemberData) -> bool);

const CATEGORIES: &[Category] = &[
    ("all", |_| true),
    ("functions", |m| m.is_function()),
    ("variables", |m| m.member_type == MemberType::Variable),
    ("typedefs", |m| m.member_type == MemberType::Typedef),
    ("enums", |m| m.member_type == MemberType::Enumeration),
    ("enumValues", |m| m.member_type == MemberType::EnumValue),
    ("macros", |m| m.member_type == MemberType::Define),
    ("properties", |m| m.member_type == MemberType::Property),
    ("events", |m| m.member_type == MemberType::Event),
    ("related", |m| m.related_class.is_some()),
];

/// Index of all globals, class members or namespace members.
pub struct MembersIndexContext {
    session: Arc<RenderSession>,
    scope: MemberScope,
    members: Vec<EntityId>,
}

impl MembersIndexContext {
    #[must_use]
    pub fn new(session: &Arc<RenderSession>, scope: MemberScope) -> Self {
        let model = session.model();
        let members = ids_of(session, EntityKind::Member, |e| {
            e.is_linkable()
                && e.as_member().is_some_and(|m| m.visible_in_index)
                && scope.contains(e.outer.map(|outer| model.get(outer).kind()))
        });
        Self {
            session: Arc::clone(session),
            scope,
            members: sorted_by_name(session, members),
        }
    }

    fn category(&self, filter: fn(&MemberData) -> bool) -> Value {
        let ids: Vec<EntityId> = self
            .members
            .iter()
            .copied()
            .filter(|&id| self.session.entity(id).as_member().is_some_and(filter))
            .collect();
        entity_list(&self.session, &ids)
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        MEMBERS_INDEX_PROPERTIES.fields()
    }
}

static MEMBERS_INDEX_PROPERTIES: LazyLock<PropertyMap<MembersIndexContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("MembersIndexContext");
    for &(name, filter) in CATEGORIES {
        map.add(name, move |c: &MembersIndexContext| c.category(filter));
    }
    map.add("fileName", |c| Value::from(c.scope.file_name()));
    map.add("relPath", |c| Value::from(c.session.rel_path()));
    map.add("title", |c| Value::from(c.scope.title()));
    map.add("highlight", |c| Value::from(c.scope.highlight()));
    map.add("subhighlight", |c| Value::from(c.scope.subhighlight()));
    map
});

impl StructContext for MembersIndexContext {
    fn get(&self, name: &str) -> Value {
        MEMBERS_INDEX_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        MEMBERS_INDEX_PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    fn names(value: &Value) -> Vec<String> {
        let list = value.as_list().unwrap();
        (0..list.count())
            .map(|i| list.at(i).get("name").to_string())
            .collect()
    }

    #[test]
    fn test_flat_class_list_excludes_anonymous() {
        let session = fixture::session();
        let classes = entity_index(&session, class_ids(&session));
        assert_eq!(
            names(&classes),
            vec!["geo::Circle", "geo::Circle::Center", "geo::Shape", "geo::Square"]
        );
    }

    #[test]
    fn test_class_index_letters() {
        let session = fixture::session();
        let index = ClassIndexContext::new(&session);
        let letters = index.get("letters");
        let list = letters.as_list().unwrap();
        let keys: Vec<String> = (0..list.count())
            .map(|i| list.at(i).get("letter").to_string())
            .collect();
        assert_eq!(keys, vec!["C", "S"]);
        assert_eq!(list.at(0).get("classes").to_int(), 2);
    }

    #[test]
    fn test_class_tree_goes_through_namespaces() {
        let session = fixture::session();
        let tree = TreeIndexContext::class_tree(&session);
        assert_eq!(tree.get("fileName").to_string(), "annotated");
        assert_eq!(tree.get("tree").to_int(), 1);
        // geo > Circle > Center
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.preferred_depth(), 3);
    }

    #[test]
    fn test_file_tree_and_page_tree() {
        let session = fixture::session();
        let files = TreeIndexContext::file_tree(&session);
        assert_eq!(files.max_depth(), 2);
        let pages = TreeIndexContext::page_tree(&session);
        assert_eq!(pages.get("tree").to_int(), 1);
        assert_eq!(pages.get("title").to_string(), "Related Pages");
    }

    #[test]
    fn test_members_index_scopes() {
        let session = fixture::session();
        let classes = MembersIndexContext::new(&session, MemberScope::Class);
        assert_eq!(
            names(&classes.get("all")),
            vec!["geo::Circle::cache", "geo::Circle::draw", "geo::Circle::radius", "geo::Shape::draw"]
        );
        assert_eq!(classes.get("functions").to_int(), 2);
        assert_eq!(classes.get("variables").to_int(), 2);

        let namespaces = MembersIndexContext::new(&session, MemberScope::Namespace);
        assert_eq!(names(&namespaces.get("functions")), vec!["geo::area"]);

        let globals = MembersIndexContext::new(&session, MemberScope::Global);
        assert_eq!(globals.get("all").to_int(), 0);
        assert_eq!(globals.get("title").to_string(), "Globals");
    }
}
