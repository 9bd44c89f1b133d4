//! Nesting trees.
//!
//! Class containment, class inheritance, namespace containment, directory
//! containment, page nesting and module nesting all render through one
//! recursive node type. A [`TreeBuilder`] is used for exactly one tree: its
//! visited set keeps an entity from showing up twice in that tree (a class
//! with two bases, a class in two modules) while independent trees built
//! from a fresh builder still repeat it.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, EntityKind, MemberListKind, Protection};

use crate::adapters::{entity_value, flat_members, visible_member_list};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{ListContext, StructContext, Value};

/// Hierarchy a node was built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeKind {
    Class,
    Inheritance,
    Namespace,
    Dir,
    Page,
    Module,
    Concept,
}

/// One tree element bound to a single entity.
#[derive(Debug)]
pub struct NestingNode {
    pub id: EntityId,
    pub kind: TreeKind,
    /// Depth below the tree root, starting at 0.
    pub level: usize,
    /// Position path such as `0_2_`, unique within the tree.
    pub path: String,
    pub children: Vec<Arc<NestingNode>>,
    pub members: Vec<Arc<NestingNode>>,
}

impl NestingNode {
    /// Nodes of this subtree above `max_level`.
    fn count_above(&self, max_level: usize) -> usize {
        if self.level >= max_level {
            return 0;
        }
        1 + self
            .children
            .iter()
            .map(|child| child.count_above(max_level))
            .sum::<usize>()
    }

    fn depth(&self) -> usize {
        1 + max_depth(&self.children)
    }
}

/// Longest root-to-leaf path; 0 for an empty tree.
#[must_use]
pub fn max_depth(nodes: &[Arc<NestingNode>]) -> usize {
    nodes.iter().map(|node| node.depth()).max().unwrap_or(0)
}

/// Number of levels to expand so that at most `budget` nodes show.
///
/// Scans depths 1, 2, ... up to `max_depth` and keeps the last depth whose
/// cumulative node count fits; the scan stops at the first depth that does
/// not. A zero budget keeps the default of 1.
#[must_use]
pub fn preferred_depth(nodes: &[Arc<NestingNode>], max_depth: usize, budget: usize) -> usize {
    let mut preferred = 1;
    if budget == 0 {
        return preferred;
    }
    for depth in 1..=max_depth {
        let count: usize = nodes.iter().map(|node| node.count_above(depth)).sum();
        if count > budget {
            break;
        }
        preferred = depth;
    }
    preferred
}

/// Builder for a single tree.
pub struct TreeBuilder<'a> {
    session: &'a RenderSession,
    visited: HashSet<EntityId>,
    with_members: bool,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    pub fn new(session: &'a RenderSession) -> Self {
        Self {
            session,
            visited: HashSet::new(),
            with_members: false,
        }
    }

    /// Also attach member subtrees to class, namespace, file and module nodes.
    #[must_use]
    pub fn with_members(mut self, with_members: bool) -> Self {
        self.with_members = with_members;
        self
    }

    /// Class containment tree.
    ///
    /// With `root_only`, classes nested in another class are skipped here;
    /// they appear below their outer class.
    pub fn classes(&mut self, ids: &[EntityId], root_only: bool) -> Vec<Arc<NestingNode>> {
        self.classes_at(ids, root_only, 0, "")
    }

    fn classes_at(
        &mut self,
        ids: &[EntityId],
        root_only: bool,
        level: usize,
        prefix: &str,
    ) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            let Some(data) = entity.as_class() else {
                continue;
            };
            if !entity.is_linkable() || !data.visible_in_hierarchy {
                continue;
            }
            if root_only && self.is_nested_class(id) {
                continue;
            }
            if !self.visited.insert(id) {
                continue;
            }
            let path = format!("{prefix}{}_", nodes.len());
            let children = self.classes_at(&data.inner_classes, false, level + 1, &path);
            let members = self.class_members(id, level + 1, &path);
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Class,
                level,
                path,
                children,
                members,
            }));
        }
        nodes
    }

    fn is_nested_class(&self, id: EntityId) -> bool {
        self.session
            .model()
            .outer(id)
            .is_some_and(|outer| outer.as_class().is_some())
    }

    /// Inheritance tree: classes without public or protected bases at the
    /// root, derived classes below their base.
    pub fn hierarchy(&mut self, ids: &[EntityId]) -> Vec<Arc<NestingNode>> {
        let roots: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|&id| {
                self.session.entity(id).as_class().is_some_and(|data| {
                    !data.bases.iter().any(|base| {
                        base.protection != Protection::Private
                            && self.session.entity(base.class).is_linkable()
                    })
                })
            })
            .collect();
        self.derived_at(&roots, 0, "")
    }

    fn derived_at(&mut self, ids: &[EntityId], level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            let Some(data) = entity.as_class() else {
                continue;
            };
            if !entity.is_linkable() || !data.visible_in_hierarchy || !self.visited.insert(id) {
                continue;
            }
            let derived: Vec<EntityId> = data
                .derived
                .iter()
                .filter(|relation| relation.protection != Protection::Private)
                .map(|relation| relation.class)
                .collect();
            let path = format!("{prefix}{}_", nodes.len());
            let children = self.derived_at(&derived, level + 1, &path);
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Inheritance,
                level,
                path,
                children,
                members: Vec::new(),
            }));
        }
        nodes
    }

    /// Namespace containment tree, optionally with the classes and concepts
    /// of each namespace as children.
    pub fn namespaces(
        &mut self,
        ids: &[EntityId],
        root_only: bool,
        add_classes: bool,
        add_concepts: bool,
    ) -> Vec<Arc<NestingNode>> {
        let options = (add_classes, add_concepts);
        self.namespaces_at(ids, root_only, options, 0, "")
    }

    fn namespaces_at(
        &mut self,
        ids: &[EntityId],
        root_only: bool,
        (add_classes, add_concepts): (bool, bool),
        level: usize,
        prefix: &str,
    ) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            let Some(data) = entity.as_namespace() else {
                continue;
            };
            let nested = self
                .session
                .model()
                .outer(id)
                .is_some_and(|outer| outer.as_namespace().is_some());
            if (root_only && nested) || !entity.is_linkable() || !self.visited.insert(id) {
                continue;
            }
            let path = format!("{prefix}{}_", nodes.len());
            let mut children =
                self.namespaces_at(&data.namespaces, false, (add_classes, add_concepts), level + 1, &path);
            if add_classes {
                let classes = self.classes_at(&data.classes, false, level + 1, &path);
                children.extend(classes);
            }
            if add_concepts {
                let concepts = self.concepts_at(&data.concepts, level + 1, &path);
                children.extend(concepts);
            }
            let members = self.container_members(id, level + 1, &path);
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Namespace,
                level,
                path,
                children,
                members,
            }));
        }
        nodes
    }

    /// Flat concept list.
    pub fn concepts(&mut self, ids: &[EntityId]) -> Vec<Arc<NestingNode>> {
        self.concepts_at(ids, 0, "")
    }

    fn concepts_at(&mut self, ids: &[EntityId], level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            if entity.kind() != EntityKind::Concept || !entity.is_linkable() || !self.visited.insert(id) {
                continue;
            }
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Concept,
                level,
                path: format!("{prefix}{}_", nodes.len()),
                children: Vec::new(),
                members: Vec::new(),
            }));
        }
        nodes
    }

    /// Directory tree: subdirectories first, then files.
    ///
    /// Files are leaves tagged [`TreeKind::Dir`] since they belong to the
    /// directory hierarchy; the entity kind tells them apart.
    pub fn dirs(&mut self, ids: &[EntityId], root_only: bool) -> Vec<Arc<NestingNode>> {
        self.dirs_at(ids, root_only, 0, "")
    }

    fn dirs_at(
        &mut self,
        ids: &[EntityId],
        root_only: bool,
        level: usize,
        prefix: &str,
    ) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            if root_only && entity.outer.is_some() {
                continue;
            }
            if !self.visited.insert(id) {
                continue;
            }
            let path = format!("{prefix}{}_", nodes.len());
            let (children, members) = match (entity.as_dir(), entity.as_file()) {
                (Some(dir), _) => {
                    let mut children = self.dirs_at(&dir.subdirs, false, level + 1, &path);
                    let files = self.dirs_at(&dir.files, false, level + 1, &path);
                    children.extend(files);
                    (children, Vec::new())
                }
                (None, Some(_)) => {
                    if !entity.is_linkable() {
                        continue;
                    }
                    (Vec::new(), self.container_members(id, level + 1, &path))
                }
                (None, None) => continue,
            };
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Dir,
                level,
                path,
                children,
                members,
            }));
        }
        nodes
    }

    /// Page tree; with `root_only`, subpages appear only below their parent.
    pub fn pages(&mut self, ids: &[EntityId], root_only: bool) -> Vec<Arc<NestingNode>> {
        self.pages_at(ids, root_only, 0, "")
    }

    fn pages_at(
        &mut self,
        ids: &[EntityId],
        root_only: bool,
        level: usize,
        prefix: &str,
    ) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            let Some(page) = entity.as_page() else {
                continue;
            };
            let has_parent = page
                .parent_page
                .is_some_and(|parent| self.session.entity(parent).as_page().is_some_and(|p| !p.is_main_page));
            if (root_only && has_parent) || page.is_main_page || !self.visited.insert(id) {
                continue;
            }
            let path = format!("{prefix}{}_", nodes.len());
            let children = self.pages_at(&page.subpages, false, level + 1, &path);
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Page,
                level,
                path,
                children,
                members: Vec::new(),
            }));
        }
        nodes
    }

    /// Module tree: subgroups, then the pages and classes of each module.
    pub fn modules(&mut self, ids: &[EntityId], root_only: bool) -> Vec<Arc<NestingNode>> {
        let subgroups: HashSet<EntityId> = self
            .session
            .model()
            .of_kind(EntityKind::Module)
            .filter_map(|module| module.as_module())
            .flat_map(|module| module.subgroups.iter().copied())
            .collect();
        let roots: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| !root_only || !subgroups.contains(id))
            .collect();
        self.modules_at(&roots, 0, "")
    }

    fn modules_at(&mut self, ids: &[EntityId], level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
        let mut nodes = Vec::new();
        for &id in ids {
            let entity = self.session.entity(id);
            let Some(module) = entity.as_module() else {
                continue;
            };
            if entity.flags.hidden || !self.visited.insert(id) {
                continue;
            }
            let path = format!("{prefix}{}_", nodes.len());
            let mut children = self.modules_at(&module.subgroups, level + 1, &path);
            let pages = self.pages_at(&module.pages, false, level + 1, &path);
            children.extend(pages);
            let classes = self.classes_at(&module.classes, false, level + 1, &path);
            children.extend(classes);
            let members = self.container_members(id, level + 1, &path);
            nodes.push(Arc::new(NestingNode {
                id,
                kind: TreeKind::Module,
                level,
                path,
                children,
                members,
            }));
        }
        nodes
    }

    fn class_members(&self, class: EntityId, level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
        if !self.with_members {
            return Vec::new();
        }
        member_nodes(&flat_members(self.session, class), TreeKind::Class, level, prefix)
    }

    /// Declared members of a namespace, file or module that live directly in
    /// that container rather than in a narrower one.
    fn container_members(&self, owner: EntityId, level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
        if !self.with_members {
            return Vec::new();
        }
        let kind = match self.session.entity(owner).kind() {
            EntityKind::Namespace => TreeKind::Namespace,
            EntityKind::Module => TreeKind::Module,
            _ => TreeKind::Dir,
        };
        let mut seen = HashSet::new();
        let ids: Vec<EntityId> = MemberListKind::CONTAINER_DECLARATIONS
            .iter()
            .flat_map(|&list| visible_member_list(self.session, owner, list).to_vec())
            .filter(|id| self.session.entity(*id).is_linkable() && seen.insert(*id))
            .collect();
        member_nodes(&ids, kind, level, prefix)
    }
}

fn member_nodes(ids: &[EntityId], kind: TreeKind, level: usize, prefix: &str) -> Vec<Arc<NestingNode>> {
    ids.iter()
        .enumerate()
        .map(|(index, &id)| {
            Arc::new(NestingNode {
                id,
                kind,
                level,
                path: format!("{prefix}m{index}_"),
                children: Vec::new(),
                members: Vec::new(),
            })
        })
        .collect()
}

/// List of tree nodes exposed to templates.
pub struct NestingContext {
    session: Arc<RenderSession>,
    nodes: Arc<[Arc<NestingNode>]>,
}

impl NestingContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, nodes: Arc<[Arc<NestingNode>]>) -> Self {
        Self { session, nodes }
    }
}

impl ListContext for NestingContext {
    fn count(&self) -> usize {
        self.nodes.len()
    }

    fn at(&self, index: usize) -> Value {
        self.nodes.get(index).map_or(Value::None, |node| {
            Value::from_struct(NestingNodeContext {
                session: Arc::clone(&self.session),
                node: Arc::clone(node),
            })
        })
    }
}

fn node_list(session: &Arc<RenderSession>, nodes: &[Arc<NestingNode>]) -> Value {
    Value::List(Arc::new(NestingContext::new(
        Arc::clone(session),
        nodes.iter().cloned().collect(),
    )))
}

/// One node of a nesting tree.
pub struct NestingNodeContext {
    session: Arc<RenderSession>,
    node: Arc<NestingNode>,
}

impl NestingNodeContext {
    fn of_kind(&self, kind: EntityKind) -> Value {
        if self.session.entity(self.node.id).kind() == kind {
            entity_value(&self.session, self.node.id)
        } else {
            Value::Bool(false)
        }
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        NODE_PROPERTIES.fields()
    }
}

static NODE_PROPERTIES: LazyLock<PropertyMap<NestingNodeContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("NestingNodeContext");
    map.add("id", |c: &NestingNodeContext| Value::from(c.node.path.as_str()));
    map.add("level", |c| Value::from(c.node.level));
    map.add("children", |c| node_list(&c.session, &c.node.children));
    map.add("members", |c| node_list(&c.session, &c.node.members));
    map.add("isLeafNode", |c| Value::Bool(c.node.children.is_empty()));
    map.add("numChildren", |c| Value::from(c.node.children.len()));
    map.add("name", |c| {
        let entity = c.session.entity(c.node.id);
        let qualified = matches!(c.node.kind, TreeKind::Inheritance);
        Value::from(entity.display_name(qualified))
    });
    map.add("brief", |c| {
        Value::from(
            c.session
                .rendered_doc(c.node.id, dg_model::RenderedField::Brief),
        )
    });
    map.add("isLinkable", |c| Value::Bool(c.session.entity(c.node.id).is_linkable()));
    map.add("isReference", |c| Value::Bool(c.session.entity(c.node.id).is_reference()));
    map.add("externalReference", |c| {
        Value::from(
            c.session
                .entity(c.node.id)
                .external
                .as_deref()
                .unwrap_or_default(),
        )
    });
    map.add("fileName", |c| {
        Value::from(c.session.entity(c.node.id).output_file.as_str())
    });
    map.add("anchor", |c| Value::from(c.session.entity(c.node.id).anchor.as_str()));
    map.add("relPath", |c| Value::from(c.session.rel_path()));
    map.add("partOfGroup", |c| {
        Value::Bool(!c.session.entity(c.node.id).groups.is_empty())
    });
    map.add("class", |c| c.of_kind(EntityKind::Class));
    map.add("namespace", |c| c.of_kind(EntityKind::Namespace));
    map.add("file", |c| c.of_kind(EntityKind::File));
    map.add("dir", |c| c.of_kind(EntityKind::Dir));
    map.add("page", |c| c.of_kind(EntityKind::Page));
    map.add("module", |c| c.of_kind(EntityKind::Module));
    map.add("member", |c| c.of_kind(EntityKind::Member));
    map.add("concept", |c| c.of_kind(EntityKind::Concept));
    map
});

impl StructContext for NestingNodeContext {
    fn get(&self, name: &str) -> Value {
        NODE_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        NODE_PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use dg_config::Config;
    use dg_model::{ClassData, Entity, EntityData, ModelBuilder};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    /// Complete tree where every node has `fanout` children.
    fn levels(level: usize, depth: usize, fanout: usize) -> Vec<Arc<NestingNode>> {
        if level == depth {
            return Vec::new();
        }
        let count = if level == 0 { 1 } else { fanout };
        (0..count)
            .map(|i| {
                Arc::new(NestingNode {
                    id: EntityId::new(0),
                    kind: TreeKind::Class,
                    level,
                    path: format!("{i}_"),
                    children: levels(level + 1, depth, fanout),
                    members: Vec::new(),
                })
            })
            .collect()
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(max_depth(&[]), 0);
        assert_eq!(max_depth(&levels(0, 1, 3)), 1);
        assert_eq!(max_depth(&levels(0, 4, 3)), 4);
    }

    #[test]
    fn test_preferred_depth_golden() {
        // Levels hold 1, 3, 9 and 27 nodes.
        let tree = levels(0, 4, 3);
        assert_eq!(preferred_depth(&tree, max_depth(&tree), 10), 2);
        assert_eq!(preferred_depth(&tree, max_depth(&tree), 13), 3);
        assert_eq!(preferred_depth(&tree, max_depth(&tree), 100), 4);
        assert_eq!(preferred_depth(&tree, max_depth(&tree), 0), 1);
    }

    #[test]
    fn test_preferred_depth_when_first_level_too_big() {
        let tree = levels(0, 2, 3);
        assert_eq!(preferred_depth(&tree, 2, 0), 1);
        let wide: Vec<_> = (0..5).flat_map(|_| levels(0, 1, 1)).collect();
        assert_eq!(preferred_depth(&wide, 1, 2), 1);
    }

    #[test]
    fn test_diamond_inheritance_visits_once() {
        let mut b = ModelBuilder::new();
        let top = b.add(Entity::new("A", EntityData::Class(ClassData::default())).with_output_file("a"));
        let left = b.add(Entity::new("B", EntityData::Class(ClassData::with_bases([top]))).with_output_file("b"));
        let right = b.add(Entity::new("C", EntityData::Class(ClassData::with_bases([top]))).with_output_file("c"));
        let bottom = b.add(
            Entity::new("D", EntityData::Class(ClassData::with_bases([left, right])))
                .with_output_file("d"),
        );
        let session = RenderSession::new(Arc::new(b.build().unwrap()), Arc::new(Config::default()));

        let tree = TreeBuilder::new(&session).hierarchy(&[top, left, right, bottom]);
        assert_eq!(tree.len(), 1);
        fn collect(nodes: &[Arc<NestingNode>], out: &mut Vec<EntityId>) {
            for node in nodes {
                out.push(node.id);
                collect(&node.children, out);
            }
        }
        let mut ids = Vec::new();
        collect(&tree, &mut ids);
        assert_eq!(ids, vec![top, left, bottom, right]);

        // A second, independent build shows D again.
        let again = TreeBuilder::new(&session).hierarchy(&[top]);
        let mut ids = Vec::new();
        collect(&again, &mut ids);
        assert!(ids.contains(&bottom));
    }

    #[test]
    fn test_class_tree_nests_inner_classes() {
        let session = fixture::session();
        let classes: Vec<EntityId> = session
            .model()
            .of_kind(EntityKind::Class)
            .map(|class| class.id())
            .collect();
        let tree = TreeBuilder::new(&session).classes(&classes, true);
        let roots: Vec<EntityId> = tree.iter().map(|node| node.id).collect();
        assert_eq!(roots, vec![fixture::SHAPE, fixture::CIRCLE, fixture::SQUARE]);
        assert_eq!(tree[1].children[0].id, fixture::CENTER);
        assert_eq!(tree[1].children[0].path, "1_0_");
    }

    #[test]
    fn test_namespace_tree_members() {
        let session = fixture::session();
        let tree = TreeBuilder::new(&session)
            .with_members(true)
            .namespaces(&[fixture::GEO], true, true, true);
        assert_eq!(tree.len(), 1);
        let geo = &tree[0];
        // Three linkable classes and one concept.
        assert_eq!(geo.children.len(), 4);
        let members: Vec<EntityId> = geo.members.iter().map(|node| node.id).collect();
        assert_eq!(members, vec![fixture::AREA]);
    }

    #[test]
    fn test_page_tree_skips_main_page() {
        let session = fixture::session();
        let tree = TreeBuilder::new(&session).pages(&[fixture::MAIN_PAGE, fixture::INTRO], true);
        let ids: Vec<EntityId> = tree.iter().map(|node| node.id).collect();
        assert_eq!(ids, vec![fixture::INTRO]);
    }

    #[test]
    fn test_node_context_properties() {
        let session = fixture::session();
        let tree: Arc<[Arc<NestingNode>]> =
            TreeBuilder::new(&session).dirs(&[fixture::DIR], true).into();
        let list = NestingContext::new(Arc::clone(&session), tree);
        let dir = list.at(0);
        assert_eq!(dir.get("id").to_string(), "0_");
        assert_eq!(dir.get("dir").get("name").to_string(), "src");
        assert!(matches!(dir.get("file"), Value::Bool(false)));
        let file = dir.get("children").as_list().unwrap().at(0);
        assert_eq!(file.get("name").to_string(), "shapes.h");
        assert!(file.get("isLeafNode").to_bool());
    }
}
