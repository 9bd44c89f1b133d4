//! Diagram graph descriptions built from model relations.
//!
//! A [`DiagramGraph`] is the layout-independent description of one diagram:
//! the nodes reachable from a root entity through one relation, plus the
//! edges between them. Layout engines turn it into a renderable fragment.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::data::Protection;
use crate::entity::{Entity, EntityData, EntityId};
use crate::model::EntityModel;

/// Kind of diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GraphKind {
    /// Base and derived classes of a class.
    Inheritance,
    /// Bases and used classes of a class.
    Collaboration,
    /// Files included by a file.
    Include,
    /// Files including a file.
    IncludedBy,
    /// Functions called by a function.
    Call,
    /// Functions calling a function.
    Caller,
    /// Contents of a module.
    GroupCollaboration,
    /// Directories a directory depends on.
    DirDependency,
}

impl GraphKind {
    /// Number of graph kinds.
    pub const COUNT: usize = 8;

    /// Position of this kind in cache arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used in generated file names and anchors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inheritance => "inherit",
            Self::Collaboration => "coll",
            Self::Include => "incl",
            Self::IncludedBy => "dep",
            Self::Call => "cgraph",
            Self::Caller => "icgraph",
            Self::GroupCollaboration => "group",
            Self::DirDependency => "dir",
        }
    }
}

/// Visual style of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeStyle {
    PublicInheritance,
    ProtectedInheritance,
    PrivateInheritance,
    Usage,
    Include,
    Call,
    Membership,
    Dependency,
}

impl EdgeStyle {
    fn inheritance(protection: Protection) -> Self {
        match protection {
            Protection::Public | Protection::Package => Self::PublicInheritance,
            Protection::Protected => Self::ProtectedInheritance,
            Protection::Private => Self::PrivateInheritance,
        }
    }
}

/// One node of a diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub entity: EntityId,
    pub label: String,
    /// Output file (and anchor) to link the node to; empty when not linkable.
    pub url: String,
    pub is_root: bool,
}

/// Directed edge between two nodes, by node index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: usize,
    pub to: usize,
    pub style: EdgeStyle,
    pub labels: Vec<String>,
}

/// Limits applied while collecting nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphLimits {
    /// Maximum distance from the root; 0 means unlimited.
    pub max_depth: usize,
    /// Collection stops once this many nodes were added.
    pub max_nodes: usize,
}

impl Default for GraphLimits {
    fn default() -> Self {
        Self {
            max_depth: 0,
            max_nodes: 50,
        }
    }
}

/// Layout-independent description of a diagram.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramGraph {
    pub kind: GraphKind,
    pub root: EntityId,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Nodes were dropped because of [`GraphLimits::max_nodes`].
    pub truncated: bool,
}

impl DiagramGraph {
    /// Build the graph of `kind` rooted at `root`.
    ///
    /// Kinds that don't apply to the root's entity kind yield a graph with
    /// just the root node, which is always trivial.
    #[must_use]
    pub fn build(model: &EntityModel, root: EntityId, kind: GraphKind, limits: GraphLimits) -> Self {
        let mut builder = GraphBuilder::new(model, root, kind, limits);
        match kind {
            GraphKind::Inheritance => {
                builder.walk(|e| bases(e, false));
                builder.walk_reverse(|e| bases(e, true));
            }
            GraphKind::Collaboration => builder.walk(collaborators),
            GraphKind::Include => builder.walk(|e| includes(e, false)),
            GraphKind::IncludedBy => builder.walk_reverse(|e| includes(e, true)),
            GraphKind::Call => builder.walk(|e| calls(e, false)),
            GraphKind::Caller => builder.walk_reverse(|e| calls(e, true)),
            GraphKind::GroupCollaboration => builder.group(),
            GraphKind::DirDependency => builder.dir_dependencies(),
        }
        builder.finish()
    }

    /// Whether the diagram shows nothing beyond the root.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        match self.kind {
            GraphKind::GroupCollaboration => self.nodes.len() <= 1,
            GraphKind::DirDependency => !self
                .edges
                .iter()
                .any(|edge| edge.style == EdgeStyle::Dependency),
            GraphKind::Inheritance
            | GraphKind::Collaboration
            | GraphKind::Include
            | GraphKind::IncludedBy
            | GraphKind::Call
            | GraphKind::Caller => self.edges.is_empty(),
        }
    }

    /// Whether the diagram has too many nodes to be drawn.
    #[must_use]
    pub fn is_too_big(&self, max_nodes: usize) -> bool {
        self.truncated || self.nodes.len() >= max_nodes
    }
}

type Neighbors = Vec<(EntityId, EdgeStyle, Vec<String>)>;

fn bases(entity: &Entity, derived: bool) -> Neighbors {
    let Some(class) = entity.as_class() else {
        return Vec::new();
    };
    let relations = if derived { &class.derived } else { &class.bases };
    relations
        .iter()
        .map(|base| {
            let labels = if base.template_specifiers.is_empty() {
                Vec::new()
            } else {
                vec![base.template_specifiers.clone()]
            };
            (base.class, EdgeStyle::inheritance(base.protection), labels)
        })
        .collect()
}

fn collaborators(entity: &Entity) -> Neighbors {
    let mut neighbors = bases(entity, false);
    if let Some(class) = entity.as_class() {
        neighbors.extend(
            class
                .usages
                .iter()
                .map(|usage| (usage.class, EdgeStyle::Usage, usage.via.clone())),
        );
    }
    neighbors
}

fn includes(entity: &Entity, reverse: bool) -> Neighbors {
    let Some(file) = entity.as_file() else {
        return Vec::new();
    };
    let list = if reverse { &file.included_by } else { &file.includes };
    list.iter()
        .filter_map(|include| include.file)
        .map(|id| (id, EdgeStyle::Include, Vec::new()))
        .collect()
}

fn calls(entity: &Entity, reverse: bool) -> Neighbors {
    let Some(member) = entity.as_member() else {
        return Vec::new();
    };
    let list = if reverse {
        &member.referenced_by
    } else {
        &member.references
    };
    list.iter()
        .map(|id| (*id, EdgeStyle::Call, Vec::new()))
        .collect()
}

struct GraphBuilder<'a> {
    model: &'a EntityModel,
    root: EntityId,
    kind: GraphKind,
    limits: GraphLimits,
    nodes: Vec<GraphNode>,
    index: HashMap<EntityId, usize>,
    edges: Vec<GraphEdge>,
    truncated: bool,
}

impl<'a> GraphBuilder<'a> {
    fn new(model: &'a EntityModel, root: EntityId, kind: GraphKind, limits: GraphLimits) -> Self {
        let mut builder = Self {
            model,
            root,
            kind,
            limits,
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            truncated: false,
        };
        builder.node(root);
        builder
    }

    /// Index of the node for `id`, adding it if the node limit allows.
    fn node(&mut self, id: EntityId) -> Option<usize> {
        if let Some(&idx) = self.index.get(&id) {
            return Some(idx);
        }
        if !self.nodes.is_empty() && self.nodes.len() >= self.limits.max_nodes {
            self.truncated = true;
            return None;
        }
        let entity = self.model.get(id);
        let url = if entity.is_linkable() {
            node_url(entity)
        } else {
            String::new()
        };
        let label = match &entity.data {
            EntityData::File(file) => file.file_name().to_owned(),
            EntityData::Dir(dir) => dir.path.clone(),
            EntityData::Module(module) if !module.title.is_empty() => module.title.clone(),
            _ => entity.display_name(true),
        };
        let idx = self.nodes.len();
        self.nodes.push(GraphNode {
            entity: id,
            label,
            url,
            is_root: id == self.root,
        });
        self.index.insert(id, idx);
        Some(idx)
    }

    fn edge(&mut self, from: usize, to: usize, style: EdgeStyle, labels: Vec<String>) {
        let exists = self
            .edges
            .iter()
            .any(|edge| edge.from == from && edge.to == to && edge.style == style);
        if !exists {
            self.edges.push(GraphEdge {
                from,
                to,
                style,
                labels,
            });
        }
    }

    fn within_depth(&self, depth: usize) -> bool {
        self.limits.max_depth == 0 || depth < self.limits.max_depth
    }

    /// Breadth-first walk with edges pointing from the visited node to its neighbors.
    fn walk(&mut self, neighbors: impl Fn(&Entity) -> Neighbors) {
        self.bfs(neighbors, false);
    }

    /// Breadth-first walk with edges pointing from neighbors to the visited node.
    fn walk_reverse(&mut self, neighbors: impl Fn(&Entity) -> Neighbors) {
        self.bfs(neighbors, true);
    }

    fn bfs(&mut self, neighbors: impl Fn(&Entity) -> Neighbors, reverse: bool) {
        let mut queue = VecDeque::from([(self.root, 0_usize)]);
        let mut seen = vec![self.root];
        while let Some((id, depth)) = queue.pop_front() {
            if !self.within_depth(depth) {
                continue;
            }
            let Some(from) = self.index.get(&id).copied() else {
                continue;
            };
            for (next, style, labels) in neighbors(self.model.get(id)) {
                let Some(to) = self.node(next) else {
                    continue;
                };
                if reverse {
                    self.edge(to, from, style, labels);
                } else {
                    self.edge(from, to, style, labels);
                }
                if !seen.contains(&next) {
                    seen.push(next);
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }

    fn group(&mut self) {
        let model = self.model;
        let root = model.get(self.root);
        let Some(module) = root.as_module() else {
            return;
        };
        let Some(root_idx) = self.index.get(&self.root).copied() else {
            return;
        };
        for parent in &root.groups {
            if let Some(idx) = self.node(*parent) {
                self.edge(idx, root_idx, EdgeStyle::Membership, Vec::new());
            }
        }
        let contents = module
            .subgroups
            .iter()
            .chain(&module.classes)
            .chain(&module.namespaces)
            .chain(&module.concepts)
            .chain(&module.files)
            .chain(&module.dirs)
            .chain(&module.pages)
            .chain(&module.examples)
            .chain(module.member_lists.iter().flat_map(|(_, members)| members));
        for id in contents {
            if let Some(idx) = self.node(*id) {
                self.edge(root_idx, idx, EdgeStyle::Membership, Vec::new());
            }
        }
    }

    fn dir_dependencies(&mut self) {
        let model = self.model;
        let Some(dir) = model.get(self.root).as_dir() else {
            return;
        };
        let Some(root_idx) = self.index.get(&self.root).copied() else {
            return;
        };
        let mut sources = vec![(self.root, root_idx)];
        for sub in &dir.subdirs {
            if let Some(idx) = self.node(*sub) {
                self.edge(root_idx, idx, EdgeStyle::Membership, Vec::new());
                sources.push((*sub, idx));
            }
        }
        for (source, from) in sources {
            let Some(source_dir) = model.get(source).as_dir() else {
                continue;
            };
            for dependency in &source_dir.uses {
                if let Some(to) = self.node(dependency.dir) {
                    let label = dependency.files.len().to_string();
                    self.edge(from, to, EdgeStyle::Dependency, vec![label]);
                }
            }
        }
    }

    fn finish(self) -> DiagramGraph {
        DiagramGraph {
            kind: self.kind,
            root: self.root,
            nodes: self.nodes,
            edges: self.edges,
            truncated: self.truncated,
        }
    }
}

fn node_url(entity: &Entity) -> String {
    if entity.anchor.is_empty() {
        entity.output_file.clone()
    } else {
        format!("{}#{}", entity.output_file, entity.anchor)
    }
}

impl EntityModel {
    /// Cached diagram graph of `kind` for an entity.
    ///
    /// The graph is built on first request and reused until the render
    /// caches are cleared.
    #[must_use]
    pub fn graph(&self, id: EntityId, kind: GraphKind, limits: GraphLimits) -> Arc<DiagramGraph> {
        self.get(id)
            .cache()
            .slots()
            .graph(kind, || DiagramGraph::build(self, id, kind, limits))
    }
}
