//! Adapters over relations and record data that are not entities themselves.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use dg_model::{
    Argument, BaseClass, EntityId, IncludeInfo, InheritedMembers, MemberGroup, MemberInfo,
    MemberListKind, Protection,
};

use crate::adapters::{entity_list, entity_or_false, entity_value, visible_member_list};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::titles::member_list_title;
use crate::value::{StructContext, Value};

/// One categorized member list of a class, namespace, file or module.
pub struct MemberListInfoContext {
    session: Arc<RenderSession>,
    owner: EntityId,
    kind: MemberListKind,
    members: Arc<[EntityId]>,
}

impl MemberListInfoContext {
    pub(crate) fn new(
        session: Arc<RenderSession>,
        owner: EntityId,
        kind: MemberListKind,
        members: Arc<[EntityId]>,
    ) -> Self {
        Self {
            session,
            owner,
            kind,
            members,
        }
    }

    fn title(&self) -> &'static str {
        let owner = self.session.entity(self.owner);
        member_list_title(self.kind, self.session.title_mode(owner))
    }

    pub fn property_names() -> Vec<&'static str> {
        MEMBER_LIST_PROPERTIES.fields()
    }
}

static MEMBER_LIST_PROPERTIES: LazyLock<PropertyMap<MemberListInfoContext>> =
    LazyLock::new(|| {
        let mut map = PropertyMap::new("MemberListInfoContext");
        map.add("title", |c: &MemberListInfoContext| Value::from(c.title()));
        map.add("subtitle", |_| Value::from(""));
        map.add("anchor", |c| Value::from(c.kind.anchor()));
        map.add("isDetailed", |c| Value::Bool(c.kind.is_detailed()));
        map.add("members", |c| entity_list(&c.session, &c.members));
        map.add("memberGroups", |c| {
            let groups: Vec<(usize, &MemberGroup)> = c
                .session
                .model()
                .member_groups(c.owner)
                .iter()
                .enumerate()
                .filter(|(_, group)| group.members.iter().any(|m| c.members.contains(m)))
                .collect();
            member_group_list(&c.session, c.owner, &groups)
        });
        map.add("inherited", |c| {
            if c.kind.is_detailed() || c.session.entity(c.owner).as_class().is_none() {
                return Value::Bool(false);
            }
            let inherited: Vec<InheritedMembers> = inherited_members(&c.session, c.owner)
                .iter()
                .filter(|info| info.kind == c.kind)
                .cloned()
                .collect();
            inherited_list(&c.session, inherited)
        });
        map
    });

impl StructContext for MemberListInfoContext {
    fn get(&self, name: &str) -> Value {
        MEMBER_LIST_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        MEMBER_LIST_PROPERTIES.fields()
    }
}

const fn is_private_list(kind: MemberListKind) -> bool {
    matches!(
        kind,
        MemberListKind::PriTypes
            | MemberListKind::PriMethods
            | MemberListKind::PriStaticMethods
            | MemberListKind::PriAttribs
            | MemberListKind::PriStaticAttribs
            | MemberListKind::PriSlots
    )
}

/// Non-private members a class inherits, grouped by list kind and base class.
///
/// Bases are visited depth first; a base reachable through several paths is
/// reported once. Privately inherited bases contribute nothing.
pub(crate) fn inherited_members(session: &RenderSession, class: EntityId) -> Arc<[InheritedMembers]> {
    fn collect(
        session: &RenderSession,
        class: EntityId,
        visited: &mut HashSet<EntityId>,
        out: &mut Vec<InheritedMembers>,
    ) {
        let Some(data) = session.entity(class).as_class() else {
            return;
        };
        for base in &data.bases {
            if base.protection == Protection::Private || !visited.insert(base.class) {
                continue;
            }
            for kind in MemberListKind::CLASS_SUMMARY {
                if is_private_list(kind) {
                    continue;
                }
                let members = visible_member_list(session, base.class, kind);
                if !members.is_empty() {
                    out.push(InheritedMembers {
                        kind,
                        from: base.class,
                        members: members.to_vec(),
                    });
                }
            }
            collect(session, base.class, visited, out);
        }
    }

    session.entity(class).cache().slots().inherited_members(|| {
        let mut visited = HashSet::from([class]);
        let mut out = Vec::new();
        collect(session, class, &mut visited, &mut out);
        out
    })
}

/// List of inherited member groups, or `false` when empty.
pub(crate) fn inherited_list(session: &Arc<RenderSession>, infos: Vec<InheritedMembers>) -> Value {
    if infos.is_empty() {
        return Value::Bool(false);
    }
    Value::list(
        infos
            .into_iter()
            .map(|info| {
                Value::from_struct(InheritedMemberInfoContext {
                    session: Arc::clone(session),
                    info,
                })
            })
            .collect(),
    )
}

/// Members of one list kind inherited from one base class.
pub struct InheritedMemberInfoContext {
    session: Arc<RenderSession>,
    info: InheritedMembers,
}

impl InheritedMemberInfoContext {
    pub fn property_names() -> Vec<&'static str> {
        INHERITED_PROPERTIES.fields()
    }
}

static INHERITED_PROPERTIES: LazyLock<PropertyMap<InheritedMemberInfoContext>> =
    LazyLock::new(|| {
        let mut map = PropertyMap::new("InheritedMemberInfoContext");
        map.add("from", |c: &InheritedMemberInfoContext| {
            entity_value(&c.session, c.info.from)
        });
        map.add("title", |c| {
            let from = c.session.entity(c.info.from);
            let title = member_list_title(c.info.kind, c.session.title_mode(from));
            Value::from(format!("{title} inherited from {}", from.display_name(true)))
        });
        map.add("id", |c| {
            let from = c.session.entity(c.info.from);
            Value::from(format!("{}_{}", c.info.kind.anchor(), from.output_file))
        });
        map.add("members", |c| entity_list(&c.session, &c.info.members));
        map.add("inheritedFrom", |c| entity_value(&c.session, c.info.from));
        map
    });

impl StructContext for InheritedMemberInfoContext {
    fn get(&self, name: &str) -> Value {
        INHERITED_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        INHERITED_PROPERTIES.fields()
    }
}

/// Entry of a class's complete member list.
pub struct MemberInfoContext {
    session: Arc<RenderSession>,
    info: MemberInfo,
}

impl MemberInfoContext {
    pub(crate) fn new(session: Arc<RenderSession>, info: MemberInfo) -> Self {
        Self { session, info }
    }

    pub fn property_names() -> Vec<&'static str> {
        MEMBER_INFO_PROPERTIES.fields()
    }
}

static MEMBER_INFO_PROPERTIES: LazyLock<PropertyMap<MemberInfoContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("MemberInfoContext");
    map.add("protection", |c: &MemberInfoContext| {
        Value::from(c.info.protection.as_str())
    });
    map.add("virtualness", |c| Value::from(c.info.virtualness.as_str()));
    map.add("ambiguityScope", |c| Value::from(c.info.ambiguity_scope.as_str()));
    map.add("member", |c| entity_value(&c.session, c.info.member));
    map
});

impl StructContext for MemberInfoContext {
    fn get(&self, name: &str) -> Value {
        MEMBER_INFO_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        MEMBER_INFO_PROPERTIES.fields()
    }
}

/// List of member groups, each paired with its index within the owner.
pub(crate) fn member_group_list(
    session: &Arc<RenderSession>,
    owner: EntityId,
    groups: &[(usize, &MemberGroup)],
) -> Value {
    Value::list(
        groups
            .iter()
            .map(|&(index, group)| {
                Value::from_struct(MemberGroupInfoContext {
                    session: Arc::clone(session),
                    owner,
                    index,
                    group: group.clone(),
                })
            })
            .collect(),
    )
}

/// User-defined group of members.
pub struct MemberGroupInfoContext {
    session: Arc<RenderSession>,
    owner: EntityId,
    index: usize,
    group: MemberGroup,
}

impl MemberGroupInfoContext {
    pub fn property_names() -> Vec<&'static str> {
        MEMBER_GROUP_PROPERTIES.fields()
    }
}

static MEMBER_GROUP_PROPERTIES: LazyLock<PropertyMap<MemberGroupInfoContext>> =
    LazyLock::new(|| {
        let mut map = PropertyMap::new("MemberGroupInfoContext");
        map.add("header", |c: &MemberGroupInfoContext| {
            Value::from(c.group.header.as_str())
        });
        map.add("groupId", |c| {
            let owner = c.session.entity(c.owner);
            Value::from(format!("{}_{}", owner.output_file, c.index))
        });
        map.add("anchor", |c| Value::from(format!("amgrp{}", c.index)));
        map.add("subtitle", |_| Value::from(""));
        map.add("docs", |c| {
            Value::from(
                c.session
                    .render_doc_text(&c.group.doc, false, c.session.rel_path()),
            )
        });
        map.add("members", |c| entity_list(&c.session, &c.group.members));
        map.add("inherited", |_| Value::Bool(false));
        map
    });

impl StructContext for MemberGroupInfoContext {
    fn get(&self, name: &str) -> Value {
        MEMBER_GROUP_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        MEMBER_GROUP_PROPERTIES.fields()
    }
}

/// Include statement of a file, class or concept.
pub struct IncludeInfoContext {
    session: Arc<RenderSession>,
    info: IncludeInfo,
}

impl IncludeInfoContext {
    pub(crate) fn new(session: Arc<RenderSession>, info: IncludeInfo) -> Self {
        Self { session, info }
    }

    pub fn property_names() -> Vec<&'static str> {
        INCLUDE_PROPERTIES.fields()
    }
}

static INCLUDE_PROPERTIES: LazyLock<PropertyMap<IncludeInfoContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("IncludeInfoContext");
    map.add("file", |c: &IncludeInfoContext| {
        entity_or_false(&c.session, c.info.file)
    });
    map.add("name", |c| Value::from(c.info.name.as_str()));
    map.add("isLocal", |c| Value::Bool(c.info.local));
    map.add("isImport", |c| Value::Bool(c.info.imported));
    map
});

impl StructContext for IncludeInfoContext {
    fn get(&self, name: &str) -> Value {
        INCLUDE_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        INCLUDE_PROPERTIES.fields()
    }
}

/// List of include statements, or `false` when empty.
pub(crate) fn include_list(session: &Arc<RenderSession>, includes: &[IncludeInfo]) -> Value {
    if includes.is_empty() {
        return Value::Bool(false);
    }
    Value::list(
        includes
            .iter()
            .map(|info| {
                Value::from_struct(IncludeInfoContext::new(Arc::clone(session), info.clone()))
            })
            .collect(),
    )
}

/// Base or derived class relation.
pub struct InheritanceNodeContext {
    session: Arc<RenderSession>,
    relation: BaseClass,
}

impl InheritanceNodeContext {
    pub fn property_names() -> Vec<&'static str> {
        INHERITANCE_PROPERTIES.fields()
    }
}

static INHERITANCE_PROPERTIES: LazyLock<PropertyMap<InheritanceNodeContext>> =
    LazyLock::new(|| {
        let mut map = PropertyMap::new("InheritanceNodeContext");
        map.add("class", |c: &InheritanceNodeContext| {
            entity_value(&c.session, c.relation.class)
        });
        map.add("name", |c| {
            let name = c.session.entity(c.relation.class).display_name(true);
            Value::from(format!("{name}{}", c.relation.template_specifiers))
        });
        map.add("protection", |c| Value::from(c.relation.protection.as_str()));
        map.add("virtualness", |c| Value::from(c.relation.virtualness.as_str()));
        map
    });

impl StructContext for InheritanceNodeContext {
    fn get(&self, name: &str) -> Value {
        INHERITANCE_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        INHERITANCE_PROPERTIES.fields()
    }
}

/// List of inheritance relations, or `false` when empty.
pub(crate) fn inheritance_list(session: &Arc<RenderSession>, relations: &[BaseClass]) -> Value {
    if relations.is_empty() {
        return Value::Bool(false);
    }
    Value::list(
        relations
            .iter()
            .map(|relation| {
                Value::from_struct(InheritanceNodeContext {
                    session: Arc::clone(session),
                    relation: relation.clone(),
                })
            })
            .collect(),
    )
}

/// Function argument or template parameter.
pub struct ArgumentContext {
    session: Arc<RenderSession>,
    argument: Argument,
}

impl ArgumentContext {
    pub fn property_names() -> Vec<&'static str> {
        ARGUMENT_PROPERTIES.fields()
    }
}

static ARGUMENT_PROPERTIES: LazyLock<PropertyMap<ArgumentContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("ArgumentContext");
    map.add("type", |c: &ArgumentContext| Value::from(c.argument.type_.as_str()));
    map.add("name", |c| Value::from(c.argument.name.as_str()));
    map.add("namePart", |c| Value::from(c.argument.name_part()));
    map.add("defVal", |c| Value::from(c.argument.default_value.as_str()));
    map.add("array", |c| Value::from(c.argument.array.as_str()));
    map.add("attrib", |c| Value::from(c.argument.attrib.as_str()));
    map.add("docs", |c| {
        Value::from(
            c.session
                .render_doc_text(&c.argument.docs, false, c.session.rel_path()),
        )
    });
    map
});

impl StructContext for ArgumentContext {
    fn get(&self, name: &str) -> Value {
        ARGUMENT_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        ARGUMENT_PROPERTIES.fields()
    }
}

/// List of arguments; empty lists stay lists.
pub(crate) fn argument_list(session: &Arc<RenderSession>, arguments: &[Argument]) -> Value {
    Value::list(
        arguments
            .iter()
            .map(|argument| {
                Value::from_struct(ArgumentContext {
                    session: Arc::clone(session),
                    argument: argument.clone(),
                })
            })
            .collect(),
    )
}

/// One step of a breadcrumb trail.
pub struct NavPathElemContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl NavPathElemContext {
    pub(crate) fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn text(&self) -> String {
        let entity = self.session.entity(self.id);
        match (entity.as_page(), entity.as_module()) {
            (Some(page), _) if !page.title.is_empty() => page.title.clone(),
            (_, Some(module)) if !module.title.is_empty() => module.title.clone(),
            _ if entity.as_file().is_some() || entity.as_dir().is_some() => {
                entity.local_name.clone()
            }
            _ => entity.display_name(true),
        }
    }

    pub fn property_names() -> Vec<&'static str> {
        NAV_PATH_PROPERTIES.fields()
    }
}

static NAV_PATH_PROPERTIES: LazyLock<PropertyMap<NavPathElemContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("NavPathElemContext");
    map.add("text", |c: &NavPathElemContext| Value::from(c.text()));
    map.add("isLinkable", |c| {
        Value::Bool(c.session.entity(c.id).is_linkable())
    });
    map.add("fileName", |c| {
        Value::from(c.session.entity(c.id).output_file.as_str())
    });
    map.add("anchor", |c| Value::from(c.session.entity(c.id).anchor.as_str()));
    map.add("kind", |c| Value::from(c.session.entity(c.id).kind().as_str()));
    map.add("isReference", |c| {
        Value::Bool(c.session.entity(c.id).is_reference())
    });
    map.add("externalReference", |c| {
        Value::from(
            c.session
                .entity(c.id)
                .external
                .as_deref()
                .unwrap_or_default(),
        )
    });
    map
});

impl StructContext for NavPathElemContext {
    fn get(&self, name: &str) -> Value {
        NAV_PATH_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        NAV_PATH_PROPERTIES.fields()
    }
}

/// Link into highlighted source: either a line or the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLinkContext {
    text: String,
    line: Option<u32>,
    file_name: String,
}

impl SourceLinkContext {
    pub(crate) fn line(file_name: &str, line: u32) -> Self {
        Self {
            text: line.to_string(),
            line: Some(line),
            file_name: file_name.to_owned(),
        }
    }

    pub(crate) fn file(file_name: &str, text: String) -> Self {
        Self {
            text,
            line: None,
            file_name: file_name.to_owned(),
        }
    }

    fn anchor(&self) -> String {
        self.line.map_or_else(String::new, |line| format!("l{line:05}"))
    }

    pub fn property_names() -> Vec<&'static str> {
        SOURCE_LINK_PROPERTIES.fields()
    }
}

static SOURCE_LINK_PROPERTIES: LazyLock<PropertyMap<SourceLinkContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SourceLinkContext");
    map.add("text", |c: &SourceLinkContext| Value::from(c.text.as_str()));
    map.add("lineNumber", |c| c.line.map_or(Value::Bool(false), Value::from));
    map.add("fileName", |c| Value::from(c.file_name.as_str()));
    map.add("anchor", |c| Value::from(c.anchor()));
    map.add("isLinkable", |_| Value::Bool(true));
    map
});

impl StructContext for SourceLinkContext {
    fn get(&self, name: &str) -> Value {
        SOURCE_LINK_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        SOURCE_LINK_PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_source_link_anchor() {
        let link = SourceLinkContext::line("shapes_8h_source", 42);
        assert_eq!(link.get("anchor").to_string(), "l00042");
        assert_eq!(link.get("text").to_string(), "42");
        let file = SourceLinkContext::file("shapes_8h_source", "shapes.h".to_owned());
        assert!(matches!(file.get("lineNumber"), Value::Bool(false)));
    }

    #[test]
    fn test_inherited_members_skip_private_lists() {
        let session = fixture::session();
        let inherited = inherited_members(&session, fixture::CIRCLE);
        assert_eq!(
            inherited.as_ref(),
            &[InheritedMembers {
                kind: MemberListKind::PubMethods,
                from: fixture::SHAPE,
                members: vec![fixture::DRAW],
            }]
        );
    }

    #[test]
    fn test_member_list_title_uses_language() {
        let session = fixture::session();
        let info = MemberListInfoContext::new(
            Arc::clone(&session),
            fixture::CIRCLE,
            MemberListKind::PubMethods,
            Arc::from(vec![fixture::CIRCLE_DRAW]),
        );
        assert_eq!(info.get("title").to_string(), "Public Member Functions");
        assert_eq!(info.get("anchor").to_string(), "pub-methods");
        assert_eq!(info.get("members").to_int(), 1);
        assert_eq!(info.get("inherited").to_int(), 1);
    }
}
