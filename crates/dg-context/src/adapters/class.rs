use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use dg_model::{ClassData, EntityId, GraphKind, MemberInfo, MemberListKind};

use super::member_lists::{CLASS_LISTS, flat_members, register_member_lists, visible_member_list};
use super::{
    DefinitionAdapter, entity_list, entity_list_or_false, entity_or_false, linkable_list,
    register_definition, register_graph,
};
use crate::info::{
    IncludeInfoContext, MemberInfoContext, argument_list, inheritance_list, inherited_list,
    inherited_members, member_group_list,
};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for classes, structs, unions, interfaces and the like.
pub struct ClassContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl ClassContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a ClassData) -> R) -> Value {
        self.entity()
            .as_class()
            .map_or(Value::None, |data| f(data).into())
    }

    fn title(&self) -> String {
        let entity = self.entity();
        let Some(data) = entity.as_class() else {
            return String::new();
        };
        let mut kind = capitalize(data.compound_type.as_str());
        if data.is_template() {
            kind.push_str(" Template");
        }
        format!("{} {kind} Reference", entity.display_name(true))
    }

    /// Sorted property names.
    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for ClassContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Complete member list including inherited members, cached per class.
///
/// Uses the list supplied with the model when present; otherwise the own
/// summary members followed by the inherited ones.
pub(crate) fn all_members(session: &RenderSession, class: EntityId) -> Arc<[MemberInfo]> {
    session.entity(class).cache().slots().all_members(|| {
        if let Some(data) = session.entity(class).as_class()
            && !data.all_members.is_empty()
        {
            return data.all_members.clone();
        }
        let mut seen = HashSet::new();
        let own = flat_members(session, class).to_vec();
        let inherited = inherited_members(session, class)
            .iter()
            .flat_map(|info| info.members.clone())
            .collect::<Vec<_>>();
        own.into_iter()
            .chain(inherited)
            .filter(|id| seen.insert(*id))
            .filter_map(|id| {
                session.entity(id).as_member().map(|member| MemberInfo {
                    member: id,
                    protection: member.protection,
                    virtualness: member.virtualness,
                    ambiguity_scope: String::new(),
                })
            })
            .collect()
    })
}

static PROPERTIES: LazyLock<PropertyMap<ClassContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("ClassContext");
    register_definition(&mut map);
    register_member_lists(&mut map, CLASS_LISTS);
    register_graph(
        &mut map,
        "hasInheritanceDiagram",
        "inheritanceDiagram",
        GraphKind::Inheritance,
    );
    register_graph(
        &mut map,
        "hasCollaborationDiagram",
        "collaborationDiagram",
        GraphKind::Collaboration,
    );

    map.add("title", |c: &ClassContext| Value::from(c.title()));
    map.add("highlight", |_| Value::from("classes"));
    map.add("subhighlight", |_| Value::from(""));
    map.add("compoundType", |c| c.with(|d| d.compound_type.as_str()));
    map.add("isTemplate", |c| c.with(ClassData::is_template));
    map.add("isAbstract", |c| c.with(|d| d.is_abstract));
    map.add("isFinal", |c| c.with(|d| d.is_final));
    map.add("isSealed", |c| c.with(|d| d.is_sealed));
    map.add("isSimple", |c| c.with(|d| d.is_simple));
    map.add("isLocal", |c| c.with(|d| d.is_local));
    map.add("isEmbeddedInOuterScope", |c| c.with(|d| d.embedded_in_outer_scope));
    map.add("templateDecls", |c| {
        c.with(|d| {
            Value::list(
                d.outer_template_args
                    .iter()
                    .chain(std::iter::once(&d.template_args))
                    .filter(|args| !args.is_empty())
                    .map(|args| argument_list(&c.session, args))
                    .collect(),
            )
        })
    });
    map.add("typeConstraints", |c| {
        c.with(|d| argument_list(&c.session, &d.type_constraints))
    });
    map.add("includeInfo", |c| {
        c.with(|d| {
            d.include.clone().map_or(Value::Bool(false), |info| {
                Value::from_struct(IncludeInfoContext::new(Arc::clone(&c.session), info))
            })
        })
    });
    map.add("inherits", |c| c.with(|d| inheritance_list(&c.session, &d.bases)));
    map.add("inheritedBy", |c| c.with(|d| inheritance_list(&c.session, &d.derived)));
    map.add("classes", |c| c.with(|d| linkable_list(&c.session, &d.inner_classes)));
    map.add("innerClasses", |c| c.with(|d| entity_list(&c.session, &d.inner_classes)));
    map.add("generatedFromFiles", |c| c.with(|d| entity_list(&c.session, &d.files)));
    map.add("examples", |c| c.with(|d| entity_list_or_false(&c.session, &d.examples)));
    map.add("categoryOf", |c| c.with(|d| entity_or_false(&c.session, d.category_of)));
    map.add("templateMaster", |c| {
        c.with(|d| entity_or_false(&c.session, d.template_master))
    });
    map.add("allMembersFileName", |c| {
        Value::from(format!("{}-members", c.entity().output_file))
    });
    map.add("allMembersList", |c| {
        let members = all_members(&c.session, c.id);
        if members.is_empty() {
            return Value::Bool(false);
        }
        Value::list(
            members
                .iter()
                .map(|info| {
                    Value::from_struct(MemberInfoContext::new(Arc::clone(&c.session), info.clone()))
                })
                .collect(),
        )
    });
    map.add("memberGroups", |c| {
        let groups: Vec<_> = c
            .session
            .model()
            .member_groups(c.id)
            .iter()
            .enumerate()
            .collect();
        member_group_list(&c.session, c.id, &groups)
    });
    map.add("additionalInheritedMembers", |c| {
        let extra = inherited_members(&c.session, c.id)
            .iter()
            .filter(|info| visible_member_list(&c.session, c.id, info.kind).is_empty())
            .cloned()
            .collect();
        inherited_list(&c.session, extra)
    });
    map.add("members", |c| entity_list(&c.session, &flat_members(&c.session, c.id)));
    map.add("hasDetailedConstructors", |c| {
        Value::Bool(!visible_member_list(&c.session, c.id, MemberListKind::Constructors).is_empty())
    });
    map
});

impl StructContext for ClassContext {
    fn get(&self, name: &str) -> Value {
        PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_title_and_relations() {
        let session = fixture::session();
        let circle = ClassContext::new(Arc::clone(&session), fixture::CIRCLE);
        assert_eq!(circle.get("title").to_string(), "geo::Circle Class Reference");
        assert_eq!(circle.get("inherits").to_int(), 1);
        assert!(matches!(circle.get("inheritedBy"), Value::Bool(false)));
        assert_eq!(
            circle.get("inherits").as_list().unwrap().at(0).get("name").to_string(),
            "geo::Shape"
        );

        let shape = ClassContext::new(session, fixture::SHAPE);
        assert_eq!(shape.get("inheritedBy").to_int(), 2);
    }

    #[test]
    fn test_member_list_property() {
        let session = fixture::session();
        let circle = ClassContext::new(session, fixture::CIRCLE);
        let methods = circle.get("publicMethods");
        assert_eq!(methods.get("title").to_string(), "Public Member Functions");
        assert_eq!(methods.get("members").to_int(), 1);
        assert!(matches!(circle.get("privateSlots"), Value::Bool(false)));
    }

    #[test]
    fn test_all_members_include_inherited() {
        let session = fixture::session();
        let members = all_members(&session, fixture::CIRCLE);
        let ids: Vec<EntityId> = members.iter().map(|info| info.member).collect();
        assert_eq!(ids, vec![fixture::CIRCLE_DRAW, fixture::RADIUS, fixture::DRAW]);
    }

    #[test]
    fn test_additional_inherited_members_only_for_missing_kinds() {
        let session = fixture::session();
        let square = ClassContext::new(Arc::clone(&session), fixture::SQUARE);
        assert_eq!(square.get("additionalInheritedMembers").to_int(), 1);
        let circle = ClassContext::new(session, fixture::CIRCLE);
        assert!(matches!(circle.get("additionalInheritedMembers"), Value::Bool(false)));
    }

    #[test]
    fn test_inheritance_diagram_consumes_section_id() {
        let session = fixture::session();
        session.begin_run();
        let circle = ClassContext::new(Arc::clone(&session), fixture::CIRCLE);
        assert!(circle.get("hasInheritanceDiagram").to_bool());
        assert_eq!(session.current_section_id(), 0);
        let diagram = circle.get("inheritanceDiagram").to_string();
        assert!(diagram.contains("dynsection-0"), "{diagram}");
        assert_eq!(session.current_section_id(), 1);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("struct"), "Struct");
        assert_eq!(capitalize(""), "");
    }
}
