//! Entity adapters.
//!
//! Every adapter is a small handle (`session` + entity id) implementing
//! [`StructContext`] through a static per-type [`PropertyMap`]. Properties
//! shared by all kinds live in [`register_definition`]; each kind adds its
//! own on top.

mod class;
mod concept;
mod dir;
mod file;
mod member;
mod member_lists;
mod module;
mod namespace;
mod page;

use std::sync::Arc;

use dg_model::{Entity, EntityData, EntityId, EntityKind, GraphKind, RenderedField};

pub use self::class::ClassContext;
pub use self::concept::ConceptContext;
pub use self::dir::DirContext;
pub use self::file::FileContext;
pub use self::member::MemberContext;
pub(crate) use self::member_lists::{flat_members, visible_member_list};
pub use self::module::ModuleContext;
pub use self::namespace::NamespaceContext;
pub use self::page::PageContext;
use crate::info::{NavPathElemContext, SourceLinkContext};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::Value;

/// Adapter wrapping one entity.
pub(crate) trait DefinitionAdapter: Send + Sync + 'static {
    fn session(&self) -> &Arc<RenderSession>;

    fn id(&self) -> EntityId;

    fn entity(&self) -> &Entity {
        self.session().entity(self.id())
    }
}

/// Adapter value for an entity of any kind.
pub fn entity_value(session: &Arc<RenderSession>, id: EntityId) -> Value {
    let kind = session.entity(id).kind();
    let session = Arc::clone(session);
    match kind {
        EntityKind::Class => Value::from_struct(ClassContext::new(session, id)),
        EntityKind::Namespace => Value::from_struct(NamespaceContext::new(session, id)),
        EntityKind::File => Value::from_struct(FileContext::new(session, id)),
        EntityKind::Dir => Value::from_struct(DirContext::new(session, id)),
        EntityKind::Page => Value::from_struct(PageContext::new(session, id)),
        EntityKind::Member => Value::from_struct(MemberContext::new(session, id)),
        EntityKind::Concept => Value::from_struct(ConceptContext::new(session, id)),
        EntityKind::Module => Value::from_struct(ModuleContext::new(session, id)),
    }
}

/// List of entity adapters.
pub(crate) fn entity_list(session: &Arc<RenderSession>, ids: &[EntityId]) -> Value {
    Value::list(ids.iter().map(|&id| entity_value(session, id)).collect())
}

/// List of entity adapters, or `false` when there are none.
pub(crate) fn entity_list_or_false(session: &Arc<RenderSession>, ids: &[EntityId]) -> Value {
    if ids.is_empty() {
        Value::Bool(false)
    } else {
        entity_list(session, ids)
    }
}

/// Linkable entities only, as a list.
pub(crate) fn linkable_list(session: &Arc<RenderSession>, ids: &[EntityId]) -> Value {
    let linkable: Vec<EntityId> = ids
        .iter()
        .copied()
        .filter(|&id| session.entity(id).is_linkable())
        .collect();
    entity_list(session, &linkable)
}

/// Entity adapter, or `false` when absent.
pub(crate) fn entity_or_false(session: &Arc<RenderSession>, id: Option<EntityId>) -> Value {
    id.map_or(Value::Bool(false), |id| entity_value(session, id))
}

/// Tag naming the kind of compound an entity is.
pub(crate) fn compound_kind(entity: &Entity) -> &'static str {
    match &entity.data {
        EntityData::Class(class) => class.compound_type.as_str(),
        EntityData::Namespace(namespace) => {
            if namespace.is_package {
                "package"
            } else {
                "namespace"
            }
        }
        EntityData::File(_) => "file",
        EntityData::Dir(_) => "dir",
        EntityData::Page(_) => "page",
        EntityData::Member(member) => member.member_type.as_str(),
        EntityData::Concept(_) => "concept",
        EntityData::Module(_) => "module",
    }
}

/// Root-to-leaf chain of scopes leading to `id`, including `id` itself.
///
/// A file without an outer scope continues through its directory. The model
/// builder rejects cyclic parent chains, so the walk terminates.
pub(crate) fn navigation_path(session: &RenderSession, id: EntityId) -> Arc<[EntityId]> {
    let model = session.model();
    model.get(id).cache().slots().navigation_path(|| {
        let mut path = vec![id];
        let mut current = model.get(id);
        while let Some(next) = current.parent_scope() {
            path.push(next);
            current = model.get(next);
        }
        path.reverse();
        path
    })
}

/// Output file of the highlighted source an entity is defined in.
pub(crate) fn source_file_name(session: &RenderSession, entity: &Entity) -> String {
    let file = if entity.as_file().is_some() {
        Some(entity)
    } else {
        entity.body.map(|body| session.entity(body.file))
    };
    file.map_or_else(String::new, |file| format!("{}_source", file.output_file))
}

/// Properties shared by every entity adapter.
pub(crate) fn register_definition<T: DefinitionAdapter>(map: &mut PropertyMap<T>) {
    map.add("name", |a: &T| Value::from(a.entity().display_name(true)));
    map.add("bareName", |a: &T| Value::from(a.entity().display_name(false)));
    map.add("relPath", |a: &T| Value::from(a.session().rel_path()));
    map.add("fileName", |a: &T| Value::from(a.entity().output_file.as_str()));
    map.add("anchor", |a: &T| Value::from(a.entity().anchor.as_str()));
    map.add("kind", |a: &T| Value::from(a.entity().kind().as_str()));
    map.add("compoundKind", |a: &T| Value::from(compound_kind(a.entity())));
    map.add("language", |a: &T| Value::from(a.entity().language.as_str()));
    map.add("brief", |a: &T| {
        Value::from(a.session().rendered_doc(a.id(), RenderedField::Brief))
    });
    map.add("details", |a: &T| {
        Value::from(a.session().rendered_doc(a.id(), RenderedField::Details))
    });
    map.add("inbodyDocs", |a: &T| {
        Value::from(a.session().rendered_doc(a.id(), RenderedField::InbodyDocs))
    });
    map.add("hasDetails", |a: &T| Value::Bool(!a.entity().details.is_empty()));
    map.add("hasBrief", |a: &T| Value::Bool(!a.entity().brief.is_empty()));
    map.add("isLinkable", |a: &T| Value::Bool(a.entity().is_linkable()));
    map.add("isLinkableInProject", |a: &T| {
        Value::Bool(a.entity().is_linkable_in_project())
    });
    map.add("isReference", |a: &T| Value::Bool(a.entity().is_reference()));
    map.add("externalReference", |a: &T| {
        Value::from(a.entity().external.as_deref().unwrap_or_default())
    });
    map.add("isAnonymous", |a: &T| Value::Bool(a.entity().flags.anonymous));
    map.add("isArtificial", |a: &T| Value::Bool(a.entity().flags.artificial));
    map.add("dynSectionId", |a: &T| Value::from(a.session().current_section_id()));
    map.add("sourceFileName", |a: &T| {
        Value::from(source_file_name(a.session(), a.entity()))
    });
    map.add("hasSources", |a: &T| {
        let entity = a.entity();
        Value::Bool(
            a.session().config().source.browser
                && (entity.body.is_some()
                    || entity.as_file().is_some_and(|file| file.source.is_some())),
        )
    });
    map.add("sourceCode", |a: &T| {
        if a.session().config().source.inline_sources {
            Value::from(a.session().rendered_source(a.id()))
        } else {
            Value::from("")
        }
    });
    map.add("sourceDef", |a: &T| source_definition(a.session(), a.entity()));
    map.add("navigationPath", |a: &T| {
        let session = a.session();
        Value::list(
            navigation_path(session, a.id())
                .iter()
                .map(|&id| Value::from_struct(NavPathElemContext::new(Arc::clone(session), id)))
                .collect(),
        )
    });
    map.add("partOfGroups", |a: &T| entity_list(a.session(), &a.entity().groups));
}

/// Line and file links to an entity's definition, or `false` without one.
fn source_definition(session: &Arc<RenderSession>, entity: &Entity) -> Value {
    let Some(body) = entity.body else {
        return Value::Bool(false);
    };
    if !session.config().source.browser {
        return Value::Bool(false);
    }
    let file = session.entity(body.file);
    let source = format!("{}_source", file.output_file);
    Value::list(vec![
        Value::from_struct(SourceLinkContext::line(&source, body.start_line)),
        Value::from_struct(SourceLinkContext::file(&source, file.display_name(false))),
    ])
}

/// Register `has<Name>` / `<name>` diagram properties backed by `kind`.
pub(crate) fn register_graph<T: DefinitionAdapter>(
    map: &mut PropertyMap<T>,
    has_name: &'static str,
    name: &'static str,
    kind: GraphKind,
) {
    map.add(has_name, move |a: &T| {
        Value::Bool(a.session().has_graph(a.id(), kind))
    });
    map.add(name, move |a: &T| {
        let session = a.session();
        if session.has_graph(a.id(), kind) {
            let title = a.entity().display_name(true);
            Value::from(session.render_graph(a.id(), kind, &title))
        } else {
            Value::from("")
        }
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_navigation_path_goes_through_directories() {
        let session = fixture::session();
        let file = session.model().find("src/shapes.h").unwrap().id();
        let names: Vec<String> = navigation_path(&session, file)
            .iter()
            .map(|&id| session.entity(id).name.clone())
            .collect();
        assert_eq!(names, vec!["src".to_owned(), "src/shapes.h".to_owned()]);
    }

    #[test]
    fn test_navigation_path_of_nested_class() {
        let session = fixture::session();
        let inner = session.model().find("geo::Circle::Center").unwrap().id();
        let names: Vec<String> = navigation_path(&session, inner)
            .iter()
            .map(|&id| session.entity(id).name.clone())
            .collect();
        assert_eq!(names, vec!["geo", "geo::Circle", "geo::Circle::Center"]);
    }

    #[test]
    fn test_navigation_path_terminates_for_every_entity() {
        let session = fixture::session();
        for entity in session.model().entities() {
            let path = navigation_path(&session, entity.id());
            assert!(path.len() <= session.model().len());
            assert_eq!(path.last(), Some(&entity.id()));
        }
    }

    #[test]
    fn test_compound_kind_of_every_kind() {
        let session = fixture::session();
        let kinds: Vec<&str> = ["geo", "geo::Shape", "src/shapes.h", "src", "intro", "shapes"]
            .iter()
            .map(|name| compound_kind(session.model().find(name).unwrap()))
            .collect();
        assert_eq!(kinds, vec!["namespace", "class", "file", "dir", "page", "module"]);
    }
}
