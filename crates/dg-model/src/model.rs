//! The finished entity model.

use std::collections::HashMap;

use crate::data::MemberGroup;
use crate::entity::{Entity, EntityData, EntityId, EntityKind};
use crate::member_list::MemberListKind;

/// Read-only arena of cross-referenced entities.
///
/// Built by [`ModelBuilder`](crate::ModelBuilder). Every id stored in an
/// entity is guaranteed to resolve, and every outer-scope chain ends at a
/// global-scope entity.
#[derive(Debug, Default)]
pub struct EntityModel {
    pub(crate) entities: Vec<Entity>,
    pub(crate) by_name: HashMap<String, EntityId>,
}

impl EntityModel {
    /// Entity with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this model.
    #[must_use]
    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    /// Entity with the given id, if it belongs to this model.
    #[must_use]
    pub fn try_get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// All entities in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities of one kind in insertion order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind() == kind)
    }

    /// Entity by fully qualified name (first one added wins).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    /// Enclosing scope of an entity.
    #[must_use]
    pub fn outer(&self, id: EntityId) -> Option<&Entity> {
        self.get(id).outer.map(|outer| self.get(outer))
    }

    /// Categorized member list of a container; empty for non-containers.
    #[must_use]
    pub fn member_list(&self, id: EntityId, kind: MemberListKind) -> &[EntityId] {
        match &self.get(id).data {
            EntityData::Class(data) => data.member_lists.get(kind),
            EntityData::Namespace(data) => data.member_lists.get(kind),
            EntityData::File(data) => data.member_lists.get(kind),
            EntityData::Module(data) => data.member_lists.get(kind),
            EntityData::Dir(_)
            | EntityData::Page(_)
            | EntityData::Member(_)
            | EntityData::Concept(_) => &[],
        }
    }

    /// User-defined member groups of a container.
    #[must_use]
    pub fn member_groups(&self, id: EntityId) -> &[MemberGroup] {
        match &self.get(id).data {
            EntityData::Class(data) => &data.member_groups,
            EntityData::Namespace(data) => &data.member_groups,
            EntityData::File(data) => &data.member_groups,
            EntityData::Module(data) => &data.member_groups,
            EntityData::Dir(_)
            | EntityData::Page(_)
            | EntityData::Member(_)
            | EntityData::Concept(_) => &[],
        }
    }

    /// The project's main page, if one was written.
    #[must_use]
    pub fn main_page(&self) -> Option<&Entity> {
        self.of_kind(EntityKind::Page)
            .find(|page| page.as_page().is_some_and(|data| data.is_main_page))
    }

    /// Reset every entity's render cache.
    ///
    /// Called at the end of a generation run so a following run in the same
    /// process starts from empty caches.
    pub fn clear_render_caches(&self) {
        for entity in &self.entities {
            entity.cache.clear();
        }
        tracing::debug!(entities = self.entities.len(), "Cleared render caches");
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::builder::ModelBuilder;
    use crate::cache::RenderedField;
    use crate::data::{ClassData, MemberData, MemberType, PageData};
    use crate::format::OutputFormat;

    #[test]
    fn test_member_list_of_class() {
        let mut builder = ModelBuilder::new();
        let class = builder.add(Entity::new("Widget", EntityData::Class(ClassData::default())));
        let method = builder.add(
            Entity::new(
                "Widget::draw",
                EntityData::Member(MemberData::of_type(MemberType::Function)),
            )
            .with_outer(class),
        );
        builder.push_member(class, MemberListKind::PubMethods, method);
        let model = builder.build().unwrap();

        assert_eq!(model.member_list(class, MemberListKind::PubMethods), &[method]);
        assert!(model.member_list(method, MemberListKind::PubMethods).is_empty());
        assert_eq!(model.outer(method).map(Entity::id), Some(class));
    }

    #[test]
    fn test_find_by_qualified_name() {
        let mut builder = ModelBuilder::new();
        let id = builder.add(Entity::new("ns::Widget", EntityData::Class(ClassData::default())));
        let model = builder.build().unwrap();

        assert_eq!(model.find("ns::Widget").map(Entity::id), Some(id));
        assert_eq!(model.get(id).local_name, "Widget");
        assert!(model.find("Widget").is_none());
    }

    #[test]
    fn test_main_page() {
        let mut builder = ModelBuilder::new();
        builder.add(Entity::new("intro", EntityData::Page(PageData::default())));
        let main = builder.add(Entity::new(
            "index",
            EntityData::Page(PageData {
                is_main_page: true,
                ..PageData::default()
            }),
        ));
        let model = builder.build().unwrap();

        assert_eq!(model.main_page().map(Entity::id), Some(main));
    }

    #[test]
    fn test_clear_render_caches_resets_every_entity() {
        let mut builder = ModelBuilder::new();
        let a = builder.add(Entity::new("A", EntityData::Class(ClassData::default())));
        let b = builder.add(Entity::new("B", EntityData::Class(ClassData::default())));
        let model = builder.build().unwrap();
        for id in [a, b] {
            model
                .get(id)
                .cache()
                .slots()
                .rendered(RenderedField::Brief, OutputFormat::Html, String::new);
        }

        model.clear_render_caches();

        for id in [a, b] {
            let slots = model.get(id).cache().slots();
            assert_eq!(slots.cached_rendered(RenderedField::Brief), None);
        }
    }
}
