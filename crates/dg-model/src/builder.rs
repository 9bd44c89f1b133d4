//! Incremental model construction.

use std::collections::HashMap;

use crate::data::{BaseClass, IncludeInfo};
use crate::entity::{Entity, EntityData, EntityId, EntityKind};
use crate::error::ModelError;
use crate::member_list::MemberListKind;
use crate::model::EntityModel;

/// Builder assembling an [`EntityModel`].
///
/// Entities get ids in insertion order. Forward relations (bases, includes,
/// references, reimplements, subpages) are set by the caller; [`build`]
/// validates them and fills the reverse direction.
///
/// [`build`]: ModelBuilder::build
#[derive(Debug, Default)]
pub struct ModelBuilder {
    entities: Vec<Entity>,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, returning its id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` entities are added.
    pub fn add(&mut self, mut entity: Entity) -> EntityId {
        let index = u32::try_from(self.entities.len()).expect("entity count exceeds u32");
        let id = EntityId::new(index);
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Mutable access to an already added entity.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this builder.
    pub fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.entities[id.index()]
    }

    /// Append a member to a categorized list of a container.
    ///
    /// Ignored when `container` is not a class, namespace, file or module.
    pub fn push_member(&mut self, container: EntityId, kind: MemberListKind, member: EntityId) {
        let lists = match &mut self.entity_mut(container).data {
            EntityData::Class(data) => &mut data.member_lists,
            EntityData::Namespace(data) => &mut data.member_lists,
            EntityData::File(data) => &mut data.member_lists,
            EntityData::Module(data) => &mut data.member_lists,
            EntityData::Dir(_)
            | EntityData::Page(_)
            | EntityData::Member(_)
            | EntityData::Concept(_) => return,
        };
        lists.push(kind, member);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Validate references and produce the finished model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DanglingReference`] for ids outside the model,
    /// [`ModelError::KindMismatch`] for relations pointing at the wrong kind
    /// of entity and [`ModelError::CyclicScope`] when a parent-scope chain
    /// (outer scopes, and a file's directory) loops.
    pub fn build(mut self) -> Result<EntityModel, ModelError> {
        self.validate_references()?;
        self.validate_scopes()?;
        self.fill_local_names();
        self.fill_reverse_relations();

        let mut by_name = HashMap::with_capacity(self.entities.len());
        for entity in &self.entities {
            by_name.entry(entity.name.clone()).or_insert(entity.id);
        }
        Ok(EntityModel {
            entities: self.entities,
            by_name,
        })
    }

    fn validate_references(&self) -> Result<(), ModelError> {
        for entity in &self.entities {
            for (target, expected) in references(entity) {
                let Some(found) = self.entities.get(target.index()) else {
                    return Err(ModelError::DanglingReference {
                        entity: entity.name.clone(),
                        target,
                    });
                };
                if let Some(expected) = expected
                    && found.kind() != expected
                {
                    return Err(ModelError::KindMismatch {
                        entity: entity.name.clone(),
                        target,
                        expected,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_scopes(&self) -> Result<(), ModelError> {
        for entity in &self.entities {
            let mut current = entity.parent_scope();
            let mut steps = 0;
            while let Some(id) = current {
                steps += 1;
                if steps > self.entities.len() {
                    return Err(ModelError::CyclicScope {
                        entity: entity.name.clone(),
                    });
                }
                current = self.entities[id.index()].parent_scope();
            }
        }
        Ok(())
    }

    fn fill_local_names(&mut self) {
        for entity in &mut self.entities {
            if entity.local_name.is_empty() {
                let tail = entity.name.rsplit("::").next().unwrap_or(&entity.name);
                entity.local_name = tail.rsplit('/').next().unwrap_or(tail).to_owned();
            }
        }
    }

    fn fill_reverse_relations(&mut self) {
        let mut derived: Vec<(EntityId, BaseClass)> = Vec::new();
        let mut included_by: Vec<(EntityId, IncludeInfo)> = Vec::new();
        let mut referenced_by: Vec<(EntityId, EntityId)> = Vec::new();
        let mut reimplemented_by: Vec<(EntityId, EntityId)> = Vec::new();
        let mut parent_pages: Vec<(EntityId, EntityId)> = Vec::new();

        for entity in &self.entities {
            match &entity.data {
                EntityData::Class(class) => {
                    for base in &class.bases {
                        derived.push((
                            base.class,
                            BaseClass {
                                class: entity.id,
                                ..base.clone()
                            },
                        ));
                    }
                }
                EntityData::File(file) => {
                    for include in &file.includes {
                        if let Some(target) = include.file {
                            included_by.push((
                                target,
                                IncludeInfo {
                                    file: Some(entity.id),
                                    name: file.path.clone(),
                                    local: include.local,
                                    imported: include.imported,
                                },
                            ));
                        }
                    }
                }
                EntityData::Member(member) => {
                    for target in &member.references {
                        referenced_by.push((*target, entity.id));
                    }
                    if let Some(target) = member.reimplements {
                        reimplemented_by.push((target, entity.id));
                    }
                }
                EntityData::Page(page) => {
                    for sub in &page.subpages {
                        parent_pages.push((*sub, entity.id));
                    }
                }
                EntityData::Namespace(_)
                | EntityData::Dir(_)
                | EntityData::Concept(_)
                | EntityData::Module(_) => {}
            }
        }

        for (target, relation) in derived {
            if let EntityData::Class(class) = &mut self.entities[target.index()].data {
                class.derived.push(relation);
            }
        }
        for (target, include) in included_by {
            if let EntityData::File(file) = &mut self.entities[target.index()].data {
                file.included_by.push(include);
            }
        }
        for (target, source) in referenced_by {
            if let EntityData::Member(member) = &mut self.entities[target.index()].data {
                member.referenced_by.push(source);
            }
        }
        for (target, source) in reimplemented_by {
            if let EntityData::Member(member) = &mut self.entities[target.index()].data {
                member.reimplemented_by.push(source);
            }
        }
        for (sub, parent) in parent_pages {
            if let EntityData::Page(page) = &mut self.entities[sub.index()].data {
                page.parent_page.get_or_insert(parent);
            }
        }
    }
}

/// Every id an entity refers to, with the kind it must have (if constrained).
fn references(entity: &Entity) -> Vec<(EntityId, Option<EntityKind>)> {
    let mut refs: Vec<(EntityId, Option<EntityKind>)> = Vec::new();
    refs.extend(entity.outer.map(|id| (id, None)));
    refs.extend(entity.body.map(|body| (body.file, Some(EntityKind::File))));
    refs.extend(entity.groups.iter().map(|id| (*id, Some(EntityKind::Module))));

    let typed = |ids: &[EntityId], kind: EntityKind| -> Vec<(EntityId, Option<EntityKind>)> {
        ids.iter().map(|id| (*id, Some(kind))).collect()
    };

    match &entity.data {
        EntityData::Class(class) => {
            refs.extend(class.bases.iter().map(|b| (b.class, Some(EntityKind::Class))));
            refs.extend(typed(&class.inner_classes, EntityKind::Class));
            refs.extend(class.member_lists.all_ids().map(|id| (id, Some(EntityKind::Member))));
            refs.extend(
                class
                    .all_members
                    .iter()
                    .map(|info| (info.member, Some(EntityKind::Member))),
            );
            refs.extend(
                class
                    .member_groups
                    .iter()
                    .flat_map(|group| typed(&group.members, EntityKind::Member)),
            );
            refs.extend(class.usages.iter().map(|u| (u.class, Some(EntityKind::Class))));
            refs.extend(typed(&class.examples, EntityKind::Page));
            refs.extend(typed(&class.files, EntityKind::File));
            refs.extend(class.include.iter().filter_map(|i| i.file).map(|id| (id, Some(EntityKind::File))));
            refs.extend(class.category_of.map(|id| (id, Some(EntityKind::Class))));
            refs.extend(class.template_master.map(|id| (id, Some(EntityKind::Class))));
        }
        EntityData::Namespace(ns) => {
            refs.extend(typed(&ns.namespaces, EntityKind::Namespace));
            refs.extend(typed(&ns.classes, EntityKind::Class));
            refs.extend(typed(&ns.concepts, EntityKind::Concept));
            refs.extend(ns.member_lists.all_ids().map(|id| (id, Some(EntityKind::Member))));
        }
        EntityData::File(file) => {
            refs.extend(file.dir.map(|id| (id, Some(EntityKind::Dir))));
            refs.extend(file.includes.iter().filter_map(|i| i.file).map(|id| (id, Some(EntityKind::File))));
            refs.extend(typed(&file.classes, EntityKind::Class));
            refs.extend(typed(&file.namespaces, EntityKind::Namespace));
            refs.extend(typed(&file.concepts, EntityKind::Concept));
            refs.extend(file.member_lists.all_ids().map(|id| (id, Some(EntityKind::Member))));
        }
        EntityData::Dir(dir) => {
            refs.extend(typed(&dir.subdirs, EntityKind::Dir));
            refs.extend(typed(&dir.files, EntityKind::File));
            for dependency in &dir.uses {
                refs.push((dependency.dir, Some(EntityKind::Dir)));
                refs.extend(typed(&dependency.files, EntityKind::File));
            }
        }
        EntityData::Page(page) => {
            refs.extend(typed(&page.subpages, EntityKind::Page));
        }
        EntityData::Member(member) => {
            refs.extend(typed(&member.enum_values, EntityKind::Member));
            refs.extend(member.reimplements.map(|id| (id, Some(EntityKind::Member))));
            refs.extend(typed(&member.references, EntityKind::Member));
            refs.extend(member.file.map(|id| (id, Some(EntityKind::File))));
            refs.extend(member.anonymous_type.map(|id| (id, Some(EntityKind::Class))));
            refs.extend(member.category.map(|id| (id, Some(EntityKind::Class))));
            refs.extend(member.category_relation.map(|id| (id, Some(EntityKind::Member))));
            refs.extend(member.related_class.map(|id| (id, Some(EntityKind::Class))));
        }
        EntityData::Concept(concept) => {
            refs.extend(concept.include.iter().filter_map(|i| i.file).map(|id| (id, Some(EntityKind::File))));
        }
        EntityData::Module(module) => {
            refs.extend(typed(&module.subgroups, EntityKind::Module));
            refs.extend(typed(&module.classes, EntityKind::Class));
            refs.extend(typed(&module.namespaces, EntityKind::Namespace));
            refs.extend(typed(&module.concepts, EntityKind::Concept));
            refs.extend(typed(&module.files, EntityKind::File));
            refs.extend(typed(&module.dirs, EntityKind::Dir));
            refs.extend(typed(&module.pages, EntityKind::Page));
            refs.extend(typed(&module.examples, EntityKind::Page));
            refs.extend(module.member_lists.all_ids().map(|id| (id, Some(EntityKind::Member))));
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::{ClassData, DirData, FileData, MemberData, MemberType, PageData};

    fn class(name: &str) -> Entity {
        Entity::new(name, EntityData::Class(ClassData::default()))
    }

    #[test]
    fn test_build_fills_derived_classes() {
        let mut builder = ModelBuilder::new();
        let base = builder.add(class("Base"));
        let a = builder.add(Entity::new("A", EntityData::Class(ClassData::with_bases([base]))));
        let b = builder.add(Entity::new("B", EntityData::Class(ClassData::with_bases([base]))));
        let model = builder.build().unwrap();

        let derived: Vec<_> = model
            .get(base)
            .as_class()
            .unwrap()
            .derived
            .iter()
            .map(|d| d.class)
            .collect();
        assert_eq!(derived, vec![a, b]);
    }

    #[test]
    fn test_build_fills_reimplemented_and_referenced_by() {
        let mut builder = ModelBuilder::new();
        let base_fn = builder.add(Entity::new(
            "Base::run",
            EntityData::Member(MemberData::of_type(MemberType::Function)),
        ));
        let mut derived = MemberData::of_type(MemberType::Function);
        derived.reimplements = Some(base_fn);
        derived.references = vec![base_fn];
        let derived_fn = builder.add(Entity::new("Derived::run", EntityData::Member(derived)));
        let model = builder.build().unwrap();

        let member = model.get(base_fn).as_member().unwrap();
        assert_eq!(member.reimplemented_by, vec![derived_fn]);
        assert_eq!(member.referenced_by, vec![derived_fn]);
    }

    #[test]
    fn test_build_fills_parent_page() {
        let mut builder = ModelBuilder::new();
        let child = builder.add(Entity::new("child", EntityData::Page(PageData::default())));
        let parent = builder.add(Entity::new(
            "parent",
            EntityData::Page(PageData {
                subpages: vec![child],
                ..PageData::default()
            }),
        ));
        let model = builder.build().unwrap();

        assert_eq!(model.get(child).as_page().unwrap().parent_page, Some(parent));
    }

    #[test]
    fn test_dangling_reference_is_rejected() {
        let mut builder = ModelBuilder::new();
        builder.add(Entity::new(
            "Orphan",
            EntityData::Class(ClassData::with_bases([EntityId::new(7)])),
        ));

        let err = builder.build().unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { .. }));
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut builder = ModelBuilder::new();
        let file = builder.add(Entity::new("a.h", EntityData::File(FileData::default())));
        builder.add(Entity::new("Bad", EntityData::Class(ClassData::with_bases([file]))));

        let err = builder.build().unwrap_err();
        assert!(matches!(
            err,
            ModelError::KindMismatch {
                expected: EntityKind::Class,
                ..
            }
        ));
    }

    #[test]
    fn test_cyclic_scope_is_rejected() {
        let mut builder = ModelBuilder::new();
        let a = builder.add(class("A"));
        let b = builder.add(class("B").with_outer(a));
        builder.entity_mut(a).outer = Some(b);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, ModelError::CyclicScope { .. }));
    }

    #[test]
    fn test_file_directory_cycle_is_rejected() {
        let mut builder = ModelBuilder::new();
        let dir = builder.add(Entity::new("src", EntityData::Dir(DirData::default())));
        let file = builder.add(Entity::new(
            "src/a.h",
            EntityData::File(FileData {
                dir: Some(dir),
                ..FileData::default()
            }),
        ));
        builder.entity_mut(dir).outer = Some(file);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, ModelError::CyclicScope { .. }));
    }

    #[test]
    fn test_file_under_directory_is_accepted() {
        let mut builder = ModelBuilder::new();
        let dir = builder.add(Entity::new("src", EntityData::Dir(DirData::default())));
        let file = builder.add(Entity::new(
            "src/a.h",
            EntityData::File(FileData {
                dir: Some(dir),
                ..FileData::default()
            }),
        ));
        let model = builder.build().unwrap();

        assert_eq!(model.get(file).parent_scope(), Some(dir));
        assert_eq!(model.get(dir).parent_scope(), None);
    }

    #[test]
    fn test_local_name_derived_from_path_and_scope() {
        let mut builder = ModelBuilder::new();
        let file = builder.add(Entity::new("src/widget.h", EntityData::File(FileData::default())));
        let class = builder.add(class("ui::Widget"));
        let model = builder.build().unwrap();

        assert_eq!(model.get(file).local_name, "widget.h");
        assert_eq!(model.get(class).local_name, "Widget");
    }
}
