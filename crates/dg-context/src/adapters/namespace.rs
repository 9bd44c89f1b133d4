use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, NamespaceData};

use super::member_lists::{CONTAINER_LISTS, register_member_lists};
use super::{DefinitionAdapter, linkable_list, register_definition};
use crate::info::member_group_list;
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for namespaces and packages.
pub struct NamespaceContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl NamespaceContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a NamespaceData) -> R) -> Value {
        self.entity()
            .as_namespace()
            .map_or(Value::None, |data| f(data).into())
    }

    /// Inner namespaces that are constant groups (or not).
    fn inner(&self, constant_groups: bool) -> Value {
        self.with(|d| {
            let ids: Vec<EntityId> = d
                .namespaces
                .iter()
                .copied()
                .filter(|&id| {
                    self.session
                        .entity(id)
                        .as_namespace()
                        .is_some_and(|ns| ns.is_constant_group == constant_groups)
                })
                .collect();
            linkable_list(&self.session, &ids)
        })
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for NamespaceContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<NamespaceContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("NamespaceContext");
    register_definition(&mut map);
    register_member_lists(&mut map, CONTAINER_LISTS);

    map.add("title", |c: &NamespaceContext| {
        let entity = c.entity();
        let kind = match entity.as_namespace() {
            Some(data) if data.is_package => "Package",
            Some(data) if data.is_constant_group => "Constant Group",
            _ => "Namespace",
        };
        Value::from(format!("{} {kind} Reference", entity.display_name(true)))
    });
    map.add("highlight", |_| Value::from("namespaces"));
    map.add("subhighlight", |_| Value::from("namespacelist"));
    map.add("compoundType", |c| {
        c.with(|d| if d.is_package { "package" } else { "namespace" })
    });
    map.add("isInline", |c| c.with(|d| d.is_inline));
    map.add("isConstantGroup", |c| c.with(|d| d.is_constant_group));
    map.add("classes", |c| c.with(|d| linkable_list(&c.session, &d.classes)));
    map.add("concepts", |c| c.with(|d| linkable_list(&c.session, &d.concepts)));
    map.add("namespaces", |c| c.inner(false));
    map.add("constantgroups", |c| c.inner(true));
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
    map
});

impl StructContext for NamespaceContext {
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
    fn test_namespace_properties() {
        let session = fixture::session();
        let geo = NamespaceContext::new(session, fixture::GEO);
        assert_eq!(geo.get("title").to_string(), "geo Namespace Reference");
        assert_eq!(geo.get("compoundType").to_string(), "namespace");
        // The anonymous class is not linkable.
        assert_eq!(geo.get("classes").to_int(), 3);
        assert_eq!(geo.get("functions").get("members").to_int(), 1);
        assert_eq!(geo.get("namespaces").to_int(), 0);
    }
}
