use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, GraphKind, ModuleData};

use super::member_lists::{CONTAINER_LISTS, register_member_lists};
use super::{DefinitionAdapter, entity_list, linkable_list, register_definition, register_graph};
use crate::info::member_group_list;
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for modules (user-defined groups).
pub struct ModuleContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl ModuleContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a ModuleData) -> R) -> Value {
        self.entity()
            .as_module()
            .map_or(Value::None, |data| f(data).into())
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for ModuleContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<ModuleContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("ModuleContext");
    register_definition(&mut map);
    register_member_lists(&mut map, CONTAINER_LISTS);
    register_graph(&mut map, "hasGroupGraph", "groupGraph", GraphKind::GroupCollaboration);

    map.add("title", |c: &ModuleContext| {
        c.with(|d| {
            if d.title.is_empty() {
                c.entity().display_name(true)
            } else {
                d.title.clone()
            }
        })
    });
    map.add("highlight", |_| Value::from("modules"));
    map.add("subhighlight", |_| Value::from(""));
    map.add("modules", |c| c.with(|d| linkable_list(&c.session, &d.subgroups)));
    map.add("classes", |c| c.with(|d| linkable_list(&c.session, &d.classes)));
    map.add("namespaces", |c| c.with(|d| linkable_list(&c.session, &d.namespaces)));
    map.add("concepts", |c| c.with(|d| linkable_list(&c.session, &d.concepts)));
    map.add("files", |c| c.with(|d| linkable_list(&c.session, &d.files)));
    map.add("dirs", |c| c.with(|d| entity_list(&c.session, &d.dirs)));
    map.add("pages", |c| c.with(|d| entity_list(&c.session, &d.pages)));
    map.add("examples", |c| c.with(|d| entity_list(&c.session, &d.examples)));
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

impl StructContext for ModuleContext {
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
    fn test_module_properties() {
        let session = fixture::session();
        let module = ModuleContext::new(session, fixture::MODULE);
        assert_eq!(module.get("title").to_string(), "Shape Primitives");
        assert_eq!(module.get("classes").to_int(), 2);
        assert_eq!(module.get("memberGroups").to_int(), 1);
        // No layout engine configured.
        assert!(!module.get("hasGroupGraph").to_bool());
        assert_eq!(module.get("groupGraph").to_string(), "");
    }
}
