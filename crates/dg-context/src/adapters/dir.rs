use std::sync::{Arc, LazyLock};

use dg_model::{DirData, EntityId, GraphKind};

use super::{DefinitionAdapter, entity_list, register_definition, register_graph};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for source directories.
pub struct DirContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl DirContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a DirData) -> R) -> Value {
        self.entity()
            .as_dir()
            .map_or(Value::None, |data| f(data).into())
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for DirContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<DirContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("DirContext");
    register_definition(&mut map);
    register_graph(&mut map, "hasDirGraph", "dirGraph", GraphKind::DirDependency);

    map.add("title", |c: &DirContext| {
        Value::from(format!("{} Directory Reference", c.entity().local_name))
    });
    map.add("highlight", |_| Value::from("files"));
    map.add("subhighlight", |_| Value::from("filelist"));
    map.add("dirName", |c| c.with(|d| d.path.as_str()));
    map.add("dirs", |c| c.with(|d| entity_list(&c.session, &d.subdirs)));
    map.add("files", |c| c.with(|d| entity_list(&c.session, &d.files)));
    map
});

impl StructContext for DirContext {
    fn get(&self, name: &str) -> Value {
        PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}
