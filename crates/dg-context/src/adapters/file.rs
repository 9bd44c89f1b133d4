use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, FileData, GraphKind};

use super::member_lists::{CONTAINER_LISTS, register_member_lists};
use super::{DefinitionAdapter, entity_or_false, linkable_list, register_definition, register_graph};
use crate::info::{include_list, member_group_list};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for source files.
pub struct FileContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl FileContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a FileData) -> R) -> Value {
        self.entity()
            .as_file()
            .map_or(Value::None, |data| f(data).into())
    }

    fn has_source_file(&self) -> bool {
        self.session.config().source.browser
            && self.entity().as_file().is_some_and(|data| data.source.is_some())
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for FileContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<FileContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("FileContext");
    register_definition(&mut map);
    register_member_lists(&mut map, CONTAINER_LISTS);
    register_graph(&mut map, "hasIncludeGraph", "includeGraph", GraphKind::Include);
    register_graph(
        &mut map,
        "hasIncludedByGraph",
        "includedByGraph",
        GraphKind::IncludedBy,
    );

    map.add("title", |c: &FileContext| {
        Value::from(format!("{} File Reference", c.entity().local_name))
    });
    map.add("highlight", |_| Value::from("files"));
    map.add("subhighlight", |_| Value::from("filelist"));
    map.add("path", |c| c.with(|d| d.path.as_str()));
    map.add("versionInfo", |c| c.with(|d| d.version.as_str()));
    map.add("dir", |c| c.with(|d| entity_or_false(&c.session, d.dir)));
    map.add("includeList", |c| c.with(|d| include_list(&c.session, &d.includes)));
    map.add("includedByList", |c| {
        c.with(|d| include_list(&c.session, &d.included_by))
    });
    map.add("hasSourceFile", |c| Value::Bool(c.has_source_file()));
    map.add("sources", |c| {
        if c.has_source_file() {
            Value::from(c.session.rendered_source(c.id))
        } else {
            Value::from("")
        }
    });
    map.add("classes", |c| c.with(|d| linkable_list(&c.session, &d.classes)));
    map.add("namespaces", |c| c.with(|d| linkable_list(&c.session, &d.namespaces)));
    map.add("concepts", |c| c.with(|d| linkable_list(&c.session, &d.concepts)));
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

impl StructContext for FileContext {
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
    fn test_file_properties() {
        let session = fixture::session();
        let file = FileContext::new(session, fixture::FILE);
        assert_eq!(file.get("title").to_string(), "shapes.h File Reference");
        assert_eq!(file.get("dir").get("name").to_string(), "src");
        let includes = file.get("includeList");
        assert_eq!(includes.to_int(), 1);
        let first = includes.as_list().unwrap().at(0);
        assert_eq!(first.get("name").to_string(), "vector");
        assert!(matches!(first.get("file"), Value::Bool(false)));
        // Source browsing is off by default.
        assert!(!file.get("hasSourceFile").to_bool());
        assert_eq!(file.get("sources").to_string(), "");
    }
}
