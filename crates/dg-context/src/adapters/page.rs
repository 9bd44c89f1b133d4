use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, PageData};
use dg_renderer::CodeOptions;

use super::{DefinitionAdapter, entity_list, entity_or_false, register_definition};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for related pages, examples and the main page.
pub struct PageContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl PageContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a PageData) -> R) -> Value {
        self.entity()
            .as_page()
            .map_or(Value::None, |data| f(data).into())
    }

    fn title(&self) -> String {
        let entity = self.entity();
        match entity.as_page() {
            Some(page) if !page.title.is_empty() => page.title.clone(),
            Some(page) if page.is_main_page => self.session.config().project.name.clone(),
            _ => entity.display_name(true),
        }
    }

    /// Highlighted example source; empty for ordinary pages.
    fn example(&self) -> String {
        let entity = self.entity();
        let Some(code) = entity.as_page().and_then(|page| page.example.as_deref()) else {
            return String::new();
        };
        let options = CodeOptions {
            show_line_numbers: true,
            rel_path: self.session.rel_path().to_owned(),
            ..CodeOptions::default()
        };
        self.session.render_code(entity.language, code, &options)
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for PageContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<PageContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("PageContext");
    register_definition(&mut map);

    map.add("title", |c: &PageContext| Value::from(c.title()));
    map.add("highlight", |c| {
        c.with(|d| {
            if d.is_main_page {
                "main"
            } else if d.is_example {
                "examples"
            } else {
                "pages"
            }
        })
    });
    map.add("subhighlight", |_| Value::from(""));
    map.add("isMainPage", |c| c.with(|d| d.is_main_page));
    map.add("isExample", |c| c.with(|d| d.is_example));
    map.add("subpages", |c| c.with(|d| entity_list(&c.session, &d.subpages)));
    map.add("parentPage", |c| c.with(|d| entity_or_false(&c.session, d.parent_page)));
    map.add("example", |c| Value::from(c.example()));
    map
});

impl StructContext for PageContext {
    fn get(&self, name: &str) -> Value {
        PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}
