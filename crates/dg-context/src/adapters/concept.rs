use std::sync::{Arc, LazyLock};

use dg_model::{ConceptData, EntityId};
use dg_renderer::CodeOptions;

use super::{DefinitionAdapter, register_definition};
use crate::info::{IncludeInfoContext, argument_list};
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for C++20 concepts.
pub struct ConceptContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl ConceptContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a ConceptData) -> R) -> Value {
        self.entity()
            .as_concept()
            .map_or(Value::None, |data| f(data).into())
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for ConceptContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

static PROPERTIES: LazyLock<PropertyMap<ConceptContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("ConceptContext");
    register_definition(&mut map);

    map.add("title", |c: &ConceptContext| {
        Value::from(format!("{} Concept Reference", c.entity().display_name(true)))
    });
    map.add("highlight", |_| Value::from("concepts"));
    map.add("subhighlight", |_| Value::from(""));
    map.add("templateDecls", |c| {
        c.with(|d| argument_list(&c.session, &d.template_args))
    });
    map.add("initializer", |c| c.with(|d| d.initializer.as_str()));
    map.add("initializerAsCode", |c| {
        c.with(|d| {
            let options = CodeOptions {
                rel_path: c.session.rel_path().to_owned(),
                scope_name: Some(c.entity().name.clone()),
                ..CodeOptions::default()
            };
            c.session
                .render_code(c.entity().language, &d.initializer, &options)
        })
    });
    map.add("includeInfo", |c| {
        c.with(|d| {
            d.include.clone().map_or(Value::Bool(false), |info| {
                Value::from_struct(IncludeInfoContext::new(Arc::clone(&c.session), info))
            })
        })
    });
    map
});

impl StructContext for ConceptContext {
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
    fn test_concept_properties() {
        let session = fixture::session();
        let concept = ConceptContext::new(session, fixture::CONCEPT);
        assert_eq!(concept.get("title").to_string(), "geo::Drawable Concept Reference");
        assert_eq!(concept.get("templateDecls").to_int(), 1);
        let code = concept.get("initializerAsCode").to_string();
        assert!(code.contains("requires"), "{code}");
    }
}
