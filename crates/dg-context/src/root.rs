//! Root adapter handed to the template engine, plus the configuration and
//! generator-info adapters it exposes.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use dg_config::{Config, OptionValue};

use crate::adapters::entity_or_false;
use crate::lists::{
    ClassIndexContext, MemberScope, MembersIndexContext, TreeIndexContext, class_ids,
    concept_ids, dir_ids, entity_index, example_ids, file_ids, module_ids, namespace_ids,
    page_ids,
};
use crate::registry::PropertyMap;
use crate::search::SearchIndicesContext;
use crate::session::RenderSession;
use crate::translate::TranslateContext;
use crate::value::{StructContext, Value};

/// Configuration options by name (`PROJECT_NAME`, `HAVE_DOT`, ...).
pub struct ConfigContext {
    options: Vec<(&'static str, OptionValue)>,
}

impl ConfigContext {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.options(),
        }
    }
}

impl StructContext for ConfigContext {
    fn get(&self, name: &str) -> Value {
        let Some((_, value)) = self.options.iter().find(|(option, _)| *option == name) else {
            tracing::debug!(option = name, "Unknown configuration option");
            return Value::None;
        };
        match value {
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::Int(i) => Value::Int(*i),
            OptionValue::String(s) => Value::from(s.as_str()),
            OptionValue::List(items) => {
                Value::list(items.iter().map(|item| Value::from(item.as_str())).collect())
            }
        }
    }

    fn fields(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.options.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Generator name, version and generation date.
pub struct GeneratorContext {
    date: DateTime<Utc>,
}

impl GeneratorContext {
    /// Generator info stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_date(Utc::now())
    }

    #[must_use]
    pub fn with_date(date: DateTime<Utc>) -> Self {
        Self { date }
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        GENERATOR_PROPERTIES.fields()
    }
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self::new()
    }
}

static GENERATOR_PROPERTIES: LazyLock<PropertyMap<GeneratorContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("GeneratorContext");
    map.add("name", |_: &GeneratorContext| Value::from("docgen"));
    map.add("version", |_| Value::from(env!("CARGO_PKG_VERSION")));
    map.add("date", |c| {
        Value::from(c.date.format("%a %b %-d %Y %H:%M:%S").to_string())
    });
    map.add("year", |c| Value::from(c.date.format("%Y").to_string()));
    map
});

impl StructContext for GeneratorContext {
    fn get(&self, name: &str) -> Value {
        GENERATOR_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        GENERATOR_PROPERTIES.fields()
    }
}

/// Properties recomputed on every lookup.
const VOLATILE: &[&str] = &["nextSectionId", "currentSectionId"];

/// The root of the property graph for one format pass.
///
/// Index and tree properties are built on first lookup and memoized for the
/// lifetime of this root; the driver builds a new root per format.
pub struct RootContext {
    session: Arc<RenderSession>,
    memo: Mutex<HashMap<&'static str, Value>>,
}

impl RootContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>) -> Self {
        Self {
            session,
            memo: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        ROOT_PROPERTIES.fields()
    }
}

static ROOT_PROPERTIES: LazyLock<PropertyMap<RootContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("RootContext");
    map.add("config", |c: &RootContext| {
        Value::from_struct(ConfigContext::new(c.session.config()))
    });
    map.add("generator", |_| Value::from_struct(GeneratorContext::new()));
    map.add("tr", |_| Value::from_struct(TranslateContext));
    map.add("outputFormat", |c| Value::from(c.session.format().as_str()));
    map.add("nextSectionId", |c| Value::from(c.session.next_section_id()));
    map.add("currentSectionId", |c| Value::from(c.session.current_section_id()));
    map.add("mainPage", |c| {
        let main = c.session.model().main_page().map(|page| page.id());
        entity_or_false(&c.session, main)
    });

    map.add("classList", |c| entity_index(&c.session, class_ids(&c.session)));
    map.add("namespaceList", |c| entity_index(&c.session, namespace_ids(&c.session)));
    map.add("fileList", |c| entity_index(&c.session, file_ids(&c.session)));
    map.add("dirList", |c| entity_index(&c.session, dir_ids(&c.session)));
    map.add("pageList", |c| entity_index(&c.session, page_ids(&c.session)));
    map.add("exampleList", |c| entity_index(&c.session, example_ids(&c.session)));
    map.add("moduleList", |c| entity_index(&c.session, module_ids(&c.session)));
    map.add("conceptList", |c| entity_index(&c.session, concept_ids(&c.session)));

    map.add("classIndex", |c| Value::from_struct(ClassIndexContext::new(&c.session)));
    map.add("classTree", |c| {
        Value::from_struct(TreeIndexContext::class_tree(&c.session))
    });
    map.add("classHierarchy", |c| {
        Value::from_struct(TreeIndexContext::class_hierarchy(&c.session))
    });
    map.add("namespaceTree", |c| {
        Value::from_struct(TreeIndexContext::namespace_tree(&c.session))
    });
    map.add("fileTree", |c| Value::from_struct(TreeIndexContext::file_tree(&c.session)));
    map.add("pageTree", |c| Value::from_struct(TreeIndexContext::page_tree(&c.session)));
    map.add("exampleTree", |c| {
        Value::from_struct(TreeIndexContext::example_tree(&c.session))
    });
    map.add("moduleTree", |c| {
        Value::from_struct(TreeIndexContext::module_tree(&c.session))
    });
    map.add("conceptTree", |c| {
        Value::from_struct(TreeIndexContext::concept_tree(&c.session))
    });

    map.add("globalsIndex", |c| {
        Value::from_struct(MembersIndexContext::new(&c.session, MemberScope::Global))
    });
    map.add("classMembersIndex", |c| {
        Value::from_struct(MembersIndexContext::new(&c.session, MemberScope::Class))
    });
    map.add("namespaceMembersIndex", |c| {
        Value::from_struct(MembersIndexContext::new(&c.session, MemberScope::Namespace))
    });
    map.add("searchIndices", |c| {
        if c.session.config().index.search_engine {
            Value::from_struct(SearchIndicesContext::new(&c.session))
        } else {
            Value::Bool(false)
        }
    });
    map
});

impl StructContext for RootContext {
    fn get(&self, name: &str) -> Value {
        if VOLATILE.contains(&name) {
            return ROOT_PROPERTIES.get(self, name);
        }
        let Some(key) = ROOT_PROPERTIES.fields().into_iter().find(|field| *field == name) else {
            return ROOT_PROPERTIES.get(self, name);
        };
        if let Some(value) = self
            .memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return value.clone();
        }
        // Computed outside the lock: building an index may read other root
        // properties through nested adapters.
        let value = ROOT_PROPERTIES.get(self, key);
        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(value)
            .clone()
    }

    fn fields(&self) -> Vec<&'static str> {
        ROOT_PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_config_context() {
        let config = Config::default();
        let context = ConfigContext::new(&config);
        assert_eq!(context.get("PROJECT_NAME").to_string(), "My Project");
        assert!(context.get("CLASS_GRAPH").to_bool());
        assert_eq!(context.get("DOT_GRAPH_MAX_NODES").to_int(), 50);
        assert!(context.get("NO_SUCH_OPTION").is_none());
        let fields = context.fields();
        let mut sorted = fields.clone();
        sorted.sort_unstable();
        assert_eq!(fields, sorted);
    }

    #[test]
    fn test_generator_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let generator = GeneratorContext::with_date(date);
        assert_eq!(generator.get("date").to_string(), "Tue Mar 5 2024 14:07:09");
        assert_eq!(generator.get("year").to_string(), "2024");
        assert_eq!(generator.get("name").to_string(), "docgen");
    }

    #[test]
    fn test_root_memoizes_indices() {
        let session = fixture::session();
        let root = RootContext::new(session);
        let first = root.get("classTree");
        let second = root.get("classTree");
        let (Some(first), Some(second)) = (first.as_struct(), second.as_struct()) else {
            panic!("classTree is not a struct");
        };
        assert!(Arc::ptr_eq(first, second));
        assert!(root.get("noSuchIndex").is_none());
    }

    #[test]
    fn test_section_ids_are_not_memoized() {
        let session = fixture::session();
        session.begin_run();
        let root = RootContext::new(Arc::clone(&session));
        assert_eq!(root.get("nextSectionId").to_int(), 0);
        assert_eq!(root.get("nextSectionId").to_int(), 1);
        assert_eq!(root.get("currentSectionId").to_int(), 2);
    }

    #[test]
    fn test_root_main_page_and_lists() {
        let session = fixture::session();
        let root = RootContext::new(session);
        assert_eq!(root.get("mainPage").get("name").to_string(), "index");
        assert_eq!(root.get("classList").to_int(), 4);
        assert_eq!(root.get("outputFormat").to_string(), "html");
        assert_eq!(root.get("config").get("PROJECT_NAME").to_string(), "My Project");
        assert_eq!(root.get("searchIndices").get("list").to_int(), 15);
    }
}
