//! Search index adapters.
//!
//! Symbols of each category are grouped by exact name, then bucketed by the
//! upper-cased first letter of that name. Inside a group with several
//! entries each symbol's `scope` tells the entries apart: the containing
//! scope when that is unique within the group, the call signature for
//! functions sharing a scope, and the bare name otherwise.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock};

use dg_model::{Entity, EntityData, EntityId, MemberType};

use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Search category: name, display text and the entities it covers.
type Category = (&'static str, &'static str, fn(&Entity) -> bool);

fn member_of(entity: &Entity, member_type: MemberType) -> bool {
    entity
        .as_member()
        .is_some_and(|member| member.member_type == member_type)
}

const CATEGORIES: &[Category] = &[
    ("all", "All", |_| true),
    ("classes", "Classes", |e| e.as_class().is_some()),
    ("namespaces", "Namespaces", |e| e.as_namespace().is_some()),
    ("files", "Files", |e| e.as_file().is_some()),
    ("functions", "Functions", |e| e.as_member().is_some_and(|m| m.is_function())),
    ("variables", "Variables", |e| member_of(e, MemberType::Variable)),
    ("typedefs", "Typedefs", |e| member_of(e, MemberType::Typedef)),
    ("enums", "Enumerations", |e| member_of(e, MemberType::Enumeration)),
    ("enumvalues", "Enumerator", |e| member_of(e, MemberType::EnumValue)),
    ("properties", "Properties", |e| member_of(e, MemberType::Property)),
    ("events", "Events", |e| member_of(e, MemberType::Event)),
    ("related", "Related Symbols", |e| {
        e.as_member().is_some_and(|m| m.related_class.is_some())
    }),
    ("defines", "Macros", |e| member_of(e, MemberType::Define)),
    ("groups", "Modules", |e| e.as_module().is_some()),
    ("pages", "Pages", |e| e.as_page().is_some_and(|p| !p.is_main_page)),
];

/// Whether an entity is searchable at all.
fn searchable(entity: &Entity) -> bool {
    if !entity.is_linkable_in_project() {
        return false;
    }
    match &entity.data {
        EntityData::Member(member) => member.visible_in_index,
        EntityData::Class(_)
        | EntityData::Namespace(_)
        | EntityData::File(_)
        | EntityData::Page(_)
        | EntityData::Module(_) => true,
        EntityData::Dir(_) | EntityData::Concept(_) => false,
    }
}

/// Name a symbol is listed under.
fn search_name(entity: &Entity) -> String {
    match &entity.data {
        EntityData::Page(page) if !page.title.is_empty() => page.title.clone(),
        EntityData::Module(module) if !module.title.is_empty() => module.title.clone(),
        _ => entity.display_name(false),
    }
}

/// Symbols sharing one name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolGroup {
    pub name: String,
    pub symbols: Vec<EntityId>,
}

/// Groups starting with one letter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterBucket {
    pub letter: String,
    pub groups: Vec<SymbolGroup>,
}

/// Group `(name, entity)` pairs by exact name and bucket the groups by
/// leading letter. Buckets and groups are sorted case-insensitively.
#[must_use]
pub fn bucket_symbols(symbols: Vec<(String, EntityId)>) -> Vec<LetterBucket> {
    let mut by_name: BTreeMap<(String, String), Vec<EntityId>> = BTreeMap::new();
    for (name, id) in symbols {
        by_name
            .entry((name.to_lowercase(), name))
            .or_default()
            .push(id);
    }
    let mut buckets: BTreeMap<String, Vec<SymbolGroup>> = BTreeMap::new();
    for ((_, name), symbols) in by_name {
        let letter = name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default();
        buckets.entry(letter).or_default().push(SymbolGroup { name, symbols });
    }
    buckets
        .into_iter()
        .map(|(letter, groups)| LetterBucket { letter, groups })
        .collect()
}

/// Qualified name of the scope an entity lives in, or empty.
fn containing_scope(session: &RenderSession, entity: &Entity) -> String {
    let outer = entity.outer.map(|id| session.entity(id)).or_else(|| {
        entity
            .as_member()
            .and_then(|member| member.file)
            .map(|file| session.entity(file))
    });
    outer.map_or_else(String::new, |outer| outer.display_name(true))
}

/// Disambiguating text of each symbol in a group.
#[must_use]
pub fn symbol_scopes(session: &RenderSession, group: &SymbolGroup) -> Vec<String> {
    let scopes: Vec<String> = group
        .symbols
        .iter()
        .map(|&id| containing_scope(session, session.entity(id)))
        .collect();
    if group.symbols.len() == 1 {
        return scopes;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for scope in &scopes {
        *counts.entry(scope.as_str()).or_default() += 1;
    }
    group
        .symbols
        .iter()
        .zip(&scopes)
        .map(|(&id, scope)| {
            let entity = session.entity(id);
            if !scope.is_empty() && counts.get(scope.as_str()) == Some(&1) {
                return scope.clone();
            }
            match entity.as_member() {
                Some(member) if member.is_function() => {
                    let prefix = if scope.is_empty() {
                        String::new()
                    } else {
                        format!("{scope}{}", entity.language.scope_separator())
                    };
                    format!("{prefix}{}{}", entity.display_name(false), member.args)
                }
                _ => entity.display_name(false),
            }
        })
        .collect()
}

/// All search categories.
pub struct SearchIndicesContext {
    session: Arc<RenderSession>,
}

impl SearchIndicesContext {
    #[must_use]
    pub fn new(session: &Arc<RenderSession>) -> Self {
        Self {
            session: Arc::clone(session),
        }
    }

    fn category(&self, &(name, text, filter): &Category) -> Value {
        let symbols: Vec<(String, EntityId)> = self
            .session
            .model()
            .entities()
            .iter()
            .filter(|entity| searchable(entity) && filter(entity))
            .map(|entity| (search_name(entity), entity.id()))
            .collect();
        let buckets = bucket_symbols(symbols);
        tracing::debug!(category = name, letters = buckets.len(), "Built search index");
        Value::from_struct(SearchIndexContext {
            session: Arc::clone(&self.session),
            name,
            text,
            buckets,
        })
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        INDICES_PROPERTIES.fields()
    }
}

static INDICES_PROPERTIES: LazyLock<PropertyMap<SearchIndicesContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SearchIndicesContext");
    for category in CATEGORIES {
        map.add(category.0, move |c: &SearchIndicesContext| c.category(category));
    }
    map.add("list", |c| {
        Value::list(CATEGORIES.iter().map(|category| c.category(category)).collect())
    });
    map
});

impl StructContext for SearchIndicesContext {
    fn get(&self, name: &str) -> Value {
        INDICES_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        INDICES_PROPERTIES.fields()
    }
}

/// One search category, bucketed by letter.
pub struct SearchIndexContext {
    session: Arc<RenderSession>,
    name: &'static str,
    text: &'static str,
    buckets: Vec<LetterBucket>,
}

impl SearchIndexContext {
    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        INDEX_PROPERTIES.fields()
    }
}

static INDEX_PROPERTIES: LazyLock<PropertyMap<SearchIndexContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SearchIndexContext");
    map.add("name", |c: &SearchIndexContext| Value::from(c.name));
    map.add("text", |c| Value::from(c.text));
    map.add("symbolIndices", |c| {
        Value::list(
            c.buckets
                .iter()
                .map(|bucket| {
                    Value::from_struct(SymbolIndexContext {
                        session: Arc::clone(&c.session),
                        category: c.name,
                        bucket: bucket.clone(),
                    })
                })
                .collect(),
        )
    });
    map
});

impl StructContext for SearchIndexContext {
    fn get(&self, name: &str) -> Value {
        INDEX_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        INDEX_PROPERTIES.fields()
    }
}

/// Symbols of one category starting with one letter.
pub struct SymbolIndexContext {
    session: Arc<RenderSession>,
    category: &'static str,
    bucket: LetterBucket,
}

impl SymbolIndexContext {
    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        SYMBOL_INDEX_PROPERTIES.fields()
    }
}

static SYMBOL_INDEX_PROPERTIES: LazyLock<PropertyMap<SymbolIndexContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SymbolIndexContext");
    map.add("letter", |c: &SymbolIndexContext| Value::from(c.bucket.letter.as_str()));
    map.add("name", |c| Value::from(c.category));
    map.add("symbolGroups", |c| {
        Value::list(
            c.bucket
                .groups
                .iter()
                .enumerate()
                .map(|(index, group)| {
                    Value::from_struct(SymbolGroupContext {
                        session: Arc::clone(&c.session),
                        id: format!("{}_{}_{index}", c.category, c.bucket.letter),
                        group: group.clone(),
                    })
                })
                .collect(),
        )
    });
    map
});

impl StructContext for SymbolIndexContext {
    fn get(&self, name: &str) -> Value {
        SYMBOL_INDEX_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        SYMBOL_INDEX_PROPERTIES.fields()
    }
}

/// Symbols sharing one name.
pub struct SymbolGroupContext {
    session: Arc<RenderSession>,
    id: String,
    group: SymbolGroup,
}

impl SymbolGroupContext {
    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        SYMBOL_GROUP_PROPERTIES.fields()
    }
}

static SYMBOL_GROUP_PROPERTIES: LazyLock<PropertyMap<SymbolGroupContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SymbolGroupContext");
    map.add("id", |c: &SymbolGroupContext| Value::from(c.id.as_str()));
    map.add("name", |c| Value::from(c.group.name.as_str()));
    map.add("symbols", |c| {
        let scopes = symbol_scopes(&c.session, &c.group);
        Value::list(
            c.group
                .symbols
                .iter()
                .zip(scopes)
                .map(|(&id, scope)| {
                    Value::from_struct(SymbolContext {
                        session: Arc::clone(&c.session),
                        id,
                        scope,
                    })
                })
                .collect(),
        )
    });
    map
});

impl StructContext for SymbolGroupContext {
    fn get(&self, name: &str) -> Value {
        SYMBOL_GROUP_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        SYMBOL_GROUP_PROPERTIES.fields()
    }
}

/// One search hit.
pub struct SymbolContext {
    session: Arc<RenderSession>,
    id: EntityId,
    scope: String,
}

impl SymbolContext {
    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        SYMBOL_PROPERTIES.fields()
    }
}

static SYMBOL_PROPERTIES: LazyLock<PropertyMap<SymbolContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("SymbolContext");
    map.add("fileName", |c: &SymbolContext| {
        Value::from(c.session.entity(c.id).output_file.as_str())
    });
    map.add("anchor", |c| Value::from(c.session.entity(c.id).anchor.as_str()));
    map.add("scope", |c| Value::from(c.scope.as_str()));
    map.add("relPath", |c| Value::from(c.session.rel_path()));
    map
});

impl StructContext for SymbolContext {
    fn get(&self, name: &str) -> Value {
        SYMBOL_PROPERTIES.get(self, name)
    }

    fn fields(&self) -> Vec<&'static str> {
        SYMBOL_PROPERTIES.fields()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_bucket_symbols_groups_by_name_and_letter() {
        let a = EntityId::new(0);
        let b = EntityId::new(1);
        let c = EntityId::new(2);
        let buckets = bucket_symbols(vec![
            ("draw".to_owned(), a),
            ("Circle".to_owned(), b),
            ("draw".to_owned(), c),
        ]);
        assert_eq!(
            buckets,
            vec![
                LetterBucket {
                    letter: "C".to_owned(),
                    groups: vec![SymbolGroup {
                        name: "Circle".to_owned(),
                        symbols: vec![b],
                    }],
                },
                LetterBucket {
                    letter: "D".to_owned(),
                    groups: vec![SymbolGroup {
                        name: "draw".to_owned(),
                        symbols: vec![a, c],
                    }],
                },
            ]
        );
    }

    #[test]
    fn test_scopes_disambiguate_by_outer_scope() {
        let session = fixture::session();
        let group = SymbolGroup {
            name: "draw".to_owned(),
            symbols: vec![fixture::DRAW, fixture::CIRCLE_DRAW],
        };
        assert_eq!(symbol_scopes(&session, &group), vec!["geo::Shape", "geo::Circle"]);

        let single = SymbolGroup {
            name: "area".to_owned(),
            symbols: vec![fixture::AREA],
        };
        assert_eq!(symbol_scopes(&session, &single), vec!["geo"]);
    }

    #[test]
    fn test_scopes_fall_back_to_signature() {
        let session = fixture::session();
        let group = SymbolGroup {
            name: "draw".to_owned(),
            symbols: vec![fixture::DRAW, fixture::DRAW],
        };
        assert_eq!(
            symbol_scopes(&session, &group),
            vec!["geo::Shape::draw()", "geo::Shape::draw()"]
        );
    }

    #[test]
    fn test_functions_category() {
        let session = fixture::session();
        let indices = SearchIndicesContext::new(&session);
        let functions = indices.get("functions");
        assert_eq!(functions.get("text").to_string(), "Functions");
        let letters = functions.get("symbolIndices");
        let list = letters.as_list().unwrap();
        let keys: Vec<String> = (0..list.count())
            .map(|i| list.at(i).get("letter").to_string())
            .collect();
        assert_eq!(keys, vec!["A", "D"]);
        let draw = list.at(1).get("symbolGroups").as_list().unwrap().at(0);
        assert_eq!(draw.get("name").to_string(), "draw");
        assert_eq!(draw.get("symbols").to_int(), 2);
        assert_eq!(indices.get("list").to_int(), 15);
    }
}
