//! Template bindings for the docgen entity model.
//!
//! Template engines see the model as a graph of dynamically typed
//! [`Value`]s. Structured values are adapters implementing
//! [`StructContext`]: one per entity kind ([`ClassContext`],
//! [`NamespaceContext`], [`FileContext`], ...), plus information objects
//! (member lists, arguments, include lines), index and tree objects, and
//! [`RootContext`] at the top.
//!
//! Adapters are thin handles of an `Arc<RenderSession>` and an id. Property
//! values are computed on demand; expensive derived views are memoized in
//! the entity's render cache and rendered fragments are tagged with the
//! output format they were produced for.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dg_config::Config;
//! use dg_context::{RenderSession, RootContext, StructContext};
//! use dg_model::EntityModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = EntityModel::from_path("model.json".as_ref())?;
//! let session = RenderSession::new(Arc::new(model), Arc::new(Config::default()));
//! session.begin_run();
//! let root = RootContext::new(Arc::clone(&session));
//! let classes = root.get("classList");
//! if let Some(list) = classes.as_list().filter(|list| list.count() > 0) {
//!     assert!(!list.at(0).get("name").to_string().is_empty());
//! }
//! session.end_run();
//! # Ok(())
//! # }
//! ```

mod adapters;
mod generate;
mod info;
mod links;
mod lists;
mod registry;
mod root;
mod search;
mod session;
mod titles;
mod translate;
mod tree;
mod value;

#[cfg(test)]
pub(crate) mod fixture;

pub use adapters::{
    ClassContext, ConceptContext, DirContext, FileContext, MemberContext, ModuleContext,
    NamespaceContext, PageContext, entity_value,
};
pub use generate::{FormatReport, GenerateError, GenerateReport, Generator, TemplateEngine};
pub use info::{
    ArgumentContext, IncludeInfoContext, InheritanceNodeContext, InheritedMemberInfoContext,
    MemberGroupInfoContext, MemberInfoContext, MemberListInfoContext, NavPathElemContext,
    SourceLinkContext,
};
pub use links::{ModelLinks, link_target};
pub use lists::{
    ClassIndexContext, MemberScope, MembersIndexContext, TreeIndexContext, entity_index,
};
pub use registry::PropertyMap;
pub use root::{ConfigContext, GeneratorContext, RootContext};
pub use search::{
    LetterBucket, SearchIndexContext, SearchIndicesContext, SymbolContext, SymbolGroup,
    SymbolGroupContext, SymbolIndexContext, bucket_symbols, symbol_scopes,
};
pub use session::RenderSession;
pub use titles::{TitleMode, member_list_title};
pub use translate::{TranslateContext, write_list};
pub use tree::{
    NestingContext, NestingNode, NestingNodeContext, TreeBuilder, TreeKind, max_depth,
    preferred_depth,
};
pub use value::{GenericList, ListContext, ListCursor, StructContext, Value};

/// Property names of every adapter type, by adapter name.
///
/// Configuration options are not listed; they depend on the configuration.
pub fn adapter_fields() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("ArgumentContext", ArgumentContext::property_names()),
        ("ClassContext", ClassContext::property_names()),
        ("ClassIndexContext", ClassIndexContext::property_names()),
        ("ConceptContext", ConceptContext::property_names()),
        ("DirContext", DirContext::property_names()),
        ("FileContext", FileContext::property_names()),
        ("GeneratorContext", GeneratorContext::property_names()),
        ("IncludeInfoContext", IncludeInfoContext::property_names()),
        ("InheritanceNodeContext", InheritanceNodeContext::property_names()),
        ("InheritedMemberInfoContext", InheritedMemberInfoContext::property_names()),
        ("MemberContext", MemberContext::property_names()),
        ("MemberGroupInfoContext", MemberGroupInfoContext::property_names()),
        ("MemberInfoContext", MemberInfoContext::property_names()),
        ("MemberListInfoContext", MemberListInfoContext::property_names()),
        ("MembersIndexContext", MembersIndexContext::property_names()),
        ("ModuleContext", ModuleContext::property_names()),
        ("NamespaceContext", NamespaceContext::property_names()),
        ("NavPathElemContext", NavPathElemContext::property_names()),
        ("NestingNodeContext", NestingNodeContext::property_names()),
        ("PageContext", PageContext::property_names()),
        ("RootContext", RootContext::property_names()),
        ("SearchIndexContext", SearchIndexContext::property_names()),
        ("SearchIndicesContext", SearchIndicesContext::property_names()),
        ("SourceLinkContext", SourceLinkContext::property_names()),
        ("SymbolContext", SymbolContext::property_names()),
        ("SymbolGroupContext", SymbolGroupContext::property_names()),
        ("SymbolIndexContext", SymbolIndexContext::property_names()),
        ("TranslateContext", TranslateContext.fields()),
        ("TreeIndexContext", TreeIndexContext::property_names()),
    ]
}
