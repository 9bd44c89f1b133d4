//! Entity model for the docgen template bindings.
//!
//! This crate holds the finished, fully cross-referenced symbol model that the
//! template bindings expose: classes, namespaces, files, directories, pages,
//! members, concepts and modules.
//!
//! # Architecture
//!
//! Entities are stored in a flat arena inside [`EntityModel`] and refer to each
//! other by [`EntityId`]. Every entity carries:
//! - Common definition data (names, docs, locations, linkability flags)
//! - An [`EntityData`] payload, a closed enum with one variant per [`EntityKind`]
//! - A [`RenderCache`] slot for derived views computed by the bindings
//!
//! Models are assembled with [`ModelBuilder`], which validates references,
//! rejects cyclic scope chains and fills derived relations (derived classes,
//! included-by lists, referenced-by lists, reimplemented-by lists).
//!
//! # Example
//!
//! ```
//! use dg_model::{ClassData, Entity, EntityData, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! let base = builder.add(Entity::new("Shape", EntityData::Class(ClassData::default())));
//! let circle = builder.add(Entity::new(
//!     "Circle",
//!     EntityData::Class(ClassData::with_bases([base])),
//! ));
//! let model = builder.build().unwrap();
//!
//! let derived = &model.get(base).as_class().unwrap().derived;
//! assert_eq!(derived[0].class, circle);
//! ```

mod builder;
mod cache;
mod data;
mod entity;
mod error;
mod format;
pub mod graph;
mod language;
mod member_list;
mod model;
mod source;

pub use builder::ModelBuilder;
pub use cache::{CacheSlots, RenderCache, Rendered, RenderedField};
pub use data::{
    Argument, BaseClass, ClassData, CompoundType, ConceptData, DirData, DirDependency, FileData,
    IncludeInfo, InheritedMembers, MemberData, MemberFlags, MemberGroup, MemberInfo, MemberLists,
    MemberType, ModuleData, NamespaceData, PageData, Protection, UsageRelation, Virtualness,
};
pub use entity::{BodyLocation, DocText, Entity, EntityData, EntityFlags, EntityId, EntityKind};
pub use error::ModelError;
pub use format::{OutputFormat, UnknownFormat};
pub use graph::{DiagramGraph, EdgeStyle, GraphEdge, GraphKind, GraphLimits, GraphNode};
pub use language::Language;
pub use member_list::MemberListKind;
pub use model::EntityModel;
