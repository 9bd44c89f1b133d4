//! Per-entity render cache.
//!
//! Every [`Entity`](crate::Entity) owns one [`RenderCache`]. The cache holds an
//! `Arc<CacheSlots>`; [`RenderCache::clear`] swaps in a fresh set of slots, so
//! readers holding the old `Arc` finish undisturbed while new readers start
//! from empty.
//!
//! Two kinds of slots exist:
//! - Format-independent views (navigation path, member sublists, graphs, ...)
//!   are `OnceLock` cells: computed at most once per run, even with several
//!   threads reading concurrently.
//! - Format-tagged fragments (rendered docs, highlighted source) remember the
//!   format they were rendered for. A request under another format re-renders
//!   and replaces the stored pair.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::data::{InheritedMembers, MemberInfo};
use crate::entity::EntityId;
use crate::format::OutputFormat;
use crate::graph::{DiagramGraph, GraphKind};
use crate::member_list::MemberListKind;

/// Format-tagged fragment fields of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderedField {
    Brief,
    Details,
    InbodyDocs,
    SourceCode,
}

impl RenderedField {
    const COUNT: usize = 4;

    const fn index(self) -> usize {
        match self {
            Self::Brief => 0,
            Self::Details => 1,
            Self::InbodyDocs => 2,
            Self::SourceCode => 3,
        }
    }
}

/// A rendered fragment and the format it was rendered for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub format: OutputFormat,
    pub text: Arc<str>,
}

type IdList = Arc<[EntityId]>;

/// One generation's worth of cached views for an entity.
#[derive(Debug)]
pub struct CacheSlots {
    rendered: [Mutex<Option<Rendered>>; RenderedField::COUNT],
    navigation_path: OnceLock<IdList>,
    member_lists: Box<[OnceLock<IdList>]>,
    graphs: [OnceLock<Arc<DiagramGraph>>; GraphKind::COUNT],
    flat_members: OnceLock<IdList>,
    all_members: OnceLock<Arc<[MemberInfo]>>,
    inherited_members: OnceLock<Arc<[InheritedMembers]>>,
    base_classes: OnceLock<IdList>,
    derived_classes: OnceLock<IdList>,
}

impl Default for CacheSlots {
    fn default() -> Self {
        Self {
            rendered: std::array::from_fn(|_| Mutex::new(None)),
            navigation_path: OnceLock::new(),
            member_lists: (0..MemberListKind::COUNT).map(|_| OnceLock::new()).collect(),
            graphs: std::array::from_fn(|_| OnceLock::new()),
            flat_members: OnceLock::new(),
            all_members: OnceLock::new(),
            inherited_members: OnceLock::new(),
            base_classes: OnceLock::new(),
            derived_classes: OnceLock::new(),
        }
    }
}

impl CacheSlots {
    /// Rendered fragment for `format`, rendering it with `render` on a miss.
    ///
    /// A fragment cached for a different format is replaced. The slot lock is
    /// held while rendering, so one entity's field is never rendered twice
    /// concurrently for the same format.
    pub fn rendered(
        &self,
        field: RenderedField,
        format: OutputFormat,
        render: impl FnOnce() -> String,
    ) -> Arc<str> {
        let mut slot = self.rendered[field.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref().filter(|cached| cached.format == format) {
            return Arc::clone(&cached.text);
        }
        let text: Arc<str> = Arc::from(render());
        *slot = Some(Rendered {
            format,
            text: Arc::clone(&text),
        });
        text
    }

    /// Currently cached fragment of a field, if any.
    pub fn cached_rendered(&self, field: RenderedField) -> Option<Rendered> {
        self.rendered[field.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Root-to-leaf breadcrumb ids.
    pub fn navigation_path(&self, init: impl FnOnce() -> Vec<EntityId>) -> IdList {
        Arc::clone(self.navigation_path.get_or_init(|| init().into()))
    }

    /// Visible members of one categorized list.
    pub fn member_list(&self, kind: MemberListKind, init: impl FnOnce() -> Vec<EntityId>) -> IdList {
        Arc::clone(self.member_lists[kind.index()].get_or_init(|| init().into()))
    }

    /// Whether the sublist of `kind` has been computed in this run.
    pub fn has_member_list(&self, kind: MemberListKind) -> bool {
        self.member_lists[kind.index()].get().is_some()
    }

    /// Diagram graph of one kind.
    pub fn graph(&self, kind: GraphKind, init: impl FnOnce() -> DiagramGraph) -> Arc<DiagramGraph> {
        Arc::clone(self.graphs[kind.index()].get_or_init(|| Arc::new(init())))
    }

    /// Whether the graph of `kind` has been built in this run.
    pub fn has_graph(&self, kind: GraphKind) -> bool {
        self.graphs[kind.index()].get().is_some()
    }

    /// Union of all summary member lists of a class.
    pub fn flat_members(&self, init: impl FnOnce() -> Vec<EntityId>) -> IdList {
        Arc::clone(self.flat_members.get_or_init(|| init().into()))
    }

    pub fn all_members(&self, init: impl FnOnce() -> Vec<MemberInfo>) -> Arc<[MemberInfo]> {
        Arc::clone(self.all_members.get_or_init(|| init().into()))
    }

    pub fn inherited_members(
        &self,
        init: impl FnOnce() -> Vec<InheritedMembers>,
    ) -> Arc<[InheritedMembers]> {
        Arc::clone(self.inherited_members.get_or_init(|| init().into()))
    }

    pub fn base_classes(&self, init: impl FnOnce() -> Vec<EntityId>) -> IdList {
        Arc::clone(self.base_classes.get_or_init(|| init().into()))
    }

    pub fn derived_classes(&self, init: impl FnOnce() -> Vec<EntityId>) -> IdList {
        Arc::clone(self.derived_classes.get_or_init(|| init().into()))
    }
}

/// Render-cache slot owned by an entity.
#[derive(Debug, Default)]
pub struct RenderCache {
    slots: Mutex<Arc<CacheSlots>>,
}

impl RenderCache {
    /// Slots of the current run.
    pub fn slots(&self) -> Arc<CacheSlots> {
        Arc::clone(&self.slots.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Drop everything cached so far.
    pub fn clear(&self) {
        *self.slots.lock().unwrap_or_else(PoisonError::into_inner) = Arc::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rendered_is_computed_once_per_format() {
        let cache = RenderCache::default();
        let calls = AtomicUsize::new(0);
        let render = || {
            calls.fetch_add(1, Ordering::SeqCst);
            "<p>doc</p>".to_owned()
        };

        let slots = cache.slots();
        let first = slots.rendered(RenderedField::Brief, OutputFormat::Html, render);
        let second = slots.rendered(RenderedField::Brief, OutputFormat::Html, render);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_rendered_replaced_on_format_change() {
        let cache = RenderCache::default();
        let slots = cache.slots();
        slots.rendered(RenderedField::Details, OutputFormat::Html, || "<b>x</b>".to_owned());
        let latex = slots.rendered(RenderedField::Details, OutputFormat::Latex, || {
            "\\textbf{x}".to_owned()
        });

        assert_eq!(&*latex, "\\textbf{x}");
        assert_eq!(
            slots.cached_rendered(RenderedField::Details),
            Some(Rendered {
                format: OutputFormat::Latex,
                text: Arc::from("\\textbf{x}"),
            })
        );
        assert_eq!(slots.cached_rendered(RenderedField::Brief), None);
    }

    #[test]
    fn test_clear_starts_from_empty_slots() {
        let cache = RenderCache::default();
        cache
            .slots()
            .member_list(MemberListKind::PubMethods, || vec![EntityId::new(1)]);
        assert!(cache.slots().has_member_list(MemberListKind::PubMethods));

        cache.clear();

        assert!(!cache.slots().has_member_list(MemberListKind::PubMethods));
    }

    #[test]
    fn test_member_list_init_runs_once() {
        let slots = CacheSlots::default();
        let first = slots.member_list(MemberListKind::ProAttribs, || vec![EntityId::new(4)]);
        let second = slots.member_list(MemberListKind::ProAttribs, || vec![EntityId::new(9)]);
        assert_eq!(&*first, &[EntityId::new(4)]);
        assert_eq!(&*second, &[EntityId::new(4)]);
    }
}
