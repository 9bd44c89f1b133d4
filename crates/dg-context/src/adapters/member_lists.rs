//! Categorized member list properties.
//!
//! The property name → list kind tables below drive registration; titles
//! come from [`member_list_title`](crate::titles::member_list_title).

use std::collections::HashSet;
use std::sync::Arc;

use dg_model::{EntityId, MemberListKind as K};

use super::DefinitionAdapter;
use crate::info::MemberListInfoContext;
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::Value;

/// Member lists of classes.
pub(crate) const CLASS_LISTS: &[(&str, K)] = &[
    ("publicTypes", K::PubTypes),
    ("publicMethods", K::PubMethods),
    ("publicStaticMethods", K::PubStaticMethods),
    ("publicAttributes", K::PubAttribs),
    ("publicStaticAttributes", K::PubStaticAttribs),
    ("publicSlots", K::PubSlots),
    ("protectedTypes", K::ProTypes),
    ("protectedMethods", K::ProMethods),
    ("protectedStaticMethods", K::ProStaticMethods),
    ("protectedAttributes", K::ProAttribs),
    ("protectedStaticAttributes", K::ProStaticAttribs),
    ("protectedSlots", K::ProSlots),
    ("packageTypes", K::PacTypes),
    ("packageMethods", K::PacMethods),
    ("packageStaticMethods", K::PacStaticMethods),
    ("packageAttributes", K::PacAttribs),
    ("packageStaticAttributes", K::PacStaticAttribs),
    ("privateTypes", K::PriTypes),
    ("privateMethods", K::PriMethods),
    ("privateStaticMethods", K::PriStaticMethods),
    ("privateAttributes", K::PriAttribs),
    ("privateStaticAttributes", K::PriStaticAttribs),
    ("privateSlots", K::PriSlots),
    ("signals", K::Signals),
    ("dcopMethods", K::DcopMethods),
    ("properties", K::Properties),
    ("events", K::Events),
    ("friends", K::Friends),
    ("related", K::Related),
    ("services", K::Services),
    ("interfaces", K::Interfaces),
    ("detailedTypedefs", K::TypedefMembers),
    ("detailedEnums", K::EnumMembers),
    ("detailedServices", K::ServiceMembers),
    ("detailedInterfaces", K::InterfaceMembers),
    ("detailedConstructors", K::Constructors),
    ("detailedMethods", K::FunctionMembers),
    ("detailedRelated", K::RelatedMembers),
    ("detailedVariables", K::VariableMembers),
    ("detailedProperties", K::PropertyMembers),
    ("detailedEvents", K::EventMembers),
];

/// Member lists of namespaces, files and modules.
pub(crate) const CONTAINER_LISTS: &[(&str, K)] = &[
    ("macros", K::DecDefineMembers),
    ("typedefs", K::DecTypedefMembers),
    ("sequences", K::DecSequenceMembers),
    ("dictionaries", K::DecDictionaryMembers),
    ("enums", K::DecEnumMembers),
    ("enumValues", K::DecEnumValMembers),
    ("functions", K::DecFuncMembers),
    ("variables", K::DecVarMembers),
    ("signals", K::DecSignalMembers),
    ("publicSlots", K::DecPubSlotMembers),
    ("protectedSlots", K::DecProSlotMembers),
    ("privateSlots", K::DecPriSlotMembers),
    ("events", K::DecEventMembers),
    ("properties", K::DecPropMembers),
    ("friends", K::DecFriendMembers),
    ("detailedMacros", K::DocDefineMembers),
    ("detailedTypedefs", K::DocTypedefMembers),
    ("detailedSequences", K::DocSequenceMembers),
    ("detailedDictionaries", K::DocDictionaryMembers),
    ("detailedEnums", K::DocEnumMembers),
    ("detailedEnumValues", K::DocEnumValMembers),
    ("detailedFunctions", K::DocFuncMembers),
    ("detailedVariables", K::DocVarMembers),
    ("detailedSignals", K::DocSignalMembers),
    ("detailedPublicSlots", K::DocPubSlotMembers),
    ("detailedProtectedSlots", K::DocProSlotMembers),
    ("detailedPrivateSlots", K::DocPriSlotMembers),
    ("detailedEvents", K::DocEventMembers),
    ("detailedProperties", K::DocPropMembers),
    ("detailedFriends", K::DocFriendMembers),
];

/// Members of `owner`'s `kind` list that are shown in that kind of section.
///
/// Declaration lists keep members with a visible brief section, detailed
/// lists those with a visible detailed section. Cached per owner and kind.
pub(crate) fn visible_member_list(
    session: &RenderSession,
    owner: EntityId,
    kind: K,
) -> Arc<[EntityId]> {
    let model = session.model();
    model.get(owner).cache().slots().member_list(kind, || {
        model
            .member_list(owner, kind)
            .iter()
            .copied()
            .filter(|&id| {
                model.get(id).as_member().is_some_and(|member| {
                    if kind.is_detailed() {
                        member.is_detailed_section_visible()
                    } else {
                        member.is_brief_section_visible()
                    }
                })
            })
            .collect()
    })
}

/// Union of a class's summary lists, in list order, without duplicates.
pub(crate) fn flat_members(session: &RenderSession, class: EntityId) -> Arc<[EntityId]> {
    session.entity(class).cache().slots().flat_members(|| {
        let mut seen = HashSet::new();
        K::CLASS_SUMMARY
            .iter()
            .flat_map(|&kind| visible_member_list(session, class, kind).to_vec())
            .filter(|id| seen.insert(*id))
            .collect()
    })
}

/// Value of one member list property: the list info, or `false` when empty.
pub(crate) fn member_list_value(session: &Arc<RenderSession>, owner: EntityId, kind: K) -> Value {
    let members = visible_member_list(session, owner, kind);
    if members.is_empty() {
        return Value::Bool(false);
    }
    Value::from_struct(MemberListInfoContext::new(
        Arc::clone(session),
        owner,
        kind,
        members,
    ))
}

/// Register one property per `(name, kind)` row.
pub(crate) fn register_member_lists<T: DefinitionAdapter>(
    map: &mut PropertyMap<T>,
    table: &'static [(&'static str, K)],
) {
    for &(name, kind) in table {
        map.add(name, move |a: &T| member_list_value(a.session(), a.id(), kind));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fixture;

    #[test]
    fn test_tables_have_unique_names() {
        for table in [CLASS_LISTS, CONTAINER_LISTS] {
            let mut names: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), table.len());
        }
    }

    #[test]
    fn test_hidden_brief_member_is_filtered() {
        let session = fixture::session();
        let list = visible_member_list(&session, fixture::CIRCLE, K::PubAttribs);
        assert_eq!(&*list, &[fixture::RADIUS]);
        let detailed = visible_member_list(&session, fixture::CIRCLE, K::VariableMembers);
        assert!(detailed.is_empty());
    }

    #[test]
    fn test_flat_members_union_is_deduplicated() {
        let session = fixture::session();
        let flat = flat_members(&session, fixture::CIRCLE);
        assert_eq!(&*flat, &[fixture::CIRCLE_DRAW, fixture::RADIUS]);
    }

    #[test]
    fn test_member_list_cached_once_per_run() {
        let session = fixture::session();
        let first = visible_member_list(&session, fixture::CIRCLE, K::PubMethods);
        let second = visible_member_list(&session, fixture::CIRCLE, K::PubMethods);
        assert!(Arc::ptr_eq(&first, &second));

        session.end_run();
        let third = visible_member_list(&session, fixture::CIRCLE, K::PubMethods);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(&*first, &*third);
    }

    #[test]
    fn test_empty_list_is_false() {
        let session = fixture::session();
        let value = member_list_value(&session, fixture::CIRCLE, K::Signals);
        assert!(matches!(value, Value::Bool(false)));
    }
}
