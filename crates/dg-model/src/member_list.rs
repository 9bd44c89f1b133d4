//! Categorized member list kinds.
//!
//! Classes sort their members into declaration lists by protection and role
//! (`pubMethods`, `proAttribs`, ...) and into documentation lists
//! (`functionMembers`, `variableMembers`, ...). Files, namespaces and modules
//! use the `dec*` / `doc*` lists instead.

use serde::Deserialize;

/// Kind of categorized member list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberListKind {
    // Class declaration lists
    PubTypes,
    PubMethods,
    PubStaticMethods,
    PubAttribs,
    PubStaticAttribs,
    PubSlots,
    ProTypes,
    ProMethods,
    ProStaticMethods,
    ProAttribs,
    ProStaticAttribs,
    ProSlots,
    PacTypes,
    PacMethods,
    PacStaticMethods,
    PacAttribs,
    PacStaticAttribs,
    PriTypes,
    PriMethods,
    PriStaticMethods,
    PriAttribs,
    PriStaticAttribs,
    PriSlots,
    Signals,
    DcopMethods,
    Properties,
    Events,
    Friends,
    Related,
    Services,
    Interfaces,
    // Class documentation lists
    TypedefMembers,
    EnumMembers,
    ServiceMembers,
    InterfaceMembers,
    Constructors,
    FunctionMembers,
    RelatedMembers,
    VariableMembers,
    PropertyMembers,
    EventMembers,
    // Container declaration lists
    DecDefineMembers,
    DecTypedefMembers,
    DecSequenceMembers,
    DecDictionaryMembers,
    DecEnumMembers,
    DecEnumValMembers,
    DecFuncMembers,
    DecVarMembers,
    DecSignalMembers,
    DecPubSlotMembers,
    DecProSlotMembers,
    DecPriSlotMembers,
    DecEventMembers,
    DecPropMembers,
    DecFriendMembers,
    // Container documentation lists
    DocDefineMembers,
    DocTypedefMembers,
    DocSequenceMembers,
    DocDictionaryMembers,
    DocEnumMembers,
    DocEnumValMembers,
    DocFuncMembers,
    DocVarMembers,
    DocSignalMembers,
    DocPubSlotMembers,
    DocProSlotMembers,
    DocPriSlotMembers,
    DocEventMembers,
    DocPropMembers,
    DocFriendMembers,
}

use MemberListKind as K;

impl MemberListKind {
    /// Number of list kinds.
    pub const COUNT: usize = 71;

    /// Every list kind, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        K::PubTypes,
        K::PubMethods,
        K::PubStaticMethods,
        K::PubAttribs,
        K::PubStaticAttribs,
        K::PubSlots,
        K::ProTypes,
        K::ProMethods,
        K::ProStaticMethods,
        K::ProAttribs,
        K::ProStaticAttribs,
        K::ProSlots,
        K::PacTypes,
        K::PacMethods,
        K::PacStaticMethods,
        K::PacAttribs,
        K::PacStaticAttribs,
        K::PriTypes,
        K::PriMethods,
        K::PriStaticMethods,
        K::PriAttribs,
        K::PriStaticAttribs,
        K::PriSlots,
        K::Signals,
        K::DcopMethods,
        K::Properties,
        K::Events,
        K::Friends,
        K::Related,
        K::Services,
        K::Interfaces,
        K::TypedefMembers,
        K::EnumMembers,
        K::ServiceMembers,
        K::InterfaceMembers,
        K::Constructors,
        K::FunctionMembers,
        K::RelatedMembers,
        K::VariableMembers,
        K::PropertyMembers,
        K::EventMembers,
        K::DecDefineMembers,
        K::DecTypedefMembers,
        K::DecSequenceMembers,
        K::DecDictionaryMembers,
        K::DecEnumMembers,
        K::DecEnumValMembers,
        K::DecFuncMembers,
        K::DecVarMembers,
        K::DecSignalMembers,
        K::DecPubSlotMembers,
        K::DecProSlotMembers,
        K::DecPriSlotMembers,
        K::DecEventMembers,
        K::DecPropMembers,
        K::DecFriendMembers,
        K::DocDefineMembers,
        K::DocTypedefMembers,
        K::DocSequenceMembers,
        K::DocDictionaryMembers,
        K::DocEnumMembers,
        K::DocEnumValMembers,
        K::DocFuncMembers,
        K::DocVarMembers,
        K::DocSignalMembers,
        K::DocPubSlotMembers,
        K::DocProSlotMembers,
        K::DocPriSlotMembers,
        K::DocEventMembers,
        K::DocPropMembers,
        K::DocFriendMembers,
    ];

    /// Class declaration lists whose visible members make up the flat member index.
    pub const CLASS_SUMMARY: [Self; 29] = [
        K::PubTypes,
        K::PubMethods,
        K::PubStaticMethods,
        K::PubAttribs,
        K::PubStaticAttribs,
        K::PubSlots,
        K::ProTypes,
        K::ProMethods,
        K::ProStaticMethods,
        K::ProAttribs,
        K::ProStaticAttribs,
        K::ProSlots,
        K::PacTypes,
        K::PacMethods,
        K::PacStaticMethods,
        K::PacAttribs,
        K::PacStaticAttribs,
        K::PriTypes,
        K::PriMethods,
        K::PriStaticMethods,
        K::PriAttribs,
        K::PriStaticAttribs,
        K::PriSlots,
        K::Signals,
        K::DcopMethods,
        K::Properties,
        K::Events,
        K::Friends,
        K::Related,
    ];

    /// Declaration lists shown for files, namespaces and modules.
    pub const CONTAINER_DECLARATIONS: [Self; 15] = [
        K::DecDefineMembers,
        K::DecTypedefMembers,
        K::DecSequenceMembers,
        K::DecDictionaryMembers,
        K::DecEnumMembers,
        K::DecEnumValMembers,
        K::DecFuncMembers,
        K::DecVarMembers,
        K::DecSignalMembers,
        K::DecPubSlotMembers,
        K::DecProSlotMembers,
        K::DecPriSlotMembers,
        K::DecEventMembers,
        K::DecPropMembers,
        K::DecFriendMembers,
    ];

    /// Position of this kind in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this is a documentation (detailed) list rather than a declaration list.
    #[must_use]
    pub const fn is_detailed(self) -> bool {
        matches!(
            self,
            K::TypedefMembers
                | K::EnumMembers
                | K::ServiceMembers
                | K::InterfaceMembers
                | K::Constructors
                | K::FunctionMembers
                | K::RelatedMembers
                | K::VariableMembers
                | K::PropertyMembers
                | K::EventMembers
                | K::DocDefineMembers
                | K::DocTypedefMembers
                | K::DocSequenceMembers
                | K::DocDictionaryMembers
                | K::DocEnumMembers
                | K::DocEnumValMembers
                | K::DocFuncMembers
                | K::DocVarMembers
                | K::DocSignalMembers
                | K::DocPubSlotMembers
                | K::DocProSlotMembers
                | K::DocPriSlotMembers
                | K::DocEventMembers
                | K::DocPropMembers
                | K::DocFriendMembers
        )
    }

    /// Anchor used for the list section in generated output.
    #[must_use]
    pub const fn anchor(self) -> &'static str {
        match self {
            K::PubTypes => "pub-types",
            K::PubMethods => "pub-methods",
            K::PubStaticMethods => "pub-static-methods",
            K::PubAttribs => "pub-attribs",
            K::PubStaticAttribs => "pub-static-attribs",
            K::PubSlots => "pub-slots",
            K::ProTypes => "pro-types",
            K::ProMethods => "pro-methods",
            K::ProStaticMethods => "pro-static-methods",
            K::ProAttribs => "pro-attribs",
            K::ProStaticAttribs => "pro-static-attribs",
            K::ProSlots => "pro-slots",
            K::PacTypes => "pac-types",
            K::PacMethods => "pac-methods",
            K::PacStaticMethods => "pac-static-methods",
            K::PacAttribs => "pac-attribs",
            K::PacStaticAttribs => "pac-static-attribs",
            K::PriTypes => "pri-types",
            K::PriMethods => "pri-methods",
            K::PriStaticMethods => "pri-static-methods",
            K::PriAttribs => "pri-attribs",
            K::PriStaticAttribs => "pri-static-attribs",
            K::PriSlots => "pri-slots",
            K::Signals => "signals",
            K::DcopMethods => "dcop-methods",
            K::Properties => "properties",
            K::Events => "events",
            K::Friends => "friends",
            K::Related => "related",
            K::Services => "services",
            K::Interfaces => "interfaces",
            K::TypedefMembers | K::DecTypedefMembers | K::DocTypedefMembers => "typedef-members",
            K::EnumMembers | K::DecEnumMembers | K::DocEnumMembers => "enum-members",
            K::ServiceMembers => "service-members",
            K::InterfaceMembers => "interface-members",
            K::Constructors => "constructors",
            K::FunctionMembers | K::DecFuncMembers | K::DocFuncMembers => "func-members",
            K::RelatedMembers => "related-members",
            K::VariableMembers | K::DecVarMembers | K::DocVarMembers => "var-members",
            K::PropertyMembers | K::DecPropMembers | K::DocPropMembers => "prop-members",
            K::EventMembers | K::DecEventMembers | K::DocEventMembers => "event-members",
            K::DecDefineMembers | K::DocDefineMembers => "define-members",
            K::DecSequenceMembers | K::DocSequenceMembers => "sequence-members",
            K::DecDictionaryMembers | K::DocDictionaryMembers => "dictionary-members",
            K::DecEnumValMembers | K::DocEnumValMembers => "enumval-members",
            K::DecSignalMembers | K::DocSignalMembers => "signal-members",
            K::DecPubSlotMembers | K::DocPubSlotMembers => "pub-slot-members",
            K::DecProSlotMembers | K::DocProSlotMembers => "pro-slot-members",
            K::DecPriSlotMembers | K::DocPriSlotMembers => "pri-slot-members",
            K::DecFriendMembers | K::DocFriendMembers => "friend-members",
        }
    }
}
