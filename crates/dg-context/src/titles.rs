//! Member list titles.
//!
//! Titles depend on the list kind and on the language the output is tuned
//! for. The tables below hold the defaults plus per-mode overrides.

use dg_config::OptimizeLanguage;
use dg_model::{Language, MemberListKind as K};

/// Title variant selected by language and configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TitleMode {
    Default,
    ObjC,
    C,
    Java,
    Fortran,
    Vhdl,
    Slice,
}

impl TitleMode {
    /// Mode for an entity written in `language` under the configured optimization.
    ///
    /// Objective-C entities always use Objective-C titles.
    #[must_use]
    pub fn new(optimize: OptimizeLanguage, language: Language) -> Self {
        if language.uses_objc_titles() {
            return Self::ObjC;
        }
        match optimize {
            OptimizeLanguage::Default => Self::Default,
            OptimizeLanguage::C => Self::C,
            OptimizeLanguage::Java => Self::Java,
            OptimizeLanguage::Fortran => Self::Fortran,
            OptimizeLanguage::Vhdl => Self::Vhdl,
            OptimizeLanguage::Slice => Self::Slice,
        }
    }
}

const DEFAULT_TITLES: &[(K, &str)] = &[
    (K::PubTypes, "Public Types"),
    (K::PubMethods, "Public Member Functions"),
    (K::PubStaticMethods, "Static Public Member Functions"),
    (K::PubAttribs, "Public Attributes"),
    (K::PubStaticAttribs, "Static Public Attributes"),
    (K::PubSlots, "Public Slots"),
    (K::ProTypes, "Protected Types"),
    (K::ProMethods, "Protected Member Functions"),
    (K::ProStaticMethods, "Static Protected Member Functions"),
    (K::ProAttribs, "Protected Attributes"),
    (K::ProStaticAttribs, "Static Protected Attributes"),
    (K::ProSlots, "Protected Slots"),
    (K::PacTypes, "Package Types"),
    (K::PacMethods, "Package Functions"),
    (K::PacStaticMethods, "Static Package Functions"),
    (K::PacAttribs, "Package Attributes"),
    (K::PacStaticAttribs, "Static Package Attributes"),
    (K::PriTypes, "Private Types"),
    (K::PriMethods, "Private Member Functions"),
    (K::PriStaticMethods, "Static Private Member Functions"),
    (K::PriAttribs, "Private Attributes"),
    (K::PriStaticAttribs, "Static Private Attributes"),
    (K::PriSlots, "Private Slots"),
    (K::Signals, "Signals"),
    (K::DcopMethods, "DCOP Member Functions"),
    (K::Properties, "Properties"),
    (K::Events, "Events"),
    (K::Friends, "Friends"),
    (K::Related, "Related Symbols"),
    (K::Services, "Services"),
    (K::Interfaces, "Exported Interfaces"),
    (K::TypedefMembers, "Member Typedef Documentation"),
    (K::EnumMembers, "Member Enumeration Documentation"),
    (K::ServiceMembers, "Service Documentation"),
    (K::InterfaceMembers, "Interface Documentation"),
    (K::Constructors, "Constructor & Destructor Documentation"),
    (K::FunctionMembers, "Member Function Documentation"),
    (K::RelatedMembers, "Friends And Related Symbol Documentation"),
    (K::VariableMembers, "Member Data Documentation"),
    (K::PropertyMembers, "Property Documentation"),
    (K::EventMembers, "Event Documentation"),
    (K::DecDefineMembers, "Macros"),
    (K::DecTypedefMembers, "Typedefs"),
    (K::DecSequenceMembers, "Sequences"),
    (K::DecDictionaryMembers, "Dictionaries"),
    (K::DecEnumMembers, "Enumerations"),
    (K::DecEnumValMembers, "Enumerator"),
    (K::DecFuncMembers, "Functions"),
    (K::DecVarMembers, "Variables"),
    (K::DecSignalMembers, "Signals"),
    (K::DecPubSlotMembers, "Public Slots"),
    (K::DecProSlotMembers, "Protected Slots"),
    (K::DecPriSlotMembers, "Private Slots"),
    (K::DecEventMembers, "Events"),
    (K::DecPropMembers, "Properties"),
    (K::DecFriendMembers, "Friends"),
    (K::DocDefineMembers, "Macro Definition Documentation"),
    (K::DocTypedefMembers, "Typedef Documentation"),
    (K::DocSequenceMembers, "Sequence Documentation"),
    (K::DocDictionaryMembers, "Dictionary Documentation"),
    (K::DocEnumMembers, "Enumeration Type Documentation"),
    (K::DocEnumValMembers, "Enumerator Documentation"),
    (K::DocFuncMembers, "Function Documentation"),
    (K::DocVarMembers, "Variable Documentation"),
    (K::DocSignalMembers, "Signal Documentation"),
    (K::DocPubSlotMembers, "Public Slot Documentation"),
    (K::DocProSlotMembers, "Protected Slot Documentation"),
    (K::DocPriSlotMembers, "Private Slot Documentation"),
    (K::DocEventMembers, "Event Documentation"),
    (K::DocPropMembers, "Property Documentation"),
    (K::DocFriendMembers, "Friend Documentation"),
];

const TITLE_OVERRIDES: &[(K, TitleMode, &str)] = &[
    (K::PubMethods, TitleMode::ObjC, "Instance Methods"),
    (K::PubStaticMethods, TitleMode::ObjC, "Class Methods"),
    (K::ProMethods, TitleMode::ObjC, "Protected Instance Methods"),
    (K::ProStaticMethods, TitleMode::ObjC, "Protected Class Methods"),
    (K::PriMethods, TitleMode::ObjC, "Private Instance Methods"),
    (K::PriStaticMethods, TitleMode::ObjC, "Private Class Methods"),
    (K::FunctionMembers, TitleMode::ObjC, "Method Documentation"),
    (K::PubAttribs, TitleMode::C, "Data Fields"),
    (K::VariableMembers, TitleMode::C, "Field Documentation"),
    (K::PubAttribs, TitleMode::Slice, "Data Members"),
    (K::DecVarMembers, TitleMode::Slice, "Constants"),
    (K::PubMethods, TitleMode::Fortran, "Public Member Functions/Subroutines"),
    (K::PubStaticMethods, TitleMode::Fortran, "Static Public Member Functions/Subroutines"),
    (K::FunctionMembers, TitleMode::Fortran, "Member Function/Subroutine Documentation"),
    (K::DecFuncMembers, TitleMode::Fortran, "Functions/Subroutines"),
    (K::DocFuncMembers, TitleMode::Fortran, "Function/Subroutine Documentation"),
    (K::DecTypedefMembers, TitleMode::Fortran, "Data Types"),
    (K::DecFuncMembers, TitleMode::Vhdl, "Functions"),
    (K::DecVarMembers, TitleMode::Vhdl, "Signals"),
    (K::DecEnumMembers, TitleMode::Java, "Enums"),
];

/// Title of a member list.
#[must_use]
pub fn member_list_title(kind: K, mode: TitleMode) -> &'static str {
    TITLE_OVERRIDES
        .iter()
        .find(|(k, m, _)| *k == kind && *m == mode)
        .map(|(_, _, title)| *title)
        .or_else(|| {
            DEFAULT_TITLES
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, title)| *title)
        })
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_default_title() {
        for kind in K::ALL {
            assert!(
                !member_list_title(kind, TitleMode::Default).is_empty(),
                "{kind:?} has no title"
            );
        }
    }

    #[test]
    fn test_objc_titles() {
        let mode = TitleMode::new(OptimizeLanguage::Default, Language::ObjC);
        assert_eq!(mode, TitleMode::ObjC);
        assert_eq!(member_list_title(K::PubMethods, mode), "Instance Methods");
        assert_eq!(member_list_title(K::PubTypes, mode), "Public Types");
    }

    #[test]
    fn test_optimize_mode_titles() {
        let c = TitleMode::new(OptimizeLanguage::C, Language::Cpp);
        assert_eq!(member_list_title(K::PubAttribs, c), "Data Fields");
        let fortran = TitleMode::new(OptimizeLanguage::Fortran, Language::Fortran);
        assert_eq!(member_list_title(K::DecFuncMembers, fortran), "Functions/Subroutines");
    }
}
