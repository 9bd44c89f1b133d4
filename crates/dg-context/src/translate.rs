//! English UI strings exposed to templates as `tr`.
//!
//! Fixed phrases are plain strings. Sentences that embed caller data are
//! callables; list sentences take an element count and return a pattern with
//! `@0`, `@1`, ... markers that the template fills in.

use std::fmt::Write;
use std::sync::LazyLock;

use crate::registry::PropertyMap;
use crate::value::{StructContext, Value};

/// Translated UI strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TranslateContext;

/// `@0, @1, and @2` style placeholder list for `count` elements.
#[must_use]
pub fn write_list(count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        write!(out, "@{i}").unwrap();
        if i + 1 < count {
            out.push_str(match (i + 2 == count, count > 2) {
                (false, _) => ", ",
                (true, true) => ", and ",
                (true, false) => " and ",
            });
        }
    }
    out
}

/// Callable checking its argument count before formatting.
fn sentence(name: &'static str, arity: usize, build: fn(&[Value]) -> String) -> Value {
    Value::function(move |args| {
        if args.len() != arity {
            tracing::error!(
                function = name,
                expected = arity,
                given = args.len(),
                "Wrong number of arguments"
            );
            return Value::None;
        }
        Value::from(build(args))
    })
}

/// Sentence around a placeholder list whose length is the single argument.
fn list_sentence(name: &'static str, build: fn(String) -> String) -> Value {
    Value::function(move |args| {
        let [count] = args else {
            tracing::error!(
                function = name,
                expected = 1,
                given = args.len(),
                "Wrong number of arguments"
            );
            return Value::None;
        };
        let count = usize::try_from(count.to_int()).unwrap_or(0);
        Value::from(build(write_list(count)))
    })
}

const PHRASES: &[(&str, &str)] = &[
    ("additionalInheritedMembers", "Additional Inherited Members"),
    ("callGraph", "Here is the call graph for this function:"),
    ("callerGraph", "Here is the caller graph for this function:"),
    ("classDocumentation", "Class Documentation"),
    ("classes", "Classes"),
    ("classHierarchy", "Class Hierarchy"),
    ("classHierarchyDescription", "This inheritance list is sorted roughly, but not completely, alphabetically:"),
    ("classIndex", "Class Index"),
    ("classList", "Class List"),
    ("classListDescription", "Here are the classes, structs, unions and interfaces with brief descriptions:"),
    ("classMembers", "Class Members"),
    ("concepts", "Concepts"),
    ("conceptDefinition", "Concept definition"),
    ("defineValue", "Value:"),
    ("detailedDesc", "Detailed Description"),
    ("dirDocumentation", "Directory Documentation"),
    ("dirIndex", "Directory Index"),
    ("directories", "Directories"),
    ("enumName", "enum"),
    ("enumValue", "enum value"),
    ("enumerationValues", "Enumerator"),
    ("exampleList", "Here is a list of all examples:"),
    ("examples", "Examples"),
    ("fileDocumentation", "File Documentation"),
    ("fileList", "File List"),
    ("fileListDescription", "Here is a list of all files with brief descriptions:"),
    ("fileMembers", "File Members"),
    ("files", "Files"),
    ("generatedBy", "Generated by"),
    ("goToSourceCode", "Go to the source code of this file."),
    ("gotoDocumentation", "Go to the documentation of this file."),
    ("includedByDependencyGraph", "This graph shows which files directly or indirectly include this file:"),
    ("incInheritedMembers", "including all inherited members."),
    ("index", "Index"),
    ("listOfAllMembers", "List of all members"),
    ("loading", "Loading..."),
    ("mainPage", "Main Page"),
    ("memberList", "Member List"),
    ("modules", "Modules"),
    ("modulesDescription", "Here is a list of all modules:"),
    ("more", "More..."),
    ("namespaceDocumentation", "Namespace Documentation"),
    ("namespaceList", "Namespace List"),
    ("namespaceListDescription", "Here is a list of all namespaces with brief descriptions:"),
    ("namespaceMembers", "Namespace Members"),
    ("namespaces", "Namespaces"),
    ("noMatches", "No Matches"),
    ("pages", "Related Pages"),
    ("panelSyncOff", "disable sync"),
    ("panelSyncOn", "enable sync"),
    ("referenceManual", "Reference Manual"),
    ("relatedPagesDescription", "Here is a list of all related documentation pages:"),
    ("search", "Search"),
    ("searching", "Searching..."),
    ("sourceFile", "Source File"),
    ("theListOfAllMembers", "This is the complete list of members for"),
];

static PROPERTIES: LazyLock<PropertyMap<TranslateContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("TranslateContext");
    for &(name, text) in PHRASES {
        map.add(name, move |_: &TranslateContext| Value::from(text));
    }
    map.add("generatedAt", |_| {
        sentence("generatedAt", 2, |args| {
            format!("Generated on {} for {}", args[0], args[1])
        })
    });
    map.add("inheritanceDiagramFor", |_| {
        sentence("inheritanceDiagramFor", 1, |args| {
            format!("Inheritance diagram for {}:", args[0])
        })
    });
    map.add("collaborationDiagramFor", |_| {
        sentence("collaborationDiagramFor", 1, |args| {
            format!("Collaboration diagram for {}:", args[0])
        })
    });
    map.add("includeDependencyGraph", |_| {
        sentence("includeDependencyGraph", 1, |args| {
            format!("Include dependency graph for {}:", args[0])
        })
    });
    map.add("dirDependencyGraphFor", |_| {
        sentence("dirDependencyGraphFor", 1, |args| {
            format!("Directory dependency graph for {}:", args[0])
        })
    });
    map.add("definedAtLineInSourceFile", |_| {
        Value::from("Definition at line @0 of file @1.")
    });
    map.add("inheritedFrom", |_| {
        sentence("inheritedFrom", 2, |args| {
            format!("{} inherited from {}", args[0], args[1])
        })
    });
    map.add("fileIn", |_| {
        sentence("fileIn", 1, |args| format!("File in {}", args[0]))
    });
    map.add("writeList", |_| list_sentence("writeList", |list| list));
    map.add("inheritsList", |_| {
        list_sentence("inheritsList", |list| format!("Inherits {list}."))
    });
    map.add("inheritedByList", |_| {
        list_sentence("inheritedByList", |list| format!("Inherited by {list}."))
    });
    map.add("implementedBy", |_| {
        list_sentence("implementedBy", |list| format!("Implemented in {list}."))
    });
    map.add("reimplementedBy", |_| {
        list_sentence("reimplementedBy", |list| format!("Reimplemented in {list}."))
    });
    map.add("sourceRefs", |_| {
        list_sentence("sourceRefs", |list| format!("References {list}."))
    });
    map.add("sourceRefBys", |_| {
        list_sentence("sourceRefBys", |list| format!("Referenced by {list}."))
    });
    map.add("reimplements", |_| Value::from("Reimplemented from @0."));
    map.add("implements", |_| Value::from("Implements @0."));
    map
});

impl StructContext for TranslateContext {
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

    #[test]
    fn test_write_list() {
        assert_eq!(write_list(0), "");
        assert_eq!(write_list(1), "@0");
        assert_eq!(write_list(2), "@0 and @1");
        assert_eq!(write_list(3), "@0, @1, and @2");
    }

    #[test]
    fn test_sentence_with_arguments() {
        let tr = TranslateContext;
        let generated = tr
            .get("generatedAt")
            .call(&[Value::from("Mon Jan 5 2026"), Value::from("Shapes")]);
        assert_eq!(generated.to_string(), "Generated on Mon Jan 5 2026 for Shapes");
        assert_eq!(
            tr.get("inheritsList").call(&[Value::Int(2)]).to_string(),
            "Inherits @0 and @1."
        );
    }

    #[test]
    fn test_wrong_arity_is_empty() {
        let tr = TranslateContext;
        assert!(tr.get("generatedAt").call(&[Value::from("x")]).is_none());
        assert!(tr.get("sourceRefs").call(&[]).is_none());
    }

    #[test]
    fn test_fields_resolve() {
        let tr = TranslateContext;
        let fields = tr.fields();
        assert!(fields.windows(2).all(|pair| pair[0] < pair[1]));
        for name in fields {
            assert!(!tr.get(name).is_none(), "{name}");
        }
    }
}
