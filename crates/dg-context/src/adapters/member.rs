use std::sync::{Arc, LazyLock};

use dg_model::{EntityId, GraphKind, MemberData, MemberFlags, MemberType, Virtualness};
use dg_renderer::CodeOptions;

use super::{DefinitionAdapter, entity_list, entity_or_false, register_definition};
use crate::info::argument_list;
use crate::registry::PropertyMap;
use crate::session::RenderSession;
use crate::value::{StructContext, Value};

/// Adapter for members: functions, variables, typedefs, enums, defines and
/// the rest of the member types.
pub struct MemberContext {
    session: Arc<RenderSession>,
    id: EntityId,
}

impl MemberContext {
    #[must_use]
    pub fn new(session: Arc<RenderSession>, id: EntityId) -> Self {
        Self { session, id }
    }

    fn with<'a, R: Into<Value>>(&'a self, f: impl FnOnce(&'a MemberData) -> R) -> Value {
        self.entity()
            .as_member()
            .map_or(Value::None, |data| f(data).into())
    }

    fn is_type(&self, member_type: MemberType) -> Value {
        self.with(|d| d.member_type == member_type)
    }

    /// Class owning the member, or the class a related function belongs to.
    fn class(&self) -> Option<EntityId> {
        let entity = self.entity();
        entity
            .outer
            .filter(|&outer| self.session.entity(outer).as_class().is_some())
            .or_else(|| entity.as_member().and_then(|d| d.related_class))
    }

    fn namespace(&self) -> Option<EntityId> {
        self.entity()
            .outer
            .filter(|&outer| self.session.entity(outer).as_namespace().is_some())
    }

    fn file(&self) -> Option<EntityId> {
        let entity = self.entity();
        entity
            .as_member()
            .and_then(|d| d.file)
            .or_else(|| entity.body.map(|body| body.file))
    }

    /// Call or caller graph: enabled globally or for this member, and only
    /// with a layout engine.
    fn has_call_graph(&self, kind: GraphKind) -> bool {
        let graphs = &self.session.config().graphs;
        let Some(data) = self.entity().as_member() else {
            return false;
        };
        let enabled = match kind {
            GraphKind::Call => graphs.call_graph || data.call_graph,
            GraphKind::Caller => graphs.caller_graph || data.caller_graph,
            _ => false,
        };
        enabled
            && data.is_function()
            && self.session.dot_available()
            && self.session.graph_drawable(self.id, kind)
    }

    fn call_graph(&self, kind: GraphKind) -> Value {
        if !self.has_call_graph(kind) {
            return Value::from("");
        }
        let title = self.entity().display_name(true);
        Value::from(self.session.render_graph(self.id, kind, &title))
    }

    fn initializer_as_code(&self) -> String {
        let entity = self.entity();
        let Some(data) = entity.as_member() else {
            return String::new();
        };
        if data.initializer.is_empty() {
            return String::new();
        }
        let options = CodeOptions {
            rel_path: self.session.rel_path().to_owned(),
            scope_name: self
                .class()
                .or_else(|| self.namespace())
                .map(|scope| self.session.entity(scope).name.clone()),
            ..CodeOptions::default()
        };
        self.session
            .render_code(entity.language, &data.initializer, &options)
    }

    /// Linkable members among `ids`, or `false` when none remain.
    fn linkable_or_false(&self, ids: &[EntityId]) -> Value {
        let linkable: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|&id| self.session.entity(id).is_linkable())
            .collect();
        if linkable.is_empty() {
            Value::Bool(false)
        } else {
            entity_list(&self.session, &linkable)
        }
    }

    #[must_use]
    pub fn property_names() -> Vec<&'static str> {
        PROPERTIES.fields()
    }
}

impl DefinitionAdapter for MemberContext {
    fn session(&self) -> &Arc<RenderSession> {
        &self.session
    }

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Qualifier words shown next to a member's declaration.
fn labels(data: &MemberData) -> Vec<&'static str> {
    let flags = &data.flags;
    let mut labels = Vec::new();
    let mut push = |on: bool, label| {
        if on {
            labels.push(label);
        }
    };
    push(flags.is_inline, "inline");
    push(flags.is_explicit, "explicit");
    push(data.is_static, "static");
    push(flags.is_constexpr, "constexpr");
    push(flags.is_mutable, "mutable");
    push(flags.is_noexcept, "noexcept");
    push(data.virtualness == Virtualness::Virtual, "virtual");
    push(data.virtualness == Virtualness::Pure, "pure virtual");
    push(flags.is_override, "override");
    push(flags.is_final, "final");
    push(flags.is_abstract, "abstract");
    push(flags.is_sealed, "sealed");
    push(flags.is_deleted, "delete");
    push(flags.is_defaulted, "default");
    push(flags.is_no_discard, "nodiscard");
    if data.member_type == MemberType::Property {
        push(flags.is_readable || flags.is_gettable, "read");
        push(flags.is_writable || flags.is_settable, "write");
        push(flags.is_nonatomic, "nonatomic");
        push(flags.is_weak, "weak");
        push(flags.is_strong, "strong");
        push(flags.is_copy, "copy");
        push(flags.is_retain, "retain");
        push(flags.is_unretained, "unsafe_unretained");
    }
    if data.member_type == MemberType::Event {
        push(flags.is_addable, "add");
        push(flags.is_removable, "remove");
        push(flags.is_raisable, "raise");
    }
    push(flags.is_optional, "optional");
    push(flags.is_required, "required");
    labels
}

fn string_list(items: &[&'static str]) -> Value {
    Value::list(items.iter().map(|&item| Value::from(item)).collect())
}

#[allow(clippy::too_many_lines)]
static PROPERTIES: LazyLock<PropertyMap<MemberContext>> = LazyLock::new(|| {
    let mut map = PropertyMap::new("MemberContext");
    register_definition(&mut map);

    let member_types: [(&'static str, MemberType); 16] = [
        ("isDefine", MemberType::Define),
        ("isFunction", MemberType::Function),
        ("isVariable", MemberType::Variable),
        ("isTypedef", MemberType::Typedef),
        ("isEnumeration", MemberType::Enumeration),
        ("isEnumValue", MemberType::EnumValue),
        ("isSignal", MemberType::Signal),
        ("isSlot", MemberType::Slot),
        ("isFriend", MemberType::Friend),
        ("isDCOP", MemberType::Dcop),
        ("isProperty", MemberType::Property),
        ("isEvent", MemberType::Event),
        ("isInterface", MemberType::Interface),
        ("isService", MemberType::Service),
        ("isSequence", MemberType::Sequence),
        ("isDictionary", MemberType::Dictionary),
    ];
    for (name, member_type) in member_types {
        map.add(name, move |c: &MemberContext| c.is_type(member_type));
    }

    let flags: [(&'static str, fn(&MemberFlags) -> bool); 41] = [
        ("isConst", |f| f.is_const),
        ("isVolatile", |f| f.is_volatile),
        ("isInline", |f| f.is_inline),
        ("isExplicit", |f| f.is_explicit),
        ("isMutable", |f| f.is_mutable),
        ("isReadable", |f| f.is_readable),
        ("isWritable", |f| f.is_writable),
        ("isDeleted", |f| f.is_deleted),
        ("isDefaulted", |f| f.is_defaulted),
        ("isNoExcept", |f| f.is_noexcept),
        ("isFinal", |f| f.is_final),
        ("isOverride", |f| f.is_override),
        ("isAbstract", |f| f.is_abstract),
        ("isSealed", |f| f.is_sealed),
        ("isConstExpr", |f| f.is_constexpr),
        ("isOptional", |f| f.is_optional),
        ("isRequired", |f| f.is_required),
        ("isTransient", |f| f.is_transient),
        ("isInitonly", |f| f.is_initonly),
        ("isAttribute", |f| f.is_attribute),
        ("isUnretained", |f| f.is_unretained),
        ("isRetain", |f| f.is_retain),
        ("isCopy", |f| f.is_copy),
        ("isWeak", |f| f.is_weak),
        ("isStrong", |f| f.is_strong),
        ("isNonAtomic", |f| f.is_nonatomic),
        ("isGettable", |f| f.is_gettable),
        ("isSettable", |f| f.is_settable),
        ("isAddable", |f| f.is_addable),
        ("isRemovable", |f| f.is_removable),
        ("isRaisable", |f| f.is_raisable),
        ("isMaybeVoid", |f| f.is_maybe_void),
        ("isMaybeDefault", |f| f.is_maybe_default),
        ("isMaybeAmbiguous", |f| f.is_maybe_ambiguous),
        ("isBound", |f| f.is_bound),
        ("isConstrained", |f| f.is_constrained),
        ("isNoDiscard", |f| f.is_no_discard),
        ("isSlotFlag", |f| f.is_slot),
        ("isSignalFlag", |f| f.is_signal),
        ("isObjCMethod", |f| f.is_objc_method),
        ("isObjCProperty", |f| f.is_objc_property),
    ];
    for (name, flag) in flags {
        map.add(name, move |c: &MemberContext| c.with(|d| flag(&d.flags)));
    }

    map.add("title", |c: &MemberContext| Value::from(c.entity().display_name(false)));
    map.add("memberType", |c| c.with(|d| d.member_type.as_str()));
    map.add("protection", |c| c.with(|d| d.protection.as_str()));
    map.add("virtualness", |c| c.with(|d| d.virtualness.as_str()));
    map.add("isVirtual", |c| c.with(|d| d.virtualness != Virtualness::Normal));
    map.add("isPure", |c| c.with(|d| d.virtualness == Virtualness::Pure));
    map.add("isStatic", |c| c.with(|d| d.is_static));
    map.add("isFunctionPtr", |c| {
        c.with(|d| d.member_type == MemberType::Variable && d.type_.contains("(*"))
    });
    map.add("isEnumStruct", |c| {
        c.with(|d| d.member_type == MemberType::Enumeration && d.type_.contains("class"))
    });
    map.add("isRelated", |c| c.with(|d| d.related_class.is_some()));
    map.add("type", |c| c.with(|d| d.type_.as_str()));
    map.add("fieldType", |c| {
        c.with(|d| match d.member_type {
            MemberType::Variable | MemberType::Property => d.type_.as_str(),
            _ => "",
        })
    });
    map.add("args", |c| c.with(|d| d.args.as_str()));
    map.add("definition", |c| c.with(|d| d.definition.as_str()));
    map.add("trailingReturnType", |c| c.with(|d| d.trailing_return_type.as_str()));
    map.add("exception", |c| c.with(|d| d.exception.as_str()));
    map.add("bitfields", |c| c.with(|d| d.bitfield.as_str()));
    map.add("readAccessor", |c| c.with(|d| d.read_accessor.as_str()));
    map.add("writeAccessor", |c| c.with(|d| d.write_accessor.as_str()));
    map.add("initializer", |c| c.with(|d| d.initializer.as_str()));
    map.add("initializerAsCode", |c| Value::from(c.initializer_as_code()));
    map.add("hasOneLineInitializer", |c| {
        c.with(|d| !d.initializer.is_empty() && !d.initializer.contains('\n'))
    });
    map.add("hasMultiLineInitializer", |c| c.with(|d| d.initializer.contains('\n')));
    map.add("arguments", |c| c.with(|d| argument_list(&c.session, &d.arguments)));
    map.add("hasParameters", |c| c.with(|d| !d.arguments.is_empty()));
    map.add("templateArgs", |c| {
        c.with(|d| {
            if d.template_args.is_empty() {
                Value::Bool(false)
            } else {
                argument_list(&c.session, &d.template_args)
            }
        })
    });
    map.add("enumValues", |c| c.with(|d| entity_list(&c.session, &d.enum_values)));
    map.add("anonymousType", |c| {
        c.with(|d| entity_or_false(&c.session, d.anonymous_type))
    });
    map.add("labels", |c| c.with(|d| string_list(&labels(d))));
    map.add("reimplements", |c| {
        c.with(|d| {
            let target = d.reimplements.filter(|&id| c.session.entity(id).is_linkable());
            match target {
                Some(target) if !is_pure(&c.session, target) => entity_or_false(&c.session, Some(target)),
                _ => Value::Bool(false),
            }
        })
    });
    map.add("implements", |c| {
        c.with(|d| {
            let target = d.reimplements.filter(|&id| c.session.entity(id).is_linkable());
            match target {
                Some(target) if is_pure(&c.session, target) => entity_or_false(&c.session, Some(target)),
                _ => Value::Bool(false),
            }
        })
    });
    map.add("reimplementedBy", |c| {
        c.with(|d| {
            if d.virtualness == Virtualness::Pure {
                Value::Bool(false)
            } else {
                c.linkable_or_false(&d.reimplemented_by)
            }
        })
    });
    map.add("implementedBy", |c| {
        c.with(|d| {
            if d.virtualness == Virtualness::Pure {
                c.linkable_or_false(&d.reimplemented_by)
            } else {
                Value::Bool(false)
            }
        })
    });
    map.add("sourceRefs", |c| {
        c.with(|d| {
            if c.session.config().source.references_relation {
                c.linkable_or_false(&d.references)
            } else {
                Value::Bool(false)
            }
        })
    });
    map.add("sourceRefBys", |c| {
        c.with(|d| {
            if c.session.config().source.referenced_by_relation {
                c.linkable_or_false(&d.referenced_by)
            } else {
                Value::Bool(false)
            }
        })
    });
    map.add("class", |c| entity_or_false(&c.session, c.class()));
    map.add("namespace", |c| entity_or_false(&c.session, c.namespace()));
    map.add("file", |c| entity_or_false(&c.session, c.file()));
    map.add("category", |c| c.with(|d| entity_or_false(&c.session, d.category)));
    map.add("categoryRelation", |c| {
        c.with(|d| entity_or_false(&c.session, d.category_relation))
    });
    map.add("isBriefSectionVisible", |c| c.with(MemberData::is_brief_section_visible));
    map.add("isDetailedSectionVisible", |c| {
        c.with(MemberData::is_detailed_section_visible)
    });
    map.add("isVisibleInIndex", |c| c.with(|d| d.visible_in_index));
    map.add("hasCallGraph", |c| Value::Bool(c.has_call_graph(GraphKind::Call)));
    map.add("callGraph", |c| c.call_graph(GraphKind::Call));
    map.add("hasCallerGraph", |c| Value::Bool(c.has_call_graph(GraphKind::Caller)));
    map.add("callerGraph", |c| c.call_graph(GraphKind::Caller));
    map
});

fn is_pure(session: &RenderSession, id: EntityId) -> bool {
    session
        .entity(id)
        .as_member()
        .is_some_and(|d| d.virtualness == Virtualness::Pure)
}

impl StructContext for MemberContext {
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

    fn strings(value: &Value) -> Vec<String> {
        let list = value.as_list().unwrap();
        (0..list.count()).map(|i| list.at(i).to_string()).collect()
    }

    #[test]
    fn test_reimplementation_relations() {
        let session = fixture::session();
        let draw = MemberContext::new(Arc::clone(&session), fixture::DRAW);
        assert_eq!(draw.get("reimplementedBy").to_int(), 1);
        assert!(matches!(draw.get("implementedBy"), Value::Bool(false)));
        assert_eq!(strings(&draw.get("labels")), vec!["virtual"]);

        let circle_draw = MemberContext::new(session, fixture::CIRCLE_DRAW);
        assert_eq!(
            circle_draw.get("reimplements").get("name").to_string(),
            "geo::Shape::draw"
        );
        assert_eq!(circle_draw.get("class").get("name").to_string(), "geo::Circle");
        assert!(matches!(circle_draw.get("namespace"), Value::Bool(false)));
    }

    #[test]
    fn test_member_type_predicates() {
        let session = fixture::session();
        let radius = MemberContext::new(Arc::clone(&session), fixture::RADIUS);
        assert!(radius.get("isVariable").to_bool());
        assert!(!radius.get("isFunction").to_bool());
        assert_eq!(radius.get("fieldType").to_string(), "double");
        assert!(!radius.get("isDetailedSectionVisible").to_bool());

        let area = MemberContext::new(session, fixture::AREA);
        assert!(area.get("isFunction").to_bool());
        assert_eq!(area.get("namespace").get("name").to_string(), "geo");
        assert_eq!(area.get("file").get("name").to_string(), "src/shapes.h");
        assert_eq!(area.get("arguments").to_int(), 1);
        assert!(area.get("hasParameters").to_bool());
    }

    #[test]
    fn test_call_graph_needs_layout_engine() {
        let session = fixture::session();
        let area = MemberContext::new(session, fixture::AREA);
        assert!(!area.get("hasCallGraph").to_bool());
        assert_eq!(area.get("callGraph").to_string(), "");
    }

    #[test]
    fn test_source_refs_follow_configuration() {
        let session = fixture::session();
        let area = MemberContext::new(session, fixture::AREA);
        // references_relation is off by default.
        assert!(matches!(area.get("sourceRefs"), Value::Bool(false)));
    }

    #[test]
    fn test_labels_of_property() {
        let mut data = MemberData::of_type(MemberType::Property);
        data.flags.is_readable = true;
        data.flags.is_nonatomic = true;
        assert_eq!(labels(&data), vec!["read", "nonatomic"]);
    }
}
