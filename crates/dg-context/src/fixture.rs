//! Shared entity model for adapter tests.
//!
//! ```text
//! src/                      DIR
//!   shapes.h                FILE   (includes <vector>)
//! geo                       GEO
//!   Shape                   SHAPE  { virtual draw() }
//!   Circle : Shape          CIRCLE { draw(), radius, cache, class Center }
//!   Square : Shape          SQUARE
//!   (anonymous)             HIDDEN
//!   Drawable                CONCEPT
//!   area(const Shape&)      AREA
//! index > intro             MAIN_PAGE, INTRO
//! shapes                    MODULE { Shape, Circle }
//! ```

use std::sync::Arc;

use dg_config::Config;
use dg_model::{
    Argument, ClassData, ConceptData, DirData, Entity, EntityData, EntityFlags, EntityId,
    EntityModel, FileData, IncludeInfo, Language, MemberData, MemberGroup, MemberListKind as K,
    MemberType, ModelBuilder, ModuleData, NamespaceData, PageData, Virtualness,
};

use crate::session::RenderSession;

pub(crate) const DIR: EntityId = EntityId::new(0);
pub(crate) const FILE: EntityId = EntityId::new(1);
pub(crate) const GEO: EntityId = EntityId::new(2);
pub(crate) const SHAPE: EntityId = EntityId::new(3);
pub(crate) const CIRCLE: EntityId = EntityId::new(4);
pub(crate) const CENTER: EntityId = EntityId::new(5);
pub(crate) const SQUARE: EntityId = EntityId::new(6);
pub(crate) const DRAW: EntityId = EntityId::new(7);
pub(crate) const CIRCLE_DRAW: EntityId = EntityId::new(8);
pub(crate) const RADIUS: EntityId = EntityId::new(9);
pub(crate) const AREA: EntityId = EntityId::new(10);
pub(crate) const INTRO: EntityId = EntityId::new(11);
pub(crate) const MAIN_PAGE: EntityId = EntityId::new(12);
pub(crate) const MODULE: EntityId = EntityId::new(13);
pub(crate) const CONCEPT: EntityId = EntityId::new(14);
pub(crate) const HIDDEN: EntityId = EntityId::new(15);
pub(crate) const CACHE: EntityId = EntityId::new(16);

const SOURCE: &str = "#include <vector>\n\
namespace geo {\n\
class Shape { public: virtual void draw(); };\n\
class Circle : public Shape {\n\
public:\n\
    void draw();\n\
    double radius;\n\
};\n\
double area(const Shape& shape);\n\
}\n";

fn class(name: &str, data: ClassData, outer: EntityId, file: &str) -> Entity {
    Entity::new(name, EntityData::Class(data))
        .with_outer(outer)
        .with_output_file(file)
        .with_language(Language::Cpp)
}

fn member(name: &str, data: MemberData, outer: EntityId, file: &str, anchor: &str) -> Entity {
    Entity::new(name, EntityData::Member(data))
        .with_outer(outer)
        .with_output_file(file)
        .with_anchor(anchor)
        .with_language(Language::Cpp)
}

/// The fixture model.
pub(crate) fn model() -> EntityModel {
    let mut b = ModelBuilder::new();

    b.add(
        Entity::new(
            "src",
            EntityData::Dir(DirData {
                path: "src".to_owned(),
                files: vec![FILE],
                ..DirData::default()
            }),
        )
        .with_output_file("dir_src"),
    );
    b.add(
        Entity::new(
            "src/shapes.h",
            EntityData::File(FileData {
                path: "src/shapes.h".to_owned(),
                dir: Some(DIR),
                includes: vec![IncludeInfo {
                    name: "vector".to_owned(),
                    ..IncludeInfo::default()
                }],
                classes: vec![SHAPE, CIRCLE, SQUARE],
                namespaces: vec![GEO],
                source: Some(SOURCE.to_owned()),
                ..FileData::default()
            }),
        )
        .with_output_file("shapes_8h")
        .with_brief("Shape declarations.")
        .with_language(Language::Cpp),
    );
    b.add(
        Entity::new(
            "geo",
            EntityData::Namespace(NamespaceData {
                classes: vec![SHAPE, CIRCLE, SQUARE, HIDDEN],
                concepts: vec![CONCEPT],
                ..NamespaceData::default()
            }),
        )
        .with_output_file("namespacegeo")
        .with_brief("Geometry primitives.")
        .with_language(Language::Cpp),
    );
    b.add(
        class("geo::Shape", ClassData::default(), GEO, "classgeo_1_1Shape")
            .with_brief("Base of all *shapes*.")
            .with_body(FILE, 3, 3),
    );
    b.add(
        class(
            "geo::Circle",
            ClassData {
                inner_classes: vec![CENTER],
                ..ClassData::with_bases([SHAPE])
            },
            GEO,
            "classgeo_1_1Circle",
        )
        .with_brief("A round shape.")
        .with_details("Circles have a radius.")
        .with_body(FILE, 4, 8),
    );
    b.add(class(
        "geo::Circle::Center",
        ClassData::default(),
        CIRCLE,
        "classgeo_1_1Circle_1_1Center",
    ));
    b.add(class(
        "geo::Square",
        ClassData::with_bases([SHAPE]),
        GEO,
        "classgeo_1_1Square",
    ));
    b.add(member(
        "geo::Shape::draw",
        MemberData {
            type_: "void".to_owned(),
            args: "()".to_owned(),
            virtualness: Virtualness::Virtual,
            ..MemberData::of_type(MemberType::Function)
        },
        SHAPE,
        "classgeo_1_1Shape",
        "a1",
    ));
    b.add(
        member(
            "geo::Circle::draw",
            MemberData {
                type_: "void".to_owned(),
                args: "()".to_owned(),
                reimplements: Some(DRAW),
                ..MemberData::of_type(MemberType::Function)
            },
            CIRCLE,
            "classgeo_1_1Circle",
            "a2",
        )
        .with_body(FILE, 6, 6),
    );
    b.add(member(
        "geo::Circle::radius",
        MemberData {
            type_: "double".to_owned(),
            details_visible: false,
            ..MemberData::of_type(MemberType::Variable)
        },
        CIRCLE,
        "classgeo_1_1Circle",
        "a3",
    ));
    b.add(
        member(
            "geo::area",
            MemberData {
                type_: "double".to_owned(),
                args: "(const Shape &shape)".to_owned(),
                arguments: vec![Argument::new("const Shape &", "shape")],
                file: Some(FILE),
                ..MemberData::of_type(MemberType::Function)
            },
            GEO,
            "namespacegeo",
            "a4",
        )
        .with_brief("Area of a shape."),
    );
    b.add(
        Entity::new(
            "intro",
            EntityData::Page(PageData {
                title: "Introduction".to_owned(),
                ..PageData::default()
            }),
        )
        .with_output_file("intro"),
    );
    b.add(
        Entity::new(
            "index",
            EntityData::Page(PageData {
                subpages: vec![INTRO],
                is_main_page: true,
                ..PageData::default()
            }),
        )
        .with_output_file("index"),
    );
    b.add(
        Entity::new(
            "shapes",
            EntityData::Module(ModuleData {
                title: "Shape Primitives".to_owned(),
                classes: vec![SHAPE, CIRCLE],
                member_groups: vec![MemberGroup {
                    header: "Drawing".to_owned(),
                    doc: String::new(),
                    members: vec![DRAW],
                }],
                ..ModuleData::default()
            }),
        )
        .with_output_file("group__shapes"),
    );
    b.add(
        Entity::new(
            "geo::Drawable",
            EntityData::Concept(ConceptData {
                template_args: vec![Argument::new("typename", "T")],
                initializer: "requires(T t) { t.draw(); }".to_owned(),
                include: None,
            }),
        )
        .with_outer(GEO)
        .with_output_file("conceptgeo_1_1Drawable")
        .with_language(Language::Cpp),
    );
    b.add(
        class("geo::@0", ClassData::default(), GEO, "").with_flags(EntityFlags {
            anonymous: true,
            ..EntityFlags::default()
        }),
    );
    b.add(member(
        "geo::Circle::cache",
        MemberData {
            type_: "double".to_owned(),
            brief_visible: false,
            ..MemberData::of_type(MemberType::Variable)
        },
        CIRCLE,
        "classgeo_1_1Circle",
        "a5",
    ));

    b.push_member(SHAPE, K::PubMethods, DRAW);
    b.push_member(SHAPE, K::FunctionMembers, DRAW);
    b.push_member(CIRCLE, K::PubMethods, CIRCLE_DRAW);
    b.push_member(CIRCLE, K::PubSlots, CIRCLE_DRAW);
    b.push_member(CIRCLE, K::PubAttribs, RADIUS);
    b.push_member(CIRCLE, K::PubAttribs, CACHE);
    b.push_member(CIRCLE, K::VariableMembers, RADIUS);
    b.push_member(GEO, K::DecFuncMembers, AREA);
    b.push_member(GEO, K::DocFuncMembers, AREA);
    b.push_member(FILE, K::DecFuncMembers, AREA);
    b.entity_mut(SHAPE).groups.push(MODULE);
    b.entity_mut(CIRCLE).groups.push(MODULE);

    b.build().unwrap()
}

/// Session over the fixture model with default configuration.
pub(crate) fn session() -> Arc<RenderSession> {
    RenderSession::new(Arc::new(model()), Arc::new(Config::default()))
}
