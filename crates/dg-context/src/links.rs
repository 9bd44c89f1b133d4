//! Name resolution against the entity model.

use dg_model::{Entity, EntityModel};
use dg_renderer::{LinkResolver, LinkTarget};

/// Link target of an entity's documentation.
#[must_use]
pub fn link_target(entity: &Entity) -> LinkTarget {
    LinkTarget {
        file: entity.output_file.clone(),
        anchor: entity.anchor.clone(),
        external: entity.external.clone(),
    }
}

/// Resolves names in docs and source code to linkable entities.
///
/// Names may use `.` or `\` as scope separator and carry a trailing `()`.
pub struct ModelLinks<'a> {
    model: &'a EntityModel,
}

impl<'a> ModelLinks<'a> {
    #[must_use]
    pub fn new(model: &'a EntityModel) -> Self {
        Self { model }
    }

    fn find(&self, name: &str) -> Option<&'a Entity> {
        let name = name.strip_suffix("()").unwrap_or(name);
        self.model
            .find(name)
            .or_else(|| self.model.find(&name.replace('.', "::")))
            .or_else(|| self.model.find(&name.replace('\\', "::")))
    }
}

impl LinkResolver for ModelLinks<'_> {
    fn resolve(&self, name: &str) -> Option<LinkTarget> {
        self.find(name)
            .filter(|entity| entity.is_linkable())
            .map(link_target)
    }
}

#[cfg(test)]
mod tests {
    use dg_model::{ClassData, EntityData, EntityFlags, ModelBuilder, NamespaceData};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_with_alternate_separators() {
        let mut builder = ModelBuilder::new();
        let ns = builder.add(
            Entity::new("geo", EntityData::Namespace(NamespaceData::default()))
                .with_output_file("namespacegeo"),
        );
        builder.add(
            Entity::new("geo::Point", EntityData::Class(ClassData::default()))
                .with_outer(ns)
                .with_output_file("classgeo_1_1Point"),
        );
        builder.add(
            Entity::new("geo::Hidden", EntityData::Class(ClassData::default()))
                .with_outer(ns)
                .with_flags(EntityFlags {
                    hidden: true,
                    ..EntityFlags::default()
                }),
        );
        let model = builder.build().unwrap();
        let links = ModelLinks::new(&model);

        let expected = Some(LinkTarget::new("classgeo_1_1Point", ""));
        assert_eq!(links.resolve("geo::Point"), expected);
        assert_eq!(links.resolve("geo.Point"), expected);
        assert_eq!(links.resolve("geo::Point()"), expected);
        assert_eq!(links.resolve("geo::Hidden"), None);
        assert_eq!(links.resolve("nowhere"), None);
    }
}
