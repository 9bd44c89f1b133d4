//! Loading models from JSON.
//!
//! The model file is a single object with an `entities` array. Entity ids are
//! positions in that array:
//!
//! ```json
//! {
//!   "entities": [
//!     { "kind": "class", "name": "Shape", "brief": "A shape." },
//!     { "kind": "class", "name": "Circle", "bases": [{ "class": 0 }] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::builder::ModelBuilder;
use crate::entity::Entity;
use crate::error::ModelError;
use crate::model::EntityModel;

#[derive(Deserialize)]
struct ModelFile {
    entities: Vec<Entity>,
}

impl EntityModel {
    /// Parse and build a model from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Json`] for malformed input and any error
    /// [`ModelBuilder::build`] reports.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let file: ModelFile = serde_json::from_str(json)?;
        let mut builder = ModelBuilder::new();
        for entity in file.entities {
            builder.add(entity);
        }
        let model = builder.build()?;
        tracing::info!(entities = model.len(), "Loaded entity model");
        Ok(model)
    }

    /// Read a model file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read, otherwise the
    /// errors of [`EntityModel::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entity::{EntityId, EntityKind};
    use crate::member_list::MemberListKind;

    const MODEL: &str = r#"{
        "entities": [
            { "kind": "class", "name": "geo::Shape", "brief": "A shape.", "output_file": "classgeo_1_1Shape" },
            { "kind": "class", "name": "geo::Circle", "bases": [{ "class": 0, "protection": "protected" }],
              "member_lists": { "pubMethods": [2] } },
            { "kind": "member", "name": "geo::Circle::area", "outer": 1, "member_type": "function",
              "type": "double", "args": "() const",
              "details": { "text": "Area.", "file": "circle.h", "line": 12 } }
        ]
    }"#;

    #[test]
    fn test_from_json_builds_model() {
        let model = EntityModel::from_json(MODEL).unwrap();

        assert_eq!(model.len(), 3);
        let shape = model.get(EntityId::new(0));
        assert_eq!(shape.kind(), EntityKind::Class);
        assert_eq!(shape.brief.text, "A shape.");
        assert_eq!(shape.as_class().unwrap().derived[0].class, EntityId::new(1));
        assert_eq!(
            model.member_list(EntityId::new(1), MemberListKind::PubMethods),
            &[EntityId::new(2)]
        );

        let area = model.get(EntityId::new(2));
        assert_eq!(area.as_member().unwrap().type_, "double");
        assert_eq!(area.details.file, "circle.h");
        assert_eq!(area.details.line, 12);
        assert_eq!(area.local_name, "area");
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let err = EntityModel::from_json(r#"{"entities": [{"kind": "widget", "name": "x"}]}"#)
            .unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EntityModel::from_path(&dir.path().join("model.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, MODEL).unwrap();

        let model = EntityModel::from_path(&path).unwrap();
        assert!(model.find("geo::Circle").is_some());
    }
}
