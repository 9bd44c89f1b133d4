//! Template engine that dumps the property graph as JSON.
//!
//! Every property of the root is written to `index.json`, expanding nested
//! structures and lists down to a fixed depth. Deeper lists collapse to
//! their length and deeper structures to their `name`, so cyclic relations
//! (a class and its members, a member and its class) stay finite.

use std::path::Path;

use dg_context::{GenerateError, RootContext, StructContext, TemplateEngine, Value};
use serde_json::{Map, Value as Json};

/// Levels below the root that are expanded.
const DEFAULT_DEPTH: usize = 3;

/// Output file name.
const INDEX_FILE: &str = "index.json";

/// Writes the property graph reachable from the root as pretty JSON.
pub(crate) struct JsonDumpEngine {
    depth: usize,
}

impl JsonDumpEngine {
    pub(crate) fn new() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }

    #[cfg(test)]
    fn with_depth(depth: usize) -> Self {
        Self { depth }
    }
}

impl TemplateEngine for JsonDumpEngine {
    fn render(&mut self, root: &RootContext, output_dir: &Path) -> Result<usize, GenerateError> {
        let json = struct_to_json(root, self.depth);
        let text = serde_json::to_string_pretty(&json)
            .map_err(|err| GenerateError::Engine(err.to_string()))?;
        let path = output_dir.join(INDEX_FILE);
        std::fs::write(&path, text).map_err(|source| GenerateError::Io { path, source })?;
        tracing::debug!(depth = self.depth, "Wrote property dump");
        Ok(1)
    }
}

fn struct_to_json(context: &dyn StructContext, depth: usize) -> Json {
    let map: Map<String, Json> = context
        .fields()
        .into_iter()
        .map(|field| (field.to_owned(), to_json(&context.get(field), depth)))
        .collect();
    Json::Object(map)
}

fn to_json(value: &Value, depth: usize) -> Json {
    match value {
        Value::None => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::String(s) => Json::String((**s).to_owned()),
        Value::Function(_) => Json::String(value.to_string()),
        Value::List(list) if depth == 0 => Json::from(list.count()),
        Value::List(list) => Json::Array(
            (0..list.count())
                .map(|index| to_json(&list.at(index), depth - 1))
                .collect(),
        ),
        Value::Struct(context) if depth == 0 => match context.get("name") {
            Value::String(name) => Json::String((*name).to_owned()),
            _ => Json::Null,
        },
        Value::Struct(context) => struct_to_json(context.as_ref(), depth - 1),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dg_config::Config;
    use dg_context::{Generator, RenderSession};
    use dg_model::{EntityModel, OutputFormat};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const MODEL: &str = r#"{
        "entities": [
            { "kind": "class", "name": "geo::Shape", "brief": "A shape.", "output_file": "classgeo_1_1Shape" },
            { "kind": "class", "name": "geo::Circle", "bases": [{ "class": 0 }],
              "output_file": "classgeo_1_1Circle", "member_lists": { "pubMethods": [2] } },
            { "kind": "member", "name": "geo::Circle::area", "outer": 1, "member_type": "function",
              "type": "double", "args": "() const" }
        ]
    }"#;

    fn generate(dir: &Path, formats: Vec<OutputFormat>, depth: usize) -> Json {
        let model = EntityModel::from_json(MODEL).unwrap();
        let mut config = Config::default();
        config.output_resolved.dir = dir.to_path_buf();
        config.output_resolved.formats = formats;
        let session = RenderSession::new(Arc::new(model), Arc::new(config));
        let report = Generator::new(session)
            .with_parallel(false)
            .run(&mut JsonDumpEngine::with_depth(depth));
        assert!(report.is_success());
        let text = std::fs::read_to_string(dir.join("html").join(INDEX_FILE)).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_dump_expands_class_list() {
        let dir = tempfile::tempdir().unwrap();
        let json = generate(dir.path(), vec![OutputFormat::Html], 2);

        assert_eq!(json["outputFormat"], "html");
        assert_eq!(json["config"]["PROJECT_NAME"], "My Project");
        let classes = json["classList"].as_array().unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0]["name"], "geo::Circle");
        assert_eq!(classes[1]["brief"], "A shape.");
    }

    #[test]
    fn test_dump_collapses_below_depth() {
        let dir = tempfile::tempdir().unwrap();
        let json = generate(dir.path(), vec![OutputFormat::Html], 1);

        assert_eq!(json["classList"], json!(["geo::Circle", "geo::Shape"]));
        assert_eq!(json["generator"]["name"], "docgen");
    }

    #[test]
    fn test_dump_at_depth_zero_summarizes_root() {
        let dir = tempfile::tempdir().unwrap();
        let json = generate(dir.path(), vec![OutputFormat::Html], 0);

        assert_eq!(json["classList"], 2);
        assert_eq!(json["generator"], "docgen");
        assert_eq!(json["config"], Json::Null);
    }

    #[test]
    fn test_dump_writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        generate(dir.path(), vec![OutputFormat::Html, OutputFormat::Man], 0);
        assert!(dir.path().join("man").join(INDEX_FILE).is_file());
    }
}
