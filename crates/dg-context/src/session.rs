//! Render session: the state shared by every adapter during generation.
//!
//! One session lives for the whole process. Each generation run over the
//! model is bracketed by [`RenderSession::begin_run`] and
//! [`RenderSession::end_run`]; formats are processed one after another with
//! [`RenderSession::set_format`] in between.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use dg_config::Config;
use dg_graphs::{DEFAULT_TIMEOUT, DotLayout, GraphLayout, KrokiLayout, LayoutRequest};
use dg_model::{
    DiagramGraph, Entity, EntityId, EntityModel, GraphKind, Language, OutputFormat, RenderedField,
};
use dg_renderer::{CodeOptions, CodeParser, DocParser, KeywordCodeParser};
use rayon::prelude::*;

use crate::links::ModelLinks;
use crate::titles::TitleMode;

type SharedCodeParser = Arc<Mutex<Box<dyn CodeParser>>>;

/// Shared state of a generation process.
pub struct RenderSession {
    model: Arc<EntityModel>,
    config: Arc<Config>,
    format: RwLock<OutputFormat>,
    output_dir: RwLock<PathBuf>,
    section_id: AtomicU64,
    doc_parser: DocParser,
    code_parsers: Mutex<HashMap<Language, SharedCodeParser>>,
    layout: Box<dyn GraphLayout>,
}

impl RenderSession {
    /// Create a session; diagrams go through Kroki when `graphs.kroki_url` is set.
    #[must_use]
    pub fn new(model: Arc<EntityModel>, config: Arc<Config>) -> Arc<Self> {
        let layout: Box<dyn GraphLayout> = match &config.graphs.kroki_url {
            Some(url) => Box::new(KrokiLayout::new(url, DEFAULT_TIMEOUT)),
            None => Box::new(DotLayout::new()),
        };
        Self::with_layout(model, config, layout)
    }

    /// Create a session with an explicit layout engine.
    #[must_use]
    pub fn with_layout(
        model: Arc<EntityModel>,
        config: Arc<Config>,
        layout: Box<dyn GraphLayout>,
    ) -> Arc<Self> {
        let format = config
            .output_resolved
            .formats
            .first()
            .copied()
            .unwrap_or(OutputFormat::Html);
        let output_dir = config.output_resolved.format_dir(format);
        Arc::new(Self {
            model,
            config,
            format: RwLock::new(format),
            output_dir: RwLock::new(output_dir),
            section_id: AtomicU64::new(0),
            doc_parser: DocParser::new(),
            code_parsers: Mutex::new(HashMap::new()),
            layout,
        })
    }

    #[must_use]
    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> &Entity {
        self.model.get(id)
    }

    /// Active output format.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        *self.format.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the active output format between passes.
    pub fn set_format(&self, format: OutputFormat) {
        *self.format.write().unwrap_or_else(PoisonError::into_inner) = format;
        tracing::info!(format = format.as_str(), "Output format selected");
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_output_dir(&self, dir: &Path) {
        *self.output_dir.write().unwrap_or_else(PoisonError::into_inner) = dir.to_path_buf();
    }

    /// Start a generation run: section ids restart from zero.
    pub fn begin_run(&self) {
        self.section_id.store(0, Ordering::SeqCst);
        tracing::info!(entities = self.model.len(), "Generation run started");
    }

    /// Start one format pass inside a run. Section ids restart from zero and
    /// format-tagged fragments re-render on demand; format-independent views
    /// stay cached until [`end_run`](Self::end_run).
    pub fn begin_format(&self, format: OutputFormat, output_dir: &Path) {
        self.section_id.store(0, Ordering::SeqCst);
        self.set_format(format);
        self.set_output_dir(output_dir);
    }

    /// Finish a generation run: every render cache is cleared.
    pub fn end_run(&self) {
        self.model.clear_render_caches();
        tracing::info!(
            sections = self.current_section_id(),
            "Generation run finished"
        );
    }

    /// Allocate a section id: returns the current value, then increments.
    pub fn next_section_id(&self) -> u64 {
        self.section_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Next id to be allocated, without allocating it.
    #[must_use]
    pub fn current_section_id(&self) -> u64 {
        self.section_id.load(Ordering::SeqCst)
    }

    /// Path from an entity page to the output root.
    #[must_use]
    pub fn rel_path(&self) -> &'static str {
        if self.config.output_resolved.create_subdirs {
            "../../"
        } else {
            ""
        }
    }

    /// Title variant for member lists of `entity`.
    #[must_use]
    pub fn title_mode(&self, entity: &Entity) -> TitleMode {
        TitleMode::new(self.config.optimize.language, entity.language)
    }

    /// Rendered documentation of an entity in the active format, cached per entity.
    pub fn rendered_doc(&self, id: EntityId, field: RenderedField) -> Arc<str> {
        let entity = self.model.get(id);
        let (text, is_brief) = match field {
            RenderedField::Brief => (&entity.brief.text, true),
            RenderedField::Details => (&entity.details.text, false),
            RenderedField::InbodyDocs => (&entity.inbody.text, false),
            RenderedField::SourceCode => return self.rendered_source(id),
        };
        entity.cache().slots().rendered(field, self.format(), || {
            self.render_doc_text(text, is_brief, self.rel_path())
        })
    }

    /// Render free-standing documentation text, uncached.
    pub fn render_doc_text(&self, text: &str, is_brief: bool, rel_path: &str) -> String {
        dg_renderer::render_doc(
            &self.doc_parser,
            self.format(),
            text,
            is_brief,
            rel_path,
            &ModelLinks::new(&self.model),
        )
    }

    /// Highlighted source of an entity: the whole file for files, the body
    /// range otherwise. Empty when no source text is available.
    pub fn rendered_source(&self, id: EntityId) -> Arc<str> {
        let entity = self.model.get(id);
        entity
            .cache()
            .slots()
            .rendered(RenderedField::SourceCode, self.format(), || {
                self.render_entity_source(entity)
            })
    }

    fn render_entity_source(&self, entity: &Entity) -> String {
        let (file, start_line, end_line) = match (entity.as_file(), entity.body) {
            (Some(_), _) => (entity, None, None),
            (None, Some(body)) => (
                self.model.get(body.file),
                Some(body.start_line),
                Some(body.end_line),
            ),
            (None, None) => return String::new(),
        };
        let Some(code) = file.as_file().and_then(|data| data.source.as_deref()) else {
            return String::new();
        };
        let scope_name = self
            .model
            .outer(entity.id())
            .filter(|outer| outer.as_class().is_some() || outer.as_namespace().is_some())
            .map(|outer| outer.name.clone());
        let options = CodeOptions {
            show_line_numbers: true,
            rel_path: self.rel_path().to_owned(),
            start_line,
            end_line,
            scope_name,
        };
        self.render_code(file.language, code, &options)
    }

    /// Highlight code with the parser for `language`.
    ///
    /// Parsers are kept per language and reset before every call.
    pub fn render_code(&self, language: Language, code: &str, options: &CodeOptions) -> String {
        let parser = self.code_parser(language);
        let mut parser = parser.lock().unwrap_or_else(PoisonError::into_inner);
        dg_renderer::render_code(
            &mut **parser,
            self.format(),
            code,
            options,
            &ModelLinks::new(&self.model),
        )
    }

    fn code_parser(&self, language: Language) -> SharedCodeParser {
        let mut parsers = self
            .code_parsers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(parsers.entry(language).or_insert_with(|| {
            Arc::new(Mutex::new(
                Box::new(KeywordCodeParser::new(language)) as Box<dyn CodeParser>
            ))
        }))
    }

    /// Whether a graph layout engine is available for optional diagrams.
    #[must_use]
    pub fn dot_available(&self) -> bool {
        self.config.graphs.have_dot || self.config.graphs.kroki_url.is_some()
    }

    /// Whether diagrams of `kind` are enabled by configuration.
    ///
    /// Inheritance diagrams only need `class_graph`; every other kind also
    /// needs a layout engine.
    #[must_use]
    pub fn graph_enabled(&self, kind: GraphKind) -> bool {
        let graphs = &self.config.graphs;
        match kind {
            GraphKind::Inheritance => graphs.class_graph,
            GraphKind::Collaboration => self.dot_available() && graphs.collaboration_graph,
            GraphKind::Include => self.dot_available() && graphs.include_graph,
            GraphKind::IncludedBy => self.dot_available() && graphs.included_by_graph,
            GraphKind::Call => self.dot_available() && graphs.call_graph,
            GraphKind::Caller => self.dot_available() && graphs.caller_graph,
            GraphKind::GroupCollaboration => self.dot_available() && graphs.group_graphs,
            GraphKind::DirDependency => self.dot_available() && graphs.directory_graph,
        }
    }

    /// Cached diagram description.
    #[must_use]
    pub fn graph(&self, id: EntityId, kind: GraphKind) -> Arc<DiagramGraph> {
        self.model.graph(id, kind, self.config.graphs.limits())
    }

    /// Whether the diagram shows something and is small enough to draw.
    #[must_use]
    pub fn graph_drawable(&self, id: EntityId, kind: GraphKind) -> bool {
        let graph = self.graph(id, kind);
        !graph.is_trivial() && !graph.is_too_big(self.config.graphs.max_nodes)
    }

    /// Enabled and drawable.
    #[must_use]
    pub fn has_graph(&self, id: EntityId, kind: GraphKind) -> bool {
        self.graph_enabled(kind) && self.graph_drawable(id, kind)
    }

    /// Lay out a diagram in the active format, consuming one section id.
    pub fn render_graph(&self, id: EntityId, kind: GraphKind, title: &str) -> String {
        let graph = self.graph(id, kind);
        let section_id = self.next_section_id();
        let request = LayoutRequest {
            format: self.format(),
            section_id,
            rel_path: self.rel_path(),
            title,
        };
        self.layout.render(&graph, &request)
    }

    /// Pre-render every linkable entity's brief description in parallel.
    ///
    /// Briefs never allocate section ids, so the numbering of the following
    /// sequential pass is unaffected. Returns the number of rendered briefs.
    pub fn prepare_parallel(&self) -> usize {
        self.model
            .entities()
            .par_iter()
            .filter(|entity| entity.is_linkable_in_project() && !entity.brief.is_empty())
            .map(|entity| self.rendered_doc(entity.id(), RenderedField::Brief))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use dg_model::{ClassData, EntityData, FileData, ModelBuilder};
    use pretty_assertions::assert_eq;

    use super::*;

    struct CountingLayout(AtomicUsize);

    impl GraphLayout for CountingLayout {
        fn render(&self, graph: &DiagramGraph, request: &LayoutRequest<'_>) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            format!("[{}:{}]", graph.kind.as_str(), request.section_id)
        }
    }

    fn session() -> Arc<RenderSession> {
        let mut builder = ModelBuilder::new();
        let file = builder.add(
            Entity::new(
                "shapes.h",
                EntityData::File(FileData {
                    path: "include/shapes.h".to_owned(),
                    source: Some("int area();\nint volume();\nint depth();\n".to_owned()),
                    ..FileData::default()
                }),
            )
            .with_output_file("shapes_8h")
            .with_language(Language::Cpp),
        );
        let base = builder.add(
            Entity::new("Shape", EntityData::Class(ClassData::default()))
                .with_output_file("classShape")
                .with_brief("Base of all *shapes*."),
        );
        builder.add(
            Entity::new("Circle", EntityData::Class(ClassData::with_bases([base])))
                .with_output_file("classCircle")
                .with_brief("A round \\ref Shape.")
                .with_body(file, 2, 2),
        );
        let model = builder.build().unwrap();
        RenderSession::with_layout(
            Arc::new(model),
            Arc::new(Config::default()),
            Box::new(CountingLayout(AtomicUsize::new(0))),
        )
    }

    #[test]
    fn test_section_ids_restart_each_run() {
        let session = session();
        session.begin_run();
        assert_eq!(session.next_section_id(), 0);
        assert_eq!(session.next_section_id(), 1);
        session.end_run();
        session.begin_run();
        assert_eq!(session.next_section_id(), 0);
        assert_eq!(session.current_section_id(), 1);
    }

    #[test]
    fn test_rendered_doc_follows_active_format() {
        let session = session();
        let circle = session.model().find("Circle").unwrap().id();
        session.set_format(OutputFormat::Html);
        let html = session.rendered_doc(circle, RenderedField::Brief);
        assert!(html.contains("<a class=\"el\" href=\"classShape.html\">"), "{html}");

        session.set_format(OutputFormat::Man);
        let man = session.rendered_doc(circle, RenderedField::Brief);
        assert!(!man.contains("<a"), "{man}");
        assert!(man.contains("Shape"));
    }

    #[test]
    fn test_rendered_source_uses_body_range() {
        let session = session();
        let circle = session.model().find("Circle").unwrap().id();
        let source = session.rendered_source(circle);
        assert!(source.contains("volume"), "{source}");
        assert!(!source.contains("area"), "{source}");
        assert!(!source.contains("depth"), "{source}");
    }

    #[test]
    fn test_render_graph_consumes_section_id() {
        let session = session();
        session.begin_run();
        let circle = session.model().find("Circle").unwrap().id();
        assert!(session.has_graph(circle, GraphKind::Inheritance));
        assert!(!session.has_graph(circle, GraphKind::Collaboration));
        assert_eq!(
            session.render_graph(circle, GraphKind::Inheritance, "Circle"),
            "[inherit:0]"
        );
        assert_eq!(session.current_section_id(), 1);
    }

    #[test]
    fn test_prepare_parallel_fills_brief_caches() {
        let session = session();
        assert_eq!(session.prepare_parallel(), 2);
        let shape = session.model().find("Shape").unwrap();
        let cached = shape.cache().slots().cached_rendered(RenderedField::Brief).unwrap();
        assert_eq!(&*cached.text, "Base of all <em>shapes</em>.");
    }
}
