//! Generation driver.
//!
//! One run covers every configured output format, in configuration order.
//! Each format pass restarts section ids, switches the session to the format
//! and hands a fresh [`RootContext`] to the template engine. Format-independent
//! views computed in one pass are reused by the next; format-tagged fragments
//! re-render. Render caches are cleared once, after the last format. A
//! failing format is reported and the remaining formats still run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dg_model::OutputFormat;

use crate::root::RootContext;
use crate::session::RenderSession;

/// Generation error.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Output directory or file could not be written.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The template engine reported a failure.
    #[error("Template engine failed: {0}")]
    Engine(String),
}

/// Template engine seam: renders the property graph below `root` into
/// `output_dir` and returns the number of files written.
pub trait TemplateEngine {
    fn render(&mut self, root: &RootContext, output_dir: &Path) -> Result<usize, GenerateError>;
}

/// Result of one format pass.
#[derive(Debug)]
pub struct FormatReport {
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    pub files: usize,
    /// Section ids allocated during the pass.
    pub sections: u64,
    pub error: Option<GenerateError>,
}

/// Results of a whole generation.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub formats: Vec<FormatReport>,
}

impl GenerateReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.formats.iter().all(|report| report.error.is_none())
    }

    /// Passes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &FormatReport> {
        self.formats.iter().filter(|report| report.error.is_some())
    }

    #[must_use]
    pub fn files(&self) -> usize {
        self.formats.iter().map(|report| report.files).sum()
    }
}

/// Runs generation passes over a session.
pub struct Generator {
    session: Arc<RenderSession>,
    parallel: bool,
}

impl Generator {
    #[must_use]
    pub fn new(session: Arc<RenderSession>) -> Self {
        Self {
            session,
            parallel: true,
        }
    }

    /// Pre-render brief descriptions in parallel before each pass.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every configured format through `engine`.
    pub fn run(&self, engine: &mut dyn TemplateEngine) -> GenerateReport {
        let formats = self.session.config().output_resolved.formats.clone();
        let mut report = GenerateReport::default();
        self.session.begin_run();
        for format in formats {
            let pass = self.run_format(engine, format);
            if let Some(error) = &pass.error {
                tracing::error!(format = format.as_str(), error = %error, "Format generation failed");
            } else {
                tracing::info!(
                    format = format.as_str(),
                    files = pass.files,
                    sections = pass.sections,
                    "Format generated"
                );
            }
            report.formats.push(pass);
        }
        self.session.end_run();
        report
    }

    fn run_format(&self, engine: &mut dyn TemplateEngine, format: OutputFormat) -> FormatReport {
        let output_dir = self.session.config().output_resolved.format_dir(format);
        self.session.begin_format(format, &output_dir);

        let result = std::fs::create_dir_all(&output_dir)
            .map_err(|source| GenerateError::Io {
                path: output_dir.clone(),
                source,
            })
            .and_then(|()| {
                if self.parallel {
                    let briefs = self.session.prepare_parallel();
                    tracing::debug!(briefs, "Pre-rendered brief descriptions");
                }
                let root = RootContext::new(Arc::clone(&self.session));
                engine.render(&root, &output_dir)
            });

        let sections = self.session.current_section_id();
        let (files, error) = match result {
            Ok(files) => (files, None),
            Err(error) => (0, Some(error)),
        };
        FormatReport {
            format,
            output_dir,
            files,
            sections,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use dg_config::Config;
    use pretty_assertions::assert_eq;

    use super::*;
    use dg_model::{GraphKind, MemberListKind, RenderedField};

    use crate::adapters::ClassContext;
    use crate::fixture;
    use crate::value::{StructContext, Value};

    /// Pulls the class tree and every class's diagrams, recording the
    /// section ids the diagrams were given.
    #[derive(Default)]
    struct RecordingEngine {
        diagrams: Vec<Vec<String>>,
        fail_on: Option<OutputFormat>,
    }

    impl TemplateEngine for RecordingEngine {
        fn render(&mut self, root: &RootContext, _output_dir: &Path) -> Result<usize, GenerateError> {
            if Some(root.session().format()) == self.fail_on {
                return Err(GenerateError::Engine("boom".to_owned()));
            }
            let list = root.get("classList");
            let mut diagrams = Vec::new();
            if let Some(classes) = list.as_list() {
                for index in 0..classes.count() {
                    let class: Value = classes.at(index);
                    if class.get("hasInheritanceDiagram").to_bool() {
                        diagrams.push(class.get("inheritanceDiagram").to_string());
                    }
                }
            }
            self.diagrams.push(diagrams);
            Ok(list.to_int().try_into().unwrap_or(0))
        }
    }

    fn session_writing_to(dir: &Path, formats: Vec<OutputFormat>) -> Arc<RenderSession> {
        let mut config = Config::default();
        config.output_resolved.dir = dir.to_path_buf();
        config.output_resolved.formats = formats;
        RenderSession::new(Arc::new(fixture::model()), Arc::new(config))
    }

    #[test]
    fn test_runs_allocate_identical_section_ids() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_writing_to(dir.path(), vec![OutputFormat::Html]);
        let generator = Generator::new(session);
        let mut engine = RecordingEngine::default();

        let first = generator.run(&mut engine);
        let second = generator.run(&mut engine);

        assert!(first.is_success());
        assert_eq!(first.formats[0].sections, second.formats[0].sections);
        assert_eq!(engine.diagrams.len(), 2);
        assert_eq!(engine.diagrams[0], engine.diagrams[1]);
        assert!(!engine.diagrams[0].is_empty());
        assert!(dir.path().join("html").is_dir());
    }

    #[test]
    fn test_failed_format_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            session_writing_to(dir.path(), vec![OutputFormat::Html, OutputFormat::Latex]);
        let mut engine = RecordingEngine {
            fail_on: Some(OutputFormat::Html),
            ..RecordingEngine::default()
        };
        let report = Generator::new(session).with_parallel(false).run(&mut engine);

        assert!(!report.is_success());
        let failed: Vec<OutputFormat> = report.failures().map(|pass| pass.format).collect();
        assert_eq!(failed, vec![OutputFormat::Html]);
        assert_eq!(report.formats[1].files, 4);
        assert_eq!(report.files(), 4);
    }

    /// What one pass found in Circle's cache on entry, and the brief's
    /// format tag once the pass had rendered it.
    #[derive(Debug, PartialEq)]
    struct PassState {
        member_list: bool,
        graph: bool,
        brief_before: Option<OutputFormat>,
        brief_after: Option<OutputFormat>,
    }

    #[derive(Default)]
    struct CacheProbingEngine {
        passes: Vec<PassState>,
    }

    impl TemplateEngine for CacheProbingEngine {
        fn render(&mut self, root: &RootContext, _output_dir: &Path) -> Result<usize, GenerateError> {
            let session = root.session();
            let slots = session.entity(fixture::CIRCLE).cache().slots();
            let brief_format = || {
                slots
                    .cached_rendered(RenderedField::Brief)
                    .map(|rendered| rendered.format)
            };
            let member_list = slots.has_member_list(MemberListKind::PubMethods);
            let graph = slots.has_graph(GraphKind::Inheritance);
            let brief_before = brief_format();

            let circle = ClassContext::new(Arc::clone(session), fixture::CIRCLE);
            circle.get("publicMethods");
            circle.get("hasInheritanceDiagram");
            circle.get("brief");

            self.passes.push(PassState {
                member_list,
                graph,
                brief_before,
                brief_after: brief_format(),
            });
            Ok(1)
        }
    }

    #[test]
    fn test_second_format_reuses_derived_views() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            session_writing_to(dir.path(), vec![OutputFormat::Html, OutputFormat::Latex]);
        let mut engine = CacheProbingEngine::default();
        let report = Generator::new(Arc::clone(&session))
            .with_parallel(false)
            .run(&mut engine);

        assert!(report.is_success());
        assert_eq!(
            engine.passes,
            vec![
                PassState {
                    member_list: false,
                    graph: false,
                    brief_before: None,
                    brief_after: Some(OutputFormat::Html),
                },
                PassState {
                    member_list: true,
                    graph: true,
                    brief_before: Some(OutputFormat::Html),
                    brief_after: Some(OutputFormat::Latex),
                },
            ]
        );
        let slots = session.entity(fixture::CIRCLE).cache().slots();
        assert!(!slots.has_member_list(MemberListKind::PubMethods));
    }

    #[test]
    fn test_each_format_restarts_section_ids() {
        let dir = tempfile::tempdir().unwrap();
        let session =
            session_writing_to(dir.path(), vec![OutputFormat::Html, OutputFormat::Html]);
        let mut engine = RecordingEngine::default();
        let report = Generator::new(session).with_parallel(false).run(&mut engine);

        assert_eq!(report.formats[0].sections, report.formats[1].sections);
        assert!(report.formats[0].sections > 0);
        assert_eq!(engine.diagrams[0], engine.diagrams[1]);
    }

    #[test]
    fn test_end_of_run_clears_caches() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_writing_to(dir.path(), vec![OutputFormat::Html]);
        Generator::new(Arc::clone(&session)).run(&mut RecordingEngine::default());
        let shape = session.entity(fixture::SHAPE);
        assert!(
            shape
                .cache()
                .slots()
                .cached_rendered(RenderedField::Brief)
                .is_none()
        );
    }
}
