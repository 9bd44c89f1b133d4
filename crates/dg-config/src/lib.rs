//! `docgen.toml` configuration.
//!
//! [`Config::load`] reads an explicit file or the nearest `docgen.toml` in
//! the working directory or one of its parents, expands environment
//! variables, resolves paths against the file's directory, applies
//! [`CliSettings`] overrides and validates the result. Without any file the
//! defaults apply, rooted at the working directory.
//!
//! `input.model`, `output.dir` and `graphs.kroki_url` accept `${VAR}` (an
//! error when unset) and `${VAR:-default}`.
//!
//! [`Config::options`] flattens every setting into the upper-case option
//! names templates read through the `config` property.

mod expand;

use std::path::{Path, PathBuf};

use dg_model::{GraphLimits, OutputFormat};
use serde::Deserialize;

/// Command-line overrides; `None` keeps the file value.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the entity model path.
    pub model: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the list of output formats.
    pub formats: Option<Vec<OutputFormat>>,
    /// Override Kroki URL for diagram layout.
    pub kroki_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docgen.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project identification.
    pub project: ProjectConfig,
    /// Input configuration (paths are relative strings from TOML).
    input: InputConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Language-specific presentation.
    pub optimize: OptimizeConfig,
    /// Source browsing configuration.
    pub source: SourceConfig,
    /// Diagram configuration.
    pub graphs: GraphsConfig,
    /// Index page configuration.
    pub index: IndexConfig,

    /// Resolved input configuration (set after loading).
    #[serde(skip)]
    pub input_resolved: InputConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Project identification.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name shown in page headers.
    pub name: String,
    /// Project version string.
    pub number: String,
    /// One-line project description.
    pub brief: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "My Project".to_owned(),
            number: String::new(),
            brief: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InputConfigRaw {
    model: Option<String>,
}

/// Resolved input configuration with absolute paths.
#[derive(Debug, Default)]
pub struct InputConfig {
    /// JSON entity model.
    pub model: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    formats: Option<Vec<OutputFormat>>,
    create_subdirs: Option<bool>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug)]
pub struct OutputConfig {
    /// Root output directory; each format writes into its own subdirectory.
    pub dir: PathBuf,
    /// Formats generated, in order.
    pub formats: Vec<OutputFormat>,
    /// Spread output files over hashed subdirectories.
    pub create_subdirs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            formats: vec![OutputFormat::Html],
            create_subdirs: false,
        }
    }
}

impl OutputConfig {
    /// Directory a format writes into.
    #[must_use]
    pub fn format_dir(&self, format: OutputFormat) -> PathBuf {
        self.dir.join(format.dir_name())
    }
}

/// Language the output is tuned for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizeLanguage {
    #[default]
    Default,
    C,
    Java,
    Fortran,
    Vhdl,
    Slice,
}

/// Language-specific presentation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    pub language: OptimizeLanguage,
}

/// Source browsing configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SourceConfig {
    /// Generate highlighted source pages.
    pub browser: bool,
    /// Show function bodies inline in member documentation.
    pub inline_sources: bool,
    /// List functions referenced by each function.
    pub references_relation: bool,
    /// List functions referencing each function.
    pub referenced_by_relation: bool,
}

/// Diagram configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GraphsConfig {
    /// Graph layout is available.
    pub have_dot: bool,
    pub class_graph: bool,
    pub collaboration_graph: bool,
    pub include_graph: bool,
    pub included_by_graph: bool,
    pub call_graph: bool,
    pub caller_graph: bool,
    pub group_graphs: bool,
    pub directory_graph: bool,
    /// Node count at which a graph is considered too big to draw.
    pub max_nodes: usize,
    /// Maximum distance from the root node (0 = unlimited).
    pub max_depth: usize,
    /// Kroki server URL; DOT sources are embedded when unset.
    pub kroki_url: Option<String>,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            have_dot: false,
            class_graph: true,
            collaboration_graph: true,
            include_graph: true,
            included_by_graph: true,
            call_graph: false,
            caller_graph: false,
            group_graphs: true,
            directory_graph: true,
            max_nodes: 50,
            max_depth: 0,
            kroki_url: None,
        }
    }
}

impl GraphsConfig {
    /// Limits applied when collecting graph nodes.
    #[must_use]
    pub fn limits(&self) -> GraphLimits {
        GraphLimits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }
}

/// Index page configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of tree entries shown expanded by default.
    pub num_entries: usize,
    /// Generate search indices.
    pub search_engine: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            num_entries: 100,
            search_engine: true,
        }
    }
}

/// A configuration value exposed under its option name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<String>),
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_OUT`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docgen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(model) = &settings.model {
            self.input_resolved.model.clone_from(model);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(formats) = &settings.formats {
            self.output_resolved.formats.clone_from(formats);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.graphs.kroki_url = Some(kroki_url.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            project: ProjectConfig::default(),
            input: InputConfigRaw::default(),
            output: OutputConfigRaw::default(),
            optimize: OptimizeConfig::default(),
            source: SourceConfig::default(),
            graphs: GraphsConfig::default(),
            index: IndexConfig::default(),
            input_resolved: InputConfig {
                model: base.join("model.json"),
            },
            output_resolved: OutputConfig {
                dir: base.join("output"),
                ..OutputConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_output()?;
        self.validate_graphs()?;
        Ok(())
    }

    fn validate_output(&self) -> Result<(), ConfigError> {
        // A file value is joined onto the config directory, so check it raw.
        // A CLI override replaces the resolved path as given.
        if let Some(dir) = &self.output.dir {
            require_non_empty(dir, "output.dir")?;
        }
        if self.output_resolved.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output.dir cannot be empty".to_owned(),
            ));
        }
        if self.output_resolved.formats.is_empty() {
            return Err(ConfigError::Validation(
                "output.formats must list at least one format".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_graphs(&self) -> Result<(), ConfigError> {
        if self.graphs.max_nodes == 0 {
            return Err(ConfigError::Validation(
                "graphs.max_nodes must be greater than 0".to_owned(),
            ));
        }
        if let Some(ref kroki_url) = self.graphs.kroki_url {
            require_non_empty(kroki_url, "graphs.kroki_url")?;
            require_http_url(kroki_url, "graphs.kroki_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.input.model, "input.model")?;
        expand::expand_field(&mut self.output.dir, "output.dir")?;
        expand::expand_field(&mut self.graphs.kroki_url, "graphs.kroki_url")
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.input_resolved = InputConfig {
            model: resolve(self.input.model.as_deref(), "model.json"),
        };
        self.output_resolved = OutputConfig {
            dir: resolve(self.output.dir.as_deref(), "output"),
            formats: self
                .output
                .formats
                .clone()
                .unwrap_or_else(|| vec![OutputFormat::Html]),
            create_subdirs: self.output.create_subdirs.unwrap_or(false),
        };
    }

    /// Every option under its configuration name, sorted by name.
    #[must_use]
    pub fn options(&self) -> Vec<(&'static str, OptionValue)> {
        use OptionValue::{Bool, Int, List, String as Str};

        let int = |value: usize| Int(i64::try_from(value).unwrap_or(i64::MAX));
        let generates = |format: OutputFormat| Bool(self.output_resolved.formats.contains(&format));
        let lang = self.optimize.language;

        let mut options = vec![
            ("PROJECT_NAME", Str(self.project.name.clone())),
            ("PROJECT_NUMBER", Str(self.project.number.clone())),
            ("PROJECT_BRIEF", Str(self.project.brief.clone())),
            (
                "OUTPUT_DIRECTORY",
                Str(self.output_resolved.dir.display().to_string()),
            ),
            ("CREATE_SUBDIRS", Bool(self.output_resolved.create_subdirs)),
            (
                "OUTPUT_FORMATS",
                List(
                    self.output_resolved
                        .formats
                        .iter()
                        .map(|f| f.as_str().to_owned())
                        .collect(),
                ),
            ),
            ("GENERATE_HTML", generates(OutputFormat::Html)),
            ("GENERATE_LATEX", generates(OutputFormat::Latex)),
            ("GENERATE_RTF", generates(OutputFormat::Rtf)),
            ("GENERATE_MAN", generates(OutputFormat::Man)),
            ("GENERATE_DOCBOOK", generates(OutputFormat::Docbook)),
            ("OPTIMIZE_OUTPUT_FOR_C", Bool(lang == OptimizeLanguage::C)),
            ("OPTIMIZE_OUTPUT_JAVA", Bool(lang == OptimizeLanguage::Java)),
            ("OPTIMIZE_FOR_FORTRAN", Bool(lang == OptimizeLanguage::Fortran)),
            ("OPTIMIZE_OUTPUT_VHDL", Bool(lang == OptimizeLanguage::Vhdl)),
            ("OPTIMIZE_OUTPUT_SLICE", Bool(lang == OptimizeLanguage::Slice)),
            ("SOURCE_BROWSER", Bool(self.source.browser)),
            ("INLINE_SOURCES", Bool(self.source.inline_sources)),
            ("REFERENCES_RELATION", Bool(self.source.references_relation)),
            ("REFERENCED_BY_RELATION", Bool(self.source.referenced_by_relation)),
            ("HAVE_DOT", Bool(self.graphs.have_dot)),
            ("CLASS_GRAPH", Bool(self.graphs.class_graph)),
            ("COLLABORATION_GRAPH", Bool(self.graphs.collaboration_graph)),
            ("INCLUDE_GRAPH", Bool(self.graphs.include_graph)),
            ("INCLUDED_BY_GRAPH", Bool(self.graphs.included_by_graph)),
            ("CALL_GRAPH", Bool(self.graphs.call_graph)),
            ("CALLER_GRAPH", Bool(self.graphs.caller_graph)),
            ("GROUP_GRAPHS", Bool(self.graphs.group_graphs)),
            ("DIRECTORY_GRAPH", Bool(self.graphs.directory_graph)),
            ("DOT_GRAPH_MAX_NODES", int(self.graphs.max_nodes)),
            ("MAX_DOT_GRAPH_DEPTH", int(self.graphs.max_depth)),
            (
                "KROKI_URL",
                Str(self.graphs.kroki_url.clone().unwrap_or_default()),
            ),
            ("HTML_INDEX_NUM_ENTRIES", int(self.index.num_entries)),
            ("SEARCHENGINE", Bool(self.index.search_engine)),
        ];
        options.sort_by_key(|(name, _)| *name);
        options
    }
}
