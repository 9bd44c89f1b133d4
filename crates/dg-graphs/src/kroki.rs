//! Kroki-backed SVG layout.
//!
//! DOT sources are posted to a Kroki server's `graphviz/svg` endpoint. SVG
//! output is memoized by content hash, so the same diagram appearing in
//! several formats or pages is requested only once per process. Formats that
//! can't embed SVG, and every failed request, fall back to [`DotLayout`].

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};
use std::time::Duration;

use dg_model::{DiagramGraph, OutputFormat};
use regex::Regex;
use sha2::{Digest, Sha256};
use ureq::Agent;

use crate::dot::{DotLayout, to_dot};
use crate::error::LayoutError;
use crate::layout::{GraphLayout, LayoutRequest, dynsection_id};

/// Default timeout for a single Kroki request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static XML_PROLOG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*<\?xml[^>]*\?>\s*").unwrap());

static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!DOCTYPE[^>]*>\s*").unwrap());

static XML_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->\s*").unwrap());

/// Create HTTP agent with the specified timeout.
#[must_use]
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Cache key for a rendered diagram: SHA-256 of `"{endpoint}:{format}:{source}"`.
#[must_use]
pub(crate) fn diagram_hash(endpoint: &str, format: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{endpoint}:{format}:{source}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Strip the XML prolog, doctype and comments so the SVG can be inlined.
#[must_use]
pub fn prepare_svg(svg: &str) -> String {
    let svg = XML_PROLOG_RE.replace(svg, "");
    let svg = DOCTYPE_RE.replace_all(&svg, "");
    XML_COMMENT_RE.replace_all(&svg, "").trim().to_owned()
}

/// Layout posting DOT sources to a Kroki server.
pub struct KrokiLayout {
    agent: Agent,
    server_url: String,
    svgs: Mutex<HashMap<String, Arc<str>>>,
    fallback: DotLayout,
}

impl KrokiLayout {
    /// Create a layout for the server at `server_url`.
    #[must_use]
    pub fn new(server_url: &str, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            server_url: server_url.trim_end_matches('/').to_owned(),
            svgs: Mutex::new(HashMap::new()),
            fallback: DotLayout::new(),
        }
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Number of distinct diagrams rendered so far.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.svgs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// SVG for a DOT source, from the memo or the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with an
    /// error status, or the response is empty.
    pub fn svg(&self, dot: &str) -> Result<Arc<str>, LayoutError> {
        let key = diagram_hash("graphviz", "svg", dot);
        if let Some(svg) = self
            .svgs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(svg));
        }

        let svg: Arc<str> = Arc::from(prepare_svg(&self.request(dot)?));
        self.svgs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&svg));
        Ok(svg)
    }

    fn request(&self, dot: &str) -> Result<String, LayoutError> {
        let url = format!("{}/graphviz/svg", self.server_url);
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "text/plain")
            .send(dot.as_bytes())
            .map_err(|e| LayoutError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(LayoutError::Status {
                status,
                body: error_body,
            });
        }

        let svg = body
            .read_to_string()
            .map_err(|e| LayoutError::Http(e.to_string()))?;
        if svg.trim().is_empty() {
            return Err(LayoutError::EmptyResponse);
        }
        Ok(svg)
    }
}

impl GraphLayout for KrokiLayout {
    fn render(&self, graph: &DiagramGraph, request: &LayoutRequest<'_>) -> String {
        let embeds_svg = match request.format {
            OutputFormat::Html | OutputFormat::Docbook => true,
            OutputFormat::Latex | OutputFormat::Rtf | OutputFormat::Man => false,
        };
        if !embeds_svg {
            return self.fallback.render(graph, request);
        }

        let dot = to_dot(graph, request.format, request.rel_path);
        let svg = match self.svg(&dot) {
            Ok(svg) => svg,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    graph = graph.kind.as_str(),
                    "Diagram layout failed, embedding DOT source"
                );
                return self.fallback.render(graph, request);
            }
        };

        let id = dynsection_id(request.section_id);
        match request.format {
            OutputFormat::Docbook => {
                format!("<informalfigure xml:id=\"{id}\"><mediaobject><imageobject>{svg}</imageobject></mediaobject></informalfigure>\n")
            }
            OutputFormat::Html | OutputFormat::Latex | OutputFormat::Rtf | OutputFormat::Man => {
                format!(
                    "<div class=\"dyncontent\" id=\"{id}-content\">\n<div class=\"center\">{svg}</div>\n</div>\n"
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dg_model::{EntityId, GraphKind, GraphNode};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_diagram_hash_is_stable_hex() {
        let a = diagram_hash("graphviz", "svg", "digraph {}");
        let b = diagram_hash("graphviz", "svg", "digraph {}");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, diagram_hash("graphviz", "png", "digraph {}"));
    }

    #[test]
    fn test_prepare_svg_strips_prolog() {
        let svg = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
            "<!-- Generated by graphviz -->\n",
            "<svg width=\"10pt\"></svg>\n"
        );
        assert_eq!(prepare_svg(svg), "<svg width=\"10pt\"></svg>");
    }

    #[test]
    fn test_unreachable_server_falls_back_to_dot() {
        let layout = KrokiLayout::new("http://127.0.0.1:9/", Duration::from_secs(2));
        assert_eq!(layout.server_url(), "http://127.0.0.1:9");

        let graph = DiagramGraph {
            kind: GraphKind::Inheritance,
            root: EntityId::new(0),
            nodes: vec![GraphNode {
                entity: EntityId::new(0),
                label: "Root".to_owned(),
                url: String::new(),
                is_root: true,
            }],
            edges: Vec::new(),
            truncated: false,
        };
        let request = LayoutRequest {
            format: OutputFormat::Html,
            section_id: 3,
            rel_path: "",
            title: "Root",
        };
        let html = layout.render(&graph, &request);
        assert!(html.contains("class=\"dotgraph\""));
        assert_eq!(layout.cached_count(), 0);
    }
}
