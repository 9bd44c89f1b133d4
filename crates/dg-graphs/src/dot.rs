//! DOT emission and the embedding layout.
//!
//! [`DotLayout`] doesn't run any layout itself: it embeds the DOT source in
//! the output so a downstream tool (or client-side script) lays it out.

use std::fmt::Write;

use dg_model::{DiagramGraph, EdgeStyle, OutputFormat};

use crate::layout::{GraphLayout, LayoutRequest, dynsection_id};

/// Escape a string for use inside a double-quoted DOT identifier.
fn escape_dot(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn edge_attributes(style: EdgeStyle) -> &'static str {
    match style {
        EdgeStyle::PublicInheritance => r#"dir="back",color="steelblue1",style="solid""#,
        EdgeStyle::ProtectedInheritance => r#"dir="back",color="darkgreen",style="solid""#,
        EdgeStyle::PrivateInheritance => r#"dir="back",color="firebrick4",style="solid""#,
        EdgeStyle::Usage => r#"dir="back",color="darkorchid3",style="dashed""#,
        EdgeStyle::Include | EdgeStyle::Call => r#"color="steelblue1",style="solid""#,
        EdgeStyle::Membership => r#"color="grey60",style="solid""#,
        EdgeStyle::Dependency => r#"color="black",style="solid""#,
    }
}

/// Link for a node URL (`file` or `file#anchor`) in a file-based format.
fn node_href(url: &str, rel_path: &str, extension: &str) -> String {
    match url.split_once('#') {
        Some((file, anchor)) => format!("{rel_path}{file}{extension}#{anchor}"),
        None => format!("{rel_path}{url}{extension}"),
    }
}

/// DOT source for a graph.
///
/// Node links use `rel_path` and the file extension of `format`.
#[must_use]
pub fn to_dot(graph: &DiagramGraph, format: OutputFormat, rel_path: &str) -> String {
    let mut out = String::new();
    writeln!(out, "digraph \"{}\"", graph.kind.as_str()).unwrap();
    out.push_str("{\n");
    out.push_str("  rankdir=\"BT\";\n");
    out.push_str("  node [fontname=\"Helvetica\",fontsize=10,shape=box,height=0.2,width=0.4];\n");
    out.push_str("  edge [fontname=\"Helvetica\",fontsize=10];\n");

    for (index, node) in graph.nodes.iter().enumerate() {
        write!(out, "  Node{index} [label=\"{}\"", escape_dot(&node.label)).unwrap();
        if node.is_root {
            out.push_str(",style=\"filled\",fillcolor=\"grey75\"");
        } else if !node.url.is_empty() {
            let href = node_href(&node.url, rel_path, format.file_extension());
            write!(out, ",URL=\"{}\"", escape_dot(&href)).unwrap();
        }
        out.push_str("];\n");
    }

    for edge in &graph.edges {
        write!(out, "  Node{} -> Node{} [{}", edge.from, edge.to, edge_attributes(edge.style)).unwrap();
        if !edge.labels.is_empty() {
            write!(out, ",label=\" {}\"", escape_dot(&edge.labels.join("\n"))).unwrap();
        }
        out.push_str("];\n");
    }
    out.push_str("}\n");
    out
}

/// Layout that embeds DOT source into the output.
#[derive(Clone, Copy, Debug, Default)]
pub struct DotLayout;

impl DotLayout {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GraphLayout for DotLayout {
    fn render(&self, graph: &DiagramGraph, request: &LayoutRequest<'_>) -> String {
        let dot = to_dot(graph, request.format, request.rel_path);
        let id = dynsection_id(request.section_id);
        match request.format {
            OutputFormat::Html => format!(
                "<div class=\"dyncontent\" id=\"{id}-content\">\n<div class=\"center\"><pre class=\"dotgraph\" title=\"{}\">{}</pre></div>\n</div>\n",
                escape_markup(request.title),
                escape_markup(&dot)
            ),
            OutputFormat::Latex => format!(
                "\\begin{{figure}}[H]\n\\begin{{center}}\n\\begin{{DoxyVerb}}{dot}\\end{{DoxyVerb}}\n\\end{{center}}\n\\label{{{id}}}\n\\end{{figure}}\n"
            ),
            OutputFormat::Rtf => {
                let mut out = String::from("{\\f2\\fs16 ");
                for line in dot.lines() {
                    for c in line.chars() {
                        match c {
                            '\\' | '{' | '}' => {
                                out.push('\\');
                                out.push(c);
                            }
                            _ => out.push(c),
                        }
                    }
                    out.push_str("\\par\n");
                }
                out.push_str("}\n");
                out
            }
            // Man pages carry no diagrams.
            OutputFormat::Man => String::new(),
            OutputFormat::Docbook => format!(
                "<informalfigure xml:id=\"{id}\"><programlisting language=\"dot\">{}</programlisting></informalfigure>\n",
                escape_markup(&dot)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use dg_model::{EntityId, GraphEdge, GraphKind, GraphNode};
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_graph() -> DiagramGraph {
        DiagramGraph {
            kind: GraphKind::Inheritance,
            root: EntityId::new(0),
            nodes: vec![
                GraphNode {
                    entity: EntityId::new(0),
                    label: "Circle".to_owned(),
                    url: "classCircle".to_owned(),
                    is_root: true,
                },
                GraphNode {
                    entity: EntityId::new(1),
                    label: "Shape<\"T\">".to_owned(),
                    url: "classShape#details".to_owned(),
                    is_root: false,
                },
            ],
            edges: vec![GraphEdge {
                from: 1,
                to: 0,
                style: EdgeStyle::PublicInheritance,
                labels: Vec::new(),
            }],
            truncated: false,
        }
    }

    #[test]
    fn test_to_dot_nodes_and_edges() {
        let dot = to_dot(&sample_graph(), OutputFormat::Html, "../");
        assert!(dot.starts_with("digraph \"inherit\"\n{\n"));
        assert!(dot.contains("Node0 [label=\"Circle\",style=\"filled\",fillcolor=\"grey75\"];"));
        assert!(dot.contains(
            "Node1 [label=\"Shape<\\\"T\\\">\",URL=\"../classShape.html#details\"];"
        ));
        assert!(dot.contains("Node1 -> Node0 [dir=\"back\",color=\"steelblue1\",style=\"solid\"];"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_node_href() {
        assert_eq!(node_href("classA", "", ".tex"), "classA.tex");
        assert_eq!(node_href("classA#x1", "../", ".html"), "../classA.html#x1");
    }

    #[test]
    fn test_dot_layout_html_uses_section_id() {
        let request = LayoutRequest {
            format: OutputFormat::Html,
            section_id: 7,
            rel_path: "",
            title: "Inheritance diagram for Circle",
        };
        let html = DotLayout::new().render(&sample_graph(), &request);
        assert!(html.starts_with("<div class=\"dyncontent\" id=\"dynsection-7-content\">"));
        assert!(html.contains("Shape&lt;"));
    }

    #[test]
    fn test_dot_layout_man_is_empty() {
        let request = LayoutRequest {
            format: OutputFormat::Man,
            section_id: 0,
            rel_path: "",
            title: "",
        };
        assert_eq!(DotLayout::new().render(&sample_graph(), &request), "");
    }
}
