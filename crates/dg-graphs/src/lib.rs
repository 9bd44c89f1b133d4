//! Diagram layout engines for docgen.
//!
//! Layouts turn a [`DiagramGraph`](dg_model::DiagramGraph) into a fragment for
//! one output format:
//! - [`DotLayout`]: embeds the DOT source, one wrapper per format
//! - [`KrokiLayout`]: renders SVG through a Kroki server, falling back to
//!   [`DotLayout`] on failure and for formats that can't embed SVG
//!
//! Both receive the section id allocated for the diagram so collapsible
//! sections get unique anchors.

mod dot;
mod error;
mod kroki;
mod layout;

pub use dot::{DotLayout, to_dot};
pub use error::LayoutError;
pub use kroki::{DEFAULT_TIMEOUT, KrokiLayout, create_agent, prepare_svg};
pub use layout::{GraphLayout, LayoutRequest, dynsection_id};
