//! Force-directed network graph rendered as SVG.
//!
//! Renders nodes as circles and links as lines, optionally labels every
//! node, and animates positions with a force simulation:
//! - Keyed enter/update/exit reconciliation of the SVG scene
//! - Literal-or-accessor configuration for every visual attribute
//! - Gravity, charge and per-link distance with alpha cooling
//! - Canvas-bounded positions, hover growth, and drag-to-pin
//!
//! # Example
//!
//! ```ignore
//! use force_network::{ForceNetwork, GraphConfig, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//!
//! view! { <ForceNetwork data=data.into() config=GraphConfig::default() fullscreen=true /> }
//! ```

pub mod attr;
mod component;
pub mod compose;
pub mod config;
mod dom;
pub mod labels;
pub mod layout;
pub mod palette;
pub mod reconcile;
pub mod scene;
mod types;

pub use attr::Attr;
pub use component::ForceNetwork;
pub use compose::{GraphView, compose};
pub use config::{DoubleLayer, ForceConfig, GraphConfig, SceneConfig, TextConfig};
pub use labels::render_labels;
pub use layout::{ForceLayout, start_layout};
pub use reconcile::{SceneChart, reconcile};
pub use scene::{ElementId, Scene};
pub use types::{GraphData, GraphLink, GraphNode, LinkDatum, NodePosition};
