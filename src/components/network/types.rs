//! Graph data structures for input to the network component.

use serde::Deserialize;

/// A node in the graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links and
	/// as the default DOM id and label text.
	#[serde(alias = "name")]
	pub id: String,
	/// Optional display label.
	pub label: Option<String>,
	/// Optional CSS color override (e.g., "#ff0000").
	pub color: Option<String>,
	/// Optional group name for palette-based coloring.
	pub group: Option<String>,
	/// Optional free-form value carried for accessors.
	pub value: Option<f64>,
	/// Initial x position. Nodes without one start on a ring around the centre.
	pub x: Option<f64>,
	/// Initial y position.
	pub y: Option<f64>,
	/// Start pinned in place.
	#[serde(default)]
	pub fixed: bool,
}

impl GraphNode {
	/// A bare node with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}
}

/// An edge between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

impl GraphLink {
	/// Link between two node ids.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// All nodes.
	pub nodes: Vec<GraphNode>,
	/// Links between nodes, by id.
	pub links: Vec<GraphLink>,
}

/// Mutable simulation fields of one node, as seen by the tick callback.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodePosition {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Pinned nodes are not moved by the simulation.
	pub fixed: bool,
}

/// The datum handed to per-link accessors such as `link_distance`.
#[derive(Clone, Debug)]
pub struct LinkDatum {
	/// The link itself.
	pub link: GraphLink,
	/// Its source node.
	pub source: GraphNode,
	/// Its target node.
	pub target: GraphNode,
	/// Number of links touching the source node.
	pub source_weight: usize,
	/// Number of links touching the target node.
	pub target_weight: usize,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_node_accepts_name_alias() {
		let data: GraphData = serde_json::from_str(
			r#"{
				"nodes": [{ "name": "node0", "value": 0 }, { "id": "node1", "fixed": true }],
				"links": [{ "source": "node0", "target": "node1" }]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes[0].id, "node0");
		assert_eq!(data.nodes[0].value, Some(0.0));
		assert!(!data.nodes[0].fixed);
		assert!(data.nodes[1].fixed);
		assert_eq!(data.links[0], GraphLink::new("node0", "node1"));
	}
}
