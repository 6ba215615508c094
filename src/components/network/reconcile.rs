//! Binds nodes and links to SVG primitives.
//!
//! Each link is a `<line>`; each node is a `<g>` wrapping a `<circle>`. Visual
//! attributes are applied when an element enters. Elements kept across joins
//! keep their attributes; the tick positions them.

use log::debug;

use super::config::SceneConfig;
use super::scene::{ElementId, Join, Scene};
use super::types::{GraphLink, GraphNode};

const EDGE_NAMESPACE: &str = "edge";
const NODE_NAMESPACE: &str = "bubble";

/// Bound elements of one rendered graph.
#[derive(Clone, Debug, Default)]
pub struct SceneChart {
	/// The line join; `links.merged()` is every line in link order.
	pub links: Join,
	/// The node group join; `bubbles.merged()` is every group in node order.
	pub bubbles: Join,
	lines: Vec<ElementId>,
	groups: Vec<ElementId>,
	circles: Vec<Option<ElementId>>,
}

impl SceneChart {
	/// Line of the link at `index`.
	pub fn line(&self, index: usize) -> Option<ElementId> {
		self.lines.get(index).copied()
	}

	/// Group of the node at `index`.
	pub fn group(&self, index: usize) -> Option<ElementId> {
		self.groups.get(index).copied()
	}

	/// Circle of the node at `index`.
	pub fn circle(&self, index: usize) -> Option<ElementId> {
		self.circles.get(index).copied().flatten()
	}

	/// Every line, in link order.
	pub fn lines(&self) -> &[ElementId] {
		&self.lines
	}

	/// Every node group, in node order.
	pub fn groups(&self) -> &[ElementId] {
		&self.groups
	}
}

fn link_key(link: &GraphLink) -> String {
	format!("{}->{}", link.source, link.target)
}

/// Reconcile the lines and node groups under `container` with `links` and
/// `nodes`.
pub fn reconcile(
	scene: &mut Scene,
	container: ElementId,
	nodes: &[GraphNode],
	links: &[GraphLink],
	config: &SceneConfig,
) -> SceneChart {
	if let Some(group_id) = &config.group_id {
		scene.set_attr(container, "id", group_id);
	}

	let link_join = make_lines(scene, container, links, config);
	let bubble_join = make_bubble_groups(scene, container, nodes, config);

	let lines = link_join.merged().iter().map(|b| b.id).collect();
	let groups: Vec<ElementId> = bubble_join.merged().iter().map(|b| b.id).collect();
	let circles = groups
		.iter()
		.map(|&g| {
			scene
				.children(g)
				.iter()
				.copied()
				.find(|&c| scene.get(c).is_some_and(|e| e.tag == "circle"))
		})
		.collect();

	debug!(
		"reconcile: lines +{} ~{} -{}, groups +{} ~{} -{}",
		link_join.enter.len(),
		link_join.update.len(),
		link_join.exit,
		bubble_join.enter.len(),
		bubble_join.update.len(),
		bubble_join.exit
	);

	SceneChart {
		links: link_join,
		bubbles: bubble_join,
		lines,
		groups,
		circles,
	}
}

fn make_lines(
	scene: &mut Scene,
	container: ElementId,
	links: &[GraphLink],
	config: &SceneConfig,
) -> Join {
	let join = scene.join(
		container,
		"line",
		EDGE_NAMESPACE,
		links.iter().map(link_key),
	);
	for bound in &join.enter {
		scene.set_attr(bound.id, "class", &config.edge_class_name);
	}
	join
}

fn make_bubble_groups(
	scene: &mut Scene,
	container: ElementId,
	nodes: &[GraphNode],
	config: &SceneConfig,
) -> Join {
	let join = scene.join(
		container,
		"g",
		NODE_NAMESPACE,
		nodes.iter().map(|n| n.id.as_str()),
	);
	for bound in &join.enter {
		let node = &nodes[bound.index];
		let circle = scene.append(bound.id, "circle");
		scene.set_attr(circle, "r", config.radius.resolve(node, bound.index));
		scene.set_attr(circle, "class", &config.node_class_name);
		scene.set_attr(circle, "fill", config.color.resolve(node, bound.index));
		scene.set_attr(circle, "id", config.id.resolve(node, bound.index));
	}
	join
}

#[cfg(test)]
mod tests {
	use super::super::attr::Attr;
	use super::*;

	fn sample_nodes(n: usize) -> Vec<GraphNode> {
		(0..n).map(|i| GraphNode::new(format!("node{i}"))).collect()
	}

	fn sample_links() -> Vec<GraphLink> {
		[(0, 1), (3, 2), (3, 0), (2, 3)]
			.into_iter()
			.map(|(s, t)| GraphLink::new(format!("node{s}"), format!("node{t}")))
			.collect()
	}

	fn sample_config() -> SceneConfig {
		SceneConfig {
			radius: 20.0.into(),
			node_class_name: "gene".into(),
			edge_class_name: "graph-chart-edge".into(),
			color: "#bcbd22".into(),
			id: Attr::accessor(|n: &GraphNode, _| n.id.clone()),
			group_id: None,
		}
	}

	#[test]
	fn test_renders_five_nodes_and_four_links() {
		let mut scene = Scene::new(600.0, 500.0);
		let container = scene.append(scene.root(), "g");
		let nodes = sample_nodes(5);
		let chart = reconcile(&mut scene, container, &nodes, &sample_links(), &sample_config());

		assert_eq!(scene.count("line"), 4);
		assert_eq!(scene.count("circle"), 5);
		assert_eq!(chart.groups().len(), 5);
		assert_eq!(scene.children(container).len(), 9);

		for &line in chart.lines() {
			assert_eq!(scene.attr(line, "class"), Some("graph-chart-edge"));
		}
		for (i, node) in nodes.iter().enumerate() {
			let circle = chart.circle(i).unwrap();
			assert_eq!(scene.children(chart.group(i).unwrap()), &[circle]);
			assert_eq!(scene.attr(circle, "r"), Some("20"));
			assert_eq!(scene.attr(circle, "fill"), Some("#bcbd22"));
			assert_eq!(scene.attr(circle, "class"), Some("gene"));
			assert_eq!(scene.attr(circle, "id"), Some(node.id.as_str()));
		}
	}

	#[test]
	fn test_accessor_radius_and_index_ids() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let config = SceneConfig {
			radius: Attr::accessor(|_: &GraphNode, i| 5.0 + i as f64),
			id: Attr::accessor(|_: &GraphNode, i| format!("node{i}")),
			..sample_config()
		};
		let chart = reconcile(&mut scene, root, &sample_nodes(3), &[], &config);

		assert_eq!(scene.attr(chart.circle(2).unwrap(), "r"), Some("7"));
		assert_eq!(scene.attr(chart.circle(1).unwrap(), "id"), Some("node1"));
	}

	#[test]
	fn test_rerun_with_same_data_does_not_duplicate() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let (nodes, links) = (sample_nodes(5), sample_links());
		let first = reconcile(&mut scene, root, &nodes, &links, &sample_config());
		let second = reconcile(&mut scene, root, &nodes, &links, &sample_config());

		assert_eq!(scene.count("line"), 4);
		assert_eq!(scene.count("g"), 5);
		assert!(second.links.enter.is_empty());
		assert!(second.bubbles.enter.is_empty());
		assert_eq!(first.groups(), second.groups());
		assert_eq!(first.lines(), second.lines());
	}

	#[test]
	fn test_rerun_with_subset_removes_elements() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let (nodes, links) = (sample_nodes(5), sample_links());
		let first = reconcile(&mut scene, root, &nodes, &links, &sample_config());

		let chart = reconcile(&mut scene, root, &nodes[..2], &links[..1], &sample_config());
		assert_eq!(scene.count("line"), 1);
		assert_eq!(scene.count("g"), 2);
		assert_eq!(scene.count("circle"), 2);
		assert_eq!(chart.bubbles.exit, 3);
		assert_eq!(chart.links.exit, 3);
		assert!(!scene.contains(first.circle(4).unwrap()));
		assert_eq!(chart.circle(1), first.circle(1));
	}

	#[test]
	fn test_empty_data_clears_scene() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		reconcile(&mut scene, root, &sample_nodes(5), &sample_links(), &sample_config());
		reconcile(&mut scene, root, &[], &[], &sample_config());
		assert_eq!(scene.count("line"), 0);
		assert_eq!(scene.count("g"), 0);
	}

	#[test]
	fn test_group_id_tags_container() {
		let mut scene = Scene::new(600.0, 500.0);
		let container = scene.append(scene.root(), "g");
		let config = SceneConfig {
			group_id: Some("graph-group".into()),
			..sample_config()
		};
		reconcile(&mut scene, container, &[], &[], &config);
		assert_eq!(scene.attr(container, "id"), Some("graph-group"));
	}
}
