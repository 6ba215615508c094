//! Force-directed layout driver.
//!
//! Wraps the `force_graph` simulation (charge repulsion, damping, anchored
//! nodes) and adds the layout-level forces it lacks: a gravity pull toward
//! the canvas centre and a per-link rest distance. Both are scaled by the
//! cooling parameter `alpha`, which decays every step until the layout
//! settles.
//!
//! Node positions are owned here. Each step pushes them into the engine,
//! reads the engine's result back, applies gravity and link constraints,
//! then hands the whole slice to the tick callback. Whatever the callback
//! writes (clamps, usually) is what the next step starts from.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use super::config::ForceConfig;
use super::types::{GraphLink, GraphNode, LinkDatum, NodePosition};

/// Per-step callback over all node positions.
pub type TickFn = Box<dyn FnMut(&mut [NodePosition])>;

/// Alpha on start and on resume.
pub const ALPHA_START: f64 = 0.1;
const ALPHA_DECAY: f64 = 0.99;
/// Below this alpha the layout has settled.
const ALPHA_MIN: f64 = 0.005;
/// Engine charge per unit of layout charge. Negative layout charge repels,
/// positive attracts.
const CHARGE_SCALE: f64 = 5.0;
const NODE_MASS: f32 = 10.0;
const START_RING_RADIUS: f64 = 100.0;

#[derive(Clone, Debug)]
struct ResolvedLink {
	source: usize,
	target: usize,
	distance: f64,
	/// Share of the correction applied to the target, by endpoint degree.
	target_share: f64,
}

/// A running (or settled) force layout.
pub struct ForceLayout {
	graph: ForceGraph<usize, ()>,
	positions: Vec<NodePosition>,
	links: Vec<ResolvedLink>,
	link_ends: Vec<Option<(usize, usize)>>,
	size: (f64, f64),
	gravity: f64,
	alpha: f64,
	tick: Option<TickFn>,
}

impl ForceLayout {
	/// Bind nodes, links and physics parameters. The layout is idle until
	/// [`start`](Self::start).
	pub fn new(nodes: &[GraphNode], links: &[GraphLink], config: &ForceConfig) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: (-config.charge * CHARGE_SCALE) as f32,
			force_spring: 0.0,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: config.friction as f32,
		});
		let (width, height) = config.size;

		let mut id_to_idx = HashMap::new();
		let mut engine_idx = Vec::with_capacity(nodes.len());
		let mut positions = Vec::with_capacity(nodes.len());
		for (i, node) in nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / nodes.len() as f64;
			let position = NodePosition {
				x: node
					.x
					.unwrap_or(width / 2.0 + START_RING_RADIUS * angle.cos()),
				y: node
					.y
					.unwrap_or(height / 2.0 + START_RING_RADIUS * angle.sin()),
				fixed: node.fixed,
			};
			engine_idx.push(graph.add_node(NodeData {
				x: position.x as f32,
				y: position.y as f32,
				mass: NODE_MASS,
				is_anchor: position.fixed,
				user_data: i,
			}));
			positions.push(position);
			id_to_idx.entry(node.id.as_str()).or_insert(i);
		}

		let link_ends: Vec<Option<(usize, usize)>> = links
			.iter()
			.map(|link| {
				match (
					id_to_idx.get(link.source.as_str()),
					id_to_idx.get(link.target.as_str()),
				) {
					(Some(&s), Some(&t)) => Some((s, t)),
					_ => {
						warn!(
							"layout: link {} -> {} names an unknown node, skipped",
							link.source, link.target
						);
						None
					}
				}
			})
			.collect();

		let mut weights = vec![0usize; nodes.len()];
		for &(s, t) in link_ends.iter().flatten() {
			weights[s] += 1;
			weights[t] += 1;
		}

		let mut resolved = Vec::new();
		for (i, (link, ends)) in links.iter().zip(&link_ends).enumerate() {
			let Some((s, t)) = *ends else {
				continue;
			};
			// The engine cannot hold an edge from a node to itself.
			if s != t {
				graph.add_edge(engine_idx[s], engine_idx[t], EdgeData::default());
			}
			let datum = LinkDatum {
				link: link.clone(),
				source: nodes[s].clone(),
				target: nodes[t].clone(),
				source_weight: weights[s],
				target_weight: weights[t],
			};
			resolved.push(ResolvedLink {
				source: s,
				target: t,
				distance: config.link_distance.resolve(&datum, i),
				target_share: weights[s] as f64 / (weights[s] + weights[t]) as f64,
			});
		}

		Self {
			graph,
			positions,
			links: resolved,
			link_ends,
			size: config.size,
			gravity: config.gravity,
			alpha: 0.0,
			tick: None,
		}
	}

	/// Install the per-step callback, replacing any previous one.
	pub fn on_tick(&mut self, tick: impl FnMut(&mut [NodePosition]) + 'static) {
		self.tick = Some(Box::new(tick));
	}

	/// Start cooling from [`ALPHA_START`].
	pub fn start(&mut self) {
		info!(
			"layout: starting with {} nodes, {} links",
			self.positions.len(),
			self.links.len()
		);
		self.alpha = ALPHA_START;
	}

	/// Reheat a settled or cooling layout.
	pub fn resume(&mut self) {
		self.alpha = self.alpha.max(ALPHA_START);
	}

	/// Settle immediately.
	pub fn stop(&mut self) {
		self.alpha = 0.0;
	}

	/// Whether alpha is still above the settle threshold.
	pub fn is_running(&self) -> bool {
		self.alpha >= ALPHA_MIN
	}

	/// Current cooling parameter.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Canvas size the layout centres on.
	pub fn size(&self) -> (f64, f64) {
		self.size
	}

	/// All node positions, in node order.
	pub fn positions(&self) -> &[NodePosition] {
		&self.positions
	}

	/// Position of one node.
	pub fn position(&self, index: usize) -> Option<NodePosition> {
		self.positions.get(index).copied()
	}

	/// Node indices joined by the link at `index`, if both ends resolved.
	pub fn link_ends(&self, index: usize) -> Option<(usize, usize)> {
		self.link_ends.get(index).copied().flatten()
	}

	/// Advance one simulation step of `dt` seconds. Returns whether the
	/// layout is still running afterwards; a settled layout does nothing.
	pub fn step(&mut self, dt: f32) -> bool {
		if !self.is_running() {
			return false;
		}

		let positions = &self.positions;
		self.graph.visit_nodes_mut(|node| {
			let p = positions[node.data.user_data];
			node.data.x = p.x as f32;
			node.data.y = p.y as f32;
			node.data.is_anchor = p.fixed;
		});
		self.graph.update(dt * (self.alpha / ALPHA_START) as f32);
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			let p = &mut positions[node.data.user_data];
			if !p.fixed {
				p.x = node.x() as f64;
				p.y = node.y() as f64;
			}
		});

		self.apply_links();
		self.apply_gravity();

		if let Some(tick) = self.tick.as_mut() {
			tick(self.positions.as_mut_slice());
		}

		self.alpha *= ALPHA_DECAY;
		if !self.is_running() {
			debug!("layout: settled");
			self.alpha = 0.0;
		}
		self.is_running()
	}

	fn apply_links(&mut self) {
		for link in &self.links {
			let (s, t) = (self.positions[link.source], self.positions[link.target]);
			let (dx, dy) = (t.x - s.x, t.y - s.y);
			let len = (dx * dx + dy * dy).sqrt();
			if len == 0.0 {
				continue;
			}
			let f = self.alpha * (len - link.distance) / len;
			let (fx, fy) = (dx * f, dy * f);
			if !t.fixed {
				let p = &mut self.positions[link.target];
				p.x -= fx * link.target_share;
				p.y -= fy * link.target_share;
			}
			if !s.fixed {
				let p = &mut self.positions[link.source];
				p.x += fx * (1.0 - link.target_share);
				p.y += fy * (1.0 - link.target_share);
			}
		}
	}

	fn apply_gravity(&mut self) {
		let k = self.alpha * self.gravity;
		if k == 0.0 {
			return;
		}
		let (cx, cy) = (self.size.0 / 2.0, self.size.1 / 2.0);
		for p in self.positions.iter_mut().filter(|p| !p.fixed) {
			p.x += (cx - p.x) * k;
			p.y += (cy - p.y) * k;
		}
	}

	/// Pin a node where it is.
	pub fn drag_start(&mut self, index: usize) {
		if let Some(p) = self.positions.get_mut(index) {
			p.fixed = true;
		}
	}

	/// Move a dragged node and reheat the layout.
	pub fn drag_to(&mut self, index: usize, x: f64, y: f64) {
		if let Some(p) = self.positions.get_mut(index) {
			p.x = x;
			p.y = y;
			self.resume();
		}
	}
}

/// Create a layout, install `tick` and start it.
pub fn start_layout(
	nodes: &[GraphNode],
	links: &[GraphLink],
	config: &ForceConfig,
	tick: impl FnMut(&mut [NodePosition]) + 'static,
) -> ForceLayout {
	let mut layout = ForceLayout::new(nodes, links, config);
	layout.on_tick(tick);
	layout.start();
	layout
}
