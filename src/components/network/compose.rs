//! Composes scene, labels and layout into one interactive graph.
//!
//! [`compose`] renders the scene, optionally labels every node, starts the
//! layout with a tick that keeps nodes inside the canvas and moves the bound
//! elements, and returns a [`GraphView`] that the host drives once per
//! animation frame and feeds pointer interaction into.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use super::config::{GraphConfig, SceneConfig};
use super::labels::render_labels;
use super::layout::ForceLayout;
use super::reconcile::{SceneChart, reconcile};
use super::scene::{ElementId, Scene, Selection};
use super::types::{GraphLink, GraphNode, NodePosition};

/// Hovered circles grow to this multiple of their radius.
pub const HOVER_SCALE: f64 = 2.0;
/// Radius transition length, seconds.
pub const HOVER_DURATION: f64 = 0.25;

/// Largest configured node radius: the literal, or the accessor's maximum.
pub fn effective_radius(nodes: &[GraphNode], config: &SceneConfig) -> f64 {
	config.radius.max_over(nodes).unwrap_or(0.0)
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[derive(Clone, Copy, Debug)]
struct RadiusTransition {
	from: f64,
	to: f64,
	elapsed: f64,
}

impl RadiusTransition {
	fn value(&self) -> f64 {
		let t = (self.elapsed / HOVER_DURATION).clamp(0.0, 1.0);
		self.from + (self.to - self.from) * ease_cubic_in_out(t)
	}

	fn done(&self) -> bool {
		self.elapsed >= HOVER_DURATION
	}
}

/// Everything a tick needs to reposition the scene.
struct TickTargets {
	scene: Rc<RefCell<Scene>>,
	lines: Vec<(ElementId, Option<(usize, usize)>)>,
	groups: Vec<ElementId>,
	labels: Vec<(ElementId, usize)>,
	radius: f64,
	size: (f64, f64),
}

impl TickTargets {
	fn tick(&self, positions: &mut [NodePosition]) {
		let (w, h) = self.size;
		let r = self.radius;
		for p in positions.iter_mut() {
			p.x = p.x.min(w - r).max(r);
			p.y = p.y.min(h - r).max(r);
		}

		let mut scene = self.scene.borrow_mut();
		for &(line, ends) in &self.lines {
			let Some((s, t)) = ends else {
				continue;
			};
			let (s, t) = (positions[s], positions[t]);
			scene.set_attr(line, "x1", s.x);
			scene.set_attr(line, "y1", s.y);
			scene.set_attr(line, "x2", t.x);
			scene.set_attr(line, "y2", t.y);
		}
		for (&group, p) in self.groups.iter().zip(positions.iter()) {
			scene.set_attr(group, "transform", translate(p));
		}
		for &(label, index) in &self.labels {
			if let Some(p) = positions.get(index) {
				scene.set_attr(label, "transform", translate(p));
			}
		}
	}
}

fn translate(p: &NodePosition) -> String {
	format!("translate({},{})", p.x, p.y)
}

/// A rendered, simulated graph.
pub struct GraphView {
	scene: Rc<RefCell<Scene>>,
	chart: SceneChart,
	labels: Option<Selection>,
	layout: ForceLayout,
	radius: f64,
	base_radii: Vec<f64>,
	current_radii: Vec<f64>,
	transitions: HashMap<usize, RadiusTransition>,
	hovered: Option<usize>,
}

/// Render `nodes` and `links` under `container` and start the layout.
pub fn compose(
	scene: Rc<RefCell<Scene>>,
	container: ElementId,
	nodes: &[GraphNode],
	links: &[GraphLink],
	config: &GraphConfig,
) -> GraphView {
	let (chart, labels) = {
		let mut scene = scene.borrow_mut();
		let chart = reconcile(&mut scene, container, nodes, links, &config.graph);
		let labels = config
			.text
			.as_ref()
			.map(|text| render_labels(&mut scene, container, nodes, text));
		(chart, labels)
	};

	let radius = effective_radius(nodes, &config.graph);
	let base_radii: Vec<f64> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| config.graph.radius.resolve(n, i))
		.collect();

	let mut layout = ForceLayout::new(nodes, links, &config.force);
	let targets = TickTargets {
		scene: Rc::clone(&scene),
		lines: chart
			.lines()
			.iter()
			.enumerate()
			.map(|(i, &line)| (line, layout.link_ends(i)))
			.collect(),
		groups: chart.groups().to_vec(),
		labels: labels
			.iter()
			.flatten()
			.map(|b| (b.id, b.index))
			.collect(),
		radius,
		size: config.force.size,
	};
	layout.on_tick(move |positions| targets.tick(positions));
	layout.start();

	debug!("compose: effective radius {radius}");

	GraphView {
		scene,
		chart,
		labels,
		layout,
		current_radii: base_radii.clone(),
		base_radii,
		radius,
		transitions: HashMap::new(),
		hovered: None,
	}
}

impl GraphView {
	/// Shared scene the graph renders into.
	pub fn scene(&self) -> &Rc<RefCell<Scene>> {
		&self.scene
	}

	/// Bound lines and node groups.
	pub fn chart(&self) -> &SceneChart {
		&self.chart
	}

	/// Label groups, when labels are configured.
	pub fn labels(&self) -> Option<&Selection> {
		self.labels.as_ref()
	}

	/// The running layout.
	pub fn layout(&self) -> &ForceLayout {
		&self.layout
	}

	/// Radius used for canvas clamping.
	pub fn radius(&self) -> f64 {
		self.radius
	}

	/// Current node positions, in node order.
	pub fn positions(&self) -> &[NodePosition] {
		self.layout.positions()
	}

	/// Whether the layout is still cooling.
	pub fn is_running(&self) -> bool {
		self.layout.is_running()
	}

	/// Current cooling parameter.
	pub fn alpha(&self) -> f64 {
		self.layout.alpha()
	}

	/// Halt the layout immediately.
	pub fn stop(&mut self) {
		self.layout.stop();
	}

	/// Reheat the layout.
	pub fn resume(&mut self) {
		self.layout.resume();
	}

	/// Advance one frame of `dt` seconds. Returns whether anything may have
	/// changed in the scene.
	pub fn advance(&mut self, dt: f64) -> bool {
		let running = self.layout.is_running();
		if running {
			self.layout.step(dt as f32);
		}
		if self.transitions.is_empty() {
			return running;
		}

		let mut scene = self.scene.borrow_mut();
		self.transitions.retain(|&index, transition| {
			transition.elapsed += dt;
			let r = transition.value();
			self.current_radii[index] = r;
			if let Some(circle) = self.chart.circle(index) {
				scene.set_attr(circle, "r", r);
			}
			!transition.done()
		});
		true
	}

	/// Topmost node whose circle contains `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.positions()
			.iter()
			.zip(&self.current_radii)
			.enumerate()
			.rev()
			.find(|(_, (p, r))| (p.x - x).powi(2) + (p.y - y).powi(2) <= *r * *r)
			.map(|(i, _)| i)
	}

	/// Index of the hovered node.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Move the hover to `node`: its radius grows, the previous one shrinks.
	pub fn hover(&mut self, node: Option<usize>) {
		if self.hovered == node {
			return;
		}
		if let Some(prev) = self.hovered.take() {
			self.transition_radius(prev, self.base_radii[prev]);
		}
		if let Some(index) = node.filter(|&i| i < self.base_radii.len()) {
			self.transition_radius(index, self.base_radii[index] * HOVER_SCALE);
			self.hovered = Some(index);
		}
	}

	fn transition_radius(&mut self, index: usize, to: f64) {
		self.transitions.insert(
			index,
			RadiusTransition {
				from: self.current_radii[index],
				to,
				elapsed: 0.0,
			},
		);
	}

	/// Pin the node; the layout no longer moves it.
	pub fn drag_start(&mut self, index: usize) {
		debug!("compose: drag start on node {index}");
		self.layout.drag_start(index);
	}

	/// Place a dragged node. The next tick clamps it to the canvas.
	pub fn drag_to(&mut self, index: usize, x: f64, y: f64) {
		self.layout.drag_to(index, x, y);
	}

	/// End a drag. The node stays pinned where it was dropped.
	pub fn drag_end(&mut self, index: usize) {
		debug!("compose: drag end on node {index}");
	}
}

#[cfg(test)]
mod tests {
	use super::super::attr::Attr;
	use super::super::config::{ForceConfig, TextConfig};
	use super::*;

	const W: f64 = 200.0;
	const H: f64 = 160.0;

	fn nodes() -> Vec<GraphNode> {
		(0..5).map(|i| GraphNode::new(format!("node{i}"))).collect()
	}

	fn links() -> Vec<GraphLink> {
		[(0, 1), (3, 2), (3, 0), (2, 3)]
			.into_iter()
			.map(|(s, t)| GraphLink::new(format!("node{s}"), format!("node{t}")))
			.collect()
	}

	fn config(with_text: bool) -> GraphConfig {
		GraphConfig {
			graph: SceneConfig {
				radius: 20.0.into(),
				color: "#bcbd22".into(),
				edge_class_name: "graph-chart-edge".into(),
				..Default::default()
			},
			force: ForceConfig {
				size: (W, H),
				charge: -5000.0,
				gravity: 0.0,
				link_distance: 400.0.into(),
				friction: 0.9,
			},
			text: with_text.then(TextConfig::default),
		}
	}

	fn view(with_text: bool) -> GraphView {
		let scene = Rc::new(RefCell::new(Scene::new(W, H)));
		let root = scene.borrow().root();
		compose(scene, root, &nodes(), &links(), &config(with_text))
	}

	fn assert_inside(view: &GraphView) {
		let r = view.radius();
		for p in view.positions() {
			assert!(p.x >= r && p.x <= W - r, "x {} out of bounds", p.x);
			assert!(p.y >= r && p.y <= H - r, "y {} out of bounds", p.y);
		}
	}

	#[test]
	fn test_builds_scene_and_starts_layout() {
		let view = view(false);
		let scene = view.scene().borrow();
		assert_eq!(scene.count("circle"), 5);
		assert_eq!(scene.count("line"), 4);
		assert_eq!(scene.count("text"), 0);
		assert!(view.labels().is_none());
		assert!(view.is_running());
		assert_eq!(view.radius(), 20.0);
	}

	#[test]
	fn test_positions_never_leave_canvas() {
		let mut view = view(false);
		for _ in 0..200 {
			view.advance(0.016);
			assert_inside(&view);
		}
	}

	#[test]
	fn test_tick_moves_elements_to_positions() {
		let mut view = view(true);
		view.advance(0.016);

		let scene = view.scene().borrow();
		let positions = view.positions();
		for (i, p) in positions.iter().enumerate() {
			let expected = format!("translate({},{})", p.x, p.y);
			let group = view.chart().group(i).unwrap();
			assert_eq!(scene.attr(group, "transform"), Some(expected.as_str()));
		}
		for label in view.labels().unwrap() {
			let p = positions[label.index];
			let expected = format!("translate({},{})", p.x, p.y);
			assert_eq!(scene.attr(label.id, "transform"), Some(expected.as_str()));
		}

		let line = view.chart().line(1).unwrap();
		let (source, target) = (positions[3], positions[2]);
		assert_eq!(scene.attr(line, "x1"), Some(source.x.to_string().as_str()));
		assert_eq!(scene.attr(line, "y1"), Some(source.y.to_string().as_str()));
		assert_eq!(scene.attr(line, "x2"), Some(target.x.to_string().as_str()));
		assert_eq!(scene.attr(line, "y2"), Some(target.y.to_string().as_str()));
	}

	#[test]
	fn test_hover_doubles_radius_and_restores() {
		let mut view = view(false);
		view.stop();
		let circle = view.chart().circle(2).unwrap();
		let r = |view: &GraphView| -> f64 {
			view.scene()
				.borrow()
				.attr(circle, "r")
				.and_then(|v| v.parse().ok())
				.unwrap()
		};

		view.hover(Some(2));
		assert_eq!(view.hovered(), Some(2));
		view.advance(HOVER_DURATION / 2.0);
		let mid = r(&view);
		assert!(mid > 20.0 && mid < 40.0);
		view.advance(HOVER_DURATION);
		assert_eq!(r(&view), 40.0);
		assert!(!view.advance(0.016));

		view.hover(None);
		view.advance(HOVER_DURATION * 2.0);
		assert_eq!(r(&view), 20.0);
		assert_eq!(view.hovered(), None);
	}

	#[test]
	fn test_drag_pins_and_clamps() {
		let mut view = view(false);
		view.drag_start(1);
		view.drag_to(1, -50.0, 1000.0);
		view.advance(0.016);
		view.drag_end(1);

		let p = view.positions()[1];
		assert!(p.fixed);
		assert_eq!((p.x, p.y), (20.0, H - 20.0));
		for _ in 0..20 {
			view.advance(0.016);
		}
		assert_eq!(view.positions()[1], p);
	}

	#[test]
	fn test_self_loop_renders_and_animates() {
		let scene = Rc::new(RefCell::new(Scene::new(W, H)));
		let root = scene.borrow().root();
		let nodes = vec![GraphNode::new("a"), GraphNode::new("b")];
		let links = vec![GraphLink::new("a", "a"), GraphLink::new("a", "b")];
		let mut view = compose(scene, root, &nodes, &links, &config(false));
		for _ in 0..50 {
			view.advance(0.016);
		}
		assert_inside(&view);

		let scene = view.scene().borrow();
		assert_eq!(scene.count("line"), 2);
		let line = view.chart().line(0).unwrap();
		assert_eq!(scene.attr(line, "x1"), scene.attr(line, "x2"));
	}

	#[test]
	fn test_node_at_hits_topmost() {
		let mut view = view(false);
		view.advance(0.016);
		let p = view.positions()[4];
		assert_eq!(view.node_at(p.x + 3.0, p.y - 3.0), Some(4));
		assert_eq!(view.node_at(-100.0, -100.0), None);
	}

	#[test]
	fn test_effective_radius_from_accessor() {
		let config = SceneConfig {
			radius: Attr::accessor(|_: &GraphNode, i| 4.0 + i as f64),
			..Default::default()
		};
		assert_eq!(effective_radius(&nodes(), &config), 8.0);
		assert_eq!(effective_radius(&[], &config), 0.0);
	}
}
