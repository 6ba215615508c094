//! Text labels for data items.
//!
//! Labels live in their own outer `<g>` with one inner `<g>` per datum. With a
//! double layer configured, each inner group holds a background `<text>`
//! carrying the layer class, then the foreground `<text>`.

use super::config::TextConfig;
use super::scene::{ElementId, Scene, Selection};
use super::types::GraphNode;

const LABEL_NAMESPACE: &str = "label";

/// Render one label group per datum under a fresh outer group appended to
/// `container`. Returns the per-datum groups for repositioning.
pub fn render_labels(
	scene: &mut Scene,
	container: ElementId,
	data: &[GraphNode],
	config: &TextConfig,
) -> Selection {
	let outer = scene.append(container, "g");
	if let Some(id) = &config.id {
		scene.set_attr(outer, "id", id);
	}

	let join = scene.join(
		outer,
		"g",
		LABEL_NAMESPACE,
		data.iter().map(|d| d.id.as_str()),
	);

	for bound in &join.enter {
		let datum = &data[bound.index];
		let attrs = config.resolve(datum, bound.index);
		let text = config.text.resolve(datum, bound.index);

		if let Some(layer) = &config.double_layer {
			let background = scene.append(bound.id, "text");
			for (name, value) in &attrs {
				scene.set_attr(background, name, value);
			}
			scene.set_attr(background, "class", &layer.class_name);
			scene.set_text(background, text.clone());
		}

		let foreground = scene.append(bound.id, "text");
		for (name, value) in &attrs {
			scene.set_attr(foreground, name, value);
		}
		scene.set_text(foreground, text);
	}

	join.enter
}

#[cfg(test)]
mod tests {
	use super::super::attr::Attr;
	use super::super::config::DoubleLayer;
	use super::*;

	fn nodes() -> Vec<GraphNode> {
		(0..5).map(|i| GraphNode::new(format!("node{i}"))).collect()
	}

	fn text_config() -> TextConfig {
		TextConfig {
			font_family: Some("serif".into()),
			font_size: Some("1em".into()),
			stroke: Some("#ff0000".into()),
			text_anchor: Some("start".into()),
			text: Attr::accessor(|d: &GraphNode, _| d.id.clone()),
			id: Some("text-group".into()),
			..Default::default()
		}
	}

	fn outer_group(scene: &Scene) -> ElementId {
		scene.children(scene.root())[0]
	}

	#[test]
	fn test_appends_group_with_id() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		render_labels(&mut scene, root, &nodes(), &text_config());
		assert_eq!(scene.attr(outer_group(&scene), "id"), Some("text-group"));
	}

	#[test]
	fn test_one_group_per_datum_with_one_text() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let data = nodes();
		let labels = render_labels(&mut scene, root, &data, &text_config());

		assert_eq!(labels.len(), data.len());
		for bound in &labels {
			let children = scene.children(bound.id);
			assert_eq!(children.len(), 1);
			let text = children[0];
			assert_eq!(scene.text(text), Some(data[bound.index].id.as_str()));
			assert_eq!(scene.attr(text, "font-family"), Some("serif"));
			assert_eq!(scene.attr(text, "text-anchor"), Some("start"));
			assert_eq!(scene.attr(text, "fill"), None);
			assert_eq!(scene.attr(text, "class"), None);
		}
	}

	#[test]
	fn test_double_layer_adds_background_text_first() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let config = TextConfig {
			double_layer: Some(DoubleLayer {
				class_name: "ssss".into(),
			}),
			..text_config()
		};
		let labels = render_labels(&mut scene, root, &nodes(), &config);

		for bound in &labels {
			let children = scene.children(bound.id);
			assert_eq!(children.len(), 2);
			assert_eq!(scene.attr(children[0], "class"), Some("ssss"));
			assert_eq!(scene.attr(children[1], "class"), None);
			assert_eq!(scene.text(children[0]), scene.text(children[1]));
			assert_eq!(scene.attr(children[0], "stroke"), Some("#ff0000"));
		}
		assert_eq!(scene.count("text"), 10);
	}

	#[test]
	fn test_labels_do_not_disturb_node_groups() {
		let mut scene = Scene::new(600.0, 500.0);
		let root = scene.root();
		let data = nodes();
		let chart = super::super::reconcile::reconcile(
			&mut scene,
			root,
			&data,
			&[],
			&Default::default(),
		);
		render_labels(&mut scene, root, &data, &text_config());
		let again = super::super::reconcile::reconcile(
			&mut scene,
			root,
			&data,
			&[],
			&Default::default(),
		);

		assert!(again.bubbles.enter.is_empty());
		assert_eq!(again.bubbles.exit, 0);
		assert_eq!(chart.groups(), again.groups());
		assert_eq!(scene.count("text"), 5);
	}
}
