//! Per-component configuration.
//!
//! Each component reads its own attribute map. Every visual attribute is an
//! [`Attr`]: a literal or a per-datum accessor. Configurations deserialize
//! from JSON with missing fields taking their defaults and unknown fields
//! ignored; JSON can only express literals, accessors are set from code.

use serde::{Deserialize, Deserializer};

use super::attr::Attr;
use super::palette::NodePalette;
use super::types::{GraphNode, LinkDatum};

/// Accessor-capable attribute over nodes.
pub type NodeAttr<T> = Attr<GraphNode, T>;

/// Accessor-capable attribute over links.
pub type LinkAttr<T> = Attr<LinkDatum, T>;

/// Visual attributes of the node/edge scene.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
	/// Circle radius.
	pub radius: NodeAttr<f64>,
	/// CSS class of every circle.
	pub node_class_name: String,
	/// CSS class of every line.
	pub edge_class_name: String,
	/// Circle fill.
	pub color: NodeAttr<String>,
	/// DOM id of each circle.
	#[serde(skip)]
	pub id: NodeAttr<String>,
	/// Optional DOM id of the group holding the scene.
	pub group_id: Option<String>,
}

impl Default for SceneConfig {
	fn default() -> Self {
		let palette = NodePalette::category10();
		Self {
			radius: 10.0.into(),
			node_class_name: "node".into(),
			edge_class_name: "edge".into(),
			color: Attr::accessor(move |node: &GraphNode, i| {
				node.color.clone().unwrap_or_else(|| {
					node.group
						.as_deref()
						.map(|g| palette.for_group(g))
						.unwrap_or_else(|| palette.get(i))
						.to_css()
				})
			}),
			id: Attr::accessor(|node: &GraphNode, _| node.id.clone()),
			group_id: None,
		}
	}
}

/// Physics parameters handed to the layout driver.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceConfig {
	/// Canvas `[width, height]`; also the clamp bounds for node positions.
	pub size: (f64, f64),
	/// Strength of the pull toward the canvas centre.
	pub gravity: f64,
	/// Rest length of each link.
	pub link_distance: LinkAttr<f64>,
	/// Node charge. Negative values repel.
	pub charge: f64,
	/// Velocity retained per step, `0.0..=1.0`.
	pub friction: f64,
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			size: (600.0, 500.0),
			gravity: 0.1,
			link_distance: 20.0.into(),
			charge: -30.0,
			friction: 0.9,
		}
	}
}

/// Background text layer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleLayer {
	/// CSS class of the background text.
	pub class_name: String,
}

/// Label attributes. Only these attributes are ever applied to text.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TextConfig {
	/// `font-family` attribute.
	#[serde(rename = "font-family")]
	pub font_family: Option<NodeAttr<String>>,
	/// `font-size` attribute.
	#[serde(rename = "font-size")]
	pub font_size: Option<NodeAttr<String>>,
	/// `stroke` attribute.
	pub stroke: Option<NodeAttr<String>>,
	/// `fill` attribute.
	pub fill: Option<NodeAttr<String>>,
	/// `text-anchor` attribute.
	#[serde(rename = "text-anchor")]
	pub text_anchor: Option<NodeAttr<String>>,
	/// `x` attribute: a number or an SVG length such as `"0.5em"`.
	#[serde(deserialize_with = "length")]
	pub x: Option<NodeAttr<String>>,
	/// `y` attribute, like `x`.
	#[serde(deserialize_with = "length")]
	pub y: Option<NodeAttr<String>>,
	/// Label text.
	#[serde(skip)]
	pub text: NodeAttr<String>,
	/// DOM id of the outer label group.
	#[serde(alias = "groupId")]
	pub id: Option<String>,
	/// Render each label twice, the first copy carrying this class.
	#[serde(rename = "doubleLayer")]
	pub double_layer: Option<DoubleLayer>,
}

impl Default for TextConfig {
	fn default() -> Self {
		Self {
			font_family: None,
			font_size: None,
			stroke: None,
			fill: None,
			text_anchor: None,
			x: None,
			y: None,
			text: Attr::accessor(|node: &GraphNode, _| {
				node.label.clone().unwrap_or_else(|| node.id.clone())
			}),
			id: None,
			double_layer: None,
		}
	}
}

impl TextConfig {
	/// The whitelisted attributes that are set, resolved for one datum.
	pub fn resolve(&self, node: &GraphNode, index: usize) -> Vec<(&'static str, String)> {
		[
			("font-family", &self.font_family),
			("font-size", &self.font_size),
			("stroke", &self.stroke),
			("fill", &self.fill),
			("text-anchor", &self.text_anchor),
			("x", &self.x),
			("y", &self.y),
		]
		.into_iter()
		.filter_map(|(name, attr)| attr.as_ref().map(|a| (name, a.resolve(node, index))))
		.collect()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Length {
	Number(f64),
	Text(String),
}

/// Accept a JSON number or string for a coordinate attribute.
fn length<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Option<NodeAttr<String>>, D::Error> {
	Ok(Option::<Length>::deserialize(deserializer)?.map(|length| match length {
		Length::Number(n) => Attr::Literal(n.to_string()),
		Length::Text(s) => Attr::Literal(s),
	}))
}

/// Configuration for a whole graph.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Node and link visuals.
	pub graph: SceneConfig,
	/// Layout physics.
	pub force: ForceConfig,
	/// Labels are rendered only when present.
	pub text: Option<TextConfig>,
}
