//! force-network: SVG force-directed network graphs for Leptos.
//!
//! This crate provides a WASM-based network widget that renders nodes as
//! circles and links as lines, lays them out with a force simulation, and
//! supports node labels, hover growth and drag-to-pin.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::network::{
	ForceNetwork, GraphConfig, GraphData, GraphLink, GraphNode, GraphView, compose,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("force-network: logging initialized");
}

/// Parse JSON from the text of the `<script>` element with the given id.
fn load_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("force-network: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data = load_json::<GraphData>("graph-data")?;
	info!(
		"force-network: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Main application component.
/// Loads graph data and optional config from the DOM and renders the network.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_json::<GraphConfig>("graph-config").unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Force Network" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceNetwork data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Network"</h1>
				<p class="subtitle">"Hover to highlight. Drag nodes to pin them."</p>
			</div>
		</div>
	}
}
