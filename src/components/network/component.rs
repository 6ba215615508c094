//! Leptos component wrapping the SVG network graph.
//!
//! The component creates a host `<div>`, renders the graph scene into an SVG
//! inside it and wires mouse handlers for hover and node dragging. An
//! animation loop runs via `requestAnimationFrame`, advancing the layout and
//! hover transitions and syncing the scene into the DOM each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlDivElement, MouseEvent};

use super::compose::{GraphView, compose};
use super::config::GraphConfig;
use super::dom::DomMirror;
use super::scene::Scene;
use super::types::GraphData;

/// Longest frame step fed to the layout, seconds.
const MAX_FRAME_DT: f64 = 0.1;

/// Bundles the live graph with its DOM mirror and pointer state.
struct NetworkContext {
	graph: GraphView,
	mirror: DomMirror,
	dragging: Option<usize>,
	last_frame: f64,
}

impl NetworkContext {
	fn sync(&mut self) {
		let scene = Rc::clone(self.graph.scene());
		self.mirror.sync(&scene.borrow());
	}
}

fn pointer(host: &HtmlDivElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = host.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Renders an interactive force-directed network as SVG.
///
/// Pass graph data via the reactive `data` signal and visual/physics settings
/// via `config`. The component sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport. Explicit
/// `width`/`height` override automatic sizing. The resolved size replaces
/// `config.force.size`.
#[component]
pub fn ForceNetwork(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: GraphConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let context: Rc<RefCell<Option<NetworkContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let data = data.get();

		let (w, h) = if fullscreen {
			(
				window
					.inner_width()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(800.0),
				window
					.inner_height()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(600.0),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					host.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					host.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};

		let mut config = config.clone();
		config.force.size = (w, h);
		let scene = Rc::new(RefCell::new(Scene::new(w, h)));
		let container = {
			let mut scene = scene.borrow_mut();
			let root = scene.root();
			scene.append(root, "g")
		};
		let graph = compose(scene, container, &data.nodes, &data.links, &config);

		host.set_inner_html("");
		let host_element: Element = host.into();
		let Some(mirror) = DomMirror::new(host_element) else {
			warn!("force-network: host element is not attached to a document");
			return;
		};
		let mut ctx = NetworkContext {
			graph,
			mirror,
			dragging: None,
			last_frame: js_sys::Date::now(),
		};
		ctx.sync();
		*context_init.borrow_mut() = Some(ctx);

		if animate_init.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let now = js_sys::Date::now();
				let dt = ((now - c.last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
				c.last_frame = now;
				if c.graph.advance(dt) {
					c.sync();
				}
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(host) = host_ref.get() else {
			return;
		};
		let (x, y) = pointer(&host, &ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.graph.node_at(x, y) {
				c.dragging = Some(idx);
				c.graph.drag_start(idx);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(host) = host_ref.get() else {
			return;
		};
		let (x, y) = pointer(&host, &ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			match c.dragging {
				Some(idx) => c.graph.drag_to(idx, x, y),
				None => {
					let hovered = c.graph.node_at(x, y);
					c.graph.hover(hovered);
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if let Some(idx) = c.dragging.take() {
				c.graph.drag_end(idx);
			}
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			if let Some(idx) = c.dragging.take() {
				c.graph.drag_end(idx);
			}
			c.graph.hover(None);
		}
	};

	view! {
		<div
			node_ref=host_ref
			class="force-network"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab;"
		/>
	}
}
