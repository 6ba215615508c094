//! Mirrors a [`Scene`] into the live DOM.
//!
//! Each scene element gets one SVG-namespace DOM element under the host.
//! A sync walks the scene once: elements the scene dropped are removed,
//! new ones are created and appended, and only attributes and text that
//! changed since the previous sync are written.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use web_sys::{Document, Element};

use super::scene::{ElementId, SVG_NS, Scene};

struct Mirrored {
	element: Element,
	attrs: BTreeMap<String, String>,
	text: Option<String>,
}

/// DOM counterpart of one scene.
pub struct DomMirror {
	document: Document,
	host: Element,
	nodes: HashMap<ElementId, Mirrored>,
}

impl DomMirror {
	/// Mirror into `host`. `None` when the host is detached from a document.
	pub fn new(host: Element) -> Option<Self> {
		let document = host.owner_document()?;
		Some(Self {
			document,
			host,
			nodes: HashMap::new(),
		})
	}

	/// Bring the DOM in line with `scene`.
	pub fn sync(&mut self, scene: &Scene) {
		self.nodes.retain(|&id, mirrored| {
			let alive = scene.contains(id);
			if !alive {
				mirrored.element.remove();
			}
			alive
		});

		let mut stack = vec![(scene.root(), None)];
		while let Some((id, parent)) = stack.pop() {
			let Some(el) = scene.get(id) else {
				continue;
			};
			if !self.nodes.contains_key(&id) && !self.create(id, el.tag, parent) {
				continue;
			}
			let Some(mirrored) = self.nodes.get_mut(&id) else {
				continue;
			};

			for (name, value) in &el.attrs {
				if mirrored.attrs.get(name) == Some(value) {
					continue;
				}
				if let Err(e) = mirrored.element.set_attribute(name, value) {
					warn!("dom: failed to set {name} on {id}: {e:?}");
					continue;
				}
				mirrored.attrs.insert(name.clone(), value.clone());
			}
			if mirrored.text != el.text {
				mirrored.element.set_text_content(el.text.as_deref());
				mirrored.text = el.text.clone();
			}

			stack.extend(el.children.iter().rev().map(|&child| (child, Some(id))));
		}
	}

	fn create(&mut self, id: ElementId, tag: &str, parent: Option<ElementId>) -> bool {
		let element = match self.document.create_element_ns(Some(SVG_NS), tag) {
			Ok(element) => element,
			Err(e) => {
				warn!("dom: failed to create <{tag}>: {e:?}");
				return false;
			}
		};
		let parent = parent
			.and_then(|p| self.nodes.get(&p))
			.map_or(&self.host, |m| &m.element);
		if let Err(e) = parent.append_child(&element) {
			warn!("dom: failed to attach <{tag}>: {e:?}");
			return false;
		}
		self.nodes.insert(
			id,
			Mirrored {
				element,
				attrs: BTreeMap::new(),
				text: None,
			},
		);
		true
	}
}
