//! Retained SVG scene with keyed data joins.
//!
//! The scene is an arena of SVG elements rooted at an `<svg>` element. Data is
//! bound to elements through [`Scene::join`], which reconciles the elements
//! bound under a parent in one binding namespace against a list of keys:
//! keys without an element get a new element (enter), elements whose key is
//! gone are removed with their subtree (exit), and the rest are kept in place
//! (update).
//!
//! Element ids are never reused, so a removed id stays invalid forever. The
//! DOM mirror relies on this to detect removals.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};

/// SVG XML namespace.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Stable handle to an element in a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl fmt::Display for ElementId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Element({})", self.0)
	}
}

#[derive(Clone, Debug)]
struct Binding {
	namespace: &'static str,
	key: String,
}

/// A single SVG element.
#[derive(Clone, Debug)]
pub struct Element {
	/// Element name.
	pub tag: &'static str,
	/// Attributes, sorted by name.
	pub attrs: BTreeMap<String, String>,
	/// Text content.
	pub text: Option<String>,
	/// Child elements, in document order.
	pub children: Vec<ElementId>,
	/// `None` only for the root.
	pub parent: Option<ElementId>,
	binding: Option<Binding>,
}

impl Element {
	fn new(tag: &'static str, parent: Option<ElementId>) -> Self {
		Self {
			tag,
			attrs: BTreeMap::new(),
			text: None,
			children: Vec::new(),
			parent,
			binding: None,
		}
	}

	/// Value of one attribute.
	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.get(name).map(String::as_str)
	}
}

/// An element bound to the datum at `index` of the joined data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bound {
	/// The bound element.
	pub id: ElementId,
	/// Index of its datum.
	pub index: usize,
}

/// Bound elements, in data order.
pub type Selection = Vec<Bound>;

/// Outcome of a data join.
#[derive(Clone, Debug, Default)]
pub struct Join {
	/// Elements created for data that had none.
	pub enter: Selection,
	/// Elements kept for data that already had one.
	pub update: Selection,
	/// Number of elements removed.
	pub exit: usize,
}

impl Join {
	/// Entered and updated elements together, ordered by datum index.
	pub fn merged(&self) -> Selection {
		let mut all: Selection = self.enter.iter().chain(&self.update).copied().collect();
		all.sort_by_key(|b| b.index);
		all
	}
}

/// An SVG element tree.
#[derive(Clone, Debug)]
pub struct Scene {
	elements: Vec<Option<Element>>,
	root: ElementId,
}

impl Scene {
	/// Create a scene whose root is an `<svg>` of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		let mut root = Element::new("svg", None);
		root.attrs.insert("width".into(), width.to_string());
		root.attrs.insert("height".into(), height.to_string());
		Self {
			elements: vec![Some(root)],
			root: ElementId(0),
		}
	}

	/// The `<svg>` element.
	pub fn root(&self) -> ElementId {
		self.root
	}

	/// Element by id. `None` once removed.
	pub fn get(&self, id: ElementId) -> Option<&Element> {
		self.elements.get(id.0).and_then(Option::as_ref)
	}

	fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
		self.elements.get_mut(id.0).and_then(Option::as_mut)
	}

	/// Whether `id` is still live.
	pub fn contains(&self, id: ElementId) -> bool {
		self.get(id).is_some()
	}

	/// Append a new child element. Appending to a removed parent is a no-op
	/// that still returns a (detached, already-invalid) id.
	pub fn append(&mut self, parent: ElementId, tag: &'static str) -> ElementId {
		let id = ElementId(self.elements.len());
		match self.get_mut(parent) {
			Some(p) => {
				p.children.push(id);
				self.elements.push(Some(Element::new(tag, Some(parent))));
			}
			None => self.elements.push(None),
		}
		id
	}

	/// Remove an element and its whole subtree.
	pub fn remove(&mut self, id: ElementId) {
		let Some(parent) = self.get(id).map(|e| e.parent) else {
			return;
		};
		if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
			p.children.retain(|&c| c != id);
		}
		let mut stack = vec![id];
		while let Some(next) = stack.pop() {
			if let Some(el) = self.elements.get_mut(next.0).and_then(Option::take) {
				stack.extend(el.children);
			}
		}
	}

	/// Set an attribute. No-op on removed elements.
	pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl ToString) {
		if let Some(el) = self.get_mut(id) {
			el.attrs.insert(name.to_string(), value.to_string());
		}
	}

	/// Value of an attribute on `id`.
	pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
		self.get(id).and_then(|e| e.attr(name))
	}

	/// Replace text content.
	pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
		if let Some(el) = self.get_mut(id) {
			el.text = Some(text.into());
		}
	}

	/// Text content of `id`.
	pub fn text(&self, id: ElementId) -> Option<&str> {
		self.get(id).and_then(|e| e.text.as_deref())
	}

	/// Children of `id`; empty once removed.
	pub fn children(&self, id: ElementId) -> &[ElementId] {
		self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
	}

	/// Number of live elements with the given tag anywhere in the scene.
	pub fn count(&self, tag: &str) -> usize {
		self.elements
			.iter()
			.flatten()
			.filter(|e| e.tag == tag)
			.count()
	}

	/// Reconcile the `tag` elements bound in `namespace` under `parent` with
	/// `keys`. Entered elements are appended to `parent` in data order.
	///
	/// Duplicate keys bind to distinct elements in order of appearance.
	pub fn join<I, K>(
		&mut self,
		parent: ElementId,
		tag: &'static str,
		namespace: &'static str,
		keys: I,
	) -> Join
	where
		I: IntoIterator<Item = K>,
		K: Into<String>,
	{
		let mut existing: HashMap<String, Vec<ElementId>> = HashMap::new();
		for &child in self.children(parent).iter().rev() {
			if let Some(Binding { namespace: ns, key }) =
				self.get(child).and_then(|e| e.binding.as_ref())
			{
				if *ns == namespace {
					existing.entry(key.clone()).or_default().push(child);
				}
			}
		}

		let mut join = Join::default();
		for (index, key) in keys.into_iter().enumerate() {
			let key = key.into();
			match existing.get_mut(&key).and_then(Vec::pop) {
				Some(id) => join.update.push(Bound { id, index }),
				None => {
					let id = self.append(parent, tag);
					if let Some(el) = self.get_mut(id) {
						el.binding = Some(Binding { namespace, key });
					}
					join.enter.push(Bound { id, index });
				}
			}
		}

		for id in existing.into_values().flatten() {
			self.remove(id);
			join.exit += 1;
		}
		join
	}

	/// Serialize the scene to a standalone SVG document.
	pub fn to_svg(&self) -> String {
		let mut out = String::new();
		self.write_element(&mut out, self.root);
		out
	}

	fn write_element(&self, out: &mut String, id: ElementId) {
		let Some(el) = self.get(id) else {
			return;
		};
		let _ = write!(out, "<{}", el.tag);
		if id == self.root {
			let _ = write!(out, r#" xmlns="{SVG_NS}""#);
		}
		for (name, value) in &el.attrs {
			let _ = write!(out, r#" {}="{}""#, name, escape_xml(value));
		}
		if el.children.is_empty() && el.text.is_none() {
			out.push_str("/>");
			return;
		}
		out.push('>');
		if let Some(text) = &el.text {
			out.push_str(&escape_xml(text));
		}
		for &child in &el.children {
			self.write_element(out, child);
		}
		let _ = write!(out, "</{}>", el.tag);
	}
}

fn escape_xml(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}
