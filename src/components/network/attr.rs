//! Constant-or-accessor attribute values.
//!
//! Every configurable visual attribute is either a literal shared by all data
//! items or a function of the datum and its index, resolved when the element
//! is bound.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};

/// Per-datum accessor `(datum, index) -> value`.
pub type Accessor<D, T> = Rc<dyn Fn(&D, usize) -> T>;

/// An attribute value: a literal, or computed per datum.
pub enum Attr<D: ?Sized, T> {
	/// The same value for every datum.
	Literal(T),
	/// Computed from each datum and its index.
	Accessor(Accessor<D, T>),
}

impl<D: ?Sized, T: Clone> Attr<D, T> {
	/// Wrap a closure as an accessor.
	pub fn accessor(f: impl Fn(&D, usize) -> T + 'static) -> Self {
		Self::Accessor(Rc::new(f))
	}

	/// Resolve the value for one datum.
	pub fn resolve(&self, datum: &D, index: usize) -> T {
		match self {
			Attr::Literal(value) => value.clone(),
			Attr::Accessor(f) => f(datum, index),
		}
	}

	/// The literal value, if this is not an accessor.
	pub fn literal(&self) -> Option<&T> {
		match self {
			Attr::Literal(value) => Some(value),
			Attr::Accessor(_) => None,
		}
	}
}

impl<D> Attr<D, f64> {
	/// The literal if there is one, otherwise the largest resolved value over
	/// `data`. `None` only when an accessor meets an empty slice.
	pub fn max_over(&self, data: &[D]) -> Option<f64> {
		match self {
			Attr::Literal(value) => Some(*value),
			Attr::Accessor(f) => data
				.iter()
				.enumerate()
				.map(|(i, d)| f(d, i))
				.fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v)))),
		}
	}
}

impl<D: ?Sized, T: Clone> Clone for Attr<D, T> {
	fn clone(&self) -> Self {
		match self {
			Attr::Literal(value) => Attr::Literal(value.clone()),
			Attr::Accessor(f) => Attr::Accessor(Rc::clone(f)),
		}
	}
}

impl<D: ?Sized, T: fmt::Debug> fmt::Debug for Attr<D, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Attr::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Attr::Accessor(_) => f.write_str("Accessor(..)"),
		}
	}
}

impl<D: ?Sized, T> From<T> for Attr<D, T> {
	fn from(value: T) -> Self {
		Attr::Literal(value)
	}
}

impl<D: ?Sized> From<&str> for Attr<D, String> {
	fn from(value: &str) -> Self {
		Attr::Literal(value.to_string())
	}
}

/// JSON configuration can only carry literals.
impl<'de, D: ?Sized, T: Deserialize<'de>> Deserialize<'de> for Attr<D, T> {
	fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
		T::deserialize(deserializer).map(Attr::Literal)
	}
}
