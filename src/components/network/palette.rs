//! Node colors.
//!
//! Provides the categorical palette used when a node carries no explicit color.

/// RGB color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Color {
	/// Color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// `#rrggbb` notation.
	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// A categorical color palette for nodes.
#[derive(Clone, Debug)]
pub struct NodePalette {
	/// Never empty.
	colors: Vec<Color>,
}

impl NodePalette {
	/// The ten-color categorical scheme common to chart libraries.
	pub fn category10() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x1f, 0x77, 0xb4), // Blue
				Color::rgb(0xff, 0x7f, 0x0e), // Orange
				Color::rgb(0x2c, 0xa0, 0x2c), // Green
				Color::rgb(0xd6, 0x27, 0x28), // Red
				Color::rgb(0x94, 0x67, 0xbd), // Purple
				Color::rgb(0x8c, 0x56, 0x4b), // Brown
				Color::rgb(0xe3, 0x77, 0xc2), // Pink
				Color::rgb(0x7f, 0x7f, 0x7f), // Gray
				Color::rgb(0xbc, 0xbd, 0x22), // Olive
				Color::rgb(0x17, 0xbe, 0xcf), // Cyan
			],
		}
	}

	/// Color at `index`, wrapping around the palette.
	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	/// Stable color for a group name (FNV-1a over the bytes).
	pub fn for_group(&self, group: &str) -> Color {
		let hash = group.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
			(h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
		});
		self.get((hash % self.colors.len() as u64) as usize)
	}
}

impl Default for NodePalette {
	fn default() -> Self {
		Self::category10()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_css_hex() {
		assert_eq!(NodePalette::category10().get(8).to_css(), "#bcbd22");
		assert_eq!(Color::rgb(0, 10, 255).to_css(), "#000aff");
	}

	#[test]
	fn test_palette_wraps_and_groups_are_stable() {
		let palette = NodePalette::default();
		assert_eq!(palette.get(0), palette.get(10));
		assert_eq!(palette.for_group("genes"), palette.for_group("genes"));
	}

	#[test]
	fn test_any_index_has_a_color() {
		let palette = NodePalette::category10();
		assert_eq!(palette.get(usize::MAX), palette.get(usize::MAX % 10));
		assert_eq!(palette.for_group(""), palette.for_group(""));
	}
}
