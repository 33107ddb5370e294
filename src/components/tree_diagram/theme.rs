//! Visual theming for the tree diagram.

use super::frame::NodeState;

/// Straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque white.
	pub const WHITE: Self = Self::hex(0xffffff);
	/// Opaque black.
	pub const BLACK: Self = Self::hex(0x000000);

	/// Opaque color from a `0xRRGGBB` literal.
	pub const fn hex(rgb: u32) -> Self {
		Self {
			r: (rgb >> 16) as u8,
			g: (rgb >> 8) as u8,
			b: rgb as u8,
			a: 1.0,
		}
	}

	/// Same color with opacity `a`.
	pub const fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Channel-wise blend towards `other`; `t = 0` keeps `self`.
	pub fn mix(self, other: Self, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let channel = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
		Self {
			r: channel(self.r, other.r),
			g: channel(self.g, other.g),
			b: channel(self.b, other.b),
			a: self.a,
		}
	}

	/// Blend towards white by `t`.
	pub fn lighten(self, t: f64) -> Self {
		self.mix(Self::WHITE, t)
	}

	/// CSS color string; hex when opaque.
	pub fn to_css(self) -> String {
		if self.a >= 1.0 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node style, with one fill per [`NodeState`].
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill of nodes with visible children.
	pub expanded_fill: Color,
	/// Fill of nodes with hidden children.
	pub collapsed_fill: Color,
	/// Fill of childless nodes.
	pub leaf_fill: Color,
	/// Circle outline.
	pub stroke: Color,
	/// Label text.
	pub label: Color,
}

impl NodeStyle {
	/// Fill color for a node in `state`.
	pub fn fill(&self, state: NodeState) -> Color {
		match state {
			NodeState::Expanded => self.expanded_fill,
			NodeState::Collapsed => self.collapsed_fill,
			NodeState::Leaf => self.leaf_fill,
		}
	}
}

/// Colors for one diagram look.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name.
	pub name: &'static str,
	/// Surface fill behind the drawing.
	pub background: Color,
	/// Link stroke.
	pub edge: Color,
	/// Node colors.
	pub node: NodeStyle,
}

impl Theme {
	/// Light theme with teal nodes and grey links (default)
	pub fn default_theme() -> Self {
		let teal = Color::hex(0x69b3a2);
		Self {
			name: "default",
			background: Color::WHITE,
			edge: Color::hex(0xcccccc),
			node: NodeStyle {
				expanded_fill: Color::WHITE,
				collapsed_fill: teal,
				leaf_fill: teal.lighten(0.45),
				stroke: Color::BLACK,
				label: Color::hex(0x212529),
			},
		}
	}

	/// Dark theme for dimmed dashboards
	pub fn midnight() -> Self {
		let steel = Color::hex(0x5e81ac);
		Self {
			name: "midnight",
			background: Color::hex(0x12141c),
			edge: Color::hex(0x647896).with_alpha(0.6),
			node: NodeStyle {
				expanded_fill: Color::hex(0x12141c),
				collapsed_fill: steel,
				leaf_fill: steel.lighten(0.35),
				stroke: Color::WHITE.with_alpha(0.8),
				label: Color::WHITE.with_alpha(0.85),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
