//! Zoom-dependent sizing for diagram visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: layout coordinates. Values in world-space scale with
//!   zoom (appear larger when zoomed in).
//! - **Screen-space**: canvas pixels. Values in screen-space stay constant
//!   regardless of zoom level.
//!
//! Each sized element picks a [`ScaleBehavior`] describing how it reacts to
//! the current scale `k`.

/// How a size given in world units reacts to the zoom level `k`.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Grows and shrinks with the drawing.
	World,
	/// Fixed on screen; `base` is read as pixels.
	Screen,
	/// Grows with the drawing but stays within `min..=max` screen pixels.
	Clamped {
		/// Smallest on-screen size in pixels.
		min: f64,
		/// Largest on-screen size in pixels.
		max: f64,
	},
}

impl ScaleBehavior {
	/// Size in world units to draw `base` with at zoom `k`.
	pub fn world_size(&self, base: f64, k: f64) -> f64 {
		match *self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped { min, max } => base.clamp(min / k, max / k),
		}
	}
}

/// Node circle and hit area.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Circle radius in world units.
	pub radius: f64,
	/// How `radius` reacts to zoom.
	pub radius_behavior: ScaleBehavior,
	/// Click target radius in world units.
	pub hit_radius: f64,
	/// How `hit_radius` reacts to zoom.
	pub hit_behavior: ScaleBehavior,
	/// Outline width in screen pixels.
	pub stroke_width: f64,
}

/// Node labels.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Font size in world units.
	pub font_size: f64,
	/// How `font_size` reacts to zoom.
	pub font_behavior: ScaleBehavior,
	/// CSS font family.
	pub font_family: &'static str,
	/// Offset from the node center, world units.
	pub offset: (f64, f64),
}

/// Links between nodes.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
}

/// Complete scale configuration for all diagram elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node circles and hit areas.
	pub node: NodeScaleConfig,
	/// Node labels.
	pub label: LabelScaleConfig,
	/// Links.
	pub edge: EdgeScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 8.0,
				radius_behavior: ScaleBehavior::World,
				hit_radius: 14.0,
				hit_behavior: ScaleBehavior::Clamped {
					min: 10.0,
					max: f64::INFINITY,
				},
				stroke_width: 1.0,
			},
			label: LabelScaleConfig {
				font_size: 12.0,
				font_behavior: ScaleBehavior::Clamped {
					min: 8.0,
					max: 28.0,
				},
				font_family: "sans-serif",
				offset: (12.0, 5.0),
			},
			edge: EdgeScaleConfig { line_width: 1.5 },
		}
	}
}

/// Scale values resolved for one zoom level, all in world-space.
///
/// Create this once per frame and pass it to drawing and hit-testing code.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Circle radius.
	pub node_radius: f64,
	/// Click target radius.
	pub hit_radius: f64,
	/// Circle outline width.
	pub node_stroke_width: f64,
	/// CSS font shorthand, e.g. `"12px sans-serif"`.
	pub label_font: String,
	/// Label offset from the node center.
	pub label_offset: (f64, f64),
	/// Link width.
	pub edge_line_width: f64,
}

impl ScaledValues {
	/// Resolve `config` at zoom level `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let font_size = config.label.font_behavior.world_size(config.label.font_size, k);
		Self {
			node_radius: config.node.radius_behavior.world_size(config.node.radius, k),
			hit_radius: config.node.hit_behavior.world_size(config.node.hit_radius, k),
			node_stroke_width: config.node.stroke_width / k,
			label_font: format!("{}px {}", font_size, config.label.font_family),
			label_offset: config.label.offset,
			edge_line_width: config.edge.line_width / k,
		}
	}
}
