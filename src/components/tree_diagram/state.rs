//! Diagram state and the interaction dispatcher.
//!
//! [`TreeDiagramState`] owns the hierarchy, its current projection and
//! layout, and the viewport. Every method takes `&mut self` and leaves the
//! four pieces consistent before returning, so a render that runs between two
//! events never sees a toggle without its re-layout.

use log::debug;

use super::frame::RenderFrame;
use super::gesture::{GestureAction, GestureEvent};
use super::hierarchy::{NodeId, TreeModel};
use super::layout::{LayoutConfig, Point, TreeLayout};
use super::scale::{ScaleConfig, ScaledValues};
use super::types::Inventory;
use super::viewport::{ViewTransform, Viewport, ViewportConfig};
use super::visibility::VisibleTree;

/// Top-level configuration for a diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagramConfig {
	/// Node spacing.
	pub layout: LayoutConfig,
	/// Surface size, scale limits and animation timings.
	pub viewport: ViewportConfig,
	/// Scale multiplier for the zoom-in control.
	pub zoom_in_factor: f64,
	/// Scale multiplier for the zoom-out control.
	pub zoom_out_factor: f64,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			layout: LayoutConfig::default(),
			viewport: ViewportConfig::default(),
			zoom_in_factor: 1.2,
			zoom_out_factor: 0.8,
		}
	}
}

/// Everything an interactive tree diagram needs between two events.
pub struct TreeDiagramState {
	config: DiagramConfig,
	model: TreeModel,
	visible: VisibleTree,
	layout: TreeLayout,
	viewport: Viewport,
	home: NodeId,
}

impl TreeDiagramState {
	/// Build the diagram for `inventory`, showing the root and its categories.
	pub fn new(inventory: &Inventory, config: DiagramConfig) -> Self {
		Self::from_model(TreeModel::from_inventory(inventory), config)
	}

	/// Lay out `model` and center the viewport on its root.
	pub fn from_model(model: TreeModel, config: DiagramConfig) -> Self {
		let visible = VisibleTree::project(&model);
		let layout = TreeLayout::compute(&visible, &config.layout);
		let home = model.root();
		let home_position = layout.position_of(home).unwrap_or_default();
		let viewport = Viewport::new(config.viewport.clone(), home_position);

		Self {
			config,
			model,
			visible,
			layout,
			viewport,
			home,
		}
	}

	/// Expand/collapse state of every node.
	pub fn model(&self) -> &TreeModel {
		&self.model
	}

	/// Nodes currently shown.
	pub fn visible(&self) -> &VisibleTree {
		&self.visible
	}

	/// Positions of the shown nodes.
	pub fn layout(&self) -> &TreeLayout {
		&self.layout
	}

	/// Camera state.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Current pan/zoom transform.
	pub fn transform(&self) -> ViewTransform {
		self.viewport.transform()
	}

	/// Handle a click on a rendered node.
	///
	/// Toggles the node (collapsing its siblings when it opens), re-projects
	/// and re-lays out the tree, then animates the viewport to keep the node
	/// centered, or its parent if the node is no longer visible. Clicks on
	/// the root or on hidden nodes do nothing. Returns whether the structure
	/// changed.
	pub fn click(&mut self, node: NodeId) -> bool {
		if !self.visible.contains(node) {
			return false;
		}
		let Some(parent) = self.model.parent_of(node) else {
			debug!("ignoring click on root");
			return false;
		};

		self.model.toggle(node, Some(parent));
		debug!(
			"toggled {:?} ({}) -> expanded={}",
			node,
			self.model.get(node).map_or("", |n| n.name.as_str()),
			self.model.is_expanded(node)
		);
		self.relayout();

		let target = if self.visible.contains(node) { node } else { parent };
		self.focus_node(target, self.config.viewport.focus_duration_ms);
		true
	}

	/// Animate `node` to the viewport center. No-op if it is not visible.
	pub fn focus_node(&mut self, node: NodeId, duration_ms: f64) -> bool {
		let Some(position) = self.layout.position_of(node) else {
			debug!("focus target {node:?} is not visible");
			return false;
		};
		self.viewport.focus_on(position, duration_ms);
		true
	}

	/// Focus the first node named `name` in pre-order, if visible.
	pub fn focus_named(&mut self, name: &str, duration_ms: f64) -> bool {
		match self.model.find_by_name(name) {
			Some(node) => self.focus_node(node, duration_ms),
			None => false,
		}
	}

	/// Zoom in one step around the surface center.
	pub fn zoom_in(&mut self) {
		self.viewport.zoom_by(self.config.zoom_in_factor);
	}

	/// Zoom out one step around the surface center.
	pub fn zoom_out(&mut self) {
		self.viewport.zoom_by(self.config.zoom_out_factor);
	}

	/// Animate back to the root at scale 1.
	pub fn reset_view(&mut self) {
		self.viewport.reset();
	}

	/// Apply a user gesture to the viewport.
	pub fn apply_gesture(&mut self, event: &GestureEvent) -> GestureAction {
		self.viewport.apply_gesture(event)
	}

	/// Advance animations by `dt_ms`. Returns whether the transform moved.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		self.viewport.tick(dt_ms)
	}

	/// Track a new surface size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.config.viewport.width = width;
		self.config.viewport.height = height;
		self.viewport.resize(width, height);
	}

	/// Snapshot for the renderer.
	pub fn frame(&self) -> RenderFrame {
		RenderFrame::build(&self.model, &self.layout, self.viewport.transform())
	}

	/// Topmost visible node under a surface point, if any.
	pub fn node_at_position(&self, screen: Point, config: &ScaleConfig) -> Option<NodeId> {
		let world = self.viewport.transform().invert(screen);
		let scale = ScaledValues::new(config, self.viewport.transform().k);
		self.layout
			.nodes()
			.iter()
			.rev()
			.find(|placed| {
				let (dx, dy) = (placed.position.x - world.x, placed.position.y - world.y);
				(dx * dx + dy * dy).sqrt() <= scale.hit_radius
			})
			.map(|placed| placed.id)
	}

	fn relayout(&mut self) {
		self.visible = VisibleTree::project(&self.model);
		self.layout = TreeLayout::compute(&self.visible, &self.config.layout);
		if let Some(home) = self.layout.position_of(self.home) {
			self.viewport.set_home(home);
		}
	}
}
