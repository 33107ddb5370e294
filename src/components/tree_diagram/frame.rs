//! Everything a renderer needs to paint one frame of the diagram.

use super::hierarchy::{NodeId, TreeModel, TreeNode};
use super::layout::{Point, TreeLayout};
use super::viewport::ViewTransform;

/// Visual state of a node, derived from its expanded flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
	/// Has visible children.
	Expanded,
	/// Has children that are hidden.
	Collapsed,
	/// Has no children at all.
	Leaf,
}

impl NodeState {
	/// Visual state of `node`.
	pub fn of(node: &TreeNode) -> Self {
		if node.is_leaf() {
			NodeState::Leaf
		} else if node.expanded {
			NodeState::Expanded
		} else {
			NodeState::Collapsed
		}
	}
}

/// A labeled point to draw, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderNode {
	/// Node drawn.
	pub id: NodeId,
	/// Center in world coordinates.
	pub position: Point,
	/// Text drawn next to the node.
	pub label: String,
	/// Selects the fill color.
	pub state: NodeState,
}

/// A parent to child link as a cubic curve, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEdge {
	/// Parent end.
	pub source: Point,
	/// Bézier control points, source side first.
	pub control: (Point, Point),
	/// Child end.
	pub target: Point,
}

/// Ordered edges and nodes plus the transform for the whole drawing group.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFrame {
	/// Drawn first, in pre-order of the child.
	pub edges: Vec<RenderEdge>,
	/// Drawn on top of the edges, in pre-order.
	pub nodes: Vec<RenderNode>,
	/// Applied to both edges and nodes.
	pub transform: ViewTransform,
}

impl RenderFrame {
	/// Snapshot the laid-out nodes of `model` under `transform`.
	pub fn build(model: &TreeModel, layout: &TreeLayout, transform: ViewTransform) -> Self {
		let edges = layout
			.edges()
			.iter()
			.map(|edge| RenderEdge {
				source: edge.source,
				control: edge.control_points(),
				target: edge.target,
			})
			.collect();

		let nodes = layout
			.nodes()
			.iter()
			.filter_map(|placed| {
				let node = model.get(placed.id)?;
				Some(RenderNode {
					id: placed.id,
					position: placed.position,
					label: node.name.clone(),
					state: NodeState::of(node),
				})
			})
			.collect();

		Self {
			edges,
			nodes,
			transform,
		}
	}
}
