//! Tidy-tree layout of the visible subtree.
//!
//! Positions follow the usual node-link tree conventions: the depth axis
//! (`x`) advances by a fixed `level_spacing` per level, and the sibling axis
//! (`y`) is measured in slots of `node_spacing`. Every subtree occupies its
//! own band on the sibling axis; sibling bands are packed one slot apart and
//! each parent is centered between its first and last child.
//!
//! The layout is recomputed from scratch on every call and only uses exact
//! halving of small integers, so a given tree shape always produces the same
//! bits.

use std::collections::HashMap;

use super::hierarchy::NodeId;
use super::visibility::VisibleTree;

/// Slot gap between the bands of two adjacent sibling subtrees.
const SIBLING_SEPARATION: f64 = 1.0;

/// A point in world (diagram) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Depth axis.
	pub x: f64,
	/// Sibling axis.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Fixed per-node box used by the layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Distance between sibling slots along the `y` axis.
	pub node_spacing: f64,
	/// Distance between depth levels along the `x` axis.
	pub level_spacing: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_spacing: 50.0,
			level_spacing: 200.0,
		}
	}
}

/// A visible node with its assigned position.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedNode {
	/// Node placed.
	pub id: NodeId,
	/// Distance from the root.
	pub depth: usize,
	/// World-space position.
	pub position: Point,
}

/// Parent to child link. Endpoints coincide with the node positions.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEdge {
	/// Parent node.
	pub parent: NodeId,
	/// Child node.
	pub child: NodeId,
	/// Parent position.
	pub source: Point,
	/// Child position.
	pub target: Point,
}

impl LayoutEdge {
	/// Control points of a horizontal cubic link from `source` to `target`.
	pub fn control_points(&self) -> (Point, Point) {
		let mid_x = (self.source.x + self.target.x) / 2.0;
		(
			Point::new(mid_x, self.source.y),
			Point::new(mid_x, self.target.y),
		)
	}
}

/// Positions and edges for one visible tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
	nodes: Vec<PlacedNode>,
	edges: Vec<LayoutEdge>,
	index: HashMap<NodeId, usize>,
}

impl TreeLayout {
	/// Lay out `tree` from scratch with the spacing in `config`.
	pub fn compute(tree: &VisibleTree, config: &LayoutConfig) -> Self {
		let visible = tree.nodes();
		let mut extents = vec![(0.0_f64, 0.0_f64); visible.len()];
		let mut offsets = vec![0.0_f64; visible.len()];

		// Pre-order puts every child after its parent, so walking backwards
		// sees all children before the node itself.
		for slot in (0..visible.len()).rev() {
			let children = &visible[slot].children;
			let mut placed = Vec::with_capacity(children.len());
			let mut band_end: Option<f64> = None;

			for &child in children {
				let (lo, hi) = extents[child];
				let offset = band_end.map_or(0.0, |end| end - lo + SIBLING_SEPARATION);
				band_end = Some(offset + hi);
				placed.push(offset);
			}

			let (Some(&first), Some(&last)) = (placed.first(), placed.last()) else {
				continue;
			};
			let center = (first + last) / 2.0;
			for (&child, offset) in children.iter().zip(&placed) {
				offsets[child] = offset - center;
			}
			let lo = first + extents[children[0]].0 - center;
			let hi = last + extents[children[children.len() - 1]].1 - center;
			extents[slot] = (lo.min(0.0), hi.max(0.0));
		}

		let mut breadth = vec![0.0_f64; visible.len()];
		let mut nodes = Vec::with_capacity(visible.len());
		let mut index = HashMap::with_capacity(visible.len());
		for (slot, node) in visible.iter().enumerate() {
			if let Some(parent) = node.parent {
				breadth[slot] = breadth[parent] + offsets[slot];
			}
			index.insert(node.id, slot);
			nodes.push(PlacedNode {
				id: node.id,
				depth: node.depth,
				position: Point::new(
					node.depth as f64 * config.level_spacing,
					breadth[slot] * config.node_spacing,
				),
			});
		}

		let edges = visible
			.iter()
			.enumerate()
			.filter_map(|(slot, node)| {
				let parent = node.parent?;
				Some(LayoutEdge {
					parent: nodes[parent].id,
					child: node.id,
					source: nodes[parent].position,
					target: nodes[slot].position,
				})
			})
			.collect();

		Self {
			nodes,
			edges,
			index,
		}
	}

	/// Placed nodes in pre-order.
	pub fn nodes(&self) -> &[PlacedNode] {
		&self.nodes
	}

	/// One edge per visible parent to child pair, in pre-order of the child.
	pub fn edges(&self) -> &[LayoutEdge] {
		&self.edges
	}

	/// Position of a visible node, or `None` if it is not laid out.
	pub fn position_of(&self, id: NodeId) -> Option<Point> {
		self.index.get(&id).map(|&slot| self.nodes[slot].position)
	}
}

#[cfg(test)]
mod tests {
	use super::super::hierarchy::TreeModel;
	use super::*;

	/// r -> a(a1, a2, a3), b(b1, b2), c, all expanded.
	fn bushy() -> TreeModel {
		let mut model = TreeModel::new("r");
		let root = model.root();
		let a = model.add_child(root, "a", true);
		let b = model.add_child(root, "b", true);
		model.add_child(root, "c", true);
		for name in ["a1", "a2", "a3"] {
			model.add_child(a, name, true);
		}
		let b1 = model.add_child(b, "b1", true);
		model.add_child(b, "b2", true);
		model.add_child(b1, "b11", true);
		model
	}

	fn layout(model: &TreeModel) -> TreeLayout {
		TreeLayout::compute(&VisibleTree::project(model), &LayoutConfig::default())
	}

	fn subtree_extent(model: &TreeModel, layout: &TreeLayout, id: NodeId) -> (f64, f64) {
		let y = layout.position_of(id).unwrap().y;
		model
			.children_of(id)
			.iter()
			.filter(|&&c| layout.position_of(c).is_some())
			.map(|&c| subtree_extent(model, layout, c))
			.fold((y, y), |(lo, hi), (clo, chi)| (lo.min(clo), hi.max(chi)))
	}

	#[test]
	fn root_sits_at_origin() {
		let model = bushy();
		assert_eq!(layout(&model).position_of(model.root()), Some(Point::new(0.0, 0.0)));
	}

	#[test]
	fn categories_are_spaced_one_slot_apart() {
		let mut model = TreeModel::new("Root");
		let root = model.root();
		let apps = model.add_child(root, "Applications", true);
		let inst = model.add_child(root, "Instances", false);
		let caps = model.add_child(root, "Capabilities", false);
		let app1 = model.add_child(apps, "App1", false);

		let layout = layout(&model);

		assert_eq!(layout.position_of(apps), Some(Point::new(200.0, -50.0)));
		assert_eq!(layout.position_of(inst), Some(Point::new(200.0, 0.0)));
		assert_eq!(layout.position_of(caps), Some(Point::new(200.0, 50.0)));
		assert_eq!(layout.position_of(app1), Some(Point::new(400.0, -50.0)));
	}

	#[test]
	fn depth_axis_grows_with_depth() {
		let model = bushy();
		let layout = layout(&model);
		for node in layout.nodes() {
			assert_eq!(node.position.x, node.depth as f64 * 200.0);
		}
		for edge in layout.edges() {
			assert!(edge.target.x > edge.source.x);
		}
	}

	#[test]
	fn sibling_subtrees_do_not_overlap() {
		let model = bushy();
		let layout = layout(&model);

		for placed in layout.nodes() {
			let children: Vec<_> = model
				.children_of(placed.id)
				.iter()
				.copied()
				.filter(|&c| layout.position_of(c).is_some())
				.collect();
			for pair in children.windows(2) {
				let (_, left_hi) = subtree_extent(&model, &layout, pair[0]);
				let (right_lo, _) = subtree_extent(&model, &layout, pair[1]);
				assert!(
					left_hi < right_lo,
					"{:?} and {:?} overlap: {left_hi} >= {right_lo}",
					pair[0],
					pair[1]
				);
			}
		}
	}

	#[test]
	fn parents_are_centered_over_children() {
		let model = bushy();
		let layout = layout(&model);
		let a = model.find_by_name("a").unwrap();
		let ys: Vec<f64> = model
			.children_of(a)
			.iter()
			.map(|&c| layout.position_of(c).unwrap().y)
			.collect();

		assert_eq!(ys[1] - ys[0], 50.0);
		assert_eq!(layout.position_of(a).unwrap().y, (ys[0] + ys[2]) / 2.0);
	}

	#[test]
	fn layout_is_reproducible() {
		let model = bushy();
		let first = layout(&model);
		let second = layout(&model);

		assert_eq!(first, second);
		for (a, b) in first.nodes().iter().zip(second.nodes()) {
			assert_eq!(a.position.x.to_bits(), b.position.x.to_bits());
			assert_eq!(a.position.y.to_bits(), b.position.y.to_bits());
		}
	}

	#[test]
	fn edge_endpoints_match_node_positions() {
		let model = bushy();
		let layout = layout(&model);

		assert_eq!(layout.edges().len(), layout.nodes().len() - 1);
		for edge in layout.edges() {
			assert_eq!(Some(edge.source), layout.position_of(edge.parent));
			assert_eq!(Some(edge.target), layout.position_of(edge.child));
			let (c1, c2) = edge.control_points();
			assert_eq!(c1.y, edge.source.y);
			assert_eq!(c2.y, edge.target.y);
		}
	}

	#[test]
	fn hidden_nodes_have_no_position() {
		let mut model = bushy();
		let b = model.find_by_name("b").unwrap();
		let b1 = model.find_by_name("b1").unwrap();
		model.set_expanded(b, false);

		let layout = layout(&model);

		assert!(layout.position_of(b).is_some());
		assert_eq!(layout.position_of(b1), None);
	}
}
