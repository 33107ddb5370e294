//! Projection of the hierarchy onto the nodes currently on screen.

use std::collections::HashMap;

use super::hierarchy::{NodeId, TreeModel};

/// A node reachable from the root through expanded ancestors only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleNode {
	/// Node in the model.
	pub id: NodeId,
	/// Distance from the root.
	pub depth: usize,
	/// Index of the parent within [`VisibleTree::nodes`].
	pub parent: Option<usize>,
	/// Indices of the visible children, in model order.
	pub children: Vec<usize>,
}

/// The visible subtree in pre-order. Index 0 is always the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleTree {
	nodes: Vec<VisibleNode>,
	index: HashMap<NodeId, usize>,
}

impl VisibleTree {
	/// Project `model` onto its visible subtree.
	///
	/// A node is included iff every ancestor is expanded. The flags of hidden
	/// nodes are left untouched, so re-expanding an ancestor restores what
	/// was open below it.
	pub fn project(model: &TreeModel) -> Self {
		let mut nodes = Vec::with_capacity(model.len());
		let mut index = HashMap::with_capacity(model.len());
		let mut stack = vec![(model.root(), None::<usize>, 0usize)];

		while let Some((id, parent, depth)) = stack.pop() {
			let slot = nodes.len();
			nodes.push(VisibleNode {
				id,
				depth,
				parent,
				children: Vec::new(),
			});
			index.insert(id, slot);
			if let Some(parent) = parent {
				nodes[parent].children.push(slot);
			}

			if model.is_expanded(id) {
				for &child in model.children_of(id).iter().rev() {
					stack.push((child, Some(slot), depth + 1));
				}
			}
		}

		Self { nodes, index }
	}

	/// Visible nodes in pre-order.
	pub fn nodes(&self) -> &[VisibleNode] {
		&self.nodes
	}

	/// Number of visible nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false; the root is always visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether `id` is visible.
	pub fn contains(&self, id: NodeId) -> bool {
		self.index.contains_key(&id)
	}

	/// Position of `id` in [`VisibleTree::nodes`].
	pub fn index_of(&self, id: NodeId) -> Option<usize> {
		self.index.get(&id).copied()
	}

	/// Visible node ids in pre-order.
	pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes.iter().map(|node| node.id)
	}
}
