//! Hierarchy model: the inventory tree and its expand/collapse flags.
//!
//! Nodes are stored in an arena owned by [`TreeModel`] and addressed by
//! [`NodeId`]. Each node has exactly one parent (except the root), so the
//! structure is a strict tree by construction.

use super::types::{Inventory, InventoryEntry};

/// Category names under the root, in display order.
pub const CATEGORY_NAMES: [&str; 3] = ["Applications", "Instances", "Capabilities"];

/// Stable handle to a node in a [`TreeModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// One entity in the hierarchy.
#[derive(Clone, Debug)]
pub struct TreeNode {
	/// Display label; not unique.
	pub name: String,
	/// Whether children are included in the visible projection.
	pub expanded: bool,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

impl TreeNode {
	/// Parent id, `None` for the root.
	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// Child ids in display order.
	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	/// Whether the node has no children at all.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

/// Owner of every [`TreeNode`] in the diagram.
#[derive(Clone, Debug)]
pub struct TreeModel {
	nodes: Vec<TreeNode>,
}

impl TreeModel {
	/// Create a model holding only an expanded root.
	pub fn new(root_name: impl Into<String>) -> Self {
		Self {
			nodes: vec![TreeNode {
				name: root_name.into(),
				expanded: true,
				parent: None,
				children: Vec::new(),
			}],
		}
	}

	/// Build the three-category tree for an inventory.
	///
	/// The root starts expanded; categories start collapsed so only the
	/// first two levels are visible initially.
	pub fn from_inventory(inventory: &Inventory) -> Self {
		let mut model = Self::new(inventory.name.clone());
		let root = model.root();
		let lists: [&[InventoryEntry]; 3] = [
			&inventory.applications,
			&inventory.instances,
			&inventory.capabilities,
		];

		for (category_name, entries) in CATEGORY_NAMES.iter().zip(lists) {
			let category = model.add_child(root, *category_name, false);
			for entry in entries {
				model.add_child(category, entry.name.clone(), false);
			}
		}
		model
	}

	/// Append a child to `parent` and return its id.
	pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, expanded: bool) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(TreeNode {
			name: name.into(),
			expanded,
			parent: Some(parent),
			children: Vec::new(),
		});
		self.nodes[parent.0].children.push(id);
		id
	}

	/// The root node, created with the model.
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Node for `id`, if it exists.
	pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
		self.nodes.get(id.0)
	}

	/// Parent of `id`, `None` for the root or unknown ids.
	pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
		self.get(id).and_then(TreeNode::parent)
	}

	/// Children of `id`; empty for leaves and unknown ids.
	pub fn children_of(&self, id: NodeId) -> &[NodeId] {
		self.get(id).map(TreeNode::children).unwrap_or(&[])
	}

	/// Whether `id` exists and is expanded.
	pub fn is_expanded(&self, id: NodeId) -> bool {
		self.get(id).is_some_and(|node| node.expanded)
	}

	/// Set the expanded flag of `id`. Unknown ids are ignored.
	pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
		if let Some(node) = self.nodes.get_mut(id.0) {
			node.expanded = expanded;
		}
	}

	/// Flip `node`'s expanded flag.
	///
	/// When the node becomes expanded and `parent` is given, every other
	/// direct child of `parent` is collapsed. Descendants of those siblings
	/// keep their own flags. Unknown ids are ignored.
	pub fn toggle(&mut self, node: NodeId, parent: Option<NodeId>) {
		let Some(target) = self.nodes.get_mut(node.0) else {
			return;
		};
		target.expanded = !target.expanded;
		if !target.expanded {
			return;
		}

		let Some(parent) = parent else {
			return;
		};
		let siblings = self.children_of(parent).to_vec();
		for sibling in siblings.into_iter().filter(|&s| s != node) {
			self.set_expanded(sibling, false);
		}
	}

	/// First node named `name` in pre-order, if any.
	pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
		let mut stack = vec![self.root()];
		while let Some(id) = stack.pop() {
			if self.nodes[id.0].name == name {
				return Some(id);
			}
			stack.extend(self.nodes[id.0].children.iter().rev());
		}
		None
	}

	/// Number of nodes, hidden ones included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false; a model has at least its root.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
