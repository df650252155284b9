use std::fmt;

use glam::Mat4;

/// Handle to a node inside a [`SceneGraph`](crate::graph::SceneGraph).
///
/// Handles are returned when nodes are inserted and stay valid until the node
/// (or one of its ancestors) is removed.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct SceneNodeId(pub(crate) indextree::NodeId);

impl fmt::Display for SceneNodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// What a node is, beyond its name and transform.
#[derive(Debug, Clone)]
pub enum NodeKind<P> {
	/// Owns an ordered set of children, draws nothing itself.
	Group,
	/// Draws its payload, has no children.
	Leaf(P),
}

pub struct SceneNode<P> {
	pub name: String,
	local_transform: Mat4,
	cumulative_transform: Option<Mat4>,
	kind: NodeKind<P>,
}

impl<P> SceneNode<P> {
	pub fn group(name: impl Into<String>, local_transform: Mat4) -> Self {
		Self {
			name: name.into(),
			local_transform,
			cumulative_transform: None,
			kind: NodeKind::Group,
		}
	}

	pub fn leaf(name: impl Into<String>, local_transform: Mat4, payload: P) -> Self {
		Self {
			name: name.into(),
			local_transform,
			cumulative_transform: None,
			kind: NodeKind::Leaf(payload),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn type_name(&self) -> &'static str {
		match self.kind {
			NodeKind::Group => "Group",
			NodeKind::Leaf(_) => "Leaf",
		}
	}

	/// Fixed at construction, so a node with children can never turn into a leaf.
	pub fn kind(&self) -> &NodeKind<P> {
		&self.kind
	}

	pub fn is_group(&self) -> bool {
		matches!(self.kind, NodeKind::Group)
	}

	/// Transform relative to the parent.
	pub fn local_transform(&self) -> Mat4 {
		self.local_transform
	}

	pub fn set_local_transform(&mut self, transform: Mat4) {
		self.local_transform = transform;
	}

	/// Transform relative to the scene root, as of the last update pass that reached this node.
	///
	/// `None` until the node has been through one.
	pub fn cumulative_transform(&self) -> Option<Mat4> {
		self.cumulative_transform
	}

	/// Replaces the cumulative transform with `parent_cumulative` composed with this node's local transform,
	/// and returns it.
	pub(crate) fn compute_cumulative_transform(&mut self, parent_cumulative: Mat4) -> Mat4 {
		let cumulative = crate::math::transform::compose(parent_cumulative, self.local_transform);
		self.cumulative_transform = Some(cumulative);
		cumulative
	}

	pub fn payload(&self) -> Option<&P> {
		match self.kind {
			NodeKind::Leaf(ref payload) => Some(payload),
			NodeKind::Group => None,
		}
	}

	pub fn payload_mut(&mut self) -> Option<&mut P> {
		match self.kind {
			NodeKind::Leaf(ref mut payload) => Some(payload),
			NodeKind::Group => None,
		}
	}
}

impl<P> fmt::Debug for SceneNode<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SceneNode")
			.field("name", &self.name)
			.field("kind", &self.type_name())
			.field("local_transform", &self.local_transform)
			.field("cumulative_transform", &self.cumulative_transform)
			.finish()
	}
}
