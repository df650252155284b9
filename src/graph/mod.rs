mod display;
mod transforms;

use glam::Mat4;
use indextree::Arena;
use tracing::debug;

use crate::node::{SceneNode, SceneNodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
	#[error("Node {0} does not exist in this scene graph")]
	NodeNotFound(SceneNodeId),
	#[error("Node {id} ({name:?}) is not a group and cannot own children")]
	NotAGroup { id: SceneNodeId, name: String },
	#[error("The root of a scene graph cannot be removed")]
	RootRemoval,
	#[error("Root node {0:?} must be a group")]
	RootNotGroup(String),
	#[error("Cumulative transform of node {0} has not been computed yet")]
	TransformNotComputed(SceneNodeId),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Ordered tree of named nodes with parent-relative transforms.
///
/// The root is always a group. Children are kept in insertion order, which is
/// also the order they are updated and rendered in.
pub struct SceneGraph<P> {
	root_id: indextree::NodeId,
	arena: Arena<SceneNode<P>>,
}

impl<P> SceneGraph<P> {
	/// Creates a graph holding a single root group with an identity transform.
	pub fn new(root_name: impl Into<String>) -> Self {
		Self::from_root_group(SceneNode::group(root_name, Mat4::IDENTITY))
	}

	/// Uses an existing node as the root. Fails with [`SceneError::RootNotGroup`] for a leaf.
	pub fn new_with_root(root: SceneNode<P>) -> SceneResult<Self> {
		if !root.is_group() {
			return Err(SceneError::RootNotGroup(root.name));
		}
		Ok(Self::from_root_group(root))
	}

	fn from_root_group(root: SceneNode<P>) -> Self {
		let mut arena = Arena::new();
		let root_id = arena.new_node(root);
		Self { root_id, arena }
	}

	pub fn root(&self) -> SceneNodeId {
		SceneNodeId(self.root_id)
	}

	/// Whether `id` still refers to the node it was issued for.
	///
	/// A freed arena slot gets reused by later insertions, so checking the slot alone is not
	/// enough: the handle's stamp has to match the slot's as well.
	fn is_live(&self, id: SceneNodeId) -> bool {
		match self.arena.get(id.0) {
			Some(node) => !node.is_removed() && !id.0.is_removed(&self.arena),
			None => false,
		}
	}

	fn get_internal_node(&self, id: SceneNodeId) -> Option<&indextree::Node<SceneNode<P>>> {
		if !self.is_live(id) {
			return None;
		}
		self.arena.get(id.0)
	}

	fn get_internal_node_mut(&mut self, id: SceneNodeId) -> Option<&mut indextree::Node<SceneNode<P>>> {
		if !self.is_live(id) {
			return None;
		}
		self.arena.get_mut(id.0)
	}

	pub fn contains(&self, id: SceneNodeId) -> bool {
		self.is_live(id)
	}

	pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode<P>> {
		Some(self.get_internal_node(id)?.get())
	}

	pub fn get_mut(&mut self, id: SceneNodeId) -> Option<&mut SceneNode<P>> {
		Some(self.get_internal_node_mut(id)?.get_mut())
	}

	pub(crate) fn node(&self, id: SceneNodeId) -> SceneResult<&SceneNode<P>> {
		self.get(id).ok_or(SceneError::NodeNotFound(id))
	}

	fn node_mut(&mut self, id: SceneNodeId) -> SceneResult<&mut SceneNode<P>> {
		self.get_mut(id).ok_or(SceneError::NodeNotFound(id))
	}

	/// Appends `node` as the last child of `parent`.
	pub fn add(&mut self, parent: SceneNodeId, node: SceneNode<P>) -> SceneResult<SceneNodeId> {
		let parent_node = self.node(parent)?;
		if !parent_node.is_group() {
			return Err(SceneError::NotAGroup {
				id: parent,
				name: parent_node.name.clone(),
			});
		}

		debug!("Adding {} {:?} under {:?}", node.type_name(), node.name, parent_node.name);
		let node_id = self.arena.new_node(node);
		parent.0.append(node_id, &mut self.arena);
		Ok(SceneNodeId(node_id))
	}

	pub fn add_group(
		&mut self,
		parent: SceneNodeId,
		name: impl Into<String>,
		local_transform: Mat4,
	) -> SceneResult<SceneNodeId> {
		self.add(parent, SceneNode::group(name, local_transform))
	}

	pub fn add_leaf(
		&mut self,
		parent: SceneNodeId,
		name: impl Into<String>,
		local_transform: Mat4,
		payload: P,
	) -> SceneResult<SceneNodeId> {
		self.add(parent, SceneNode::leaf(name, local_transform, payload))
	}

	/// Detaches `id` and everything below it, dropping their payloads.
	pub fn remove(&mut self, id: SceneNodeId) -> SceneResult<()> {
		if id.0 == self.root_id {
			return Err(SceneError::RootRemoval);
		}
		let name = &self.node(id)?.name;
		debug!("Removing subtree {:?}", name);
		id.0.remove_subtree(&mut self.arena);
		Ok(())
	}

	pub fn parent(&self, id: SceneNodeId) -> Option<SceneNodeId> {
		self.get_internal_node(id)?.parent().map(SceneNodeId)
	}

	/// Direct children of `id`, in insertion order.
	pub fn children(&self, id: SceneNodeId) -> SceneResult<impl Iterator<Item = SceneNodeId> + '_> {
		self.node(id)?;
		Ok(id.0.children(&self.arena).map(SceneNodeId))
	}

	/// Every node, depth first, parents before children, siblings in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (SceneNodeId, &SceneNode<P>)> {
		self.pre_order_from(self.root_id)
	}

	pub(crate) fn pre_order_from(&self, id: indextree::NodeId) -> impl Iterator<Item = (SceneNodeId, &SceneNode<P>)> {
		id.descendants(&self.arena)
			.map(|id| (SceneNodeId(id), self.arena[id].get()))
	}

	/// Number of nodes reachable from the root, root included.
	pub fn len(&self) -> usize {
		self.root_id.descendants(&self.arena).count()
	}

	/// A graph always has its root, so this is never true. Here for symmetry with `len`.
	pub fn is_empty(&self) -> bool {
		false
	}

	pub fn local_transform(&self, id: SceneNodeId) -> SceneResult<Mat4> {
		Ok(self.node(id)?.local_transform())
	}

	/// Replaces the local transform. Takes effect on the next update pass.
	pub fn set_local_transform(&mut self, id: SceneNodeId, transform: Mat4) -> SceneResult<()> {
		self.node_mut(id)?.set_local_transform(transform);
		Ok(())
	}

	/// Transform relative to the root, as of the last update pass that reached `id`.
	pub fn cumulative_transform(&self, id: SceneNodeId) -> SceneResult<Mat4> {
		self.node(id)?
			.cumulative_transform()
			.ok_or(SceneError::TransformNotComputed(id))
	}

	/// First node named `name`, searching depth first from the root in insertion order.
	///
	/// Names are not unique: with several matches the first one in that order wins, every time.
	pub fn find_by_name(&self, name: &str) -> Option<SceneNodeId> {
		self.find_by_name_from(self.root(), name)
	}

	/// Like [`find_by_name`](Self::find_by_name), restricted to the subtree at `start` (included).
	pub fn find_by_name_from(&self, start: SceneNodeId, name: &str) -> Option<SceneNodeId> {
		self.get_internal_node(start)?;
		self.pre_order_from(start.0)
			.find(|(_, node)| node.name == name)
			.map(|(id, _)| id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::NodeKind;

	fn sample() -> (SceneGraph<&'static str>, SceneNodeId, SceneNodeId, SceneNodeId) {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let body = graph.add_group(root, "Body", Mat4::IDENTITY).unwrap();
		let arm = graph.add_leaf(body, "Arm", Mat4::IDENTITY, "arm").unwrap();
		let head = graph.add_leaf(root, "Head", Mat4::IDENTITY, "head").unwrap();
		(graph, body, arm, head)
	}

	#[test]
	fn pre_order_in_insertion_order() {
		let (graph, ..) = sample();
		let names: Vec<_> = graph.iter().map(|(_, node)| node.name.as_str()).collect();
		assert_eq!(names, ["Root", "Body", "Arm", "Head"]);
		assert_eq!(graph.len(), 4);
	}

	#[test]
	fn parent_and_children() {
		let (graph, body, arm, head) = sample();
		let root = graph.root();

		assert_eq!(graph.parent(root), None);
		assert_eq!(graph.parent(arm), Some(body));
		assert_eq!(graph.parent(head), Some(root));
		assert_eq!(graph.children(root).unwrap().collect::<Vec<_>>(), [body, head]);
		assert_eq!(graph.children(arm).unwrap().count(), 0);
	}

	#[test]
	fn leaves_cannot_own_children() {
		let (mut graph, _, arm, _) = sample();
		let err = graph.add_leaf(arm, "Hand", Mat4::IDENTITY, "hand").unwrap_err();
		assert_eq!(
			err,
			SceneError::NotAGroup {
				id: arm,
				name: "Arm".to_owned()
			}
		);
		assert_eq!(graph.len(), 4);
	}

	#[test]
	fn find_by_name_returns_first_match() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let first = graph.add_leaf(root, "X", Mat4::IDENTITY, 1).unwrap();
		let second = graph.add_leaf(root, "X", Mat4::IDENTITY, 2).unwrap();

		assert_ne!(first, second);
		for _ in 0..3 {
			assert_eq!(graph.find_by_name("X"), Some(first));
		}
		assert_eq!(graph.find_by_name("Root"), Some(root));
	}

	#[test]
	fn find_by_name_is_depth_first() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let group = graph.add_group(root, "Group", Mat4::IDENTITY).unwrap();
		let nested = graph.add_leaf(group, "X", Mat4::IDENTITY, ()).unwrap();
		graph.add_leaf(root, "X", Mat4::IDENTITY, ()).unwrap();

		assert_eq!(graph.find_by_name("X"), Some(nested));
	}

	#[test]
	fn find_by_name_miss_is_none() {
		let (graph, body, ..) = sample();
		assert_eq!(graph.find_by_name("Teapot"), None);
		assert_eq!(graph.find_by_name_from(body, "Head"), None);
		assert!(graph.find_by_name_from(body, "Arm").is_some());
	}

	#[test]
	fn remove_subtree() {
		let (mut graph, body, arm, head) = sample();

		graph.remove(body).unwrap();
		assert!(!graph.contains(body));
		assert!(!graph.contains(arm));
		assert!(graph.contains(head));
		assert_eq!(graph.len(), 2);
		assert_eq!(graph.find_by_name("Arm"), None);

		assert_eq!(graph.remove(arm), Err(SceneError::NodeNotFound(arm)));
		assert_eq!(
			graph.set_local_transform(arm, Mat4::IDENTITY),
			Err(SceneError::NodeNotFound(arm))
		);
		assert_eq!(graph.remove(graph.root()), Err(SceneError::RootRemoval));
	}

	#[test]
	fn old_handle_does_not_reach_node_in_reused_slot() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let old = graph.add_leaf(root, "Old", Mat4::IDENTITY, 1).unwrap();
		graph.remove(old).unwrap();
		let new = graph.add_leaf(root, "New", Mat4::IDENTITY, 2).unwrap();

		assert_ne!(old, new);
		assert!(!graph.contains(old));
		assert!(graph.get(old).is_none());
		assert!(graph.get_mut(old).is_none());
		assert_eq!(graph.parent(old), None);
		assert_eq!(graph.find_by_name_from(old, "New"), None);
		assert_eq!(
			graph.set_local_transform(old, Mat4::ZERO),
			Err(SceneError::NodeNotFound(old))
		);
		assert_eq!(graph.remove(old), Err(SceneError::NodeNotFound(old)));

		// the new node is untouched
		assert_eq!(graph.local_transform(new), Ok(Mat4::IDENTITY));
		assert_eq!(graph.get(new).and_then(|node| node.payload()), Some(&2));
	}

	#[test]
	fn root_must_be_a_group() {
		let err = SceneGraph::new_with_root(SceneNode::leaf("Lonely", Mat4::IDENTITY, ())).unwrap_err();
		assert_eq!(err, SceneError::RootNotGroup("Lonely".to_owned()));

		let graph = SceneGraph::<()>::new_with_root(SceneNode::group("Stage", Mat4::IDENTITY)).unwrap();
		assert_eq!(graph.get(graph.root()).map(SceneNode::name), Some("Stage"));
	}

	#[test]
	fn group_stays_a_group_through_get_mut() {
		let (mut graph, body, arm, _) = sample();

		let node = graph.get_mut(body).unwrap();
		node.name = "Torso".to_owned();
		assert!(node.payload_mut().is_none());
		assert!(matches!(graph.get(body).unwrap().kind(), NodeKind::Group));

		// the child is still reachable under a group, and still rejects children itself
		assert_eq!(graph.parent(arm), Some(body));
		assert!(matches!(
			graph.add_leaf(arm, "Hand", Mat4::IDENTITY, "hand"),
			Err(SceneError::NotAGroup { .. })
		));
	}

	#[test]
	fn local_transform_round_trips() {
		let (mut graph, body, ..) = sample();
		assert_eq!(graph.local_transform(body), Ok(Mat4::IDENTITY));

		let scale = Mat4::from_scale(glam::Vec3::splat(2.0));
		graph.set_local_transform(body, scale).unwrap();
		assert_eq!(graph.local_transform(body), Ok(scale));
	}
}
