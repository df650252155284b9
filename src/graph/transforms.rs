use glam::Mat4;

use crate::node::SceneNodeId;

use super::{SceneGraph, SceneResult};

impl<P> SceneGraph<P> {
	/// Recomputes the cumulative transform of `id` and all of its descendants,
	/// treating `parent_cumulative` as the transform of whatever `id` hangs from.
	///
	/// Pre-order, so a parent is always settled before its children read it.
	/// Every node of the subtree is visited exactly once.
	pub fn compute_cumulative_transform(&mut self, id: SceneNodeId, parent_cumulative: Mat4) -> SceneResult<()> {
		self.node(id)?;
		self.propagate(id.0, parent_cumulative);
		Ok(())
	}

	/// Update every node's cumulative transform, starting from identity above the root.
	pub fn update_transforms(&mut self) {
		self.propagate(self.root_id, Mat4::IDENTITY);
	}

	fn propagate(&mut self, id: indextree::NodeId, parent_cumulative: Mat4) {
		let mut stack = vec![(id, parent_cumulative)];
		while let Some((node_id, base_trans)) = stack.pop() {
			let cumulative = self.arena[node_id].get_mut().compute_cumulative_transform(base_trans);
			let children: Vec<_> = node_id.children(&self.arena).collect();
			// reversed so that the first child is popped first
			stack.extend(children.into_iter().rev().map(|child| (child, cumulative)));
		}
	}
}

#[cfg(test)]
mod tests {
	use glam::{vec3, Mat4, Quat, Vec3};

	use crate::graph::{SceneError, SceneGraph};
	use crate::node::SceneNodeId;

	fn translation(x: f32, y: f32, z: f32) -> Mat4 {
		Mat4::from_translation(vec3(x, y, z))
	}

	#[test]
	fn translations_accumulate_down_the_tree() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let a = graph.add_group(root, "A", translation(1.0, 0.0, 0.0)).unwrap();
		let b = graph.add_leaf(a, "B", translation(0.0, 1.0, 0.0), ()).unwrap();

		graph.update_transforms();

		assert_eq!(graph.cumulative_transform(root), Ok(Mat4::IDENTITY));
		assert!(graph.cumulative_transform(a).unwrap().abs_diff_eq(translation(1.0, 0.0, 0.0), 1e-6));
		assert!(graph.cumulative_transform(b).unwrap().abs_diff_eq(translation(1.0, 1.0, 0.0), 1e-6));
	}

	/// Root -> Hip -> {Leg -> Foot, Spine -> {Head, Arm}} with non-commuting transforms.
	fn rig() -> (SceneGraph<()>, Vec<SceneNodeId>) {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		graph.set_local_transform(root, Mat4::from_rotation_y(0.3)).unwrap();

		let hip_trans =
			Mat4::from_scale_rotation_translation(Vec3::splat(2.0), Quat::from_rotation_z(0.5), vec3(0.0, 3.0, 0.0));
		let hip = graph.add_group(root, "Hip", hip_trans).unwrap();
		let leg = graph.add_group(hip, "Leg", Mat4::from_rotation_x(-0.7) * translation(0.5, -1.0, 0.0)).unwrap();
		let foot = graph.add_leaf(leg, "Foot", translation(0.0, -1.0, 0.2), ()).unwrap();
		let spine = graph.add_group(hip, "Spine", translation(0.0, 1.5, 0.0)).unwrap();
		let head = graph.add_leaf(spine, "Head", Mat4::from_scale(vec3(1.0, 0.5, 1.0)), ()).unwrap();
		let arm = graph.add_leaf(spine, "Arm", Mat4::from_rotation_z(1.2) * translation(1.0, 0.0, 0.0), ()).unwrap();

		(graph, vec![root, hip, leg, foot, spine, head, arm])
	}

	#[test]
	fn cumulative_is_product_along_path() {
		let (mut graph, ids) = rig();
		graph.update_transforms();

		for id in ids {
			// walk up to the root, then multiply root-first
			let mut path = vec![id];
			while let Some(parent) = graph.parent(*path.last().unwrap()) {
				path.push(parent);
			}
			let expected = path
				.iter()
				.rev()
				.fold(Mat4::IDENTITY, |acc, id| acc * graph.local_transform(*id).unwrap());

			assert!(graph.cumulative_transform(id).unwrap().abs_diff_eq(expected, 1e-5));
		}
	}

	#[test]
	fn siblings_each_get_their_own_transform() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let row = graph.add_group(root, "Row", translation(0.0, 5.0, 0.0)).unwrap();
		let cells: Vec<_> = (0..8)
			.map(|i| graph.add_leaf(row, format!("Cell{i}"), translation(i as f32, 0.0, 0.0), ()).unwrap())
			.collect();

		graph.update_transforms();

		for (i, cell) in cells.into_iter().enumerate() {
			let expected = translation(i as f32, 5.0, 0.0);
			assert!(graph.cumulative_transform(cell).unwrap().abs_diff_eq(expected, 1e-6));
		}
		let order: Vec<_> = graph.iter().skip(2).map(|(_, node)| node.name.clone()).collect();
		assert_eq!(order, (0..8).map(|i| format!("Cell{i}")).collect::<Vec<_>>());
	}

	#[test]
	fn update_is_idempotent() {
		let (mut graph, ids) = rig();

		graph.update_transforms();
		let first: Vec<_> = ids.iter().map(|id| graph.cumulative_transform(*id).unwrap()).collect();
		graph.update_transforms();
		let second: Vec<_> = ids.iter().map(|id| graph.cumulative_transform(*id).unwrap()).collect();

		assert_eq!(first, second);
	}

	#[test]
	fn reading_before_update_is_reported() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let a = graph.add_leaf(root, "A", Mat4::IDENTITY, ()).unwrap();

		assert_eq!(graph.cumulative_transform(a), Err(SceneError::TransformNotComputed(a)));

		graph.update_transforms();
		let b = graph.add_leaf(root, "B", Mat4::IDENTITY, ()).unwrap();
		assert!(graph.cumulative_transform(a).is_ok());
		assert_eq!(graph.cumulative_transform(b), Err(SceneError::TransformNotComputed(b)));
	}

	#[test]
	fn local_changes_wait_for_next_update() {
		let mut graph = SceneGraph::new("Root");
		let root = graph.root();
		let a = graph.add_leaf(root, "A", translation(1.0, 0.0, 0.0), ()).unwrap();
		graph.update_transforms();

		graph.set_local_transform(a, translation(5.0, 0.0, 0.0)).unwrap();
		assert!(graph.cumulative_transform(a).unwrap().abs_diff_eq(translation(1.0, 0.0, 0.0), 1e-6));

		graph.update_transforms();
		assert!(graph.cumulative_transform(a).unwrap().abs_diff_eq(translation(5.0, 0.0, 0.0), 1e-6));
	}

	#[test]
	fn subtree_update_uses_given_parent() {
		let (mut graph, ids) = rig();
		let spine = ids[4];
		let head = ids[5];
		let foot = ids[3];

		let parent = translation(10.0, 0.0, 0.0);
		graph.compute_cumulative_transform(spine, parent).unwrap();

		let expected = parent * graph.local_transform(spine).unwrap() * graph.local_transform(head).unwrap();
		assert!(graph.cumulative_transform(head).unwrap().abs_diff_eq(expected, 1e-5));
		// outside the subtree: untouched
		assert!(graph.cumulative_transform(foot).is_err());
	}
}
