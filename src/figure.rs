//! The articulated demo figure: a rotating robot with swinging arms and an orbiting teapot.

use glam::{vec3, Mat4, Vec3};
use tracing::debug;

use crate::graph::{SceneGraph, SceneResult};
use crate::material::{colours, Drawable, Material, MeshHandle, Primitive, TextureHandle};
use crate::node::SceneNodeId;
use crate::scene::Animator;

/// Mesh slot the plane model is expected in. Loading it is up to the caller.
pub const PLANE_MESH: MeshHandle = MeshHandle(0);
/// Texture applied to the body and legs.
pub const BODY_TEXTURE: TextureHandle = TextureHandle(0);

#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
	/// Degrees added to the figure's rotation every frame.
	pub rotation_step: f32,
	/// Peak arm swing in degrees.
	pub swing_amplitude: f32,
	/// Pivot offset of the right shoulder, mirrored on X for the left one.
	pub shoulder_offset: Vec3,
	/// Where the right shoulder hangs on the body, mirrored on X for the left one.
	pub shoulder_anchor: Vec3,
	pub arm_scale: Vec3,
	/// How far below the shoulder pivot the arm's centre sits.
	pub arm_drop: f32,
	pub teapot_orbit: Vec3,
}

impl Default for FigureConfig {
	fn default() -> Self {
		Self {
			rotation_step: 0.5,
			swing_amplitude: 180.0,
			shoulder_offset: vec3(0.0, -4.25, 0.0),
			shoulder_anchor: vec3(6.0, 30.0, 0.0),
			arm_scale: vec3(1.0, 8.5, 1.0),
			arm_drop: -4.25,
			teapot_orbit: vec3(30.0, 25.0, 0.0),
		}
	}
}

fn mirror_x(v: Vec3) -> Vec3 {
	vec3(-v.x, v.y, v.z)
}

/// Builds the robot in its rest pose.
pub fn build_figure(config: &FigureConfig) -> SceneResult<SceneGraph<Drawable>> {
	let mut graph = SceneGraph::new("Robot");
	let root = graph.root();

	let plane = Drawable::new(Primitive::Mesh(PLANE_MESH), Material::with_ambient(colours::WHITE));
	let plane_trans = Mat4::from_translation(vec3(0.0, 45.0, 25.0))
		* Mat4::from_scale(Vec3::splat(4.0))
		* Mat4::from_rotation_y(5.0)
		* Mat4::from_rotation_x(6.5);
	graph.add_leaf(root, "Plane", plane_trans, plane)?;

	let teapots = graph.add_group(root, "TeapotScene", Mat4::IDENTITY)?;
	for (name, x) in [("Teapot1", 20.0), ("Teapot2", -20.0)] {
		let trans = Mat4::from_translation(vec3(x, 15.0, 0.0)) * Mat4::from_scale(Vec3::splat(5.0));
		graph.add_leaf(teapots, name, trans, Drawable::teapot(colours::GOLD))?;
	}

	let textured = |ambient| Drawable::new(Primitive::Cube, Material::with_ambient(ambient).textured(BODY_TEXTURE));
	graph.add_leaf(
		root,
		"Body",
		Mat4::from_translation(vec3(0.0, 23.0, 0.0)) * Mat4::from_scale(vec3(5.0, 8.0, 2.5)),
		textured(colours::WHITE),
	)?;
	for (name, x) in [("LeftLeg", -4.0), ("RightLeg", 4.0)] {
		let trans = Mat4::from_translation(vec3(x, 7.5, 0.0)) * Mat4::from_scale(vec3(1.0, 7.5, 1.0));
		graph.add_leaf(root, name, trans, textured(colours::RED))?;
	}
	graph.add_leaf(
		root,
		"Head",
		Mat4::from_translation(vec3(0.0, 34.0, 0.0)) * Mat4::from_scale(Vec3::splat(3.0)),
		Drawable::cube(colours::BROWN),
	)?;

	let sides = [
		("LeftShoulder", "LeftArm", mirror_x(config.shoulder_offset), -6.0),
		("RightShoulder", "RightArm", config.shoulder_offset, 6.0),
	];
	for (shoulder_name, arm_name, offset, arm_x) in sides {
		let shoulder = graph.add_group(root, shoulder_name, Mat4::from_translation(offset))?;
		graph.add_leaf(
			shoulder,
			arm_name,
			Mat4::from_translation(vec3(arm_x, 22.0, 0.0)),
			Drawable::cube(colours::BROWN),
		)?;
	}

	graph.add_leaf(
		root,
		"Teapot",
		Mat4::from_translation(config.teapot_orbit),
		Drawable::teapot(colours::GOLD),
	)?;

	Ok(graph)
}

/// Handles the animator needs, resolved once by name.
#[derive(Debug, Clone, Copy)]
struct FigureHandles {
	root: SceneNodeId,
	left_shoulder: Option<SceneNodeId>,
	left_arm: Option<SceneNodeId>,
	right_shoulder: Option<SceneNodeId>,
	right_arm: Option<SceneNodeId>,
	teapot: Option<SceneNodeId>,
}

/// Spins the whole figure, swings the arms in opposite directions and orbits the teapot.
///
/// Parts missing from the graph are left alone.
#[derive(Debug, Clone)]
pub struct FigureAnimator {
	config: FigureConfig,
	/// Degrees, grows by `rotation_step` every frame.
	rotation_angle: f32,
	handles: FigureHandles,
}

impl FigureAnimator {
	pub fn bind<P>(graph: &SceneGraph<P>, config: FigureConfig) -> Self {
		let handles = FigureHandles {
			root: graph.root(),
			left_shoulder: graph.find_by_name("LeftShoulder"),
			left_arm: graph.find_by_name("LeftArm"),
			right_shoulder: graph.find_by_name("RightShoulder"),
			right_arm: graph.find_by_name("RightArm"),
			teapot: graph.find_by_name("Teapot"),
		};
		debug!("Bound figure animator: {handles:?}");

		Self {
			config,
			rotation_angle: 0.0,
			handles,
		}
	}

	pub fn config(&self) -> &FigureConfig {
		&self.config
	}

	pub fn rotation_angle(&self) -> f32 {
		self.rotation_angle
	}

	/// Shoulder pose for a given side (`-1` left, `1` right) and swing angle in radians.
	fn shoulder_transform(&self, side: f32, swing: f32) -> Mat4 {
		let mirror = |v: Vec3| if side < 0.0 { mirror_x(v) } else { v };
		Mat4::from_translation(mirror(self.config.shoulder_anchor))
			* Mat4::from_rotation_x(swing)
			* Mat4::from_translation(mirror(self.config.shoulder_offset))
	}

	fn arm_transform(&self, swing: f32) -> Mat4 {
		Mat4::from_rotation_y(swing)
			* Mat4::from_translation(vec3(0.0, self.config.arm_drop, 0.0))
			* Mat4::from_scale(self.config.arm_scale)
	}
}

fn set_if_present<P>(graph: &mut SceneGraph<P>, id: Option<SceneNodeId>, transform: Mat4) {
	let Some(id) = id else {
		return;
	};
	if let Err(e) = graph.set_local_transform(id, transform) {
		debug!("Skipping figure part: {e}");
	}
}

impl<P> Animator<P> for FigureAnimator {
	fn update(&mut self, graph: &mut SceneGraph<P>, _dt: f32) {
		self.rotation_angle += self.config.rotation_step;
		let angle = self.rotation_angle.to_radians();
		let handles = self.handles;

		set_if_present(graph, Some(handles.root), Mat4::from_rotation_y(angle));

		let swing = (angle.sin() * self.config.swing_amplitude).to_radians();
		for (side, shoulder, arm, swing) in [
			(-1.0, handles.left_shoulder, handles.left_arm, swing),
			(1.0, handles.right_shoulder, handles.right_arm, -swing),
		] {
			// the arm only moves with its shoulder
			if shoulder.is_some() {
				set_if_present(graph, shoulder, self.shoulder_transform(side, swing));
				set_if_present(graph, arm, self.arm_transform(swing));
			}
		}

		set_if_present(
			graph,
			handles.teapot,
			Mat4::from_translation(self.config.teapot_orbit) * Mat4::from_rotation_y(-angle),
		);
	}
}
