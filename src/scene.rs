use tracing::trace;

use crate::graph::SceneGraph;
use crate::render::RenderContext;

/// Scene-specific per-frame logic.
///
/// Runs once at the start of every frame, before transforms are propagated, and may change
/// any node's local transform. State that has to survive between frames (an accumulating
/// angle, a timer) belongs to the implementor, never to the graph.
pub trait Animator<P> {
	fn update(&mut self, graph: &mut SceneGraph<P>, dt: f32);
}

impl<P, F> Animator<P> for F
where
	F: FnMut(&mut SceneGraph<P>, f32),
{
	fn update(&mut self, graph: &mut SceneGraph<P>, dt: f32) {
		self(graph, dt)
	}
}

/// A scene graph together with the animator driving it.
pub struct Scene<P, A> {
	graph: SceneGraph<P>,
	animator: A,
	frame_count: u64,
}

impl<P, A: Animator<P>> Scene<P, A> {
	pub fn new(graph: SceneGraph<P>, animator: A) -> Self {
		Self {
			graph,
			animator,
			frame_count: 0,
		}
	}

	pub fn graph(&self) -> &SceneGraph<P> {
		&self.graph
	}

	pub fn graph_mut(&mut self) -> &mut SceneGraph<P> {
		&mut self.graph
	}

	pub fn animator(&self) -> &A {
		&self.animator
	}

	pub fn animator_mut(&mut self) -> &mut A {
		&mut self.animator
	}

	/// Number of completed calls to [`frame`](Self::frame).
	pub fn frame_count(&self) -> u64 {
		self.frame_count
	}

	/// Run one frame: animate, propagate transforms from identity, render.
	///
	/// Provide elapsed time since the previous frame. Provide `0` for the first call.
	pub fn frame(&mut self, dt: f32, ctx: &mut impl RenderContext<P>) {
		trace!("Frame {} (dt = {dt})", self.frame_count);

		self.animator.update(&mut self.graph, dt);
		self.graph.update_transforms();
		self.graph.render(ctx);

		self.frame_count += 1;
	}

	pub fn into_parts(self) -> (SceneGraph<P>, A) {
		(self.graph, self.animator)
	}
}
