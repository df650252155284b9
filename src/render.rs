use glam::Mat4;
use tracing::warn;

use crate::graph::{SceneGraph, SceneResult};
use crate::node::{NodeKind, SceneNodeId};

/// One leaf's worth of drawing, handed to a [`RenderContext`].
#[derive(Debug)]
pub struct DrawSubmission<'a, P> {
	pub id: SceneNodeId,
	pub name: &'a str,
	/// The leaf's cumulative transform.
	pub model: Mat4,
	pub payload: &'a P,
}

/// Whatever actually draws things: a GPU backend, or a command recorder.
///
/// The scene graph only forwards leaves to it, in traversal order, and never looks at the payload.
pub trait RenderContext<P> {
	/// Called when traversal reaches a group, before any of its children.
	fn visit_group(&mut self, _id: SceneNodeId, _name: &str) {}

	fn submit(&mut self, draw: DrawSubmission<'_, P>);
}

impl<P, R: RenderContext<P> + ?Sized> RenderContext<P> for &mut R {
	fn visit_group(&mut self, id: SceneNodeId, name: &str) {
		(**self).visit_group(id, name)
	}

	fn submit(&mut self, draw: DrawSubmission<'_, P>) {
		(**self).submit(draw)
	}
}

impl<P> SceneGraph<P> {
	/// Render the whole graph, depth first, siblings in insertion order.
	pub fn render(&self, ctx: &mut impl RenderContext<P>) {
		self.render_subtree(self.root(), ctx);
	}

	/// Render `id` and everything below it.
	pub fn render_from(&self, id: SceneNodeId, ctx: &mut impl RenderContext<P>) -> SceneResult<()> {
		self.node(id)?;
		self.render_subtree(id, ctx);
		Ok(())
	}

	fn render_subtree(&self, id: SceneNodeId, ctx: &mut impl RenderContext<P>) {
		for (id, node) in self.pre_order_from(id.0) {
			match node.kind() {
				NodeKind::Group => ctx.visit_group(id, &node.name),
				NodeKind::Leaf(payload) => {
					let Some(model) = node.cumulative_transform() else {
						warn!("Skipping {:?}: transforms were not updated before rendering", node.name);
						continue;
					};
					ctx.submit(DrawSubmission {
						id,
						name: &node.name,
						model,
						payload,
					});
				}
			}
		}
	}
}

/// A recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
	pub id: SceneNodeId,
	pub name: String,
	pub model: Mat4,
}

/// Render context that just records what it is asked to draw, in order.
#[derive(Debug, Default)]
pub struct DrawList {
	commands: Vec<DrawCommand>,
}

impl DrawList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn clear(&mut self) {
		self.commands.clear();
	}

	pub fn commands(&self) -> &[DrawCommand] {
		&self.commands
	}

	pub fn len(&self) -> usize {
		self.commands.len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}

	/// First recorded draw of a node called `name`.
	pub fn find(&self, name: &str) -> Option<&DrawCommand> {
		self.commands.iter().find(|cmd| cmd.name == name)
	}
}

impl<P> RenderContext<P> for DrawList {
	fn submit(&mut self, draw: DrawSubmission<'_, P>) {
		self.commands.push(DrawCommand {
			id: draw.id,
			name: draw.name.to_owned(),
			model: draw.model,
		});
	}
}
