use std::fmt;

use indextree::{Arena, NodeId};

use crate::node::SceneNode;

use super::SceneGraph;

fn rec_fmt<P>(indent: usize, f: &mut fmt::Formatter<'_>, node_id: NodeId, arena: &Arena<SceneNode<P>>) -> fmt::Result {
	let Some(node) = arena.get(node_id) else {
		return Ok(());
	};

	let node = node.get();

	let type_name = node.type_name();
	#[cfg(feature = "owo")]
	let type_name = {
		use owo_colors::OwoColorize;
		type_name.magenta()
	};

	writeln!(f, "{}- [{}] {}", "  ".repeat(indent), type_name, node.name)?;
	for child in node_id.children(arena) {
		rec_fmt(indent + 1, f, child, arena)?;
	}

	Ok(())
}

impl<P> fmt::Display for SceneGraph<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		rec_fmt(0, f, self.root_id, &self.arena)
	}
}

impl<P> fmt::Debug for SceneGraph<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter().map(|(_, node)| node)).finish()
	}
}
