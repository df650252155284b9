use glam::{Mat4, Vec3};
use json::JsonValue;

use crate::graph::{SceneError, SceneGraph};
use crate::material::{Drawable, Material, MeshHandle, Primitive, TextureHandle};
use crate::math::transform::TransformOffset;
use crate::node::{SceneNode, SceneNodeId};

use super::json::{JsonError, JsonObject};

pub type SceneParseResult<T> = Result<T, SceneParseError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneParseError {
	#[error("Invalid JSON: {0}")]
	InvalidJson(String),
	#[error(transparent)]
	JsonError(#[from] JsonError),
	#[error("Unknown node type {0:?}")]
	UnknownNodeType(String),
	#[error("Node {0:?} is not a group but lists children")]
	ChildrenOnLeaf(String),
	#[error(transparent)]
	Scene(#[from] SceneError),
}

impl SceneParseError {
	pub fn nested(self, key: &str) -> Self {
		match self {
			SceneParseError::JsonError(err) => SceneParseError::JsonError(err.nested(key)),
			_ => self,
		}
	}

	fn in_list(self, index: usize) -> Self {
		match self {
			SceneParseError::JsonError(err) => SceneParseError::JsonError(err.in_list(index)),
			_ => self,
		}
	}
}

fn vals<T>(key: &str, res: SceneParseResult<T>) -> SceneParseResult<T> {
	res.map_err(|e| e.nested(key))
}

/// Builds a scene graph from a JSON scene description.
///
/// ```json
/// { "name": "Robot", "type": "Group", "children": [
///     { "name": "Head", "type": "Cube", "colour": [0.8, 0.6, 0.4, 1],
///       "transform": { "translation": [0, 34, 0], "scale": [3, 3, 3] } }
/// ] }
/// ```
///
/// Node types are `Group`, `Cube`, `Teapot` and `Mesh` (with a `"mesh"` handle).
/// Rotations are Euler XYZ in degrees.
pub fn parse_scene(text: &str) -> SceneParseResult<SceneGraph<Drawable>> {
	let value = json::parse(text).map_err(|e| SceneParseError::InvalidJson(e.to_string()))?;
	let obj = JsonObject::from_value(&value, "root")?;

	let mut graph = SceneGraph::new_with_root(deserialize_node(&obj)?)?;
	let root_id = graph.root();
	vals("children", deserialize_children(&obj, &mut graph, root_id))?;
	Ok(graph)
}

fn deserialize_children(
	obj: &JsonObject,
	graph: &mut SceneGraph<Drawable>,
	parent: SceneNodeId,
) -> SceneParseResult<()> {
	if !obj.has("children") {
		return Ok(());
	}

	for (index, child) in obj.get_list("children")?.iter().enumerate() {
		add_child(child, graph, parent).map_err(|e| e.in_list(index))?;
	}
	Ok(())
}

fn add_child(value: &JsonValue, graph: &mut SceneGraph<Drawable>, parent: SceneNodeId) -> SceneParseResult<()> {
	let obj = JsonObject::from_value(value, "children")?;
	let node = deserialize_node(&obj)?;

	if !node.is_group() && obj.has("children") {
		return Err(SceneParseError::ChildrenOnLeaf(node.name));
	}

	let id = graph.add(parent, node)?;
	vals("children", deserialize_children(&obj, graph, id))
}

pub fn deserialize_node(obj: &JsonObject) -> SceneParseResult<SceneNode<Drawable>> {
	let name = obj.get_str("name")?;
	let node_type = obj.get_str("type")?;
	let transform = if obj.has("transform") {
		vals("transform", deserialize_transform(&obj.get_object("transform")?))?
	} else {
		Mat4::IDENTITY
	};

	let primitive = match node_type {
		"Group" => return Ok(SceneNode::group(name, transform)),
		"Cube" => Primitive::Cube,
		"Teapot" => Primitive::Teapot,
		"Mesh" => Primitive::Mesh(MeshHandle(obj.get_u32("mesh")?)),
		unknown => return Err(SceneParseError::UnknownNodeType(unknown.to_owned())),
	};

	Ok(SceneNode::leaf(name, transform, Drawable::new(primitive, deserialize_material(obj)?)))
}

fn deserialize_transform(obj: &JsonObject) -> SceneParseResult<Mat4> {
	let offset = TransformOffset::new()
		.with_translation(obj.get_opt("translation", JsonObject::get_vec3)?.unwrap_or(Vec3::ZERO))
		.with_rotation_degrees(obj.get_opt("rotation", JsonObject::get_vec3)?.unwrap_or(Vec3::ZERO))
		.with_scale(obj.get_opt("scale", JsonObject::get_vec3)?.unwrap_or(Vec3::ONE));
	Ok(offset.to_matrix())
}

fn deserialize_material(obj: &JsonObject) -> SceneParseResult<Material> {
	let mut material = Material::default();
	if let Some(colour) = obj.get_opt("colour", JsonObject::get_vec4)? {
		material.ambient = colour;
	}
	if let Some(texture) = obj.get_opt("texture", JsonObject::get_u32)? {
		material.texture = Some(TextureHandle(texture));
	}
	Ok(material)
}
