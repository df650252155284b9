use glam::Vec4;

use crate::mesh::Mesh;

/// Opaque reference to a texture owned by the rendering backend.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct TextureHandle(pub u32);

/// Index into a [`MeshLibrary`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
#[repr(transparent)]
pub struct MeshHandle(pub u32);

pub mod colours {
	use glam::Vec4;

	pub const WHITE: Vec4 = Vec4::ONE;
	pub const GREY: Vec4 = Vec4::new(0.25, 0.25, 0.25, 1.0);
	pub const GOLD: Vec4 = Vec4::new(0.721_568_6, 0.525_490_2, 0.043_137_256, 1.0);
	pub const BROWN: Vec4 = Vec4::new(0.8, 0.6, 0.4, 1.0);
	pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
	pub ambient: Vec4,
	pub diffuse: Vec4,
	pub specular: Vec4,
	pub shininess: f32,
	pub opacity: f32,
	pub texture: Option<TextureHandle>,
}

impl Default for Material {
	fn default() -> Self {
		Self {
			ambient: colours::GREY,
			diffuse: colours::WHITE,
			specular: Vec4::splat(0.1),
			shininess: 1.0,
			opacity: 1.0,
			texture: None,
		}
	}
}

impl Material {
	pub fn with_ambient(ambient: Vec4) -> Self {
		Self {
			ambient,
			..Default::default()
		}
	}

	pub fn textured(mut self, texture: TextureHandle) -> Self {
		self.texture = Some(texture);
		self
	}
}

/// What geometry a leaf draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
	Cube,
	/// Procedural teapot, tessellated by the backend.
	Teapot,
	Mesh(MeshHandle),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
	pub primitive: Primitive,
	pub material: Material,
}

impl Drawable {
	pub fn new(primitive: Primitive, material: Material) -> Self {
		Self { primitive, material }
	}

	pub fn cube(ambient: Vec4) -> Self {
		Self::new(Primitive::Cube, Material::with_ambient(ambient))
	}

	pub fn teapot(ambient: Vec4) -> Self {
		Self::new(Primitive::Teapot, Material::with_ambient(ambient))
	}
}

/// One part of a [`Model`], drawn with its own material.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
	pub mesh: Mesh,
	pub material: Material,
}

impl Submesh {
	/// Material to draw this part of `leaf` with.
	///
	/// The submesh decides the surface. The leaf supplies the ambient colour, and its texture
	/// when the submesh has none.
	pub fn material_for(&self, leaf: &Material) -> Material {
		Material {
			ambient: leaf.ambient,
			texture: self.material.texture.or(leaf.texture),
			..self.material.clone()
		}
	}
}

/// Geometry a mesh leaf refers to: one or more submeshes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
	pub submeshes: Vec<Submesh>,
}

impl Model {
	pub fn new(submeshes: Vec<Submesh>) -> Self {
		Self { submeshes }
	}

	pub fn num_triangles(&self) -> usize {
		self.submeshes.iter().map(|sub| sub.mesh.num_triangles()).sum()
	}
}

impl From<Mesh> for Model {
	fn from(mesh: Mesh) -> Self {
		Self::new(vec![Submesh {
			mesh,
			material: Material::default(),
		}])
	}
}

/// Models shared by handle between leaves, plus the built-in cube.
#[derive(Debug, Clone)]
pub struct MeshLibrary {
	cube: Model,
	models: Vec<Model>,
}

impl Default for MeshLibrary {
	fn default() -> Self {
		Self {
			cube: Mesh::cube().into(),
			models: Vec::new(),
		}
	}
}

impl MeshLibrary {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, model: impl Into<Model>) -> MeshHandle {
		self.models.push(model.into());
		MeshHandle(self.models.len() as u32 - 1)
	}

	pub fn get(&self, handle: MeshHandle) -> Option<&Model> {
		self.models.get(handle.0 as usize)
	}

	/// Geometry for `primitive`, if it lives on the CPU side.
	///
	/// The teapot is generated by the backend, so it never resolves here.
	pub fn resolve(&self, primitive: Primitive) -> Option<&Model> {
		match primitive {
			Primitive::Cube => Some(&self.cube),
			Primitive::Teapot => None,
			Primitive::Mesh(handle) => self.get(handle),
		}
	}
}
