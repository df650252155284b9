use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
	pub position: Vec3,
	pub normal: Vec3,
	/// Only meaningful when the mesh [has texture coordinates](Mesh::has_tex_coords).
	pub tex_coord: Vec2,
}

impl Vertex {
	pub fn new(position: Vec3, normal: Vec3) -> Self {
		Self {
			position,
			normal,
			tex_coord: Vec2::ZERO,
		}
	}

	pub fn with_tex_coord(mut self, tex_coord: Vec2) -> Self {
		self.tex_coord = tex_coord;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
	#[error("Index list of length {0} does not describe whole triangles")]
	IndicesNotTriangles(usize),
	#[error("Index {index} out of range for a mesh of {vertex_count} vertices")]
	IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
	pub vertices: Vec<Vertex>,
	/// Three per triangle, counter-clockwise when seen from the front.
	pub indices: Vec<u32>,
	/// Whether the vertices carry texture coordinates. Backends pick a textured shader on this.
	pub has_tex_coords: bool,
}

impl Mesh {
	pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, MeshError> {
		let mesh = Self {
			vertices,
			indices,
			has_tex_coords: false,
		};
		mesh.validate()?;
		Ok(mesh)
	}

	/// Marks the vertices' `tex_coord`s as authored.
	pub fn with_tex_coords(mut self) -> Self {
		self.has_tex_coords = true;
		self
	}

	pub fn validate(&self) -> Result<(), MeshError> {
		if self.indices.len() % 3 != 0 {
			return Err(MeshError::IndicesNotTriangles(self.indices.len()));
		}
		match self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
			Some(&index) => Err(MeshError::IndexOutOfRange {
				index,
				vertex_count: self.vertices.len(),
			}),
			None => Ok(()),
		}
	}

	pub fn num_triangles(&self) -> usize {
		self.indices.len() / 3
	}

	/// Cube spanning -1 to 1 on every axis. Four vertices per face so that normals stay flat,
	/// each face mapping the whole texture.
	pub fn cube() -> Self {
		// (normal, u, v) with u × v = normal
		#[rustfmt::skip]
		let faces = [
			(Vec3::X,     Vec3::Y, Vec3::Z),
			(Vec3::NEG_X, Vec3::Z, Vec3::Y),
			(Vec3::Y,     Vec3::Z, Vec3::X),
			(Vec3::NEG_Y, Vec3::X, Vec3::Z),
			(Vec3::Z,     Vec3::X, Vec3::Y),
			(Vec3::NEG_Z, Vec3::Y, Vec3::X),
		];

		let mut vertices = Vec::with_capacity(24);
		let mut indices = Vec::with_capacity(36);
		for (normal, u, v) in faces {
			let base = vertices.len() as u32;
			let corners = [
				(-u - v, Vec2::new(0.0, 1.0)),
				(u - v, Vec2::new(1.0, 1.0)),
				(u + v, Vec2::new(1.0, 0.0)),
				(-u + v, Vec2::new(0.0, 0.0)),
			];
			for (corner, tex_coord) in corners {
				vertices.push(Vertex::new(normal + corner, normal).with_tex_coord(tex_coord));
			}
			indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
		}

		Self {
			vertices,
			indices,
			has_tex_coords: true,
		}
	}

	/// Recompute smooth vertex normals from the triangles.
	///
	/// Each triangle adds its face normal (weighted by area) to its three vertices, and each
	/// vertex ends up with the normalized average. Vertices no triangle refers to keep their normal.
	pub fn generate_vertex_normals(&mut self) -> Result<(), MeshError> {
		self.validate()?;

		let mut sums = vec![Vec3::ZERO; self.vertices.len()];
		let mut contributing_counts = vec![0_u32; self.vertices.len()];

		for tri in self.indices.chunks_exact(3) {
			let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
			let v0 = self.vertices[i0].position;
			let v1 = self.vertices[i1].position;
			let v2 = self.vertices[i2].position;

			let face_normal = (v1 - v0).cross(v2 - v0);
			for i in [i0, i1, i2] {
				sums[i] += face_normal;
				contributing_counts[i] += 1;
			}
		}

		for ((vertex, sum), count) in self.vertices.iter_mut().zip(sums).zip(contributing_counts) {
			if count > 0 {
				vertex.normal = (sum / count as f32).normalize_or_zero();
			}
		}

		Ok(())
	}
}
