use glam::{EulerRot, Mat4, Quat, Vec3};

/// Relative transform, decomposed.
///
/// Composes as translation · rotation · scale, so a point is scaled first,
/// then rotated, then moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformOffset {
	/// X Y Z
	pub translation: Vec3,
	/// Euler angles in radians, applied X then Y then Z
	pub rotation: Vec3,
	/// X Y Z scale
	pub scale: Vec3,
}

impl Default for TransformOffset {
	fn default() -> Self {
		Self {
			translation: Vec3::ZERO,
			rotation: Vec3::ZERO,
			scale: Vec3::ONE,
		}
	}
}

impl TransformOffset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_translation(mut self, translation: Vec3) -> Self {
		self.translation = translation;
		self
	}

	pub fn with_rotation(mut self, rotation: Vec3) -> Self {
		self.rotation = rotation;
		self
	}

	/// Same as `with_rotation`, with the angles given in degrees.
	pub fn with_rotation_degrees(self, degrees: Vec3) -> Self {
		self.with_rotation(Vec3::new(
			degrees.x.to_radians(),
			degrees.y.to_radians(),
			degrees.z.to_radians(),
		))
	}

	pub fn with_scale(mut self, scale: Vec3) -> Self {
		self.scale = scale;
		self
	}

	pub fn with_uniform_scale(self, scale: f32) -> Self {
		self.with_scale(Vec3::splat(scale))
	}

	pub fn to_matrix(&self) -> Mat4 {
		Mat4::from_translation(self.translation)
			* Mat4::from_quat(Quat::from_euler(
				EulerRot::XYZ,
				self.rotation.x,
				self.rotation.y,
				self.rotation.z,
			)) * Mat4::from_scale(self.scale)
	}
}

impl From<TransformOffset> for Mat4 {
	fn from(offset: TransformOffset) -> Self {
		offset.to_matrix()
	}
}

/// Composes a child's local transform under its parent's cumulative one.
///
/// glam matrices act on column vectors, so the local transform sits on the right:
/// a point in the child's space goes through `local` first, then `parent`.
#[inline]
pub fn compose(parent: Mat4, local: Mat4) -> Mat4 {
	parent * local
}
