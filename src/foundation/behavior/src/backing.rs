//! Dense columnar backing stores for the transform pipeline (spec.md §4.4,
//! SPEC_FULL.md §4.4). Every column is a flat `float[MaxEntities]` indexed
//! directly by entity index, regardless of whether that entity currently
//! carries a `Transform` behavior — unused slots simply hold the column's
//! default.

use crate::entity::Entity;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
	pub x: f32,
	pub y: f32,
	pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
	pub x: f32,
	pub y: f32,
	pub z: f32,
	pub w: f32,
}

impl Default for Quat {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			z: 0.0,
			w: 1.0,
		}
	}
}

/// A 3-column `x/y/z` store, defaulting every slot to `default_value`.
#[derive(Debug, Clone)]
pub struct Vec3Store {
	pub x: Box<[f32]>,
	pub y: Box<[f32]>,
	pub z: Box<[f32]>,
}

impl Vec3Store {
	pub fn new(capacity: usize, default_value: Vec3) -> Self {
		Self {
			x: vec![default_value.x; capacity].into_boxed_slice(),
			y: vec![default_value.y; capacity].into_boxed_slice(),
			z: vec![default_value.z; capacity].into_boxed_slice(),
		}
	}

	pub fn get(&self, entity: Entity) -> Vec3 {
		let i = entity.index_usize();
		Vec3 {
			x: self.x[i],
			y: self.y[i],
			z: self.z[i],
		}
	}

	pub fn set(&mut self, entity: Entity, value: Vec3) {
		let i = entity.index_usize();
		self.x[i] = value.x;
		self.y[i] = value.y;
		self.z[i] = value.z;
	}

	pub fn reset(&mut self, entity: Entity, default_value: Vec3) {
		self.set(entity, default_value);
	}
}

/// A 4-column `x/y/z/w` quaternion store, defaulting to the identity
/// rotation `(0, 0, 0, 1)`.
#[derive(Debug, Clone)]
pub struct QuatStore {
	pub x: Box<[f32]>,
	pub y: Box<[f32]>,
	pub z: Box<[f32]>,
	pub w: Box<[f32]>,
}

impl QuatStore {
	pub fn new(capacity: usize) -> Self {
		Self {
			x: vec![0.0; capacity].into_boxed_slice(),
			y: vec![0.0; capacity].into_boxed_slice(),
			z: vec![0.0; capacity].into_boxed_slice(),
			w: vec![1.0; capacity].into_boxed_slice(),
		}
	}

	pub fn get(&self, entity: Entity) -> Quat {
		let i = entity.index_usize();
		Quat {
			x: self.x[i],
			y: self.y[i],
			z: self.z[i],
			w: self.w[i],
		}
	}

	pub fn set(&mut self, entity: Entity, value: Quat) {
		let i = entity.index_usize();
		self.x[i] = value.x;
		self.y[i] = value.y;
		self.z[i] = value.z;
		self.w[i] = value.w;
	}

	pub fn reset(&mut self, entity: Entity) {
		self.set(entity, Quat::default());
	}
}

/// The 12-column upper-3x4 of a row-major affine matrix, used identically
/// for `LocalTransformStore`, `WorldTransformStore`, and
/// `ParentWorldTransformStore` (SPEC_FULL.md §4.4). The implicit rightmost
/// column of the full 4x4 is always `(0, 0, 0, 1)` and is never stored.
#[derive(Debug, Clone)]
pub struct AffineStore {
	pub m00: Box<[f32]>,
	pub m01: Box<[f32]>,
	pub m02: Box<[f32]>,
	pub m10: Box<[f32]>,
	pub m11: Box<[f32]>,
	pub m12: Box<[f32]>,
	pub m20: Box<[f32]>,
	pub m21: Box<[f32]>,
	pub m22: Box<[f32]>,
	pub tx: Box<[f32]>,
	pub ty: Box<[f32]>,
	pub tz: Box<[f32]>,
}

/// The identity affine transform as a 12-tuple of columns, in the order
/// `(m00, m01, m02, m10, m11, m12, m20, m21, m22, tx, ty, tz)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
	pub m00: f32,
	pub m01: f32,
	pub m02: f32,
	pub m10: f32,
	pub m11: f32,
	pub m12: f32,
	pub m20: f32,
	pub m21: f32,
	pub m22: f32,
	pub tx: f32,
	pub ty: f32,
	pub tz: f32,
}

impl Affine {
	pub const IDENTITY: Affine = Affine {
		m00: 1.0,
		m01: 0.0,
		m02: 0.0,
		m10: 0.0,
		m11: 1.0,
		m12: 0.0,
		m20: 0.0,
		m21: 0.0,
		m22: 1.0,
		tx: 0.0,
		ty: 0.0,
		tz: 0.0,
	};
}

impl AffineStore {
	pub fn new(capacity: usize) -> Self {
		let id = Affine::IDENTITY;
		Self {
			m00: vec![id.m00; capacity].into_boxed_slice(),
			m01: vec![id.m01; capacity].into_boxed_slice(),
			m02: vec![id.m02; capacity].into_boxed_slice(),
			m10: vec![id.m10; capacity].into_boxed_slice(),
			m11: vec![id.m11; capacity].into_boxed_slice(),
			m12: vec![id.m12; capacity].into_boxed_slice(),
			m20: vec![id.m20; capacity].into_boxed_slice(),
			m21: vec![id.m21; capacity].into_boxed_slice(),
			m22: vec![id.m22; capacity].into_boxed_slice(),
			tx: vec![id.tx; capacity].into_boxed_slice(),
			ty: vec![id.ty; capacity].into_boxed_slice(),
			tz: vec![id.tz; capacity].into_boxed_slice(),
		}
	}

	pub fn get(&self, entity: Entity) -> Affine {
		let i = entity.index_usize();
		Affine {
			m00: self.m00[i],
			m01: self.m01[i],
			m02: self.m02[i],
			m10: self.m10[i],
			m11: self.m11[i],
			m12: self.m12[i],
			m20: self.m20[i],
			m21: self.m21[i],
			m22: self.m22[i],
			tx: self.tx[i],
			ty: self.ty[i],
			tz: self.tz[i],
		}
	}

	pub fn set(&mut self, entity: Entity, value: Affine) {
		let i = entity.index_usize();
		self.m00[i] = value.m00;
		self.m01[i] = value.m01;
		self.m02[i] = value.m02;
		self.m10[i] = value.m10;
		self.m11[i] = value.m11;
		self.m12[i] = value.m12;
		self.m20[i] = value.m20;
		self.m21[i] = value.m21;
		self.m22[i] = value.m22;
		self.tx[i] = value.tx;
		self.ty[i] = value.ty;
		self.tz[i] = value.tz;
	}

	pub fn reset(&mut self, entity: Entity) {
		self.set(entity, Affine::IDENTITY);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vec3_store_defaults_and_roundtrips() {
		let mut store = Vec3Store::new(4, Vec3 { x: 1.0, y: 2.0, z: 3.0 });
		let e = Entity::from_raw(1);
		assert_eq!(store.get(Entity::from_raw(0)), Vec3 { x: 1.0, y: 2.0, z: 3.0 });
		store.set(e, Vec3 { x: 5.0, y: 6.0, z: 7.0 });
		assert_eq!(store.get(e), Vec3 { x: 5.0, y: 6.0, z: 7.0 });
		store.reset(e, Vec3::default());
		assert_eq!(store.get(e), Vec3::default());
	}

	#[test]
	fn quat_store_defaults_to_identity() {
		let store = QuatStore::new(4);
		assert_eq!(store.get(Entity::from_raw(0)), Quat::default());
	}

	#[test]
	fn affine_store_defaults_to_identity() {
		let store = AffineStore::new(4);
		assert_eq!(store.get(Entity::from_raw(2)), Affine::IDENTITY);
	}
}
