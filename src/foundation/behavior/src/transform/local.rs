//! Local transform compute (spec.md §4.8): `L = T(-a)·S(s)·R(q)·T(a)·T(p)`,
//! applied to row vectors (translation lives in the bottom row of the
//! conceptual 4x4, matching the column layout in `AffineStore`).
//!
//! `recompute_local_batch` writes each of the twelve output columns with
//! its own tight loop over the given entity slice, with no dependency
//! between loop iterations — the shape LLVM auto-vectorizes without an
//! explicit SIMD crate (SPEC_FULL.md §4.8). `recompute_local_scalar` is a
//! plain per-entity reference implementation built on `glam`, used only as
//! a test oracle.

use crate::backing::Affine;
use crate::backed_behavior::TransformStores;
use crate::entity::Entity;

/// Recomputes `stores.local` for every entity in `dirty`, reading
/// `position`/`rotation`/`scale`/`anchor`.
pub fn recompute_local_batch(stores: &mut TransformStores, dirty: &[Entity]) {
	let indices: Vec<usize> = dirty.iter().map(|e| e.index_usize()).collect();

	// Quaternion cross-terms, one pipeline per term.
	let xx: Vec<f32> = indices.iter().map(|&i| stores.rotation.x[i] * stores.rotation.x[i]).collect();
	let yy: Vec<f32> = indices.iter().map(|&i| stores.rotation.y[i] * stores.rotation.y[i]).collect();
	let zz: Vec<f32> = indices.iter().map(|&i| stores.rotation.z[i] * stores.rotation.z[i]).collect();
	let xy: Vec<f32> = indices.iter().map(|&i| stores.rotation.x[i] * stores.rotation.y[i]).collect();
	let xz: Vec<f32> = indices.iter().map(|&i| stores.rotation.x[i] * stores.rotation.z[i]).collect();
	let yz: Vec<f32> = indices.iter().map(|&i| stores.rotation.y[i] * stores.rotation.z[i]).collect();
	let wx: Vec<f32> = indices.iter().map(|&i| stores.rotation.w[i] * stores.rotation.x[i]).collect();
	let wy: Vec<f32> = indices.iter().map(|&i| stores.rotation.w[i] * stores.rotation.y[i]).collect();
	let wz: Vec<f32> = indices.iter().map(|&i| stores.rotation.w[i] * stores.rotation.z[i]).collect();

	let n = indices.len();
	let mut r00 = vec![0.0; n];
	let mut r01 = vec![0.0; n];
	let mut r02 = vec![0.0; n];
	let mut r10 = vec![0.0; n];
	let mut r11 = vec![0.0; n];
	let mut r12 = vec![0.0; n];
	let mut r20 = vec![0.0; n];
	let mut r21 = vec![0.0; n];
	let mut r22 = vec![0.0; n];

	for k in 0..n {
		r00[k] = 1.0 - 2.0 * (yy[k] + zz[k]);
	}
	for k in 0..n {
		r01[k] = 2.0 * (xy[k] + wz[k]);
	}
	for k in 0..n {
		r02[k] = 2.0 * (xz[k] - wy[k]);
	}
	for k in 0..n {
		r10[k] = 2.0 * (xy[k] - wz[k]);
	}
	for k in 0..n {
		r11[k] = 1.0 - 2.0 * (xx[k] + zz[k]);
	}
	for k in 0..n {
		r12[k] = 2.0 * (yz[k] + wx[k]);
	}
	for k in 0..n {
		r20[k] = 2.0 * (xz[k] + wy[k]);
	}
	for k in 0..n {
		r21[k] = 2.0 * (yz[k] - wx[k]);
	}
	for k in 0..n {
		r22[k] = 1.0 - 2.0 * (xx[k] + yy[k]);
	}

	// Fold the scale columns into the rotation rows: row i of the linear
	// part is scaled by s_i (this is the "multiply by the scale columns"
	// step from spec.md §4.8).
	let sx: Vec<f32> = indices.iter().map(|&i| stores.scale.x[i]).collect();
	let sy: Vec<f32> = indices.iter().map(|&i| stores.scale.y[i]).collect();
	let sz: Vec<f32> = indices.iter().map(|&i| stores.scale.z[i]).collect();

	let mut c00 = vec![0.0; n];
	let mut c01 = vec![0.0; n];
	let mut c02 = vec![0.0; n];
	let mut c10 = vec![0.0; n];
	let mut c11 = vec![0.0; n];
	let mut c12 = vec![0.0; n];
	let mut c20 = vec![0.0; n];
	let mut c21 = vec![0.0; n];
	let mut c22 = vec![0.0; n];

	for k in 0..n {
		c00[k] = sx[k] * r00[k];
	}
	for k in 0..n {
		c01[k] = sx[k] * r01[k];
	}
	for k in 0..n {
		c02[k] = sx[k] * r02[k];
	}
	for k in 0..n {
		c10[k] = sy[k] * r10[k];
	}
	for k in 0..n {
		c11[k] = sy[k] * r11[k];
	}
	for k in 0..n {
		c12[k] = sy[k] * r12[k];
	}
	for k in 0..n {
		c20[k] = sz[k] * r20[k];
	}
	for k in 0..n {
		c21[k] = sz[k] * r21[k];
	}
	for k in 0..n {
		c22[k] = sz[k] * r22[k];
	}

	// Translation row: t = a + p - a*C (pivot around the anchor, then move
	// to the final position).
	let ax: Vec<f32> = indices.iter().map(|&i| stores.anchor.x[i]).collect();
	let ay: Vec<f32> = indices.iter().map(|&i| stores.anchor.y[i]).collect();
	let az: Vec<f32> = indices.iter().map(|&i| stores.anchor.z[i]).collect();
	let px: Vec<f32> = indices.iter().map(|&i| stores.position.x[i]).collect();
	let py: Vec<f32> = indices.iter().map(|&i| stores.position.y[i]).collect();
	let pz: Vec<f32> = indices.iter().map(|&i| stores.position.z[i]).collect();

	let mut tx = vec![0.0; n];
	let mut ty = vec![0.0; n];
	let mut tz = vec![0.0; n];
	for k in 0..n {
		tx[k] = ax[k] + px[k] - (ax[k] * c00[k] + ay[k] * c10[k] + az[k] * c20[k]);
	}
	for k in 0..n {
		ty[k] = ay[k] + py[k] - (ax[k] * c01[k] + ay[k] * c11[k] + az[k] * c21[k]);
	}
	for k in 0..n {
		tz[k] = az[k] + pz[k] - (ax[k] * c02[k] + ay[k] * c12[k] + az[k] * c22[k]);
	}

	for (k, &i) in indices.iter().enumerate() {
		stores.local.m00[i] = c00[k];
		stores.local.m01[i] = c01[k];
		stores.local.m02[i] = c02[k];
		stores.local.m10[i] = c10[k];
		stores.local.m11[i] = c11[k];
		stores.local.m12[i] = c12[k];
		stores.local.m20[i] = c20[k];
		stores.local.m21[i] = c21[k];
		stores.local.m22[i] = c22[k];
		stores.local.tx[i] = tx[k];
		stores.local.ty[i] = ty[k];
		stores.local.tz[i] = tz[k];
	}
}

/// Reference per-entity implementation built from `glam`'s `Mat4`/`Quat`,
/// used only to cross-check `recompute_local_batch` in tests.
pub fn recompute_local_scalar(stores: &TransformStores, entity: Entity) -> Affine {
	let p = stores.position.get(entity);
	let q = stores.rotation.get(entity);
	let s = stores.scale.get(entity);
	let a = stores.anchor.get(entity);

	let p = glam::Vec3::new(p.x, p.y, p.z);
	let q = glam::Quat::from_xyzw(q.x, q.y, q.z, q.w);
	let s = glam::Vec3::new(s.x, s.y, s.z);
	let a = glam::Vec3::new(a.x, a.y, a.z);

	// `glam` multiplies column vectors (`M * v`), so the row-vector pipeline
	// above — "translate by -a, scale, rotate, translate by +a, translate
	// by p", applied left to right — is the *transpose* construction here:
	// rightmost applies first, and translating by `(a + p)` has to be the
	// outermost (leftmost) step rather than the innermost one. See
	// DESIGN.md for the derivation.
	let m = glam::Mat4::from_translation(a + p)
		* glam::Mat4::from_quat(q)
		* glam::Mat4::from_scale(s)
		* glam::Mat4::from_translation(-a);

	let cols = m.to_cols_array_2d();
	Affine {
		m00: cols[0][0],
		m01: cols[0][1],
		m02: cols[0][2],
		m10: cols[1][0],
		m11: cols[1][1],
		m12: cols[1][2],
		m20: cols[2][0],
		m21: cols[2][1],
		m22: cols[2][2],
		tx: cols[3][0],
		ty: cols[3][1],
		tz: cols[3][2],
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backing::{Quat, Vec3};

	fn entity_with(stores: &mut TransformStores, i: u16, p: Vec3, q: Quat, s: Vec3, a: Vec3) -> Entity {
		let e = Entity::from_raw(i);
		stores.position.set(e, p);
		stores.rotation.set(e, q);
		stores.scale.set(e, s);
		stores.anchor.set(e, a);
		e
	}

	#[test]
	fn position_only_translates() {
		let mut stores = TransformStores::new(4);
		let e = entity_with(
			&mut stores,
			0,
			Vec3 { x: 10.0, y: 0.0, z: 0.0 },
			Quat::default(),
			Vec3 { x: 1.0, y: 1.0, z: 1.0 },
			Vec3::default(),
		);
		recompute_local_batch(&mut stores, &[e]);
		let l = stores.local.get(e);
		assert_eq!(l, Affine { tx: 10.0, ty: 0.0, tz: 0.0, ..Affine::IDENTITY });
	}

	#[test]
	fn scale_only_produces_diagonal() {
		let mut stores = TransformStores::new(4);
		let e = entity_with(
			&mut stores,
			0,
			Vec3::default(),
			Quat::default(),
			Vec3 { x: 2.0, y: 2.0, z: 2.0 },
			Vec3::default(),
		);
		recompute_local_batch(&mut stores, &[e]);
		let l = stores.local.get(e);
		assert_eq!(l.m00, 2.0);
		assert_eq!(l.m11, 2.0);
		assert_eq!(l.m22, 2.0);
		assert_eq!((l.tx, l.ty, l.tz), (0.0, 0.0, 0.0));
	}

	#[test]
	fn rotation_about_offset_anchor_produces_compensating_translation() {
		let mut stores = TransformStores::new(4);
		let half_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
		let e = entity_with(
			&mut stores,
			0,
			Vec3::default(),
			Quat { x: 0.0, y: 0.0, z: half_sqrt2, w: half_sqrt2 },
			Vec3 { x: 1.0, y: 1.0, z: 1.0 },
			Vec3 { x: 5.0, y: 0.0, z: 0.0 },
		);
		recompute_local_batch(&mut stores, &[e]);
		let l = stores.local.get(e);
		assert!((l.m00 - 0.0).abs() < 1e-5);
		assert!((l.m01 - 1.0).abs() < 1e-5);
		assert!((l.m10 - -1.0).abs() < 1e-5);
		assert!((l.m11 - 0.0).abs() < 1e-5);
		assert!((l.tx - 5.0).abs() < 1e-4);
		assert!((l.ty - -5.0).abs() < 1e-4);
	}

	#[test]
	fn batched_and_scalar_oracle_agree() {
		let mut stores = TransformStores::new(4);
		let e = entity_with(
			&mut stores,
			0,
			Vec3 { x: 1.0, y: 2.0, z: 3.0 },
			Quat { x: 0.1, y: 0.2, z: 0.3, w: 0.9274260335 },
			Vec3 { x: 1.5, y: 0.5, z: 2.0 },
			Vec3 { x: 0.5, y: -0.5, z: 1.0 },
		);
		recompute_local_batch(&mut stores, &[e]);
		let batched = stores.local.get(e);
		let scalar = recompute_local_scalar(&stores, e);
		let fields = [
			(batched.m00, scalar.m00),
			(batched.m01, scalar.m01),
			(batched.m02, scalar.m02),
			(batched.m10, scalar.m10),
			(batched.m11, scalar.m11),
			(batched.m12, scalar.m12),
			(batched.m20, scalar.m20),
			(batched.m21, scalar.m21),
			(batched.m22, scalar.m22),
			(batched.tx, scalar.tx),
			(batched.ty, scalar.ty),
			(batched.tz, scalar.tz),
		];
		for (b, s) in fields {
			assert!((b - s).abs() < 1e-3, "batched={b} scalar={s}");
		}
	}
}
