//! World transform compute and scatter (spec.md §4.9): `W = L·P`, then the
//! result is copied into each child's `parent_world` cache and the child is
//! marked dirty for the next round.

use crate::backed_behavior::TransformStores;
use crate::backing::Affine;
use crate::entity::Entity;
use crate::hierarchy::HierarchyRegistry;

/// Composes `local` with `parent_world` into `world`, for every entity in
/// `batch`, over twelve column-parallel pipelines — the same shape as
/// `recompute_local_batch` (spec.md §4.9: "lane-parallel over the same
/// twelve cells"). Row-vector convention: `L` is applied first, `P` second
/// (`v * L * P`), matching `World = Local * ParentWorld`.
pub fn recompute_world_batch(stores: &mut TransformStores, batch: &[Entity]) {
	let indices: Vec<usize> = batch.iter().map(|e| e.index_usize()).collect();
	let n = indices.len();

	let l00: Vec<f32> = indices.iter().map(|&i| stores.local.m00[i]).collect();
	let l01: Vec<f32> = indices.iter().map(|&i| stores.local.m01[i]).collect();
	let l02: Vec<f32> = indices.iter().map(|&i| stores.local.m02[i]).collect();
	let l10: Vec<f32> = indices.iter().map(|&i| stores.local.m10[i]).collect();
	let l11: Vec<f32> = indices.iter().map(|&i| stores.local.m11[i]).collect();
	let l12: Vec<f32> = indices.iter().map(|&i| stores.local.m12[i]).collect();
	let l20: Vec<f32> = indices.iter().map(|&i| stores.local.m20[i]).collect();
	let l21: Vec<f32> = indices.iter().map(|&i| stores.local.m21[i]).collect();
	let l22: Vec<f32> = indices.iter().map(|&i| stores.local.m22[i]).collect();
	let ltx: Vec<f32> = indices.iter().map(|&i| stores.local.tx[i]).collect();
	let lty: Vec<f32> = indices.iter().map(|&i| stores.local.ty[i]).collect();
	let ltz: Vec<f32> = indices.iter().map(|&i| stores.local.tz[i]).collect();

	let p00: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m00[i]).collect();
	let p01: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m01[i]).collect();
	let p02: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m02[i]).collect();
	let p10: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m10[i]).collect();
	let p11: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m11[i]).collect();
	let p12: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m12[i]).collect();
	let p20: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m20[i]).collect();
	let p21: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m21[i]).collect();
	let p22: Vec<f32> = indices.iter().map(|&i| stores.parent_world.m22[i]).collect();
	let ptx: Vec<f32> = indices.iter().map(|&i| stores.parent_world.tx[i]).collect();
	let pty: Vec<f32> = indices.iter().map(|&i| stores.parent_world.ty[i]).collect();
	let ptz: Vec<f32> = indices.iter().map(|&i| stores.parent_world.tz[i]).collect();

	// Upper-3x3 product: row `i` of `L` dotted with column `j` of `P`.
	let mut w00 = vec![0.0; n];
	let mut w01 = vec![0.0; n];
	let mut w02 = vec![0.0; n];
	let mut w10 = vec![0.0; n];
	let mut w11 = vec![0.0; n];
	let mut w12 = vec![0.0; n];
	let mut w20 = vec![0.0; n];
	let mut w21 = vec![0.0; n];
	let mut w22 = vec![0.0; n];
	for k in 0..n {
		w00[k] = l00[k] * p00[k] + l01[k] * p10[k] + l02[k] * p20[k];
	}
	for k in 0..n {
		w01[k] = l00[k] * p01[k] + l01[k] * p11[k] + l02[k] * p21[k];
	}
	for k in 0..n {
		w02[k] = l00[k] * p02[k] + l01[k] * p12[k] + l02[k] * p22[k];
	}
	for k in 0..n {
		w10[k] = l10[k] * p00[k] + l11[k] * p10[k] + l12[k] * p20[k];
	}
	for k in 0..n {
		w11[k] = l10[k] * p01[k] + l11[k] * p11[k] + l12[k] * p21[k];
	}
	for k in 0..n {
		w12[k] = l10[k] * p02[k] + l11[k] * p12[k] + l12[k] * p22[k];
	}
	for k in 0..n {
		w20[k] = l20[k] * p00[k] + l21[k] * p10[k] + l22[k] * p20[k];
	}
	for k in 0..n {
		w21[k] = l20[k] * p01[k] + l21[k] * p11[k] + l22[k] * p21[k];
	}
	for k in 0..n {
		w22[k] = l20[k] * p02[k] + l21[k] * p12[k] + l22[k] * p22[k];
	}

	// Translation row: the local translation carried through `P`'s linear
	// part, plus `P`'s own translation.
	let mut wtx = vec![0.0; n];
	let mut wty = vec![0.0; n];
	let mut wtz = vec![0.0; n];
	for k in 0..n {
		wtx[k] = ltx[k] * p00[k] + lty[k] * p10[k] + ltz[k] * p20[k] + ptx[k];
	}
	for k in 0..n {
		wty[k] = ltx[k] * p01[k] + lty[k] * p11[k] + ltz[k] * p21[k] + pty[k];
	}
	for k in 0..n {
		wtz[k] = ltx[k] * p02[k] + lty[k] * p12[k] + ltz[k] * p22[k] + ptz[k];
	}

	for (k, &i) in indices.iter().enumerate() {
		stores.world.m00[i] = w00[k];
		stores.world.m01[i] = w01[k];
		stores.world.m02[i] = w02[k];
		stores.world.m10[i] = w10[k];
		stores.world.m11[i] = w11[k];
		stores.world.m12[i] = w12[k];
		stores.world.m20[i] = w20[k];
		stores.world.m21[i] = w21[k];
		stores.world.m22[i] = w22[k];
		stores.world.tx[i] = wtx[k];
		stores.world.ty[i] = wty[k];
		stores.world.tz[i] = wtz[k];
	}
}

/// Per-pair reference composition used only by tests, to cross-check
/// `recompute_world_batch` against a single `(L, P)` pair.
#[cfg(test)]
fn compose(a: Affine, b: Affine) -> Affine {
	let mut stores = TransformStores::new(1);
	let e = Entity::from_raw(0);
	stores.local.set(e, a);
	stores.parent_world.set(e, b);
	recompute_world_batch(&mut stores, &[e]);
	stores.world.get(e)
}

/// Copies `world[parent]` into `parent_world[child]` for every child of
/// every entity in `updated`, per the scatter step of spec.md §4.9.
/// Returns the set of children that were touched, so the caller can mark
/// them dirty for the next round.
pub fn scatter(stores: &mut TransformStores, hierarchy: &HierarchyRegistry, updated: &[Entity]) -> Vec<Entity> {
	let mut newly_dirty = Vec::new();
	for &entity in updated {
		let world = stores.world.get(entity);
		for &child in hierarchy.children_of(entity) {
			stores.parent_world.set(child, world);
			newly_dirty.push(child);
		}
	}
	newly_dirty
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn composing_with_identity_parent_is_a_no_op() {
		let l = Affine {
			tx: 1.0,
			ty: 2.0,
			tz: 3.0,
			..Affine::IDENTITY
		};
		assert_eq!(compose(l, Affine::IDENTITY), l);
	}

	#[test]
	fn translations_accumulate_through_composition() {
		let l = Affine {
			tx: 10.0,
			..Affine::IDENTITY
		};
		let p = Affine {
			tx: 100.0,
			..Affine::IDENTITY
		};
		let w = compose(l, p);
		assert_eq!((w.tx, w.ty, w.tz), (110.0, 0.0, 0.0));
	}
}
