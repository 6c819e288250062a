//! The transform pipeline: dirty-set plumbing (C7), local compute (C8),
//! and world compute + scatter (C9), tied together by `recalculate()`
//! implementing the five-step protocol of spec.md §4.9.

mod dirty;
mod local;
mod world;

use std::cell::RefCell;
use std::rc::Rc;

use fxhash::FxHashSet;

pub use dirty::DirtySet;
pub use local::{recompute_local_batch, recompute_local_scalar};
pub use world::{recompute_world_batch, scatter};

use crate::backed_behavior::TransformStores;
use crate::entity::Entity;
use crate::error::BehaviorError;
use crate::event::{EventBus, Error as ErrorEvent, PostBehaviorUpdated, WorldTransform};
use crate::hierarchy::HierarchyRegistry;

const MAX_SCATTER_ITERATIONS: u32 = 100;

/// Owns the dirty set and the transform backing stores, and drives
/// `recalculate()`. `TransformStores` is also reachable from `World`
/// directly (it's the same `Rc`), since `BehaviorRegistry`-style `set`
/// calls on the `Transform` behavior need to mutate it too.
pub struct TransformPipeline {
	dirty: Rc<RefCell<DirtySet>>,
	stores: Rc<RefCell<TransformStores>>,
}

impl TransformPipeline {
	pub fn new(capacity: usize, bus: &mut EventBus) -> Self {
		let dirty = Rc::new(RefCell::new(DirtySet::default()));
		let stores = Rc::new(RefCell::new(TransformStores::new(capacity)));
		dirty::install(bus, dirty.clone());
		Self { dirty, stores }
	}

	pub fn stores(&self) -> Rc<RefCell<TransformStores>> {
		self.stores.clone()
	}

	pub fn is_dirty(&self, entity: Entity) -> bool {
		self.dirty.borrow().contains(entity)
	}

	/// Drops `entity` from the dirty set unconditionally. Called as the
	/// last step of `World::deactivate`'s teardown protocol (spec.md
	/// §4.10, "the dirty set is cleared as part of teardown") — a
	/// deactivating entity may have been re-dirtied by its own
	/// `PreBehaviorRemoved<Parent>` handler (losing a parent ordinarily
	/// means "recompute me as a root"), but a dead slot has nothing left
	/// to recompute.
	pub fn undirty(&mut self, entity: Entity) {
		self.dirty.borrow_mut().remove(entity);
	}

	/// Runs the five-step protocol:
	/// 1. no-op if nothing is dirty.
	/// 2. recompute `local` once for the entities dirtied by direct
	///    `Transform`/`Parent` mutation.
	/// 3. loop: snapshot and drain the dirty set, recompute `world` for the
	///    snapshot, scatter into children's `parent_world`, re-dirty those
	///    children, repeat until nothing is left or the iteration cap
	///    trips.
	/// 4. fire `PostBehaviorUpdated<WorldTransform>` once per entity that
	///    was recomputed this call.
	pub fn recalculate(&mut self, bus: &mut EventBus, hierarchy: &HierarchyRegistry) {
		if self.dirty.borrow().is_empty() {
			return;
		}

		let initially_dirty = self.dirty.borrow().snapshot();
		{
			let mut stores = self.stores.borrow_mut();
			recompute_local_batch(&mut stores, &initially_dirty);
		}

		// A set, not a `Vec`: an entity dirtied by its own mutation and then
		// re-dirtied by a parent's scatter appears in two snapshots within
		// the same `recalculate()` call, but spec.md §4.9 step 4 fires
		// `PostBehaviorUpdated<WorldTransform>` once per entity per call.
		let mut updated_this_call: FxHashSet<Entity> = FxHashSet::default();
		let mut iterations = 0u32;
		loop {
			let snapshot = self.dirty.borrow_mut().drain_snapshot();
			if snapshot.is_empty() {
				break;
			}

			{
				let mut stores = self.stores.borrow_mut();
				recompute_world_batch(&mut stores, &snapshot);
			}
			updated_this_call.extend(snapshot.iter().copied());

			let newly_dirty = {
				let mut stores = self.stores.borrow_mut();
				scatter(&mut stores, hierarchy, &snapshot)
			};
			{
				let mut dirty = self.dirty.borrow_mut();
				for entity in newly_dirty {
					dirty.insert(entity);
				}
			}

			iterations += 1;
			if iterations > MAX_SCATTER_ITERATIONS {
				let remaining_dirty = self.dirty.borrow().snapshot().len();
				bus.push(ErrorEvent::new(BehaviorError::IterationLimitExceeded { remaining_dirty }));
				return;
			}
		}

		for entity in updated_this_call {
			bus.push(PostBehaviorUpdated::<WorldTransform>::new(entity));
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backed_behavior::{BackedBehaviorRegistry, Transform};
	use crate::backing::{Quat, Vec3};
	use crate::hierarchy::{HierarchyRegistry, Parent};

	struct Fixture {
		bus: EventBus,
		pipeline: TransformPipeline,
		transforms: Rc<RefCell<BackedBehaviorRegistry<Transform>>>,
		hierarchy: Rc<RefCell<HierarchyRegistry>>,
		parents: Rc<RefCell<crate::behavior::BehaviorRegistry<Parent>>>,
	}

	impl Fixture {
		fn new(capacity: usize) -> Self {
			let mut bus = EventBus::new();
			let pipeline = TransformPipeline::new(capacity, &mut bus);
			let hierarchy = Rc::new(RefCell::new(HierarchyRegistry::new(capacity)));
			let parents = Rc::new(RefCell::new(crate::behavior::BehaviorRegistry::new(capacity)));
			crate::hierarchy::install(&mut bus, hierarchy.clone(), parents.clone());
			Self {
				bus,
				pipeline,
				transforms: Rc::new(RefCell::new(BackedBehaviorRegistry::new(capacity))),
				hierarchy,
				parents,
			}
		}

		fn set_position(&mut self, entity: Entity, p: Vec3) {
			let stores = self.pipeline.stores();
			crate::backed_behavior::set_transform(&mut self.bus, &self.transforms, &stores, entity, |h| {
				h.set_position(p);
			});
		}

		fn set_parent(&mut self, child: Entity, parent: Entity) {
			crate::behavior::set_shared(&mut self.bus, &self.parents, child, |p| p.0 = Some(parent));
		}

		fn world_of(&self, entity: Entity) -> crate::backing::Affine {
			self.pipeline.stores().borrow().world.get(entity)
		}
	}

	#[test]
	fn recalculate_on_root_copies_local_into_world() {
		let mut fx = Fixture::new(4);
		let e = Entity::from_raw(0);
		fx.set_position(e, Vec3 { x: 10.0, y: 0.0, z: 0.0 });

		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());

		let w = fx.world_of(e);
		assert_eq!((w.tx, w.ty, w.tz), (10.0, 0.0, 0.0));
		assert!(!fx.pipeline.is_dirty(e));
	}

	#[test]
	fn child_world_transform_composes_through_parent() {
		let mut fx = Fixture::new(4);
		let parent = Entity::from_raw(0);
		let child = Entity::from_raw(1);
		fx.set_position(parent, Vec3 { x: 100.0, y: 0.0, z: 0.0 });
		fx.set_position(child, Vec3 { x: 10.0, y: 0.0, z: 0.0 });
		fx.set_parent(child, parent);

		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());

		let w = fx.world_of(child);
		assert_eq!((w.tx, w.ty, w.tz), (110.0, 0.0, 0.0));
	}

	#[test]
	fn reparenting_dirties_the_child_and_recomputes_its_world() {
		let mut fx = Fixture::new(4);
		let old_parent = Entity::from_raw(0);
		let new_parent = Entity::from_raw(1);
		let child = Entity::from_raw(2);
		fx.set_position(old_parent, Vec3 { x: 100.0, y: 0.0, z: 0.0 });
		fx.set_position(new_parent, Vec3 { x: -50.0, y: 0.0, z: 0.0 });
		fx.set_position(child, Vec3 { x: 10.0, y: 0.0, z: 0.0 });
		fx.set_parent(child, old_parent);
		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());
		assert_eq!(fx.world_of(child).tx, 110.0);

		fx.set_parent(child, new_parent);
		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());

		assert_eq!(fx.world_of(child).tx, -40.0);
	}

	#[test]
	fn child_dirtied_twice_in_one_call_fires_world_transform_once() {
		let mut fx = Fixture::new(4);
		let parent = Entity::from_raw(0);
		let child = Entity::from_raw(1);
		fx.set_position(child, Vec3 { x: 10.0, y: 0.0, z: 0.0 });
		fx.set_parent(child, parent);
		// `child` is now dirty both from its own `set_position` and from
		// `set_parent` (which also dirties it); `parent` is dirty too, so
		// the scatter step re-dirties `child` a second time within this
		// same `recalculate()` call.
		fx.set_position(parent, Vec3 { x: 100.0, y: 0.0, z: 0.0 });

		let hits = Rc::new(RefCell::new(0));
		let h = hits.clone();
		fx.bus.register::<PostBehaviorUpdated<WorldTransform>>(move |_, event| {
			if event.entity == child {
				*h.borrow_mut() += 1;
			}
		});

		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());

		assert_eq!(*hits.borrow(), 1);
		assert_eq!(fx.world_of(child).tx, 110.0);
	}

	#[test]
	fn idempotent_recalculate_fires_no_events_and_changes_nothing() {
		let mut fx = Fixture::new(4);
		let e = Entity::from_raw(0);
		fx.set_position(e, Vec3 { x: 1.0, y: 0.0, z: 0.0 });
		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());
		let before = fx.world_of(e);

		let fired = Rc::new(RefCell::new(false));
		let f = fired.clone();
		fx.bus.register::<PostBehaviorUpdated<WorldTransform>>(move |_, _| *f.borrow_mut() = true);
		fx.pipeline.recalculate(&mut fx.bus, &fx.hierarchy.borrow());

		assert_eq!(fx.world_of(e), before);
		assert!(!*fired.borrow());
	}

	#[test]
	fn removing_transform_resets_columns_and_clears_dirty() {
		let mut fx = Fixture::new(4);
		let e = Entity::from_raw(0);
		fx.set_position(e, Vec3 { x: 1.0, y: 0.0, z: 0.0 });

		let stores = fx.pipeline.stores();
		crate::backed_behavior::remove_transform(&mut fx.bus, &fx.transforms, &stores, e);

		assert!(!fx.pipeline.is_dirty(e));
		assert_eq!(stores.borrow().position.get(e), Vec3::default());
		assert_eq!(stores.borrow().rotation.get(e), Quat::default());
	}
}
