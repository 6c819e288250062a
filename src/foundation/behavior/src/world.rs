//! `World`: the single owning struct tying together the entity registry,
//! event bus, hierarchy, and transform pipeline (spec.md §9, "the latter is
//! recommended").

use std::cell::RefCell;
use std::rc::Rc;

use crate::backed_behavior::{BackedBehaviorRegistry, Transform, TransformHandle, TransformStores};
use crate::behavior::BehaviorRegistry;
use crate::entity::{Entity, EntityRegistry, Partition, WorldCapacity};
use crate::error::{BehaviorError, InvalidParentReason};
use crate::event::{Error as ErrorEvent, EventBus, Initialize, PostEntityDeactivated, PreEntityDeactivated, Reset, Shutdown};
use crate::hierarchy::{self, HierarchyRegistry, Parent};
use crate::transform::TransformPipeline;

/// Owns every registry plus the event bus and drives the teardown protocol
/// (spec.md §4.2) and the `Initialize`/`Reset`/`Shutdown` lifecycle (§4.10).
/// One `World` per program, per the source's own design note (§9).
pub struct World {
	entities: EntityRegistry,
	bus: EventBus,
	hierarchy: Rc<RefCell<HierarchyRegistry>>,
	parents: Rc<RefCell<BehaviorRegistry<Parent>>>,
	transforms: Rc<RefCell<BackedBehaviorRegistry<Transform>>>,
	transform_pipeline: TransformPipeline,
}

impl World {
	pub fn new(capacity: WorldCapacity) -> Self {
		let max = capacity.max_entities() as usize;
		let mut bus = EventBus::new();
		let hierarchy = Rc::new(RefCell::new(HierarchyRegistry::new(max)));
		let parents = Rc::new(RefCell::new(BehaviorRegistry::new(max)));
		let transforms = Rc::new(RefCell::new(BackedBehaviorRegistry::new(max)));
		let transform_pipeline = TransformPipeline::new(max, &mut bus);
		hierarchy::install(&mut bus, hierarchy.clone(), parents.clone());

		Self {
			entities: EntityRegistry::new(capacity),
			bus,
			hierarchy,
			parents,
			transforms,
			transform_pipeline,
		}
	}

	pub fn capacity(&self) -> WorldCapacity {
		self.entities.capacity()
	}

	/// Total slots reserved for `partition`, for callers (e.g. a scene
	/// loader, spec.md §6) that want to check for room before streaming in
	/// a batch of entities.
	pub fn capacity_of(&self, partition: Partition) -> usize {
		self.entities.capacity_of(partition)
	}

	/// Number of currently active entities in `partition`.
	pub fn len_of(&self, partition: Partition) -> usize {
		self.entities.len_of(partition)
	}

	pub fn bus_mut(&mut self) -> &mut EventBus {
		&mut self.bus
	}

	/// Allocates an entity from the scene partition. Reports
	/// `CapacityExhausted` and returns `None` if the partition is full.
	pub fn activate(&mut self) -> Option<Entity> {
		let entity = self.entities.activate();
		if entity.is_none() {
			self.bus.push(ErrorEvent::new(BehaviorError::CapacityExhausted {
				partition: Partition::Scene,
			}));
		}
		entity
	}

	/// Allocates an entity from the global partition (survives `reset`).
	pub fn activate_global(&mut self) -> Option<Entity> {
		let entity = self.entities.activate_global();
		if entity.is_none() {
			self.bus.push(ErrorEvent::new(BehaviorError::CapacityExhausted {
				partition: Partition::Global,
			}));
		}
		entity
	}

	pub fn get(&self, index: u16) -> Entity {
		self.entities.get(index)
	}

	pub fn is_active(&self, entity: Entity) -> bool {
		self.entities.is_active(entity)
	}

	pub fn is_enabled(&self, entity: Entity) -> bool {
		self.entities.is_enabled(entity)
	}

	pub fn set_enabled(&mut self, entity: Entity, enabled: bool) {
		self.entities.set_enabled(entity, enabled);
	}

	/// Installs or mutates `entity`'s `Transform`, running `init` against a
	/// `TransformHandle` into the backing columns. See
	/// `backed_behavior::set_transform`.
	pub fn set_transform(&mut self, entity: Entity, init: impl FnOnce(&mut TransformHandle)) {
		let stores = self.transform_pipeline.stores();
		crate::backed_behavior::set_transform(&mut self.bus, &self.transforms, &stores, entity, init);
	}

	pub fn has_transform(&self, entity: Entity) -> bool {
		self.transforms.borrow().has(entity)
	}

	/// Assigns `child`'s parent, validating that `parent` is active and that
	/// the assignment would not create a cycle (spec.md §4.6). On failure,
	/// reports `InvalidParent` and leaves the current parent edge unchanged.
	pub fn set_parent(&mut self, child: Entity, parent: Entity) {
		if !self.entities.is_active(parent) {
			self.bus.push(ErrorEvent::new(BehaviorError::InvalidParent {
				child,
				parent,
				reason: InvalidParentReason::ParentInactive,
			}));
			return;
		}
		if parent == child || self.is_ancestor(parent, child) {
			self.bus.push(ErrorEvent::new(BehaviorError::InvalidParent {
				child,
				parent,
				reason: InvalidParentReason::WouldCreateCycle,
			}));
			return;
		}

		crate::behavior::set_shared(&mut self.bus, &self.parents, child, |p| p.0 = Some(parent));
	}

	/// `true` if `candidate` appears among `entity`'s ancestors — i.e.,
	/// assigning `entity`'s parent to `candidate` would close a cycle.
	fn is_ancestor(&self, entity: Entity, candidate: Entity) -> bool {
		let mut cursor = entity;
		loop {
			let next = match self.parents.borrow().try_get(cursor) {
				Some(Parent(Some(p))) => *p,
				_ => return false,
			};
			if next == candidate {
				return true;
			}
			cursor = next;
		}
	}

	pub fn clear_parent(&mut self, child: Entity) {
		crate::behavior::remove_shared(&mut self.bus, &self.parents, child);
	}

	pub fn parent_of(&self, child: Entity) -> Option<Entity> {
		self.parents.borrow().try_get(child).and_then(|p| p.0)
	}

	pub fn children_of(&self, parent: Entity) -> Vec<Entity> {
		self.hierarchy.borrow().children_of(parent).to_vec()
	}

	pub fn recalculate(&mut self) {
		self.transform_pipeline.recalculate(&mut self.bus, &self.hierarchy.borrow());
	}

	pub fn is_dirty(&self, entity: Entity) -> bool {
		self.transform_pipeline.is_dirty(entity)
	}

	/// Runs the teardown protocol of spec.md §4.2: `PreEntityDeactivated`,
	/// then each behavior's removal path, then the entity's own flags are
	/// cleared, then `PostEntityDeactivated`. No-op if already inactive.
	pub fn deactivate(&mut self, entity: Entity) {
		if !self.entities.is_active(entity) {
			return;
		}

		self.bus.push(PreEntityDeactivated { entity });

		let stores = self.transform_pipeline.stores();
		crate::backed_behavior::remove_transform(&mut self.bus, &self.transforms, &stores, entity);
		crate::behavior::remove_shared(&mut self.bus, &self.parents, entity);
		// `remove_shared` above may have re-dirtied `entity` via its own
		// `PreBehaviorRemoved<Parent>` handler (see `transform::dirty`); a
		// deactivated slot must not linger in the dirty set (spec.md §4.10).
		self.transform_pipeline.undirty(entity);

		self.entities.clear_flags(entity);

		self.bus.push(PostEntityDeactivated { entity });
	}

	fn deactivate_partition(&mut self, partition: Partition) {
		let active: Vec<Entity> = self.entities.active_in(partition).collect();
		for entity in active {
			self.deactivate(entity);
		}
	}

	pub fn initialize(&mut self) {
		self.bus.push(Initialize);
	}

	/// Deactivates every entity in the scene partition. Global partition is
	/// untouched (spec.md §4.10).
	pub fn reset(&mut self) {
		self.bus.push(Reset);
		self.deactivate_partition(Partition::Scene);
	}

	/// Deactivates every partition.
	pub fn shutdown(&mut self) {
		self.bus.push(Shutdown);
		self.deactivate_partition(Partition::Loading);
		self.deactivate_partition(Partition::Scene);
		self.deactivate_partition(Partition::Global);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::backing::Vec3;

	fn small_capacity() -> WorldCapacity {
		WorldCapacity {
			max_loading_entities: 2,
			max_scene_entities: 4,
			max_global_entities: 2,
		}
	}

	#[test]
	fn activate_exhaustion_reports_capacity_error() {
		let mut world = World::new(small_capacity());
		let mut count = 0;
		while world.activate().is_some() {
			count += 1;
		}
		assert_eq!(count, 4);

		let errors = Rc::new(RefCell::new(0));
		let e = errors.clone();
		world.bus_mut().register::<ErrorEvent>(move |_, event| {
			if matches!(event.error, BehaviorError::CapacityExhausted { partition: Partition::Scene }) {
				*e.borrow_mut() += 1;
			}
		});
		assert!(world.activate().is_none());
		assert_eq!(*errors.borrow(), 1);
	}

	#[test]
	fn set_parent_then_deactivate_parent_orphans_child() {
		let mut world = World::new(small_capacity());
		let parent = world.activate().unwrap();
		let child = world.activate().unwrap();
		world.set_parent(child, parent);
		assert_eq!(world.parent_of(child), Some(parent));

		world.deactivate(parent);

		assert_eq!(world.parent_of(child), None);
		assert!(world.is_active(child));
		assert!(!world.is_active(parent));
	}

	#[test]
	fn deactivating_a_child_with_a_parent_leaves_it_out_of_the_dirty_set() {
		let mut world = World::new(small_capacity());
		let parent = world.activate().unwrap();
		let child = world.activate().unwrap();
		world.set_parent(child, parent);
		world.recalculate();
		assert!(!world.is_dirty(child));

		world.deactivate(child);

		// Losing its `Parent` on the way down would ordinarily re-dirty
		// `child` (it would become a root), but a deactivated slot has
		// nothing left to recompute.
		assert!(!world.is_dirty(child));
	}

	#[test]
	fn set_parent_rejects_cycle() {
		let mut world = World::new(small_capacity());
		let a = world.activate().unwrap();
		let b = world.activate().unwrap();
		world.set_parent(b, a);

		let errors = Rc::new(RefCell::new(0));
		let e = errors.clone();
		world.bus_mut().register::<ErrorEvent>(move |_, event| {
			if matches!(
				event.error,
				BehaviorError::InvalidParent {
					reason: InvalidParentReason::WouldCreateCycle,
					..
				}
			) {
				*e.borrow_mut() += 1;
			}
		});

		world.set_parent(a, b);

		assert_eq!(*errors.borrow(), 1);
		assert_eq!(world.parent_of(a), None);
	}

	#[test]
	fn set_parent_rejects_inactive_parent() {
		let mut world = World::new(small_capacity());
		let child = world.activate().unwrap();
		let inactive_parent = world.get(0);

		let errors = Rc::new(RefCell::new(0));
		let e = errors.clone();
		world.bus_mut().register::<ErrorEvent>(move |_, event| {
			if matches!(
				event.error,
				BehaviorError::InvalidParent {
					reason: InvalidParentReason::ParentInactive,
					..
				}
			) {
				*e.borrow_mut() += 1;
			}
		});

		world.set_parent(child, inactive_parent);

		assert_eq!(*errors.borrow(), 1);
		assert_eq!(world.parent_of(child), None);
	}

	#[test]
	fn deactivate_then_reactivate_resets_transform_columns() {
		let mut world = World::new(small_capacity());
		let e = world.activate().unwrap();
		world.set_transform(e, |t| t.set_position(Vec3 { x: 1.0, y: 2.0, z: 3.0 }));
		world.deactivate(e);

		let reactivated = world.activate().unwrap();
		assert_eq!(reactivated, e);
		assert!(!world.has_transform(reactivated));
	}

	#[test]
	fn reset_clears_scene_partition_but_not_global() {
		let mut world = World::new(small_capacity());
		let scene_entity = world.activate().unwrap();
		let global_entity = world.activate_global().unwrap();

		world.reset();

		assert!(!world.is_active(scene_entity));
		assert!(world.is_active(global_entity));
	}

	#[test]
	fn parent_child_recalculate_end_to_end() {
		let mut world = World::new(small_capacity());
		let parent = world.activate().unwrap();
		let child = world.activate().unwrap();
		world.set_transform(parent, |t| t.set_position(Vec3 { x: 100.0, y: 0.0, z: 0.0 }));
		world.set_transform(child, |t| t.set_position(Vec3 { x: 10.0, y: 0.0, z: 0.0 }));
		world.set_parent(child, parent);

		world.recalculate();

		assert!(!world.is_dirty(child));
		assert!(!world.is_dirty(parent));
	}
}
