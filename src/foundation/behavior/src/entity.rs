//! Fixed-capacity entity slots and partitioned allocation (spec.md §3, §4.2).

use std::fmt;

/// A handle into the entity slot table. Identity is just the raw slot index;
/// there is no generation counter — callers that hold a stale `Entity` after
/// a `deactivate`/`activate` cycle will silently observe the new occupant,
/// which is the behavior spec.md §3 calls for ("reuse after deactivation is
/// allowed and expected").
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u16);

impl Entity {
	pub(crate) fn from_raw(index: u16) -> Self {
		Self(index)
	}

	pub fn index(self) -> u16 {
		self.0
	}

	pub(crate) fn index_usize(self) -> usize {
		self.0 as usize
	}
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Entity({})", self.0)
	}
}

/// Which of the three fixed-lifetime ranges an entity was allocated from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Partition {
	/// Used by the scene loader during ingest.
	Loading,
	/// Cleared on `World::reset`.
	Scene,
	/// Survives `reset`; cleared only on `shutdown`.
	Global,
}

/// Sizes of the three partitions, fixed for the lifetime of a `World`.
#[derive(Debug, Copy, Clone)]
pub struct WorldCapacity {
	pub max_loading_entities: u16,
	pub max_scene_entities: u16,
	pub max_global_entities: u16,
}

impl WorldCapacity {
	pub fn max_entities(&self) -> u16 {
		self.max_loading_entities + self.max_scene_entities + self.max_global_entities
	}

	fn range_of(&self, partition: Partition) -> std::ops::Range<u16> {
		let loading_end = self.max_loading_entities;
		let scene_end = loading_end + self.max_scene_entities;
		let global_end = scene_end + self.max_global_entities;

		match partition {
			Partition::Loading => 0..loading_end,
			Partition::Scene => loading_end..scene_end,
			Partition::Global => scene_end..global_end,
		}
	}

	/// Total number of slots reserved for `partition` (SPEC_FULL.md §4.2).
	pub fn capacity_of(&self, partition: Partition) -> usize {
		self.range_of(partition).len()
	}
}

#[derive(Debug, Copy, Clone, Default)]
struct Slot {
	active: bool,
	enabled: bool,
}

/// The slot table: fixed-capacity, partitioned, linear-scan allocation.
///
/// `activate`/`activate_global` scan their partition from its low end for the
/// first inactive slot per spec.md §4.2 — this is intentionally not a free
/// list; the spec only promises "first inactive slot", not constant-time
/// reuse, and a plain scan keeps the reuse order predictable for tests (S1-S6
/// always land on the lowest free index).
#[derive(Debug)]
pub struct EntityRegistry {
	capacity: WorldCapacity,
	slots: Box<[Slot]>,
}

impl EntityRegistry {
	pub fn new(capacity: WorldCapacity) -> Self {
		let len = capacity.max_entities() as usize;
		Self {
			capacity,
			slots: vec![Slot::default(); len].into_boxed_slice(),
		}
	}

	pub fn capacity(&self) -> WorldCapacity {
		self.capacity
	}

	fn scan_free(&mut self, partition: Partition) -> Option<Entity> {
		let range = self.capacity.range_of(partition);
		for index in range {
			if !self.slots[index as usize].active {
				self.slots[index as usize] = Slot {
					active: true,
					enabled: true,
				};
				let entity = Entity::from_raw(index);
				debug_assert!(
					self.capacity.range_of(partition).contains(&entity.index()),
					"activated slot outside its own partition's bounds"
				);
				return Some(entity);
			}
		}
		None
	}

	/// Total number of slots reserved for `partition` (SPEC_FULL.md §4.2).
	pub fn capacity_of(&self, partition: Partition) -> usize {
		self.capacity.capacity_of(partition)
	}

	/// Number of currently active entities in `partition` (SPEC_FULL.md
	/// §4.2) — what a scene loader checks before streaming in to see if
	/// there's room left.
	pub fn len_of(&self, partition: Partition) -> usize {
		self.active_in(partition).count()
	}

	pub fn activate(&mut self) -> Option<Entity> {
		self.scan_free(Partition::Scene)
	}

	pub fn activate_global(&mut self) -> Option<Entity> {
		self.scan_free(Partition::Global)
	}

	pub fn get(&self, index: u16) -> Entity {
		Entity::from_raw(index)
	}

	pub fn is_active(&self, entity: Entity) -> bool {
		self.slots[entity.index_usize()].active
	}

	pub fn is_enabled(&self, entity: Entity) -> bool {
		self.slots[entity.index_usize()].enabled
	}

	pub fn set_enabled(&mut self, entity: Entity, enabled: bool) {
		self.slots[entity.index_usize()].enabled = enabled;
	}

	/// Clears the `active`/`enabled` flags. Callers are responsible for first
	/// running the behavior-removal half of the teardown protocol
	/// (spec.md §4.2 step 2) — this only performs step 3.
	pub(crate) fn clear_flags(&mut self, entity: Entity) {
		debug_assert!(
			entity.index() < self.capacity.max_entities(),
			"entity index out of bounds for this World's total capacity"
		);
		self.slots[entity.index_usize()] = Slot::default();
	}

	pub fn active_in(&self, partition: Partition) -> impl Iterator<Item = Entity> + '_ {
		self.capacity
			.range_of(partition)
			.filter(move |&i| self.slots[i as usize].active)
			.map(Entity::from_raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small_capacity() -> WorldCapacity {
		WorldCapacity {
			max_loading_entities: 2,
			max_scene_entities: 3,
			max_global_entities: 2,
		}
	}

	#[test]
	fn activates_from_low_end_of_scene_partition() {
		let mut reg = EntityRegistry::new(small_capacity());
		let a = reg.activate().unwrap();
		let b = reg.activate().unwrap();
		assert_eq!(a.index(), 2); // scene partition starts after 2 loading slots
		assert_eq!(b.index(), 3);
	}

	#[test]
	fn capacity_exhausted_returns_none() {
		let mut reg = EntityRegistry::new(small_capacity());
		for _ in 0..3 {
			assert!(reg.activate().is_some());
		}
		assert!(reg.activate().is_none());
	}

	#[test]
	fn deactivated_slot_is_reused() {
		let mut reg = EntityRegistry::new(small_capacity());
		let a = reg.activate().unwrap();
		reg.clear_flags(a);
		let b = reg.activate().unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn global_partition_survives_independently() {
		let mut reg = EntityRegistry::new(small_capacity());
		let g = reg.activate_global().unwrap();
		assert_eq!(g.index(), 5); // after 2 loading + 3 scene
		assert!(reg.is_active(g));
	}

	#[test]
	fn capacity_of_and_len_of_track_partition_occupancy() {
		let mut reg = EntityRegistry::new(small_capacity());
		assert_eq!(reg.capacity_of(Partition::Scene), 3);
		assert_eq!(reg.len_of(Partition::Scene), 0);

		reg.activate().unwrap();
		reg.activate().unwrap();

		assert_eq!(reg.len_of(Partition::Scene), 2);
		assert_eq!(reg.capacity_of(Partition::Loading), 2);
		assert_eq!(reg.len_of(Partition::Loading), 0);
	}
}
