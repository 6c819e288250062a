//! Dirty-set plumbing (spec.md §4.7): subscribes to the `Transform` and
//! `Parent` lifecycle events and marks the affected entity dirty. Backed as
//! an `FxHashSet<Entity>` rather than a literal bitset — see
//! SPEC_FULL.md §4.7 for why that still satisfies the spec's complexity
//! bounds.

use std::cell::RefCell;
use std::rc::Rc;

use fxhash::FxHashSet;

use crate::backed_behavior::Transform;
use crate::entity::Entity;
use crate::event::{BehaviorAdded, EventBus, PostBehaviorUpdated, PreBehaviorRemoved, PreBehaviorUpdated};
use crate::hierarchy::Parent;

#[derive(Debug, Default)]
pub struct DirtySet {
	entities: FxHashSet<Entity>,
}

impl DirtySet {
	pub fn insert(&mut self, entity: Entity) {
		self.entities.insert(entity);
	}

	pub fn remove(&mut self, entity: Entity) {
		self.entities.remove(&entity);
	}

	pub fn contains(&self, entity: Entity) -> bool {
		self.entities.contains(&entity)
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Drains the current membership into a `Vec`, leaving the set empty.
	/// Used by `recalculate()`'s scatter loop to snapshot one round at a
	/// time (spec.md §4.9 step 3a).
	pub fn drain_snapshot(&mut self) -> Vec<Entity> {
		self.entities.drain().collect()
	}

	pub fn snapshot(&self) -> Vec<Entity> {
		self.entities.iter().copied().collect()
	}
}

/// Wires the dirty-set subscriptions described in spec.md §4.7:
/// - `BehaviorAdded<Transform>` / `PostBehaviorUpdated<Transform>` dirty
///   the entity itself. (Resetting the pipeline-owned caches on first
///   install is `backed_behavior::set_transform`'s job, not this
///   subscription's — it has to happen before this event even fires.)
/// - `PreBehaviorRemoved<Transform>` drops the entity from the dirty set
///   (it no longer has a transform to recompute); column resets are
///   likewise `remove_transform`'s job.
/// - `BehaviorAdded<Parent>` / `PostBehaviorUpdated<Parent>` /
///   `PreBehaviorRemoved<Parent>` dirty the *child* (the entity the event
///   fired for), since its world transform now depends on a different
///   parent chain.
pub fn install(bus: &mut EventBus, dirty: Rc<RefCell<DirtySet>>) {
	{
		let dirty = dirty.clone();
		bus.register::<BehaviorAdded<Transform>>(move |_, event| {
			dirty.borrow_mut().insert(event.entity);
		});
	}
	{
		let dirty = dirty.clone();
		bus.register::<PostBehaviorUpdated<Transform>>(move |_, event| {
			dirty.borrow_mut().insert(event.entity);
		});
	}
	{
		let dirty = dirty.clone();
		bus.register::<PreBehaviorRemoved<Transform>>(move |_, event| {
			dirty.borrow_mut().remove(event.entity);
		});
	}
	{
		let dirty = dirty.clone();
		bus.register::<BehaviorAdded<Parent>>(move |_, event| {
			dirty.borrow_mut().insert(event.entity);
		});
	}
	{
		let dirty = dirty.clone();
		bus.register::<PostBehaviorUpdated<Parent>>(move |_, event| {
			dirty.borrow_mut().insert(event.entity);
		});
	}
	{
		bus.register::<PreBehaviorRemoved<Parent>>(move |_, event| {
			dirty.borrow_mut().insert(event.entity);
		});
	}
}
