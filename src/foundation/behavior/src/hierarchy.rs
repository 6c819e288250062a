//! Parent/child relations and cascading dirty propagation (spec.md §4.6).
//!
//! `Parent` is an ordinary value behavior (§4.3) whose value is the parent
//! `Entity` — `World::set_parent`/`clear_parent` validate the request and
//! then drive it through `behavior::set_shared`/`remove_shared`, so the
//! same `BehaviorAdded`/`PreBehaviorUpdated`/`PostBehaviorUpdated`/
//! `PreBehaviorRemoved` contract other behaviors get applies here too. The
//! children-set bookkeeping below is kept in sync purely by subscribing to
//! those four events — nothing outside this module writes directly into
//! `HierarchyRegistry::children`.

use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::behavior::BehaviorRegistry;
use crate::entity::Entity;
use crate::event::{
	BehaviorAdded, EventBus, PostBehaviorUpdated, PreBehaviorRemoved, PreBehaviorUpdated, PreEntityDeactivated,
};

/// The `Parent` value behavior. `None` means "this `set` call hasn't run
/// yet" and is never observable once `BehaviorAdded<Parent>` has fired,
/// since `World::set_parent` always supplies a concrete parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parent(pub Option<Entity>);

/// Bidirectional index of parent/children edges. The forward edge (child's
/// parent) lives in the `Parent` behavior itself; this registry only keeps
/// the reverse index (parent's children), since that's the direction
/// `BehaviorRegistry<Parent>` can't answer in O(1).
#[derive(Debug)]
pub struct HierarchyRegistry {
	children: Vec<SmallVec<[Entity; 4]>>,
}

impl HierarchyRegistry {
	pub fn new(capacity: usize) -> Self {
		Self {
			children: vec![SmallVec::new(); capacity],
		}
	}

	pub fn children_of(&self, entity: Entity) -> &[Entity] {
		&self.children[entity.index_usize()]
	}

	fn add_child(&mut self, parent: Entity, child: Entity) {
		let set = &mut self.children[parent.index_usize()];
		if !set.contains(&child) {
			set.push(child);
		}
	}

	fn remove_child(&mut self, parent: Entity, child: Entity) {
		let set = &mut self.children[parent.index_usize()];
		set.retain(|&mut c| c != child);
	}

	/// Debug-only check for spec.md §8 invariant 2: `entity` appears in at
	/// most one parent's children-set, and that set is exactly the one
	/// `parents` names for it (SPEC_FULL.md §10). Never called outside a
	/// `debug_assert!`, so the O(capacity) scan never runs in release
	/// builds.
	fn is_consistent_for(&self, parents: &BehaviorRegistry<Parent>, entity: Entity) -> bool {
		let own_parent = parents.try_get(entity).and_then(|p| p.0);
		let found_in: Vec<Entity> = self
			.children
			.iter()
			.enumerate()
			.filter(|(_, set)| set.contains(&entity))
			.map(|(i, _)| Entity::from_raw(i as u16))
			.collect();

		match own_parent {
			Some(p) => found_in.len() == 1 && found_in[0] == p,
			None => found_in.is_empty(),
		}
	}
}

/// Wires the four `Parent` lifecycle events to `HierarchyRegistry`'s
/// reverse-index bookkeeping, plus a fifth subscription that orphans a
/// deactivating entity's children. Called once at `World` construction.
///
/// `parents` is read (never written) from inside these handlers — the
/// event ordering guarantees the value is already up to date by the time
/// each handler runs (e.g. on `PreBehaviorUpdated<Parent>` the *old* value
/// is still in place; by `PostBehaviorUpdated<Parent>` the *new* one is).
///
/// `PreEntityDeactivated` fires before `World` clears the deactivating
/// entity's own slot, so its children (if any) are still active when their
/// `Parent` is cleared here — `clear_parent`'s usual cascade to
/// `HierarchyRegistry` runs unchanged.
pub fn install(
	bus: &mut EventBus,
	hierarchy: Rc<RefCell<HierarchyRegistry>>,
	parents: Rc<RefCell<BehaviorRegistry<Parent>>>,
) {
	{
		let hierarchy = hierarchy.clone();
		let parents = parents.clone();
		bus.register::<BehaviorAdded<Parent>>(move |_, event| {
			if let Some(Parent(Some(new_parent))) = parents.borrow().try_get(event.entity).copied() {
				hierarchy.borrow_mut().add_child(new_parent, event.entity);
			}
			debug_assert!(
				hierarchy.borrow().is_consistent_for(&parents.borrow(), event.entity),
				"children-set out of sync with Parent behavior after BehaviorAdded<Parent>"
			);
		});
	}
	{
		let hierarchy = hierarchy.clone();
		let parents = parents.clone();
		bus.register::<PreBehaviorUpdated<Parent>>(move |_, event| {
			if let Some(Parent(Some(old_parent))) = parents.borrow().try_get(event.entity).copied() {
				hierarchy.borrow_mut().remove_child(old_parent, event.entity);
			}
			// `parents` still holds the old value here (this runs *before* the
			// update), so `event.entity` is transiently parentless in both
			// indexes — nothing to assert until `PostBehaviorUpdated` below.
		});
	}
	{
		let hierarchy = hierarchy.clone();
		let parents = parents.clone();
		bus.register::<PostBehaviorUpdated<Parent>>(move |_, event| {
			if let Some(Parent(Some(new_parent))) = parents.borrow().try_get(event.entity).copied() {
				hierarchy.borrow_mut().add_child(new_parent, event.entity);
			}
			debug_assert!(
				hierarchy.borrow().is_consistent_for(&parents.borrow(), event.entity),
				"children-set out of sync with Parent behavior after PostBehaviorUpdated<Parent>"
			);
		});
	}
	{
		let hierarchy = hierarchy.clone();
		let parents = parents.clone();
		bus.register::<PreBehaviorRemoved<Parent>>(move |_, event| {
			if let Some(Parent(Some(old_parent))) = parents.borrow().try_get(event.entity).copied() {
				hierarchy.borrow_mut().remove_child(old_parent, event.entity);
			}
			// `parents` still holds the old value here (`remove_shared` clears
			// it only after this handler returns), so `event.entity` is
			// transiently "removed from children_of, but still reads as
			// parented" — the same transient window as `PreBehaviorUpdated`
			// above, nothing to assert.
		});
	}
	{
		let hierarchy = hierarchy.clone();
		let parents = parents.clone();
		bus.register::<PreEntityDeactivated>(move |bus, event| {
			let children: Vec<Entity> = hierarchy.borrow().children_of(event.entity).to_vec();
			for child in children {
				crate::behavior::remove_shared(bus, &parents, child);
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wired() -> (EventBus, Rc<RefCell<HierarchyRegistry>>, Rc<RefCell<BehaviorRegistry<Parent>>>) {
		let mut bus = EventBus::new();
		let hierarchy = Rc::new(RefCell::new(HierarchyRegistry::new(8)));
		let parents = Rc::new(RefCell::new(BehaviorRegistry::new(8)));
		install(&mut bus, hierarchy.clone(), parents.clone());
		(bus, hierarchy, parents)
	}

	#[test]
	fn set_parent_populates_children_of() {
		let (mut bus, hierarchy, parents) = wired();
		let parent = Entity::from_raw(0);
		let child = Entity::from_raw(1);

		crate::behavior::set_shared(&mut bus, &parents, child, |p| p.0 = Some(parent));

		assert_eq!(hierarchy.borrow().children_of(parent), &[child]);
	}

	#[test]
	fn reparenting_moves_child_out_of_old_set() {
		let (mut bus, hierarchy, parents) = wired();
		let (old_parent, new_parent, child) = (Entity::from_raw(0), Entity::from_raw(1), Entity::from_raw(2));

		crate::behavior::set_shared(&mut bus, &parents, child, |p| p.0 = Some(old_parent));
		crate::behavior::set_shared(&mut bus, &parents, child, |p| p.0 = Some(new_parent));

		assert!(hierarchy.borrow().children_of(old_parent).is_empty());
		assert_eq!(hierarchy.borrow().children_of(new_parent), &[child]);
	}

	#[test]
	fn clearing_parent_removes_from_children_of() {
		let (mut bus, hierarchy, parents) = wired();
		let parent = Entity::from_raw(0);
		let child = Entity::from_raw(1);
		crate::behavior::set_shared(&mut bus, &parents, child, |p| p.0 = Some(parent));

		crate::behavior::remove_shared(&mut bus, &parents, child);

		assert!(hierarchy.borrow().children_of(parent).is_empty());
	}

	#[test]
	fn deactivating_a_parent_orphans_its_children() {
		let (mut bus, hierarchy, parents) = wired();
		let parent = Entity::from_raw(0);
		let child_a = Entity::from_raw(1);
		let child_b = Entity::from_raw(2);
		crate::behavior::set_shared(&mut bus, &parents, child_a, |p| p.0 = Some(parent));
		crate::behavior::set_shared(&mut bus, &parents, child_b, |p| p.0 = Some(parent));

		bus.push(PreEntityDeactivated { entity: parent });

		assert!(hierarchy.borrow().children_of(parent).is_empty());
		assert_eq!(parents.borrow().try_get(child_a), None);
		assert_eq!(parents.borrow().try_get(child_b), None);
	}
}
