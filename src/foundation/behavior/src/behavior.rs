//! Value-flavor behavior storage (spec.md §4.3).
//!
//! Generic over any behavior type `B: Default`, stored as `Box<[Option<B>]>`
//! sized to `MaxEntities` — a direct-indexed slice rather than a hash map,
//! since entity indices are already a dense bounded range (SPEC_FULL.md
//! §4.3).

use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::Entity;
use crate::error::BehaviorError;
use crate::event::{BehaviorAdded, Error as ErrorEvent, EventBus, PostBehaviorUpdated, PreBehaviorRemoved, PreBehaviorUpdated};

#[derive(Debug)]
pub struct BehaviorRegistry<B> {
	slots: Box<[Option<B>]>,
	in_flight: Box<[bool]>,
}

impl<B: Default + 'static> BehaviorRegistry<B> {
	pub fn new(capacity: usize) -> Self {
		let slots = (0..capacity).map(|_| None).collect::<Vec<_>>().into_boxed_slice();
		let in_flight = vec![false; capacity].into_boxed_slice();
		Self { slots, in_flight }
	}

	pub fn has(&self, entity: Entity) -> bool {
		self.slots[entity.index_usize()].is_some()
	}

	pub fn try_get(&self, entity: Entity) -> Option<&B> {
		self.slots[entity.index_usize()].as_ref()
	}

	pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut B> {
		self.slots[entity.index_usize()].as_mut()
	}

	/// Creates-or-mutates `entity`'s record without firing any event.
	/// Returns `true` if this was the entity's first record. Building
	/// block for `set` and for `set_shared`, which add event dispatch
	/// around this with different borrow-scoping needs.
	pub fn write(&mut self, entity: Entity, init: impl FnOnce(&mut B)) -> bool {
		let index = entity.index_usize();
		let first_time = self.slots[index].is_none();
		if first_time {
			let mut value = B::default();
			init(&mut value);
			self.slots[index] = Some(value);
		} else {
			init(self.slots[index]
				.as_mut()
				.expect("slot checked Some above and is not reentrantly cleared"));
		}
		first_time
	}

	/// Clears `entity`'s record without firing any event. Returns `true` if
	/// a record was present.
	pub fn clear(&mut self, entity: Entity) -> bool {
		let index = entity.index_usize();
		let was_present = self.slots[index].is_some();
		self.slots[index] = None;
		was_present
	}

	fn is_in_flight(&self, entity: Entity) -> bool {
		self.in_flight[entity.index_usize()]
	}

	fn set_in_flight(&mut self, entity: Entity, value: bool) {
		self.in_flight[entity.index_usize()] = value;
	}

	/// Creates the behavior with `B::default()` and runs `init` on it if
	/// this is the entity's first record, firing `BehaviorAdded<B>`.
	/// Otherwise runs `init` on the existing value between
	/// `PreBehaviorUpdated<B>` and `PostBehaviorUpdated<B>`. Exactly one of
	/// the two event shapes fires per call (spec.md §8 invariant 1).
	///
	/// Only safe to call on a registry that isn't reachable through an
	/// `Rc<RefCell<_>>` any event handler might also borrow — this method
	/// holds `self` borrowed for the whole dispatch. Registries shared that
	/// way (e.g. `Parent`) go through `set_shared` instead.
	pub fn set(&mut self, bus: &mut EventBus, entity: Entity, init: impl FnOnce(&mut B)) {
		if self.has(entity) {
			bus.push(PreBehaviorUpdated::<B>::new(entity));
			self.write(entity, init);
			bus.push(PostBehaviorUpdated::<B>::new(entity));
		} else {
			self.write(entity, init);
			bus.push(BehaviorAdded::<B>::new(entity));
		}
	}

	/// Clears the record if present, firing `PreBehaviorRemoved<B>` first so
	/// subscribers can still read the old value. No-op, no event, if the
	/// entity never had this behavior (spec.md §8 boundary behavior).
	///
	/// Same sharing caveat as `set`.
	pub fn remove(&mut self, bus: &mut EventBus, entity: Entity) {
		if self.has(entity) {
			bus.push(PreBehaviorRemoved::<B>::new(entity));
			self.clear(entity);
		}
	}
}

/// Mutates a registry shared behind `Rc<RefCell<_>>` and fires the matching
/// event(s), without ever holding the registry borrowed while dispatching —
/// so a handler subscribed to that same event is free to `borrow()`/
/// `borrow_mut()` the same `Rc` reentrantly. This is what lets
/// `hierarchy::install`'s handlers read `Parent`'s own value from inside
/// `Parent`'s own event handlers without panicking on a double borrow.
///
/// Reentrant mutation of the *same* `(entity, B)` pair from within a handler
/// triggered by this very call is undefined per spec.md §9 and is rejected
/// here: the nested call reports `BehaviorError::HandlerPanic` and leaves
/// the entity untouched rather than silently interleaving with the
/// in-flight mutation.
pub fn set_shared<B: Default + 'static>(
	bus: &mut EventBus,
	registry: &Rc<RefCell<BehaviorRegistry<B>>>,
	entity: Entity,
	init: impl FnOnce(&mut B),
) {
	if registry.borrow().is_in_flight(entity) {
		bus.push(ErrorEvent::new(BehaviorError::HandlerPanic {
			event_type: std::any::type_name::<B>(),
		}));
		return;
	}
	registry.borrow_mut().set_in_flight(entity, true);

	let first_time = !registry.borrow().has(entity);
	if first_time {
		registry.borrow_mut().write(entity, init);
		bus.push(BehaviorAdded::<B>::new(entity));
	} else {
		bus.push(PreBehaviorUpdated::<B>::new(entity));
		registry.borrow_mut().write(entity, init);
		bus.push(PostBehaviorUpdated::<B>::new(entity));
	}

	registry.borrow_mut().set_in_flight(entity, false);
}

/// Shared-safe counterpart to `remove`. See `set_shared`.
pub fn remove_shared<B: Default + 'static>(
	bus: &mut EventBus,
	registry: &Rc<RefCell<BehaviorRegistry<B>>>,
	entity: Entity,
) {
	if registry.borrow().is_in_flight(entity) {
		bus.push(ErrorEvent::new(BehaviorError::HandlerPanic {
			event_type: std::any::type_name::<B>(),
		}));
		return;
	}

	let was_present = registry.borrow().has(entity);
	if was_present {
		registry.borrow_mut().set_in_flight(entity, true);
		bus.push(PreBehaviorRemoved::<B>::new(entity));
		registry.borrow_mut().clear(entity);
		registry.borrow_mut().set_in_flight(entity, false);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Default, PartialEq)]
	struct Health {
		hp: u32,
	}

	#[test]
	fn first_set_fires_added_not_updated() {
		let mut bus = EventBus::new();
		let mut reg = BehaviorRegistry::<Health>::new(4);
		let e = Entity::from_raw(0);

		let added = std::rc::Rc::new(std::cell::Cell::new(false));
		let updated = std::rc::Rc::new(std::cell::Cell::new(false));
		let (a, u) = (added.clone(), updated.clone());
		bus.register::<BehaviorAdded<Health>>(move |_, _| a.set(true));
		bus.register::<PostBehaviorUpdated<Health>>(move |_, _| u.set(true));

		reg.set(&mut bus, e, |h| h.hp = 10);

		assert!(added.get());
		assert!(!updated.get());
		assert_eq!(reg.try_get(e), Some(&Health { hp: 10 }));
	}

	#[test]
	fn second_set_fires_pre_and_post_updated_not_added() {
		let mut bus = EventBus::new();
		let mut reg = BehaviorRegistry::<Health>::new(4);
		let e = Entity::from_raw(0);
		reg.set(&mut bus, e, |h| h.hp = 10);

		let added = std::rc::Rc::new(std::cell::Cell::new(0));
		let pre = std::rc::Rc::new(std::cell::Cell::new(0));
		let post = std::rc::Rc::new(std::cell::Cell::new(0));
		let (a, p, o) = (added.clone(), pre.clone(), post.clone());
		bus.register::<BehaviorAdded<Health>>(move |_, _| a.set(a.get() + 1));
		bus.register::<PreBehaviorUpdated<Health>>(move |_, _| p.set(p.get() + 1));
		bus.register::<PostBehaviorUpdated<Health>>(move |_, _| o.set(o.get() + 1));

		reg.set(&mut bus, e, |h| h.hp = 20);

		assert_eq!(added.get(), 0);
		assert_eq!(pre.get(), 1);
		assert_eq!(post.get(), 1);
		assert_eq!(reg.try_get(e), Some(&Health { hp: 20 }));
	}

	#[test]
	fn remove_on_absent_behavior_is_a_silent_no_op() {
		let mut bus = EventBus::new();
		let mut reg = BehaviorRegistry::<Health>::new(4);
		let fired = std::rc::Rc::new(std::cell::Cell::new(false));
		let f = fired.clone();
		bus.register::<PreBehaviorRemoved<Health>>(move |_, _| f.set(true));

		reg.remove(&mut bus, Entity::from_raw(0));

		assert!(!fired.get());
	}

	#[test]
	fn reentrant_set_on_the_same_entity_is_rejected_with_an_error() {
		let mut bus = EventBus::new();
		let reg = Rc::new(RefCell::new(BehaviorRegistry::<Health>::new(4)));
		let e = Entity::from_raw(0);

		let inner = reg.clone();
		bus.register::<BehaviorAdded<Health>>(move |bus, event| {
			set_shared(bus, &inner, event.entity, |h| h.hp = 999);
		});
		let errors = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
		let e2 = errors.clone();
		bus.register::<crate::event::Error>(move |_, event| e2.borrow_mut().push(format!("{}", event.error)));

		set_shared(&mut bus, &reg, e, |h| h.hp = 10);

		assert_eq!(reg.borrow().try_get(e), Some(&Health { hp: 10 }));
		assert_eq!(errors.borrow().len(), 1);
	}
}
