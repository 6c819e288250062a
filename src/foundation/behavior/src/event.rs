//! Synchronous, single-threaded typed event bus (spec.md §4.1).
//!
//! Handlers are dispatched in registration order and are themselves handed a
//! `&mut EventBus`, so a handler can push further events (or register new
//! handlers) reentrantly without needing a `&mut World` on the stack — see
//! `World::deactivate`/`World::set_parent` for how callers thread this
//! through. This mirrors the way `src/core/src/ecs/event.rs`'s `EventQueue`
//! logs and drains its handler lists rather than holding them borrowed for
//! the whole dispatch.

use std::any::{Any, TypeId};
use std::collections::hash_map::Entry;
use std::fmt;

use derive_where::derive_where;
use fxhash::FxHashMap;

use crate::entity::Entity;
use crate::error::BehaviorError;

type Handler = Box<dyn FnMut(&mut EventBus, &dyn Any)>;

#[derive(Default)]
pub struct EventBus {
	handlers: FxHashMap<TypeId, Vec<Handler>>,
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventBus")
			.field("registered_types", &self.handlers.len())
			.finish()
	}
}

impl EventBus {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a handler for `E`. Handlers run in the order they were
	/// registered; a handler registered while `E` is currently dispatching
	/// is appended after the handlers already running this round, not
	/// spliced into the in-flight iteration.
	pub fn register<E: 'static>(&mut self, mut handler: impl FnMut(&mut EventBus, &E) + 'static) {
		let boxed: Handler = Box::new(move |bus, event| {
			let event = event
				.downcast_ref::<E>()
				.expect("event bus dispatched the wrong concrete type");
			handler(bus, event);
		});
		self.handlers.entry(TypeId::of::<E>()).or_default().push(boxed);
	}

	/// Fires `event` to every handler registered for `E`, in order.
	///
	/// Handlers are removed from the map before dispatch and reinserted
	/// afterwards, so a handler is free to call `push`/`register` again —
	/// including for the same `E` — without re-borrowing `self.handlers`
	/// while it's already "checked out" for this dispatch.
	pub fn push<E: 'static>(&mut self, event: E) {
		let ty = TypeId::of::<E>();
		let Some(mut handlers) = self.handlers.remove(&ty) else {
			log::trace!("no handlers registered for {}", std::any::type_name::<E>());
			return;
		};

		log::trace!(
			"dispatching {} to {} handler(s)",
			std::any::type_name::<E>(),
			handlers.len()
		);
		for handler in handlers.iter_mut() {
			handler(self, &event);
		}

		match self.handlers.entry(ty) {
			Entry::Occupied(mut occupied) => {
				let appended = std::mem::take(occupied.get_mut());
				handlers.extend(appended);
				*occupied.get_mut() = handlers;
			}
			Entry::Vacant(vacant) => {
				vacant.insert(handlers);
			}
		}
	}
}

/// Fired once after a value or backed behavior is added for the first time
/// on an entity. Never fires together with [`PostBehaviorUpdated`] for the
/// same `set` call.
#[derive_where(Debug, Clone, Copy)]
pub struct BehaviorAdded<B> {
	pub entity: Entity,
	_marker: std::marker::PhantomData<fn() -> B>,
}

/// Fired before an existing behavior's value is mutated by `set`. The old
/// value is still readable through the registry at this point.
#[derive_where(Debug, Clone, Copy)]
pub struct PreBehaviorUpdated<B> {
	pub entity: Entity,
	_marker: std::marker::PhantomData<fn() -> B>,
}

/// Fired after an existing behavior's value has been mutated by `set`.
#[derive_where(Debug, Clone, Copy)]
pub struct PostBehaviorUpdated<B> {
	pub entity: Entity,
	_marker: std::marker::PhantomData<fn() -> B>,
}

/// Fired before a behavior's record is cleared, while the old value is
/// still readable.
#[derive_where(Debug, Clone, Copy)]
pub struct PreBehaviorRemoved<B> {
	pub entity: Entity,
	_marker: std::marker::PhantomData<fn() -> B>,
}

macro_rules! behavior_event {
	($name:ident) => {
		impl<B> $name<B> {
			pub fn new(entity: Entity) -> Self {
				Self {
					entity,
					_marker: std::marker::PhantomData,
				}
			}
		}
	};
}

behavior_event!(BehaviorAdded);
behavior_event!(PreBehaviorUpdated);
behavior_event!(PostBehaviorUpdated);
behavior_event!(PreBehaviorRemoved);

/// Marker type used solely as the `B` parameter of `PostBehaviorUpdated`
/// when the transform pipeline finishes a `recalculate()` pass — there is no
/// `BehaviorRegistry<WorldTransform>`, world transforms live in backing
/// store columns, not a behavior record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldTransform;

#[derive(Debug, Clone, Copy)]
pub struct Initialize;

#[derive(Debug, Clone, Copy)]
pub struct Reset;

#[derive(Debug, Clone, Copy)]
pub struct Shutdown;

#[derive(Debug, Clone, Copy)]
pub struct PreEntityDeactivated {
	pub entity: Entity,
}

#[derive(Debug, Clone, Copy)]
pub struct PostEntityDeactivated {
	pub entity: Entity,
}

/// Payload of the catch-all `Error` event every reported `BehaviorError`
/// is wrapped in before being pushed to the bus (spec.md §7).
#[derive(Debug)]
pub struct Error {
	pub error: BehaviorError,
}

impl Error {
	pub fn new(error: BehaviorError) -> Self {
		Self { error }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Health;
	struct Transform;

	#[test]
	fn dispatches_in_registration_order() {
		let mut bus = EventBus::new();
		let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

		let log1 = log.clone();
		bus.register::<BehaviorAdded<Health>>(move |_, _| log1.borrow_mut().push(1));
		let log2 = log.clone();
		bus.register::<BehaviorAdded<Health>>(move |_, _| log2.borrow_mut().push(2));

		bus.push(BehaviorAdded::<Health>::new(Entity::from_raw(0)));
		assert_eq!(*log.borrow(), vec![1, 2]);
	}

	#[test]
	fn distinct_behavior_types_are_distinct_event_types() {
		let mut bus = EventBus::new();
		let hits = std::rc::Rc::new(std::cell::RefCell::new(0));

		let hits2 = hits.clone();
		bus.register::<BehaviorAdded<Health>>(move |_, _| *hits2.borrow_mut() += 1);

		bus.push(BehaviorAdded::<Transform>::new(Entity::from_raw(0)));
		assert_eq!(*hits.borrow(), 0);
	}

	#[test]
	fn handler_can_reentrantly_push_and_register() {
		let mut bus = EventBus::new();
		let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

		let log1 = log.clone();
		bus.register::<Reset>(move |bus, _| {
			log1.borrow_mut().push("reset-handler");
			bus.push(Shutdown);
		});
		let log2 = log.clone();
		bus.register::<Shutdown>(move |_, _| log2.borrow_mut().push("shutdown-handler"));

		bus.push(Reset);
		assert_eq!(*log.borrow(), vec!["reset-handler", "shutdown-handler"]);
	}
}
