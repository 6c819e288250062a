//! Backed-flavor behavior storage (spec.md §4.5) and the concrete
//! `Transform` behavior built on top of it (SPEC_FULL.md §4.5).

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::backing::{Affine, AffineStore, Quat, Vec3, Vec3Store};
use crate::entity::Entity;
use crate::error::BehaviorError;
use crate::event::{BehaviorAdded, Error as ErrorEvent, EventBus, PostBehaviorUpdated, PreBehaviorRemoved, PreBehaviorUpdated};

/// Tracks which entities currently have a record of behavior `B`, where the
/// actual fields live in externally-owned columnar backing stores rather
/// than inside this registry (spec.md §3, "backed" flavor). `S` is whatever
/// store bundle `B`'s fields are drawn from — `init`/`reset` are handed a
/// mutable reference to it alongside the entity to mutate in place.
#[derive(Debug)]
pub struct BackedBehaviorRegistry<B> {
	present: Box<[bool]>,
	in_flight: Box<[bool]>,
	_marker: PhantomData<fn() -> B>,
}

impl<B: 'static> BackedBehaviorRegistry<B> {
	pub fn new(capacity: usize) -> Self {
		Self {
			present: vec![false; capacity].into_boxed_slice(),
			in_flight: vec![false; capacity].into_boxed_slice(),
			_marker: PhantomData,
		}
	}

	pub fn has(&self, entity: Entity) -> bool {
		self.present[entity.index_usize()]
	}

	/// Marks `entity` present without firing any event. Returns `true` if
	/// this was its first record.
	pub fn write(&mut self, entity: Entity) -> bool {
		let index = entity.index_usize();
		let first_time = !self.present[index];
		self.present[index] = true;
		first_time
	}

	/// Marks `entity` absent without firing any event. Returns `true` if a
	/// record was present.
	pub fn clear(&mut self, entity: Entity) -> bool {
		let index = entity.index_usize();
		let was_present = self.present[index];
		self.present[index] = false;
		was_present
	}

	fn is_in_flight(&self, entity: Entity) -> bool {
		self.in_flight[entity.index_usize()]
	}

	fn set_in_flight(&mut self, entity: Entity, value: bool) {
		self.in_flight[entity.index_usize()] = value;
	}

	/// Self-contained convenience, safe only when this registry isn't
	/// reachable through an `Rc<RefCell<_>>` any event handler might also
	/// borrow (see `behavior::set_shared` for why that matters). `Transform`
	/// is shared, so `World` drives it through the free functions
	/// `set_transform`/`remove_transform` below instead of this method.
	pub fn set<S>(
		&mut self,
		bus: &mut EventBus,
		store: &mut S,
		entity: Entity,
		init: impl FnOnce(&mut S, Entity),
	) {
		let index = entity.index_usize();
		if !self.present[index] {
			self.present[index] = true;
			init(store, entity);
			bus.push(BehaviorAdded::<B>::new(entity));
		} else {
			bus.push(PreBehaviorUpdated::<B>::new(entity));
			init(store, entity);
			bus.push(PostBehaviorUpdated::<B>::new(entity));
		}
	}

	pub fn remove<S>(
		&mut self,
		bus: &mut EventBus,
		store: &mut S,
		entity: Entity,
		reset: impl FnOnce(&mut S, Entity),
	) {
		let index = entity.index_usize();
		if self.present[index] {
			bus.push(PreBehaviorRemoved::<B>::new(entity));
			reset(store, entity);
			self.present[index] = false;
		}
	}
}

/// Marker type identifying the `Transform` backed behavior in event
/// payloads (`BehaviorAdded<Transform>`, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform;

/// The column bundle `Transform` is built from, plus the two caches the
/// transform pipeline (C7-C9) maintains: `local` and `world` are written by
/// the pipeline, never directly by callers; `parent_world` is the scattered
/// cache of the entity's parent's last computed world transform.
#[derive(Debug)]
pub struct TransformStores {
	pub position: Vec3Store,
	pub rotation: crate::backing::QuatStore,
	pub scale: Vec3Store,
	pub anchor: Vec3Store,
	pub local: AffineStore,
	pub world: AffineStore,
	pub parent_world: AffineStore,
}

impl TransformStores {
	pub fn new(capacity: usize) -> Self {
		Self {
			position: Vec3Store::new(capacity, Vec3::default()),
			rotation: crate::backing::QuatStore::new(capacity),
			scale: Vec3Store::new(capacity, Vec3 { x: 1.0, y: 1.0, z: 1.0 }),
			anchor: Vec3Store::new(capacity, Vec3::default()),
			local: AffineStore::new(capacity),
			world: AffineStore::new(capacity),
			parent_world: AffineStore::new(capacity),
		}
	}

	/// Resets every column for `entity` to its default, per spec.md §4.7
	/// ("resets all transform columns for that entity").
	pub fn reset_entity(&mut self, entity: Entity) {
		self.position.reset(entity, Vec3::default());
		self.rotation.reset(entity);
		self.scale.reset(entity, Vec3 { x: 1.0, y: 1.0, z: 1.0 });
		self.anchor.reset(entity, Vec3::default());
		self.reset_caches(entity);
	}

	/// Resets only the pipeline-owned `local`/`world`/`parent_world`
	/// columns, leaving position/rotation/scale/anchor untouched. Run when
	/// a `Transform` is first added, per spec.md §4.7 ("initializes the
	/// entity's world-transform slot to identity and ensures the
	/// parent-world-transform column entries are identity").
	pub fn reset_caches(&mut self, entity: Entity) {
		self.local.reset(entity);
		self.world.reset(entity);
		self.parent_world.reset(entity);
	}
}

/// A transient handle into `TransformStores` for one entity, passed to the
/// `init` closure of `World::set_transform`. Only the four caller-facing
/// fields are exposed — `local`/`world`/`parent_world` are pipeline-owned.
pub struct TransformHandle<'a> {
	entity: Entity,
	stores: &'a mut TransformStores,
}

impl<'a> TransformHandle<'a> {
	pub fn new(entity: Entity, stores: &'a mut TransformStores) -> Self {
		Self { entity, stores }
	}

	pub fn position(&self) -> Vec3 {
		self.stores.position.get(self.entity)
	}

	pub fn set_position(&mut self, value: Vec3) {
		self.stores.position.set(self.entity, value);
	}

	pub fn rotation(&self) -> Quat {
		self.stores.rotation.get(self.entity)
	}

	pub fn set_rotation(&mut self, value: Quat) {
		self.stores.rotation.set(self.entity, value);
	}

	pub fn scale(&self) -> Vec3 {
		self.stores.scale.get(self.entity)
	}

	pub fn set_scale(&mut self, value: Vec3) {
		self.stores.scale.set(self.entity, value);
	}

	pub fn anchor(&self) -> Vec3 {
		self.stores.anchor.get(self.entity)
	}

	pub fn set_anchor(&mut self, value: Vec3) {
		self.stores.anchor.set(self.entity, value);
	}

	pub fn world(&self) -> Affine {
		self.stores.world.get(self.entity)
	}
}

/// Installs a fresh `Transform` on `entity`, or mutates an existing one,
/// running `init` against a `TransformHandle` and firing the matching
/// lifecycle event(s). On first install, resets the pipeline-owned caches
/// to identity before handing `init` control (spec.md §4.7).
///
/// `presence` and `stores` are both `Rc<RefCell<_>>`-shared with the rest
/// of the world, so — like `behavior::set_shared` — this never holds
/// either borrowed while a bus dispatch is in flight. Reentrant mutation of
/// the same entity's `Transform` from within a handler this call triggers
/// is rejected the same way `set_shared` rejects it (spec.md §9).
pub fn set_transform(
	bus: &mut EventBus,
	presence: &Rc<RefCell<BackedBehaviorRegistry<Transform>>>,
	stores: &Rc<RefCell<TransformStores>>,
	entity: Entity,
	init: impl FnOnce(&mut TransformHandle),
) {
	if presence.borrow().is_in_flight(entity) {
		bus.push(ErrorEvent::new(BehaviorError::HandlerPanic {
			event_type: std::any::type_name::<Transform>(),
		}));
		return;
	}
	presence.borrow_mut().set_in_flight(entity, true);

	let first_time = !presence.borrow().has(entity);
	if first_time {
		{
			let mut stores = stores.borrow_mut();
			stores.reset_caches(entity);
			init(&mut TransformHandle::new(entity, &mut stores));
		}
		presence.borrow_mut().write(entity);
		bus.push(BehaviorAdded::<Transform>::new(entity));
	} else {
		bus.push(PreBehaviorUpdated::<Transform>::new(entity));
		{
			let mut stores = stores.borrow_mut();
			init(&mut TransformHandle::new(entity, &mut stores));
		}
		bus.push(PostBehaviorUpdated::<Transform>::new(entity));
	}

	presence.borrow_mut().set_in_flight(entity, false);
}

/// Removes `entity`'s `Transform` if present, firing `PreBehaviorRemoved`
/// before resetting every column back to its default. Shared-safe, see
/// `set_transform`.
pub fn remove_transform(
	bus: &mut EventBus,
	presence: &Rc<RefCell<BackedBehaviorRegistry<Transform>>>,
	stores: &Rc<RefCell<TransformStores>>,
	entity: Entity,
) {
	if presence.borrow().is_in_flight(entity) {
		bus.push(ErrorEvent::new(BehaviorError::HandlerPanic {
			event_type: std::any::type_name::<Transform>(),
		}));
		return;
	}

	let was_present = presence.borrow().has(entity);
	if was_present {
		presence.borrow_mut().set_in_flight(entity, true);
		bus.push(PreBehaviorRemoved::<Transform>::new(entity));
		stores.borrow_mut().reset_entity(entity);
		presence.borrow_mut().clear(entity);
		presence.borrow_mut().set_in_flight(entity, false);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_on_fresh_entity_fires_added_and_applies_init() {
		let mut bus = EventBus::new();
		let mut registry = BackedBehaviorRegistry::<Transform>::new(4);
		let mut stores = TransformStores::new(4);
		let e = Entity::from_raw(0);

		let added = std::rc::Rc::new(std::cell::Cell::new(false));
		let a = added.clone();
		bus.register::<BehaviorAdded<Transform>>(move |_, _| a.set(true));

		registry.set(&mut bus, &mut stores, e, |s, entity| {
			s.position.set(entity, Vec3 { x: 1.0, y: 2.0, z: 3.0 });
		});

		assert!(added.get());
		assert_eq!(stores.position.get(e), Vec3 { x: 1.0, y: 2.0, z: 3.0 });
	}

	#[test]
	fn remove_resets_columns_to_defaults() {
		let mut bus = EventBus::new();
		let mut registry = BackedBehaviorRegistry::<Transform>::new(4);
		let mut stores = TransformStores::new(4);
		let e = Entity::from_raw(0);
		registry.set(&mut bus, &mut stores, e, |s, entity| {
			s.position.set(entity, Vec3 { x: 1.0, y: 2.0, z: 3.0 });
		});

		registry.remove(&mut bus, &mut stores, e, |s, entity| s.reset_entity(entity));

		assert!(!registry.has(e));
		assert_eq!(stores.position.get(e), Vec3::default());
	}
}
