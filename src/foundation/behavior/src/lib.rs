//! Entity-Behavior Data runtime: dense per-entity storage, a typed event
//! bus, parent/child hierarchy with cascading dirty propagation, and a
//! batched local-to-world transform pipeline.
//!
//! [`World`] is the single entry point; everything else in this crate is an
//! implementation detail it assembles.

pub mod backed_behavior;
pub mod backing;
pub mod behavior;
pub mod entity;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod transform;
mod world;

pub use backed_behavior::{BackedBehaviorRegistry, Transform, TransformHandle, TransformStores};
pub use backing::{Affine, AffineStore, Quat, QuatStore, Vec3, Vec3Store};
pub use behavior::BehaviorRegistry;
pub use entity::{Entity, EntityRegistry, Partition, WorldCapacity};
pub use error::{BehaviorError, InvalidParentReason};
pub use event::{
	BehaviorAdded, Error, EventBus, Initialize, PostBehaviorUpdated, PostEntityDeactivated, PreBehaviorRemoved,
	PreBehaviorUpdated, PreEntityDeactivated, Reset, Shutdown, WorldTransform,
};
pub use hierarchy::{HierarchyRegistry, Parent};
pub use transform::{DirtySet, TransformPipeline};
pub use world::World;
