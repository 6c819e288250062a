//! Internal error taxonomy (spec.md §7, SPEC_FULL.md §7).
//!
//! None of this ever leaves the public API as a `Result`: every fallible
//! operation aborts silently and reports through an `Error` event instead
//! (see [`crate::event::Error`]). The enum exists so that payload is a typed
//! value rather than an ad hoc string, following the `#[derive(Error)]`
//! style of `src/geode/src/core/object_db.rs`'s `SlotAccessError`.

use thiserror::Error;

use crate::entity::{Entity, Partition};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum InvalidParentReason {
	#[error("parent entity is not active")]
	ParentInactive,
	#[error("assignment would create a cycle")]
	WouldCreateCycle,
}

#[derive(Debug, Error)]
pub enum BehaviorError {
	#[error("partition {partition:?} has no free slots")]
	CapacityExhausted { partition: Partition },

	#[error("cannot set {child} parent to {parent}: {reason}")]
	InvalidParent {
		child: Entity,
		parent: Entity,
		#[source]
		reason: InvalidParentReason,
	},

	#[error("transform recalculation exceeded the iteration safety bound with {remaining_dirty} entities still dirty")]
	IterationLimitExceeded { remaining_dirty: usize },

	#[error("event handler for {event_type} reentered its own behavior+entity")]
	HandlerPanic { event_type: &'static str },

	#[error("persistence error: {0}")]
	PersistenceError(String),

	#[error("deserialization error: {0}")]
	DeserializationError(String),
}
