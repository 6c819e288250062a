pub mod entity;
pub mod lock;

pub mod prelude {
	pub use super::{
		entity::{ArcEntity, Demand, Entity, Provider, ProviderExt, WeakArcEntity},
		lock::{BorrowMutability, LRefCell, Lock, Session, SessionGuard},
	};
}
