mod api;
mod arch;
mod entities;
mod ids;
mod queue;

pub use api::*;
pub use arch::{ArchHandle, ArchetypeDeadError, EntityArchLocator};
pub use ids::EntityGen;
