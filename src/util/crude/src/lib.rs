mod archetype;
pub use archetype::*;

mod entity;
pub use entity::*;

mod schedule;
pub use schedule::*;

mod storage_rand;
pub use storage_rand::*;

mod storage_seq;
pub use storage_seq::*;

mod universe;
pub use universe::*;
