pub use newtypes_proc::{delegate, iterator, transparent};

mod arena;
pub use arena::*;

mod num_enum;
pub use num_enum::*;

mod tuples;
// pub use tuples::*; (not needed for now)

mod index;
pub use index::*;
